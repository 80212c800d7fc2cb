use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::DEFAULT_PATHS_FILE;
use crate::parser::Selector;

#[derive(Debug, Parser)]
#[clap(
    name = "restapi-test-generator",
    about = "Generate REST API test scripts, call wrappers and pipeline confs from OpenAPI specifications",
    version
)]
pub struct Args {
    /// Path configuration file holding the directories to read from and write to
    #[clap(
        long,
        value_name = "FILE",
        default_value = DEFAULT_PATHS_FILE,
        env = "RESTAPI_TEST_GENERATOR_PATHS",
        global = true
    )]
    pub paths_file: PathBuf,

    /// Specification file, overrides the configured readPath
    #[clap(long, value_name = "FILE", global = true)]
    pub spec: Option<PathBuf>,

    /// Log debug output
    #[clap(short, long, global = true)]
    pub verbose: bool,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Validate and save the directories used by the other commands
    Paths(PathsArgs),
    /// Generate the test script of a single operation into scriptDir
    File(FileArgs),
    /// Generate a test module for every operation of a tag into modulePath
    Module(ModuleArgs),
    /// Generate the API call wrappers of a tag into submodulePath
    Submodule(TagArgs),
    /// Generate the pipeline conf of a tag into confDir
    Conf(ConfArgs),
    /// Generate a smoke upgrade workflow into smokeUpgradeDir
    SmokeUpgrade(SmokeUpgradeArgs),
    /// Print the linked endpoint records as JSON
    Inspect(InspectArgs),
}

#[derive(Debug, clap::Args)]
pub struct PathsArgs {
    /// Directory for single test scripts
    #[clap(long, value_name = "DIRECTORY")]
    pub script_dir: Option<PathBuf>,

    /// Root directory for test modules
    #[clap(long, value_name = "DIRECTORY")]
    pub module_path: Option<PathBuf>,

    /// Specification file, or a directory holding openapi.generated.yaml
    #[clap(long, value_name = "PATH")]
    pub read_path: Option<PathBuf>,

    /// Directory for pipeline conf files
    #[clap(long, value_name = "DIRECTORY")]
    pub conf_dir: Option<PathBuf>,

    /// Root directory for smoke upgrade workflows
    #[clap(long, value_name = "DIRECTORY")]
    pub smoke_upgrade_dir: Option<PathBuf>,

    /// Directory for API call wrappers
    #[clap(long, value_name = "DIRECTORY")]
    pub submodule_path: Option<PathBuf>,
}

#[derive(Debug, clap::Args)]
pub struct AuthoringArgs {
    /// Author named in the generated headers
    #[clap(long, env = "RESTAPI_TEST_GENERATOR_AUTHOR")]
    pub author: String,

    /// Base test class, e.g. GetProject
    #[clap(long)]
    pub superclass: String,
}

#[derive(Debug, clap::Args)]
pub struct FileArgs {
    /// operationId of the operation to script
    #[clap(long)]
    pub operation_id: String,

    /// Nomenclature passed to setUp, e.g. Clusters_GET
    #[clap(long)]
    pub nomenclature: String,

    #[clap(flatten)]
    pub authoring: AuthoringArgs,
}

#[derive(Debug, clap::Args)]
pub struct ModuleArgs {
    /// Tag whose operations are scripted (exact match)
    #[clap(long)]
    pub tag: String,

    /// Module nomenclature; the part before the first underscore names the directory
    #[clap(long)]
    pub nomenclature: String,

    #[clap(flatten)]
    pub authoring: AuthoringArgs,
}

#[derive(Debug, clap::Args)]
pub struct TagArgs {
    /// Tag whose operations are wrapped (exact match)
    #[clap(long)]
    pub tag: String,

    /// Author named in the generated header
    #[clap(long, env = "RESTAPI_TEST_GENERATOR_AUTHOR")]
    pub author: String,
}

#[derive(Debug, clap::Args)]
pub struct ConfArgs {
    /// Tag whose test classes are listed (exact match)
    #[clap(long)]
    pub tag: String,

    /// Directory name of the test module the classes live in
    #[clap(long)]
    pub nomenclature: String,
}

#[derive(Debug, clap::Args)]
pub struct SmokeUpgradeArgs {
    /// Cloud provider: AWS, GCP or Azure (case sensitive)
    #[clap(long)]
    pub cloud: String,

    /// Server image of the deployed cluster
    #[clap(long)]
    pub image: String,

    /// Release id of the image, x.y.z
    #[clap(long)]
    pub release_id: String,
}

#[derive(Debug, clap::Args)]
pub struct InspectArgs {
    /// Tag to select (exact match)
    #[clap(long, required_unless_present = "operation-id", conflicts_with = "operation-id")]
    pub tag: Option<String>,

    /// operationId to select
    #[clap(long)]
    pub operation_id: Option<String>,
}

impl InspectArgs {
    pub fn selector(&self) -> Selector {
        match (&self.tag, &self.operation_id) {
            (Some(tag), _) => Selector::Tag(tag.clone()),
            (None, Some(id)) => Selector::OperationId(id.clone()),
            (None, None) => Selector::Tag(String::new()),
        }
    }
}
