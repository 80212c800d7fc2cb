// This is the entry point for the CLI application.
// It parses command-line arguments, loads the path configuration and
// delegates to the library for generation.

use clap::Parser;
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

use restapi_test_generator::cli::args::PathsArgs;
use restapi_test_generator::cli::{Args, Command};
use restapi_test_generator::config::{validate_path, PathRole, PathsConfig};
use restapi_test_generator::utils::display_path;
use restapi_test_generator::{
    generate_conf, generate_file, generate_module, generate_smoke_upgrade, generate_submodule, inspect,
    Conventions, RenderSettings, Result, WorkflowRequest,
};

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn update_paths(paths_file: &Path, args: &PathsArgs) -> Result<()> {
    let mut config = PathsConfig::load(paths_file)?;
    let updates = [
        (PathRole::ScriptDir, &args.script_dir),
        (PathRole::ModulePath, &args.module_path),
        (PathRole::ReadPath, &args.read_path),
        (PathRole::ConfDir, &args.conf_dir),
        (PathRole::SmokeUpgradeDir, &args.smoke_upgrade_dir),
        (PathRole::SubmodulePath, &args.submodule_path),
    ];
    for (role, value) in updates {
        if let Some(value) = value {
            config.set(role, validate_path(role, value)?);
        }
    }
    config.save(paths_file)?;
    for (role, path) in config.iter() {
        println!("{}:{}", role, path.display());
    }
    Ok(())
}

fn run(args: Args) -> Result<()> {
    if let Command::Paths(paths) = &args.command {
        return update_paths(&args.paths_file, paths);
    }

    let config = PathsConfig::load(&args.paths_file)?;
    let spec_file = || -> Result<PathBuf> {
        match &args.spec {
            Some(spec) => Ok(spec.clone()),
            None => Ok(config.require(PathRole::ReadPath)?.to_path_buf()),
        }
    };

    match &args.command {
        Command::Paths(_) => Ok(()),
        Command::File(file) => {
            let settings = RenderSettings::new(&file.authoring.author, &file.nomenclature)
                .with_command("restapi-test-generator file");
            let written = generate_file(
                spec_file()?,
                &file.operation_id,
                &settings,
                &file.authoring.superclass,
                config.require(PathRole::ScriptDir)?,
            )?;
            for path in written {
                println!("{}", display_path(path));
            }
            Ok(())
        }
        Command::Module(module) => {
            let settings = RenderSettings::new(&module.authoring.author, &module.nomenclature)
                .with_command("restapi-test-generator module");
            let written = generate_module(
                spec_file()?,
                &module.tag,
                &settings,
                &module.authoring.superclass,
                config.require(PathRole::ModulePath)?,
            )?;
            for path in written {
                println!("{}", display_path(path));
            }
            Ok(())
        }
        Command::Submodule(submodule) => {
            let settings = RenderSettings::new(&submodule.author, &submodule.tag)
                .with_command("restapi-test-generator submodule");
            let path = generate_submodule(
                spec_file()?,
                &submodule.tag,
                &settings,
                config.require(PathRole::SubmodulePath)?,
            )?;
            println!("{}", display_path(path));
            Ok(())
        }
        Command::Conf(conf) => {
            let settings = RenderSettings::new("", &conf.nomenclature);
            let path = generate_conf(
                spec_file()?,
                &conf.tag,
                &conf.nomenclature,
                &settings,
                config.require(PathRole::ConfDir)?,
            )?;
            println!("{}", display_path(path));
            Ok(())
        }
        Command::SmokeUpgrade(upgrade) => {
            let request = WorkflowRequest::new(&upgrade.cloud, &upgrade.image, &upgrade.release_id)?;
            let path = generate_smoke_upgrade(&request, config.require(PathRole::SmokeUpgradeDir)?)?;
            println!("{}", display_path(path));
            Ok(())
        }
        Command::Inspect(selection) => {
            let conventions = Conventions::default();
            println!("{}", inspect(spec_file()?, &selection.selector(), &conventions)?);
            Ok(())
        }
    }
}

fn main() {
    // Parse command line arguments
    let args = Args::parse();
    init_tracing(args.verbose);

    if let Err(err) = run(args) {
        eprintln!("Error: {}", err);
        process::exit(1);
    }
}
