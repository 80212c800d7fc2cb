//! Smoke-upgrade workflow: a nested tree of deployment actions that deploys a
//! cluster on an image, loads it, scales it, upgrades it and tears it down.

use serde::Serialize;
use serde_json::{json, Value};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::GeneratorError;

const IMAGE_PREFIX: &str = "couchbase-cloud-server-";

/// Target the deployed cluster is upgraded to.
pub const UPGRADE_RELEASE_ID: &str = "1.0.25";
pub const UPGRADE_IMAGE: &str = "couchbase-cloud-server-7.6.0-2090-x86_64-v1.0.28";
pub const UPGRADE_VERSION: &str = "7.6.0";

const HEADER: &str =
    "# serverImage specified in the Upgrade G2 Cluster action should be different from the deployed image.\n";

const DOC_LOADER_PARAMS: &str = "-n <connection string> -user <username> -pwd <password> -b <bucket> -scope <scope> -collection <collection> -p 11207 -create_s 0 -create_e 1000000 -cr 100 -ops 100000 -docSize 1024 -workers 10";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cloud {
    Aws,
    Gcp,
    Azure,
}

impl Cloud {
    pub fn as_str(&self) -> &'static str {
        match self {
            Cloud::Aws => "AWS",
            Cloud::Gcp => "GCP",
            Cloud::Azure => "Azure",
        }
    }

    pub fn region(&self) -> &'static str {
        match self {
            Cloud::Aws => "us-east-1",
            Cloud::Azure => "eastus",
            Cloud::Gcp => "us-east1",
        }
    }

    /// Provider name the deployment actions expect.
    pub fn provider(&self) -> String {
        format!("hosted{}", self.as_str())
    }
}

impl fmt::Display for Cloud {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-sensitive: only `AWS`, `GCP` and `Azure` are accepted.
impl FromStr for Cloud {
    type Err = GeneratorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AWS" => Ok(Cloud::Aws),
            "GCP" => Ok(Cloud::Gcp),
            "Azure" => Ok(Cloud::Azure),
            other => Err(GeneratorError::InvalidWorkflowInput(format!(
                "unknown cloud provider \"{}\", expected AWS, GCP or Azure",
                other
            ))),
        }
    }
}

/// Validated inputs of one workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowRequest {
    pub cloud: Cloud,
    pub image: String,
    pub release_id: String,
    /// Server version read from the image name.
    pub version: String,
}

impl WorkflowRequest {
    pub fn new(cloud: &str, image: &str, release_id: &str) -> Result<Self, GeneratorError> {
        let cloud = cloud.parse()?;
        let version = version_from_image(image)?;
        let parts: Vec<&str> = release_id.split('.').collect();
        if parts.len() != 3 || parts.iter().any(|p| p.is_empty()) {
            return Err(GeneratorError::InvalidWorkflowInput(format!(
                "release id \"{}\" is not of the form x.y.z",
                release_id
            )));
        }
        Ok(WorkflowRequest {
            cloud,
            image: image.to_string(),
            release_id: release_id.to_string(),
            version,
        })
    }

    pub fn compact_release_id(&self) -> String {
        self.release_id.replace('.', "")
    }

    pub fn file_name(&self) -> String {
        format!("trinity-upgrade-{}.yaml", self.compact_release_id())
    }

    /// `<root>/<lowercase cloud>/trinity-upgrade-<id>.yaml`
    pub fn destination(&self, root: &Path) -> PathBuf {
        root.join(self.cloud.as_str().to_lowercase()).join(self.file_name())
    }
}

/// The five characters after the image prefix, with `-` read as `.`.
pub fn version_from_image(image: &str) -> Result<String, GeneratorError> {
    let rest = image
        .split_once(IMAGE_PREFIX)
        .map(|(_, rest)| rest)
        .ok_or_else(|| {
            GeneratorError::InvalidWorkflowInput(format!(
                "image \"{}\" does not contain \"{}\"",
                image, IMAGE_PREFIX
            ))
        })?;
    let version: String = rest
        .chars()
        .take(5)
        .map(|c| if c == '-' { '.' } else { c })
        .collect();
    if version.chars().count() < 5 {
        return Err(GeneratorError::InvalidWorkflowInput(format!(
            "image \"{}\" carries no server version",
            image
        )));
    }
    Ok(version)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Workflow {
    action: &'static str,
    iterations: u32,
    max_concurrent: u32,
    timeout_in_mins: u32,
    trees: Vec<Action>,
}

#[derive(Debug, Serialize)]
struct Action {
    action: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    config: Option<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    trees: Vec<Action>,
}

fn action(name: &'static str, config: Option<Value>, trees: Vec<Action>) -> Action {
    Action {
        action: name,
        config,
        trees,
    }
}

fn checklist(provider: &str, checks: &[&str], next: Action) -> Action {
    action(
        "Checklist",
        Some(json!({ "provider": provider, "checks": checks })),
        vec![next],
    )
}

fn container(image: &str, params: &str, extra: Option<(&str, Value)>, next: Action) -> Action {
    let mut config = json!({
        "imageName": image,
        "params": params,
        "bucketName": "default1",
    });
    if let (Some((key, value)), Some(map)) = (extra, config.as_object_mut()) {
        map.insert(key.to_string(), value);
    }
    action("Run Container", Some(config), vec![next])
}

/// Innermost first: everything after the load phase.
fn upgrade_phase(provider: &str) -> Action {
    let teardown = action(
        "Stop Pillowfight",
        None,
        vec![action(
            "Destroy G2 Cluster",
            None,
            vec![action("Wait Time", Some(json!({ "sleepTimeMins": 40 })), Vec::new())],
        )],
    );
    let scale_in = action(
        "Modify G2 Cluster Specs",
        Some(json!({
            "template": "g2/quick-3.json",
            "scaleType": "Scale-In",
            "timeoutInMins": 200,
        })),
        vec![checklist(
            provider,
            &["N1QLQueries", "DeleteIndex", "CheckRebalance", "ReceiveMetrics"],
            teardown,
        )],
    );
    let upgrade = action(
        "Upgrade G2 Cluster",
        Some(json!({
            "releaseId": UPGRADE_RELEASE_ID,
            "serverImage": UPGRADE_IMAGE,
            "serverVersion": UPGRADE_VERSION,
            "timeoutInMins": 200,
        })),
        vec![checklist(
            provider,
            &["CreateFTS", "CheckBucketsHealth", "N1QLQueries", "DeleteIndex"],
            scale_in,
        )],
    );
    let wait = action("Wait Time", Some(json!({ "sleepTimeMins": 2 })), vec![upgrade]);
    action(
        "Modify G2 Cluster Specs",
        Some(json!({
            "template": "g2/quick-5.json",
            "scaleType": "Scale-Out",
            "timeoutInMins": 200,
        })),
        vec![checklist(
            provider,
            &["N1QLQueries", "DeleteIndex", "ImportSampleBucket"],
            wait,
        )],
    )
}

fn load_phase(provider: &str) -> Action {
    let pillowfight = action(
        "Start Pillowfight",
        Some(json!({
            "windowMins": 5,
            "flags": [
                "--num-threads=5",
                "--max-size=500",
                "--num-items=150",
                "--num-cycles=-1",
                "--batch-size=100",
                "--timings",
                "-Doperation_timeout=300",
            ],
        })),
        vec![upgrade_phase(provider)],
    );

    let loaders = (0..5).rev().fold(pillowfight, |next, i| {
        action(
            "Run Docloader",
            Some(json!({
                "params": DOC_LOADER_PARAMS,
                "bucket": "default1",
                "scope": "scope_0",
                "collection": format!("coll_{}", i),
            })),
            vec![next],
        )
    });

    let function = |n: u32, trees: Vec<Action>| {
        action(
            "Create Function",
            Some(json!({
                "functionFile": format!(
                    "eventing-functions/sample-eventing-function-backup-restore-tests/func_{}.json",
                    n
                ),
            })),
            trees,
        )
    };
    let mut functions: Vec<Action> = (1..5).map(|n| function(n, Vec::new())).collect();
    functions.push(function(5, vec![loaders]));

    action(
        "Create Analytics Entities",
        Some(json!({
            "numberOfDataverses": 30,
            "numberOfDatasets": 25,
            "numberOfSynonyms": 10,
        })),
        functions,
    )
}

fn build_workflow(request: &WorkflowRequest) -> Workflow {
    let provider = request.cloud.provider();

    let fts = container(
        "sequoiatools/ftsindexmanager",
        "-n <hostname> -o 18091 -u <username> -p <password> -b <bucketName> -m 1:2:2,1:2:4 -s 1 -a create_index_from_map_on_bucket -tls True",
        Some(("bucketMemory", json!(2133))),
        load_phase(&provider),
    );
    let gsi = container(
        "sequoiatools/indexmanager",
        "-n <hostname> -u <username> -p <password> --bucket_list default1 -a create_n_indexes_on_buckets --num_of_indexes_per_bucket 39 -x True",
        None,
        fts,
    );
    let collections = container(
        "sequoiatools/collections:capella",
        "-i <hostname>:18091 -u <username> -p <password> -b <bucketName>  -o create_multi_scope_collection -s scope_ -c coll_ --scope_count=2 --collection_count=10 --collection_distribution=uniform --tls True",
        None,
        gsi,
    );
    let bucket = action(
        "Create Bucket",
        Some(json!({
            "bucket": "default1",
            "bucketConflictResolution": "seqno",
            "memoryAllocationInMb": 2050,
            "replicas": 2,
            "flush": true,
            "durabilityLevel": "majority",
            "storageBackend": "magma",
        })),
        vec![collections],
    );
    let cluster = action(
        "Deploy G2 Cluster",
        Some(json!({
            "provider": provider,
            "region": request.cloud.region(),
            "templates": ["g2/quick-3.json"],
            "serverVersion": request.version,
            "serverImage": request.image,
            "clusterName": request.compact_release_id(),
        })),
        vec![action("Allow IP", None, vec![bucket])],
    );

    Workflow {
        action: "Get JWT",
        iterations: 1,
        max_concurrent: 5,
        timeout_in_mins: 500,
        trees: vec![action("Deploy Project", None, vec![cluster])],
    }
}

/// The workflow document, comment header included.
pub fn render_workflow(request: &WorkflowRequest) -> Result<String, GeneratorError> {
    let body = serde_yaml::to_string(&build_workflow(request))?;
    Ok(format!("{}{}", HEADER, body))
}
