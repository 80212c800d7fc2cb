// Plans the artifacts of each command from a linked endpoint set.

use std::path::Path;
use tracing::debug;

use super::pipeline_conf::{conf_file_name, render_pipeline_conf};
use super::settings::{RenderSettings, Superclass};
use super::test_script::render_test_script;
use super::workflow::{render_workflow, WorkflowRequest};
use super::wrapper::render_wrapper_module;
use super::{Artifact, GeneratorError, Result};
use crate::model::{Endpoint, Verb};
use crate::utils::camel_to_snake;

pub const PACKAGE_MARKER: &str = "__init__.py";

fn script_path(dir: &Path, endpoint: &Endpoint) -> std::path::PathBuf {
    dir.join(format!("{}.py", endpoint.file_name))
}

/// A single test script plus the package marker of its directory.
pub fn plan_file(
    endpoint: &Endpoint,
    settings: &RenderSettings,
    superclass: &Superclass,
    script_dir: &Path,
) -> Vec<Artifact> {
    vec![
        Artifact::new(script_dir.join(PACKAGE_MARKER), ""),
        Artifact::new(
            script_path(script_dir, endpoint),
            render_test_script(endpoint, settings, superclass, &settings.nomenclature),
        ),
    ]
}

/// Superclass of a module script: GET scripts extend the given class, the
/// others extend the GET class of their collection.
fn module_superclass(
    endpoint: &Endpoint,
    endpoints: &[Endpoint],
    given: &Superclass,
    directory: &str,
    settings: &RenderSettings,
) -> Superclass {
    if endpoint.verb == Verb::Get {
        return given.clone();
    }
    let url = endpoint.collection_url();
    let gets = || endpoints.iter().filter(|e| e.verb == Verb::Get);
    gets()
        .find(|e| e.collection_url() == url)
        .or_else(|| gets().next())
        .map(|get| Superclass::sibling(&get.class_name, &get.file_name, directory, &settings.conventions))
        .unwrap_or_else(|| given.clone())
}

/// One script per endpoint in `<module_root>/<nomenclature prefix>/`.
pub fn plan_module(
    endpoints: &[Endpoint],
    settings: &RenderSettings,
    superclass: &Superclass,
    module_root: &Path,
) -> Result<Vec<Artifact>> {
    if endpoints.is_empty() {
        return Err(GeneratorError::NothingToGenerate("no endpoints selected".into()));
    }
    let directory = settings.nomenclature_prefix().to_string();
    let dir = module_root.join(&directory);

    let mut artifacts = vec![Artifact::new(dir.join(PACKAGE_MARKER), "")];
    for endpoint in endpoints {
        let parent = module_superclass(endpoint, endpoints, superclass, &directory, settings);
        let nomenclature = format!("{}_{}", directory, endpoint.verb.method_token());
        debug!(class = %endpoint.class_name, superclass = %parent.name, "planned module script");
        artifacts.push(Artifact::new(
            script_path(&dir, endpoint),
            render_test_script(endpoint, settings, &parent, &nomenclature),
        ));
    }
    Ok(artifacts)
}

/// Wrapper functions for a tag, `<tag_snake>_api_calls.py`.
pub fn plan_submodule(endpoints: &[Endpoint], tag: &str, settings: &RenderSettings, dir: &Path) -> Result<Artifact> {
    if endpoints.is_empty() {
        return Err(GeneratorError::NothingToGenerate(format!("no endpoints for tag \"{}\"", tag)));
    }
    let stem: String = camel_to_snake(&tag.replace(' ', "_"))
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_')
        .collect::<String>()
        .to_lowercase();
    let stem = stem.split('_').filter(|s| !s.is_empty()).collect::<Vec<_>>().join("_");
    Ok(Artifact::new(
        dir.join(format!("{}_api_calls.py", stem)),
        render_wrapper_module(endpoints, settings),
    ))
}

pub fn plan_conf(
    endpoints: &[Endpoint],
    tag: &str,
    nomenclature: &str,
    settings: &RenderSettings,
    conf_dir: &Path,
) -> Result<Artifact> {
    if endpoints.is_empty() {
        return Err(GeneratorError::NothingToGenerate(format!("no endpoints for tag \"{}\"", tag)));
    }
    Ok(Artifact::new(
        conf_dir.join(conf_file_name(tag)),
        render_pipeline_conf(endpoints, nomenclature, &settings.conventions),
    ))
}

pub fn plan_workflow(request: &WorkflowRequest, root: &Path) -> Result<Artifact> {
    Ok(Artifact::new(request.destination(root), render_workflow(request)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conventions::Conventions;
    use crate::model::build_endpoints;
    use crate::parser::ApiOperation;
    use std::path::PathBuf;

    const ITEM: &str = "/v4/organizations/{organizationId}/projects/{projectId}/clusters/{clusterId}";

    fn op(method: &str, path: &str, id: &str) -> ApiOperation {
        ApiOperation {
            path: path.into(),
            method: method.into(),
            operation_id: id.into(),
            tags: vec!["Clusters".into()],
            summary: None,
            description: None,
            path_params: Vec::new(),
            query_params: Vec::new(),
            request_body: None,
            responses: Vec::new(),
        }
    }

    fn endpoints() -> Vec<Endpoint> {
        build_endpoints(
            &[op("GET", ITEM, "getCluster"), op("DELETE", ITEM, "deleteCluster")],
            &Conventions::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_module_layout_and_inheritance() {
        let settings = RenderSettings::new("Jane Doe", "Clusters_GET");
        let given = Superclass::from_class_name("GetProject", &settings.conventions);
        let artifacts = plan_module(&endpoints(), &settings, &given, Path::new("/suite")).unwrap();

        let paths: Vec<PathBuf> = artifacts.iter().map(|a| a.path.clone()).collect();
        assert_eq!(
            paths,
            vec![
                PathBuf::from("/suite/Clusters/__init__.py"),
                PathBuf::from("/suite/Clusters/get_clusters.py"),
                PathBuf::from("/suite/Clusters/delete_clusters.py"),
            ]
        );
        assert!(artifacts[1].contents.contains("class GetCluster(GetProject):"));
        assert!(artifacts[1].contents.contains("nomenclature=\"Clusters_GET\""));
        assert!(artifacts[2].contents.contains(
            "from pytests.Capella.RestAPIv4.Clusters.get_clusters import GetCluster"
        ));
        assert!(artifacts[2].contents.contains("class DeleteCluster(GetCluster):"));
        assert!(artifacts[2].contents.contains("nomenclature=\"Clusters_DELETE\""));
    }

    #[test]
    fn test_submodule_and_conf_names() {
        let settings = RenderSettings::new("Jane Doe", "Clusters");
        let wrappers = plan_submodule(&endpoints(), "Audit Log Exports", &settings, Path::new("/lib")).unwrap();
        assert_eq!(wrappers.path, PathBuf::from("/lib/audit_log_exports_api_calls.py"));

        let conf = plan_conf(&endpoints(), "Clusters", "Clusters", &settings, Path::new("/conf")).unwrap();
        assert_eq!(conf.path, PathBuf::from("/conf/Clusters-v4-APIs.conf"));

        assert!(matches!(
            plan_conf(&[], "Clusters", "Clusters", &settings, Path::new("/conf")),
            Err(GeneratorError::NothingToGenerate(_))
        ));
    }
}
