// Per-endpoint naming shared by the test script and wrapper renderers.

use crate::conventions::Conventions;
use crate::model::Endpoint;
use crate::utils::{camel_to_snake, letters_only, singularize};

/// One path placeholder and the names it takes in generated code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathParam {
    /// Placeholder as written in the path (`organizationId`).
    pub name: String,
    /// Loop local in the path test (`organization`).
    pub local: String,
    /// Test attribute holding the correct value (`organisation_id`).
    pub attr: String,
    /// Human label for descriptions (`organization`).
    pub label: String,
    /// Testcase key in the combination test (`organizationID`).
    pub testcase_key: String,
}

impl PathParam {
    pub fn new(name: &str, conventions: &Conventions) -> Self {
        let stem = ["Id", "ID", "Name"]
            .iter()
            .find_map(|suffix| name.strip_suffix(suffix))
            .filter(|s| !s.is_empty())
            .unwrap_or(name);
        let local = camel_to_snake(stem).to_lowercase();
        PathParam {
            name: name.to_string(),
            attr: conventions.attribute_name(&camel_to_snake(name).to_lowercase()),
            label: local.replace('_', " "),
            testcase_key: format!("{}ID", stem),
            local,
        }
    }
}

/// Names a renderer needs for one endpoint.
#[derive(Debug, Clone)]
pub struct RenderContext<'a> {
    pub endpoint: &'a Endpoint,
    pub params: Vec<PathParam>,
    /// `self.<handle>.<function>`
    pub target: String,
    /// Wrapper attribute holding the collection URL.
    pub endpoint_attr: String,
    /// Singular snake noun of the resource (`audit_log_export`).
    pub resource: String,
}

impl<'a> RenderContext<'a> {
    pub fn new(endpoint: &'a Endpoint, conventions: &Conventions) -> Self {
        let params = endpoint
            .path_parameters
            .iter()
            .map(|p| PathParam::new(p, conventions))
            .collect();
        RenderContext {
            endpoint,
            params,
            target: format!("self.{}.{}", endpoint.api_handle, endpoint.function_name),
            endpoint_attr: endpoint_attribute(&endpoint.resource_segment),
            resource: resource_noun(&endpoint.resource_segment),
        }
    }

    pub fn depth(&self) -> usize {
        self.params.len()
    }

    /// `self.<attr>` for every path parameter.
    pub fn self_args(&self) -> Vec<String> {
        self.params.iter().map(|p| format!("self.{}", p.attr)).collect()
    }

    /// `self.<attr>` for every parent parameter, dropping the resource's own id.
    pub fn parent_self_args(&self) -> Vec<String> {
        let mut args = self.self_args();
        args.pop();
        args
    }

    pub fn local_args(&self) -> Vec<String> {
        self.params.iter().map(|p| p.local.clone()).collect()
    }

    pub fn testcase_args(&self) -> Vec<String> {
        self.params
            .iter()
            .map(|p| format!("testcase[\"{}\"]", p.testcase_key))
            .collect()
    }

    /// Required payload fields read from `source` (`self.expected_res`, `testcase`).
    pub fn payload_args(&self, source: &str) -> Vec<String> {
        payload_from(&self.endpoint.required_payload_fields, source)
    }

    /// Correct attribute names, one per combination slot.
    pub fn attrs(&self) -> Vec<String> {
        self.params.iter().map(|p| p.attr.clone()).collect()
    }

    /// Collection URL with anonymous placeholders, as the wrapper formats it.
    pub fn anonymous_collection_url(&self) -> String {
        anonymous(&self.endpoint.collection_url())
    }

    /// Success codes accepted by `validate_testcase`.
    pub fn success_codes(&self) -> String {
        match self.endpoint.success_status_code {
            Some(code) => format!("[{}]", code),
            None => "[]".to_string(),
        }
    }
}

pub fn payload_from(fields: &[String], source: &str) -> Vec<String> {
    fields
        .iter()
        .map(|f| format!("{}[\"{}\"]", source, f))
        .collect()
}

pub fn endpoint_attribute(resource_segment: &str) -> String {
    format!("{}_endpoint", camel_to_snake(&letters_only(resource_segment)).to_lowercase())
}

pub fn resource_noun(resource_segment: &str) -> String {
    let snake = camel_to_snake(&letters_only(resource_segment)).to_lowercase();
    singularize(&snake).to_string()
}

/// Replace every `{name}` placeholder with `{}`.
pub fn anonymous(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut inside = false;
    for c in path.chars() {
        match c {
            '{' => {
                inside = true;
                out.push_str("{}");
            }
            '}' => inside = false,
            _ if inside => {}
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_param_names() {
        let conventions = Conventions::default();
        let org = PathParam::new("organizationId", &conventions);
        assert_eq!(org.local, "organization");
        assert_eq!(org.attr, "organisation_id");
        assert_eq!(org.testcase_key, "organizationID");

        let scope = PathParam::new("scopeName", &conventions);
        assert_eq!(scope.local, "scope");
        assert_eq!(scope.attr, "scope_name");

        let export = PathParam::new("auditLogExportId", &conventions);
        assert_eq!(export.local, "audit_log_export");
        assert_eq!(export.label, "audit log export");
    }

    #[test]
    fn test_anonymous_url() {
        assert_eq!(
            anonymous("/v4/organizations/{organizationId}/projects/{projectId}/clusters"),
            "/v4/organizations/{}/projects/{}/clusters"
        );
        assert_eq!(endpoint_attribute("auditLogExports"), "audit_log_exports_endpoint");
        assert_eq!(resource_noun("auditLogExports"), "audit_log_export");
    }
}
