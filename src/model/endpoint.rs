// The normalized endpoint record and the builder that derives it from one raw operation.

use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use tracing::debug;

use super::naming::derive_names;
use super::ModelError;
use crate::conventions::Conventions;
use crate::parser::{ApiOperation, ApiPayload, ApiResponse};

/// The refined action kind of an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verb {
    Get,
    List,
    Create,
    Update,
    Delete,
}

impl Verb {
    /// Refine a raw HTTP method. A GET with query parameters reads a collection.
    pub fn refine(method: &str, has_query_params: bool) -> Option<Verb> {
        match method.to_uppercase().as_str() {
            "GET" if has_query_params => Some(Verb::List),
            "GET" => Some(Verb::Get),
            "POST" => Some(Verb::Create),
            "PUT" => Some(Verb::Update),
            "DELETE" => Some(Verb::Delete),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::Get => "GET",
            Verb::List => "LIST",
            Verb::Create => "CREATE",
            Verb::Update => "UPDATE",
            Verb::Delete => "DELETE",
        }
    }

    pub fn pascal(&self) -> &'static str {
        match self {
            Verb::Get => "Get",
            Verb::List => "List",
            Verb::Create => "Create",
            Verb::Update => "Update",
            Verb::Delete => "Delete",
        }
    }

    pub fn http_method(&self) -> &'static str {
        match self {
            Verb::Get | Verb::List => "GET",
            Verb::Create => "POST",
            Verb::Update => "PUT",
            Verb::Delete => "DELETE",
        }
    }

    /// Method token used in nomenclatures: the HTTP method, with LIST kept apart.
    pub fn method_token(&self) -> &'static str {
        match self {
            Verb::List => "LIST",
            other => other.http_method(),
        }
    }

    /// Pipeline test group number.
    pub fn test_group(&self) -> u8 {
        match self {
            Verb::Get => 0,
            Verb::List => 1,
            Verb::Create => 2,
            Verb::Delete => 3,
            Verb::Update => 4,
        }
    }

    /// Whether the verb sends a payload built from required fields.
    pub fn takes_payload(&self) -> bool {
        matches!(self, Verb::Create | Verb::Update)
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One testable API operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    pub operation_id: String,
    /// First tag of the operation, the resource family.
    pub tag: String,
    /// The path as written in the specification.
    pub path: String,
    /// Collection form for LIST, the full parameterized path otherwise.
    pub url_template: String,
    pub verb: Verb,
    /// Trailing non-placeholder segment (`clusters`).
    pub resource_segment: String,
    /// Placeholders, outermost resource first.
    pub path_parameters: Vec<String>,
    pub query_parameters: Vec<String>,
    pub required_payload_fields: Vec<String>,
    pub expected_response: Option<Value>,
    pub success_status_code: Option<u16>,
    pub create_status_code: Option<u16>,
    pub delete_status_code: Option<u16>,
    /// Identifier returned by the create sibling.
    pub response_identifier_field: Option<String>,
    /// Identifier validated in the response of this endpoint.
    pub expected_identifier_field: Option<String>,
    /// Required fields of the create sibling, used to build the setup payload.
    pub create_payload_fields: Vec<String>,
    pub authorized_roles: Vec<String>,
    pub class_name: String,
    pub file_name: String,
    pub function_name: String,
    /// Attribute of the test base class that exposes the wrapper functions.
    pub api_handle: String,
    pub description: String,
}

impl Endpoint {
    /// Parent collection path, shared by every sibling of a resource.
    pub fn collection_url(&self) -> String {
        collection_path(&self.path)
    }

    /// Nesting depth of the resource.
    pub fn depth(&self) -> usize {
        self.path_parameters.len()
    }

    /// Whether linking attached create/delete scaffolding to this endpoint.
    pub fn has_setup(&self) -> bool {
        self.verb == Verb::Get && self.expected_response.is_some() && self.create_status_code.is_some()
    }
}

/// Placeholder names in left-to-right order.
pub fn placeholders(path: &str) -> Vec<String> {
    let mut names = Vec::new();
    let mut rest = path;
    while let Some(open) = rest.find('{') {
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) => {
                names.push(after[..close].to_string());
                rest = &after[close + 1..];
            }
            None => break,
        }
    }
    names
}

fn is_placeholder(segment: &str) -> bool {
    segment.starts_with('{') && segment.ends_with('}')
}

/// Drop a trailing placeholder segment: `/a/{id}` becomes `/a`.
pub fn collection_path(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    match trimmed.rsplit_once('/') {
        Some((parent, last)) if is_placeholder(last) => parent.to_string(),
        _ => trimmed.to_string(),
    }
}

/// The last non-placeholder segment of the collection path.
pub fn resource_segment(path: &str) -> String {
    collection_path(path)
        .rsplit('/')
        .next()
        .unwrap_or_default()
        .to_string()
}

/// Object keys sorted recursively so rendered bodies do not depend on document order.
pub fn normalize_json(value: &Value) -> Value {
    match value {
        Value::Object(object) => {
            let mut keys: Vec<&String> = object.keys().collect();
            keys.sort();
            let mut sorted = Map::new();
            for key in keys {
                sorted.insert(key.clone(), normalize_json(&object[key]));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(normalize_json).collect()),
        other => other.clone(),
    }
}

/// Description text above the role preamble.
pub fn trim_description(full: &str, preamble: &str) -> String {
    full.lines()
        .take_while(|line| line.trim() != preamble)
        .collect::<Vec<_>>()
        .join("\n")
        .trim_end()
        .to_string()
}

/// Role tokens for the bullet lines that follow the preamble.
pub fn extract_roles(full: &str, conventions: &Conventions) -> Vec<String> {
    let mut roles: Vec<String> = Vec::new();
    let bullets = full
        .lines()
        .skip_while(|line| line.trim() != conventions.role_preamble)
        .skip(1);

    for line in bullets {
        let Some(label) = line.trim().strip_prefix('-') else {
            continue;
        };
        let label = label.trim();
        match conventions.role_token(label) {
            Some(token) if !roles.iter().any(|r| r == token) => roles.push(token.to_string()),
            Some(_) => {}
            None => debug!(label, "no role token for label, dropping it"),
        }
    }
    roles
}

fn dedup_ordered(names: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(names.len());
    for name in names {
        if !out.contains(name) {
            out.push(name.clone());
        }
    }
    out
}

/// Populate every endpoint attribute from one raw operation.
pub fn build_endpoint(op: &ApiOperation, conventions: &Conventions) -> Result<Endpoint, ModelError> {
    let verb = Verb::refine(&op.method, !op.query_params.is_empty()).ok_or_else(|| {
        ModelError::UnsupportedMethod {
            method: op.method.clone(),
            operation_id: op.operation_id.clone(),
        }
    })?;

    let path_parameters = placeholders(&op.path);
    let url_template = if verb == Verb::List {
        collection_path(&op.path)
    } else {
        op.path.clone()
    };
    let segment = resource_segment(&op.path);
    let names = derive_names(verb, &op.operation_id, &segment)?;

    let successes: Vec<&ApiResponse> = op.responses.iter().filter(|r| r.is_success()).collect();
    let success_status_code = successes.iter().find_map(|r| r.numeric_status());
    let success_content: Option<&ApiPayload> = successes.iter().find_map(|r| r.content.as_ref());

    let expected_identifier_field = success_content.and_then(|content| {
        content
            .required
            .iter()
            .find(|name| name.to_lowercase().contains("id"))
            .cloned()
    });

    let expected_response = successes
        .iter()
        .filter_map(|r| r.content.as_ref())
        .find_map(ApiPayload::first_example)
        .or_else(|| op.request_body.as_ref().and_then(ApiPayload::first_example))
        .map(normalize_json);

    let required_payload_fields = match (&op.request_body, verb.takes_payload()) {
        (Some(body), true) => dedup_ordered(&body.required),
        _ => Vec::new(),
    };

    let raw_description = op.description.as_deref().unwrap_or_default();
    let authorized_roles = extract_roles(raw_description, conventions);
    let description = trim_description(raw_description, &conventions.role_preamble);

    debug!(
        operation_id = %op.operation_id,
        %verb,
        params = ?path_parameters,
        roles = authorized_roles.len(),
        "modeled endpoint"
    );

    Ok(Endpoint {
        operation_id: op.operation_id.clone(),
        tag: op.primary_tag().unwrap_or_default().to_string(),
        path: op.path.clone(),
        url_template,
        verb,
        resource_segment: segment,
        path_parameters,
        query_parameters: op.query_params.iter().map(|p| p.name.clone()).collect(),
        required_payload_fields,
        expected_response,
        success_status_code,
        create_status_code: None,
        delete_status_code: None,
        response_identifier_field: None,
        expected_identifier_field,
        create_payload_fields: Vec::new(),
        authorized_roles,
        class_name: names.class_name,
        file_name: names.file_name,
        function_name: names.function_name,
        api_handle: conventions.api_handle_for(&op.path).to_string(),
        description,
    })
}

/// Model every selected operation, keeping selection order.
pub fn build_endpoints(operations: &[ApiOperation], conventions: &Conventions) -> Result<Vec<Endpoint>, ModelError> {
    operations
        .iter()
        .map(|op| build_endpoint(op, conventions))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{ApiParameter, ApiResponse};
    use serde_json::json;

    fn operation(method: &str, path: &str, id: &str) -> ApiOperation {
        ApiOperation {
            path: path.to_string(),
            method: method.to_string(),
            operation_id: id.to_string(),
            tags: vec!["Clusters".to_string()],
            summary: None,
            description: None,
            path_params: Vec::new(),
            query_params: Vec::new(),
            request_body: None,
            responses: Vec::new(),
        }
    }

    fn query(name: &str) -> ApiParameter {
        ApiParameter {
            name: name.to_string(),
            location: "query".to_string(),
            required: false,
            param_type: "integer".to_string(),
        }
    }

    fn response(code: &str, content: Option<ApiPayload>) -> ApiResponse {
        ApiResponse {
            status_code: code.to_string(),
            description: None,
            content,
        }
    }

    const CLUSTER: &str = "/v4/organizations/{organizationId}/projects/{projectId}/clusters/{clusterId}";

    #[test]
    fn test_method_tokens() {
        let tokens: Vec<&str> = [Verb::Get, Verb::List, Verb::Create, Verb::Update, Verb::Delete]
            .iter()
            .map(Verb::method_token)
            .collect();
        assert_eq!(tokens, vec!["GET", "LIST", "POST", "PUT", "DELETE"]);
    }

    #[test]
    fn test_placeholders_keep_order() {
        assert_eq!(placeholders(CLUSTER), vec!["organizationId", "projectId", "clusterId"]);
        assert!(placeholders("/v4/health").is_empty());
    }

    #[test]
    fn test_collection_path() {
        assert_eq!(
            collection_path(CLUSTER),
            "/v4/organizations/{organizationId}/projects/{projectId}/clusters"
        );
        assert_eq!(collection_path("/v4/organizations/"), "/v4/organizations");
        assert_eq!(resource_segment(CLUSTER), "clusters");
    }

    #[test]
    fn test_get_with_query_becomes_list() {
        let mut op = operation("GET", CLUSTER, "listClusters");
        op.query_params.push(query("page"));
        let endpoint = build_endpoint(&op, &Conventions::default()).unwrap();
        assert_eq!(endpoint.verb, Verb::List);
        assert!(!endpoint.url_template.ends_with('}'));
        assert_eq!(endpoint.path_parameters.len(), 3);
        assert_eq!(endpoint.query_parameters, vec!["page"]);
    }

    #[test]
    fn test_get_keeps_full_template() {
        let endpoint = build_endpoint(&operation("GET", CLUSTER, "getCluster"), &Conventions::default()).unwrap();
        assert_eq!(endpoint.verb, Verb::Get);
        assert_eq!(endpoint.url_template, CLUSTER);
        assert_eq!(endpoint.function_name, "fetch_cluster_info");
    }

    #[test]
    fn test_unsupported_method_fails() {
        let err = build_endpoint(&operation("PATCH", CLUSTER, "patchCluster"), &Conventions::default()).unwrap_err();
        assert!(matches!(err, ModelError::UnsupportedMethod { .. }));
    }

    #[test]
    fn test_first_success_example_wins() {
        let mut op = operation("POST", "/v4/organizations/{organizationId}/projects", "postProject");
        op.request_body = Some(ApiPayload {
            required: vec!["name".into(), "name".into(), "description".into()],
            examples: vec![json!({"name": "from-request"})],
            example: None,
        });
        op.responses = vec![
            response("400", Some(ApiPayload {
                required: vec!["code".into()],
                examples: vec![json!({"code": 1})],
                example: None,
            })),
            response("201", Some(ApiPayload {
                required: vec!["name".into(), "projectId".into(), "id".into()],
                examples: vec![json!({"name": "first", "id": "a"}), json!({"name": "second"})],
                example: Some(json!({"name": "single"})),
            })),
            response("202", Some(ApiPayload {
                required: vec![],
                examples: vec![json!({"name": "late"})],
                example: None,
            })),
        ];

        let endpoint = build_endpoint(&op, &Conventions::default()).unwrap();
        assert_eq!(endpoint.success_status_code, Some(201));
        assert_eq!(endpoint.expected_response, Some(json!({"id": "a", "name": "first"})));
        assert_eq!(endpoint.expected_identifier_field.as_deref(), Some("projectId"));
        assert_eq!(endpoint.required_payload_fields, vec!["name", "description"]);
    }

    #[test]
    fn test_request_example_is_the_fallback() {
        let mut op = operation("PUT", CLUSTER, "putCluster");
        op.request_body = Some(ApiPayload {
            required: vec!["name".into()],
            examples: vec![],
            example: Some(json!({"name": "renamed"})),
        });
        op.responses = vec![response("204", None)];
        let endpoint = build_endpoint(&op, &Conventions::default()).unwrap();
        assert_eq!(endpoint.expected_response, Some(json!({"name": "renamed"})));
        assert_eq!(endpoint.success_status_code, Some(204));
        assert_eq!(endpoint.expected_identifier_field, None);
    }

    #[test]
    fn test_roles_and_description() {
        let mut op = operation("GET", CLUSTER, "getCluster");
        op.description = Some(format!(
            "Fetches the details of a cluster.\nSecond line.\n\n{}\n\n- Organization Owner\n- Project Owner\n- Cluster Wizard\n- Project Owner\n  - Project Viewer\n",
            crate::conventions::ROLE_PREAMBLE
        ));
        let endpoint = build_endpoint(&op, &Conventions::default()).unwrap();
        assert_eq!(endpoint.description, "Fetches the details of a cluster.\nSecond line.");
        assert_eq!(
            endpoint.authorized_roles,
            vec!["organizationOwner", "projectOwner", "projectViewer"]
        );
    }

    #[test]
    fn test_bullets_before_preamble_are_not_roles() {
        let mut op = operation("GET", CLUSTER, "getCluster");
        op.description = Some("- Organization Owner\nno preamble here".to_string());
        let endpoint = build_endpoint(&op, &Conventions::default()).unwrap();
        assert!(endpoint.authorized_roles.is_empty());
    }

    #[test]
    fn test_normalize_sorts_nested_keys() {
        let normalized = normalize_json(&json!({"b": {"z": 1, "a": [{"y": 2, "x": 1}]}, "a": null}));
        assert_eq!(
            serde_json::to_string(&normalized).unwrap(),
            r#"{"a":null,"b":{"a":[{"x":1,"y":2}],"z":1}}"#
        );
    }
}
