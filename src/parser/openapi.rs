// src/parser/openapi.rs

use serde_json::{Error as JsonError, Map, Number, Value};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

const HTTP_METHODS: [&str; 7] = ["get", "post", "put", "delete", "patch", "options", "head"];
const JSON_CONTENT: &str = "application/json";
const MAX_REF_DEPTH: usize = 32;

#[derive(Debug, Error)]
pub enum ParserError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] JsonError),

    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Unsupported OpenAPI version, expected 3.x")]
    UnsupportedVersion,

    #[error("Invalid OpenAPI specification: {0}")]
    InvalidSpec(String),

    #[error("Unresolvable reference: {0}")]
    UnresolvedRef(String),

    #[error("No endpoints linked to the tag \"{0}\"")]
    NoOperationsForTag(String),

    #[error("No operation found by the ID \"{0}\"")]
    OperationNotFound(String),

    #[error("Multiple operations ({count}) found by the ID \"{operation_id}\"")]
    AmbiguousOperationId { operation_id: String, count: usize },
}

pub type Result<T> = std::result::Result<T, ParserError>;

/// Which operations of the specification a generation request covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// Every operation whose first tag matches exactly.
    Tag(String),
    /// The single operation carrying this `operationId`.
    OperationId(String),
}

/// Represents a parsed OpenAPI specification
#[derive(Debug, Clone)]
pub struct ApiSpec {
    /// The raw JSON Value of the parsed specification
    pub raw_spec: Value,

    /// Every operation, in document order
    pub operations: Vec<ApiOperation>,
}

/// Represents an API operation (HTTP method + path)
#[derive(Debug, Clone)]
pub struct ApiOperation {
    /// The path template (e.g., "/v4/organizations/{organizationId}")
    pub path: String,

    /// HTTP method, uppercased
    pub method: String,

    /// Operation ID from the document, or generated if not present
    pub operation_id: String,

    pub tags: Vec<String>,

    pub summary: Option<String>,

    pub description: Option<String>,

    /// Path parameters, as declared
    pub path_params: Vec<ApiParameter>,

    /// Query parameters accepted by this operation
    pub query_params: Vec<ApiParameter>,

    /// `application/json` request body, if any
    pub request_body: Option<ApiPayload>,

    /// Responses in document order
    pub responses: Vec<ApiResponse>,
}

/// Represents a parameter in an API operation
#[derive(Debug, Clone)]
pub struct ApiParameter {
    pub name: String,

    /// Location of the parameter (path, query, header, cookie)
    pub location: String,

    pub required: bool,

    /// Type of the parameter (string, integer, etc.)
    pub param_type: String,
}

/// The `application/json` media type of a request or response.
#[derive(Debug, Clone, Default)]
pub struct ApiPayload {
    /// The schema's `required` list (merged across `allOf`)
    pub required: Vec<String>,

    /// Values of the keyed `examples` map, in document order
    pub examples: Vec<Value>,

    /// The single `example` value
    pub example: Option<Value>,
}

/// Represents a possible API response
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// HTTP status code as written in the document ("200", "2XX", "default")
    pub status_code: String,

    pub description: Option<String>,

    /// JSON content of the response, if declared
    pub content: Option<ApiPayload>,
}

impl ApiOperation {
    /// The group tag: the first declared tag.
    pub fn primary_tag(&self) -> Option<&str> {
        self.tags.first().map(String::as_str)
    }

    /// Method name after collection refinement, used for ordering.
    pub fn refined_method(&self) -> &str {
        if self.method == "GET" && !self.query_params.is_empty() {
            "LIST"
        } else {
            &self.method
        }
    }
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        self.status_code.starts_with('2')
    }

    pub fn numeric_status(&self) -> Option<u16> {
        self.status_code.parse().ok()
    }
}

impl ApiPayload {
    /// First usable example: the keyed map wins over the single value.
    pub fn first_example(&self) -> Option<&Value> {
        self.examples
            .iter()
            .find(|v| !v.is_null())
            .or_else(|| self.example.as_ref().filter(|v| !v.is_null()))
    }
}

/// Parse an OpenAPI specification from a file, JSON or YAML
pub fn parse_spec_file<P: AsRef<Path>>(path: P) -> Result<ApiSpec> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    debug!(path = %path.display(), bytes = content.len(), "read specification");

    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if is_json {
        parse_spec_json(&content)
    } else {
        parse_spec_yaml(&content)
    }
}

/// Parse an OpenAPI specification from a JSON string
pub fn parse_spec_json(content: &str) -> Result<ApiSpec> {
    let spec: Value = serde_json::from_str(content)?;
    parse_openapi_v3(spec)
}

/// Parse an OpenAPI specification from a YAML string
pub fn parse_spec_yaml(content: &str) -> Result<ApiSpec> {
    let yaml: serde_yaml::Value = serde_yaml::from_str(content)?;
    parse_openapi_v3(yaml_to_json(yaml))
}

/// Load a specification and select the operations a request covers.
pub fn select_from_file<P: AsRef<Path>>(path: P, selector: &Selector) -> Result<Vec<ApiOperation>> {
    let spec = parse_spec_file(path)?;
    spec.select(selector)
}

impl ApiSpec {
    /// Select operations by tag or operation id.
    ///
    /// Tag selections come back with GET first and the other refined methods
    /// in lexicographic order, so that linking sees every mutating sibling.
    pub fn select(&self, selector: &Selector) -> Result<Vec<ApiOperation>> {
        match selector {
            Selector::Tag(tag) => {
                let mut selected: Vec<ApiOperation> = self
                    .operations
                    .iter()
                    .filter(|op| op.primary_tag() == Some(tag.as_str()))
                    .cloned()
                    .collect();

                if selected.is_empty() {
                    return Err(ParserError::NoOperationsForTag(tag.clone()));
                }
                order_for_linking(&mut selected);
                Ok(selected)
            }
            Selector::OperationId(id) => {
                let matches: Vec<&ApiOperation> = self
                    .operations
                    .iter()
                    .filter(|op| &op.operation_id == id)
                    .collect();

                match matches.len() {
                    0 => Err(ParserError::OperationNotFound(id.clone())),
                    1 => Ok(vec![matches[0].clone()]),
                    count => {
                        warn!(operation_id = %id, count, "operation id is ambiguous, nothing selected");
                        Err(ParserError::AmbiguousOperationId {
                            operation_id: id.clone(),
                            count,
                        })
                    }
                }
            }
        }
    }
}

/// GET first, then the remaining refined methods lexicographically.
/// The sort is stable so document order breaks ties.
pub fn order_for_linking(operations: &mut [ApiOperation]) {
    operations.sort_by(|a, b| {
        let ka = (a.refined_method() != "GET", a.refined_method());
        let kb = (b.refined_method() != "GET", b.refined_method());
        ka.cmp(&kb)
    });
}

/// Parse OpenAPI 3.x specification
fn parse_openapi_v3(spec: Value) -> Result<ApiSpec> {
    match spec.get("openapi").and_then(Value::as_str) {
        Some(v) if v.starts_with("3.") => {}
        _ => return Err(ParserError::UnsupportedVersion),
    }

    let paths_map = spec
        .get("paths")
        .and_then(Value::as_object)
        .ok_or_else(|| ParserError::InvalidSpec("No paths defined".into()))?;

    let mut operations = Vec::new();

    for (path, path_item) in paths_map {
        let path_item = resolve(&spec, path_item)?;
        let Some(path_obj) = path_item.as_object() else {
            continue;
        };

        let shared_params = path_obj
            .get("parameters")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();

        for (method, operation) in path_obj {
            // Skip non-HTTP method keys
            if !HTTP_METHODS.contains(&method.as_str()) {
                continue;
            }
            let Some(op_obj) = operation.as_object() else {
                continue;
            };

            let operation_id = op_obj
                .get("operationId")
                .and_then(Value::as_str)
                .map(String::from)
                .unwrap_or_else(|| format!("{}_{}", method, sanitize_path(path)));

            let tags = op_obj
                .get("tags")
                .and_then(Value::as_array)
                .map(|tags| {
                    tags.iter()
                        .filter_map(Value::as_str)
                        .map(String::from)
                        .collect()
                })
                .unwrap_or_default();

            let summary = op_obj.get("summary").and_then(Value::as_str).map(String::from);
            let description = op_obj.get("description").and_then(Value::as_str).map(String::from);

            // Operation level parameters override path level ones with the same name and location
            let own_params = op_obj
                .get("parameters")
                .and_then(Value::as_array)
                .map(Vec::as_slice)
                .unwrap_or_default();

            let mut params: Vec<ApiParameter> = Vec::new();
            for raw in shared_params.iter().chain(own_params) {
                let param = parse_parameter(&spec, raw)?;
                if let Some(existing) = params
                    .iter_mut()
                    .find(|p| p.name == param.name && p.location == param.location)
                {
                    *existing = param;
                } else {
                    params.push(param);
                }
            }

            let (path_params, rest): (Vec<_>, Vec<_>) =
                params.into_iter().partition(|p| p.location == "path");
            let query_params = rest.into_iter().filter(|p| p.location == "query").collect();

            let request_body = match op_obj.get("requestBody") {
                Some(body) => {
                    let body = resolve(&spec, body)?;
                    match body.get("content").and_then(|c| c.get(JSON_CONTENT)) {
                        Some(media) => Some(parse_media(&spec, media)?),
                        None => None,
                    }
                }
                None => None,
            };

            let mut responses = Vec::new();
            if let Some(resp_map) = op_obj.get("responses").and_then(Value::as_object) {
                for (status_code, response) in resp_map {
                    let response = resolve(&spec, response)?;
                    let description = response
                        .get("description")
                        .and_then(Value::as_str)
                        .map(String::from);

                    let content = match response.get("content").and_then(|c| c.get(JSON_CONTENT)) {
                        Some(media) => Some(parse_media(&spec, media)?),
                        None => None,
                    };

                    responses.push(ApiResponse {
                        status_code: status_code.clone(),
                        description,
                        content,
                    });
                }
            }

            operations.push(ApiOperation {
                path: path.clone(),
                method: method.to_uppercase(),
                operation_id,
                tags,
                summary,
                description,
                path_params,
                query_params,
                request_body,
                responses,
            });
        }
    }

    debug!(operations = operations.len(), "parsed specification");

    Ok(ApiSpec {
        raw_spec: spec,
        operations,
    })
}

fn parse_parameter(root: &Value, raw: &Value) -> Result<ApiParameter> {
    let param = resolve(root, raw)?;

    let name = param.get("name").and_then(Value::as_str).unwrap_or("").to_string();
    let location = param.get("in").and_then(Value::as_str).unwrap_or("").to_string();
    let required = param.get("required").and_then(Value::as_bool).unwrap_or(false);

    let param_type = match param.get("schema") {
        Some(schema) => resolve(root, schema)?
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or("object")
            .to_string(),
        None => "string".to_string(),
    };

    Ok(ApiParameter {
        name,
        location,
        required,
        param_type,
    })
}

fn parse_media(root: &Value, media: &Value) -> Result<ApiPayload> {
    let required = match media.get("schema") {
        Some(schema) => required_fields(root, schema, 0)?,
        None => Vec::new(),
    };

    let mut examples = Vec::new();
    if let Some(map) = media.get("examples").and_then(Value::as_object) {
        for example in map.values() {
            let example = resolve(root, example)?;
            match example.get("value") {
                Some(value) if !value.is_null() => examples.push(value.clone()),
                _ => continue,
            }
        }
    }

    let example = media.get("example").filter(|v| !v.is_null()).cloned();

    Ok(ApiPayload {
        required,
        examples,
        example,
    })
}

/// The schema's `required` names, including those contributed by `allOf` members.
fn required_fields(root: &Value, schema: &Value, depth: usize) -> Result<Vec<String>> {
    if depth > MAX_REF_DEPTH {
        return Err(ParserError::InvalidSpec("schema nesting too deep".into()));
    }
    let schema = resolve(root, schema)?;

    let mut required: Vec<String> = schema
        .get("required")
        .and_then(Value::as_array)
        .map(|names| names.iter().filter_map(Value::as_str).map(String::from).collect())
        .unwrap_or_default();

    if let Some(parts) = schema.get("allOf").and_then(Value::as_array) {
        for part in parts {
            for name in required_fields(root, part, depth + 1)? {
                if !required.contains(&name) {
                    required.push(name);
                }
            }
        }
    }

    Ok(required)
}

/// Follow local `$ref` pointers until a concrete node is reached.
fn resolve<'a>(root: &'a Value, node: &'a Value) -> Result<&'a Value> {
    let mut current = node;
    for _ in 0..MAX_REF_DEPTH {
        let Some(reference) = current.get("$ref").and_then(Value::as_str) else {
            return Ok(current);
        };
        let pointer = reference
            .strip_prefix('#')
            .ok_or_else(|| ParserError::UnresolvedRef(reference.to_string()))?;
        current = root
            .pointer(pointer)
            .ok_or_else(|| ParserError::UnresolvedRef(reference.to_string()))?;
    }
    Err(ParserError::UnresolvedRef("reference chain too long".into()))
}

/// YAML mappings may carry non-string keys (`200:`); JSON objects may not.
fn yaml_to_json(value: serde_yaml::Value) -> Value {
    match value {
        serde_yaml::Value::Null => Value::Null,
        serde_yaml::Value::Bool(b) => Value::Bool(b),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Number(i.into())
            } else if let Some(u) = n.as_u64() {
                Value::Number(u.into())
            } else {
                n.as_f64()
                    .and_then(Number::from_f64)
                    .map(Value::Number)
                    .unwrap_or(Value::Null)
            }
        }
        serde_yaml::Value::String(s) => Value::String(s),
        serde_yaml::Value::Sequence(seq) => Value::Array(seq.into_iter().map(yaml_to_json).collect()),
        serde_yaml::Value::Mapping(mapping) => {
            let mut object = Map::new();
            for (key, val) in mapping {
                object.insert(yaml_key(key), yaml_to_json(val));
            }
            Value::Object(object)
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json(tagged.value),
    }
}

fn yaml_key(key: serde_yaml::Value) -> String {
    match key {
        serde_yaml::Value::String(s) => s,
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::Bool(b) => b.to_string(),
        serde_yaml::Value::Null => "null".to_string(),
        other => serde_yaml::to_string(&other)
            .map(|s| s.trim().to_string())
            .unwrap_or_default(),
    }
}

/// Helper function to sanitize path for use in operation IDs
fn sanitize_path(path: &str) -> String {
    path.replace('/', "_")
        .replace('{', "")
        .replace('}', "")
        .trim_start_matches('_')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPEC: &str = r##"
openapi: 3.0.3
info:
  title: Sample
  version: "1.0"
components:
  parameters:
    OrganizationId:
      name: organizationId
      in: path
      required: true
      schema:
        type: string
  schemas:
    ProjectResponse:
      type: object
      required: [name, id]
      properties:
        id: {type: string}
        name: {type: string}
paths:
  /v4/organizations/{organizationId}/projects:
    parameters:
      - $ref: '#/components/parameters/OrganizationId'
    get:
      tags: [Projects]
      operationId: listProjects
      parameters:
        - name: page
          in: query
          schema: {type: integer}
      responses:
        200:
          description: ok
    post:
      tags: [Projects]
      operationId: postProject
      requestBody:
        content:
          application/json:
            schema:
              type: object
              required: [name]
      responses:
        201:
          description: created
          content:
            application/json:
              schema:
                $ref: '#/components/schemas/ProjectResponse'
              examples:
                first:
                  value: {id: p-1, name: one}
                second:
                  value: {id: p-2, name: two}
  /v4/organizations/{organizationId}/projects/{projectId}:
    get:
      tags: [Projects]
      operationId: getProject
      parameters:
        - $ref: '#/components/parameters/OrganizationId'
        - name: projectId
          in: path
          required: true
          schema: {type: string}
      responses:
        "200":
          description: ok
    delete:
      tags: [Other]
      operationId: getProject
      responses:
        "204":
          description: gone
"##;

    #[test]
    fn test_parse_yaml_with_refs_and_integer_keys() {
        let spec = parse_spec_yaml(SPEC).unwrap();
        assert_eq!(spec.operations.len(), 4);

        let list = &spec.operations[0];
        assert_eq!(list.method, "GET");
        assert_eq!(list.refined_method(), "LIST");
        assert_eq!(list.path_params[0].name, "organizationId");
        assert_eq!(list.query_params[0].param_type, "integer");
        assert_eq!(list.responses[0].status_code, "200");

        let post = &spec.operations[1];
        assert_eq!(post.request_body.as_ref().unwrap().required, vec!["name"]);
        let created = post.responses[0].content.as_ref().unwrap();
        assert_eq!(created.required, vec!["name", "id"]);
        assert_eq!(created.first_example().unwrap()["id"], "p-1");
    }

    #[test]
    fn test_select_by_tag_orders_get_first() {
        let spec = parse_spec_yaml(SPEC).unwrap();
        let selected = spec.select(&Selector::Tag("Projects".into())).unwrap();
        let methods: Vec<&str> = selected.iter().map(|op| op.refined_method()).collect();
        assert_eq!(methods, vec!["GET", "LIST", "POST"]);
    }

    #[test]
    fn test_select_by_tag_is_case_sensitive() {
        let spec = parse_spec_yaml(SPEC).unwrap();
        let err = spec.select(&Selector::Tag("projects".into())).unwrap_err();
        assert!(matches!(err, ParserError::NoOperationsForTag(_)));
    }

    #[test]
    fn test_select_by_operation_id() {
        let spec = parse_spec_yaml(SPEC).unwrap();

        let one = spec.select(&Selector::OperationId("postProject".into())).unwrap();
        assert_eq!(one.len(), 1);

        let missing = spec.select(&Selector::OperationId("nope".into())).unwrap_err();
        assert!(matches!(missing, ParserError::OperationNotFound(_)));

        let ambiguous = spec.select(&Selector::OperationId("getProject".into())).unwrap_err();
        assert!(matches!(ambiguous, ParserError::AmbiguousOperationId { count: 2, .. }));
    }

    #[test]
    fn test_rejects_swagger_v2() {
        let err = parse_spec_json(r#"{"swagger": "2.0", "paths": {}}"#).unwrap_err();
        assert!(matches!(err, ParserError::UnsupportedVersion));
    }

    #[test]
    fn test_unresolved_ref_is_reported() {
        let doc = r##"{"openapi": "3.0.0", "paths": {"/a": {"get": {"parameters": [{"$ref": "#/missing"}]}}}}"##;
        let err = parse_spec_json(doc).unwrap_err();
        assert!(matches!(err, ParserError::UnresolvedRef(_)));
    }
}
