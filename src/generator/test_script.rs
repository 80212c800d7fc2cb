//! Renders one Python test class per endpoint.
//!
//! The class extends a base test class, prepares its fixture in `setUp` and
//! carries the path, authorization, combination, payload and throttling tests.
//! Every call to the API under test is followed by one retry when the server
//! answers 429.

use tracing::debug;

use super::context::{payload_from, RenderContext};
use super::ladder::{CombinationPolicy, ErrorBody, ExpectedError, BAD_REQUEST, METHOD_NOT_ALLOWED, PAGE_NOT_FOUND};
use super::layout::{self, indent, python_literal, python_string, Code};
use super::settings::{RenderSettings, Superclass};
use crate::model::{Endpoint, Verb};
use crate::utils::{first_to_upper, letters_only};

const PAYLOAD_TEST_VALUES: &[&str] = &[
    "\"\"",
    "1",
    "0",
    "100000",
    "-1",
    "123.123",
    "None",
    "[]",
    "{}",
    "self.generate_random_string(special_characters=False)",
    "self.generate_random_string(500, special_characters=False)",
];

/// Render the complete test module for `endpoint`.
pub fn render_test_script(
    endpoint: &Endpoint,
    settings: &RenderSettings,
    superclass: &Superclass,
    nomenclature: &str,
) -> String {
    let ctx = RenderContext::new(endpoint, &settings.conventions);
    let mut code = Code::new();

    code.block(0, &settings.header());
    code.blank();
    if endpoint.verb.takes_payload() {
        code.line(0, "import copy");
    }
    code.line(0, superclass.import_line());
    code.blank();
    code.blank();
    code.line(0, format!("class {}({}):", endpoint.class_name, superclass.name));

    set_up(&mut code, &ctx, superclass, nomenclature);
    tear_down(&mut code, &ctx);
    test_api_path(&mut code, &ctx);
    test_authorization(&mut code, &ctx);
    if ctx.depth() > 0 {
        let family = letters_only(&endpoint.tag);
        let variant = settings.conventions.ladder_variant(ctx.depth(), &family);
        let policy = CombinationPolicy::new(endpoint.verb, ctx.depth(), variant);
        test_query_parameters(&mut code, &ctx, &policy);
    }
    if endpoint.verb.takes_payload() {
        test_payload(&mut code, &ctx);
    }
    throttle_tests(&mut code, &ctx);

    debug!(operation_id = %endpoint.operation_id, class = %endpoint.class_name, "rendered test script");
    code.finish()
}

/// `var = target(args)` followed by a single rate-limit retry.
fn call_with_retry(code: &mut Code, level: usize, var: &str, target: &str, groups: &[Vec<String>]) {
    let prefix = format!("{} = {}", var, target);
    layout::call(code, level, &prefix, groups, "");
    code.line(level, format!("if {}.status_code == 429:", var));
    code.line(
        level + 1,
        format!("self.handle_rate_limit(int({}.headers[\"Retry-After\"]))", var),
    );
    layout::call(code, level + 1, &prefix, groups, "");
}

fn set_up(code: &mut Code, ctx: &RenderContext, superclass: &Superclass, nomenclature: &str) {
    let endpoint = ctx.endpoint;
    code.blank();
    code.line(1, format!("def setUp(self, nomenclature=\"{}\"):", nomenclature));
    code.line(2, format!("{}.setUp(self, nomenclature)", superclass.name));

    match &endpoint.expected_response {
        Some(body) => {
            code.line(2, format!("self.expected_res = {}", python_literal(body, 2)));
        }
        None if endpoint.verb == Verb::List => {
            code.block(2, CURSOR_WRAPPER);
        }
        // inherited from the superclass
        None => {}
    }

    if !endpoint.has_setup() {
        return;
    }

    let noun = ctx.resource.replace('_', " ");
    code.blank();
    code.line(2, format!("self.log.info(\"Creating {}\")", noun));
    let create = format!("self.{}.create_{}", endpoint.api_handle, ctx.resource);
    let payload = payload_from(&endpoint.create_payload_fields, "self.expected_res");
    call_with_retry(code, 2, "res", &create, &[ctx.parent_self_args(), payload]);
    if let Some(status) = endpoint.create_status_code {
        code.line(2, format!("if res.status_code != {}:", status));
        code.line(3, "self.log.error(\"Result: {}\".format(res.content))");
        code.line(3, format!("super({}, self).tearDown()", endpoint.class_name));
        code.line(3, format!("self.fail(\"Error while creating {}.\")", noun));
    }
    code.line(2, format!("self.log.info(\"{} created successfully.\")", first_to_upper(&noun)));

    if let (Some(field), Some(last)) = (&endpoint.response_identifier_field, ctx.params.last()) {
        code.blank();
        code.line(2, format!("self.{} = res.json()[\"{}\"]", last.attr, field));
        if let Some(expected) = &endpoint.expected_identifier_field {
            code.line(2, format!("self.expected_res[\"{}\"] = self.{}", expected, last.attr));
        }
    }
}

const CURSOR_WRAPPER: &str = r#"self.expected_res = {
    "cursor": {
        "hrefs": {
            "first": None,
            "last": None,
            "next": None,
            "previous": None
        },
        "pages": {
            "last": None,
            "next": None,
            "page": None,
            "perPage": None,
            "previous": None,
            "totalItems": None
        }
    },
    "data": [
        self.expected_res
    ]
}"#;

fn tear_down(code: &mut Code, ctx: &RenderContext) {
    let endpoint = ctx.endpoint;
    code.blank();
    code.line(1, "def tearDown(self):");

    if endpoint.has_setup() {
        let noun = ctx.resource.replace('_', " ");
        code.line(2, "self.update_auth_with_api_token(self.org_owner_key[\"token\"])");
        code.blank();
        code.line(2, format!("# Delete the {}.", noun));
        code.line(2, format!("self.log.info(\"Deleting the {}\")", noun));
        let delete = format!("self.{}.delete_{}", endpoint.api_handle, ctx.resource);
        call_with_retry(code, 2, "res", &delete, &[ctx.self_args()]);
        match endpoint.delete_status_code {
            Some(status) => {
                code.line(2, format!("if res.status_code != {}:", status));
                code.line(3, "self.log.error(\"Result: {}\".format(res.content))");
                code.line(3, format!("self.fail(\"{} deletion failed\")", first_to_upper(&noun)));
                code.line(2, format!("self.log.info(\"Successfully deleted the {}.\")", noun));
            }
            None => {
                code.line(2, "self.log.info(\"Deletion returned {}\".format(res.status_code))");
            }
        }
    }
    code.line(2, format!("super({}, self).tearDown()", endpoint.class_name));
}

/// A Python dict entry; values may span lines and are laid out for `level`.
type Entry = (String, String);

fn entry(key: &str, value: impl Into<String>) -> Entry {
    (key.to_string(), value.into())
}

/// Python literal for an expected error body at the given indentation level.
fn error_literal(error: &ExpectedError, level: usize, format_args: &[String]) -> String {
    match error.body {
        ErrorBody::Text(text) => python_string(text),
        ErrorBody::Detail { code, hint, message, .. } => {
            let mut message = python_string(message);
            if !format_args.is_empty() {
                message = format!("{}.format({})", message, format_args.join(", "));
            }
            let inner = indent(level + 1);
            format!(
                "{{\n{inner}\"code\": {code},\n{inner}\"hint\": {hint},\n{inner}\"httpStatusCode\": {status},\n{inner}\"message\": {message}\n{outer}}}",
                inner = inner,
                code = code,
                hint = python_string(hint),
                status = error.status,
                message = message,
                outer = indent(level),
            )
        }
    }
}

fn error_entries(error: &ExpectedError, level: usize) -> Vec<Entry> {
    vec![
        entry("expected_status_code", error.status.to_string()),
        entry("expected_error", error_literal(error, level, &[])),
    ]
}

/// `var = [{...}, {...}]` with entries at `level + 2`.
fn dict_list(code: &mut Code, level: usize, var: &str, cases: Vec<Vec<Entry>>) {
    code.line(level, format!("{} = [", var));
    let last = cases.len().saturating_sub(1);
    for (i, case) in cases.into_iter().enumerate() {
        if i == 0 {
            code.line(level + 1, "{");
        }
        let count = case.len();
        for (j, (key, value)) in case.into_iter().enumerate() {
            let comma = if j + 1 < count { "," } else { "" };
            code.line(level + 2, format!("\"{}\": {}{}", key, value, comma));
        }
        if i == last {
            code.line(level + 1, "}");
        } else {
            code.line(level + 1, "}, {");
        }
    }
    code.line(level, "]");
}

fn failure_summary(code: &mut Code, total: Option<&str>) {
    code.blank();
    code.line(2, "if failures:");
    code.line(3, "for fail in failures:");
    code.line(4, "self.log.warning(fail)");
    match total {
        Some(total) => {
            code.line(3, "self.fail(\"{} tests FAILED out of {} TOTAL tests\"");
            code.line(3, format!("          .format(len(failures), {}))", total));
        }
        None => {
            code.line(3, "self.fail(\"{} tests FAILED.\".format(len(failures)))");
        }
    }
}

/// `validate_testcase` call plus the verb-specific follow-up.
fn validation(code: &mut Code, level: usize, ctx: &RenderContext) {
    let endpoint = ctx.endpoint;
    let call = format!(
        "self.validate_testcase(result, {}, testcase, failures",
        ctx.success_codes()
    );
    let last = ctx.params.last();

    match (endpoint.verb, last) {
        (Verb::Get, Some(last)) if endpoint.response_identifier_field.is_some() => {
            code.line(level, format!("{}, True,", call));
            code.line(level + 1, format!("self.expected_res, self.{})", last.attr));
        }
        (Verb::Create, _) => {
            code.line(level, format!("if {}):", call));
            code.line(level + 1, "self.log.debug(\"Creation Successful\")");
            let id = endpoint.expected_identifier_field.as_deref().unwrap_or("id");
            layout::call(
                code,
                level + 1,
                &format!("self.flush_{}s", ctx.resource),
                &[ctx.self_args(), vec![format!("[result.json()[\"{}\"]]", id)]],
                "",
            );
        }
        (Verb::Delete, Some(last)) => {
            code.line(level, format!("if {}):", call));
            code.line(level + 1, "self.log.debug(\"Deletion Successful\")");
            layout::call(
                code,
                level + 1,
                &format!("self.{} = self.create_{}_to_be_tested", last.attr, ctx.resource),
                &[ctx.parent_self_args()],
                "",
            );
        }
        _ => {
            code.line(level, format!("{})", call));
        }
    }
}

/// The collection URL with its API version moved by one, `None` without a version segment.
fn swap_version(url: &str) -> Option<String> {
    let segments: Vec<&str> = url.split('/').collect();
    let position = segments.iter().position(|s| {
        s.strip_prefix('v')
            .map(|n| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()))
            .unwrap_or(false)
    })?;
    let number: u32 = segments[position][1..].parse().ok()?;
    let swapped = if number > 1 { number - 1 } else { number + 1 };
    let replacement = format!("v{}", swapped);
    let mut out: Vec<&str> = segments.clone();
    out[position] = &replacement;
    Some(out.join("/"))
}

fn test_api_path(code: &mut Code, ctx: &RenderContext) {
    let endpoint = ctx.endpoint;
    let api = &endpoint.api_handle;
    let url = ctx.anonymous_collection_url();
    let (parent, last_segment) = url.rsplit_once('/').unwrap_or(("", url.as_str()));
    let mut truncated = last_segment.to_string();
    truncated.pop();

    let mut cases: Vec<Vec<Entry>> = vec![vec![entry("description", "\"Send call with valid path params\"")]];

    if let Some(swapped) = swap_version(&url) {
        let mut case = vec![
            entry("description", "\"Replace api version in URI\""),
            entry("url", python_string(&swapped)),
            entry("expected_status_code", "404"),
        ];
        case.push(entry(
            "expected_error",
            format!(
                "{{\n{i}\"errorType\": \"RouteNotFound\",\n{i}\"message\": \"Not found\"\n{o}}}",
                i = indent(5),
                o = indent(4)
            ),
        ));
        cases.push(case);
    }

    let mut renamed = vec![
        entry("description", "\"Replace the last path param name in URI\""),
        entry("url", python_string(&format!("{}/{}", parent, truncated))),
    ];
    renamed.extend(error_entries(&PAGE_NOT_FOUND, 4));
    cases.push(renamed);

    let invalid_segment_error = match endpoint.verb {
        Verb::List => BAD_REQUEST,
        Verb::Create => METHOD_NOT_ALLOWED,
        _ => PAGE_NOT_FOUND,
    };
    let mut segment = vec![
        entry("description", "\"Add an invalid segment to the URI\""),
        entry("url", python_string(&format!("{}/{}", url, truncated))),
    ];
    segment.extend(error_entries(&invalid_segment_error, 4));
    cases.push(segment);

    for param in &ctx.params {
        let mut case = vec![
            entry("description", python_string(&format!("Call API with non-hex {}", param.name))),
            entry(
                &format!("invalid_{}", param.name),
                format!(
                    "self.replace_last_character(\n{}self.{}, non_hex=True)",
                    indent(5),
                    param.attr
                ),
            ),
        ];
        case.extend(error_entries(&BAD_REQUEST, 4));
        cases.push(case);
    }

    code.blank();
    code.line(1, "def test_api_path(self):");
    dict_list(code, 2, "testcases", cases);
    code.blank();
    code.line(2, "failures = list()");
    code.line(2, "for testcase in testcases:");
    code.line(3, "self.log.info(\"Executing test: {}\".format(testcase[\"description\"]))");
    for param in &ctx.params {
        code.line(3, format!("{} = self.{}", param.local, param.attr));
    }
    code.blank();
    code.line(3, "if \"url\" in testcase:");
    code.line(4, format!("self.{}.{} = \\", api, ctx.endpoint_attr));
    code.line(5, "testcase[\"url\"]");
    for (i, param) in ctx.params.iter().enumerate() {
        let keyword = if i == 0 { "if" } else { "elif" };
        code.line(3, format!("{} \"invalid_{}\" in testcase:", keyword, param.name));
        code.line(4, format!("{} = testcase[\"invalid_{}\"]", param.local, param.name));
    }
    code.blank();

    let groups = [ctx.local_args(), ctx.payload_args("self.expected_res")];
    call_with_retry(code, 3, "result", &ctx.target, &groups);
    code.line(3, format!("self.{}.{} = \\", api, ctx.endpoint_attr));
    code.line(4, python_string(&url));
    validation(code, 3, ctx);
    failure_summary(code, Some("len(testcases)"));
}

fn test_authorization(code: &mut Code, ctx: &RenderContext) {
    let roles: Vec<String> = ctx
        .endpoint
        .authorized_roles
        .iter()
        .map(|r| python_string(r))
        .collect();

    code.blank();
    code.line(1, "def test_authorization(self):");
    code.line(2, "failures = list()");
    if roles.is_empty() {
        code.line(2, "for testcase in self.v4_RBAC_injection_init([]):");
    } else {
        code.line(2, "for testcase in self.v4_RBAC_injection_init([");
        for line in layout::wrap_args(&roles, layout::ARGS_PER_LINE) {
            code.line(3, line);
        }
        code.line(2, "]):");
    }
    code.line(3, "self.log.info(\"Executing test: {}\".format(testcase[\"description\"]))");
    code.line(3, "header = dict()");
    code.line(3, "self.auth_test_setup(testcase, failures, header,");
    code.line(3, "                     self.project_id, self.other_project_id)");

    let groups = [
        ctx.self_args(),
        ctx.payload_args("self.expected_res"),
        vec!["header".to_string()],
    ];
    call_with_retry(code, 3, "result", &ctx.target, &groups);
    validation(code, 3, ctx);
    failure_summary(code, None);
}

fn test_query_parameters(code: &mut Code, ctx: &RenderContext, policy: &CombinationPolicy) {
    let labels: Vec<String> = ctx.params.iter().map(|p| format!("{} ID: {{}}", p.label)).collect();
    let slots: Vec<String> = (0..ctx.depth()).map(|i| format!("combination[{}]", i)).collect();
    let attrs = ctx.attrs();

    code.blank();
    code.line(1, "def test_query_parameters(self):");
    code.line(2, "self.log.debug(");
    code.line(3, python_string(&format!("Correct Params - {}", labels.join(", "))));
    code.line(3, format!(".format({}))", ctx.self_args().join(", ")));
    code.line(2, "testcases = 0");
    code.line(2, "failures = list()");
    code.line(2, "for combination in self.create_path_combinations(");
    code.line(4, format!("{}):", ctx.self_args().join(", ")));
    code.line(3, "testcases += 1");

    let mut entries: Vec<Entry> = vec![entry(
        "description",
        format!(
            "{}\n{}.format({})",
            python_string(&labels.join(", ")),
            indent(4),
            slots.iter().map(|s| format!("str({})", s)).collect::<Vec<_>>().join(", ")
        ),
    )];
    for (param, slot) in ctx.params.iter().zip(&slots) {
        entries.push(entry(&param.testcase_key, slot.clone()));
    }
    code.line(3, "testcase = {");
    let count = entries.len();
    for (j, (key, value)) in entries.into_iter().enumerate() {
        let comma = if j + 1 < count { "," } else { "" };
        code.line(4, format!("\"{}\": {}{}", key, value, comma));
    }
    code.line(3, "}");

    let all_correct: Vec<String> = attrs
        .iter()
        .enumerate()
        .map(|(i, attr)| format!("combination[{}] == self.{}", i, attr))
        .collect();
    code.line(3, format!("if not ({}):", all_correct.join(" and\n                    ")));

    let arms = policy
        .branches
        .iter()
        .map(|branch| {
            let mut body = Code::new();
            let format_args: Vec<String> = match branch.error.body {
                ErrorBody::Detail { format_slots, .. } => {
                    format_slots.iter().map(|i| format!("combination[{}]", i)).collect()
                }
                ErrorBody::Text(_) => Vec::new(),
            };
            body.line(5, format!("testcase[\"expected_status_code\"] = {}", branch.error.status));
            body.line(
                5,
                format!(
                    "testcase[\"expected_error\"] = {}",
                    error_literal(&branch.error, 5, &format_args)
                ),
            );
            (branch.condition.python(&attrs), body)
        })
        .collect();
    layout::branches(code, 4, arms);

    code.line(3, "self.log.info(\"Executing test: {}\".format(testcase[\"description\"]))");
    code.line(3, "if \"param\" in testcase:");
    code.line(4, "kwarg = {testcase[\"param\"]: testcase[\"paramValue\"]}");
    code.line(3, "else:");
    code.line(4, "kwarg = dict()");
    code.blank();

    let groups = [
        ctx.testcase_args(),
        ctx.payload_args("self.expected_res"),
        vec!["**kwarg".to_string()],
    ];
    call_with_retry(code, 3, "result", &ctx.target, &groups);
    validation(code, 3, ctx);
    failure_summary(code, Some("testcases"));
}

fn test_payload(code: &mut Code, ctx: &RenderContext) {
    code.blank();
    code.line(1, "def test_payload(self):");
    code.line(2, "testcases = list()");
    code.line(2, "for k in self.expected_res:");
    code.line(3, "for v in [");
    for line in layout::wrap_args(
        &PAYLOAD_TEST_VALUES.iter().map(|v| v.to_string()).collect::<Vec<_>>(),
        layout::ARGS_PER_LINE,
    ) {
        code.line(4, line);
    }
    code.line(3, "]:");
    code.line(4, "testcase = copy.deepcopy(self.expected_res)");
    code.line(4, "testcase[k] = v");
    code.line(4, "testcase[\"description\"] = \"Testing `{}` with val: `{}` of {}\" \\");
    code.line(5, ".format(k, v, type(v))");
    code.line(4, "testcases.append(testcase)");
    code.blank();
    code.line(2, "failures = list()");
    code.line(2, "for testcase in testcases:");
    code.line(3, "self.log.info(testcase[\"description\"])");

    let groups = [ctx.self_args(), ctx.payload_args("testcase")];
    call_with_retry(code, 3, "result", &ctx.target, &groups);
    validation(code, 3, ctx);
    failure_summary(code, Some("len(testcases)"));
}

fn throttle_tests(code: &mut Code, ctx: &RenderContext) {
    let mut args = ctx.self_args();
    args.extend(ctx.payload_args("self.expected_res"));

    let func_list = |code: &mut Code| {
        code.line(2, "api_func_list = [[");
        if args.is_empty() {
            code.line(3, format!("{}, ()", ctx.target));
        } else {
            code.line(3, format!("{}, (", ctx.target));
            for line in layout::tuple_items(&args) {
                code.line(4, line);
            }
            code.line(3, ")");
        }
        code.line(2, "]]");
    };

    code.blank();
    code.line(1, "def test_multiple_requests_using_API_keys_with_same_role_which_has_access(");
    code.line(3, "self):");
    func_list(code);
    code.line(2, "self.throttle_test(api_func_list)");

    code.blank();
    code.line(1, "def test_multiple_requests_using_API_keys_with_diff_role(self):");
    func_list(code);
    code.line(2, "self.throttle_test(api_func_list, True, self.project_id)");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conventions::Conventions;
    use chrono::NaiveDate;
    use serde_json::json;

    fn settings() -> RenderSettings {
        RenderSettings::new("Jane Doe", "Clusters_GET")
            .with_date(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap())
    }

    fn endpoint(verb: Verb, path: &str) -> Endpoint {
        Endpoint {
            operation_id: "getCluster".into(),
            tag: "Clusters".into(),
            path: path.into(),
            url_template: path.into(),
            verb,
            resource_segment: "clusters".into(),
            path_parameters: crate::model::placeholders(path),
            query_parameters: Vec::new(),
            required_payload_fields: Vec::new(),
            expected_response: None,
            success_status_code: Some(200),
            create_status_code: None,
            delete_status_code: None,
            response_identifier_field: None,
            expected_identifier_field: None,
            create_payload_fields: Vec::new(),
            authorized_roles: vec!["organizationOwner".into(), "projectOwner".into()],
            class_name: "GetCluster".into(),
            file_name: "get_clusters".into(),
            function_name: "fetch_cluster_info".into(),
            api_handle: "capellaAPI.cluster_ops_apis".into(),
            description: String::new(),
        }
    }

    const ITEM: &str = "/v4/organizations/{organizationId}/projects/{projectId}/clusters/{clusterId}";

    fn linked_get() -> Endpoint {
        let mut get = endpoint(Verb::Get, ITEM);
        get.expected_response = Some(json!({"id": "abc-123", "name": "x"}));
        get.create_status_code = Some(202);
        get.delete_status_code = Some(204);
        get.response_identifier_field = Some("id".into());
        get.expected_identifier_field = Some("id".into());
        get.create_payload_fields = vec!["name".into()];
        get
    }

    fn render(endpoint: &Endpoint) -> String {
        let parent = Superclass::from_class_name("GetProject", &Conventions::default());
        render_test_script(endpoint, &settings(), &parent, "Clusters_GET")
    }

    #[test]
    fn test_linked_get_has_fixture() {
        let script = render(&linked_get());
        assert!(script.contains("class GetCluster(GetProject):"));
        assert!(script.contains("from pytests.Capella.RestAPIv4.Projects.get_projects import GetProject"));
        assert!(script.contains("self.expected_res = {\n            \"id\": \"abc-123\",\n            \"name\": \"x\"\n        }"));
        assert!(script.contains("res = self.capellaAPI.cluster_ops_apis.create_cluster(\n            self.organisation_id, self.project_id,\n            self.expected_res[\"name\"])"));
        assert!(script.contains("if res.status_code != 202:"));
        assert!(script.contains("if res.status_code != 204:"));
        assert!(script.contains("self.cluster_id = res.json()[\"id\"]"));
        assert!(script.contains("self.expected_res[\"id\"] = self.cluster_id"));
        assert!(script.contains("self.expected_res, self.cluster_id)"));
    }

    #[test]
    fn test_one_retry_per_call_site() {
        let script = render(&linked_get());
        // setUp create, tearDown delete, api path, authorization, combinations
        assert_eq!(script.matches(".status_code == 429:").count(), 5);
        assert_eq!(script.matches("self.handle_rate_limit(").count(), 5);

        let plain = render(&endpoint(Verb::Get, ITEM));
        assert_eq!(plain.matches(".status_code == 429:").count(), 3);
    }

    #[test]
    fn test_non_hex_case_carries_bad_request_body() {
        let script = render(&endpoint(Verb::Get, ITEM));
        assert!(script.contains("\"description\": \"Call API with non-hex clusterId\""));
        assert!(script.contains(
            "\"hint\": \"Check if you have provided a valid URL and all the required params are present in the request body.\""
        ));
        assert!(script.contains("\"code\": 1000,"));
    }

    #[test]
    fn test_unlinked_get_degrades() {
        let script = render(&endpoint(Verb::Get, ITEM));
        assert!(!script.contains("self.expected_res ="));
        assert!(!script.contains("create_cluster"));
        assert!(script.contains("def tearDown(self):\n        super(GetCluster, self).tearDown()"));
        assert!(script.contains("self.validate_testcase(result, [200], testcase, failures)"));
    }

    #[test]
    fn test_api_path_cases() {
        let script = render(&endpoint(Verb::Get, ITEM));
        assert!(script.contains("\"url\": \"/v3/organizations/{}/projects/{}/clusters\""));
        assert!(script.contains("\"url\": \"/v4/organizations/{}/projects/{}/cluster\""));
        assert!(script.contains("\"url\": \"/v4/organizations/{}/projects/{}/clusters/cluster\""));
        assert!(script.contains("\"invalid_projectId\": self.replace_last_character("));
        assert!(script.contains("elif \"invalid_clusterId\" in testcase:\n                cluster = testcase[\"invalid_clusterId\"]"));
        assert!(script.contains("self.capellaAPI.cluster_ops_apis.clusters_endpoint = \\\n                \"/v4/organizations/{}/projects/{}/clusters\""));
    }

    #[test]
    fn test_combination_ladder_is_emitted() {
        let script = render(&endpoint(Verb::Get, ITEM));
        assert!(script.contains("for combination in self.create_path_combinations("));
        assert!(script.contains("if combination[0] == \"\" or combination[1] == \"\" or combination[2] == \"\":"));
        assert!(script.contains("elif combination[0] != self.organisation_id:"));
        assert!(script.contains("elif combination[2] != self.cluster_id:"));
        assert!(script.contains("\"code\": 4031,"));
        assert!(script.contains(".format(combination[1], combination[2])"));
        assert!(script.contains("\"clusterID\": combination[2]"));
    }

    #[test]
    fn test_create_adds_payload_test() {
        let mut create = endpoint(
            Verb::Create,
            "/v4/organizations/{organizationId}/projects/{projectId}/clusters",
        );
        create.class_name = "CreateCluster".into();
        create.function_name = "create_cluster".into();
        create.success_status_code = Some(202);
        create.required_payload_fields = vec!["name".into()];
        create.expected_identifier_field = Some("id".into());
        let script = render(&create);

        assert!(script.starts_with("\"\"\"\nCreated on January 02, 2024\n"));
        assert!(script.contains("import copy\n"));
        assert!(script.contains("def test_payload(self):"));
        assert!(script.contains("testcase[\"name\"])"));
        assert!(script.contains("self.log.debug(\"Creation Successful\")"));
        assert!(script.contains("\"expected_status_code\": 405,"));
        // api path, authorization, combinations, payload
        assert_eq!(script.matches(".status_code == 429:").count(), 4);
    }

    #[test]
    fn test_roles_listed_for_authorization() {
        let script = render(&endpoint(Verb::Get, ITEM));
        assert!(script.contains("self.v4_RBAC_injection_init([\n            \"organizationOwner\", \"projectOwner\"\n        ]):"));

        let mut open = endpoint(Verb::Get, ITEM);
        open.authorized_roles.clear();
        assert!(render(&open).contains("self.v4_RBAC_injection_init([]):"));
    }

    #[test]
    fn test_version_swap() {
        assert_eq!(swap_version("/v4/a/{}").as_deref(), Some("/v3/a/{}"));
        assert_eq!(swap_version("/v1/a").as_deref(), Some("/v2/a"));
        assert_eq!(swap_version("/api/a"), None);
    }

    #[test]
    fn test_rendering_is_deterministic() {
        assert_eq!(render(&linked_get()), render(&linked_get()));
    }
}
