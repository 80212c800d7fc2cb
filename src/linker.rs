// Cross-endpoint linking: a GET test needs a create/delete cycle for its setup
// and teardown, so the GET inherits what its mutating siblings know.

use tracing::{debug, info};

use crate::model::{Endpoint, Verb};

/// One attachment made by [`link_siblings`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub source: String,
    pub target: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkReport {
    pub links: Vec<Link>,
    /// Operation ids whose expected body found no GET sibling.
    pub unlinked: Vec<String>,
}

/// Delete status codes keyed by exact collection URL, first declaration wins.
fn deletion_codes(endpoints: &[Endpoint]) -> Vec<(String, u16)> {
    let mut codes: Vec<(String, u16)> = Vec::new();
    for endpoint in endpoints.iter().filter(|e| e.verb == Verb::Delete) {
        let url = endpoint.collection_url();
        if let Some(code) = endpoint.success_status_code {
            if !codes.iter().any(|(u, _)| *u == url) {
                codes.push((url, code));
            }
        }
    }
    codes
}

/// Attach expected bodies, status codes and identifier fields of mutating
/// endpoints to the GET endpoint with the same collection URL.
///
/// Endpoints are visited in reverse selection order (GET, DELETE, LIST, POST,
/// PUT after ingestion), so the earliest mutating sibling is applied last and
/// wins: CREATE overrides UPDATE, and a DELETE carrying a 2xx example
/// overrides both, including the create status. Each attached body is cleared
/// on its source. Running this twice is a no-op the second time.
pub fn link_siblings(endpoints: &mut [Endpoint]) -> LinkReport {
    let mut report = LinkReport::default();
    let deletions = deletion_codes(endpoints);

    for i in (0..endpoints.len()).rev() {
        if !matches!(endpoints[i].verb, Verb::Create | Verb::Update | Verb::Delete) {
            continue;
        }
        let Some(expected) = endpoints[i].expected_response.clone() else {
            continue;
        };

        let source_url = endpoints[i].collection_url();
        let target = endpoints
            .iter()
            .position(|e| e.verb == Verb::Get && e.collection_url() == source_url);

        let Some(t) = target else {
            info!(
                operation_id = %endpoints[i].operation_id,
                url = %source_url,
                "no GET sibling found, expected response stays unlinked"
            );
            report.unlinked.push(endpoints[i].operation_id.clone());
            continue;
        };

        let source = endpoints[i].clone();
        let delete_code = deletions
            .iter()
            .find(|(url, _)| *url == source_url)
            .map(|(_, code)| *code);

        let get = &mut endpoints[t];
        get.expected_response = Some(expected);
        get.delete_status_code = delete_code;
        get.create_status_code = source.success_status_code;
        get.response_identifier_field = source.expected_identifier_field.clone();
        if get.expected_identifier_field.is_none() {
            get.expected_identifier_field = source.expected_identifier_field.clone();
        }
        get.create_payload_fields = source.required_payload_fields.clone();

        debug!(from = %source.operation_id, to = %get.operation_id, "linked expected response");
        report.links.push(Link {
            source: source.operation_id,
            target: get.operation_id.clone(),
        });

        endpoints[i].expected_response = None;
    }

    report
}
