//! Naming and wording tables the generated suites follow.
//!
//! These are data rather than logic: the role table has known gaps (unmapped
//! labels are dropped) and the ladder overrides are keyed by literal resource
//! family names. Callers can start from [`Conventions::default`] and adjust.

use once_cell::sync::Lazy;
use serde::Serialize;

/// Sentence that introduces the bullet list of roles in operation descriptions.
pub const ROLE_PREAMBLE: &str =
    "In order to access this endpoint, the provided API key must have at least one of the roles referenced below:";

static STANDARD: Lazy<Conventions> = Lazy::new(|| Conventions {
    role_preamble: ROLE_PREAMBLE.to_string(),
    role_labels: pairs(&[
        ("Organization Member", "organizationMember"),
        ("Project Creator", "projectCreator"),
        ("Organization Owner", "organizationOwner"),
        ("Project Owner", "projectOwner"),
        ("Project Manager", "projectManager"),
        ("Project Viewer", "projectViewer"),
        ("Database Data Reader/Writer", "projectDataReaderWriter"),
        ("Database Data Reader", "projectDataReader"),
    ]),
    default_api_handle: "capellaAPI.cluster_ops_apis".to_string(),
    api_handle_rules: pairs(&[("analyticsClusters", "columnarAPI")]),
    attribute_aliases: pairs(&[("organization_id", "organisation_id")]),
    import_root: "pytests.Capella.RestAPIv4".to_string(),
    conf_root: "Capella.RestAPIv4".to_string(),
    ladder_overrides: vec![
        LadderOverride::new(3, "Alerts", LadderVariant::ProjectThenOrganization),
        LadderOverride::new(4, "AuditLogs", LadderVariant::ProjectThenOrganization),
        LadderOverride::new(4, "AuditLogExports", LadderVariant::ClusterProjectExport),
    ],
});

fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
    items
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Which rung sequence the combination test uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LadderVariant {
    /// The chain chosen by resource depth alone.
    ByDepth,
    /// Project not found, otherwise organization not found.
    ProjectThenOrganization,
    /// Cluster, then project for cluster, otherwise export not found.
    ClusterProjectExport,
}

/// Replaces the depth-based ladder for one literal resource family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LadderOverride {
    pub depth: usize,
    pub family: String,
    pub variant: LadderVariant,
}

impl LadderOverride {
    pub fn new(depth: usize, family: &str, variant: LadderVariant) -> Self {
        LadderOverride {
            depth,
            family: family.to_string(),
            variant,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Conventions {
    pub role_preamble: String,
    /// Free-text role label to role token, checked in order.
    pub role_labels: Vec<(String, String)>,
    pub default_api_handle: String,
    /// Path segment to API handle; the first rule whose segment occurs wins.
    pub api_handle_rules: Vec<(String, String)>,
    /// Test attribute renames (`organization_id` is spelled `organisation_id` in the suites).
    pub attribute_aliases: Vec<(String, String)>,
    /// Python package that holds the test modules.
    pub import_root: String,
    /// Dotted prefix of test classes inside conf files.
    pub conf_root: String,
    pub ladder_overrides: Vec<LadderOverride>,
}

impl Default for Conventions {
    fn default() -> Self {
        STANDARD.clone()
    }
}

impl Conventions {
    pub fn role_token(&self, label: &str) -> Option<&str> {
        self.role_labels
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, token)| token.as_str())
    }

    pub fn api_handle_for(&self, path: &str) -> &str {
        self.api_handle_rules
            .iter()
            .find(|(segment, _)| path.split('/').any(|s| s == segment))
            .map(|(_, handle)| handle.as_str())
            .unwrap_or(&self.default_api_handle)
    }

    pub fn attribute_name(&self, snake: &str) -> String {
        self.attribute_aliases
            .iter()
            .find(|(from, _)| from == snake)
            .map(|(_, to)| to.clone())
            .unwrap_or_else(|| snake.to_string())
    }

    pub fn ladder_variant(&self, depth: usize, family: &str) -> LadderVariant {
        self.ladder_overrides
            .iter()
            .find(|o| o.depth == depth && o.family == family)
            .map(|o| o.variant)
            .unwrap_or(LadderVariant::ByDepth)
    }
}
