// Pipeline configuration manifest routing generated test classes into groups.

use super::layout::Code;
use crate::conventions::Conventions;
use crate::model::Endpoint;
use crate::utils::letters_only;

const HEADER: &str = "\
###################################################################################################
# Test GROUPING:
# Tests taking longer than an hour have been removed from being executed in the sanity pipeline.
# Instead they are kept either in the QE24 pipeline tests (current file) or refrained from being in any pipeline at all.

# Therefore a certain Grouping format has been used in all the Capella v4 REST API conf files.
#     - Group RT : The Rate Limiting tests have this associated with them.

# Some Params can be specified while running tests in the pipeline or locally by editing the file or passing them in the test configuration.
#     - server_version : The server version for capella cluster to be deployed. DEFAULT = 7.6
###################################################################################################";

/// `Cluster Ops` gives `ClusterOps-v4-APIs.conf`.
pub fn conf_file_name(tag: &str) -> String {
    format!("{}-v4-APIs.conf", letters_only(tag))
}

pub fn render_pipeline_conf(endpoints: &[Endpoint], nomenclature: &str, conventions: &Conventions) -> String {
    let mut code = Code::new();
    code.block(0, HEADER);

    for endpoint in endpoints {
        let group = endpoint.verb.test_group();
        code.blank();
        code.line(
            0,
            format!(
                "{}.{}.{}.{}:",
                conventions.conf_root, nomenclature, endpoint.file_name, endpoint.class_name
            ),
        );
        code.line(1, format!("test_authorization,GROUP=P{}", group));
        code.line(
            1,
            format!(
                "test_multiple_requests_using_API_keys_with_same_role_which_has_access,GROUP=P{};RT",
                group
            ),
        );
        code.line(
            1,
            format!("test_multiple_requests_using_API_keys_with_diff_role,GROUP=P{};RT", group),
        );
    }

    code.finish()
}
