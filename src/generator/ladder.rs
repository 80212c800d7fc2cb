//! Priority ladder for the path combination test.
//!
//! Each generated combination replaces some path parameters with a wrong, an
//! empty or a non-string value. The server answers with the first failure it
//! detects, so the expectation is the first branch of an ordered chain whose
//! condition holds. The same chain is used twice: [`CombinationPolicy::classify`]
//! evaluates it here, and the test renderer emits it as an if/elif chain.

use crate::conventions::LadderVariant;
use crate::model::Verb;

/// What a combination put into one path slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Correct,
    Wrong,
    Empty,
    NonString,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorBody {
    /// Plain response text.
    Text(&'static str),
    /// Structured error; `format_slots` are combination indices spliced into the message.
    Detail {
        code: u32,
        hint: &'static str,
        message: &'static str,
        format_slots: &'static [usize],
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpectedError {
    pub status: u16,
    pub body: ErrorBody,
}

const fn detail(status: u16, code: u32, hint: &'static str, message: &'static str) -> ExpectedError {
    ExpectedError {
        status,
        body: ErrorBody::Detail {
            code,
            hint,
            message,
            format_slots: &[],
        },
    }
}

pub const PAGE_NOT_FOUND: ExpectedError = ExpectedError {
    status: 404,
    body: ErrorBody::Text("404 page not found"),
};

pub const METHOD_NOT_ALLOWED: ExpectedError = ExpectedError {
    status: 405,
    body: ErrorBody::Text(""),
};

pub const BAD_REQUEST: ExpectedError = detail(
    400,
    1000,
    "Check if you have provided a valid URL and all the required params are present in the request body.",
    "The server cannot or will not process the request due to something that is perceived to be a client error.",
);

pub const ACCESS_DENIED: ExpectedError = detail(
    403,
    1002,
    "Your access to the requested resource is denied. Please make sure you have the necessary permissions to access the resource.",
    "Access Denied.",
);

pub const PROJECT_NOT_FOUND: ExpectedError = detail(
    404,
    2000,
    "Check if the project ID is valid.",
    "The server cannot find a project by its ID.",
);

pub const ORGANIZATION_NOT_FOUND: ExpectedError = detail(
    404,
    3000,
    "Please ensure that the organization ID is correct.",
    "Not Found.",
);

pub const CLUSTER_NOT_FOUND: ExpectedError = detail(
    404,
    4025,
    "The requested cluster details could not be found or fetched. Please ensure that the correct cluster ID is provided.",
    "Unable to fetch the cluster details.",
);

pub const PROJECT_MISMATCH: ExpectedError = ExpectedError {
    status: 422,
    body: ErrorBody::Detail {
        code: 4031,
        hint: "Please provide a valid projectId.",
        message: "Unable to process the request. The provided projectId {} is not valid for the cluster {}.",
        format_slots: &[1, 2],
    },
};

pub const BUCKET_INVALID: ExpectedError = detail(
    400,
    400,
    "Please review your request and ensure that all required parameters are correctly provided.",
    "BucketID is invalid.",
);

pub const BUCKET_NOT_FOUND: ExpectedError = detail(
    404,
    6008,
    "The requested bucket does not exist. Please ensure that the correct bucket ID is provided.",
    "Unable to find the specified bucket.",
);

pub const SCOPE_NOT_FOUND: ExpectedError = detail(
    404,
    11002,
    "The requested scope details could not be found or fetched. Please ensure that the correct scope name is provided.",
    "Scope Not Found",
);

pub const COLLECTION_NOT_FOUND: ExpectedError = detail(
    404,
    11001,
    "The requested collection details could not be found or fetched. Please ensure that the correct collection name is provided.",
    "Collection Not Found",
);

pub const EXPORT_NOT_FOUND: ExpectedError = detail(
    404,
    404,
    "Please review your request and ensure that all required parameters are correctly provided.",
    "The requested export ID does not exist.",
);

/// A branch condition over the combination slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// Any of the listed slots is the empty string.
    AnyEmpty(Vec<usize>),
    Empty(usize),
    /// The slot is empty or any slot is not a string.
    EmptyOrAnyNonString(usize),
    AnyNonString,
    Differs(usize),
    /// The slot differs from the correct value and is not `None`.
    DiffersNotNone(usize),
    IsNone(usize),
    Otherwise,
}

impl Condition {
    pub fn holds(&self, combination: &[Slot]) -> bool {
        let at = |i: usize| combination.get(i).copied();
        match self {
            Condition::AnyEmpty(slots) => slots.iter().any(|&i| at(i) == Some(Slot::Empty)),
            Condition::Empty(i) => at(*i) == Some(Slot::Empty),
            Condition::EmptyOrAnyNonString(i) => {
                at(*i) == Some(Slot::Empty) || combination.contains(&Slot::NonString)
            }
            Condition::AnyNonString => combination.contains(&Slot::NonString),
            Condition::Differs(i) => matches!(at(*i), Some(s) if s != Slot::Correct),
            Condition::DiffersNotNone(i) => {
                matches!(at(*i), Some(s) if s != Slot::Correct && s != Slot::NonString)
            }
            Condition::IsNone(i) => at(*i) == Some(Slot::NonString),
            Condition::Otherwise => true,
        }
    }

    /// Python expression for the condition; `attrs` names the test attribute
    /// holding the correct value of each slot. `None` for the `else` arm.
    pub fn python(&self, attrs: &[String]) -> Option<String> {
        let attr = |i: usize| attrs.get(i).map(String::as_str).unwrap_or("None");
        let expr = match self {
            Condition::AnyEmpty(slots) => slots
                .iter()
                .map(|i| format!("combination[{}] == \"\"", i))
                .collect::<Vec<_>>()
                .join(" or "),
            Condition::Empty(i) => format!("combination[{}] == \"\"", i),
            Condition::EmptyOrAnyNonString(i) => {
                format!("combination[{}] == \"\" or {}", i, any_non_string(attrs.len()))
            }
            Condition::AnyNonString => any_non_string(attrs.len()),
            Condition::Differs(i) => format!("combination[{}] != self.{}", i, attr(*i)),
            Condition::DiffersNotNone(i) => format!(
                "combination[{}] != self.{} and not isinstance(combination[{}], type(None))",
                i,
                attr(*i),
                i
            ),
            Condition::IsNone(i) => format!("isinstance(combination[{}], type(None))", i),
            Condition::Otherwise => return None,
        };
        Some(expr)
    }
}

fn any_non_string(depth: usize) -> String {
    let types = (0..depth)
        .map(|i| format!("type(combination[{}])", i))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "any(variable in [int, bool, float, list, tuple, set, type(None)] for variable in [{}])",
        types
    )
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch {
    pub condition: Condition,
    pub error: ExpectedError,
}

fn branch(condition: Condition, error: ExpectedError) -> Branch {
    Branch { condition, error }
}

/// Rungs that follow the organization check, chosen by depth or family override.
pub fn rungs(depth: usize, variant: LadderVariant) -> Vec<Branch> {
    use Condition::*;

    match variant {
        LadderVariant::ProjectThenOrganization => vec![
            branch(Differs(1), PROJECT_NOT_FOUND),
            branch(Otherwise, ORGANIZATION_NOT_FOUND),
        ],
        // the project rung reads the project slot, not the cluster slot
        LadderVariant::ClusterProjectExport => vec![
            branch(Differs(2), CLUSTER_NOT_FOUND),
            branch(Differs(1), PROJECT_MISMATCH),
            branch(Otherwise, EXPORT_NOT_FOUND),
        ],
        LadderVariant::ByDepth => {
            let bucket_chain = || {
                vec![
                    branch(DiffersNotNone(3), BUCKET_INVALID),
                    branch(Differs(2), CLUSTER_NOT_FOUND),
                    branch(Differs(1), PROJECT_MISMATCH),
                    branch(IsNone(3), BUCKET_NOT_FOUND),
                ]
            };
            match depth {
                2 => vec![branch(Otherwise, PROJECT_NOT_FOUND)],
                3 => vec![
                    branch(Differs(2), CLUSTER_NOT_FOUND),
                    branch(Otherwise, PROJECT_MISMATCH),
                ],
                4 => {
                    let mut chain = bucket_chain();
                    chain.push(branch(Otherwise, BUCKET_INVALID));
                    chain
                }
                5 => {
                    let mut chain = bucket_chain();
                    chain.push(branch(Otherwise, SCOPE_NOT_FOUND));
                    chain
                }
                6 => {
                    let mut chain = bucket_chain();
                    chain.push(branch(Differs(4), SCOPE_NOT_FOUND));
                    chain.push(branch(Otherwise, COLLECTION_NOT_FOUND));
                    chain
                }
                _ => Vec::new(),
            }
        }
    }
}

/// The full expectation chain for one endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombinationPolicy {
    pub verb: Verb,
    pub depth: usize,
    pub branches: Vec<Branch>,
}

impl CombinationPolicy {
    pub fn new(verb: Verb, depth: usize, variant: LadderVariant) -> Self {
        use Condition::*;

        let last = depth.saturating_sub(1);
        let checked: Vec<usize> = match verb {
            Verb::List | Verb::Create => (0..last).collect(),
            _ => (0..depth).collect(),
        };

        let mut branches = Vec::new();
        if !checked.is_empty() {
            branches.push(branch(AnyEmpty(checked), PAGE_NOT_FOUND));
        }
        match verb {
            Verb::Create if depth > 0 => branches.push(branch(Empty(last), METHOD_NOT_ALLOWED)),
            Verb::List if depth > 0 => branches.push(branch(EmptyOrAnyNonString(last), BAD_REQUEST)),
            _ => {}
        }
        branches.push(branch(AnyNonString, BAD_REQUEST));
        branches.push(branch(Differs(0), ACCESS_DENIED));
        branches.extend(rungs(depth, variant));

        CombinationPolicy { verb, depth, branches }
    }

    /// Expected failure for a combination, `None` when success is expected.
    pub fn classify(&self, combination: &[Slot]) -> Option<ExpectedError> {
        if combination.iter().all(|s| *s == Slot::Correct) {
            return None;
        }
        self.branches
            .iter()
            .find(|b| b.condition.holds(combination))
            .map(|b| b.error)
    }
}
