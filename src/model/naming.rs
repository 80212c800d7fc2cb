// Convention-based names for generated classes, files and wrapper functions.
//
// The rules are a fixed table per verb. Anything the table cannot name is an
// error instead of a guess.

use super::endpoint::Verb;
use super::ModelError;
use crate::utils::{camel_to_snake, letters_only, pluralize, singularize, to_pascal_case};

/// Names derived from (verb, operation id, trailing path segment).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedNames {
    pub class_name: String,
    pub file_name: String,
    pub function_name: String,
}

pub fn derive_names(verb: Verb, operation_id: &str, resource_segment: &str) -> Result<DerivedNames, ModelError> {
    let letters = letters_only(operation_id);
    if letters.is_empty() {
        return Err(ModelError::EmptyOperationId(operation_id.to_string()));
    }

    let resource_letters = letters_only(resource_segment);
    if resource_letters.is_empty() {
        return Err(ModelError::MissingResourceSegment(resource_segment.to_string()));
    }
    let resource = camel_to_snake(&resource_letters).to_lowercase();

    let base = camel_to_snake(&letters).to_lowercase();
    let tokens: Vec<&str> = base.split('_').filter(|t| !t.is_empty()).collect();
    let first = tokens.first().copied().unwrap_or_default();
    let last = tokens.last().copied().unwrap_or_default();
    let rest = tokens.get(1..).map(|t| t.join("_")).unwrap_or_default();

    let missing_token = || ModelError::MissingResourceToken {
        operation_id: operation_id.to_string(),
        verb,
    };

    let mut file_name = base.clone();
    let mut function_name = base.clone();

    match verb {
        Verb::Get => {
            if first != "list" {
                if rest.is_empty() {
                    return Err(missing_token());
                }
                function_name = format!("fetch_{}_info", rest);
            }
        }
        Verb::Update => {
            if first != "update" {
                if rest.is_empty() {
                    return Err(missing_token());
                }
                function_name = format!("update_{}", resource);
                file_name = format!("update_{}", pluralize(&rest));
            }
        }
        Verb::Create => {
            if first == "post" {
                if rest.is_empty() {
                    return Err(missing_token());
                }
                function_name = format!("create_{}", resource);
                file_name = format!("create_{}", pluralize(&rest));
            } else if last == "on" {
                function_name = format!("turn_{}", function_name);
            }
        }
        Verb::Delete => {
            if !file_name.ends_with('s') {
                if last == "off" {
                    function_name = format!("turn_{}", function_name);
                } else {
                    file_name.push('s');
                }
            }
        }
        Verb::List => {}
    }

    if verb != Verb::List {
        function_name = singularize(&function_name).to_string();
    }
    let file_name = pluralize(&file_name);

    let mut class_name = format!("{}{}", verb.pascal(), to_pascal_case(resource_segment));
    class_name.retain(char::is_alphanumeric);
    if verb != Verb::List {
        class_name = singularize(&class_name).to_string();
    }

    Ok(DerivedNames {
        class_name,
        file_name,
        function_name,
    })
}
