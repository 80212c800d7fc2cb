use chrono::{Local, NaiveDate};

use crate::conventions::Conventions;
use crate::utils::{camel_to_snake, to_pascal_case};

pub const DATE_FORMAT: &str = "%B %d, %Y";
pub const DEFAULT_COMMAND: &str = "restapi-test-generator";

/// Inputs shared by every rendered artifact of one run.
#[derive(Debug, Clone)]
pub struct RenderSettings {
    pub author: String,
    /// Header date, already formatted.
    pub date: String,
    /// Command path printed in the header.
    pub command: String,
    /// Nomenclature handed to the base class `setUp`. In module mode this is
    /// the prefix and the verb is appended per script.
    pub nomenclature: String,
    pub conventions: Conventions,
}

impl RenderSettings {
    pub fn new(author: &str, nomenclature: &str) -> Self {
        RenderSettings {
            author: author.to_string(),
            date: Local::now().format(DATE_FORMAT).to_string(),
            command: DEFAULT_COMMAND.to_string(),
            nomenclature: nomenclature.to_string(),
            conventions: Conventions::default(),
        }
    }

    /// Fix the header date, for reproducible output.
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = date.format(DATE_FORMAT).to_string();
        self
    }

    pub fn with_command(mut self, command: &str) -> Self {
        self.command = command.to_string();
        self
    }

    /// Prefix of a module nomenclature: `Clusters_GET` gives `Clusters`.
    pub fn nomenclature_prefix(&self) -> &str {
        self.nomenclature
            .split('_')
            .next()
            .unwrap_or(&self.nomenclature)
    }

    /// Python docstring opening every generated file.
    pub fn header(&self) -> String {
        format!(
            "\"\"\"\nCreated on {}\n\n@author: Created using {} by {}\n\"\"\"\n",
            self.date, self.command, self.author
        )
    }
}

/// The class a generated test class extends, with the module it is imported from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Superclass {
    pub name: String,
    pub module: String,
}

impl Superclass {
    /// Locate a class by the suite layout: `GetProject` lives in
    /// `<import_root>.Projects.get_projects`.
    pub fn from_class_name(name: &str, conventions: &Conventions) -> Self {
        let snake = camel_to_snake(name).to_lowercase();
        let resource = snake.split_once('_').map(|(_, rest)| rest).unwrap_or(&snake);
        Superclass {
            name: name.to_string(),
            module: format!(
                "{}.{}s.{}s",
                conventions.import_root,
                to_pascal_case(resource),
                snake
            ),
        }
    }

    /// A sibling class generated into the same module directory.
    pub fn sibling(name: &str, file_name: &str, directory: &str, conventions: &Conventions) -> Self {
        Superclass {
            name: name.to_string(),
            module: format!("{}.{}.{}", conventions.import_root, directory, file_name),
        }
    }

    pub fn import_line(&self) -> String {
        format!("from {} import {}", self.module, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_uses_fixed_date() {
        let settings = RenderSettings::new("Jane Doe", "Clusters_GET")
            .with_date(NaiveDate::from_ymd_opt(2024, 3, 7).unwrap())
            .with_command("restapi-test-generator file");
        assert_eq!(
            settings.header(),
            "\"\"\"\nCreated on March 07, 2024\n\n@author: Created using restapi-test-generator file by Jane Doe\n\"\"\"\n"
        );
        assert_eq!(settings.nomenclature_prefix(), "Clusters");
    }

    #[test]
    fn test_superclass_location() {
        let conventions = Conventions::default();
        let parent = Superclass::from_class_name("GetProject", &conventions);
        assert_eq!(
            parent.import_line(),
            "from pytests.Capella.RestAPIv4.Projects.get_projects import GetProject"
        );

        let nested = Superclass::from_class_name("GetAuditLogExport", &conventions);
        assert_eq!(nested.module, "pytests.Capella.RestAPIv4.AuditLogExports.get_audit_log_exports");

        let sibling = Superclass::sibling("GetCluster", "get_clusters", "Clusters", &conventions);
        assert_eq!(
            sibling.import_line(),
            "from pytests.Capella.RestAPIv4.Clusters.get_clusters import GetCluster"
        );
    }
}
