//! Built-in template and checklist catalogs.
//!
//! These are the defaults used when `config.toml` does not supply its own
//! `[templates]` or `[checklists]` tables. Either way the catalogs are built
//! once at startup and only read afterwards.

use std::collections::BTreeMap;

use clientassist_types::catalog::{ChecklistCatalog, TemplateCatalog};
use clientassist_types::config::AppConfig;

/// The read-only catalogs every handler shares.
#[derive(Debug, Clone)]
pub struct Catalogs {
    pub templates: TemplateCatalog,
    pub checklists: ChecklistCatalog,
}

impl Catalogs {
    /// Catalogs from configuration, falling back to the built-ins per table.
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            templates: config
                .templates
                .clone()
                .unwrap_or_else(default_templates),
            checklists: config
                .checklists
                .clone()
                .unwrap_or_else(default_checklists),
        }
    }
}

impl Default for Catalogs {
    fn default() -> Self {
        Self {
            templates: default_templates(),
            checklists: default_checklists(),
        }
    }
}

pub fn default_templates() -> TemplateCatalog {
    let mut entries = BTreeMap::new();
    entries.insert(
        "project_update".to_string(),
        "Here's an update on our project: [PROJECT_NAME]. We've made significant progress on \
         [MILESTONE]. Our next steps include [NEXT_STEPS]. Please let me know if you have any \
         questions."
            .to_string(),
    );
    entries.insert(
        "meeting_summary".to_string(),
        "Thank you for attending our meeting about [TOPIC]. Key points discussed were: [POINT1], \
         [POINT2], [POINT3]. Our action items are: [ACTION1], [ACTION2]."
            .to_string(),
    );
    entries.insert(
        "issue_notification".to_string(),
        "We've encountered an issue with [ISSUE_DESCRIPTION]. Our team is actively working on a \
         solution. We expect to resolve this by [ESTIMATED_RESOLUTION_TIME]. We appreciate your \
         patience and understanding."
            .to_string(),
    );
    TemplateCatalog::new(entries)
}

pub fn default_checklists() -> ChecklistCatalog {
    let mut entries = BTreeMap::new();
    entries.insert(
        "client_communication".to_string(),
        items(&[
            "Is the message clear and concise?",
            "Does it address all the client's concerns?",
            "Is the tone appropriate and professional?",
            "Are there any grammatical or spelling errors?",
            "Have you included all necessary information?",
        ]),
    );
    entries.insert(
        "project_completion".to_string(),
        items(&[
            "Have all project requirements been met?",
            "Has the deliverable been thoroughly tested?",
            "Is the documentation complete and up-to-date?",
            "Have all known issues been resolved or documented?",
            "Has the client been notified of project completion?",
        ]),
    );
    entries.insert(
        "technical_qa".to_string(),
        items(&[
            "Does the code follow our coding standards?",
            "Have all functions been properly documented?",
            "Have unit tests been written and passed?",
            "Has the code been reviewed by another team member?",
            "Have all debugging logs been removed?",
        ]),
    );
    ChecklistCatalog::new(entries)
}

fn items(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}
