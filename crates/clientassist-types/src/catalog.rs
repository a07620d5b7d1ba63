//! Template and checklist catalogs.
//!
//! Both catalogs are read-only after startup and shared across every
//! concurrent handler.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Template name -> template body (with `[PLACEHOLDER]` markers).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateCatalog(BTreeMap<String, String>);

impl TemplateCatalog {
    pub fn new(entries: BTreeMap<String, String>) -> Self {
        Self(entries)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Template names in display order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// One named, ordered checklist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChecklistDefinition {
    pub name: String,
    pub items: Vec<String>,
}

/// Checklist name -> ordered item descriptions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChecklistCatalog(BTreeMap<String, Vec<String>>);

impl ChecklistCatalog {
    pub fn new(entries: BTreeMap<String, Vec<String>>) -> Self {
        Self(entries)
    }

    pub fn get(&self, name: &str) -> Option<ChecklistDefinition> {
        self.0.get(name).map(|items| ChecklistDefinition {
            name: name.to_string(),
            items: items.clone(),
        })
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Checkbox answers from one review form: item index -> selected option values.
///
/// An index with an empty vector was rendered but left unchecked; a missing
/// index was never answered. Both count as not completed.
pub type CheckboxSelections = BTreeMap<usize, Vec<String>>;

/// Completion count for one checklist submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistTally {
    pub completed: usize,
    pub total: usize,
}

impl ChecklistTally {
    pub fn is_complete(&self) -> bool {
        self.completed == self.total
    }
}

impl fmt::Display for ChecklistTally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.completed, self.total)
    }
}

/// Human label for a catalog key: `project_update` -> `project update`.
pub fn display_name(key: &str) -> String {
    key.replace('_', " ")
}
