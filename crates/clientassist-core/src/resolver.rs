//! Content source resolution: turn the user's choice into the base text that
//! is sent to the generation service.

use clientassist_types::catalog::TemplateCatalog;
use clientassist_types::error::UsageError;
use clientassist_types::flow::{DraftMessage, DraftOrigin};

/// A concrete content choice, with its payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentChoice {
    Predefined(String),
    Custom(String),
    Revision(String),
}

/// Resolve a choice into a draft.
///
/// Pure: the same choice against the same catalog always yields the same
/// draft. Unknown templates and blank text are rejected here, before any
/// generation call is made.
pub fn resolve(
    templates: &TemplateCatalog,
    choice: &ContentChoice,
) -> Result<DraftMessage, UsageError> {
    match choice {
        ContentChoice::Predefined(name) => templates
            .get(name)
            .map(|body| DraftMessage::new(body, DraftOrigin::Template(name.clone())))
            .ok_or_else(|| UsageError::UnknownTemplate(name.clone())),
        ContentChoice::Custom(text) => non_blank(text, DraftOrigin::Custom),
        ContentChoice::Revision(prior) => non_blank(prior, DraftOrigin::Revision),
    }
}

fn non_blank(text: &str, origin: DraftOrigin) -> Result<DraftMessage, UsageError> {
    if text.trim().is_empty() {
        return Err(UsageError::EmptyDraft);
    }
    Ok(DraftMessage::new(text, origin))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::default_templates;

    #[test]
    fn test_predefined_returns_body_unmodified_for_every_key() {
        let templates = default_templates();
        for (name, body) in templates.iter() {
            let draft = resolve(&templates, &ContentChoice::Predefined(name.to_string())).unwrap();
            assert_eq!(draft.text(), body);
            assert_eq!(draft.origin(), &DraftOrigin::Template(name.to_string()));
        }
    }

    #[test]
    fn test_unknown_template_is_usage_error() {
        let err = resolve(
            &default_templates(),
            &ContentChoice::Predefined("quarterly_report".to_string()),
        )
        .unwrap_err();
        assert_eq!(err, UsageError::UnknownTemplate("quarterly_report".to_string()));
    }

    #[test]
    fn test_custom_is_verbatim_and_idempotent() {
        let templates = default_templates();
        let choice = ContentChoice::Custom("  We shipped v2 today.\n".to_string());
        let first = resolve(&templates, &choice).unwrap();
        let second = resolve(&templates, &choice).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.text(), "  We shipped v2 today.\n");
        assert_eq!(first.origin(), &DraftOrigin::Custom);
    }

    #[test]
    fn test_revision_uses_prior_draft() {
        let draft = resolve(
            &default_templates(),
            &ContentChoice::Revision("prior text".to_string()),
        )
        .unwrap();
        assert_eq!(draft.text(), "prior text");
        assert_eq!(draft.origin(), &DraftOrigin::Revision);
    }

    #[test]
    fn test_blank_text_rejected() {
        let templates = default_templates();
        assert_eq!(
            resolve(&templates, &ContentChoice::Custom("   ".to_string())),
            Err(UsageError::EmptyDraft)
        );
        assert_eq!(
            resolve(&templates, &ContentChoice::Revision(String::new())),
            Err(UsageError::EmptyDraft)
        );
    }
}
