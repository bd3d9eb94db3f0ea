//! Error types for loading and authoring scene files

use thiserror::Error;

/// Errors that can occur while loading or building a [`Scene`](crate::Scene)
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("failed to read scene file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse scene TOML: {0}")]
    Toml(#[from] toml::de::Error),

    /// Reference to a view name that no `[[view]]` entry or helper defines
    #[error("unknown view '{name}'{}", format_suggestions(.suggestions))]
    UnknownView {
        name: String,
        suggestions: Vec<String>,
    },

    #[error("view '{name}' is defined more than once")]
    DuplicateView { name: String },

    /// A superview-relative operation on a view with no parent
    #[error("operation '{op}' needs a superview but view '{view}' has none")]
    MissingSuperview { view: String, op: String },

    #[error("operation '{op}' on view '{view}' needs at least one peer view")]
    EmptyPeers { view: String, op: String },

    #[error("view '{view}' cannot be placed under its own descendant '{parent}'")]
    ParentCycle { view: String, parent: String },
}

impl SceneError {
    /// Create an unknown view error with suggestions
    pub fn unknown(name: impl Into<String>, suggestions: Vec<String>) -> Self {
        Self::UnknownView {
            name: name.into(),
            suggestions,
        }
    }

    pub fn missing_superview(view: impl Into<String>, op: impl Into<String>) -> Self {
        Self::MissingSuperview {
            view: view.into(),
            op: op.into(),
        }
    }
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else {
        format!(" (did you mean {}?)", suggestions.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_view_with_suggestions() {
        let err = SceneError::unknown("crad", vec!["card".to_string()]);
        assert_eq!(err.to_string(), "unknown view 'crad' (did you mean card?)");
    }

    #[test]
    fn test_unknown_view_without_suggestions() {
        let err = SceneError::unknown("zzz", vec![]);
        assert_eq!(err.to_string(), "unknown view 'zzz'");
    }

    #[test]
    fn test_missing_superview_display() {
        let err = SceneError::missing_superview("root", "center-in-superview");
        assert!(err.to_string().contains("'root'"));
        assert!(err.to_string().contains("center-in-superview"));
    }
}
