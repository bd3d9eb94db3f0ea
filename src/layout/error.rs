//! Error types for the layout engine

use thiserror::Error;

use super::constraint::ConstraintId;

/// A constraint the solver refused to install or remove
///
/// These never abort a layout pass. The engine logs them and keeps the rest of
/// the system solvable.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("unable to satisfy {description}: conflicts with existing constraints")]
    Unsatisfiable {
        constraint: ConstraintId,
        description: String,
    },

    #[error("duplicate constraint: {description}")]
    Duplicate {
        constraint: ConstraintId,
        description: String,
    },

    #[error("internal solver error for {description}: {message}")]
    Internal {
        constraint: ConstraintId,
        description: String,
        message: String,
    },
}

impl EngineError {
    pub fn unsatisfiable(constraint: ConstraintId, description: impl Into<String>) -> Self {
        Self::Unsatisfiable {
            constraint,
            description: description.into(),
        }
    }

    pub fn duplicate(constraint: ConstraintId, description: impl Into<String>) -> Self {
        Self::Duplicate {
            constraint,
            description: description.into(),
        }
    }

    pub fn internal(
        constraint: ConstraintId,
        description: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Internal {
            constraint,
            description: description.into(),
            message: message.into(),
        }
    }

    /// The constraint the error is about
    pub fn constraint(&self) -> ConstraintId {
        match self {
            Self::Unsatisfiable { constraint, .. }
            | Self::Duplicate { constraint, .. }
            | Self::Internal { constraint, .. } => *constraint,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsatisfiable_display() {
        let err = EngineError::unsatisfiable(ConstraintId(3), "v1.width == 10");
        assert!(err.to_string().contains("v1.width == 10"));
        assert!(err.to_string().contains("conflicts"));
        assert_eq!(err.constraint(), ConstraintId(3));
    }

    #[test]
    fn test_internal_display() {
        let err = EngineError::internal(ConstraintId(0), "v0.top == 0", "boom");
        assert!(err.to_string().contains("boom"));
    }
}
