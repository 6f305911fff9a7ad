//! Structured errors for front-end consumption
//!
//! Numeric routines never fail: degenerate algebra and geometry are values.
//! Errors only exist at the boundary, where caller input is validated before
//! it reaches the kernel.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Standard error codes (machine-readable)
pub mod codes {
    pub const INVALID_ARGUMENT: &str = "INVALID_ARGUMENT";
    pub const ARG_COUNT: &str = "ARG_COUNT";
    pub const NON_FINITE: &str = "NON_FINITE";
    pub const DEGENERATE_LINE: &str = "DEGENERATE_LINE";
    pub const DEGENERATE_PLANE: &str = "DEGENERATE_PLANE";
    pub const DIMENSION: &str = "DIMENSION";
    pub const UNKNOWN_OP: &str = "UNKNOWN_OP";
    pub const CONFIG: &str = "CONFIG";
    pub const INTERNAL: &str = "INTERNAL";
}

/// Error raised while turning caller input into kernel values
#[derive(Debug, Clone, PartialEq, Error)]
pub enum KernelError {
    #[error("{op}() argument '{arg}': {details}")]
    InvalidArgument {
        op: String,
        arg: String,
        details: String,
    },

    #[error("{op}() missing required argument '{arg}'")]
    MissingArgument { op: String, arg: String },

    #[error("{op}() argument '{arg}' contains a non-finite value")]
    NonFinite { op: String, arg: String },

    #[error("line direction must be non-zero")]
    DegenerateLine,

    #[error("plane normal (a, b, c) must be non-zero")]
    DegeneratePlane,

    #[error("expected a 2×2 or 3×3 matrix, got {rows}×{cols}")]
    Dimension { rows: usize, cols: usize },

    #[error("unknown operation: {name}")]
    UnknownOp {
        name: String,
        similar: Vec<String>,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl KernelError {
    pub fn invalid_argument(op: &str, arg: &str, details: impl Into<String>) -> Self {
        Self::InvalidArgument {
            op: op.to_string(),
            arg: arg.to_string(),
            details: details.into(),
        }
    }

    pub fn missing_argument(op: &str, arg: &str) -> Self {
        Self::MissingArgument {
            op: op.to_string(),
            arg: arg.to_string(),
        }
    }

    pub fn non_finite(op: &str, arg: &str) -> Self {
        Self::NonFinite {
            op: op.to_string(),
            arg: arg.to_string(),
        }
    }

    pub fn unknown_op(name: &str, similar: Vec<String>) -> Self {
        Self::UnknownOp {
            name: name.to_string(),
            similar,
        }
    }

    pub fn config(details: impl Into<String>) -> Self {
        Self::Config(details.into())
    }

    pub fn internal(details: impl Into<String>) -> Self {
        Self::Internal(details.into())
    }

    /// Machine-readable code for this error
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidArgument { .. } => codes::INVALID_ARGUMENT,
            Self::MissingArgument { .. } => codes::ARG_COUNT,
            Self::NonFinite { .. } => codes::NON_FINITE,
            Self::DegenerateLine => codes::DEGENERATE_LINE,
            Self::DegeneratePlane => codes::DEGENERATE_PLANE,
            Self::Dimension { .. } => codes::DIMENSION,
            Self::UnknownOp { .. } => codes::UNKNOWN_OP,
            Self::Config(_) => codes::CONFIG,
            Self::Internal(_) => codes::INTERNAL,
        }
    }

    /// Suggestion for fixing the error, if one applies
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::MissingArgument { op, .. } => {
                Some(format!("Use ops/help with name '{}' for usage", op))
            }
            Self::DegenerateLine => {
                Some("Give the line a direction other than (0, 0, 0)".to_string())
            }
            Self::DegeneratePlane => Some("At least one of a, b, c must be non-zero".to_string()),
            Self::Dimension { .. } => Some("Only 2×2 and 3×3 matrices are supported".to_string()),
            Self::UnknownOp { similar, .. } if !similar.is_empty() => {
                Some(format!("Similar: {}. Use ops/list for full list.", similar.join(", ")))
            }
            Self::UnknownOp { .. } => Some("Use ops/list to see available operations".to_string()),
            Self::Internal(_) => Some("This is a bug, please report it".to_string()),
            _ => None,
        }
    }

    /// Serializable snapshot of this error
    pub fn report(&self) -> ErrorReport {
        ErrorReport {
            code: self.code().to_string(),
            message: self.to_string(),
            suggestion: self.suggestion(),
        }
    }
}

/// Wire form of a [`KernelError`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorReport {
    /// Machine-readable error code
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Suggestion for fixing the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ErrorReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, " (suggestion: {})", suggestion)?;
        }
        Ok(())
    }
}

impl From<serde_json::Error> for KernelError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}
