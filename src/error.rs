use thiserror::Error;

/// Broad classification of a [`SimError`], used by callers to decide whether
/// the input must be fixed or the requested work reduced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidParameter,
    NumericDegeneracy,
    ResourceExhaustion,
    Cancelled,
}

/// Terminal failure of a projection. No partial results accompany any variant.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    #[error("invalid parameter `{field}`: {reason}")]
    InvalidParameter { field: &'static str, reason: String },

    #[error("numeric degeneracy in `{quantity}` at month {month}: {detail}")]
    NumericDegeneracy {
        quantity: &'static str,
        month: u32,
        detail: String,
    },

    #[error("`{field}` requests {requested} units of work, cap is {cap}")]
    ResourceExhaustion {
        field: &'static str,
        requested: u64,
        cap: u64,
    },

    #[error("projection cancelled before all runs completed")]
    Cancelled,
}

impl SimError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        SimError::InvalidParameter {
            field,
            reason: reason.into(),
        }
    }

    pub fn degenerate(quantity: &'static str, month: u32, detail: impl Into<String>) -> Self {
        SimError::NumericDegeneracy {
            quantity,
            month,
            detail: detail.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            SimError::InvalidParameter { .. } => ErrorKind::InvalidParameter,
            SimError::NumericDegeneracy { .. } => ErrorKind::NumericDegeneracy,
            SimError::ResourceExhaustion { .. } => ErrorKind::ResourceExhaustion,
            SimError::Cancelled => ErrorKind::Cancelled,
        }
    }

    /// The offending field or computed quantity, if the error names one.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            SimError::InvalidParameter { field, .. } => Some(field),
            SimError::NumericDegeneracy { quantity, .. } => Some(quantity),
            SimError::ResourceExhaustion { field, .. } => Some(field),
            SimError::Cancelled => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, SimError>;
