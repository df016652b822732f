use thiserror::Error;

/// Per-cycle extraction failure taxonomy.
///
/// `NotFound` and `Malformed` are expected outcomes of scraping a page that
/// moves under us; both degrade the sensor to NOT_FOUND until the next poll.
/// `Ambiguous` means the tracked identifier matched neither (or both) sides
/// of a discovered match and almost always indicates a misconfigured team id,
/// so it is surfaced separately instead of being folded into NOT_FOUND.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("element not found: {context}")]
    NotFound { context: &'static str },

    #[error("malformed {context}: {detail}")]
    Malformed {
        context: &'static str,
        detail: String,
    },

    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("cannot attribute sides for tracked team '{tracked}' (saw '{left}' and '{right}')")]
    Ambiguous {
        tracked: String,
        left: String,
        right: String,
    },
}

impl ExtractError {
    pub fn not_found(context: &'static str) -> Self {
        ExtractError::NotFound { context }
    }

    pub fn malformed(context: &'static str, detail: impl Into<String>) -> Self {
        ExtractError::Malformed {
            context,
            detail: detail.into(),
        }
    }

    /// True for failures that are part of normal operation (no match listed,
    /// markup drift) rather than misconfiguration or infrastructure trouble.
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            ExtractError::NotFound { .. } | ExtractError::Malformed { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, ExtractError>;
