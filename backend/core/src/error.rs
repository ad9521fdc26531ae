use thiserror::Error;

/// Top-level error type for the Pairline gateway.
#[derive(Debug, Error)]
pub enum PairlineError {
    #[error("malformed message: {0}")]
    BadMessage(#[from] serde_json::Error),
}

impl PairlineError {
    /// Short machine-readable code sent back to clients in `error` frames.
    pub fn code(&self) -> &'static str {
        match self {
            PairlineError::BadMessage(_) => "bad_message",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_message_maps_from_serde() {
        let err = serde_json::from_str::<u32>("not a number").unwrap_err();
        let err: PairlineError = err.into();
        assert_eq!(err.code(), "bad_message");
        assert!(err.to_string().starts_with("malformed message"));
    }
}
