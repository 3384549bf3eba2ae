use thiserror::Error;

/// Why a single price source was skipped during the fallback scan.
#[derive(Debug, Clone, PartialEq)]
pub enum FailureReason {
    Transport(String),
    Status(u16),
    UnrecognizedSchema,
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureReason::Transport(e) => write!(f, "transport error: {}", e),
            FailureReason::Status(code) => write!(f, "HTTP status {}", code),
            FailureReason::UnrecognizedSchema => write!(f, "unrecognized response schema"),
        }
    }
}

/// One entry per exhausted price source, kept for diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceFailure {
    pub source: String,
    pub reason: FailureReason,
}

impl std::fmt::Display for SourceFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.source, self.reason)
    }
}

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Historical series unavailable: {0}")]
    SeriesUnavailable(String),

    #[error("All live price sources exhausted ({})", format_failures(.0))]
    PriceSourcesExhausted(Vec<SourceFailure>),
}

fn format_failures(failures: &[SourceFailure]) -> String {
    failures
        .iter()
        .map(|f| f.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exhaustion_error_lists_every_source() {
        let err = EngineError::PriceSourcesExhausted(vec![
            SourceFailure {
                source: "coingecko".to_string(),
                reason: FailureReason::Status(429),
            },
            SourceFailure {
                source: "coinbase".to_string(),
                reason: FailureReason::UnrecognizedSchema,
            },
        ]);
        let msg = err.to_string();
        assert!(msg.contains("coingecko: HTTP status 429"));
        assert!(msg.contains("coinbase: unrecognized response schema"));
    }
}
