use serde::Serialize;
use std::fmt;

/// Outcome of a RAG answer request.
///
/// Generation failures are carried here instead of being returned as an
/// error, so the boundary always has displayable text. The `Display` form of
/// `Failed` is the `Error communicating with <oracle>: <detail>` string that
/// clients pattern-match on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Answer {
    Generated { text: String },
    Failed { oracle: String, detail: String },
}

impl Answer {
    pub fn generated(text: impl Into<String>) -> Self {
        Self::Generated { text: text.into() }
    }

    pub fn failed(oracle: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Failed {
            oracle: oracle.into(),
            detail: detail.into(),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// The text a caller would display: the generated answer, or the error string.
    pub fn into_text(self) -> String {
        match self {
            Self::Generated { text } => text,
            failed => failed.to_string(),
        }
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Generated { text } => f.write_str(text),
            Self::Failed { oracle, detail } => {
                write!(f, "Error communicating with {oracle}: {detail}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_display_form() {
        let answer = Answer::failed("Ollama", "connection refused");
        assert!(answer.is_failed());
        assert_eq!(
            answer.into_text(),
            "Error communicating with Ollama: connection refused"
        );
    }

    #[test]
    fn test_generated_passthrough() {
        let answer = Answer::generated("Data Analyst");
        assert!(!answer.is_failed());
        assert_eq!(answer.to_string(), "Data Analyst");
    }
}
