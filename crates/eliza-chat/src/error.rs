//! Error types for the conversation engine.

use eliza_core::error::ElizaError;

/// Errors from the chat engine.
///
/// Only searches and startup data can fail; everything else on the
/// controller is total.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("invalid search pattern: {0}")]
    InvalidPattern(String),
    #[error("unknown search strategy: {0}")]
    UnknownStrategy(String),
    #[error("response data error: {0}")]
    ResponseData(String),
}

impl From<ElizaError> for ChatError {
    fn from(err: ElizaError) -> Self {
        ChatError::ResponseData(err.to_string())
    }
}

impl From<regex::Error> for ChatError {
    fn from(err: regex::Error) -> Self {
        ChatError::InvalidPattern(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_error_display() {
        let err = ChatError::InvalidPattern("unclosed class".to_string());
        assert_eq!(err.to_string(), "invalid search pattern: unclosed class");

        let err = ChatError::UnknownStrategy("fuzzy".to_string());
        assert_eq!(err.to_string(), "unknown search strategy: fuzzy");

        let err = ChatError::ResponseData("empty pool".to_string());
        assert_eq!(err.to_string(), "response data error: empty pool");
    }

    #[test]
    fn test_chat_error_from_eliza_error() {
        let core_err = ElizaError::ResponseData("verbs.json missing".to_string());
        let chat_err: ChatError = core_err.into();
        assert!(matches!(chat_err, ChatError::ResponseData(_)));
        assert!(chat_err.to_string().contains("verbs.json missing"));
    }

    #[test]
    fn test_chat_error_from_regex_error() {
        let regex_err = regex::Regex::new("[").unwrap_err();
        let chat_err: ChatError = regex_err.into();
        assert!(matches!(chat_err, ChatError::InvalidPattern(_)));
    }

    #[test]
    fn test_errors_implement_debug() {
        let dbg = format!("{:?}", ChatError::UnknownStrategy("x".into()));
        assert!(dbg.contains("UnknownStrategy"));
    }
}
