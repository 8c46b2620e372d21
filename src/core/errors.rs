use thiserror::Error;

#[derive(Error, Debug)]
pub enum GengoError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Service error: {0}")]
    Service(String),

    #[error("Malformed model response: {0}")]
    MalformedResponse(String),

    #[error("The model returned an empty response")]
    EmptyResponse,

    #[error("Failed to load history snapshot: {0}")]
    PersistenceLoad(String),

    #[error("Failed to save history snapshot: {0}")]
    PersistenceSave(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("A request is already in progress")]
    Busy,

    #[error("No record matches '{0}'")]
    NotFound(String),

    #[error("'{0}' matches more than one record")]
    AmbiguousId(String),

    #[error("I/O error: {0}")]
    Io(Box<std::io::Error>),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(Box<csv::Error>),
}

impl GengoError {
    /// Short message suitable for the notice line of the interface.
    pub fn user_message(&self) -> String {
        match self {
            GengoError::Configuration(msg) => {
                format!("The model is not configured: {msg}. Set GEMINI_API_KEY and retry.")
            }
            GengoError::Service(_) => {
                "The model service could not be reached. Please try again.".to_string()
            }
            GengoError::MalformedResponse(_) => {
                "The model returned an unexpected answer. Please try again.".to_string()
            }
            GengoError::EmptyResponse => {
                "The model did not return an answer. Please try again.".to_string()
            }
            GengoError::PersistenceSave(_) => {
                "Your history could not be saved. Nothing was changed.".to_string()
            }
            GengoError::Busy => "Please wait for the current request to finish.".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<std::io::Error> for GengoError {
    fn from(error: std::io::Error) -> Self {
        GengoError::Io(Box::new(error))
    }
}

impl From<reqwest::Error> for GengoError {
    fn from(error: reqwest::Error) -> Self {
        GengoError::Service(error.to_string())
    }
}

impl From<csv::Error> for GengoError {
    fn from(error: csv::Error) -> Self {
        GengoError::Csv(Box::new(error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: GengoError = io_err.into();
        assert!(matches!(err, GengoError::Io(_)));
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn test_user_message_hides_service_details() {
        let err = GengoError::Service("HTTP 503 from https://example.test".to_string());
        let msg = err.user_message();
        assert!(!msg.contains("503"));
        assert!(msg.contains("try again"));
    }

    #[test]
    fn test_user_message_passes_through_input_errors() {
        let err = GengoError::InvalidInput("sentence is empty".to_string());
        assert_eq!(err.user_message(), "Invalid input: sentence is empty");
    }
}
