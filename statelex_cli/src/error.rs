//! Errors surfaced by the command line front end

use statelex::config::RuntimeConfigError;
use statelex::file_processor::FileProcessorError;
use statelex::logging::{codes, Code};
use statelex::{LanguageError, LexerError};

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] RuntimeConfigError),

    #[error(transparent)]
    File(#[from] FileProcessorError),

    #[error(transparent)]
    Language(#[from] LanguageError),

    #[error(transparent)]
    Lexer(#[from] LexerError),

    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),

    #[error("Failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Logging setup failed: {0}")]
    Logging(String),
}

impl CliError {
    pub fn error_code(&self) -> Code {
        match self {
            CliError::Config(e) => e.error_code(),
            CliError::File(e) => e.error_code(),
            CliError::Language(e) => e.error_code(),
            CliError::Lexer(e) => e.error_code(),
            CliError::Output(_) | CliError::Json(_) => codes::system::INTERNAL_ERROR,
            CliError::Logging(_) => codes::system::INITIALIZATION_FAILURE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_pass_through() {
        let error: CliError = LanguageError::UnknownLanguage {
            name: "cobol".to_string(),
        }
        .into();
        assert_eq!(error.error_code().as_str(), "E040");
        assert_eq!(error.to_string(), "Unknown language 'cobol'");

        let error: CliError = FileProcessorError::FileNotFound {
            path: "a.fs".to_string(),
        }
        .into();
        assert_eq!(error.error_code().as_str(), "E005");
    }

    #[test]
    fn test_io_errors_are_internal() {
        let error: CliError = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed").into();
        assert_eq!(error.error_code().as_str(), "ERR001");
    }
}
