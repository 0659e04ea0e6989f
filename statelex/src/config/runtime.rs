// RUNTIME PREFERENCES (User Experience)

use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

fn env_flag(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProcessorPreferences {
    /// Accepted file extensions without the dot; empty accepts anything
    pub allowed_extensions: Vec<String>,

    /// Whether to enable detailed performance logging
    pub enable_performance_logging: bool,

    /// Whether an empty file is reported as an error instead of yielding no tokens
    pub reject_empty_files: bool,
}

impl Default for FileProcessorPreferences {
    fn default() -> Self {
        Self {
            allowed_extensions: env::var(env_vars::ALLOWED_EXTENSIONS)
                .ok()
                .map(|v| {
                    v.split(',')
                        .map(|ext| ext.trim().trim_start_matches('.').to_lowercase())
                        .filter(|ext| !ext.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            enable_performance_logging: env_flag(env_vars::ENABLE_PERFORMANCE_LOGGING, true),
            reject_empty_files: env_flag(env_vars::REJECT_EMPTY_FILES, false),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LexicalPreferences {
    /// Merge adjacent tokens of the same kind before handing them out
    pub coalesce_tokens: bool,

    /// Whether to keep per-kind token counts in the metrics
    pub collect_kind_counts: bool,

    /// Whether to log a completion event when a stream is exhausted
    pub log_completion: bool,
}

impl Default for LexicalPreferences {
    fn default() -> Self {
        Self {
            coalesce_tokens: env_flag(env_vars::LEXICAL_COALESCE_TOKENS, false),
            collect_kind_counts: env_flag(env_vars::LEXICAL_COLLECT_KIND_COUNTS, true),
            log_completion: env_flag(env_vars::LEXICAL_LOG_COMPLETION, true),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingPreferences {
    /// Whether to use structured JSON logging
    pub use_structured_logging: bool,

    /// Whether to enable console output
    pub enable_console_logging: bool,

    /// Preferred minimum log level (errors and warnings below the
    /// compile-time security level are always kept)
    pub min_log_level: LogLevel,

    /// Whether to include performance metrics in logs
    pub log_performance_events: bool,

    /// Whether to enable cargo-style error reporting
    pub enable_cargo_style_output: bool,

    /// Whether to include file context in log messages
    pub include_file_context: bool,
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        Self {
            use_structured_logging: env_flag(env_vars::LOGGING_USE_STRUCTURED, false),
            enable_console_logging: env_flag(env_vars::LOGGING_ENABLE_CONSOLE, false),
            min_log_level: env::var(env_vars::LOGGING_MIN_LEVEL)
                .ok()
                .and_then(|v| parse_log_level(&v))
                .unwrap_or(LogLevel::Info),
            log_performance_events: env_flag(env_vars::LOGGING_LOG_PERFORMANCE, true),
            enable_cargo_style_output: env_flag(env_vars::LOGGING_CARGO_STYLE, true),
            include_file_context: env_flag(env_vars::LOGGING_INCLUDE_FILE_CONTEXT, true),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error = 0,
    Warning = 1,
    Info = 2,
    Debug = 3,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warning => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }

    /// Convert to events::LogLevel
    pub fn to_events_log_level(&self) -> crate::logging::events::LogLevel {
        match self {
            LogLevel::Error => crate::logging::events::LogLevel::Error,
            LogLevel::Warning => crate::logging::events::LogLevel::Warning,
            LogLevel::Info => crate::logging::events::LogLevel::Info,
            LogLevel::Debug => crate::logging::events::LogLevel::Debug,
        }
    }
}

/// Parse log level from string (used for environment variables and CLI flags)
pub fn parse_log_level(level: &str) -> Option<LogLevel> {
    match level.to_lowercase().as_str() {
        "error" | "0" => Some(LogLevel::Error),
        "warning" | "warn" | "1" => Some(LogLevel::Warning),
        "info" | "2" => Some(LogLevel::Info),
        "debug" | "3" => Some(LogLevel::Debug),
        _ => None,
    }
}

/// Errors raised while loading a runtime configuration file
#[derive(Debug, thiserror::Error)]
pub enum RuntimeConfigError {
    #[error("Cannot read configuration file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl RuntimeConfigError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            RuntimeConfigError::Io { .. } => crate::logging::codes::config::CONFIG_UNREADABLE,
            RuntimeConfigError::Parse { .. } => crate::logging::codes::config::CONFIG_INVALID,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub file_processor: FileProcessorPreferences,
    pub lexical: LexicalPreferences,
    pub logging: LoggingPreferences,
}

impl RuntimeConfig {
    /// Parse a runtime configuration from TOML text; missing sections keep
    /// their environment-derived defaults
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load a runtime configuration file
    pub fn from_toml_file(path: &Path) -> Result<Self, RuntimeConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| RuntimeConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_toml_str(&content).map_err(|source| RuntimeConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Environment variable names for configuration
pub mod env_vars {
    // File Processor
    pub const ALLOWED_EXTENSIONS: &str = "STATELEX_ALLOWED_EXTENSIONS";
    pub const ENABLE_PERFORMANCE_LOGGING: &str = "STATELEX_ENABLE_PERFORMANCE_LOGGING";
    pub const REJECT_EMPTY_FILES: &str = "STATELEX_REJECT_EMPTY_FILES";

    // Lexical
    pub const LEXICAL_COALESCE_TOKENS: &str = "STATELEX_LEXICAL_COALESCE_TOKENS";
    pub const LEXICAL_COLLECT_KIND_COUNTS: &str = "STATELEX_LEXICAL_COLLECT_KIND_COUNTS";
    pub const LEXICAL_LOG_COMPLETION: &str = "STATELEX_LEXICAL_LOG_COMPLETION";

    // Logging
    pub const LOGGING_USE_STRUCTURED: &str = "STATELEX_LOGGING_USE_STRUCTURED";
    pub const LOGGING_ENABLE_CONSOLE: &str = "STATELEX_LOGGING_ENABLE_CONSOLE";
    pub const LOGGING_MIN_LEVEL: &str = "STATELEX_LOGGING_MIN_LEVEL";
    pub const LOGGING_LOG_PERFORMANCE: &str = "STATELEX_LOGGING_LOG_PERFORMANCE";
    pub const LOGGING_CARGO_STYLE: &str = "STATELEX_LOGGING_CARGO_STYLE";
    pub const LOGGING_INCLUDE_FILE_CONTEXT: &str = "STATELEX_LOGGING_INCLUDE_FILE_CONTEXT";
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(parse_log_level("error"), Some(LogLevel::Error));
        assert_eq!(parse_log_level("ERROR"), Some(LogLevel::Error));
        assert_eq!(parse_log_level("0"), Some(LogLevel::Error));
        assert_eq!(parse_log_level("warn"), Some(LogLevel::Warning));
        assert_eq!(parse_log_level("warning"), Some(LogLevel::Warning));
        assert_eq!(parse_log_level("info"), Some(LogLevel::Info));
        assert_eq!(parse_log_level("debug"), Some(LogLevel::Debug));
        assert_eq!(parse_log_level("3"), Some(LogLevel::Debug));
        assert_eq!(parse_log_level("invalid"), None);
    }

    #[test]
    fn test_partial_toml_keeps_other_sections() {
        let config = RuntimeConfig::from_toml_str(
            r#"
            [lexical]
            coalesce_tokens = true

            [logging]
            min_log_level = "debug"
            "#,
        )
        .unwrap();

        assert!(config.lexical.coalesce_tokens);
        assert_eq!(config.logging.min_log_level, LogLevel::Debug);
    }

    #[test]
    fn test_config_file_loading() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[file_processor]\nallowed_extensions = [\"fs\", \"fsx\"]").unwrap();

        let config = RuntimeConfig::from_toml_file(file.path()).unwrap();
        assert_eq!(config.file_processor.allowed_extensions, vec!["fs", "fsx"]);
    }

    #[test]
    fn test_config_file_errors() {
        let missing = RuntimeConfig::from_toml_file(Path::new("/nonexistent/statelex.toml"));
        assert!(matches!(missing, Err(RuntimeConfigError::Io { .. })));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[lexical\ncoalesce_tokens = ").unwrap();
        let broken = RuntimeConfig::from_toml_file(file.path());
        let err = broken.unwrap_err();
        assert_eq!(err.error_code().as_str(), "E052");
    }

    #[test]
    fn test_env_var_names_exist() {
        assert!(env_vars::LOGGING_MIN_LEVEL.starts_with("STATELEX_"));
        assert!(env_vars::LEXICAL_COALESCE_TOKENS.starts_with("STATELEX_"));
    }
}
