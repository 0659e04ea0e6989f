//! Consolidated error codes and classification system
//!
//! Single source of truth for all error codes, their metadata, and classification functions.

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// CODE WRAPPER TYPE
// ============================================================================

/// Universal code wrapper for both error and success codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// ERROR CLASSIFICATION TYPES
// ============================================================================

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

/// Complete metadata for a code
#[derive(Debug, Clone)]
pub struct ErrorMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub recoverable: bool,
    pub requires_halt: bool,
    pub description: &'static str,
    pub recommended_action: &'static str,
}

// ============================================================================
// CODE CONSTANTS
// ============================================================================

/// System error codes
pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
    pub const INITIALIZATION_FAILURE: Code = Code::new("ERR002");
}

/// File processing error codes
pub mod file_processing {
    use super::Code;

    pub const FILE_NOT_FOUND: Code = Code::new("E005");
    pub const INVALID_EXTENSION: Code = Code::new("E006");
    pub const FILE_TOO_LARGE: Code = Code::new("E007");
    pub const EMPTY_FILE: Code = Code::new("E008");
    pub const PERMISSION_DENIED: Code = Code::new("E009");
    pub const INVALID_ENCODING: Code = Code::new("E010");
    pub const IO_ERROR: Code = Code::new("E011");
    pub const INVALID_PATH: Code = Code::new("E012");
}

/// Lexical analysis codes
pub mod lexical {
    use super::Code;

    pub const UNKNOWN_START_STATE: Code = Code::new("E020");

    // Recoverable conditions absorbed by the match loop
    pub const UNMATCHED_INPUT: Code = Code::new("W021");
    pub const STATE_DEPTH_LIMIT: Code = Code::new("W022");
    pub const ZERO_WIDTH_LIMIT: Code = Code::new("W023");
}

/// State registry construction error codes
pub mod registry {
    use super::Code;

    pub const DUPLICATE_STATE: Code = Code::new("E030");
    pub const UNDEFINED_STATE: Code = Code::new("E031");
    pub const MIXIN_CYCLE: Code = Code::new("E032");
    pub const INVALID_PATTERN: Code = Code::new("E033");
    pub const MISSING_ROOT_STATE: Code = Code::new("E034");
    pub const TOO_MANY_STATES: Code = Code::new("E035");
    pub const TOO_MANY_RULES: Code = Code::new("E036");
    pub const INVALID_GROUPS: Code = Code::new("E037");
    pub const MIXIN_TOO_DEEP: Code = Code::new("E038");
}

/// Language lookup error codes
pub mod languages {
    use super::Code;

    pub const UNKNOWN_LANGUAGE: Code = Code::new("E040");
    pub const NO_LANGUAGE_MATCH: Code = Code::new("E041");
    pub const DUPLICATE_LANGUAGE: Code = Code::new("E042");
    pub const INVALID_FILENAME_GLOB: Code = Code::new("E043");
}

/// Runtime configuration error codes
pub mod config {
    use super::Code;

    pub const CONFIG_UNREADABLE: Code = Code::new("E051");
    pub const CONFIG_INVALID: Code = Code::new("E052");
}

// ============================================================================
// SUCCESS CODE CONSTANTS
// ============================================================================

/// Success codes
pub mod success {
    use super::Code;

    pub const OPERATION_COMPLETED_SUCCESSFULLY: Code = Code::new("I001");
    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I004");
    pub const FILE_PROCESSING_SUCCESS: Code = Code::new("I006");
    pub const REGISTRY_BUILT: Code = Code::new("I010");
    pub const LANGUAGES_LOADED: Code = Code::new("I011");
    pub const TOKENIZATION_COMPLETE: Code = Code::new("I020");
}

// ============================================================================
// ERROR METADATA REGISTRY
// ============================================================================

const fn meta(
    code: &'static str,
    category: &'static str,
    severity: Severity,
    recoverable: bool,
    requires_halt: bool,
    description: &'static str,
    recommended_action: &'static str,
) -> ErrorMetadata {
    ErrorMetadata {
        code,
        category,
        severity,
        recoverable,
        requires_halt,
        description,
        recommended_action,
    }
}

const METADATA: &[ErrorMetadata] = &[
    // System
    meta("ERR001", "System", Severity::Critical, false, true,
        "Critical internal system error",
        "File a bug report with the input that triggered it"),
    meta("ERR002", "System", Severity::Critical, false, true,
        "System initialization failure",
        "Check runtime configuration and environment variables"),
    // File processing
    meta("E005", "FileProcessing", Severity::Medium, false, true,
        "Source file does not exist",
        "Check the file path"),
    meta("E006", "FileProcessing", Severity::Low, true, false,
        "File extension is not in the accepted list",
        "Rename the file or widen allowed_extensions"),
    meta("E007", "FileProcessing", Severity::High, false, true,
        "File exceeds the compile-time size or line limit",
        "Split the file or rebuild with a larger limit profile"),
    meta("E008", "FileProcessing", Severity::Low, true, false,
        "File is empty",
        "Disable reject_empty_files to tokenize empty files"),
    meta("E009", "FileProcessing", Severity::High, false, true,
        "Permission denied while reading file",
        "Check file permissions"),
    meta("E010", "FileProcessing", Severity::Medium, false, true,
        "File is not valid UTF-8",
        "Convert the file to UTF-8"),
    meta("E011", "FileProcessing", Severity::High, false, true,
        "I/O error while reading file",
        "Check the file system and retry"),
    meta("E012", "FileProcessing", Severity::Medium, false, true,
        "Path is empty or not a regular file",
        "Pass a path to a regular file"),
    // Lexical
    meta("E020", "Lexical", Severity::Medium, false, true,
        "Requested start state is not defined by the language",
        "Use a state name listed by the language registry"),
    meta("W021", "Lexical", Severity::Low, true, false,
        "Input not matched by any rule was emitted as fallback tokens",
        "Extend the rule table if the input is valid source"),
    meta("W022", "Lexical", Severity::Low, true, false,
        "State stack passed its stored-frame limit; deeper frames are counted only",
        "Check the input for runaway nesting"),
    meta("W023", "Lexical", Severity::Low, true, false,
        "Zero-width stack transitions hit their per-position limit",
        "Check the rule table for zero-width push/pop loops"),
    // Registry
    meta("E030", "Registry", Severity::High, false, true,
        "State defined more than once",
        "Merge the duplicate state definitions"),
    meta("E031", "Registry", Severity::High, false, true,
        "Reference to an undefined state",
        "Define the state or fix the reference"),
    meta("E032", "Registry", Severity::High, false, true,
        "Mixin inclusion forms a cycle",
        "Break the cycle between the listed states"),
    meta("E033", "Registry", Severity::High, false, true,
        "Rule pattern failed to compile",
        "Fix the regular expression syntax"),
    meta("E034", "Registry", Severity::High, false, true,
        "Rule table has no root state",
        "Define a state named root"),
    meta("E035", "Registry", Severity::High, false, true,
        "Rule table defines more states than allowed",
        "Reduce the number of states or raise max_states"),
    meta("E036", "Registry", Severity::High, false, true,
        "Flattened state has more rules than allowed",
        "Reduce mixins or raise max_rules_per_state"),
    meta("E037", "Registry", Severity::High, false, true,
        "Group emission rule lists no groups or a group the pattern lacks",
        "Match the group list to the pattern's capture groups"),
    meta("E038", "Registry", Severity::High, false, true,
        "Mixin nesting exceeds the allowed depth",
        "Flatten the mixin chain or raise max_mixin_depth"),
    // Languages
    meta("E040", "Languages", Severity::Medium, false, true,
        "No language with this tag or alias",
        "List available languages with --list-languages"),
    meta("E041", "Languages", Severity::Medium, true, false,
        "No language matches the file name or mimetype",
        "Pass the language explicitly"),
    meta("E042", "Languages", Severity::High, false, true,
        "Language tag or alias registered twice",
        "Give each language a unique tag and aliases"),
    meta("E043", "Languages", Severity::High, false, true,
        "Language file name glob is malformed",
        "Fix the glob in the language's filenames list"),
    // Config
    meta("E051", "Config", Severity::Medium, false, true,
        "Runtime configuration file could not be read",
        "Check the --config path"),
    meta("E052", "Config", Severity::Medium, false, true,
        "Runtime configuration file is not valid TOML",
        "Fix the configuration syntax"),
    // Success
    meta("I001", "General", Severity::Low, true, false,
        "Operation completed successfully", "None"),
    meta("I004", "System", Severity::Low, true, false,
        "Logging system initialized", "None"),
    meta("I006", "FileProcessing", Severity::Low, true, false,
        "File read successfully", "Continue to tokenization"),
    meta("I010", "Registry", Severity::Low, true, false,
        "State registry built and validated", "Registry ready for tokenization"),
    meta("I011", "Languages", Severity::Low, true, false,
        "Language registry loaded", "None"),
    meta("I020", "Lexical", Severity::Low, true, false,
        "Token stream exhausted", "None"),
];

/// Error metadata registry using OnceLock for thread safety
static ERROR_REGISTRY: OnceLock<HashMap<&'static str, ErrorMetadata>> = OnceLock::new();

fn get_error_registry() -> &'static HashMap<&'static str, ErrorMetadata> {
    ERROR_REGISTRY.get_or_init(|| {
        METADATA
            .iter()
            .map(|metadata| (metadata.code, metadata.clone()))
            .collect()
    })
}

// ============================================================================
// CLASSIFICATION FUNCTIONS
// ============================================================================

/// Get error metadata for a specific code
pub fn get_error_metadata(code: &str) -> Option<&'static ErrorMetadata> {
    get_error_registry().get(code)
}

/// Get error severity from code
pub fn get_severity(code: &str) -> Severity {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.severity)
        .unwrap_or(Severity::Medium)
}

/// Check if error is recoverable
pub fn is_recoverable(code: &str) -> bool {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.recoverable)
        .unwrap_or(true)
}

/// Check if error requires immediate halt
pub fn requires_halt(code: &str) -> bool {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.requires_halt)
        .unwrap_or(false)
}

/// Get human-readable description for code
pub fn get_description(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.description)
        .unwrap_or("Unknown error")
}

/// Get recommended action for code
pub fn get_action(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.recommended_action)
        .unwrap_or("No specific action available")
}

/// Get category from code
pub fn get_category(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.category)
        .unwrap_or("Unknown")
}
