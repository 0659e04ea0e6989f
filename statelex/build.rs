// build.rs - TOML-driven compile-time limit generation
use std::env;
use std::fs;
use std::path::Path;

#[derive(serde::Deserialize)]
struct CompileTimeConfig {
    file_processing: FileProcessingLimits,
    lexical: LexicalLimits,
    registry: RegistryLimits,
    logging: LoggingLimits,
}

#[derive(serde::Deserialize)]
struct FileProcessingLimits {
    max_file_size: u64,
    large_file_threshold: u64,
    max_line_count_for_analysis: usize,
}

#[derive(serde::Deserialize)]
struct LexicalLimits {
    max_state_depth: usize,
    max_zero_width_steps: usize,
    token_buffer_size: usize,
}

#[derive(serde::Deserialize)]
struct RegistryLimits {
    max_states: usize,
    max_rules_per_state: usize,
    max_mixin_depth: usize,
    max_cycle_path_length: usize,
}

#[derive(serde::Deserialize)]
struct LoggingLimits {
    log_buffer_size: usize,
    max_log_message_length: usize,
    max_log_events_per_file: usize,
    security_min_log_level: u8,
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=STATELEX_BUILD_PROFILE");
    println!("cargo:rerun-if-env-changed=STATELEX_CONFIG_DIR");

    let profile =
        env::var("STATELEX_BUILD_PROFILE").unwrap_or_else(|_| "development".to_string());
    let config_dir = env::var("STATELEX_CONFIG_DIR").unwrap_or_else(|_| "config".to_string());

    // Config directory lives at the workspace root, one level above this crate
    let manifest_dir = env::var("CARGO_MANIFEST_DIR")
        .unwrap_or_else(|e| panic!("CARGO_MANIFEST_DIR not set: {}", e));
    let workspace_root = Path::new(&manifest_dir)
        .parent()
        .unwrap_or_else(|| panic!("Could not find workspace root above {}", manifest_dir));

    let config_path = workspace_root
        .join(&config_dir)
        .join(format!("{}.toml", profile));

    println!("cargo:rerun-if-changed={}", config_path.display());

    if !config_path.exists() {
        panic!(
            "Configuration file not found: {}\nWorkspace root: {}\nLooking for: {}/{}/{}.toml",
            config_path.display(),
            workspace_root.display(),
            workspace_root.display(),
            config_dir,
            profile
        );
    }

    let config_content = fs::read_to_string(&config_path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", config_path.display(), e));

    let config: CompileTimeConfig = toml::from_str(&config_content)
        .unwrap_or_else(|e| panic!("Invalid TOML in {}: {}", config_path.display(), e));

    validate_limits(&config, &profile);
    generate_constants(&config, &profile);
}

fn validate_limits(config: &CompileTimeConfig, profile: &str) {
    const ABSOLUTE_MAX_FILE_SIZE: u64 = 1_000_000_000;
    const ABSOLUTE_MAX_STATE_DEPTH: usize = 65_536;

    if config.file_processing.max_file_size > ABSOLUTE_MAX_FILE_SIZE {
        panic!("LIMITS: max_file_size exceeds absolute maximum");
    }

    if config.lexical.max_state_depth == 0 || config.lexical.max_state_depth > ABSOLUTE_MAX_STATE_DEPTH
    {
        panic!("LIMITS: max_state_depth must be between 1 and {}", ABSOLUTE_MAX_STATE_DEPTH);
    }

    if config.lexical.max_zero_width_steps == 0 {
        panic!("LIMITS: max_zero_width_steps must allow at least one stack transition");
    }

    if config.registry.max_states == 0 || config.registry.max_rules_per_state == 0 {
        panic!("LIMITS: registry limits must be non-zero");
    }

    if config.registry.max_cycle_path_length < 2 {
        panic!("LIMITS: max_cycle_path_length must be at least 2");
    }

    if config.logging.security_min_log_level > 2 {
        panic!("LIMITS: security_min_log_level too high (max: 2)");
    }

    if config.logging.max_log_events_per_file > config.logging.log_buffer_size {
        panic!("LIMITS: max_log_events_per_file exceeds log_buffer_size");
    }

    if profile == "production" && config.file_processing.max_file_size > 50_000_000 {
        panic!("PRODUCTION: max_file_size too high for production");
    }
}

fn generate_constants(config: &CompileTimeConfig, profile: &str) {
    let out_dir = env::var("OUT_DIR").unwrap_or_else(|e| panic!("OUT_DIR not set: {}", e));
    let output_path = Path::new(&out_dir).join("constants.rs");

    let constants_code = format!(
        r#"
// Generated compile-time constants from TOML configuration
// Profile: {}
// DO NOT EDIT - Generated by build.rs

pub mod compile_time {{
    pub const PROFILE: &str = "{}";

    pub mod file_processing {{
        pub const MAX_FILE_SIZE: u64 = {};
        pub const LARGE_FILE_THRESHOLD: u64 = {};
        pub const MAX_LINE_COUNT_FOR_ANALYSIS: usize = {};
    }}

    pub mod lexical {{
        pub const MAX_STATE_DEPTH: usize = {};
        pub const MAX_ZERO_WIDTH_STEPS: usize = {};
        pub const TOKEN_BUFFER_SIZE: usize = {};
    }}

    pub mod registry {{
        pub const MAX_STATES: usize = {};
        pub const MAX_RULES_PER_STATE: usize = {};
        pub const MAX_MIXIN_DEPTH: usize = {};
        pub const MAX_CYCLE_PATH_LENGTH: usize = {};
    }}

    pub mod logging {{
        pub const LOG_BUFFER_SIZE: usize = {};
        pub const MAX_LOG_MESSAGE_LENGTH: usize = {};
        pub const MAX_LOG_EVENTS_PER_FILE: usize = {};
        pub const SECURITY_MIN_LOG_LEVEL: u8 = {};
    }}
}}
"#,
        profile,
        profile,
        // File Processing
        config.file_processing.max_file_size,
        config.file_processing.large_file_threshold,
        config.file_processing.max_line_count_for_analysis,
        // Lexical
        config.lexical.max_state_depth,
        config.lexical.max_zero_width_steps,
        config.lexical.token_buffer_size,
        // Registry
        config.registry.max_states,
        config.registry.max_rules_per_state,
        config.registry.max_mixin_depth,
        config.registry.max_cycle_path_length,
        // Logging
        config.logging.log_buffer_size,
        config.logging.max_log_message_length,
        config.logging.max_log_events_per_file,
        config.logging.security_min_log_level,
    );

    fs::write(&output_path, constants_code)
        .unwrap_or_else(|e| panic!("Failed to write {}: {}", output_path.display(), e));
}
