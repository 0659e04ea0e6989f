//! File processor module with compile-time limits and global logging integration

mod processor;

use crate::config::compile_time::file_processing::{LARGE_FILE_THRESHOLD, MAX_FILE_SIZE};
use crate::config::runtime::FileProcessorPreferences;
use std::path::Path;

pub use processor::{FileMetadata, FileProcessingResult, FileProcessor, FileProcessorError};

/// Read a file with default settings
pub fn process_file(path: &Path) -> Result<FileProcessingResult, FileProcessorError> {
    FileProcessor::new().process_file(path)
}

pub fn create_processor() -> FileProcessor {
    FileProcessor::new()
}

pub fn create_processor_from_preferences(prefs: &FileProcessorPreferences) -> FileProcessor {
    FileProcessor::from_preferences(prefs)
}

/// Compile-time maximum source size in bytes
pub fn get_max_file_size() -> u64 {
    MAX_FILE_SIZE
}

pub fn get_large_file_threshold() -> u64 {
    LARGE_FILE_THRESHOLD
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_module_api() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("Lib.fsi");
        fs::write(&file_path, "module Lib\n").unwrap();

        let result = process_file(&file_path).unwrap();
        assert_eq!(result.metadata.line_count, 1);
    }

    #[test]
    fn test_compile_time_constants_access() {
        assert_eq!(get_max_file_size(), FileProcessor::max_file_size());
        assert_eq!(get_large_file_threshold(), FileProcessor::large_file_threshold());
        assert!(get_large_file_threshold() <= get_max_file_size());
    }

    #[test]
    fn test_create_processor_from_preferences() {
        let prefs = FileProcessorPreferences {
            allowed_extensions: vec!["fs".to_string()],
            enable_performance_logging: true,
            reject_empty_files: false,
        };

        let processor = create_processor_from_preferences(&prefs);
        assert_eq!(processor.allowed_extensions, vec!["fs"]);
        assert!(create_processor().allowed_extensions.is_empty());
    }
}
