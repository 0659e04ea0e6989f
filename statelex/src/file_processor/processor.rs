//! Source reading with compile-time limits and global logging integration

use crate::config::compile_time::file_processing::{
    LARGE_FILE_THRESHOLD, MAX_FILE_SIZE, MAX_LINE_COUNT_FOR_ANALYSIS,
};
use crate::config::runtime::FileProcessorPreferences;
use crate::logging::{self, codes};
use crate::{log_debug, log_error, log_performance, log_success};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant, SystemTime};

/// File processor specific errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum FileProcessorError {
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Invalid file extension {extension:?}, expected one of: {}", .allowed.join(", "))]
    InvalidExtension {
        extension: Option<String>,
        allowed: Vec<String>,
    },

    #[error("File too large: {size} bytes (max: {max_size})")]
    FileTooLarge { size: u64, max_size: u64 },

    #[error("File is empty: {path}")]
    EmptyFile { path: String },

    #[error("Permission denied: {path}")]
    PermissionDenied { path: String },

    #[error("Invalid UTF-8 encoding in {path} at byte {valid_up_to}")]
    InvalidEncoding { path: String, valid_up_to: usize },

    #[error("I/O error reading {path}: {message}")]
    IoError { path: String, message: String },

    #[error("Invalid file path: {path}")]
    InvalidPath { path: String },

    #[error("File exceeds maximum line count: {lines} (max: {max_lines})")]
    TooManyLines { lines: usize, max_lines: usize },
}

impl FileProcessorError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            FileProcessorError::FileNotFound { .. } => codes::file_processing::FILE_NOT_FOUND,
            FileProcessorError::InvalidExtension { .. } => {
                codes::file_processing::INVALID_EXTENSION
            }
            FileProcessorError::FileTooLarge { .. } => codes::file_processing::FILE_TOO_LARGE,
            FileProcessorError::EmptyFile { .. } => codes::file_processing::EMPTY_FILE,
            FileProcessorError::PermissionDenied { .. } => {
                codes::file_processing::PERMISSION_DENIED
            }
            FileProcessorError::InvalidEncoding { .. } => codes::file_processing::INVALID_ENCODING,
            FileProcessorError::IoError { .. } => codes::file_processing::IO_ERROR,
            FileProcessorError::InvalidPath { .. } => codes::file_processing::INVALID_PATH,
            FileProcessorError::TooManyLines { .. } => codes::file_processing::FILE_TOO_LARGE,
        }
    }

    pub fn requires_halt(&self) -> bool {
        codes::requires_halt(self.error_code().as_str())
    }

    pub fn severity(&self) -> &'static str {
        codes::get_severity(self.error_code().as_str()).as_str()
    }

    pub fn category(&self) -> &'static str {
        codes::get_category(self.error_code().as_str())
    }

    pub fn is_recoverable(&self) -> bool {
        codes::is_recoverable(self.error_code().as_str())
    }

    fn from_io(path: &str, error: &std::io::Error) -> Self {
        match error.kind() {
            std::io::ErrorKind::NotFound => FileProcessorError::FileNotFound {
                path: path.to_string(),
            },
            std::io::ErrorKind::PermissionDenied => FileProcessorError::PermissionDenied {
                path: path.to_string(),
            },
            _ => FileProcessorError::IoError {
                path: path.to_string(),
                message: error.to_string(),
            },
        }
    }
}

/// Metadata collected while reading a source
#[derive(Debug, Clone)]
pub struct FileMetadata {
    /// Canonical path, or the label given for a stream such as stdin
    pub path: PathBuf,
    pub size: u64,
    pub extension: Option<String>,
    pub line_count: usize,
    pub char_count: usize,
    pub modified: Option<SystemTime>,
}

impl FileMetadata {
    pub fn human_readable_size(&self) -> String {
        human_readable(self.size)
    }

    /// Above the compile-time large file threshold
    pub fn is_large_file(&self) -> bool {
        self.size > LARGE_FILE_THRESHOLD
    }
}

fn human_readable(size: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
    let mut scaled = size as f64;
    let mut unit_index = 0;

    while scaled >= 1024.0 && unit_index < UNITS.len() - 1 {
        scaled /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", size, UNITS[0])
    } else {
        format!("{:.2} {}", scaled, UNITS[unit_index])
    }
}

/// Source text and what was learned while reading it
#[derive(Debug, Clone)]
pub struct FileProcessingResult {
    pub source: String,
    pub metadata: FileMetadata,
    pub processing_duration: Duration,
}

impl FileProcessingResult {
    /// Only whitespace, or nothing at all
    pub fn is_effectively_empty(&self) -> bool {
        self.source.trim().is_empty()
    }

    /// Characters per millisecond
    pub fn processing_rate(&self) -> f64 {
        let duration_ms = self.processing_duration.as_secs_f64() * 1000.0;
        if duration_ms > 0.0 {
            self.metadata.char_count as f64 / duration_ms
        } else {
            0.0
        }
    }
}

/// Reads sources under the compile-time limits and runtime preferences
#[derive(Debug, Clone, Default)]
pub struct FileProcessor {
    /// Lowercase extensions without the dot; empty accepts anything
    pub allowed_extensions: Vec<String>,
    pub enable_performance_logging: bool,
    pub reject_empty_files: bool,
}

impl FileProcessor {
    pub fn new() -> Self {
        Self {
            allowed_extensions: Vec::new(),
            enable_performance_logging: true,
            reject_empty_files: false,
        }
    }

    pub fn from_preferences(prefs: &FileProcessorPreferences) -> Self {
        Self {
            allowed_extensions: prefs
                .allowed_extensions
                .iter()
                .map(|ext| ext.trim_start_matches('.').to_lowercase())
                .collect(),
            enable_performance_logging: prefs.enable_performance_logging,
            reject_empty_files: prefs.reject_empty_files,
        }
    }

    pub fn with_allowed_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.allowed_extensions = extensions
            .into_iter()
            .map(|ext| ext.as_ref().trim_start_matches('.').to_lowercase())
            .collect();
        self
    }

    pub fn with_performance_logging(mut self, enabled: bool) -> Self {
        self.enable_performance_logging = enabled;
        self
    }

    pub fn with_empty_files_rejected(mut self, rejected: bool) -> Self {
        self.reject_empty_files = rejected;
        self
    }

    pub fn max_file_size() -> u64 {
        MAX_FILE_SIZE
    }

    pub fn large_file_threshold() -> u64 {
        LARGE_FILE_THRESHOLD
    }

    /// Read a file from disk
    pub fn process_file(&self, path: &Path) -> Result<FileProcessingResult, FileProcessorError> {
        let start_time = Instant::now();
        let label = path.display().to_string();

        log_debug!("Starting file processing", "file" => label.as_str());

        let path = self.validate_path(path, &label)?;
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase);
        self.check_extension(extension.as_deref(), &label)?;

        let disk = fs::metadata(&path).map_err(|e| self.io_failure(&label, &e))?;
        check_size(disk.len(), &label)?;

        let file = fs::File::open(&path).map_err(|e| self.io_failure(&label, &e))?;
        let source = self.read_limited(file, &label)?;

        let metadata = FileMetadata {
            path,
            size: source.len() as u64,
            extension,
            line_count: 0,
            char_count: 0,
            modified: disk.modified().ok(),
        };
        self.finish(source, metadata, start_time, &label)
    }

    /// Read an already-open stream, such as stdin
    pub fn process_reader<R: Read>(
        &self,
        label: &str,
        reader: R,
    ) -> Result<FileProcessingResult, FileProcessorError> {
        let start_time = Instant::now();
        let source = self.read_limited(reader, label)?;

        let metadata = FileMetadata {
            path: PathBuf::from(label),
            size: source.len() as u64,
            extension: None,
            line_count: 0,
            char_count: 0,
            modified: None,
        };
        self.finish(source, metadata, start_time, label)
    }

    fn validate_path(&self, path: &Path, label: &str) -> Result<PathBuf, FileProcessorError> {
        if path.as_os_str().is_empty() {
            let error = FileProcessorError::InvalidPath {
                path: label.to_string(),
            };
            log_error!(error.error_code(), "Empty file path provided");
            return Err(error);
        }

        if !path.exists() {
            let error = FileProcessorError::FileNotFound {
                path: label.to_string(),
            };
            log_error!(error.error_code(), "File not found", "path" => label);
            return Err(error);
        }

        if !path.is_file() {
            let error = FileProcessorError::InvalidPath {
                path: label.to_string(),
            };
            log_error!(error.error_code(), "Path is not a file", "path" => label);
            return Err(error);
        }

        path.canonicalize().map_err(|e| self.io_failure(label, &e))
    }

    fn check_extension(
        &self,
        extension: Option<&str>,
        label: &str,
    ) -> Result<(), FileProcessorError> {
        if self.allowed_extensions.is_empty()
            || extension.is_some_and(|ext| self.allowed_extensions.iter().any(|a| a == ext))
        {
            return Ok(());
        }

        let error = FileProcessorError::InvalidExtension {
            extension: extension.map(str::to_string),
            allowed: self.allowed_extensions.clone(),
        };
        let allowed = self.allowed_extensions.join(",");
        log_error!(error.error_code(), "File extension not accepted",
            "file" => label,
            "extension" => extension.unwrap_or("none"),
            "allowed" => allowed.as_str()
        );
        Err(error)
    }

    /// Read at most one byte past the limit so oversized streams are caught
    fn read_limited<R: Read>(&self, reader: R, label: &str) -> Result<String, FileProcessorError> {
        let mut bytes = Vec::new();
        reader
            .take(MAX_FILE_SIZE + 1)
            .read_to_end(&mut bytes)
            .map_err(|e| self.io_failure(label, &e))?;
        check_size(bytes.len() as u64, label)?;

        String::from_utf8(bytes).map_err(|e| {
            let error = FileProcessorError::InvalidEncoding {
                path: label.to_string(),
                valid_up_to: e.utf8_error().valid_up_to(),
            };
            log_error!(error.error_code(), "Invalid UTF-8 encoding", "file" => label);
            error
        })
    }

    fn finish(
        &self,
        source: String,
        mut metadata: FileMetadata,
        start_time: Instant,
        label: &str,
    ) -> Result<FileProcessingResult, FileProcessorError> {
        if source.is_empty() && self.reject_empty_files {
            let error = FileProcessorError::EmptyFile {
                path: label.to_string(),
            };
            log_error!(error.error_code(), "File is empty", "file" => label);
            return Err(error);
        }

        metadata.line_count = source.lines().count();
        if metadata.line_count > MAX_LINE_COUNT_FOR_ANALYSIS {
            let error = FileProcessorError::TooManyLines {
                lines: metadata.line_count,
                max_lines: MAX_LINE_COUNT_FOR_ANALYSIS,
            };
            log_error!(error.error_code(), "File exceeds maximum line count",
                "file" => label,
                "lines" => metadata.line_count,
                "max_lines" => MAX_LINE_COUNT_FOR_ANALYSIS
            );
            return Err(error);
        }
        metadata.char_count = source.chars().count();

        let result = FileProcessingResult {
            source,
            metadata,
            processing_duration: start_time.elapsed(),
        };
        self.log_processing_success(&result, label);
        Ok(result)
    }

    fn log_processing_success(&self, result: &FileProcessingResult, label: &str) {
        if self.enable_performance_logging && logging::config::log_performance_events() {
            let rate = format!("{:.2}", result.processing_rate());
            log_performance!(
                codes::success::FILE_PROCESSING_SUCCESS,
                "File read with performance metrics",
                duration = result.processing_duration,
                "file" => label,
                "size_bytes" => result.metadata.size,
                "size_human" => result.metadata.human_readable_size(),
                "lines" => result.metadata.line_count,
                "chars" => result.metadata.char_count,
                "chars_per_ms" => rate.as_str(),
                "is_large_file" => result.metadata.is_large_file()
            );
        } else {
            log_success!(
                codes::success::FILE_PROCESSING_SUCCESS,
                "File read",
                "file" => label,
                "size_bytes" => result.metadata.size,
                "lines" => result.metadata.line_count
            );
        }
    }

    fn io_failure(&self, label: &str, error: &std::io::Error) -> FileProcessorError {
        let failure = FileProcessorError::from_io(label, error);
        let io_error = error.to_string();
        log_error!(failure.error_code(), "Failed to read source",
            "file" => label,
            "io_error" => io_error.as_str()
        );
        failure
    }
}

fn check_size(size: u64, label: &str) -> Result<(), FileProcessorError> {
    if size <= MAX_FILE_SIZE {
        return Ok(());
    }
    let error = FileProcessorError::FileTooLarge {
        size,
        max_size: MAX_FILE_SIZE,
    };
    log_error!(error.error_code(), "Source exceeds compile-time maximum size",
        "file" => label,
        "size_human" => human_readable(size),
        "limit_human" => human_readable(MAX_FILE_SIZE)
    );
    Err(error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::io::Cursor;
    use tempfile::tempdir;

    #[test]
    fn test_process_valid_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("Program.fs");
        let content = "let x = 1\nlet π = 3.14\n";
        fs::write(&file_path, content).unwrap();

        let result = FileProcessor::new().process_file(&file_path).unwrap();

        assert_eq!(result.source, content);
        assert_eq!(result.metadata.line_count, 2);
        assert_eq!(result.metadata.char_count, content.chars().count());
        assert_eq!(result.metadata.size, content.len() as u64);
        assert_eq!(result.metadata.extension.as_deref(), Some("fs"));
        assert!(result.metadata.path.is_absolute());
        assert!(!result.is_effectively_empty());
    }

    #[test]
    fn test_file_not_found() {
        let dir = tempdir().unwrap();
        let result = FileProcessor::new().process_file(&dir.path().join("missing.fs"));

        assert_matches!(result, Err(FileProcessorError::FileNotFound { .. }));
    }

    #[test]
    fn test_directory_is_invalid_path() {
        let dir = tempdir().unwrap();
        let result = FileProcessor::new().process_file(dir.path());

        assert_matches!(result, Err(FileProcessorError::InvalidPath { .. }));
    }

    #[test]
    fn test_extension_filter() {
        let dir = tempdir().unwrap();
        let accepted = dir.path().join("Script.FSX");
        let rejected = dir.path().join("notes.txt");
        fs::write(&accepted, "printfn \"hi\"").unwrap();
        fs::write(&rejected, "hi").unwrap();

        let processor = FileProcessor::new().with_allowed_extensions([".fs", "fsx"]);

        assert!(processor.process_file(&accepted).is_ok());
        assert_matches!(
            processor.process_file(&rejected),
            Err(FileProcessorError::InvalidExtension { extension: Some(ext), .. }) if ext == "txt"
        );
    }

    #[test]
    fn test_empty_file_policy() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("empty.fs");
        fs::write(&file_path, "").unwrap();

        let lenient = FileProcessor::new().process_file(&file_path).unwrap();
        assert!(lenient.source.is_empty());
        assert_eq!(lenient.metadata.line_count, 0);

        let strict = FileProcessor::new().with_empty_files_rejected(true);
        assert_matches!(
            strict.process_file(&file_path),
            Err(FileProcessorError::EmptyFile { .. })
        );
    }

    #[test]
    fn test_invalid_utf8_is_reported() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("latin1.fs");
        fs::write(&file_path, b"let s = \"caf\xe9\"").unwrap();

        let result = FileProcessor::new().process_file(&file_path);
        assert_matches!(
            result,
            Err(FileProcessorError::InvalidEncoding { valid_up_to: 12, .. })
        );
    }

    #[test]
    fn test_oversized_reader_is_rejected() {
        let oversized = Cursor::new(vec![b'a'; (MAX_FILE_SIZE + 1) as usize]);
        let result = FileProcessor::new().process_reader("<stdin>", oversized);

        assert_matches!(
            result,
            Err(FileProcessorError::FileTooLarge { size, max_size })
                if size == MAX_FILE_SIZE + 1 && max_size == MAX_FILE_SIZE
        );
    }

    #[test]
    fn test_process_reader() {
        let result = FileProcessor::new()
            .with_performance_logging(false)
            .process_reader("<stdin>", Cursor::new("(* hi *)\n"))
            .unwrap();

        assert_eq!(result.metadata.path, PathBuf::from("<stdin>"));
        assert_eq!(result.metadata.extension, None);
        assert_eq!(result.metadata.line_count, 1);
        assert!(result.processing_rate() >= 0.0);
    }

    #[test]
    fn test_performance_logging_reports_timed_read() {
        let processor = FileProcessor::new().with_performance_logging(true);
        assert!(processor.enable_performance_logging);

        let result = processor
            .process_reader("timed.fs", Cursor::new("let x = 1\nlet y = 2\n"))
            .unwrap();

        assert_eq!(result.metadata.line_count, 2);
        assert_eq!(result.metadata.char_count, 20);
        assert!(!result.metadata.is_large_file());
    }

    #[test]
    fn test_from_preferences_normalizes_extensions() {
        let prefs = FileProcessorPreferences {
            allowed_extensions: vec![".FS".to_string(), "fsi".to_string()],
            enable_performance_logging: false,
            reject_empty_files: true,
        };

        let processor = FileProcessor::from_preferences(&prefs);
        assert_eq!(processor.allowed_extensions, vec!["fs", "fsi"]);
        assert!(!processor.enable_performance_logging);
        assert!(processor.reject_empty_files);
    }

    #[test]
    fn test_error_methods() {
        let error = FileProcessorError::FileNotFound {
            path: "missing.fs".to_string(),
        };

        assert_eq!(error.error_code().as_str(), "E005");
        assert_eq!(error.category(), "FileProcessing");
        assert!(!error.is_recoverable());
        assert!(error.requires_halt());

        let lines = FileProcessorError::TooManyLines {
            lines: 10,
            max_lines: 5,
        };
        assert_eq!(lines.error_code().as_str(), "E007");
    }

    #[test]
    fn test_human_readable_size() {
        assert_eq!(human_readable(512), "512 B");
        assert_eq!(human_readable(2048), "2.00 KB");
        assert_eq!(human_readable(3 * 1024 * 1024), "3.00 MB");
    }
}
