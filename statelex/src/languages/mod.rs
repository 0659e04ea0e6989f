//! Bundled language tables and language selection
//!
//! [`LanguageRegistry::load`] compiles every bundled table once. Lookups by
//! tag, alias, file name or mimetype only pick a table; they never touch the
//! match loop.

pub mod fsharp;

use crate::config::runtime::LexicalPreferences;
use crate::lexical::LexerEngine;
use crate::logging::codes;
use crate::registry::{RegistryError, RegistryResult, StateRegistry};
use crate::{log_debug, log_error, log_success};
use glob::{MatchOptions, Pattern, PatternError};
use std::collections::HashSet;
use std::path::Path;

/// Static description of a bundled language
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct Language {
    pub tag: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub aliases: &'static [&'static str],
    /// Shell globs over the final path component, e.g. `*.fs` or `*.[fF]s`
    pub filenames: &'static [&'static str],
    pub mimetypes: &'static [&'static str],
}

impl Language {
    /// Case-insensitive match on the tag or any alias
    pub fn answers_to(&self, name: &str) -> bool {
        self.tag.eq_ignore_ascii_case(name)
            || self.aliases.iter().any(|alias| alias.eq_ignore_ascii_case(name))
    }

    pub fn matches_mimetype(&self, mimetype: &str) -> bool {
        let mimetype = mimetype.split(';').next().unwrap_or_default().trim();
        self.mimetypes
            .iter()
            .any(|known| known.eq_ignore_ascii_case(mimetype))
    }
}

/// Builds one language's compiled table
pub type TableFn = fn() -> RegistryResult<StateRegistry>;

const BUNDLED: &[(Language, TableFn)] = &[(fsharp::LANGUAGE, fsharp::registry)];

/// Language selection errors
#[derive(Debug, thiserror::Error)]
pub enum LanguageError {
    #[error("Unknown language '{name}'")]
    UnknownLanguage { name: String },

    #[error("No language matches {}", describe_query(.filename.as_deref(), .mimetype.as_deref()))]
    NoLanguageMatch {
        filename: Option<String>,
        mimetype: Option<String>,
    },

    #[error("Language name '{name}' is claimed by both '{first}' and '{second}'")]
    DuplicateLanguage {
        name: String,
        first: String,
        second: String,
    },

    #[error("File name glob '{glob}' of '{language}' is invalid: {source}")]
    InvalidFilenameGlob {
        language: String,
        glob: String,
        #[source]
        source: PatternError,
    },

    #[error("Rule table for '{language}' is invalid: {source}")]
    InvalidTable {
        language: String,
        #[source]
        source: RegistryError,
    },
}

fn describe_query(filename: Option<&str>, mimetype: Option<&str>) -> String {
    match (filename, mimetype) {
        (Some(filename), Some(mimetype)) => format!("file '{}' or mimetype '{}'", filename, mimetype),
        (Some(filename), None) => format!("file '{}'", filename),
        (None, Some(mimetype)) => format!("mimetype '{}'", mimetype),
        (None, None) => "an empty query".to_string(),
    }
}

impl LanguageError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            LanguageError::UnknownLanguage { .. } => codes::languages::UNKNOWN_LANGUAGE,
            LanguageError::NoLanguageMatch { .. } => codes::languages::NO_LANGUAGE_MATCH,
            LanguageError::DuplicateLanguage { .. } => codes::languages::DUPLICATE_LANGUAGE,
            LanguageError::InvalidFilenameGlob { .. } => codes::languages::INVALID_FILENAME_GLOB,
            LanguageError::InvalidTable { source, .. } => source.error_code(),
        }
    }
}

/// File names are matched case-sensitively and `*` may not cross a separator
const FILENAME_MATCH: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// A language together with its compiled table and file globs
#[derive(Debug)]
pub struct LoadedLanguage {
    pub language: Language,
    globs: Vec<Pattern>,
    states: StateRegistry,
}

impl LoadedLanguage {
    /// Whether the final component of `path` matches one of the file globs
    pub fn matches_filename(&self, path: &Path) -> bool {
        let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
            return false;
        };
        self.globs
            .iter()
            .any(|glob| glob.matches_with(name, FILENAME_MATCH))
    }


    pub fn states(&self) -> &StateRegistry {
        &self.states
    }

    pub fn engine(&self) -> LexerEngine<'_> {
        LexerEngine::new(&self.states)
    }

    pub fn engine_with_preferences(&self, preferences: LexicalPreferences) -> LexerEngine<'_> {
        LexerEngine::with_preferences(&self.states, preferences)
    }
}

/// Every bundled language, compiled
#[derive(Debug)]
pub struct LanguageRegistry {
    languages: Vec<LoadedLanguage>,
}

impl LanguageRegistry {
    /// Compile all bundled tables
    pub fn load() -> Result<Self, LanguageError> {
        let mut registry = Self {
            languages: Vec::with_capacity(BUNDLED.len()),
        };
        for (language, table) in BUNDLED {
            registry.register(*language, *table)?;
        }

        let count = registry.languages.len().to_string();
        let tags = registry.tags().collect::<Vec<_>>().join(",");
        log_success!(codes::success::LANGUAGES_LOADED, "Language tables loaded",
            "count" => count.as_str(),
            "languages" => tags.as_str()
        );
        Ok(registry)
    }

    /// Add a language built from `table`; tags and aliases must stay unique
    pub fn register(&mut self, language: Language, table: TableFn) -> Result<(), LanguageError> {
        let mut claimed = HashSet::new();
        for name in std::iter::once(language.tag).chain(language.aliases.iter().copied()) {
            let key = name.to_lowercase();
            let first = if let Some(loaded) = self.find(&key) {
                Some(loaded.language.tag)
            } else if !claimed.insert(key) {
                Some(language.tag)
            } else {
                None
            };
            if let Some(first) = first {
                let error = LanguageError::DuplicateLanguage {
                    name: name.to_string(),
                    first: first.to_string(),
                    second: language.tag.to_string(),
                };
                log_error!(error.error_code(), "Language name already registered",
                    "name" => name,
                    "language" => language.tag
                );
                return Err(error);
            }
        }

        let globs = compile_globs(&language)?;
        let states = table().map_err(|source| {
            let error = LanguageError::InvalidTable {
                language: language.tag.to_string(),
                source,
            };
            let reason = error.to_string();
            log_error!(error.error_code(), "Rule table failed to build",
                "language" => language.tag,
                "reason" => reason.as_str()
            );
            error
        })?;

        log_debug!("Language registered", "language" => language.tag);
        self.languages.push(LoadedLanguage {
            language,
            globs,
            states,
        });
        Ok(())
    }

    pub fn languages(&self) -> impl Iterator<Item = &LoadedLanguage> {
        self.languages.iter()
    }

    pub fn tags(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.languages.iter().map(|loaded| loaded.language.tag)
    }

    pub fn len(&self) -> usize {
        self.languages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }

    /// Look up by tag or alias, ignoring case
    pub fn find(&self, name: &str) -> Option<&LoadedLanguage> {
        self.languages
            .iter()
            .find(|loaded| loaded.language.answers_to(name))
    }

    /// Like [`find`](Self::find), reporting a miss as an error
    pub fn get(&self, name: &str) -> Result<&LoadedLanguage, LanguageError> {
        self.find(name).ok_or_else(|| {
            let error = LanguageError::UnknownLanguage {
                name: name.to_string(),
            };
            log_error!(error.error_code(), "Unknown language requested", "name" => name);
            error
        })
    }

    pub fn for_filename(&self, path: &Path) -> Option<&LoadedLanguage> {
        self.languages
            .iter()
            .find(|loaded| loaded.matches_filename(path))
    }

    pub fn for_mimetype(&self, mimetype: &str) -> Option<&LoadedLanguage> {
        self.languages
            .iter()
            .find(|loaded| loaded.language.matches_mimetype(mimetype))
    }

    /// Pick a language from a mimetype, then a file name
    pub fn guess(
        &self,
        filename: Option<&Path>,
        mimetype: Option<&str>,
    ) -> Result<&LoadedLanguage, LanguageError> {
        let by_mimetype = mimetype.and_then(|mime| self.for_mimetype(mime));
        if let Some(found) = by_mimetype.or_else(|| filename.and_then(|path| self.for_filename(path)))
        {
            return Ok(found);
        }

        let error = LanguageError::NoLanguageMatch {
            filename: filename.map(|path| path.display().to_string()),
            mimetype: mimetype.map(str::to_string),
        };
        let query = error.to_string();
        log_error!(error.error_code(), "Could not guess a language", "query" => query.as_str());
        Err(error)
    }
}

fn compile_globs(language: &Language) -> Result<Vec<Pattern>, LanguageError> {
    language
        .filenames
        .iter()
        .map(|glob| {
            Pattern::new(glob).map_err(|source| {
                let error = LanguageError::InvalidFilenameGlob {
                    language: language.tag.to_string(),
                    glob: glob.to_string(),
                    source,
                };
                log_error!(error.error_code(), "File name glob failed to compile",
                    "language" => language.tag,
                    "glob" => glob
                );
                error
            })
        })
        .collect()
}
