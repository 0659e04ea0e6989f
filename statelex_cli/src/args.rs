//! Command line arguments

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "statelex",
    about = "Tokenize source files with the bundled statelex language tables",
    version,
    after_help = "\
Examples:
  statelex src/Program.fs                  Tokens with line:col positions
  statelex --format json --coalesce a.fsx  Merged tokens as JSON
  cat Lib.fsi | statelex --lang f# -       Read from stdin
  statelex --list-languages                Show bundled languages"
)]
pub struct Args {
    /// Source files; `-` reads stdin
    #[arg(required_unless_present = "list_languages")]
    pub files: Vec<PathBuf>,

    /// Language tag or alias; guessed from the file name when omitted
    #[arg(long)]
    pub lang: Option<String>,

    /// Mimetype used to guess the language
    #[arg(long)]
    pub mimetype: Option<String>,

    /// State to start in instead of the language's root state
    #[arg(long)]
    pub state: Option<String>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Merge adjacent tokens of the same kind
    #[arg(long)]
    pub coalesce: bool,

    /// Runtime configuration file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Print the bundled languages and exit
    #[arg(long)]
    pub list_languages: bool,

    #[arg(long, value_enum, default_value_t = LogFormat::Console)]
    pub log_format: LogFormat,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// `line:col  Kind  "text"` per token
    Text,
    /// JSON array of tokens
    Json,
    /// Per-kind counts and lexer metrics
    Stats,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Console,
    Json,
}
