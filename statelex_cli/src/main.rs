//! # statelex CLI
//!
//! Tokenizes source files with the bundled language tables.

mod args;
mod error;
mod output;

use args::{Args, LogFormat, OutputFormat};
use clap::Parser;
use error::CliError;
use statelex::config::RuntimeConfig;
use statelex::file_processor::{FileProcessingResult, FileProcessor};
use statelex::logging;
use statelex::tokens::Coalesce;
use statelex::{log_error, log_info, LanguageRegistry, LoadedLanguage, Token};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::time::Instant;

fn main() {
    env_logger::init();
    let args = Args::parse();

    let code = match run(&args) {
        Ok(true) => 0,
        Ok(false) => 1,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("error[{}]: {}", e.error_code().as_str(), e);
            1
        }
    };
    std::process::exit(code);
}

/// Returns whether every file was tokenized
fn run(args: &Args) -> Result<bool, CliError> {
    let mut config = match &args.config {
        Some(path) => RuntimeConfig::from_toml_file(path)?,
        None => RuntimeConfig::default(),
    };
    if args.log_format == LogFormat::Json {
        config.logging.use_structured_logging = true;
    }
    if args.coalesce {
        config.lexical.coalesce_tokens = true;
    }
    log::debug!("runtime configuration: {:?}", config);

    logging::config::init_runtime_preferences(config.logging.clone()).map_err(CliError::Logging)?;
    logging::init_global_logging().map_err(CliError::Logging)?;

    let languages = LanguageRegistry::load()?;
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    if args.list_languages {
        list_languages(&mut out, &languages)?;
        out.flush()?;
        return Ok(true);
    }

    let processor = FileProcessor::from_preferences(&config.file_processor);
    let mut failures = 0usize;

    for (index, path) in args.files.iter().enumerate() {
        logging::set_file_context(path.to_path_buf(), index + 1);
        let outcome = tokenize_file(&mut out, args, &config, &processor, &languages, path);
        logging::clear_file_context();

        if let Err(e) = outcome {
            failures += 1;
            log::warn!("{}: {}", path.display(), e);
            eprintln!("error[{}]: {}: {}", e.error_code().as_str(), path.display(), e);
        }
    }
    out.flush()?;

    let summary = logging::get_processing_summary();
    if logging::config::use_cargo_style_output() && summary.total_errors > 0 {
        if let Some(report) = logging::format_cargo_style_summary() {
            eprint!("{}", report);
        }
    }

    log::info!("{} file(s) processed, {} failed", args.files.len(), failures);
    Ok(failures == 0)
}

fn tokenize_file(
    out: &mut impl Write,
    args: &Args,
    config: &RuntimeConfig,
    processor: &FileProcessor,
    languages: &LanguageRegistry,
    path: &Path,
) -> Result<(), CliError> {
    let start = Instant::now();
    let is_stdin = path == Path::new("-");

    let read = if is_stdin {
        processor.process_reader("<stdin>", io::stdin().lock())?
    } else {
        processor.process_file(path)?
    };
    let language = select_language(args, languages, path, is_stdin)?;
    let label = path.display().to_string();

    log_info!("Tokenizing", "file" => label.as_str(), "language" => language.language.tag);

    let engine = language.engine_with_preferences(config.lexical.clone());
    let mut stream = match &args.state {
        Some(state) => engine.tokenize_from(&read.source, state)?,
        None => engine.tokenize(&read.source),
    };
    let tokens: Vec<Token> = if config.lexical.coalesce_tokens {
        Coalesce::new(&read.source, stream.by_ref()).collect()
    } else {
        stream.by_ref().collect()
    };

    match args.format {
        OutputFormat::Text => output::write_text(out, &read.source, &tokens)?,
        OutputFormat::Json => output::write_json(out, &read.source, &tokens)?,
        OutputFormat::Stats => output::write_stats(
            out,
            &label,
            language.language.tag,
            &tokens,
            stream.metrics(),
        )?,
    }

    log_info!("File tokenized",
        "file" => label.as_str(),
        "tokens" => tokens.len(),
        "duration_ms" => start.elapsed().as_millis(),
        "read_ms" => read_millis(&read)
    );
    Ok(())
}

fn read_millis(read: &FileProcessingResult) -> String {
    format!("{:.2}", read.processing_duration.as_secs_f64() * 1000.0)
}

/// `--lang` wins; otherwise guess from the mimetype and file name
fn select_language<'l>(
    args: &Args,
    languages: &'l LanguageRegistry,
    path: &Path,
    is_stdin: bool,
) -> Result<&'l LoadedLanguage, CliError> {
    if let Some(name) = &args.lang {
        return Ok(languages.get(name)?);
    }
    let filename = (!is_stdin).then_some(path);
    languages
        .guess(filename, args.mimetype.as_deref())
        .map_err(|e| {
            log_error!(e.error_code(), "Pass --lang to choose a language explicitly");
            CliError::from(e)
        })
}

fn list_languages(out: &mut impl Write, languages: &LanguageRegistry) -> io::Result<()> {
    for loaded in languages.languages() {
        let language = &loaded.language;
        writeln!(out, "{} ({})", language.tag, language.title)?;
        writeln!(out, "  {}", language.description)?;
        if !language.aliases.is_empty() {
            writeln!(out, "  aliases:   {}", language.aliases.join(", "))?;
        }
        writeln!(out, "  filenames: {}", language.filenames.join(" "))?;
        writeln!(out, "  mimetypes: {}", language.mimetypes.join(" "))?;
        writeln!(
            out,
            "  states:    {} ({} rules)",
            loaded.states().len(),
            loaded.states().rule_count()
        )?;
    }
    Ok(())
}
