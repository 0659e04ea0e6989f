//! Token renderers for the three output formats

use crate::error::CliError;
use serde::Serialize;
use statelex::tokens::count_kinds;
use statelex::utils::SourceMap;
use statelex::{LexicalMetrics, Token, TokenKind};
use std::io::Write;

#[derive(Debug, Serialize)]
struct TokenRecord<'a> {
    kind: TokenKind,
    short: &'static str,
    offset: usize,
    line: u32,
    column: u32,
    text: &'a str,
}

/// One line per token: `line:col  Kind  "text"`
pub fn write_text(out: &mut impl Write, source: &str, tokens: &[Token<'_>]) -> std::io::Result<()> {
    let map = SourceMap::new(source);
    for token in tokens {
        let position = map.position_at(token.offset);
        writeln!(out, "{}  {}  {:?}", position, token.kind, token.text)?;
    }
    Ok(())
}

/// A JSON array of tokens with positions
pub fn write_json(
    out: &mut impl Write,
    source: &str,
    tokens: &[Token<'_>],
) -> Result<(), CliError> {
    let map = SourceMap::new(source);
    let records: Vec<TokenRecord> = tokens
        .iter()
        .map(|token| {
            let position = map.position_at(token.offset);
            TokenRecord {
                kind: token.kind,
                short: token.kind.short_name(),
                offset: token.offset,
                line: position.line,
                column: position.column,
                text: token.text,
            }
        })
        .collect();

    serde_json::to_writer_pretty(&mut *out, &records)?;
    writeln!(out)?;
    Ok(())
}

pub fn write_stats(
    out: &mut impl Write,
    label: &str,
    language: &str,
    tokens: &[Token<'_>],
    metrics: &LexicalMetrics,
) -> std::io::Result<()> {
    writeln!(out, "{} ({})", label, language)?;
    writeln!(out, "  tokens emitted:         {}", metrics.total_tokens)?;
    writeln!(out, "  tokens after merging:   {}", tokens.len())?;
    writeln!(out, "  unmatched characters:   {}", metrics.fallback_tokens)?;
    writeln!(out, "  max stack depth:        {}", metrics.max_stack_depth)?;
    writeln!(out, "  zero-width transitions: {}", metrics.zero_width_transitions)?;
    writeln!(out, "  overflow pushes:        {}", metrics.overflow_pushes)?;

    writeln!(out, "  by kind:")?;
    for (kind, count) in count_kinds(tokens.iter().copied()) {
        writeln!(out, "    {:<28} {}", kind.qualified_name(), count)?;
    }
    Ok(())
}
