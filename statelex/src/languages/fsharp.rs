//! F# rule table
//!
//! Word lists are folded into alternations when the table is built. The
//! operator table is escaped and sorted longest first so `<@@` wins over
//! `<@` and `<`.

use super::Language;
use crate::registry::{RegistryResult, StateRegistry};
use crate::rules::RuleDef;

pub const LANGUAGE: Language = Language {
    tag: "fsharp",
    title: "F#",
    description: "a functional language for .NET",
    aliases: &["f#"],
    filenames: &["*.fs", "*.fsi", "*.fsx"],
    mimetypes: &["application/fsharp-script", "text/x-fsharp", "text/x-fsi"],
};

const KEYWORDS: &[&str] = &[
    "abstract", "as", "assert", "base", "begin", "class", "default", "delegate", "do", "done",
    "downcast", "downto", "elif", "else", "end", "exception", "extern", "false", "finally", "for",
    "function", "fun", "global", "if", "inherit", "inline", "interface", "internal", "in", "lazy",
    "let", "match", "member", "module", "mutable", "namespace", "new", "null", "of", "open",
    "override", "private", "public", "rec", "return", "select", "static", "struct", "then", "to",
    "true", "try", "type", "upcast", "use", "val", "void", "when", "while", "with", "yield",
    // reserved for future use
    "atomic", "break", "checked", "component", "const", "constraint", "constructor", "continue",
    "eager", "event", "external", "fixed", "functor", "include", "method", "mixin", "object",
    "parallel", "process", "protected", "pure", "sealed", "tailcall", "trait", "virtual",
    "volatile",
];

/// Computation-expression forms (`let!`, `yield!`, ...)
const BANG_KEYWORDS: &[&str] = &["do", "let", "return", "use", "yield"];

const KEYOPTS: &[&str] = &[
    "!=", "#", "&&", "&", "(", ")", "*", "+", ",", "-.", "->", "-", "..", ".", "::", ":=", ":>",
    ":", ";;", ";", "<-", "<]", "<", ">]", ">", "??", "?", "[<", "[|", "[", "]", "`", "{", "|]",
    "|", "}", "~", "<@@", "<@", "=", "@>", "@@>",
];

const OPERATORS: &str = r"[!$%&*+\./:<=>?@^|~-]";
const PREFIX_SYMS: &str = r"[!?~]";
const INFIX_SYMS: &str = r"[=<>@^|&+\*/$%-]";
const WORD_OPERATORS: &[&str] = &["and", "or", "not"];

const PRIMITIVES: &[&str] = &[
    "sbyte", "byte", "char", "nativeint", "unativeint", "float32", "single", "float", "double",
    "int8", "uint8", "int16", "uint16", "int32", "uint32", "int64", "uint64", "decimal", "unit",
    "bool", "string", "list", "exn", "obj", "enum",
];

/// `(?:a|b|c)\b`, to be used with a `\w` preceding-character guard
fn words(list: &[&str]) -> String {
    format!(r"(?:{})\b", list.join("|"))
}

fn keyopts() -> String {
    let mut sorted = KEYOPTS.to_vec();
    sorted.sort_by_key(|op| std::cmp::Reverse(op.len()));
    let escaped: Vec<String> = sorted.iter().map(|op| regex::escape(op)).collect();
    escaped.join("|")
}

/// Build the compiled F# state table
pub fn registry() -> RegistryResult<StateRegistry> {
    use crate::tokens::TokenKind::*;

    StateRegistry::builder(LANGUAGE.tag)
        .state("escape-sequence", |s| {
            s.rule(RuleDef::new(r#"\\[\\"'ntbrafv]"#, StringEscape))
                .rule(RuleDef::new(r"\\[0-9]{3}", StringEscape))
                .rule(RuleDef::new(r"\\u[0-9a-fA-F]{4}", StringEscape))
                .rule(RuleDef::new(r"\\U[0-9a-fA-F]{8}", StringEscape))
        })
        .state("root", |s| {
            s.rule(RuleDef::new(r"\s+", Text))
                .rule(RuleDef::new(r"\(\)|\[\]", NameBuiltinPseudo))
                .rule(
                    RuleDef::new(r"[A-Z][\w']*", NameNamespace)
                        .not_preceded_by(r"[\w.]")
                        .followed_by(r"\s*\.")
                        .push("dotted"),
                )
                .rule(RuleDef::new(r"[A-Z][\w']*", Name).not_preceded_by(r"\w"))
                .rule(RuleDef::new(r"///[^\n]*\n?", StringDoc))
                .rule(RuleDef::new(r"//[^\n]*\n?", CommentSingle))
                .rule(
                    RuleDef::new(r"\(\*", Comment)
                        .not_followed_by(r"\)")
                        .push("comment"),
                )
                .rule(RuleDef::new(r#"@""#, String).push("lstring"))
                .rule(RuleDef::new(r#"""""#, String).push("tqs"))
                .rule(RuleDef::new(r#"""#, String).push("string"))
                .rule(
                    RuleDef::groups(r"(open|module)(\s+)([\w.]+)", &[Keyword, Text, NameNamespace])
                        .not_preceded_by(r"\w"),
                )
                .rule(
                    RuleDef::groups(r"(let!?)(\s+)(\w+)", &[Keyword, Text, NameVariable])
                        .not_preceded_by(r"\w"),
                )
                .rule(
                    RuleDef::groups(r"(type)(\s+)(\w+)", &[Keyword, Text, NameClass])
                        .not_preceded_by(r"\w"),
                )
                .rule(
                    RuleDef::groups(
                        r"(member|override)(\s+)(\w+)(\.)(\w+)",
                        &[Keyword, Text, Name, Punctuation, NameFunction],
                    )
                    .not_preceded_by(r"\w"),
                )
                .rule(
                    RuleDef::new(format!("(?:{})!", BANG_KEYWORDS.join("|")), Keyword)
                        .not_preceded_by(r"\w"),
                )
                .rule(RuleDef::new(words(KEYWORDS), Keyword).not_preceded_by(r"\w"))
                .rule(RuleDef::new(r"``([^`\n\r\t]|`[^`\n\r\t])+``", Name))
                .rule(RuleDef::new(
                    r"#[ \t]*(?:if|endif|else|line|nowarn|light|[0-9]+)\b[^\n]*\n?",
                    CommentPreproc,
                ))
                .rule(RuleDef::new(r"[~?][a-z][\w']*:", NameVariable))
                .rule(RuleDef::new("_", Operator).not_followed_by(r"[\w']"))
                .rule(RuleDef::new(keyopts(), Operator))
                .rule(RuleDef::new(
                    format!("(?:{}|{})?{}", INFIX_SYMS, PREFIX_SYMS, OPERATORS),
                    Operator,
                ))
                .rule(RuleDef::new(words(WORD_OPERATORS), OperatorWord).not_preceded_by(r"\w"))
                .rule(RuleDef::new(words(PRIMITIVES), KeywordType).not_preceded_by(r"\w"))
                .rule(RuleDef::new(r"[^\W0-9][\w']*", Name))
                .rule(
                    RuleDef::new(
                        r"[0-9][0-9_]*(?:\.[0-9_]*(?:[eE][+\-]?[0-9][0-9_]*)?|[eE][+\-]?[0-9][0-9_]*)[fFmM]?",
                        NumberFloat,
                    )
                    .not_followed_by(r"\."),
                )
                .rule(RuleDef::new(
                    r"0[xX][0-9a-fA-F][0-9a-fA-F_]*[uU]?[yslLn]?[fF]?",
                    NumberHex,
                ))
                .rule(RuleDef::new(r"0[oO][0-7][0-7_]*[uU]?[yslLn]?", NumberOct))
                .rule(RuleDef::new(r"0[bB][01][01_]*[uU]?[yslLn]?", NumberBin))
                .rule(RuleDef::new(r"[0-9][0-9_]*[uU]?[yslLnQRZINGmM]?", NumberInteger))
                .rule(RuleDef::new(
                    r#"'(?:\\[\\"'ntbr ]|\\[0-9]{3}|\\x[0-9a-fA-F]{2})'B?"#,
                    StringChar,
                ))
                .rule(RuleDef::new(r"'.'", StringChar))
                .rule(RuleDef::new("'", Keyword))
        })
        .state("dotted", |s| {
            s.rule(RuleDef::new(r"\s+", Text))
                .rule(RuleDef::new(r"\.", Punctuation))
                .rule(RuleDef::new(r"[A-Z][\w']*", NameNamespace).followed_by(r"\s*\."))
                .rule(RuleDef::new(r"[A-Z][\w']*", Name).pop())
                .rule(RuleDef::new(r"[a-z_][\w']*", Name).pop())
                .rule(RuleDef::silent("").pop())
        })
        .state("comment", |s| {
            s.rule(RuleDef::new(r#"[^(*)@"]+"#, Comment))
                .rule(RuleDef::new(r"\(\*", Comment).push_current())
                .rule(RuleDef::new(r"\*\)", Comment).pop())
                .rule(RuleDef::new(r#"@""#, String).push("lstring"))
                .rule(RuleDef::new(r#"""""#, String).push("tqs"))
                .rule(RuleDef::new(r#"""#, String).push("string"))
                .rule(RuleDef::new(r"[(*)@]", Comment))
                .fallback(Comment)
        })
        .state("string", |s| {
            s.rule(RuleDef::new(r#"[^\\"]+"#, String))
                .mixin("escape-sequence")
                .rule(RuleDef::new(r"\\\n", String))
                .rule(RuleDef::new(r"\n", String))
                .rule(RuleDef::new(r#""B?"#, String).pop())
        })
        .state("lstring", |s| {
            s.rule(RuleDef::new(r#"[^"]+"#, String))
                .rule(RuleDef::new(r"\n", String))
                .rule(RuleDef::new(r#""""#, String))
                .rule(RuleDef::new(r#""B?"#, String).pop())
        })
        .state("tqs", |s| {
            s.rule(RuleDef::new(r#"[^"]+"#, String))
                .rule(RuleDef::new(r"\n", String))
                .rule(RuleDef::new(r#""""B?"#, String).pop())
                .rule(RuleDef::new(r#"""#, String))
        })
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexical::LexerEngine;
    use crate::tokens::TokenKind::*;
    use crate::tokens::{Coalesce, Token, TokenKind};
    use std::sync::Arc;

    fn fsharp() -> StateRegistry {
        registry().unwrap()
    }

    fn lex(registry: &StateRegistry, input: &str) -> Vec<(TokenKind, std::string::String)> {
        LexerEngine::new(registry)
            .tokenize(input)
            .coalesce()
            .map(|t| (t.kind, t.text.to_string()))
            .collect()
    }

    fn pairs(expected: &[(TokenKind, &str)]) -> Vec<(TokenKind, std::string::String)> {
        expected.iter().map(|(k, t)| (*k, t.to_string())).collect()
    }

    #[test]
    fn test_table_builds() {
        let registry = fsharp();
        assert_eq!(registry.language(), "fsharp");
        assert_eq!(registry.len(), 7);
        for name in ["escape-sequence", "root", "dotted", "comment", "string", "lstring", "tqs"] {
            assert!(registry.state_id(name).is_some(), "missing state {}", name);
        }
    }

    #[test]
    fn test_string_state_splices_escape_rules() {
        let registry = fsharp();
        let string = registry.state(registry.state_id("string").unwrap());
        // own rules plus the four escape rules
        assert_eq!(string.len(), 8);
        assert_eq!(string.rules[1].pattern.as_str(), r#"^(?:\\[\\"'ntbrafv])"#);
    }

    #[test]
    fn test_let_binding() {
        let registry = fsharp();
        assert_eq!(
            lex(&registry, "let x = 1"),
            pairs(&[
                (Keyword, "let"),
                (Text, " "),
                (NameVariable, "x"),
                (Text, " "),
                (Operator, "="),
                (Text, " "),
                (NumberInteger, "1"),
            ])
        );
    }

    #[test]
    fn test_nested_comment_is_one_region() {
        let registry = fsharp();
        let input = "(* outer (* inner *) still outer *)";
        let mut stream = LexerEngine::new(&registry).tokenize(input);
        let tokens: Vec<Token> = stream.by_ref().collect();

        assert!(tokens.iter().all(|t| t.kind == Comment));
        assert_eq!(stream.context().depth(), 1);
        assert_eq!(lex(&registry, input), pairs(&[(Comment, input)]));
    }

    #[test]
    fn test_comment_nested_past_depth_limit_stays_one_region() {
        let registry = fsharp();
        let levels = crate::config::compile_time::lexical::MAX_STATE_DEPTH + 44;
        let comment = format!("{}x{}", "(* ".repeat(levels), " *)".repeat(levels));
        let input = format!("{} y", comment);
        let mut stream = LexerEngine::new(&registry).tokenize(&input);
        let tokens: Vec<Token> = Coalesce::new(&input, stream.by_ref()).collect();

        assert_eq!(stream.context().depth(), 1);
        assert_eq!(stream.metrics().overflow_pushes, 45);
        assert_eq!(
            tokens.iter().map(|t| (t.kind, t.text)).collect::<Vec<_>>(),
            vec![(Comment, comment.as_str()), (Text, " "), (Name, "y")]
        );
    }

    #[test]
    fn test_verbatim_string_keeps_backslashes() {
        let registry = fsharp();
        assert_eq!(
            lex(&registry, r#"@"C:\path""#),
            pairs(&[(String, r#"@"C:\path""#)])
        );
    }

    #[test]
    fn test_triple_quoted_string() {
        let registry = fsharp();
        assert_eq!(
            lex(&registry, r#""""a""""#),
            pairs(&[(String, r#""""a""""#)])
        );
        assert_eq!(
            lex(&registry, r#""""say "hi" """"#),
            pairs(&[(String, r#""""say "hi" """"#)])
        );
    }

    #[test]
    fn test_unmatched_character_is_one_error_token() {
        let registry = fsharp();
        let tokens: Vec<_> = LexerEngine::new(&registry)
            .tokenize("§")
            .map(|t| (t.kind, t.text))
            .collect();
        assert_eq!(tokens, vec![(Error, "§")]);
    }

    #[test]
    fn test_qualified_name() {
        let registry = fsharp();
        let mut stream = LexerEngine::new(&registry).tokenize("Foo.Bar.baz");
        let tokens: Vec<_> = stream.by_ref().map(|t| (t.kind, t.text)).collect();

        assert_eq!(
            tokens,
            vec![
                (NameNamespace, "Foo"),
                (Punctuation, "."),
                (NameNamespace, "Bar"),
                (Punctuation, "."),
                (Name, "baz"),
            ]
        );
        assert_eq!(stream.context().depth(), 1);
    }

    #[test]
    fn test_dotted_state_pops_without_a_name() {
        let registry = fsharp();
        let mut stream = LexerEngine::new(&registry).tokenize("List. 1");
        let kinds: Vec<_> = stream.by_ref().map(|t| t.kind).collect();

        assert_eq!(kinds, vec![NameNamespace, Punctuation, Text, NumberInteger]);
        assert_eq!(stream.context().depth(), 1);
    }

    #[test]
    fn test_escaped_string() {
        let registry = fsharp();
        let tokens: Vec<_> = LexerEngine::new(&registry)
            .tokenize(r#""a\n\u0041\101b""#)
            .map(|t| (t.kind, t.text))
            .collect();

        assert_eq!(
            tokens,
            vec![
                (String, "\""),
                (String, "a"),
                (StringEscape, r"\n"),
                (StringEscape, r"\u0041"),
                (StringEscape, r"\101"),
                (String, "b"),
                (String, "\""),
            ]
        );
    }

    #[test]
    fn test_long_unicode_escape() {
        let registry = fsharp();
        let tokens: Vec<_> = LexerEngine::new(&registry)
            .tokenize(r#""\U0001F600!""#)
            .map(|t| (t.kind, t.text))
            .collect();

        assert_eq!(
            tokens,
            vec![
                (String, "\""),
                (StringEscape, r"\U0001F600"),
                (String, "!"),
                (String, "\""),
            ]
        );
    }

    #[test]
    fn test_newlines_inside_escaped_string() {
        let registry = fsharp();
        let mut stream = LexerEngine::new(&registry).tokenize("\"one\\\ntwo\nthree\" x");
        let tokens: Vec<_> = stream.by_ref().map(|t| (t.kind, t.text)).collect();

        assert_eq!(
            tokens,
            vec![
                (String, "\""),
                (String, "one"),
                (String, "\\\n"),
                (String, "two\nthree"),
                (String, "\""),
                (Text, " "),
                (Name, "x"),
            ]
        );
        assert_eq!(stream.context().depth(), 1);
    }

    #[test]
    fn test_verbatim_string_doubled_quote() {
        let registry = fsharp();
        let mut stream = LexerEngine::new(&registry).tokenize(r#"@"say ""hi""" x"#);
        let tokens: Vec<_> = stream.by_ref().map(|t| (t.kind, t.text)).collect();

        assert_eq!(
            tokens,
            vec![
                (String, "@\""),
                (String, "say "),
                (String, "\"\""),
                (String, "hi"),
                (String, "\"\""),
                (String, "\""),
                (Text, " "),
                (Name, "x"),
            ]
        );
        assert_eq!(stream.context().depth(), 1);
    }

    #[test]
    fn test_numbers_are_ascii_digits() {
        let registry = fsharp();
        assert_eq!(lex(&registry, "x٣"), pairs(&[(Name, "x٣")]));
        assert_eq!(lex(&registry, "٣"), pairs(&[(Name, "٣")]));
        assert_eq!(lex(&registry, "12"), pairs(&[(NumberInteger, "12")]));
    }

    #[test]
    fn test_declaration_groups() {
        let registry = fsharp();
        assert_eq!(
            lex(&registry, "open System.IO"),
            pairs(&[(Keyword, "open"), (Text, " "), (NameNamespace, "System.IO")])
        );
        assert_eq!(
            lex(&registry, "type Shape"),
            pairs(&[(Keyword, "type"), (Text, " "), (NameClass, "Shape")])
        );
        assert_eq!(
            lex(&registry, "member this.Area"),
            pairs(&[
                (Keyword, "member"),
                (Text, " "),
                (Name, "this"),
                (Punctuation, "."),
                (NameFunction, "Area"),
            ])
        );
    }

    #[test]
    fn test_keywords_respect_word_boundaries() {
        let registry = fsharp();
        assert_eq!(lex(&registry, "inner"), pairs(&[(Name, "inner")]));
        assert_eq!(lex(&registry, "int"), pairs(&[(Name, "int")]));
        assert_eq!(lex(&registry, "x_in"), pairs(&[(Name, "x_in")]));
        assert_eq!(
            lex(&registry, "yield! xs"),
            pairs(&[(Keyword, "yield!"), (Text, " "), (Name, "xs")])
        );
    }

    #[test]
    fn test_primitives_and_word_operators() {
        let registry = fsharp();
        assert_eq!(
            lex(&registry, "float32 not"),
            pairs(&[(KeywordType, "float32"), (Text, " "), (OperatorWord, "not")])
        );
    }

    #[test]
    fn test_numeric_literals_reach_their_kinds() {
        let registry = fsharp();
        let cases = [
            ("0x1F", NumberHex),
            ("0o17", NumberOct),
            ("0b1010", NumberBin),
            ("3.14", NumberFloat),
            ("1e10", NumberFloat),
            ("2.5e-3f", NumberFloat),
            ("42L", NumberInteger),
            ("1_000", NumberInteger),
        ];
        for (input, kind) in cases {
            assert_eq!(lex(&registry, input), pairs(&[(kind, input)]), "{}", input);
        }
    }

    #[test]
    fn test_range_is_not_a_float() {
        let registry = fsharp();
        assert_eq!(
            lex(&registry, "1..10"),
            pairs(&[(NumberInteger, "1"), (Operator, ".."), (NumberInteger, "10")])
        );
    }

    #[test]
    fn test_operators_prefer_longest_symbol() {
        let registry = fsharp();
        assert_eq!(lex(&registry, "<@@"), pairs(&[(Operator, "<@@")]));
        assert_eq!(lex(&registry, "->"), pairs(&[(Operator, "->")]));
        assert_eq!(
            lex(&registry, "a :: b"),
            pairs(&[
                (Name, "a"),
                (Text, " "),
                (Operator, "::"),
                (Text, " "),
                (Name, "b"),
            ])
        );
    }

    #[test]
    fn test_underscore_wildcard_and_identifier() {
        let registry = fsharp();
        assert_eq!(lex(&registry, "_"), pairs(&[(Operator, "_")]));
        assert_eq!(lex(&registry, "_tmp"), pairs(&[(Name, "_tmp")]));
    }

    #[test]
    fn test_comments_and_directives() {
        let registry = fsharp();
        assert_eq!(
            lex(&registry, "/// doc\n// note\n#if DEBUG\n"),
            pairs(&[
                (StringDoc, "/// doc\n"),
                (CommentSingle, "// note\n"),
                (CommentPreproc, "#if DEBUG\n"),
            ])
        );
        assert_eq!(lex(&registry, "// eof"), pairs(&[(CommentSingle, "// eof")]));
    }

    #[test]
    fn test_unit_is_not_a_comment() {
        let registry = fsharp();
        assert_eq!(lex(&registry, "()"), pairs(&[(NameBuiltinPseudo, "()")]));
        let kinds: Vec<_> = LexerEngine::new(&registry)
            .tokenize("(*)")
            .map(|t| t.kind)
            .collect();
        assert!(!kinds.contains(&Comment));
    }

    #[test]
    fn test_char_literals_and_generic_tick() {
        let registry = fsharp();
        assert_eq!(lex(&registry, r"'\n'"), pairs(&[(StringChar, r"'\n'")]));
        assert_eq!(lex(&registry, "'a'"), pairs(&[(StringChar, "'a'")]));
        assert_eq!(lex(&registry, "'T"), pairs(&[(Keyword, "'"), (Name, "T")]));
    }

    #[test]
    fn test_string_inside_comment_hides_closer() {
        let registry = fsharp();
        let mut stream = LexerEngine::new(&registry).tokenize(r#"(* "*)" *) x"#);
        let tokens: Vec<_> = stream.by_ref().collect();

        assert_eq!(tokens.last().map(|t| (t.kind, t.text)), Some((Name, "x")));
        assert_eq!(stream.context().depth(), 1);
    }

    #[test]
    fn test_round_trip_on_adversarial_input() {
        let registry = fsharp();
        let inputs = [
            "",
            "(*",
            "(* (* *)",
            "\"unterminated",
            "@\"",
            "\"\"\"",
            "\"\\q\"",
            "'",
            "``",
            "Foo.",
            "Foo. .",
            "§¶\u{1F600}\r\n\t",
            "let! x = async { return! y }",
            "0x 0b2 1.e 1e+",
            "#line 10 \"file.fs\"",
            "~?:><@@@>|]}",
        ];
        for input in inputs {
            let engine = LexerEngine::new(&registry);
            assert_eq!(engine.tokenize(input).collect_text(), input, "{:?}", input);
        }
    }

    #[test]
    fn test_sample_program_balances_and_covers() {
        let registry = fsharp();
        let source = r#"
module Geometry.Shapes

open System

/// A shape
type Shape =
    | Circle of radius: float
    | Square of side: float

let area shape =
    match shape with
    | Circle r -> Math.PI * r ** 2.0
    | Square s -> s * s (* nested (* comment *) here *)

let greeting = @"C:\temp" + """raw "text" """ + "tab\t"
"#;
        let mut stream = LexerEngine::new(&registry).tokenize(source);
        let text: std::string::String = stream.by_ref().map(|t| t.text).collect();

        assert_eq!(text, source);
        assert_eq!(stream.context().depth(), 1);
        assert_eq!(stream.metrics().fallback_tokens, 0);
    }

    #[test]
    fn test_registry_shared_across_threads() {
        let registry = Arc::new(fsharp());
        let inputs = ["let x = 1", "(* a (* b *) *)", "Foo.Bar.baz", "\"s\\n\""];

        let handles: Vec<_> = inputs
            .iter()
            .map(|input| {
                let registry = Arc::clone(&registry);
                let input = input.to_string();
                std::thread::spawn(move || {
                    let engine = LexerEngine::new(&registry);
                    let mut stream = engine.tokenize(&input);
                    let text: std::string::String = stream.by_ref().map(|t| t.text).collect();
                    (text == input, stream.context().depth())
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), (true, 1));
        }
    }
}
