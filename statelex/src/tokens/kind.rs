//! Token classification
//!
//! Kinds form a shallow tree (`Name.Namespace` is-a `Name`). Qualified and
//! short names follow the class names used by common syntax highlighting
//! themes, so output can be styled without a translation table.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Classification attached to every emitted token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TokenKind {
    Text,
    Error,

    Keyword,
    KeywordType,

    Name,
    NameNamespace,
    NameVariable,
    NameClass,
    NameFunction,
    NameBuiltin,
    NameBuiltinPseudo,

    Operator,
    OperatorWord,

    Punctuation,

    Literal,
    String,
    StringEscape,
    StringChar,
    StringDoc,
    StringDouble,
    Number,
    NumberInteger,
    NumberHex,
    NumberOct,
    NumberBin,
    NumberFloat,

    Comment,
    CommentSingle,
    CommentPreproc,
}

impl TokenKind {
    /// Every kind, in declaration order
    pub const ALL: &'static [TokenKind] = &[
        TokenKind::Text,
        TokenKind::Error,
        TokenKind::Keyword,
        TokenKind::KeywordType,
        TokenKind::Name,
        TokenKind::NameNamespace,
        TokenKind::NameVariable,
        TokenKind::NameClass,
        TokenKind::NameFunction,
        TokenKind::NameBuiltin,
        TokenKind::NameBuiltinPseudo,
        TokenKind::Operator,
        TokenKind::OperatorWord,
        TokenKind::Punctuation,
        TokenKind::Literal,
        TokenKind::String,
        TokenKind::StringEscape,
        TokenKind::StringChar,
        TokenKind::StringDoc,
        TokenKind::StringDouble,
        TokenKind::Number,
        TokenKind::NumberInteger,
        TokenKind::NumberHex,
        TokenKind::NumberOct,
        TokenKind::NumberBin,
        TokenKind::NumberFloat,
        TokenKind::Comment,
        TokenKind::CommentSingle,
        TokenKind::CommentPreproc,
    ];

    /// Number of kinds; `kind as usize` is always below this
    pub const COUNT: usize = Self::ALL.len();

    /// (parent, qualified name, short name)
    fn info(self) -> (Option<TokenKind>, &'static str, &'static str) {
        use TokenKind::*;
        match self {
            Text => (None, "Text", ""),
            Error => (None, "Error", "err"),

            Keyword => (None, "Keyword", "k"),
            KeywordType => (Some(Keyword), "Keyword.Type", "kt"),

            Name => (None, "Name", "n"),
            NameNamespace => (Some(Name), "Name.Namespace", "nn"),
            NameVariable => (Some(Name), "Name.Variable", "nv"),
            NameClass => (Some(Name), "Name.Class", "nc"),
            NameFunction => (Some(Name), "Name.Function", "nf"),
            NameBuiltin => (Some(Name), "Name.Builtin", "nb"),
            NameBuiltinPseudo => (Some(NameBuiltin), "Name.Builtin.Pseudo", "bp"),

            Operator => (None, "Operator", "o"),
            OperatorWord => (Some(Operator), "Operator.Word", "ow"),

            Punctuation => (None, "Punctuation", "p"),

            Literal => (None, "Literal", "l"),
            String => (Some(Literal), "Literal.String", "s"),
            StringEscape => (Some(String), "Literal.String.Escape", "se"),
            StringChar => (Some(String), "Literal.String.Char", "sc"),
            StringDoc => (Some(String), "Literal.String.Doc", "sd"),
            StringDouble => (Some(String), "Literal.String.Double", "s2"),
            Number => (Some(Literal), "Literal.Number", "m"),
            NumberInteger => (Some(Number), "Literal.Number.Integer", "mi"),
            NumberHex => (Some(Number), "Literal.Number.Hex", "mh"),
            NumberOct => (Some(Number), "Literal.Number.Oct", "mo"),
            NumberBin => (Some(Number), "Literal.Number.Bin", "mb"),
            NumberFloat => (Some(Number), "Literal.Number.Float", "mf"),

            Comment => (None, "Comment", "c"),
            CommentSingle => (Some(Comment), "Comment.Single", "c1"),
            CommentPreproc => (Some(Comment), "Comment.Preproc", "cp"),
        }
    }

    pub fn parent(self) -> Option<TokenKind> {
        self.info().0
    }

    /// True if `ancestor` is this kind or one of its ancestors
    pub fn is_a(self, ancestor: TokenKind) -> bool {
        let mut current = Some(self);
        while let Some(kind) = current {
            if kind == ancestor {
                return true;
            }
            current = kind.parent();
        }
        false
    }

    /// Dotted path from the root kind, e.g. `Name.Namespace`
    pub fn qualified_name(self) -> &'static str {
        self.info().1
    }

    /// Stable short class name, e.g. `nn`; empty for plain text
    pub fn short_name(self) -> &'static str {
        self.info().2
    }

    pub fn from_qualified_name(name: &str) -> Option<TokenKind> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.qualified_name() == name)
    }

    pub fn is_comment(self) -> bool {
        self.is_a(TokenKind::Comment)
    }

    pub fn is_string(self) -> bool {
        self.is_a(TokenKind::String)
    }

    pub fn is_error(self) -> bool {
        self == TokenKind::Error
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.qualified_name())
    }
}

impl Serialize for TokenKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.qualified_name())
    }
}

impl<'de> Deserialize<'de> for TokenKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = <std::borrow::Cow<'de, str>>::deserialize(deserializer)?;
        TokenKind::from_qualified_name(&name).ok_or_else(|| {
            serde::de::Error::custom(format!("unknown token kind '{}'", name))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hierarchy() {
        assert!(TokenKind::NameNamespace.is_a(TokenKind::Name));
        assert!(TokenKind::NameNamespace.is_a(TokenKind::NameNamespace));
        assert!(TokenKind::NameBuiltinPseudo.is_a(TokenKind::Name));
        assert!(TokenKind::NumberHex.is_a(TokenKind::Literal));
        assert!(!TokenKind::Name.is_a(TokenKind::NameNamespace));
        assert!(!TokenKind::Operator.is_a(TokenKind::Punctuation));
        assert_eq!(TokenKind::KeywordType.parent(), Some(TokenKind::Keyword));
        assert_eq!(TokenKind::Text.parent(), None);
    }

    #[test]
    fn test_classification_helpers() {
        assert!(TokenKind::CommentSingle.is_comment());
        assert!(TokenKind::StringEscape.is_string());
        assert!(!TokenKind::Number.is_string());
        assert!(TokenKind::Error.is_error());
    }

    #[test]
    fn test_names_round_trip_for_every_kind() {
        assert_eq!(TokenKind::COUNT, TokenKind::ALL.len());
        for (index, kind) in TokenKind::ALL.iter().enumerate() {
            assert_eq!(*kind as usize, index);
            assert_eq!(TokenKind::from_qualified_name(kind.qualified_name()), Some(*kind));
        }
        assert_eq!(TokenKind::NameNamespace.short_name(), "nn");
        assert_eq!(TokenKind::from_qualified_name("Name.Nope"), None);
    }

    #[test]
    fn test_qualified_names_extend_parent() {
        for kind in TokenKind::ALL {
            if let Some(parent) = kind.parent() {
                let prefix = format!("{}.", parent.qualified_name());
                assert!(kind.qualified_name().starts_with(&prefix), "{}", kind);
            }
        }
    }

    #[test]
    fn test_serde_uses_qualified_name() {
        let json = serde_json::to_string(&TokenKind::NumberFloat).unwrap();
        assert_eq!(json, "\"Literal.Number.Float\"");

        let kind: TokenKind = serde_json::from_str("\"Comment.Single\"").unwrap();
        assert_eq!(kind, TokenKind::CommentSingle);
        assert!(serde_json::from_str::<TokenKind>("\"Bogus\"").is_err());
    }
}
