//! Error types.
//!
//! Layout, hit-testing and reconciliation are infallible by construction;
//! errors only come out of parsing caller-supplied strings.

/// Errors from parsing a color string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColorParseError {
    #[error("empty color string")]
    Empty,
    #[error("invalid hex color '#{0}': expected 3, 6 or 8 hex digits")]
    InvalidHex(String),
    #[error("unknown color name '{0}'")]
    UnknownName(String),
}

/// Errors from strict markup parsing.
///
/// The lenient entry points ([`crate::markup::format_text`] and friends) never
/// return these: the offending code is emitted as literal text instead.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MarkupError {
    #[error("unterminated argument for '@{code}' at byte {position}")]
    UnterminatedArgument { code: char, position: usize },
    #[error("invalid scale '{value}' at byte {position}")]
    InvalidScale { value: String, position: usize },
    #[error("invalid color at byte {position}: {source}")]
    InvalidColor {
        position: usize,
        #[source]
        source: ColorParseError,
    },
    #[error("unknown font alias '{name}' at byte {position}")]
    UnknownFont { name: String, position: usize },
    #[error("unknown markup code '@{code}' at byte {position}")]
    UnknownCode { code: char, position: usize },
}
