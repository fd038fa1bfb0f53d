//! logos-based tokenizers for inline markup and templates.
//!
//! Token priority in logos is determined by:
//! 1. Longest match wins (e.g. `@c{red}` as [`MarkupToken::Param`] beats
//!    `@c{` as [`MarkupToken::OpenParam`])
//! 2. For equal length matches, earlier-defined variants win
//!
//! Every input byte belongs to some token, so lexing never fails; anything
//! that is not a recognized code ends up as text.

use logos::Logos;

/// Markup token produced by the lexer.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkupToken {
    /// `@@`, a literal `@`.
    #[token("@@")]
    Escape,

    /// Alignment toggle: `@<`, `@>`, `@|`, `@^`, `@_`, `@-`.
    #[regex(r"@[-<>|^_]")]
    Align,

    /// Style toggle: `@B`, `@F`, `@H`, `@S`, `@U`, `@I`, `@J`, `@P`.
    #[regex(r"@[BFHSUIJP]")]
    Toggle,

    /// Parameterized code with its argument: `@s{2}`, `@c{red}`, `@b{#000}`, `@f{title}`.
    #[regex(r"@[scbf]\{[^}]*\}")]
    Param,

    /// A parameterized code whose argument is never closed.
    #[regex(r"@[scbf]\{")]
    OpenParam,

    /// `@` not starting a recognized code.
    #[token("@")]
    At,

    /// Plain text up to the next `@`.
    #[regex(r"[^@]+")]
    Text,
}

/// Template token produced by the lexer.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateToken {
    /// `{{name}}`
    #[regex(r"\{\{[^{}]*\}\}")]
    Placeholder,

    /// A brace that does not start a complete placeholder.
    #[token("{")]
    Brace,

    /// Text up to the next brace.
    #[regex(r"[^{]+")]
    Literal,
}

/// Tokenize markup into `(token, byte offset, text)` triples.
///
/// Bytes that fail to lex are returned as [`MarkupToken::Text`].
pub fn tokenize_markup(input: &str) -> Vec<(MarkupToken, usize, &str)> {
    MarkupToken::lexer(input)
        .spanned()
        .map(|(result, span)| (result.unwrap_or(MarkupToken::Text), span.start, &input[span]))
        .collect()
}

/// Tokenize a template into `(token, text)` pairs.
///
/// Bytes that fail to lex are returned as [`TemplateToken::Literal`].
pub fn tokenize_template(input: &str) -> Vec<(TemplateToken, &str)> {
    TemplateToken::lexer(input)
        .spanned()
        .map(|(result, span)| (result.unwrap_or(TemplateToken::Literal), &input[span]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Helper: tokenize and return just the token variants.
    fn tokens(input: &str) -> Vec<MarkupToken> {
        tokenize_markup(input).into_iter().map(|(t, _, _)| t).collect()
    }

    // ── Markup ───────────────────────────────────────────────────────

    #[test]
    fn test_plain_text_is_one_token() {
        assert_eq!(tokenize_markup("just text"), vec![(MarkupToken::Text, 0, "just text")]);
    }

    #[test]
    fn test_codes() {
        assert_eq!(
            tokens("@@@<@>@|@^@_@-@B@P"),
            vec![
                MarkupToken::Escape,
                MarkupToken::Align,
                MarkupToken::Align,
                MarkupToken::Align,
                MarkupToken::Align,
                MarkupToken::Align,
                MarkupToken::Align,
                MarkupToken::Toggle,
                MarkupToken::Toggle,
            ]
        );
    }

    #[test]
    fn test_param_with_argument() {
        assert_eq!(
            tokenize_markup("a@c{#ff0000}b"),
            vec![
                (MarkupToken::Text, 0, "a"),
                (MarkupToken::Param, 1, "@c{#ff0000}"),
                (MarkupToken::Text, 12, "b"),
            ]
        );
    }

    #[test]
    fn test_unclosed_param() {
        assert_eq!(
            tokenize_markup("@s{2 more"),
            vec![(MarkupToken::OpenParam, 0, "@s{"), (MarkupToken::Text, 3, "2 more")]
        );
    }

    #[test]
    fn test_unknown_code_and_trailing_at() {
        assert_eq!(tokens("@x"), vec![MarkupToken::At, MarkupToken::Text]);
        assert_eq!(tokens("end@"), vec![MarkupToken::Text, MarkupToken::At]);
        // `@s` without a brace is not a parameter.
        assert_eq!(tokens("@s"), vec![MarkupToken::At, MarkupToken::Text]);
    }

    // ── Template ─────────────────────────────────────────────────────

    #[test]
    fn test_template_placeholders() {
        assert_eq!(
            tokenize_template("Caught {{count}} fish"),
            vec![
                (TemplateToken::Literal, "Caught "),
                (TemplateToken::Placeholder, "{{count}}"),
                (TemplateToken::Literal, " fish"),
            ]
        );
    }

    #[test]
    fn test_template_unterminated() {
        assert_eq!(
            tokenize_template("a {{b"),
            vec![
                (TemplateToken::Literal, "a "),
                (TemplateToken::Brace, "{"),
                (TemplateToken::Brace, "{"),
                (TemplateToken::Literal, "b"),
            ]
        );
    }
}
