//! Inline markup: `@`-codes that switch style and alignment mid-text.
//!
//! Parsing is a fold over the token stream: `(text, style, alignment)` in,
//! `(nodes, style, alignment)` out. The returned state can be fed into the
//! next call so formatting carries across calls.

use std::convert::Infallible;

use crate::error::MarkupError;
use crate::font::FontRegistry;
use crate::node::{Handlers, Node, NodeAttrs, TextNode};
use crate::style::{Alignment, Color, StyleFlags, TextStyle};

use super::tokenizer::{tokenize_markup, MarkupToken};

// ---------------------------------------------------------------------------
// Formatted / FormatOptions
// ---------------------------------------------------------------------------

/// Result of formatting: the emitted text runs and the state after the last
/// code.
#[derive(Debug, Clone)]
pub struct Formatted {
    pub nodes: Vec<Node>,
    pub style: TextStyle,
    pub alignment: Alignment,
}

impl Formatted {
    /// The text of every emitted run, in order.
    pub fn texts(&self) -> Vec<&str> {
        self.nodes.iter().filter_map(Node::as_text).collect()
    }
}

/// Extra inputs to formatting.
#[derive(Clone, Default)]
pub struct FormatOptions<'a> {
    /// Aliases for `@f{alias}`. Without a registry every alias is unknown.
    pub fonts: Option<&'a FontRegistry>,
    /// Handlers attached to every emitted run.
    pub handlers: Handlers,
}

impl<'a> FormatOptions<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve `@f{…}` against `fonts` (builder).
    pub fn with_fonts(mut self, fonts: &'a FontRegistry) -> Self {
        self.fonts = Some(fonts);
        self
    }

    /// Attach `handlers` to every emitted run (builder).
    pub fn with_handlers(mut self, handlers: Handlers) -> Self {
        self.handlers = handlers;
        self
    }
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Format `text` starting from `style` and `alignment`.
///
/// Malformed or unknown codes are kept as literal text.
pub fn format_text(text: &str, style: TextStyle, alignment: Alignment) -> Formatted {
    format_text_with(text, style, alignment, &FormatOptions::default())
}

/// [`format_text`] with a font registry and handlers.
pub fn format_text_with(
    text: &str,
    style: TextStyle,
    alignment: Alignment,
    options: &FormatOptions<'_>,
) -> Formatted {
    let mut scanner = Scanner::new(style, alignment, options);
    let Ok(()) = scanner.scan(text, keep_as_text);
    scanner.finish()
}

/// Like [`format_text_with`], but reject malformed or unknown codes.
pub fn format_text_strict(
    text: &str,
    style: TextStyle,
    alignment: Alignment,
    options: &FormatOptions<'_>,
) -> Result<Formatted, MarkupError> {
    let mut scanner = Scanner::new(style, alignment, options);
    scanner.scan(text, Err)?;
    Ok(scanner.finish())
}

/// Lenient policy: the offending code stays in the text.
fn keep_as_text(err: MarkupError) -> Result<(), Infallible> {
    tracing::debug!(error = %err, "malformed markup kept as text");
    Ok(())
}

// ---------------------------------------------------------------------------
// Scanner
// ---------------------------------------------------------------------------

struct Scanner<'o, 'a> {
    style: TextStyle,
    alignment: Alignment,
    options: &'o FormatOptions<'a>,
    pending: String,
    nodes: Vec<Node>,
}

impl<'o, 'a> Scanner<'o, 'a> {
    fn new(style: TextStyle, alignment: Alignment, options: &'o FormatOptions<'a>) -> Self {
        Self { style, alignment, options, pending: String::new(), nodes: Vec::new() }
    }

    /// Fold `text` into the scanner. Every malformed code goes through
    /// `reject`; when it returns `Ok` the code is kept as literal text.
    fn scan<E>(
        &mut self,
        text: &str,
        mut reject: impl FnMut(MarkupError) -> Result<(), E>,
    ) -> Result<(), E> {
        let tokens = tokenize_markup(text);
        for (i, &(token, position, lexeme)) in tokens.iter().enumerate() {
            match token {
                MarkupToken::Text => self.pending.push_str(lexeme),
                MarkupToken::Escape => self.pending.push('@'),
                MarkupToken::Align => {
                    let flag = match lexeme.as_bytes()[1] {
                        b'<' => Alignment::LEFT,
                        b'>' => Alignment::RIGHT,
                        b'|' => Alignment::CENTER,
                        b'^' => Alignment::TOP,
                        b'_' => Alignment::BOTTOM,
                        _ => Alignment::MIDDLE,
                    };
                    self.flush();
                    self.alignment = self.alignment.toggled(flag);
                }
                MarkupToken::Toggle => {
                    let flag = match lexeme.as_bytes()[1] {
                        b'B' => StyleFlags::BOLD,
                        b'F' => StyleFlags::FANCY,
                        b'H' => StyleFlags::SHADOW,
                        b'S' => StyleFlags::STRIKETHROUGH,
                        b'U' => StyleFlags::UNDERLINE,
                        b'I' => StyleFlags::INVERT,
                        b'J' => StyleFlags::JUNIMO,
                        _ => StyleFlags::PRISMATIC,
                    };
                    self.flush();
                    self.style.flags.toggle(flag);
                }
                MarkupToken::Param => {
                    let code = char::from(lexeme.as_bytes()[1]);
                    let argument = lexeme[3..lexeme.len() - 1].trim();
                    if let Err(err) = self.apply_param(code, argument, position) {
                        reject(err)?;
                        self.pending.push_str(lexeme);
                    }
                }
                MarkupToken::OpenParam => {
                    let code = char::from(lexeme.as_bytes()[1]);
                    reject(MarkupError::UnterminatedArgument { code, position })?;
                    self.pending.push_str(lexeme);
                }
                MarkupToken::At => {
                    let next = tokens.get(i + 1).and_then(|(_, _, s)| s.chars().next());
                    if let Some(code) = next.filter(|c| !c.is_whitespace()) {
                        reject(MarkupError::UnknownCode { code, position })?;
                    }
                    self.pending.push('@');
                }
            }
        }
        Ok(())
    }

    /// Apply a parameterized code. State is only changed on success.
    fn apply_param(&mut self, code: char, argument: &str, position: usize) -> Result<(), MarkupError> {
        match code {
            's' => {
                let scale = if argument.is_empty() {
                    1.0
                } else {
                    argument
                        .parse::<f32>()
                        .ok()
                        .filter(|s| s.is_finite() && *s > 0.0)
                        .ok_or_else(|| MarkupError::InvalidScale { value: argument.to_owned(), position })?
                };
                self.flush();
                self.style.scale = scale;
            }
            'c' | 'b' => {
                let color = if argument.is_empty() {
                    None
                } else {
                    Some(
                        argument
                            .parse::<Color>()
                            .map_err(|source| MarkupError::InvalidColor { position, source })?,
                    )
                };
                self.flush();
                if code == 'c' {
                    self.style.color = color;
                } else {
                    self.style.background = color;
                }
            }
            _ => {
                let font = if argument.is_empty() {
                    None
                } else {
                    let found = self.options.fonts.and_then(|fonts| fonts.get(argument));
                    Some(
                        found
                            .cloned()
                            .ok_or_else(|| MarkupError::UnknownFont { name: argument.to_owned(), position })?,
                    )
                };
                self.flush();
                self.style.font = font;
            }
        }
        Ok(())
    }

    /// Emit pending text as a run in the current style.
    fn flush(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        self.nodes.push(Node::Text(TextNode {
            text: std::mem::take(&mut self.pending),
            style: self.style.clone(),
            attrs: NodeAttrs {
                alignment: self.alignment,
                handlers: self.options.handlers.clone(),
                ..NodeAttrs::default()
            },
        }));
    }

    fn finish(mut self) -> Formatted {
        self.flush();
        Formatted { nodes: self.nodes, style: self.style, alignment: self.alignment }
    }
}

// ===========================================================================
// Tests
// ===========================================================================
