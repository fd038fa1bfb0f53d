//! Template interpolation: `{{name}}` placeholders filled with text or nodes.

use std::collections::HashMap;

use crate::node::{Node, NodeAttrs, TextNode};
use crate::style::{Alignment, TextStyle};

use super::format::{format_text_with, FormatOptions, Formatted};
use super::tokenizer::{tokenize_template, TemplateToken};

/// A value substituted for a placeholder.
#[derive(Debug, Clone)]
pub enum TemplateValue {
    /// Literal text, emitted as one run in the running style. Markup codes
    /// inside it are not interpreted.
    Text(String),
    Node(Node),
    Nodes(Vec<Node>),
}

impl From<&str> for TemplateValue {
    fn from(value: &str) -> Self {
        TemplateValue::Text(value.to_owned())
    }
}

impl From<String> for TemplateValue {
    fn from(value: String) -> Self {
        TemplateValue::Text(value)
    }
}

macro_rules! impl_display_value {
    ($($ty:ty),*) => {
        $(impl From<$ty> for TemplateValue {
            fn from(value: $ty) -> Self {
                TemplateValue::Text(value.to_string())
            }
        })*
    };
}

impl_display_value!(i32, i64, u32, u64, usize, f32, f64);

impl From<Node> for TemplateValue {
    fn from(node: Node) -> Self {
        TemplateValue::Node(node)
    }
}

impl From<Vec<Node>> for TemplateValue {
    fn from(nodes: Vec<Node>) -> Self {
        TemplateValue::Nodes(nodes)
    }
}

/// Placeholder values by name.
pub type TemplateValues = HashMap<String, TemplateValue>;

/// Fill `template` with `values`, formatting the literal parts as markup.
///
/// Style and alignment carry across literal segments. Placeholders without a
/// value are dropped; an unterminated `{{` is literal text.
pub fn translate(
    template: &str,
    values: &TemplateValues,
    style: TextStyle,
    alignment: Alignment,
) -> Formatted {
    translate_with(template, values, style, alignment, &FormatOptions::default())
}

/// [`translate`] with a font registry and handlers for the literal parts.
pub fn translate_with(
    template: &str,
    values: &TemplateValues,
    style: TextStyle,
    alignment: Alignment,
    options: &FormatOptions<'_>,
) -> Formatted {
    let mut out = Formatted { nodes: Vec::new(), style, alignment };
    let mut literal = String::new();

    for (token, lexeme) in tokenize_template(template) {
        match token {
            TemplateToken::Literal | TemplateToken::Brace => literal.push_str(lexeme),
            TemplateToken::Placeholder => {
                flush_literal(&mut out, &mut literal, options);
                let name = lexeme[2..lexeme.len() - 2].trim();
                match values.get(name) {
                    Some(TemplateValue::Text(text)) => {
                        if !text.is_empty() {
                            out.nodes.push(Node::Text(TextNode {
                                text: text.clone(),
                                style: out.style.clone(),
                                attrs: NodeAttrs {
                                    alignment: out.alignment,
                                    handlers: options.handlers.clone(),
                                    ..NodeAttrs::default()
                                },
                            }));
                        }
                    }
                    Some(TemplateValue::Node(node)) => out.nodes.push(node.clone()),
                    Some(TemplateValue::Nodes(nodes)) => out.nodes.extend(nodes.iter().cloned()),
                    None => tracing::trace!(name, "template placeholder has no value"),
                }
            }
        }
    }
    flush_literal(&mut out, &mut literal, options);
    out
}

fn flush_literal(out: &mut Formatted, literal: &mut String, options: &FormatOptions<'_>) {
    if literal.is_empty() {
        return;
    }
    let formatted = format_text_with(literal, out.style.clone(), out.alignment, options);
    out.nodes.extend(formatted.nodes);
    out.style = formatted.style;
    out.alignment = formatted.alignment;
    literal.clear();
}
