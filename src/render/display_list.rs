//! A surface that records draw calls instead of rasterizing them.
//!
//! Useful for hosts that replay commands into their own renderer, and for
//! asserting exactly what a flow draws.

use crate::geometry::{Offset, Region};
use crate::node::SpriteId;
use crate::style::{Color, StyleFlags};

use super::{Surface, TextRun};

/// One recorded draw call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Text {
        text: String,
        origin: Offset,
        clip: Region,
        scale: f32,
        color: Color,
        background: Option<Color>,
        flags: StyleFlags,
    },
    Sprite {
        sprite: SpriteId,
        source: Region,
        dest: Region,
        clip: Region,
    },
    Rect {
        rect: Region,
        color: Color,
        clip: Region,
    },
    Rule {
        rect: Region,
        color: Color,
        clip: Region,
    },
    Component {
        bounds: Region,
        clip: Region,
    },
}

/// Recording [`Surface`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplayList {
    pub commands: Vec<DrawCommand>,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// The text of every text command, in draw order.
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Surface for DisplayList {
    fn draw_text(&mut self, run: &TextRun<'_>) {
        self.commands.push(DrawCommand::Text {
            text: run.text.to_owned(),
            origin: run.origin,
            clip: run.clip,
            scale: run.scale,
            color: run.color,
            background: run.background,
            flags: run.flags,
        });
    }

    fn draw_sprite(&mut self, sprite: SpriteId, source: Region, dest: Region, clip: Region) {
        self.commands.push(DrawCommand::Sprite { sprite, source, dest, clip });
    }

    fn fill_rect(&mut self, rect: Region, color: Color, clip: Region) {
        self.commands.push(DrawCommand::Rect { rect, color, clip });
    }

    fn draw_rule(&mut self, rect: Region, color: Color, clip: Region) {
        self.commands.push(DrawCommand::Rule { rect, color, clip });
    }

    fn draw_component(&mut self, bounds: Region, clip: Region) {
        self.commands.push(DrawCommand::Component { bounds, clip });
    }
}
