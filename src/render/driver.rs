//! Crossterm terminal output backend.
//!
//! The `Driver` wraps a writer and replays the cell updates of a
//! [`CellSurface`](super::CellSurface) diff as crossterm commands. Terminal
//! mode and cursor visibility belong to the host application.

use std::io::{self, Write};

use crossterm::{
    cursor, queue,
    style::{
        Attribute, Color as TermColor, Print, ResetColor, SetAttribute, SetBackgroundColor,
        SetForegroundColor,
    },
};

use crate::style::Color;

use super::cells::{CellStyle, CellUpdate};

// ---------------------------------------------------------------------------
// Driver
// ---------------------------------------------------------------------------

/// Terminal output backend using crossterm.
pub struct Driver<W: Write> {
    writer: W,
}

impl<W: Write> Driver<W> {
    /// Create a driver writing to `writer`.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Consume the driver and return the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Queue a batch of cell updates.
    ///
    /// For each update the cursor is moved to the cell, the style applied and
    /// the character printed. Call `flush()` afterward to send to the terminal.
    pub fn apply_updates(&mut self, updates: &[CellUpdate]) -> io::Result<()> {
        for update in updates {
            queue!(self.writer, cursor::MoveTo(update.x, update.y))?;
            self.apply_cell_style(&update.cell.style)?;
            queue!(self.writer, Print(update.cell.ch), SetAttribute(Attribute::Reset), ResetColor)?;
        }
        Ok(())
    }

    /// Flush the internal write buffer to the terminal.
    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    fn apply_cell_style(&mut self, style: &CellStyle) -> io::Result<()> {
        if let Some(fg) = style.fg {
            queue!(self.writer, SetForegroundColor(to_terminal_color(fg)))?;
        }
        if let Some(bg) = style.bg {
            queue!(self.writer, SetBackgroundColor(to_terminal_color(bg)))?;
        }
        if style.bold {
            queue!(self.writer, SetAttribute(Attribute::Bold))?;
        }
        if style.underline {
            queue!(self.writer, SetAttribute(Attribute::Underlined))?;
        }
        if style.strikethrough {
            queue!(self.writer, SetAttribute(Attribute::CrossedOut))?;
        }
        if style.reverse {
            queue!(self.writer, SetAttribute(Attribute::Reverse))?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Color conversion
// ---------------------------------------------------------------------------

/// Convert a [`Color`] into a crossterm true-color value. Alpha is dropped.
pub fn to_terminal_color(color: Color) -> TermColor {
    TermColor::Rgb { r: color.r, g: color.g, b: color.b }
}

// ===========================================================================
// Tests
// ===========================================================================
