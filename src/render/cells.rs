//! Terminal cell grid surface with frame diffing.
//!
//! `CellSurface` maintains a 2D grid of `StyledCell`s. Flows are drawn into it
//! through the [`Surface`] trait (one layout unit per cell when used with
//! [`MonospaceFont::terminal`](crate::font::MonospaceFont::terminal)). The
//! `diff` method compares two frames and produces only the `CellUpdate`s
//! needed to transition between them.

use crate::geometry::Region;
use crate::node::SpriteId;
use crate::style::{Color, StyleFlags};

use super::{Surface, TextRun};

/// Glyph used for divider rules.
pub const RULE_CHAR: char = '─';
/// Glyph used to fill sprite rectangles.
pub const SPRITE_CHAR: char = '▒';

// ---------------------------------------------------------------------------
// CellStyle
// ---------------------------------------------------------------------------

/// Visual style for a single terminal cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellStyle {
    pub fg: Option<Color>,
    pub bg: Option<Color>,
    pub bold: bool,
    pub underline: bool,
    pub strikethrough: bool,
    pub reverse: bool,
}

impl CellStyle {
    /// Create a new `CellStyle` with all attributes unset/false.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cell style for a resolved text run. Colors arrive already swapped for
    /// inverted text, so `reverse` is never set here.
    pub fn from_run(run: &TextRun<'_>) -> Self {
        CellStyle {
            fg: Some(run.color),
            bg: run.background,
            bold: run.flags.contains(StyleFlags::BOLD),
            underline: run.flags.contains(StyleFlags::UNDERLINE),
            strikethrough: run.flags.contains(StyleFlags::STRIKETHROUGH),
            reverse: false,
        }
    }
}

// ---------------------------------------------------------------------------
// StyledCell
// ---------------------------------------------------------------------------

/// A single terminal cell: one character with associated style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyledCell {
    pub ch: char,
    pub style: CellStyle,
}

impl StyledCell {
    /// Create a new styled cell.
    pub fn new(ch: char, style: CellStyle) -> Self {
        Self { ch, style }
    }

    /// A blank (space) cell with default style.
    pub fn blank() -> Self {
        Self { ch: ' ', style: CellStyle::default() }
    }
}

impl Default for StyledCell {
    fn default() -> Self {
        Self::blank()
    }
}

// ---------------------------------------------------------------------------
// CellUpdate
// ---------------------------------------------------------------------------

/// A single cell that changed between frames.
///
/// Used by the driver to emit minimal terminal escape sequences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellUpdate {
    pub x: u16,
    pub y: u16,
    pub cell: StyledCell,
}

// ---------------------------------------------------------------------------
// CellSurface
// ---------------------------------------------------------------------------

/// A screen-sized grid of styled cells.
#[derive(Debug, Clone)]
pub struct CellSurface {
    /// `screen[y][x]` is the cell at column x, row y.
    screen: Vec<Vec<StyledCell>>,
    pub width: u16,
    pub height: u16,
}

impl CellSurface {
    /// Create a blank surface of the given dimensions.
    pub fn new(width: u16, height: u16) -> Self {
        Self { screen: Self::blank_screen(width, height), width, height }
    }

    /// Resize the grid. All cells are reset to blank.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.screen = Self::blank_screen(width, height);
    }

    /// Reset every cell to blank.
    pub fn clear(&mut self) {
        self.screen = Self::blank_screen(self.width, self.height);
    }

    /// The whole grid as a region.
    pub fn bounds(&self) -> Region {
        Region::new(0, 0, self.width as i32, self.height as i32)
    }

    /// The cell at (x, y), or `None` out of bounds.
    pub fn get_cell(&self, x: u16, y: u16) -> Option<&StyledCell> {
        self.screen.get(y as usize).and_then(|row| row.get(x as usize))
    }

    /// Row `y` as plain text with trailing spaces trimmed.
    pub fn row_text(&self, y: u16) -> String {
        self.screen
            .get(y as usize)
            .map(|row| row.iter().map(|c| c.ch).collect::<String>().trim_end().to_owned())
            .unwrap_or_default()
    }

    /// Compare this frame against a previous frame and return only the
    /// changed cells. Cells outside the previous frame's size always count
    /// as changed.
    pub fn diff(&self, previous: &CellSurface) -> Vec<CellUpdate> {
        let mut updates = Vec::new();
        for (y, row) in self.screen.iter().enumerate() {
            for (x, cell) in row.iter().enumerate() {
                let before = previous.screen.get(y).and_then(|r| r.get(x));
                if before != Some(cell) {
                    updates.push(CellUpdate { x: x as u16, y: y as u16, cell: *cell });
                }
            }
        }
        updates
    }

    /// Write one cell if it lies inside both `clip` and the grid.
    fn put(&mut self, x: i32, y: i32, cell: StyledCell, clip: Region) {
        if !clip.contains(x, y) || x < 0 || y < 0 {
            return;
        }
        if let Some(slot) = self.screen.get_mut(y as usize).and_then(|row| row.get_mut(x as usize)) {
            *slot = cell;
        }
    }

    /// Paint `rect` with `ch` in `style`, clipped.
    fn fill_with(&mut self, rect: Region, ch: char, style: CellStyle, clip: Region) {
        let area = rect.intersection(clip).intersection(self.bounds());
        for y in area.y..area.bottom() {
            for x in area.x..area.right() {
                self.put(x, y, StyledCell::new(ch, style), clip);
            }
        }
    }

    fn blank_screen(width: u16, height: u16) -> Vec<Vec<StyledCell>> {
        vec![vec![StyledCell::blank(); width as usize]; height as usize]
    }
}

impl Surface for CellSurface {
    fn draw_text(&mut self, run: &TextRun<'_>) {
        let style = CellStyle::from_run(run);
        for (index, ch) in run.text.char_indices() {
            if ch == '\n' {
                continue;
            }
            self.put(run.glyph_x(index), run.origin.y, StyledCell::new(ch, style), run.clip);
        }
    }

    fn draw_sprite(&mut self, _sprite: SpriteId, _source: Region, dest: Region, clip: Region) {
        self.fill_with(dest, SPRITE_CHAR, CellStyle::default(), clip);
    }

    fn fill_rect(&mut self, rect: Region, color: Color, clip: Region) {
        let style = CellStyle { bg: Some(color), ..CellStyle::default() };
        self.fill_with(rect, ' ', style, clip);
    }

    fn draw_rule(&mut self, rect: Region, color: Color, clip: Region) {
        let style = CellStyle { fg: Some(color), ..CellStyle::default() };
        self.fill_with(rect, RULE_CHAR, style, clip);
    }
}

// ===========================================================================
// Tests
// ===========================================================================
