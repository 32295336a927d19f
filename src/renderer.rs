use std::io;

use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::Color;
use ratatui::widgets::{Block, Widget};

use crate::game::Snapshot;
use crate::grid::{Grid, Position};
use crate::input::Direction;
use crate::session::RenderSink;
use crate::terminal_runtime::TerminalSession;

/// Light checkerboard square.
pub const BRIGHTER_GRID_COLOR: Color = Color::Rgb(93, 216, 228);
/// Dark checkerboard square.
pub const DARKER_GRID_COLOR: Color = Color::Rgb(84, 194, 205);
pub const SNAKE_COLOR: Color = Color::Rgb(17, 24, 47);
pub const FOOD_COLOR: Color = Color::Rgb(23, 163, 49);

const GLYPH_HEAD_UP: &str = "▲";
const GLYPH_HEAD_DOWN: &str = "▼";
const GLYPH_HEAD_LEFT: &str = "◀";
const GLYPH_HEAD_RIGHT: &str = "▶";

/// Draws one snapshot: a bordered checkerboard with the food and the snake
/// on top, centered in the target area.
#[derive(Debug, Clone, Copy)]
pub struct BoardWidget<'a> {
    snapshot: &'a Snapshot,
    cell_width: u16,
}

impl<'a> BoardWidget<'a> {
    /// `cell_width` is the number of terminal columns per grid cell.
    #[must_use]
    pub fn new(snapshot: &'a Snapshot, cell_width: u16) -> Self {
        Self {
            snapshot,
            cell_width: cell_width.max(1),
        }
    }

    /// Outer size including the border.
    #[must_use]
    pub fn size(&self) -> (u16, u16) {
        board_size(self.snapshot.grid, self.cell_width)
    }
}

impl Widget for BoardWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (width, height) = self.size();
        let [board] = Layout::horizontal([Constraint::Length(width)])
            .flex(Flex::Center)
            .areas(area);
        let [board] = Layout::vertical([Constraint::Length(height)])
            .flex(Flex::Center)
            .areas(board);

        let block = Block::bordered().title(" wrap-snake ");
        let inner = block.inner(board);
        block.render(board, buf);

        let mut canvas = Canvas {
            area: inner,
            cell_width: self.cell_width,
            buf,
        };
        let grid = self.snapshot.grid;

        for cell in grid.cells() {
            canvas.fill(cell, checker_color(cell));
        }

        canvas.fill(self.snapshot.food, FOOD_COLOR);

        for segment in &self.snapshot.body {
            canvas.fill(*segment, SNAKE_COLOR);
        }

        if let Some(head) = self.snapshot.body.first() {
            canvas.mark(*head, head_glyph(self.snapshot.heading));
        }
    }
}

fn board_size(grid: Grid, cell_width: u16) -> (u16, u16) {
    (
        grid.width().saturating_mul(cell_width).saturating_add(2),
        grid.height().saturating_add(2),
    )
}

fn checker_color(cell: Position) -> Color {
    if (cell.x + cell.y) % 2 == 0 {
        BRIGHTER_GRID_COLOR
    } else {
        DARKER_GRID_COLOR
    }
}

fn head_glyph(direction: Direction) -> &'static str {
    match direction {
        Direction::Up => GLYPH_HEAD_UP,
        Direction::Down => GLYPH_HEAD_DOWN,
        Direction::Left => GLYPH_HEAD_LEFT,
        Direction::Right => GLYPH_HEAD_RIGHT,
    }
}

struct Canvas<'a> {
    area: Rect,
    cell_width: u16,
    buf: &'a mut Buffer,
}

impl Canvas<'_> {
    fn fill(&mut self, position: Position, color: Color) {
        let Some((x, y)) = self.origin(position) else {
            return;
        };

        for column in 0..self.cell_width {
            let x = x.saturating_add(column);
            if x >= self.area.right() {
                break;
            }
            if let Some(cell) = self.buf.cell_mut((x, y)) {
                cell.set_symbol(" ").set_bg(color);
            }
        }
    }

    fn mark(&mut self, position: Position, glyph: &str) {
        let Some((x, y)) = self.origin(position) else {
            return;
        };

        if let Some(cell) = self.buf.cell_mut((x, y)) {
            cell.set_symbol(glyph).set_fg(BRIGHTER_GRID_COLOR);
        }
    }

    /// Terminal coordinates of the top-left column of a grid cell, or `None`
    /// when it is clipped away.
    fn origin(&self, position: Position) -> Option<(u16, u16)> {
        let column = u16::try_from(position.x).ok()?;
        let row = u16::try_from(position.y).ok()?;

        let x = self
            .area
            .x
            .saturating_add(column.saturating_mul(self.cell_width));
        let y = self.area.y.saturating_add(row);
        if x >= self.area.right() || y >= self.area.bottom() {
            return None;
        }

        Some((x, y))
    }
}

/// Render sink drawing onto the live terminal.
pub struct TerminalRenderer {
    session: TerminalSession,
    cell_width: u16,
}

impl TerminalRenderer {
    #[must_use]
    pub fn new(session: TerminalSession, cell_width: u16) -> Self {
        Self {
            session,
            cell_width,
        }
    }

    /// Stops drawing and restores the terminal.
    pub fn finish(self) -> io::Result<()> {
        self.session.leave()
    }

    /// Smallest terminal area, in columns and rows, that shows the whole grid.
    #[must_use]
    pub fn required_size(grid: Grid, cell_width: u16) -> (u16, u16) {
        board_size(grid, cell_width.max(1))
    }
}

impl RenderSink for TerminalRenderer {
    fn render(&mut self, snapshot: &Snapshot) -> io::Result<()> {
        let cell_width = self.cell_width;
        self.session.draw(|frame| {
            frame.render_widget(BoardWidget::new(snapshot, cell_width), frame.area());
        })
    }
}
