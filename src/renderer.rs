use std::io::{self, Stdout};
use std::panic;

use crossterm::cursor::{Hide, Show};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::backend::CrosstermBackend;
use ratatui::{Frame, Terminal};
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::Block;

use crate::config::{BORDER_HALF_BLOCK, GLYPH_FOOD, GLYPH_SNAKE, GridSize, HUD_ROWS, THEME};
use crate::game::{GameStatus, Snapshot};
use crate::snake::Position;
use crate::ui::hud::{HudInfo, render_hud};
use crate::ui::menu::{render_game_over_menu, render_pause_menu, render_start_menu};

/// Everything drawn in one frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameView<'a> {
    pub snapshot: Snapshot<'a>,
    pub hud: HudInfo,
    /// Terminal rows per logical cell; columns are twice this.
    pub cell_size: u16,
}

/// Sink for rendered frames.
pub trait Renderer {
    fn render(&mut self, view: &FrameView<'_>) -> io::Result<()>;
}

/// Draws frames into the alternate screen of the controlling terminal.
///
/// Holds the terminal in raw mode for as long as it lives; dropping it puts
/// the screen back the way it was.
pub struct TerminalRenderer {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalRenderer {
    /// Switches to raw mode on the alternate screen with the cursor hidden.
    ///
    /// A failure part way through restores whatever was already changed.
    pub fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        let terminal = execute!(io::stdout(), EnterAlternateScreen, Hide)
            .and_then(|()| Terminal::new(CrosstermBackend::new(io::stdout())));

        match terminal {
            Ok(terminal) => Ok(Self { terminal }),
            Err(error) => {
                restore_terminal();
                Err(error)
            }
        }
    }

    /// Terminal size as `(cols, rows)`.
    pub fn viewport(&self) -> io::Result<(u16, u16)> {
        let size = self.terminal.size()?;
        Ok((size.width, size.height))
    }
}

impl Renderer for TerminalRenderer {
    fn render(&mut self, view: &FrameView<'_>) -> io::Result<()> {
        self.terminal.draw(|frame| render(frame, view))?;
        Ok(())
    }
}

impl Drop for TerminalRenderer {
    fn drop(&mut self) {
        restore_terminal();
    }
}

/// Chains a panic hook that leaves the alternate screen first, so the
/// panic message lands on the normal screen.
pub fn install_panic_hook() {
    let previous = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        restore_terminal();
        previous(info);
    }));
}

fn restore_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), Show, LeaveAlternateScreen);
}

/// Renders the full game frame from an immutable view.
pub fn render(frame: &mut Frame<'_>, view: &FrameView<'_>) {
    let snapshot = &view.snapshot;
    let field = field_area(frame.area(), snapshot.bounds, view.cell_size);
    let hud_area = Rect {
        x: field.x,
        y: field.bottom().min(frame.area().bottom().saturating_sub(HUD_ROWS)),
        width: field.width,
        height: HUD_ROWS.min(frame.area().height),
    };

    let block = Block::bordered()
        .border_set(BORDER_HALF_BLOCK)
        .border_style(Style::new().fg(THEME.border_fg))
        .style(Style::new().bg(THEME.play_bg));
    let inner = block.inner(field);
    frame.render_widget(block, field);

    render_food(frame, inner, snapshot, view.cell_size);
    render_snake(frame, inner, snapshot, view.cell_size);
    render_hud(frame, hud_area, snapshot, &view.hud);

    match snapshot.status {
        GameStatus::Ready => render_start_menu(frame, field, &view.hud),
        GameStatus::Paused => render_pause_menu(frame, field),
        GameStatus::GameOver | GameStatus::Won => {
            render_game_over_menu(frame, field, snapshot, &view.hud);
        }
        GameStatus::Running => {}
    }
}

/// Centers the bordered play field inside `area`, clipped to fit.
fn field_area(area: Rect, bounds: GridSize, cell_size: u16) -> Rect {
    let side = bounds.side().saturating_mul(cell_size);
    let width = side.saturating_mul(2).saturating_add(2).min(area.width);
    let height = side
        .saturating_add(2)
        .min(area.height.saturating_sub(HUD_ROWS));

    let [column] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(area);
    let [field] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Start)
        .areas(column);
    field
}

fn render_food(frame: &mut Frame<'_>, inner: Rect, snapshot: &Snapshot<'_>, cell_size: u16) {
    let Some(food) = snapshot.food else {
        return;
    };
    let Some(cell) = cell_rect(inner, snapshot.bounds, food, cell_size) else {
        return;
    };

    let style = Style::new().fg(THEME.food).bg(THEME.play_bg);
    let buffer = frame.buffer_mut();
    for y in cell.y..cell.bottom() {
        for x in (cell.x..cell.right()).step_by(2) {
            buffer.set_string(x, y, GLYPH_FOOD, style);
        }
    }
}

fn render_snake(frame: &mut Frame<'_>, inner: Rect, snapshot: &Snapshot<'_>, cell_size: u16) {
    let buffer = frame.buffer_mut();
    for (index, segment) in snapshot.snake.segments().enumerate() {
        let Some(cell) = cell_rect(inner, snapshot.bounds, *segment, cell_size) else {
            continue;
        };

        let style = if index == 0 {
            Style::new()
                .fg(THEME.snake_head)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::new().fg(THEME.snake_body)
        };

        for y in cell.y..cell.bottom() {
            for x in (cell.x..cell.right()).step_by(2) {
                buffer.set_string(x, y, GLYPH_SNAKE, style);
            }
        }
    }
}

/// Screen rectangle for a logical cell, or `None` when it falls outside.
fn cell_rect(inner: Rect, bounds: GridSize, position: Position, cell_size: u16) -> Option<Rect> {
    if !position.is_within_bounds(bounds) {
        return None;
    }

    let x_offset = u16::try_from(position.x).ok()?.checked_mul(cell_size * 2)?;
    let y_offset = u16::try_from(position.y).ok()?.checked_mul(cell_size)?;

    let x = inner.x.saturating_add(x_offset);
    let y = inner.y.saturating_add(y_offset);
    if x >= inner.right() || y >= inner.bottom() {
        return None;
    }

    Some(Rect {
        x,
        y,
        width: (cell_size * 2).min(inner.right() - x),
        height: cell_size.min(inner.bottom() - y),
    })
}
