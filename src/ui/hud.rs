use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::config::THEME;
use crate::game::Snapshot;
use crate::scheduler::Difficulty;

const SEPARATOR: &str = " │ ";

/// Values shown next to the board that do not live in the engine.
#[derive(Debug, Clone, Copy)]
pub struct HudInfo {
    pub high_score: u32,
    /// Best score when the current game started; used to flag a new record.
    pub best_at_start: u32,
    pub difficulty: Difficulty,
}

/// Renders the score row and the key-hint row into `area`.
pub fn render_hud(frame: &mut Frame<'_>, area: Rect, snapshot: &Snapshot<'_>, info: &HudInfo) {
    let [score_row, hint_row] =
        Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).areas(area);

    frame.render_widget(
        Paragraph::new(score_line(
            snapshot.score,
            info.high_score,
            snapshot.snake.len(),
            info.difficulty,
            usize::from(score_row.width),
        ))
        .alignment(Alignment::Center),
        score_row,
    );

    frame.render_widget(
        Paragraph::new(Line::from("[P] pause  [R] restart  [Tab] speed  [Q] quit"))
            .alignment(Alignment::Center)
            .style(Style::default().fg(THEME.menu_footer)),
        hint_row,
    );
}

/// Builds the score row, falling back to one-letter labels when the full
/// row does not fit in `available_width`.
fn score_line(
    score: u32,
    high_score: u32,
    length: usize,
    difficulty: Difficulty,
    available_width: usize,
) -> Line<'static> {
    let full = score_fields(score, high_score, length, difficulty, false);
    let fields = if fields_width(&full) > available_width {
        score_fields(score, high_score, length, difficulty, true)
    } else {
        full
    };

    let label_style = Style::default().fg(THEME.hud_label);
    let value_style = Style::default().fg(THEME.hud_value);
    let mut spans = Vec::with_capacity(fields.len() * 3);
    for (index, (label, value)) in fields.into_iter().enumerate() {
        if index > 0 {
            spans.push(Span::styled(SEPARATOR, label_style));
        }
        spans.push(Span::styled(format!("{label}: "), label_style));
        spans.push(Span::styled(value, value_style));
    }

    Line::from(spans)
}

/// Label and value for each HUD field, in display order.
fn score_fields(
    score: u32,
    high_score: u32,
    length: usize,
    difficulty: Difficulty,
    compact: bool,
) -> [(&'static str, String); 4] {
    let [score_label, best_label, length_label, speed_label] = if compact {
        ["S", "Hi", "L", "V"]
    } else {
        ["Score", "Best", "Length", "Speed"]
    };

    [
        (score_label, score.to_string()),
        (best_label, high_score.to_string()),
        (length_label, length.to_string()),
        (speed_label, difficulty.to_string()),
    ]
}

/// Rendered width of `fields` joined by [`SEPARATOR`].
fn fields_width(fields: &[(&str, String)]) -> usize {
    let text: usize = fields
        .iter()
        .map(|(label, value)| label.chars().count() + 2 + value.chars().count())
        .sum();
    text + SEPARATOR.chars().count() * fields.len().saturating_sub(1)
}
