use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::scheduler::Difficulty;

/// Canonical movement directions for snake input.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Returns the opposite direction.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Unit offset `(dx, dy)` for one step; `y` grows downwards.
    #[must_use]
    pub fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }
}

/// High-level commands consumed by the session loop.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Command {
    Steer(Direction),
    Start,
    Restart,
    TogglePause,
    ChangeDifficulty(Difficulty),
    CycleDifficulty,
    Resize { cols: u16, rows: u16 },
    Quit,
}

/// Returns whether a direction change is legal (no immediate 180° turns).
#[must_use]
pub fn direction_change_is_valid(current: Direction, next: Direction) -> bool {
    next != current.opposite()
}

/// Maps a browser-style key identifier to a direction.
///
/// Arrow names and `w`/`a`/`s`/`d` are recognised; anything else is `None`.
#[must_use]
pub fn direction_for_key(key: &str) -> Option<Direction> {
    match key {
        "ArrowUp" | "w" => Some(Direction::Up),
        "ArrowDown" | "s" => Some(Direction::Down),
        "ArrowLeft" | "a" => Some(Direction::Left),
        "ArrowRight" | "d" => Some(Direction::Right),
        _ => None,
    }
}

/// Source of commands for the session loop.
pub trait InputSource {
    /// Waits up to `timeout` for the next command.
    ///
    /// Returns `Ok(None)` when nothing mapped arrived in time.
    fn poll(&mut self, timeout: Duration) -> io::Result<Option<Command>>;
}

/// Keyboard and terminal-resize input read through crossterm.
#[derive(Debug, Default)]
pub struct InputHandler;

impl InputHandler {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl InputSource for InputHandler {
    fn poll(&mut self, timeout: Duration) -> io::Result<Option<Command>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }

        Ok(match event::read()? {
            Event::Key(key) => map_key_event(key),
            Event::Resize(cols, rows) => Some(Command::Resize { cols, rows }),
            _ => None,
        })
    }
}

/// Translates one key event into a command; unmapped keys yield `None`.
#[must_use]
pub fn map_key_event(key: KeyEvent) -> Option<Command> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Command::Quit);
    }

    let command = match key.code {
        KeyCode::Up => Command::Steer(Direction::Up),
        KeyCode::Down => Command::Steer(Direction::Down),
        KeyCode::Left => Command::Steer(Direction::Left),
        KeyCode::Right => Command::Steer(Direction::Right),
        KeyCode::Enter | KeyCode::Char(' ') => Command::Start,
        KeyCode::Esc => Command::TogglePause,
        KeyCode::Tab => Command::CycleDifficulty,
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            key @ ('w' | 'a' | 's' | 'd') => {
                Command::Steer(direction_for_key(&key.to_string())?)
            }
            'p' => Command::TogglePause,
            'r' => Command::Restart,
            'q' => Command::Quit,
            '1' => Command::ChangeDifficulty(Difficulty::Easy),
            '2' => Command::ChangeDifficulty(Difficulty::Medium),
            '3' => Command::ChangeDifficulty(Difficulty::Hard),
            _ => return None,
        },
        _ => return None,
    };

    Some(command)
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

    use super::{Command, Direction, direction_change_is_valid, direction_for_key, map_key_event};
    use crate::scheduler::Difficulty;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn opposite_direction_is_correct() {
        assert_eq!(Direction::Up.opposite(), Direction::Down);
        assert_eq!(Direction::Down.opposite(), Direction::Up);
        assert_eq!(Direction::Left.opposite(), Direction::Right);
        assert_eq!(Direction::Right.opposite(), Direction::Left);
    }

    #[test]
    fn direction_change_rejects_reverse() {
        assert!(!direction_change_is_valid(Direction::Up, Direction::Down));
        assert!(!direction_change_is_valid(Direction::Down, Direction::Up));
        assert!(!direction_change_is_valid(Direction::Left, Direction::Right));
        assert!(!direction_change_is_valid(Direction::Right, Direction::Left));

        assert!(direction_change_is_valid(Direction::Up, Direction::Left));
        assert!(direction_change_is_valid(Direction::Up, Direction::Up));
    }

    #[test]
    fn browser_key_table_maps_arrows_and_wasd() {
        assert_eq!(direction_for_key("ArrowUp"), Some(Direction::Up));
        assert_eq!(direction_for_key("ArrowDown"), Some(Direction::Down));
        assert_eq!(direction_for_key("ArrowLeft"), Some(Direction::Left));
        assert_eq!(direction_for_key("ArrowRight"), Some(Direction::Right));
        assert_eq!(direction_for_key("w"), Some(Direction::Up));
        assert_eq!(direction_for_key("a"), Some(Direction::Left));
        assert_eq!(direction_for_key("s"), Some(Direction::Down));
        assert_eq!(direction_for_key("d"), Some(Direction::Right));
        assert_eq!(direction_for_key("x"), None);
        assert_eq!(direction_for_key("Enter"), None);
    }

    #[test]
    fn terminal_keys_map_to_commands() {
        assert_eq!(
            map_key_event(press(KeyCode::Left)),
            Some(Command::Steer(Direction::Left))
        );
        assert_eq!(
            map_key_event(press(KeyCode::Char('W'))),
            Some(Command::Steer(Direction::Up))
        );
        assert_eq!(map_key_event(press(KeyCode::Enter)), Some(Command::Start));
        assert_eq!(
            map_key_event(press(KeyCode::Char('r'))),
            Some(Command::Restart)
        );
        assert_eq!(
            map_key_event(press(KeyCode::Char('3'))),
            Some(Command::ChangeDifficulty(Difficulty::Hard))
        );
        assert_eq!(
            map_key_event(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Command::Quit)
        );
    }

    #[test]
    fn unmapped_and_released_keys_are_ignored() {
        assert_eq!(map_key_event(press(KeyCode::Char('x'))), None);
        assert_eq!(map_key_event(press(KeyCode::F(5))), None);

        let mut release = press(KeyCode::Up);
        release.kind = KeyEventKind::Release;
        assert_eq!(map_key_event(release), None);
    }
}
