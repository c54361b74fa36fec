use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use norm_pacman::{Direction, InputEvent};

/// What a key press means to the front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Game(InputEvent),
    /// Dump the player position to the log.
    DebugPosition,
    /// Unbound key. Only the start screen reacts to it.
    Other,
}

pub fn map_key(key: KeyEvent) -> Option<Command> {
    if !matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Command::Game(InputEvent::Quit));
    }
    let event = match key.code {
        KeyCode::Up | KeyCode::Char('k') => InputEvent::Direction(Direction::Up),
        KeyCode::Down | KeyCode::Char('j') => InputEvent::Direction(Direction::Down),
        KeyCode::Left | KeyCode::Char('h') => InputEvent::Direction(Direction::Left),
        KeyCode::Right | KeyCode::Char('l') => InputEvent::Direction(Direction::Right),
        KeyCode::Enter | KeyCode::Char(' ') => InputEvent::Confirm,
        KeyCode::Char('s') | KeyCode::Tab => InputEvent::ToggleScoreboard,
        KeyCode::Char('q') | KeyCode::Esc => InputEvent::Quit,
        KeyCode::Char('p') => return Some(Command::DebugPosition),
        _ => return Some(Command::Other),
    };
    Some(Command::Game(event))
}
