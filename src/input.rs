//! Key bindings: arrows and vim-style.

use crate::game::Command;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Action from a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Move(Command),
    Quit,
    None,
}

/// Map key event to game action. Unbound keys map to `Action::None`.
pub fn key_to_action(key: KeyEvent) -> Action {
    let KeyEvent { code, modifiers, .. } = key;
    if modifiers == KeyModifiers::CONTROL {
        return match code {
            KeyCode::Char('c') => Action::Quit,
            _ => Action::None,
        };
    }
    let no_mod = modifiers.is_empty() || modifiers == KeyModifiers::SHIFT;
    if !no_mod {
        return Action::None;
    }
    match code {
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        KeyCode::Left | KeyCode::Char('h') => Action::Move(Command::MoveLeft),
        KeyCode::Right | KeyCode::Char('l') => Action::Move(Command::MoveRight),
        KeyCode::Down | KeyCode::Char('j') => Action::Move(Command::SoftDrop),
        KeyCode::Up | KeyCode::Char('k') => Action::Move(Command::Rotate),
        _ => Action::None,
    }
}
