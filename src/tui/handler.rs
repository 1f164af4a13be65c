use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::InputMode;
use crate::models::Section;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    Quit,
    GoTo(Section),
    NextSection,
    PreviousSection,
    Activate,
    UploadResume,
    EditJobDescription,
    MoveUp,
    MoveDown,
    PageUp,
    PageDown,
    ToggleAnswer,
    OpenLink,
    Save,
    ShowHelp,
    HideHelp,
    // Text input actions
    InputChar(char),
    InputPaste(String),
    InputNewline,
    InputBackspace,
    InputConfirm,
    InputCancel,
}

pub fn handle_key_event(key: KeyEvent, input_mode: InputMode, show_help: bool) -> Option<AppAction> {
    // If help is showing, any key closes it
    if show_help {
        return Some(AppAction::HideHelp);
    }

    if input_mode != InputMode::Normal {
        return match (key.code, key.modifiers) {
            (KeyCode::Enter, KeyModifiers::ALT) => Some(AppAction::InputNewline),
            (KeyCode::Char('j'), KeyModifiers::CONTROL) => Some(AppAction::InputNewline),
            (KeyCode::Enter, _) => Some(AppAction::InputConfirm),
            (KeyCode::Esc, _) => Some(AppAction::InputCancel),
            (KeyCode::Backspace, _) => Some(AppAction::InputBackspace),
            (KeyCode::Char(c), m) if (m - KeyModifiers::SHIFT).is_empty() => {
                Some(AppAction::InputChar(c))
            }
            _ => None,
        };
    }

    match (key.code, key.modifiers) {
        (KeyCode::Char('q'), _) => Some(AppAction::Quit),
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Some(AppAction::Quit),

        (KeyCode::Char(c @ '1'..='5'), _) => c
            .to_digit(10)
            .and_then(|n| Section::from_number(n as usize))
            .map(AppAction::GoTo),
        (KeyCode::Tab, _) => Some(AppAction::NextSection),
        (KeyCode::BackTab, _) => Some(AppAction::PreviousSection),

        (KeyCode::Char('j'), _) | (KeyCode::Down, _) => Some(AppAction::MoveDown),
        (KeyCode::Char('k'), _) | (KeyCode::Up, _) => Some(AppAction::MoveUp),
        (KeyCode::PageDown, _) => Some(AppAction::PageDown),
        (KeyCode::PageUp, _) => Some(AppAction::PageUp),

        (KeyCode::Enter, _) | (KeyCode::Char('g'), _) => Some(AppAction::Activate),
        (KeyCode::Char('u'), _) => Some(AppAction::UploadResume),
        (KeyCode::Char('e'), _) => Some(AppAction::EditJobDescription),
        (KeyCode::Char(' '), _) => Some(AppAction::ToggleAnswer),
        (KeyCode::Char('o'), _) => Some(AppAction::OpenLink),
        (KeyCode::Char('s'), _) => Some(AppAction::Save),

        (KeyCode::Char('?'), _) => Some(AppAction::ShowHelp),

        _ => None,
    }
}
