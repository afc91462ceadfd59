//! Key event handlers
//!
//! Keys resolve in layers: quit confirmation, then the detail overlay, then
//! the focused card, then global bindings.

use crate::cards::Card;
use crate::input_key::InputKey;
use crate::message::{CardInput, Message};
use crate::state::{AppPhase, AppState};

/// Convert key events to messages
pub fn handle_key(state: &AppState, key: InputKey) -> Option<Message> {
    if key == InputKey::CharCtrl('c') {
        return Some(Message::Quit);
    }

    if state.phase == AppPhase::ConfirmQuit {
        return handle_key_confirm_quit(key);
    }

    if state.detail.is_some() {
        return handle_key_detail(key);
    }

    if let Some(id) = state.focused_id() {
        let card = state.card(id);
        if let Some(input) = card.and_then(|card| card_input(card, key)) {
            return Some(Message::CardInput { card: id, input });
        }
        // No reload from inside the alarm keypad
        if matches!(card, Some(Card::Alarm(_))) && key == InputKey::Char('r') {
            return None;
        }
    }

    handle_key_global(key)
}

fn handle_key_confirm_quit(key: InputKey) -> Option<Message> {
    match key {
        InputKey::Char('y') | InputKey::Char('Y') | InputKey::Enter => Some(Message::ConfirmQuit),
        InputKey::Char('n') | InputKey::Char('N') | InputKey::Esc => Some(Message::CancelQuit),
        _ => None,
    }
}

fn handle_key_detail(key: InputKey) -> Option<Message> {
    match key {
        InputKey::Esc | InputKey::Enter => Some(Message::CloseDetail),
        InputKey::Char('q') => Some(Message::RequestQuit),
        _ => None,
    }
}

/// Card-specific binding for `key`, if the card claims it.
fn card_input(card: &Card, key: InputKey) -> Option<CardInput> {
    match card {
        Card::Alarm(_) => match key {
            k if k.digit().is_some() => k.digit().map(CardInput::Digit),
            InputKey::Backspace => Some(CardInput::ClearCode),
            InputKey::Enter => Some(CardInput::ConfirmCode),
            InputKey::Char('a') => Some(CardInput::ArmAway),
            InputKey::Char('h') => Some(CardInput::ArmHome),
            InputKey::Char('d') => Some(CardInput::Disarm),
            _ => None,
        },

        Card::Light(_) => match key {
            InputKey::Enter | InputKey::Char(' ') => Some(CardInput::Toggle),
            InputKey::Char('+') | InputKey::Char('=') => Some(CardInput::BrightnessUp),
            InputKey::Char('-') => Some(CardInput::BrightnessDown),
            _ => None,
        },

        Card::Picture(_) => match key {
            InputKey::Char('f') => Some(CardInput::RefreshFeed),
            InputKey::Enter => Some(CardInput::Activate),
            _ => None,
        },

        Card::Button(_) | Card::Glance(_) | Card::Status(_) => match key {
            InputKey::Right | InputKey::Down => Some(CardInput::SelectNext),
            InputKey::Left | InputKey::Up => Some(CardInput::SelectPrev),
            InputKey::Enter | InputKey::Char(' ') => Some(CardInput::Activate),
            _ => None,
        },

        _ => match key {
            InputKey::Enter => Some(CardInput::Activate),
            _ => None,
        },
    }
}

fn handle_key_global(key: InputKey) -> Option<Message> {
    match key {
        InputKey::Char('q') => Some(Message::RequestQuit),
        InputKey::Esc => Some(Message::CloseDetail),

        InputKey::Tab | InputKey::Right | InputKey::Down | InputKey::Char('j') => {
            Some(Message::FocusNext)
        }
        InputKey::BackTab | InputKey::Left | InputKey::Up | InputKey::Char('k') => {
            Some(Message::FocusPrev)
        }

        InputKey::Char(']') | InputKey::PageDown => Some(Message::NextView),
        InputKey::Char('[') | InputKey::PageUp => Some(Message::PrevView),

        InputKey::Char('r') => Some(Message::ReloadDashboard),

        _ => None,
    }
}
