//! Card interaction handlers
//!
//! Every card interaction ends in one of: a local state change, a
//! [`HostRequest`] turned into a message or action, or nothing.

use chrono::{Local, Utc};

use muthur_core::prelude::*;

use crate::cards::alarm::{self, AlarmAction, ArmMode};
use crate::cards::picture::REFRESH_DELAY;
use crate::cards::{button, glance, light, text, Card};
use crate::host::HostRequest;
use crate::message::{CardInput, Message};
use crate::state::{AppState, CardId, CardRuntime};

use super::{UpdateAction, UpdateResult};

/// Apply one card interaction.
pub fn handle_card_input(state: &mut AppState, id: CardId, input: CardInput) -> UpdateResult {
    let Some(card) = state.card(id).cloned() else {
        return UpdateResult::none();
    };

    match (&card, input) {
        (_, CardInput::SelectNext) => {
            move_selection(state, id, card.item_count(), 1);
            UpdateResult::none()
        }
        (_, CardInput::SelectPrev) => {
            move_selection(state, id, card.item_count(), -1);
            UpdateResult::none()
        }

        (Card::Button(config), CardInput::Activate) => {
            let index = state.runtime(id).selection().unwrap_or(0);
            let request = config.buttons.get(index).and_then(button::ButtonEntry::activate);
            dispatch_request(state, id, request)
        }

        (Card::Glance(config), CardInput::Activate) => {
            let index = state.runtime(id).selection().unwrap_or(0);
            let request = glance::activate(config, &state.entities, index);
            dispatch_request(state, id, request)
        }

        (Card::Status(config), CardInput::Activate) => {
            let index = state.runtime(id).selection().unwrap_or(0);
            let request = config
                .entities
                .get(index)
                .map(|e| e.entity_id())
                .filter(|e| state.entities.get(e).is_some())
                .map(|e| HostRequest::ShowDetail {
                    entity_id: e.to_string(),
                });
            dispatch_request(state, id, request)
        }

        (Card::Light(config), CardInput::Toggle | CardInput::Activate) => {
            let request = light::toggle_call(config, &state.entities).map(HostRequest::CallService);
            dispatch_request(state, id, request)
        }
        (Card::Light(config), CardInput::BrightnessUp | CardInput::BrightnessDown) => {
            let step = i16::from(light::BRIGHTNESS_STEP);
            let delta = if input == CardInput::BrightnessUp { step } else { -step };
            let request =
                light::step_brightness(config, &state.entities, delta).map(HostRequest::CallService);
            dispatch_request(state, id, request)
        }

        (Card::Picture(config), CardInput::RefreshFeed) => {
            let started = match state.runtime.get_mut(&id) {
                Some(CardRuntime::Picture(feed)) => feed.begin_refresh(config),
                _ => false,
            };
            if started {
                UpdateResult::action(UpdateAction::ScheduleMessage {
                    delay: REFRESH_DELAY,
                    message: Box::new(Message::PictureRefreshDone { card: id }),
                })
            } else {
                UpdateResult::none()
            }
        }

        (Card::Alarm(config), input) => handle_alarm_input(state, id, config, input),

        (_, CardInput::Activate) => {
            let request = card
                .primary_entity()
                .filter(|e| state.entities.get(e).is_some())
                .map(|e| HostRequest::ShowDetail {
                    entity_id: e.to_string(),
                });
            dispatch_request(state, id, request)
        }

        _ => UpdateResult::none(),
    }
}

fn move_selection(state: &mut AppState, id: CardId, count: usize, step: isize) {
    if count == 0 {
        return;
    }
    if let Some(CardRuntime::Selection(index)) = state.runtime.get_mut(&id) {
        *index = (*index as isize + step).rem_euclid(count as isize) as usize;
    }
}

fn handle_alarm_input(
    state: &mut AppState,
    id: CardId,
    config: &alarm::AlarmConfig,
    input: CardInput,
) -> UpdateResult {
    let entity = state.entities.get(&config.entity).cloned();
    let Some(CardRuntime::Alarm(keypad)) = state.runtime.get_mut(&id) else {
        return UpdateResult::none();
    };

    let offered = |action: AlarmAction| {
        entity
            .as_ref()
            .is_some_and(|e| alarm::available_actions(&e.state).contains(&action))
    };

    let call = match input {
        CardInput::Digit(digit) => {
            keypad.press_digit(digit);
            None
        }
        CardInput::ClearCode => {
            keypad.press_clear();
            None
        }
        CardInput::ConfirmCode | CardInput::Activate => keypad.press_confirm(config, entity.as_ref()),
        CardInput::ArmAway if offered(AlarmAction::Arm(ArmMode::Away)) => {
            Some(keypad.arm(config, ArmMode::Away))
        }
        CardInput::ArmHome if offered(AlarmAction::Arm(ArmMode::Home)) => {
            Some(keypad.arm(config, ArmMode::Home))
        }
        CardInput::Disarm if offered(AlarmAction::Disarm) => keypad.disarm(config),
        _ => None,
    };

    dispatch_request(state, id, call.map(HostRequest::CallService))
}

/// Turn a card's request into the matching state change or action.
pub fn dispatch_request(
    state: &mut AppState,
    origin: CardId,
    request: Option<HostRequest>,
) -> UpdateResult {
    match request {
        None => UpdateResult::none(),
        Some(HostRequest::CallService(call)) => {
            state.notice(format!("EXECUTING {}", call.qualified_name().to_uppercase()));
            UpdateResult::action(UpdateAction::CallService { origin, call })
        }
        Some(HostRequest::ShowDetail { entity_id }) => {
            UpdateResult::message(Message::ShowDetail { entity_id })
        }
        Some(HostRequest::Navigate { path }) => UpdateResult::message(Message::Navigate { path }),
        Some(HostRequest::OpenUrl { url }) => {
            state.notice(format!("OPENING {url}"));
            UpdateResult::action(UpdateAction::OpenUrl { url })
        }
    }
}

/// Apply the outcome of a service call to the card that issued it.
///
/// A reload may have put another card in `origin`'s slot; the keypad only
/// takes outcomes for the panel it still shows.
pub fn handle_service_call_finished(
    state: &mut AppState,
    origin: CardId,
    service: &str,
    entity_id: Option<&str>,
    result: std::result::Result<(), String>,
) -> UpdateResult {
    if let Err(e) = &result {
        warn!("Service call {} from card {} failed: {}", service, origin, e);
    }

    let same_panel = matches!(
        state.card(origin),
        Some(Card::Alarm(config)) if entity_id == Some(config.entity.as_str())
    );

    match state.runtime.get_mut(&origin) {
        Some(CardRuntime::Alarm(keypad)) if same_panel => {
            keypad.on_request_finished(&result);
            if result.is_ok() {
                state.status = None;
            }
        }
        _ => match result {
            Ok(()) => state.notice(format!("{} COMPLETE", service.to_uppercase())),
            Err(e) => state.error(format!("{} FAILED: {}", service.to_uppercase(), e)),
        },
    }
    UpdateResult::none()
}

/// A card's periodic timer fired.
pub fn handle_timer_fired(state: &mut AppState, id: CardId) -> UpdateResult {
    let Some(card) = state.card(id).cloned() else {
        return UpdateResult::none();
    };
    let content = match &card {
        Card::Text(config) => Some(text::content(config, &state.entities)),
        _ => None,
    };

    match (state.runtime.get_mut(&id), &card) {
        (Some(CardRuntime::Clock { now }), Card::Clock(_)) => *now = Local::now(),
        (Some(CardRuntime::Picture(feed)), Card::Picture(config)) => {
            feed.recompute(config, &state.entities, &state.media_base, Utc::now());
        }
        (Some(CardRuntime::Text(typing)), Card::Text(_)) => {
            if let Some(content) = content {
                typing.advance(&content);
            }
        }
        _ => trace!("Timer fired for card {} without runtime", id),
    }
    UpdateResult::none()
}

/// The loading delay of a manual refresh passed; build a fresh URL.
pub fn handle_picture_refresh_done(state: &mut AppState, id: CardId) -> UpdateResult {
    if let (Some(Card::Picture(config)), Some(CardRuntime::Picture(feed))) =
        (state.dashboard.view(id.view).and_then(|v| v.cards.get(id.index)), state.runtime.get_mut(&id))
    {
        feed.recompute(config, &state.entities, &state.media_base, Utc::now());
    }
    UpdateResult::none()
}
