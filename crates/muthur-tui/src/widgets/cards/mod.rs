//! One widget per card type
//!
//! [`CardWidget`] picks the card's view model from `muthur_app::cards`, with
//! the card's runtime state where it has one, and draws it inside a glass
//! frame.

mod alarm;
mod button;
mod clock;
mod gauge;
mod glance;
mod light;
mod picture;
mod sensor;
mod status;
mod text;
mod weather;

pub(crate) use button::TILE_HEIGHT;
pub(crate) use glance::CELL_HEIGHT;

use chrono::{Local, Utc};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Widget;

use muthur_app::cards::alarm::AlarmKeypad;
use muthur_app::cards::picture::PictureFeed;
use muthur_app::cards::{self as card_views, Card};
use muthur_app::state::{AppState, CardId, CardRuntime};

use crate::theme::icons::IconSet;
use crate::theme::styles;

/// A card of the current view, drawn from application state.
pub struct CardWidget<'a> {
    state: &'a AppState,
    id: CardId,
    focused: bool,
    icons: IconSet,
}

impl<'a> CardWidget<'a> {
    pub fn new(state: &'a AppState, id: CardId, icons: IconSet) -> Self {
        Self {
            state,
            id,
            focused: state.focused_id() == Some(id),
            icons,
        }
    }
}

impl Widget for CardWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some(card) = self.state.card(self.id) else {
            return;
        };
        let runtime = self.state.runtime(self.id);
        let snapshot = &self.state.entities;
        let selection = runtime.selection().unwrap_or(0);
        let ctx = CardContext {
            focused: self.focused,
            icons: self.icons,
            tick: self.state.tick,
        };

        match card {
            Card::Status(config) => {
                status::StatusCard::new(card_views::status::view(config, snapshot), selection, ctx)
                    .render(area, buf)
            }
            Card::Sensor(config) => {
                sensor::SensorCard::new(card_views::sensor::view(config, snapshot), ctx)
                    .render(area, buf)
            }
            Card::Button(config) => {
                button::ButtonCard::new(card_views::button::view(config, snapshot), selection, ctx)
                    .render(area, buf)
            }
            Card::Text(config) => {
                let view = card_views::text::view(config, snapshot);
                let visible = match runtime {
                    CardRuntime::Text(typing) => typing.visible(&view.content).to_string(),
                    _ => view.content.clone(),
                };
                text::TextCard::new(view, visible, ctx).render(area, buf)
            }
            Card::Gauge(config) => {
                gauge::GaugeCard::new(card_views::gauge::view(config, snapshot), ctx)
                    .render(area, buf)
            }
            Card::Clock(config) => {
                let now = match runtime {
                    CardRuntime::Clock { now } => *now,
                    _ => Local::now(),
                };
                let view =
                    card_views::clock::view(config, &now, &card_views::clock::timezone_label());
                clock::ClockCard::new(view, ctx).render(area, buf)
            }
            Card::Glance(config) => {
                glance::GlanceCard::new(card_views::glance::view(config, snapshot), selection, ctx)
                    .render(area, buf)
            }
            Card::Light(config) => {
                light::LightCard::new(card_views::light::view(config, snapshot), ctx)
                    .render(area, buf)
            }
            Card::Picture(config) => {
                let view = match runtime {
                    CardRuntime::Picture(feed) => card_views::picture::view(config, feed, snapshot),
                    _ => {
                        let feed =
                            PictureFeed::new(config, snapshot, &self.state.media_base, Utc::now());
                        card_views::picture::view(config, &feed, snapshot)
                    }
                };
                picture::PictureCard::new(view, ctx).render(area, buf)
            }
            Card::Weather(config) => {
                let view = card_views::weather::view(config, snapshot, &self.state.host_config);
                weather::WeatherCard::new(view, ctx).render(area, buf)
            }
            Card::Alarm(config) => {
                let idle = AlarmKeypad::new();
                let keypad = match runtime {
                    CardRuntime::Alarm(keypad) => keypad,
                    _ => &idle,
                };
                alarm::AlarmCard::new(card_views::alarm::view(config, keypad, snapshot), ctx)
                    .render(area, buf)
            }
        }
    }
}

/// What every card widget needs besides its view model.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CardContext {
    pub focused: bool,
    pub icons: IconSet,
    pub tick: u64,
}

impl CardContext {
    /// Draw the frame and return the area inside it.
    fn frame(&self, title: &str, area: Rect, buf: &mut Buffer) -> Rect {
        let block = styles::glass_block(title, self.focused);
        let inner = block.inner(area);
        block.render(area, buf);
        inner
    }

    /// Style for item `index` given the card's cursor at `selection`.
    fn item_style(&self, index: usize, selection: usize) -> ratatui::style::Style {
        match (index == selection, self.focused) {
            (true, true) => styles::focused_selected(),
            (true, false) => styles::unfocused_selected(),
            (false, _) => styles::text_primary(),
        }
    }

    /// Cursor that blinks with the UI tick.
    fn blink(&self) -> &'static str {
        if (self.tick / 10) % 2 == 0 {
            self.icons.cursor()
        } else {
            " "
        }
    }
}

fn not_found(entity_id: &str) -> Line<'static> {
    Line::from(Span::styled(
        format!("Entity {entity_id} not found"),
        styles::alert(),
    ))
}

/// Split `area` into `count` cells of `cell_height` rows laid out in
/// `columns` columns. Cells that do not fit are dropped.
fn grid(area: Rect, columns: usize, count: usize, cell_height: u16) -> Vec<Rect> {
    let columns = columns.max(1);
    let cell_width = area.width / columns as u16;
    if cell_width == 0 || cell_height == 0 {
        return Vec::new();
    }

    (0..count)
        .map(|i| {
            let col = (i % columns) as u16;
            let row = (i / columns) as u16;
            let x = area.x + col * cell_width;
            // Last column takes the rounding remainder
            let width = if col as usize == columns - 1 {
                area.width - col * cell_width
            } else {
                cell_width
            };
            Rect::new(x, area.y + row * cell_height, width, cell_height)
        })
        .take_while(|cell| cell.bottom() <= area.bottom())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use muthur_app::config::IconStyle;
    use muthur_core::EntityState;

    use crate::test_utils::{create_test_state, TestTerminal};

    const CARDS: &str = r#"
[connection]
url = "http://nostromo.local:8123"

[[views]]
title = "BRIDGE"

[[views.cards]]
type = "muthur-status-card"
entities = ["sensor.reactor", "sensor.coolant"]

[[views.cards]]
type = "muthur-button-card"
title = "AIRLOCKS"
columns = 2
buttons = ["switch.airlock_a", "switch.airlock_b"]

[[views.cards]]
type = "muthur-glance-card"
entities = ["sensor.reactor", "sensor.coolant"]

[[views.cards]]
type = "muthur-text-card"
content = "INTERFACE READY"

[[views.cards]]
type = "muthur-gauge-card"
entity = "sensor.reactor"

[[views.cards]]
type = "muthur-clock-card"
show_timezone = false

[[views.cards]]
type = "muthur-picture-card"
entity = "camera.missing"

[[views.cards]]
type = "muthur-weather-card"
entity = "weather.lv426"
"#;

    fn render_card(index: usize) -> TestTerminal {
        let mut state = create_test_state(CARDS);
        state.entities.insert(
            EntityState::new("sensor.reactor", "42")
                .with_attribute("friendly_name", "Reactor Output")
                .with_attribute("unit_of_measurement", "%"),
        );
        state.entities.insert(
            EntityState::new("switch.airlock_a", "on").with_attribute("friendly_name", "Airlock A"),
        );

        let mut term = TestTerminal::with_size(40, 12);
        let area = term.area();
        term.render_widget(
            CardWidget::new(&state, CardId::new(0, index), IconSet::new(IconStyle::Ascii)),
            area,
        );
        term
    }

    #[test]
    fn test_status_card_rows_and_message() {
        let term = render_card(0);
        assert!(term.buffer_contains("SYSTEM STATUS"));
        assert!(term.buffer_contains("Reactor Output"));
        assert!(term.buffer_contains("42 %"));
        assert!(term.buffer_contains("UNAVAILABLE"), "{}", term.content());
    }

    #[test]
    fn test_button_card_tiles() {
        let term = render_card(1);
        assert!(term.buffer_contains("AIRLOCKS"));
        assert!(term.buffer_contains("Airlock A"));
        assert!(term.buffer_contains("ON"));
    }

    #[test]
    fn test_glance_card_cells() {
        let term = render_card(2);
        assert!(term.buffer_contains("SYSTEM OVERVIEW"));
        assert!(term.buffer_contains("42 %"), "{}", term.content());
    }

    #[test]
    fn test_text_card_content() {
        let term = render_card(3);
        assert!(term.buffer_contains("MESSAGE"));
        assert!(term.buffer_contains("INTERFACE READY"));
    }

    #[test]
    fn test_gauge_card_reading() {
        let term = render_card(4);
        assert!(term.buffer_contains("GAUGE MONITOR"));
        assert!(term.buffer_contains("42.0"), "{}", term.content());
    }

    #[test]
    fn test_clock_card_title() {
        let term = render_card(5);
        assert!(term.buffer_contains("SYSTEM CHRONOMETER"));
        assert!(term.buffer_contains(":"));
    }

    #[test]
    fn test_picture_card_missing_camera() {
        let term = render_card(6);
        assert!(term.buffer_contains("VISUAL FEED"));
        assert!(term.buffer_contains("IMAGE UNAVAILABLE"), "{}", term.content());
    }

    #[test]
    fn test_weather_card_missing_entity() {
        let term = render_card(7);
        assert!(term.buffer_contains("Entity weather.lv426 not found"), "{}", term.content());
    }

    #[test]
    fn test_grid_wraps_into_rows() {
        let cells = grid(Rect::new(0, 0, 20, 10), 2, 3, 4);
        assert_eq!(cells.len(), 3);
        assert_eq!(cells[0], Rect::new(0, 0, 10, 4));
        assert_eq!(cells[1], Rect::new(10, 0, 10, 4));
        assert_eq!(cells[2], Rect::new(0, 4, 10, 4));
    }

    #[test]
    fn test_grid_drops_overflow() {
        let cells = grid(Rect::new(0, 0, 20, 6), 2, 6, 4);
        assert_eq!(cells.len(), 2);
    }

    #[test]
    fn test_grid_last_column_takes_remainder() {
        let cells = grid(Rect::new(0, 0, 11, 3), 2, 2, 3);
        assert_eq!(cells[1].width, 6);
    }
}
