//! Entity detail overlay

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Clear, Paragraph, Widget, Wrap};

use muthur_core::{value_to_display, EntityState};

use super::confirm_quit::centered_rect;
use super::{spread, truncate};
use crate::theme::styles;

pub struct DetailOverlay<'a> {
    entity_id: &'a str,
    entity: Option<&'a EntityState>,
}

impl<'a> DetailOverlay<'a> {
    pub fn new(entity_id: &'a str, entity: Option<&'a EntityState>) -> Self {
        Self { entity_id, entity }
    }

    fn lines(&self, width: usize) -> Vec<Line<'static>> {
        let Some(entity) = self.entity else {
            return vec![Line::from(Span::styled(
                format!("Entity {} not found", self.entity_id),
                styles::alert(),
            ))];
        };

        let mut lines = vec![
            Line::from(Span::styled(
                spread("STATE", &entity.state.to_uppercase(), width),
                styles::text_bold(),
            )),
        ];
        if let Some(changed) = entity.last_changed {
            lines.push(Line::from(Span::styled(
                spread(
                    "LAST CHANGED",
                    &changed.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
                    width,
                ),
                styles::text_secondary(),
            )));
        }

        if !entity.attributes.is_empty() {
            lines.push(Line::from(Span::styled("─".repeat(width), styles::text_muted())));
            let mut keys: Vec<&String> = entity.attributes.keys().collect();
            keys.sort();
            for key in keys {
                let value = value_to_display(&entity.attributes[key.as_str()]);
                lines.push(Line::from(vec![
                    Span::styled(format!("{key}: "), styles::text_secondary()),
                    Span::styled(truncate(&value, width), styles::text_primary()),
                ]));
            }
        }
        lines
    }
}

impl Widget for DetailOverlay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let width = area.width.saturating_sub(8).clamp(20, 70);
        let height = area.height.saturating_sub(4).max(5);
        let modal_area = centered_rect(width, height, area);
        Clear.render(modal_area, buf);

        let block = styles::modal_block(self.entity_id);
        let inner = block.inner(modal_area);
        block.render(modal_area, buf);

        Paragraph::new(self.lines(inner.width as usize))
            .wrap(Wrap { trim: false })
            .render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestTerminal;
    use serde_json::json;

    fn hull_sensor() -> EntityState {
        let mut entity = EntityState::new("sensor.hull_temp", "21.5");
        entity.attributes.insert("unit_of_measurement".into(), json!("°C"));
        entity.attributes.insert("friendly_name".into(), json!("Hull Temperature"));
        entity
    }

    #[test]
    fn test_detail_lists_state_and_sorted_attributes() {
        let entity = hull_sensor();
        let mut term = TestTerminal::new();
        term.render_widget(
            DetailOverlay::new("sensor.hull_temp", Some(&entity)),
            term.area(),
        );

        let content = term.content();
        assert!(content.contains("sensor.hull_temp"));
        assert!(content.contains("21.5"));
        let friendly = content.find("friendly_name").unwrap();
        let unit = content.find("unit_of_measurement").unwrap();
        assert!(friendly < unit, "attributes should be sorted by key");
    }

    #[test]
    fn test_detail_for_missing_entity() {
        let mut term = TestTerminal::new();
        term.render_widget(DetailOverlay::new("light.gone", None), term.area());

        assert!(term.buffer_contains("Entity light.gone not found"));
    }
}
