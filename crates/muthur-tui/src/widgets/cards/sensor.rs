use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};

use muthur_app::cards::sensor::{SensorView, HEADER};

use super::{not_found, CardContext};
use crate::theme::styles;
use crate::widgets::{bar, spread};

pub struct SensorCard {
    view: SensorView,
    ctx: CardContext,
}

impl SensorCard {
    pub fn new(view: SensorView, ctx: CardContext) -> Self {
        Self { view, ctx }
    }
}

impl Widget for SensorCard {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner = self.ctx.frame(HEADER, area, buf);
        if inner.is_empty() {
            return;
        }
        let width = inner.width as usize;

        let lines = match &self.view {
            SensorView::Missing { entity_id } => vec![not_found(entity_id)],
            SensorView::Reading(reading) => {
                let mut lines = vec![
                    Line::from(Span::styled(
                        spread(
                            &reading.name,
                            reading.state_class.as_deref().unwrap_or(""),
                            width,
                        ),
                        styles::text_secondary(),
                    )),
                    Line::from(vec![
                        Span::styled(reading.value.clone(), styles::text_bold()),
                        Span::raw(" "),
                        Span::styled(reading.unit.clone(), styles::text_secondary()),
                    ]),
                ];
                if let Some(level) = reading.level {
                    lines.push(Line::from(Span::styled(
                        bar(level, width, self.ctx.icons),
                        styles::text_primary(),
                    )));
                }
                lines
            }
        };

        Paragraph::new(lines).render(inner, buf);
    }
}
