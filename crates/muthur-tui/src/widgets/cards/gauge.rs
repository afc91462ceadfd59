use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};

use muthur_app::cards::gauge::GaugeView;

use super::{not_found, CardContext};
use crate::theme::styles;
use crate::widgets::{bar, spread};

pub struct GaugeCard {
    view: GaugeView,
    ctx: CardContext,
}

impl GaugeCard {
    pub fn new(view: GaugeView, ctx: CardContext) -> Self {
        Self { view, ctx }
    }
}

impl Widget for GaugeCard {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (title, lines) = match &self.view {
            GaugeView::Missing { entity_id } => {
                ("GAUGE MONITOR".to_string(), vec![not_found(entity_id)])
            }
            GaugeView::Reading(reading) => {
                let width = area.width.saturating_sub(2) as usize;
                let lines = vec![
                    Line::from(Span::styled(reading.name.clone(), styles::text_secondary())),
                    Line::from(vec![
                        Span::styled(reading.value.clone(), styles::text_bold()),
                        Span::raw(" "),
                        Span::styled(reading.unit.clone(), styles::text_secondary()),
                        Span::styled(format!("  {:.0}%", reading.percent), styles::text_muted()),
                    ]),
                    Line::from(Span::styled(
                        bar(reading.percent, width, self.ctx.icons),
                        styles::text_primary(),
                    )),
                    Line::from(Span::styled(
                        spread(&reading.min, &reading.max, width),
                        styles::text_muted(),
                    )),
                ];
                (reading.title.clone(), lines)
            }
        };

        let inner = self.ctx.frame(&title, area, buf);
        if inner.is_empty() {
            return;
        }
        Paragraph::new(lines).render(inner, buf);
    }
}
