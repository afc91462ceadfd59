use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};

use muthur_app::cards::light::{LightStatus, LightView, HEADER};

use super::{not_found, CardContext};
use crate::theme::styles;
use crate::widgets::{bar, spread};

pub struct LightCard {
    view: LightView,
    ctx: CardContext,
}

impl LightCard {
    pub fn new(view: LightView, ctx: CardContext) -> Self {
        Self { view, ctx }
    }
}

impl Widget for LightCard {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner = self.ctx.frame(HEADER, area, buf);
        if inner.is_empty() {
            return;
        }
        let width = inner.width as usize;

        let lines = match &self.view {
            LightView::Missing { entity_id } => vec![not_found(entity_id)],
            LightView::Panel(panel) => {
                let status_style = match panel.status {
                    LightStatus::Active => styles::text_bold(),
                    LightStatus::Inactive => styles::text_secondary(),
                    LightStatus::Unavailable => styles::caution(),
                };
                let dot = if panel.is_on {
                    self.ctx.icons.dot()
                } else {
                    self.ctx.icons.dot_empty()
                };
                let toggle_style = match (panel.toggle_enabled, self.ctx.focused) {
                    (false, _) => styles::text_muted(),
                    (true, true) => styles::focused_selected(),
                    (true, false) => styles::text_primary(),
                };

                let mut lines = vec![
                    Line::from(Span::styled(panel.name.clone(), styles::text_primary())),
                    Line::from(vec![
                        Span::styled(dot, status_style),
                        Span::raw(" "),
                        Span::styled(panel.status.label(), status_style),
                        Span::raw("  "),
                        Span::styled(format!("[ {} ]", panel.toggle_label), toggle_style),
                    ]),
                ];
                if let Some(pct) = panel.brightness_pct {
                    lines.push(Line::from(Span::styled(
                        spread("BRIGHTNESS", &format!("{pct}%"), width),
                        styles::text_secondary(),
                    )));
                    lines.push(Line::from(Span::styled(
                        bar(f64::from(pct), width, self.ctx.icons),
                        styles::text_primary(),
                    )));
                }
                lines
            }
        };

        Paragraph::new(lines).render(inner, buf);
    }
}
