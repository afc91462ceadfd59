use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};

use muthur_app::cards::glance::GlanceView;

use super::{grid, CardContext};
use crate::theme::styles;
use crate::widgets::truncate;

pub(crate) const CELL_HEIGHT: u16 = 3;

pub struct GlanceCard {
    view: GlanceView,
    selection: usize,
    ctx: CardContext,
}

impl GlanceCard {
    pub fn new(view: GlanceView, selection: usize, ctx: CardContext) -> Self {
        Self {
            view,
            selection,
            ctx,
        }
    }
}

impl Widget for GlanceCard {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner = self.ctx.frame(&self.view.title, area, buf);
        if inner.is_empty() {
            return;
        }

        let cells = grid(inner, self.view.columns, self.view.cells.len(), CELL_HEIGHT);
        for (i, (cell, rect)) in self.view.cells.iter().zip(cells).enumerate() {
            let width = rect.width as usize;
            let value_style = if cell.unavailable {
                styles::text_muted()
            } else {
                styles::text_bold()
            };
            let icon = match &cell.icon {
                Some(icon) => self.ctx.icons.custom(icon),
                None => self.ctx.icons.warning(),
            };
            let value = if cell.unit.is_empty() {
                cell.state.clone()
            } else {
                format!("{} {}", cell.state, cell.unit)
            };

            let lines = vec![
                Line::from(Span::styled(
                    truncate(&cell.name, width),
                    self.ctx.item_style(i, self.selection),
                )),
                Line::from(vec![
                    Span::styled(icon.to_string(), styles::text_secondary()),
                    Span::raw(" "),
                    Span::styled(truncate(&value, width.saturating_sub(2)), value_style),
                ]),
            ];
            Paragraph::new(lines)
                .alignment(Alignment::Center)
                .render(rect, buf);
        }
    }
}
