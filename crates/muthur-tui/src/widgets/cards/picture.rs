use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget, Wrap};

use muthur_app::cards::picture::PictureView;

use super::CardContext;
use crate::theme::styles;
use crate::widgets::spread;

/// Terminals cannot show the feed itself, so the card shows where the
/// current frame lives and its capture metadata.
pub struct PictureCard {
    view: PictureView,
    ctx: CardContext,
}

impl PictureCard {
    pub fn new(view: PictureView, ctx: CardContext) -> Self {
        Self { view, ctx }
    }
}

impl Widget for PictureCard {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner = self.ctx.frame(&self.view.title, area, buf);
        if inner.is_empty() {
            return;
        }
        let width = inner.width as usize;
        let view = self.view;

        let mut lines = Vec::new();
        let feed = match (&view.image_url, view.error) {
            (_, true) => Span::styled(
                format!("{} IMAGE UNAVAILABLE", self.ctx.icons.warning()),
                styles::alert(),
            ),
            (Some(url), false) => Span::styled(url.clone(), styles::text_secondary()),
            (None, false) => Span::styled("NO SIGNAL", styles::text_muted()),
        };
        lines.push(Line::from(feed));
        if view.loading {
            lines.push(Line::from(Span::styled(
                format!("ACQUIRING{}", self.ctx.blink()),
                styles::caution(),
            )));
        }
        if let Some(caption) = &view.caption {
            lines.push(Line::from(Span::styled(caption.clone(), styles::text_primary())));
        }

        let status = view.status.as_deref().unwrap_or("");
        let captured = view.captured.as_deref().unwrap_or("");
        if !status.is_empty() || !captured.is_empty() {
            lines.push(Line::from(Span::styled(
                spread(status, captured, width),
                styles::text_muted(),
            )));
        }
        if view.can_refresh && self.ctx.focused {
            lines.push(Line::from(vec![
                Span::styled("[f]", styles::keybinding()),
                Span::styled(" REFRESH", styles::text_muted()),
            ]));
        }

        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .render(inner, buf);
    }
}
