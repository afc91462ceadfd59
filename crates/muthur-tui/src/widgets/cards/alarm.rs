use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};

use muthur_app::cards::alarm::{AlarmView, KEYPAD_LAYOUT};

use super::CardContext;
use crate::theme::styles;

pub struct AlarmCard {
    view: AlarmView,
    ctx: CardContext,
}

impl AlarmCard {
    pub fn new(view: AlarmView, ctx: CardContext) -> Self {
        Self { view, ctx }
    }
}

impl Widget for AlarmCard {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let panel = match self.view {
            AlarmView::Missing { title } => {
                let inner = self.ctx.frame(&title, area, buf);
                Paragraph::new(Line::from(Span::styled(
                    "ALARM PANEL NOT AVAILABLE",
                    styles::alert(),
                )))
                .render(inner, buf);
                return;
            }
            AlarmView::Panel(panel) => panel,
        };

        let inner = self.ctx.frame(&panel.title, area, buf);
        if inner.is_empty() {
            return;
        }

        let state_style = if panel.triggered {
            styles::alert_bold()
        } else {
            styles::text_bold()
        };
        let mut lines = vec![Line::from(vec![
            Span::styled("STATUS: ", styles::text_secondary()),
            Span::styled(panel.state_display.clone(), state_style),
        ])];

        if panel.show_keypad {
            let code_style = if panel.error.is_some() {
                styles::alert()
            } else {
                styles::text_primary()
            };
            lines.push(Line::from(Span::styled(
                format!("[ {} ]", self.ctx.icons.code(&panel.code_display)),
                code_style,
            )));
            for row in KEYPAD_LAYOUT.chunks(3) {
                let keys: Vec<Span> = row
                    .iter()
                    .map(|key| Span::styled(format!(" {key:^3} "), styles::text_secondary()))
                    .collect();
                lines.push(Line::from(keys));
            }
        }

        if let Some(error) = &panel.error {
            lines.push(Line::from(Span::styled(error.clone(), styles::alert_bold())));
        }

        let mut actions = Vec::new();
        for action in panel.actions {
            if !actions.is_empty() {
                actions.push(Span::raw(" "));
            }
            actions.push(Span::styled(format!("[{}]", action.label()), styles::keybinding()));
        }
        if !actions.is_empty() {
            lines.push(Line::from(actions));
        }

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .render(inner, buf);
    }
}
