//! Header bar: system title, view tabs and link state

use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Widget};

use muthur_app::state::{AppState, ConnectionStatus};

use crate::theme::icons::IconSet;
use crate::theme::styles;

pub const SYSTEM_TITLE: &str = "MU/TH/UR 6000";

pub struct MainHeader<'a> {
    state: &'a AppState,
    icons: IconSet,
}

impl<'a> MainHeader<'a> {
    pub fn new(state: &'a AppState, icons: IconSet) -> Self {
        Self { state, icons }
    }

    fn link_status(&self) -> Span<'static> {
        let dot = self.icons.dot();
        match &self.state.connection {
            ConnectionStatus::Connected { version } => Span::styled(
                match version {
                    Some(v) => format!("{dot} LINK ESTABLISHED :: HA {v}"),
                    None => format!("{dot} LINK ESTABLISHED"),
                },
                styles::text_primary(),
            ),
            ConnectionStatus::Connecting => {
                Span::styled(format!("{dot} ESTABLISHING LINK"), styles::caution())
            }
            ConnectionStatus::Reconnecting {
                attempt,
                max_attempts,
            } => Span::styled(
                format!("{dot} RELINKING {attempt}/{max_attempts}"),
                styles::caution(),
            ),
            ConnectionStatus::Disconnected | ConnectionStatus::Failed(_) => {
                Span::styled(format!("{dot} NO LINK"), styles::alert_bold())
            }
            ConnectionStatus::Offline => {
                Span::styled(format!("{} OFFLINE", self.icons.dot_empty()), styles::text_muted())
            }
        }
    }
}

impl Widget for MainHeader<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::BOTTOM)
            .border_style(styles::border_inactive());
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.is_empty() {
            return;
        }

        let mut left = vec![
            Span::styled(format!(" {SYSTEM_TITLE}"), styles::text_bold()),
            Span::raw("  "),
        ];
        let views = &self.state.dashboard.views;
        if views.len() > 1 {
            for (i, view) in views.iter().enumerate() {
                let style = if i == self.state.current_view {
                    styles::focused_selected()
                } else {
                    styles::text_secondary()
                };
                left.push(Span::styled(format!(" {} ", view.title), style));
                left.push(Span::raw(" "));
            }
        } else if let Some(view) = views.first() {
            left.push(Span::styled(view.title.clone(), styles::text_secondary()));
        }

        let link = Line::from(vec![self.link_status(), Span::raw(" ")]);
        let [tabs_area, link_area] =
            Layout::horizontal([Constraint::Min(0), Constraint::Length(link.width() as u16)])
                .areas(inner);

        Paragraph::new(Line::from(left)).render(tabs_area, buf);
        Paragraph::new(link)
            .alignment(Alignment::Right)
            .render(link_area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{create_test_state, TestTerminal};
    use muthur_app::config::IconStyle;

    const SINGLE_VIEW: &str = r#"
[connection]
url = "http://nostromo.local:8123"

[[views]]
title = "BRIDGE"
"#;

    #[test]
    fn test_header_link_states() {
        let mut state = create_test_state(SINGLE_VIEW);
        let icons = IconSet::new(IconStyle::Ascii);

        state.connection = ConnectionStatus::Connected {
            version: Some("2026.10.1".into()),
        };
        let mut term = TestTerminal::with_size(80, 2);
        term.render_widget(MainHeader::new(&state, icons), term.area());
        assert!(term.line_contains(0, SYSTEM_TITLE));
        assert!(term.line_contains(0, "BRIDGE"));
        assert!(term.line_contains(0, "LINK ESTABLISHED :: HA 2026.10.1"));

        state.connection = ConnectionStatus::Reconnecting {
            attempt: 3,
            max_attempts: 10,
        };
        term.render_widget(MainHeader::new(&state, icons), term.area());
        assert!(term.line_contains(0, "RELINKING 3/10"));

        state.connection = ConnectionStatus::Failed("auth".into());
        term.render_widget(MainHeader::new(&state, icons), term.area());
        assert!(term.line_contains(0, "NO LINK"));
    }
}
