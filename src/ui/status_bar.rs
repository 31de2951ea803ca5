use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use super::styles;
use crate::app::{App, InputMode};

/// Render the top bar: app name and where the tab URL comes from
pub fn render_top_bar(f: &mut Frame, area: Rect, app: &App) {
    let line = Line::from(vec![
        Span::styled(" hop ", styles::title_style()),
        Span::styled("· tab: ", Style::default().fg(styles::DIM)),
        Span::styled(app.tab_source(), Style::default().fg(styles::TEXT)),
    ]);
    f.render_widget(Paragraph::new(line).style(styles::panel_style()), area);
}

/// Render the bottom bar: URL prompt, status message, or key hints
pub fn render_bottom_bar(f: &mut Frame, area: Rect, app: &App) {
    let line = if app.input_mode == InputMode::UrlPrompt {
        Line::from(vec![
            Span::styled(" URL: ", styles::key_hint_style()),
            Span::styled(format!("{}▏", app.url_input), Style::default().fg(styles::BRIGHT)),
        ])
    } else if let Some(status) = &app.status {
        let style = if status.is_error {
            styles::error_style()
        } else {
            styles::success_style()
        };
        Line::from(Span::styled(format!(" {}", status.message), style))
    } else {
        let mut spans = Vec::new();
        for (key, label) in [
            ("Enter", "go"),
            ("1-4", "env"),
            ("e", "template"),
            ("y", "copy path"),
            ("u", "set URL"),
            ("s", "settings"),
            ("q", "quit"),
        ] {
            spans.push(Span::styled(format!(" {key}"), styles::key_hint_style()));
            spans.push(Span::styled(format!(" {label} "), Style::default().fg(styles::DIM)));
        }
        Line::from(spans)
    };
    f.render_widget(Paragraph::new(line).style(styles::panel_style()), area);
}
