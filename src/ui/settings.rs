use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem},
    Frame,
};

use super::styles;
use super::utils::centered_rect;
use crate::app::{App, SettingsOverlay};
use crate::config::{self, SettingsItem};

/// Render the settings overlay
pub fn render_settings(f: &mut Frame, area: Rect, app: &App, overlay: &SettingsOverlay) {
    let items = config::settings_items();

    let content_height = u16::try_from(items.len()).unwrap_or(u16::MAX).saturating_add(4); // items + help line + padding
    let popup_height = content_height.min(area.height.saturating_sub(2)).max(6);
    let popup_width = 64u16.min(area.width.saturating_sub(4));
    let popup = centered_rect(popup_width, popup_height, area);

    f.render_widget(Clear, popup);

    let mut list_items: Vec<ListItem> = Vec::new();

    for (idx, item) in items.iter().enumerate() {
        let is_sel = idx == overlay.selected;
        let marker = if is_sel { "▸ " } else { "  " };
        let label_style = if is_sel {
            Style::default().fg(styles::BRIGHT)
        } else {
            Style::default().fg(styles::TEXT)
        };
        let row_style = if is_sel {
            styles::selected_style()
        } else {
            Style::default().bg(styles::PANEL)
        };

        match item {
            SettingsItem::SectionHeader(title) => {
                let line = Line::from(Span::styled(format!("  {title}"), styles::title_style()));
                list_items.push(ListItem::new(line).style(Style::default().bg(styles::PANEL)));
            }
            SettingsItem::TextField { label, get, .. } => {
                let value_span = match (&overlay.editing, is_sel) {
                    (Some(buf), true) => Span::styled(
                        format!("{buf}▏"),
                        Style::default()
                            .fg(styles::BRIGHT)
                            .add_modifier(Modifier::UNDERLINED),
                    ),
                    _ => {
                        let value = get(&app.config);
                        if value.is_empty() {
                            Span::styled("(empty)", Style::default().fg(styles::DIM))
                        } else {
                            Span::styled(value, Style::default().fg(styles::YELLOW))
                        }
                    }
                };
                let line = Line::from(vec![
                    Span::styled(marker, Style::default().fg(styles::CYAN)),
                    Span::styled(format!("{label:<18}"), label_style),
                    value_span,
                ]);
                list_items.push(ListItem::new(line).style(row_style));
            }
            SettingsItem::Choice { label, get, .. } => {
                let line = Line::from(vec![
                    Span::styled(marker, Style::default().fg(styles::CYAN)),
                    Span::styled(format!("{label:<18}"), label_style),
                    Span::styled(format!("‹ {} ›", get(&app.config)), Style::default().fg(styles::GREEN)),
                ]);
                list_items.push(ListItem::new(line).style(row_style));
            }
        }
    }

    let hint = |key: &'static str, text: &'static str| {
        [
            Span::styled(key, Style::default().fg(styles::TEXT).add_modifier(Modifier::BOLD)),
            Span::styled(text, Style::default().fg(styles::DIM)),
        ]
    };
    let help_spans: Vec<Span> = if overlay.editing.is_some() {
        [hint(" Enter", " apply  "), hint("Esc", " discard")].concat()
    } else {
        [
            hint(" j/k", " nav  "),
            hint("Enter", " edit/cycle  "),
            hint("s", " save  "),
            hint("Esc", " cancel"),
        ]
        .concat()
    };
    list_items.push(ListItem::new(Line::from("")).style(Style::default().bg(styles::PANEL)));
    list_items.push(ListItem::new(Line::from(help_spans)).style(Style::default().bg(styles::PANEL)));

    let block = Block::default()
        .title(Span::styled(" Settings ", styles::title_style()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(styles::CYAN))
        .style(Style::default().bg(styles::PANEL));

    f.render_widget(List::new(list_items).block(block), popup);
}
