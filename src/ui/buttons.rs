use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use super::styles;
use super::utils::word_wrap;
use crate::app::{App, Button};
use crate::resolve::ResolvedTarget;

/// Render the environment / template buttons
pub fn render_buttons(f: &mut Frame, area: Rect, app: &App) {
    let selected = app.selected_button();

    let mut items: Vec<ListItem> = Vec::new();
    for (idx, button) in Button::ALL.iter().enumerate() {
        // Blank row between environments and template actions
        if idx > 0 && matches!(button, Button::OpenTemplate) {
            items.push(ListItem::new(Line::from("")));
        }

        let is_sel = *button == selected;
        let marker = if is_sel { "▸ " } else { "  " };
        let line = Line::from(vec![
            Span::styled(marker, Style::default().fg(styles::CYAN)),
            Span::styled(format!("{} ", button.key_hint()), styles::key_hint_style()),
            Span::styled(
                button.label(),
                if is_sel {
                    Style::default().fg(styles::BRIGHT)
                } else {
                    Style::default().fg(styles::TEXT)
                },
            ),
        ]);

        let style = if is_sel {
            styles::selected_style()
        } else {
            styles::panel_style()
        };
        items.push(ListItem::new(line).style(style));
    }

    let block = Block::default()
        .title(Span::styled(" Jump to ", styles::title_style()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(styles::BORDER))
        .style(styles::panel_style());

    f.render_widget(List::new(items).block(block), area);
}

/// Render the panel with the last resolved target and the active settings
pub fn render_details(f: &mut Frame, area: Rect, app: &App) {
    let width = area.width.saturating_sub(4) as usize;
    let mut lines: Vec<Line> = Vec::new();

    lines.push(section("Last target"));
    match &app.last_target {
        Some(target) => {
            let kind = match target {
                ResolvedTarget::NavigableUrl { .. } => "url",
                ResolvedTarget::LocalFilePath(_) => "file",
            };
            lines.push(Line::from(Span::styled(
                format!("  {kind}"),
                Style::default().fg(styles::PURPLE),
            )));
            for chunk in word_wrap(&target.to_string(), width) {
                lines.push(Line::from(Span::styled(
                    format!("  {chunk}"),
                    Style::default().fg(styles::BRIGHT),
                )));
            }
        }
        None => lines.push(dim("  nothing yet")),
    }

    lines.push(Line::from(""));
    lines.push(section("Settings"));
    let settings = &app.config.settings;
    lines.push(field("Local", &settings.local_base_url, "localhost"));
    lines.push(field("Project", &settings.project_base_path, "not configured"));
    lines.push(field("Editor", &settings.preferred_editor, "vscode"));
    lines.push(field("Domain", &app.config.environments.domain, "-"));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(styles::BORDER))
        .style(styles::panel_style());

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn section(title: &str) -> Line<'static> {
    Line::from(Span::styled(format!(" {title}"), styles::title_style()))
}

fn dim(text: &str) -> Line<'static> {
    Line::from(Span::styled(text.to_string(), Style::default().fg(styles::DIM)))
}

fn field(label: &str, value: &str, empty: &str) -> Line<'static> {
    let value_span = if value.trim().is_empty() {
        Span::styled(empty.to_string(), Style::default().fg(styles::DIM))
    } else {
        Span::styled(value.to_string(), Style::default().fg(styles::YELLOW))
    };
    Line::from(vec![
        Span::styled(format!("  {label:<9}"), Style::default().fg(styles::MUTED)),
        value_span,
    ])
}
