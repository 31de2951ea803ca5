mod buttons;
mod settings;
mod status_bar;
mod styles;
mod utils;

use crate::app::App;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::widgets::Block;
use ratatui::Frame;

/// Width of the button column
const BUTTONS_WIDTH: u16 = 30;

/// Render the entire UI
pub fn draw(f: &mut Frame, app: &App) {
    f.render_widget(Block::default().style(styles::default_style()), f.area());

    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // top bar
            Constraint::Min(1),    // buttons + details
            Constraint::Length(1), // bottom bar
        ])
        .split(f.area());

    status_bar::render_top_bar(f, outer[0], app);

    if outer[1].width < BUTTONS_WIDTH * 2 {
        // Narrow terminal: buttons only
        buttons::render_buttons(f, outer[1], app);
    } else {
        let main_area = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(BUTTONS_WIDTH), Constraint::Min(1)])
            .split(outer[1]);
        buttons::render_buttons(f, main_area[0], app);
        buttons::render_details(f, main_area[1], app);
    }

    status_bar::render_bottom_bar(f, outer[2], app);

    if let Some(ref overlay) = app.overlay {
        settings::render_settings(f, f.area(), app, overlay);
    }
}
