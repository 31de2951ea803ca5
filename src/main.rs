mod actions;
mod app;
mod config;
mod dispatch;
mod resolve;
mod tab;
mod ui;

use anyhow::{Context, Result};
use app::{App, Button, InputMode};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use dispatch::SystemDispatcher;
use ratatui::prelude::*;
use resolve::ResolvedTarget;
use std::io;
use std::sync::Mutex;
use std::time::Duration;
use tab::{ActiveTabProvider, ClipboardTab, FixedTab};
use tracing_subscriber::EnvFilter;

/// Jump from the page you are looking at to the same page in another environment
#[derive(Parser)]
#[command(name = "hop", version, about)]
struct Cli {
    /// URL of the page to remap (defaults to the URL on the clipboard)
    url: Option<String>,

    /// Resolve for one environment and exit (local, nd, test, production)
    #[arg(long, value_name = "ENV", conflicts_with = "template")]
    env: Option<String>,

    /// Resolve the local template for the page and exit
    #[arg(long)]
    template: bool,

    /// With --template: copy the path instead of opening the editor
    #[arg(long, requires = "template")]
    copy_path: bool,

    /// With --template: map unparsable URLs to _views/error.tpl instead of failing
    #[arg(long, requires = "template")]
    fallback: bool,

    /// Print the resolved target instead of opening it
    #[arg(long)]
    print: bool,

    /// Print the resolved target as JSON instead of opening it
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn is_one_shot(&self) -> bool {
        self.env.is_some() || self.template
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging();

    let project_dir = std::env::current_dir().context("Could not read current directory")?;
    let config = config::load_config(&project_dir);

    let mut tab: Box<dyn ActiveTabProvider> = match &cli.url {
        Some(url) => Box::new(FixedTab::new(url.clone())),
        None => Box::new(ClipboardTab::new()),
    };

    if cli.is_one_shot() {
        return run_once(&cli, &config, tab.as_mut());
    }
    if cli.print || cli.json {
        anyhow::bail!("--print and --json need --env or --template");
    }

    let mut app = App::new(
        config,
        config::global_config_path(),
        tab,
        Box::new(SystemDispatcher::new()),
    );

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run event loop
    let result = run_app(&mut terminal, &mut app);

    // Cleanup
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

/// Log to `<cache>/hop/hop.log`; the terminal belongs to the UI. Filter via `HOP_LOG`.
fn init_logging() {
    let filter = EnvFilter::try_from_env("HOP_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let Some(dir) = dirs::cache_dir().map(|d| d.join("hop")) else {
        return;
    };
    if std::fs::create_dir_all(&dir).is_err() {
        return;
    }
    let Ok(file) = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("hop.log"))
    else {
        return;
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
}

/// `--env` / `--template`: resolve once, then print or dispatch
fn run_once(cli: &Cli, config: &config::HopConfig, tab: &mut dyn ActiveTabProvider) -> Result<()> {
    let target: ResolvedTarget = match &cli.env {
        Some(id) => actions::resolve_button(tab, id, config)?.into(),
        None => actions::resolve_template(tab, config, cli.fallback)?.into(),
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&target)?);
        return Ok(());
    }
    if cli.print {
        println!("{target}");
        return Ok(());
    }

    let mut dispatcher = SystemDispatcher::new();
    let message = match &target {
        ResolvedTarget::NavigableUrl { parts, .. } => actions::open_environment(parts, &mut dispatcher)?,
        ResolvedTarget::LocalFilePath(path) if cli.copy_path => {
            actions::copy_template_path(path, &mut dispatcher)?
        }
        ResolvedTarget::LocalFilePath(path) => {
            actions::open_template(path, &config.settings.preferred_editor, &mut dispatcher)?
        }
    };
    eprintln!("{message}");
    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        // Poll with a timeout so status messages can expire
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    // Route keys: overlay takes priority, then URL prompt, then normal
                    if app.overlay.is_some() {
                        handle_overlay_input(app, key);
                    } else {
                        match app.input_mode {
                            InputMode::UrlPrompt => handle_url_input(app, key),
                            InputMode::Normal => handle_normal_input(app, key),
                        }
                    }
                }
            }
        }

        app.tick();

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_normal_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true;
        }
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Char('j') | KeyCode::Down => app.select_next(),
        KeyCode::Char('k') | KeyCode::Up => app.select_prev(),
        KeyCode::Enter => app.press_selected(),
        KeyCode::Char('s') => app.open_settings(),
        KeyCode::Char('u') => app.start_url_prompt(),
        KeyCode::Char(c) => {
            if let Some(button) = Button::from_key(c) {
                app.press(button);
            }
        }
        _ => {}
    }
}

fn handle_url_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.submit_url_prompt(),
        KeyCode::Esc => app.cancel_url_prompt(),
        KeyCode::Backspace => {
            app.url_input.pop();
        }
        KeyCode::Char(c) => app.url_input.push(c),
        _ => {}
    }
}

fn handle_overlay_input(app: &mut App, key: KeyEvent) {
    // Typing into a text field
    if app.is_editing_setting() {
        match key.code {
            KeyCode::Enter => app.edit_commit(),
            KeyCode::Esc => app.edit_cancel(),
            KeyCode::Backspace => app.edit_pop(),
            KeyCode::Char(c) => app.edit_push(c),
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.overlay_next(),
        KeyCode::Char('k') | KeyCode::Up => app.overlay_prev(),
        KeyCode::Char(' ') | KeyCode::Enter => app.overlay_select(),
        KeyCode::Char('s') => app.settings_save(),
        KeyCode::Esc | KeyCode::Char('q') => app.settings_cancel(),
        _ => {}
    }
}
