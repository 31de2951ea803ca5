mod state;

pub use state::{App, Button, InputMode, SettingsOverlay};
