pub mod config;
pub mod events;
pub mod state;

pub use config::Config;
pub use events::{poll_event, Action, AppEvent};
pub use state::{AppState, ViewMode};
