//! Reusable widgets shared by the screens

mod help_bar;
mod status_bar;
mod text_input;

pub use help_bar::{HelpBar, KeyHint};
pub use status_bar::StatusLine;
pub use text_input::{TextInput, TextInputState};
