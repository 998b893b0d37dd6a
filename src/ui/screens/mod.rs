//! One screen per workflow stage

pub mod browser;
pub mod prompt;
pub mod search;

pub use browser::{BrowseExit, BrowserScreen, BrowserState, SortColumn, SortDirection, SortSpec};
pub use prompt::{PromptOutcome, PromptScreen};
pub use search::{SearchExit, SearchPhase, SearchScreen};
