//! Stage machine driving one interactive session
//!
//! The session moves through [`Stage`] values: credential capture, query
//! entry, search, browsing. Everything a stage needs (API key, query, result
//! set) travels inside the variant, so transitions are plain functions from
//! one stage and a screen's output to the next stage. [`Workflow`] owns the
//! side effects: the terminal, the search runtime and the launcher.

use crate::config::{ApiKey, CredentialFile, PrivateerConfig};
use crate::launch::Launcher;
use crate::search::{JackettClient, ResultSet, SearchQuery, SearchTask};
use crate::ui::screens::{
    BrowseExit, BrowserScreen, PromptOutcome, PromptScreen, SearchExit, SearchScreen,
};
use crate::ui::events::{KeySource, TerminalKeys};
use crate::ui::{MessageLevel, TerminalSession, Theme, run_screen};
use crate::Result;
use ratatui::{Terminal, backend::Backend};
use std::path::Path;
use std::process::ExitCode;
use std::time::Duration;
use tokio::runtime::Runtime;

const EMPTY_QUERY_NOTICE: &str = "Type something to search for";

/// How the process ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    /// Deliberate quit after a search
    Completed,
    /// Quit before a search finished
    Cancelled,
    /// Quit after a failed search, or an unrecoverable error
    Failed,
}

impl ExitStatus {
    /// Process exit code
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Completed => 0,
            Self::Cancelled => 1,
            Self::Failed => 2,
        }
    }
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        Self::from(status.code())
    }
}

/// One step of the session
#[derive(Debug)]
pub enum Stage {
    /// No stored key; ask for one, then carry on with `query` if given
    CaptureCredential { query: Option<SearchQuery> },
    /// Ask what to search for
    Query {
        api_key: ApiKey,
        notice: Option<String>,
    },
    /// Run the search
    Search { api_key: ApiKey, query: SearchQuery },
    /// Browse a non-empty result set
    Browse {
        api_key: ApiKey,
        query: SearchQuery,
        results: ResultSet,
    },
    /// Done
    Exit(ExitStatus),
}

impl Stage {
    /// First stage given what is already known
    ///
    /// A known key skips credential capture; a known query also skips the
    /// query prompt.
    #[must_use]
    pub fn initial(api_key: Option<ApiKey>, query: Option<SearchQuery>) -> Self {
        match (api_key, query) {
            (None, query) => Self::CaptureCredential { query },
            (Some(api_key), None) => Self::Query {
                api_key,
                notice: None,
            },
            (Some(api_key), Some(query)) => Self::Search { api_key, query },
        }
    }

    /// First stage, reading the stored key from `credentials`
    #[must_use]
    pub fn bootstrap(credentials: &Path, query: Option<SearchQuery>) -> Self {
        let api_key = CredentialFile::load(credentials);
        tracing::debug!(
            found = api_key.is_some(),
            path = %credentials.display(),
            "credential lookup"
        );
        Self::initial(api_key, query)
    }

    /// Next stage after the credential prompt
    #[must_use]
    pub fn after_credential(outcome: PromptOutcome, query: Option<SearchQuery>) -> Self {
        match outcome {
            PromptOutcome::Submitted(text) => match ApiKey::new(text) {
                Some(api_key) => Self::initial(Some(api_key), query),
                None => Self::CaptureCredential { query },
            },
            PromptOutcome::Cancelled => Self::Exit(ExitStatus::Cancelled),
        }
    }

    /// Next stage after the query prompt
    ///
    /// A submission without any words goes back to the prompt with a notice.
    #[must_use]
    pub fn after_query(api_key: ApiKey, outcome: PromptOutcome) -> Self {
        match outcome {
            PromptOutcome::Submitted(text) => match SearchQuery::new(&text) {
                Some(query) => Self::Search { api_key, query },
                None => Self::Query {
                    api_key,
                    notice: Some(EMPTY_QUERY_NOTICE.to_string()),
                },
            },
            PromptOutcome::Cancelled => Self::Exit(ExitStatus::Cancelled),
        }
    }

    /// Next stage after the search screen
    #[must_use]
    pub fn after_search(api_key: ApiKey, query: SearchQuery, exit: SearchExit) -> Self {
        match exit {
            SearchExit::Results(results) => Self::Browse {
                api_key,
                query,
                results,
            },
            SearchExit::NewSearch => Self::Query {
                api_key,
                notice: None,
            },
            SearchExit::Retry => Self::Search { api_key, query },
            SearchExit::Quit(status) => Self::Exit(status),
        }
    }

    /// Next stage after the browser
    #[must_use]
    pub fn after_browse(api_key: ApiKey, exit: BrowseExit) -> Self {
        match exit {
            BrowseExit::NewSearch => Self::Query {
                api_key,
                notice: None,
            },
            BrowseExit::Quit => Self::Exit(ExitStatus::Completed),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::CaptureCredential { .. } => "capture-credential",
            Self::Query { .. } => "query",
            Self::Search { .. } => "search",
            Self::Browse { .. } => "browse",
            Self::Exit(_) => "exit",
        }
    }
}

/// Runs stages until one of them exits
pub struct Workflow<L> {
    config: PrivateerConfig,
    runtime: Runtime,
    launcher: L,
    theme: Theme,
    tick_rate: Duration,
    notices: Vec<(MessageLevel, String)>,
}

impl<L: Launcher> Workflow<L> {
    /// Create a workflow with its own single-worker search runtime
    ///
    /// # Errors
    ///
    /// Returns an error if the runtime cannot be started.
    pub fn new(config: PrivateerConfig, launcher: L) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("privateer-search")
            .enable_all()
            .build()?;

        Ok(Self {
            tick_rate: Duration::from_millis(config.tick_rate_ms.max(1)),
            config,
            runtime,
            launcher,
            theme: Theme::default(),
            notices: Vec::new(),
        })
    }

    /// Messages to print once the terminal has been restored
    #[must_use]
    pub fn notices(&self) -> &[(MessageLevel, String)] {
        &self.notices
    }

    /// Run the session in the real terminal
    ///
    /// The terminal is restored before this returns, on success or error.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal fails or the search client cannot
    /// be configured.
    pub fn run(&mut self, stage: Stage) -> Result<ExitStatus> {
        let mut session = TerminalSession::start()?;
        self.run_on(session.terminal_mut(), &mut TerminalKeys, stage)
    }

    /// Run the session on any backend, reading keys from `keys`
    ///
    /// # Errors
    ///
    /// See [`Workflow::run`].
    pub fn run_on<B, K>(
        &mut self,
        terminal: &mut Terminal<B>,
        keys: &mut K,
        mut stage: Stage,
    ) -> Result<ExitStatus>
    where
        B: Backend,
        K: KeySource,
    {
        loop {
            if let Stage::Exit(status) = stage {
                tracing::info!(code = status.code(), "session finished");
                return Ok(status);
            }
            stage = self.advance(terminal, keys, stage)?;
        }
    }

    /// Run the screen for `stage` and return the stage that follows it
    ///
    /// # Errors
    ///
    /// See [`Workflow::run`].
    pub fn advance<B, K>(
        &mut self,
        terminal: &mut Terminal<B>,
        keys: &mut K,
        stage: Stage,
    ) -> Result<Stage>
    where
        B: Backend,
        K: KeySource,
    {
        tracing::debug!(stage = stage.name(), "entering stage");

        let next = match stage {
            Stage::CaptureCredential { query } => {
                let mut screen = PromptScreen::api_key();
                let outcome = run_screen(terminal, keys, &mut screen, &self.theme, self.tick_rate)?;
                let next = Stage::after_credential(outcome, query);
                if let Stage::Query { api_key, .. } | Stage::Search { api_key, .. } = &next {
                    self.persist(api_key);
                }
                next
            }
            Stage::Query { api_key, notice } => {
                let mut screen = PromptScreen::query(notice);
                let outcome = run_screen(terminal, keys, &mut screen, &self.theme, self.tick_rate)?;
                Stage::after_query(api_key, outcome)
            }
            Stage::Search { api_key, query } => {
                let client = JackettClient::new(&self.config, api_key.clone())?;
                tracing::info!(query = %query.normalized(), "starting search");
                let task = SearchTask::spawn(self.runtime.handle(), client, query.clone());
                let mut screen = SearchScreen::new(query.clone(), task);
                let exit = run_screen(terminal, keys, &mut screen, &self.theme, self.tick_rate)?;
                Stage::after_search(api_key, query, exit)
            }
            Stage::Browse {
                api_key,
                query,
                results,
            } => {
                let mut screen = BrowserScreen::new(query, &results, &self.launcher);
                let exit = run_screen(terminal, keys, &mut screen, &self.theme, self.tick_rate)?;
                Stage::after_browse(api_key, exit)
            }
            Stage::Exit(status) => Stage::Exit(status),
        };

        Ok(next)
    }

    /// Store a freshly captured key; failure is reported but not fatal
    fn persist(&mut self, api_key: &ApiKey) {
        let path = self.config.credentials_path();
        match CredentialFile::save(&path, api_key) {
            Ok(()) => tracing::info!(path = %path.display(), "API key saved"),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to save API key");
                self.notices.push((
                    MessageLevel::Warning,
                    format!("Could not save API key to {}: {e}", path.display()),
                ));
            }
        }
    }
}
