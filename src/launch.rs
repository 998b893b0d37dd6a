//! Opening a result in the system's default handler
//!
//! Magnet URIs go to whatever torrent client is registered for `magnet:`,
//! web links to the default browser. The [`Launcher`] trait is the seam the
//! result browser dispatches through, so tests can record launches instead of
//! spawning processes.

use crate::search::LaunchTarget;
use thiserror::Error;

/// Errors raised while handing a target to the OS
#[derive(Debug, Error)]
pub enum LaunchError {
    /// The OS handler could not be started
    #[error("Failed to open {kind}: {source}")]
    Open {
        /// What was being opened ("magnet link", "web link")
        kind: &'static str,
        #[source]
        source: std::io::Error,
    },
}

/// Something that can open a launch target
pub trait Launcher {
    /// Open the target, returning once the handler has been started
    ///
    /// # Errors
    ///
    /// Returns `LaunchError` if the handler cannot be started.
    fn launch(&self, target: &LaunchTarget) -> Result<(), LaunchError>;
}

/// Opens targets with the platform default handler
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemLauncher;

impl SystemLauncher {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Launcher for SystemLauncher {
    fn launch(&self, target: &LaunchTarget) -> Result<(), LaunchError> {
        tracing::info!(kind = target.kind(), "opening result");
        open::that_detached(target.as_str()).map_err(|source| {
            tracing::warn!(kind = target.kind(), error = %source, "failed to open result");
            LaunchError::Open {
                kind: target.kind(),
                source,
            }
        })
    }
}

impl<L: Launcher + ?Sized> Launcher for &L {
    fn launch(&self, target: &LaunchTarget) -> Result<(), LaunchError> {
        (**self).launch(target)
    }
}
