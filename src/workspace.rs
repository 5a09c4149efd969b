//! Ephemeral workspace for one installer run.
//!
//! The workspace owns every downloaded and extracted file. Removal is
//! tied to ownership at creation time rather than registered at call
//! sites: dropping the value removes the directory on every exit path,
//! and a termination-signal handler installed eagerly at creation
//! removes any live workspace when the process is killed mid-run.
//! Cleanup failures are logged and never allowed to mask the error
//! that ended the run.

use crate::error::Result;
use camino::{Utf8Path, Utf8PathBuf};
use std::sync::{Mutex, OnceLock};
use tempfile::TempDir;

/// Workspace roots that still exist on disk, for signal-time cleanup.
static LIVE_ROOTS: Mutex<Vec<Utf8PathBuf>> = Mutex::new(Vec::new());

/// An exclusively-owned temporary directory scope.
///
/// Never reused across runs. The directory is removed when the value is
/// dropped; [`Workspace::close`] removes it eagerly with a logged
/// (non-propagated) failure path. A Ctrl-C or termination signal
/// mid-run removes any live workspace before the process exits.
///
/// # Examples
///
/// ```
/// use senterm_installer::workspace::Workspace;
///
/// let root = {
///     let workspace = Workspace::create().expect("workspace");
///     workspace.root().to_owned()
/// };
/// assert!(!root.as_std_path().exists());
/// ```
#[derive(Debug)]
pub struct Workspace {
    dir: TempDir,
    root: Utf8PathBuf,
    registration: TerminationCleanup,
}

impl Workspace {
    /// Create a fresh workspace directory.
    ///
    /// Registers the directory for termination-signal cleanup before
    /// returning, so an interrupt at any later point removes it.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the temporary directory cannot be
    /// created, or if its path is not valid UTF-8.
    pub fn create() -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix("senterm-install-")
            .tempdir()?;
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).map_err(|path| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("temporary directory path is not valid UTF-8: {}", path.display()),
            )
        })?;
        let registration = TerminationCleanup::register(root.clone());
        Ok(Self {
            dir,
            root,
            registration,
        })
    }

    /// The workspace root directory.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Remove the workspace eagerly.
    ///
    /// A removal failure is logged at warn level and swallowed; it must
    /// never be promoted over the primary outcome of the run.
    pub fn close(self) {
        let Self {
            dir,
            root,
            registration,
        } = self;
        drop(registration);
        if let Err(e) = dir.close() {
            log::warn!("failed to remove workspace {root}: {e}");
        }
    }
}

/// Keeps a workspace root registered for signal-time removal for as
/// long as the directory exists.
#[derive(Debug)]
struct TerminationCleanup {
    root: Utf8PathBuf,
}

impl TerminationCleanup {
    fn register(root: Utf8PathBuf) -> Self {
        install_termination_handler();
        if let Ok(mut roots) = LIVE_ROOTS.lock() {
            roots.push(root.clone());
        }
        Self { root }
    }
}

impl Drop for TerminationCleanup {
    fn drop(&mut self) {
        if let Ok(mut roots) = LIVE_ROOTS.lock() {
            roots.retain(|registered| registered != &self.root);
        }
    }
}

/// Install the SIGINT/SIGTERM cleanup handler once per process.
///
/// The handler runs on a dedicated thread, removes every live
/// workspace, and exits with the conventional interrupted status.
/// Installation failure is logged and tolerated: the Drop path still
/// covers every in-process exit.
fn install_termination_handler() {
    static INSTALLED: OnceLock<()> = OnceLock::new();
    INSTALLED.get_or_init(|| {
        if let Err(e) = ctrlc::set_handler(|| {
            remove_live_roots();
            std::process::exit(130);
        }) {
            log::warn!("could not install termination cleanup handler: {e}");
        }
    });
}

fn remove_live_roots() {
    let Ok(roots) = LIVE_ROOTS.lock() else {
        return;
    };
    for root in roots.iter() {
        // Best-effort: the process is about to die either way.
        let _ = std::fs::remove_dir_all(root);
    }
}

#[cfg(test)]
fn is_registered(root: &Utf8Path) -> bool {
    LIVE_ROOTS
        .lock()
        .map(|roots| roots.iter().any(|registered| registered == root))
        .unwrap_or(false)
}
