//! Senterm release installer library.
//!
//! This crate turns a published senterm release into a working `sen`
//! command on the host machine. It resolves the release tag, downloads
//! the platform artefact into an ephemeral workspace, extracts it,
//! locates and sanity-checks the binary, installs it system-wide, and
//! confirms the installed command resolves on `PATH`.
//!
//! The pipeline is strictly sequential; every stage short-circuits the
//! run on failure. The `sen-install` CLI binary drives it, and each
//! stage is exposed here for programmatic use and testing.
//!
//! # Modules
//!
//! - [`asset`] - Deterministic artefact naming and download URLs
//! - [`cli`] - Command-line argument definitions
//! - [`config`] - Fixed installer configuration passed to every stage
//! - [`error`] - Semantic error types with recovery hints
//! - [`exec`] - External command execution abstraction
//! - [`extraction`] - Archive extraction confined to the workspace
//! - [`fetch`] - Artefact download abstraction
//! - [`http`] - Shared HTTP agent and request helpers
//! - [`install`] - System-wide installation and macOS post-processing
//! - [`locate`] - Ordered binary location strategies
//! - [`output`] - Progress and remediation text
//! - [`pipeline`] - Sequential installation pipeline orchestration
//! - [`platform`] - Host OS and architecture detection
//! - [`post_verify`] - `PATH` resolution of the installed command
//! - [`release`] - Release tag resolution against the remote index
//! - [`verify`] - Coarse binary format sniffing
//! - [`workspace`] - Ephemeral download/extraction workspace

pub mod asset;
pub mod cli;
pub mod config;
pub mod error;
pub mod exec;
pub mod extraction;
pub mod fetch;
pub mod http;
pub mod install;
pub mod locate;
pub mod output;
pub mod pipeline;
pub mod platform;
pub mod post_verify;
pub mod release;
#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;
pub mod verify;
pub mod workspace;
