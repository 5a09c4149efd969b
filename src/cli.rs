//! CLI argument definitions for the senterm installer.
//!
//! This module defines the command-line interface using clap. It is
//! separated from the main entrypoint to keep the binary small and
//! focused on orchestration.

use clap::Parser;

/// Install the senterm terminal file manager.
#[derive(Parser, Debug, Clone)]
#[command(name = "sen-install")]
#[command(version, about)]
#[command(long_about = concat!(
    "Install the senterm terminal file manager.\n\n",
    "senterm is a keyboard-driven terminal file manager. This installer ",
    "downloads a published release artefact for the host platform, verifies ",
    "it is a runnable executable, and installs it system-wide as the `sen` ",
    "command.\n\n",
    "By default the latest published release is installed. Use -t/--tag to ",
    "install a specific version.\n\n",
    "Installation into /usr/local/bin may prompt for your password when the ",
    "directory is not writable by the current user.",
))]
#[command(after_help = concat!(
    "EXAMPLES:\n",
    "  Install the latest release:\n",
    "    $ sen-install\n\n",
    "  Install a specific version:\n",
    "    $ sen-install --tag v0.3.1\n\n",
    "  Preview without touching the network or filesystem:\n",
    "    $ sen-install --dry-run\n\n",
    "For more information, see: https://github.com/senterm-dev/senterm",
))]
pub struct Cli {
    /// Install a specific release tag instead of the latest.
    #[arg(short, long, value_name = "TAG")]
    pub tag: Option<String>,

    /// Suppress progress output (warnings and errors still shown).
    #[arg(short, long)]
    pub quiet: bool,

    /// Show what would be installed and exit without side effects.
    #[arg(long)]
    pub dry_run: bool,

    /// Unrecognised trailing arguments, accepted and ignored so that
    /// wrapper scripts can pass extra flags through harmlessly.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, hide = true)]
    pub extra: Vec<String>,
}

impl Default for Cli {
    /// Creates a `Cli` instance equivalent to running with no arguments.
    ///
    /// # Examples
    ///
    /// ```
    /// use senterm_installer::cli::Cli;
    ///
    /// let cli = Cli::default();
    /// assert!(cli.tag.is_none());
    /// assert!(!cli.quiet);
    /// assert!(!cli.dry_run);
    /// ```
    fn default() -> Self {
        Self {
            tag: None,
            quiet: false,
            dry_run: false,
            extra: Vec::new(),
        }
    }
}
