//! Configuration for dotstore
//!
//! Centralized configuration with sensible defaults. The identity and
//! directory roots live here so callers (and tests) can inject them
//! instead of relying on process-wide state.

use std::path::PathBuf;

/// Directory under `$HOME` holding per-user databases
pub const USER_DIR_NAME: &str = ".dotstore";

/// Directory holding machine-global databases
pub const GLOBAL_DIR: &str = "/etc/dotstore";

/// Main configuration for a dotstore session
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Directory Configuration
    // -------------------------------------------------------------------------
    /// Per-user database directory. `None` when no home directory could be
    /// determined; unprivileged sessions then fail with a config error.
    pub user_dir: Option<PathBuf>,

    /// Machine-global database directory
    pub global_dir: PathBuf,

    /// Who we are running as (decides which directories are searched)
    pub identity: Identity,

    // -------------------------------------------------------------------------
    // File Naming Configuration
    // -------------------------------------------------------------------------
    /// Extension of the committed file: `<name>.<extension>`
    pub extension: String,

    /// Suffix appended to the committed file name for the staging file
    pub staging_suffix: String,

    // -------------------------------------------------------------------------
    // Durability Configuration
    // -------------------------------------------------------------------------
    /// Whether the staging file is flushed to disk before it replaces the
    /// committed file
    pub sync_strategy: SyncStrategy,
}

/// Identity of the executing process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Identity {
    /// Superuser: only the global directory is ever touched
    Privileged,

    /// Regular user: user directory first, then the global one
    Unprivileged,
}

impl Identity {
    /// Detect the identity from the effective uid
    pub fn current() -> Self {
        // SAFETY: geteuid has no preconditions and cannot fail.
        let euid = unsafe { libc::geteuid() };
        if euid == 0 {
            Identity::Privileged
        } else {
            Identity::Unprivileged
        }
    }

    pub fn is_privileged(self) -> bool {
        matches!(self, Identity::Privileged)
    }
}

/// Staging sync strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStrategy {
    /// fsync the staging file before the replace, and the directory after
    Always,

    /// Leave flushing to the OS (faster, weaker after power loss)
    Never,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            user_dir: dirs::home_dir().map(|home| home.join(USER_DIR_NAME)),
            global_dir: PathBuf::from(GLOBAL_DIR),
            identity: Identity::current(),
            extension: "json".to_string(),
            staging_suffix: "new".to_string(),
            sync_strategy: SyncStrategy::Always,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the per-user database directory
    pub fn user_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.user_dir = Some(path.into());
        self
    }

    /// Set the machine-global database directory
    pub fn global_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.global_dir = path.into();
        self
    }

    /// Override the detected identity
    pub fn identity(mut self, identity: Identity) -> Self {
        self.config.identity = identity;
        self
    }

    /// Set the committed file extension (without the leading dot)
    pub fn extension(mut self, extension: impl Into<String>) -> Self {
        self.config.extension = extension.into();
        self
    }

    /// Set the staging file suffix (without the leading dot)
    pub fn staging_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.config.staging_suffix = suffix.into();
        self
    }

    /// Set the staging sync strategy
    pub fn sync_strategy(mut self, strategy: SyncStrategy) -> Self {
        self.config.sync_strategy = strategy;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
