//! Shared fixtures for dotstore tests

#![allow(dead_code)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use dotstore::{Config, Identity, Session, SyncStrategy};
use tempfile::TempDir;
use tracing_subscriber::EnvFilter;

/// A temp directory laid out like a machine: `home/user/.dotstore` and `etc/dotstore`
pub struct Sandbox {
    pub temp: TempDir,
    pub user_dir: PathBuf,
    pub global_dir: PathBuf,
}

impl Sandbox {
    pub fn new() -> Self {
        init_tracing();
        let temp = TempDir::new().unwrap();
        let user_dir = temp.path().join("home").join("user").join(".dotstore");
        let global_dir = temp.path().join("etc").join("dotstore");
        Self {
            temp,
            user_dir,
            global_dir,
        }
    }

    pub fn config(&self, identity: Identity) -> Config {
        Config::builder()
            .user_dir(&self.user_dir)
            .global_dir(&self.global_dir)
            .identity(identity)
            .sync_strategy(SyncStrategy::Always)
            .build()
    }

    pub fn session(&self, identity: Identity) -> Session {
        Session::new(self.config(identity)).unwrap()
    }

    /// Session for a regular user
    pub fn user_session(&self) -> Session {
        self.session(Identity::Unprivileged)
    }

    pub fn user_db(&self, name: &str) -> PathBuf {
        self.user_dir.join(format!("{}.json", name))
    }

    pub fn global_db(&self, name: &str) -> PathBuf {
        self.global_dir.join(format!("{}.json", name))
    }
}

/// Staging path next to a committed path
pub fn staging(path: &Path) -> PathBuf {
    PathBuf::from(format!("{}.new", path.display()))
}

/// Permission bits of a file
pub fn mode_of(path: &Path) -> u32 {
    fs::metadata(path).unwrap().permissions().mode() & 0o777
}

/// Root ignores permission bits, so denial tests can't run as root
pub fn running_as_root() -> bool {
    unsafe { libc::geteuid() == 0 }
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_test_writer()
        .try_init();
}
