//! Path Module
//!
//! Locates database files on disk.
//!
//! ## Responsibilities
//! - Compute the ordered list of storage directories for the current identity
//! - Find an existing database (committed or staging file present)
//! - Create new databases in the preferred directory
//! - Apply the public/private permission policy
//!
//! ## Directory Layout
//! ```text
//! unprivileged:  [ ~/.dotstore , /etc/dotstore ]   (search order)
//!                      ▲
//!                      └── new databases are created here
//!
//! privileged:    [ /etc/dotstore ]
//!
//! {dir}/
//!   ├── settings.json        (committed file, 0644)
//!   ├── settings.json.new    (staging file, only during a commit)
//!   └── .secrets.json        (private database, 0600)
//! ```

mod policy;
mod resolver;

pub use policy::{
    Visibility, DIR_MODE, PRIVATE_FILE_MODE, PRIVATE_MARKER, PUBLIC_FILE_MODE,
};
pub use resolver::PathResolver;
