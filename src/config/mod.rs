// src/config/mod.rs

//! Command-file support.
//!
//! A command file is a TOML document listing descriptors for the engine to
//! run in sequence:
//!
//! ```toml
//! [[command]]
//! path = "/bin/echo"
//! args = ["hello"]
//!
//! [[command]]
//! path = "which"
//! args = ["git"]
//! mode = "host"
//! ```

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, load_from_path};
pub use model::{CommandEntry, CommandFile, ModeKind};
