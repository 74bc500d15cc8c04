//! smartsort - keep a directory tidy by extension
//!
//! This library sorts the files of a directory into category subfolders
//! (`Documents/`, `Images/`, ...) according to extension rules, either once
//! or on a fixed interval. Rules come from a built-in table or a JSON, YAML
//! or TOML file.

pub mod cli;
pub mod config;
pub mod file_organizer;
pub mod fs_ops;
pub mod logging;
pub mod output;
pub mod reporter;
pub mod rules;
pub mod schedule;

pub use config::{ConfigError, load_rules};
pub use file_organizer::{FileOrganizer, MoveError, OrganizeError, PassReport};
pub use fs_ops::{FileSystem, StdFs};
pub use reporter::{Reporter, TracingReporter};
pub use rules::{RuleSet, RuleTable};
pub use schedule::{Scheduler, Shutdown};
