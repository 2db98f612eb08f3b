//! Localization tracking: which files are tracked, how localizations map to
//! their source, and when each file last changed.

pub mod config;
pub mod error;
pub mod glob;
pub mod history;
pub mod pattern;
pub mod status;

pub use config::{FileEntry, FileKind, Locale, TrackingConfig};
pub use error::TrackingError;
pub use history::{Git2History, TrackedChange, TrackingHistory};
pub use pattern::PathPattern;
pub use status::{FileStatus, LocalizationEntry, SourceEntry, StatusOracle};
