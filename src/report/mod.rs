//! The status report: file classification, comment rendering, and the
//! comment upsert.

pub mod classify;
pub mod overview;
pub mod publish;
pub mod render;
pub mod table;

pub use classify::{
    ChangeType, ClassifiedFile, FileRole, Warning, classify, collapse_filename,
};
pub use overview::StatusOverview;
pub use publish::{CommentPublisher, UpsertOutcome, find_status_comment};
pub use render::{COMMENT_MARKER, files_table, render_comment, warnings_table};
pub use table::markdown_table;
