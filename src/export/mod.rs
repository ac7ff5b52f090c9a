//! Export phases: showcase MP3, release note and POST package

pub mod post;
pub mod release_notes;
pub mod showcase;

pub use post::{build_post_package, PostReport};
pub use release_notes::write_release_note;
pub use showcase::{export_master, ShowcaseExport};
