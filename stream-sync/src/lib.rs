pub mod cycle;
#[cfg(any(test, feature = "test-util"))]
pub mod memory;
pub mod reconcile;
pub mod render;
pub mod scan;

pub use cycle::StreamSync;
pub use reconcile::{reconcile, SyncReport, WriteFailurePolicy};
pub use render::{contents_changed, extract_fields, render, DisplayedFields};
pub use scan::{scan_channel, AnnouncementMessage, MessageMap, ScanOutcome};
