//! PDF manipulation module

pub mod overlay;
pub mod split;
pub mod table;
pub mod text;

// Re-export commonly used items
pub use overlay::{overlay_schedule, OverlayOptions};
pub use split::{extract_page, load_document, plan_split, split_by_worker, SplitOptions, SplitOutput, WorkerPage};
pub use text::{document_period, find_worker_name, page_text, sanitize_label};
