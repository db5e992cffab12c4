//! The syllabi tools the reasoner can call.
//!
//! Each tool wraps one document index operation and encodes its result
//! as a JSON payload for the reasoner. Domain failures that the
//! reasoner should be able to explain (such as a missing local file)
//! are encoded into successful payloads; everything else surfaces as a
//! tool error and is collapsed by the dispatcher.

mod list_files;
mod search;
mod stats;
mod upload;

pub use list_files::ListIndexedFilesTool;
pub use search::SearchSyllabiTool;
pub use stats::GetIndexStatsTool;
pub use upload::UploadSyllabusTool;
