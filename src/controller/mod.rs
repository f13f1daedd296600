//! Command handlers behind the toolbar, the query box and the canvas.

mod dispatch;
mod gesture;
mod search;
mod upload;
mod view;

pub use dispatch::{SessionHandle, index_document, load_full_graph, submit_query};
pub use gesture::{EdgeGesture, GestureOutcome};
pub use search::{RenderSummary, SearchState, SearchStatus, Ticket, render_response};
pub use upload::{DocumentList, UploadError, UploadStatus};
pub use view::{FIT_DURATION_MS, FOCUS_SCALE, ViewCommand, ViewQueue};
