pub mod gate;
mod state;

pub use gate::{Intent, Notification, NotificationKind};
pub use state::{FetchOutcome, FetchResult, RequestToken, WorkflowState};
