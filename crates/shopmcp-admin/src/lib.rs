pub mod bulk;
pub mod client;
pub mod error;
pub mod throttle;
pub mod types;

pub use bulk::{filter_by_title, BulkItemOutcome, BulkUpdateReport, DEFAULT_BATCH_SIZE};
pub use client::AdminClient;
pub use error::AdminError;
pub use throttle::Throttle;
pub use types::ConnectionStatus;
