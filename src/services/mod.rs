pub mod classifier;

pub use classifier::{StatusBuckets, filter_completed_missing_upcoming, filter_pending};
