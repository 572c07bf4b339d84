pub mod document;
pub mod repository;
pub mod storage;

pub use repository::WriteupStore;
pub use storage::{DocumentStorage, FileStorage, MemoryStorage};
