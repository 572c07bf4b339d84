pub mod writeup;

pub use writeup::{MarkDoneRequest, NewWriteupRequest, Portal, Writeup};
