pub mod checkpoint_store;

pub use checkpoint_store::{CheckpointRow, CheckpointStore, HEADER_OFFSET};
