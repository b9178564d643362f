pub mod error;
pub mod file;
pub mod writer;

pub use error::StoreError;
pub use file::FileSnapshotStore;
pub use writer::SnapshotWriter;
