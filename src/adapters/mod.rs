// Adapters layer: concrete document stores behind the `DocumentStore` port.

pub mod file_store;
pub mod memory_store;

pub use file_store::JsonFileStore;
pub use memory_store::{InMemoryStore, Snapshot};
