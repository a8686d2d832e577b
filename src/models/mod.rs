pub mod snippet;
pub mod storage;
pub mod store;

pub use snippet::{Snippet, SnippetLanguage};
pub use storage::{SnippetPersistence, StorageManager};
pub use store::SnippetStore;
