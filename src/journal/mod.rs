//! Devotional journal: scripture selection, favorites and local storage

mod books;
mod error;
mod favorites;
mod listing;
mod session;
mod store;
mod template;
mod types;

pub use books::ScriptureSelection;
pub use error::{JournalError, Result};
pub use favorites::Favorites;
pub use listing::listing;
pub use session::Session;
pub use store::Store;
