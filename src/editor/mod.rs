mod block;
mod composer;
mod cursor;
mod document;
mod history;
mod state;

pub use block::{parse_block, Block};
pub use composer::Composer;
pub use cursor::{Cursor, Position};
pub use document::Document;
pub use history::{History, Operation};
pub use state::Editor;
