mod unicode;

pub use unicode::{char_width, display_width, truncate_to_width};
