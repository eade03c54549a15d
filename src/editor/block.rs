//! Line-level block markup
//!
//! Notes are markdown-flavoured: a line's leading prefix decides whether it
//! renders as a heading, a list item or a rule.

use regex::Regex;
use std::sync::OnceLock;

/// Block kind of a single line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Block {
    Paragraph,
    Heading(u8),
    Bullet,
    Ordered(u32),
    Rule,
}

/// Text of a horizontal rule line
pub const RULE: &str = "---";

fn block_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(?:(#{1,6})|([-*])|(\d{1,9})\.) ").expect("block prefix pattern"))
}

/// Parse a line's block kind and the length (in chars) of its prefix
pub fn parse_block(line: &str) -> (Block, usize) {
    if line.trim_end() == RULE {
        return (Block::Rule, 0);
    }
    if let Some(caps) = block_re().captures(line) {
        let len = caps[0].chars().count();
        if let Some(hashes) = caps.get(1) {
            return (Block::Heading(hashes.as_str().len() as u8), len);
        }
        if caps.get(2).is_some() {
            return (Block::Bullet, len);
        }
        if let Some(n) = caps.get(3) {
            return (Block::Ordered(n.as_str().parse().unwrap_or(1)), len);
        }
    }
    (Block::Paragraph, 0)
}

/// Prefix that starts a heading of `level`
pub fn heading_prefix(level: u8) -> String {
    format!("{} ", "#".repeat(level.clamp(1, 6) as usize))
}

/// Prefix that continues a list onto the next line, if `block` is a list
pub fn continuation_prefix(block: Block) -> Option<String> {
    match block {
        Block::Bullet => Some("- ".to_string()),
        Block::Ordered(n) => Some(format!("{}. ", n.saturating_add(1))),
        _ => None,
    }
}
