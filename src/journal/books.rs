//! Bible book catalog and the reader's current passage

use std::fmt;

use super::error::{JournalError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Book {
    pub name: &'static str,
    pub chapters: u32,
}

const fn book(name: &'static str, chapters: u32) -> Book {
    Book { name, chapters }
}

/// The 66 books in canonical order
pub const BOOKS: [Book; 66] = [
    book("Genesis", 50),
    book("Exodus", 40),
    book("Leviticus", 27),
    book("Numbers", 36),
    book("Deuteronomy", 34),
    book("Joshua", 24),
    book("Judges", 21),
    book("Ruth", 4),
    book("I Samuel", 31),
    book("II Samuel", 24),
    book("I Kings", 22),
    book("II Kings", 25),
    book("I Chronicles", 29),
    book("II Chronicles", 36),
    book("Ezra", 10),
    book("Nehemiah", 13),
    book("Esther", 10),
    book("Job", 42),
    book("Psalms", 150),
    book("Proverbs", 31),
    book("Ecclesiastes", 12),
    book("Song of Solomon", 8),
    book("Isaiah", 66),
    book("Jeremiah", 52),
    book("Lamentations", 5),
    book("Ezekiel", 48),
    book("Daniel", 12),
    book("Hosea", 14),
    book("Joel", 3),
    book("Amos", 9),
    book("Obadiah", 1),
    book("Jonah", 4),
    book("Micah", 7),
    book("Nahum", 3),
    book("Habakkuk", 3),
    book("Zephaniah", 3),
    book("Haggai", 2),
    book("Zechariah", 14),
    book("Malachi", 4),
    book("Matthew", 28),
    book("Mark", 16),
    book("Luke", 24),
    book("John", 21),
    book("Acts", 28),
    book("Romans", 16),
    book("I Corinthians", 16),
    book("II Corinthians", 13),
    book("Galatians", 6),
    book("Ephesians", 6),
    book("Philippians", 4),
    book("Colossians", 4),
    book("I Thessalonians", 5),
    book("II Thessalonians", 3),
    book("I Timothy", 6),
    book("II Timothy", 4),
    book("Titus", 3),
    book("Philemon", 1),
    book("Hebrews", 13),
    book("James", 5),
    book("I Peter", 5),
    book("II Peter", 3),
    book("I John", 5),
    book("II John", 1),
    book("III John", 1),
    book("Jude", 1),
    book("Revelation", 22),
];

/// Look up a book by name, ignoring case and accepting "1 John" for "I John"
pub fn find_book(name: &str) -> Option<&'static Book> {
    let name = name.split_whitespace().collect::<Vec<_>>().join(" ");
    let name = match name.split_once(' ') {
        Some(("1", rest)) => format!("I {rest}"),
        Some(("2", rest)) => format!("II {rest}"),
        Some(("3", rest)) => format!("III {rest}"),
        _ => name,
    };
    BOOKS.iter().find(|b| b.name.eq_ignore_ascii_case(&name))
}

/// Longest chapter in the catalog (Psalm 119)
pub const MAX_VERSES: u32 = 176;

/// Book and chapter being studied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptureSelection {
    book: &'static Book,
    chapter: u32,
}

impl Default for ScriptureSelection {
    fn default() -> Self {
        Self { book: &BOOKS[0], chapter: 1 }
    }
}

impl ScriptureSelection {
    pub fn new(book_name: &str, chapter: u32) -> Result<Self> {
        let mut selection = Self::default();
        selection.set_book(book_name)?;
        selection.set_chapter(chapter)?;
        Ok(selection)
    }

    pub fn book(&self) -> &'static Book {
        self.book
    }

    pub fn chapter(&self) -> u32 {
        self.chapter
    }

    /// Switch book, starting again at chapter 1
    pub fn set_book(&mut self, name: &str) -> Result<()> {
        let book = find_book(name).ok_or_else(|| JournalError::UnknownBook(name.to_string()))?;
        self.book = book;
        self.chapter = 1;
        Ok(())
    }

    pub fn set_chapter(&mut self, chapter: u32) -> Result<()> {
        if chapter == 0 || chapter > self.book.chapters {
            return Err(JournalError::ChapterOutOfRange {
                book: self.book.name,
                chapter,
                max: self.book.chapters,
            });
        }
        self.chapter = chapter;
        Ok(())
    }

    /// Id of a verse in this chapter, packed as book, chapter and verse
    /// (John 3:16 is 43003016)
    pub fn verse_id(&self, verse: u32) -> Result<u32> {
        if verse == 0 || verse > MAX_VERSES {
            return Err(JournalError::VerseOutOfRange { reference: self.to_string(), verse });
        }
        let book = BOOKS.iter().position(|b| b.name == self.book.name).unwrap_or(0) as u32 + 1;
        Ok(book * 1_000_000 + self.chapter * 1_000 + verse)
    }
}

impl fmt::Display for ScriptureSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.book.name, self.chapter)
    }
}
