//! Journal records, shaped like the devotional service payloads

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::books::ScriptureSelection;
use super::error::Result;

/// A verse the reader marked while studying
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteVerse {
    pub verse_id: u32,
    pub verse_number: u32,
    pub text: String,
    pub book_name: String,
    pub chapter_number: u32,
    /// Set once the verse is saved with a devotional
    #[serde(default)]
    pub devotional_id: Option<u32>,
}

impl FavoriteVerse {
    /// Verse `verse_number` of the selected chapter, quoted as `text`
    pub fn at(selection: &ScriptureSelection, verse_number: u32, text: String) -> Result<Self> {
        Ok(Self {
            verse_id: selection.verse_id(verse_number)?,
            verse_number,
            text,
            book_name: selection.book().name.to_string(),
            chapter_number: selection.chapter(),
            devotional_id: None,
        })
    }

    /// Reference label, e.g. "John 3:16"
    pub fn reference(&self) -> String {
        format!("{} {}:{}", self.book_name, self.chapter_number, self.verse_number)
    }
}

/// One day's reflection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Devotional {
    pub devotional_id: u32,
    pub devotional_date: NaiveDate,
    /// Markdown text of the note
    pub reflection: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub favorite_verses: Vec<FavoriteVerse>,
}

/// Payload of a save: the note and the ids of its favorite verses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveRequest {
    pub reflection: String,
    pub favorite_verses: Vec<u32>,
}
