//! Devotionals on disk
//!
//! All devotionals live in one JSON file in the data directory, newest first.

use chrono::{DateTime, NaiveDate, Utc};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::error::{JournalError, Result};
use super::favorites::Favorites;
use super::types::{Devotional, SaveRequest};

const FILE_NAME: &str = "devotionals.json";

#[derive(Debug)]
pub struct Store {
    path: PathBuf,
    devotionals: Vec<Devotional>,
}

impl Store {
    /// Open the store in `dir`. A missing file is an empty journal.
    pub fn open(dir: &Path) -> Result<Self> {
        let path = dir.join(FILE_NAME);
        let devotionals = match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).map_err(|source| JournalError::Json {
                path: path.clone(),
                source,
            })?,
            Err(e) if e.kind() == ErrorKind::NotFound => Vec::new(),
            Err(source) => return Err(JournalError::Io { path, source }),
        };

        let mut store = Self { path, devotionals };
        store.sort();
        debug!(path = %store.path.display(), count = store.devotionals.len(), "opened journal");
        Ok(store)
    }

    /// All devotionals, newest first
    pub fn devotionals(&self) -> &[Devotional] {
        &self.devotionals
    }

    pub fn for_date(&self, date: NaiveDate) -> Option<&Devotional> {
        self.devotionals.iter().find(|d| d.devotional_date == date)
    }

    /// Create or update the devotional for `date` and write the journal,
    /// returning its id. Favorite ids are resolved against `favorites`.
    pub fn save(
        &mut self,
        date: NaiveDate,
        now: DateTime<Utc>,
        request: SaveRequest,
        favorites: &Favorites,
    ) -> Result<u32> {
        let id = match self.for_date(date) {
            Some(existing) => existing.devotional_id,
            None => self.devotionals.iter().map(|d| d.devotional_id).max().unwrap_or(0) + 1,
        };

        let favorite_verses = favorites
            .iter()
            .filter(|v| request.favorite_verses.contains(&v.verse_id))
            .cloned()
            .map(|mut v| {
                v.devotional_id = Some(id);
                v
            })
            .collect();

        match self.devotionals.iter_mut().find(|d| d.devotional_id == id) {
            Some(existing) => {
                existing.reflection = request.reflection;
                existing.favorite_verses = favorite_verses;
                existing.updated_at = now;
            }
            None => self.devotionals.push(Devotional {
                devotional_id: id,
                devotional_date: date,
                reflection: request.reflection,
                created_at: now,
                updated_at: now,
                favorite_verses,
            }),
        }
        self.sort();
        self.write()?;
        info!(id, %date, "saved devotional");
        Ok(id)
    }

    fn sort(&mut self) {
        self.devotionals.sort_by(|a, b| b.devotional_date.cmp(&a.devotional_date));
    }

    fn write(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| JournalError::Io { path: parent.to_path_buf(), source })?;
        }
        let content = serde_json::to_string_pretty(&self.devotionals).map_err(|source| JournalError::Json {
            path: self.path.clone(),
            source,
        })?;
        fs::write(&self.path, content).map_err(|source| JournalError::Io { path: self.path.clone(), source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal::types::FavoriteVerse;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn at(d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, d, h, 0, 0).unwrap()
    }

    fn request(text: &str, ids: &[u32]) -> SaveRequest {
        SaveRequest { reflection: text.to_string(), favorite_verses: ids.to_vec() }
    }

    fn favorite(id: u32) -> FavoriteVerse {
        FavoriteVerse {
            verse_id: id,
            verse_number: id,
            text: "The Lord is my shepherd".into(),
            book_name: "Psalms".into(),
            chapter_number: 23,
            devotional_id: None,
        }
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = Store::open(&dir.path().join("nested")).unwrap();
        assert!(store.devotionals().is_empty());
        assert!(store.for_date(day(1)).is_none());
    }

    #[test]
    fn test_save_creates_then_updates_today() {
        let dir = TempDir::new().unwrap();
        let mut store = Store::open(dir.path()).unwrap();

        assert_eq!(store.save(day(9), at(9, 7), request("first", &[]), &Favorites::new()).unwrap(), 1);
        assert_eq!(store.save(day(9), at(9, 8), request("second", &[]), &Favorites::new()).unwrap(), 1);

        let saved = store.for_date(day(9)).unwrap();
        assert_eq!(saved.reflection, "second");
        assert_eq!(saved.created_at, at(9, 7));
        assert_eq!(saved.updated_at, at(9, 8));
        assert_eq!(store.devotionals().len(), 1);
    }

    #[test]
    fn test_newest_first_and_persisted() {
        let dir = TempDir::new().unwrap();
        let mut store = Store::open(dir.path()).unwrap();
        store.save(day(2), at(2, 7), request("tuesday", &[]), &Favorites::new()).unwrap();
        store.save(day(1), at(2, 9), request("monday", &[]), &Favorites::new()).unwrap();
        store.save(day(3), at(3, 7), request("wednesday", &[]), &Favorites::new()).unwrap();

        let reopened = Store::open(dir.path()).unwrap();
        let dates: Vec<NaiveDate> = reopened.devotionals().iter().map(|d| d.devotional_date).collect();
        assert_eq!(dates, vec![day(3), day(2), day(1)]);
        assert_eq!(reopened.for_date(day(1)).unwrap().devotional_id, 2);
    }

    #[test]
    fn test_save_resolves_favorites() {
        let dir = TempDir::new().unwrap();
        let mut store = Store::open(dir.path()).unwrap();
        let favorites: Favorites = vec![favorite(1), favorite(4)].into_iter().collect();

        store.save(day(9), at(9, 7), request("amen", &[4, 99]), &favorites).unwrap();
        let saved = store.for_date(day(9)).unwrap();
        assert_eq!(saved.favorite_verses.len(), 1);
        assert_eq!(saved.favorite_verses[0].verse_id, 4);
        assert_eq!(saved.favorite_verses[0].devotional_id, Some(1));
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(FILE_NAME), "{ not json").unwrap();
        assert!(matches!(Store::open(dir.path()), Err(JournalError::Json { .. })));
    }
}
