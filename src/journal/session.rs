use chrono::{DateTime, NaiveDate, Utc};

use super::books::ScriptureSelection;
use super::error::Result;
use super::favorites::Favorites;
use super::store::Store;
use super::template::{header_date, reflection_template};
use super::types::FavoriteVerse;

/// The day's devotional being written
#[derive(Debug)]
pub struct Session {
    store: Store,
    date: NaiveDate,
    selection: ScriptureSelection,
    favorites: Favorites,
    /// Favorites changed since the last save
    favorites_changed: bool,
}

impl Session {
    /// Start the session for `date`, picking up favorites saved earlier that day
    pub fn new(store: Store, date: NaiveDate, selection: ScriptureSelection) -> Self {
        let favorites: Favorites = store
            .for_date(date)
            .map(|d| d.favorite_verses.iter().cloned().collect())
            .unwrap_or_default();
        Self { store, date, selection, favorites, favorites_changed: false }
    }

    pub fn selection(&self) -> &ScriptureSelection {
        &self.selection
    }

    pub fn favorites(&self) -> &Favorites {
        &self.favorites
    }

    /// Mark a verse of the current passage as a favorite, or unmark it.
    /// Returns its reference and whether it is now marked.
    pub fn toggle_favorite(&mut self, verse_number: u32, text: String) -> Result<(String, bool)> {
        let verse = FavoriteVerse::at(&self.selection, verse_number, text)?;
        let reference = verse.reference();
        let marked = self.favorites.toggle(verse);
        self.favorites_changed = true;
        Ok((reference, marked))
    }

    pub fn has_unsaved_favorites(&self) -> bool {
        self.favorites_changed
    }

    /// "Devotional - M/D/YY"
    pub fn title(&self) -> String {
        format!("Devotional - {}", header_date(self.date))
    }

    /// Saved reflection for the day, or a fresh template
    pub fn initial_reflection(&self) -> String {
        match self.store.for_date(self.date) {
            Some(devotional) => devotional.reflection.clone(),
            None => reflection_template(&self.selection),
        }
    }

    /// Save the note as the day's reflection
    pub fn save(&mut self, reflection: String, now: DateTime<Utc>) -> Result<u32> {
        let request = self.favorites.save_request(reflection);
        let id = self.store.save(self.date, now, request, &self.favorites)?;
        self.favorites_changed = false;
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()
    }

    #[test]
    fn test_template_until_saved() {
        let dir = TempDir::new().unwrap();
        let store = Store::open(dir.path()).unwrap();
        let mut session = Session::new(store, day(), ScriptureSelection::new("Ruth", 2).unwrap());

        assert_eq!(session.title(), "Devotional - 3/9/24");
        assert!(session.initial_reflection().starts_with("# Scripture: Ruth 2"));

        session.save("# Ruth 2\nkindness".into(), Utc::now()).unwrap();
        let reopened = Session::new(Store::open(dir.path()).unwrap(), day(), ScriptureSelection::default());
        assert_eq!(reopened.initial_reflection(), "# Ruth 2\nkindness");
    }

    #[test]
    fn test_favorites_restored_from_saved_day() {
        let dir = TempDir::new().unwrap();
        let mut store = Store::open(dir.path()).unwrap();
        let favorite = FavoriteVerse {
            verse_id: 7,
            verse_number: 16,
            text: "where you go I will go".into(),
            book_name: "Ruth".into(),
            chapter_number: 1,
            devotional_id: None,
        };
        let favorites: Favorites = std::iter::once(favorite).collect();
        store.save(day(), Utc::now(), favorites.save_request("amen".into()), &favorites).unwrap();

        let session = Session::new(store, day(), ScriptureSelection::default());
        assert_eq!(session.favorites().ids(), vec![7]);
        assert_eq!(session.favorites().iter().next().unwrap().reference(), "Ruth 1:16");
    }

    #[test]
    fn test_toggle_favorite_until_saved() {
        let dir = TempDir::new().unwrap();
        let store = Store::open(dir.path()).unwrap();
        let mut session = Session::new(store, day(), ScriptureSelection::new("Psalms", 23).unwrap());

        let (reference, marked) = session.toggle_favorite(1, "The Lord is my shepherd".into()).unwrap();
        assert_eq!(reference, "Psalms 23:1");
        assert!(marked);
        assert!(session.has_unsaved_favorites());
        assert!(session.toggle_favorite(0, String::new()).is_err());

        session.save("amen".into(), Utc::now()).unwrap();
        assert!(!session.has_unsaved_favorites());

        let mut reopened = Session::new(Store::open(dir.path()).unwrap(), day(), ScriptureSelection::default());
        assert_eq!(reopened.favorites().ids(), vec![19_023_001]);

        // Verse 1 of Genesis 1 is a different favorite
        let (_, marked) = reopened.toggle_favorite(1, String::new()).unwrap();
        assert!(marked);
        assert_eq!(reopened.favorites().len(), 2);
    }
}
