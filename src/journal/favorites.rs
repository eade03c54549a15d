use super::types::{FavoriteVerse, SaveRequest};

/// Favorite verses in the order they were marked, unique by verse id
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Favorites {
    verses: Vec<FavoriteVerse>,
}

impl Favorites {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, verse_id: u32) -> bool {
        self.verses.iter().any(|v| v.verse_id == verse_id)
    }

    /// Mark a verse, or unmark it if already marked. Returns true if it is now marked.
    pub fn toggle(&mut self, verse: FavoriteVerse) -> bool {
        if let Some(idx) = self.verses.iter().position(|v| v.verse_id == verse.verse_id) {
            self.verses.remove(idx);
            false
        } else {
            self.verses.push(verse);
            true
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &FavoriteVerse> {
        self.verses.iter()
    }

    pub fn len(&self) -> usize {
        self.verses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.verses.is_empty()
    }

    pub fn ids(&self) -> Vec<u32> {
        self.verses.iter().map(|v| v.verse_id).collect()
    }

    pub fn save_request(&self, reflection: String) -> SaveRequest {
        SaveRequest { reflection, favorite_verses: self.ids() }
    }
}

impl FromIterator<FavoriteVerse> for Favorites {
    fn from_iter<I: IntoIterator<Item = FavoriteVerse>>(iter: I) -> Self {
        let mut favorites = Favorites::new();
        for verse in iter {
            if !favorites.contains(verse.verse_id) {
                favorites.verses.push(verse);
            }
        }
        favorites
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verse(id: u32, number: u32) -> FavoriteVerse {
        FavoriteVerse {
            verse_id: id,
            verse_number: number,
            text: format!("verse {number}"),
            book_name: "Psalms".into(),
            chapter_number: 23,
            devotional_id: None,
        }
    }

    #[test]
    fn test_toggle_keeps_order() {
        let mut favorites = Favorites::new();
        assert!(favorites.toggle(verse(10, 1)));
        assert!(favorites.toggle(verse(14, 4)));
        assert!(favorites.toggle(verse(11, 2)));
        assert_eq!(favorites.ids(), vec![10, 14, 11]);

        assert!(!favorites.toggle(verse(14, 4)));
        assert!(!favorites.contains(14));
        assert_eq!(favorites.len(), 2);
    }

    #[test]
    fn test_collect_dedupes() {
        let favorites: Favorites = vec![verse(1, 1), verse(2, 2), verse(1, 1)].into_iter().collect();
        assert_eq!(favorites.ids(), vec![1, 2]);

        let request = favorites.save_request("amen".into());
        assert_eq!(request.favorite_verses, vec![1, 2]);
    }
}
