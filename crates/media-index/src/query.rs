//! Filtering over the media index.
//!
//! Each dimension holds a set of accepted values. An empty set puts no
//! constraint on that dimension; a non-empty set matches if the entry's value
//! is any of its members. An entry passes when every dimension matches.

use std::collections::HashSet;

use rand::seq::SliceRandom;

use crate::index::MediaIndex;
use crate::persistence::EntryMap;
use crate::types::MediaEntry;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaFilter {
    /// Ratings in their decimal string form.
    pub ratings: HashSet<String>,
    pub nicknames: HashSet<String>,
    pub categories: HashSet<String>,
    pub types: HashSet<String>,
}

impl MediaFilter {
    /// Builds a filter from repeatable `rating`, `nickname`, `category` and
    /// `type` pairs. Unrelated keys are ignored.
    pub fn from_query_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut filter = Self::default();
        for (key, value) in pairs {
            let target = match key.as_ref() {
                "rating" => &mut filter.ratings,
                "nickname" => &mut filter.nicknames,
                "category" => &mut filter.categories,
                "type" => &mut filter.types,
                _ => continue,
            };
            target.insert(value.into());
        }
        filter
    }

    pub fn is_unconstrained(&self) -> bool {
        self.ratings.is_empty()
            && self.nicknames.is_empty()
            && self.categories.is_empty()
            && self.types.is_empty()
    }

    pub fn matches(&self, entry: &MediaEntry) -> bool {
        accepts(&self.ratings, &entry.rating.to_string())
            && accepts(&self.nicknames, &entry.nickname)
            && accepts(&self.categories, &entry.category)
            && accepts(&self.types, entry.media_type.as_str())
    }
}

fn accepts(allowed: &HashSet<String>, value: &str) -> bool {
    allowed.is_empty() || allowed.contains(value)
}

impl MediaIndex {
    /// The whole index, unfiltered and in no particular order.
    pub fn list_all(&self) -> &EntryMap {
        self.entries()
    }

    /// Paths of the entries passing `filter`, freshly shuffled on every call.
    pub fn filter(&self, filter: &MediaFilter) -> Vec<String> {
        let mut paths: Vec<String> = self
            .entries()
            .iter()
            .filter(|(_, entry)| filter.matches(entry))
            .map(|(path, _)| path.clone())
            .collect();
        paths.shuffle(&mut rand::thread_rng());
        paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EntryPatch, MediaType};
    use std::fs;
    use tempfile::{tempdir, TempDir};

    fn rated_index() -> (TempDir, MediaIndex) {
        let dir = tempdir().expect("tempdir");
        let root = dir.path().join("media");
        fs::create_dir_all(root.join("beach")).expect("mkdir");
        fs::create_dir_all(root.join("city")).expect("mkdir");
        for name in ["beach/one.jpg", "beach/two.mp4", "city/three.png"] {
            fs::write(root.join(name), b"x").expect("write");
        }
        let mut index =
            MediaIndex::open(&root, dir.path().join("media_index.json")).expect("open");
        index
            .update_entry(
                "beach/two.mp4",
                &EntryPatch {
                    rating: Some(2),
                    category: Some("favorites".to_string()),
                },
            )
            .expect("update");
        index
            .update_entry(
                "city/three.png",
                &EntryPatch {
                    rating: Some(3),
                    category: None,
                },
            )
            .expect("update");
        (dir, index)
    }

    fn sorted(mut paths: Vec<String>) -> Vec<String> {
        paths.sort();
        paths
    }

    fn filter_of(pairs: &[(&str, &str)]) -> MediaFilter {
        MediaFilter::from_query_pairs(pairs.iter().map(|(k, v)| (*k, v.to_string())))
    }

    #[test]
    fn ratings_are_or_within_dimension() {
        let (_dir, index) = rated_index();
        let paths = index.filter(&filter_of(&[("rating", "1"), ("rating", "2")]));
        assert_eq!(sorted(paths), vec!["beach/one.jpg", "beach/two.mp4"]);
    }

    #[test]
    fn empty_filter_returns_everything() {
        let (_dir, index) = rated_index();
        let filter = MediaFilter::default();
        assert!(filter.is_unconstrained());
        assert_eq!(index.filter(&filter).len(), 3);
    }

    #[test]
    fn dimensions_are_and_combined() {
        let (_dir, index) = rated_index();
        let paths = index.filter(&filter_of(&[
            ("nickname", "beach"),
            ("type", "video"),
            ("category", "favorites"),
        ]));
        assert_eq!(paths, vec!["beach/two.mp4"]);

        let none = index.filter(&filter_of(&[("nickname", "city"), ("type", "video")]));
        assert!(none.is_empty());
    }

    #[test]
    fn empty_category_value_matches_uncategorized() {
        let (_dir, index) = rated_index();
        let paths = index.filter(&filter_of(&[("category", "")]));
        assert_eq!(sorted(paths), vec!["beach/one.jpg", "city/three.png"]);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let filter = filter_of(&[("sort", "name"), ("type", "image")]);
        assert_eq!(filter.types.len(), 1);
        assert!(filter.ratings.is_empty());
    }

    #[test]
    fn matches_compares_rating_as_text() {
        let entry = MediaEntry {
            file_name: "x.gif".to_string(),
            rating: 10,
            nickname: "n".to_string(),
            category: String::new(),
            media_type: MediaType::Image,
        };
        assert!(filter_of(&[("rating", "10")]).matches(&entry));
        assert!(!filter_of(&[("rating", "1")]).matches(&entry));
        assert!(!filter_of(&[("rating", "010")]).matches(&entry));
    }

    #[test]
    fn list_all_is_the_full_map() {
        let (_dir, index) = rated_index();
        let all = index.list_all();
        assert_eq!(all.len(), 3);
        assert!(all.contains_key("city/three.png"));
    }
}
