//! Month grouping and page splitting.

use std::collections::HashMap;
use std::ops::Deref;

use serde::Serialize;

use keepsake_core::config::GroupOrder;
use keepsake_core::types::PhotoId;

use crate::label::{month_year_key, month_year_ordinal};
use crate::photo::BookPhoto;

/// An ordered run of photos from a single month bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Page {
    photos: Vec<BookPhoto>,
}

impl Page {
    /// Create a page from photos already in order.
    pub fn new(photos: Vec<BookPhoto>) -> Self {
        Self { photos }
    }

    /// The page's photos.
    pub fn photos(&self) -> &[BookPhoto] {
        &self.photos
    }

    /// Whether a photo with this id is on the page.
    pub fn contains(&self, id: PhotoId) -> bool {
        self.photos.iter().any(|photo| photo.id == id)
    }

    /// Whether a photo with this exact label is on the page.
    pub fn contains_label(&self, label: &str) -> bool {
        self.photos.iter().any(|photo| photo.label == label)
    }
}

impl Deref for Page {
    type Target = [BookPhoto];

    fn deref(&self) -> &Self::Target {
        &self.photos
    }
}

/// Group photos by month-year and split each group into pages of at most
/// `capacity` photos.
///
/// Photo order inside a group is preserved. Groups appear in first-seen
/// order unless `order` asks for chronological.
pub fn group_into_pages(photos: &[BookPhoto], capacity: usize, order: GroupOrder) -> Vec<Page> {
    let capacity = capacity.max(1);
    let mut groups: Vec<(String, Vec<BookPhoto>)> = Vec::new();
    let mut slots: HashMap<String, usize> = HashMap::new();

    for photo in photos {
        let key = month_year_key(&photo.label);
        let slot = match slots.get(&key) {
            Some(&slot) => slot,
            None => {
                slots.insert(key.clone(), groups.len());
                groups.push((key, Vec::new()));
                groups.len() - 1
            }
        };
        groups[slot].1.push(photo.clone());
    }

    if order == GroupOrder::Chronological {
        groups.sort_by_key(|(key, _)| month_year_ordinal(key));
    }

    groups
        .into_iter()
        .flat_map(|(_, members)| {
            members
                .chunks(capacity)
                .map(|chunk| Page::new(chunk.to_vec()))
                .collect::<Vec<_>>()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn photo(y: i32, m: u32, d: u32) -> BookPhoto {
        let at = Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap();
        BookPhoto::new(PhotoId::new(), "file://x", at, "album/x.jpg")
    }

    #[test]
    fn test_empty_input_gives_no_pages() {
        assert!(group_into_pages(&[], 6, GroupOrder::FirstSeen).is_empty());
    }

    #[test]
    fn test_pages_never_span_months() {
        let photos = vec![
            photo(2025, 12, 1),
            photo(2025, 12, 15),
            photo(2026, 1, 2),
        ];
        let pages = group_into_pages(&photos, 6, GroupOrder::FirstSeen);
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].len(), 2);
        assert_eq!(pages[1].len(), 1);
        assert_eq!(pages[1][0].label, "Jan 2, 2026");
    }

    #[test]
    fn test_split_preserves_order() {
        let photos: Vec<_> = (1..=7).map(|d| photo(2025, 3, d)).collect();
        let pages = group_into_pages(&photos, 3, GroupOrder::FirstSeen);
        let sizes: Vec<_> = pages.iter().map(|p| p.len()).collect();
        assert_eq!(sizes, vec![3, 3, 1]);
        let flattened: Vec<_> = pages.iter().flat_map(|p| p.iter().map(|x| x.id)).collect();
        let original: Vec<_> = photos.iter().map(|x| x.id).collect();
        assert_eq!(flattened, original);
    }

    #[test]
    fn test_first_seen_keeps_encounter_order() {
        let photos = vec![photo(2026, 1, 2), photo(2025, 12, 1), photo(2026, 1, 9)];
        let pages = group_into_pages(&photos, 6, GroupOrder::FirstSeen);
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].len(), 2);
        assert_eq!(pages[0][0].label, "Jan 2, 2026");
        assert_eq!(pages[1][0].label, "Dec 1, 2025");
    }

    #[test]
    fn test_chronological_sorts_groups() {
        let photos = vec![photo(2026, 1, 2), photo(2025, 12, 1)];
        let pages = group_into_pages(&photos, 6, GroupOrder::Chronological);
        assert_eq!(pages[0][0].label, "Dec 1, 2025");
        assert_eq!(pages[1][0].label, "Jan 2, 2026");
    }
}
