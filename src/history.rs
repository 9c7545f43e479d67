use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use tracing::info;

/// Maximum number of remembered submissions.
pub const HISTORY_CAPACITY: usize = 10;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HistoryItemError {
    #[error("history entry is missing an id")]
    EmptyId,
    #[error("history entry is missing a location")]
    EmptyLocation,
}

/// One remembered weather submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawHistoryItem")]
pub struct HistoryItem {
    /// Identifier assigned by the weather service.
    pub id: String,
    pub location: String,
    /// Serialized as `YYYY-MM-DD`.
    pub date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Unvalidated shape of a persisted entry.
#[derive(Deserialize)]
struct RawHistoryItem {
    id: String,
    location: String,
    date: NaiveDate,
    #[serde(default)]
    notes: Option<String>,
}

impl TryFrom<RawHistoryItem> for HistoryItem {
    type Error = HistoryItemError;

    fn try_from(raw: RawHistoryItem) -> Result<Self, Self::Error> {
        HistoryItem::new(raw.id, raw.location, raw.date, raw.notes)
    }
}

impl HistoryItem {
    /// Creates a validated entry. Location is trimmed and blank notes are dropped.
    pub fn new(
        id: impl Into<String>,
        location: impl Into<String>,
        date: NaiveDate,
        notes: Option<String>,
    ) -> Result<Self, HistoryItemError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(HistoryItemError::EmptyId);
        }

        let location = location.into().trim().to_string();
        if location.is_empty() {
            return Err(HistoryItemError::EmptyLocation);
        }

        let notes = notes.filter(|n| !n.trim().is_empty());

        Ok(Self {
            id,
            location,
            date,
            notes,
        })
    }
}

/// Most-recent-first list of submissions with unique ids, never longer than [`HISTORY_CAPACITY`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct HistoryList {
    items: Vec<HistoryItem>,
}

impl HistoryList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a list from arbitrary entries. The first occurrence of an id wins and
    /// anything past the capacity is dropped.
    pub fn from_items(items: impl IntoIterator<Item = HistoryItem>) -> Self {
        let mut list = Self::new();
        for item in items {
            if list.items.len() == HISTORY_CAPACITY {
                break;
            }
            if list.get(&item.id).is_none() {
                list.items.push(item);
            }
        }
        list
    }

    /// Inserts `item` at the front, replacing any entry with the same id, and evicts
    /// the oldest entries beyond capacity.
    pub fn record(&mut self, item: HistoryItem) {
        self.items.retain(|entry| entry.id != item.id);
        self.items.insert(0, item);
        self.items.truncate(HISTORY_CAPACITY);
    }

    pub fn items(&self) -> &[HistoryItem] {
        &self.items
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistoryItem> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn first(&self) -> Option<&HistoryItem> {
        self.items.first()
    }

    pub fn get(&self, id: &str) -> Option<&HistoryItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

impl<'de> Deserialize<'de> for HistoryList {
    /// Accepts any JSON array; entries that fail validation are skipped rather than
    /// rejecting the whole list.
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Vec::<serde_json::Value>::deserialize(deserializer)?;
        let total = raw.len();

        let items: Vec<HistoryItem> = raw
            .into_iter()
            .filter_map(|value| match serde_json::from_value::<HistoryItem>(value) {
                Ok(item) => Some(item),
                Err(e) => {
                    info!("Dropping malformed history entry: {}", e);
                    None
                }
            })
            .collect();

        if items.len() < total {
            info!("Kept {} of {} persisted history entries", items.len(), total);
        }

        Ok(Self::from_items(items))
    }
}

impl<'a> IntoIterator for &'a HistoryList {
    type Item = &'a HistoryItem;
    type IntoIter = std::slice::Iter<'a, HistoryItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Position when stepping through a history snapshot (None when not navigating).
///
/// The list is newest-first, so "older" walks towards the end of the list.
#[derive(Debug, Default, Clone)]
pub struct HistoryCursor {
    index: Option<usize>,
}

impl HistoryCursor {
    pub fn new() -> Self {
        Self { index: None }
    }

    /// Steps to the next older entry.
    pub fn older<'a>(&mut self, list: &'a HistoryList) -> Option<&'a HistoryItem> {
        if list.is_empty() {
            self.index = None;
            return None;
        }

        match self.index {
            None => {
                // start at the most recent
                self.index = Some(0);
                list.items.first()
            }
            Some(i) if i >= list.len() => {
                // list shrank underneath us, start over from the most recent
                self.index = Some(0);
                list.items.first()
            }
            Some(i) if i + 1 >= list.len() => {
                // Already at oldest entry
                None
            }
            Some(i) => {
                self.index = Some(i + 1);
                list.items.get(i + 1)
            }
        }
    }

    /// Steps to the next newer entry. Moving past the newest leaves navigation.
    pub fn newer<'a>(&mut self, list: &'a HistoryList) -> Option<&'a HistoryItem> {
        match self.index {
            None => None,
            Some(0) => {
                self.index = None;
                None
            }
            Some(i) if i >= list.len() => {
                self.index = None;
                None
            }
            Some(i) => {
                self.index = Some(i - 1);
                list.items.get(i - 1)
            }
        }
    }

    pub fn is_navigating(&self) -> bool {
        self.index.is_some()
    }

    pub fn reset(&mut self) {
        self.index = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn item(id: &str) -> HistoryItem {
        HistoryItem::new(id, "Paris", date(2024, 5, 1), None).unwrap()
    }

    fn ids(list: &HistoryList) -> Vec<&str> {
        list.iter().map(|i| i.id.as_str()).collect()
    }

    #[test]
    fn test_new_item_rejects_blank_id_and_location() {
        assert_eq!(
            HistoryItem::new(" ", "Paris", date(2024, 5, 1), None),
            Err(HistoryItemError::EmptyId)
        );
        assert_eq!(
            HistoryItem::new("a1", "  ", date(2024, 5, 1), None),
            Err(HistoryItemError::EmptyLocation)
        );
    }

    #[test]
    fn test_new_item_trims_location_and_drops_blank_notes() {
        let item = HistoryItem::new("a1", "  Oslo ", date(2024, 5, 2), Some("   ".into())).unwrap();
        assert_eq!(item.location, "Oslo");
        assert_eq!(item.notes, None);
    }

    #[test]
    fn test_record_puts_newest_first() {
        let mut list = HistoryList::new();
        list.record(item("a"));
        list.record(item("b"));
        assert_eq!(ids(&list), ["b", "a"]);
    }

    #[test]
    fn test_record_duplicate_moves_to_front() {
        let mut list = HistoryList::new();
        list.record(item("a"));
        list.record(item("b"));
        list.record(item("c"));
        list.record(item("a"));
        assert_eq!(ids(&list), ["a", "c", "b"]);
    }

    #[test]
    fn test_record_evicts_oldest_past_capacity() {
        let mut list = HistoryList::new();
        for i in 0..=HISTORY_CAPACITY {
            list.record(item(&format!("id{i}")));
        }
        assert_eq!(list.len(), HISTORY_CAPACITY);
        assert_eq!(list.first().unwrap().id, "id10");
        assert!(list.get("id0").is_none());
    }

    #[test]
    fn test_from_items_keeps_first_occurrence() {
        let list = HistoryList::from_items(vec![item("a"), item("b"), item("a")]);
        assert_eq!(ids(&list), ["a", "b"]);
    }

    #[test]
    fn test_serialized_layout() {
        let mut list = HistoryList::new();
        list.record(HistoryItem::new("a1", "Paris", date(2024, 5, 1), None).unwrap());
        list.record(HistoryItem::new("b2", "Oslo", date(2024, 5, 2), Some("cold".into())).unwrap());

        let value: serde_json::Value = serde_json::from_str(&list.to_json().unwrap()).unwrap();
        assert_eq!(
            value,
            serde_json::json!([
                { "id": "b2", "location": "Oslo", "date": "2024-05-02", "notes": "cold" },
                { "id": "a1", "location": "Paris", "date": "2024-05-01" }
            ])
        );
    }

    #[test]
    fn test_from_json_skips_malformed_entries() {
        let json = r#"[
            { "id": "a1", "location": "Paris", "date": "2024-05-01", "notes": "" },
            { "id": "b2", "location": "Oslo", "date": "not-a-date" },
            { "id": "", "location": "Rome", "date": "2024-05-03" },
            { "location": "Bern", "date": "2024-05-04" },
            42,
            { "id": "c3", "location": "Lima", "date": "2024-05-05" }
        ]"#;
        let list = HistoryList::from_json(json).unwrap();
        assert_eq!(ids(&list), ["a1", "c3"]);
    }

    #[test]
    fn test_from_json_enforces_invariants() {
        let entries: Vec<String> = (0..15)
            .map(|i| format!(r#"{{"id":"x{}","location":"L","date":"2024-01-01"}}"#, i % 12))
            .collect();
        let list = HistoryList::from_json(&format!("[{}]", entries.join(","))).unwrap();
        assert_eq!(list.len(), HISTORY_CAPACITY);
        assert_eq!(list.first().unwrap().id, "x0");
    }

    #[test]
    fn test_from_json_rejects_non_array() {
        assert!(HistoryList::from_json(r#"{"id":"a1"}"#).is_err());
        assert!(HistoryList::from_json("not json").is_err());
    }

    #[test]
    fn test_cursor_older_from_empty() {
        let mut cursor = HistoryCursor::new();
        assert_eq!(cursor.older(&HistoryList::new()), None);
    }

    #[test]
    fn test_cursor_older_walks_to_oldest() {
        let list = HistoryList::from_items(vec![item("c"), item("b"), item("a")]);
        let mut cursor = HistoryCursor::new();

        assert_eq!(cursor.older(&list).map(|i| i.id.as_str()), Some("c"));
        assert_eq!(cursor.older(&list).map(|i| i.id.as_str()), Some("b"));
        assert_eq!(cursor.older(&list).map(|i| i.id.as_str()), Some("a"));
        assert_eq!(cursor.older(&list), None);
    }

    #[test]
    fn test_cursor_newer_leaves_navigation() {
        let list = HistoryList::from_items(vec![item("b"), item("a")]);
        let mut cursor = HistoryCursor::new();
        cursor.older(&list);
        cursor.older(&list);

        assert_eq!(cursor.newer(&list).map(|i| i.id.as_str()), Some("b"));
        assert_eq!(cursor.newer(&list), None);
        assert!(!cursor.is_navigating());
    }

    #[test]
    fn test_cursor_recovers_when_list_shrinks() {
        let long = HistoryList::from_items(vec![item("c"), item("b"), item("a")]);
        let short = HistoryList::from_items(vec![item("z")]);
        let mut cursor = HistoryCursor::new();
        cursor.older(&long);
        cursor.older(&long);
        cursor.older(&long);

        assert_eq!(cursor.older(&short).map(|i| i.id.as_str()), Some("z"));
    }

    #[test]
    fn test_cursor_stale_index_restarts_from_newest() {
        let long = HistoryList::from_items(vec![item("c"), item("b"), item("a")]);
        let short = HistoryList::from_items(vec![item("y"), item("x")]);
        let mut cursor = HistoryCursor::new();
        cursor.older(&long);
        cursor.older(&long);
        cursor.older(&long);

        assert_eq!(cursor.older(&short).map(|i| i.id.as_str()), Some("y"));
        assert_eq!(cursor.older(&short).map(|i| i.id.as_str()), Some("x"));
    }

    #[test]
    fn test_cursor_stale_index_newer_leaves_navigation() {
        let long = HistoryList::from_items(vec![item("c"), item("b"), item("a")]);
        let short = HistoryList::from_items(vec![item("y"), item("x")]);
        let mut cursor = HistoryCursor::new();
        cursor.older(&long);
        cursor.older(&long);
        cursor.older(&long);

        assert_eq!(cursor.newer(&short), None);
        assert!(!cursor.is_navigating());
    }

    #[test]
    fn test_cursor_reset() {
        let list = HistoryList::from_items(vec![item("a")]);
        let mut cursor = HistoryCursor::new();
        cursor.older(&list);
        cursor.reset();

        assert_eq!(cursor.older(&list).map(|i| i.id.as_str()), Some("a"));
    }
}
