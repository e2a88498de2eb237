use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which side of a vocabulary pair a query targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Bangla,
    Korean,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Bangla => "bangla",
            Field::Korean => "korean",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "bangla" | "bn" => Ok(Field::Bangla),
            "korean" | "ko" => Ok(Field::Korean),
            other => Err(format!("unknown field: {other}")),
        }
    }
}

/// One Bangla/Korean word pair as served by the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VocabularyEntry {
    /// Server-assigned id, absent for ad-hoc entries
    #[serde(rename = "$id", alias = "id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub bangla: String,
    pub korean: String,
    /// Lower ranks first in suggestions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<f64>,
}

impl VocabularyEntry {
    pub fn new(bangla: impl Into<String>, korean: impl Into<String>) -> Self {
        Self {
            id: None,
            bangla: bangla.into(),
            korean: korean.into(),
            frequency: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_frequency(mut self, frequency: f64) -> Self {
        self.frequency = Some(frequency);
        self
    }

    /// Stable identity, synthesized as `bangla-korean` when the server gave none
    pub fn identity(&self) -> String {
        match &self.id {
            Some(id) => id.clone(),
            None => format!("{}-{}", self.bangla, self.korean),
        }
    }

    /// Key used to drop the same record arriving twice from the catalog
    pub fn dedup_key(&self) -> DedupKey {
        match &self.id {
            Some(id) => DedupKey::Id(id.clone()),
            None => DedupKey::Pair(self.bangla.clone(), self.korean.clone()),
        }
    }

    /// Key used by favorites: the word pair, regardless of server id
    pub fn pair_key(&self) -> PairKey {
        PairKey {
            bangla: self.bangla.clone(),
            korean: self.korean.clone(),
        }
    }

    pub fn field(&self, field: Field) -> &str {
        match field {
            Field::Bangla => &self.bangla,
            Field::Korean => &self.korean,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DedupKey {
    Id(String),
    Pair(String, String),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PairKey {
    pub bangla: String,
    pub korean: String,
}

/// Opaque position in the remote collection: the identity of the last entry of a page
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cursor(pub String);

impl Cursor {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogPage {
    pub entries: Vec<VocabularyEntry>,
    pub cursor: Option<Cursor>,
    pub has_more: bool,
}

impl CatalogPage {
    /// Build a page, deriving the cursor from the last entry
    pub fn from_entries(entries: Vec<VocabularyEntry>, page_size: usize) -> Self {
        let cursor = entries.last().map(|e| Cursor(e.identity()));
        let has_more = !entries.is_empty() && entries.len() >= page_size;
        Self {
            entries,
            cursor,
            has_more,
        }
    }
}

/// A favorited word pair with the moment it was favorited (epoch millis)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteEntry {
    #[serde(flatten)]
    pub entry: VocabularyEntry,
    pub timestamp: i64,
}

impl FavoriteEntry {
    pub fn key(&self) -> PairKey {
        self.entry.pair_key()
    }
}

#[derive(Debug, Clone)]
pub enum AppEvent {
    // Input side
    LoadMore,
    Refresh,
    ListCatalog,
    LocalSearch(String),
    ClearSearch,
    SuggestInput { field: Field, text: String },
    PickSuggestion(usize),
    Lookup { field: Field, text: String },
    ToggleFavorite(usize),
    RemoveFavorite(usize),
    ShowFavorites,
    ConnectivityChanged(bool),
    Help,
    Quit,

    // Output side
    ShowEntries { title: String, entries: Vec<DisplayResult> },
    ShowSuggestions(Vec<String>),
    ShowFavoriteGroups(Vec<DisplayGroup>),
    Status(String),
    Error(String),
}

#[derive(Debug, Clone)]
pub struct DisplayResult {
    pub bangla: String,
    pub korean: String,
    pub favorite: bool,
    /// Time of day the entry was favorited, favorites view only
    pub time: Option<String>,
}

#[derive(Debug, Clone)]
pub struct DisplayGroup {
    pub label: String,
    pub count: usize,
    pub items: Vec<DisplayResult>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_falls_back_to_pair() {
        let entry = VocabularyEntry::new("আমি", "나");
        assert_eq!(entry.identity(), "আমি-나");
        assert_eq!(
            entry.dedup_key(),
            DedupKey::Pair("আমি".to_string(), "나".to_string())
        );

        let entry = entry.with_id("doc1");
        assert_eq!(entry.identity(), "doc1");
        assert_eq!(entry.dedup_key(), DedupKey::Id("doc1".to_string()));
    }

    #[test]
    fn deserializes_server_document() {
        let json = r#"{"$id":"abc","bangla":"পানি","korean":"물","frequency":3,"$collectionId":"x"}"#;
        let entry: VocabularyEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.id.as_deref(), Some("abc"));
        assert_eq!(entry.frequency, Some(3.0));
    }

    #[test]
    fn favorite_flattens_entry() {
        let fav = FavoriteEntry {
            entry: VocabularyEntry::new("পানি", "물"),
            timestamp: 42,
        };
        let json = serde_json::to_value(&fav).unwrap();
        assert_eq!(json["bangla"], "পানি");
        assert_eq!(json["timestamp"], 42);
        assert!(json.get("$id").is_none());
    }

    #[test]
    fn page_cursor_is_last_identity() {
        let page = CatalogPage::from_entries(
            vec![
                VocabularyEntry::new("a", "b").with_id("1"),
                VocabularyEntry::new("c", "d"),
            ],
            2,
        );
        assert_eq!(page.cursor, Some(Cursor("c-d".to_string())));
        assert!(page.has_more);

        let empty = CatalogPage::from_entries(vec![], 20);
        assert!(!empty.has_more);
        assert!(empty.cursor.is_none());
    }

    #[test]
    fn field_parses_aliases() {
        assert_eq!("Bangla".parse::<Field>(), Ok(Field::Bangla));
        assert_eq!("ko".parse::<Field>(), Ok(Field::Korean));
        assert!("english".parse::<Field>().is_err());
    }
}
