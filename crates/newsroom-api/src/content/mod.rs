//! Content document model
//!
//! The whole site's news, videos and trending lists live in one JSON
//! document. Stored items are kept as plain JSON values: whatever is in the
//! store is served and written back untouched apart from the item a request
//! changes.

pub mod ids;
pub mod repository;
pub mod seed;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

pub use repository::ContentRepository;

/// A JSON object: a freshly built item or an update body
pub type Record = Map<String, Value>;

/// Field holding an item's identifier on the wire
pub const ID_FIELD: &str = "_id";

/// The single content document
///
/// A collection that is missing or `null` reads as empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentDocument {
    #[serde(default, deserialize_with = "array_or_null")]
    pub news: Vec<Value>,

    #[serde(default, deserialize_with = "array_or_null")]
    pub videos: Vec<Value>,

    #[serde(default, deserialize_with = "array_or_null")]
    pub trending: Vec<Value>,

    /// Top-level keys written by something else are kept as-is
    #[serde(flatten)]
    pub extra: Record,
}

fn array_or_null<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Value>, D::Error> {
    Ok(Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: Value,
    pub category: Value,
    pub time: Value,
    pub excerpt: Value,
    pub href: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoItem {
    #[serde(rename = "_id")]
    pub id: String,
    pub youtube_id: Value,
    pub title: Value,
    pub channel: Value,
    pub description: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendingItem {
    #[serde(rename = "_id")]
    pub id: String,
    /// Rank; defaults to the position after the current last item
    pub number: Value,
    pub title: Value,
    pub description: Value,
    pub href: Value,
}

impl NewsItem {
    pub fn from_body(id: String, body: &Value) -> Self {
        Self {
            id,
            title: field_or_empty(body, "title"),
            category: field_or_empty(body, "category"),
            time: field_or_empty(body, "time"),
            excerpt: field_or_empty(body, "excerpt"),
            href: field_or_empty(body, "href"),
        }
    }
}

impl VideoItem {
    pub fn from_body(id: String, body: &Value) -> Self {
        Self {
            id,
            youtube_id: field_or_empty(body, "youtubeId"),
            title: field_or_empty(body, "title"),
            channel: field_or_empty(body, "channel"),
            description: field_or_empty(body, "description"),
        }
    }
}

impl TrendingItem {
    pub fn from_body(id: String, body: &Value, existing: usize) -> Self {
        let number = body
            .get("number")
            .filter(|v| is_truthy(v))
            .cloned()
            .unwrap_or_else(|| Value::from(existing as u64 + 1));

        Self {
            id,
            number,
            title: field_or_empty(body, "title"),
            description: field_or_empty(body, "description"),
            href: field_or_empty(body, "href"),
        }
    }
}

/// The three collections held in the content document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    News,
    Videos,
    Trending,
}

impl Collection {
    /// Map a resource path segment to a collection
    pub fn from_resource(resource: &str) -> Option<Self> {
        match resource {
            "news" => Some(Collection::News),
            "videos" => Some(Collection::Videos),
            "trending" => Some(Collection::Trending),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Collection::News => "news",
            Collection::Videos => "videos",
            Collection::Trending => "trending",
        }
    }

    /// Prefix of generated identifiers
    pub fn id_prefix(self) -> &'static str {
        match self {
            Collection::News => "news",
            Collection::Videos => "video",
            Collection::Trending => "trending",
        }
    }

    pub fn items(self, document: &ContentDocument) -> &Vec<Value> {
        match self {
            Collection::News => &document.news,
            Collection::Videos => &document.videos,
            Collection::Trending => &document.trending,
        }
    }

    pub fn items_mut(self, document: &mut ContentDocument) -> &mut Vec<Value> {
        match self {
            Collection::News => &mut document.news,
            Collection::Videos => &mut document.videos,
            Collection::Trending => &mut document.trending,
        }
    }

    /// Build a new item from a request body. Missing or falsy fields become
    /// empty strings.
    pub fn build_item(self, id: String, body: &Value, existing: usize) -> Result<Record, serde_json::Error> {
        match self {
            Collection::News => to_record(&NewsItem::from_body(id, body)),
            Collection::Videos => to_record(&VideoItem::from_body(id, body)),
            Collection::Trending => to_record(&TrendingItem::from_body(id, body, existing)),
        }
    }

    /// Add a freshly created item. News is newest-first, the others append.
    pub fn insert(self, items: &mut Vec<Value>, item: Record) {
        let item = Value::Object(item);
        match self {
            Collection::News => items.insert(0, item),
            Collection::Videos | Collection::Trending => items.push(item),
        }
    }
}

/// Position of the item whose `_id` equals `id`. Items that are not objects
/// never match.
pub fn position_of(items: &[Value], id: &str) -> Option<usize> {
    items
        .iter()
        .position(|item| item.get(ID_FIELD).and_then(Value::as_str) == Some(id))
}

/// Overlay every field of `updates` onto `item`.
pub fn merge_into(item: &mut Value, updates: Record) {
    if let Value::Object(fields) = item {
        for (key, value) in updates {
            fields.insert(key, value);
        }
    }
}

pub fn to_record<T: Serialize>(item: &T) -> Result<Record, serde_json::Error> {
    match serde_json::to_value(item)? {
        Value::Object(map) => Ok(map),
        _ => Err(serde::ser::Error::custom("item did not serialize to an object")),
    }
}

/// JavaScript-style truthiness: `null`, `false`, `0` and `""` are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn field_or_empty(body: &Value, field: &str) -> Value {
    body.get(field)
        .filter(|v| is_truthy(v))
        .cloned()
        .unwrap_or_else(|| Value::String(String::new()))
}
