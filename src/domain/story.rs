use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Field readers for `/item/{id}.json` objects.
///
/// The API is loose about types, so each field is read on its own and a
/// missing, null, or mistyped field reads as absent instead of rejecting
/// the whole item.
mod field {
    use serde_json::Value;

    pub fn id(value: &Value) -> Option<u64> {
        value.get("id").and_then(Value::as_u64)
    }

    pub fn string(value: &Value, key: &str) -> Option<String> {
        value.get(key).and_then(Value::as_str).map(String::from)
    }

    /// Integers, or finite floats truncated toward zero.
    pub fn int(value: &Value, key: &str) -> Option<i64> {
        let field = value.get(key)?;
        field.as_i64().or_else(|| {
            field
                .as_f64()
                .filter(|f| f.is_finite())
                .map(|f| f as i64)
        })
    }

    pub fn ids(value: &Value, key: &str) -> Vec<u64> {
        value
            .get(key)
            .and_then(Value::as_array)
            .map(|list| list.iter().filter_map(Value::as_u64).collect())
            .unwrap_or_default()
    }

    pub fn flag(value: &Value, key: &str) -> bool {
        value.get(key).and_then(Value::as_bool).unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Story {
    pub id: u64,
    pub title: String,
    pub by: Option<String>,
    /// Submission time in unix seconds.
    pub time: Option<i64>,
    pub score: Option<i64>,
    pub descendants: Option<i64>,
    pub url: Option<String>,
    pub kids: Vec<u64>,
    pub text: Option<String>,
    pub item_type: Option<String>,
}

impl Story {
    /// Validate a raw item. Anything that is not an object with an integer id
    /// and a string title is not a displayable story.
    pub fn from_json(value: Value) -> Option<Self> {
        let title = field::string(&value, "title")?;

        Some(Self {
            id: field::id(&value)?,
            title,
            by: field::string(&value, "by"),
            time: field::int(&value, "time"),
            score: field::int(&value, "score"),
            descendants: field::int(&value, "descendants"),
            url: field::string(&value, "url"),
            kids: field::ids(&value, "kids"),
            text: field::string(&value, "text"),
            item_type: field::string(&value, "type"),
        })
    }

    pub fn author(&self) -> &str {
        self.by.as_deref().unwrap_or("unknown")
    }

    pub fn comment_count(&self) -> i64 {
        self.descendants.unwrap_or(0)
    }

    /// Lowercased title/url substring match. An empty query matches everything.
    pub fn matches_search(&self, query: &str) -> bool {
        if query.is_empty() {
            return true;
        }
        let title = self.title.to_lowercase();
        let url = self.url.as_deref().unwrap_or("").to_lowercase();
        title.contains(query) || url.contains(query)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: u64,
    pub by: Option<String>,
    pub time: Option<i64>,
    /// HTML body as sent by the API.
    pub text: Option<String>,
    pub kids: Vec<u64>,
}

impl Comment {
    /// Comments never carry a title; deleted or dead ones have nothing to show.
    pub fn from_json(value: Value) -> Option<Self> {
        if !value.is_object() || value.get("title").is_some() {
            return None;
        }
        if field::flag(&value, "deleted") || field::flag(&value, "dead") {
            return None;
        }

        Some(Self {
            id: field::id(&value)?,
            by: field::string(&value, "by"),
            time: field::int(&value, "time"),
            text: field::string(&value, "text"),
            kids: field::ids(&value, "kids"),
        })
    }

    pub fn author(&self) -> &str {
        self.by.as_deref().unwrap_or("unknown")
    }
}
