// src/app/types.rs
use serde::Deserialize;

// ---- catalog records ----

/// One video as served by `GET /api/videos`.
///
/// Every field is optional at the decoding boundary: a wrong-typed or missing
/// field becomes `None`/empty instead of failing the whole list. Rendering a
/// real thumbnail requires `id`, a non-empty `title` and `user`, and a finite
/// `duration` (see [`Video::is_renderable`]); everything else is optional.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Video {
    #[serde(default, deserialize_with = "lenient::integer")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub user: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub duration: Option<f64>,
    #[serde(default, deserialize_with = "lenient::dimension")]
    pub width: Option<u32>,
    #[serde(default, deserialize_with = "lenient::dimension")]
    pub height: Option<u32>,
    #[serde(default, deserialize_with = "lenient::meta")]
    pub meta: Option<VideoMeta>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct VideoMeta {
    #[serde(default, deserialize_with = "lenient::text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::text_list")]
    pub categories: Vec<String>,
    #[serde(default, deserialize_with = "lenient::text_list")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "lenient::comments")]
    pub comments: Vec<Comment>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Comment {
    #[serde(default, deserialize_with = "lenient::text_or_empty")]
    pub text: String,
    #[serde(default, deserialize_with = "lenient::text_or_empty")]
    pub author: String,
}

impl Video {
    /// Minimal record check used before attempting a real thumbnail.
    pub fn is_renderable(&self) -> bool {
        self.id.is_some()
            && self.title.as_deref().is_some_and(|t| !t.is_empty())
            && self.user.as_deref().is_some_and(|u| !u.is_empty())
            && self.duration.is_some_and(f64::is_finite)
    }

    pub fn display_title(&self) -> &str {
        self.title.as_deref().filter(|t| !t.is_empty()).unwrap_or("Untitled")
    }

    pub fn display_user(&self) -> &str {
        self.user.as_deref().filter(|u| !u.is_empty()).unwrap_or("unknown")
    }

    /// Non-finite or missing durations collapse to 0.
    pub fn safe_duration(&self) -> f64 {
        self.duration.filter(|d| d.is_finite()).unwrap_or(0.0)
    }

    pub fn categories(&self) -> &[String] {
        self.meta.as_ref().map_or(&[], |m| m.categories.as_slice())
    }

    pub fn first_category(&self) -> Option<&str> {
        self.categories().first().map(String::as_str)
    }

    pub fn description(&self) -> Option<&str> {
        self.meta
            .as_ref()
            .and_then(|m| m.description.as_deref())
            .filter(|d| !d.is_empty())
    }

    pub fn tags(&self) -> &[String] {
        self.meta.as_ref().map_or(&[], |m| m.tags.as_slice())
    }

    pub fn comments(&self) -> &[Comment] {
        self.meta.as_ref().map_or(&[], |m| m.comments.as_slice())
    }
}

// ---- load states ----
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

impl LoadStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

// ---- UI controls ----
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ThumbnailSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl ThumbnailSize {
    /// Card width in points; height follows 16:9.
    pub const fn width(self) -> f32 {
        match self {
            Self::Small => 168.0,
            Self::Medium => 280.0,
            Self::Large => 640.0,
        }
    }

    pub fn size(self) -> [f32; 2] {
        let w = self.width();
        [w, w * 9.0 / 16.0]
    }
}

mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    use super::{Comment, VideoMeta};

    fn value<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Value>, D::Error> {
        Option::<Value>::deserialize(d)
    }

    pub fn integer<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
        Ok(value(d)?.and_then(|v| match v {
            Value::Number(n) => n.as_i64().or_else(|| {
                n.as_f64()
                    .filter(|f| f.is_finite() && f.fract() == 0.0)
                    .map(|f| f as i64)
            }),
            _ => None,
        }))
    }

    pub fn number<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
        Ok(value(d)?.and_then(|v| v.as_f64()))
    }

    pub fn dimension<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u32>, D::Error> {
        Ok(value(d)?
            .and_then(|v| v.as_u64())
            .and_then(|n| u32::try_from(n).ok()))
    }

    pub fn text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(value(d)?.and_then(|v| match v {
            Value::String(s) => Some(s),
            _ => None,
        }))
    }

    pub fn text_or_empty<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        Ok(text(d)?.unwrap_or_default())
    }

    pub fn text_list<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
        Ok(match value(d)? {
            Some(Value::Array(items)) => items
                .into_iter()
                .filter_map(|v| match v {
                    Value::String(s) => Some(s),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        })
    }

    pub fn comments<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<Comment>, D::Error> {
        Ok(match value(d)? {
            Some(Value::Array(items)) => items
                .into_iter()
                .filter_map(|v| serde_json::from_value::<Comment>(v).ok())
                .collect(),
            _ => Vec::new(),
        })
    }

    pub fn meta<'de, D: Deserializer<'de>>(d: D) -> Result<Option<VideoMeta>, D::Error> {
        Ok(value(d)?.and_then(|v| serde_json::from_value::<VideoMeta>(v).ok()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_full_record() {
        let v: Video = serde_json::from_value(json!({
            "id": 3, "title": "Intro", "user": "ana", "duration": 75.5,
            "width": 640, "height": 360,
            "meta": {
                "description": "d",
                "categories": ["Music", "Live"],
                "tags": ["a"],
                "comments": [{"text": "nice", "author": "bob"}]
            }
        }))
        .unwrap();
        assert!(v.is_renderable());
        assert_eq!(v.first_category(), Some("Music"));
        assert_eq!(v.comments()[0].author, "bob");
        assert_eq!(v.width, Some(640));
    }

    #[test]
    fn wrong_types_degrade_instead_of_failing() {
        let v: Video = serde_json::from_value(json!({
            "id": "seven", "title": 12, "user": "u", "duration": null,
            "meta": {"categories": "music", "tags": [1, "x"], "comments": [{"text": 1}]}
        }))
        .unwrap();
        assert_eq!(v.id, None);
        assert_eq!(v.title, None);
        assert!(!v.is_renderable());
        assert!(v.categories().is_empty());
        assert_eq!(v.tags(), ["x".to_string()]);
        assert_eq!(v.comments().len(), 1);
        assert_eq!(v.safe_duration(), 0.0);
        assert_eq!(v.display_title(), "Untitled");
    }

    #[test]
    fn integral_float_ids_are_accepted() {
        let v: Video = serde_json::from_value(json!({"id": 4.0})).unwrap();
        assert_eq!(v.id, Some(4));
        let v: Video = serde_json::from_value(json!({"id": 4.5})).unwrap();
        assert_eq!(v.id, None);
    }

    #[test]
    fn empty_user_is_not_renderable() {
        let v = Video {
            id: Some(1),
            title: Some("t".into()),
            user: Some(String::new()),
            duration: Some(1.0),
            ..Video::default()
        };
        assert!(!v.is_renderable());
    }
}
