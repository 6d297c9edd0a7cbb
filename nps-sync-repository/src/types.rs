//! Record and page types shared by the store, the sink and the sync service.
//!
//! Records are decoded from [`StoredDocument`]s leniently: a field that is
//! missing or holds an unexpected type decodes as absent, never as an error.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

/// Stored field names of a survey document.
pub mod survey_fields {
    pub const HOME_REF: &str = "hid";
    pub const USER_REF: &str = "uid";
    pub const ROUND: &str = "round";
    pub const SCORE: &str = "nps";
    pub const COMMENT: &str = "comment";
    pub const SUBMITTED_AT: &str = "date";
}

/// Stored field names of a home document.
pub mod home_fields {
    pub const HOME_REF: &str = "hid";
    pub const NAME: &str = "name";
    pub const LOCATION: &str = "location";
}

/// Stored field names of a user document.
pub mod user_fields {
    pub const USER_REF: &str = "uid";
    pub const NAME: &str = "name";
}

/// A document as returned by a [`crate::DocumentStore`]: its id within the
/// collection and its fields as plain JSON.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StoredDocument {
    pub id: String,
    pub fields: Map<String, Value>,
}

impl StoredDocument {
    pub fn new(id: impl Into<String>, fields: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    /// Build a document from a JSON value. Anything but an object yields a
    /// document with no fields.
    pub fn from_json(id: impl Into<String>, value: Value) -> Self {
        let fields = match value {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self::new(id, fields)
    }

    /// Read a field as text. Numbers and booleans are rendered; null, arrays
    /// and maps are treated as absent.
    pub fn text(&self, key: &str) -> Option<String> {
        match self.fields.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Read a field as an integer. Whole floats are accepted, other floats
    /// are rounded.
    pub fn integer(&self, key: &str) -> Option<i64> {
        let number = self.fields.get(key)?.as_number()?;
        number
            .as_i64()
            .or_else(|| number.as_f64().map(|f| f.round() as i64))
    }

    /// Read a field as an RFC 3339 timestamp.
    pub fn timestamp(&self, key: &str) -> Option<DateTime<Utc>> {
        let raw = self.fields.get(key)?.as_str()?;
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|t| t.with_timezone(&Utc))
    }
}

/// A reference to another document, kept as the stored scalar so that
/// lookups compare with the same type (`42` and `"42"` are different keys).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RecordRef(Value);

impl RecordRef {
    /// Keep strings, numbers and booleans; anything else is an absent reference.
    pub fn from_value(value: Option<&Value>) -> Self {
        match value {
            Some(v @ (Value::String(_) | Value::Number(_) | Value::Bool(_))) => Self(v.clone()),
            _ => Self(Value::Null),
        }
    }

    /// The stored value, `Value::Null` when absent.
    pub fn value(&self) -> &Value {
        &self.0
    }

    /// Absent or the empty string.
    pub fn is_empty(&self) -> bool {
        match &self.0 {
            Value::Null => true,
            Value::String(s) => s.is_empty(),
            _ => false,
        }
    }
}

impl fmt::Display for RecordRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Value::Null => Ok(()),
            Value::String(s) => f.write_str(s),
            other => write!(f, "{}", other),
        }
    }
}

impl From<&str> for RecordRef {
    fn from(value: &str) -> Self {
        Self(Value::String(value.to_string()))
    }
}

impl From<i64> for RecordRef {
    fn from(value: i64) -> Self {
        Self(Value::from(value))
    }
}

/// A customer satisfaction survey answer.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SurveyRecord {
    pub survey_id: String,
    pub home_ref: RecordRef,
    pub user_ref: RecordRef,
    pub round_tag: String,
    pub score: Option<i64>,
    pub comment: Option<String>,
    pub submitted_at: Option<DateTime<Utc>>,
}

impl SurveyRecord {
    pub fn from_document(doc: &StoredDocument) -> Self {
        use survey_fields::*;

        Self {
            survey_id: doc.id.clone(),
            home_ref: RecordRef::from_value(doc.fields.get(HOME_REF)),
            user_ref: RecordRef::from_value(doc.fields.get(USER_REF)),
            round_tag: doc.text(ROUND).unwrap_or_default(),
            score: doc.integer(SCORE),
            comment: doc.text(COMMENT),
            submitted_at: doc.timestamp(SUBMITTED_AT),
        }
    }
}

/// A rental home, looked up by its reference.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HomeRecord {
    pub home_ref: String,
    pub display_name: String,
    pub location: Option<String>,
}

impl HomeRecord {
    pub fn from_document(doc: &StoredDocument) -> Self {
        use home_fields::*;

        Self {
            home_ref: doc.text(HOME_REF).unwrap_or_default(),
            display_name: doc.text(NAME).unwrap_or_default(),
            location: doc.text(LOCATION),
        }
    }
}

/// A home owner, looked up by its reference.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UserRecord {
    pub user_ref: String,
    pub display_name: String,
}

impl UserRecord {
    pub fn from_document(doc: &StoredDocument) -> Self {
        use user_fields::*;

        Self {
            user_ref: doc.text(USER_REF).unwrap_or_default(),
            display_name: doc.text(NAME).unwrap_or_default(),
        }
    }
}

/// Property bag of one external page.
///
/// The external column names are not part of this type; a sink maps each
/// field onto its own schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageProperties {
    pub title: String,
    pub score: i64,
    pub comment: String,
    /// `YYYY-MM-DD`, or a full RFC 3339 instant when the survey had no date.
    pub date: String,
    pub owner: String,
    /// Only present when the home has a non-empty location.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
}

/// Creation payload for one page in the external table service.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExternalPage {
    /// Identifier of the parent container (database) the page is created in.
    pub parent_id: String,
    pub properties: PageProperties,
}

/// A page created by a [`crate::PageSink`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreatedPage {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_survey_from_document() {
        let doc = StoredDocument::from_json(
            "survey-1",
            json!({
                "hid": "H1",
                "uid": "U1",
                "round": "home",
                "nps": 9,
                "comment": "Great stay",
                "date": "2024-03-15T10:00:00Z",
            }),
        );

        let record = SurveyRecord::from_document(&doc);

        assert_eq!(record.survey_id, "survey-1");
        assert_eq!(record.home_ref, RecordRef::from("H1"));
        assert_eq!(record.user_ref, RecordRef::from("U1"));
        assert_eq!(record.round_tag, "home");
        assert_eq!(record.score, Some(9));
        assert_eq!(record.comment.as_deref(), Some("Great stay"));
        assert_eq!(
            record.submitted_at,
            Some(Utc.with_ymd_and_hms(2024, 3, 15, 10, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_survey_missing_fields_decode_as_absent() {
        let doc = StoredDocument::from_json("survey-2", json!({ "round": "home" }));

        let record = SurveyRecord::from_document(&doc);

        assert!(record.home_ref.is_empty());
        assert!(record.user_ref.is_empty());
        assert_eq!(record.home_ref.to_string(), "");
        assert_eq!(record.score, None);
        assert_eq!(record.comment, None);
        assert_eq!(record.submitted_at, None);
    }

    #[test]
    fn test_survey_wrong_types_decode_as_absent() {
        let doc = StoredDocument::from_json(
            "survey-3",
            json!({ "nps": "nine", "date": "yesterday", "comment": null }),
        );

        let record = SurveyRecord::from_document(&doc);

        assert_eq!(record.score, None);
        assert_eq!(record.submitted_at, None);
        assert_eq!(record.comment, None);
    }

    #[test]
    fn test_numeric_refs_keep_their_type() {
        let doc = StoredDocument::from_json("survey-4", json!({ "hid": 42, "nps": 7.0 }));

        let record = SurveyRecord::from_document(&doc);

        assert_eq!(record.home_ref.value(), &json!(42));
        assert_eq!(record.home_ref, RecordRef::from(42));
        assert_eq!(record.home_ref.to_string(), "42");
        assert!(!record.home_ref.is_empty());
        assert_eq!(record.score, Some(7));
    }

    #[test]
    fn test_non_scalar_refs_are_absent() {
        let doc = StoredDocument::from_json(
            "survey-5",
            json!({ "hid": { "id": "H1" }, "uid": ["U1"] }),
        );

        let record = SurveyRecord::from_document(&doc);

        assert!(record.home_ref.is_empty());
        assert!(record.user_ref.is_empty());
    }

    #[test]
    fn test_timestamp_with_offset_is_converted_to_utc() {
        let doc = StoredDocument::from_json("s", json!({ "date": "2024-03-15T01:30:00+02:00" }));

        assert_eq!(
            doc.timestamp("date"),
            Some(Utc.with_ymd_and_hms(2024, 3, 14, 23, 30, 0).unwrap())
        );
    }

    #[test]
    fn test_home_and_user_from_document() {
        let home = HomeRecord::from_document(&StoredDocument::from_json(
            "doc-h",
            json!({ "hid": "H1", "name": "Villa Azul", "location": "Ibiza" }),
        ));
        assert_eq!(home.home_ref, "H1");
        assert_eq!(home.display_name, "Villa Azul");
        assert_eq!(home.location.as_deref(), Some("Ibiza"));

        let user = UserRecord::from_document(&StoredDocument::from_json(
            "doc-u",
            json!({ "uid": "U1", "name": "Jane Doe" }),
        ));
        assert_eq!(user.user_ref, "U1");
        assert_eq!(user.display_name, "Jane Doe");
    }

    #[test]
    fn test_non_object_json_yields_empty_document() {
        let doc = StoredDocument::from_json("x", json!([1, 2, 3]));
        assert!(doc.fields.is_empty());
    }
}
