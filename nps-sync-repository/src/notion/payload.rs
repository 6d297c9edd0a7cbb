//! Notion request bodies.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::NotionSchema;
use crate::types::ExternalPage;

/// Body of `POST /v1/pages`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreatePageRequest {
    pub parent: DatabaseParent,
    pub properties: BTreeMap<String, PropertyValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatabaseParent {
    pub database_id: String,
}

/// A database property value, serialized in Notion's shape
/// (`{"title": [...]}`, `{"number": 9}`, ...).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyValue {
    Title(Vec<RichText>),
    RichText(Vec<RichText>),
    Number(i64),
    Date(DateValue),
    Select(SelectOption),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RichText {
    pub text: TextContent,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextContent {
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DateValue {
    pub start: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectOption {
    pub name: String,
}

impl PropertyValue {
    pub fn title(content: impl Into<String>) -> Self {
        Self::Title(vec![RichText::plain(content)])
    }

    pub fn rich_text(content: impl Into<String>) -> Self {
        Self::RichText(vec![RichText::plain(content)])
    }

    pub fn date(start: impl Into<String>) -> Self {
        Self::Date(DateValue {
            start: start.into(),
        })
    }

    pub fn select(name: impl Into<String>) -> Self {
        Self::Select(SelectOption { name: name.into() })
    }
}

impl RichText {
    pub fn plain(content: impl Into<String>) -> Self {
        Self {
            text: TextContent {
                content: content.into(),
            },
        }
    }
}

impl CreatePageRequest {
    /// Map an external page onto the columns of `schema`.
    pub fn from_page(page: &ExternalPage, schema: &NotionSchema) -> Self {
        let props = &page.properties;
        let mut properties = BTreeMap::new();

        properties.insert(schema.title.clone(), PropertyValue::title(&props.title));
        properties.insert(schema.score.clone(), PropertyValue::Number(props.score));
        properties.insert(
            schema.comment.clone(),
            PropertyValue::rich_text(&props.comment),
        );
        properties.insert(schema.date.clone(), PropertyValue::date(&props.date));
        properties.insert(schema.owner.clone(), PropertyValue::rich_text(&props.owner));

        if let Some(ref destination) = props.destination {
            properties.insert(
                schema.destination.clone(),
                PropertyValue::select(destination),
            );
        }

        Self {
            parent: DatabaseParent {
                database_id: page.parent_id.clone(),
            },
            properties,
        }
    }
}
