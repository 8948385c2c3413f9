use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::content::editor::{EditOperation, PagePayload};
use crate::model::page::Page;

#[derive(Debug, Clone, Serialize)]
pub struct PageSummary {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub updated_at: Option<String>,
}

impl From<Page> for PageSummary {
    fn from(page: Page) -> Self {
        PageSummary { slug: page.slug, title: page.title, description: page.description, updated_at: page.updated_at }
    }
}

/// `content` arrives either as an object or, as the admin form posts it,
/// as a JSON-encoded string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ContentInput {
    Object(Map<String, Value>),
    Encoded(String),
}

impl ContentInput {
    pub fn into_map(self) -> Result<Map<String, Value>, String> {
        match self {
            ContentInput::Object(map) => Ok(map),
            ContentInput::Encoded(text) => match serde_json::from_str::<Value>(&text) {
                Ok(Value::Object(map)) => Ok(map),
                Ok(_) => Err("content must be a JSON object".to_string()),
                Err(e) => Err(format!("content is not valid JSON: {}", e)),
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SavePageRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub content: ContentInput,
}

impl SavePageRequest {
    pub fn into_payload(self) -> Result<PagePayload, String> {
        Ok(PagePayload { title: self.title, description: self.description, content: self.content.into_map()? })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EditPageRequest {
    pub operations: Vec<EditOperation>,
    /// Persist the result after applying the operations.
    #[serde(default)]
    pub save: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublicPage {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub content: Map<String, Value>,
}
