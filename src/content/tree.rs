//! Schema-less walker over a page's `content` object.
//!
//! One parse produces a [`ContentTree`]; rendering, editing and writing the
//! JSON back all work on that tree instead of re-walking the raw value.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::content::page::ENABLED_KEY;
use crate::util::text::humanize_key;

pub const ROOT_PATH: &str = "content";

/// Strings longer than this are edited in a multi-line control.
const MULTILINE_THRESHOLD: usize = 100;
const MULTILINE_HINTS: &[&str] = &["text", "paragraph", "description"];
const MEDIA_HINTS: &[&str] = &["image", "url"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ListColumn {
    pub name: &'static str,
    pub label: &'static str,
}

/// An array field edited as rows of fixed-shape records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ListSpec {
    pub path: &'static str,
    pub title: &'static str,
    pub add_label: &'static str,
    pub columns: &'static [ListColumn],
}

pub static LIST_FIELDS: &[ListSpec] = &[
    ListSpec {
        path: "content.stats.items",
        title: "Stats Items",
        add_label: "Add Stat Item",
        columns: &[ListColumn { name: "value", label: "Value" }, ListColumn { name: "label", label: "Label" }],
    },
    ListSpec {
        path: "content.about.features",
        title: "About Features",
        add_label: "Add Feature",
        columns: &[ListColumn { name: "text", label: "Feature Text" }],
    },
];

pub fn list_spec(path: &str) -> Option<&'static ListSpec> {
    LIST_FIELDS.iter().find(|spec| spec.path == path)
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    #[error("No field at path {0}")]
    UnknownPath(String),
    #[error("{0} is not a text field")]
    NotAScalar(String),
    #[error("{0} is not a section")]
    NotASection(String),
    #[error("{0} is not a list field")]
    NotAList(String),
    #[error("{0} does not take a media URL")]
    NotAMediaField(String),
    #[error("Index {index} out of range for {path} ({len} items)")]
    IndexOutOfRange { path: String, index: usize, len: usize },
    #[error("{path} has no column {column}")]
    UnknownColumn { path: String, column: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScalarField {
    pub key: String,
    pub path: String,
    pub value: String,
    pub multiline: bool,
    pub media: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub key: String,
    pub path: String,
    pub enabled: bool,
    pub children: Vec<ContentNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordList {
    pub key: String,
    pub spec: &'static ListSpec,
    pub items: Vec<Map<String, Value>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ContentNode {
    Scalar(ScalarField),
    Section(Section),
    List(RecordList),
    /// Values the editor does not render (numbers, booleans, arrays...).
    Opaque { key: String, value: Value },
}

impl ContentNode {
    pub fn key(&self) -> &str {
        match self {
            ContentNode::Scalar(field) => &field.key,
            ContentNode::Section(section) => &section.key,
            ContentNode::List(list) => &list.key,
            ContentNode::Opaque { key, .. } => key,
        }
    }

    fn to_value(&self) -> Value {
        match self {
            ContentNode::Scalar(field) => Value::String(field.value.clone()),
            ContentNode::Section(section) => {
                let mut map = children_to_map(&section.children);
                map.insert(ENABLED_KEY.to_string(), Value::Bool(section.enabled));
                Value::Object(map)
            }
            ContentNode::List(list) => Value::Array(list.items.iter().cloned().map(Value::Object).collect()),
            ContentNode::Opaque { value, .. } => value.clone(),
        }
    }
}

fn children_to_map(children: &[ContentNode]) -> Map<String, Value> {
    children.iter().map(|node| (node.key().to_string(), node.to_value())).collect()
}

fn join(prefix: &str, key: &str) -> String {
    format!("{}.{}", prefix, key)
}

fn contains_any(key: &str, hints: &[&str]) -> bool {
    hints.iter().any(|hint| key.contains(hint))
}

fn parse_entries(map: &Map<String, Value>, prefix: &str) -> Vec<ContentNode> {
    map.iter()
        .filter(|(key, _)| prefix == ROOT_PATH || key.as_str() != ENABLED_KEY)
        .map(|(key, value)| parse_node(key, value, prefix))
        .collect()
}

fn parse_node(key: &str, value: &Value, prefix: &str) -> ContentNode {
    let path = join(prefix, key);
    // A registered list with any non-record entry stays opaque so it is written back untouched.
    if let (Value::Array(items), Some(spec)) = (value, list_spec(&path)) {
        let records: Option<Vec<_>> = items.iter().map(|item| item.as_object().cloned()).collect();
        if let Some(items) = records {
            return ContentNode::List(RecordList { key: key.to_string(), spec, items });
        }
    }

    match value {
        Value::Object(map) => ContentNode::Section(Section {
            key: key.to_string(),
            enabled: map.get(ENABLED_KEY).and_then(Value::as_bool).unwrap_or(true),
            children: parse_entries(map, &path),
            path,
        }),
        Value::String(text) => ContentNode::Scalar(ScalarField {
            key: key.to_string(),
            multiline: text.chars().count() > MULTILINE_THRESHOLD || contains_any(key, MULTILINE_HINTS),
            media: contains_any(key, MEDIA_HINTS),
            value: text.clone(),
            path,
        }),
        other => ContentNode::Opaque { key: key.to_string(), value: other.clone() },
    }
}

/// Editor-facing rendition of a [`ContentNode`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RenderedNode {
    Section {
        path: String,
        label: String,
        toggle_path: String,
        state_label: &'static str,
        enabled: bool,
        children: Vec<RenderedNode>,
    },
    Field {
        path: String,
        label: String,
        value: String,
        multiline: bool,
        media: bool,
    },
    List {
        path: String,
        title: &'static str,
        add_label: &'static str,
        columns: &'static [ListColumn],
        rows: Vec<Vec<String>>,
    },
}

fn cell(record: &Map<String, Value>, column: &str) -> String {
    match record.get(column) {
        Some(Value::String(text)) => text.clone(),
        None | Some(Value::Null) => String::new(),
        Some(other) => other.to_string(),
    }
}

fn render_nodes(nodes: &[ContentNode]) -> Vec<RenderedNode> {
    nodes
        .iter()
        .filter_map(|node| match node {
            ContentNode::Section(section) => Some(RenderedNode::Section {
                path: section.path.clone(),
                label: format!("{} Section", humanize_key(&section.key)),
                toggle_path: join(&section.path, ENABLED_KEY),
                state_label: if section.enabled { "Enabled" } else { "Disabled" },
                enabled: section.enabled,
                children: if section.enabled { render_nodes(&section.children) } else { Vec::new() },
            }),
            ContentNode::Scalar(field) => Some(RenderedNode::Field {
                path: field.path.clone(),
                label: humanize_key(&field.key),
                value: field.value.clone(),
                multiline: field.multiline,
                media: field.media,
            }),
            ContentNode::List(list) => Some(RenderedNode::List {
                path: list.spec.path.to_string(),
                title: list.spec.title,
                add_label: list.spec.add_label,
                columns: list.spec.columns,
                rows: list
                    .items
                    .iter()
                    .map(|record| list.spec.columns.iter().map(|c| cell(record, c.name)).collect())
                    .collect(),
            }),
            ContentNode::Opaque { .. } => None,
        })
        .collect()
}

fn find_mut<'a>(nodes: &'a mut [ContentNode], path: &str) -> Option<&'a mut ContentNode> {
    for node in nodes.iter_mut() {
        let node_path = match node {
            ContentNode::Scalar(field) => field.path.as_str(),
            ContentNode::Section(section) => section.path.as_str(),
            ContentNode::List(list) => list.spec.path,
            ContentNode::Opaque { .. } => continue,
        };
        if node_path == path {
            return Some(node);
        }
        let descends = path.strip_prefix(node_path).is_some_and(|rest| rest.starts_with('.'));
        if descends {
            if let ContentNode::Section(section) = node {
                return find_mut(&mut section.children, path);
            }
        }
    }
    None
}

/// Parsed `content` object of a page.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ContentTree {
    pub nodes: Vec<ContentNode>,
}

impl ContentTree {
    pub fn parse(content: &Map<String, Value>) -> Self {
        ContentTree { nodes: parse_entries(content, ROOT_PATH) }
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.to_map())
    }

    pub fn to_map(&self) -> Map<String, Value> {
        children_to_map(&self.nodes)
    }

    pub fn render(&self) -> Vec<RenderedNode> {
        render_nodes(&self.nodes)
    }

    fn node_mut(&mut self, path: &str) -> Result<&mut ContentNode, TreeError> {
        find_mut(&mut self.nodes, path).ok_or_else(|| TreeError::UnknownPath(path.to_string()))
    }

    pub fn set_scalar(&mut self, path: &str, value: impl Into<String>) -> Result<(), TreeError> {
        match self.node_mut(path)? {
            ContentNode::Scalar(field) => {
                field.value = value.into();
                Ok(())
            }
            _ => Err(TreeError::NotAScalar(path.to_string())),
        }
    }

    /// Like [`ContentTree::set_scalar`], restricted to image and URL fields.
    pub fn set_media(&mut self, path: &str, url: impl Into<String>) -> Result<(), TreeError> {
        match self.node_mut(path)? {
            ContentNode::Scalar(field) if field.media => {
                field.value = url.into();
                Ok(())
            }
            ContentNode::Scalar(_) => Err(TreeError::NotAMediaField(path.to_string())),
            _ => Err(TreeError::NotAScalar(path.to_string())),
        }
    }

    pub fn set_enabled(&mut self, path: &str, enabled: bool) -> Result<(), TreeError> {
        // Accept both `content.hero` and `content.hero.enabled`.
        let section_path = path.strip_suffix(".enabled").unwrap_or(path);
        match self.node_mut(section_path)? {
            ContentNode::Section(section) => {
                section.enabled = enabled;
                Ok(())
            }
            _ => Err(TreeError::NotASection(section_path.to_string())),
        }
    }

    pub fn list_mut(&mut self, path: &str) -> Result<&mut RecordList, TreeError> {
        match self.node_mut(path)? {
            ContentNode::List(list) => Ok(list),
            _ => Err(TreeError::NotAList(path.to_string())),
        }
    }
}

impl RecordList {
    /// Appends a record with an empty string for every column.
    pub fn append(&mut self) -> usize {
        let record = self.spec.columns.iter().map(|c| (c.name.to_string(), Value::String(String::new()))).collect();
        self.items.push(record);
        self.items.len() - 1
    }

    pub fn remove(&mut self, index: usize) -> Result<Map<String, Value>, TreeError> {
        self.check_index(index)?;
        Ok(self.items.remove(index))
    }

    pub fn edit(&mut self, index: usize, column: &str, value: impl Into<String>) -> Result<(), TreeError> {
        self.check_index(index)?;
        if !self.spec.columns.iter().any(|c| c.name == column) {
            return Err(TreeError::UnknownColumn { path: self.spec.path.to_string(), column: column.to_string() });
        }
        self.items[index].insert(column.to_string(), Value::String(value.into()));
        Ok(())
    }

    fn check_index(&self, index: usize) -> Result<(), TreeError> {
        if index >= self.items.len() {
            return Err(TreeError::IndexOutOfRange { path: self.spec.path.to_string(), index, len: self.items.len() });
        }
        Ok(())
    }
}
