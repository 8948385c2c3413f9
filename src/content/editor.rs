use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info, instrument};

use crate::content::page::prepare_for_editing;
use crate::content::tree::{ContentTree, RenderedNode, TreeError};
use crate::model::page::Page;
use crate::repository::page_repo::PageRepository;
use crate::repository::repository_error::RepositoryError;

#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error("Page not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Tree(#[from] TreeError),
    #[error(transparent)]
    Store(#[from] RepositoryError),
}

/// One editing action, as posted by the admin panel.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum EditOperation {
    SetTitle { value: String },
    SetDescription { value: String },
    SetField { path: String, value: String },
    SetEnabled { path: String, enabled: bool },
    SelectMedia { path: String, url: String },
    AppendItem { path: String },
    RemoveItem { path: String, index: usize },
    EditItem { path: String, index: usize, column: String, value: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeoView {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EditorView {
    pub slug: String,
    pub seo: SeoView,
    pub sections: Vec<RenderedNode>,
}

/// Body written back to the content store: the whole page, never a patch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PagePayload {
    pub title: String,
    pub description: String,
    pub content: Map<String, Value>,
}

/// Edit session over one page.
#[derive(Debug, Clone)]
pub struct PageEditor {
    slug: String,
    title: String,
    description: String,
    tree: ContentTree,
}

impl PageEditor {
    pub fn from_page(page: Page) -> Self {
        let content = prepare_for_editing(&page.slug, page.content);
        PageEditor { tree: ContentTree::parse(&content), slug: page.slug, title: page.title, description: page.description }
    }

    #[instrument(skip(store))]
    pub async fn load(store: &dyn PageRepository, slug: &str) -> Result<Self, EditorError> {
        let page = store.find_by_slug(slug).await?.ok_or_else(|| EditorError::NotFound(slug.to_string()))?;
        debug!(sections = page.content.len(), "Loaded page for editing");
        Ok(PageEditor::from_page(page))
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn tree(&self) -> &ContentTree {
        &self.tree
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn set_field(&mut self, path: &str, value: impl Into<String>) -> Result<(), EditorError> {
        Ok(self.tree.set_scalar(path, value)?)
    }

    pub fn set_enabled(&mut self, path: &str, enabled: bool) -> Result<(), EditorError> {
        Ok(self.tree.set_enabled(path, enabled)?)
    }

    /// Stores the URL picked in the media library into an image or URL field.
    pub fn select_media(&mut self, path: &str, url: impl Into<String>) -> Result<(), EditorError> {
        Ok(self.tree.set_media(path, url)?)
    }

    pub fn append_item(&mut self, path: &str) -> Result<usize, EditorError> {
        Ok(self.tree.list_mut(path)?.append())
    }

    pub fn remove_item(&mut self, path: &str, index: usize) -> Result<(), EditorError> {
        self.tree.list_mut(path)?.remove(index)?;
        Ok(())
    }

    pub fn edit_item(&mut self, path: &str, index: usize, column: &str, value: impl Into<String>) -> Result<(), EditorError> {
        Ok(self.tree.list_mut(path)?.edit(index, column, value)?)
    }

    pub fn apply(&mut self, operation: EditOperation) -> Result<(), EditorError> {
        debug!(?operation, "Applying edit");
        match operation {
            EditOperation::SetTitle { value } => self.set_title(value),
            EditOperation::SetDescription { value } => self.set_description(value),
            EditOperation::SetField { path, value } => self.set_field(&path, value)?,
            EditOperation::SetEnabled { path, enabled } => self.set_enabled(&path, enabled)?,
            EditOperation::SelectMedia { path, url } => self.select_media(&path, url)?,
            EditOperation::AppendItem { path } => {
                self.append_item(&path)?;
            }
            EditOperation::RemoveItem { path, index } => self.remove_item(&path, index)?,
            EditOperation::EditItem { path, index, column, value } => self.edit_item(&path, index, &column, value)?,
        }
        Ok(())
    }

    pub fn view(&self) -> EditorView {
        EditorView {
            slug: self.slug.clone(),
            seo: SeoView { title: self.title.clone(), description: self.description.clone() },
            sections: self.tree.render(),
        }
    }

    pub fn payload(&self) -> PagePayload {
        PagePayload { title: self.title.clone(), description: self.description.clone(), content: self.tree.to_map() }
    }

    /// Writes the whole page back. Concurrent editors overwrite each other.
    #[instrument(skip(self, store), fields(slug = %self.slug))]
    pub async fn submit(&self, store: &dyn PageRepository) -> Result<Page, EditorError> {
        let payload = self.payload();
        let page = Page::new(self.slug.clone(), payload.title, payload.description, payload.content);
        let saved = store.save(page).await?;
        info!("Page content saved");
        Ok(saved)
    }
}
