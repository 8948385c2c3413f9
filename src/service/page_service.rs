use async_trait::async_trait;
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

use crate::content::editor::{EditOperation, EditorError, EditorView, PageEditor, PagePayload};
use crate::content::page::published_content;
use crate::dto::page_dto::{PageSummary, PublicPage};
use crate::model::page::Page;
use crate::repository::page_repo::PageRepository;
use crate::util::error::ServiceError;

pub const BLOG_SLUG: &str = "blog";
const BLOG_TITLE: &str = "Blog | Insurance Plaza";
const BLOG_DESCRIPTION: &str = "Read the latest news, articles, and insights on insurance from the experts at Insurance Plaza. Stay informed to make the best decisions for your protection.";
const BLOG_HERO_TITLE: &str = "Insurance Insights";
const BLOG_HERO_SUBTITLE: &str = "Our collection of articles and guides to help you understand the world of insurance and make informed decisions.";
const BLOG_HERO_IMAGE: &str = "https://placehold.co/1920x400.png";

/// Copy served for the blog listing when no page document exists.
pub fn default_blog_page() -> PublicPage {
    let mut content = Map::new();
    content.insert(
        "hero".to_string(),
        json!({ "title": BLOG_HERO_TITLE, "subtitle": BLOG_HERO_SUBTITLE, "image": BLOG_HERO_IMAGE }),
    );
    PublicPage {
        slug: BLOG_SLUG.to_string(),
        title: BLOG_TITLE.to_string(),
        description: BLOG_DESCRIPTION.to_string(),
        content,
    }
}

/// Fills blanks of a stored blog page from the default copy.
fn with_blog_defaults(mut page: PublicPage) -> PublicPage {
    let defaults = default_blog_page();
    if page.title.trim().is_empty() {
        page.title = defaults.title;
    }
    if page.description.trim().is_empty() {
        page.description = defaults.description;
    }
    let hero = page.content.entry("hero").or_insert_with(|| Value::Object(Map::new()));
    if let (Value::Object(hero), Some(Value::Object(default_hero))) = (hero, defaults.content.get("hero")) {
        for (key, value) in default_hero {
            let blank = hero.get(key).and_then(Value::as_str).map_or(true, |s| s.trim().is_empty());
            if blank {
                hero.insert(key.clone(), value.clone());
            }
        }
    }
    page
}

impl From<EditorError> for ServiceError {
    fn from(err: EditorError) -> Self {
        match err {
            EditorError::NotFound(slug) => ServiceError::NotFound(format!("Page not found: {}", slug)),
            EditorError::Tree(e) => ServiceError::InvalidInput(e.to_string()),
            EditorError::Store(e) => ServiceError::from(e),
        }
    }
}

#[async_trait]
pub trait PageService: Send + Sync {
    async fn list_pages(&self) -> Result<Vec<PageSummary>, ServiceError>;
    async fn editor_view(&self, slug: &str) -> Result<EditorView, ServiceError>;
    /// Replaces the whole page. No version check: the last write wins.
    async fn save_page(&self, slug: &str, payload: PagePayload) -> Result<Page, ServiceError>;
    async fn apply_edits(&self, slug: &str, operations: Vec<EditOperation>, save: bool) -> Result<EditorView, ServiceError>;
    async fn public_page(&self, slug: &str) -> Result<PublicPage, ServiceError>;
}

pub struct PageServiceImpl {
    pub page_repo: Arc<dyn PageRepository>,
}

impl PageServiceImpl {
    pub fn new(page_repo: Arc<dyn PageRepository>) -> Self {
        PageServiceImpl { page_repo }
    }
}

#[async_trait]
impl PageService for PageServiceImpl {
    #[instrument(skip(self))]
    async fn list_pages(&self) -> Result<Vec<PageSummary>, ServiceError> {
        let pages = self.page_repo.list().await.map_err(|e| {
            error!("Failed to list pages: {e}");
            ServiceError::from(e)
        })?;
        Ok(pages.into_iter().map(PageSummary::from).collect())
    }

    #[instrument(skip(self))]
    async fn editor_view(&self, slug: &str) -> Result<EditorView, ServiceError> {
        let editor = PageEditor::load(self.page_repo.as_ref(), slug).await?;
        Ok(editor.view())
    }

    #[instrument(skip(self, payload), fields(title = %payload.title, sections = payload.content.len()))]
    async fn save_page(&self, slug: &str, payload: PagePayload) -> Result<Page, ServiceError> {
        let page = Page::new(slug, payload.title, payload.description, payload.content);
        let res = self.page_repo.save(page).await;
        match &res {
            Ok(_) => info!("Page saved"),
            Err(e) => error!("Failed to save page: {e}"),
        }
        res.map_err(ServiceError::from)
    }

    #[instrument(skip(self, operations), fields(count = operations.len()))]
    async fn apply_edits(&self, slug: &str, operations: Vec<EditOperation>, save: bool) -> Result<EditorView, ServiceError> {
        let mut editor = PageEditor::load(self.page_repo.as_ref(), slug).await?;
        for operation in operations {
            editor.apply(operation)?;
        }
        if save {
            editor.submit(self.page_repo.as_ref()).await?;
        }
        Ok(editor.view())
    }

    #[instrument(skip(self))]
    async fn public_page(&self, slug: &str) -> Result<PublicPage, ServiceError> {
        let page = self.page_repo.find_by_slug(slug).await.map_err(|e| {
            error!("Failed to fetch page: {e}");
            ServiceError::from(e)
        })?;

        match page {
            Some(page) => {
                let public = PublicPage {
                    content: published_content(&page.content),
                    slug: page.slug,
                    title: page.title,
                    description: page.description,
                };
                Ok(if slug == BLOG_SLUG { with_blog_defaults(public) } else { public })
            }
            None if slug == BLOG_SLUG => {
                warn!("Blog page missing, serving default copy");
                Ok(default_blog_page())
            }
            None => Err(ServiceError::NotFound(format!("Page not found: {}", slug))),
        }
    }
}
