//! Page content editing: section ordering, the content tree walker and the
//! editor session built on top of it.

pub mod page;
pub mod tree;
pub mod editor;

pub use editor::{EditOperation, EditorError, EditorView, PageEditor, PagePayload};
pub use tree::{ContentNode, ContentTree, RenderedNode, TreeError};
