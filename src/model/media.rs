use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Media library entry. Files are uploaded elsewhere; only the name is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaItem {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub created_at: Option<String>,
}
