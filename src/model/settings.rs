use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// One row of the `site_settings` collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteSetting {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub key: String,
    #[serde(default)]
    pub value: String,
}
