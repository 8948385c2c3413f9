use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Admin panel account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: Option<ObjectId>,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String, // e.g. "admin"
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}
