use serde::{Deserialize, Serialize};

/// A clinician account. Never serialized directly: it carries the password hash.
#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub name: String,
    pub title: String,
    /// Open set: doctor, admin, surgeon, ...
    pub role: String,
    pub email: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub name: String,
    pub title: String,
    pub role: String,
    pub email: Option<String>,
}

/// The user as returned to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: i64,
    pub username: String,
    pub name: String,
    pub title: String,
    pub role: String,
    pub email: Option<String>,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            name: user.name.clone(),
            title: user.title.clone(),
            role: user.role.clone(),
            email: user.email.clone(),
        }
    }
}
