/*
 * Responsibility
 * - Users request/response DTOs
 * - Entity -> response mapping (the password never leaves the server)
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::repos::models::User;
use crate::services::object_id::ObjectId;
use crate::services::users::ProfileChanges;

/// Distinguish "field absent" from "field: null" for tri-state updates.
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    // Tri-state:
    // - None: field missing (do not update)
    // - Some(None): null (clear)
    // - Some(Some(v)): set value
    #[serde(deserialize_with = "nullable")]
    pub bio: Option<Option<String>>,
    #[serde(deserialize_with = "nullable")]
    pub profile_picture: Option<Option<String>>,
}

impl UpdateUserRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if let Some(name) = &self.username
            && name.trim().is_empty()
        {
            return Err("username cannot be empty");
        }
        if let Some(email) = &self.email
            && !email.contains('@')
        {
            return Err("email is invalid");
        }
        Ok(())
    }
}

impl From<UpdateUserRequest> for ProfileChanges {
    fn from(req: UpdateUserRequest) -> Self {
        Self {
            username: req.username,
            email: req.email,
            bio: req.bio,
            profile_picture: req.profile_picture,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct ChangePasswordRequest {
    pub password: String,
}

impl ChangePasswordRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.password.is_empty() {
            return Err("password is required");
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct ChangeRoleRequest {
    pub is_admin: Option<bool>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: ObjectId,
    pub username: String,
    pub email: String,
    pub bio: Option<String>,
    pub profile_picture: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_admin: bool,
    pub is_active: bool,
    pub is_blocked: bool,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
            bio: u.bio,
            profile_picture: u.profile_picture,
            created_at: u.created_at,
            updated_at: u.updated_at,
            is_admin: u.is_admin,
            is_active: u.is_active,
            is_blocked: u.is_blocked,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_and_missing_fields_are_distinguished() {
        let req: UpdateUserRequest =
            serde_json::from_str(r#"{"bio": null, "username": "ann"}"#).unwrap();
        assert_eq!(req.bio, Some(None));
        assert_eq!(req.profile_picture, None);

        let req: UpdateUserRequest =
            serde_json::from_str(r#"{"profilePicture": "p.png"}"#).unwrap();
        assert_eq!(req.profile_picture, Some(Some("p.png".to_string())));
    }

    #[test]
    fn response_has_no_password() {
        let now = Utc::now();
        let user = User {
            id: ObjectId::new(),
            username: "ann".into(),
            email: "ann@example.com".into(),
            password: "secret".into(),
            bio: None,
            profile_picture: None,
            created_at: now,
            updated_at: now,
            is_admin: false,
            is_active: true,
            is_blocked: false,
        };
        let json = serde_json::to_value(UserResponse::from(user)).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["isBlocked"], false);
        assert_eq!(json["id"].as_str().map(str::len), Some(24));
    }
}
