use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::owner::Owned;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(email: String, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            email,
            password_hash,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub avatar: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProfile {
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub avatar: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl Profile {
    pub fn new(user_id: Uuid, profile: NewProfile) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            first_name: profile.first_name,
            last_name: profile.last_name,
            avatar: String::new(),
            tags: Vec::new(),
        }
    }

    pub fn apply(&mut self, update: ProfileUpdate) {
        if let Some(first_name) = update.first_name {
            self.first_name = first_name;
        }
        if let Some(last_name) = update.last_name {
            self.last_name = last_name;
        }
        if let Some(avatar) = update.avatar {
            self.avatar = avatar;
        }
        if let Some(tags) = update.tags {
            self.tags = tags;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewNotification {
    pub title: String,
    pub text: String,
}

impl Notification {
    pub fn new(user_id: Uuid, notification: NewNotification) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            title: notification.title,
            text: notification.text,
            created_at: Utc::now(),
        }
    }
}

impl Owned for Notification {
    fn owner(&self) -> Uuid {
        self.user_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_never_serialized() {
        let user = User::new("a@b.io".to_string(), "$2b$10$secret".to_string());
        let json = serde_json::to_string(&user).unwrap();

        assert!(json.contains("a@b.io"));
        assert!(!json.contains("secret"));
    }

    #[test]
    fn test_new_profile_is_empty() {
        let profile = Profile::new(
            Uuid::new_v4(),
            NewProfile {
                first_name: "Ada".to_string(),
                last_name: "Lovelace".to_string(),
            },
        );

        assert!(profile.avatar.is_empty());
        assert!(profile.tags.is_empty());
    }

    #[test]
    fn test_profile_update_tags_only() {
        let mut profile = Profile::new(
            Uuid::new_v4(),
            NewProfile {
                first_name: "Ada".to_string(),
                last_name: "Lovelace".to_string(),
            },
        );
        profile.apply(ProfileUpdate {
            tags: Some(vec!["work".to_string()]),
            ..Default::default()
        });

        assert_eq!(profile.first_name, "Ada");
        assert_eq!(profile.tags, vec!["work".to_string()]);
    }
}
