use crate::orm::users;
use sea_orm::{entity::*, query::*, DatabaseConnection, FromQueryResult};

/// Base URL fragment for resource.
pub static RESOURCE_URL: &str = "members";

/// A struct to hold the presentable information for a user.
/// Excludes the credential hash so it can be handed to templates freely.
#[derive(Clone, Debug, FromQueryResult)]
pub struct Profile {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub bio: Option<String>,
    pub is_admin: bool,
    pub created_at: chrono::NaiveDateTime,
}

impl Profile {
    /// Returns a user profile by id.
    pub async fn get_by_id(
        db: &DatabaseConnection,
        id: i32,
    ) -> Result<Option<Self>, sea_orm::DbErr> {
        users::Entity::find_by_id(id)
            .into_model::<Profile>()
            .one(db)
            .await
    }

    /// Returns a user profile by username.
    pub async fn get_by_username(
        db: &DatabaseConnection,
        username: &str,
    ) -> Result<Option<Self>, sea_orm::DbErr> {
        users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .into_model::<Profile>()
            .one(db)
            .await
    }

    pub fn get_url(&self) -> String {
        format!("/{}/{}", RESOURCE_URL, self.username)
    }
}

impl From<users::Model> for Profile {
    fn from(user: users::Model) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            bio: user.bio,
            is_admin: user.is_admin,
            created_at: user.created_at,
        }
    }
}

pub async fn get_user_id_from_name(db: &DatabaseConnection, name: &str) -> Option<i32> {
    users::Entity::find()
        .filter(users::Column::Username.eq(name))
        .one(db)
        .await
        .unwrap_or(None)
        .map(|user| user.id)
}
