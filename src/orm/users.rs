//! SeaORM Entity for users table

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub username: String,
    pub email: String,
    /// Argon2id password hash.
    pub password: String,
    pub bio: Option<String>,
    pub is_admin: bool,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::posts::Entity")]
    Post,
    #[sea_orm(has_many = "super::comments::Entity")]
    Comment,
    #[sea_orm(has_many = "super::post_votes::Entity")]
    Vote,
    #[sea_orm(has_many = "super::notifications::Entity")]
    Notification,
    #[sea_orm(has_many = "super::flags::Entity")]
    Flag,
    #[sea_orm(has_many = "super::sessions::Entity")]
    Session,
}

impl Related<super::posts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Post.def()
    }
}

impl Related<super::comments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
