//! Test fixtures for creating test data
#![allow(dead_code)]
#![allow(clippy::needless_update)]

use argon2::password_hash::{rand_core::OsRng, PasswordHasher, SaltString};
use chrono::Utc;
use sea_orm::{entity::*, ActiveValue::Set, DatabaseConnection, DbErr};

/// Test user fixture
pub struct TestUser {
    pub id: i32,
    pub username: String,
    pub password: String, // Plain text password for testing
}

async fn insert_user(
    db: &DatabaseConnection,
    username: &str,
    password: &str,
    is_admin: bool,
) -> Result<TestUser, DbErr> {
    use quorum::orm::users;

    // Hash the password with the same Argon2 instance the login flow uses
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = quorum::session::get_argon2()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| DbErr::Custom(format!("Password hashing failed: {}", e)))?
        .to_string();

    let user = users::ActiveModel {
        username: Set(username.to_string()),
        email: Set(format!("{}@test.com", username)),
        password: Set(password_hash),
        bio: Set(None),
        is_admin: Set(is_admin),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    };
    let user_model = user.insert(db).await?;

    Ok(TestUser {
        id: user_model.id,
        username: username.to_string(),
        password: password.to_string(),
    })
}

/// Create a test user with known credentials
pub async fn create_test_user(
    db: &DatabaseConnection,
    username: &str,
    password: &str,
) -> Result<TestUser, DbErr> {
    insert_user(db, username, password, false).await
}

/// Create a test user with the admin flag set
pub async fn create_test_admin(
    db: &DatabaseConnection,
    username: &str,
    password: &str,
) -> Result<TestUser, DbErr> {
    insert_user(db, username, password, true).await
}

/// Create a test category
pub async fn create_test_category(
    db: &DatabaseConnection,
    name: &str,
    slug: &str,
) -> Result<quorum::orm::categories::Model, DbErr> {
    use quorum::orm::categories;

    let category = categories::ActiveModel {
        name: Set(name.to_string()),
        slug: Set(slug.to_string()),
        ..Default::default()
    };
    category.insert(db).await
}

/// Create a test post
pub async fn create_test_post(
    db: &DatabaseConnection,
    user_id: i32,
    category_id: i32,
    title: &str,
) -> Result<quorum::orm::posts::Model, DbErr> {
    use quorum::orm::posts;

    let post = posts::ActiveModel {
        title: Set(title.to_string()),
        image_path: Set(None),
        created_at: Set(Utc::now().naive_utc()),
        user_id: Set(user_id),
        category_id: Set(category_id),
        ..Default::default()
    };
    post.insert(db).await
}

/// Create a test comment
pub async fn create_test_comment(
    db: &DatabaseConnection,
    user_id: i32,
    post_id: i32,
    text: &str,
) -> Result<quorum::orm::comments::Model, DbErr> {
    use quorum::orm::comments;

    let comment = comments::ActiveModel {
        text: Set(text.to_string()),
        created_at: Set(Utc::now().naive_utc()),
        user_id: Set(user_id),
        post_id: Set(post_id),
        ..Default::default()
    };
    comment.insert(db).await
}

/// Standard scaffold: two users, a category, and a post owned by the first user.
pub struct PostScaffold {
    pub author: TestUser,
    pub other: TestUser,
    pub category: quorum::orm::categories::Model,
    pub post: quorum::orm::posts::Model,
}

/// Create the common author/voter/post arrangement most tests need.
pub async fn create_post_scaffold(db: &DatabaseConnection) -> Result<PostScaffold, DbErr> {
    let author = create_test_user(db, "alice", "password123").await?;
    let other = create_test_user(db, "bob", "password123").await?;
    let category = create_test_category(db, "General", "general").await?;
    let post = create_test_post(db, author.id, category.id, "What should I read next?").await?;

    Ok(PostScaffold {
        author,
        other,
        category,
        post,
    })
}
