//! Notification system for user engagement.
//!
//! A notification is created when a comment lands on someone else's post.
//! The unread figure shown in the navigation is a live count query, and the
//! notifications page marks everything read as part of serving the response.

use crate::db::get_db_pool;
use crate::orm::{comments, notifications, posts, users};
use chrono::Utc;
use sea_orm::{entity::*, query::*, sea_query::Expr, DbErr};

/// Notify a post's author that a comment was added to their post.
///
/// A user commenting on their own post produces no notification. Returns the
/// created row for a qualifying comment, None otherwise.
pub async fn notify_post_author(
    comment: &comments::Model,
    post: &posts::Model,
) -> Result<Option<notifications::Model>, DbErr> {
    if comment.user_id == post.user_id {
        return Ok(None);
    }

    let db = get_db_pool();

    let commenter = users::Entity::find_by_id(comment.user_id)
        .one(db)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound(format!("User {} not found", comment.user_id)))?;

    let notification = notifications::ActiveModel {
        user_id: Set(post.user_id),
        post_id: Set(post.id),
        comment_id: Set(comment.id),
        message: Set(format!(
            "New comment by {} on your post '{}'",
            commenter.username, post.title
        )),
        is_read: Set(false),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    };

    let result = notification.insert(db).await?;

    log::info!(
        "Notification {} created for user {} (comment {} on post {})",
        result.id,
        post.user_id,
        comment.id,
        post.id
    );

    Ok(Some(result))
}

/// Count unread notifications for a user.
pub async fn count_unread_notifications(user_id: i32) -> Result<i64, DbErr> {
    let count = notifications::Entity::find()
        .filter(notifications::Column::UserId.eq(user_id))
        .filter(notifications::Column::IsRead.eq(false))
        .count(get_db_pool())
        .await?;

    Ok(count as i64)
}

/// Fetch a user's unread notifications, newest first.
pub async fn get_unread_notifications(user_id: i32) -> Result<Vec<notifications::Model>, DbErr> {
    notifications::Entity::find()
        .filter(notifications::Column::UserId.eq(user_id))
        .filter(notifications::Column::IsRead.eq(false))
        .order_by_desc(notifications::Column::CreatedAt)
        .all(get_db_pool())
        .await
}

/// Fetch recent notifications for a user, newest first.
pub async fn get_user_notifications(
    user_id: i32,
    limit: u64,
) -> Result<Vec<notifications::Model>, DbErr> {
    notifications::Entity::find()
        .filter(notifications::Column::UserId.eq(user_id))
        .order_by_desc(notifications::Column::CreatedAt)
        .limit(limit)
        .all(get_db_pool())
        .await
}

/// Mark all notifications as read for a user.
/// Safe to call repeatedly; a second call is a no-op.
pub async fn mark_all_read(user_id: i32) -> Result<(), DbErr> {
    notifications::Entity::update_many()
        .col_expr(notifications::Column::IsRead, Expr::value(true))
        .filter(notifications::Column::UserId.eq(user_id))
        .filter(notifications::Column::IsRead.eq(false))
        .exec(get_db_pool())
        .await?;

    Ok(())
}
