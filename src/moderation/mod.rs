//! Abuse flags and moderation deletion.
//!
//! A flag targets exactly one of a post or a comment. `FlagTarget` makes the
//! both-or-neither states unrepresentable in application code; the database
//! check constraint backs the same rule at the storage layer. The same user
//! may flag the same target repeatedly; every submission is its own row.
//!
//! Deletion is an explicit cascade: removing a post takes its comments,
//! votes, flags, and notifications with it in one transaction.

use crate::db::get_db_pool;
use crate::orm::{comments, flags, notifications, post_votes, posts};
use chrono::Utc;
use sea_orm::{entity::*, query::*, DbErr, TransactionTrait};

/// The single target of an abuse flag.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FlagTarget {
    Post(i32),
    Comment(i32),
}

/// Errors surfaced by the flag recorder.
#[derive(Debug)]
pub enum FlagError {
    /// Reason was empty after trimming whitespace.
    EmptyReason,
    /// The flagged post or comment does not exist.
    TargetNotFound,
    /// Any other database failure.
    Db(DbErr),
}

impl std::fmt::Display for FlagError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FlagError::EmptyReason => write!(f, "A reason is required"),
            FlagError::TargetNotFound => write!(f, "Flagged content not found"),
            FlagError::Db(e) => write!(f, "Database error: {}", e),
        }
    }
}

impl std::error::Error for FlagError {}

impl From<DbErr> for FlagError {
    fn from(e: DbErr) -> Self {
        FlagError::Db(e)
    }
}

/// Record an abuse report by `user_id` against a post or a comment.
pub async fn flag_target(
    user_id: i32,
    target: FlagTarget,
    reason: &str,
) -> Result<flags::Model, FlagError> {
    let reason = reason.trim();
    if reason.is_empty() {
        return Err(FlagError::EmptyReason);
    }

    let db = get_db_pool();

    let (post_id, comment_id) = match target {
        FlagTarget::Post(id) => {
            posts::Entity::find_by_id(id)
                .one(db)
                .await?
                .ok_or(FlagError::TargetNotFound)?;
            (Some(id), None)
        }
        FlagTarget::Comment(id) => {
            comments::Entity::find_by_id(id)
                .one(db)
                .await?
                .ok_or(FlagError::TargetNotFound)?;
            (None, Some(id))
        }
    };

    let flag = flags::ActiveModel {
        user_id: Set(user_id),
        post_id: Set(post_id),
        comment_id: Set(comment_id),
        reason: Set(reason.to_string()),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    };

    let result = flag.insert(db).await?;

    log::info!(
        "Flag {} recorded by user {} against {:?}",
        result.id,
        user_id,
        target
    );

    Ok(result)
}

/// Delete a post and everything it exclusively owns: comments (and their
/// flags), votes, flags, and notifications, all in one transaction.
pub async fn delete_post(post_id: i32) -> Result<(), DbErr> {
    let db = get_db_pool();
    let txn = db.begin().await?;

    let comment_ids: Vec<i32> = comments::Entity::find()
        .filter(comments::Column::PostId.eq(post_id))
        .all(&txn)
        .await?
        .iter()
        .map(|c| c.id)
        .collect();

    if !comment_ids.is_empty() {
        flags::Entity::delete_many()
            .filter(flags::Column::CommentId.is_in(comment_ids))
            .exec(&txn)
            .await?;
    }

    flags::Entity::delete_many()
        .filter(flags::Column::PostId.eq(post_id))
        .exec(&txn)
        .await?;

    notifications::Entity::delete_many()
        .filter(notifications::Column::PostId.eq(post_id))
        .exec(&txn)
        .await?;

    comments::Entity::delete_many()
        .filter(comments::Column::PostId.eq(post_id))
        .exec(&txn)
        .await?;

    post_votes::Entity::delete_many()
        .filter(post_votes::Column::PostId.eq(post_id))
        .exec(&txn)
        .await?;

    posts::Entity::delete_by_id(post_id).exec(&txn).await?;

    txn.commit().await?;

    log::info!("Post {} deleted with its owned rows", post_id);

    Ok(())
}

/// Delete a comment along with its flags and notifications.
pub async fn delete_comment(comment_id: i32) -> Result<(), DbErr> {
    let db = get_db_pool();
    let txn = db.begin().await?;

    flags::Entity::delete_many()
        .filter(flags::Column::CommentId.eq(comment_id))
        .exec(&txn)
        .await?;

    notifications::Entity::delete_many()
        .filter(notifications::Column::CommentId.eq(comment_id))
        .exec(&txn)
        .await?;

    comments::Entity::delete_by_id(comment_id).exec(&txn).await?;

    txn.commit().await?;

    log::info!("Comment {} deleted with its owned rows", comment_id);

    Ok(())
}
