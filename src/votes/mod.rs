//! Vote application and score aggregation.
//!
//! A user holds at most one vote per post. Re-submitting the same value
//! removes the vote; submitting the opposite value flips it in place. Scores
//! and karma are always recomputed from the persisted vote rows at read time
//! so they can never drift from committed state.

use crate::db::get_db_pool;
use crate::orm::{post_votes, posts};
use chrono::Utc;
use sea_orm::{entity::*, query::*, DbErr};

/// Errors surfaced by the vote engine.
#[derive(Debug)]
pub enum VoteError {
    /// Vote value was not +1 or -1.
    InvalidValue(i32),
    /// The target post does not exist.
    PostNotFound,
    /// Lost a duplicate-vote race on the (user, post) unique constraint.
    /// The caller may re-fetch and retry.
    Conflict,
    /// Any other database failure.
    Db(DbErr),
}

impl std::fmt::Display for VoteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VoteError::InvalidValue(value) => {
                write!(f, "Vote value must be +1 or -1, got {}", value)
            }
            VoteError::PostNotFound => write!(f, "Post not found"),
            VoteError::Conflict => write!(f, "Simultaneous vote on the same post; try again"),
            VoteError::Db(e) => write!(f, "Database error: {}", e),
        }
    }
}

impl std::error::Error for VoteError {}

impl From<DbErr> for VoteError {
    fn from(e: DbErr) -> Self {
        VoteError::Db(e)
    }
}

/// True when a database error reports a unique constraint violation.
///
/// SeaORM surfaces constraint failures as stringly-typed execution errors, so
/// this matches on the Postgres wording.
fn is_unique_violation(err: &DbErr) -> bool {
    let msg = err.to_string();
    msg.contains("duplicate key") || msg.contains("unique constraint")
}

/// Apply a vote by `user_id` on `post_id` and return the post's new score.
///
/// Exactly one row is inserted, updated, or deleted:
/// - no existing vote: insert a new row with `value`
/// - existing vote with the same value: delete the row (unvote)
/// - existing vote with the other value: update the row in place (switch)
///
/// The returned score is recomputed from the vote rows after the mutation,
/// never adjusted locally.
pub async fn apply_vote(user_id: i32, post_id: i32, value: i32) -> Result<i64, VoteError> {
    if value != 1 && value != -1 {
        return Err(VoteError::InvalidValue(value));
    }

    let db = get_db_pool();

    posts::Entity::find_by_id(post_id)
        .one(db)
        .await?
        .ok_or(VoteError::PostNotFound)?;

    let existing = post_votes::Entity::find()
        .filter(post_votes::Column::UserId.eq(user_id))
        .filter(post_votes::Column::PostId.eq(post_id))
        .one(db)
        .await?;

    match existing {
        None => {
            let vote = post_votes::ActiveModel {
                user_id: Set(user_id),
                post_id: Set(post_id),
                value: Set(value),
                created_at: Set(Utc::now().naive_utc()),
                ..Default::default()
            };

            // Two requests from the same user can race past the lookup above;
            // the unique constraint decides the winner and the loser gets a
            // retryable conflict instead of a second row.
            if let Err(e) = vote.insert(db).await {
                if is_unique_violation(&e) {
                    log::debug!(
                        "apply_vote: duplicate vote race lost for user {} on post {}",
                        user_id,
                        post_id
                    );
                    return Err(VoteError::Conflict);
                }
                return Err(VoteError::Db(e));
            }
        }
        Some(vote) if vote.value == value => {
            // Same direction again is an unvote toggle.
            post_votes::Entity::delete_by_id(vote.id).exec(db).await?;
        }
        Some(vote) => {
            // Opposite direction switches the existing row.
            let mut active: post_votes::ActiveModel = vote.into();
            active.value = Set(value);
            active.update(db).await?;
        }
    }

    Ok(post_score(post_id).await?)
}

/// The vote a user currently holds on a post, if any.
pub async fn find_user_vote(
    user_id: i32,
    post_id: i32,
) -> Result<Option<post_votes::Model>, DbErr> {
    post_votes::Entity::find()
        .filter(post_votes::Column::UserId.eq(user_id))
        .filter(post_votes::Column::PostId.eq(post_id))
        .one(get_db_pool())
        .await
}

/// Sum of vote values on a post; 0 when it has none.
pub async fn post_score(post_id: i32) -> Result<i64, DbErr> {
    let votes = post_votes::Entity::find()
        .filter(post_votes::Column::PostId.eq(post_id))
        .all(get_db_pool())
        .await?;

    Ok(votes.iter().map(|v| i64::from(v.value)).sum())
}

/// Sum of scores across a user's posts; 0 for a user with no posts.
///
/// Reads every post and its votes on each call. That is O(posts × votes),
/// accepted at this board's scale in exchange for never holding a counter
/// that could go stale.
pub async fn user_karma(user_id: i32) -> Result<i64, DbErr> {
    let post_rows = posts::Entity::find()
        .filter(posts::Column::UserId.eq(user_id))
        .all(get_db_pool())
        .await?;

    let mut karma = 0;
    for post in &post_rows {
        karma += post_score(post.id).await?;
    }

    Ok(karma)
}
