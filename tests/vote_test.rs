//! Integration tests for the vote engine: toggle, switch, and uniqueness
//! semantics, and score recomputation from persisted rows.

mod common;
use serial_test::serial;

use chrono::Utc;
use common::{database::*, fixtures::*};
use quorum::orm::post_votes;
use quorum::votes::{apply_vote, post_score, VoteError};
use sea_orm::{entity::*, query::*, ActiveValue::Set, ColumnTrait, EntityTrait, QueryFilter};

#[actix_rt::test]
#[serial]
async fn test_score_is_zero_without_votes() {
    let db = setup_test_database()
        .await
        .expect("Failed to connect to test database");
    cleanup_test_data(&db).await.expect("Failed to cleanup");

    let scaffold = create_post_scaffold(&db)
        .await
        .expect("Failed to create scaffold");

    let score = post_score(scaffold.post.id)
        .await
        .expect("Failed to compute score");
    assert_eq!(score, 0, "A post with no votes should score 0");

    cleanup_test_data(&db).await.expect("Failed to cleanup");
}

#[actix_rt::test]
#[serial]
async fn test_upvote_inserts_one_row() {
    let db = setup_test_database()
        .await
        .expect("Failed to connect to test database");
    cleanup_test_data(&db).await.expect("Failed to cleanup");

    let scaffold = create_post_scaffold(&db)
        .await
        .expect("Failed to create scaffold");

    let score = apply_vote(scaffold.other.id, scaffold.post.id, 1)
        .await
        .expect("Failed to apply vote");
    assert_eq!(score, 1);

    let votes = post_votes::Entity::find()
        .filter(post_votes::Column::PostId.eq(scaffold.post.id))
        .all(&db)
        .await
        .expect("Failed to fetch votes");
    assert_eq!(votes.len(), 1, "Should have exactly one vote row");
    assert_eq!(votes[0].user_id, scaffold.other.id);
    assert_eq!(votes[0].value, 1);

    cleanup_test_data(&db).await.expect("Failed to cleanup");
}

#[actix_rt::test]
#[serial]
async fn test_repeat_vote_is_an_unvote_toggle() {
    let db = setup_test_database()
        .await
        .expect("Failed to connect to test database");
    cleanup_test_data(&db).await.expect("Failed to cleanup");

    let scaffold = create_post_scaffold(&db)
        .await
        .expect("Failed to create scaffold");

    let score = apply_vote(scaffold.other.id, scaffold.post.id, 1)
        .await
        .expect("Failed to apply first vote");
    assert_eq!(score, 1);

    // Same value again removes the vote entirely.
    let score = apply_vote(scaffold.other.id, scaffold.post.id, 1)
        .await
        .expect("Failed to apply second vote");
    assert_eq!(score, 0, "Re-submitting the same value should unvote");

    let vote_count = post_votes::Entity::find()
        .filter(post_votes::Column::PostId.eq(scaffold.post.id))
        .count(&db)
        .await
        .expect("Failed to count votes");
    assert_eq!(vote_count, 0, "The vote row should be deleted");

    cleanup_test_data(&db).await.expect("Failed to cleanup");
}

#[actix_rt::test]
#[serial]
async fn test_opposite_vote_switches_in_place() {
    let db = setup_test_database()
        .await
        .expect("Failed to connect to test database");
    cleanup_test_data(&db).await.expect("Failed to cleanup");

    let scaffold = create_post_scaffold(&db)
        .await
        .expect("Failed to create scaffold");

    apply_vote(scaffold.other.id, scaffold.post.id, 1)
        .await
        .expect("Failed to apply upvote");

    let score = apply_vote(scaffold.other.id, scaffold.post.id, -1)
        .await
        .expect("Failed to apply downvote");
    assert_eq!(score, -1, "Opposite value should switch the vote");

    let votes = post_votes::Entity::find()
        .filter(post_votes::Column::PostId.eq(scaffold.post.id))
        .filter(post_votes::Column::UserId.eq(scaffold.other.id))
        .all(&db)
        .await
        .expect("Failed to fetch votes");
    assert_eq!(votes.len(), 1, "Switch must reuse the existing row");
    assert_eq!(votes[0].value, -1);

    cleanup_test_data(&db).await.expect("Failed to cleanup");
}

#[actix_rt::test]
#[serial]
async fn test_vote_sequence_leaves_at_most_one_row() {
    let db = setup_test_database()
        .await
        .expect("Failed to connect to test database");
    cleanup_test_data(&db).await.expect("Failed to cleanup");

    let scaffold = create_post_scaffold(&db)
        .await
        .expect("Failed to create scaffold");

    for value in [1, -1, -1, 1, 1, -1] {
        apply_vote(scaffold.other.id, scaffold.post.id, value)
            .await
            .expect("Failed to apply vote");

        let vote_count = post_votes::Entity::find()
            .filter(post_votes::Column::PostId.eq(scaffold.post.id))
            .filter(post_votes::Column::UserId.eq(scaffold.other.id))
            .count(&db)
            .await
            .expect("Failed to count votes");
        assert!(
            vote_count <= 1,
            "Never more than one vote row per (user, post)"
        );
    }

    cleanup_test_data(&db).await.expect("Failed to cleanup");
}

#[actix_rt::test]
#[serial]
async fn test_votes_by_different_users_are_independent() {
    let db = setup_test_database()
        .await
        .expect("Failed to connect to test database");
    cleanup_test_data(&db).await.expect("Failed to cleanup");

    let scaffold = create_post_scaffold(&db)
        .await
        .expect("Failed to create scaffold");
    let third = create_test_user(&db, "carol", "password123")
        .await
        .expect("Failed to create user");

    apply_vote(scaffold.other.id, scaffold.post.id, 1)
        .await
        .expect("Failed to apply vote");
    let score = apply_vote(third.id, scaffold.post.id, 1)
        .await
        .expect("Failed to apply vote");

    assert_eq!(score, 2, "Votes from distinct users should both count");

    cleanup_test_data(&db).await.expect("Failed to cleanup");
}

#[actix_rt::test]
#[serial]
async fn test_invalid_vote_value_is_rejected_before_write() {
    let db = setup_test_database()
        .await
        .expect("Failed to connect to test database");
    cleanup_test_data(&db).await.expect("Failed to cleanup");

    let scaffold = create_post_scaffold(&db)
        .await
        .expect("Failed to create scaffold");

    for value in [0, 2, -2, 100] {
        let result = apply_vote(scaffold.other.id, scaffold.post.id, value).await;
        assert!(
            matches!(result, Err(VoteError::InvalidValue(_))),
            "Value {} must be rejected",
            value
        );
    }

    let vote_count = post_votes::Entity::find()
        .count(&db)
        .await
        .expect("Failed to count votes");
    assert_eq!(vote_count, 0, "No rows may be written for invalid values");

    cleanup_test_data(&db).await.expect("Failed to cleanup");
}

#[actix_rt::test]
#[serial]
async fn test_vote_on_missing_post_is_rejected() {
    let db = setup_test_database()
        .await
        .expect("Failed to connect to test database");
    cleanup_test_data(&db).await.expect("Failed to cleanup");

    let user = create_test_user(&db, "alice", "password123")
        .await
        .expect("Failed to create user");

    let result = apply_vote(user.id, 9999, 1).await;
    assert!(matches!(result, Err(VoteError::PostNotFound)));

    cleanup_test_data(&db).await.expect("Failed to cleanup");
}

#[actix_rt::test]
#[serial]
async fn test_duplicate_vote_row_rejected_by_constraint() {
    let db = setup_test_database()
        .await
        .expect("Failed to connect to test database");
    cleanup_test_data(&db).await.expect("Failed to cleanup");

    let scaffold = create_post_scaffold(&db)
        .await
        .expect("Failed to create scaffold");

    // Insert directly, bypassing the engine, to prove the database itself
    // rejects a second row for the same (user, post) pair.
    let vote = post_votes::ActiveModel {
        user_id: Set(scaffold.other.id),
        post_id: Set(scaffold.post.id),
        value: Set(1),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    };
    vote.insert(&db).await.expect("First insert should succeed");

    let duplicate = post_votes::ActiveModel {
        user_id: Set(scaffold.other.id),
        post_id: Set(scaffold.post.id),
        value: Set(-1),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    };
    let result = duplicate.insert(&db).await;
    assert!(
        result.is_err(),
        "Unique constraint must reject a duplicate (user, post) vote"
    );

    cleanup_test_data(&db).await.expect("Failed to cleanup");
}
