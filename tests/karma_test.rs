//! Integration tests for the karma aggregate: the sum of a user's post
//! scores, recomputed from vote rows on every read.

mod common;
use serial_test::serial;

use common::{database::*, fixtures::*};
use quorum::votes::{apply_vote, post_score, user_karma};

#[actix_rt::test]
#[serial]
async fn test_karma_is_zero_without_posts() {
    let db = setup_test_database()
        .await
        .expect("Failed to connect to test database");
    cleanup_test_data(&db).await.expect("Failed to cleanup");

    let user = create_test_user(&db, "alice", "password123")
        .await
        .expect("Failed to create user");

    let karma = user_karma(user.id).await.expect("Failed to compute karma");
    assert_eq!(karma, 0, "A user with no posts should have karma 0");

    cleanup_test_data(&db).await.expect("Failed to cleanup");
}

#[actix_rt::test]
#[serial]
async fn test_karma_follows_vote_sequence() {
    let db = setup_test_database()
        .await
        .expect("Failed to connect to test database");
    cleanup_test_data(&db).await.expect("Failed to cleanup");

    let scaffold = create_post_scaffold(&db)
        .await
        .expect("Failed to create scaffold");

    // Upvote: score 1, karma 1.
    let score = apply_vote(scaffold.other.id, scaffold.post.id, 1)
        .await
        .expect("Failed to apply vote");
    assert_eq!(score, 1);
    assert_eq!(user_karma(scaffold.author.id).await.unwrap(), 1);

    // Same vote again: unvote, back to 0.
    let score = apply_vote(scaffold.other.id, scaffold.post.id, 1)
        .await
        .expect("Failed to apply vote");
    assert_eq!(score, 0);
    assert_eq!(user_karma(scaffold.author.id).await.unwrap(), 0);

    // Downvote: score -1, karma -1.
    let score = apply_vote(scaffold.other.id, scaffold.post.id, -1)
        .await
        .expect("Failed to apply vote");
    assert_eq!(score, -1);
    assert_eq!(user_karma(scaffold.author.id).await.unwrap(), -1);

    cleanup_test_data(&db).await.expect("Failed to cleanup");
}

#[actix_rt::test]
#[serial]
async fn test_karma_sums_scores_across_posts() {
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

    let second_post = create_test_post(
        &db,
        scaffold.author.id,
        scaffold.category.id,
        "Another question",
    )
    .await
    .expect("Failed to create post");

    apply_vote(scaffold.other.id, scaffold.post.id, 1)
        .await
        .expect("Failed to apply vote");
    apply_vote(third.id, scaffold.post.id, 1)
        .await
        .expect("Failed to apply vote");
    apply_vote(scaffold.other.id, second_post.id, -1)
        .await
        .expect("Failed to apply vote");

    // Karma equals the sum of the per-post scores.
    let expected = post_score(scaffold.post.id).await.unwrap() + post_score(second_post.id).await.unwrap();
    assert_eq!(expected, 1);

    let karma = user_karma(scaffold.author.id)
        .await
        .expect("Failed to compute karma");
    assert_eq!(karma, expected);

    // Votes on other people's posts never touch this user's karma.
    assert_eq!(user_karma(scaffold.other.id).await.unwrap(), 0);
    assert_eq!(user_karma(third.id).await.unwrap(), 0);

    cleanup_test_data(&db).await.expect("Failed to cleanup");
}
