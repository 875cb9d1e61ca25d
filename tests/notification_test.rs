//! Integration tests for notification creation, self-comment suppression,
//! and the unread count / mark-all-read flow.

mod common;
use serial_test::serial;

use common::{database::*, fixtures::*};
use quorum::notifications::{
    count_unread_notifications, get_unread_notifications, mark_all_read, notify_post_author,
};
use quorum::orm::notifications as notification_orm;
use sea_orm::{query::*, ColumnTrait, EntityTrait, QueryFilter};

#[actix_rt::test]
#[serial]
async fn test_comment_by_other_user_creates_notification() {
    let db = setup_test_database()
        .await
        .expect("Failed to connect to test database");
    cleanup_test_data(&db).await.expect("Failed to cleanup");

    let scaffold = create_post_scaffold(&db)
        .await
        .expect("Failed to create scaffold");

    let comment = create_test_comment(&db, scaffold.other.id, scaffold.post.id, "Try Dune!")
        .await
        .expect("Failed to create comment");

    let notification = notify_post_author(&comment, &scaffold.post)
        .await
        .expect("Failed to notify")
        .expect("A comment by another user must create a notification");

    assert_eq!(notification.user_id, scaffold.author.id);
    assert_eq!(notification.post_id, scaffold.post.id);
    assert_eq!(notification.comment_id, comment.id);
    assert!(!notification.is_read);
    assert_eq!(
        notification.message,
        "New comment by bob on your post 'What should I read next?'"
    );

    let count = count_unread_notifications(scaffold.author.id)
        .await
        .expect("Failed to count notifications");
    assert_eq!(count, 1, "The author should have one unread notification");

    cleanup_test_data(&db).await.expect("Failed to cleanup");
}

#[actix_rt::test]
#[serial]
async fn test_self_comment_creates_no_notification() {
    let db = setup_test_database()
        .await
        .expect("Failed to connect to test database");
    cleanup_test_data(&db).await.expect("Failed to cleanup");

    let scaffold = create_post_scaffold(&db)
        .await
        .expect("Failed to create scaffold");

    let comment = create_test_comment(&db, scaffold.author.id, scaffold.post.id, "Bumping this")
        .await
        .expect("Failed to create comment");

    let notification = notify_post_author(&comment, &scaffold.post)
        .await
        .expect("Failed to notify");
    assert!(
        notification.is_none(),
        "A self-comment must not create a notification"
    );

    let count = notification_orm::Entity::find()
        .count(&db)
        .await
        .expect("Failed to count notifications");
    assert_eq!(count, 0, "No notification rows should exist");

    cleanup_test_data(&db).await.expect("Failed to cleanup");
}

#[actix_rt::test]
#[serial]
async fn test_unread_count_and_mark_all_read() {
    let db = setup_test_database()
        .await
        .expect("Failed to connect to test database");
    cleanup_test_data(&db).await.expect("Failed to cleanup");

    let scaffold = create_post_scaffold(&db)
        .await
        .expect("Failed to create scaffold");

    for text in ["First!", "Second!", "Third!"] {
        let comment = create_test_comment(&db, scaffold.other.id, scaffold.post.id, text)
            .await
            .expect("Failed to create comment");
        notify_post_author(&comment, &scaffold.post)
            .await
            .expect("Failed to notify");
    }

    assert_eq!(
        count_unread_notifications(scaffold.author.id).await.unwrap(),
        3
    );
    assert_eq!(
        get_unread_notifications(scaffold.author.id)
            .await
            .unwrap()
            .len(),
        3
    );

    mark_all_read(scaffold.author.id)
        .await
        .expect("Failed to mark read");
    assert_eq!(
        count_unread_notifications(scaffold.author.id).await.unwrap(),
        0
    );

    // Marking twice in a row is safe.
    mark_all_read(scaffold.author.id)
        .await
        .expect("Second mark_all_read must not fail");
    assert_eq!(
        count_unread_notifications(scaffold.author.id).await.unwrap(),
        0
    );

    // The rows themselves survive, only the read flag flipped.
    let remaining = notification_orm::Entity::find()
        .filter(notification_orm::Column::UserId.eq(scaffold.author.id))
        .all(&db)
        .await
        .expect("Failed to fetch notifications");
    assert_eq!(remaining.len(), 3);
    assert!(remaining.iter().all(|n| n.is_read));

    cleanup_test_data(&db).await.expect("Failed to cleanup");
}
