//! Notification list.
//!
//! Serving the list is a side-effecting read: the viewer's unread set is
//! captured for the digest email, then everything is marked read before the
//! page renders. Reading the page twice in a row is safe.

use crate::middleware::ClientCtx;
use crate::notifications;
use crate::orm::notifications as notification_orm;
use actix_web::{error, get, Error, Responder};
use askama::Template;
use askama_actix::TemplateToResponse;

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(view_notifications);
}

/// Notification display struct for templates
struct NotificationDisplay {
    message: String,
    created_at: chrono::NaiveDateTime,
    /// Read state as it was when the page was requested, so entries that
    /// were just marked read still render as new once.
    was_unread: bool,
}

impl From<notification_orm::Model> for NotificationDisplay {
    fn from(n: notification_orm::Model) -> Self {
        Self {
            message: n.message,
            created_at: n.created_at,
            was_unread: !n.is_read,
        }
    }
}

#[derive(Template)]
#[template(path = "notifications.html")]
struct NotificationsTemplate {
    client: ClientCtx,
    notifications: Vec<NotificationDisplay>,
}

/// GET /notifications - View notification list, mark everything read
#[get("/notifications")]
pub async fn view_notifications(client: ClientCtx) -> Result<impl Responder, Error> {
    let user_id = client.require_login()?;
    let limit = crate::app_config::limits().notifications_per_page as u64;

    let items = notifications::get_user_notifications(user_id, limit)
        .await
        .map_err(error::ErrorInternalServerError)?;

    // Capture the full unread set for the digest before flipping read flags.
    let unread = notifications::get_unread_notifications(user_id)
        .await
        .map_err(error::ErrorInternalServerError)?;

    notifications::mark_all_read(user_id)
        .await
        .map_err(error::ErrorInternalServerError)?;

    if !unread.is_empty() {
        if let Some(user) = client.get_user().cloned() {
            // Delivery happens off-request; failures are logged by the digest
            // sender and never shown to the viewer.
            actix_web::rt::spawn(async move {
                if let Err(e) = crate::email::digest::send_digest_email(&user, &unread).await {
                    log::error!("Digest delivery failed for user {}: {}", user.id, e);
                }
            });
        }
    }

    let notification_displays: Vec<NotificationDisplay> =
        items.into_iter().map(Into::into).collect();

    Ok(NotificationsTemplate {
        client,
        notifications: notification_displays,
    }
    .to_response())
}
