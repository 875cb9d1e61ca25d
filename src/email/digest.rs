//! Notification digest email.
//!
//! Sent when a user opens their notifications page while unread entries
//! exist. Delivery failures are logged and retried with exponential backoff,
//! never surfaced to the request that triggered the digest.

use super::{send_email, EmailResult};
use crate::app_config;
use crate::orm::notifications;
use crate::user::Profile;
use std::time::Duration;

const MAX_ATTEMPTS: u32 = 3;

/// Render and send the unread-notifications digest for a user.
/// Retries transient SMTP failures up to `MAX_ATTEMPTS` times (1s, 2s, 4s).
pub async fn send_digest_email(
    user: &Profile,
    unread: &[notifications::Model],
) -> EmailResult<()> {
    if unread.is_empty() {
        return Ok(());
    }

    let site = app_config::site();
    let subject = format!(
        "You have {} new notifications on {}",
        unread.len(),
        site.name
    );

    let mut text = format!("Hello {}!\n\nYour unread notifications:\n\n", user.username);
    let mut items = String::new();
    for n in unread {
        text.push_str(&format!(
            "- {} ({})\n",
            n.message,
            n.created_at.format("%Y-%m-%d %H:%M")
        ));
        items.push_str(&format!(
            "<li>{} &mdash; {}</li>",
            n.message,
            n.created_at.format("%Y-%m-%d %H:%M")
        ));
    }
    text.push_str(&format!("\nView them all: {}/notifications\n", site.base_url));

    let html = format!(
        "<html><body>\
         <h2>Hello {}!</h2>\
         <p>You have {} unread notifications:</p>\
         <ul>{}</ul>\
         <p><a href=\"{}/notifications\">View all</a> | <a href=\"{}/\">Back to the board</a></p>\
         </body></html>",
        user.username,
        unread.len(),
        items,
        site.base_url,
        site.base_url
    );

    let mut attempt = 0;
    loop {
        match send_email(&user.email, &subject, &text, Some(&html)).await {
            Ok(()) => return Ok(()),
            Err(e) => {
                attempt += 1;
                if attempt >= MAX_ATTEMPTS {
                    return Err(e);
                }
                log::warn!(
                    "Digest delivery attempt {} of {} failed for user {}: {}",
                    attempt,
                    MAX_ATTEMPTS,
                    user.id,
                    e
                );
                actix_web::rt::time::sleep(Duration::from_secs(1 << (attempt - 1))).await;
            }
        }
    }
}
