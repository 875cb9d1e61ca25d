//! Single post view and comment submission.

use super::index::{feed_items, FeedFilter, PostFeedItem};
use crate::db::get_db_pool;
use crate::middleware::ClientCtx;
use crate::orm::{comments, posts, users};
use actix_web::{error, get, post, web, Error, HttpResponse, Responder};
use askama::Template;
use askama_actix::TemplateToResponse;
use chrono::Utc;
use sea_orm::{entity::*, query::*};
use serde::Deserialize;

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(view_post).service(create_comment);
}

struct CommentDisplay {
    id: i32,
    text: String,
    username: String,
    created_at: chrono::NaiveDateTime,
}

#[derive(Template)]
#[template(path = "post.html")]
struct PostTemplate {
    client: ClientCtx,
    post: PostFeedItem,
    comments: Vec<CommentDisplay>,
    /// The viewer's current vote on this post: +1, -1, or 0 for none.
    user_vote: i32,
}

#[get("/posts/{post_id}")]
pub async fn view_post(client: ClientCtx, path: web::Path<i32>) -> Result<impl Responder, Error> {
    let user_id = client.require_login()?;
    let post_id = path.into_inner();
    let db = get_db_pool();

    let post = feed_items(
        db,
        &FeedFilter {
            post_id: Some(post_id),
            ..Default::default()
        },
    )
    .await
    .map_err(error::ErrorInternalServerError)?
    .into_iter()
    .next()
    .ok_or_else(|| error::ErrorNotFound("Post not found."))?;

    let comment_rows = comments::Entity::find()
        .filter(comments::Column::PostId.eq(post_id))
        .find_also_related(users::Entity)
        .order_by_asc(comments::Column::CreatedAt)
        .all(db)
        .await
        .map_err(error::ErrorInternalServerError)?;

    let comments = comment_rows
        .into_iter()
        .map(|(comment, author)| CommentDisplay {
            id: comment.id,
            text: comment.text,
            username: author
                .map(|u| u.username)
                .unwrap_or_else(|| "Unknown".to_string()),
            created_at: comment.created_at,
        })
        .collect();

    let user_vote = crate::votes::find_user_vote(user_id, post_id)
        .await
        .map_err(error::ErrorInternalServerError)?
        .map(|v| v.value)
        .unwrap_or(0);

    Ok(PostTemplate {
        client,
        post,
        comments,
        user_vote,
    }
    .to_response())
}

#[derive(Deserialize)]
pub struct CommentFormData {
    pub csrf_token: String,
    pub comment: String,
}

#[post("/posts/{post_id}/comments")]
pub async fn create_comment(
    client: ClientCtx,
    cookies: actix_session::Session,
    path: web::Path<i32>,
    form: web::Form<CommentFormData>,
) -> Result<impl Responder, Error> {
    let user_id = client.require_login()?;
    crate::middleware::csrf::validate_csrf_token(&cookies, &form.csrf_token)?;

    let text = form.comment.trim();
    if text.is_empty() {
        return Err(error::ErrorBadRequest("Comment text is required."));
    }

    let max_length = crate::app_config::limits().max_comment_length as usize;
    if text.len() > max_length {
        return Err(error::ErrorBadRequest(format!(
            "Comments are limited to {} characters.",
            max_length
        )));
    }

    let post_id = path.into_inner();
    let db = get_db_pool();

    let post = posts::Entity::find_by_id(post_id)
        .one(db)
        .await
        .map_err(error::ErrorInternalServerError)?
        .ok_or_else(|| error::ErrorNotFound("Post not found."))?;

    let comment = comments::ActiveModel {
        text: Set(text.to_string()),
        created_at: Set(Utc::now().naive_utc()),
        user_id: Set(user_id),
        post_id: Set(post_id),
        ..Default::default()
    };
    let comment = comment
        .insert(db)
        .await
        .map_err(error::ErrorInternalServerError)?;

    // Tell the post's author, unless they are commenting on their own post.
    crate::notifications::notify_post_author(&comment, &post)
        .await
        .map_err(error::ErrorInternalServerError)?;

    Ok(HttpResponse::Found()
        .append_header(("Location", format!("/posts/{}", post_id)))
        .finish())
}
