//! Admin dashboard: flag queue and content deletion.

use crate::db::get_db_pool;
use crate::middleware::ClientCtx;
use crate::orm::{comments, flags, posts, users};
use actix_web::{error, get, post, web, Error, HttpResponse, Responder};
use askama::Template;
use askama_actix::TemplateToResponse;
use sea_orm::{entity::*, query::*, DatabaseConnection, DbErr};
use serde::Deserialize;

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(view_admin)
        .service(delete_post)
        .service(delete_comment);
}

struct FlagView {
    reporter_name: String,
    reason: String,
    created_at: chrono::NaiveDateTime,
    target_id: i32,
    target_preview: String,
}

#[derive(Template)]
#[template(path = "admin.html")]
struct AdminTemplate {
    client: ClientCtx,
    flagged_posts: Vec<FlagView>,
    flagged_comments: Vec<FlagView>,
}

async fn reporter_name(db: &DatabaseConnection, user_id: i32) -> Result<String, DbErr> {
    Ok(users::Entity::find_by_id(user_id)
        .one(db)
        .await?
        .map(|u| u.username)
        .unwrap_or_else(|| "Unknown".to_string()))
}

/// GET /admin - Flag queue (admins only)
#[get("/admin")]
pub async fn view_admin(client: ClientCtx) -> Result<impl Responder, Error> {
    client.require_admin()?;
    let db = get_db_pool();

    let flag_rows = flags::Entity::find()
        .order_by_desc(flags::Column::CreatedAt)
        .all(db)
        .await
        .map_err(error::ErrorInternalServerError)?;

    let mut flagged_posts = Vec::new();
    let mut flagged_comments = Vec::new();

    for flag in flag_rows {
        let reporter_name = reporter_name(db, flag.user_id)
            .await
            .map_err(error::ErrorInternalServerError)?;

        if let Some(post_id) = flag.post_id {
            let target_preview = posts::Entity::find_by_id(post_id)
                .one(db)
                .await
                .map_err(error::ErrorInternalServerError)?
                .map(|p| p.title)
                .unwrap_or_else(|| "Post deleted".to_string());

            flagged_posts.push(FlagView {
                reporter_name,
                reason: flag.reason,
                created_at: flag.created_at,
                target_id: post_id,
                target_preview,
            });
        } else if let Some(comment_id) = flag.comment_id {
            let target_preview = comments::Entity::find_by_id(comment_id)
                .one(db)
                .await
                .map_err(error::ErrorInternalServerError)?
                .map(|c| c.text)
                .unwrap_or_else(|| "Comment deleted".to_string());

            flagged_comments.push(FlagView {
                reporter_name,
                reason: flag.reason,
                created_at: flag.created_at,
                target_id: comment_id,
                target_preview,
            });
        }
    }

    Ok(AdminTemplate {
        client,
        flagged_posts,
        flagged_comments,
    }
    .to_response())
}

#[derive(Deserialize)]
pub struct DeleteFormData {
    pub csrf_token: String,
}

/// POST /admin/posts/{id}/delete - Cascading post deletion (admins only)
#[post("/admin/posts/{post_id}/delete")]
pub async fn delete_post(
    client: ClientCtx,
    cookies: actix_session::Session,
    path: web::Path<i32>,
    form: web::Form<DeleteFormData>,
) -> Result<impl Responder, Error> {
    let admin_id = client.require_admin()?;
    crate::middleware::csrf::validate_csrf_token(&cookies, &form.csrf_token)?;

    let post_id = path.into_inner();
    let db = get_db_pool();

    posts::Entity::find_by_id(post_id)
        .one(db)
        .await
        .map_err(error::ErrorInternalServerError)?
        .ok_or_else(|| error::ErrorNotFound("Post not found."))?;

    crate::moderation::delete_post(post_id)
        .await
        .map_err(error::ErrorInternalServerError)?;

    log::info!("Admin {} deleted post {}", admin_id, post_id);

    Ok(HttpResponse::Found()
        .append_header(("Location", "/admin"))
        .finish())
}

/// POST /admin/comments/{id}/delete - Comment deletion (admins only)
#[post("/admin/comments/{comment_id}/delete")]
pub async fn delete_comment(
    client: ClientCtx,
    cookies: actix_session::Session,
    path: web::Path<i32>,
    form: web::Form<DeleteFormData>,
) -> Result<impl Responder, Error> {
    let admin_id = client.require_admin()?;
    crate::middleware::csrf::validate_csrf_token(&cookies, &form.csrf_token)?;

    let comment_id = path.into_inner();
    let db = get_db_pool();

    comments::Entity::find_by_id(comment_id)
        .one(db)
        .await
        .map_err(error::ErrorInternalServerError)?
        .ok_or_else(|| error::ErrorNotFound("Comment not found."))?;

    crate::moderation::delete_comment(comment_id)
        .await
        .map_err(error::ErrorInternalServerError)?;

    log::info!("Admin {} deleted comment {}", admin_id, comment_id);

    Ok(HttpResponse::Found()
        .append_header(("Location", "/admin"))
        .finish())
}
