//! Member profiles: posts, derived karma, and bio editing.

use super::index::{feed_items, FeedFilter, PostFeedItem};
use crate::db::get_db_pool;
use crate::middleware::ClientCtx;
use crate::orm::users;
use crate::user::Profile;
use actix_web::{error, get, post, web, Error, HttpResponse, Responder};
use askama::Template;
use askama_actix::TemplateToResponse;
use sea_orm::{entity::*, query::*, sea_query::Expr};
use serde::Deserialize;

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(view_member).service(update_bio);
}

struct MemberDisplay {
    username: String,
    bio: String,
    member_since: chrono::NaiveDateTime,
}

#[derive(Template)]
#[template(path = "member.html")]
struct MemberTemplate {
    client: ClientCtx,
    member: MemberDisplay,
    karma: i64,
    posts: Vec<PostFeedItem>,
    is_self: bool,
}

#[get("/members/{username}")]
pub async fn view_member(
    client: ClientCtx,
    path: web::Path<String>,
) -> Result<impl Responder, Error> {
    client.require_login()?;
    let username = path.into_inner();
    let db = get_db_pool();

    let profile = Profile::get_by_username(db, &username)
        .await
        .map_err(|e| {
            log::error!("view_member: {}", e);
            error::ErrorInternalServerError("Couldn't load user.")
        })?
        .ok_or_else(|| error::ErrorNotFound("User not found."))?;

    let karma = crate::votes::user_karma(profile.id)
        .await
        .map_err(error::ErrorInternalServerError)?;

    let posts = feed_items(
        db,
        &FeedFilter {
            user_id: Some(profile.id),
            ..Default::default()
        },
    )
    .await
    .map_err(error::ErrorInternalServerError)?;

    let is_self = client.get_id() == Some(profile.id);

    Ok(MemberTemplate {
        client,
        member: MemberDisplay {
            username: profile.username,
            bio: profile.bio.unwrap_or_default(),
            member_since: profile.created_at,
        },
        karma,
        posts,
        is_self,
    }
    .to_response())
}

#[derive(Deserialize)]
pub struct BioFormData {
    pub csrf_token: String,
    pub bio: String,
}

#[post("/members/{username}/bio")]
pub async fn update_bio(
    client: ClientCtx,
    cookies: actix_session::Session,
    path: web::Path<String>,
    form: web::Form<BioFormData>,
) -> Result<impl Responder, Error> {
    crate::middleware::csrf::validate_csrf_token(&cookies, &form.csrf_token)?;

    let username = path.into_inner();
    let db = get_db_pool();

    let profile = Profile::get_by_username(db, &username)
        .await
        .map_err(error::ErrorInternalServerError)?
        .ok_or_else(|| error::ErrorNotFound("User not found."))?;

    // Only the profile's owner may change its bio.
    client.require_ownership(profile.id)?;

    let bio = form.bio.trim();
    let max_length = crate::app_config::limits().max_bio_length as usize;
    if bio.len() > max_length {
        return Err(error::ErrorBadRequest(format!(
            "Bios are limited to {} characters.",
            max_length
        )));
    }

    let bio = if bio.is_empty() {
        Option::<String>::None
    } else {
        Some(bio.to_string())
    };

    users::Entity::update_many()
        .col_expr(users::Column::Bio, Expr::value(bio))
        .filter(users::Column::Id.eq(profile.id))
        .exec(db)
        .await
        .map_err(error::ErrorInternalServerError)?;

    Ok(HttpResponse::Found()
        .append_header(("Location", format!("/members/{}", username)))
        .finish())
}
