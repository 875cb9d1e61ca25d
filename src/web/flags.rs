//! Abuse flag submission endpoints.

use crate::middleware::ClientCtx;
use crate::moderation::{flag_target, FlagError, FlagTarget};
use actix_web::{error, post, web, Error, HttpResponse, Responder};
use serde::Deserialize;

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(flag_post).service(flag_comment);
}

#[derive(Deserialize)]
pub struct FlagFormData {
    pub csrf_token: String,
    pub reason: String,
}

fn map_flag_error(e: FlagError) -> Error {
    match e {
        FlagError::EmptyReason => error::ErrorBadRequest("A reason is required."),
        FlagError::TargetNotFound => error::ErrorNotFound("Flagged content not found."),
        FlagError::Db(db_err) => {
            log::error!("flag submission: {}", db_err);
            error::ErrorInternalServerError("Flag could not be recorded.")
        }
    }
}

#[post("/posts/{post_id}/flag")]
pub async fn flag_post(
    client: ClientCtx,
    cookies: actix_session::Session,
    path: web::Path<i32>,
    form: web::Form<FlagFormData>,
) -> Result<impl Responder, Error> {
    let user_id = client.require_login()?;
    crate::middleware::csrf::validate_csrf_token(&cookies, &form.csrf_token)?;

    let post_id = path.into_inner();
    flag_target(user_id, FlagTarget::Post(post_id), &form.reason)
        .await
        .map_err(map_flag_error)?;

    Ok(HttpResponse::Found()
        .append_header(("Location", format!("/posts/{}", post_id)))
        .finish())
}

#[post("/comments/{comment_id}/flag")]
pub async fn flag_comment(
    client: ClientCtx,
    cookies: actix_session::Session,
    path: web::Path<i32>,
    form: web::Form<FlagFormData>,
) -> Result<impl Responder, Error> {
    let user_id = client.require_login()?;
    crate::middleware::csrf::validate_csrf_token(&cookies, &form.csrf_token)?;

    flag_target(user_id, FlagTarget::Comment(path.into_inner()), &form.reason)
        .await
        .map_err(map_flag_error)?;

    Ok(HttpResponse::Found()
        .append_header(("Location", "/"))
        .finish())
}
