use crate::db::get_db_pool;
use crate::middleware::ClientCtx;
use crate::orm::users;
use crate::session;
use crate::session::{get_argon2, get_sess};
use actix_web::{error, get, post, web, Error, HttpResponse, Responder};
use argon2::password_hash::{PasswordHash, PasswordVerifier};
use askama::Template;
use askama_actix::TemplateToResponse;
use sea_orm::{entity::*, query::*, DbErr, QueryFilter};
use serde::Deserialize;

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(post_login).service(view_login);
}

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub client: ClientCtx,
}

#[derive(Deserialize)]
pub struct FormData {
    username: String,
    password: String,
}

/// Verify credentials. Returns the user id on success, None on a bad
/// username or password; the two failures are indistinguishable to callers
/// so responses cannot enumerate usernames.
pub async fn login(name: &str, pass: &str) -> Result<Option<i32>, DbErr> {
    let db = get_db_pool();

    let user = match users::Entity::find()
        .filter(users::Column::Username.eq(name))
        .one(db)
        .await?
    {
        Some(user) => user,
        None => return Ok(None),
    };

    let parsed_hash = PasswordHash::new(&user.password)
        .map_err(|e| DbErr::Custom(format!("Corrupt password hash for user {}: {}", user.id, e)))?;

    if get_argon2()
        .verify_password(pass.as_bytes(), &parsed_hash)
        .is_err()
    {
        return Ok(None);
    }

    Ok(Some(user.id))
}

#[post("/login")]
pub async fn post_login(
    cookies: actix_session::Session,
    form: web::Form<FormData>,
) -> Result<impl Responder, Error> {
    let user_id = login(&form.username, &form.password).await.map_err(|e| {
        log::error!("post_login: {}", e);
        error::ErrorInternalServerError("DB error")
    })?;

    let user_id = match user_id {
        Some(user_id) => user_id,
        None => {
            log::debug!("login failure for {}", form.username);
            return Err(error::ErrorUnauthorized("Invalid username or password."));
        }
    };

    let uuid = session::new_session(get_sess(), user_id)
        .await
        .map_err(|e| {
            log::error!("post_login: new_session() {}", e);
            error::ErrorInternalServerError("DB error")
        })?;

    cookies
        .insert("logged_in", true)
        .map_err(|_| error::ErrorInternalServerError("middleware error"))?;

    cookies
        .insert("token", uuid.to_string())
        .map_err(|_| error::ErrorInternalServerError("middleware error"))?;

    log::info!("User {} logged in", user_id);

    Ok(HttpResponse::Found()
        .append_header(("Location", "/"))
        .finish())
}

#[get("/login")]
pub async fn view_login(client: ClientCtx) -> Result<impl Responder, Error> {
    if client.is_user() {
        return Ok(HttpResponse::Found()
            .append_header(("Location", "/"))
            .finish());
    }

    Ok(LoginTemplate { client }.to_response())
}
