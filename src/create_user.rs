use crate::db::get_db_pool;
use crate::middleware::ClientCtx;
use crate::orm::users;
use crate::session::get_argon2;
use actix_web::{error, get, post, web, Error, HttpResponse, Responder};
use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    PasswordHasher,
};
use askama::Template;
use askama_actix::TemplateToResponse;
use chrono::Utc;
use sea_orm::{entity::*, query::*, DbErr, QueryFilter};
use serde::Deserialize;
use validator::Validate;

#[derive(Template)]
#[template(path = "create_user.html")]
pub struct CreateUserTemplate {
    pub client: ClientCtx,
}

#[derive(Deserialize, Validate)]
pub struct FormData {
    pub csrf_token: String,
    #[validate(length(min = 1, max = 80))]
    username: String,
    #[validate(length(min = 8, max = 1000))]
    password: String,
    #[validate(email)]
    email: String,
}

async fn insert_new_user(name: &str, pass: &str, email: &str) -> Result<users::Model, DbErr> {
    let db = get_db_pool();

    let user = users::ActiveModel {
        username: Set(name.to_owned()),
        email: Set(email.to_owned()),
        password: Set(pass.to_owned()),
        bio: Set(None),
        is_admin: Set(false),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default() // all other attributes are `Unset`
    };

    user.insert(db).await
}

#[get("/create_user")]
pub async fn create_user_get(client: ClientCtx) -> impl Responder {
    CreateUserTemplate { client }.to_response()
}

#[post("/create_user")]
pub async fn create_user_post(
    cookies: actix_session::Session,
    form: web::Form<FormData>,
) -> Result<HttpResponse, Error> {
    crate::middleware::csrf::validate_csrf_token(&cookies, &form.csrf_token)?;

    if !crate::app_config::site().registration_enabled {
        return Err(error::ErrorForbidden("Registration is currently disabled."));
    }

    // Validate form input
    form.validate().map_err(|e| {
        log::debug!("User registration validation failed: {}", e);
        error::ErrorBadRequest("Invalid registration data")
    })?;

    // Sanitize inputs
    let username = form.username.trim();
    let email = form.email.trim().to_lowercase();
    let db = get_db_pool();

    let name_taken = users::Entity::find()
        .filter(users::Column::Username.eq(username))
        .one(db)
        .await
        .map_err(error::ErrorInternalServerError)?
        .is_some();
    if name_taken {
        return Err(error::ErrorBadRequest("Username taken!"));
    }

    let email_taken = users::Entity::find()
        .filter(users::Column::Email.eq(email.clone()))
        .one(db)
        .await
        .map_err(error::ErrorInternalServerError)?
        .is_some();
    if email_taken {
        return Err(error::ErrorBadRequest("Email taken!"));
    }

    // Hash password
    let password_hash = get_argon2()
        .hash_password(form.password.as_bytes(), &SaltString::generate(&mut OsRng))
        .map_err(|e| {
            log::error!("Failed to hash password: {}", e);
            error::ErrorInternalServerError("Failed to create user")
        })?
        .to_string();

    let user = insert_new_user(username, &password_hash, &email)
        .await
        .map_err(|e| {
            log::error!("Failed to create user: {}", e);
            error::ErrorInternalServerError("Failed to create user")
        })?;

    log::info!("New user registered: {} (user_id: {})", username, user.id);

    Ok(HttpResponse::Found()
        .append_header(("Location", "/login"))
        .finish())
}
