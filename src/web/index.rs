//! Post feed and post submission.

use crate::db::get_db_pool;
use crate::middleware::ClientCtx;
use crate::orm::{categories, posts};
use actix_web::{error, get, post, web, Error, HttpResponse, Responder};
use askama::Template;
use askama_actix::TemplateToResponse;
use chrono::Utc;
use sea_orm::{
    entity::*, query::*, DatabaseConnection, DbBackend, DbErr, FromQueryResult, Statement,
};
use serde::Deserialize;

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(view_index)
        .service(create_post)
        .service(view_category);
}

/// A fully joined row for feed rendering: the post, its author and category,
/// and the derived score and comment count.
#[derive(Debug, FromQueryResult)]
pub struct PostFeedItem {
    pub id: i32,
    pub title: String,
    pub image_path: Option<String>,
    pub created_at: chrono::NaiveDateTime,
    pub user_id: i32,
    pub username: String,
    pub category_id: i32,
    pub category_name: String,
    pub category_slug: String,
    pub score: i64,
    pub comment_count: i64,
}

/// Optional narrowing of the feed query. Empty filter is the front page.
#[derive(Debug, Default)]
pub struct FeedFilter {
    pub title_query: Option<String>,
    pub category_id: Option<i32>,
    pub user_id: Option<i32>,
    pub post_id: Option<i32>,
}

/// Fetch feed rows newest-first. Score and comment count are computed from
/// their source tables inside the query, never read from a counter.
pub async fn feed_items(
    db: &DatabaseConnection,
    filter: &FeedFilter,
) -> Result<Vec<PostFeedItem>, DbErr> {
    let mut sql = String::from(
        r#"SELECT p.id, p.title, p.image_path, p.created_at, p.user_id, u.username,
       p.category_id, c.name AS category_name, c.slug AS category_slug,
       COALESCE((SELECT SUM(v.value) FROM post_votes v WHERE v.post_id = p.id), 0)::bigint AS score,
       (SELECT COUNT(*) FROM comments cm WHERE cm.post_id = p.id) AS comment_count
  FROM posts p
  JOIN users u ON u.id = p.user_id
  JOIN categories c ON c.id = p.category_id"#,
    );

    let mut clauses: Vec<String> = Vec::new();
    let mut values: Vec<sea_orm::Value> = Vec::new();

    if let Some(q) = &filter.title_query {
        values.push(format!("%{}%", q).into());
        clauses.push(format!("p.title ILIKE ${}", values.len()));
    }
    if let Some(category_id) = filter.category_id {
        values.push(category_id.into());
        clauses.push(format!("p.category_id = ${}", values.len()));
    }
    if let Some(user_id) = filter.user_id {
        values.push(user_id.into());
        clauses.push(format!("p.user_id = ${}", values.len()));
    }
    if let Some(post_id) = filter.post_id {
        values.push(post_id.into());
        clauses.push(format!("p.id = ${}", values.len()));
    }

    if !clauses.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }

    sql.push_str(" ORDER BY p.created_at DESC, p.id DESC");

    PostFeedItem::find_by_statement(Statement::from_sql_and_values(
        DbBackend::Postgres,
        &sql,
        values,
    ))
    .all(db)
    .await
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub client: ClientCtx,
    pub posts: Vec<PostFeedItem>,
    pub categories: Vec<categories::Model>,
    /// The active search query; empty when not searching.
    pub query: String,
    /// The active category name; empty on the front page.
    pub active_category: String,
}

pub async fn all_categories(db: &DatabaseConnection) -> Result<Vec<categories::Model>, DbErr> {
    categories::Entity::find()
        .order_by_asc(categories::Column::Name)
        .all(db)
        .await
}

#[get("/")]
pub async fn view_index(client: ClientCtx) -> Result<impl Responder, Error> {
    client.require_login()?;
    let db = get_db_pool();

    let posts = feed_items(db, &FeedFilter::default())
        .await
        .map_err(error::ErrorInternalServerError)?;
    let categories = all_categories(db)
        .await
        .map_err(error::ErrorInternalServerError)?;

    Ok(IndexTemplate {
        client,
        posts,
        categories,
        query: String::new(),
        active_category: String::new(),
    }
    .to_response())
}

#[derive(Deserialize)]
pub struct NewPostFormData {
    pub csrf_token: String,
    pub title: String,
    pub category_id: i32,
    #[serde(default)]
    pub image_path: Option<String>,
}

#[post("/")]
pub async fn create_post(
    client: ClientCtx,
    cookies: actix_session::Session,
    form: web::Form<NewPostFormData>,
) -> Result<impl Responder, Error> {
    let user_id = client.require_login()?;
    crate::middleware::csrf::validate_csrf_token(&cookies, &form.csrf_token)?;

    let title = form.title.trim();
    if title.is_empty() {
        return Err(error::ErrorBadRequest("A title is required."));
    }

    let db = get_db_pool();

    categories::Entity::find_by_id(form.category_id)
        .one(db)
        .await
        .map_err(error::ErrorInternalServerError)?
        .ok_or_else(|| error::ErrorNotFound("Category not found."))?;

    let image_path = form
        .image_path
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string);

    let post = posts::ActiveModel {
        title: Set(title.to_string()),
        image_path: Set(image_path),
        created_at: Set(Utc::now().naive_utc()),
        user_id: Set(user_id),
        category_id: Set(form.category_id),
        ..Default::default()
    };
    let post = post
        .insert(db)
        .await
        .map_err(error::ErrorInternalServerError)?;

    log::info!("Post {} created by user {}", post.id, user_id);

    Ok(HttpResponse::Found()
        .append_header(("Location", "/"))
        .finish())
}

#[get("/categories/{slug}")]
pub async fn view_category(
    client: ClientCtx,
    path: web::Path<String>,
) -> Result<impl Responder, Error> {
    client.require_login()?;
    let slug = path.into_inner();
    let db = get_db_pool();

    let category = categories::Entity::find()
        .filter(categories::Column::Slug.eq(slug))
        .one(db)
        .await
        .map_err(error::ErrorInternalServerError)?
        .ok_or_else(|| error::ErrorNotFound("Category not found."))?;

    let posts = feed_items(
        db,
        &FeedFilter {
            category_id: Some(category.id),
            ..Default::default()
        },
    )
    .await
    .map_err(error::ErrorInternalServerError)?;
    let categories = all_categories(db)
        .await
        .map_err(error::ErrorInternalServerError)?;

    Ok(IndexTemplate {
        client,
        posts,
        categories,
        query: String::new(),
        active_category: category.name,
    }
    .to_response())
}
