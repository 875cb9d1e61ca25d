//! Post search by title and category.

use super::index::{all_categories, feed_items, FeedFilter, IndexTemplate};
use crate::db::get_db_pool;
use crate::middleware::ClientCtx;
use actix_web::{error, get, web, Error, Responder};
use askama_actix::TemplateToResponse;
use serde::Deserialize;

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(search_posts);
}

/// Form data for search query
#[derive(Deserialize)]
struct SearchQuery {
    q: Option<String>,
    category: Option<i32>,
}

/// GET /search?q=query&category=id - Filter the feed by title and category
#[get("/search")]
pub async fn search_posts(
    client: ClientCtx,
    query: web::Query<SearchQuery>,
) -> Result<impl Responder, Error> {
    client.require_login()?;
    let db = get_db_pool();

    let title_query = query
        .q
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(str::to_string);

    let posts = feed_items(
        db,
        &FeedFilter {
            title_query: title_query.clone(),
            category_id: query.category,
            ..Default::default()
        },
    )
    .await
    .map_err(error::ErrorInternalServerError)?;

    let categories = all_categories(db)
        .await
        .map_err(error::ErrorInternalServerError)?;

    let active_category = query
        .category
        .and_then(|id| categories.iter().find(|c| c.id == id))
        .map(|c| c.name.clone())
        .unwrap_or_default();

    Ok(IndexTemplate {
        client,
        posts,
        categories,
        query: title_query.unwrap_or_default(),
        active_category,
    }
    .to_response())
}
