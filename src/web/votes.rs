//! Post voting endpoint.

use crate::middleware::ClientCtx;
use crate::votes::{apply_vote, VoteError};
use actix_web::{error, post, web, Error, HttpResponse};
use serde::{Deserialize, Serialize};

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(submit_vote);
}

#[derive(Deserialize)]
pub struct VoteRequest {
    pub value: i32,
    pub csrf_token: String,
}

#[derive(Serialize)]
struct VoteResponse {
    success: bool,
    score: i64,
}

/// Submit, toggle, or switch a vote on a post. Returns the recomputed score.
#[post("/posts/{post_id}/vote")]
pub async fn submit_vote(
    client: ClientCtx,
    session: actix_session::Session,
    path: web::Path<i32>,
    body: web::Json<VoteRequest>,
) -> Result<HttpResponse, Error> {
    let user_id = client.require_login()?;
    crate::middleware::csrf::validate_csrf_token(&session, &body.csrf_token)?;

    let post_id = path.into_inner();

    let score = apply_vote(user_id, post_id, body.value)
        .await
        .map_err(|e| match e {
            VoteError::InvalidValue(_) => error::ErrorBadRequest(e.to_string()),
            VoteError::PostNotFound => error::ErrorNotFound("Post not found."),
            VoteError::Conflict => error::ErrorConflict(e.to_string()),
            VoteError::Db(db_err) => {
                log::error!("submit_vote: {}", db_err);
                error::ErrorInternalServerError("Vote could not be recorded.")
            }
        })?;

    Ok(HttpResponse::Ok().json(VoteResponse {
        success: true,
        score,
    }))
}
