//! Session authentication.
//!
//! Sessions are UUID tokens handed to the client in the session cookie and
//! persisted in the `sessions` table, with a `DashMap` cache in front so a
//! request does not hit the database for every lookup. Password hashing uses
//! Argon2id peppered with the `SALT` environment variable.

use crate::db::get_db_pool;
use crate::orm::sessions;
use crate::user::Profile;
use argon2::{Algorithm, Argon2, Params, Version};
use chrono::{Duration, NaiveDateTime, Utc};
use dashmap::DashMap;
use once_cell::sync::OnceCell;
use sea_orm::{entity::*, query::*, DbErr};
use uuid::Uuid;

/// Cached row from the sessions table.
#[derive(Copy, Clone, Debug)]
pub struct SessionRecord {
    pub user_id: i32,
    pub expires_at: NaiveDateTime,
}

impl SessionRecord {
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now().naive_utc()
    }
}

pub type SessionMap = DashMap<Uuid, SessionRecord>;

static SALT: OnceCell<String> = OnceCell::new();
static ARGON2: OnceCell<Argon2<'static>> = OnceCell::new();
static SESSIONS: OnceCell<SessionMap> = OnceCell::new();

/// Initialize the password hasher and the session cache.
/// Panics if SALT is unset or rejected by argon2.
pub fn init() {
    let salt = SALT.get_or_init(|| std::env::var("SALT").expect("SALT must be set."));

    if ARGON2
        .set(
            Argon2::new_with_secret(
                salt.as_bytes(),
                Algorithm::Argon2id,
                Version::V0x13,
                Params::default(),
            )
            .expect("SALT was rejected as an Argon2 secret."),
        )
        .is_err()
    {
        panic!("session::init() called more than once.");
    }

    SESSIONS
        .set(DashMap::new())
        .expect("session::init() called more than once.");
}

pub fn get_argon2() -> &'static Argon2<'static> {
    ARGON2
        .get()
        .expect("Argon2 requested before session::init().")
}

pub fn get_sess() -> &'static SessionMap {
    SESSIONS
        .get()
        .expect("Session cache requested before session::init().")
}

/// Create a session for a user, persist it, and return its token.
pub async fn new_session(ses: &SessionMap, user_id: i32) -> Result<Uuid, DbErr> {
    let db = get_db_pool();
    let uuid = Uuid::new_v4();
    let expires_at = Utc::now().naive_utc()
        + Duration::minutes(crate::app_config::security().session_timeout_minutes as i64);

    sessions::ActiveModel {
        id: Set(uuid.to_string()),
        user_id: Set(user_id),
        expires_at: Set(expires_at),
    }
    .insert(db)
    .await?;

    ses.insert(
        uuid,
        SessionRecord {
            user_id,
            expires_at,
        },
    );

    Ok(uuid)
}

/// Look up a session by token, falling back to the database on a cache miss.
pub async fn authenticate_by_uuid(ses: &SessionMap, uuid: Uuid) -> Option<SessionRecord> {
    if let Some(record) = ses.get(&uuid) {
        if record.is_expired() {
            drop(record);
            ses.remove(&uuid);
            return None;
        }
        return Some(*record);
    }

    // Cache miss. The row may still exist from a previous process lifetime.
    let row = match sessions::Entity::find_by_id(uuid.to_string())
        .one(get_db_pool())
        .await
    {
        Ok(row) => row?,
        Err(e) => {
            log::error!("authenticate_by_uuid: {}", e);
            return None;
        }
    };

    let record = SessionRecord {
        user_id: row.user_id,
        expires_at: row.expires_at,
    };

    if record.is_expired() {
        return None;
    }

    ses.insert(uuid, record);
    Some(record)
}

/// Resolve the session token stored in the client's cookie jar.
pub async fn authenticate_by_cookie(
    cookies: &actix_session::Session,
) -> Option<(Uuid, SessionRecord)> {
    let token = match cookies.get::<String>("token") {
        Ok(Some(token)) => token,
        Ok(None) => return None,
        Err(e) => {
            log::debug!("authenticate_by_cookie: cookies.get() {}", e);
            return None;
        }
    };

    let uuid = match Uuid::parse_str(&token) {
        Ok(uuid) => uuid,
        Err(e) => {
            log::debug!("authenticate_by_cookie: parse_str() {}", e);
            return None;
        }
    };

    authenticate_by_uuid(get_sess(), uuid)
        .await
        .map(|record| (uuid, record))
}

/// Resolve the acting user's profile from the session cookie, if any.
pub async fn authenticate_client_by_session(cookies: &actix_session::Session) -> Option<Profile> {
    let (_, record) = authenticate_by_cookie(cookies).await?;

    match Profile::get_by_id(get_db_pool(), record.user_id).await {
        Ok(profile) => profile,
        Err(e) => {
            log::error!("authenticate_client_by_session: {}", e);
            None
        }
    }
}

/// Delete a session from the database and the cache.
pub async fn remove_session(ses: &SessionMap, uuid: Uuid) -> Result<(), DbErr> {
    sessions::Entity::delete_by_id(uuid.to_string())
        .exec(get_db_pool())
        .await?;
    ses.remove(&uuid);
    Ok(())
}

/// Purge expired sessions. Returns how many rows were deleted.
pub async fn expire_sessions() -> Result<u64, DbErr> {
    let now = Utc::now().naive_utc();

    let result = sessions::Entity::delete_many()
        .filter(sessions::Column::ExpiresAt.lte(now))
        .exec(get_db_pool())
        .await?;

    get_sess().retain(|_, record| record.expires_at > now);

    Ok(result.rows_affected)
}
