//! SeaORM entities, one module per table.

pub mod categories;
pub mod comments;
pub mod flags;
pub mod notifications;
pub mod post_votes;
pub mod posts;
pub mod sessions;
pub mod users;
