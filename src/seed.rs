//! Boot-time default data.

use crate::db::get_db_pool;
use crate::orm::categories;
use sea_orm::{entity::*, query::*, DbErr};

/// Default category set for a fresh installation.
const DEFAULT_CATEGORIES: [(&str, &str); 4] = [
    ("Programming", "programming"),
    ("AI", "ai"),
    ("Web Dev", "web-dev"),
    ("General", "general"),
];

/// Seed default categories when the table is empty.
/// Safe to call on every boot.
pub async fn seed_default_categories() -> Result<(), DbErr> {
    let db = get_db_pool();

    let existing = categories::Entity::find().count(db).await?;
    if existing > 0 {
        return Ok(());
    }

    for (name, slug) in DEFAULT_CATEGORIES {
        categories::ActiveModel {
            name: Set(name.to_string()),
            slug: Set(slug.to_string()),
            ..Default::default()
        }
        .insert(db)
        .await?;
    }

    log::info!("Seeded {} default categories", DEFAULT_CATEGORIES.len());

    Ok(())
}
