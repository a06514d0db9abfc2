//! Fake catalogue data for development databases.

pub mod content;
pub mod models;
pub mod taxonomy;

use std::time::Instant;

use sqlx::PgPool;

use crate::admin::CliResult;
pub use models::SeedConfig;

/// Seeds categories and tags, then content linked to them.
pub async fn seed_all(db: &PgPool, config: SeedConfig) -> CliResult<()> {
    let start_time = Instant::now();
    println!("🌱 Seeding database...\n");

    let category_ids = taxonomy::seed_categories(db, config.categories).await?;
    let tag_ids = taxonomy::seed_tags(db, config.tags).await?;

    content::seed_courses(
        db,
        config.courses,
        &category_ids,
        &tag_ids,
        config.max_tags_per_item,
    )
    .await?;
    content::seed_events(db, config.events, &tag_ids, config.max_tags_per_item).await?;
    content::seed_documents(
        db,
        config.documents,
        &category_ids,
        &tag_ids,
        config.max_tags_per_item,
    )
    .await?;

    println!("\n✅ Seeding finished in {:?}", start_time.elapsed());
    Ok(())
}

/// Removes all catalogue content. Admin accounts and uploaded images are kept.
pub async fn clear_all(db: &PgPool) -> CliResult<()> {
    let start_time = Instant::now();
    println!("🗑️  Clearing catalogue data...");

    let mut tx = db.begin().await?;
    for table in ["documents", "events", "courses", "tags", "categories"] {
        let deleted = sqlx::query(&format!("DELETE FROM {}", table))
            .execute(&mut *tx)
            .await?
            .rows_affected();
        println!("   ✓ Deleted {} rows from {}", deleted, table);
    }
    tx.commit().await?;

    println!("✅ Cleared in {:?}", start_time.elapsed());
    Ok(())
}
