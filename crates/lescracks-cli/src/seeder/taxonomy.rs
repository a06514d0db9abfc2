//! Category and tag seeding.

use std::time::Instant;

use fake::Fake;
use fake::faker::lorem::en::{Sentence, Word};
use rayon::prelude::*;
use sqlx::PgPool;

use super::models::{CategorySeed, TagSeed};
use crate::admin::CliResult;

/// Names carry the index so they stay unique across a run.
pub fn generate_categories(count: usize) -> Vec<CategorySeed> {
    (0..count)
        .into_par_iter()
        .map(|idx| {
            let word: String = Word().fake();
            CategorySeed {
                name: format!("{} {}", capitalize(&word), idx + 1),
                description: Some(Sentence(6..12).fake()),
            }
        })
        .collect()
}

pub fn generate_tags(count: usize) -> Vec<TagSeed> {
    (0..count)
        .into_par_iter()
        .map(|idx| {
            let word: String = Word().fake();
            TagSeed {
                name: format!("{}-{}", word.to_lowercase(), idx + 1),
            }
        })
        .collect()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Existing names are skipped, so a second run only adds what is missing.
pub async fn seed_categories(db: &PgPool, count: usize) -> CliResult<Vec<i32>> {
    let start_time = Instant::now();
    println!("📂 Seeding {} categories...", count);

    let categories = generate_categories(count);
    let names: Vec<String> = categories.iter().map(|c| c.name.clone()).collect();
    let descriptions: Vec<Option<String>> =
        categories.iter().map(|c| c.description.clone()).collect();

    let ids = sqlx::query_scalar::<_, i32>(
        "INSERT INTO categories (name, description)
         SELECT * FROM UNNEST($1::varchar[], $2::text[])
         ON CONFLICT (name) DO NOTHING
         RETURNING id",
    )
    .bind(&names)
    .bind(&descriptions)
    .fetch_all(db)
    .await?;

    println!(
        "   ✓ Inserted {} categories in {:?}",
        ids.len(),
        start_time.elapsed()
    );
    Ok(ids)
}

pub async fn seed_tags(db: &PgPool, count: usize) -> CliResult<Vec<i32>> {
    let start_time = Instant::now();
    println!("🏷️  Seeding {} tags...", count);

    let names: Vec<String> = generate_tags(count).into_iter().map(|t| t.name).collect();

    let ids = sqlx::query_scalar::<_, i32>(
        "INSERT INTO tags (name)
         SELECT * FROM UNNEST($1::varchar[])
         ON CONFLICT (name) DO NOTHING
         RETURNING id",
    )
    .bind(&names)
    .fetch_all(db)
    .await?;

    println!("   ✓ Inserted {} tags in {:?}", ids.len(), start_time.elapsed());
    Ok(ids)
}
