//! Course, event and document seeding.
//!
//! Items are linked to random subsets of the seeded tags (and, for documents,
//! categories). Courses and events are credited to the oldest admin when one
//! exists.

use std::time::Instant;

use chrono::{Duration, Utc};
use fake::Fake;
use fake::faker::address::en::CityName;
use fake::faker::lorem::en::{Paragraph, Words};
use rand::Rng;
use rand::seq::SliceRandom;
use rayon::prelude::*;
use sqlx::PgPool;

use super::models::{CourseSeed, DocumentSeed, EventSeed};
use crate::admin::CliResult;

const YOUTUBE_ID_CHARS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789_-";

fn random_subset(ids: &[i32], max: usize) -> Vec<i32> {
    if ids.is_empty() || max == 0 {
        return Vec::new();
    }
    let mut rng = rand::thread_rng();
    let count = rng.gen_range(0..=max.min(ids.len()));
    ids.choose_multiple(&mut rng, count).copied().collect()
}

fn title() -> String {
    let words: Vec<String> = Words(2..5).fake();
    let title = words.join(" ");
    let mut chars = title.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => title,
    }
}

fn youtube_link() -> String {
    let mut rng = rand::thread_rng();
    let id: String = (0..11)
        .map(|_| YOUTUBE_ID_CHARS[rng.gen_range(0..YOUTUBE_ID_CHARS.len())] as char)
        .collect();
    format!("https://www.youtube.com/watch?v={}", id)
}

pub fn generate_courses(
    count: usize,
    category_ids: &[i32],
    tag_ids: &[i32],
    max_tags: usize,
) -> Vec<CourseSeed> {
    if category_ids.is_empty() {
        return Vec::new();
    }

    (0..count)
        .into_par_iter()
        .map(|_| {
            let mut rng = rand::thread_rng();
            CourseSeed {
                title: title(),
                description: Paragraph(2..4).fake(),
                youtube_link: youtube_link(),
                id_category: category_ids[rng.gen_range(0..category_ids.len())],
                tag_ids: random_subset(tag_ids, max_tags),
            }
        })
        .collect()
}

/// Dates spread from two months ago to four months ahead.
pub fn generate_events(count: usize, tag_ids: &[i32], max_tags: usize) -> Vec<EventSeed> {
    let now = Utc::now();
    (0..count)
        .into_par_iter()
        .map(|idx| {
            let mut rng = rand::thread_rng();
            let city: String = CityName().fake();
            EventSeed {
                title: title(),
                description: Paragraph(2..4).fake(),
                location: city,
                event_date: now + Duration::days(rng.gen_range(-60..120)),
                registration_link: rng
                    .gen_bool(0.7)
                    .then(|| format!("https://lescracks.com/events/register/{}", idx + 1)),
                tag_ids: random_subset(tag_ids, max_tags),
            }
        })
        .collect()
}

pub fn generate_documents(
    count: usize,
    category_ids: &[i32],
    tag_ids: &[i32],
    max_tags: usize,
) -> Vec<DocumentSeed> {
    (0..count)
        .into_par_iter()
        .map(|idx| DocumentSeed {
            title: title(),
            description: Paragraph(1..3).fake(),
            file_url: format!("https://lescracks.com/files/document-{}.pdf", idx + 1),
            category_ids: random_subset(category_ids, 2),
            tag_ids: random_subset(tag_ids, max_tags),
        })
        .collect()
}

/// Flattens per-item id lists into the two parallel arrays `UNNEST` expects.
fn pairs<'a, I>(owner_ids: &[i32], targets: I) -> (Vec<i32>, Vec<i32>)
where
    I: Iterator<Item = &'a Vec<i32>>,
{
    let mut owners = Vec::new();
    let mut related = Vec::new();
    for (owner_id, ids) in owner_ids.iter().zip(targets) {
        for id in ids {
            owners.push(*owner_id);
            related.push(*id);
        }
    }
    (owners, related)
}

async fn first_admin(db: &PgPool) -> CliResult<Option<i32>> {
    let id = sqlx::query_scalar::<_, i32>("SELECT id FROM admins ORDER BY id LIMIT 1")
        .fetch_optional(db)
        .await?;
    Ok(id)
}

pub async fn seed_courses(
    db: &PgPool,
    count: usize,
    category_ids: &[i32],
    tag_ids: &[i32],
    max_tags: usize,
) -> CliResult<Vec<i32>> {
    let start_time = Instant::now();
    println!("🎬 Seeding {} courses...", count);

    let courses = generate_courses(count, category_ids, tag_ids, max_tags);
    if courses.is_empty() {
        println!("   ⚠ No categories available, skipping courses");
        return Ok(Vec::new());
    }

    let mut tx = db.begin().await?;

    let ids = sqlx::query_scalar::<_, i32>(
        "INSERT INTO courses (title, description, youtube_link, id_category)
         SELECT * FROM UNNEST($1::varchar[], $2::text[], $3::varchar[], $4::int[])
         RETURNING id",
    )
    .bind(courses.iter().map(|c| c.title.clone()).collect::<Vec<_>>())
    .bind(courses.iter().map(|c| c.description.clone()).collect::<Vec<_>>())
    .bind(courses.iter().map(|c| c.youtube_link.clone()).collect::<Vec<_>>())
    .bind(courses.iter().map(|c| c.id_category).collect::<Vec<_>>())
    .fetch_all(&mut *tx)
    .await?;

    let (owners, tags) = pairs(&ids, courses.iter().map(|c| &c.tag_ids));
    sqlx::query("INSERT INTO course_tags (course_id, tag_id) SELECT * FROM UNNEST($1::int[], $2::int[])")
        .bind(&owners)
        .bind(&tags)
        .execute(&mut *tx)
        .await?;

    if let Some(admin_id) = first_admin(db).await? {
        sqlx::query(
            "INSERT INTO admin_courses (admin_id, course_id) SELECT $1, id FROM UNNEST($2::int[]) AS id",
        )
        .bind(admin_id)
        .bind(&ids)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    println!(
        "   ✓ Inserted {} courses with {} tag links in {:?}",
        ids.len(),
        tags.len(),
        start_time.elapsed()
    );
    Ok(ids)
}

pub async fn seed_events(
    db: &PgPool,
    count: usize,
    tag_ids: &[i32],
    max_tags: usize,
) -> CliResult<Vec<i32>> {
    let start_time = Instant::now();
    println!("📅 Seeding {} events...", count);

    let events = generate_events(count, tag_ids, max_tags);
    let mut tx = db.begin().await?;

    let ids = sqlx::query_scalar::<_, i32>(
        "INSERT INTO events (title, description, location, event_date, registration_link)
         SELECT * FROM UNNEST($1::varchar[], $2::text[], $3::varchar[], $4::timestamptz[], $5::varchar[])
         RETURNING id",
    )
    .bind(events.iter().map(|e| e.title.clone()).collect::<Vec<_>>())
    .bind(events.iter().map(|e| e.description.clone()).collect::<Vec<_>>())
    .bind(events.iter().map(|e| e.location.clone()).collect::<Vec<_>>())
    .bind(events.iter().map(|e| e.event_date).collect::<Vec<_>>())
    .bind(events.iter().map(|e| e.registration_link.clone()).collect::<Vec<_>>())
    .fetch_all(&mut *tx)
    .await?;

    let (owners, tags) = pairs(&ids, events.iter().map(|e| &e.tag_ids));
    sqlx::query("INSERT INTO event_tags (event_id, tag_id) SELECT * FROM UNNEST($1::int[], $2::int[])")
        .bind(&owners)
        .bind(&tags)
        .execute(&mut *tx)
        .await?;

    if let Some(admin_id) = first_admin(db).await? {
        sqlx::query(
            "INSERT INTO admin_events (admin_id, event_id) SELECT $1, id FROM UNNEST($2::int[]) AS id",
        )
        .bind(admin_id)
        .bind(&ids)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    println!("   ✓ Inserted {} events in {:?}", ids.len(), start_time.elapsed());
    Ok(ids)
}

pub async fn seed_documents(
    db: &PgPool,
    count: usize,
    category_ids: &[i32],
    tag_ids: &[i32],
    max_tags: usize,
) -> CliResult<Vec<i32>> {
    let start_time = Instant::now();
    println!("📄 Seeding {} documents...", count);

    let documents = generate_documents(count, category_ids, tag_ids, max_tags);
    let mut tx = db.begin().await?;

    let ids = sqlx::query_scalar::<_, i32>(
        "INSERT INTO documents (title, description, file_url)
         SELECT * FROM UNNEST($1::varchar[], $2::text[], $3::varchar[])
         RETURNING id",
    )
    .bind(documents.iter().map(|d| d.title.clone()).collect::<Vec<_>>())
    .bind(documents.iter().map(|d| d.description.clone()).collect::<Vec<_>>())
    .bind(documents.iter().map(|d| d.file_url.clone()).collect::<Vec<_>>())
    .fetch_all(&mut *tx)
    .await?;

    let (owners, categories) = pairs(&ids, documents.iter().map(|d| &d.category_ids));
    sqlx::query(
        "INSERT INTO document_categories (document_id, category_id) SELECT * FROM UNNEST($1::int[], $2::int[])",
    )
    .bind(&owners)
    .bind(&categories)
    .execute(&mut *tx)
    .await?;

    let (owners, tags) = pairs(&ids, documents.iter().map(|d| &d.tag_ids));
    sqlx::query("INSERT INTO document_tags (document_id, tag_id) SELECT * FROM UNNEST($1::int[], $2::int[])")
        .bind(&owners)
        .bind(&tags)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    println!("   ✓ Inserted {} documents in {:?}", ids.len(), start_time.elapsed());
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_subset_stays_within_bounds() {
        let ids = [1, 2, 3, 4, 5];
        for _ in 0..50 {
            let subset = random_subset(&ids, 3);
            assert!(subset.len() <= 3);
            assert!(subset.iter().all(|id| ids.contains(id)));

            let mut sorted = subset.clone();
            sorted.sort();
            sorted.dedup();
            assert_eq!(sorted.len(), subset.len());
        }
        assert!(random_subset(&[], 3).is_empty());
    }

    #[test]
    fn test_courses_need_a_category() {
        assert!(generate_courses(5, &[], &[1, 2], 2).is_empty());

        let courses = generate_courses(5, &[9], &[1, 2], 2);
        assert_eq!(courses.len(), 5);
        assert!(courses.iter().all(|c| c.id_category == 9));
        assert!(courses.iter().all(|c| c.youtube_link.starts_with("https://www.youtube.com/")));
    }

    #[test]
    fn test_pairs_flattens_in_order() {
        let targets = [vec![10, 11], vec![], vec![12]];
        let (owners, related) = pairs(&[1, 2, 3], targets.iter());
        assert_eq!(owners, vec![1, 1, 3]);
        assert_eq!(related, vec![10, 11, 12]);
    }
}
