//! Association Manager.
//!
//! Courses, events and documents carry sets of tags (documents also carry
//! categories) stored in junction tables. An update replaces the whole set:
//! whatever ids the caller sends become exactly the stored set, minus ids that
//! do not exist. Rows that stay in the set are left untouched so their
//! `created_at` survives.
//!
//! Everything here takes a `&mut PgConnection`, which is always the
//! connection of an open transaction, so the owner row and its associations
//! commit or roll back together.

use std::collections::{BTreeSet, HashMap};

use sqlx::{PgConnection, PgPool};
use tracing::debug;

use crate::metrics::track_association_change;

/// A junction table between an owner entity and a target (tag or category).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    CourseTags,
    EventTags,
    DocumentTags,
    DocumentCategories,
}

impl Relation {
    pub const fn table(self) -> &'static str {
        match self {
            Relation::CourseTags => "course_tags",
            Relation::EventTags => "event_tags",
            Relation::DocumentTags => "document_tags",
            Relation::DocumentCategories => "document_categories",
        }
    }

    pub const fn owner_column(self) -> &'static str {
        match self {
            Relation::CourseTags => "course_id",
            Relation::EventTags => "event_id",
            Relation::DocumentTags | Relation::DocumentCategories => "document_id",
        }
    }

    pub const fn target_column(self) -> &'static str {
        match self {
            Relation::DocumentCategories => "category_id",
            _ => "tag_id",
        }
    }

    pub const fn target_table(self) -> &'static str {
        match self {
            Relation::DocumentCategories => "categories",
            _ => "tags",
        }
    }

    fn resolve_sql(self) -> String {
        format!(
            "SELECT id FROM {} WHERE id = ANY($1) ORDER BY id FOR KEY SHARE",
            self.target_table()
        )
    }

    fn current_sql(self) -> String {
        format!(
            "SELECT {} FROM {} WHERE {} = $1",
            self.target_column(),
            self.table(),
            self.owner_column()
        )
    }

    fn delete_sql(self) -> String {
        format!(
            "DELETE FROM {} WHERE {} = $1 AND {} = ANY($2)",
            self.table(),
            self.owner_column(),
            self.target_column()
        )
    }

    fn insert_sql(self) -> String {
        format!(
            "INSERT INTO {table} ({owner}, {target}) \
             SELECT $1, t FROM UNNEST($2::int[]) AS t \
             ON CONFLICT ({owner}, {target}) DO NOTHING",
            table = self.table(),
            owner = self.owner_column(),
            target = self.target_column()
        )
    }

    fn related_sql(self) -> String {
        format!(
            "SELECT j.{owner}, t.id, t.name FROM {table} j \
             JOIN {target_table} t ON t.id = j.{target} \
             WHERE j.{owner} = ANY($1) \
             ORDER BY t.name",
            table = self.table(),
            target_table = self.target_table(),
            owner = self.owner_column(),
            target = self.target_column()
        )
    }
}

/// The row-level edits needed to turn one id set into another.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssociationPlan {
    pub to_insert: Vec<i32>,
    pub to_delete: Vec<i32>,
    pub unchanged: Vec<i32>,
}

impl AssociationPlan {
    pub fn is_noop(&self) -> bool {
        self.to_insert.is_empty() && self.to_delete.is_empty()
    }
}

/// Diffs the stored set against the resolved desired set. All outputs are sorted.
pub fn plan_replacement(current: &[i32], resolved: &[i32]) -> AssociationPlan {
    let current: BTreeSet<i32> = current.iter().copied().collect();
    let desired: BTreeSet<i32> = resolved.iter().copied().collect();

    AssociationPlan {
        to_insert: desired.difference(&current).copied().collect(),
        to_delete: current.difference(&desired).copied().collect(),
        unchanged: current.intersection(&desired).copied().collect(),
    }
}

/// Outcome of one [`replace_associations`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssociationChange {
    /// The stored set after the replace, sorted.
    pub resolved: Vec<i32>,
    /// Requested ids that matched no row and were skipped.
    pub dropped: Vec<i32>,
    pub inserted: usize,
    pub deleted: usize,
}

/// Makes the `relation` set of `owner_id` exactly `desired`, minus unknown ids.
///
/// Duplicates in `desired` are ignored. An empty slice clears the set.
pub async fn replace_associations(
    conn: &mut PgConnection,
    relation: Relation,
    owner_id: i32,
    desired: &[i32],
) -> Result<AssociationChange, sqlx::Error> {
    let requested: Vec<i32> = desired
        .iter()
        .copied()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let resolved: Vec<i32> = if requested.is_empty() {
        Vec::new()
    } else {
        sqlx::query_scalar::<_, i32>(&relation.resolve_sql())
            .bind(&requested)
            .fetch_all(&mut *conn)
            .await?
    };

    let dropped: Vec<i32> = requested
        .iter()
        .copied()
        .filter(|id| resolved.binary_search(id).is_err())
        .collect();
    if !dropped.is_empty() {
        debug!(
            relation = relation.table(),
            owner_id,
            dropped = ?dropped,
            "Skipping ids with no matching row"
        );
    }

    let current: Vec<i32> = sqlx::query_scalar::<_, i32>(&relation.current_sql())
        .bind(owner_id)
        .fetch_all(&mut *conn)
        .await?;

    let plan = plan_replacement(&current, &resolved);

    if !plan.to_delete.is_empty() {
        sqlx::query(&relation.delete_sql())
            .bind(owner_id)
            .bind(&plan.to_delete)
            .execute(&mut *conn)
            .await?;
    }

    if !plan.to_insert.is_empty() {
        sqlx::query(&relation.insert_sql())
            .bind(owner_id)
            .bind(&plan.to_insert)
            .execute(&mut *conn)
            .await?;
    }

    track_association_change(relation.table(), plan.to_insert.len(), plan.to_delete.len());

    Ok(AssociationChange {
        resolved,
        dropped,
        inserted: plan.to_insert.len(),
        deleted: plan.to_delete.len(),
    })
}

/// Creator link between an admin and the course or event they made.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ownership {
    Course,
    Event,
}

impl Ownership {
    fn insert_sql(self) -> &'static str {
        match self {
            Ownership::Course => "INSERT INTO admin_courses (admin_id, course_id) VALUES ($1, $2)",
            Ownership::Event => "INSERT INTO admin_events (admin_id, event_id) VALUES ($1, $2)",
        }
    }
}

pub async fn link_owner(
    conn: &mut PgConnection,
    ownership: Ownership,
    admin_id: i32,
    entity_id: i32,
) -> Result<(), sqlx::Error> {
    sqlx::query(ownership.insert_sql())
        .bind(admin_id)
        .bind(entity_id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

/// Loads `(id, name)` summaries of the related rows for each owner, ordered by name.
///
/// Owners without associations are absent from the map.
pub async fn load_related<T>(
    db: &PgPool,
    relation: Relation,
    owner_ids: &[i32],
) -> Result<HashMap<i32, Vec<T>>, sqlx::Error>
where
    T: From<(i32, String)>,
{
    if owner_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows: Vec<(i32, i32, String)> = sqlx::query_as(&relation.related_sql())
        .bind(owner_ids)
        .fetch_all(db)
        .await?;

    let mut related: HashMap<i32, Vec<T>> = HashMap::new();
    for (owner_id, id, name) in rows {
        related.entry(owner_id).or_default().push(T::from((id, name)));
    }
    Ok(related)
}
