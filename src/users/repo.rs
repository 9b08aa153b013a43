use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use time::OffsetDateTime;

use crate::users::dto::{UserFilter, UserPayload};

/// User record in the database. `id` and the timestamps are store-owned
/// and never client-writable.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub age: Option<i32>,
    pub active: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

const COLUMNS: &str = "id, name, email, age, active, created_at, updated_at";

/// True when the store rejected a write because of the unique constraint
/// on email, as opposed to any other database failure.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

/// Builds the list query from the optional filters. Present filters
/// combine with AND; rows come back in insertion (`id`) order.
pub fn filter_query(filter: &UserFilter) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!(
        "SELECT {COLUMNS} FROM users WHERE TRUE"
    ));
    if let Some(name) = &filter.name {
        qb.push(" AND name LIKE ");
        qb.push_bind(format!("%{name}%"));
    }
    if let Some(min) = filter.age_min {
        qb.push(" AND age >= ");
        qb.push_bind(min);
    }
    if let Some(max) = filter.age_max {
        qb.push(" AND age <= ");
        qb.push_bind(max);
    }
    qb.push(" ORDER BY id");
    qb
}

impl User {
    pub async fn create(db: &PgPool, payload: &UserPayload) -> sqlx::Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, age, active)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, age, active, created_at, updated_at
            "#,
        )
        .bind(&payload.name)
        .bind(&payload.email)
        .bind(payload.age)
        .bind(payload.active.unwrap_or(true))
        .fetch_one(db)
        .await?;
        Ok(user)
    }

    pub async fn find_by_id(db: &PgPool, id: i64) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, age, active, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await
    }

    pub async fn list(db: &PgPool, filter: &UserFilter) -> sqlx::Result<Vec<User>> {
        let mut qb = filter_query(filter);
        qb.build_query_as::<User>().fetch_all(db).await
    }

    /// Persist an already-merged record. `updated_at` is refreshed by the
    /// store; the unique constraint arbitrates concurrent email conflicts.
    pub async fn update(db: &PgPool, user: &User) -> sqlx::Result<User> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET name = $2, email = $3, age = $4, active = $5, updated_at = now()
            WHERE id = $1
            RETURNING id, name, email, age, active, created_at, updated_at
            "#,
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(user.age)
        .bind(user.active)
        .fetch_one(db)
        .await
    }

    pub async fn delete(db: &PgPool, id: i64) -> sqlx::Result<()> {
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn sample_user() -> User {
        User {
            id: 1,
            name: "Ana".into(),
            email: "ana@example.com".into(),
            age: Some(25),
            active: true,
            created_at: datetime!(2024-01-01 12:00 UTC),
            updated_at: datetime!(2024-01-01 12:00 UTC),
        }
    }

    #[test]
    fn serializes_with_camel_case_timestamps() {
        let v = serde_json::to_value(sample_user()).unwrap();
        assert_eq!(v["id"], 1);
        assert_eq!(v["createdAt"], "2024-01-01T12:00:00Z");
        assert_eq!(v["updatedAt"], "2024-01-01T12:00:00Z");
        assert!(v.get("created_at").is_none());
    }

    #[test]
    fn filter_query_with_no_filters_is_plain_select() {
        let qb = filter_query(&UserFilter::default());
        assert_eq!(
            qb.sql(),
            "SELECT id, name, email, age, active, created_at, updated_at \
             FROM users WHERE TRUE ORDER BY id"
        );
    }

    #[test]
    fn filter_query_composes_all_filters_with_and() {
        let qb = filter_query(&UserFilter {
            name: Some("Ana".into()),
            age_min: Some(20),
            age_max: Some(30),
        });
        let sql = qb.sql();
        assert!(sql.contains("AND name LIKE $1"));
        assert!(sql.contains("AND age >= $2"));
        assert!(sql.contains("AND age <= $3"));
        assert!(sql.ends_with("ORDER BY id"));
    }

    #[test]
    fn filter_bounds_are_independently_optional() {
        let only_min = filter_query(&UserFilter {
            name: None,
            age_min: Some(18),
            age_max: None,
        });
        assert!(only_min.sql().contains("age >= $1"));
        assert!(!only_min.sql().contains("age <="));

        let only_max = filter_query(&UserFilter {
            name: None,
            age_min: None,
            age_max: Some(65),
        });
        assert!(only_max.sql().contains("age <= $1"));
        assert!(!only_max.sql().contains("age >="));
    }

    #[test]
    fn merge_preserves_absent_fields_and_overwrites_falsy_defined_ones() {
        let mut user = sample_user();
        let payload = UserPayload {
            name: "Maria".into(),
            email: "ana@example.com".into(),
            age: None,
            active: None,
        };
        payload.apply_to(&mut user);
        assert_eq!(user.name, "Maria");
        assert_eq!(user.age, Some(25));
        assert!(user.active);

        let payload = UserPayload {
            name: "Maria".into(),
            email: "maria@example.com".into(),
            age: Some(0),
            active: Some(false),
        };
        payload.apply_to(&mut user);
        assert_eq!(user.email, "maria@example.com");
        assert_eq!(user.age, Some(0));
        assert!(!user.active);
        assert_eq!(user.id, 1);
    }
}
