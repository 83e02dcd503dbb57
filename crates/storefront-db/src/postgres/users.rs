use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use storefront_core::{AppError, Page};
use storefront_models::{NewUser, User, UserChanges, UserFilter, UserRecord, UserRole};
use tracing::instrument;
use uuid::Uuid;

use super::{like_pattern, limit_offset};
use crate::errors::{USER_CONFLICT, read_error, write_error};
use crate::store::UserStore;

const USER_COLUMNS: &str =
    "id, username, email, password_hash, role, is_active, created_at, updated_at";

#[derive(FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    email: String,
    password_hash: String,
    role: String,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for UserRecord {
    type Error = AppError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role: UserRole = row
            .role
            .parse()
            .map_err(|e: String| AppError::internal(anyhow::anyhow!(e)))?;

        Ok(UserRecord {
            user: User {
                id: row.id,
                username: row.username,
                email: row.email,
                role,
                is_active: row.is_active,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
            password_hash: row.password_hash,
        })
    }
}

fn into_user(row: UserRow) -> Result<User, AppError> {
    UserRecord::try_from(row).map(|record| record.user)
}

fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, filter: &UserFilter) {
    qb.push(" WHERE TRUE");

    if let Some(is_active) = filter.is_active {
        qb.push(" AND is_active = ").push_bind(is_active);
    }

    if let Some(search) = &filter.search {
        let pattern = like_pattern(search);
        qb.push(" AND (username ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR email ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
}

#[derive(Clone, Debug)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    #[instrument(skip(self, user), fields(username = %user.username))]
    async fn create(&self, user: NewUser) -> Result<User, AppError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "INSERT INTO users (id, username, email, password_hash, role)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .fetch_one(&self.db)
        .await
        .map_err(|e| write_error(e, USER_CONFLICT, "Failed to insert user"))?;

        into_user(row)
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, UserRow>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.db)
            .await
            .map_err(|e| read_error(e, "Failed to fetch user by ID"))?
            .map(into_user)
            .transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, AppError> {
        sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| read_error(e, "Failed to fetch user by email"))?
        .map(UserRecord::try_from)
        .transpose()
    }

    #[instrument(skip(self))]
    async fn is_taken(
        &self,
        username: Option<&str>,
        email: Option<&str>,
        exclude: Option<Uuid>,
    ) -> Result<bool, AppError> {
        if username.is_none() && email.is_none() {
            return Ok(false);
        }

        let mut qb = QueryBuilder::<Postgres>::new("SELECT EXISTS (SELECT 1 FROM users WHERE (");
        let mut clauses = qb.separated(" OR ");
        if let Some(username) = username {
            clauses.push("username = ").push_bind_unseparated(username.to_string());
        }
        if let Some(email) = email {
            clauses.push("email = ").push_bind_unseparated(email.to_string());
        }
        qb.push(")");
        if let Some(exclude) = exclude {
            qb.push(" AND id <> ").push_bind(exclude);
        }
        qb.push(")");

        qb.build_query_scalar::<bool>()
            .fetch_one(&self.db)
            .await
            .map_err(|e| read_error(e, "Failed to check user uniqueness"))
    }

    #[instrument(skip(self))]
    async fn list(&self, filter: &UserFilter) -> Result<Page<User>, AppError> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM users");
        push_filters(&mut count, filter);
        let total: i64 = count
            .build_query_scalar()
            .fetch_one(&self.db)
            .await
            .map_err(|e| read_error(e, "Failed to count users"))?;

        let (limit, offset) = limit_offset(filter.page);
        let mut select = QueryBuilder::<Postgres>::new(format!("SELECT {USER_COLUMNS} FROM users"));
        push_filters(&mut select, filter);
        select
            .push(format!(
                " ORDER BY {} {}, id {}",
                filter.sort.column(),
                filter.order.as_sql(),
                filter.order.as_sql()
            ))
            .push(" LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);

        let rows = select
            .build_query_as::<UserRow>()
            .fetch_all(&self.db)
            .await
            .map_err(|e| read_error(e, "Failed to fetch users"))?;

        let items = rows
            .into_iter()
            .map(into_user)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Page {
            items,
            total: total.max(0) as u64,
        })
    }

    #[instrument(skip(self, changes))]
    async fn update(&self, id: Uuid, changes: UserChanges) -> Result<Option<User>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE users SET updated_at = NOW()");

        if let Some(username) = changes.username {
            qb.push(", username = ").push_bind(username);
        }
        if let Some(email) = changes.email {
            qb.push(", email = ").push_bind(email);
        }
        if let Some(password_hash) = changes.password_hash {
            qb.push(", password_hash = ").push_bind(password_hash);
        }
        if let Some(role) = changes.role {
            qb.push(", role = ").push_bind(role.as_str());
        }
        if let Some(is_active) = changes.is_active {
            qb.push(", is_active = ").push_bind(is_active);
        }

        qb.push(" WHERE id = ")
            .push_bind(id)
            .push(format!(" RETURNING {USER_COLUMNS}"));

        qb.build_query_as::<UserRow>()
            .fetch_optional(&self.db)
            .await
            .map_err(|e| write_error(e, USER_CONFLICT, "Failed to update user"))?
            .map(into_user)
            .transpose()
    }
}
