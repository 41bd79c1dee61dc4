use super::UserGateway;
use anyhow::Context;
use chrono::NaiveDateTime;
use sqlx::{FromRow, Pool, Postgres, postgres::PgPoolOptions};
use user_tonic_core::types::{Page, PageRequest, User, UserId};

pub type PgPool = Pool<Postgres>;

const USER_COLUMNS: &str = "id, name, email, age, created_at, updated_at";

/// [`UserGateway`] backed by a PostgreSQL `users` table.
///
/// The table must already exist; see the crate README for its layout.
#[derive(Clone)]
pub struct PostgresUserGateway {
    pool: PgPool,
}

impl PostgresUserGateway {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .context("failed to connect to PostgreSQL")?;
        Ok(Self::new(pool))
    }
}

#[derive(FromRow)]
struct UserRecord {
    id: i64,
    name: String,
    email: String,
    age: Option<i32>,
    created_at: Option<NaiveDateTime>,
    updated_at: Option<NaiveDateTime>,
}

impl From<UserRecord> for User {
    fn from(record: UserRecord) -> Self {
        Self {
            id: Some(record.id),
            name: record.name,
            email: record.email,
            age: record.age,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

#[tonic::async_trait]
impl UserGateway for PostgresUserGateway {
    async fn find_by_id(&self, id: UserId) -> anyhow::Result<Option<User>> {
        let record = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(record.map(User::from))
    }

    async fn save(&self, user: User) -> anyhow::Result<User> {
        let record = match user.id {
            None => {
                sqlx::query_as::<_, UserRecord>(&format!(
                    r#"
                    INSERT INTO users (name, email, age, created_at, updated_at)
                    VALUES ($1, $2, $3, LOCALTIMESTAMP, LOCALTIMESTAMP)
                    RETURNING {USER_COLUMNS}
                    "#
                ))
                .bind(&user.name)
                .bind(&user.email)
                .bind(user.age)
                .fetch_one(&self.pool)
                .await?
            }
            Some(id) => {
                sqlx::query_as::<_, UserRecord>(&format!(
                    r#"
                    INSERT INTO users (id, name, email, age, created_at, updated_at)
                    VALUES ($1, $2, $3, $4, LOCALTIMESTAMP, LOCALTIMESTAMP)
                    ON CONFLICT (id) DO UPDATE
                    SET name = EXCLUDED.name,
                        email = EXCLUDED.email,
                        age = EXCLUDED.age,
                        updated_at = EXCLUDED.updated_at
                    RETURNING {USER_COLUMNS}
                    "#
                ))
                .bind(id)
                .bind(&user.name)
                .bind(&user.email)
                .bind(user.age)
                .fetch_one(&self.pool)
                .await?
            }
        };
        Ok(record.into())
    }

    async fn exists_by_id(&self, id: UserId) -> anyhow::Result<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    async fn delete_by_id(&self, id: UserId) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn find_all(&self, page: PageRequest) -> anyhow::Result<Page<User>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        let offset = i64::try_from(page.offset()).context("page offset out of range")?;
        let records = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY id LIMIT $1 OFFSET $2"
        ))
        .bind(i64::from(page.size))
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(Page {
            items: records.into_iter().map(User::from).collect(),
            total: total.max(0) as u64,
        })
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
