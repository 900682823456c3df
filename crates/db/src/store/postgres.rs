//! PostgreSQL backend.

use async_trait::async_trait;
use dashlens_core::types::DbId;
use sqlx::pool::PoolConnection;
use sqlx::{PgConnection, PgPool, Postgres, Transaction};

use super::{expect_rows, ReadSession, Store, StoreTransaction};
use crate::change::Change;
use crate::criteria::{ComponentCriteria, DashboardCriteria};
use crate::error::DbError;
use crate::models::component::{ComponentRow, ComponentSummary};
use crate::models::dashboard::{DashboardRow, DashboardSummary};

/// Column list shared across dashboard queries.
const DASHBOARD_COLUMNS: &str = "id, name, description, created_at";

/// Column list shared across component queries.
const COMPONENT_COLUMNS: &str =
    "id, dashboard_id, name, description, component_type, status, created_at";

/// Store backed by a PostgreSQL pool.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Store for PgStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn reader(&self) -> Result<Box<dyn ReadSession>, DbError> {
        let conn = self.pool.acquire().await?;
        Ok(Box::new(PgReader { conn }))
    }

    async fn begin(&self) -> Result<Box<dyn StoreTransaction>, DbError> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgTransaction { tx }))
    }

    async fn ping(&self) -> Result<(), DbError> {
        crate::health_check(&self.pool).await?;
        Ok(())
    }
}

/// Autocommit reads on a pooled connection.
pub struct PgReader {
    conn: PoolConnection<Postgres>,
}

pub struct PgTransaction {
    tx: Transaction<'static, Postgres>,
}

/// Implement [`ReadSession`] by delegating to the free query functions with
/// the session's underlying connection.
macro_rules! delegate_reads {
    ($ty:ty, $conn:ident) => {
        #[async_trait]
        impl ReadSession for $ty {
            async fn find_dashboard(&mut self, id: DbId) -> Result<Option<DashboardRow>, DbError> {
                find_dashboard(&mut self.$conn, id).await
            }

            async fn list_dashboards(&mut self) -> Result<Vec<DashboardRow>, DbError> {
                list_dashboards(&mut self.$conn).await
            }

            async fn find_component(&mut self, id: DbId) -> Result<Option<ComponentRow>, DbError> {
                find_component(&mut self.$conn, id).await
            }

            async fn list_components(
                &mut self,
                dashboard_id: Option<DbId>,
            ) -> Result<Vec<ComponentRow>, DbError> {
                list_components(&mut self.$conn, dashboard_id).await
            }

            async fn query_dashboards(
                &mut self,
                criteria: &DashboardCriteria,
            ) -> Result<(Vec<DashboardSummary>, u64), DbError> {
                query_dashboards(&mut self.$conn, criteria).await
            }

            async fn query_components(
                &mut self,
                criteria: &ComponentCriteria,
            ) -> Result<Vec<ComponentSummary>, DbError> {
                query_components(&mut self.$conn, criteria).await
            }
        }
    };
}

delegate_reads!(PgReader, conn);
delegate_reads!(PgTransaction, tx);

#[async_trait]
impl StoreTransaction for PgTransaction {
    fn as_reader(&mut self) -> &mut dyn ReadSession {
        self
    }

    async fn apply(&mut self, change: &Change) -> Result<u64, DbError> {
        apply_change(&mut self.tx, change).await
    }

    async fn commit(self: Box<Self>) -> Result<(), DbError> {
        let this = *self;
        this.tx.commit().await?;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), DbError> {
        let this = *self;
        this.tx.rollback().await?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

async fn find_dashboard(conn: &mut PgConnection, id: DbId) -> Result<Option<DashboardRow>, DbError> {
    let query = format!("SELECT {DASHBOARD_COLUMNS} FROM dashboards WHERE id = $1");
    let row = sqlx::query_as::<_, DashboardRow>(&query)
        .bind(id)
        .fetch_optional(conn)
        .await?;
    Ok(row)
}

async fn list_dashboards(conn: &mut PgConnection) -> Result<Vec<DashboardRow>, DbError> {
    let query = format!("SELECT {DASHBOARD_COLUMNS} FROM dashboards ORDER BY created_at, id");
    let rows = sqlx::query_as::<_, DashboardRow>(&query)
        .fetch_all(conn)
        .await?;
    Ok(rows)
}

async fn find_component(conn: &mut PgConnection, id: DbId) -> Result<Option<ComponentRow>, DbError> {
    let query = format!("SELECT {COMPONENT_COLUMNS} FROM dashboard_components WHERE id = $1");
    let row = sqlx::query_as::<_, ComponentRow>(&query)
        .bind(id)
        .fetch_optional(conn)
        .await?;
    Ok(row)
}

async fn list_components(
    conn: &mut PgConnection,
    dashboard_id: Option<DbId>,
) -> Result<Vec<ComponentRow>, DbError> {
    let query = format!(
        "SELECT {COMPONENT_COLUMNS} FROM dashboard_components
         WHERE ($1::uuid IS NULL OR dashboard_id = $1)
         ORDER BY created_at, id"
    );
    let rows = sqlx::query_as::<_, ComponentRow>(&query)
        .bind(dashboard_id)
        .fetch_all(conn)
        .await?;
    Ok(rows)
}

async fn query_dashboards(
    conn: &mut PgConnection,
    criteria: &DashboardCriteria,
) -> Result<(Vec<DashboardSummary>, u64), DbError> {
    const NAME_MATCH: &str = "($1::text IS NULL OR strpos(lower(d.name), lower($1)) > 0)";

    let total: i64 = sqlx::query_scalar(&format!(
        "SELECT COUNT(*) FROM dashboards d WHERE {NAME_MATCH}"
    ))
    .bind(&criteria.name_filter)
    .fetch_one(&mut *conn)
    .await?;

    let direction = criteria.direction.as_sql();
    let query = format!(
        "SELECT d.id, d.name, d.description, d.created_at, COUNT(c.id) AS component_count
         FROM dashboards d
         LEFT JOIN dashboard_components c ON c.dashboard_id = d.id
         WHERE {NAME_MATCH}
         GROUP BY d.id
         ORDER BY {column} {direction}, d.id {direction}
         LIMIT $2 OFFSET $3",
        column = criteria.sort.column(),
    );
    let limit = criteria.page.map(|p| p.limit() as i64);
    let offset = criteria.page.map_or(0, |p| p.offset() as i64);

    let rows = sqlx::query_as::<_, DashboardSummary>(&query)
        .bind(&criteria.name_filter)
        .bind(limit)
        .bind(offset)
        .fetch_all(&mut *conn)
        .await?;

    Ok((rows, total.max(0) as u64))
}

async fn query_components(
    conn: &mut PgConnection,
    criteria: &ComponentCriteria,
) -> Result<Vec<ComponentSummary>, DbError> {
    let direction = criteria.direction.as_sql();
    let query = format!(
        "SELECT c.id, c.dashboard_id, c.name, c.description, c.component_type, c.status,
                c.created_at, d.name AS dashboard_name
         FROM dashboard_components c
         JOIN dashboards d ON d.id = c.dashboard_id
         WHERE ($1::uuid IS NULL OR c.dashboard_id = $1)
           AND ($2::text IS NULL OR c.component_type = $2)
           AND ($3::text IS NULL OR c.status = $3)
         ORDER BY {column} {direction}, c.id {direction}",
        column = criteria.sort.column(),
    );
    let rows = sqlx::query_as::<_, ComponentSummary>(&query)
        .bind(criteria.dashboard_id)
        .bind(criteria.component_type.map(|t| t.as_str()))
        .bind(criteria.status.map(|s| s.as_str()))
        .fetch_all(conn)
        .await?;
    Ok(rows)
}

// ---------------------------------------------------------------------------
// Writes
// ---------------------------------------------------------------------------

async fn apply_change(conn: &mut PgConnection, change: &Change) -> Result<u64, DbError> {
    let result = match change {
        Change::InsertDashboard(row) => {
            sqlx::query(
                "INSERT INTO dashboards (id, name, description, created_at)
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(row.id)
            .bind(&row.name)
            .bind(&row.description)
            .bind(row.created_at)
            .execute(conn)
            .await?
        }
        Change::UpdateDashboard(row) => {
            sqlx::query("UPDATE dashboards SET name = $2, description = $3 WHERE id = $1")
                .bind(row.id)
                .bind(&row.name)
                .bind(&row.description)
                .execute(conn)
                .await?
        }
        Change::DeleteDashboard(id) => {
            sqlx::query("DELETE FROM dashboards WHERE id = $1")
                .bind(id)
                .execute(conn)
                .await?
        }
        Change::InsertComponent(row) => {
            sqlx::query(
                "INSERT INTO dashboard_components
                    (id, dashboard_id, name, description, component_type, status, created_at)
                 VALUES ($1, $2, $3, $4, $5, $6, $7)",
            )
            .bind(row.id)
            .bind(row.dashboard_id)
            .bind(&row.name)
            .bind(&row.description)
            .bind(&row.component_type)
            .bind(&row.status)
            .bind(row.created_at)
            .execute(conn)
            .await?
        }
        Change::UpdateComponent(row) => {
            sqlx::query(
                "UPDATE dashboard_components
                 SET dashboard_id = $2, name = $3, description = $4, status = $5
                 WHERE id = $1",
            )
            .bind(row.id)
            .bind(row.dashboard_id)
            .bind(&row.name)
            .bind(&row.description)
            .bind(&row.status)
            .execute(conn)
            .await?
        }
        Change::DeleteComponent(id) => {
            sqlx::query("DELETE FROM dashboard_components WHERE id = $1")
                .bind(id)
                .execute(conn)
                .await?
        }
    };
    expect_rows(change, result.rows_affected())
}
