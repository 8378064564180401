//! Durable alarm table
//!
//! Pure persistence: the store applies whatever record the lifecycle engine
//! computed and answers point, range and due-set queries. No merge logic
//! lives here.

use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;

use crate::domain::{Alarm, AlarmClass};
use crate::error::Result;
use crate::store::client::SqliteClient;

/// Optional filters for listing alarms, combined with AND semantics.
#[derive(Debug, Clone, Default)]
pub struct AlarmFilter {
    /// Exact alarm id
    pub alarm_id: Option<String>,
    /// Only alarms raised at or before this unix timestamp
    pub raised_before: Option<i64>,
    /// Only alarms raised at or after this unix timestamp
    pub raised_after: Option<i64>,
}

/// SQLite-backed alarm store, one row per alarm_id.
pub struct AlarmStore {
    pool: SqlitePool,
}

impl AlarmStore {
    pub fn new(client: &SqliteClient) -> Self {
        Self {
            pool: client.pool().clone(),
        }
    }

    /// Create the alarms table if it does not exist yet.
    pub async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS alarms (
                alarm_id        TEXT PRIMARY KEY NOT NULL,
                alarm_class     INTEGER NOT NULL,
                alarm_state     TEXT NOT NULL,
                raised_time     INTEGER NOT NULL,
                require_ack     BOOLEAN NOT NULL,
                delete_time     INTEGER,
                class_1_time    INTEGER,
                class_2_time    INTEGER,
                class_3_time    INTEGER,
                time_after_ack  INTEGER,
                class_after_ack INTEGER,
                state_after_ack TEXT
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Insert or fully replace the row for `alarm.alarm_id`.
    pub async fn upsert(&self, alarm: &Alarm) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO alarms (
                alarm_id, alarm_class, alarm_state, raised_time, require_ack,
                delete_time, class_1_time, class_2_time, class_3_time,
                time_after_ack, class_after_ack, state_after_ack
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(alarm_id) DO UPDATE SET
                alarm_class     = excluded.alarm_class,
                alarm_state     = excluded.alarm_state,
                raised_time     = excluded.raised_time,
                require_ack     = excluded.require_ack,
                delete_time     = excluded.delete_time,
                class_1_time    = excluded.class_1_time,
                class_2_time    = excluded.class_2_time,
                class_3_time    = excluded.class_3_time,
                time_after_ack  = excluded.time_after_ack,
                class_after_ack = excluded.class_after_ack,
                state_after_ack = excluded.state_after_ack
            "#,
        )
        .bind(&alarm.alarm_id)
        .bind(alarm.alarm_class)
        .bind(&alarm.alarm_state)
        .bind(alarm.raised_time)
        .bind(alarm.require_ack)
        .bind(alarm.delete_time)
        .bind(alarm.class_1_time)
        .bind(alarm.class_2_time)
        .bind(alarm.class_3_time)
        .bind(alarm.time_after_ack)
        .bind(alarm.class_after_ack)
        .bind(alarm.state_after_ack.as_deref())
        .execute(&self.pool)
        .await?;

        debug!("Stored alarm {}", alarm.alarm_id);
        Ok(())
    }

    /// Point lookup by id.
    pub async fn get(&self, alarm_id: &str) -> Result<Option<Alarm>> {
        let alarm = sqlx::query_as::<_, Alarm>("SELECT * FROM alarms WHERE alarm_id = ?")
            .bind(alarm_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(alarm)
    }

    /// Filtered list, newest raised first.
    pub async fn query(&self, filter: &AlarmFilter) -> Result<Vec<Alarm>> {
        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT * FROM alarms");
        let mut separator = " WHERE ";

        if let Some(alarm_id) = &filter.alarm_id {
            builder.push(separator).push("alarm_id = ");
            builder.push_bind(alarm_id.clone());
            separator = " AND ";
        }
        if let Some(before) = filter.raised_before {
            builder.push(separator).push("raised_time <= ");
            builder.push_bind(before);
            separator = " AND ";
        }
        if let Some(after) = filter.raised_after {
            builder.push(separator).push("raised_time >= ");
            builder.push_bind(after);
        }

        builder.push(" ORDER BY raised_time DESC");

        let alarms = builder
            .build_query_as::<Alarm>()
            .fetch_all(&self.pool)
            .await?;

        Ok(alarms)
    }

    /// Delete the row for `alarm_id`. Returns the number of rows removed
    /// (0 or 1).
    pub async fn delete(&self, alarm_id: &str) -> Result<u64> {
        let result = sqlx::query("DELETE FROM alarms WHERE alarm_id = ?")
            .bind(alarm_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Records whose scheduled deletion has come due. The acknowledgment
    /// gate is the lifecycle engine's decision, not the store's.
    pub async fn scan_due_deletions(&self, now: i64) -> Result<Vec<Alarm>> {
        let alarms = sqlx::query_as::<_, Alarm>(
            "SELECT * FROM alarms WHERE delete_time IS NOT NULL AND delete_time <= ?",
        )
        .bind(now)
        .fetch_all(&self.pool)
        .await?;

        Ok(alarms)
    }

    /// Records with at least one due scheduled class transition.
    pub async fn scan_due_transitions(&self, now: i64) -> Result<Vec<Alarm>> {
        let alarms = sqlx::query_as::<_, Alarm>(
            r#"
            SELECT * FROM alarms
            WHERE (class_1_time IS NOT NULL AND class_1_time <= ?)
               OR (class_2_time IS NOT NULL AND class_2_time <= ?)
               OR (class_3_time IS NOT NULL AND class_3_time <= ?)
            "#,
        )
        .bind(now)
        .bind(now)
        .bind(now)
        .fetch_all(&self.pool)
        .await?;

        Ok(alarms)
    }

    /// Count of records currently displayed at `class`.
    pub async fn count_class(&self, class: AlarmClass) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM alarms WHERE alarm_class = ?")
            .bind(class)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
