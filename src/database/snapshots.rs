use super::models::ApiResponseSnapshot;
use super::Database;
use crate::errors::MonitorResult;
use crate::logger::{self, LogTag};
use chrono::Utc;
use rusqlite::{params, OptionalExtension};

impl Database {
    /// Append a snapshot for `endpoint`, returning its row id
    pub fn save_snapshot(&self, endpoint: &str, payload: &serde_json::Value) -> MonitorResult<i64> {
        let response = serde_json::to_string(payload)?;
        let timestamp = Utc::now().to_rfc3339();

        self.conn.execute(
            "INSERT INTO api_responses (endpoint, response, timestamp) VALUES (?1, ?2, ?3)",
            params![endpoint, response, timestamp],
        )?;
        let id = self.conn.last_insert_rowid();

        logger::info(
            LogTag::Database,
            &format!("Saved snapshot #{} for endpoint: {}", id, endpoint),
        );
        Ok(id)
    }

    /// Payload of the most recent snapshot for `endpoint`
    pub fn latest_snapshot(&self, endpoint: &str) -> MonitorResult<Option<serde_json::Value>> {
        Ok(self
            .latest_snapshot_record(endpoint)?
            .map(|snapshot| snapshot.response))
    }

    /// Full record of the most recent snapshot for `endpoint`
    pub fn latest_snapshot_record(
        &self,
        endpoint: &str,
    ) -> MonitorResult<Option<ApiResponseSnapshot>> {
        let row = self
            .conn
            .query_row(
                "SELECT id, endpoint, response, timestamp FROM api_responses
                 WHERE endpoint = ?1 ORDER BY id DESC LIMIT 1",
                params![endpoint],
                |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                    ))
                },
            )
            .optional()?;

        match row {
            Some((id, endpoint, response, timestamp)) => Ok(Some(ApiResponseSnapshot {
                id,
                endpoint,
                response: serde_json::from_str(&response)?,
                timestamp,
            })),
            None => Ok(None),
        }
    }

    /// Number of snapshots stored for `endpoint`
    pub fn snapshot_count(&self, endpoint: &str) -> MonitorResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM api_responses WHERE endpoint = ?1",
            params![endpoint],
            |row| row.get(0),
        )?;
        Ok(count.max(0) as u64)
    }
}
