//! Stat update references and detail records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::ProfileApi;
use crate::error::{Result, TdxError};

/// Lightweight reference to one historical stat submission.
///
/// Carried inside a trainer payload; holds only the identifying fields.
/// [`PartialUpdate::fetch`] performs a remote call to materialize the full
/// [`Update`] record on demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartialUpdate {
    pub uuid: String,
    #[serde(rename = "trainer")]
    pub trainer_id: u64,
    #[serde(default)]
    pub total_xp: Option<u64>,
    #[serde(default)]
    pub update_time: Option<DateTime<Utc>>,
}

impl PartialUpdate {
    pub fn decode(value: &Value) -> Result<Self> {
        serde_json::from_value(value.clone()).map_err(|_| TdxError::decode("updates", value))
    }

    /// XP of this submission, zero when the submission carried none.
    pub fn xp(&self) -> u64 {
        self.total_xp.unwrap_or(0)
    }

    /// Fetch the full update detail. This is an I/O-bearing call against
    /// the remote service, one request per invocation.
    pub async fn fetch(&self, api: &dyn ProfileApi) -> Result<Update> {
        let payload = api.get_update(self.trainer_id, &self.uuid).await?;
        serde_json::from_value(payload.clone()).map_err(|_| TdxError::decode("update", &payload))
    }
}

/// Full detail of one stat submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Update {
    pub uuid: String,
    #[serde(rename = "trainer")]
    pub trainer_id: u64,
    #[serde(default)]
    pub total_xp: Option<u64>,
    #[serde(default)]
    pub update_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub data_source: Option<String>,
    #[serde(default)]
    pub submission_date: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn partial_update_decodes_from_trainer_payload_entry() {
        let entry = json!({
            "uuid": "5d2c-88aa",
            "trainer": 311,
            "total_xp": 20_000_000,
            "update_time": "2020-05-01T12:30:00Z"
        });
        let partial = PartialUpdate::decode(&entry).unwrap();
        assert_eq!(partial.trainer_id, 311);
        assert_eq!(partial.xp(), 20_000_000);
    }

    #[test]
    fn missing_xp_reads_as_zero() {
        let entry = json!({ "uuid": "abc", "trainer": 1 });
        let partial = PartialUpdate::decode(&entry).unwrap();
        assert_eq!(partial.xp(), 0);
    }

    #[test]
    fn entry_without_uuid_fails_decode() {
        let entry = json!({ "trainer": 1 });
        assert!(matches!(
            PartialUpdate::decode(&entry),
            Err(TdxError::TrainerDecode { field: "updates", .. })
        ));
    }
}
