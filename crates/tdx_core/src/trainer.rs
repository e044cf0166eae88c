//! The trainer profile model.
//!
//! A [`Trainer`] is always constructed by decoding a payload fetched from
//! the TrainerDex API; the remote service stays the source of truth. The
//! only way to change a trainer is [`Trainer::edit`], which round-trips
//! through the API and replaces the whole field set from the response.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;

use crate::client::ProfileApi;
use crate::error::{Result, TdxError};
use crate::faction::Faction;
use crate::update::PartialUpdate;

/// The complete decoded field set of a trainer payload.
///
/// Kept separate from [`Trainer`] so an edit can decode the fresh payload
/// in full before anything is overwritten; a failed edit leaves the old
/// fields untouched.
#[derive(Debug, Clone, PartialEq)]
struct TrainerFields {
    id: u64,
    old_id: u64,
    username: String,
    last_modified: Option<DateTime<Utc>>,
    start_date: Option<NaiveDate>,
    faction: Faction,
    trainer_code: Option<String>,
    is_banned: bool,
    is_verified: bool,
    is_visible: bool,
    raw_updates: Vec<Value>,
}

impl TrainerFields {
    fn decode(payload: &Value) -> Result<Self> {
        Ok(Self {
            id: require_int(payload, "owner")?,
            old_id: require_int(payload, "id")?,
            username: payload
                .get("username")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            last_modified: payload
                .get("last_modified")
                .and_then(Value::as_str)
                .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
                .map(|dt| dt.with_timezone(&Utc)),
            start_date: payload
                .get("start_date")
                .and_then(Value::as_str)
                .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()),
            faction: match payload.get("faction") {
                Some(Value::Number(n)) => {
                    let id = n.as_i64().ok_or_else(|| TdxError::decode("faction", payload))?;
                    Faction::from_id(id)?
                }
                Some(Value::Null) | None => Faction::Teamless,
                Some(_) => return Err(TdxError::decode("faction", payload)),
            },
            trainer_code: payload
                .get("trainer_code")
                .and_then(Value::as_str)
                .map(str::to_string),
            is_banned: payload
                .get("is_banned")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            is_verified: payload
                .get("is_verified")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            is_visible: payload
                .get("is_visible")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            raw_updates: payload
                .get("updates")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default(),
        })
    }
}

/// Required integer field; accepts either a JSON number or a digit string,
/// matching what the API has historically sent.
fn require_int(payload: &Value, field: &'static str) -> Result<u64> {
    match payload.get(field) {
        Some(Value::Number(n)) => n.as_u64().ok_or_else(|| TdxError::decode(field, payload)),
        Some(Value::String(s)) => s.parse().map_err(|_| TdxError::decode(field, payload)),
        _ => Err(TdxError::decode(field, payload)),
    }
}

/// The set of fields an edit may change.
///
/// Username and ids are deliberately absent: changing the username is
/// unsupported at the current API level and changing ids is forever
/// unsupported, so neither is representable here.
#[derive(Debug, Default, Clone)]
pub struct TrainerEdit {
    pub start_date: Option<NaiveDate>,
    pub faction: Option<Faction>,
    pub trainer_code: Option<String>,
    pub is_verified: Option<bool>,
    pub is_visible: Option<bool>,
}

impl TrainerEdit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start_date(mut self, date: NaiveDate) -> Self {
        self.start_date = Some(date);
        self
    }

    pub fn faction(mut self, faction: Faction) -> Self {
        self.faction = Some(faction);
        self
    }

    pub fn trainer_code(mut self, code: impl Into<String>) -> Self {
        self.trainer_code = Some(code.into());
        self
    }

    pub fn is_verified(mut self, verified: bool) -> Self {
        self.is_verified = Some(verified);
        self
    }

    pub fn is_visible(mut self, visible: bool) -> Self {
        self.is_visible = Some(visible);
        self
    }

    fn is_empty(&self) -> bool {
        self.start_date.is_none()
            && self.faction.is_none()
            && self.trainer_code.is_none()
            && self.is_verified.is_none()
            && self.is_visible.is_none()
    }

    /// Wire representation of the edit: only the fields that are set, with
    /// the faction as its integer code and the trainer code
    /// whitespace-stripped.
    fn into_fields(self) -> Value {
        let mut fields = serde_json::Map::new();
        if let Some(date) = self.start_date {
            fields.insert(
                "start_date".into(),
                Value::String(date.format("%Y-%m-%d").to_string()),
            );
        }
        if let Some(faction) = self.faction {
            fields.insert("faction".into(), Value::from(faction.id()));
        }
        if let Some(code) = self.trainer_code {
            fields.insert(
                "trainer_code".into(),
                Value::String(normalize_trainer_code(&code)),
            );
        }
        if let Some(verified) = self.is_verified {
            fields.insert("is_verified".into(), Value::Bool(verified));
        }
        if let Some(visible) = self.is_visible {
            fields.insert("is_visible".into(), Value::Bool(visible));
        }
        Value::Object(fields)
    }
}

/// A remote trainer profile.
pub struct Trainer {
    api: Arc<dyn ProfileApi>,
    fields: TrainerFields,
}

impl Trainer {
    /// Decode a trainer from an API payload. Fails when `owner` or `id`
    /// are absent or not integer-convertible, or the faction id is out of
    /// the known range.
    pub fn from_payload(api: Arc<dyn ProfileApi>, payload: &Value) -> Result<Self> {
        Ok(Self {
            api,
            fields: TrainerFields::decode(payload)?,
        })
    }

    /// Fetch and decode a trainer by its legacy id.
    pub async fn fetch(api: Arc<dyn ProfileApi>, trainer_id: u64) -> Result<Self> {
        let payload = api.get_trainer(trainer_id).await?;
        Self::from_payload(api, &payload)
    }

    /// Authoritative owner identifier.
    pub fn id(&self) -> u64 {
        self.fields.id
    }

    /// Legacy identifier used for API addressing.
    pub fn old_id(&self) -> u64 {
        self.fields.old_id
    }

    pub fn username(&self) -> &str {
        &self.fields.username
    }

    /// Alias of the username; the API has a single name field.
    pub fn nickname(&self) -> &str {
        &self.fields.username
    }

    pub fn last_modified(&self) -> Option<DateTime<Utc>> {
        self.fields.last_modified
    }

    pub fn start_date(&self) -> Option<NaiveDate> {
        self.fields.start_date
    }

    pub fn team(&self) -> Faction {
        self.fields.faction
    }

    pub fn trainer_code(&self) -> Option<&str> {
        self.fields.trainer_code.as_deref()
    }

    pub fn is_banned(&self) -> bool {
        self.fields.is_banned
    }

    pub fn is_verified(&self) -> bool {
        self.fields.is_verified
    }

    pub fn is_visible(&self) -> bool {
        self.fields.is_visible
    }

    /// Restartable sequence over the trainer's stat-submission references.
    ///
    /// Each element decodes lazily from the stored raw list; fetching the
    /// detail of an element ([`PartialUpdate::fetch`]) is a remote call.
    pub fn updates(&self) -> impl Iterator<Item = Result<PartialUpdate>> + '_ {
        self.fields.raw_updates.iter().map(PartialUpdate::decode)
    }

    /// The API handle this trainer round-trips through.
    pub fn api(&self) -> &Arc<dyn ProfileApi> {
        &self.api
    }

    /// Edit this trainer.
    ///
    /// The trainer code is whitespace-stripped before sending. The remote
    /// call is addressed by `old_id`; on success the whole field set is
    /// replaced from the response payload. On any failure (HTTP or decode)
    /// the trainer is left exactly as it was.
    pub async fn edit(&mut self, edit: TrainerEdit) -> Result<()> {
        if edit.is_empty() {
            return Ok(());
        }
        let fields = edit.into_fields();
        let payload = self.api.edit_trainer(self.fields.old_id, fields).await?;
        let fresh = TrainerFields::decode(&payload)?;
        self.fields = fresh;
        Ok(())
    }

    /// Submit a new stat update and refresh this trainer from the result.
    ///
    /// The submission endpoint is not implemented at the current API
    /// level; this always fails with an explicit error rather than
    /// silently succeeding.
    pub async fn post(&mut self, _total_xp: u64) -> Result<crate::update::Update> {
        Err(TdxError::UpdateSubmissionUnsupported)
    }
}

impl std::fmt::Debug for Trainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Trainer")
            .field("id", &self.fields.id)
            .field("old_id", &self.fields.old_id)
            .field("username", &self.fields.username)
            .field("faction", &self.fields.faction)
            .finish_non_exhaustive()
    }
}

/// Strip all whitespace (unicode included) from a trainer code.
fn normalize_trainer_code(code: &str) -> String {
    code.split_whitespace().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockProfileApi;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn sample_payload() -> Value {
        json!({
            "owner": 9001,
            "id": 311,
            "username": "JayTurnr",
            "last_modified": "2020-06-01T09:00:00Z",
            "start_date": "2016-07-14",
            "faction": 1,
            "trainer_code": "123456789012",
            "is_banned": false,
            "is_verified": true,
            "is_visible": true,
            "updates": [
                { "uuid": "u-1", "trainer": 311, "total_xp": 1_000_000 },
                { "uuid": "u-2", "trainer": 311, "total_xp": 2_000_000 }
            ]
        })
    }

    fn api() -> Arc<dyn ProfileApi> {
        Arc::new(MockProfileApi::new())
    }

    #[test]
    fn decode_maps_owner_to_id_and_id_to_old_id() {
        let trainer = Trainer::from_payload(api(), &sample_payload()).unwrap();
        assert_eq!(trainer.id(), 9001);
        assert_eq!(trainer.old_id(), 311);
        assert_eq!(trainer.username(), "JayTurnr");
        assert_eq!(trainer.nickname(), "JayTurnr");
        assert_eq!(trainer.team(), Faction::Mystic);
        assert_eq!(
            trainer.start_date(),
            Some(NaiveDate::from_ymd_opt(2016, 7, 14).unwrap())
        );
    }

    #[test]
    fn decode_accepts_digit_strings_for_required_ids() {
        let mut payload = sample_payload();
        payload["owner"] = json!("9001");
        payload["id"] = json!("311");
        let trainer = Trainer::from_payload(api(), &payload).unwrap();
        assert_eq!(trainer.id(), 9001);
        assert_eq!(trainer.old_id(), 311);
    }

    #[test]
    fn decode_fails_without_owner() {
        let mut payload = sample_payload();
        payload.as_object_mut().unwrap().remove("owner");
        assert!(matches!(
            Trainer::from_payload(api(), &payload),
            Err(TdxError::TrainerDecode { field: "owner", .. })
        ));
    }

    #[test]
    fn decode_rejects_out_of_range_faction() {
        let mut payload = sample_payload();
        payload["faction"] = json!(4);
        assert!(matches!(
            Trainer::from_payload(api(), &payload),
            Err(TdxError::UnknownFaction { id: 4 })
        ));
    }

    #[test]
    fn missing_faction_decodes_as_teamless() {
        let mut payload = sample_payload();
        payload.as_object_mut().unwrap().remove("faction");
        let trainer = Trainer::from_payload(api(), &payload).unwrap();
        assert_eq!(trainer.team(), Faction::Teamless);
    }

    #[test]
    fn updates_is_restartable() {
        let trainer = Trainer::from_payload(api(), &sample_payload()).unwrap();
        let first: Vec<_> = trainer.updates().collect::<Result<_>>().unwrap();
        let second: Vec<_> = trainer.updates().collect::<Result<_>>().unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn edit_normalizes_trainer_code_before_send() {
        let mut mock = MockProfileApi::new();
        mock.expect_edit_trainer()
            .withf(|id, fields| {
                *id == 311 && fields["trainer_code"] == json!("123456")
            })
            .returning(|_, _| Ok(sample_payload()));
        let mut trainer = Trainer::from_payload(Arc::new(mock), &sample_payload()).unwrap();

        trainer
            .edit(TrainerEdit::new().trainer_code("123 456"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn edit_sends_only_editable_fields() {
        let mut mock = MockProfileApi::new();
        mock.expect_edit_trainer()
            .withf(|_, fields| {
                let keys: Vec<_> = fields.as_object().unwrap().keys().cloned().collect();
                keys == ["faction", "is_visible"]
            })
            .returning(|_, _| Ok(sample_payload()));
        let mut trainer = Trainer::from_payload(Arc::new(mock), &sample_payload()).unwrap();

        trainer
            .edit(TrainerEdit::new().faction(Faction::Valor).is_visible(false))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn failed_edit_leaves_trainer_unchanged() {
        let mut mock = MockProfileApi::new();
        mock.expect_edit_trainer().returning(|_, _| {
            Err(TdxError::ApiStatus {
                endpoint: "trainers/311/".into(),
                status: 500,
                body_excerpt: String::new(),
            })
        });
        let mut trainer = Trainer::from_payload(Arc::new(mock), &sample_payload()).unwrap();
        let before = trainer.fields.clone();

        let result = trainer.edit(TrainerEdit::new().faction(Faction::Valor)).await;

        assert!(result.is_err());
        assert_eq!(trainer.fields, before);
    }

    #[tokio::test]
    async fn edit_replaces_state_from_response() {
        let mut fresh = sample_payload();
        fresh["faction"] = json!(2);
        fresh["username"] = json!("Renamed");
        let mut mock = MockProfileApi::new();
        mock.expect_edit_trainer().return_once(move |_, _| Ok(fresh));
        let mut trainer = Trainer::from_payload(Arc::new(mock), &sample_payload()).unwrap();

        trainer
            .edit(TrainerEdit::new().faction(Faction::Valor))
            .await
            .unwrap();

        assert_eq!(trainer.team(), Faction::Valor);
        assert_eq!(trainer.username(), "Renamed");
    }

    #[tokio::test]
    async fn empty_edit_skips_the_remote_call() {
        let mock = MockProfileApi::new();
        let mut trainer = Trainer::from_payload(Arc::new(mock), &sample_payload()).unwrap();
        trainer.edit(TrainerEdit::new()).await.unwrap();
    }

    #[tokio::test]
    async fn post_is_an_explicit_unsupported_error() {
        let mut trainer = Trainer::from_payload(api(), &sample_payload()).unwrap();
        assert!(matches!(
            trainer.post(20_000_000).await,
            Err(TdxError::UpdateSubmissionUnsupported)
        ));
    }

    #[test]
    fn trainer_code_normalization_handles_unicode_whitespace() {
        assert_eq!(normalize_trainer_code("1234 5678\u{a0}9012"), "123456789012");
    }
}
