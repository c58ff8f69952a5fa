use database::{
    entity::HOUSE_RULES_ID, load_all, load_entity, DatabaseError, Entity, EntityKind, FailedWrite,
    FrequentPlayer, PendingOp, PersistenceGateway, Record, SavedConfig,
};
use itertools::Itertools;
use types::{builtin_presets, HouseRules, RoleCatalog, RoleDefinition, RolePreset};
use uuid::Uuid;

use crate::{roster::FrequentPlayers, MatchSession};

impl Entity for MatchSession {
    const KIND: EntityKind = EntityKind::MatchSession;

    fn record_id(&self) -> String {
        self.id.to_string()
    }
}

/// Writes made on behalf of the running match.
///
/// A failed commit never reaches the caller as an error: the in-memory
/// session stays authoritative and the staged operations are kept here as
/// [`FailedWrite`]s until [`DurabilityLog::retry`] succeeds or they are
/// exported.
///
/// Only the newest operation per record is kept. A later write to the same
/// record, failed or not, replaces whatever was kept for it.
#[derive(Debug, Default)]
pub struct DurabilityLog {
    failed_writes: Vec<FailedWrite>,
}

impl DurabilityLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failed_writes(&self) -> &[FailedWrite] {
        &self.failed_writes
    }

    pub fn is_degraded(&self) -> bool {
        !self.failed_writes.is_empty()
    }

    pub fn export(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.failed_writes)
    }

    pub async fn save_session<S>(&mut self, store: &mut S, session: &MatchSession) -> bool
    where
        S: PersistenceGateway + ?Sized,
    {
        match session.to_record() {
            Ok(record) => self.write(store, "session", vec![PendingOp::Upsert(record)]).await,
            Err(e) => {
                self.keep_failure("session", &e, Vec::new());
                false
            }
        }
    }

    /// Replaces whatever configuration was saved before.
    pub async fn save_config<S>(&mut self, store: &mut S, config: &SavedConfig) -> bool
    where
        S: PersistenceGateway + ?Sized,
    {
        let record = match config.to_record() {
            Ok(record) => record,
            Err(e) => {
                self.keep_failure("config", &e, Vec::new());
                return false;
            }
        };
        let previous = match store.load(EntityKind::SavedConfig).await {
            Ok(records) => records,
            Err(e) => {
                self.keep_failure("config", &e, vec![PendingOp::Upsert(record)]);
                return false;
            }
        };
        let mut ops = previous
            .into_iter()
            .filter(|old| old.id != record.id)
            .map(|old| PendingOp::Delete {
                kind: old.kind,
                id: old.id,
            })
            .collect_vec();
        ops.push(PendingOp::Upsert(record));
        self.write(store, "config", ops).await
    }

    pub async fn save_frequent_players<S>(
        &mut self,
        store: &mut S,
        changed: &[FrequentPlayer],
    ) -> bool
    where
        S: PersistenceGateway + ?Sized,
    {
        if changed.is_empty() {
            return true;
        }
        let records: Result<Vec<Record>, DatabaseError> =
            changed.iter().map(FrequentPlayer::to_record).collect();
        match records {
            Ok(records) => {
                let ops = records.into_iter().map(PendingOp::Upsert).collect();
                self.write(store, "frequent players", ops).await
            }
            Err(e) => {
                self.keep_failure("frequent players", &e, Vec::new());
                false
            }
        }
    }

    pub async fn remove_frequent_player<S>(
        &mut self,
        store: &mut S,
        player: &FrequentPlayer,
    ) -> bool
    where
        S: PersistenceGateway + ?Sized,
    {
        let op = PendingOp::Delete {
            kind: EntityKind::FrequentPlayer,
            id: player.record_id(),
        };
        self.write(store, "frequent players", vec![op]).await
    }

    /// Replays every failed write that still carries its operations.
    /// Returns how many went through.
    pub async fn retry<S>(&mut self, store: &mut S) -> usize
    where
        S: PersistenceGateway + ?Sized,
    {
        let failed = std::mem::take(&mut self.failed_writes);
        let mut replayed = 0;
        for write in failed {
            match kept_ops(&write).filter(|ops| !ops.is_empty()) {
                Some(ops) => {
                    if self.write(store, "retry", ops).await {
                        replayed += 1;
                    }
                }
                None => self.failed_writes.push(write),
            }
        }
        replayed
    }

    async fn write<S>(&mut self, store: &mut S, what: &str, ops: Vec<PendingOp>) -> bool
    where
        S: PersistenceGateway + ?Sized,
    {
        match apply(store, &ops).await {
            Ok(()) => {
                self.supersede(&ops);
                true
            }
            Err(e) => {
                self.keep_failure(what, &e, ops);
                false
            }
        }
    }

    fn keep_failure(&mut self, what: &str, error: &DatabaseError, ops: Vec<PendingOp>) {
        log::warn!("Could not persist {what}, continuing without durability: {error}");
        let data = if ops.is_empty() {
            None
        } else {
            self.supersede(&ops);
            serde_json::to_value(&ops).ok()
        };
        self.failed_writes.push(FailedWrite::new(error, data));
    }

    /// Forgets every kept operation on a record that `ops` writes again.
    fn supersede(&mut self, ops: &[PendingOp]) {
        self.failed_writes.retain_mut(|write| {
            let Some(kept) = kept_ops(write) else {
                return true;
            };
            let before = kept.len();
            let remaining = kept
                .into_iter()
                .filter(|old| ops.iter().all(|new| new.key() != old.key()))
                .collect_vec();
            if remaining.is_empty() {
                return false;
            }
            if remaining.len() < before {
                write.data = serde_json::to_value(&remaining).ok();
            }
            true
        });
    }
}

fn kept_ops(write: &FailedWrite) -> Option<Vec<PendingOp>> {
    let data = write.data.clone()?;
    serde_json::from_value::<Vec<PendingOp>>(data).ok()
}

async fn apply<S>(store: &mut S, ops: &[PendingOp]) -> Result<(), DatabaseError>
where
    S: PersistenceGateway + ?Sized,
{
    for op in ops {
        match op {
            PendingOp::Upsert(record) => store.insert(record.clone()).await?,
            PendingOp::Delete { kind, id } => store.delete(*kind, id).await?,
        }
    }
    store.commit().await
}

pub async fn load_catalog<S>(store: &S) -> Result<RoleCatalog, DatabaseError>
where
    S: PersistenceGateway + ?Sized,
{
    let definitions = load_all::<RoleDefinition, S>(store).await?;
    Ok(RoleCatalog::from_definitions(definitions))
}

pub async fn load_rules<S>(store: &S) -> Result<HouseRules, DatabaseError>
where
    S: PersistenceGateway + ?Sized,
{
    match load_entity::<HouseRules, S>(store, HOUSE_RULES_ID).await {
        Ok(rules) => Ok(rules.sanitized()),
        Err(DatabaseError::RecordNotFound { .. }) => Ok(HouseRules::default()),
        Err(e) => Err(e),
    }
}

/// Stored presets ordered by size, or the built-in ones if none are stored.
pub async fn load_presets<S>(store: &S) -> Result<Vec<RolePreset>, DatabaseError>
where
    S: PersistenceGateway + ?Sized,
{
    let mut presets = load_all::<RolePreset, S>(store).await?;
    if presets.is_empty() {
        presets = builtin_presets();
    }
    presets.sort_by(|a, b| a.min_players.cmp(&b.min_players).then(a.id.cmp(&b.id)));
    Ok(presets)
}

pub async fn load_last_config<S>(store: &S) -> Result<Option<SavedConfig>, DatabaseError>
where
    S: PersistenceGateway + ?Sized,
{
    let configs = load_all::<SavedConfig, S>(store).await?;
    Ok(configs.into_iter().max_by_key(|config| config.date))
}

pub async fn load_frequent_players<S>(store: &S) -> Result<FrequentPlayers, DatabaseError>
where
    S: PersistenceGateway + ?Sized,
{
    Ok(FrequentPlayers::new(load_all::<FrequentPlayer, S>(store).await?))
}

pub async fn load_session<S>(store: &S, id: Uuid) -> Result<MatchSession, DatabaseError>
where
    S: PersistenceGateway + ?Sized,
{
    load_entity::<MatchSession, S>(store, &id.to_string()).await
}

pub async fn session_ids<S>(store: &S) -> Result<Vec<Uuid>, DatabaseError>
where
    S: PersistenceGateway + ?Sized,
{
    store
        .load(EntityKind::MatchSession)
        .await?
        .iter()
        .map(Record::uuid_id)
        .collect()
}
