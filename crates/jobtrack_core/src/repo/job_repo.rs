//! Record store over the key-value adapter.
//!
//! # Responsibility
//! - Own the ordered sequence of job applications for one session.
//! - Persist the full sequence synchronously after every mutation.
//!
//! # Invariants
//! - Insertion order is the only order; nothing here sorts.
//! - Ids are unique and non-empty; issued ids strictly increase until the
//!   numeric range is exhausted, then take the first free clock value.
//! - A failed persist leaves the in-memory sequence unchanged.
//! - Reads fail soft: absent or malformed payloads load as empty.
//! - A payload repeating an id is malformed.
//! - Malformed payloads are copied to the recovery key before they can be
//!   overwritten.

use crate::model::job::{JobApplication, JobApplicationInput, JobId};
use crate::repo::kv_repo::{KeyValueStore, KvError, CORRUPT_JOBS_KEY, JOBS_KEY};
use log::{debug, info, warn};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};

pub type StoreResult<T> = Result<T, StoreError>;

/// Record store error.
#[derive(Debug)]
pub enum StoreError {
    /// Inserted record carries an empty id.
    EmptyId,
    /// Inserted record reuses an id already held by the store.
    DuplicateId(JobId),
    /// Update target does not exist.
    NotFound(JobId),
    /// Underlying key-value store failure.
    Kv(KvError),
    /// Record sequence could not be encoded or an import payload decoded.
    Serde(serde_json::Error),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "job id cannot be empty"),
            Self::DuplicateId(id) => write!(f, "job id already exists: {id}"),
            Self::NotFound(id) => write!(f, "job not found: {id}"),
            Self::Kv(err) => write!(f, "{err}"),
            Self::Serde(err) => write!(f, "invalid job payload: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Kv(err) => Some(err),
            Self::Serde(err) => Some(err),
            Self::EmptyId | Self::DuplicateId(_) | Self::NotFound(_) => None,
        }
    }
}

impl From<KvError> for StoreError {
    fn from(value: KvError) -> Self {
        Self::Kv(value)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serde(value)
    }
}

/// Ordered, persisted collection of job applications.
pub struct JobStore<S: KeyValueStore> {
    kv: S,
    records: Vec<JobApplication>,
    last_issued_ms: u64,
}

impl<S: KeyValueStore> JobStore<S> {
    /// Loads the persisted sequence; never fails.
    pub fn open(kv: S) -> Self {
        let records = load_all(&kv);
        let last_issued_ms = records
            .iter()
            .filter_map(|record| record.id.epoch_ms())
            .max()
            .unwrap_or(0);
        Self {
            kv,
            records,
            last_issued_ms,
        }
    }

    /// Backing key-value store, shared with preference storage.
    pub fn kv(&self) -> &S {
        &self.kv
    }

    /// Read-only snapshot in insertion order.
    pub fn records(&self) -> &[JobApplication] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &JobId) -> Option<&JobApplication> {
        self.records.iter().find(|record| &record.id == id)
    }

    /// Re-reads the persisted sequence without touching in-memory state.
    pub fn load_all(&self) -> Vec<JobApplication> {
        load_all(&self.kv)
    }

    /// Stores form input as a new record at the end of the sequence.
    ///
    /// The store does not re-check required fields; callers validate input.
    pub fn add(&mut self, input: JobApplicationInput) -> StoreResult<JobApplication> {
        let id = self.next_id();
        self.insert(JobApplication::from_input(id, input))
    }

    /// Appends a record that already carries an id (import path).
    ///
    /// # Errors
    /// - `EmptyId` / `DuplicateId` before any mutation.
    /// - `Kv` / `Serde` when persisting fails; the append is rolled back.
    pub fn insert(&mut self, record: JobApplication) -> StoreResult<JobApplication> {
        self.check_insertable(&record.id)?;

        self.records.push(record.clone());
        if let Err(err) = self.persist() {
            self.records.pop();
            warn!(
                "event=job_add module=store status=error id={} error={err}",
                record.id
            );
            return Err(err);
        }

        self.observe_id(&record.id);
        info!(
            "event=job_add module=store status=ok id={} total={}",
            record.id,
            self.records.len()
        );
        Ok(record)
    }

    /// Replaces the record with `id` in place, keeping its position.
    ///
    /// # Errors
    /// - `NotFound` when no record has `id`; nothing is persisted then.
    pub fn update(
        &mut self,
        id: &JobId,
        input: JobApplicationInput,
    ) -> StoreResult<JobApplication> {
        let Some(index) = self.position_of(id) else {
            debug!("event=job_update module=store status=not_found id={id}");
            return Err(StoreError::NotFound(id.clone()));
        };

        let updated = JobApplication::from_input(id.clone(), input);
        let previous = std::mem::replace(&mut self.records[index], updated.clone());
        if let Err(err) = self.persist() {
            self.records[index] = previous;
            warn!("event=job_update module=store status=error id={id} error={err}");
            return Err(err);
        }

        info!("event=job_update module=store status=ok id={id} position={index}");
        Ok(updated)
    }

    /// Deletes the record with `id`; returns whether one was removed.
    pub fn remove(&mut self, id: &JobId) -> StoreResult<bool> {
        let Some(index) = self.position_of(id) else {
            debug!("event=job_remove module=store status=not_found id={id}");
            return Ok(false);
        };

        let removed = self.records.remove(index);
        if let Err(err) = self.persist() {
            self.records.insert(index, removed);
            warn!("event=job_remove module=store status=error id={id} error={err}");
            return Err(err);
        }

        info!(
            "event=job_remove module=store status=ok id={id} total={}",
            self.records.len()
        );
        Ok(true)
    }

    /// Appends every record of a JSON array in the persisted format.
    ///
    /// All-or-nothing: one empty or duplicate id rejects the whole batch.
    pub fn import_json(&mut self, payload: &str) -> StoreResult<usize> {
        let incoming: Vec<JobApplication> = serde_json::from_str(payload)?;

        let mut seen = HashSet::new();
        for record in &incoming {
            self.check_insertable(&record.id)?;
            if !seen.insert(record.id.clone()) {
                return Err(StoreError::DuplicateId(record.id.clone()));
            }
        }

        let count = incoming.len();
        let previous_len = self.records.len();
        self.records.extend(incoming);
        if let Err(err) = self.persist() {
            self.records.truncate(previous_len);
            return Err(err);
        }

        for index in previous_len..self.records.len() {
            let id = self.records[index].id.clone();
            self.observe_id(&id);
        }
        info!("event=job_import module=store status=ok imported={count}");
        Ok(count)
    }

    /// Pretty-printed JSON array of the current sequence.
    pub fn export_json(&self) -> StoreResult<String> {
        Ok(serde_json::to_string_pretty(&self.records)?)
    }

    /// Writes the full sequence under the jobs key.
    pub fn persist(&self) -> StoreResult<()> {
        let payload = serde_json::to_string(&self.records)?;
        self.kv.set(JOBS_KEY, &payload)?;
        debug!(
            "event=jobs_persist module=store status=ok records={} bytes={}",
            self.records.len(),
            payload.len()
        );
        Ok(())
    }

    fn check_insertable(&self, id: &JobId) -> StoreResult<()> {
        if id.is_empty() {
            return Err(StoreError::EmptyId);
        }
        if self.position_of(id).is_some() {
            return Err(StoreError::DuplicateId(id.clone()));
        }
        Ok(())
    }

    fn position_of(&self, id: &JobId) -> Option<usize> {
        self.records.iter().position(|record| &record.id == id)
    }

    fn observe_id(&mut self, id: &JobId) {
        if let Some(epoch_ms) = id.epoch_ms() {
            self.last_issued_ms = self.last_issued_ms.max(epoch_ms);
        }
    }

    /// Above the last issued id when there is room; otherwise the first
    /// free value from the clock.
    fn next_id(&mut self) -> JobId {
        let mut candidate = match self.last_issued_ms.checked_add(1) {
            Some(above) => now_epoch_ms().max(above),
            None => now_epoch_ms(),
        };
        while self.position_of(&JobId::from_epoch_ms(candidate)).is_some() {
            candidate = candidate.wrapping_add(1);
        }
        self.last_issued_ms = self.last_issued_ms.max(candidate);
        JobId::from_epoch_ms(candidate)
    }
}

/// Reads and decodes the persisted sequence, degrading to empty on any failure.
pub fn load_all(kv: &impl KeyValueStore) -> Vec<JobApplication> {
    let raw = match kv.get(JOBS_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            debug!("event=jobs_load module=store status=empty");
            return Vec::new();
        }
        Err(err) => {
            warn!(
                "event=jobs_load module=store status=error error_code=kv_read_failed error={err}"
            );
            return Vec::new();
        }
    };

    let records = match serde_json::from_str::<Vec<JobApplication>>(&raw) {
        Ok(records) => records,
        Err(err) => {
            warn!(
                "event=jobs_load module=store status=malformed bytes={} line={} column={}",
                raw.len(),
                err.line(),
                err.column()
            );
            keep_corrupt_payload(kv, &raw);
            return Vec::new();
        }
    };

    if let Some(id) = first_repeated_id(&records) {
        warn!(
            "event=jobs_load module=store status=malformed error_code=duplicate_id id={id} \
             records={}",
            records.len()
        );
        keep_corrupt_payload(kv, &raw);
        return Vec::new();
    }

    info!(
        "event=jobs_load module=store status=ok records={}",
        records.len()
    );
    records
}

fn first_repeated_id(records: &[JobApplication]) -> Option<&JobId> {
    let mut seen = HashSet::new();
    records
        .iter()
        .map(|record| &record.id)
        .find(|id| !seen.insert(*id))
}

fn keep_corrupt_payload(kv: &impl KeyValueStore, raw: &str) {
    match kv.set(CORRUPT_JOBS_KEY, raw) {
        Ok(()) => info!(
            "event=jobs_backup module=store status=ok key={CORRUPT_JOBS_KEY} bytes={}",
            raw.len()
        ),
        Err(err) => warn!("event=jobs_backup module=store status=error error={err}"),
    }
}

fn now_epoch_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}
