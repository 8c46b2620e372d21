use std::collections::HashSet;

use tracing::{
    debug,
    warn,
};

use crate::{
    core::{
        utils::text_matches_search,
        AnalysisPayload,
        AnalysisRecord,
        GengoError,
        RecordId,
    },
    persistence::SnapshotStore,
};

pub fn encode_snapshot(records: &[AnalysisRecord]) -> Result<String, GengoError> {
    Ok(serde_json::to_string(records)?)
}

/// Parses a stored snapshot. Records repeating an earlier id are dropped.
pub fn decode_snapshot(contents: &str) -> Result<Vec<AnalysisRecord>, GengoError> {
    let records: Vec<AnalysisRecord> = serde_json::from_str(contents)
        .map_err(|e| GengoError::PersistenceLoad(e.to_string()))?;

    let mut seen = HashSet::new();
    let total = records.len();
    let unique: Vec<AnalysisRecord> =
        records.into_iter().filter(|record| seen.insert(record.id)).collect();

    if unique.len() != total {
        warn!("Dropped {} duplicate record(s) from history snapshot", total - unique.len());
    }

    Ok(unique)
}

/// Analysed sentences, newest first, mirrored to a single key of the snapshot store
/// after every mutation.
#[derive(Debug)]
pub struct HistoryStore<S: SnapshotStore> {
    records: Vec<AnalysisRecord>,
    storage: S,
    key: String,
}

impl<S: SnapshotStore> HistoryStore<S> {
    /// Never fails: an unreadable or corrupt snapshot is logged and replaced by an
    /// empty history.
    pub fn open(storage: S, key: impl Into<String>) -> Self {
        let key = key.into();
        let records = match Self::load_records(&storage, &key) {
            Ok(records) => records,
            Err(e) => {
                warn!("{}. Starting with an empty history.", e);
                Vec::new()
            }
        };

        debug!("Loaded {} history record(s) from '{}'", records.len(), key);
        Self { records, storage, key }
    }

    fn load_records(storage: &S, key: &str) -> Result<Vec<AnalysisRecord>, GengoError> {
        let contents = storage.read(key).map_err(|e| GengoError::PersistenceLoad(e.to_string()))?;
        match contents {
            Some(contents) => decode_snapshot(&contents),
            None => Ok(Vec::new()),
        }
    }

    fn persist(&mut self) -> Result<(), GengoError> {
        let snapshot = encode_snapshot(&self.records)?;
        self.storage
            .write(&self.key, &snapshot)
            .map_err(|e| GengoError::PersistenceSave(e.to_string()))
    }

    pub fn append(
        &mut self,
        payload: AnalysisPayload,
        original_text: &str,
    ) -> Result<AnalysisRecord, GengoError> {
        let record = AnalysisRecord::from_payload(payload, original_text);
        self.records.insert(0, record.clone());

        if let Err(e) = self.persist() {
            self.records.remove(0);
            return Err(e);
        }

        Ok(record)
    }

    pub fn remove(&mut self, id: &RecordId) -> Result<bool, GengoError> {
        let Some(pos) = self.records.iter().position(|record| &record.id == id) else {
            return Ok(false);
        };

        let removed = self.records.remove(pos);
        if let Err(e) = self.persist() {
            self.records.insert(pos, removed);
            return Err(e);
        }

        Ok(true)
    }

    pub fn clear(&mut self) -> Result<usize, GengoError> {
        let removed = std::mem::take(&mut self.records);
        if let Err(e) = self.persist() {
            self.records = removed;
            return Err(e);
        }

        Ok(removed.len())
    }

    pub fn all(&self) -> &[AnalysisRecord] {
        &self.records
    }

    pub fn most_recent(&self) -> Option<&AnalysisRecord> {
        self.records.first()
    }

    pub fn get(&self, id: &RecordId) -> Option<&AnalysisRecord> {
        self.records.iter().find(|record| &record.id == id)
    }

    /// Looks a record up by its full id or by a unique trailing fragment of it,
    /// which is what listings show.
    pub fn find(&self, key: &str) -> Result<&AnalysisRecord, GengoError> {
        let needle = key.trim().to_lowercase().replace('-', "");
        if needle.is_empty() {
            return Err(GengoError::InvalidInput("record id is empty".to_string()));
        }

        let mut matches = self
            .records
            .iter()
            .filter(|record| record.id.simple().to_string().ends_with(&needle));

        match (matches.next(), matches.next()) {
            (Some(record), None) => Ok(record),
            (Some(_), Some(_)) => Err(GengoError::AmbiguousId(key.to_string())),
            (None, _) => Err(GengoError::NotFound(key.to_string())),
        }
    }

    pub fn search(&self, term: &str) -> Vec<&AnalysisRecord> {
        self.records
            .iter()
            .filter(|record| {
                text_matches_search(&record.original_text, term)
                    || text_matches_search(&record.translation, term)
                    || text_matches_search(&record.detected_language, term)
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}
