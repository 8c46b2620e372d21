use std::{
    collections::HashSet,
    io::Write,
};

use serde::Serialize;

use crate::core::{
    utils::{
        collate,
        text_matches_search,
    },
    AnalysisRecord,
    GengoError,
    RecordId,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VocabEntry {
    pub word: String,
    pub reading: String,
    pub meaning: String,
    pub part_of_speech: String,
    pub language: String,
    #[serde(skip)]
    pub record_id: RecordId,
    #[serde(skip)]
    pub sentence: String,
}

/// Flattens every record's vocabulary, keeps the first occurrence of each word and
/// sorts by word. `records` is newest-first, so the newest record wins.
pub fn build(records: &[AnalysisRecord]) -> Vec<VocabEntry> {
    let mut seen = HashSet::new();
    let mut entries: Vec<VocabEntry> = records
        .iter()
        .flat_map(|record| {
            record.vocabulary.iter().map(move |item| VocabEntry {
                word: item.word.clone(),
                reading: item.reading.clone(),
                meaning: item.meaning.clone(),
                part_of_speech: item.part_of_speech.clone(),
                language: record.detected_language.clone(),
                record_id: record.id,
                sentence: record.original_text.clone(),
            })
        })
        .filter(|entry| seen.insert(entry.word.clone()))
        .collect();

    entries.sort_by(|a, b| collate(&a.word, &b.word));
    entries
}

pub fn matches_search(entry: &VocabEntry, term: &str) -> bool {
    text_matches_search(&entry.word, term)
        || text_matches_search(&entry.reading, term)
        || text_matches_search(&entry.meaning, term)
}

pub fn filter(entries: &[VocabEntry], term: &str) -> Vec<VocabEntry> {
    entries.iter().filter(|entry| matches_search(entry, term)).cloned().collect()
}

pub fn export_csv<W: Write>(entries: &[VocabEntry], writer: W) -> Result<usize, GengoError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for entry in entries {
        csv_writer.serialize(entry)?;
    }
    csv_writer.flush()?;
    Ok(entries.len())
}
