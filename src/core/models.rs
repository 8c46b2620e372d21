use chrono::{
    DateTime,
    Utc,
};
use serde::{
    Deserialize,
    Serialize,
};
use uuid::Uuid;

/// Record ids are UUIDv7, so byte order follows creation order.
pub type RecordId = Uuid;

pub fn new_record_id() -> RecordId {
    Uuid::now_v7()
}

pub fn short_id(id: &RecordId) -> String {
    let simple = id.simple().to_string();
    simple[simple.len() - 8..].to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrammarPoint {
    pub pattern: String,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabularyItem {
    pub word: String,
    pub reading: String,
    pub meaning: String,
    pub part_of_speech: String,
}

/// Shape the model is asked to return for a sentence breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisPayload {
    pub language: String,
    pub translation: String,
    pub grammar_points: Vec<GrammarPoint>,
    pub vocabulary: Vec<VocabularyItem>,
}

/// One analysed sentence as kept in the history. Never edited after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRecord {
    pub id: RecordId,
    pub created_at: DateTime<Utc>,
    pub original_text: String,
    pub translation: String,
    pub detected_language: String,
    pub grammar_points: Vec<GrammarPoint>,
    pub vocabulary: Vec<VocabularyItem>,
}

impl AnalysisRecord {
    pub fn from_payload(payload: AnalysisPayload, original_text: impl Into<String>) -> Self {
        Self {
            id: new_record_id(),
            created_at: Utc::now(),
            original_text: original_text.into(),
            translation: payload.translation,
            detected_language: payload.language,
            grammar_points: payload.grammar_points,
            vocabulary: payload.vocabulary,
        }
    }

    // Last 8 hex digits; the leading bits of a v7 id are a timestamp.
    pub fn short_id(&self) -> String {
        short_id(&self.id)
    }

    pub fn format_created_at(&self) -> String {
        let local_time = self.created_at.with_timezone(&chrono::Local);
        local_time.format("%Y-%m-%d %H:%M").to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TutorAnswer {
    pub id: RecordId,
    pub created_at: DateTime<Utc>,
    pub question: String,
    pub answer: String,
    pub related_sentence: Option<String>,
}

impl TutorAnswer {
    pub fn new(
        question: impl Into<String>,
        answer: impl Into<String>,
        related_sentence: Option<String>,
    ) -> Self {
        Self {
            id: new_record_id(),
            created_at: Utc::now(),
            question: question.into(),
            answer: answer.into(),
            related_sentence,
        }
    }
}
