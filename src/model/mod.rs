//! Request shaping for the generative model, the gateway that sends it, and the
//! parser that turns the reply back into typed records.

use serde_json::{
    json,
    Value,
};

use crate::core::GengoError;

pub mod gateway;
pub mod parser;

pub use gateway::{
    GeminiGateway,
    ModelGateway,
};
pub use parser::{
    parse_analysis,
    parse_tutor_answer,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Analysis,
    Tutor,
}

impl RequestKind {
    pub fn label(&self) -> &'static str {
        match self {
            RequestKind::Analysis => "analysis",
            RequestKind::Tutor => "tutor",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelRequest {
    pub kind: RequestKind,
    pub prompt: String,
    /// Strict output shape. `None` means free text.
    pub schema: Option<Value>,
}

pub fn analysis_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "language": {
                "type": "STRING",
                "description": "Name of the detected language, in English, e.g. \"Japanese\"."
            },
            "translation": {
                "type": "STRING",
                "description": "Natural English translation of the sentence."
            },
            "grammarPoints": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "pattern": { "type": "STRING" },
                        "explanation": { "type": "STRING" }
                    },
                    "required": ["pattern", "explanation"]
                }
            },
            "vocabulary": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "word": { "type": "STRING" },
                        "reading": { "type": "STRING" },
                        "meaning": { "type": "STRING" },
                        "partOfSpeech": { "type": "STRING" }
                    },
                    "required": ["word", "reading", "meaning", "partOfSpeech"]
                }
            }
        },
        "required": ["language", "translation", "grammarPoints", "vocabulary"]
    })
}

pub fn build_analysis_request(sentence: &str) -> Result<ModelRequest, GengoError> {
    let sentence = sentence.trim();
    if sentence.is_empty() {
        return Err(GengoError::InvalidInput("sentence is empty".to_string()));
    }

    let prompt = format!(
        "Analyze the following sentence for a language learner.\n\
         1. Detect the language of the sentence.\n\
         2. Give a natural English translation.\n\
         3. List the important grammar points as pattern/explanation pairs.\n\
         4. List the vocabulary with the word as written, its reading or pronunciation, \
         its meaning and its part of speech.\n\
         \n\
         Sentence: \"{sentence}\""
    );

    Ok(ModelRequest { kind: RequestKind::Analysis, prompt, schema: Some(analysis_schema()) })
}

pub fn build_tutor_request(
    question: &str,
    context_sentence: Option<&str>,
) -> Result<ModelRequest, GengoError> {
    let question = question.trim();
    if question.is_empty() {
        return Err(GengoError::InvalidInput("question is empty".to_string()));
    }

    let mut prompt = String::from(
        "You are a friendly and knowledgeable language tutor. \
         Answer the student's question concisely. \
         Use markdown-style bullet points and **bold** for key terms.\n",
    );

    if let Some(context) = context_sentence.map(str::trim).filter(|c| !c.is_empty()) {
        prompt.push_str(&format!(
            "\nThe student is currently studying this sentence: \"{context}\". \
             Take it into account when answering.\n"
        ));
    }

    prompt.push_str(&format!("\nQuestion: {question}"));

    Ok(ModelRequest { kind: RequestKind::Tutor, prompt, schema: None })
}
