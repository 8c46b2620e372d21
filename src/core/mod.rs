pub mod config;
pub mod errors;
pub mod http;
pub mod models;
pub mod utils;

pub use config::{
    Config,
    Overrides,
    Settings,
};
pub use errors::GengoError;
pub use models::{
    AnalysisPayload,
    AnalysisRecord,
    GrammarPoint,
    RecordId,
    TutorAnswer,
    VocabularyItem,
};
