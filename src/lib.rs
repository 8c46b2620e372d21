pub mod app;
pub mod cli;
pub mod core;
pub mod history;
pub mod model;
pub mod persistence;
pub mod speech;
pub mod vocabulary;

pub use app::{
    App,
    AppState,
    Tab,
    TutorContext,
};
pub use crate::core::{
    Config,
    GengoError,
};
pub use history::HistoryStore;
