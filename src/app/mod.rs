use std::{
    fmt,
    str::FromStr,
};

use tracing::{
    debug,
    info,
};

use crate::{
    core::{
        AnalysisRecord,
        GengoError,
        RecordId,
        TutorAnswer,
    },
    history::HistoryStore,
    model::{
        build_analysis_request,
        build_tutor_request,
        parse_analysis,
        parse_tutor_answer,
        ModelGateway,
        RequestKind,
    },
    persistence::SnapshotStore,
    vocabulary::{
        self,
        VocabEntry,
    },
};

pub mod render;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Analyze,
    Tutor,
    History,
    Vocabulary,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Analyze, Tab::Tutor, Tab::History, Tab::Vocabulary];

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Analyze => "Analyze",
            Tab::Tutor => "Tutor",
            Tab::History => "History",
            Tab::Vocabulary => "Vocabulary",
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

impl FromStr for Tab {
    type Err = GengoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "analyze" | "analysis" | "a" => Ok(Tab::Analyze),
            "tutor" | "ask" | "t" => Ok(Tab::Tutor),
            "history" | "h" => Ok(Tab::History),
            "vocabulary" | "vocab" | "v" => Ok(Tab::Vocabulary),
            other => Err(GengoError::InvalidInput(format!("unknown tab '{other}'"))),
        }
    }
}

/// At most one model call in flight. Submissions outside `Idle` are rejected, not queued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestGate {
    #[default]
    Idle,
    Pending(RequestKind),
}

impl RequestGate {
    pub fn begin(&mut self, kind: RequestKind) -> Result<(), GengoError> {
        match self {
            RequestGate::Idle => {
                *self = RequestGate::Pending(kind);
                Ok(())
            }
            RequestGate::Pending(_) => Err(GengoError::Busy),
        }
    }

    pub fn finish(&mut self) {
        *self = RequestGate::Idle;
    }

    pub fn is_busy(&self) -> bool {
        matches!(self, RequestGate::Pending(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Info, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Error, message: message.into() }
    }
}

/// Which sentence a tutor question is asked about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TutorContext {
    MostRecent,
    Record(RecordId),
    Nothing,
}

#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub tab: Tab,
    pub gate: RequestGate,
    pub selected: Option<RecordId>,
    pub current_answer: Option<TutorAnswer>,
    pub notice: Option<Notice>,
    pub history_search: String,
    pub vocabulary_search: String,
}

pub struct App<G: ModelGateway, S: SnapshotStore> {
    gateway: G,
    history: HistoryStore<S>,
    state: AppState,
}

impl<G: ModelGateway, S: SnapshotStore> App<G, S> {
    pub fn new(gateway: G, history: HistoryStore<S>) -> Self {
        Self { gateway, history, state: AppState::default() }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut AppState {
        &mut self.state
    }

    pub fn history(&self) -> &HistoryStore<S> {
        &self.history
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    fn settle<T>(&mut self, result: Result<T, GengoError>) -> Result<T, GengoError> {
        match &result {
            Ok(_) => self.state.notice = None,
            Err(e) => {
                debug!("{}", e);
                self.state.notice = Some(Notice::error(e.user_message()));
            }
        }
        result
    }

    fn open_gate(&mut self, kind: RequestKind) -> Result<(), GengoError> {
        self.state.gate.begin(kind).inspect_err(|_| {
            info!("Rejected {} request: another request is in flight", kind.label());
        })
    }

    pub async fn analyze(&mut self, sentence: &str) -> Result<AnalysisRecord, GengoError> {
        if let Err(e) = self.open_gate(RequestKind::Analysis) {
            return self.settle(Err(e));
        }
        let result = self.run_analysis(sentence).await;
        self.state.gate.finish();
        self.settle(result)
    }

    async fn run_analysis(&mut self, sentence: &str) -> Result<AnalysisRecord, GengoError> {
        let request = build_analysis_request(sentence)?;
        let raw = self.gateway.generate(&request).await?;
        let payload = parse_analysis(&raw)?;
        let record = self.history.append(payload, sentence.trim())?;

        self.state.tab = Tab::Analyze;
        self.state.selected = Some(record.id);
        Ok(record)
    }

    pub async fn ask(
        &mut self,
        question: &str,
        context: TutorContext,
    ) -> Result<TutorAnswer, GengoError> {
        if let Err(e) = self.open_gate(RequestKind::Tutor) {
            return self.settle(Err(e));
        }
        let result = self.run_tutor(question, context).await;
        self.state.gate.finish();
        self.settle(result)
    }

    async fn run_tutor(
        &mut self,
        question: &str,
        context: TutorContext,
    ) -> Result<TutorAnswer, GengoError> {
        let related_sentence = match context {
            TutorContext::MostRecent => {
                self.history.most_recent().map(|record| record.original_text.clone())
            }
            TutorContext::Record(id) => Some(
                self.history
                    .get(&id)
                    .map(|record| record.original_text.clone())
                    .ok_or_else(|| GengoError::NotFound(id.to_string()))?,
            ),
            TutorContext::Nothing => None,
        };

        let request = build_tutor_request(question, related_sentence.as_deref())?;
        let raw = self.gateway.generate(&request).await?;
        let answer_text = parse_tutor_answer(Some(&raw))?;

        let answer = TutorAnswer::new(question.trim(), answer_text, related_sentence);
        self.state.current_answer = Some(answer.clone());
        self.state.tab = Tab::Tutor;
        Ok(answer)
    }

    pub fn delete(&mut self, id: &RecordId) -> Result<bool, GengoError> {
        let result = self.history.remove(id);
        if let Ok(true) = result {
            if self.state.selected.as_ref() == Some(id) {
                self.state.selected = None;
            }
        }
        let removed = self.settle(result)?;
        if removed {
            self.state.notice = Some(Notice::info("Deleted from history."));
        }
        Ok(removed)
    }

    pub fn clear_history(&mut self) -> Result<usize, GengoError> {
        let result = self.history.clear();
        let removed = self.settle(result)?;
        self.state.selected = None;
        self.state.notice = Some(Notice::info(format!("Removed {removed} record(s).")));
        Ok(removed)
    }

    pub fn select(&mut self, key: &str) -> Result<AnalysisRecord, GengoError> {
        let result = self.history.find(key).cloned();
        let record = self.settle(result)?;
        self.state.selected = Some(record.id);
        self.state.tab = Tab::Analyze;
        Ok(record)
    }

    pub fn set_tab(&mut self, tab: Tab) {
        self.state.tab = tab;
    }

    /// Applies to the tab being shown; tabs without a list ignore it.
    pub fn set_search(&mut self, term: &str) {
        match self.state.tab {
            Tab::History => self.state.history_search = term.to_string(),
            Tab::Vocabulary => self.state.vocabulary_search = term.to_string(),
            Tab::Analyze | Tab::Tutor => {}
        }
    }

    pub fn current_record(&self) -> Option<&AnalysisRecord> {
        self.state
            .selected
            .as_ref()
            .and_then(|id| self.history.get(id))
            .or_else(|| self.history.most_recent())
    }

    pub fn history_view(&self) -> Vec<&AnalysisRecord> {
        self.history.search(&self.state.history_search)
    }

    pub fn vocabulary(&self) -> Vec<VocabEntry> {
        let entries = vocabulary::build(self.history.all());
        vocabulary::filter(&entries, &self.state.vocabulary_search)
    }
}
