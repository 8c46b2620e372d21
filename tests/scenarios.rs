use std::{
    collections::VecDeque,
    fs,
    sync::Mutex,
};

use async_trait::async_trait;
use gengo::{
    app::{
        render::render_view,
        NoticeLevel,
        RequestGate,
    },
    model::{
        ModelGateway,
        ModelRequest,
        RequestKind,
    },
    persistence::{
        FileStore,
        MemoryStore,
    },
    vocabulary,
    App,
    GengoError,
    HistoryStore,
    Tab,
    TutorContext,
};
use serde_json::json;

const HISTORY_KEY: &str = "gengo_history";

#[derive(Default)]
struct ScriptedGateway {
    replies: Mutex<VecDeque<Result<String, GengoError>>>,
    requests: Mutex<Vec<ModelRequest>>,
}

impl ScriptedGateway {
    fn new(replies: Vec<Result<String, GengoError>>) -> Self {
        Self { replies: Mutex::new(replies.into()), requests: Mutex::new(Vec::new()) }
    }

    fn requests(&self) -> Vec<ModelRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModelGateway for ScriptedGateway {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, request: &ModelRequest) -> Result<String, GengoError> {
        self.requests.lock().unwrap().push(request.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(GengoError::Service("no scripted reply".to_string())))
    }
}

fn cat_sentence_reply() -> Result<String, GengoError> {
    Ok(json!({
        "language": "Japanese",
        "translation": "The cat is sleeping on the bed",
        "grammarPoints": [
            { "pattern": "〜ています", "explanation": "Describes an ongoing action or state" }
        ],
        "vocabulary": [
            { "word": "猫", "reading": "ねこ", "meaning": "cat", "partOfSpeech": "noun" },
            { "word": "寝る", "reading": "ねる", "meaning": "to sleep", "partOfSpeech": "verb" }
        ]
    })
    .to_string())
}

#[tokio::test]
async fn analyzing_a_sentence_records_it_and_indexes_its_words() {
    let history = HistoryStore::open(MemoryStore::new(), HISTORY_KEY);
    let mut app = App::new(ScriptedGateway::new(vec![cat_sentence_reply()]), history);

    let record = app.analyze("猫はベッドで寝ています").await.unwrap();

    let most_recent = app.history().most_recent().unwrap();
    assert_eq!(most_recent, &record);
    assert_eq!(most_recent.detected_language, "Japanese");
    assert_eq!(most_recent.translation, "The cat is sleeping on the bed");
    assert_eq!(most_recent.grammar_points.len(), 1);

    let words: Vec<String> =
        vocabulary::build(app.history().all()).into_iter().map(|entry| entry.word).collect();
    assert_eq!(words.len(), 2);
    assert!(words.contains(&"猫".to_string()));
    assert!(words.contains(&"寝る".to_string()));

    let requests = app.gateway().requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].kind, RequestKind::Analysis);
    assert!(requests[0].schema.is_some());
    assert!(app.history().storage().get(HISTORY_KEY).is_some());
}

#[tokio::test]
async fn service_failure_leaves_history_untouched() {
    let history = HistoryStore::open(MemoryStore::new(), HISTORY_KEY);
    let mut app = App::new(
        ScriptedGateway::new(vec![
            cat_sentence_reply(),
            Err(GengoError::Service("HTTP 503: overloaded".to_string())),
        ]),
        history,
    );
    app.analyze("猫はベッドで寝ています").await.unwrap();
    let before = app.history().all().to_vec();

    let err = app.analyze("犬が走っている").await.unwrap_err();

    assert!(matches!(err, GengoError::Service(_)));
    assert_eq!(app.history().all(), before.as_slice());
    assert_eq!(app.state().gate, RequestGate::Idle);
    let notice = app.state().notice.clone().unwrap();
    assert_eq!(notice.level, NoticeLevel::Error);
    assert!(!notice.message.contains("503"));
    assert!(render_view(&app, false).contains(&notice.message));
}

#[tokio::test]
async fn tutor_answer_refers_to_the_previous_sentence() {
    let history = HistoryStore::open(MemoryStore::new(), HISTORY_KEY);
    let mut app = App::new(
        ScriptedGateway::new(vec![
            cat_sentence_reply(),
            Ok("* **は** marks the topic of the sentence".to_string()),
        ]),
        history,
    );
    let record = app.analyze("猫はベッドで寝ています").await.unwrap();

    let answer = app.ask("Why is は used here?", TutorContext::MostRecent).await.unwrap();

    assert_eq!(answer.related_sentence.as_deref(), Some(record.original_text.as_str()));
    assert_eq!(app.state().tab, Tab::Tutor);
    let requests = app.gateway().requests();
    assert_eq!(requests[1].kind, RequestKind::Tutor);
    assert!(requests[1].schema.is_none());
    assert!(requests[1].prompt.contains("猫はベッドで寝ています"));
    assert!(render_view(&app, false).contains("• は marks the topic"));
}

#[tokio::test]
async fn corrupt_snapshot_starts_empty_and_recovers() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join(format!("{HISTORY_KEY}.json")), "{ this is not a snapshot").unwrap();

    let history = HistoryStore::open(FileStore::new(dir.path()), HISTORY_KEY);
    assert!(history.is_empty());

    let mut app = App::new(ScriptedGateway::new(vec![cat_sentence_reply()]), history);
    app.analyze("猫はベッドで寝ています").await.unwrap();

    let reopened = HistoryStore::open(FileStore::new(dir.path()), HISTORY_KEY);
    assert_eq!(reopened.len(), 1);
    assert_eq!(reopened.all(), app.history().all());
}

#[tokio::test]
async fn history_survives_a_restart() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = App::new(
        ScriptedGateway::new(vec![cat_sentence_reply(), cat_sentence_reply()]),
        HistoryStore::open(FileStore::new(dir.path()), HISTORY_KEY),
    );
    let first = app.analyze("猫はベッドで寝ています").await.unwrap();
    let second = app.analyze("猫がベッドで寝ています").await.unwrap();
    app.delete(&first.id).unwrap();

    let reopened = HistoryStore::open(FileStore::new(dir.path()), HISTORY_KEY);
    assert_eq!(reopened.len(), 1);
    assert_eq!(reopened.most_recent(), Some(&second));
    assert!(reopened.find(&first.short_id()).is_err());
}
