use std::fs;
use std::sync::atomic::Ordering;

use qabot::error::{as_qabot_error, QabotError};
use qabot::mode::Mode;
use qabot::storage::HistoryStore;

mod common;
use common::{create_temp_session, FailingProvider, StaticProvider};

/// A successful FAQ turn is logged with the user's question and the reply
#[tokio::test]
async fn test_faq_turn_is_logged() {
    let (provider, calls) = StaticProvider::new(" 4 \n");
    let (session, _tmp) = create_temp_session(Box::new(provider));

    let outcome = session
        .handle_turn(Mode::Faq, "What is 2+2?")
        .await
        .expect("turn should succeed");

    assert_eq!(outcome.record.output, "4");
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    let history = session.history().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].mode, Mode::Faq);
    assert_eq!(history[0].input, "What is 2+2?");
    assert_eq!(history[0].output, "4");
}

/// The summary record keeps the pasted text, not the wrapped prompt
#[tokio::test]
async fn test_summary_turn_logs_user_text() {
    let (provider, _calls) = StaticProvider::new("A short summary.");
    let (session, _tmp) = create_temp_session(Box::new(provider));

    session
        .handle_turn(Mode::Summary, "Line one.\nLine two.")
        .await
        .unwrap();

    let history = session.history().unwrap();
    assert_eq!(history[0].mode, Mode::Summary);
    assert_eq!(history[0].input, "Line one.\nLine two.");
}

#[tokio::test]
async fn test_turns_are_appended_in_order() {
    let (provider, calls) = StaticProvider::new("ok");
    let (session, _tmp) = create_temp_session(Box::new(provider));

    for question in ["first", "second", "third"] {
        session.handle_turn(Mode::Faq, question).await.unwrap();
    }

    let inputs: Vec<String> = session
        .history()
        .unwrap()
        .into_iter()
        .map(|r| r.input)
        .collect();
    assert_eq!(inputs, vec!["first", "second", "third"]);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_blank_input_is_not_sent_or_logged() {
    let (provider, calls) = StaticProvider::new("unused");
    let (session, _tmp) = create_temp_session(Box::new(provider));

    let err = session.handle_turn(Mode::Summary, "  \n ").await.unwrap_err();

    assert!(matches!(
        as_qabot_error(&err),
        Some(QabotError::InvalidInput(_))
    ));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert!(!session.store().path().exists());
}

#[tokio::test]
async fn test_failed_call_is_not_logged() {
    let (session, _tmp) = create_temp_session(Box::new(FailingProvider));

    let err = session.handle_turn(Mode::Faq, "hello").await.unwrap_err();

    assert!(as_qabot_error(&err).map(|e| e.is_api()).unwrap_or(false));
    assert!(session.history().unwrap().is_empty());
}

#[tokio::test]
async fn test_corrupt_log_is_moved_aside_on_next_turn() {
    let (provider, _calls) = StaticProvider::new("fine");
    let (session, tmp) = create_temp_session(Box::new(provider));
    fs::write(session.store().path(), "{ this is not json").unwrap();

    assert!(session.history().is_err());

    let outcome = session.handle_turn(Mode::Faq, "still there?").await.unwrap();
    let append = outcome.history.expect("append should recover");

    assert_eq!(
        append.quarantined,
        Some(tmp.path().join("chat_history.json.corrupt"))
    );
    assert_eq!(session.history().unwrap().len(), 1);
}

#[test]
fn test_existing_log_is_extended() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("chat_history.json");
    fs::write(
        &path,
        r#"[
  {
    "timestamp": "2025-10-01T09:30:00+02:00",
    "mode": "FAQ",
    "input": "old question",
    "output": "old answer"
  }
]"#,
    )
    .unwrap();

    let store = HistoryStore::new_with_path(&path).unwrap();
    let outcome = store
        .append(&qabot::ConversationRecord::new(Mode::Summary, "text", "sum"))
        .unwrap();

    assert_eq!(outcome.total_records, 2);
    let records = store.list_all().unwrap();
    assert_eq!(records[0].input, "old question");
    assert_eq!(records[1].mode, Mode::Summary);
}
