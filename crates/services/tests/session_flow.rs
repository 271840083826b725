use async_trait::async_trait;
use rand::SeedableRng;
use rand::rngs::StdRng;

use quiz_core::model::{
    FinishReason, IdRange, ProgressRecord, QuizDirection, SessionType, WordId, WordProgress,
    WordRecord,
};
use quiz_core::time::fixed_now;
use services::{AdvanceOutcome, Clock, SessionController, SessionError, StartOutcome};
use storage::repository::{
    InMemoryRepository, KeyValueStore, ProgressRepository, SettingsRepository, Storage,
    StorageError, keys,
};

fn words(count: u64) -> Vec<WordRecord> {
    (1..=count)
        .map(|id| WordRecord::new(id.to_string(), format!("prompt-{id}"), format!("target-{id}")))
        .collect()
}

async fn controller(
    records: Vec<WordRecord>,
    repo: &InMemoryRepository,
) -> SessionController<StdRng> {
    let storage = Storage::from_store(repo.clone());
    SessionController::bootstrap_with_rng(records, &storage, StdRng::seed_from_u64(4))
        .await
        .unwrap()
        .with_clock(Clock::fixed(fixed_now()))
}

fn current_answer(controller: &SessionController<StdRng>) -> String {
    controller
        .engine()
        .current_question()
        .expect("question on screen")
        .correct_answer()
        .to_owned()
}

#[tokio::test]
async fn five_words_limit_three_finishes_and_persists() {
    let repo = InMemoryRepository::new();
    repo.save_limit(quiz_core::model::SessionLength::new(3).unwrap())
        .await
        .unwrap();
    let mut controller = controller(words(5), &repo).await;

    assert_eq!(
        controller.start_session(SessionType::Normal),
        StartOutcome::Started
    );

    let mut wrong_id = None;
    for round in 0..3 {
        let answer = if round == 0 {
            "nope".to_owned()
        } else {
            current_answer(&controller)
        };
        let result = controller.submit_answer(&answer).await.unwrap();
        assert!(result.persisted);
        if round == 0 {
            assert!(!result.outcome.is_correct);
            wrong_id = Some(result.outcome.word_id);
        }
        controller.advance();
    }

    let engine = controller.engine();
    let summary = engine.summary().expect("finished");
    assert_eq!(summary.reason(), FinishReason::LimitReached);
    assert_eq!(summary.solved(), 3);
    assert_eq!(summary.correct(), 2);
    assert_eq!(engine.session().unwrap().used_ids().len(), 3);

    let stored = repo.load_progress().await.unwrap();
    let wrong_id = wrong_id.unwrap();
    let record = stored.iter().find(|r| r.id == wrong_id).unwrap();
    assert_eq!(record.progress(), WordProgress::new(1, 0));
}

#[tokio::test]
async fn restored_counters_drive_training_order() {
    let repo = InMemoryRepository::new();
    repo.save_progress(&[
        ProgressRecord::new(WordId::from(2), WordProgress::new(1, 0)),
        ProgressRecord::new(WordId::from(4), WordProgress::new(3, 0)),
    ])
    .await
    .unwrap();

    let mut controller = controller(words(5), &repo).await;
    assert_eq!(controller.load_report().restored, 2);

    controller.start_session(SessionType::Training);
    assert_eq!(
        controller.engine().current_question().unwrap().word_id(),
        &WordId::from(4)
    );
}

#[tokio::test]
async fn answers_keep_history_of_words_missing_from_the_list() {
    let repo = InMemoryRepository::new();
    let absent = ProgressRecord::new(WordId::from(9), WordProgress::new(5, 0));
    repo.save_progress(std::slice::from_ref(&absent)).await.unwrap();

    let mut quiz = controller(words(3), &repo).await;
    assert_eq!(quiz.load_report().unmatched, vec![absent.clone()]);

    quiz.start_session(SessionType::Normal);
    let result = quiz.submit_answer("wrong").await.unwrap();
    assert!(result.persisted);

    let stored = repo.load_progress().await.unwrap();
    assert_eq!(stored.len(), 4);
    assert!(stored.contains(&absent));
    let answered = stored.iter().find(|r| r.id == result.outcome.word_id).unwrap();
    assert_eq!(answered.progress(), WordProgress::new(1, 0));

    let relisted = controller(words(9), &repo).await;
    assert_eq!(
        relisted.engine().pool().get(&WordId::from(9)).unwrap().wrong_count(),
        5
    );
}

#[tokio::test]
async fn reset_clears_progress_but_keeps_settings() {
    let repo = InMemoryRepository::new();
    let mut controller = controller(words(5), &repo).await;
    controller
        .set_direction(QuizDirection::TargetToPrompt)
        .await
        .unwrap();
    controller.set_range(2, 4).await.unwrap();

    controller.start_session(SessionType::Normal);
    controller.submit_answer("wrong").await.unwrap();
    assert_eq!(controller.engine().pool().training_count(), 1);

    controller.reset_progress().await.unwrap();

    assert_eq!(controller.engine().pool().training_count(), 0);
    assert!(repo.raw(keys::PROGRESS).unwrap().is_none());
    assert_eq!(
        repo.get_direction().await.unwrap(),
        Some(QuizDirection::TargetToPrompt)
    );
    assert_eq!(controller.settings().range, IdRange::new(2, 4).unwrap());
}

#[tokio::test]
async fn corrupt_storage_falls_back_to_defaults() {
    let repo = InMemoryRepository::new();
    repo.put_raw(keys::PROGRESS, "garbage").unwrap();
    repo.put_raw(keys::LIMIT, "-3").unwrap();
    repo.put_raw(keys::DIRECTION, "\"sideways\"").unwrap();

    let controller = controller(words(3), &repo).await;

    assert_eq!(controller.engine().pool().training_count(), 0);
    assert_eq!(controller.settings(), Default::default());
}

#[tokio::test]
async fn settings_changes_apply_to_next_session() {
    let repo = InMemoryRepository::new();
    let mut controller = controller(words(10), &repo).await;

    controller.start_session(SessionType::Normal);
    controller.set_limit(1).await.unwrap();
    assert_eq!(controller.engine().session().unwrap().limit(), 10);

    for _ in 0..10 {
        let answer = current_answer(&controller);
        controller.submit_answer(&answer).await.unwrap();
        controller.advance();
    }
    assert!(controller.return_to_lobby());

    controller.start_session(SessionType::Normal);
    assert_eq!(controller.engine().session().unwrap().limit(), 1);
}

#[tokio::test]
async fn invalid_settings_are_rejected() {
    let repo = InMemoryRepository::new();
    let mut controller = controller(words(3), &repo).await;

    assert!(matches!(
        controller.set_range(10, 1).await,
        Err(SessionError::Settings(_))
    ));
    assert!(matches!(
        controller.set_limit(0).await,
        Err(SessionError::Settings(_))
    ));
    assert_eq!(controller.settings(), Default::default());
}

#[tokio::test]
async fn no_word_repeats_within_a_session() {
    let repo = InMemoryRepository::new();
    let mut controller = controller(words(6), &repo).await;
    controller.set_limit(50).await.unwrap();

    controller.start_session(SessionType::Normal);
    let mut asked = Vec::new();
    loop {
        asked.push(controller.engine().current_question().unwrap().word_id().clone());
        controller.submit_answer("x").await.unwrap();
        if let AdvanceOutcome::Finished(reason) = controller.advance() {
            assert_eq!(reason, FinishReason::PoolExhausted);
            break;
        }
    }

    let mut unique = asked.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), asked.len());
    assert_eq!(asked.len(), 6);
}

#[derive(Clone, Default)]
struct ReadOnlyStore;

#[async_trait]
impl KeyValueStore for ReadOnlyStore {
    async fn get_value(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Ok(None)
    }

    async fn set_value(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Connection("read-only".into()))
    }

    async fn remove_value(&self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::Connection("read-only".into()))
    }
}

#[tokio::test]
async fn failed_writes_keep_the_session_going() {
    let storage = Storage::from_store(ReadOnlyStore);
    let mut controller =
        SessionController::bootstrap_with_rng(words(4), &storage, StdRng::seed_from_u64(8))
            .await
            .unwrap();

    controller.start_session(SessionType::Normal);
    let result = controller.submit_answer("wrong").await.unwrap();
    assert!(!result.persisted);
    assert_eq!(controller.engine().pool().training_count(), 1);
    assert_eq!(controller.advance(), AdvanceOutcome::NextQuestion);

    assert!(matches!(
        controller.reset_progress().await,
        Err(SessionError::Storage(_))
    ));
    assert_eq!(controller.engine().pool().training_count(), 1);
}
