//! Integration tests for the word lifecycle: add, enrich, review, persist.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{Duration, Utc};
use tempfile::TempDir;
use tokio::sync::Mutex;

use kotoba::lifecycle::EnrichmentOutcome;
use kotoba::slot::WORDS_KEY;
use kotoba::word::MEANING_PLACEHOLDER;
use kotoba::{
    DurableSlot, Enrichment, FileSlot, LifecycleScheduler, Mastery, MemorySlot, MockProvider,
    ReviewSession, SessionState, WordPatch, WordStatus, WordStore,
};

fn cat_enrichment() -> Enrichment {
    Enrichment {
        reading: "ねこ".to_string(),
        meaning: "cat".to_string(),
        example: "猫が好きです".to_string(),
        example_translation: "I like cats".to_string(),
        mnemonic: "...".to_string(),
    }
}

// =============================================================================
// Enrichment Scenarios
// =============================================================================

#[test]
fn test_added_word_is_enriched() {
    let mut store = WordStore::in_memory();
    let word = store.add("猫").expect("word should be added");

    assert_eq!(word.status, WordStatus::Pending);
    assert_eq!(word.mastery_level, Mastery::MIN);
    assert!(word.next_review_date <= Utc::now());

    let provider = MockProvider::new().with_response("猫", cat_enrichment());
    LifecycleScheduler::new().run_pending(&mut store, &provider);

    let word = store.get(&word.id).unwrap();
    assert_eq!(word.status, WordStatus::Completed);
    assert_eq!(word.reading, "ねこ");
    assert_eq!(word.meaning, "cat");
    assert_eq!(word.example.as_deref(), Some("猫が好きです"));
    assert_eq!(word.example_translation.as_deref(), Some("I like cats"));
    assert_eq!(word.mnemonic.as_deref(), Some("..."));
}

#[test]
fn test_provider_failure_marks_failed() {
    let mut store = WordStore::in_memory();
    let word = store.add("猫").unwrap();

    let report = LifecycleScheduler::new().run_pending(&mut store, &MockProvider::failing());

    assert_eq!(report.failed, 1);
    let word = store.get(&word.id).unwrap();
    assert_eq!(word.status, WordStatus::Failed);
    assert!(word.reading.is_empty());
    assert_eq!(word.meaning, MEANING_PLACEHOLDER);
    assert!(word.example.is_none());
}

#[test]
fn test_second_word_waits_for_first() {
    let mut store = WordStore::in_memory();
    let mut scheduler = LifecycleScheduler::new();
    let provider = MockProvider::new();

    let first = store.add("一").unwrap();
    let job = scheduler.begin(&store).unwrap();
    assert_eq!(job.word_id, first.id);

    // Added while the first call is still running.
    let second = store.add("二").unwrap();
    assert!(scheduler.begin(&store).is_none());
    assert_eq!(store.get(&second.id).unwrap().status, WordStatus::Pending);

    let outcome = job.run(&provider);
    scheduler.finish(&mut store, job, outcome);
    assert_eq!(store.get(&first.id).unwrap().status, WordStatus::Completed);
    assert_eq!(store.get(&second.id).unwrap().status, WordStatus::Pending);

    let next = scheduler.begin(&store).unwrap();
    assert_eq!(next.word_id, second.id);
}

#[test]
fn test_change_events_drive_scheduler() {
    let mut store = WordStore::in_memory();
    let (_, events) = store.subscribe_channel();
    let mut scheduler = LifecycleScheduler::new();
    let provider = MockProvider::new();

    store.add("猫");
    store.add("犬");

    // React to each notification the way the server worker does.
    while events.try_recv().is_ok() {
        scheduler.step(&mut store, &provider);
    }

    assert!(store.pending().is_empty());
    assert_eq!(provider.calls(), 2);
}

#[test]
fn test_late_result_for_resolved_word_is_ignored() {
    let mut store = WordStore::in_memory();
    let mut scheduler = LifecycleScheduler::new();
    let word = store.add("猫").unwrap();

    let job = scheduler.begin(&store).unwrap();

    // A second scheduler resolves the same word first.
    LifecycleScheduler::new().step(&mut store, &MockProvider::failing());

    let result = scheduler.finish(&mut store, job, EnrichmentOutcome::Enriched(cat_enrichment()));
    assert!(result.is_none());
    assert_eq!(store.get(&word.id).unwrap().status, WordStatus::Failed);
}

#[test]
fn test_failed_word_is_never_enriched_again() {
    let mut store = WordStore::in_memory();
    let word = store.add("猫").unwrap();
    LifecycleScheduler::new().run_pending(&mut store, &MockProvider::failing());

    let patched = store
        .update(&word.id, WordPatch::new().with_meaning("cat").with_mastery(Mastery::new(1)))
        .unwrap();
    assert_eq!(patched.status, WordStatus::Failed);

    let provider = MockProvider::new();
    let report = LifecycleScheduler::new().run_pending(&mut store, &provider);

    assert_eq!(report.total(), 0);
    assert_eq!(provider.calls(), 0);
    assert_eq!(store.get(&word.id).unwrap().status, WordStatus::Failed);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_competing_workers_stay_single_flight() {
    let provider = Arc::new(MockProvider::new().with_delay(StdDuration::from_millis(20)));
    let state = Arc::new(Mutex::new((WordStore::in_memory(), LifecycleScheduler::new())));

    {
        let mut guard = state.lock().await;
        for headword in ["一", "二", "三", "四"] {
            guard.0.add(headword);
        }
    }

    let mut workers = Vec::new();
    for _ in 0..3 {
        let state = Arc::clone(&state);
        let provider = Arc::clone(&provider);
        workers.push(tokio::spawn(async move {
            loop {
                let job = {
                    let mut guard = state.lock().await;
                    let (store, scheduler) = &mut *guard;
                    if store.pending().is_empty() {
                        break;
                    }
                    scheduler.begin(store)
                };

                let Some(job) = job else {
                    tokio::time::sleep(StdDuration::from_millis(2)).await;
                    continue;
                };

                let runner = Arc::clone(&provider);
                let claimed = job.clone();
                let outcome = tokio::task::spawn_blocking(move || claimed.run(&*runner))
                    .await
                    .expect("provider task panicked");

                let mut guard = state.lock().await;
                let (store, scheduler) = &mut *guard;
                scheduler.finish(store, job, outcome);
            }
        }));
    }

    for worker in workers {
        worker.await.unwrap();
    }

    let guard = state.lock().await;
    assert!(guard.0.pending().is_empty());
    assert_eq!(provider.calls(), 4);
    assert_eq!(provider.peak_concurrency(), 1);
}

// =============================================================================
// Review Scenarios
// =============================================================================

#[test]
fn test_review_correct_from_two() {
    let now = Utc::now();
    let mut store = WordStore::in_memory();
    let word = store.add_at("猫", now).unwrap();
    store.update(&word.id, WordPatch::new().with_mastery(Mastery::new(2)));

    let reviewed = store.record_review(&word.id, true, now).unwrap();

    assert_eq!(reviewed.mastery_level.level(), 3);
    assert_eq!(reviewed.next_review_date, now + Duration::days(8));
}

#[test]
fn test_review_incorrect_from_zero() {
    let now = Utc::now();
    let mut store = WordStore::in_memory();
    let word = store.add_at("猫", now).unwrap();

    let reviewed = store.record_review(&word.id, false, now).unwrap();

    assert_eq!(reviewed.mastery_level.level(), 0);
    assert_eq!(reviewed.next_review_date, now + Duration::days(1));
}

#[test]
fn test_empty_review_session() {
    let store = WordStore::in_memory();
    let session = ReviewSession::due(&store, Utc::now());

    assert_eq!(
        session.state(),
        SessionState::Complete {
            correct: 0,
            incorrect: 0
        }
    );
}

#[test]
fn test_session_over_due_words() {
    let now = Utc::now();
    let mut store = WordStore::in_memory();
    store.add_at("一", now);
    store.add_at("二", now);
    let later = store.add_at("三", now).unwrap();
    store.update(&later.id, WordPatch::new().with_next_review(now + Duration::days(2)));

    let mut session = ReviewSession::due(&store, now);
    assert_eq!(session.total(), 2);

    session.answer_into(&mut store, true, now);
    session.answer_into(&mut store, false, now);

    assert_eq!(
        session.state(),
        SessionState::Complete {
            correct: 1,
            incorrect: 1
        }
    );
    assert!(store.find_due(now).is_empty());
    assert_eq!(store.find_due(now + Duration::days(1)).len(), 1);
}

// =============================================================================
// Persistence
// =============================================================================

#[test]
fn test_file_roundtrip_is_identical() {
    let dir = TempDir::new().unwrap();
    let now = Utc::now();

    let original = {
        let mut store = WordStore::open(FileSlot::new(dir.path()));
        let cat = store.add_at("猫", now).unwrap();
        store.add_at("犬", now + Duration::seconds(1));
        LifecycleScheduler::new().run_pending(
            &mut store,
            &MockProvider::new().with_response("猫", cat_enrichment()).with_failure("犬"),
        );
        store.record_review(&cat.id, true, now);
        store.list().to_vec()
    };

    let reloaded = WordStore::open(FileSlot::new(dir.path()));
    assert_eq!(reloaded.list(), original.as_slice());
}

#[test]
fn test_reads_original_blob_format() {
    let blob = r#"[{
        "id": "b3f1c2d4-0000-4000-8000-000000000001",
        "kanji": "猫",
        "reading": "ねこ",
        "meaning": "猫",
        "example": "猫が好きです",
        "exampleTranslation": "我喜欢猫",
        "mnemonic": "neko",
        "category": "通用",
        "level": "N5",
        "masteryLevel": 3,
        "nextReviewDate": "2025-01-10T08:00:00.000Z",
        "createdAt": "2025-01-01T08:00:00.000Z",
        "status": "completed"
    }]"#;
    let slot = MemorySlot::with_value(WORDS_KEY, blob);

    let store = WordStore::open(slot.clone());
    let word = &store.list()[0];

    assert_eq!(word.headword, "猫");
    assert_eq!(word.mastery_level.level(), 3);
    assert_eq!(word.status, WordStatus::Completed);
    assert_eq!(word.level, kotoba::JlptLevel::N5);
    assert!(slot.read(WORDS_KEY).unwrap().is_some());
}

#[test]
fn test_reads_blob_saved_before_status_existed() {
    let blob = r#"[{
        "id": "b3f1c2d4-0000-4000-8000-000000000002",
        "kanji": "猫",
        "reading": "ねこ",
        "meaning": "猫",
        "category": "通用",
        "level": "N5",
        "masteryLevel": 1,
        "nextReviewDate": "2024-03-02T08:00:00.000Z",
        "createdAt": "2024-03-01T08:00:00.000Z"
    }]"#;
    let slot = MemorySlot::with_value(WORDS_KEY, blob);

    let mut store = WordStore::open(slot.clone());
    assert_eq!(store.len(), 1);
    assert_eq!(store.list()[0].status, WordStatus::Completed);
    assert!(store.pending().is_empty());

    store.add("犬");

    let reloaded = WordStore::open(slot.clone());
    assert_eq!(reloaded.len(), 2);
    assert!(slot.read(WORDS_KEY).unwrap().unwrap().contains("猫"));
}
