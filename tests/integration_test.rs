use adaptive_quiz::infrastructure::{
    AnalyticsCache, InMemoryQuestionRepository, InMemoryResponseStore, QuestionRepository,
    ResponseStore,
};
use adaptive_quiz::models::{load_question_bank, load_response_log, TierStats};
use adaptive_quiz::utils::logging;
use adaptive_quiz::{
    allocate, classify, AnalyticsFlow, App, Config, Difficulty, LearningLevel,
    PerformanceProfile, SessionCtx, SessionFlow, SubmissionFlow,
};
use chrono::{DateTime, TimeZone, Utc};
use std::path::Path;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 17, 12, 0, 0).unwrap()
}

async fn load_fixtures() -> (InMemoryQuestionRepository, InMemoryResponseStore) {
    let bank = load_question_bank(Path::new("data/question_bank.toml"))
        .await
        .expect("加载题库失败");
    let log = load_response_log(Path::new("data/responses.toml"))
        .await
        .expect("加载作答历史失败");
    (
        InMemoryQuestionRepository::from_banks(vec![bank]),
        InMemoryResponseStore::from_records(log.responses).unwrap(),
    )
}

#[tokio::test]
async fn test_fixture_learners_are_classified() {
    logging::init();
    let (repo, store) = load_fixtures().await;
    let flow = AnalyticsFlow::new();

    let alice = flow
        .fresh_snapshot(&repo, &store, &"alice".into(), &"rust-101".into(), now())
        .unwrap();
    assert_eq!(alice.level, LearningLevel::Advanced);
    // 简单题 5/5 触发倾斜：0.2 → 0.1
    assert!((alice.allocation.easy() - 0.1).abs() < 1e-9);
    assert!((alice.allocation.sum() - 1.0).abs() < 1e-9);

    let bob = flow
        .fresh_snapshot(&repo, &store, &"bob".into(), &"rust-101".into(), now())
        .unwrap();
    assert_eq!(bob.level, LearningLevel::Beginner);
}

#[tokio::test]
async fn test_submit_then_build_session() {
    logging::init();
    let (repo, store) = load_fixtures().await;
    let config = Config::default();
    let mut cache = AnalyticsCache::with_ttl_secs(config.cache_ttl_secs);

    let submissions = SubmissionFlow::new(config.grading.clone()).unwrap();
    let outcome = submissions
        .submit(
            &repo,
            &store,
            &"carol".into(),
            &"q-e2".into(),
            "cargo",
            now(),
            Some(&mut cache),
        )
        .unwrap();
    assert!(outcome.is_correct());
    assert!(!outcome.resubmission);

    let ctx = SessionCtx::new("carol", "rust-101", 10).unwrap();
    let plan = SessionFlow::new(&config)
        .build_session(&repo, &store, &ctx, now())
        .unwrap();

    assert_eq!(plan.selection.len(), 10);
    assert!(plan.selection.ids().iter().all(|id| id.as_str() != "q-h5"));
    let unique: std::collections::HashSet<_> = plan.selection.ids().into_iter().collect();
    assert_eq!(unique.len(), 10);
}

#[tokio::test]
async fn test_unpublished_question_never_offered() {
    let (repo, store) = load_fixtures().await;
    let ctx = SessionCtx::new("alice", "rust-101", 100).unwrap();
    let plan = SessionFlow::new(&Config::default())
        .build_session(&repo, &store, &ctx, now())
        .unwrap();

    let published = repo
        .questions_for_lecture(&"rust-101".into())
        .unwrap()
        .iter()
        .filter(|q| q.published)
        .count();
    assert_eq!(plan.selection.len(), published);
    assert!(plan.selection.ids().iter().all(|id| id.as_str() != "q-h5"));
}

#[tokio::test]
async fn test_cold_start_learner_gets_beginner_mix() {
    let (repo, store) = load_fixtures().await;
    let ctx = SessionCtx::new("newcomer", "rust-101", 5).unwrap();
    let plan = SessionFlow::new(&Config::default())
        .build_session(&repo, &store, &ctx, now())
        .unwrap();

    assert!(plan.snapshot.profile.is_cold_start());
    assert_eq!(plan.snapshot.level, LearningLevel::Beginner);
    assert_eq!(plan.selection.tier_counts(), (3, 2, 0));
}

#[test]
fn test_weak_medium_keeps_beginner_but_shifts_mix() {
    let profile = PerformanceProfile {
        easy: TierStats::new(10, 10),
        medium: TierStats::new(4, 1),
        ..Default::default()
    };
    let level = classify(&profile);
    assert_eq!(level, LearningLevel::Beginner);

    let allocation = allocate(level, &profile);
    assert!((allocation.get(Difficulty::Easy) - 0.5).abs() < 1e-9);
    assert!((allocation.get(Difficulty::Medium) - 0.35).abs() < 1e-9);
    assert!((allocation.get(Difficulty::Hard) - 0.15).abs() < 1e-9);
}

#[test]
fn test_negative_count_is_invalid_input() {
    let err = SessionCtx::new("alice", "rust-101", -3).unwrap_err();
    assert!(err.is_invalid_input());
}

#[tokio::test]
async fn test_unknown_question_submission_is_not_found() {
    let (repo, store) = load_fixtures().await;
    let before = store.responses_for_subject(&"alice".into()).unwrap().len();

    let err = SubmissionFlow::new(Config::default().grading)
        .unwrap()
        .submit(&repo, &store, &"alice".into(), &"q-nope".into(), "x", now(), None)
        .unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(store.responses_for_subject(&"alice".into()).unwrap().len(), before);
}

#[tokio::test]
async fn test_initialize_from_bank_directory() {
    let config = Config {
        question_bank_dir: Some("data".to_string()),
        question_bank_file: "does/not/exist.toml".to_string(),
        ..Config::default()
    };
    let app = App::initialize(config).await.expect("初始化失败");

    // responses.toml 不是题库，扫描时被跳过
    assert_eq!(app.questions().len(), 15);
    assert_eq!(
        app.questions()
            .questions_for_lecture(&"rust-101".into())
            .unwrap()
            .len(),
        15
    );
}

#[tokio::test]
async fn test_batch_run_over_fixtures() {
    logging::init();
    let config = Config::default();
    let app = App::initialize(config).await.expect("初始化失败");
    assert_eq!(app.questions().len(), 15);

    let success = app.run().await.expect("批量处理失败");
    assert_eq!(success, 2);
}
