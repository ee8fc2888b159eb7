use std::sync::Once;

use campus_core::{
    update, AppState, ContentKind, ContentRow, CrawlSession, Effect, Msg, SubmissionStatus,
};
use chrono::NaiveDate;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(campus_logging::initialize_for_tests);
}

fn row(title: &str, link: &str, due: (i32, u32, u32)) -> ContentRow {
    ContentRow {
        course: "미확인 강좌".to_string(),
        title: title.to_string(),
        link: link.to_string(),
        due_date: NaiveDate::from_ymd_opt(due.0, due.1, due.2).unwrap(),
        status: SubmissionStatus::NeedsCheck,
        context: String::new(),
        kind: ContentKind::Assignment,
        category: None,
    }
}

fn now() -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 5, 19)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

#[test]
fn snapshot_replaces_rows_sorted_and_marks_dirty() {
    init_logging();
    let mut state = AppState::new();
    assert!(state.consume_dirty()); // initial render
    assert!(!state.consume_dirty());

    let snapshot = vec![
        row("b", "https://x/b", (2025, 6, 1)),
        row("a", "https://x/a", (2025, 5, 20)),
    ];
    let (mut state, effects) = update(state, Msg::SnapshotPublished(snapshot));

    assert!(effects.is_empty());
    assert!(state.consume_dirty());
    let view = state.view(now());
    let due_dates: Vec<&str> = view.rows.iter().map(|r| r.due_date.as_str()).collect();
    assert_eq!(due_dates, vec!["2025-05-20", "2025-06-01"]);
}

#[test]
fn snapshot_sort_is_stable_for_equal_due_dates() {
    init_logging();
    let state = AppState::new();
    let snapshot = vec![
        row("first", "https://x/1", (2025, 5, 21)),
        row("second", "https://x/2", (2025, 5, 21)),
        row("earlier", "https://x/3", (2025, 5, 20)),
    ];
    let (state, _) = update(state, Msg::SnapshotPublished(snapshot));

    let view = state.view(now());
    let titles: Vec<&str> = view
        .rows
        .iter()
        .map(|r| r.title.as_str())
        .collect::<Vec<_>>();
    assert_eq!(titles, vec!["earlier", "first", "second"]);
}

#[test]
fn pause_resume_toggles_and_emits_effects() {
    init_logging();
    let state = AppState::new();
    assert_eq!(state.session(), CrawlSession::Active);

    let (state, effects) = update(state, Msg::PauseResumeClicked);
    assert_eq!(state.session(), CrawlSession::Paused);
    assert_eq!(effects, vec![Effect::PauseCrawl]);
    assert_eq!(state.view(now()).control.label, "재시작");

    let (state, effects) = update(state, Msg::PauseResumeClicked);
    assert_eq!(state.session(), CrawlSession::Active);
    assert_eq!(effects, vec![Effect::ResumeCrawl]);
    assert_eq!(state.view(now()).control.label, "중단");
}

#[test]
fn crawl_completed_is_terminal_and_releases_browser_once() {
    init_logging();
    let state = AppState::new();

    let (state, effects) = update(state, Msg::CrawlCompleted);
    assert_eq!(state.session(), CrawlSession::Done);
    assert_eq!(effects, vec![Effect::ReleaseBrowser]);

    let view = state.view(now());
    assert_eq!(view.control.label, "완료됨");
    assert!(!view.control.enabled);

    // A second completion observation must not release again.
    let (state, effects) = update(state, Msg::CrawlCompleted);
    assert!(effects.is_empty());

    // The toggle is dead after completion.
    let (state, effects) = update(state, Msg::PauseResumeClicked);
    assert_eq!(state.session(), CrawlSession::Done);
    assert!(effects.is_empty());
}

#[test]
fn period_selection_emits_effect_only_on_change() {
    init_logging();
    let state = AppState::new();
    assert_eq!(state.look_ahead_days(), 7);

    let (state, effects) = update(state, Msg::PeriodSelected(14));
    assert_eq!(state.look_ahead_days(), 14);
    assert_eq!(effects, vec![Effect::SetLookAhead(14)]);

    let (state, effects) = update(state, Msg::PeriodSelected(14));
    assert!(effects.is_empty());
}

#[test]
fn row_selection_populates_detail_view() {
    init_logging();
    let state = AppState::new();
    let mut selected = row("과제 1", "https://x/assign", (2025, 5, 20));
    selected.context = "마감일: 2025-05-20, 상태: 미제출".to_string();
    selected.status = SubmissionStatus::Unsubmitted;
    let (state, _) = update(state, Msg::SnapshotPublished(vec![selected]));

    let (state, effects) = update(state, Msg::RowSelected(0));
    assert!(effects.is_empty());

    let view = state.view(now());
    let detail = view.detail.expect("detail for selected row");
    assert_eq!(detail.title, "과제 1");
    assert_eq!(detail.due_date, "2025-05-20");
    assert_eq!(detail.status_label, "미제출");
    assert_eq!(detail.link, "https://x/assign");
    assert!(detail.context.contains("미제출"));

    // Out-of-range selection is ignored.
    let (state, _) = update(state, Msg::RowSelected(5));
    assert!(state.view(now()).detail.is_some());
}

#[test]
fn login_failure_surfaces_as_notice() {
    init_logging();
    let state = AppState::new();
    let (state, effects) = update(state, Msg::LoginFailed("bad password".to_string()));
    assert!(effects.is_empty());
    assert_eq!(
        state.view(now()).login_notice.as_deref(),
        Some("bad password")
    );
}

#[test]
fn close_request_emits_shutdown() {
    init_logging();
    let state = AppState::new();
    let (_state, effects) = update(state, Msg::CloseRequested);
    assert_eq!(effects, vec![Effect::Shutdown]);
}

#[test]
fn ticks_are_state_neutral() {
    init_logging();
    let mut state = AppState::new();
    state.consume_dirty();
    let before = state.clone();

    let (state, effects) = update(state, Msg::Tick);
    assert!(effects.is_empty());
    assert_eq!(state, before);

    let (state, effects) = update(state, Msg::RemainingTick);
    assert!(effects.is_empty());
    assert_eq!(state, before);
}
