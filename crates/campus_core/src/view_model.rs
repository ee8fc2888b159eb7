use chrono::NaiveDateTime;

use crate::course::{collapse_whitespace, split_course_label};
use crate::record::{ContentRow, SubmissionStatus};
use crate::remaining::remaining_until;
use crate::state::CrawlSession;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub rows: Vec<ContentRowView>,
    pub session: CrawlSession,
    pub look_ahead_days: u32,
    pub control: ControlView,
    pub detail: Option<DetailView>,
    pub login_notice: Option<String>,
    pub dirty: bool,
}

/// One table row, fully formatted for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentRowView {
    pub course: String,
    pub course_code: Option<String>,
    pub instructor: Option<String>,
    pub title: String,
    pub kind_label: &'static str,
    pub status_label: &'static str,
    pub due_date: String,
    pub remaining: String,
    /// Unsubmitted rows are visually flagged.
    pub highlight: bool,
}

/// The pause/resume toggle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlView {
    pub label: &'static str,
    pub enabled: bool,
}

impl Default for ControlView {
    fn default() -> Self {
        Self {
            label: "중단",
            enabled: true,
        }
    }
}

/// Detail panel contents for the selected row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailView {
    pub title: String,
    pub course: String,
    pub due_date: String,
    pub remaining: String,
    pub status_label: &'static str,
    pub link: String,
    pub context: String,
}

impl AppViewModel {
    pub(crate) fn build(
        rows: &[ContentRow],
        session: CrawlSession,
        look_ahead_days: u32,
        selected: Option<usize>,
        login_notice: Option<&str>,
        dirty: bool,
        now: NaiveDateTime,
    ) -> Self {
        let row_views = rows.iter().map(|row| build_row(row, now)).collect();
        let detail = selected
            .and_then(|idx| rows.get(idx))
            .map(|row| build_detail(row, now));

        Self {
            rows: row_views,
            session,
            look_ahead_days,
            control: control_for(session),
            detail,
            login_notice: login_notice.map(ToOwned::to_owned),
            dirty,
        }
    }
}

fn control_for(session: CrawlSession) -> ControlView {
    match session {
        CrawlSession::Active => ControlView {
            label: "중단",
            enabled: true,
        },
        CrawlSession::Paused => ControlView {
            label: "재시작",
            enabled: true,
        },
        CrawlSession::Done => ControlView {
            label: "완료됨",
            enabled: false,
        },
    }
}

fn build_row(row: &ContentRow, now: NaiveDateTime) -> ContentRowView {
    let details = split_course_label(&row.course);
    ContentRowView {
        course: details.name,
        course_code: details.code,
        instructor: details.instructor,
        title: collapse_whitespace(&row.title),
        kind_label: row.kind.label(),
        status_label: row.status.label(),
        due_date: row.due_date.format("%Y-%m-%d").to_string(),
        remaining: remaining_until(now, row.due_date),
        highlight: row.status == SubmissionStatus::Unsubmitted,
    }
}

fn build_detail(row: &ContentRow, now: NaiveDateTime) -> DetailView {
    DetailView {
        title: collapse_whitespace(&row.title),
        course: row.course.clone(),
        due_date: row.due_date.format("%Y-%m-%d").to_string(),
        remaining: remaining_until(now, row.due_date),
        status_label: row.status.label(),
        link: row.link.clone(),
        context: row.context.clone(),
    }
}
