use chrono::NaiveDate;

/// What kind of deliverable a portal item is, classified by URL substring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Assignment,
    Video,
    Other,
}

impl ContentKind {
    pub fn label(self) -> &'static str {
        match self {
            ContentKind::Assignment => "과제",
            ContentKind::Video => "영상",
            ContentKind::Other => "기타",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionStatus {
    Unsubmitted,
    Submitted,
    NeedsCheck,
}

impl SubmissionStatus {
    pub fn label(self) -> &'static str {
        match self {
            SubmissionStatus::Unsubmitted => "미제출",
            SubmissionStatus::Submitted => "제출됨",
            SubmissionStatus::NeedsCheck => "확인필요",
        }
    }
}

/// One discovered deliverable, as published by the crawl worker.
///
/// Immutable once received; `category` is filled by the crawler's final
/// post-pass that strips known category tokens out of `course`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentRow {
    pub course: String,
    pub title: String,
    pub link: String,
    pub due_date: NaiveDate,
    pub status: SubmissionStatus,
    pub context: String,
    pub kind: ContentKind,
    pub category: Option<String>,
}
