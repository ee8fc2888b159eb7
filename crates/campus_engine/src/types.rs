use chrono::NaiveDate;

/// What kind of deliverable a portal item is, classified by URL substring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Assignment,
    Video,
    Other,
}

impl ContentKind {
    /// Classifies a portal link by its module path.
    pub fn from_link(link: &str) -> Self {
        if link.contains("/mod/assign/") {
            ContentKind::Assignment
        } else if link.contains("/mod/econtents/") {
            ContentKind::Video
        } else {
            ContentKind::Other
        }
    }

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

/// One discovered deliverable with deadline and status metadata.
///
/// `(title, link)` pairs are unique per run; the crawl worker gates insertion
/// through a seen-set. Never mutated after insertion except for the final
/// category post-pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentRecord {
    pub course: String,
    pub title: String,
    pub link: String,
    pub due_date: NaiveDate,
    pub status: SubmissionStatus,
    pub context: String,
    pub kind: ContentKind,
    pub category: Option<String>,
}

/// Events the crawl worker publishes towards the presentation side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrawlEvent {
    /// Whole-list replacement snapshot, sorted by due date ascending.
    Snapshot(Vec<ContentRecord>),
    /// Portal login was rejected; the crawl will not proceed.
    LoginFailed { message: String },
    /// The crawl traversal finished (or was cancelled).
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortalError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("http status {0}")]
    HttpStatus(u16),
    #[error("timeout")]
    Timeout,
    #[error("network error: {0}")]
    Network(String),
    #[error("response too large (max {max_bytes} bytes)")]
    TooLarge { max_bytes: u64 },
    #[error("failed to decode page as {encoding}")]
    Decode { encoding: String },
    #[error("login rejected: {0}")]
    LoginRejected(String),
    #[error("cancelled")]
    Cancelled,
}
