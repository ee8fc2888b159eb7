use crate::page::Page;
use crate::types::{ContentKind, SubmissionStatus};

/// Classifies a status-indicator text from a listing cell.
///
/// The negative keywords are checked first: "미제출" contains "제출" and
/// "미완료" contains "완료", so order is significant.
pub fn classify_list_status(kind: ContentKind, text: &str) -> SubmissionStatus {
    match kind {
        ContentKind::Assignment => {
            if text.contains("미제출") {
                SubmissionStatus::Unsubmitted
            } else if text.contains("제출") {
                SubmissionStatus::Submitted
            } else {
                SubmissionStatus::NeedsCheck
            }
        }
        ContentKind::Video | ContentKind::Other => {
            if ["미시청", "미완료", "0%"].iter().any(|kw| text.contains(kw)) {
                SubmissionStatus::Unsubmitted
            } else if ["완료", "100%", "시청"].iter().any(|kw| text.contains(kw)) {
                SubmissionStatus::Submitted
            } else {
                SubmissionStatus::NeedsCheck
            }
        }
    }
}

/// Reads the status indicators on an item's detail page.
pub fn classify_detail_status(kind: ContentKind, page: &Page) -> SubmissionStatus {
    match kind {
        ContentKind::Assignment => page
            .first_text(".submissionstatustable .c1, .statedetails")
            .map(|text| classify_list_status(kind, &text))
            .unwrap_or(SubmissionStatus::NeedsCheck),
        ContentKind::Video | ContentKind::Other => page
            .first_text(".progress-bar, .progresstext")
            .map(|text| {
                if text.contains("100%") || text.contains("완료") {
                    SubmissionStatus::Submitted
                } else {
                    SubmissionStatus::Unsubmitted
                }
            })
            .unwrap_or(SubmissionStatus::NeedsCheck),
    }
}
