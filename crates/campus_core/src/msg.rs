use crate::record::ContentRow;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Crawl worker published a fresh whole-list snapshot.
    SnapshotPublished(Vec<ContentRow>),
    /// User clicked the pause/resume toggle.
    PauseResumeClicked,
    /// User selected a row in the table.
    RowSelected(usize),
    /// User picked a look-ahead period (7 or 14 days).
    PeriodSelected(u32),
    /// Crawl worker finished its full traversal.
    CrawlCompleted,
    /// Portal login was rejected; shown as an inline status notice.
    LoginFailed(String),
    /// Fast poll tick: re-render if the view is stale.
    Tick,
    /// Slow tick: recompute remaining-time cells without a full rebuild.
    RemainingTick,
    /// User asked to close the window.
    CloseRequested,
}
