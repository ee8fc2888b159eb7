#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Ask the crawl worker to stop at the next course boundary.
    PauseCrawl,
    /// Let a paused crawl worker continue.
    ResumeCrawl,
    /// Change the look-ahead window for items crawled from now on.
    SetLookAhead(u32),
    /// Release the portal session; idempotent, safe to request twice.
    ReleaseBrowser,
    /// Cancel the crawl and leave the app loop.
    Shutdown,
}
