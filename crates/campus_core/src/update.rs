use crate::{AppState, CrawlSession, Effect, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::SnapshotPublished(rows) => {
            state.replace_rows(rows);
            Vec::new()
        }
        Msg::PauseResumeClicked => match state.session() {
            CrawlSession::Active => {
                state.set_session(CrawlSession::Paused);
                vec![Effect::PauseCrawl]
            }
            CrawlSession::Paused => {
                state.set_session(CrawlSession::Active);
                vec![Effect::ResumeCrawl]
            }
            // Terminal: the toggle is disabled once the crawl has completed.
            CrawlSession::Done => Vec::new(),
        },
        Msg::RowSelected(idx) => {
            state.select_row(idx);
            Vec::new()
        }
        Msg::PeriodSelected(days) => {
            if state.set_look_ahead(days) {
                vec![Effect::SetLookAhead(days)]
            } else {
                Vec::new()
            }
        }
        Msg::CrawlCompleted => {
            if state.session() == CrawlSession::Done {
                Vec::new()
            } else {
                state.set_session(CrawlSession::Done);
                vec![Effect::ReleaseBrowser]
            }
        }
        Msg::LoginFailed(message) => {
            state.set_login_notice(message);
            Vec::new()
        }
        Msg::CloseRequested => vec![Effect::Shutdown],
        Msg::Tick | Msg::RemainingTick => Vec::new(),
    };

    (state, effects)
}
