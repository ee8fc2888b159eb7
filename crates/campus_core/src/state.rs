use chrono::NaiveDateTime;

use crate::record::ContentRow;
use crate::view_model::AppViewModel;

pub const DEFAULT_LOOK_AHEAD_DAYS: u32 = 7;

/// Crawl session as seen by the presentation side.
///
/// `Active` and `Paused` toggle through the pause/resume control; `Done` is
/// terminal for the session, there is no re-enable without a restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CrawlSession {
    #[default]
    Active,
    Paused,
    Done,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    rows: Vec<ContentRow>,
    session: CrawlSession,
    dirty: bool,
    look_ahead_days: u32,
    selected: Option<usize>,
    login_notice: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            session: CrawlSession::default(),
            // The first render happens before any snapshot arrives.
            dirty: true,
            look_ahead_days: DEFAULT_LOOK_AHEAD_DAYS,
            selected: None,
            login_notice: None,
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_look_ahead(look_ahead_days: u32) -> Self {
        Self {
            look_ahead_days,
            ..Self::default()
        }
    }

    pub fn session(&self) -> CrawlSession {
        self.session
    }

    pub fn look_ahead_days(&self) -> u32 {
        self.look_ahead_days
    }

    /// Returns whether a re-render is pending, clearing the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn view(&self, now: NaiveDateTime) -> AppViewModel {
        AppViewModel::build(
            &self.rows,
            self.session,
            self.look_ahead_days,
            self.selected,
            self.login_notice.as_deref(),
            self.dirty,
            now,
        )
    }

    /// Whole-list replacement: readers only ever see a complete snapshot.
    pub(crate) fn replace_rows(&mut self, mut rows: Vec<ContentRow>) {
        rows.sort_by(|a, b| a.due_date.cmp(&b.due_date));
        self.rows = rows;
        if let Some(idx) = self.selected {
            if idx >= self.rows.len() {
                self.selected = None;
            }
        }
        self.dirty = true;
    }

    pub(crate) fn set_session(&mut self, session: CrawlSession) {
        self.session = session;
        self.dirty = true;
    }

    pub(crate) fn select_row(&mut self, idx: usize) -> bool {
        if idx < self.rows.len() {
            self.selected = Some(idx);
            self.dirty = true;
            true
        } else {
            false
        }
    }

    pub(crate) fn set_look_ahead(&mut self, days: u32) -> bool {
        if days == self.look_ahead_days {
            return false;
        }
        self.look_ahead_days = days;
        self.dirty = true;
        true
    }

    pub(crate) fn set_login_notice(&mut self, message: String) {
        self.login_notice = Some(message);
        self.dirty = true;
    }
}
