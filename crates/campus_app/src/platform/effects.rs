use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use campus_core::{ContentRow, Effect, Msg};
use campus_engine::{ContentRecord, CrawlEvent, EngineHandle};
use campus_logging::{campus_info, campus_warn};

/// Bridges the pure update loop and the crawl engine: effects flow in,
/// engine events come back as messages through the pump thread.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(
        engine: EngineHandle,
        events: mpsc::Receiver<CrawlEvent>,
        msg_tx: mpsc::Sender<Msg>,
    ) -> Self {
        spawn_event_pump(events, msg_tx);
        Self { engine }
    }

    /// Applies update effects to the engine. Returns `true` when the app
    /// should leave its main loop.
    pub fn apply(&self, effects: Vec<Effect>) -> bool {
        let mut shutdown = false;
        for effect in effects {
            match effect {
                Effect::PauseCrawl => {
                    campus_info!("pausing crawl");
                    self.engine.pause();
                }
                Effect::ResumeCrawl => {
                    campus_info!("resuming crawl");
                    self.engine.resume();
                }
                Effect::SetLookAhead(days) => {
                    campus_info!("look-ahead window set to {days} days");
                    self.engine.set_look_ahead(days);
                }
                Effect::ReleaseBrowser => {
                    self.engine.release_session();
                }
                Effect::Shutdown => {
                    campus_info!("shutdown requested");
                    self.engine.shutdown();
                    shutdown = true;
                }
            }
        }
        shutdown
    }

    pub fn release_session(&self) {
        self.engine.release_session();
    }
}

fn spawn_event_pump(events: mpsc::Receiver<CrawlEvent>, msg_tx: mpsc::Sender<Msg>) {
    thread::spawn(move || loop {
        match events.try_recv() {
            Ok(event) => {
                let msg = match event {
                    CrawlEvent::Snapshot(records) => {
                        Msg::SnapshotPublished(records.into_iter().map(to_row).collect())
                    }
                    CrawlEvent::LoginFailed { message } => {
                        campus_warn!("login failed: {message}");
                        Msg::LoginFailed(message)
                    }
                    CrawlEvent::Completed => Msg::CrawlCompleted,
                };
                if msg_tx.send(msg).is_err() {
                    break;
                }
            }
            Err(mpsc::TryRecvError::Empty) => thread::sleep(Duration::from_millis(20)),
            Err(mpsc::TryRecvError::Disconnected) => break,
        }
    });
}

fn to_row(record: ContentRecord) -> ContentRow {
    ContentRow {
        course: record.course,
        title: record.title,
        link: record.link,
        due_date: record.due_date,
        status: map_status(record.status),
        context: record.context,
        kind: map_kind(record.kind),
        category: record.category,
    }
}

fn map_kind(kind: campus_engine::ContentKind) -> campus_core::ContentKind {
    match kind {
        campus_engine::ContentKind::Assignment => campus_core::ContentKind::Assignment,
        campus_engine::ContentKind::Video => campus_core::ContentKind::Video,
        campus_engine::ContentKind::Other => campus_core::ContentKind::Other,
    }
}

fn map_status(status: campus_engine::SubmissionStatus) -> campus_core::SubmissionStatus {
    match status {
        campus_engine::SubmissionStatus::Unsubmitted => campus_core::SubmissionStatus::Unsubmitted,
        campus_engine::SubmissionStatus::Submitted => campus_core::SubmissionStatus::Submitted,
        campus_engine::SubmissionStatus::NeedsCheck => campus_core::SubmissionStatus::NeedsCheck,
    }
}
