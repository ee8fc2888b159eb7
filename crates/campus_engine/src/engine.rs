use std::sync::{mpsc, Arc, Mutex};
use std::thread;

use campus_logging::{campus_error, campus_info};

use crate::crawl::{ChannelSink, CrawlControl, CrawlWorker};
use crate::fetch::PortalClient;
use crate::login::Credentials;
use crate::types::{CrawlEvent, PortalError};
use crate::PortalConfig;

/// One-shot handle on the portal session. Both the UI (on crawl completion)
/// and the engine thread (on exit) call [`close`](Self::close); whichever
/// runs first drops the client, the other is a no-op.
#[derive(Debug, Clone, Default)]
pub struct SessionGuard {
    inner: Arc<Mutex<Option<Arc<PortalClient>>>>,
}

impl SessionGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn install(&self, client: Arc<PortalClient>) {
        *self.inner.lock().expect("session guard") = Some(client);
    }

    /// Releases the session; returns whether this call actually closed it.
    pub fn close(&self) -> bool {
        let released = self.inner.lock().expect("session guard").take().is_some();
        if released {
            campus_info!("portal session released");
        }
        released
    }
}

/// Owner-side handle on the crawl thread: events out, controls in.
pub struct EngineHandle {
    control: CrawlControl,
    session: SessionGuard,
    event_rx: Option<mpsc::Receiver<CrawlEvent>>,
}

impl EngineHandle {
    /// Spawns the crawl thread and returns immediately. The thread runs a
    /// single-threaded tokio runtime; it always sends
    /// [`CrawlEvent::Completed`] last, then releases the session if the UI
    /// has not already.
    pub fn start(config: PortalConfig, credentials: Credentials) -> Self {
        let control = CrawlControl::new(config.look_ahead_days);
        let session = SessionGuard::new();
        let (event_tx, event_rx) = mpsc::channel();

        let thread_control = control.clone();
        let thread_session = session.clone();
        thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("tokio runtime");
            runtime.block_on(run_crawl(
                &config,
                &credentials,
                &thread_control,
                &thread_session,
                event_tx.clone(),
            ));
            let _ = event_tx.send(CrawlEvent::Completed);
            thread_session.close();
        });

        Self {
            control,
            session,
            event_rx: Some(event_rx),
        }
    }

    /// Hands the event receiver to the caller's pump thread. Yields `None`
    /// after the first call.
    pub fn take_event_receiver(&mut self) -> Option<mpsc::Receiver<CrawlEvent>> {
        self.event_rx.take()
    }

    pub fn pause(&self) {
        self.control.pause();
    }

    pub fn resume(&self) {
        self.control.resume();
    }

    pub fn set_look_ahead(&self, days: u32) {
        self.control.set_look_ahead(days);
    }

    /// Cancels the crawl; the thread winds down at its next await point.
    pub fn shutdown(&self) {
        self.control.cancel();
    }

    pub fn release_session(&self) -> bool {
        self.session.close()
    }
}

async fn run_crawl(
    config: &PortalConfig,
    credentials: &Credentials,
    control: &CrawlControl,
    session: &SessionGuard,
    event_tx: mpsc::Sender<CrawlEvent>,
) {
    let client = match PortalClient::new(config) {
        Ok(client) => Arc::new(client),
        Err(err) => {
            campus_error!("portal client construction failed: {err}");
            let _ = event_tx.send(CrawlEvent::LoginFailed {
                message: err.to_string(),
            });
            return;
        }
    };
    session.install(client.clone());

    let sink = ChannelSink::new(event_tx);
    let mut worker = CrawlWorker::new(client.as_ref(), config, control, &sink);
    match worker.run(credentials).await {
        Ok(()) => {}
        Err(PortalError::Cancelled) => campus_info!("crawl cancelled"),
        Err(err) => campus_error!("crawl aborted: {err}"),
    }
}
