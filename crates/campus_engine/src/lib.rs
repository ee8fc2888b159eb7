//! Campus engine: portal session, crawl worker and deadline extraction.
mod config;
mod crawl;
mod deadline;
mod decode;
mod engine;
mod fetch;
mod login;
mod page;
mod status;
mod types;

pub use config::PortalConfig;
pub use crawl::{normalize_link_for_dedupe, ChannelSink, CrawlControl, CrawlSink, CrawlWorker};
pub use deadline::{within_window, DeadlineExtractor};
pub use decode::{decode_page, DecodedPage};
pub use engine::{EngineHandle, SessionGuard};
pub use fetch::{PageSource, PortalClient};
pub use login::{login, Credentials};
pub use page::{Fragment, Page, PageLink, Table, TableCell};
pub use status::{classify_detail_status, classify_list_status};
pub use types::{ContentKind, ContentRecord, CrawlEvent, PortalError, SubmissionStatus};
