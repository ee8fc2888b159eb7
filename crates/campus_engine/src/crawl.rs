use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{mpsc, Arc, OnceLock};
use std::time::Duration;

use campus_logging::{campus_debug, campus_info, campus_warn};
use chrono::{Local, NaiveDate};
use regex::Regex;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::config::PortalConfig;
use crate::deadline::{within_window, DeadlineExtractor};
use crate::fetch::PageSource;
use crate::login::{login, Credentials};
use crate::page::{Fragment, Page};
use crate::status::{classify_detail_status, classify_list_status};
use crate::types::{ContentKind, ContentRecord, CrawlEvent, PortalError, SubmissionStatus};

const UPCOMING_BLOCKS: &str = ".block_timeline, .block_calendar_upcoming, .block_myoverview";
const BLOCK_TITLE: &str = ".card-title, .header";
const BLOCK_EVENTS: &str = ".list-group-item, .event";
const COURSE_BOXES: &str = ".course_box, .coursebox, .course-listitem";
const COURSE_HEADING: &str = ".page-header-headings h1";
const ACTIVITY_ITEMS: &str =
    ".activity, .modtype_assign, .modtype_econtents, .activityinstance, .activity-item";
const BULK_TABLE: &str = "table.generaltable";
const DETAIL_REGION: &str = "#region-main";

const CAMPUS_TAG: &str = "[천안]";
const UNKNOWN_COURSE: &str = "미확인 강좌";
const CATEGORY_TOKENS: [&str; 3] = ["천안CTL", "SM-CLASS", "교과 기타"];
const DEFAULT_CATEGORY: &str = "일반";

/// Cross-thread crawl controls: cooperative pause, cancellation and the
/// live look-ahead window.
#[derive(Debug, Clone)]
pub struct CrawlControl {
    paused: Arc<AtomicBool>,
    look_ahead_days: Arc<AtomicU32>,
    cancel: CancellationToken,
}

impl CrawlControl {
    pub fn new(look_ahead_days: u32) -> Self {
        Self {
            paused: Arc::new(AtomicBool::new(false)),
            look_ahead_days: Arc::new(AtomicU32::new(look_ahead_days)),
            cancel: CancellationToken::new(),
        }
    }

    pub fn pause(&self) {
        self.paused.store(true, Ordering::Relaxed);
    }

    pub fn resume(&self) {
        self.paused.store(false, Ordering::Relaxed);
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Relaxed)
    }

    pub fn set_look_ahead(&self, days: u32) {
        self.look_ahead_days.store(days, Ordering::Relaxed);
    }

    pub fn look_ahead_days(&self) -> u32 {
        self.look_ahead_days.load(Ordering::Relaxed)
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub(crate) async fn cancelled(&self) {
        self.cancel.cancelled().await;
    }
}

/// Where the crawl worker publishes its events.
pub trait CrawlSink: Send + Sync {
    fn emit(&self, event: CrawlEvent);
}

pub struct ChannelSink {
    tx: mpsc::Sender<CrawlEvent>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::Sender<CrawlEvent>) -> Self {
        Self { tx }
    }
}

impl CrawlSink for ChannelSink {
    fn emit(&self, event: CrawlEvent) {
        let _ = self.tx.send(event);
    }
}

/// Case- and slash-insensitive link form used in the `(title, link)` dedup key.
pub fn normalize_link_for_dedupe(link: &str) -> String {
    match Url::parse(link.trim()) {
        Ok(url) => {
            let mut normalized = format!(
                "{}://{}",
                url.scheme(),
                url.host_str().unwrap_or_default()
            );
            if let Some(port) = url.port() {
                normalized.push(':');
                normalized.push_str(&port.to_string());
            }
            normalized.push_str(url.path().trim_end_matches('/'));
            if let Some(query) = url.query() {
                normalized.push('?');
                normalized.push_str(query);
            }
            normalized
        }
        Err(_) => link.trim().to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CourseRef {
    url: String,
    title: String,
}

/// Sequential portal traversal: dashboard upcoming blocks, then per-course
/// bulk index tables and activity lists. Publishes a fresh sorted snapshot
/// after every accepted record; per-item and per-course failures are logged
/// and skipped, never aborting the run.
pub struct CrawlWorker<'a> {
    source: &'a dyn PageSource,
    config: &'a PortalConfig,
    control: &'a CrawlControl,
    sink: &'a dyn CrawlSink,
    extractor: DeadlineExtractor,
    seen: HashSet<(String, String)>,
    records: Vec<ContentRecord>,
    today: NaiveDate,
}

impl<'a> CrawlWorker<'a> {
    pub fn new(
        source: &'a dyn PageSource,
        config: &'a PortalConfig,
        control: &'a CrawlControl,
        sink: &'a dyn CrawlSink,
    ) -> Self {
        Self {
            source,
            config,
            control,
            sink,
            extractor: DeadlineExtractor::new(),
            seen: HashSet::new(),
            records: Vec::new(),
            today: Local::now().date_naive(),
        }
    }

    pub fn records(&self) -> &[ContentRecord] {
        &self.records
    }

    pub async fn run(&mut self, credentials: &Credentials) -> Result<(), PortalError> {
        if let Err(err) = login(self.source, self.config, credentials).await {
            campus_warn!("login failed: {err}");
            self.sink.emit(CrawlEvent::LoginFailed {
                message: err.to_string(),
            });
            return Ok(());
        }

        let dashboard = self.fetch(&self.config.url("/")).await?;
        self.scan_dashboard(&dashboard).await?;

        let courses = discover_courses(&dashboard);
        campus_info!("{} courses discovered", courses.len());

        for (idx, course) in courses.iter().enumerate() {
            if !self.wait_if_paused().await {
                return Err(PortalError::Cancelled);
            }
            campus_info!(
                "[{}/{}] crawling course '{}'",
                idx + 1,
                courses.len(),
                course.title
            );
            match self.scan_course(course).await {
                Ok(()) => {}
                Err(PortalError::Cancelled) => return Err(PortalError::Cancelled),
                Err(err) => campus_warn!("course '{}' skipped: {err}", course.title),
            }
        }

        self.assign_categories();
        self.publish();
        campus_info!("crawl finished with {} records", self.records.len());
        Ok(())
    }

    /// Fetch raced against cancellation, so shutdown does not wait out a
    /// hung navigation.
    async fn fetch(&self, url: &str) -> Result<Page, PortalError> {
        tokio::select! {
            biased;
            _ = self.control.cancelled() => Err(PortalError::Cancelled),
            page = self.source.fetch_page(url) => page,
        }
    }

    /// Pause gate, checked at course-iteration boundaries only.
    /// Returns `false` when cancelled while waiting.
    async fn wait_if_paused(&self) -> bool {
        if self.control.is_cancelled() {
            return false;
        }
        if !self.control.is_paused() {
            return true;
        }
        campus_info!("crawl paused; waiting for resume");
        while self.control.is_paused() {
            if self.control.is_cancelled() {
                return false;
            }
            tokio::time::sleep(Duration::from_secs(1)).await;
        }
        campus_info!("crawl resumed");
        !self.control.is_cancelled()
    }

    fn look_ahead(&self) -> u32 {
        self.control.look_ahead_days()
    }

    async fn scan_dashboard(&mut self, dashboard: &Page) -> Result<(), PortalError> {
        for block in dashboard.fragments(UPCOMING_BLOCKS) {
            let block_title = block.first_text(BLOCK_TITLE).unwrap_or_default();
            let events = block.fragments(BLOCK_EVENTS);
            campus_debug!("dashboard block '{}': {} items", block_title, events.len());
            for event in events {
                match self.process_dashboard_event(&event).await {
                    Ok(()) => {}
                    Err(PortalError::Cancelled) => return Err(PortalError::Cancelled),
                    Err(err) => campus_warn!("dashboard item skipped: {err}"),
                }
            }
        }
        Ok(())
    }

    async fn process_dashboard_event(&mut self, event: &Fragment) -> Result<(), PortalError> {
        let Some(link) = event.links().into_iter().next() else {
            return Ok(());
        };
        let kind = ContentKind::from_link(&link.href);
        if kind == ContentKind::Other {
            return Ok(());
        }
        let title = link.text.clone();
        if title.is_empty() || !self.mark_seen(&title, &link.href) {
            return Ok(());
        }

        let text = event.text();
        let due_date = match self.extractor.extract(&text, self.today) {
            Some(date) => date,
            None => {
                // Window-end default can overstate urgency; keep it visible.
                campus_warn!("no date for '{title}'; defaulting to window end");
                self.extractor.resolve(&text, self.today, self.look_ahead())
            }
        };

        let course = match dashboard_course_id(&link.href) {
            Some(course_id) => self.course_name_for(&course_id).await?,
            None => UNKNOWN_COURSE.to_string(),
        };

        self.push_record(ContentRecord {
            course,
            title,
            link: link.href,
            due_date,
            status: SubmissionStatus::NeedsCheck,
            context: text,
            kind,
            category: None,
        });
        Ok(())
    }

    /// Opens the course page and reads its heading; failures fall back to
    /// the unknown-course placeholder rather than skipping the item.
    async fn course_name_for(&self, course_id: &str) -> Result<String, PortalError> {
        let url = self.config.url(&format!("/course/view.php?id={course_id}"));
        match self.fetch(&url).await {
            Ok(page) => Ok(page
                .first_text(COURSE_HEADING)
                .map(|text| text.replace(CAMPUS_TAG, "").trim().to_string())
                .filter(|text| !text.is_empty())
                .unwrap_or_else(|| UNKNOWN_COURSE.to_string())),
            Err(PortalError::Cancelled) => Err(PortalError::Cancelled),
            Err(err) => {
                campus_debug!("course page lookup failed: {err}");
                Ok(UNKNOWN_COURSE.to_string())
            }
        }
    }

    async fn scan_course(&mut self, course: &CourseRef) -> Result<(), PortalError> {
        if let Some(course_id) = course_view_id(&course.url) {
            let assign_url = self
                .config
                .url(&format!("/mod/assign/index.php?id={course_id}"));
            if let Err(err) = self
                .scan_bulk_index(&assign_url, &course.title, ContentKind::Assignment)
                .await
            {
                if matches!(err, PortalError::Cancelled) {
                    return Err(err);
                }
                campus_warn!("assignment index for '{}' skipped: {err}", course.title);
            }

            let video_url = self
                .config
                .url(&format!("/mod/econtents/index.php?id={course_id}"));
            if let Err(err) = self
                .scan_bulk_index(&video_url, &course.title, ContentKind::Video)
                .await
            {
                if matches!(err, PortalError::Cancelled) {
                    return Err(err);
                }
                campus_warn!("video index for '{}' skipped: {err}", course.title);
            }
        }

        let page = self.fetch(&course.url).await?;
        for item in page.fragments(ACTIVITY_ITEMS) {
            match self.process_activity_item(&course.title, &item).await {
                Ok(()) => {}
                Err(PortalError::Cancelled) => return Err(PortalError::Cancelled),
                Err(err) => campus_warn!("activity item skipped: {err}"),
            }
        }
        Ok(())
    }

    async fn scan_bulk_index(
        &mut self,
        url: &str,
        course_title: &str,
        kind: ContentKind,
    ) -> Result<(), PortalError> {
        let page = self.fetch(url).await?;
        let Some(table) = page.first_table(BULK_TABLE) else {
            campus_debug!("no {} table for '{course_title}'", kind.label());
            return Ok(());
        };
        let columns = map_columns(&table.headers);

        for row in &table.rows {
            let Some(name_cell) = row.get(columns.name) else {
                continue;
            };
            let Some(link) = name_cell.links.first() else {
                continue;
            };
            let title = link.text.clone();
            if title.is_empty() || !self.mark_seen(&title, &link.href) {
                continue;
            }

            let due_text = row
                .get(columns.due)
                .map(|cell| cell.text.clone())
                .unwrap_or_default();
            // Index tables always spell the year out; the month-day rule is
            // skipped here so progress fractions like "3/10" cannot pass as
            // dates. Rows without a date are dropped, not defaulted.
            let Some(due_date) = self.extractor.extract_explicit(&due_text, self.today) else {
                campus_debug!("no date in bulk row '{title}'");
                continue;
            };

            let status_text = row
                .get(columns.status)
                .map(|cell| cell.text.clone())
                .unwrap_or_default();
            let status = classify_list_status(kind, &status_text);

            self.push_record(ContentRecord {
                course: course_title.to_string(),
                title,
                link: link.href.clone(),
                due_date,
                status,
                context: format!("마감일: {due_text}, 상태: {status_text}"),
                kind,
                category: None,
            });
        }
        Ok(())
    }

    async fn process_activity_item(
        &mut self,
        course_title: &str,
        item: &Fragment,
    ) -> Result<(), PortalError> {
        let html = item.html();
        if !html.contains("mod/assign") && !html.contains("mod/econtents") {
            return Ok(());
        }
        let Some(link) = item.links().into_iter().next() else {
            return Ok(());
        };
        let title = link.text.clone();
        if title.is_empty() {
            return Ok(());
        }
        let kind = ContentKind::from_link(&link.href);
        if kind == ContentKind::Other {
            return Ok(());
        }
        if !self.mark_seen(&title, &link.href) {
            return Ok(());
        }

        let item_text = item.text();
        let mut due_date = self.extractor.extract(&item_text, self.today);
        let mut status = SubmissionStatus::NeedsCheck;
        let mut context = item_text.clone();

        if due_date.is_none() {
            // Listing text had no date: open the item's own page and retry.
            match self.fetch(&link.href).await {
                Ok(detail) => {
                    due_date = self.extractor.extract(&detail.text(), self.today);
                    status = classify_detail_status(kind, &detail);
                    context = detail
                        .first_text(DETAIL_REGION)
                        .map(|text| truncate_context(&text))
                        .unwrap_or_else(|| "세부 정보 없음".to_string());
                }
                Err(PortalError::Cancelled) => return Err(PortalError::Cancelled),
                Err(err) => campus_warn!("detail page for '{title}' failed: {err}"),
            }
        }

        let due_date = match due_date {
            Some(date) => date,
            None => {
                campus_warn!("no date for '{title}'; defaulting to window end");
                self.extractor
                    .resolve("", self.today, self.look_ahead())
            }
        };

        self.push_record(ContentRecord {
            course: course_title.to_string(),
            title,
            link: link.href,
            due_date,
            status,
            context,
            kind,
            category: None,
        });
        Ok(())
    }

    fn mark_seen(&mut self, title: &str, link: &str) -> bool {
        self.seen
            .insert((title.to_string(), normalize_link_for_dedupe(link)))
    }

    /// Appends a record if it falls inside the look-ahead window, then
    /// re-sorts and publishes the whole list.
    fn push_record(&mut self, record: ContentRecord) {
        if !within_window(record.due_date, self.today, self.look_ahead()) {
            campus_debug!(
                "'{}' due {} outside look-ahead window",
                record.title,
                record.due_date
            );
            return;
        }
        campus_info!(
            "{} found: '{}' due {}",
            record.kind.label(),
            record.title,
            record.due_date
        );
        self.records.push(record);
        self.records.sort_by(|a, b| a.due_date.cmp(&b.due_date));
        self.publish();
    }

    /// Strips known category tokens out of course labels; runs once, after
    /// the traversal.
    fn assign_categories(&mut self) {
        for record in &mut self.records {
            match CATEGORY_TOKENS
                .iter()
                .find(|token| record.course.contains(*token))
            {
                Some(token) => {
                    record.category = Some((*token).to_string());
                    record.course = record.course.replace(token, "").trim().to_string();
                }
                None => record.category = Some(DEFAULT_CATEGORY.to_string()),
            }
        }
    }

    fn publish(&self) {
        self.sink.emit(CrawlEvent::Snapshot(self.records.clone()));
    }
}

fn discover_courses(dashboard: &Page) -> Vec<CourseRef> {
    let mut courses: Vec<CourseRef> = Vec::new();

    for course_box in dashboard.fragments(COURSE_BOXES) {
        if let Some(link) = course_box
            .links()
            .into_iter()
            .find(|link| link.href.contains("course/view.php?id="))
        {
            let title = clean_course_title(&link.text);
            if !title.is_empty() {
                push_course(&mut courses, link.href, title);
            }
        }
    }

    // Sparse result usually means an unexpected dashboard skin; rescan every
    // anchor on the page before giving up.
    if courses.len() < 3 {
        for link in dashboard.links() {
            if link.href.contains("course/view.php?id=") {
                let title = clean_course_title(&link.text);
                if title.chars().count() > 3 {
                    push_course(&mut courses, link.href, title);
                }
            }
        }
    }

    courses
}

fn push_course(courses: &mut Vec<CourseRef>, url: String, title: String) {
    if !courses
        .iter()
        .any(|course| course.url == url && course.title == title)
    {
        courses.push(CourseRef { url, title });
    }
}

fn clean_course_title(raw: &str) -> String {
    raw.replace(CAMPUS_TAG, "").trim().to_string()
}

fn dashboard_course_id(link: &str) -> Option<String> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"course=(\d+)").expect("course id pattern"));
    re.captures(link)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

fn course_view_id(url: &str) -> Option<String> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"id=(\d+)").expect("view id pattern"));
    re.captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

struct BulkColumns {
    name: usize,
    due: usize,
    status: usize,
}

/// Positional defaults, overridden by header keyword matches in any order.
fn map_columns(headers: &[String]) -> BulkColumns {
    let mut columns = BulkColumns {
        name: 0,
        due: 1,
        status: 2,
    };
    for (idx, header) in headers.iter().enumerate() {
        let header = header.to_lowercase();
        if ["이름", "제목", "과제", "콘텐츠"]
            .iter()
            .any(|kw| header.contains(kw))
        {
            columns.name = idx;
        } else if ["기한", "마감", "종료", "due"]
            .iter()
            .any(|kw| header.contains(kw))
        {
            columns.due = idx;
        } else if ["상태", "제출", "시청", "status"]
            .iter()
            .any(|kw| header.contains(kw))
        {
            columns.status = idx;
        }
    }
    columns
}

fn truncate_context(text: &str) -> String {
    const LIMIT: usize = 150;
    if text.chars().count() <= LIMIT {
        return text.to_string();
    }
    let mut truncated: String = text.chars().take(LIMIT).collect();
    truncated.push_str("...");
    truncated
}
