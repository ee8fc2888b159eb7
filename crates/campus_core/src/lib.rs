//! Campus core: pure state machine and view-model helpers for the deadline HUD.
mod course;
mod effect;
mod msg;
mod record;
mod remaining;
mod state;
mod update;
mod view_model;

pub use course::{split_course_label, CourseDetails};
pub use effect::Effect;
pub use msg::Msg;
pub use record::{ContentKind, ContentRow, SubmissionStatus};
pub use remaining::remaining_until;
pub use state::{AppState, CrawlSession};
pub use update::update;
pub use view_model::{AppViewModel, ContentRowView, ControlView, DetailView};
