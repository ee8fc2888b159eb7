pub mod console;
pub mod render;

use campus_core::{ContentRowView, ControlView, DetailView, Msg};

/// Drawing instructions, independent of how a frontend presents them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiCommand {
    SetStatusText(String),
    SetControl(ControlView),
    SetRows(Vec<ContentRowView>),
    ShowDetail(DetailView),
    /// Remaining-time cell values, one per visible row, in row order.
    RefreshRemaining(Vec<String>),
}

/// Interactions a frontend can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiEvent {
    PauseResumeClicked,
    RowSelected(usize),
    PeriodSelected(u32),
    CloseRequested,
}

/// Something that can draw the HUD.
pub trait Frontend {
    fn apply(&mut self, commands: Vec<UiCommand>);
}

pub fn msg_for(event: UiEvent) -> Msg {
    match event {
        UiEvent::PauseResumeClicked => Msg::PauseResumeClicked,
        UiEvent::RowSelected(idx) => Msg::RowSelected(idx),
        UiEvent::PeriodSelected(days) => Msg::PeriodSelected(days),
        UiEvent::CloseRequested => Msg::CloseRequested,
    }
}
