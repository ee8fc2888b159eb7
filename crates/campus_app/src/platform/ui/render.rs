use campus_core::{AppViewModel, CrawlSession};

use super::UiCommand;

/// Full redraw of the HUD from a view model.
pub fn render(view: &AppViewModel) -> Vec<UiCommand> {
    let session_label = match view.session {
        CrawlSession::Active => "수집 중",
        CrawlSession::Paused => "일시정지",
        CrawlSession::Done => "수집 완료",
    };

    let mut status = format!(
        "세션: {} | 항목 {}개 | 조회 기간 {}일",
        session_label,
        view.rows.len(),
        view.look_ahead_days
    );
    if let Some(notice) = &view.login_notice {
        status.push_str(" | 로그인 실패: ");
        status.push_str(notice);
    }

    let mut commands = vec![
        UiCommand::SetStatusText(status),
        UiCommand::SetControl(view.control.clone()),
        UiCommand::SetRows(view.rows.clone()),
    ];
    if let Some(detail) = &view.detail {
        commands.push(UiCommand::ShowDetail(detail.clone()));
    }
    commands
}

/// Cheap remaining-time refresh between full redraws.
pub fn render_remaining(view: &AppViewModel) -> Vec<UiCommand> {
    vec![UiCommand::RefreshRemaining(
        view.rows.iter().map(|row| row.remaining.clone()).collect(),
    )]
}
