use std::io::{self, BufRead, Write};
use std::sync::mpsc;
use std::thread;

use campus_core::{ContentRowView, Msg};
use campus_engine::Credentials;
use campus_logging::campus_debug;

use super::{msg_for, Frontend, UiCommand, UiEvent};
use crate::platform::config::LOOK_AHEAD_CHOICES;

/// Plain-terminal frontend: redraws the table when the view changes and
/// patches remaining-time cells in place between redraws.
#[derive(Default)]
pub struct ConsoleFrontend {
    rows: Vec<ContentRowView>,
}

impl ConsoleFrontend {
    pub fn new() -> Self {
        Self::default()
    }

    fn print_rows(&self) {
        if self.rows.is_empty() {
            println!("(수집된 항목 없음)");
            return;
        }
        println!(
            "{:>3}   {:<10} {:<11} {:<4} {:<8} 강좌 / 제목",
            "번호", "마감일", "남은 시간", "구분", "상태"
        );
        for (idx, row) in self.rows.iter().enumerate() {
            // Unsubmitted rows get a leading marker.
            let marker = if row.highlight { "!" } else { " " };
            let course = match &row.instructor {
                Some(instructor) => format!("{} ({})", row.course, instructor),
                None => row.course.clone(),
            };
            println!(
                "{idx:>3} {marker} {:<10} {:<11} {:<4} {:<8} {} / {}",
                row.due_date, row.remaining, row.kind_label, row.status_label, course, row.title
            );
        }
    }
}

impl Frontend for ConsoleFrontend {
    fn apply(&mut self, commands: Vec<UiCommand>) {
        for command in commands {
            match command {
                UiCommand::SetStatusText(text) => println!("== {text}"),
                UiCommand::SetControl(control) => {
                    if control.enabled {
                        println!("   p={} | q=종료 | 7/14=조회기간 | 번호=상세", control.label);
                    } else {
                        println!("   ({}) q=종료 | 번호=상세", control.label);
                    }
                }
                UiCommand::SetRows(rows) => {
                    self.rows = rows;
                    self.print_rows();
                }
                UiCommand::ShowDetail(detail) => {
                    println!("--- {} [{}]", detail.title, detail.status_label);
                    println!("    강좌: {}", detail.course);
                    println!("    마감: {} (남은 시간 {})", detail.due_date, detail.remaining);
                    println!("    링크: {}", detail.link);
                    println!("    {}", detail.context);
                }
                UiCommand::RefreshRemaining(remaining) => {
                    for (row, value) in self.rows.iter_mut().zip(remaining) {
                        row.remaining = value;
                    }
                    self.print_rows();
                }
            }
        }
    }
}

/// Prompts for portal credentials on the terminal.
pub fn prompt_credentials() -> anyhow::Result<Credentials> {
    let mut username = String::new();
    print!("학번: ");
    io::stdout().flush()?;
    io::stdin().read_line(&mut username)?;

    let mut password = String::new();
    print!("비밀번호: ");
    io::stdout().flush()?;
    io::stdin().read_line(&mut password)?;

    Ok(Credentials {
        username: username.trim().to_string(),
        password: password.trim().to_string(),
    })
}

/// Reads single-line commands off stdin and feeds them into the app loop.
/// Closing stdin counts as asking to quit.
pub fn spawn_input_thread(msg_tx: mpsc::Sender<Msg>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            let Some(event) = parse_command(line.trim()) else {
                campus_debug!("unrecognized input: {line}");
                continue;
            };
            if msg_tx.send(msg_for(event)).is_err() {
                return;
            }
        }
        let _ = msg_tx.send(Msg::CloseRequested);
    });
}

/// `p` toggles pause, `q` quits, a look-ahead choice switches the window,
/// any other number selects that row.
fn parse_command(input: &str) -> Option<UiEvent> {
    match input {
        "" => None,
        "p" | "P" => Some(UiEvent::PauseResumeClicked),
        "q" | "Q" => Some(UiEvent::CloseRequested),
        _ => {
            let number: u32 = input.parse().ok()?;
            if LOOK_AHEAD_CHOICES.contains(&number) {
                Some(UiEvent::PeriodSelected(number))
            } else {
                Some(UiEvent::RowSelected(number as usize))
            }
        }
    }
}
