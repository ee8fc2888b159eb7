use chrono::{NaiveDate, NaiveDateTime};

/// Formats the time left until end-of-day (23:59:59) on `due` as `Nd HH:MM`.
///
/// Past deadlines clamp to `0d 00:00`, never negative.
pub fn remaining_until(now: NaiveDateTime, due: NaiveDate) -> String {
    let end_of_day = due.and_hms_opt(23, 59, 59).expect("valid end-of-day time");
    let total_seconds = (end_of_day - now).num_seconds().max(0);

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3_600;
    let minutes = (total_seconds % 3_600) / 60;

    format!("{days}d {hours:02}:{minutes:02}")
}
