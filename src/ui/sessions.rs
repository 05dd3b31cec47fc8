use crate::db::progress::RunSummary;

const DATE_FORMAT_TODAY: &str = "Today %H:%M";
const DATE_FORMAT_YESTERDAY: &str = "Yesterday %H:%M";
const DATE_FORMAT_OTHER: &str = "%Y-%m-%d";

pub fn format_run_date(timestamp: i64) -> String {
    let Some(utc) = chrono::DateTime::from_timestamp(timestamp, 0) else {
        return String::from("-");
    };
    let datetime = utc.with_timezone(&chrono::Local);

    let today = chrono::Local::now().date_naive();
    let run_date = datetime.date_naive();

    if run_date == today {
        datetime.format(DATE_FORMAT_TODAY).to_string()
    } else if run_date == today - chrono::Duration::days(1) {
        datetime.format(DATE_FORMAT_YESTERDAY).to_string()
    } else {
        datetime.format(DATE_FORMAT_OTHER).to_string()
    }
}

/// "3/10 Today 09:12" plus a done marker for finished runs.
pub fn format_run_status(run: &RunSummary) -> String {
    let date = format_run_date(run.started_at);
    let marker = if run.completed_at.is_some() { " ✓" } else { "" };
    format!("{}/{} {}{}", run.correct_count, run.words_total, date, marker)
}
