//! CSV export of the task collection

use chrono::Local;

use crate::locale::Locale;
use crate::task::Task;
use crate::Result;

pub const EXPORT_FILE_NAME: &str = "tasks.csv";
pub const EXPORT_CONTENT_TYPE: &str = "text/csv";

/// Due times in exports use the local timezone
pub const DUE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// A finished export ready to hand to the user
#[derive(Debug, Clone)]
pub struct Export {
    pub file_name: &'static str,
    pub content_type: &'static str,
    pub body: String,
}

/// Local, human-readable due time
pub fn format_due(task: &Task) -> String {
    task.due_at.with_timezone(&Local).format(DUE_FORMAT).to_string()
}

/// One header row, then one row per task in collection order
///
/// Fields are quoted only when they contain a comma, quote or line break.
pub fn to_csv(tasks: &[Task], locale: Locale) -> Result<Export> {
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(Vec::new());

    writer.write_record(locale.export_headers())?;
    for task in tasks {
        writer.write_record([
            task.text.as_str(),
            task.priority.as_str(),
            format_due(task).as_str(),
            locale.yes_no(task.completed),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| crate::Error::Storage(format!("Failed to finish export: {}", e)))?;
    let body = String::from_utf8(bytes)
        .map_err(|e| crate::Error::Storage(format!("Export is not UTF-8: {}", e)))?;

    Ok(Export {
        file_name: EXPORT_FILE_NAME,
        content_type: EXPORT_CONTENT_TYPE,
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::TaskPriority;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn due() -> chrono::DateTime<Utc> {
        let naive = NaiveDate::from_ymd_opt(2025, 3, 14)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        Local
            .from_local_datetime(&naive)
            .earliest()
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_export_rows() {
        let mut done = Task::new("Buy milk", due());
        done.completed = true;
        let tasks = vec![
            Task::new("Pay rent", due()).with_priority(TaskPriority::High),
            done,
        ];

        let export = to_csv(&tasks, Locale::En).unwrap();
        assert_eq!(export.file_name, "tasks.csv");
        assert_eq!(export.content_type, "text/csv");

        let lines: Vec<&str> = export.body.lines().collect();
        assert_eq!(lines[0], "Task,Priority,Due,Completed");
        assert_eq!(lines[1], "Pay rent,high,2025-03-14 09:30,No");
        assert_eq!(lines[2], "Buy milk,medium,2025-03-14 09:30,Yes");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_export_quotes_delimiters() {
        let tasks = vec![Task::new("Eggs, bread", due())];
        let export = to_csv(&tasks, Locale::En).unwrap();
        let row = export.body.lines().nth(1).unwrap();
        assert!(row.starts_with("\"Eggs, bread\",medium,"));
    }

    #[test]
    fn test_export_localized_headers() {
        let export = to_csv(&[], Locale::Bn).unwrap();
        assert_eq!(export.body.trim_end(), "কাজ,প্রায়োরিটি,ডিউ সময়,সম্পন্ন");
    }
}
