//! User-facing strings
//!
//! The tracker originally shipped with a Bengali interface; English is the
//! default here and Bengali remains selectable.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Bn,
}

impl Locale {
    /// Shown when an add is missing its text or date
    pub fn missing_fields(self) -> &'static str {
        match self {
            Locale::En => "Enter a task and a date",
            Locale::Bn => "কাজ ও তারিখ দিন",
        }
    }

    pub fn invalid_due(self) -> &'static str {
        match self {
            Locale::En => "Due date or time is not valid",
            Locale::Bn => "তারিখ বা সময় সঠিক নয়",
        }
    }

    pub fn confirm_clear_all(self) -> &'static str {
        match self {
            Locale::En => "Delete all tasks?",
            Locale::Bn => "সব কাজ মুছে ফেলবেন?",
        }
    }

    /// Column headers for the CSV export: task, priority, due, completed
    pub fn export_headers(self) -> [&'static str; 4] {
        match self {
            Locale::En => ["Task", "Priority", "Due", "Completed"],
            Locale::Bn => ["কাজ", "প্রায়োরিটি", "ডিউ সময়", "সম্পন্ন"],
        }
    }

    pub fn yes_no(self, value: bool) -> &'static str {
        match (self, value) {
            (Locale::En, true) => "Yes",
            (Locale::En, false) => "No",
            (Locale::Bn, true) => "হ্যাঁ",
            (Locale::Bn, false) => "না",
        }
    }

    pub fn reminder_title(self) -> &'static str {
        "To-Do Reminder"
    }

    pub fn reminder_body(self, text: &str, minutes: i64) -> String {
        match self {
            Locale::En => format!("'{}' is due within {} minutes!", text, minutes),
            Locale::Bn => format!("'{}' কাজটি {} মিনিটের মধ্যে শেষ করতে হবে!", text, minutes),
        }
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Locale::En),
            "bn" => Ok(Locale::Bn),
            other => Err(format!("unsupported locale: {}", other)),
        }
    }
}
