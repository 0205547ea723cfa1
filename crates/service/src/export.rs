//! JSON exports of the persisted collections for admins.

use futsal_core::notice::Notice;
use futsal_core::types::Date;
use serde::Serialize;

/// A collection an admin can download.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Students,
    Bookings,
    SecurityLogs,
}

impl ExportKind {
    /// Suggested download name. Security log exports carry the date.
    pub fn file_name(self, today: Date) -> String {
        match self {
            ExportKind::Students => "students_data.json".to_string(),
            ExportKind::Bookings => "bookings_data.json".to_string(),
            ExportKind::SecurityLogs => format!("security_logs_{today}.json"),
        }
    }

    fn label(self) -> &'static str {
        match self {
            ExportKind::Students => "Student data",
            ExportKind::Bookings => "Booking data",
            ExportKind::SecurityLogs => "Security logs",
        }
    }

    fn noun(self) -> &'static str {
        match self {
            ExportKind::Students => "students",
            ExportKind::Bookings => "bookings",
            ExportKind::SecurityLogs => "security logs",
        }
    }
}

/// A rendered export: pretty-printed JSON plus where to save it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Export {
    pub kind: ExportKind,
    pub file_name: String,
    pub record_count: usize,
    pub contents: String,
}

impl Export {
    pub(crate) fn render<T>(
        kind: ExportKind,
        today: Date,
        record_count: usize,
        data: &T,
    ) -> Result<Self, serde_json::Error>
    where
        T: Serialize + ?Sized,
    {
        Ok(Self {
            kind,
            file_name: kind.file_name(today),
            record_count,
            contents: serde_json::to_string_pretty(data)?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.record_count == 0
    }

    pub fn notice(&self) -> Notice {
        if self.is_empty() {
            Notice::info(format!("No {} to export.", self.kind.noun()))
        } else {
            Notice::success(format!("{} exported successfully!", self.kind.label()))
        }
    }
}
