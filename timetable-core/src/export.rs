use std::{fmt, str::FromStr};

use crate::{Day, Error, Result, TimetableEntry, view::entries_for_day};

const DEFAULT_TITLE: &str = "DEPARTMENT TIMETABLE";
const DAY_RULE_WIDTH: usize = 60;
const CSV_HEADER: [&str; 6] = ["Day", "Time", "Course Code", "Course Name", "Room", "Lecturer"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Text,
    Csv,
}

impl ExportFormat {
    pub fn file_name(self) -> &'static str {
        match self {
            ExportFormat::Text => "timetable.txt",
            ExportFormat::Csv => "timetable.csv",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Text => "text/plain",
            ExportFormat::Csv => "text/csv",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Text => f.write_str("TEXT"),
            ExportFormat::Csv => f.write_str("CSV"),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(ExportFormat::Text),
            "csv" => Ok(ExportFormat::Csv),
            other => Err(format!("unknown export format '{}', expected text or csv", other)),
        }
    }
}

/// A rendered export, ready to be offered as a download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub file_name: &'static str,
    pub mime_type: &'static str,
    pub contents: String,
}

/// Flat-file encoders over the timetable store. No network access.
pub struct TimetableExporter {
    title: String,
}

impl TimetableExporter {
    /// Encode `entries`, refusing to produce a file for an empty timetable.
    pub fn export(&self, format: ExportFormat, entries: &[TimetableEntry]) -> Result<ExportFile> {
        if entries.is_empty() {
            return Err(Error::EmptyTimetable);
        }

        let contents = match format {
            ExportFormat::Text => self.to_text(entries),
            ExportFormat::Csv => self.to_csv(entries)?,
        };

        Ok(ExportFile {
            file_name: format.file_name(),
            mime_type: format.mime_type(),
            contents,
        })
    }

    /// Plain-text report grouped by day, Monday to Friday.
    pub fn to_text(&self, entries: &[TimetableEntry]) -> String {
        let mut content = String::new();

        content.push_str(&format!("{}\n", self.title));
        content.push_str(&format!("{}\n\n", "=".repeat(self.title.chars().count())));

        for day in Day::ALL {
            content.push_str(&format!("{}:\n", day));
            content.push_str(&format!("{}\n", "-".repeat(DAY_RULE_WIDTH)));

            let day_entries = entries_for_day(entries, day);
            if day_entries.is_empty() {
                content.push_str("No classes scheduled.\n\n");
                continue;
            }

            for entry in day_entries {
                content.push_str(&format!(
                    "{} - {} | {} - {} | Room: {} | {}\n",
                    entry.start_time,
                    entry.end_time,
                    entry.course_code,
                    entry.course_name,
                    entry.room_name,
                    entry.lecturer_name
                ));
            }
            content.push('\n');
        }

        content
    }

    /// One row per entry in store order.
    pub fn to_csv(&self, entries: &[TimetableEntry]) -> Result<String> {
        let mut writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(Vec::new());

        writer.write_record(CSV_HEADER)?;
        for entry in entries {
            let time = format!("{} - {}", entry.start_time, entry.end_time);
            writer.write_record([
                entry.day.as_str(),
                time.as_str(),
                entry.course_code.as_str(),
                entry.course_name.as_str(),
                entry.room_name.as_str(),
                entry.lecturer_name.as_str(),
            ])?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| Error::Internal(format!("Failed to flush CSV writer: {}", e)))?;
        String::from_utf8(bytes).map_err(|e| Error::Internal(format!("CSV is not UTF-8: {}", e)))
    }
}

impl Default for TimetableExporter {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
        }
    }
}
