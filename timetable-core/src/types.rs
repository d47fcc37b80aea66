use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Teaching day. Only the five weekdays are schedulable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl Day {
    /// Fixed display order used by the grid and the text export.
    pub const ALL: [Day; 5] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Day::Monday => "Monday",
            Day::Tuesday => "Tuesday",
            Day::Wednesday => "Wednesday",
            Day::Thursday => "Thursday",
            Day::Friday => "Friday",
        }
    }

    /// Case-insensitive match against a day name as it arrives from the backend.
    pub fn matches(self, raw: &str) -> bool {
        raw.trim().eq_ignore_ascii_case(self.as_str())
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Day {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Day::ALL
            .into_iter()
            .find(|day| day.matches(s))
            .ok_or_else(|| format!("'{}' is not a weekday (Monday to Friday)", s))
    }
}

/// A course offered by the department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    /// User-supplied unique code, e.g. `CS101`
    pub code: String,
    pub name: String,
    pub credits: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lecturer {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
}

/// A room is identified by its name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub name: String,
    pub capacity: i32,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub room_type: Option<String>,
}

/// Start and end are `HH:MM` strings, so string order is chronological order.
///
/// `day` is kept as the backend sent it; only the form restricts it to [`Day`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    pub id: String,
    pub day: String,
    pub start_time: String,
    pub end_time: String,
}

/// A scheduled class.
///
/// The foreign keys reference the other four collections; the display fields
/// are denormalized by the backend and trusted as supplied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimetableEntry {
    pub id: String,
    pub course_code: String,
    pub lecturer_id: String,
    pub room_name: String,
    pub time_slot_id: String,
    #[serde(default)]
    pub course_name: String,
    #[serde(default)]
    pub lecturer_name: String,
    #[serde(default)]
    pub day: String,
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub end_time: String,
}

/// Body of `POST /timetable`; the backend fills in the display fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTimetableEntry {
    pub id: String,
    pub course_code: String,
    pub lecturer_id: String,
    pub room_name: String,
    pub time_slot_id: String,
}
