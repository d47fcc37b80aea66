//! Raw form input and its coercion into request bodies.
//!
//! Fields hold exactly what the user typed. Coercion checks the shape of the
//! input only; referential checks and conflicts are left to the backend.

use chrono::NaiveTime;
use serde::Serialize;

use crate::{
    Course, Day, Error, Lecturer, NewTimetableEntry, Result, Room, TimeSlot, store::Resource,
};

/// A data-entry form bound to one backend collection.
pub trait Form {
    /// Request body produced by a successful coercion.
    type Payload: Serialize;

    /// Collection the form posts to.
    const RESOURCE: Resource;
    /// Entity name used in the success message.
    const ENTITY: &'static str;
    const FAILURE_MESSAGE: &'static str;

    fn to_payload(&self) -> Result<Self::Payload>;

    /// Clear every field.
    fn reset(&mut self);
}

fn required(field: &'static str, value: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(Error::validation(field, "is required"));
    }
    Ok(value.to_string())
}

fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn integer(field: &'static str, value: &str) -> Result<i32> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::validation(field, format!("'{}' is not a whole number", value)))
}

fn time_of_day(field: &'static str, value: &str) -> Result<String> {
    let value = value.trim();
    let time = NaiveTime::parse_from_str(value, "%H:%M")
        .map_err(|_| Error::validation(field, format!("'{}' is not a HH:MM time", value)))?;
    // Zero-padded so that string order stays chronological.
    Ok(time.format("%H:%M").to_string())
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CourseForm {
    pub code: String,
    pub name: String,
    pub credits: String,
}

impl Form for CourseForm {
    type Payload = Course;

    const RESOURCE: Resource = Resource::Courses;
    const ENTITY: &'static str = "Course";
    const FAILURE_MESSAGE: &'static str = "Failed to add course";

    fn to_payload(&self) -> Result<Course> {
        Ok(Course {
            code: required("code", &self.code)?,
            name: required("name", &self.name)?,
            credits: integer("credits", &self.credits)?,
        })
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LecturerForm {
    pub id: String,
    pub name: String,
    pub department: String,
}

impl Form for LecturerForm {
    type Payload = Lecturer;

    const RESOURCE: Resource = Resource::Lecturers;
    const ENTITY: &'static str = "Lecturer";
    const FAILURE_MESSAGE: &'static str = "Failed to add lecturer";

    fn to_payload(&self) -> Result<Lecturer> {
        Ok(Lecturer {
            id: required("id", &self.id)?,
            name: required("name", &self.name)?,
            department: optional(&self.department),
        })
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoomForm {
    pub name: String,
    pub capacity: String,
    pub room_type: String,
}

impl Form for RoomForm {
    type Payload = Room;

    const RESOURCE: Resource = Resource::Rooms;
    const ENTITY: &'static str = "Room";
    const FAILURE_MESSAGE: &'static str = "Failed to add room";

    fn to_payload(&self) -> Result<Room> {
        Ok(Room {
            name: required("name", &self.name)?,
            capacity: integer("capacity", &self.capacity)?,
            room_type: optional(&self.room_type),
        })
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimeSlotForm {
    pub id: String,
    pub day: String,
    pub start_time: String,
    pub end_time: String,
}

impl Form for TimeSlotForm {
    type Payload = TimeSlot;

    const RESOURCE: Resource = Resource::TimeSlots;
    const ENTITY: &'static str = "Time slot";
    const FAILURE_MESSAGE: &'static str = "Failed to add time slot";

    fn to_payload(&self) -> Result<TimeSlot> {
        let day: Day = self
            .day
            .parse()
            .map_err(|message: String| Error::validation("day", message))?;

        Ok(TimeSlot {
            id: required("id", &self.id)?,
            day: day.to_string(),
            start_time: time_of_day("start time", &self.start_time)?,
            end_time: time_of_day("end time", &self.end_time)?,
        })
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Selection values come from the timetable dropdowns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimetableEntryForm {
    pub id: String,
    pub course_code: String,
    pub lecturer_id: String,
    pub room_name: String,
    pub time_slot_id: String,
}

impl Form for TimetableEntryForm {
    type Payload = NewTimetableEntry;

    const RESOURCE: Resource = Resource::Timetable;
    const ENTITY: &'static str = "Timetable entry";
    const FAILURE_MESSAGE: &'static str =
        "Failed to add timetable entry. Check for conflicts or missing data.";

    fn to_payload(&self) -> Result<NewTimetableEntry> {
        Ok(NewTimetableEntry {
            id: required("id", &self.id)?,
            course_code: required("course", &self.course_code)?,
            lecturer_id: required("lecturer", &self.lecturer_id)?,
            room_name: required("room", &self.room_name)?,
            time_slot_id: required("time slot", &self.time_slot_id)?,
        })
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}
