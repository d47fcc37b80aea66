//! Read-only projections from the entity stores into view models.
//!
//! Everything here is a pure function of its input; [`Surface`] is the
//! imperative side that puts the view models on screen.

use crate::{
    Course, Day, Lecturer, Room, TimeSlot, TimetableEntry, navigation::Section,
    notify::Notification,
};

pub const EMPTY_DAY_PLACEHOLDER: &str = "No classes scheduled";
const NOT_SPECIFIED: &str = "Not specified";

/// Summary card shown in an entity list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub title: String,
    pub lines: Vec<String>,
}

/// Which entity list a set of cards belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListKind {
    Courses,
    Lecturers,
    Rooms,
    TimeSlots,
}

pub fn course_cards(courses: &[Course]) -> Vec<Card> {
    courses
        .iter()
        .map(|course| Card {
            title: course.code.clone(),
            lines: vec![course.name.clone(), format!("Credits: {}", course.credits)],
        })
        .collect()
}

pub fn lecturer_cards(lecturers: &[Lecturer]) -> Vec<Card> {
    lecturers
        .iter()
        .map(|lecturer| Card {
            title: lecturer.name.clone(),
            lines: vec![
                format!("ID: {}", lecturer.id),
                format!(
                    "Department: {}",
                    or_not_specified(lecturer.department.as_deref())
                ),
            ],
        })
        .collect()
}

pub fn room_cards(rooms: &[Room]) -> Vec<Card> {
    rooms
        .iter()
        .map(|room| Card {
            title: room.name.clone(),
            lines: vec![
                format!("Capacity: {}", room.capacity),
                format!("Type: {}", or_not_specified(room.room_type.as_deref())),
            ],
        })
        .collect()
}

pub fn time_slot_cards(slots: &[TimeSlot]) -> Vec<Card> {
    slots
        .iter()
        .map(|slot| Card {
            title: slot.day.clone(),
            lines: vec![
                format!("{} - {}", slot.start_time, slot.end_time),
                format!("ID: {}", slot.id),
            ],
        })
        .collect()
}

fn or_not_specified(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or(NOT_SPECIFIED)
}

/// One class inside a day column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleItem {
    pub entry_id: String,
    pub start_time: String,
    pub time: String,
    pub course: String,
    pub room: String,
    pub lecturer: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayColumn {
    pub day: Day,
    pub items: Vec<ScheduleItem>,
}

impl DayColumn {
    /// Message shown instead of items for a free day.
    pub fn placeholder(&self) -> Option<&'static str> {
        self.items.is_empty().then_some(EMPTY_DAY_PLACEHOLDER)
    }
}

/// Monday to Friday, in that order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeeklyGrid {
    pub columns: Vec<DayColumn>,
}

impl WeeklyGrid {
    pub fn column(&self, day: Day) -> Option<&DayColumn> {
        self.columns.iter().find(|c| c.day == day)
    }

    pub fn item_count(&self) -> usize {
        self.columns.iter().map(|c| c.items.len()).sum()
    }
}

/// Entries of `day`, matched case-insensitively and ordered by start time.
///
/// The sort is stable, so entries with equal start times keep store order.
pub fn entries_for_day(entries: &[TimetableEntry], day: Day) -> Vec<&TimetableEntry> {
    let mut day_entries: Vec<_> = entries.iter().filter(|e| day.matches(&e.day)).collect();
    day_entries.sort_by(|a, b| a.start_time.cmp(&b.start_time));
    day_entries
}

pub fn weekly_grid(entries: &[TimetableEntry]) -> WeeklyGrid {
    let columns = Day::ALL
        .into_iter()
        .map(|day| DayColumn {
            day,
            items: entries_for_day(entries, day)
                .into_iter()
                .map(|entry| ScheduleItem {
                    entry_id: entry.id.clone(),
                    start_time: entry.start_time.clone(),
                    time: format!("{} - {}", entry.start_time, entry.end_time),
                    course: format!("{}: {}", entry.course_code, entry.course_name),
                    room: format!("Room: {}", entry.room_name),
                    lecturer: entry.lecturer_name.clone(),
                })
                .collect(),
        })
        .collect();

    WeeklyGrid { columns }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// A selection control. The first option is always the neutral placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dropdown {
    pub options: Vec<SelectOption>,
}

impl Dropdown {
    fn build(placeholder: &str, choices: impl Iterator<Item = SelectOption>) -> Self {
        let options = std::iter::once(SelectOption::new("", placeholder))
            .chain(choices)
            .collect();
        Self { options }
    }

    /// Options excluding the placeholder.
    pub fn choices(&self) -> &[SelectOption] {
        self.options.get(1..).unwrap_or(&[])
    }

    pub fn contains_value(&self, value: &str) -> bool {
        !value.is_empty() && self.choices().iter().any(|o| o.value == value)
    }
}

/// The four selection controls of the timetable-entry form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimetableDropdowns {
    pub course: Dropdown,
    pub lecturer: Dropdown,
    pub room: Dropdown,
    pub time_slot: Dropdown,
}

pub fn timetable_dropdowns(
    courses: &[Course],
    lecturers: &[Lecturer],
    rooms: &[Room],
    slots: &[TimeSlot],
) -> TimetableDropdowns {
    TimetableDropdowns {
        course: Dropdown::build(
            "Select Course",
            courses
                .iter()
                .map(|c| SelectOption::new(&c.code, format!("{} - {}", c.code, c.name))),
        ),
        lecturer: Dropdown::build(
            "Select Lecturer",
            lecturers.iter().map(|l| SelectOption::new(&l.id, &l.name)),
        ),
        room: Dropdown::build(
            "Select Room",
            rooms.iter().map(|r| SelectOption::new(&r.name, &r.name)),
        ),
        time_slot: Dropdown::build(
            "Select Time Slot",
            slots.iter().map(|s| {
                SelectOption::new(&s.id, format!("{} {}-{}", s.day, s.start_time, s.end_time))
            }),
        ),
    }
}

/// Display surface that view models are applied to.
pub trait Surface {
    /// Replace the cards of one entity list.
    fn show_list(&mut self, kind: ListKind, cards: &[Card]);

    fn show_grid(&mut self, grid: &WeeklyGrid);

    fn show_dropdowns(&mut self, dropdowns: &TimetableDropdowns);

    /// Make `section` the only visible section.
    fn show_section(&mut self, section: Section);

    fn notify(&mut self, notification: &Notification);
}
