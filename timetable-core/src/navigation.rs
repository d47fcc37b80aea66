use std::{fmt, str::FromStr};

/// Top-level sections of the client, one per entity plus the weekly grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Section {
    Courses,
    Lecturers,
    Rooms,
    TimeSlots,
    #[default]
    Timetable,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::Courses,
        Section::Lecturers,
        Section::Rooms,
        Section::TimeSlots,
        Section::Timetable,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Section::Courses => "courses",
            Section::Lecturers => "lecturers",
            Section::Rooms => "rooms",
            Section::TimeSlots => "timeslots",
            Section::Timetable => "timetable",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Section {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace(['-', '_', ' '], "");
        Section::ALL
            .into_iter()
            .find(|section| section.as_str() == wanted)
            .ok_or_else(|| {
                format!(
                    "unknown section '{}', expected one of: courses, lecturers, rooms, timeslots, timetable",
                    s
                )
            })
    }
}

/// Tracks which section is active. Exactly one is active at any time.
#[derive(Debug, Clone, Default)]
pub struct Navigator {
    active: Section,
}

impl Navigator {
    pub fn new(active: Section) -> Self {
        Self { active }
    }

    pub fn active(&self) -> Section {
        self.active
    }

    /// Activate the section belonging to the control that was triggered.
    pub fn show_section(&mut self, trigger: Section) -> Section {
        if self.active != trigger {
            tracing::debug!("Switching section: {} -> {}", self.active, trigger);
        }
        self.active = trigger;
        self.active
    }

    pub fn is_active(&self, section: Section) -> bool {
        self.active == section
    }
}
