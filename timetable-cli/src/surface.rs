use std::collections::HashMap;

use timetable_core::prelude::*;

/// Terminal display surface.
///
/// Keeps the latest view model of every widget and prints the active section
/// on demand. Notifications are written to stderr as soon as they arrive.
#[derive(Default)]
pub struct TerminalSurface {
    lists: HashMap<ListKind, Vec<Card>>,
    grid: Option<WeeklyGrid>,
    dropdowns: Option<TimetableDropdowns>,
    active: Section,
}

impl TerminalSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render the active section as text.
    pub fn render_active(&self) -> String {
        match self.active {
            Section::Courses => self.render_list("Courses", ListKind::Courses),
            Section::Lecturers => self.render_list("Lecturers", ListKind::Lecturers),
            Section::Rooms => self.render_list("Rooms", ListKind::Rooms),
            Section::TimeSlots => self.render_list("Time Slots", ListKind::TimeSlots),
            Section::Timetable => self.render_timetable(),
        }
    }

    pub fn present(&self) {
        print!("{}", self.render_active());
    }

    fn render_list(&self, heading: &str, kind: ListKind) -> String {
        let mut out = format!("== {} ==\n", heading);
        match self.lists.get(&kind) {
            Some(cards) if !cards.is_empty() => {
                for card in cards {
                    out.push_str(&format!("- {}\n", card.title));
                    for line in &card.lines {
                        out.push_str(&format!("    {}\n", line));
                    }
                }
            }
            _ => out.push_str("  (none)\n"),
        }
        out
    }

    fn render_timetable(&self) -> String {
        let mut out = String::from("== Timetable ==\n");

        if let Some(grid) = &self.grid {
            for column in &grid.columns {
                out.push_str(&format!("{}\n", column.day));
                if let Some(placeholder) = column.placeholder() {
                    out.push_str(&format!("    {}\n", placeholder));
                }
                for item in &column.items {
                    out.push_str(&format!(
                        "    {}  {}  {}  {}\n",
                        item.time, item.course, item.room, item.lecturer
                    ));
                }
            }
        }

        if let Some(dropdowns) = &self.dropdowns {
            out.push_str("\nAvailable for new entries:\n");
            for (name, dropdown) in [
                ("course", &dropdowns.course),
                ("lecturer", &dropdowns.lecturer),
                ("room", &dropdowns.room),
                ("timeslot", &dropdowns.time_slot),
            ] {
                let labels: Vec<_> = dropdown
                    .choices()
                    .iter()
                    .map(|o| format!("{} [{}]", o.label, o.value))
                    .collect();
                let listed = if labels.is_empty() {
                    dropdown.options[0].label.clone()
                } else {
                    labels.join(", ")
                };
                out.push_str(&format!("  --{}: {}\n", name, listed));
            }
        }

        out
    }
}

impl Surface for TerminalSurface {
    fn show_list(&mut self, kind: ListKind, cards: &[Card]) {
        self.lists.insert(kind, cards.to_vec());
    }

    fn show_grid(&mut self, grid: &WeeklyGrid) {
        self.grid = Some(grid.clone());
    }

    fn show_dropdowns(&mut self, dropdowns: &TimetableDropdowns) {
        self.dropdowns = Some(dropdowns.clone());
    }

    fn show_section(&mut self, section: Section) {
        self.active = section;
    }

    fn notify(&mut self, notification: &Notification) {
        let marker = match notification.kind {
            NotificationKind::Success => "✓",
            NotificationKind::Error => "✗",
        };
        eprintln!(
            "[{}] {} {}",
            notification.raised_at.format("%H:%M:%S"),
            marker,
            notification.message
        );
    }
}
