use std::{
    collections::HashMap,
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use serde_json::json;

use super::*;
use crate::{
    notify::NotificationKind,
    view::{Card, WeeklyGrid},
};

const BASE_URL: &str = "http://backend.test/api";

/// In-memory stand-in for the REST backend.
///
/// Posted timetable entries are joined against the other collections, and an
/// entry that reuses a room or lecturer in an occupied slot is answered with 409.
#[derive(Default)]
struct FakeBackend {
    collections: Mutex<HashMap<&'static str, Vec<Value>>>,
    failures: Mutex<HashMap<(String, Method), u16>>,
    posts: Mutex<Vec<(String, Value)>>,
    gets: AtomicUsize,
}

impl FakeBackend {
    fn seeded() -> Self {
        let backend = Self::default();
        backend.seed(
            "/courses",
            vec![json!({"code": "MA201", "name": "Algebra", "credits": 5})],
        );
        backend.seed(
            "/lecturers",
            vec![json!({"id": "L1", "name": "Ada Lovelace", "department": "Maths"})],
        );
        backend.seed(
            "/rooms",
            vec![
                json!({"name": "A101", "capacity": 40}),
                json!({"name": "B2", "capacity": 12, "type": "Lab"}),
            ],
        );
        backend.seed(
            "/timeslots",
            vec![
                json!({"id": "T1", "day": "Monday", "startTime": "09:00", "endTime": "10:00"}),
                json!({"id": "T2", "day": "Tuesday", "startTime": "11:00", "endTime": "12:00"}),
            ],
        );
        backend.seed("/timetable", Vec::new());
        backend
    }

    fn seed(&self, endpoint: &'static str, items: Vec<Value>) {
        self.collections.lock().unwrap().insert(endpoint, items);
    }

    fn fail(&self, endpoint: &str, method: Method, status: u16) {
        self.failures
            .lock()
            .unwrap()
            .insert((endpoint.to_string(), method), status);
    }

    fn heal(&self, endpoint: &str, method: Method) {
        self.failures
            .lock()
            .unwrap()
            .remove(&(endpoint.to_string(), method));
    }

    fn post_count(&self) -> usize {
        self.posts.lock().unwrap().len()
    }

    fn find(&self, endpoint: &str, key: &str, value: &str) -> Option<Value> {
        self.collections
            .lock()
            .unwrap()
            .get(endpoint)?
            .iter()
            .find(|item| item[key] == value)
            .cloned()
    }

    fn create_entry(&self, body: &Value) -> std::result::Result<Value, u16> {
        let course = self.find("/courses", "code", body["courseCode"].as_str().unwrap_or(""));
        let lecturer = self.find("/lecturers", "id", body["lecturerId"].as_str().unwrap_or(""));
        let room = self.find("/rooms", "name", body["roomName"].as_str().unwrap_or(""));
        let slot = self.find("/timeslots", "id", body["timeSlotId"].as_str().unwrap_or(""));
        let (Some(course), Some(lecturer), Some(_), Some(slot)) = (course, lecturer, room, slot)
        else {
            return Err(400);
        };

        let collections = self.collections.lock().unwrap();
        let clash = collections["/timetable"].iter().any(|existing| {
            existing["timeSlotId"] == body["timeSlotId"]
                && (existing["roomName"] == body["roomName"]
                    || existing["lecturerId"] == body["lecturerId"])
        });
        if clash {
            return Err(409);
        }

        let mut entry = body.clone();
        entry["courseName"] = course["name"].clone();
        entry["lecturerName"] = lecturer["name"].clone();
        entry["day"] = slot["day"].clone();
        entry["startTime"] = slot["startTime"].clone();
        entry["endTime"] = slot["endTime"].clone();
        Ok(entry)
    }
}

#[async_trait]
impl Gateway for FakeBackend {
    fn base_url(&self) -> &str {
        BASE_URL
    }

    async fn call(
        &self,
        endpoint: &str,
        method: Method,
        payload: Option<&Value>,
    ) -> Result<String> {
        if let Some(status) = self
            .failures
            .lock()
            .unwrap()
            .get(&(endpoint.to_string(), method.clone()))
        {
            return Err(Error::Http {
                status: *status,
                body: "rejected".to_string(),
            });
        }

        if method == Method::GET {
            self.gets.fetch_add(1, Ordering::SeqCst);
            let collections = self.collections.lock().unwrap();
            let items = collections.get(endpoint).cloned().unwrap_or_default();
            return Ok(serde_json::to_string(&items)?);
        }

        let body = payload.cloned().unwrap_or(Value::Null);
        let stored = if endpoint == "/timetable" {
            self.create_entry(&body).map_err(|status| Error::Http {
                status,
                body: "conflict".to_string(),
            })?
        } else {
            body.clone()
        };

        self.posts
            .lock()
            .unwrap()
            .push((endpoint.to_string(), body));
        self.collections
            .lock()
            .unwrap()
            .entry(match endpoint {
                "/courses" => "/courses",
                "/lecturers" => "/lecturers",
                "/rooms" => "/rooms",
                "/timeslots" => "/timeslots",
                _ => "/timetable",
            })
            .or_default()
            .push(stored.clone());

        Ok(stored.to_string())
    }
}

/// Surface that keeps whatever was last applied to it.
#[derive(Default)]
struct RecordingSurface {
    lists: HashMap<ListKind, Vec<Card>>,
    grid: Option<WeeklyGrid>,
    dropdowns: Option<TimetableDropdowns>,
    dropdown_renders: usize,
    sections: Vec<Section>,
    notifications: Vec<Notification>,
}

impl RecordingSurface {
    fn messages(&self) -> Vec<&str> {
        self.notifications
            .iter()
            .map(|n| n.message.as_str())
            .collect()
    }

    fn last(&self) -> &Notification {
        self.notifications.last().expect("no notification raised")
    }
}

impl Surface for RecordingSurface {
    fn show_list(&mut self, kind: ListKind, cards: &[Card]) {
        self.lists.insert(kind, cards.to_vec());
    }

    fn show_grid(&mut self, grid: &WeeklyGrid) {
        self.grid = Some(grid.clone());
    }

    fn show_dropdowns(&mut self, dropdowns: &TimetableDropdowns) {
        self.dropdowns = Some(dropdowns.clone());
        self.dropdown_renders += 1;
    }

    fn show_section(&mut self, section: Section) {
        self.sections.push(section);
    }

    fn notify(&mut self, notification: &Notification) {
        self.notifications.push(notification.clone());
    }
}

async fn started(backend: FakeBackend) -> Controller<FakeBackend, RecordingSurface> {
    let mut controller = Controller::new(backend, RecordingSurface::default());
    controller.start().await.expect("startup failed");
    controller
}

fn entry_form(id: &str, lecturer: &str, room: &str, slot: &str) -> TimetableEntryForm {
    TimetableEntryForm {
        id: id.to_string(),
        course_code: "MA201".to_string(),
        lecturer_id: lecturer.to_string(),
        room_name: room.to_string(),
        time_slot_id: slot.to_string(),
    }
}

#[tokio::test]
async fn test_start_loads_every_store_and_primes_dropdowns() {
    let controller = started(FakeBackend::seeded()).await;
    let state = controller.state();

    assert_eq!(state.len(Resource::Courses), 1);
    assert_eq!(state.len(Resource::Lecturers), 1);
    assert_eq!(state.len(Resource::Rooms), 2);
    assert_eq!(state.len(Resource::TimeSlots), 2);
    assert_eq!(state.len(Resource::Timetable), 0);

    let surface = controller.surface();
    assert_eq!(surface.lists[&ListKind::Rooms].len(), 2);
    assert_eq!(surface.lists[&ListKind::Courses][0].title, "MA201");
    assert_eq!(surface.grid.as_ref().unwrap().item_count(), 0);
    assert_eq!(surface.dropdown_renders, 1);
    assert_eq!(
        surface.dropdowns.as_ref().unwrap().time_slot.choices()[1].label,
        "Tuesday 11:00-12:00"
    );
    assert_eq!(surface.sections, vec![Section::Timetable]);
    assert!(surface.notifications.is_empty());
}

#[tokio::test]
async fn test_start_is_all_or_nothing() {
    let backend = FakeBackend::seeded();
    backend.fail("/rooms", Method::GET, 500);

    let mut controller = Controller::new(backend, RecordingSurface::default());
    let err = controller.start().await.unwrap_err();

    match err {
        Error::Startup { failed } => assert_eq!(failed, vec![Resource::Rooms]),
        other => panic!("unexpected error: {other}"),
    }

    // The four successful fetches are not committed either.
    for resource in Resource::ALL {
        assert_eq!(controller.state().len(resource), 0);
    }
    let surface = controller.surface();
    assert!(surface.lists.is_empty());
    assert_eq!(surface.dropdown_renders, 0);
    assert_eq!(
        surface.messages(),
        vec!["Failed to connect to backend server. Make sure it's running at http://backend.test/api."]
    );
}

#[tokio::test]
async fn test_start_retry_after_failure_commits() {
    let backend = FakeBackend::seeded();
    backend.fail("/timetable", Method::GET, 503);

    let mut controller = Controller::new(backend, RecordingSurface::default());
    assert!(controller.start().await.is_err());

    controller.gateway.heal("/timetable", Method::GET);
    controller.start().await.unwrap();
    assert_eq!(controller.state().len(Resource::Rooms), 2);
    assert_eq!(controller.surface().dropdown_renders, 1);
}

#[tokio::test]
async fn test_malformed_collection_rejects_startup_without_popup() {
    let backend = FakeBackend::seeded();
    let mut controller = Controller::new(backend, RecordingSurface::default());
    controller.gateway.seed("/lecturers", vec![json!({"unexpected": true})]);

    let err = controller.start().await.unwrap_err();
    assert!(matches!(err, Error::Startup { ref failed } if failed == &[Resource::Lecturers]));
    assert!(controller.surface().notifications.is_empty());
}

#[tokio::test]
async fn test_add_course_refreshes_list_and_cascades_to_dropdowns() {
    let mut controller = started(FakeBackend::seeded()).await;
    let mut form = CourseForm {
        code: "CS101".to_string(),
        name: "Intro".to_string(),
        credits: "3".to_string(),
    };

    let outcome = controller.add_course(&mut form).await;

    assert_eq!(outcome, WorkflowOutcome::Success);
    assert_eq!(controller.phase(), WorkflowPhase::Idle);
    assert_eq!(form, CourseForm::default());

    let posts = controller.gateway.posts.lock().unwrap().clone();
    assert_eq!(
        posts,
        vec![(
            "/courses".to_string(),
            json!({"code": "CS101", "name": "Intro", "credits": 3})
        )]
    );

    let surface = controller.surface();
    let card = surface.lists[&ListKind::Courses]
        .iter()
        .find(|c| c.title == "CS101")
        .expect("new course card");
    assert_eq!(card.lines, vec!["Intro", "Credits: 3"]);

    let dropdowns = surface.dropdowns.as_ref().unwrap();
    assert!(
        dropdowns
            .course
            .choices()
            .iter()
            .any(|o| o.value == "CS101" && o.label == "CS101 - Intro")
    );
    assert_eq!(surface.dropdown_renders, 2);
    assert_eq!(surface.last().kind, NotificationKind::Success);
    assert_eq!(surface.last().message, "Course added successfully!");
}

#[tokio::test]
async fn test_each_entity_workflow_posts_to_its_collection() {
    let mut controller = started(FakeBackend::seeded()).await;

    let mut lecturer = LecturerForm {
        id: "L2".to_string(),
        name: "Alan Turing".to_string(),
        department: String::new(),
    };
    let mut room = RoomForm {
        name: "C3".to_string(),
        capacity: "80".to_string(),
        room_type: "Lecture Hall".to_string(),
    };
    let mut slot = TimeSlotForm {
        id: "T3".to_string(),
        day: "Friday".to_string(),
        start_time: "14:00".to_string(),
        end_time: "15:30".to_string(),
    };

    assert_eq!(controller.add_lecturer(&mut lecturer).await, WorkflowOutcome::Success);
    assert_eq!(controller.add_room(&mut room).await, WorkflowOutcome::Success);
    assert_eq!(controller.add_time_slot(&mut slot).await, WorkflowOutcome::Success);

    let state = controller.state();
    assert_eq!(state.len(Resource::Lecturers), 2);
    assert_eq!(state.len(Resource::Rooms), 3);
    assert_eq!(state.len(Resource::TimeSlots), 3);

    let surface = controller.surface();
    assert_eq!(
        surface.messages(),
        vec![
            "Lecturer added successfully!",
            "Room added successfully!",
            "Time slot added successfully!"
        ]
    );
    let dropdowns = surface.dropdowns.as_ref().unwrap();
    assert!(dropdowns.lecturer.contains_value("L2"));
    assert!(dropdowns.room.contains_value("C3"));
    assert_eq!(dropdowns.time_slot.choices()[2].label, "Friday 14:00-15:30");
}

#[tokio::test]
async fn test_timetable_entry_refreshes_grid_without_cascade() {
    let mut controller = started(FakeBackend::seeded()).await;
    let mut form = entry_form("E1", "L1", "A101", "T1");

    let outcome = controller.add_timetable_entry(&mut form).await;

    assert_eq!(outcome, WorkflowOutcome::Success);
    assert_eq!(form, TimetableEntryForm::default());
    assert_eq!(controller.state().len(Resource::Timetable), 1);

    let surface = controller.surface();
    assert_eq!(surface.dropdown_renders, 1);
    let grid = surface.grid.as_ref().unwrap();
    let monday = grid.column(crate::Day::Monday).unwrap();
    assert_eq!(monday.items.len(), 1);
    assert_eq!(monday.items[0].course, "MA201: Algebra");
    assert_eq!(monday.items[0].lecturer, "Ada Lovelace");
    assert_eq!(surface.last().message, "Timetable entry added successfully!");
}

#[tokio::test]
async fn test_conflicting_entry_leaves_state_and_form_untouched() {
    let mut controller = started(FakeBackend::seeded()).await;
    let mut first = entry_form("E1", "L1", "A101", "T1");
    assert_eq!(
        controller.add_timetable_entry(&mut first).await,
        WorkflowOutcome::Success
    );
    let gets_before = controller.gateway.gets.load(Ordering::SeqCst);

    // Same lecturer, same slot, different room.
    let mut clash = entry_form("E2", "L1", "B2", "T1");
    let outcome = controller.add_timetable_entry(&mut clash).await;

    assert_eq!(outcome, WorkflowOutcome::Failure);
    assert_eq!(controller.phase(), WorkflowPhase::Idle);
    assert_eq!(clash, entry_form("E2", "L1", "B2", "T1"));
    assert_eq!(controller.state().len(Resource::Timetable), 1);
    assert_eq!(controller.gateway.gets.load(Ordering::SeqCst), gets_before);

    let surface = controller.surface();
    let messages = surface.messages();
    assert_eq!(
        &messages[messages.len() - 2..],
        &[
            "Failed to connect to backend server. Make sure it's running at http://backend.test/api.",
            "Failed to add timetable entry. Check for conflicts or missing data."
        ]
    );
    assert_eq!(surface.last().kind, NotificationKind::Error);
}

#[tokio::test]
async fn test_invalid_form_is_rejected_before_any_request() {
    let mut controller = started(FakeBackend::seeded()).await;
    let mut form = RoomForm {
        name: "D4".to_string(),
        capacity: "lots".to_string(),
        room_type: String::new(),
    };

    let outcome = controller.add_room(&mut form).await;

    assert_eq!(outcome, WorkflowOutcome::Failure);
    assert_eq!(controller.gateway.post_count(), 0);
    assert_eq!(form.capacity, "lots");
    assert_eq!(
        controller.surface().messages(),
        vec![
            "Invalid capacity: 'lots' is not a whole number",
            "Failed to add room"
        ]
    );
}

#[tokio::test]
async fn test_failed_refresh_after_create_keeps_success_and_old_snapshot() {
    let mut controller = started(FakeBackend::seeded()).await;
    controller.gateway.fail("/courses", Method::GET, 500);

    let mut form = CourseForm {
        code: "PH100".to_string(),
        name: "Physics".to_string(),
        credits: "4".to_string(),
    };
    let outcome = controller.add_course(&mut form).await;

    assert_eq!(outcome, WorkflowOutcome::Success);
    assert_eq!(controller.state().len(Resource::Courses), 1);
    assert_eq!(controller.surface().dropdown_renders, 2);
    assert_eq!(
        controller.surface().messages(),
        vec![
            "Course added successfully!",
            "Failed to connect to backend server. Make sure it's running at http://backend.test/api."
        ]
    );
}

#[tokio::test]
async fn test_export_requires_entries() {
    let mut controller = started(FakeBackend::seeded()).await;

    let err = controller.export(ExportFormat::Csv).unwrap_err();
    assert!(matches!(err, Error::EmptyTimetable));
    assert_eq!(controller.surface().last().message, "No timetable entries to export");
    assert_eq!(controller.surface().last().kind, NotificationKind::Error);
}

#[tokio::test]
async fn test_export_counts_match_store() {
    let mut controller = started(FakeBackend::seeded()).await;
    for (id, slot) in [("E1", "T1"), ("E2", "T2")] {
        let mut form = entry_form(id, "L1", "A101", slot);
        assert_eq!(
            controller.add_timetable_entry(&mut form).await,
            WorkflowOutcome::Success
        );
    }

    let csv = controller.export(ExportFormat::Csv).unwrap();
    assert_eq!(csv.file_name, "timetable.csv");
    assert_eq!(csv.contents.lines().count(), 1 + controller.state().timetable.len());
    assert_eq!(
        controller.surface().last().message,
        "Timetable exported as CSV successfully!"
    );

    let text = controller.export(ExportFormat::Text).unwrap();
    assert_eq!(text.file_name, "timetable.txt");
    assert_eq!(
        text.contents.lines().filter(|l| l.contains(" | Room: ")).count(),
        controller.state().timetable.len()
    );
}

#[tokio::test]
async fn test_show_section_uses_explicit_trigger() {
    let mut controller = started(FakeBackend::seeded()).await;

    controller.show_section(Section::Lecturers);

    assert_eq!(controller.active_section(), Section::Lecturers);
    assert_eq!(
        controller.surface().sections,
        vec![Section::Timetable, Section::Lecturers]
    );
}

#[tokio::test]
async fn test_dropdowns_are_stable_between_rebuilds() {
    let mut controller = started(FakeBackend::seeded()).await;
    let first = controller.surface().dropdowns.clone();

    controller.refresh_dropdowns();

    assert_eq!(controller.surface().dropdowns, first);
    assert_eq!(controller.dropdowns(), first.unwrap());
}
