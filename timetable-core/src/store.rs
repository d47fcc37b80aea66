//! In-memory mirrors of the five backend collections.

use std::{fmt, sync::Arc};

use serde::de::DeserializeOwned;

use crate::{Course, Lecturer, Result, Room, TimeSlot, TimetableEntry};

/// One backend collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Courses,
    Lecturers,
    Rooms,
    TimeSlots,
    Timetable,
}

impl Resource {
    pub const ALL: [Resource; 5] = [
        Resource::Courses,
        Resource::Lecturers,
        Resource::Rooms,
        Resource::TimeSlots,
        Resource::Timetable,
    ];

    /// Collection endpoint, relative to the base URL. Serves both `GET` and `POST`.
    pub fn endpoint(self) -> &'static str {
        match self {
            Resource::Courses => "/courses",
            Resource::Lecturers => "/lecturers",
            Resource::Rooms => "/rooms",
            Resource::TimeSlots => "/timeslots",
            Resource::Timetable => "/timetable",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Resource::Courses => "courses",
            Resource::Lecturers => "lecturers",
            Resource::Rooms => "rooms",
            Resource::TimeSlots => "time slots",
            Resource::Timetable => "timetable",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A collection snapshot that is only ever replaced wholesale.
///
/// Readers hold an `Arc` to a complete snapshot, so they observe either the
/// old or the new content, never a partially filled one.
#[derive(Debug)]
pub struct Store<T> {
    items: Arc<[T]>,
}

impl<T> Store<T> {
    pub fn new() -> Self {
        Self {
            items: Arc::from(Vec::<T>::new()),
        }
    }

    pub fn replace(&mut self, items: Vec<T>) {
        self.items = Arc::from(items);
    }

    pub fn snapshot(&self) -> Arc<[T]> {
        Arc::clone(&self.items)
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T> Default for Store<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            items: Arc::clone(&self.items),
        }
    }
}

/// Parse a collection response body.
pub fn parse_collection<T: DeserializeOwned>(text: &str) -> Result<Vec<T>> {
    Ok(serde_json::from_str(text)?)
}

/// A fully parsed collection, ready to be swapped into [`AppState`].
#[derive(Debug, Clone)]
pub enum Collection {
    Courses(Vec<Course>),
    Lecturers(Vec<Lecturer>),
    Rooms(Vec<Room>),
    TimeSlots(Vec<TimeSlot>),
    Timetable(Vec<TimetableEntry>),
}

impl Collection {
    pub fn parse(resource: Resource, text: &str) -> Result<Self> {
        Ok(match resource {
            Resource::Courses => Collection::Courses(parse_collection(text)?),
            Resource::Lecturers => Collection::Lecturers(parse_collection(text)?),
            Resource::Rooms => Collection::Rooms(parse_collection(text)?),
            Resource::TimeSlots => Collection::TimeSlots(parse_collection(text)?),
            Resource::Timetable => Collection::Timetable(parse_collection(text)?),
        })
    }

    pub fn resource(&self) -> Resource {
        match self {
            Collection::Courses(_) => Resource::Courses,
            Collection::Lecturers(_) => Resource::Lecturers,
            Collection::Rooms(_) => Resource::Rooms,
            Collection::TimeSlots(_) => Resource::TimeSlots,
            Collection::Timetable(_) => Resource::Timetable,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Collection::Courses(v) => v.len(),
            Collection::Lecturers(v) => v.len(),
            Collection::Rooms(v) => v.len(),
            Collection::TimeSlots(v) => v.len(),
            Collection::Timetable(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Application state: the five entity stores.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub courses: Store<Course>,
    pub lecturers: Store<Lecturer>,
    pub rooms: Store<Room>,
    pub time_slots: Store<TimeSlot>,
    pub timetable: Store<TimetableEntry>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swap one store for the parsed collection.
    pub fn apply(&mut self, collection: Collection) {
        let resource = collection.resource();
        let count = collection.len();
        match collection {
            Collection::Courses(v) => self.courses.replace(v),
            Collection::Lecturers(v) => self.lecturers.replace(v),
            Collection::Rooms(v) => self.rooms.replace(v),
            Collection::TimeSlots(v) => self.time_slots.replace(v),
            Collection::Timetable(v) => self.timetable.replace(v),
        }
        tracing::info!("Loaded {} {}", count, resource);
    }

    /// Parse a `GET` response for `resource` and replace that store.
    pub fn load(&mut self, resource: Resource, text: &str) -> Result<()> {
        let collection = Collection::parse(resource, text)?;
        self.apply(collection);
        Ok(())
    }

    pub fn len(&self, resource: Resource) -> usize {
        match resource {
            Resource::Courses => self.courses.len(),
            Resource::Lecturers => self.lecturers.len(),
            Resource::Rooms => self.rooms.len(),
            Resource::TimeSlots => self.time_slots.len(),
            Resource::Timetable => self.timetable.len(),
        }
    }
}
