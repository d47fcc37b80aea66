//! The single owner of application state.
//!
//! [`Controller`] coordinates the gateway, the entity stores and the display
//! surface. Every workflow runs to completion before the next one starts.

use reqwest::Method;
use serde_json::Value;

use crate::{
    Error, Result,
    export::{ExportFile, ExportFormat, TimetableExporter},
    forms::{CourseForm, Form, LecturerForm, RoomForm, TimeSlotForm, TimetableEntryForm},
    gateway::Gateway,
    navigation::{Navigator, Section},
    notify::Notification,
    store::{AppState, Collection, Resource},
    view::{self, ListKind, Surface, TimetableDropdowns},
};

/// Where a mutation workflow currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkflowPhase {
    #[default]
    Idle,
    Submitting(Resource),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowOutcome {
    Success,
    Failure,
}

pub struct Controller<G: Gateway, S: Surface> {
    gateway: G,
    surface: S,
    state: AppState,
    navigator: Navigator,
    exporter: TimetableExporter,
    phase: WorkflowPhase,
}

async fn fetch<G: Gateway>(gateway: &G, resource: Resource) -> Result<Collection> {
    let text = gateway.call(resource.endpoint(), Method::GET, None).await?;
    Collection::parse(resource, &text)
}

impl<G: Gateway, S: Surface> Controller<G, S> {
    pub fn new(gateway: G, surface: S) -> Self {
        Self {
            gateway,
            surface,
            state: AppState::new(),
            navigator: Navigator::default(),
            exporter: TimetableExporter::default(),
            phase: WorkflowPhase::Idle,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn phase(&self) -> WorkflowPhase {
        self.phase
    }

    pub fn active_section(&self) -> Section {
        self.navigator.active()
    }

    /// Switch to the section of the control that was triggered.
    pub fn show_section(&mut self, trigger: Section) {
        let section = self.navigator.show_section(trigger);
        self.surface.show_section(section);
    }

    /// Load all five stores concurrently, then prime the dropdowns.
    ///
    /// All or nothing: if any fetch fails, no store is replaced, the
    /// dropdowns are left alone and [`Error::Startup`] lists the failures.
    pub async fn start(&mut self) -> Result<()> {
        let gateway = &self.gateway;
        let (courses, lecturers, rooms, time_slots, timetable) = tokio::join!(
            fetch(gateway, Resource::Courses),
            fetch(gateway, Resource::Lecturers),
            fetch(gateway, Resource::Rooms),
            fetch(gateway, Resource::TimeSlots),
            fetch(gateway, Resource::Timetable),
        );

        let mut loaded = Vec::with_capacity(Resource::ALL.len());
        let mut failed = Vec::new();
        for (resource, result) in Resource::ALL
            .into_iter()
            .zip([courses, lecturers, rooms, time_slots, timetable])
        {
            match result {
                Ok(collection) => loaded.push(collection),
                Err(err) => {
                    self.report_load_failure(resource, &err);
                    failed.push(resource);
                }
            }
        }

        if !failed.is_empty() {
            tracing::warn!(
                "Startup load rejected ({} of {} collections failed); keeping previous state",
                failed.len(),
                Resource::ALL.len()
            );
            return Err(Error::Startup { failed });
        }

        for collection in loaded {
            let resource = collection.resource();
            self.state.apply(collection);
            self.render(resource);
        }
        self.refresh_dropdowns();
        self.surface.show_section(self.navigator.active());

        Ok(())
    }

    /// Fetch one collection and replace its store.
    pub async fn reload(&mut self, resource: Resource) -> Result<()> {
        let text = self.request(resource.endpoint(), Method::GET, None).await?;

        match Collection::parse(resource, &text) {
            Ok(collection) => {
                self.state.apply(collection);
                self.render(resource);
                Ok(())
            }
            Err(err) => {
                tracing::error!("Failed to load {}: {}", resource, err);
                Err(err)
            }
        }
    }

    pub async fn add_course(&mut self, form: &mut CourseForm) -> WorkflowOutcome {
        self.submit(form).await
    }

    pub async fn add_lecturer(&mut self, form: &mut LecturerForm) -> WorkflowOutcome {
        self.submit(form).await
    }

    pub async fn add_room(&mut self, form: &mut RoomForm) -> WorkflowOutcome {
        self.submit(form).await
    }

    pub async fn add_time_slot(&mut self, form: &mut TimeSlotForm) -> WorkflowOutcome {
        self.submit(form).await
    }

    pub async fn add_timetable_entry(&mut self, form: &mut TimetableEntryForm) -> WorkflowOutcome {
        self.submit(form).await
    }

    /// Run the submit, refresh and cascade cycle for one form.
    ///
    /// On failure nothing is mutated and the form keeps its input.
    pub async fn submit<F: Form>(&mut self, form: &mut F) -> WorkflowOutcome {
        let resource = F::RESOURCE;

        let body = match form
            .to_payload()
            .and_then(|payload| Ok(serde_json::to_value(payload)?))
        {
            Ok(body) => body,
            Err(err) => {
                tracing::warn!("Rejected {} form: {}", resource, err);
                self.notify(Notification::error(err.to_string()));
                self.notify(Notification::error(F::FAILURE_MESSAGE));
                return WorkflowOutcome::Failure;
            }
        };

        self.phase = WorkflowPhase::Submitting(resource);
        let outcome = match self
            .request(resource.endpoint(), Method::POST, Some(&body))
            .await
        {
            Ok(_) => {
                self.notify(Notification::success(format!(
                    "{} added successfully!",
                    F::ENTITY
                )));
                form.reset();

                // Already logged and surfaced; the create itself succeeded.
                if let Err(err) = self.reload(resource).await {
                    tracing::debug!("Refresh after adding to {} failed: {}", resource, err);
                }

                if resource != Resource::Timetable {
                    self.refresh_dropdowns();
                }
                WorkflowOutcome::Success
            }
            Err(_) => {
                self.notify(Notification::error(F::FAILURE_MESSAGE));
                WorkflowOutcome::Failure
            }
        };
        self.phase = WorkflowPhase::Idle;

        outcome
    }

    /// Encode the timetable store for download.
    pub fn export(&mut self, format: ExportFormat) -> Result<ExportFile> {
        let entries = self.state.timetable.snapshot();

        match self.exporter.export(format, &entries) {
            Ok(file) => {
                tracing::info!("Exported {} entries to {}", entries.len(), file.file_name);
                self.notify(Notification::success(format!(
                    "Timetable exported as {} successfully!",
                    format
                )));
                Ok(file)
            }
            Err(err @ Error::EmptyTimetable) => {
                self.notify(Notification::error(err.to_string()));
                Err(err)
            }
            Err(err) => {
                tracing::error!("Export failed: {}", err);
                self.notify(Notification::error(format!(
                    "Failed to export timetable: {}",
                    err
                )));
                Err(err)
            }
        }
    }

    pub fn dropdowns(&self) -> TimetableDropdowns {
        view::timetable_dropdowns(
            self.state.courses.items(),
            self.state.lecturers.items(),
            self.state.rooms.items(),
            self.state.time_slots.items(),
        )
    }

    /// Rebuild the four entry-form selection controls from the stores.
    pub fn refresh_dropdowns(&mut self) {
        let dropdowns = self.dropdowns();
        self.surface.show_dropdowns(&dropdowns);
    }

    fn render(&mut self, resource: Resource) {
        match resource {
            Resource::Courses => self.surface.show_list(
                ListKind::Courses,
                &view::course_cards(self.state.courses.items()),
            ),
            Resource::Lecturers => self.surface.show_list(
                ListKind::Lecturers,
                &view::lecturer_cards(self.state.lecturers.items()),
            ),
            Resource::Rooms => self
                .surface
                .show_list(ListKind::Rooms, &view::room_cards(self.state.rooms.items())),
            Resource::TimeSlots => self.surface.show_list(
                ListKind::TimeSlots,
                &view::time_slot_cards(self.state.time_slots.items()),
            ),
            Resource::Timetable => self
                .surface
                .show_grid(&view::weekly_grid(self.state.timetable.items())),
        }
    }

    /// Every gateway call goes through here: failures are logged and
    /// surfaced once, then handed back to the workflow.
    async fn request(
        &mut self,
        endpoint: &str,
        method: Method,
        payload: Option<&Value>,
    ) -> Result<String> {
        match self.gateway.call(endpoint, method, payload).await {
            Ok(text) => Ok(text),
            Err(err) => {
                self.report_gateway_failure(&err);
                Err(err)
            }
        }
    }

    fn report_gateway_failure(&mut self, err: &Error) {
        tracing::error!("API call failed: {}", err);
        let message = format!(
            "Failed to connect to backend server. Make sure it's running at {}.",
            self.gateway.base_url()
        );
        self.notify(Notification::error(message));
    }

    fn report_load_failure(&mut self, resource: Resource, err: &Error) {
        match err {
            Error::Parse(_) => tracing::error!("Failed to load {}: {}", resource, err),
            _ => self.report_gateway_failure(err),
        }
    }

    fn notify(&mut self, notification: Notification) {
        tracing::debug!("notify {:?}: {}", notification.kind, notification.message);
        self.surface.notify(&notification);
    }
}

#[cfg(test)]
mod tests;
