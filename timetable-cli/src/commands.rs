use std::path::PathBuf;

use anyhow::{Context, Result};
use timetable_core::prelude::*;

use crate::surface::TerminalSurface;

type App = Controller<HttpGateway, TerminalSurface>;

/// Build the controller and run the startup load, like opening the page.
async fn open(config: ClientConfig) -> Result<App> {
    tracing::info!("Connecting to {}", config.base_url);
    let gateway = HttpGateway::new(config)?;
    let mut app = Controller::new(gateway, TerminalSurface::new());

    app.start()
        .await
        .context("Could not load timetable data from the backend")?;

    Ok(app)
}

fn finish(app: &mut App, section: Section, outcome: WorkflowOutcome) -> Result<()> {
    app.show_section(section);
    app.surface().present();

    match outcome {
        WorkflowOutcome::Success => Ok(()),
        WorkflowOutcome::Failure => anyhow::bail!("Submission was not accepted"),
    }
}

/// Show one section of the client.
pub async fn show_command(config: ClientConfig, section: Section) -> Result<()> {
    let mut app = open(config).await?;
    app.show_section(section);
    app.surface().present();
    Ok(())
}

pub async fn add_course_command(config: ClientConfig, mut form: CourseForm) -> Result<()> {
    let mut app = open(config).await?;
    let outcome = app.add_course(&mut form).await;
    finish(&mut app, Section::Courses, outcome)
}

pub async fn add_lecturer_command(config: ClientConfig, mut form: LecturerForm) -> Result<()> {
    let mut app = open(config).await?;
    let outcome = app.add_lecturer(&mut form).await;
    finish(&mut app, Section::Lecturers, outcome)
}

pub async fn add_room_command(config: ClientConfig, mut form: RoomForm) -> Result<()> {
    let mut app = open(config).await?;
    let outcome = app.add_room(&mut form).await;
    finish(&mut app, Section::Rooms, outcome)
}

pub async fn add_time_slot_command(config: ClientConfig, mut form: TimeSlotForm) -> Result<()> {
    let mut app = open(config).await?;
    let outcome = app.add_time_slot(&mut form).await;
    finish(&mut app, Section::TimeSlots, outcome)
}

pub async fn add_entry_command(config: ClientConfig, mut form: TimetableEntryForm) -> Result<()> {
    let mut app = open(config).await?;
    let outcome = app.add_timetable_entry(&mut form).await;
    finish(&mut app, Section::Timetable, outcome)
}

/// Export the timetable into `output_dir`.
pub async fn export_command(
    config: ClientConfig,
    format: ExportFormat,
    output_dir: Option<PathBuf>,
) -> Result<()> {
    let mut app = open(config).await?;
    let file = app.export(format)?;

    let dir = output_dir.unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;
    let path = dir.join(file.file_name);
    std::fs::write(&path, &file.contents)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!("✓ {} ({}) saved to: {}", file.file_name, file.mime_type, path.display());
    Ok(())
}
