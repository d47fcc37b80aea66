mod commands;
mod surface;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use timetable_core::{
    ClientConfig,
    export::ExportFormat,
    forms::{CourseForm, LecturerForm, RoomForm, TimeSlotForm, TimetableEntryForm},
    navigation::Section,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "timetable")]
#[command(about = "University timetable client")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Backend base URL (overrides TIMETABLE_API_BASE_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a section: courses, lecturers, rooms, timeslots or timetable
    Show {
        #[arg(default_value = "timetable")]
        section: Section,
    },

    /// Add a record through the backend
    Add {
        #[command(subcommand)]
        entity: AddCommands,
    },

    /// Export the timetable as a text report or CSV
    Export {
        /// Output format (text, csv)
        #[arg(short, long)]
        format: ExportFormat,

        /// Directory to write the file into
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum AddCommands {
    /// Add a course
    Course {
        #[arg(long)]
        code: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        credits: String,
    },

    /// Add a lecturer
    Lecturer {
        #[arg(long)]
        id: String,
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        department: String,
    },

    /// Add a room
    Room {
        #[arg(long)]
        name: String,
        #[arg(long)]
        capacity: String,
        /// Room type, e.g. Lab
        #[arg(long = "type", default_value = "")]
        room_type: String,
    },

    /// Add a time slot
    Timeslot {
        #[arg(long)]
        id: String,
        /// Monday to Friday
        #[arg(long)]
        day: String,
        /// Start time (HH:MM)
        #[arg(long)]
        start: String,
        /// End time (HH:MM)
        #[arg(long)]
        end: String,
    },

    /// Schedule a course in a room and time slot
    Entry {
        #[arg(long)]
        id: String,
        /// Course code
        #[arg(long)]
        course: String,
        /// Lecturer id
        #[arg(long)]
        lecturer: String,
        /// Room name
        #[arg(long)]
        room: String,
        /// Time slot id
        #[arg(long)]
        timeslot: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Log level
    let log_level = if cli.verbose { "debug" } else { "info" };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("timetable_cli={0},timetable_core={0}", log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = ClientConfig::from_env()?;
    if let Some(url) = cli.base_url {
        config = config.with_base_url(url)?;
    }

    match cli.command {
        Commands::Show { section } => commands::show_command(config, section).await,

        Commands::Add { entity } => match entity {
            AddCommands::Course {
                code,
                name,
                credits,
            } => {
                commands::add_course_command(
                    config,
                    CourseForm {
                        code,
                        name,
                        credits,
                    },
                )
                .await
            }
            AddCommands::Lecturer {
                id,
                name,
                department,
            } => {
                commands::add_lecturer_command(
                    config,
                    LecturerForm {
                        id,
                        name,
                        department,
                    },
                )
                .await
            }
            AddCommands::Room {
                name,
                capacity,
                room_type,
            } => {
                commands::add_room_command(
                    config,
                    RoomForm {
                        name,
                        capacity,
                        room_type,
                    },
                )
                .await
            }
            AddCommands::Timeslot {
                id,
                day,
                start,
                end,
            } => {
                commands::add_time_slot_command(
                    config,
                    TimeSlotForm {
                        id,
                        day,
                        start_time: start,
                        end_time: end,
                    },
                )
                .await
            }
            AddCommands::Entry {
                id,
                course,
                lecturer,
                room,
                timeslot,
            } => {
                commands::add_entry_command(
                    config,
                    TimetableEntryForm {
                        id,
                        course_code: course,
                        lecturer_id: lecturer,
                        room_name: room,
                        time_slot_id: timeslot,
                    },
                )
                .await
            }
        },

        Commands::Export { format, output } => {
            commands::export_command(config, format, output).await
        }
    }
}
