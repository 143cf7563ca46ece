use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "coursedesk")]
#[command(version, about = "Manage course types, courses, offerings and student registrations")]
pub struct Cli {
    /// Config file (defaults to <config dir>/coursedesk/config.toml).
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
    /// SQLite database holding the catalog slots.
    #[arg(long, global = true, value_name = "PATH")]
    pub db: Option<PathBuf>,
    /// Absolute directory for rotating log files.
    #[arg(long, global = true, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,
    #[arg(long, global = true, value_name = "LEVEL")]
    pub log_level: Option<String>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Course types such as "Individual" or "Group".
    Types {
        #[command(subcommand)]
        command: Option<NameCommands>,
    },
    /// Courses such as "Maths" or "Hindi".
    Courses {
        #[command(subcommand)]
        command: Option<NameCommands>,
    },
    /// Course type + course combinations students can register for.
    Offerings {
        #[command(subcommand)]
        command: Option<OfferingCommands>,
    },
    /// Student registrations.
    Students {
        #[command(subcommand)]
        command: Option<StudentCommands>,
    },
    /// Collection sizes and readiness.
    Status,
}

#[derive(Debug, Subcommand)]
pub enum NameCommands {
    List,
    Add {
        name: String,
    },
    Rename {
        current: String,
        #[arg(value_name = "NEW_NAME")]
        new_name: String,
    },
    Remove {
        name: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum OfferingCommands {
    List {
        #[arg(long = "type", value_name = "COURSE_TYPE")]
        course_type: Option<String>,
    },
    Create {
        #[arg(value_name = "COURSE_TYPE")]
        course_type: String,
        course: String,
    },
    Update {
        id: String,
        #[arg(value_name = "COURSE_TYPE")]
        course_type: String,
        course: String,
    },
    Remove {
        id: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum StudentCommands {
    List {
        #[arg(long = "type", value_name = "COURSE_TYPE")]
        course_type: Option<String>,
        #[arg(long, value_name = "OFFERING_ID", conflicts_with = "course_type")]
        offering: Option<String>,
    },
    Register {
        student: String,
        #[arg(value_name = "OFFERING_ID")]
        offering: String,
    },
    Unregister {
        id: String,
    },
}
