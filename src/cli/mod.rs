//! CLI argument definitions for taskweave.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Taskweave - turn a project description into a dependency-ordered task
/// graph.
///
/// Start with `tw init`, create a project, then `tw generate` to plan it
/// and `tw ready` to find work.
#[derive(Parser, Debug)]
#[command(name = "tw")]
#[command(author, version, about = "Task graph planning with kanban and mind-map views", long_about = None)]
pub struct Cli {
    /// Output in human-readable format instead of JSON
    #[arg(short = 'H', long = "human", global = true)]
    pub human_readable: bool,

    /// Data directory override. Can also be set via TW_DATA_DIR.
    #[arg(long = "data-dir", global = true, env = "TW_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize taskweave storage
    Init,

    /// Project management commands
    Project {
        #[command(subcommand)]
        command: ProjectCommands,
    },

    /// Generate tasks for a project from a free-text description
    Generate {
        /// Project ID
        project_id: String,
        /// What to build, in plain words
        input: String,
    },

    /// Task commands
    Task {
        #[command(subcommand)]
        command: TaskCommands,
    },

    /// Show tasks ready to work on (no incomplete dependencies)
    Ready {
        /// Project ID
        project_id: String,
    },

    /// Show tasks waiting on dependencies
    Blocked {
        /// Project ID
        project_id: String,
    },

    /// Show the dependency-aware kanban board
    Board {
        /// Project ID
        project_id: String,
    },

    /// Show the positioned mind-map snapshot
    Map {
        /// Project ID
        project_id: String,

        /// Canvas width in pixels
        #[arg(long, default_value_t = 1200.0)]
        width: f64,

        /// Canvas height in pixels
        #[arg(long, default_value_t = 800.0)]
        height: f64,
    },

    /// Plan the execution animation toward the first ready task
    Sequence {
        /// Project ID
        project_id: String,
    },

    /// Dependency health check: dangling references and cycles
    Doctor {
        /// Project ID
        project_id: String,
    },
}

/// Project subcommands
#[derive(Subcommand, Debug)]
pub enum ProjectCommands {
    /// Create a new project
    Create {
        /// Project name
        name: String,
    },

    /// List all projects
    List,
}

/// Task subcommands
#[derive(Subcommand, Debug)]
pub enum TaskCommands {
    /// List a project's tasks with derived statuses
    List {
        /// Project ID
        project_id: String,
    },

    /// Dispatch a task to the execution backend
    Execute {
        /// Project ID
        project_id: String,
        /// Task ID
        task_id: String,
    },
}
