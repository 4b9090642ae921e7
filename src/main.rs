//! Taskweave CLI - task graph planning with kanban and mind-map views.

use clap::Parser;
use std::process;
use taskweave::cli::{Cli, Commands, ProjectCommands, TaskCommands};
use taskweave::commands::{self, Output};
use taskweave::config::Config;
use taskweave::storage;

fn main() {
    init_tracing();

    let cli = Cli::parse();
    let human = cli.human_readable;

    match run(cli) {
        Ok(output) => println!("{}", output.render(human)),
        Err(e) => {
            if human {
                eprintln!("Error: {}", e);
            } else {
                eprintln!(r#"{{"error": "{}"}}"#, e);
            }
            process::exit(1);
        }
    }
}

/// Diagnostics go to stderr so stdout stays valid JSON.
fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> taskweave::Result<Output> {
    let data_dir = match cli.data_dir {
        Some(dir) => dir,
        None => storage::resolve_data_dir()?,
    };
    let config = Config::load()?;

    match cli.command {
        Commands::Init => commands::init(&data_dir),
        Commands::Project { command } => match command {
            ProjectCommands::Create { name } => commands::project_create(&data_dir, &name),
            ProjectCommands::List => commands::project_list(&data_dir),
        },
        Commands::Generate { project_id, input } => {
            commands::generate(&data_dir, &config, &project_id, &input)
        }
        Commands::Task { command } => match command {
            TaskCommands::List { project_id } => commands::task_list(&data_dir, &project_id),
            TaskCommands::Execute {
                project_id,
                task_id,
            } => commands::task_execute(&data_dir, &config, &project_id, &task_id),
        },
        Commands::Ready { project_id } => commands::ready(&data_dir, &project_id),
        Commands::Blocked { project_id } => commands::blocked(&data_dir, &project_id),
        Commands::Board { project_id } => commands::board(&data_dir, &project_id),
        Commands::Map {
            project_id,
            width,
            height,
        } => commands::map(&data_dir, &config, &project_id, width, height),
        Commands::Sequence { project_id } => commands::sequence(&data_dir, &config, &project_id),
        Commands::Doctor { project_id } => commands::doctor(&data_dir, &project_id),
    }
}
