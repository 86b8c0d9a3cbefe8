//! CLI smoke entry point.
//!
//! # Responsibility
//! - Wire `taskboard_core` from `TASKBOARD_*` environment configuration.
//! - Seed a catalog, run the project delete walkthrough and print the result.

use log::{error, info};
use std::process::ExitCode;
use taskboard_core::{
    init_from_config, seed_sample_data, Catalog, CoreConfig, EntityStore, MemoryCatalog,
    Project, ProjectInput, SqliteCatalog, StorageConfig, TaskInput, TaskStore, User,
};

fn main() -> ExitCode {
    let config = CoreConfig::from_env();
    if let Err(err) = init_from_config(&config) {
        eprintln!("taskboard: logging disabled: {err}");
    }

    println!("taskboard_core ping={}", taskboard_core::ping());
    println!("taskboard_core version={}", taskboard_core::core_version());

    let outcome = match &config.storage {
        StorageConfig::Memory => run(&MemoryCatalog::in_memory()),
        StorageConfig::Sqlite { path } => match SqliteCatalog::open(path) {
            Ok(catalog) => run(&catalog),
            Err(err) => Err(err.to_string()),
        },
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            error!("event=cli_run module=cli status=error error={message}");
            eprintln!("taskboard: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run<P, T, U>(catalog: &Catalog<P, T, U>) -> Result<(), String>
where
    P: EntityStore<Project>,
    T: TaskStore,
    U: EntityStore<User>,
{
    let report = seed_sample_data(catalog).map_err(|err| err.to_string())?;
    if report.is_empty() {
        println!("seed skipped: catalog already has data");
    } else {
        println!(
            "seeded projects={} tasks={} users={}",
            report.projects.len(),
            report.tasks.len(),
            report.users.len()
        );
    }

    let project = catalog
        .projects()
        .create(ProjectInput::new("P1"))
        .map_err(|err| err.to_string())?;
    let task = catalog
        .tasks()
        .create(TaskInput::new("T1").in_project(project.id))
        .map_err(|err| err.to_string())?;
    let detached = catalog
        .projects()
        .delete(project.id)
        .map_err(|err| err.to_string())?;
    let reloaded = catalog.tasks().get(task.id).map_err(|err| err.to_string())?;

    println!(
        "deleted project id={} detached={:?} task id={} title={} project_id={:?}",
        project.id, detached, reloaded.id, reloaded.title, reloaded.project_id
    );
    info!(
        "event=cli_run module=cli status=ok tasks={}",
        catalog.tasks().count().map_err(|err| err.to_string())?
    );
    Ok(())
}
