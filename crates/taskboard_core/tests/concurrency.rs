use std::thread;
use taskboard_core::{
    Catalog, EntityStore, MemoryCatalog, Project, ProjectInput, ServiceError, SqliteCatalog,
    TaskInput, TaskStore, User, UserInput,
};

const WRITERS: usize = 4;
const TASKS_PER_WRITER: usize = 25;

fn assert_no_dangling_references<P, T, U>(catalog: &Catalog<P, T, U>)
where
    P: EntityStore<Project>,
    T: TaskStore,
    U: EntityStore<User>,
{
    let snapshot = catalog.snapshot().unwrap();
    for task in &snapshot.tasks {
        if let Some(parent) = task.project_id {
            assert!(
                snapshot.projects.iter().any(|p| p.id == parent),
                "task {} references missing project {parent}",
                task.id
            );
        }
    }
}

fn writers_race_project_delete<P, T, U>(catalog: &Catalog<P, T, U>)
where
    P: EntityStore<Project>,
    T: TaskStore,
    U: EntityStore<User>,
{
    let project_id = catalog
        .projects()
        .create(ProjectInput::new("busy"))
        .unwrap()
        .id;

    let rejected = thread::scope(|scope| {
        let writers: Vec<_> = (0..WRITERS)
            .map(|writer| {
                scope.spawn(move || {
                    let mut rejected: usize = 0;
                    for index in 0..TASKS_PER_WRITER {
                        let input =
                            TaskInput::new(format!("w{writer}-{index}")).in_project(project_id);
                        match catalog.tasks().create(input) {
                            Ok(_) => {}
                            Err(ServiceError::ParentNotFound(id)) => {
                                assert_eq!(id, project_id);
                                rejected += 1;
                            }
                            Err(other) => panic!("unexpected error: {other}"),
                        }
                    }
                    rejected
                })
            })
            .collect();

        let observer = scope.spawn(|| {
            for _ in 0..20 {
                assert_no_dangling_references(catalog);
            }
        });

        scope.spawn(|| {
            thread::yield_now();
            catalog.projects().delete(project_id).unwrap();
        });

        observer.join().unwrap();
        writers
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .sum::<usize>()
    });

    assert_no_dangling_references(catalog);
    let tasks = catalog.tasks().list().unwrap();
    assert_eq!(tasks.len() + rejected, WRITERS * TASKS_PER_WRITER);
    assert!(tasks.iter().all(|task| task.project_id.is_none()));
}

fn concurrent_duplicate_emails_admit_one<P, T, U>(catalog: &Catalog<P, T, U>)
where
    P: EntityStore<Project>,
    T: TaskStore,
    U: EntityStore<User>,
{
    let outcomes: Vec<bool> = thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|n| {
                scope.spawn(move || {
                    catalog
                        .users()
                        .create(UserInput::new(format!("user {n}"), "same@example.com"))
                        .is_ok()
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect()
    });

    assert_eq!(outcomes.iter().filter(|ok| **ok).count(), 1);
    assert_eq!(catalog.users().count().unwrap(), 1);
}

#[test]
fn memory_writers_race_project_delete() {
    writers_race_project_delete(&MemoryCatalog::in_memory());
}

#[test]
fn sqlite_writers_race_project_delete() {
    writers_race_project_delete(&SqliteCatalog::open_in_memory().unwrap());
}

#[test]
fn memory_concurrent_duplicate_emails_admit_one() {
    concurrent_duplicate_emails_admit_one(&MemoryCatalog::in_memory());
}

#[test]
fn sqlite_concurrent_duplicate_emails_admit_one() {
    concurrent_duplicate_emails_admit_one(&SqliteCatalog::open_in_memory().unwrap());
}

#[test]
fn task_ids_stay_unique_under_parallel_creates() {
    let catalog = MemoryCatalog::in_memory();
    thread::scope(|scope| {
        for writer in 0..WRITERS {
            let catalog = &catalog;
            scope.spawn(move || {
                for index in 0..TASKS_PER_WRITER {
                    catalog
                        .tasks()
                        .create(TaskInput::new(format!("{writer}:{index}")))
                        .unwrap();
                }
            });
        }
    });

    let ids: Vec<_> = catalog
        .tasks()
        .list()
        .unwrap()
        .into_iter()
        .map(|t| t.id)
        .collect();
    let expected: Vec<u64> = (1..=(WRITERS * TASKS_PER_WRITER) as u64).collect();
    assert_eq!(ids, expected);
}
