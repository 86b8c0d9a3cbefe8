use serde_json::json;
use taskboard_core::{
    CoreConfig, EntityKind, ProjectInput, StorageConfig, Task, TaskInput, UserInput,
};

#[test]
fn task_serializes_with_optional_fields_as_null() {
    let task = Task::from_input(TaskInput::new("Ship it").in_project(3), 42);
    let value = serde_json::to_value(&task).unwrap();
    assert_eq!(
        value,
        json!({
            "id": 0,
            "title": "Ship it",
            "completed": false,
            "starts_at": null,
            "due_at": null,
            "project_id": 3,
            "created_at": 42,
            "updated_at": null,
        })
    );
}

#[test]
fn inputs_fill_defaults_for_missing_fields() {
    let task: TaskInput = serde_json::from_value(json!({ "title": "minimal" })).unwrap();
    assert_eq!(task, TaskInput::new("minimal"));

    let user: UserInput =
        serde_json::from_value(json!({ "name": "Ana", "email": "a@b.com" })).unwrap();
    assert!(user.active);

    let project: ProjectInput = serde_json::from_value(json!({ "name": "Home" })).unwrap();
    assert_eq!(project, ProjectInput::new("Home"));
}

#[test]
fn inputs_without_required_fields_do_not_deserialize() {
    assert!(serde_json::from_value::<TaskInput>(json!({ "completed": true })).is_err());
    assert!(serde_json::from_value::<UserInput>(json!({ "name": "No Email" })).is_err());
}

#[test]
fn kinds_and_storage_use_snake_case_tags() {
    assert_eq!(serde_json::to_value(EntityKind::Project).unwrap(), json!("project"));

    let config = CoreConfig {
        log_level: "info".to_string(),
        log_dir: None,
        storage: StorageConfig::Sqlite {
            path: "/tmp/taskboard.db".into(),
        },
    };
    let value = serde_json::to_value(&config).unwrap();
    assert_eq!(value["storage"], json!({ "kind": "sqlite", "path": "/tmp/taskboard.db" }));

    let parsed: CoreConfig = serde_json::from_value(json!({ "log_level": "warn" })).unwrap();
    assert_eq!(parsed.storage, StorageConfig::Memory);
    assert_eq!(parsed.log_dir, None);
}
