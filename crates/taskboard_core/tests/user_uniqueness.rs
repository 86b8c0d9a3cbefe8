use taskboard_core::{
    Catalog, EntityStore, ErrorKind, MemoryCatalog, Project, ServiceError, SqliteCatalog,
    TaskStore, User, UserInput, ValidationError,
};

fn duplicate_email_conflicts_until_released<P, T, U>(catalog: &Catalog<P, T, U>)
where
    P: EntityStore<Project>,
    T: TaskStore,
    U: EntityStore<User>,
{
    let first = catalog
        .users()
        .create(UserInput::new("Ana", "a@b.com"))
        .unwrap();

    let err = catalog
        .users()
        .create(UserInput::new("Bea", "a@b.com"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert!(matches!(err, ServiceError::Conflict { field: "email", .. }));
    assert_eq!(catalog.users().count().unwrap(), 1);

    catalog
        .users()
        .update(first.id, UserInput::new("Ana", "ana@b.com"))
        .unwrap();
    let second = catalog
        .users()
        .create(UserInput::new("Bea", "a@b.com"))
        .unwrap();
    assert_eq!(second.id, 2);
}

fn user_keeps_own_email_on_update<P, T, U>(catalog: &Catalog<P, T, U>)
where
    P: EntityStore<Project>,
    T: TaskStore,
    U: EntityStore<User>,
{
    let ana = catalog
        .users()
        .create(UserInput::new("Ana", "a@b.com"))
        .unwrap();
    let bea = catalog
        .users()
        .create(UserInput::new("Bea", "b@b.com"))
        .unwrap();

    let renamed = catalog
        .users()
        .update(ana.id, UserInput::new("Ana Maria", "a@b.com").active(false))
        .unwrap();
    assert_eq!(renamed.id, ana.id);
    assert!(!renamed.active);

    let err = catalog
        .users()
        .update(bea.id, UserInput::new("Bea", "a@b.com"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert_eq!(catalog.users().get(bea.id).unwrap(), bea);
}

fn emails_differing_only_in_case_are_distinct<P, T, U>(catalog: &Catalog<P, T, U>)
where
    P: EntityStore<Project>,
    T: TaskStore,
    U: EntityStore<User>,
{
    let lower = catalog
        .users()
        .create(UserInput::new("Ana", "a@b.com"))
        .unwrap();
    let upper = catalog
        .users()
        .create(UserInput::new("Ana Upper", "A@B.com"))
        .unwrap();
    assert_ne!(lower.id, upper.id);
    assert_eq!(catalog.users().get(upper.id).unwrap().email, "A@B.com");

    let err = catalog
        .users()
        .update(lower.id, UserInput::new("Ana", "A@B.com"))
        .unwrap_err();
    assert!(matches!(err, ServiceError::Conflict { field: "email", ref value } if value == "A@B.com"));
    assert_eq!(catalog.users().count().unwrap(), 2);
}

fn invalid_users_are_rejected<P, T, U>(catalog: &Catalog<P, T, U>)
where
    P: EntityStore<Project>,
    T: TaskStore,
    U: EntityStore<User>,
{
    let err = catalog
        .users()
        .create(UserInput::new("No At", "nobody.example.com"))
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Validation(ValidationError::InvalidEmail)
    ));

    let err = catalog
        .users()
        .create(UserInput::new(" ", "x@y.z"))
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Validation(ValidationError::Blank { field: "name" })
    ));

    let err = catalog.users().create(UserInput::new("Empty", "")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ValidationFailed);
    assert_eq!(catalog.users().count().unwrap(), 0);

    let err = catalog
        .users()
        .update(3, UserInput::new("Ghost", "g@h.i"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(catalog.users().delete(3).unwrap_err().kind(), ErrorKind::NotFound);
}

fn active_filter_and_delete<P, T, U>(catalog: &Catalog<P, T, U>)
where
    P: EntityStore<Project>,
    T: TaskStore,
    U: EntityStore<User>,
{
    for (name, email, active) in [
        ("Juan", "juan@ejemplo.com", true),
        ("Maria", "maria@ejemplo.com", true),
        ("Carlos", "carlos@ejemplo.com", false),
    ] {
        catalog
            .users()
            .create(UserInput::new(name, email).active(active))
            .unwrap();
    }

    let inactive = catalog.users().list_by_active(false).unwrap();
    assert_eq!(inactive.len(), 1);
    assert_eq!(inactive[0].email, "carlos@ejemplo.com");
    assert_eq!(catalog.users().list_by_active(true).unwrap().len(), 2);

    catalog.users().delete(1).unwrap();
    let reused = catalog
        .users()
        .create(UserInput::new("Juan Again", "juan@ejemplo.com"))
        .unwrap();
    assert_eq!(reused.id, 4);
    assert_eq!(
        catalog
            .users()
            .list()
            .unwrap()
            .iter()
            .map(|u| u.id)
            .collect::<Vec<_>>(),
        vec![2, 3, 4]
    );
}

#[test]
fn memory_duplicate_email_conflicts_until_released() {
    duplicate_email_conflicts_until_released(&MemoryCatalog::in_memory());
}

#[test]
fn sqlite_duplicate_email_conflicts_until_released() {
    duplicate_email_conflicts_until_released(&SqliteCatalog::open_in_memory().unwrap());
}

#[test]
fn memory_user_keeps_own_email_on_update() {
    user_keeps_own_email_on_update(&MemoryCatalog::in_memory());
}

#[test]
fn sqlite_user_keeps_own_email_on_update() {
    user_keeps_own_email_on_update(&SqliteCatalog::open_in_memory().unwrap());
}

#[test]
fn memory_emails_differing_only_in_case_are_distinct() {
    emails_differing_only_in_case_are_distinct(&MemoryCatalog::in_memory());
}

#[test]
fn sqlite_emails_differing_only_in_case_are_distinct() {
    emails_differing_only_in_case_are_distinct(&SqliteCatalog::open_in_memory().unwrap());
}

#[test]
fn memory_invalid_users_are_rejected() {
    invalid_users_are_rejected(&MemoryCatalog::in_memory());
}

#[test]
fn sqlite_invalid_users_are_rejected() {
    invalid_users_are_rejected(&SqliteCatalog::open_in_memory().unwrap());
}

#[test]
fn memory_active_filter_and_delete() {
    active_filter_and_delete(&MemoryCatalog::in_memory());
}

#[test]
fn sqlite_active_filter_and_delete() {
    active_filter_and_delete(&SqliteCatalog::open_in_memory().unwrap());
}
