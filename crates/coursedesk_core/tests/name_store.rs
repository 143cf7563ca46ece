use coursedesk_core::{
    CatalogError, EntityKind, ErrorCategory, KeyValueStore, MemoryKeyValueStore, NameKind,
    NameStore, OfferingStore, RenamePolicy, StorePolicy, ValidationError,
};

fn types(kv: &MemoryKeyValueStore) -> NameStore<'_, MemoryKeyValueStore> {
    NameStore::course_types(kv, StorePolicy::default())
}

#[test]
fn add_trims_and_appends_in_order() {
    let kv = MemoryKeyValueStore::new();
    let mut store = types(&kv);

    assert_eq!(store.add("  Individual ").unwrap(), "Individual");
    store.add("Group").unwrap();

    assert_eq!(store.list(), ["Individual", "Group"]);
    assert_eq!(
        kv.load("courseTypes").unwrap().as_deref(),
        Some(r#"["Individual","Group"]"#)
    );
}

#[test]
fn add_rejects_blank_names() {
    let kv = MemoryKeyValueStore::new();
    let mut store = NameStore::courses(&kv, StorePolicy::default());

    let err = store.add("   ").unwrap_err();
    assert_eq!(
        err,
        CatalogError::Validation(ValidationError::EmptyName(NameKind::Course))
    );
    assert!(store.is_empty());
    assert!(kv.load("courses").unwrap().is_none());
}

#[test]
fn add_rejects_case_insensitive_duplicates_without_mutating() {
    let kv = MemoryKeyValueStore::new();
    let mut store = types(&kv);
    store.add("Group").unwrap();

    let err = store.add(" gROUP ").unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Duplicate);
    assert_eq!(store.list(), ["Group"]);
}

#[test]
fn rename_keeps_position_and_persists() {
    let kv = MemoryKeyValueStore::new();
    let mut store = types(&kv);
    store.add("Individual").unwrap();
    store.add("Group").unwrap();
    store.add("Online").unwrap();

    let change = store.rename("group", "Small Group").unwrap();
    assert_eq!(change.previous, "Group");
    assert_eq!(change.current, "Small Group");
    assert_eq!(store.list(), ["Individual", "Small Group", "Online"]);

    let reopened = types(&kv);
    assert_eq!(reopened.list(), store.list());
}

#[test]
fn rename_onto_itself_or_case_change_is_allowed() {
    let kv = MemoryKeyValueStore::new();
    let mut store = types(&kv);
    store.add("group").unwrap();

    store.rename("group", "group").unwrap();
    store.rename("group", "Group").unwrap();
    assert_eq!(store.list(), ["Group"]);
}

#[test]
fn rename_collision_is_rejected_by_default() {
    let kv = MemoryKeyValueStore::new();
    let mut store = types(&kv);
    store.add("Individual").unwrap();
    store.add("Group").unwrap();

    let err = store.rename("Group", "INDIVIDUAL").unwrap_err();
    assert!(matches!(err, CatalogError::DuplicateName { kind: NameKind::CourseType, .. }));
    assert_eq!(store.list(), ["Individual", "Group"]);
}

#[test]
fn rename_collision_is_allowed_under_permissive_policy() {
    let kv = MemoryKeyValueStore::new();
    let policy = StorePolicy {
        renames: RenamePolicy::AllowCollisions,
        ..StorePolicy::default()
    };
    let mut store = NameStore::course_types(&kv, policy);
    store.add("Individual").unwrap();
    store.add("Group").unwrap();

    store.rename("Group", "Individual").unwrap();
    assert_eq!(store.list(), ["Individual", "Individual"]);
}

#[test]
fn rename_unknown_name_returns_not_found() {
    let kv = MemoryKeyValueStore::new();
    let mut store = types(&kv);

    let err = store.rename("Group", "Groups").unwrap_err();
    assert_eq!(
        err,
        CatalogError::NotFound {
            kind: EntityKind::CourseType,
            key: "Group".to_string(),
        }
    );
}

#[test]
fn delete_shifts_later_entries() {
    let kv = MemoryKeyValueStore::new();
    let mut store = NameStore::courses(&kv, StorePolicy::default());
    for name in ["Maths", "Art", "Hindi"] {
        store.add(name).unwrap();
    }

    assert_eq!(store.delete("art").unwrap(), "Art");
    assert_eq!(store.list(), ["Maths", "Hindi"]);
    assert_eq!(store.position("Hindi"), Some(1));
}

#[test]
fn delete_is_blocked_while_an_offering_references_the_name() {
    let kv = MemoryKeyValueStore::new();
    let policy = StorePolicy::default();
    let mut course_types = NameStore::course_types(&kv, policy);
    let mut courses = NameStore::courses(&kv, policy);
    course_types.add("Group").unwrap();
    course_types.add("Individual").unwrap();
    courses.add("Art").unwrap();
    OfferingStore::open(&kv, policy).create("Group", "Art").unwrap();

    let err = course_types.delete("Group").unwrap_err();
    assert_eq!(err.category(), ErrorCategory::ReferentialIntegrity);
    assert_eq!(course_types.list(), ["Group", "Individual"]);

    let err = courses.delete("Art").unwrap_err();
    assert!(matches!(err, CatalogError::NameInUse { kind: NameKind::Course, .. }));

    course_types.delete("Individual").unwrap();
    assert_eq!(course_types.list(), ["Group"]);
}

#[test]
fn failed_save_keeps_in_memory_mutation() {
    let kv = MemoryKeyValueStore::new();
    let mut store = types(&kv);
    store.add("Group").unwrap();

    kv.reject_writes(true);
    store.add("Individual").unwrap();

    assert_eq!(store.list(), ["Group", "Individual"]);
    assert_eq!(kv.load("courseTypes").unwrap().as_deref(), Some(r#"["Group"]"#));
}
