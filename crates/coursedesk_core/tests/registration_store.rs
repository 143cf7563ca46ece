use coursedesk_core::{
    CatalogError, ErrorCategory, KeyValueStore, MemoryKeyValueStore, NameStore, Offering,
    OfferingStore, RegistrationStore, StorePolicy, ValidationError,
};

fn offerings(kv: &MemoryKeyValueStore) -> (Offering, Offering) {
    let policy = StorePolicy::default();
    let mut course_types = NameStore::course_types(kv, policy);
    course_types.add("Individual").unwrap();
    course_types.add("Group").unwrap();
    let mut courses = NameStore::courses(kv, policy);
    courses.add("Maths").unwrap();

    let mut store = OfferingStore::open(kv, policy);
    let individual = store.create("Individual", "Maths").unwrap();
    let group = store.create("Group", "Maths").unwrap();
    (individual, group)
}

#[test]
fn register_copies_offering_pair_by_value() {
    let kv = MemoryKeyValueStore::new();
    let (individual, _) = offerings(&kv);
    let mut store = RegistrationStore::open(&kv, StorePolicy::default());

    let registration = store.register("  Asha ", Some(&individual)).unwrap();
    assert_eq!(registration.student, "Asha");
    assert_eq!(registration.course_type, "Individual");
    assert_eq!(registration.course, "Maths");
    assert_eq!(store.list(), [registration]);
}

#[test]
fn register_validates_student_then_offering() {
    let kv = MemoryKeyValueStore::new();
    let (individual, _) = offerings(&kv);
    let mut store = RegistrationStore::open(&kv, StorePolicy::default());

    assert_eq!(
        store.register(" ", Some(&individual)).unwrap_err(),
        CatalogError::Validation(ValidationError::MissingStudent)
    );
    assert_eq!(
        store.register("Asha", None).unwrap_err(),
        CatalogError::Validation(ValidationError::MissingOffering)
    );
    assert!(store.is_empty());
}

#[test]
fn same_student_cannot_register_twice_for_one_offering() {
    let kv = MemoryKeyValueStore::new();
    let (individual, group) = offerings(&kv);
    let mut store = RegistrationStore::open(&kv, StorePolicy::default());
    store.register("Asha", Some(&individual)).unwrap();

    let err = store.register("ASHA", Some(&individual)).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Duplicate);
    assert_eq!(
        err.to_string(),
        "ASHA is already registered for Individual - Maths"
    );

    store.register("asha", Some(&group)).unwrap();
    assert_eq!(store.len(), 2);
}

#[test]
fn register_rejects_offering_that_is_not_persisted() {
    let kv = MemoryKeyValueStore::new();
    offerings(&kv);
    let mut store = RegistrationStore::open(&kv, StorePolicy::default());

    let ghost = Offering::new("Group", "Art");
    let err = store.register("Asha", Some(&ghost)).unwrap_err();
    assert!(matches!(err, CatalogError::UnknownOffering { .. }));

    let mut legacy = RegistrationStore::open(&kv, StorePolicy::legacy());
    legacy.register("Asha", Some(&ghost)).unwrap();
}

#[test]
fn delete_is_idempotent_by_id() {
    let kv = MemoryKeyValueStore::new();
    let (individual, _) = offerings(&kv);
    let mut store = RegistrationStore::open(&kv, StorePolicy::default());
    let registration = store.register("Asha", Some(&individual)).unwrap();

    assert!(store.delete("does-not-exist").is_none());
    assert_eq!(store.len(), 1);

    assert_eq!(store.delete(&registration.id), Some(registration.clone()));
    assert!(store.delete(&registration.id).is_none());
    assert!(store.is_empty());
    assert_eq!(kv.load("registrations").unwrap().as_deref(), Some("[]"));
}

#[test]
fn filters_preserve_insertion_order() {
    let kv = MemoryKeyValueStore::new();
    let (individual, group) = offerings(&kv);
    let mut store = RegistrationStore::open(&kv, StorePolicy::default());
    store.register("Asha", Some(&individual)).unwrap();
    store.register("Ben", Some(&group)).unwrap();
    store.register("Chitra", Some(&individual)).unwrap();

    let students: Vec<&str> = store
        .list_by_offering("Individual", "Maths")
        .iter()
        .map(|registration| registration.student.as_str())
        .collect();
    assert_eq!(students, ["Asha", "Chitra"]);

    assert_eq!(store.list_by_type("Group").len(), 1);
    assert_eq!(store.list_by_type("").len(), 3);
    assert!(store.list_by_offering("Group", "Art").is_empty());
}
