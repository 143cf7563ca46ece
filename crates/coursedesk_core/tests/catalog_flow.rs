use coursedesk_core::{
    Catalog, CatalogError, CatalogSummary, ErrorCategory, KeyValueStore, MemoryKeyValueStore,
    NameKind, Prerequisites, ReferencePolicy, StorePolicy, ValidationError,
};

fn cascade_policy() -> StorePolicy {
    StorePolicy {
        references: ReferencePolicy::Cascade,
        ..StorePolicy::default()
    }
}

#[test]
fn registration_walkthrough() {
    let kv = MemoryKeyValueStore::new();
    let mut catalog = Catalog::open(&kv, StorePolicy::default());
    assert_eq!(catalog.prerequisites(), Prerequisites::MissingBoth);

    catalog.add_name(NameKind::CourseType, "Individual").unwrap();
    assert_eq!(catalog.prerequisites(), Prerequisites::MissingCourses);
    catalog.add_name(NameKind::Course, "Maths").unwrap();
    assert_eq!(catalog.prerequisites(), Prerequisites::Ready);

    let offering = catalog.create_offering("Individual", "Maths").unwrap();
    let registration = catalog.register("Asha", Some(offering.id.as_str())).unwrap();
    assert_eq!(registration.course_type, "Individual");

    let enrolled = catalog
        .registrations()
        .list_by_offering("Individual", "Maths");
    assert_eq!(enrolled.len(), 1);
    assert_eq!(enrolled[0].student, "Asha");

    let err = catalog.register("asha", Some(offering.id.as_str())).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Duplicate);

    let err = catalog.delete_offering(&offering.id).unwrap_err();
    assert!(matches!(err, CatalogError::OfferingInUse { .. }));
    let err = catalog.delete_name(NameKind::Course, "Maths").unwrap_err();
    assert!(matches!(err, CatalogError::NameInUse { .. }));

    assert_eq!(catalog.unregister(&registration.id), Some(registration.clone()));
    catalog.delete_offering(&offering.id).unwrap();
    catalog.delete_name(NameKind::Course, "Maths").unwrap();
    catalog.delete_name(NameKind::CourseType, "Individual").unwrap();

    assert_eq!(catalog.summary(), CatalogSummary::default());
}

#[test]
fn register_resolves_offering_ids() {
    let kv = MemoryKeyValueStore::new();
    let mut catalog = Catalog::open(&kv, StorePolicy::default());

    let err = catalog.register("Asha", None).unwrap_err();
    assert_eq!(
        err,
        CatalogError::Validation(ValidationError::MissingOffering)
    );
    let err = catalog.register("Asha", Some("  ")).unwrap_err();
    assert_eq!(
        err,
        CatalogError::Validation(ValidationError::MissingOffering)
    );

    let err = catalog.register("Asha", Some("nope")).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::NotFound);
    assert!(catalog.registrations_for_offering("nope").is_err());
}

#[test]
fn by_value_rename_leaves_dependents_untouched() {
    let kv = MemoryKeyValueStore::new();
    let mut catalog = Catalog::open(&kv, StorePolicy::default());
    catalog.add_name(NameKind::CourseType, "Group").unwrap();
    catalog.add_name(NameKind::Course, "Art").unwrap();
    let offering = catalog.create_offering("Group", "Art").unwrap();
    catalog.register("Asha", Some(offering.id.as_str())).unwrap();

    catalog
        .rename_name(NameKind::CourseType, "Group", "Small Group")
        .unwrap();

    assert_eq!(catalog.offerings().list()[0].course_type, "Group");
    assert_eq!(catalog.registrations().list()[0].course_type, "Group");
    // The stale offering no longer blocks deleting the renamed type.
    catalog
        .delete_name(NameKind::CourseType, "Small Group")
        .unwrap();
}

#[test]
fn cascade_rename_rewrites_offerings_and_registrations() {
    let kv = MemoryKeyValueStore::new();
    let mut catalog = Catalog::open(&kv, cascade_policy());
    catalog.add_name(NameKind::CourseType, "Group").unwrap();
    catalog.add_name(NameKind::Course, "Art").unwrap();
    catalog.add_name(NameKind::Course, "Maths").unwrap();
    let art = catalog.create_offering("Group", "Art").unwrap();
    catalog.create_offering("Group", "Maths").unwrap();
    catalog.register("Asha", Some(art.id.as_str())).unwrap();

    catalog
        .rename_name(NameKind::Course, "art", "Fine Art")
        .unwrap();

    let offering = catalog.offerings().get(&art.id).unwrap();
    assert_eq!(offering.course, "Fine Art");
    assert_eq!(catalog.offerings().list()[1].course, "Maths");
    assert_eq!(catalog.registrations().list()[0].course, "Fine Art");

    let err = catalog
        .delete_name(NameKind::Course, "Fine Art")
        .unwrap_err();
    assert_eq!(err.category(), ErrorCategory::ReferentialIntegrity);

    let reopened = Catalog::open(&kv, cascade_policy());
    assert_eq!(
        reopened
            .registrations()
            .list_by_offering("Group", "Fine Art")
            .len(),
        1
    );
}

#[test]
fn cascade_offering_update_moves_registrations() {
    let kv = MemoryKeyValueStore::new();
    let mut catalog = Catalog::open(&kv, cascade_policy());
    catalog.add_name(NameKind::CourseType, "Group").unwrap();
    catalog.add_name(NameKind::CourseType, "Individual").unwrap();
    catalog.add_name(NameKind::Course, "Art").unwrap();
    let offering = catalog.create_offering("Group", "Art").unwrap();
    let registration = catalog.register("Asha", Some(offering.id.as_str())).unwrap();

    catalog
        .update_offering(&offering.id, "Individual", "Art")
        .unwrap();

    let moved = catalog.registrations().get(&registration.id).unwrap();
    assert_eq!(moved.course_type, "Individual");
    assert_eq!(catalog.registrations_for_offering(&offering.id).unwrap().len(), 1);
}

#[test]
fn cascade_policy_rejects_colliding_renames() {
    let kv = MemoryKeyValueStore::new();
    let policy = StorePolicy {
        renames: coursedesk_core::RenamePolicy::AllowCollisions,
        ..cascade_policy()
    };
    let mut catalog = Catalog::open(&kv, policy);
    catalog.add_name(NameKind::CourseType, "Group").unwrap();
    catalog.add_name(NameKind::CourseType, "Individual").unwrap();

    let err = catalog
        .rename_name(NameKind::CourseType, "Group", "Individual")
        .unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Duplicate);
}

#[test]
fn summary_counts_every_collection() {
    let kv = MemoryKeyValueStore::new();
    let mut catalog = Catalog::open(&kv, StorePolicy::default());
    catalog.add_name(NameKind::CourseType, "Individual").unwrap();
    catalog.add_name(NameKind::CourseType, "Group").unwrap();
    catalog.add_name(NameKind::Course, "Maths").unwrap();
    let offering = catalog.create_offering("Group", "Maths").unwrap();
    catalog.register("Asha", Some(offering.id.as_str())).unwrap();
    catalog.register("Ben", Some(offering.id.as_str())).unwrap();

    assert_eq!(
        catalog.summary(),
        CatalogSummary {
            course_types: 2,
            courses: 1,
            offerings: 1,
            registrations: 2,
        }
    );
}

fn offering_json(id: &str, course_type: &str, course: &str) -> String {
    format!(r#"{{"id":"{id}","type":"{course_type}","course":"{course}","date":"6/1/2024"}}"#)
}

fn registration_json(id: &str, student: &str, course_type: &str, course: &str) -> String {
    format!(
        r#"{{"id":"{id}","student":"{student}","type":"{course_type}","course":"{course}","date":"6/1/2024"}}"#
    )
}

#[test]
fn cascade_rename_rejects_merging_stale_offerings() {
    let offerings = format!(
        "[{},{}]",
        offering_json("o1", "X", "Art"),
        offering_json("o2", "Z", "Art")
    );
    let kv = MemoryKeyValueStore::new()
        .with_slot("courseTypes", r#"["Z"]"#)
        .with_slot("courses", r#"["Art"]"#)
        .with_slot("courseOfferings", offerings.clone());
    let mut catalog = Catalog::open(&kv, cascade_policy());

    let err = catalog
        .rename_name(NameKind::CourseType, "Z", "X")
        .unwrap_err();
    assert_eq!(
        err,
        CatalogError::DuplicateOffering {
            course_type: "X".to_string(),
            course: "Art".to_string(),
        }
    );

    assert_eq!(catalog.course_types().list(), ["Z"]);
    let labels: Vec<String> = catalog
        .offerings()
        .list()
        .iter()
        .map(|offering| offering.label())
        .collect();
    assert_eq!(labels, ["X - Art", "Z - Art"]);
    assert_eq!(kv.load("courseOfferings").unwrap(), Some(offerings));
    assert_eq!(kv.load("courseTypes").unwrap().as_deref(), Some(r#"["Z"]"#));
}

#[test]
fn cascade_rename_rejects_double_enrollment() {
    let registrations = format!(
        "[{},{}]",
        registration_json("r1", "Asha", "Solo", "Art"),
        registration_json("r2", "asha", "Group", "Art")
    );
    let kv = MemoryKeyValueStore::new()
        .with_slot("courseTypes", r#"["Solo"]"#)
        .with_slot("courses", r#"["Art"]"#)
        .with_slot("courseOfferings", format!("[{}]", offering_json("o1", "Group", "Art")))
        .with_slot("registrations", registrations);
    let mut catalog = Catalog::open(&kv, cascade_policy());

    let err = catalog
        .rename_name(NameKind::CourseType, "Solo", "Group")
        .unwrap_err();
    assert!(matches!(err, CatalogError::DuplicateRegistration { .. }));

    assert_eq!(catalog.course_types().list(), ["Solo"]);
    assert_eq!(catalog.registrations().list_by_type("Solo").len(), 1);
    assert_eq!(catalog.offerings().list()[0].course_type, "Group");
}

#[test]
fn cascade_offering_update_rejects_double_enrollment() {
    let kv = MemoryKeyValueStore::new()
        .with_slot("courseTypes", r#"["Group","Individual"]"#)
        .with_slot("courses", r#"["Art"]"#)
        .with_slot("courseOfferings", format!("[{}]", offering_json("o1", "Group", "Art")))
        .with_slot(
            "registrations",
            format!(
                "[{},{}]",
                registration_json("r1", "Asha", "Group", "Art"),
                registration_json("r2", "Asha", "Individual", "Art")
            ),
        );
    let mut catalog = Catalog::open(&kv, cascade_policy());

    let err = catalog
        .update_offering("o1", "Individual", "Art")
        .unwrap_err();
    assert!(matches!(err, CatalogError::DuplicateRegistration { .. }));

    assert_eq!(catalog.offerings().get("o1").unwrap().course_type, "Group");
    assert_eq!(catalog.registrations().get("r1").unwrap().course_type, "Group");
}
