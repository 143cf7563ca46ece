use coursedesk_core::{Catalog, CatalogResult, KeyValueStore, NameKind, Registration};

use crate::cli::{Commands, NameCommands, OfferingCommands, StudentCommands};
use crate::output;

pub fn run<S>(catalog: &mut Catalog<'_, S>, command: Commands) -> CatalogResult<()>
where
    S: KeyValueStore + ?Sized,
{
    match command {
        Commands::Types { command } => names(catalog, NameKind::CourseType, command),
        Commands::Courses { command } => names(catalog, NameKind::Course, command),
        Commands::Offerings { command } => offerings(catalog, command),
        Commands::Students { command } => students(catalog, command),
        Commands::Status => {
            status(catalog);
            Ok(())
        }
    }
}

fn names<S>(
    catalog: &mut Catalog<'_, S>,
    kind: NameKind,
    command: Option<NameCommands>,
) -> CatalogResult<()>
where
    S: KeyValueStore + ?Sized,
{
    let label = title(kind);
    match command.unwrap_or(NameCommands::List) {
        NameCommands::List => {
            let names = catalog.names(kind).list().to_vec();
            if names.is_empty() {
                output::info(&format!("No {}s added yet", kind));
                return Ok(());
            }
            // `*` marks names still used by an offering.
            let offerings = catalog.offerings().list();
            let in_use = |idx: usize| {
                offerings
                    .iter()
                    .any(|offering| kind.field_of(offering) == names[idx])
            };
            output::item_table(names.clone(), in_use);
        }
        NameCommands::Add { name } => {
            let name = catalog.add_name(kind, &name)?;
            output::success(&format!("{label} \"{name}\" added successfully"));
        }
        NameCommands::Rename { current, new_name } => {
            let change = catalog.rename_name(kind, &current, &new_name)?;
            output::success(&format!("{label} updated to \"{}\"", change.current));
        }
        NameCommands::Remove { name } => {
            let name = catalog.delete_name(kind, &name)?;
            output::success(&format!("{label} \"{name}\" deleted successfully"));
        }
    }
    Ok(())
}

fn offerings<S>(catalog: &mut Catalog<'_, S>, command: Option<OfferingCommands>) -> CatalogResult<()>
where
    S: KeyValueStore + ?Sized,
{
    match command.unwrap_or(OfferingCommands::List { course_type: None }) {
        OfferingCommands::List { course_type } => {
            let offerings = catalog
                .offerings()
                .list_by_type(course_type.as_deref().unwrap_or_default());
            if offerings.is_empty() {
                output::info("No course offerings created yet");
                return Ok(());
            }
            let registrations = catalog.registrations();
            let rows = offerings
                .iter()
                .map(|offering| {
                    format!(
                        "{}  {}  (added on {})",
                        offering.id,
                        offering.label(),
                        offering.created_at
                    )
                })
                .collect::<Vec<_>>();
            // `*` marks offerings with registered students.
            let has_students = |idx: usize| {
                let offering = offerings[idx];
                !registrations
                    .list_by_offering(&offering.course_type, &offering.course)
                    .is_empty()
            };
            output::item_table(rows, has_students);
        }
        OfferingCommands::Create {
            course_type,
            course,
        } => {
            let prerequisites = catalog.prerequisites();
            if prerequisites != coursedesk_core::Prerequisites::Ready {
                output::info(&prerequisites.to_string());
            }
            let offering = catalog.create_offering(&course_type, &course)?;
            output::success(&format!(
                "Created new offering {} ({})",
                offering.label(),
                offering.id
            ));
        }
        OfferingCommands::Update {
            id,
            course_type,
            course,
        } => {
            let offering = catalog.update_offering(&id, &course_type, &course)?;
            output::success(&format!("Updated offering to {}", offering.label()));
        }
        OfferingCommands::Remove { id } => {
            let offering = catalog.delete_offering(&id)?;
            output::success(&format!("Deleted offering {}", offering.label()));
        }
    }
    Ok(())
}

fn students<S>(catalog: &mut Catalog<'_, S>, command: Option<StudentCommands>) -> CatalogResult<()>
where
    S: KeyValueStore + ?Sized,
{
    let command = command.unwrap_or(StudentCommands::List {
        course_type: None,
        offering: None,
    });
    match command {
        StudentCommands::List {
            course_type,
            offering,
        } => {
            let registrations = match offering {
                Some(id) => catalog.registrations_for_offering(&id)?,
                None => catalog
                    .registrations()
                    .list_by_type(course_type.as_deref().unwrap_or_default()),
            };
            if registrations.is_empty() {
                output::info("No students registered");
                return Ok(());
            }
            let rows = registrations.into_iter().map(registration_row).collect();
            output::item_table(rows, |_| false);
        }
        StudentCommands::Register { student, offering } => {
            let registration = catalog.register(&student, Some(offering.as_str()))?;
            output::success(&format!(
                "Successfully registered {} for {} - {}",
                registration.student, registration.course_type, registration.course
            ));
        }
        StudentCommands::Unregister { id } => match catalog.unregister(&id) {
            Some(registration) => output::success(&format!(
                "Removed {} from registration",
                registration.student
            )),
            None => output::info(&format!("No registration with id {id}; nothing removed")),
        },
    }
    Ok(())
}

fn status<S>(catalog: &Catalog<'_, S>)
where
    S: KeyValueStore + ?Sized,
{
    let summary = catalog.summary();
    println!("== Catalog ==");
    println!("  Course types:  {}", summary.course_types);
    println!("  Courses:       {}", summary.courses);
    println!("  Offerings:     {}", summary.offerings);
    println!("  Registrations: {}", summary.registrations);
    let policy = catalog.policy();
    println!("== Policy ==");
    println!("  References: {:?}", policy.references);
    println!("  Renames:    {:?}", policy.renames);
    println!("  Require known references: {}", policy.require_known_references);
    output::info(&catalog.prerequisites().to_string());
}

fn registration_row(registration: &Registration) -> String {
    format!(
        "{}  {}  {} - {}  (registered on {})",
        registration.id,
        registration.student,
        registration.course_type,
        registration.course,
        registration.created_at
    )
}

fn title(kind: NameKind) -> &'static str {
    match kind {
        NameKind::CourseType => "Course type",
        NameKind::Course => "Course",
    }
}
