//! Identity and timestamp helpers for newly created records.

use chrono::Local;
use uuid::Uuid;

/// Opaque record identifier.
///
/// Fresh ids are UUID v4 strings. Ids loaded from older slots (for example
/// millisecond timestamps) are kept verbatim.
pub type RecordId = String;

const DISPLAY_DATE_FORMAT: &str = "%Y-%m-%d";

/// Generates a new unique record id.
pub fn new_record_id() -> RecordId {
    Uuid::new_v4().to_string()
}

/// Returns today's local date in display form.
///
/// Display only; no logic depends on the value.
pub fn display_date() -> String {
    Local::now().format(DISPLAY_DATE_FORMAT).to_string()
}
