// ABOUTME: Domain value types shared by both backends.
// ABOUTME: Image references, API versions, records and creation parameters.

mod image_ref;
mod record;
mod version;

pub use image_ref::{ImageRef, ParseImageRefError, parse_image};
pub use record::{CommandOutput, ContainerRecord, CreateOutcome, CreateParams, StatusDescriptor};
pub use version::{ApiVersion, ParseVersionError, compare_versions};
