// ABOUTME: Type-safe identifiers and validated domain types.
// ABOUTME: Uses phantom types to prevent ID confusion at compile time.

mod id;
mod resource_id;
mod service_name;

pub use id::{BuildResultId, Id, UploadReference};
pub use resource_id::{SPRING_RESOURCE_TYPE, SpringResourceId};
pub use service_name::{ServiceName, ServiceNameError};
