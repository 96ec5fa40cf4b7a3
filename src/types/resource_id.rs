// ABOUTME: Resource identifiers and type tags for Spring service instances.
// ABOUTME: Formats the ARM-style ID recorded in deployment results.

use serde::Serialize;
use std::fmt;

/// Resource type tag of a Spring service instance.
pub const SPRING_RESOURCE_TYPE: &str = "Microsoft.AppPlatform/Spring";

/// Fully qualified ID of a Spring service instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SpringResourceId(String);

impl SpringResourceId {
    pub fn new(subscription_id: &str, resource_group: &str, resource_name: &str) -> Self {
        Self(format!(
            "/subscriptions/{}/resourceGroups/{}/providers/{}/{}",
            subscription_id, resource_group, SPRING_RESOURCE_TYPE, resource_name
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SpringResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
