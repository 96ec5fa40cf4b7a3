// ABOUTME: Diagnostics accumulator for non-fatal warnings about a finished deployment.
// ABOUTME: Collects warnings that shouldn't fail a deployment but should be shown to users.

use crate::deploy::DeploymentRecord;

/// Collects non-fatal warnings during deployment operations.
#[derive(Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    /// Record a warning, auto-logging it via tracing.
    pub fn warn(&mut self, warning: Warning) {
        tracing::warn!("{}", warning.message);
        self.warnings.push(warning);
    }

    /// Inspect a deployment record for things worth pointing out.
    pub fn review(&mut self, service: &str, record: &DeploymentRecord) {
        if record.endpoints.is_empty() {
            self.warn(Warning::no_endpoints(format!(
                "{service} has no public endpoint; assign one to reach it"
            )));
        }

        if !record.tier.is_recognized() {
            self.warn(Warning::unrecognized_tier(format!(
                "{service}: unrecognized tier '{}' was deployed without a build step",
                record.tier
            )));
        }
    }

    /// Get all collected warnings.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Check if any warnings were collected.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// A non-fatal warning collected during deployment.
#[derive(Debug, Clone)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
}

impl Warning {
    pub fn no_endpoints(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::NoEndpoints,
            message: message.into(),
        }
    }

    pub fn unrecognized_tier(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::UnrecognizedTier,
            message: message.into(),
        }
    }
}

/// Categories of warnings that can occur during deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// The app deployed but exposes no URL.
    NoEndpoints,
    /// The tier name is unknown and was treated as Standard.
    UnrecognizedTier,
}
