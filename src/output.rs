// ABOUTME: Output formatting for CLI feedback.
// ABOUTME: Supports normal, quiet (CI), and JSON output modes.

use serde::Serialize;
use std::time::Instant;

use crate::deploy::{DeploymentRecord, ServiceProgress};

/// Output mode for CLI feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-friendly output with progress messages
    Normal,
    /// Minimal output for CI (only final result)
    Quiet,
    /// JSON lines for scripting
    Json,
}

impl OutputMode {
    pub fn from_flags(quiet: bool, json: bool) -> Self {
        if json {
            OutputMode::Json
        } else if quiet {
            OutputMode::Quiet
        } else {
            OutputMode::Normal
        }
    }
}

/// Handles CLI output based on the configured mode.
pub struct Output {
    mode: OutputMode,
    start_time: Option<Instant>,
}

impl Output {
    pub fn new(mode: OutputMode) -> Self {
        Self {
            mode,
            start_time: None,
        }
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    /// Start timing an operation.
    pub fn start_timer(&mut self) {
        self.start_time = Some(Instant::now());
    }

    /// Get elapsed time since timer started.
    pub fn elapsed_secs(&self) -> f64 {
        self.start_time
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }

    fn duration(&self) -> Option<f64> {
        self.start_time.map(|_| self.elapsed_secs())
    }

    /// Print a progress message (suppressed in quiet/json mode).
    pub fn progress(&self, message: &str) {
        if self.mode == OutputMode::Normal {
            println!("{message}");
        }
    }

    /// Render a progress event from a running service operation.
    pub fn service_progress(&self, service: &str, event: &ServiceProgress) {
        match self.mode {
            OutputMode::Normal => println!("  → {service}: {}", event.message()),
            OutputMode::Quiet => {}
            OutputMode::Json => {
                let line = JsonEvent {
                    event: "progress",
                    message: &event.message(),
                    service: Some(service),
                    duration_secs: self.duration(),
                };
                print_json(&line);
            }
        }
    }

    /// Print a finished deployment.
    pub fn deployed(&self, service: &str, record: &DeploymentRecord) {
        match self.mode {
            OutputMode::Normal => {
                println!("  ✓ {service} deployed ({})", record.tier);
                for endpoint in &record.endpoints {
                    println!("    {endpoint}");
                }
            }
            OutputMode::Quiet => {
                println!("{service} {}", record.endpoints.join(" "));
            }
            OutputMode::Json => {
                let line = JsonRecord {
                    event: "deployed",
                    service,
                    record,
                };
                print_json(&line);
            }
        }
    }

    /// Print the endpoints of one service.
    pub fn endpoints(&self, service: &str, endpoints: &[String]) {
        match self.mode {
            OutputMode::Normal => {
                println!("{service}:");
                if endpoints.is_empty() {
                    println!("  (no public endpoint)");
                }
                for endpoint in endpoints {
                    println!("  {endpoint}");
                }
            }
            OutputMode::Quiet => {
                for endpoint in endpoints {
                    println!("{endpoint}");
                }
            }
            OutputMode::Json => {
                let line = JsonEndpoints {
                    event: "endpoints",
                    service,
                    endpoints,
                };
                print_json(&line);
            }
        }
    }

    /// Print a non-fatal warning.
    pub fn warning(&self, message: &str) {
        match self.mode {
            OutputMode::Normal => eprintln!("Warning: {message}"),
            OutputMode::Quiet => {}
            OutputMode::Json => {
                let line = JsonEvent {
                    event: "warning",
                    message,
                    service: None,
                    duration_secs: None,
                };
                if let Ok(json) = serde_json::to_string(&line) {
                    eprintln!("{json}");
                }
            }
        }
    }

    /// Print a success message with optional timing.
    pub fn success(&self, message: &str) {
        match self.mode {
            OutputMode::Normal => {
                let elapsed = self.elapsed_secs();
                if elapsed > 0.0 {
                    println!("{message} ({:.1}s)", elapsed);
                } else {
                    println!("{message}");
                }
            }
            OutputMode::Quiet => {
                // Print only the essential result
                println!("{message}");
            }
            OutputMode::Json => {
                let event = JsonEvent {
                    event: "success",
                    message,
                    service: None,
                    duration_secs: self.duration(),
                };
                print_json(&event);
            }
        }
    }

    /// Print an error message.
    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => {
                eprintln!("Error: {message}");
            }
            OutputMode::Json => {
                let event = JsonEvent {
                    event: "error",
                    message,
                    service: None,
                    duration_secs: self.duration(),
                };
                if let Ok(json) = serde_json::to_string(&event) {
                    eprintln!("{json}");
                }
            }
        }
    }
}

fn print_json<T: Serialize>(value: &T) {
    if let Ok(json) = serde_json::to_string(value) {
        println!("{json}");
    }
}

#[derive(Serialize)]
struct JsonEvent<'a> {
    event: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    service: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration_secs: Option<f64>,
}

#[derive(Serialize)]
struct JsonRecord<'a> {
    event: &'a str,
    service: &'a str,
    record: &'a DeploymentRecord,
}

#[derive(Serialize)]
struct JsonEndpoints<'a> {
    event: &'a str,
    service: &'a str,
    endpoints: &'a [String],
}
