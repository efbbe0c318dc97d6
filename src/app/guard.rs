// src/app/guard.rs
//! Panic containment for UI regions.
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use tracing::error;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CrashReport {
    pub label: String,
    pub message: String,
}

/// Runs `f`; a panic inside it comes back as a `CrashReport` instead of
/// unwinding through the frame.
pub fn guard<R>(label: &str, f: impl FnOnce() -> R) -> Result<R, CrashReport> {
    panic::catch_unwind(AssertUnwindSafe(f)).map_err(|payload| {
        let report = CrashReport {
            label: label.to_string(),
            message: panic_message(payload.as_ref()),
        };
        error!("Render fault in {}: {}", report.label, report.message);
        report
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Remembers the first crash of a region until it is reset. While a report is
/// held the region is not run again.
#[derive(Debug, Default)]
pub struct CrashGuard {
    report: Option<CrashReport>,
}

impl CrashGuard {
    pub fn report(&self) -> Option<&CrashReport> {
        self.report.as_ref()
    }

    pub fn reset(&mut self) {
        self.report = None;
    }

    /// `None` while tripped or when `body` panicked.
    pub fn run<R>(&mut self, label: &str, body: impl FnOnce() -> R) -> Option<R> {
        if self.report.is_some() {
            return None;
        }
        match guard(label, body) {
            Ok(r) => Some(r),
            Err(report) => {
                self.report = Some(report);
                None
            }
        }
    }
}
