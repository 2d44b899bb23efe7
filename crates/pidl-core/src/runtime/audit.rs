// crates/pidl-core/src/runtime/audit.rs
// ============================================================================
// Module: PIDL Audit Sinks
// Description: JSON-lines audit sinks for stderr and append-only files.
// Purpose: Route resolution events to an operator-visible log.
// Dependencies: crate::interfaces, serde, serde_json
// ============================================================================

//! ## Overview
//! Each event is written as one JSON line. Write and lock failures are
//! swallowed; auditing never fails a resolution.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::File;
use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

use serde::Serialize;

use crate::interfaces::ResolutionAuditEvent;
use crate::interfaces::ResolutionAuditSink;
use crate::interfaces::ResolutionFailureEvent;
use crate::interfaces::ValidatorMissingEvent;

// ============================================================================
// SECTION: Stderr Sink
// ============================================================================

/// Audit sink that logs JSON lines to stderr.
pub struct StderrAuditSink;

impl StderrAuditSink {
    /// Writes one event line to stderr.
    fn emit<T: Serialize>(event: &T) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(io::stderr(), "{payload}");
        }
    }
}

impl ResolutionAuditSink for StderrAuditSink {
    fn record_resolution(&self, event: &ResolutionAuditEvent) {
        Self::emit(event);
    }

    fn record_failure(&self, event: &ResolutionFailureEvent) {
        Self::emit(event);
    }

    fn record_validator_missing(&self, event: &ValidatorMissingEvent) {
        Self::emit(event);
    }
}

// ============================================================================
// SECTION: File Sink
// ============================================================================

/// Audit sink that appends JSON lines to a file.
pub struct FileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<File>,
}

impl FileAuditSink {
    /// Opens the audit log in append mode, creating it when missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }

    /// Appends one event line.
    fn emit<T: Serialize>(&self, event: &T) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

impl ResolutionAuditSink for FileAuditSink {
    fn record_resolution(&self, event: &ResolutionAuditEvent) {
        self.emit(event);
    }

    fn record_failure(&self, event: &ResolutionFailureEvent) {
        self.emit(event);
    }

    fn record_validator_missing(&self, event: &ValidatorMissingEvent) {
        self.emit(event);
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
