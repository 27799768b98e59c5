//! Injected observability for non-fatal conditions
//!
//! The core never writes to a fixed output. Conditions that callers may want
//! to see (clamped history queries, superseded bending plans, corrupted
//! history ordering) are reported through a [`DiagnosticSink`] supplied by
//! the owner. [`TracingSink`] forwards them to `tracing`.

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// A condition reported to a [`DiagnosticSink`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Diagnostic {
    /// Query time at or before the earliest recorded snapshot
    QueryBeforeHistory { time: f64, earliest: f64 },
    /// Query time after the latest recorded snapshot
    QueryAfterHistory { time: f64, latest: f64 },
    /// Query time was NaN and could not be placed in the history
    QueryTimeNotANumber { latest: f64 },
    /// An in-range query found no bracketing pair
    ///
    /// Only possible if the history lost its ascending time order.
    HistoryOrderViolated { time: f64, len: usize },
    /// A bending plan was replaced before it finished
    BendingSuperseded { remaining_increments: u32 },
}

impl Diagnostic {
    /// Whether this diagnostic indicates a bug rather than a recoverable condition
    pub fn is_fault(&self) -> bool {
        matches!(self, Diagnostic::HistoryOrderViolated { .. })
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::QueryBeforeHistory { time, earliest } => {
                write!(f, "query at {time} is before history (earliest {earliest})")
            }
            Diagnostic::QueryAfterHistory { time, latest } => {
                write!(f, "query at {time} is after history (latest {latest})")
            }
            Diagnostic::QueryTimeNotANumber { latest } => {
                write!(f, "query time is NaN (answered with latest {latest})")
            }
            Diagnostic::HistoryOrderViolated { time, len } => {
                write!(f, "no bracketing snapshots for in-range query at {time} ({len} entries)")
            }
            Diagnostic::BendingSuperseded {
                remaining_increments,
            } => write!(
                f,
                "bending plan superseded with {remaining_increments} increments left"
            ),
        }
    }
}

/// Receiver for diagnostics
pub trait DiagnosticSink {
    fn report(&self, diagnostic: &Diagnostic);
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &S {
    fn report(&self, diagnostic: &Diagnostic) {
        (**self).report(diagnostic)
    }
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for Rc<S> {
    fn report(&self, diagnostic: &Diagnostic) {
        (**self).report(diagnostic)
    }
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for Box<S> {
    fn report(&self, diagnostic: &Diagnostic) {
        (**self).report(diagnostic)
    }
}

/// Forwards diagnostics to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, diagnostic: &Diagnostic) {
        match diagnostic {
            Diagnostic::QueryBeforeHistory { time, earliest } => {
                tracing::warn!(time, earliest, "query before history");
            }
            Diagnostic::QueryAfterHistory { time, latest } => {
                tracing::warn!(time, latest, "query after history");
            }
            Diagnostic::QueryTimeNotANumber { latest } => {
                tracing::warn!(latest, "query time is NaN");
            }
            Diagnostic::HistoryOrderViolated { time, len } => {
                tracing::error!(time, len, "snapshot history ordering violated");
            }
            Diagnostic::BendingSuperseded {
                remaining_increments,
            } => {
                tracing::debug!(remaining_increments, "bending plan superseded");
            }
        }
    }
}

/// Discards all diagnostics
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn report(&self, _diagnostic: &Diagnostic) {}
}

/// Collects diagnostics in memory for later inspection
#[derive(Debug, Default)]
pub struct RecordingSink {
    entries: RefCell<Vec<Diagnostic>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All diagnostics reported so far, oldest first
    pub fn entries(&self) -> Vec<Diagnostic> {
        self.entries.borrow().clone()
    }

    /// The most recent diagnostic
    pub fn last(&self) -> Option<Diagnostic> {
        self.entries.borrow().last().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Drop all collected diagnostics
    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }
}

impl DiagnosticSink for RecordingSink {
    fn report(&self, diagnostic: &Diagnostic) {
        self.entries.borrow_mut().push(*diagnostic);
    }
}
