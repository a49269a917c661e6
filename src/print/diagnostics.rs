//! Structured diagnostics emitted by the pipeline
//!
//! Recoverable conditions (for example a DPI fallback) are reported through a
//! [`DiagnosticSink`] instead of being written to a global stream, so callers
//! can surface them in their own UI or assert on them in tests.

use std::sync::Mutex;

/// A recoverable condition observed while preparing an export
#[derive(Debug, Clone, PartialEq)]
pub enum PrintDiagnostic {
    /// The hardware limit could not be read; `fallback_dpi` is used instead
    DpiFallback { reason: String, fallback_dpi: f64 },
    /// The requested DPI exceeds what the hardware can allocate
    DpiClamped { requested: f64, maximum: f64 },
    /// A caller override collided with a fixed print option and was ignored
    OverrideIgnored { key: String },
}

/// Receiver of [`PrintDiagnostic`] events
pub trait DiagnosticSink: Send + Sync {
    fn emit(&self, diagnostic: PrintDiagnostic);
}

/// Forwards diagnostics to the `log` facade
#[derive(Debug, Clone, Copy, Default)]
pub struct LogDiagnostics;

impl DiagnosticSink for LogDiagnostics {
    fn emit(&self, diagnostic: PrintDiagnostic) {
        match diagnostic {
            PrintDiagnostic::DpiFallback {
                reason,
                fallback_dpi,
            } => log::error!(
                "Error when calculating dpi for size: {reason}; using {fallback_dpi} dpi"
            ),
            PrintDiagnostic::DpiClamped { requested, maximum } => {
                log::warn!("Requested {requested} dpi exceeds the hardware maximum of {maximum:.1} dpi")
            }
            PrintDiagnostic::OverrideIgnored { key } => {
                log::debug!("Ignoring print override {key:?}: the print surface sets it itself")
            }
        }
    }
}

/// Keeps every diagnostic in memory
#[derive(Debug, Default)]
pub struct CollectingDiagnostics {
    events: Mutex<Vec<PrintDiagnostic>>,
}

impl CollectingDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the diagnostics collected so far
    pub fn events(&self) -> Vec<PrintDiagnostic> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

impl DiagnosticSink for CollectingDiagnostics {
    fn emit(&self, diagnostic: PrintDiagnostic) {
        if let Ok(mut events) = self.events.lock() {
            events.push(diagnostic);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collecting_sink_keeps_order() {
        let sink = CollectingDiagnostics::new();
        sink.emit(PrintDiagnostic::OverrideIgnored { key: "center".into() });
        sink.emit(PrintDiagnostic::DpiClamped {
            requested: 600.0,
            maximum: 480.0,
        });

        let events = sink.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], PrintDiagnostic::OverrideIgnored { key: "center".into() });
    }
}
