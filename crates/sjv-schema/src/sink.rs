//! # Diagnostic Sink
//!
//! The compiler calls [`DiagnosticSink::report_keyword_error`] exactly once
//! for each invalid keyword value it raises, before the error propagates.

/// Receiver for invalid-keyword diagnostics.
pub trait DiagnosticSink {
    /// Record that `keyword` held an invalid value.
    fn report_keyword_error(&mut self, keyword: &str);
}

/// Sink that emits a `tracing` warning per report.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report_keyword_error(&mut self, keyword: &str) {
        tracing::warn!(keyword, "invalid schema keyword value");
    }
}

/// Collects reported keywords, mostly for tests.
impl DiagnosticSink for Vec<String> {
    fn report_keyword_error(&mut self, keyword: &str) {
        self.push(keyword.to_owned());
    }
}
