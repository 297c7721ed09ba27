//! Where console output goes when it cannot be injected into a page.

/// Receives the text form of the console for non-HTML responses.
///
/// Implementations must be cheap to call; the console writes to the sink
/// once per response.
pub trait LogSink: 'static + Send + Sync {
    /// Writes one block of console text.
    fn write(&self, text: &str);
}

/// A [`LogSink`] that forwards console text to [`tracing`] at `INFO` level
/// with the target `webconsole`.
#[derive(Copy, Clone, Debug, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn write(&self, text: &str) {
        tracing::info!(target: "webconsole", "{text}");
    }
}

impl<F> LogSink for F
where
    F: Fn(&str) + 'static + Send + Sync,
{
    fn write(&self, text: &str) {
        self(text)
    }
}
