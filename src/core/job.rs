//! Rotation job: one source fanned out to an ordered list of sinks.

use crate::core::sink::Sink;
use crate::core::source::Source;

pub struct RotationJob {
    pub name: String,
    pub source: Box<dyn Source>,
    pub sinks: Vec<Box<dyn Sink>>,
}

impl RotationJob {
    pub fn new(name: impl Into<String>, source: Box<dyn Source>) -> Self {
        Self {
            name: name.into(),
            source,
            sinks: Vec::new(),
        }
    }

    /// Append a sink; sinks are written in the order they are added.
    pub fn with_sink(mut self, sink: Box<dyn Sink>) -> Self {
        self.sinks.push(sink);
        self
    }
}

impl std::fmt::Debug for RotationJob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RotationJob")
            .field("name", &self.name)
            .field("source", &self.source.kind())
            .field(
                "sinks",
                &self.sinks.iter().map(|s| s.kind()).collect::<Vec<_>>(),
            )
            .finish()
    }
}
