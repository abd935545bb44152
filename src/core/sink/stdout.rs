//! Stdout sink, for dry runs and debugging pipelines.

use std::io::{self, Write};

use super::{Sink, SinkKind};
use crate::core::{Context, KeyToName};
use crate::error::SinkError;

#[derive(Debug, Default)]
pub struct StdoutSink {
    key_to_name: KeyToName,
}

impl StdoutSink {
    pub fn new(key_to_name: KeyToName) -> Self {
        Self { key_to_name }
    }
}

impl Sink for StdoutSink {
    fn write(&self, _ctx: &Context, name: &str, value: &str) -> Result<(), SinkError> {
        let mut out = io::stdout().lock();
        writeln!(out, "sink:stdout: name: {}, val: {:?}", name, value)?;
        Ok(())
    }

    fn key_to_name(&self) -> &KeyToName {
        &self.key_to_name
    }

    fn kind(&self) -> SinkKind {
        SinkKind::Stdout
    }
}
