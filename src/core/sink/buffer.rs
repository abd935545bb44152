//! In-memory sink.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use super::{Sink, SinkKind};
use crate::core::{Context, KeyToName};
use crate::error::SinkError;

/// Shared handle to the values a `BufferSink` has written.
///
/// Cloning is cheap; every clone sees the same contents.
#[derive(Debug, Clone, Default)]
pub struct Buffer {
    values: Rc<RefCell<BTreeMap<String, String>>>,
}

impl Buffer {
    pub fn get(&self, name: &str) -> Option<String> {
        self.values.borrow().get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.values.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.borrow().is_empty()
    }

    /// `name=value` lines, sorted by name.
    pub fn contents(&self) -> String {
        self.values
            .borrow()
            .iter()
            .map(|(k, v)| format!("{}={}\n", k, v))
            .collect()
    }
}

/// Keeps written values in memory.
#[derive(Debug, Default)]
pub struct BufferSink {
    key_to_name: KeyToName,
    buffer: Buffer,
}

impl BufferSink {
    pub fn new(key_to_name: KeyToName) -> Self {
        Self {
            key_to_name,
            buffer: Buffer::default(),
        }
    }

    /// Handle for reading back what was written.
    pub fn buffer(&self) -> Buffer {
        self.buffer.clone()
    }
}

impl Sink for BufferSink {
    fn write(&self, _ctx: &Context, name: &str, value: &str) -> Result<(), SinkError> {
        self.buffer
            .values
            .borrow_mut()
            .insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn key_to_name(&self) -> &KeyToName {
        &self.key_to_name
    }

    fn kind(&self) -> SinkKind {
        SinkKind::Buffer
    }
}
