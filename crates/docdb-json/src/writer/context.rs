//! Call-sequence bookkeeping shared by the text and binary writers.

use std::collections::HashSet;

use crate::error::{JsonError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriterState {
    NotStarted,
    InValue,
    Done,
    Faulted,
}

#[derive(Debug, Default)]
struct Frame {
    object: bool,
    /// Items written so far; for objects, property names written so far.
    count: usize,
    awaiting_value: bool,
    names: HashSet<String>,
}

/// Tracks open containers and enforces the writer call protocol.
///
/// Every method validates a call before the writer emits any bytes for it.
/// The first violation moves the context to [`WriterState::Faulted`], after
/// which every call fails with [`JsonError::WriterFaulted`].
#[derive(Debug)]
pub(crate) struct WriterContext {
    state: WriterState,
    stack: Vec<Frame>,
}

impl WriterContext {
    pub(crate) fn new() -> Self {
        Self {
            state: WriterState::NotStarted,
            stack: Vec::new(),
        }
    }

    fn fault(&mut self, err: JsonError) -> JsonError {
        tracing::debug!(error = %err, depth = self.stack.len(), "writer protocol violation");
        self.state = WriterState::Faulted;
        err
    }

    fn check_live(&self) -> Result<()> {
        if self.state == WriterState::Faulted {
            return Err(JsonError::WriterFaulted);
        }
        Ok(())
    }

    /// Validates a value (scalar or container start) at the current position.
    /// Returns `true` when a separator precedes it in text form.
    fn enter_value(&mut self) -> Result<bool> {
        self.check_live()?;
        match self.state {
            WriterState::Done => return Err(self.fault(JsonError::NoOpenContainer)),
            WriterState::NotStarted => {
                self.state = WriterState::InValue;
                return Ok(false);
            }
            _ => {}
        }
        let Some(frame) = self.stack.last_mut() else {
            return Err(self.fault(JsonError::NoOpenContainer));
        };
        if frame.object {
            if !frame.awaiting_value {
                return Err(self.fault(JsonError::MissingProperty));
            }
            frame.awaiting_value = false;
            Ok(false)
        } else {
            frame.count += 1;
            Ok(frame.count > 1)
        }
    }

    pub(crate) fn scalar(&mut self) -> Result<bool> {
        let separator = self.enter_value()?;
        if self.stack.is_empty() {
            self.state = WriterState::Done;
        }
        Ok(separator)
    }

    pub(crate) fn open(&mut self, object: bool) -> Result<bool> {
        let separator = self.enter_value()?;
        self.stack.push(Frame {
            object,
            ..Frame::default()
        });
        Ok(separator)
    }

    /// Closes the innermost container and returns its item (or property)
    /// count.
    pub(crate) fn close(&mut self, object: bool) -> Result<usize> {
        self.check_live()?;
        let not_started = if object {
            JsonError::ObjectNotStarted
        } else {
            JsonError::ArrayNotStarted
        };
        match self.stack.last() {
            Some(frame) if frame.object == object => {
                if frame.awaiting_value {
                    return Err(self.fault(JsonError::MissingPropertyValue));
                }
            }
            _ => return Err(self.fault(not_started)),
        }
        let count = self.stack.pop().map_or(0, |frame| frame.count);
        if self.stack.is_empty() {
            self.state = WriterState::Done;
        }
        Ok(count)
    }

    /// Validates a property name. Returns `true` when a separator precedes it
    /// in text form.
    pub(crate) fn field_name(&mut self, name: &str) -> Result<bool> {
        self.check_live()?;
        let err = match self.stack.last_mut() {
            Some(frame) if frame.object => {
                if frame.awaiting_value {
                    JsonError::MissingPropertyValue
                } else if !frame.names.insert(name.to_owned()) {
                    JsonError::PropertyAlreadyAdded(name.to_owned())
                } else {
                    frame.awaiting_value = true;
                    frame.count += 1;
                    return Ok(frame.count > 1);
                }
            }
            _ => JsonError::PropertyOutsideObject,
        };
        Err(self.fault(err))
    }

    pub(crate) fn finish(&self) -> Result<()> {
        match self.state {
            WriterState::Done => Ok(()),
            WriterState::Faulted => Err(JsonError::WriterFaulted),
            _ => Err(JsonError::WriterNotDone),
        }
    }
}
