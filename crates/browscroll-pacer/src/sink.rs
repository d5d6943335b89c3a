// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Event sink abstraction (platform injection lives outside this crate)

use crate::error::SinkError;

/// Sign of a committed tick batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Positive,
    Negative,
}

impl Direction {
    /// Direction of a non-zero sample; `None` for 0.0 and NaN.
    pub fn of(amount: f64) -> Option<Self> {
        if amount > 0.0 {
            Some(Direction::Positive)
        } else if amount < 0.0 {
            Some(Direction::Negative)
        } else {
            None
        }
    }
}

/// Receiver of paced tick batches.
///
/// The pacing loop calls [`EventSink::emit`] at most once per cycle with
/// `1 <= count <= max_ticks_per_flush`. Errors are logged by the loop and never
/// retried.
pub trait EventSink: Send {
    /// Acquire the underlying resource (display connection, device handle...).
    ///
    /// Called once, synchronously, while the engine is being constructed.
    fn acquire(&mut self) -> Result<(), SinkError> {
        Ok(())
    }

    /// Inject `count` unit events in `direction`.
    fn emit(&mut self, direction: Direction, count: u32) -> Result<(), SinkError>;

    /// Short name for logs and errors
    fn name(&self) -> &str {
        "sink"
    }
}

impl<S: EventSink + ?Sized> EventSink for Box<S> {
    fn acquire(&mut self) -> Result<(), SinkError> {
        (**self).acquire()
    }

    fn emit(&mut self, direction: Direction, count: u32) -> Result<(), SinkError> {
        (**self).emit(direction, count)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Sink backed by a closure
pub struct CallbackSink<F> {
    callback: F,
}

impl<F> CallbackSink<F>
where
    F: FnMut(Direction, u32) -> Result<(), SinkError> + Send,
{
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> EventSink for CallbackSink<F>
where
    F: FnMut(Direction, u32) -> Result<(), SinkError> + Send,
{
    fn emit(&mut self, direction: Direction, count: u32) -> Result<(), SinkError> {
        (self.callback)(direction, count)
    }

    fn name(&self) -> &str {
        "callback"
    }
}
