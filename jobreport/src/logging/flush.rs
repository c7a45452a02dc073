// Copyright (c) The jobreport Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deferred closing of log handlers.
//!
//! Closing a handler may flush buffered output over the network, so it is never done while a
//! report is locked or on the thread that is running tests. Handlers are instead sent to a
//! background thread which closes them in the order they were scheduled.

use super::SharedLogHandler;
use crate::errors::FlusherError;
use std::{any::Any, sync::mpsc, thread::JoinHandle};
use tracing::{debug, warn};

/// A background thread that closes log handlers.
///
/// Create one per process with [`LogFlusher::new`], hand out [`FlushHandle`]s to reports, and
/// call [`LogFlusher::finish`] at shutdown to wait for every scheduled handler to be closed.
#[derive(Debug)]
pub struct LogFlusher {
    sender: mpsc::Sender<FlushMessage>,
    handle: JoinHandle<usize>,
}

impl LogFlusher {
    /// Spawns the flusher thread.
    pub fn new() -> Self {
        // An unbounded channel: scheduling a close must never block the caller.
        let (sender, receiver) = mpsc::channel();
        let handle = std::thread::spawn(move || {
            let mut closed = 0;
            while let Ok(message) = receiver.recv() {
                match message {
                    FlushMessage::Close(handler) => {
                        close_handler(&handler);
                        closed += 1;
                    }
                    FlushMessage::Shutdown => break,
                }
            }

            // Close anything scheduled between the shutdown request and now.
            for message in receiver.try_iter() {
                if let FlushMessage::Close(handler) = message {
                    close_handler(&handler);
                    closed += 1;
                }
            }
            closed
        });

        Self { sender, handle }
    }

    /// Returns a handle that schedules handlers to be closed on this flusher's thread.
    pub fn handle(&self) -> FlushHandle {
        FlushHandle {
            inner: FlushHandleInner::Background(self.sender.clone()),
        }
    }

    /// Closes every handler scheduled so far, then stops the flusher thread.
    ///
    /// Returns the number of handlers closed by the thread. Handles that outlive the flusher close
    /// handlers on the calling thread instead.
    pub fn finish(self) -> Result<usize, FlusherError> {
        // A send error means the thread has already exited, which join() reports below.
        _ = self.sender.send(FlushMessage::Shutdown);
        std::mem::drop(self.sender);

        match self.handle.join() {
            Ok(closed) => {
                debug!(closed, "log flusher finished");
                Ok(closed)
            }
            Err(panic_payload) => Err(FlusherError::WorkerPanic {
                message: panic_payload_to_string(panic_payload),
            }),
        }
    }
}

impl Default for LogFlusher {
    fn default() -> Self {
        Self::new()
    }
}

/// Schedules log handlers to be closed without blocking.
#[derive(Clone, Debug)]
pub struct FlushHandle {
    inner: FlushHandleInner,
}

impl FlushHandle {
    /// Returns a handle that closes handlers on the calling thread.
    ///
    /// Used by reports that have no flusher, such as combined reports.
    pub fn immediate() -> Self {
        Self {
            inner: FlushHandleInner::Immediate,
        }
    }

    /// Schedules `handler` to be flushed and closed.
    ///
    /// There is no way to cancel this: logs must always eventually be flushed.
    pub fn close_later(&self, handler: SharedLogHandler) {
        match &self.inner {
            FlushHandleInner::Background(sender) => {
                if let Err(mpsc::SendError(message)) = sender.send(FlushMessage::Close(handler)) {
                    // The flusher has shut down.
                    if let FlushMessage::Close(handler) = message {
                        close_handler(&handler);
                    }
                }
            }
            FlushHandleInner::Immediate => close_handler(&handler),
        }
    }
}

#[derive(Clone, Debug)]
enum FlushHandleInner {
    Background(mpsc::Sender<FlushMessage>),
    Immediate,
}

#[derive(Debug)]
enum FlushMessage {
    Close(SharedLogHandler),
    Shutdown,
}

fn close_handler(handler: &SharedLogHandler) {
    if let Err(error) = handler.close() {
        warn!(?handler, %error, "failed to close log handler");
    }
}

/// Extracts a string message from a panic payload.
fn panic_payload_to_string(payload: Box<dyn Any + Send + 'static>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "(unknown panic payload)".to_owned()
    }
}
