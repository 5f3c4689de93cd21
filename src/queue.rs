//! Bounded blocking event queue shared by producers and dispatch workers.
//!
//! Producers hold a clonable [`EventSender`]; the dispatch workers share a
//! single receiver behind a mutex, taking turns on a bounded-timeout dequeue
//! so they can observe the stop flag between attempts. Delivery is FIFO per
//! producer and each event is dequeued exactly once.

use crate::error::RouterError;
use crate::event::Event;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, SyncSender, TrySendError};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Creates a bounded event queue with the given capacity.
///
/// Returns the producer handle and the consumer half handed to the
/// dispatch workers.
pub fn event_channel(capacity: usize) -> (EventSender, EventQueue) {
    let (tx, rx) = mpsc::sync_channel(capacity);
    (
        EventSender { tx },
        EventQueue {
            rx: Arc::new(Mutex::new(rx)),
        },
    )
}

/// Producer handle onto the event queue.
///
/// Clonable; each producer observes FIFO ordering of its own events.
#[derive(Clone)]
pub struct EventSender {
    tx: SyncSender<Event>,
}

impl EventSender {
    /// Pushes an event without blocking.
    ///
    /// # Errors
    ///
    /// [`RouterError::QueueFull`] when the queue is at capacity,
    /// [`RouterError::QueueClosed`] when all consumers are gone.
    pub fn send(&self, event: Event) -> Result<(), RouterError> {
        match self.tx.try_send(event) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => Err(RouterError::QueueFull),
            Err(TrySendError::Disconnected(_)) => Err(RouterError::QueueClosed),
        }
    }

    /// Pushes an event, blocking while the queue is at capacity.
    ///
    /// # Errors
    ///
    /// [`RouterError::QueueClosed`] when all consumers are gone.
    pub fn send_blocking(&self, event: Event) -> Result<(), RouterError> {
        self.tx.send(event).map_err(|_| RouterError::QueueClosed)
    }
}

/// Consumer half of the event queue, shared by the dispatch workers.
#[derive(Clone)]
pub struct EventQueue {
    rx: Arc<Mutex<Receiver<Event>>>,
}

impl EventQueue {
    /// Dequeues one event, waiting at most `timeout`.
    ///
    /// Workers call this in a loop, re-checking the stop flag after each
    /// timeout.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<Event, RecvTimeoutError> {
        let rx = self.rx.lock().unwrap();
        rx.recv_timeout(timeout)
    }
}
