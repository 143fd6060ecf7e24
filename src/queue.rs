// src/queue.rs

//! Bounded producer/consumer queue with a shared cancellation flag.
//!
//! Dropping the [`Feeder`] closes the queue: drains finish what is buffered
//! and then stop. [`Cancellation::cancel`] stops both sides without draining.

use crossbeam_channel::{bounded, Receiver, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct Cancellation(Arc<AtomicBool>);

impl Cancellation {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug)]
pub struct Feeder<T> {
    tx: Sender<T>,
    cancel: Cancellation,
}

impl<T> Feeder<T> {
    /// Blocks while the queue is full. Returns `false` once the run is
    /// cancelled or no drain is left to take the item.
    pub fn push(&self, item: T) -> bool {
        if self.cancel.is_cancelled() {
            return false;
        }
        self.tx.send(item).is_ok()
    }
}

#[derive(Debug)]
pub struct Drain<T> {
    rx: Receiver<T>,
    cancel: Cancellation,
}

impl<T> Clone for Drain<T> {
    fn clone(&self) -> Self {
        Drain {
            rx: self.rx.clone(),
            cancel: self.cancel.clone(),
        }
    }
}

impl<T> Drain<T> {
    /// Blocks until an item is available. `None` once the queue is closed
    /// and empty, or the run was cancelled.
    pub fn pop(&self) -> Option<T> {
        if self.cancel.is_cancelled() {
            return None;
        }
        self.rx.recv().ok()
    }

    pub fn cancellation(&self) -> &Cancellation {
        &self.cancel
    }
}

pub fn work_queue<T>(capacity: usize) -> (Feeder<T>, Drain<T>) {
    let (tx, rx) = bounded(capacity);
    let cancel = Cancellation::default();
    (
        Feeder {
            tx,
            cancel: cancel.clone(),
        },
        Drain { rx, cancel },
    )
}
