//! Bounded tracker for in-flight deliveries.
//!
//! Each delivery holds one semaphore permit for as long as its task runs.
//! A full buffer rejects new work immediately instead of queueing it.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;

use crate::types::{Error, Result};

#[derive(Debug, Clone)]
pub struct DeliveryBuffer {
    capacity: usize,
    slots: Arc<Semaphore>,
}

impl DeliveryBuffer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.clamp(1, u32::MAX as usize);
        Self {
            capacity,
            slots: Arc::new(Semaphore::new(capacity)),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of deliveries currently in flight.
    pub fn len(&self) -> usize {
        self.capacity - self.slots.available_permits()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Start `task` on its own tokio task if a slot is free.
    ///
    /// Fails with [`Error::BufferFull`] without waiting when every slot is
    /// taken. The slot is released when the task finishes, whether or not
    /// anyone awaits the returned handle.
    pub fn add<F, T>(&self, task: F) -> Result<JoinHandle<Result<T>>>
    where
        F: Future<Output = Result<T>> + Send + 'static,
        T: Send + 'static,
    {
        let permit = self
            .slots
            .clone()
            .try_acquire_owned()
            .map_err(|_| Error::BufferFull {
                capacity: self.capacity,
            })?;

        Ok(tokio::spawn(async move {
            let _permit = permit; // held until the delivery completes
            task.await
        }))
    }

    /// Wait until every in-flight delivery has finished.
    ///
    /// Returns `false` if `timeout` elapsed first. While draining, freed slots
    /// are reserved for the drain, so new work is rejected.
    pub async fn drain(&self, timeout: Option<Duration>) -> bool {
        let all = self.capacity as u32;
        let wait_all = self.slots.acquire_many(all);
        let drained = match timeout {
            Some(limit) => matches!(tokio::time::timeout(limit, wait_all).await, Ok(Ok(_))),
            None => wait_all.await.is_ok(),
        };
        if !drained {
            tracing::debug!(pending = self.len(), "Delivery buffer drain timed out");
        }
        drained
    }
}
