//! Waiting on long-running operations.

use std::time::Duration;

use backon::{ConstantBuilder, Retryable};

use anchorage_core::model::Operation;

use crate::client::ControlPlane;
use crate::config::Config;
use crate::error::{ProvisionError, ProvisionResult};

/// Polls a long-running operation until it finishes or a deadline passes.
///
/// The deadline is wall-clock time, so slow polls count against it. Only
/// "still running" is polled again; any request error ends the wait
/// immediately. Dropping the returned future stops polling locally but
/// does not cancel the remote operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationWaiter {
    interval: Duration,
    timeout: Duration,
}

impl Default for OperationWaiter {
    fn default() -> Self {
        Self::new(Duration::from_secs(30), Duration::from_secs(3600))
    }
}

impl OperationWaiter {
    #[must_use]
    pub fn new(interval: Duration, timeout: Duration) -> Self {
        Self { interval, timeout }
    }

    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.poll_interval(), config.operation_timeout())
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Polls allowed before the deadline, at least one.
    fn max_polls(&self) -> usize {
        let interval = self.interval.as_millis().max(1);
        (self.timeout.as_millis() / interval).max(1) as usize
    }

    /// Wait for `operation` to finish and return its final state.
    ///
    /// # Errors
    /// Returns [`ProvisionError::OperationFailed`] when the operation ends
    /// with an error status, [`ProvisionError::Timeout`] when it is still
    /// running at the deadline, or whatever the control plane raised while
    /// polling.
    pub async fn wait<P: ControlPlane + ?Sized>(
        &self,
        plane: &P,
        operation: Operation,
    ) -> ProvisionResult<Operation> {
        if operation.done {
            return finish(operation);
        }

        let name = operation.name;
        log::info!("Waiting for operation {} ...", name);

        let name_ref = &name;
        let poll = || async move {
            let current = plane.get_operation(name_ref).await?;
            if current.done {
                Ok(current)
            } else {
                Err(ProvisionError::OperationPending {
                    name: name_ref.to_string(),
                })
            }
        };

        let polling = poll
            .retry(
                ConstantBuilder::default()
                    .with_delay(self.interval)
                    .with_max_times(self.max_polls()),
            )
            .sleep(tokio::time::sleep)
            .when(|e| matches!(e, ProvisionError::OperationPending { .. }))
            .notify(|_, after| {
                log::debug!("Operation {} still running; next poll in {:?}", name, after);
            });

        let timed_out = || ProvisionError::Timeout {
            name: name.to_string(),
            waited: self.timeout,
        };
        match tokio::time::timeout(self.timeout, polling).await {
            Ok(Ok(done)) => finish(done),
            Ok(Err(ProvisionError::OperationPending { .. })) | Err(_) => Err(timed_out()),
            Ok(Err(e)) => Err(e),
        }
    }
}

fn finish(operation: Operation) -> ProvisionResult<Operation> {
    match &operation.error {
        Some(status) => Err(ProvisionError::OperationFailed {
            name: operation.name.to_string(),
            code: status.code,
            message: status.message.clone(),
        }),
        None => {
            log::debug!("Operation {} finished", operation.name);
            Ok(operation)
        }
    }
}
