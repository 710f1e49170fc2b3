//! Core kernel traits.
//!
//! - `Kernel`: base trait for every pipeline stage
//! - `BatchKernel`: async one-input/one-output execution surface

use crate::error::{Result, SentinelError};
use crate::kernel::KernelMetadata;
use async_trait::async_trait;
use std::fmt::Debug;
use std::time::Duration;

/// Base trait for all pipeline stages.
pub trait Kernel: Send + Sync + Debug {
    /// Returns the kernel metadata.
    fn metadata(&self) -> &KernelMetadata;

    /// Validate kernel configuration.
    ///
    /// Called before execution to ensure configuration is valid.
    fn validate(&self) -> Result<()> {
        Ok(())
    }

    /// Returns the kernel ID.
    fn id(&self) -> &str {
        &self.metadata().id
    }
}

/// Trait for batch kernels: one finite input, one complete output.
///
/// # Type Parameters
///
/// - `I`: Input type
/// - `O`: Output type
#[async_trait]
pub trait BatchKernel<I, O>: Kernel
where
    I: Send + Sync,
    O: Send + Sync,
{
    /// Execute the kernel with the given input.
    async fn execute(&self, input: I) -> Result<O>;

    /// Validate the input before execution.
    ///
    /// Override to provide custom input validation.
    fn validate_input(&self, _input: &I) -> Result<()> {
        Ok(())
    }

    /// Execute the kernel with a deadline.
    ///
    /// On expiry the caller gets `SentinelError::Timeout`; work already
    /// handed to a blocking thread runs to completion and is discarded.
    async fn execute_with_timeout(&self, input: I, timeout: Duration) -> Result<O>
    where
        I: 'async_trait,
    {
        match tokio::time::timeout(timeout, self.execute(input)).await {
            Ok(result) => result,
            Err(_elapsed) => Err(SentinelError::Timeout(timeout)),
        }
    }
}
