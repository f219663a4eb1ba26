/*!
 * Error Types
 * Container errors with thiserror, miette and serde support
 */

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Container operation result
pub type ContainerResult<T> = Result<T, ContainerError>;

/// Errors signaled by container and guard operations
///
/// Lock acquisition has no error path: it either succeeds or blocks.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum ContainerError {
    #[error("element access out of range: position {pos}, length {len}")]
    #[diagnostic(
        code(container::out_of_range),
        help("Positions must be strictly less than the container length.")
    )]
    OutOfRange { pos: usize, len: usize },

    #[error("capacity overflow: {requested} elements do not fit in the address space")]
    #[diagnostic(
        code(container::capacity_overflow),
        help("Request fewer elements or use a smaller element type.")
    )]
    CapacityOverflow { requested: usize },

    #[error("allocation of {bytes} bytes (align {align}) failed")]
    #[diagnostic(
        code(container::allocation_failed),
        help("The allocator returned no memory. Free resources and retry.")
    )]
    AllocationFailed { bytes: usize, align: usize },
}

impl ContainerError {
    /// Bounds check shared by every indexed accessor
    #[inline]
    pub fn check_index(pos: usize, len: usize) -> ContainerResult<()> {
        if pos < len {
            Ok(())
        } else {
            Err(ContainerError::OutOfRange { pos, len })
        }
    }

    /// Whether this error came from the allocator rather than from indexing
    pub fn is_allocation_error(&self) -> bool {
        matches!(
            self,
            ContainerError::CapacityOverflow { .. } | ContainerError::AllocationFailed { .. }
        )
    }
}
