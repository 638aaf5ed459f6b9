//! Admission gate middleware.
//!
//! A fixed pool of permits caps the number of requests served concurrently.
//! Acquisition never blocks: when the pool is exhausted the request is
//! rejected immediately with a structured 503 so clients can tell overload
//! apart from a dead server. The permit is held for the whole handler call
//! and released on every exit path.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tokio::sync::{OwnedSemaphorePermit, Semaphore, TryAcquireError};

use venuepulse_core::error::{AppError, ErrorKind};

use crate::error::ApiError;
use crate::state::AppState;

/// Fixed-size admission permit pool.
#[derive(Debug)]
pub struct AdmissionGate {
    permits: Arc<Semaphore>,
    total: usize,
}

impl AdmissionGate {
    /// Creates a gate with the given number of permits.
    pub fn new(total: usize) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(total)),
            total,
        }
    }

    /// Attempts to take a permit without waiting.
    pub fn try_acquire(&self) -> Result<OwnedSemaphorePermit, TryAcquireError> {
        self.permits.clone().try_acquire_owned()
    }

    /// Number of permits currently handed out.
    pub fn in_use(&self) -> usize {
        self.total - self.permits.available_permits()
    }

    /// Total pool size.
    pub fn total(&self) -> usize {
        self.total
    }
}

/// Middleware applying the admission gate to every request.
pub async fn admission_gate(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let permit = match state.admission_gate.try_acquire() {
        Ok(permit) => permit,
        Err(_) => {
            return ApiError(AppError::new(
                ErrorKind::AdmissionRejected,
                "Server is at capacity, retry shortly",
            ))
            .into_response();
        }
    };

    let response = next.run(request).await;
    drop(permit);
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_exhaustion_rejects_next_acquire() {
        let gate = AdmissionGate::new(2);
        let first = gate.try_acquire().expect("first permit");
        let second = gate.try_acquire().expect("second permit");
        assert!(gate.try_acquire().is_err());
        assert_eq!(gate.in_use(), 2);

        drop(second);
        // One release frees exactly one slot.
        let third = gate.try_acquire().expect("freed permit");
        assert!(gate.try_acquire().is_err());

        drop(first);
        drop(third);
        assert_eq!(gate.in_use(), 0);
    }
}
