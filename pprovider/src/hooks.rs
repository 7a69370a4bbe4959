//! Operational hook contracts for provider calls.

use std::time::Duration;

use crate::{ProviderError, ProviderId};

pub trait ProviderOperationHooks: Send + Sync {
    fn on_request_start(&self, _provider: ProviderId, _operation: &str, _model: &str) {}

    fn on_success(
        &self,
        _provider: ProviderId,
        _operation: &str,
        _model: &str,
        _elapsed: Duration,
    ) {
    }

    fn on_failure(
        &self,
        _provider: ProviderId,
        _operation: &str,
        _model: &str,
        _error: &ProviderError,
        _elapsed: Duration,
    ) {
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopOperationHooks;

impl ProviderOperationHooks for NoopOperationHooks {}
