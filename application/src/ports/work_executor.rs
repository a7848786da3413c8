//! Work executor port
//!
//! Defines the interface for executing one unit of work against the
//! compute backend (an LLM call, a subprocess, a remote RPC). This is
//! the single suspension point of the orchestration core: no component
//! blocks anywhere else.

use async_trait::async_trait;
use swarm_domain::CapabilityTier;
use thiserror::Error;

/// Errors a single unit of work can fail with.
///
/// Always item-scoped: the dispatcher captures these into the failing
/// item's result and never lets them cancel sibling items. Only the
/// pipeline, whose steps form a true data dependency, turns one into a
/// run-level failure.
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Execution timed out")]
    Timeout,

    #[error("Backend failure: {0}")]
    Backend(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Could not spawn executor process: {0}")]
    Spawn(String),

    #[error("Executor error: {0}")]
    Other(String),
}

/// Executes one unit of work.
///
/// Implementations (adapters) live in the infrastructure layer. The
/// executor is constructor-injected into every orchestration component —
/// no ambient or global client state — so tests can substitute a
/// deterministic stub.
#[async_trait]
pub trait WorkExecutor: Send + Sync {
    /// Execute one payload.
    ///
    /// `worker` is the optional worker identity the payload was framed
    /// for; `tier` is an opaque capability hint letting adapters route
    /// coordinator/synthesis work to a higher-capability backend than
    /// worker-level fan-out.
    async fn execute(
        &self,
        payload: &str,
        worker: Option<&str>,
        tier: CapabilityTier,
    ) -> Result<String, ExecutionError>;
}
