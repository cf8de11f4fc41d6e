//! Lazy engine loader
//!
//! Defers engine construction until the first request (or `/warmup`) needs
//! it, then hands out the same handle for the lifetime of the process.

use std::sync::Arc;

use tokio::sync::OnceCell;

use super::{EngineError, PlacementEngine};
use crate::logger;

type EngineFactory =
    Box<dyn Fn() -> Result<Arc<dyn PlacementEngine>, EngineError> + Send + Sync>;

/// Get-or-create accessor over the process-wide engine handle
pub struct EngineLoader {
    cell: OnceCell<Arc<dyn PlacementEngine>>,
    factory: EngineFactory,
}

impl EngineLoader {
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn() -> Result<Arc<dyn PlacementEngine>, EngineError> + Send + Sync + 'static,
    {
        Self {
            cell: OnceCell::new(),
            factory: Box::new(factory),
        }
    }

    /// Return the engine, initializing it on first call.
    ///
    /// Concurrent callers during cold start wait on a single initialization.
    /// A failed initialization leaves the handle empty so the next call retries.
    pub async fn get(&self) -> Result<Arc<dyn PlacementEngine>, EngineError> {
        let engine = self
            .cell
            .get_or_try_init(|| async {
                let started = std::time::Instant::now();
                let engine = (self.factory)()?;
                logger::log_engine_loaded(started.elapsed());
                Ok::<_, EngineError>(engine)
            })
            .await?;
        Ok(Arc::clone(engine))
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.initialized()
    }
}
