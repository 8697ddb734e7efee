use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use reloader::engine::Dispatch;
use reloader::errors::Result;
use reloader::exec::ExecutorBackend;

/// A fake executor that records every dispatch instead of running it.
#[derive(Debug, Clone, Default)]
pub struct FakeExecutor {
    dispatched: Arc<Mutex<Vec<Dispatch>>>,
}

impl FakeExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything dispatched so far, in order.
    pub fn dispatched(&self) -> Vec<Dispatch> {
        self.dispatched.lock().unwrap().clone()
    }

    pub fn commands(&self) -> Vec<String> {
        self.dispatched().into_iter().map(|d| d.command).collect()
    }
}

impl ExecutorBackend for FakeExecutor {
    fn dispatch(
        &mut self,
        dispatches: Vec<Dispatch>,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let recorded = Arc::clone(&self.dispatched);
        Box::pin(async move {
            recorded.lock().unwrap().extend(dispatches);
            Ok(())
        })
    }
}
