use std::time::Duration;

use crate::{Runnable, SafegroundError};

/// Bounds every call of the wrapped runnable by a fixed deadline.
pub struct Timed<R> {
    runnable: R,
    limit: Duration,
}

impl<R> Timed<R> {
    pub fn new(runnable: R, limit: Duration) -> Self {
        Self { runnable, limit }
    }
}

#[async_trait::async_trait]
impl<Input, Output, R> Runnable<Input, Output> for Timed<R>
where
    Input: Send + 'static,
    Output: Send + 'static,
    R: Runnable<Input, Output> + Send + Sync,
{
    async fn invoke(&self, input: Input) -> Result<Output, SafegroundError> {
        match tokio::time::timeout(self.limit, self.runnable.invoke(input)).await {
            Ok(result) => result,
            Err(_) => Err(SafegroundError::Timeout(self.limit)),
        }
    }
}
