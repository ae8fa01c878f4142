use std::future::Future;

use futures::stream::{self, StreamExt};

/// Runs `task` over `items` with at most `concurrency` futures in flight.
///
/// Outputs come back in input order regardless of completion order.
pub async fn dispatch<T, F, Fut>(items: Vec<T>, concurrency: usize, task: F) -> Vec<Fut::Output>
where
    F: FnMut(T) -> Fut,
    Fut: Future,
{
    stream::iter(items)
        .map(task)
        .buffered(concurrency.max(1))
        .collect()
        .await
}
