use core::future::Future;
use core::pin::Pin;

use std::collections::VecDeque;

pub type BoxedTask<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Drives at most `limit` queued tasks at a time and collects every
/// output, in completion order. A slow or failing task only ever holds
/// one slot, the rest of the queue keeps draining around it.
pub async fn drain_buffered<'a, T>(mut queue: VecDeque<BoxedTask<'a, T>>, limit: usize) -> Vec<T> {
    assert!(limit > 0);
    let mut results = Vec::with_capacity(queue.len());
    let mut in_flight: Vec<_> = Vec::new();
    loop {
        while in_flight.len() < limit {
            match queue.pop_front() {
                Some(task) => in_flight.push(task),
                None => break,
            }
        }
        if in_flight.is_empty() {
            break;
        }
        let (output, _index, rest) = futures::future::select_all(in_flight).await;
        results.push(output);
        in_flight = rest;
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::future::FutureExt;

    #[tokio::test]
    async fn test_collects_all_outputs() {
        let queue: VecDeque<BoxedTask<i32>> =
            (0..25).map(|i| async move { i }.boxed()).collect();
        let mut results = drain_buffered(queue, 4).await;
        results.sort();
        assert_eq!(results, (0..25).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_limit_one_preserves_queue_order() {
        let queue: VecDeque<BoxedTask<i32>> =
            (0..5).map(|i| async move { i }.boxed()).collect();
        let results = drain_buffered(queue, 1).await;
        assert_eq!(results, vec![0, 1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_empty_queue() {
        let queue: VecDeque<BoxedTask<i32>> = VecDeque::new();
        assert!(drain_buffered(queue, 8).await.is_empty());
    }

    #[tokio::test]
    async fn test_one_error_does_not_block_the_rest() {
        let queue: VecDeque<BoxedTask<Result<i32, &'static str>>> = vec![
            async { Ok(1) }.boxed(),
            async { Err("lookup failed") }.boxed(),
            async { Ok(3) }.boxed(),
        ]
        .into();
        let results = drain_buffered(queue, 2).await;
        assert_eq!(results.len(), 3);
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 2);
    }
}
