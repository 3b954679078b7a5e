//! Call Deduplication Tests
//!
//! ## Test Scopes
//! - **Deduplication**: Concurrent callers for one key share one execution and one result.
//! - **Lifetime**: Records are released after completion and after an abandoned leader.
//! - **Reentrancy**: A load may call back into the group without deadlocking.

#[cfg(test)]
mod tests {
    use crate::error::CacheError;
    use crate::singleflight::CallGroup;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::sync::Barrier;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_calls_share_one_execution() {
        // ARRANGE
        let group = Arc::new(CallGroup::<String>::new());
        let calls = Arc::new(AtomicUsize::new(0));
        let barrier = Arc::new(Barrier::new(10));

        // ACT: 10 callers for the same key released at once
        let handles: Vec<_> = (0..10)
            .map(|_| {
                let group = group.clone();
                let calls = calls.clone();
                let barrier = barrier.clone();
                tokio::spawn(async move {
                    barrier.wait().await;
                    group
                        .run("Tom", || async move {
                            calls.fetch_add(1, Ordering::SeqCst);
                            tokio::time::sleep(Duration::from_millis(200)).await;
                            Ok("630".to_string())
                        })
                        .await
                })
            })
            .collect();

        let mut results = Vec::new();
        for handle in handles {
            results.push(handle.await.unwrap());
        }

        // ASSERT
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(results.iter().all(|r| r.as_deref() == Ok("630")));
        assert_eq!(group.in_flight(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_error_is_shared_with_every_waiter() {
        let group = Arc::new(CallGroup::<String>::new());
        let barrier = Arc::new(Barrier::new(5));

        let handles: Vec<_> = (0..5)
            .map(|_| {
                let group = group.clone();
                let barrier = barrier.clone();
                tokio::spawn(async move {
                    barrier.wait().await;
                    group
                        .run("Ghost", || async {
                            tokio::time::sleep(Duration::from_millis(150)).await;
                            Err(CacheError::Loader("Ghost not exist".to_string()))
                        })
                        .await
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(
                handle.await.unwrap(),
                Err(CacheError::Loader("Ghost not exist".to_string()))
            );
        }
    }

    #[tokio::test]
    async fn test_sequential_calls_are_not_memoized() {
        let group = CallGroup::<u32>::new();
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            let value = group
                .run("key", || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(7)
                })
                .await;
            assert_eq!(value, Ok(7));
        }

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(group.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_distinct_keys_run_independently() {
        let group = CallGroup::<String>::new();

        let (a, b) = tokio::join!(
            group.run("a", || async {
                tokio::time::sleep(Duration::from_millis(50)).await;
                Ok("A".to_string())
            }),
            group.run("b", || async {
                tokio::time::sleep(Duration::from_millis(50)).await;
                Ok("B".to_string())
            }),
        );

        assert_eq!(a.unwrap(), "A");
        assert_eq!(b.unwrap(), "B");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_abandoned_leader_releases_record() {
        // ARRANGE: a leader that never finishes on its own
        let group = Arc::new(CallGroup::<u32>::new());

        let leader = {
            let group = group.clone();
            tokio::spawn(async move {
                group
                    .run("slow", || async {
                        tokio::time::sleep(Duration::from_secs(30)).await;
                        Ok(1)
                    })
                    .await
            })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(group.in_flight(), 1);

        let waiter = {
            let group = group.clone();
            tokio::spawn(async move { group.run("slow", || async { Ok(2) }).await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;

        // ACT: cancel the leader
        leader.abort();

        // ASSERT: the waiter takes over instead of hanging
        let result = tokio::time::timeout(Duration::from_secs(5), waiter)
            .await
            .expect("waiter should not hang")
            .unwrap();
        assert_eq!(result, Ok(2));
        assert_eq!(group.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_reentrant_call_does_not_deadlock() {
        let group = CallGroup::<String>::new();

        let result = tokio::time::timeout(
            Duration::from_secs(2),
            group.run("outer", || async {
                let inner = group.run("inner", || async { Ok("in".to_string()) }).await?;
                Ok(format!("out+{}", inner))
            }),
        )
        .await
        .expect("reentrant call should complete");

        assert_eq!(result.unwrap(), "out+in");
    }
}
