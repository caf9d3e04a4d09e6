//! # Function-backed and pending producers (`Producer`)
//!
//! [`Producer`] wraps one source of a value:
//! - a plain closure `Fn() -> Result<T, E>`, called once per attempt;
//! - an async closure `Fn() -> impl Future<Output = Result<T, E>>`, producing a fresh future per attempt;
//! - an already pending future, spawned on the runtime when the producer is built
//!   and never re-run; once it settles, every later attempt observes the same
//!   cached outcome.
//!
//! ## Rules
//! - A closure is only called from inside the future returned by [`Producer::produce`],
//!   so a synchronous `Err` and an async `Err` are indistinguishable to the caller.
//! - Producers are cheap to clone (`Arc` inside).
//!
//! ## Example
//! ```rust
//! use pollvisor::Producer;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let sync: Producer<u32, String> = Producer::from_fn(|| Ok(1));
//! let lazy: Producer<u32, String> = Producer::from_async(|| async { Ok(2) });
//! let cached: Producer<u32, String> = Producer::pending(async { Ok(3) });
//! assert!(cached.is_pending());
//! assert_eq!(cached.produce().await, Ok(3));
//! # let _ = (sync, lazy);
//! # }
//! ```

use std::fmt;
use std::future::Future;
use std::panic;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};

type SyncFn<T, E> = Arc<dyn Fn() -> Result<T, E> + Send + Sync + 'static>;
type AsyncFn<T, E> = Arc<dyn Fn() -> BoxFuture<'static, Result<T, E>> + Send + Sync + 'static>;

enum Source<T, E> {
    Sync(SyncFn<T, E>),
    Async(AsyncFn<T, E>),
    /// Re-subscribes to a `Shared` future; the closure only clones the handle.
    Pending(AsyncFn<T, E>),
}

/// One asynchronous source of a `T`, failing with `E`.
pub struct Producer<T, E> {
    source: Source<T, E>,
}

/// A producer of a boolean condition.
pub type Check<E> = Producer<bool, E>;

impl<T, E> Producer<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    /// Creates a producer from a synchronous closure.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn() -> Result<T, E> + Send + Sync + 'static,
    {
        Self {
            source: Source::Sync(Arc::new(f)),
        }
    }

    /// Creates a producer from a closure returning a future.
    pub fn from_async<F, Fut>(f: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        Self {
            source: Source::Async(Arc::new(move || f().boxed())),
        }
    }

    /// Wraps an already running computation.
    ///
    /// `fut` is spawned immediately and makes progress whether or not anyone
    /// is waiting on it. Every [`produce`](Self::produce) call awaits the same
    /// shared outcome; a panic inside `fut` resumes in the awaiting caller.
    ///
    /// # Panics
    /// Panics if called outside a tokio runtime.
    pub fn pending<Fut>(fut: Fut) -> Self
    where
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        T: Clone + Sync,
        E: Clone + Sync,
    {
        let task = tokio::spawn(fut);
        let shared = async move {
            match task.await {
                Ok(outcome) => outcome,
                Err(e) if e.is_panic() => panic::resume_unwind(e.into_panic()),
                // cancelled only by runtime shutdown
                Err(_) => std::future::pending().await,
            }
        }
        .boxed()
        .shared();
        Self {
            source: Source::Pending(Arc::new(move || shared.clone().boxed())),
        }
    }

    /// Creates a producer that always yields `value`.
    pub fn ready(value: T) -> Self
    where
        T: Clone + Sync,
    {
        Self::from_fn(move || Ok(value.clone()))
    }

    /// Creates a producer that always fails with `reason`.
    pub fn failed(reason: E) -> Self
    where
        E: Clone + Sync,
    {
        Self::from_fn(move || Err(reason.clone()))
    }

    /// Starts one attempt.
    ///
    /// Nothing runs until the returned future is polled.
    pub fn produce(&self) -> BoxFuture<'static, Result<T, E>> {
        match &self.source {
            Source::Sync(f) => {
                let f = Arc::clone(f);
                async move { f() }.boxed()
            }
            Source::Async(f) | Source::Pending(f) => f(),
        }
    }
}

impl<T, E> Producer<T, E> {
    /// Returns `true` if this producer wraps an already pending computation.
    pub fn is_pending(&self) -> bool {
        matches!(self.source, Source::Pending(_))
    }

    fn kind(&self) -> &'static str {
        match self.source {
            Source::Sync(_) => "sync",
            Source::Async(_) => "async",
            Source::Pending(_) => "pending",
        }
    }
}

impl<T, E> Clone for Producer<T, E> {
    fn clone(&self) -> Self {
        let source = match &self.source {
            Source::Sync(f) => Source::Sync(Arc::clone(f)),
            Source::Async(f) => Source::Async(Arc::clone(f)),
            Source::Pending(f) => Source::Pending(Arc::clone(f)),
        };
        Self { source }
    }
}

impl<T, E> fmt::Debug for Producer<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Producer").field("kind", &self.kind()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_sync_closure_runs_on_poll_not_on_produce() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let p: Producer<usize, &str> = Producer::from_fn(move || {
            Ok(counter.fetch_add(1, Ordering::SeqCst) + 1)
        });

        let fut = p.produce();
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(fut.await, Ok(1));
        assert_eq!(p.produce().await, Ok(2));
    }

    #[tokio::test]
    async fn test_pending_runs_once_and_caches() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let p: Producer<u32, String> = Producer::pending(async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Err("down".to_string())
        });

        assert_eq!(p.produce().await, Err("down".to_string()));
        assert_eq!(p.clone().produce().await, Err("down".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pending_progresses_before_first_produce() {
        let started = Arc::new(AtomicUsize::new(0));
        let flag = Arc::clone(&started);
        let p: Producer<u32, ()> = Producer::pending(async move {
            flag.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
            Ok(9)
        });

        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        assert_eq!(started.load(Ordering::SeqCst), 1);

        let at = tokio::time::Instant::now();
        assert_eq!(p.produce().await, Ok(9));
        assert_eq!(at.elapsed(), std::time::Duration::ZERO);
    }

    #[tokio::test]
    async fn test_async_closure_fresh_future_per_attempt() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let p: Producer<usize, ()> = Producer::from_async(move || {
            let counter = Arc::clone(&counter);
            async move { Ok(counter.fetch_add(1, Ordering::SeqCst)) }
        });

        assert_eq!(p.produce().await, Ok(0));
        assert_eq!(p.produce().await, Ok(1));
        assert!(!p.is_pending());
        assert_eq!(format!("{p:?}"), "Producer { kind: \"async\" }");
    }
}
