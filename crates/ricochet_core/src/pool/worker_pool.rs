use super::partition::{chunk_len, partition};
use super::{PoolError, WaitGroup};
use std::collections::VecDeque;
use std::marker::PhantomData;
use std::num::NonZeroUsize;
use std::ops::Range;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

/// Worker count used when the host cannot report its parallelism.
pub const DEFAULT_WORKER_COUNT: usize = 4;

/// Default bound on queued, not yet started jobs.
pub const DEFAULT_QUEUE_CAPACITY: usize = 256;

type Job = Box<dyn FnOnce() + Send + 'static>;

/// Number of workers matching the host's hardware parallelism.
pub fn available_workers() -> usize {
    thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(DEFAULT_WORKER_COUNT)
}

/// Lifecycle of a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolState {
    Running,
    /// No new jobs are accepted; queued jobs still run.
    Draining,
    Stopped,
}

struct Queue {
    jobs: VecDeque<Job>,
    state: PoolState,
}

struct Shared {
    queue: Mutex<Queue>,
    job_available: Condvar,
    space_available: Condvar,
    capacity: usize,
}

impl Shared {
    // Jobs never run under the queue lock, so poisoning cannot leave it
    // inconsistent.
    fn lock(&self) -> MutexGuard<'_, Queue> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Fixed set of worker threads fed from a bounded FIFO queue.
///
/// Work is either fire-and-forget (`execute`) or fork-join over borrowed data
/// (`scope`, `map_ranges`, `map_chunks_mut`). The pool is reused across
/// ticks; `shutdown` (also run on drop) lets queued jobs finish, then joins
/// every worker.
pub struct WorkerPool {
    shared: Arc<Shared>,
    workers: Vec<JoinHandle<()>>,
    size: usize,
}

impl WorkerPool {
    /// Pool with `size` workers and the default queue capacity.
    pub fn new(size: usize) -> Result<Self, PoolError> {
        Self::with_capacity(size, DEFAULT_QUEUE_CAPACITY)
    }

    /// Pool sized to the host's available parallelism.
    pub fn with_available_parallelism() -> Result<Self, PoolError> {
        Self::new(available_workers())
    }

    pub fn with_capacity(size: usize, capacity: usize) -> Result<Self, PoolError> {
        if size == 0 {
            return Err(PoolError::ZeroWorkers);
        }
        if capacity == 0 {
            return Err(PoolError::ZeroCapacity);
        }

        let shared = Arc::new(Shared {
            queue: Mutex::new(Queue {
                jobs: VecDeque::with_capacity(capacity),
                state: PoolState::Running,
            }),
            job_available: Condvar::new(),
            space_available: Condvar::new(),
            capacity,
        });

        // Built incrementally so a failed spawn drops (and joins) the workers
        // that did start.
        let mut pool = Self {
            shared,
            workers: Vec::with_capacity(size),
            size,
        };

        for index in 0..size {
            let shared = Arc::clone(&pool.shared);
            let handle = thread::Builder::new()
                .name(format!("ricochet-worker-{index}"))
                .spawn(move || worker_loop(&shared))
                .map_err(|source| PoolError::Spawn { index, source })?;
            pool.workers.push(handle);
        }

        tracing::info!(workers = size, capacity, "worker pool started");
        Ok(pool)
    }

    /// Number of worker threads.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn state(&self) -> PoolState {
        self.shared.lock().state
    }

    /// Queue a job. Blocks while the queue is full.
    pub fn execute<F>(&self, job: F) -> Result<(), PoolError>
    where
        F: FnOnce() + Send + 'static,
    {
        self.enqueue(Box::new(job)).map_err(|_| PoolError::ShutDown)
    }

    /// Hands the job back if the pool no longer accepts work.
    fn enqueue(&self, job: Job) -> Result<(), Job> {
        let mut queue = self.shared.lock();
        loop {
            if queue.state != PoolState::Running {
                return Err(job);
            }
            if queue.jobs.len() < self.shared.capacity {
                break;
            }
            queue = self
                .shared
                .space_available
                .wait(queue)
                .unwrap_or_else(PoisonError::into_inner);
        }
        queue.jobs.push_back(job);
        drop(queue);
        self.shared.job_available.notify_one();
        Ok(())
    }

    /// Fork-join over borrowed data.
    ///
    /// Jobs spawned on the scope may borrow anything that outlives the call.
    /// `scope` returns only after every spawned job has finished, even when
    /// `f` itself panics. If a job panicked, the panic is re-raised here after
    /// the join.
    ///
    /// Calling `scope` from inside a job of the same pool can deadlock once
    /// every worker is blocked waiting.
    pub fn scope<'env, F, R>(&self, f: F) -> R
    where
        F: for<'scope> FnOnce(&'scope Scope<'scope, 'env>) -> R,
    {
        let scope = Scope {
            pool: self,
            pending: Arc::new(WaitGroup::new()),
            job_panicked: Arc::new(AtomicBool::new(false)),
            scope: PhantomData,
            env: PhantomData,
        };

        let result = panic::catch_unwind(AssertUnwindSafe(|| f(&scope)));
        scope.pending.wait();

        match result {
            Err(payload) => panic::resume_unwind(payload),
            Ok(_) if scope.job_panicked.load(Ordering::Acquire) => {
                panic!("a job spawned on a worker pool scope panicked")
            }
            Ok(value) => value,
        }
    }

    /// Split `0..len` into one contiguous range per worker, run `f` on each
    /// range concurrently and return the results in range order.
    pub fn map_ranges<T, F>(&self, len: usize, f: F) -> Vec<T>
    where
        T: Send,
        F: Fn(Range<usize>) -> T + Sync,
    {
        let ranges = partition(len, self.size);
        let mut results: Vec<Option<T>> = ranges.iter().map(|_| None).collect();
        let f = &f;

        self.scope(|scope| {
            for (range, slot) in ranges.into_iter().zip(results.iter_mut()) {
                scope.spawn(move || *slot = Some(f(range)));
            }
        });

        results
            .into_iter()
            .map(|slot| slot.expect("scope joined every partition"))
            .collect()
    }

    /// Like `map_ranges`, but each job gets exclusive access to its own chunk
    /// of `items`. `f` receives the chunk's offset into `items`.
    pub fn map_chunks_mut<E, T, F>(&self, items: &mut [E], f: F) -> Vec<T>
    where
        E: Send,
        T: Send,
        F: Fn(usize, &mut [E]) -> T + Sync,
    {
        if items.is_empty() {
            return Vec::new();
        }

        let chunk = chunk_len(items.len(), self.size);
        let mut results: Vec<Option<T>> = (0..items.len().div_ceil(chunk)).map(|_| None).collect();
        let f = &f;

        self.scope(|scope| {
            for ((index, part), slot) in items.chunks_mut(chunk).enumerate().zip(results.iter_mut()) {
                scope.spawn(move || *slot = Some(f(index * chunk, part)));
            }
        });

        results
            .into_iter()
            .map(|slot| slot.expect("scope joined every partition"))
            .collect()
    }

    /// Stop accepting work, let queued jobs finish and join every worker.
    ///
    /// Idempotent. After shutdown, `execute` fails and scoped jobs run on the
    /// calling thread.
    pub fn shutdown(&mut self) {
        {
            let mut queue = self.shared.lock();
            if queue.state == PoolState::Stopped {
                return;
            }
            queue.state = PoolState::Draining;
        }
        self.shared.job_available.notify_all();
        self.shared.space_available.notify_all();

        for handle in self.workers.drain(..) {
            if handle.join().is_err() {
                tracing::error!("worker thread exited by panic");
            }
        }

        self.shared.lock().state = PoolState::Stopped;
        tracing::info!(workers = self.size, "worker pool stopped");
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool")
            .field("size", &self.size)
            .field("capacity", &self.shared.capacity)
            .field("state", &self.state())
            .finish()
    }
}

fn worker_loop(shared: &Shared) {
    loop {
        let job = {
            let mut queue = shared.lock();
            loop {
                if let Some(job) = queue.jobs.pop_front() {
                    break job;
                }
                if queue.state != PoolState::Running {
                    return;
                }
                queue = shared
                    .job_available
                    .wait(queue)
                    .unwrap_or_else(PoisonError::into_inner);
            }
        };
        shared.space_available.notify_one();

        if panic::catch_unwind(AssertUnwindSafe(job)).is_err() {
            tracing::error!("worker pool job panicked");
        }
    }
}

/// Handle for spawning borrowed jobs inside `WorkerPool::scope`.
pub struct Scope<'scope, 'env: 'scope> {
    pool: &'scope WorkerPool,
    pending: Arc<WaitGroup>,
    job_panicked: Arc<AtomicBool>,
    scope: PhantomData<&'scope mut &'scope ()>,
    env: PhantomData<&'env mut &'env ()>,
}

impl<'scope, 'env> Scope<'scope, 'env> {
    /// Queue a job that may borrow from the enclosing scope.
    pub fn spawn<F>(&'scope self, job: F)
    where
        F: FnOnce() + Send + 'scope,
    {
        let pending = Arc::clone(&self.pending);
        let job_panicked = Arc::clone(&self.job_panicked);
        pending.add(1);

        let task: Box<dyn FnOnce() + Send + 'scope> = Box::new(move || {
            if panic::catch_unwind(AssertUnwindSafe(job)).is_err() {
                job_panicked.store(true, Ordering::Release);
            }
            pending.done();
        });

        // SAFETY: `WorkerPool::scope` blocks on `pending` before returning,
        // including when its closure unwinds, so the task finishes before any
        // `'scope` borrow it captured can end.
        let task: Job = unsafe {
            std::mem::transmute::<Box<dyn FnOnce() + Send + 'scope>, Job>(task)
        };

        if let Err(task) = self.pool.enqueue(task) {
            task();
        }
    }

    /// Workers available to this scope.
    pub fn workers(&self) -> usize {
        self.pool.size()
    }
}
