//! Fork-join worker pool.
//!
//! A fixed set of threads fed from a bounded queue, plus the `WaitGroup`
//! barrier the fork-join helpers use to block until every partition is done.
//! Partitions are contiguous index ranges; mutable work receives exclusive
//! `&mut` chunks so disjointness is checked by the borrow checker rather than
//! by convention.

mod partition;
mod pool_error;
mod wait_group;
mod worker_pool;

pub use partition::{chunk_len, partition};
pub use pool_error::PoolError;
pub use wait_group::WaitGroup;
pub use worker_pool::{
    available_workers, PoolState, Scope, WorkerPool, DEFAULT_QUEUE_CAPACITY, DEFAULT_WORKER_COUNT,
};
