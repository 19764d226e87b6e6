// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Executors that run load jobs.

use crate::error::CoordinatorError;
use crossbeam_channel::Sender;
use std::thread::{self, JoinHandle};
use tether_core::LoadType;

/// A unit of work handed to an executor. It publishes its own settle event.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Runs load jobs.
///
/// Executors never touch coordinator state; a job reports back through the
/// settle channel it captured.
pub trait LoadExecutor: Send {
    /// Runs `job` now or later. [`LoadType::Synchronous`] jobs must run one at
    /// a time, in the order they were spawned.
    fn spawn(&self, job: Job, load_type: LoadType);

    /// Short name for log output.
    fn name(&self) -> &'static str;
}

/// Runs every job on the calling thread.
///
/// The outcome is still delivered through the settle channel and picked up
/// by the next `update`, so nothing is processed re-entrantly.
#[derive(Debug, Default, Clone, Copy)]
pub struct InlineExecutor;

impl LoadExecutor for InlineExecutor {
    fn spawn(&self, job: Job, _load_type: LoadType) {
        job();
    }

    fn name(&self) -> &'static str {
        "inline"
    }
}

/// Runs asynchronous jobs on a tokio blocking pool and synchronous jobs on
/// one ordered worker thread.
pub struct ThreadedExecutor {
    runtime: Option<tokio::runtime::Runtime>,
    ordered: Option<Sender<Job>>,
    worker: Option<JoinHandle<()>>,
}

impl ThreadedExecutor {
    /// Starts the pool with at most `workers` concurrent asynchronous loads.
    pub fn new(workers: usize) -> Result<Self, CoordinatorError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .max_blocking_threads(workers.max(1))
            .thread_name("tether-load")
            .build()
            .map_err(CoordinatorError::Executor)?;

        let (sender, receiver) = crossbeam_channel::unbounded::<Job>();
        let worker = thread::Builder::new()
            .name("tether-ordered".to_string())
            .spawn(move || {
                for job in receiver {
                    job();
                }
                log::trace!("Ordered load worker stopped.");
            })
            .map_err(CoordinatorError::Executor)?;

        log::info!("Threaded load executor started with {} worker(s)", workers.max(1));

        Ok(Self {
            runtime: Some(runtime),
            ordered: Some(sender),
            worker: Some(worker),
        })
    }
}

impl LoadExecutor for ThreadedExecutor {
    fn spawn(&self, job: Job, load_type: LoadType) {
        match (load_type, &self.ordered, &self.runtime) {
            (LoadType::Synchronous, Some(ordered), _) => {
                if let Err(rejected) = ordered.send(job) {
                    log::warn!("Ordered load worker is gone; running job inline");
                    (rejected.into_inner())();
                }
            }
            (LoadType::Async, _, Some(runtime)) => {
                runtime.spawn_blocking(job);
            }
            _ => job(),
        }
    }

    fn name(&self) -> &'static str {
        "threaded"
    }
}

impl Drop for ThreadedExecutor {
    fn drop(&mut self) {
        // Closing the channel lets the worker drain its queue and exit.
        self.ordered.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::error!("Ordered load worker panicked");
            }
        }
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    #[test]
    fn inline_runs_immediately() {
        let ran = Arc::new(Mutex::new(false));
        let flag = ran.clone();
        InlineExecutor.spawn(Box::new(move || *flag.lock().unwrap() = true), LoadType::Async);
        assert!(*ran.lock().unwrap());
    }

    #[test]
    fn synchronous_jobs_run_in_spawn_order() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let executor = ThreadedExecutor::new(2).unwrap();

        for i in 0..8 {
            let order = order.clone();
            executor.spawn(
                Box::new(move || {
                    thread::sleep(Duration::from_millis((8 - i) as u64));
                    order.lock().unwrap().push(i);
                }),
                LoadType::Synchronous,
            );
        }
        drop(executor);

        assert_eq!(*order.lock().unwrap(), (0..8).collect::<Vec<_>>());
    }

    #[test]
    fn async_jobs_run_off_thread() {
        let (sender, receiver) = crossbeam_channel::unbounded();
        let executor = ThreadedExecutor::new(2).unwrap();
        let caller = thread::current().id();

        executor.spawn(
            Box::new(move || {
                let _ = sender.send(thread::current().id());
            }),
            LoadType::Async,
        );

        let ran_on = receiver.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_ne!(ran_on, caller);
    }
}
