//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of Jsont.
//! The Jsont project belongs to the Dunimd Team.
//!
//! Licensed under the Apache License, Version 2.0 (the "License");
//! You may not use this file except in compliance with the License.
//! You may obtain a copy of the License at
//!
//!     http://www.apache.org/licenses/LICENSE-2.0
//!
//! Unless required by applicable law or agreed to in writing, software
//! distributed under the License is distributed on an "AS IS" BASIS,
//! WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//! See the License for the specific language governing permissions and
//! limitations under the License.

//! # Batch Join Module
//!
//! Runs independent asynchronous tasks with a concurrency ceiling and joins
//! their results in original index order, whatever order they finish in.
//!
//! ## Error Policies
//!
//! - [`JtBatch::end`] (abort-on-first): the first failure is returned at
//!   once. Tasks that already started are not cancelled; they are detached
//!   and their outcomes are discarded. Tasks not yet started never start.
//! - [`JtBatch::settle`] (collect-all): every task runs and the caller gets
//!   parallel `errors`/`results` vectors.
//!
//! Each task is spawned onto the ambient tokio runtime, so the join must be
//! awaited from within one.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::future::BoxFuture;
use futures::stream::{FuturesUnordered, StreamExt};
use futures::FutureExt;
use serde::Serialize;
use serde_json::Value;
use tokio::task::{JoinError, JoinHandle};

use crate::errors::{JtError, Result};
use crate::stack::panic_message;

/// Instrumentation record emitted once per completed task.
#[derive(Clone, Debug, PartialEq)]
pub struct JtBatchProgress {
    pub label: String,
    pub index: usize,
    pub succeeded: bool,
    /// The task's output as JSON. Only captured when an observer is set.
    pub value: Option<Value>,
    /// Display text of the task's failure.
    pub error: Option<String>,
    /// Tasks still outstanding after this one.
    pub pending: usize,
    pub total: usize,
    pub complete: usize,
    pub percent: u8,
    pub duration: Duration,
}

/// Callback receiving progress records. It has no effect on control flow.
pub type JtProgressObserver = Arc<dyn Fn(&JtBatchProgress) + Send + Sync>;

/// Outcome of a collect-all join, indexed like the pushed tasks.
#[derive(Debug)]
pub struct JtBatchSettled<T> {
    pub errors: Vec<Option<JtError>>,
    pub results: Vec<Option<T>>,
}

impl<T> JtBatchSettled<T> {
    pub fn is_clean(&self) -> bool {
        self.errors.iter().all(Option::is_none)
    }

    pub fn error_count(&self) -> usize {
        self.errors.iter().filter(|err| err.is_some()).count()
    }
}

/// Concurrency-bounded fan-out/fan-in of independent tasks.
pub struct JtBatch<T> {
    label: String,
    tasks: Vec<BoxFuture<'static, Result<T>>>,
    concurrency: Option<usize>,
    observer: Option<JtProgressObserver>,
}

impl<T> fmt::Debug for JtBatch<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JtBatch")
            .field("label", &self.label)
            .field("tasks", &self.tasks.len())
            .field("concurrency", &self.concurrency)
            .field("observer", &self.observer.is_some())
            .finish()
    }
}

impl<T: Serialize + Send + 'static> JtBatch<T> {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            tasks: Vec::new(),
            concurrency: None,
            observer: None,
        }
    }

    /// Sets the ceiling; `None` is unbounded. A ceiling of zero is treated as
    /// one so the join always makes progress.
    pub fn concurrency(mut self, max: Option<usize>) -> Self {
        self.concurrency = max;
        self
    }

    pub fn on_progress(mut self, observer: Option<JtProgressObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn push<F>(&mut self, task: F) -> &mut Self
    where
        F: Future<Output = Result<T>> + Send + 'static,
    {
        self.tasks.push(task.boxed());
        self
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Abort-on-first join. Returns results in push order.
    pub async fn end(self) -> Result<Vec<T>> {
        let settled = self.drive(true).await?;
        settled
            .results
            .into_iter()
            .enumerate()
            .map(|(index, result)| {
                result.ok_or_else(|| JtError::internal(format!("batch slot {index} never completed")))
            })
            .collect()
    }

    /// Collect-all join. Waits for every task regardless of failures.
    pub async fn settle(self) -> JtBatchSettled<T> {
        let total = self.tasks.len();
        match self.drive(false).await {
            Ok(settled) => settled,
            Err(err) => {
                // drive only fails early under abort-on-first
                let mut errors: Vec<Option<JtError>> = (0..total).map(|_| None).collect();
                if let Some(slot) = errors.first_mut() {
                    *slot = Some(err);
                }
                JtBatchSettled {
                    errors,
                    results: (0..total).map(|_| None).collect(),
                }
            }
        }
    }

    async fn drive(self, throws: bool) -> Result<JtBatchSettled<T>> {
        let JtBatch {
            label,
            tasks,
            concurrency,
            observer,
        } = self;

        let total = tasks.len();
        let mut errors: Vec<Option<JtError>> = (0..total).map(|_| None).collect();
        let mut results: Vec<Option<T>> = (0..total).map(|_| None).collect();
        if total == 0 {
            return Ok(JtBatchSettled { errors, results });
        }

        let max = concurrency.unwrap_or(total).clamp(1, total);
        let mut queue = tasks.into_iter().enumerate();
        let mut running = FuturesUnordered::new();
        for (index, task) in queue.by_ref().take(max) {
            running.push(Self::spawn(index, task));
        }

        let mut pending = total;
        while let Some((index, started, joined)) = running.next().await {
            let outcome = match joined {
                Ok(outcome) => outcome,
                Err(join_err) => Err(Self::join_error(&label, join_err)),
            };

            if throws {
                if let Err(err) = outcome {
                    if !running.is_empty() {
                        log::debug!(
                            "jsont.batch.abort: first failure wins, in-flight tasks detached - batch={}, index={}, detached={}",
                            label,
                            index,
                            running.len()
                        );
                    }
                    return Err(err);
                }
            }

            let complete = total - pending + 1;
            pending -= 1;
            let (value, error) = match &outcome {
                Ok(value) if observer.is_some() => (serde_json::to_value(value).ok(), None),
                Ok(_) => (None, None),
                Err(err) => (None, Some(err.to_string())),
            };
            let progress = JtBatchProgress {
                label: label.clone(),
                index,
                succeeded: outcome.is_ok(),
                value,
                error,
                pending,
                total,
                complete,
                percent: (complete * 100 / total) as u8,
                duration: started.elapsed(),
            };
            log::debug!(
                "jsont.batch.progress: task completed - batch={}, index={}, ok={}, complete={}/{}, duration_ms={}",
                progress.label,
                progress.index,
                progress.succeeded,
                progress.complete,
                progress.total,
                progress.duration.as_millis()
            );
            if let Some(observer) = &observer {
                observer(&progress);
            }

            match outcome {
                Ok(value) => results[index] = Some(value),
                Err(err) => errors[index] = Some(err),
            }

            if let Some((next_index, task)) = queue.next() {
                running.push(Self::spawn(next_index, task));
            }
        }

        Ok(JtBatchSettled { errors, results })
    }

    fn spawn(
        index: usize,
        task: BoxFuture<'static, Result<T>>,
    ) -> impl Future<Output = (usize, Instant, std::result::Result<Result<T>, JoinError>)> {
        let started = Instant::now();
        let handle: JoinHandle<Result<T>> = tokio::spawn(task);
        async move { (index, started, handle.await) }
    }

    fn join_error(label: &str, err: JoinError) -> JtError {
        if err.is_panic() {
            let payload = err.into_panic();
            JtError::Panic {
                path: label.to_string(),
                message: panic_message(payload.as_ref()),
            }
        } else {
            JtError::internal(format!("batch task in '{label}' was cancelled"))
        }
    }
}
