//! Crawl engine control surface
//!
//! The engine owns the shared HTTP client, the run registry, and a handle to
//! the persistence collaborator. Starting a crawl is asynchronous: the
//! caller gets an immediate acknowledgment and the run proceeds as an
//! independently scheduled task.

use crate::config::{Config, CrawlerConfig};
use crate::crawler::fetcher::build_http_client;
use crate::crawler::registry::TaskRegistry;
use crate::crawler::runner::{run_task, RunContext};
use crate::storage::{TaskStatus, TaskStore};
use crate::Result;
use reqwest::Client;
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;

/// Acknowledgment returned by `start_crawl`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// The run was launched; results arrive through the store
    Accepted,
    /// No task with this id exists; nothing was changed
    NotFound,
}

/// Acknowledgment returned by `stop_crawl`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    /// An active run was found and asked to cancel
    Accepted,
    /// No run is active for this task id
    NoActiveRun,
}

/// Engine coordinating crawl runs over a shared task store
pub struct CrawlEngine<S: TaskStore + Send + 'static> {
    store: Arc<Mutex<S>>,
    registry: Arc<TaskRegistry>,
    client: Client,
    limits: CrawlerConfig,
}

impl<S: TaskStore + Send + 'static> CrawlEngine<S> {
    /// Creates an engine over a store it will own behind a mutex
    pub fn new(config: &Config, store: S) -> Result<Self> {
        let client = build_http_client(&config.user_agent, &config.crawler)?;
        Ok(Self {
            store: Arc::new(Mutex::new(store)),
            registry: Arc::new(TaskRegistry::new()),
            client,
            limits: config.crawler.clone(),
        })
    }

    /// Shared handle to the underlying store
    pub fn store(&self) -> Arc<Mutex<S>> {
        Arc::clone(&self.store)
    }

    /// Starts a crawl run for a task
    ///
    /// Loads the task's URL, marks it in progress, registers a cancellation
    /// token, and spawns the runner. An unknown id reports `NotFound`
    /// without touching any state. Must be called from within a tokio
    /// runtime.
    pub fn start_crawl(&self, task_id: i64) -> Result<StartOutcome> {
        let url = {
            let store = self.store.lock().unwrap();
            store.load_task_url(task_id)?
        };
        let Some(url) = url else {
            return Ok(StartOutcome::NotFound);
        };

        {
            let mut store = self.store.lock().unwrap();
            store.set_status(task_id, TaskStatus::InProgress)?;
        }

        let token = CancellationToken::new();
        self.registry.register(task_id, token.clone());

        tokio::spawn(run_task(RunContext {
            task_id,
            url,
            store: Arc::clone(&self.store),
            registry: Arc::clone(&self.registry),
            client: self.client.clone(),
            limits: self.limits.clone(),
            token,
        }));

        Ok(StartOutcome::Accepted)
    }

    /// Requests cancellation of an active run
    ///
    /// Advisory: the runner observes the token at its next checkpoint; an
    /// in-flight request is never interrupted.
    pub fn stop_crawl(&self, task_id: i64) -> StopOutcome {
        if self.registry.stop(task_id) {
            StopOutcome::Accepted
        } else {
            StopOutcome::NoActiveRun
        }
    }

    /// Returns true while a run is registered for this task id
    pub fn is_running(&self, task_id: i64) -> bool {
        self.registry.is_active(task_id)
    }
}
