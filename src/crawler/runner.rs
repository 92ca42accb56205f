//! Per-task crawl run
//!
//! One run fetches the base page, extracts its metadata, classifies every
//! discovered link, dispatches liveness probes, waits for them to drain, and
//! writes the terminal status. The run owns all per-run state (visited set,
//! counters); only the registry and the store are shared.
//!
//! Cancellation is checked at exactly two points: immediately before the
//! base-page request and after link dispatch completes, before the probe
//! drain. Both cancellation and fetch failure store `failed`; they differ
//! only in logs.

use crate::config::CrawlerConfig;
use crate::crawler::classifier::{classify, LinkKind};
use crate::crawler::extractor::extract_page;
use crate::crawler::fetcher::{fetch_page, FetchOutcome};
use crate::crawler::liveness::LivenessChecker;
use crate::crawler::registry::TaskRegistry;
use crate::storage::{PageSummary, TaskStatus, TaskStore};
use reqwest::Client;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;
use url::Url;

/// Everything one run needs, handed over by the engine at start
pub(crate) struct RunContext<S: TaskStore + Send + 'static> {
    pub task_id: i64,
    pub url: String,
    pub store: Arc<Mutex<S>>,
    pub registry: Arc<TaskRegistry>,
    pub client: Client,
    pub limits: CrawlerConfig,
    pub token: CancellationToken,
}

/// Executes one run to its terminal status and deregisters it
///
/// Deregistration happens exactly once here, regardless of which exit path
/// the run took, so a later stop request reports no active run.
pub(crate) async fn run_task<S: TaskStore + Send + 'static>(ctx: RunContext<S>) {
    let task_id = ctx.task_id;
    tracing::info!("Starting crawl for task {}: {}", task_id, ctx.url);

    run_inner(&ctx).await;

    ctx.registry.deregister(task_id);
}

/// Writes a `Failed` status, best-effort
fn mark_failed<S: TaskStore + Send + 'static>(ctx: &RunContext<S>) {
    let result = ctx
        .store
        .lock()
        .unwrap()
        .set_status(ctx.task_id, TaskStatus::Failed);
    if let Err(e) = result {
        tracing::error!("Failed to store failure for task {}: {}", ctx.task_id, e);
    }
}

async fn run_inner<S: TaskStore + Send + 'static>(ctx: &RunContext<S>) {
    let task_id = ctx.task_id;

    // Malformed base URL fails the run before any network call
    let base_url = match Url::parse(&ctx.url) {
        Ok(url) => url,
        Err(e) => {
            tracing::warn!("Invalid base URL for task {}: {}", task_id, e);
            mark_failed(ctx);
            return;
        }
    };

    // Cancellation checkpoint: before issuing the base-page request
    if ctx.token.is_cancelled() {
        tracing::info!("Crawl cancelled for task {} before base fetch", task_id);
        mark_failed(ctx);
        return;
    }

    let (status_code, body) = match fetch_page(&ctx.client, base_url.as_str()).await {
        FetchOutcome::Response { status_code, body } => (status_code, body),
        FetchOutcome::TransportError { error } => {
            tracing::warn!("Base fetch failed for task {}: {}", task_id, error);
            mark_failed(ctx);
            return;
        }
    };

    // The base page's own status is evaluated directly, bypassing the
    // checker. 429 is not exempted here, unlike the per-link policy.
    let mut broken_links = 0u32;
    if (400..600).contains(&status_code) {
        tracing::warn!(
            "Base page for task {} returned {}: {}",
            task_id,
            status_code,
            base_url
        );
        broken_links += 1;
        let result = ctx
            .store
            .lock()
            .unwrap()
            .append_broken_link(task_id, base_url.as_str(), status_code);
        if let Err(e) = result {
            tracing::error!("Failed to record broken base page: {}", e);
        }
    }

    let report = extract_page(&body);

    let mut visited: HashSet<String> = HashSet::new();
    let mut internal_links = 0u32;
    let mut external_links = 0u32;
    let mut checker = LivenessChecker::new(ctx.client.clone(), Arc::clone(&ctx.store), &ctx.limits);

    for href in &report.raw_hrefs {
        match classify(href, &base_url, &mut visited) {
            LinkKind::Internal(link) => {
                internal_links += 1;
                checker.check(task_id, link).await;
            }
            LinkKind::External(link) => {
                external_links += 1;
                checker.check(task_id, link).await;
            }
            LinkKind::Skip => {}
        }
    }

    // Cancellation checkpoint: after link dispatch. A stop that arrived while
    // the dispatch loop was blocked on the rate gate is honored here;
    // outstanding probes are abandoned rather than drained, and no summary is
    // written.
    if ctx.token.is_cancelled() {
        tracing::info!("Crawl cancelled for task {} during link dispatch", task_id);
        mark_failed(ctx);
        return;
    }

    checker.drain().await;
    broken_links += checker.broken_count();

    let summary = PageSummary {
        html_version: report.html_version,
        page_title: report.title,
        h1_count: report.h1_count,
        h2_count: report.h2_count,
        h3_count: report.h3_count,
        internal_links,
        external_links,
        broken_links,
        has_login_form: report.has_login_form,
    };

    let result = ctx.store.lock().unwrap().write_summary(task_id, &summary);
    if let Err(e) = result {
        tracing::error!("Failed to store summary for task {}: {}", task_id, e);
    }

    tracing::info!(
        "Crawl finished for task {}: {} internal, {} external, {} broken",
        task_id,
        internal_links,
        external_links,
        broken_links
    );
}
