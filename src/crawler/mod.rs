//! Crawler module for per-task page analysis
//!
//! This module contains the core crawling logic, including:
//! - The engine's start/stop control surface
//! - Base-page fetching
//! - Metadata extraction and link classification
//! - Rate-limited, concurrency-bounded liveness checking
//! - The active run registry

mod classifier;
mod engine;
mod extractor;
mod fetcher;
mod liveness;
mod registry;
mod runner;

pub use classifier::{classify, LinkKind};
pub use engine::{CrawlEngine, StartOutcome, StopOutcome};
pub use extractor::{extract_page, PageExtractor, PageReport, UNKNOWN_HTML_VERSION};
pub use fetcher::{build_http_client, fetch_page, FetchOutcome};
pub use liveness::{is_broken_status, LivenessChecker};
pub use registry::TaskRegistry;
