//! # Tributary
//!
//! An in-memory feed synchronization engine: subscribe to RSS/Atom
//! feeds, poll them continuously, and merge what is genuinely new into
//! a single authoritative store.
//!
//! ## Architecture
//!
//! ```text
//! Fetcher → Normalizer → Diff → IdAssigner → Store → Notifier
//! ```
//!
//! - [`fetcher`]: HTTP adapter turning a URL into canonical feed content
//! - [`normalizer`]: RSS/Atom parsing into unified domain records
//! - [`diff`]: detects which posts are new on repeat polls
//! - [`ids`]: explicit monotonic identifier counters
//! - [`store`]: the shared in-memory collection of feeds and posts
//! - [`scheduler`]: concurrent, failure-tolerant poll rounds
//! - [`notify`]: typed change events for external consumers
//!
//! Rendering, persistence, and transport proxying are deliberately out
//! of scope; the engine only makes authoritative state and change
//! events available.

/// Application context and error handling.
///
/// [`AppContext`](app::AppContext) wires store, fetcher, and notifier
/// together and carries the user-facing `subscribe`/`mark_read`
/// operations.
pub mod app;

/// Command-line interface using clap.
pub mod cli;

/// Runtime configuration (poll interval, fetch timeout, workers).
pub mod config;

/// Diff engine: structural comparison of fetched posts against stored
/// ones, chronological ordering, fail-open timestamp handling.
pub mod diff;

/// Core domain models.
///
/// - [`Feed`](domain::Feed): a subscribed source and its metadata
/// - [`Post`](domain::Post): one article belonging to a feed
/// - [`RawPost`](domain::RawPost): adapter output, pre-identity
pub mod domain;

/// Feed content adapter boundary.
///
/// - [`Fetcher`](fetcher::Fetcher): async trait for feed fetching
/// - [`HttpFetcher`](fetcher::HttpFetcher): reqwest-based implementation
pub mod fetcher;

/// Monotonic identity assignment for feeds and posts.
pub mod ids;

/// Typed change notification over named mutation events.
pub mod notify;

/// Feed parsing and normalization via feed-rs.
pub mod normalizer;

/// Poll scheduling: rounds, bounded concurrency, cancellation.
pub mod scheduler;

/// The authoritative in-memory merge store.
pub mod store;
