#![forbid(unsafe_code)]

//! Dispatch observability.
//!
//! - **Counters**: monotonic `lookups_total`, `lookups_deduplicated_total`,
//!   `reruns_requested_total`, `completions_discarded_total`.
//! - **Spans**: a `searchbox.dispatch` span per handled event, with `key`
//!   and `interaction` fields.
//! - **Events**: structured `tracing` events under the `searchbox.dispatch`
//!   and `searchbox.rerun` targets.
//!
//! The runtime never installs a subscriber; hosts decide where events go.

use std::sync::atomic::{AtomicU64, Ordering};

// ---------------------------------------------------------------------------
// Monotonic counters
// ---------------------------------------------------------------------------

static LOOKUPS_TOTAL: AtomicU64 = AtomicU64::new(0);
static LOOKUPS_DEDUPLICATED_TOTAL: AtomicU64 = AtomicU64::new(0);
static RERUNS_REQUESTED_TOTAL: AtomicU64 = AtomicU64::new(0);
static COMPLETIONS_DISCARDED_TOTAL: AtomicU64 = AtomicU64::new(0);

/// Lookups actually invoked.
#[must_use]
pub fn lookups_total() -> u64 {
    LOOKUPS_TOTAL.load(Ordering::Relaxed)
}

/// Search events suppressed because the term was unchanged.
#[must_use]
pub fn lookups_deduplicated_total() -> u64 {
    LOOKUPS_DEDUPLICATED_TOTAL.load(Ordering::Relaxed)
}

/// Rerun signals emitted.
#[must_use]
pub fn reruns_requested_total() -> u64 {
    RERUNS_REQUESTED_TOTAL.load(Ordering::Relaxed)
}

/// Deferred lookup completions dropped as stale.
#[must_use]
pub fn completions_discarded_total() -> u64 {
    COMPLETIONS_DISCARDED_TOTAL.load(Ordering::Relaxed)
}

// ---------------------------------------------------------------------------
// Recording helpers
// ---------------------------------------------------------------------------

pub(crate) fn dispatch_span(key: &str, interaction: &str) -> tracing::span::EnteredSpan {
    tracing::debug_span!("searchbox.dispatch", key = %key, interaction = %interaction).entered()
}

pub(crate) fn record_lookup(key: &str, term: &str, results: usize, duration_us: u64) {
    LOOKUPS_TOTAL.fetch_add(1, Ordering::Relaxed);
    tracing::debug!(
        target: "searchbox.dispatch",
        key = %key,
        term = %term,
        results = results,
        duration_us = duration_us,
        "lookup completed"
    );
}

pub(crate) fn record_lookup_failed(key: &str, term: &str, err: &dyn std::error::Error) {
    tracing::warn!(
        target: "searchbox.dispatch",
        key = %key,
        term = %term,
        error = %err,
        "lookup failed"
    );
}

pub(crate) fn record_submit(key: &str, changed: bool) {
    tracing::debug!(
        target: "searchbox.dispatch",
        key = %key,
        changed = changed,
        "submit committed"
    );
}

pub(crate) fn record_dedup(key: &str, term: &str) {
    LOOKUPS_DEDUPLICATED_TOTAL.fetch_add(1, Ordering::Relaxed);
    tracing::trace!(
        target: "searchbox.dispatch",
        key = %key,
        term = %term,
        "search term unchanged, lookup skipped"
    );
}

pub(crate) fn record_rerun(scope: &str, paced_us: u64) {
    RERUNS_REQUESTED_TOTAL.fetch_add(1, Ordering::Relaxed);
    tracing::debug!(
        target: "searchbox.rerun",
        scope = %scope,
        paced_us = paced_us,
        "rerun requested"
    );
}

pub(crate) fn record_discarded(key: &str, term: &str, reason: &str) {
    COMPLETIONS_DISCARDED_TOTAL.fetch_add(1, Ordering::Relaxed);
    tracing::debug!(
        target: "searchbox.dispatch",
        key = %key,
        term = %term,
        reason = %reason,
        "lookup completion discarded"
    );
}

pub(crate) fn record_unavailable(key: &str) {
    tracing::debug!(
        target: "searchbox.dispatch",
        key = %key,
        "session record unavailable, event ignored"
    );
}

pub(crate) fn error_stale_index(key: &str, index: u64, len: usize) {
    tracing::error!(
        target: "searchbox.dispatch",
        key = %key,
        index = index,
        len = len,
        "submit index outside option list"
    );
}


#[cfg(test)]
mod tests {
    use super::capture::with_captured_tracing;
    use super::*;

    #[test]
    fn lookup_counter_increments() {
        let before = lookups_total();
        record_lookup("k", "a", 10, 5);
        assert!(lookups_total() > before);
    }

    #[test]
    fn rerun_event_carries_scope() {
        let handle = with_captured_tracing(|| record_rerun("fragment", 0));
        let events = handle.events();
        let rerun: Vec<_> = events
            .iter()
            .filter(|e| e.target == "searchbox.rerun")
            .collect();
        assert_eq!(rerun.len(), 1);
        assert_eq!(rerun[0].fields.get("scope").unwrap(), "fragment");
        assert!(rerun[0].message_contains("rerun requested"));
    }

    #[test]
    fn dispatch_span_records_key() {
        let handle = with_captured_tracing(|| {
            let _span = dispatch_span("box", "search");
        });
        let spans = handle.spans();
        assert_eq!(spans[0].name, "searchbox.dispatch");
        assert_eq!(spans[0].fields.get("key").unwrap(), "box");
        assert_eq!(spans[0].fields.get("interaction").unwrap(), "search");
    }

    #[test]
    fn stale_index_logs_at_error() {
        let handle = with_captured_tracing(|| error_stale_index("k", 9, 2));
        assert!(
            handle
                .events()
                .iter()
                .any(|e| e.level == tracing::Level::ERROR && e.target == "searchbox.dispatch")
        );
    }
}
