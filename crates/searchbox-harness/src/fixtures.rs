#![forbid(unsafe_code)]

//! Reference lookups and hook recorders.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use searchbox_core::{Item, Value};
use searchbox_runtime::{Hooks, Lookup, LookupArgs, LookupResult};

/// `term_0` .. `term_9` for any non-empty term, nothing for the empty term.
#[must_use]
pub fn numbered(term: &str) -> Option<Vec<Item>> {
    if term.is_empty() {
        return None;
    }
    Some((0..10).map(|i| Item::bare(format!("{term}_{i}"))).collect())
}

/// Two labeled titles whose native values are integer ids.
#[must_use]
pub fn titles(_term: &str) -> Option<Vec<Item>> {
    Some(vec![
        Item::labeled("Title A", 101),
        Item::labeled("Title B", 202),
    ])
}

/// Always `None`.
#[must_use]
pub fn nothing(_term: &str) -> Option<Vec<Item>> {
    None
}

/// Echo each extra argument back as `name=value`.
pub fn echo_args(term: &str, args: &LookupArgs) -> LookupResult {
    Ok(Some(
        args.iter()
            .map(|(name, value)| Item::labeled(format!("{term}:{name}={value}"), value.clone()))
            .collect(),
    ))
}

/// Wraps a lookup and counts how often it runs.
#[derive(Debug, Clone)]
pub struct CountingLookup<L> {
    inner: L,
    calls: Arc<AtomicUsize>,
    terms: Arc<Mutex<Vec<String>>>,
}

impl<L> CountingLookup<L> {
    pub fn new(inner: L) -> Self {
        Self {
            inner,
            calls: Arc::new(AtomicUsize::new(0)),
            terms: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Handle that keeps reporting after the lookup is moved away.
    #[must_use]
    pub fn probe(&self) -> LookupProbe {
        LookupProbe {
            calls: Arc::clone(&self.calls),
            terms: Arc::clone(&self.terms),
        }
    }
}

impl<L: Lookup> Lookup for CountingLookup<L> {
    fn lookup(&mut self, term: &str, args: &LookupArgs) -> LookupResult {
        self.calls.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut terms) = self.terms.lock() {
            terms.push(term.to_owned());
        }
        self.inner.lookup(term, args)
    }
}

/// Read side of a [`CountingLookup`].
#[derive(Debug, Clone)]
pub struct LookupProbe {
    calls: Arc<AtomicUsize>,
    terms: Arc<Mutex<Vec<String>>>,
}

impl LookupProbe {
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }

    /// Terms looked up, in order.
    #[must_use]
    pub fn terms(&self) -> Vec<String> {
        self.terms.lock().map(|t| t.clone()).unwrap_or_default()
    }
}

/// Records every hook call.
#[derive(Debug, Clone, Default)]
pub struct HookRecorder {
    resets: Arc<AtomicUsize>,
    submits: Arc<Mutex<Vec<Value>>>,
}

impl HookRecorder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Hooks that report into this recorder.
    #[must_use]
    pub fn hooks(&self) -> Hooks {
        let resets = Arc::clone(&self.resets);
        let submits = Arc::clone(&self.submits);
        Hooks::new()
            .on_reset(move || {
                resets.fetch_add(1, Ordering::Relaxed);
            })
            .on_submit(move |value| {
                if let Ok(mut seen) = submits.lock() {
                    seen.push(value.clone());
                }
            })
    }

    #[must_use]
    pub fn resets(&self) -> usize {
        self.resets.load(Ordering::Relaxed)
    }

    /// Values passed to the submit hook, in order.
    #[must_use]
    pub fn submits(&self) -> Vec<Value> {
        self.submits.lock().map(|s| s.clone()).unwrap_or_default()
    }
}
