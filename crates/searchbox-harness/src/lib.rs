#![forbid(unsafe_code)]

//! Test harness and reference fixtures for the searchbox engine.
//!
//! [`HostSimulator`] plays the host page: it renders the component, keeps
//! the widget's reported value between passes, and reruns until the engine
//! stops asking. [`fixtures`] holds the reference lookups used across the
//! workspace's tests.

pub mod fixtures;
pub mod host;

pub use fixtures::{CountingLookup, HookRecorder, LookupProbe};
pub use host::{CycleReport, DEFAULT_MAX_PASSES, HarnessError, HostSimulator, host_passes_total};

use searchbox_runtime::{InteractionDispatcher, Lookup, ManualClock, SearchboxConfig};
use searchbox_web::SearchboxComponent;

/// Simulator on a manual clock, counting lookups and recording hooks.
pub fn simulate<L: Lookup>(
    config: SearchboxConfig,
    lookup: L,
) -> (HostSimulator<CountingLookup<L>, ManualClock>, LookupProbe, HookRecorder) {
    let counting = CountingLookup::new(lookup);
    let probe = counting.probe();
    let recorder = HookRecorder::new();
    let dispatcher = InteractionDispatcher::with_clock(config, counting, ManualClock::new())
        .with_hooks(recorder.hooks());
    (
        HostSimulator::new(SearchboxComponent::from_dispatcher(dispatcher)),
        probe,
        recorder,
    )
}
