#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use searchbox_core::{Interaction, Item, SessionStore, Value};
use searchbox_runtime::{DispatchError, InteractionDispatcher, ManualClock, SearchboxConfig, from_fn};

#[derive(Debug, Arbitrary)]
enum Op {
    Search(String),
    Select(u16),
    Literal(String),
    Reset,
    Idle,
    Remove,
}

#[derive(Debug, Arbitrary)]
struct Input {
    clear_on_submit: bool,
    rerun_on_update: bool,
    use_searchterm: bool,
    ops: Vec<Op>,
}

fn lookup(term: &str) -> Option<Vec<Item>> {
    let n = term.chars().count() % 7;
    if n == 0 {
        return None;
    }
    Some(
        (0..n)
            .map(|i| {
                if i % 2 == 0 {
                    Item::bare(format!("{term}{i}"))
                } else {
                    Item::labeled(i, format!("{term}#{i}"))
                }
            })
            .collect(),
    )
}

fuzz_target!(|input: Input| {
    let config = SearchboxConfig::new("fuzz")
        .with_clear_on_submit(input.clear_on_submit)
        .with_rerun_on_update(input.rerun_on_update)
        .with_default_use_searchterm(input.use_searchterm);
    let mut dispatcher =
        InteractionDispatcher::with_clock(config, from_fn(lookup), ManualClock::new());
    let mut store = SessionStore::new();

    for op in input.ops.into_iter().take(64) {
        let event = match op {
            Op::Search(term) => Some(Interaction::Search(term)),
            Op::Select(i) => Some(Interaction::select(usize::from(i))),
            Op::Literal(text) => Some(Interaction::Submit(Value::from(text))),
            Op::Reset => Some(Interaction::Reset),
            Op::Idle => None,
            Op::Remove => {
                store.remove("fuzz");
                let out = dispatcher
                    .dispatch_existing(&mut store, Some(Interaction::Reset))
                    .expect("missing record is benign");
                assert!(!out.rerun.is_requested());
                continue;
            }
        };

        match dispatcher.dispatch(&mut store, event) {
            Ok(_) | Err(DispatchError::StaleIndex { .. } | DispatchError::MalformedEvent(_)) => {}
            Err(other) => panic!("unexpected dispatch error: {other}"),
        }

        let session = store.get("fuzz").expect("record exists after dispatch");
        assert_eq!(session.options_display().len(), session.options_native().len());
        for (i, option) in session.options_display().iter().enumerate() {
            assert_eq!(option.index, i);
        }
    }
});
