#![forbid(unsafe_code)]

//! Wire-level behavior of the component, driven only through JSON text.

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde_json::{Value, json};

use searchbox_core::{Item, SessionStore};
use searchbox_runtime::{
    EditAfterSubmit, InteractionDispatcher, LookupArgs, LookupResult, ManualClock, Rerun,
    RerunScope, SearchboxConfig,
};
use searchbox_web::{SearchboxComponent, encode_bridge_event, parse_bridge_event};

fn titles(_term: &str, _args: &LookupArgs) -> LookupResult {
    Ok(Some(vec![
        Item::labeled("Title A", 101),
        Item::labeled("Title B", 202),
    ]))
}

fn props_json(rendered: &searchbox_web::Rendered) -> Value {
    serde_json::from_str(&rendered.props.to_json().unwrap()).unwrap()
}

#[test]
fn full_select_cycle_over_json() {
    let mut store = SessionStore::new();
    let config = SearchboxConfig::new("titles")
        .with_edit_after_submit(EditAfterSubmit::Concat)
        .with_rerun_scope(RerunScope::Fragment);
    let mut component = SearchboxComponent::from_dispatcher(InteractionDispatcher::with_clock(
        config,
        titles,
        ManualClock::new(),
    ));

    let first = component.render(&mut store, None).unwrap();
    assert_eq!(props_json(&first)["editAfterSubmit"], json!("concat"));

    let typed = component
        .render(&mut store, Some(r#"{"interaction":"search","value":"ti"}"#))
        .unwrap();
    assert_eq!(typed.rerun, Rerun::Request(RerunScope::Fragment));

    let shown = component.render(&mut store, Some("null")).unwrap();
    assert_eq!(
        props_json(&shown)["options"],
        json!([{"label": "Title A", "value": 0}, {"label": "Title B", "value": 1}])
    );

    let chosen = component
        .render(&mut store, Some(r#"{"interaction":"submit","value":1}"#))
        .unwrap();
    assert_eq!(chosen.value, json!(202));
    assert_eq!(
        EditAfterSubmit::Concat.preload_term("ti", &shown.props.options[1].label),
        "tiTitle B"
    );
}

#[test]
fn reset_over_json_changes_key() {
    let mut store = SessionStore::new();
    let mut component = SearchboxComponent::from_dispatcher(InteractionDispatcher::with_clock(
        SearchboxConfig::new("r").with_default("none yet"),
        titles,
        ManualClock::new(),
    ));
    let before = component.render(&mut store, None).unwrap();
    let reset = component
        .render(&mut store, Some(r#"{"interaction":"reset","value":null}"#))
        .unwrap();
    assert_eq!(reset.value, json!("none yet"));
    let after = component.render(&mut store, None).unwrap();
    assert_ne!(before.props.key, after.props.key);
}

proptest! {
    #[test]
    fn parser_never_panics(raw in ".{0,64}") {
        let _ = parse_bridge_event(&raw);
    }

    #[test]
    fn search_terms_survive_the_wire(term in ".{0,32}") {
        let ev = searchbox_core::Interaction::Search(term);
        let wire = encode_bridge_event(Some(&ev)).to_string();
        prop_assert_eq!(parse_bridge_event(&wire).unwrap(), Some(ev));
    }
}
