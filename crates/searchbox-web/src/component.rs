#![forbid(unsafe_code)]

//! One widget cycle, end to end.
//!
//! [`SearchboxComponent::render`] is what a host calls once per widget per
//! render pass:
//!
//! 1. make sure the session record exists,
//! 2. build props from the record as it stands at the start of the cycle,
//! 3. parse whatever the widget reported,
//! 4. dispatch it and report the resulting value and rerun signal.
//!
//! Props reflect the state before the event. A mutation that must become
//! visible comes with a rerun request, and the next pass renders it.

use searchbox_core::{Interaction, SessionStore, Value};
use searchbox_runtime::{
    Clock, InteractionDispatcher, Lookup, Rerun, SearchboxConfig, SystemClock,
};

use crate::BridgeError;
use crate::event::{parse_bridge_event, parse_bridge_value};
use crate::props::BridgeProps;

/// What one cycle produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Rendered {
    /// Props to hand to the widget.
    pub props: BridgeProps,
    /// Value returned to the caller's code.
    pub value: Value,
    pub rerun: Rerun,
}

/// A searchbox bound to its configuration and lookup.
#[derive(Debug)]
pub struct SearchboxComponent<L, C = SystemClock> {
    dispatcher: InteractionDispatcher<L, C>,
}

impl<L: Lookup> SearchboxComponent<L, SystemClock> {
    #[must_use]
    pub fn new(config: SearchboxConfig, lookup: L) -> Self {
        Self::from_dispatcher(InteractionDispatcher::new(config, lookup))
    }
}

impl<L: Lookup, C: Clock> SearchboxComponent<L, C> {
    #[must_use]
    pub fn from_dispatcher(dispatcher: InteractionDispatcher<L, C>) -> Self {
        Self { dispatcher }
    }

    #[must_use]
    pub fn dispatcher(&self) -> &InteractionDispatcher<L, C> {
        &self.dispatcher
    }

    pub fn dispatcher_mut(&mut self) -> &mut InteractionDispatcher<L, C> {
        &mut self.dispatcher
    }

    /// Run one cycle with the widget's raw JSON report, if any.
    pub fn render(
        &mut self,
        store: &mut SessionStore,
        inbound: Option<&str>,
    ) -> Result<Rendered, BridgeError> {
        let props = self.props(store);
        let event = match inbound {
            Some(json) => parse_bridge_event(json)?,
            None => None,
        };
        self.finish(store, props, event)
    }

    /// Run one cycle with a report that was already decoded.
    pub fn render_value(
        &mut self,
        store: &mut SessionStore,
        inbound: Value,
    ) -> Result<Rendered, BridgeError> {
        let props = self.props(store);
        let event = parse_bridge_value(inbound)?;
        self.finish(store, props, event)
    }

    fn props(&self, store: &mut SessionStore) -> BridgeProps {
        let session = store.get_or_init(self.dispatcher.key(), self.dispatcher.seed());
        BridgeProps::from_session(self.dispatcher.config(), session)
    }

    fn finish(
        &mut self,
        store: &mut SessionStore,
        props: BridgeProps,
        event: Option<Interaction>,
    ) -> Result<Rendered, BridgeError> {
        #[cfg(feature = "tracing")]
        tracing::debug!(
            target: "searchbox.web",
            key = %props.key,
            options = props.options.len(),
            event = event.as_ref().map_or("none", |e| e.kind().as_str()),
            "component cycle"
        );
        let outcome = self.dispatcher.dispatch(store, event)?;
        Ok(Rendered {
            props,
            value: outcome.value,
            rerun: outcome.rerun,
        })
    }
}
