#![forbid(unsafe_code)]

//! Caller callbacks fired by the dispatcher.

use searchbox_core::Value;

type ResetHook = Box<dyn FnMut()>;
type SubmitHook = Box<dyn FnMut(&Value)>;

/// Optional callbacks for reset and submit.
///
/// `on_reset` fires on every reset event. `on_submit` fires once per submit
/// that changes the committed result, with the new result.
#[derive(Default)]
pub struct Hooks {
    on_reset: Option<ResetHook>,
    on_submit: Option<SubmitHook>,
}

impl Hooks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn on_reset(mut self, f: impl FnMut() + 'static) -> Self {
        self.on_reset = Some(Box::new(f));
        self
    }

    #[must_use]
    pub fn on_submit(mut self, f: impl FnMut(&Value) + 'static) -> Self {
        self.on_submit = Some(Box::new(f));
        self
    }

    pub(crate) fn fire_reset(&mut self) {
        if let Some(hook) = self.on_reset.as_mut() {
            hook();
        }
    }

    pub(crate) fn fire_submit(&mut self, value: &Value) {
        if let Some(hook) = self.on_submit.as_mut() {
            hook(value);
        }
    }
}

impl std::fmt::Debug for Hooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hooks")
            .field("on_reset", &self.on_reset.is_some())
            .field("on_submit", &self.on_submit.is_some())
            .finish()
    }
}
