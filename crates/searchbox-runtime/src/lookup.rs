#![forbid(unsafe_code)]

//! Caller-supplied lookup functions.
//!
//! A lookup maps a search term (plus a map of extra named arguments) to an
//! optional list of [`Item`]s. `None` means "no results" and is treated as
//! an empty list. A lookup may block; the dispatcher does not time it out.
//!
//! # Adapters
//!
//! - Any `FnMut(&str, &LookupArgs) -> Result<Option<Vec<Item>>, LookupError>`
//!   is a [`Lookup`].
//! - [`from_fn`] wraps an infallible closure that ignores the extra
//!   arguments.
//! - [`JsonLookup`] wraps a closure that returns raw JSON and rejects shapes
//!   that are not a list or `null`.

use std::collections::BTreeMap;
use std::error::Error;

use searchbox_core::{Item, MalformedResult, Value, items_from_json};

/// Extra named arguments forwarded verbatim to every lookup call.
pub type LookupArgs = BTreeMap<String, Value>;

/// Result type of a lookup call.
pub type LookupResult = Result<Option<Vec<Item>>, LookupError>;

/// A lookup call failed.
#[derive(Debug)]
pub enum LookupError {
    /// The caller's function reported an error.
    Failed(Box<dyn Error + Send + Sync>),
    /// The caller's function returned something other than a list or `null`.
    Malformed(MalformedResult),
}

impl LookupError {
    /// Wrap any error raised by a lookup.
    pub fn failed(err: impl Into<Box<dyn Error + Send + Sync>>) -> Self {
        Self::Failed(err.into())
    }
}

impl core::fmt::Display for LookupError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Failed(err) => write!(f, "lookup failed: {err}"),
            Self::Malformed(err) => write!(f, "{err}"),
        }
    }
}

impl Error for LookupError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Failed(err) => Some(err.as_ref()),
            Self::Malformed(err) => Some(err),
        }
    }
}

impl From<MalformedResult> for LookupError {
    fn from(err: MalformedResult) -> Self {
        Self::Malformed(err)
    }
}

/// Produces suggestions for a search term.
pub trait Lookup {
    fn lookup(&mut self, term: &str, args: &LookupArgs) -> LookupResult;
}

impl<F> Lookup for F
where
    F: FnMut(&str, &LookupArgs) -> LookupResult,
{
    fn lookup(&mut self, term: &str, args: &LookupArgs) -> LookupResult {
        self(term, args)
    }
}

/// Lookup built from an infallible closure of the term alone.
#[derive(Debug, Clone)]
pub struct FnLookup<F>(F);

/// Wrap `f` as a [`Lookup`] that ignores extra arguments and never fails.
pub fn from_fn<F>(f: F) -> FnLookup<F>
where
    F: FnMut(&str) -> Option<Vec<Item>>,
{
    FnLookup(f)
}

impl<F> Lookup for FnLookup<F>
where
    F: FnMut(&str) -> Option<Vec<Item>>,
{
    fn lookup(&mut self, term: &str, _args: &LookupArgs) -> LookupResult {
        Ok((self.0)(term))
    }
}

/// Lookup built from a closure returning raw JSON.
///
/// Each element goes through [`Item::from_json`]: `["label", value]` pairs
/// need a string label, so numeric labels must be sent as
/// `{"label": 1, "value": ..}`.
#[derive(Debug, Clone)]
pub struct JsonLookup<F>(F);

impl<F> JsonLookup<F>
where
    F: FnMut(&str, &LookupArgs) -> Result<Value, LookupError>,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> Lookup for JsonLookup<F>
where
    F: FnMut(&str, &LookupArgs) -> Result<Value, LookupError>,
{
    fn lookup(&mut self, term: &str, args: &LookupArgs) -> LookupResult {
        let raw = (self.0)(term, args)?;
        Ok(Some(items_from_json(raw)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn run(lookup: &mut impl Lookup, term: &str) -> LookupResult {
        lookup.lookup(term, &LookupArgs::new())
    }

    #[test]
    fn closures_are_lookups() {
        let mut lookup = |term: &str, _: &LookupArgs| -> LookupResult {
            Ok(Some(vec![Item::bare(term)]))
        };
        assert_eq!(run(&mut lookup, "x").unwrap(), Some(vec![Item::bare("x")]));
    }

    #[test]
    fn from_fn_ignores_args() {
        let mut lookup = from_fn(|term: &str| {
            if term.is_empty() {
                None
            } else {
                Some((0..3).map(|i| Item::bare(format!("{term}_{i}"))).collect())
            }
        });
        assert_eq!(run(&mut lookup, "").unwrap(), None);
        assert_eq!(run(&mut lookup, "a").unwrap().unwrap().len(), 3);
    }

    #[test]
    fn args_are_forwarded() {
        let mut lookup = |term: &str, args: &LookupArgs| -> LookupResult {
            Ok(Some(vec![Item::bare(format!("{term}_{}", args.len()))]))
        };
        let mut args = LookupArgs::new();
        args.insert("a".into(), json!(1));
        args.insert("b".into(), json!("two"));
        let items = lookup.lookup("t", &args).unwrap().unwrap();
        assert_eq!(items, vec![Item::bare("t_2")]);
    }

    #[test]
    fn json_lookup_accepts_null_and_lists() {
        let mut lookup = JsonLookup::new(|term: &str, _: &LookupArgs| {
            Ok(if term == "none" {
                Value::Null
            } else {
                json!([["Title A", 101], ["Title B", 202]])
            })
        });
        assert_eq!(run(&mut lookup, "none").unwrap(), Some(Vec::new()));
        let items = run(&mut lookup, "t").unwrap().unwrap();
        assert_eq!(items[1], Item::labeled("Title B", 202));
    }

    #[test]
    fn json_lookup_numeric_labels_use_object_form() {
        let mut lookup = JsonLookup::new(|_: &str, _: &LookupArgs| {
            Ok(json!([[1, "one"], {"label": 2, "value": "two"}]))
        });
        let items = run(&mut lookup, "t").unwrap().unwrap();
        assert_eq!(items[0], Item::bare(json!([1, "one"])));
        assert_eq!(items[1], Item::labeled(2, "two"));
    }

    #[test]
    fn json_lookup_rejects_scalars() {
        let mut lookup = JsonLookup::new(|_: &str, _: &LookupArgs| Ok(json!(42)));
        let err = run(&mut lookup, "t").unwrap_err();
        assert!(matches!(err, LookupError::Malformed(ref m) if m.found == "number"));
    }

    #[test]
    fn failure_keeps_source() {
        let err = LookupError::failed("backend down");
        assert_eq!(err.to_string(), "lookup failed: backend down");
        assert!(err.source().is_some());
    }
}
