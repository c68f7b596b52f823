//! # devbridge protocol
//!
//! Typed bindings for the Chrome DevTools Protocol domains devbridge speaks.
//!
//! Every command is a `...Params` struct implementing [`Command`], which ties
//! it to its wire method name and its `...Returns` type. Every event payload
//! is an `Event...` struct implementing [`Event`]. Required fields are plain
//! struct fields (and constructor arguments); optional fields are `Option`s
//! that are left out of the serialized JSON when unset.
//!
//! [`CdpEvent`] is the closed sum of every bound event, with an `Unknown`
//! arm for anything else the browser sends.

use serde::{Deserialize, Serialize, de::DeserializeOwned};

#[macro_use]
mod macros;

pub mod animation;
pub mod browser;
pub mod database;
pub mod debugger;
pub mod dom;
pub mod dom_snapshot;
pub mod heap_profiler;
pub mod indexed_db;
pub mod layer_tree;
pub mod page;
pub mod profiler;
pub mod runtime;
pub mod service_worker;
pub mod target;

mod domain;
mod events;

pub use domain::Domain;
pub use events::CdpEvent;

/// A protocol command: parameters plus the method they are sent under.
pub trait Command: Serialize + Send + 'static {
    /// Wire name, `"Domain.command"`.
    const METHOD: &'static str;
    /// What a successful reply deserializes into.
    type Response: DeserializeOwned + Send + 'static;
}

/// A protocol event payload.
pub trait Event: DeserializeOwned + Send + 'static {
    /// Wire name, `"Domain.event"`.
    const METHOD: &'static str;
}

/// Returns of commands that reply with an empty object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmptyReturns {}

/// Splits `"Domain.name"` into its two halves.
pub fn split_method(method: &str) -> Option<(&str, &str)> {
    method.split_once('.')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_returns_reads_empty_object() {
        let parsed: EmptyReturns = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed, EmptyReturns {});
    }

    #[test]
    fn split_method_halves() {
        assert_eq!(
            split_method("Animation.animationStarted"),
            Some(("Animation", "animationStarted"))
        );
        assert_eq!(split_method("noDomain"), None);
    }
}
