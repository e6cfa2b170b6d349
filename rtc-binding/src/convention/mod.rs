//! The two public calling conventions of the negotiation operations.
//!
//! Each negotiation operation accepts a list of [`Argument`]s in one of two
//! shapes:
//!
//! - `[]` or `[value]`: the call returns a [`Deferred`] result;
//! - `[on_success, on_failure]` or `[on_success, on_failure, value]`: the
//!   handlers receive the outcome and the call returns nothing.
//!
//! Any other shape is rejected before the engine or the queue is touched.

use log::trace;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use shared::error::{Error, Result};

use crate::operation::{Deferred, Operation, Request};

/// One argument of a negotiation call.
pub enum Argument<T> {
    /// Options, description or candidate, in their JSON shape.
    Value(Value),
    OnSuccess(Box<dyn FnOnce(T)>),
    OnFailure(Box<dyn FnOnce(Error)>),
}

impl<T> Argument<T> {
    /// value serializes `value` into an argument.
    pub fn value(value: impl Serialize) -> Result<Self> {
        Ok(Argument::Value(serde_json::to_value(value)?))
    }

    pub fn on_success(handler: impl FnOnce(T) + 'static) -> Self {
        Argument::OnSuccess(Box::new(handler))
    }

    pub fn on_failure(handler: impl FnOnce(Error) + 'static) -> Self {
        Argument::OnFailure(Box::new(handler))
    }
}

impl<T> From<Value> for Argument<T> {
    fn from(value: Value) -> Self {
        Argument::Value(value)
    }
}

/// A call whose argument shape has been recognized.
pub(crate) enum Invocation<T> {
    Deferred {
        value: Option<Value>,
    },
    Handlers {
        on_success: Box<dyn FnOnce(T)>,
        on_failure: Box<dyn FnOnce(Error)>,
        value: Option<Value>,
    },
}

impl<T: 'static> Invocation<T> {
    pub(crate) fn parse(operation: &'static str, args: Vec<Argument<T>>) -> Result<Self> {
        let mut args = args.into_iter();
        let invocation = match (args.next(), args.next(), args.next(), args.next()) {
            (None, None, None, None) => Invocation::Deferred { value: None },
            (Some(Argument::Value(value)), None, None, None) => Invocation::Deferred {
                value: Some(value),
            },
            (
                Some(Argument::OnSuccess(on_success)),
                Some(Argument::OnFailure(on_failure)),
                value,
                None,
            ) => {
                let value = match value {
                    None => None,
                    Some(Argument::Value(value)) => Some(value),
                    Some(_) => return Err(Error::ErrInvalidArguments { operation }),
                };
                Invocation::Handlers {
                    on_success,
                    on_failure,
                    value,
                }
            }
            _ => return Err(Error::ErrInvalidArguments { operation }),
        };
        Ok(invocation)
    }

    fn value(&self) -> Option<&Value> {
        match self {
            Invocation::Deferred { value } | Invocation::Handlers { value, .. } => value.as_ref(),
        }
    }

    /// optional deserializes the value, falling back to the default when the
    /// call carried none.
    pub(crate) fn optional<V: DeserializeOwned + Default>(
        &self,
        operation: &'static str,
    ) -> Result<V> {
        match self.value() {
            None | Some(Value::Null) => Ok(V::default()),
            Some(value) => deserialize(operation, value),
        }
    }

    /// optional_value deserializes the value, or returns `None` when the call
    /// carried none.
    pub(crate) fn optional_value<V: DeserializeOwned>(
        &self,
        operation: &'static str,
    ) -> Result<Option<V>> {
        match self.value() {
            None | Some(Value::Null) => Ok(None),
            Some(value) => deserialize(operation, value).map(Some),
        }
    }

    /// into_request builds the queued request. `map` turns the engine's raw
    /// success payload into the caller's result.
    pub(crate) fn into_request(
        self,
        operation: Operation,
        map: impl FnOnce(Option<String>) -> T + 'static,
    ) -> (Request, Option<Deferred<T>>) {
        trace!("{} invoked with {} convention", operation, self.name());
        match self {
            Invocation::Deferred { .. } => {
                let (deferred, on_success, on_failure) = Deferred::channel();
                let request = Request::new(
                    operation,
                    move |payload| on_success(map(payload)),
                    on_failure,
                );
                (request, Some(deferred))
            }
            Invocation::Handlers {
                on_success,
                on_failure,
                ..
            } => {
                let request = Request::new(
                    operation,
                    move |payload| on_success(map(payload)),
                    on_failure,
                );
                (request, None)
            }
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Invocation::Deferred { .. } => "deferred",
            Invocation::Handlers { .. } => "handler",
        }
    }
}

fn deserialize<V: DeserializeOwned>(operation: &'static str, value: &Value) -> Result<V> {
    serde_json::from_value(value.clone()).map_err(|err| Error::ErrInvalidValue {
        operation,
        reason: err.to_string(),
    })
}
