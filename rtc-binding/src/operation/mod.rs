//! Negotiation operations and the single-flight queue that sequences them.
//!
//! The native engine answers every negotiation operation with one of two
//! global completion signals that carry no request identity. Correlation
//! relies on at most one completion-awaiting operation being outstanding at
//! any time, so completions always belong to the in-flight [`Request`].

pub mod deferred;
pub mod queue;

use std::fmt;

use log::debug;
use shared::error::{Error, Result};

use crate::native::NativePeerConnection;
use crate::peer_connection::candidate::RTCIceCandidateInit;
use crate::peer_connection::configuration::offer_answer_options::{
    RTCAnswerOptions, RTCOfferOptions,
};
use crate::peer_connection::sdp::RTCSessionDescription;

pub use deferred::Deferred;
pub use queue::OperationQueue;

const WRONG_STATE_MESSAGE: &str = "Called in wrong state";
const DOES_NOT_MATCH_MESSAGE: &str = "does not match";

/// An operation that mutates the negotiation state of the native engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    CreateOffer(RTCOfferOptions),
    CreateAnswer(RTCAnswerOptions),
    SetLocalDescription(Option<RTCSessionDescription>),
    SetRemoteDescription(Option<RTCSessionDescription>),
    AddIceCandidate(Option<RTCIceCandidateInit>),
    RestartIce,
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::CreateOffer(_) => "create_offer",
            Operation::CreateAnswer(_) => "create_answer",
            Operation::SetLocalDescription(_) => "set_local_description",
            Operation::SetRemoteDescription(_) => "set_remote_description",
            Operation::AddIceCandidate(_) => "add_ice_candidate",
            Operation::RestartIce => "restart_ice",
        }
    }

    /// awaits_completion reports whether the engine answers this operation
    /// with a completion signal.
    pub fn awaits_completion(&self) -> bool {
        !matches!(self, Operation::RestartIce)
    }

    /// classify turns the engine's failure message into a typed error.
    pub fn classify(&self, message: String) -> Error {
        if message.contains(WRONG_STATE_MESSAGE) {
            Error::ErrInvalidState(message)
        } else if matches!(self, Operation::SetLocalDescription(_))
            && message.contains(DOES_NOT_MATCH_MESSAGE)
        {
            Error::ErrInvalidModification(message)
        } else {
            Error::ErrOperationFailed {
                operation: self.name(),
                reason: message,
            }
        }
    }

    /// dispatch starts the operation on the native engine.
    pub(crate) fn dispatch(&self, native: &mut dyn NativePeerConnection) {
        debug!("dispatch {}", self.name());
        match self {
            Operation::CreateOffer(options) => native.create_offer(options),
            Operation::CreateAnswer(options) => native.create_answer(options),
            Operation::SetLocalDescription(description) => {
                native.set_local_description(description.as_ref())
            }
            Operation::SetRemoteDescription(description) => {
                native.set_remote_description(description.as_ref())
            }
            Operation::AddIceCandidate(candidate) => native.add_ice_candidate(candidate.as_ref()),
            Operation::RestartIce => native.restart_ice(),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

pub type SuccessHandler = Box<dyn FnOnce(Option<String>)>;
pub type FailureHandler = Box<dyn FnOnce(Error)>;

/// A queued operation together with the handlers that receive its outcome.
///
/// Settling consumes the request, so exactly one of the two handlers runs
/// and it runs once.
pub struct Request {
    operation: Operation,
    awaits_completion: bool,
    on_success: SuccessHandler,
    on_failure: FailureHandler,
}

impl Request {
    pub fn new(
        operation: Operation,
        on_success: impl FnOnce(Option<String>) + 'static,
        on_failure: impl FnOnce(Error) + 'static,
    ) -> Self {
        Self {
            awaits_completion: operation.awaits_completion(),
            operation,
            on_success: Box::new(on_success),
            on_failure: Box::new(on_failure),
        }
    }

    pub fn operation(&self) -> &Operation {
        &self.operation
    }

    pub fn awaits_completion(&self) -> bool {
        self.awaits_completion
    }

    /// settle hands the outcome to the matching handler.
    pub fn settle(self, outcome: Result<Option<String>>) {
        match outcome {
            Ok(payload) => (self.on_success)(payload),
            Err(err) => (self.on_failure)(err),
        }
    }
}

impl fmt::Debug for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request")
            .field("operation", &self.operation)
            .field("awaits_completion", &self.awaits_completion)
            .finish()
    }
}

/// One of the engine's two global completion signals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    Succeeded(Option<String>),
    Failed(String),
}

/// A request whose outcome is known but whose handler has not run yet.
#[derive(Debug)]
pub struct Settlement {
    pub request: Request,
    pub outcome: Result<Option<String>>,
}

impl Settlement {
    pub fn settle(self) {
        self.request.settle(self.outcome)
    }
}
