//! Boundary to the native connection engine.
//!
//! The engine exposes synchronous, fire-and-forget methods. Results of the
//! negotiation methods come back later as one of two global completion
//! signals, [`NativeSignal::Succeeded`] or [`NativeSignal::Failed`], which
//! carry no request identity. Every other engine notification is a
//! [`NativeSignal`] as well and is fed to
//! [`RTCPeerConnection::handle_signal`] one at a time.
//!
//! [`RTCPeerConnection::handle_signal`]: crate::peer_connection::RTCPeerConnection::handle_signal

use std::fmt;

use shared::error::Result;

use crate::data_channel::init::RTCDataChannelInit;
use crate::data_channel::message::RTCDataChannelMessage;
use crate::peer_connection::candidate::RTCIceCandidateInit;
use crate::peer_connection::configuration::RTCConfiguration;
use crate::peer_connection::configuration::offer_answer_options::{
    RTCAnswerOptions, RTCOfferOptions,
};
use crate::peer_connection::sdp::RTCSessionDescription;
use crate::translator::StateCode;

/// Creates native peer connections.
pub trait NativeFactory {
    fn create_peer_connection(
        &self,
        configuration: &RTCConfiguration,
    ) -> Result<Box<dyn NativePeerConnection>>;
}

/// A native peer connection handle.
///
/// The five negotiation methods only start the operation; each one is
/// answered by exactly one completion signal. A description or candidate
/// the caller left out is passed as `None`; the engine either applies its
/// default (an implicit local description, end of remote candidates) or
/// answers with a failure.
pub trait NativePeerConnection {
    fn create_offer(&mut self, options: &RTCOfferOptions);
    fn create_answer(&mut self, options: &RTCAnswerOptions);
    fn set_local_description(&mut self, description: Option<&RTCSessionDescription>);
    fn set_remote_description(&mut self, description: Option<&RTCSessionDescription>);
    fn add_ice_candidate(&mut self, candidate: Option<&RTCIceCandidateInit>);

    /// restart_ice marks the next offer as an ICE restart. It is not answered
    /// by a completion signal.
    fn restart_ice(&mut self);

    /// create_data_channel is synchronous and returns `None` when the engine
    /// is already shutting down.
    fn create_data_channel(
        &mut self,
        label: &str,
        init: &RTCDataChannelInit,
    ) -> Option<Box<dyn NativeDataChannel>>;

    fn local_description(&self) -> Option<RTCSessionDescription>;
    fn current_local_description(&self) -> Option<RTCSessionDescription>;
    fn pending_local_description(&self) -> Option<RTCSessionDescription>;
    fn remote_description(&self) -> Option<RTCSessionDescription>;
    fn current_remote_description(&self) -> Option<RTCSessionDescription>;
    fn pending_remote_description(&self) -> Option<RTCSessionDescription>;

    /// can_trickle_ice_candidates is `None` until a remote description is
    /// set.
    fn can_trickle_ice_candidates(&self) -> Option<bool>;

    /// set_configuration applies a new configuration, failing with a message
    /// when the engine cannot modify the running connection.
    fn set_configuration(&mut self, configuration: &RTCConfiguration)
    -> std::result::Result<(), String>;

    fn close(&mut self);
}

/// A native data channel handle.
pub trait NativeDataChannel {
    fn label(&self) -> String;
    fn id(&self) -> Option<u16>;
    fn protocol(&self) -> String;
    fn ready_state(&self) -> StateCode;
    fn binary_type(&self) -> StateCode;
    fn set_binary_type(&mut self, binary_type: StateCode);
    fn buffered_amount(&self) -> u64;
    fn send(&mut self, message: &RTCDataChannelMessage) -> std::result::Result<(), String>;

    /// close starts the closing handshake.
    fn close(&mut self);

    /// shutdown releases the native channel immediately, without a closing
    /// handshake. It is called at most once per handle.
    fn shutdown(&mut self);
}

/// A notification from the native engine.
pub enum NativeSignal {
    /// The in-flight operation succeeded, with an optional SDP payload.
    Succeeded(Option<String>),
    /// The in-flight operation failed with the engine's message.
    Failed(String),
    IceCandidate(RTCIceCandidateInit),
    SignalingStateChange(StateCode),
    IceConnectionStateChange(StateCode),
    IceGatheringStateChange(StateCode),
    ConnectionStateChange(StateCode),
    NegotiationNeeded,
    /// The remote peer opened a data channel.
    DataChannel(Box<dyn NativeDataChannel>),
    DataChannelStateChange {
        label: String,
        state: StateCode,
    },
    DataChannelMessage {
        label: String,
        message: RTCDataChannelMessage,
    },
    DataChannelError {
        label: String,
        error: String,
    },
}

impl fmt::Debug for NativeSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NativeSignal::Succeeded(payload) => f
                .debug_tuple("Succeeded")
                .field(&payload.as_ref().map(|p| p.len()))
                .finish(),
            NativeSignal::Failed(message) => f.debug_tuple("Failed").field(message).finish(),
            NativeSignal::IceCandidate(candidate) => {
                f.debug_tuple("IceCandidate").field(candidate).finish()
            }
            NativeSignal::SignalingStateChange(code) => {
                f.debug_tuple("SignalingStateChange").field(code).finish()
            }
            NativeSignal::IceConnectionStateChange(code) => f
                .debug_tuple("IceConnectionStateChange")
                .field(code)
                .finish(),
            NativeSignal::IceGatheringStateChange(code) => f
                .debug_tuple("IceGatheringStateChange")
                .field(code)
                .finish(),
            NativeSignal::ConnectionStateChange(code) => {
                f.debug_tuple("ConnectionStateChange").field(code).finish()
            }
            NativeSignal::NegotiationNeeded => write!(f, "NegotiationNeeded"),
            NativeSignal::DataChannel(handle) => {
                f.debug_tuple("DataChannel").field(&handle.label()).finish()
            }
            NativeSignal::DataChannelStateChange { label, state } => f
                .debug_struct("DataChannelStateChange")
                .field("label", label)
                .field("state", state)
                .finish(),
            NativeSignal::DataChannelMessage { label, message } => f
                .debug_struct("DataChannelMessage")
                .field("label", label)
                .field("len", &message.data.len())
                .finish(),
            NativeSignal::DataChannelError { label, error } => f
                .debug_struct("DataChannelError")
                .field("label", label)
                .field("error", error)
                .finish(),
        }
    }
}
