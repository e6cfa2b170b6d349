pub mod ice_event;

use std::fmt;

use crate::data_channel::RTCDataChannel;
use crate::dispatcher::Event;
use crate::peer_connection::state::ice_connection_state::RTCIceConnectionState;
use crate::peer_connection::state::ice_gathering_state::RTCIceGatheringState;
use crate::peer_connection::state::peer_connection_state::RTCPeerConnectionState;
use crate::peer_connection::state::signaling_state::RTCSignalingState;
use ice_event::RTCPeerConnectionIceEvent;

#[allow(clippy::enum_variant_names)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RTCPeerConnectionEvent {
    OnNegotiationNeededEvent,
    OnIceCandidateEvent(RTCPeerConnectionIceEvent),
    OnSignalingStateChangeEvent(RTCSignalingState),
    OnIceConnectionStateChangeEvent(RTCIceConnectionState),
    OnIceGatheringStateChangeEvent(RTCIceGatheringState),
    OnConnectionStateChangeEvent(RTCPeerConnectionState),

    // A data channel opened by the remote peer.
    OnDataChannel(RTCDataChannel),
}

/// Names of the events an [`RTCPeerConnection`] dispatches.
///
/// [`RTCPeerConnection`]: crate::peer_connection::RTCPeerConnection
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum RTCPeerConnectionEventType {
    NegotiationNeeded,
    IceCandidate,
    SignalingStateChange,
    IceConnectionStateChange,
    IceGatheringStateChange,
    ConnectionStateChange,
    DataChannel,
}

impl Event for RTCPeerConnectionEvent {
    type Type = RTCPeerConnectionEventType;

    fn event_type(&self) -> RTCPeerConnectionEventType {
        match self {
            RTCPeerConnectionEvent::OnNegotiationNeededEvent => {
                RTCPeerConnectionEventType::NegotiationNeeded
            }
            RTCPeerConnectionEvent::OnIceCandidateEvent(_) => {
                RTCPeerConnectionEventType::IceCandidate
            }
            RTCPeerConnectionEvent::OnSignalingStateChangeEvent(_) => {
                RTCPeerConnectionEventType::SignalingStateChange
            }
            RTCPeerConnectionEvent::OnIceConnectionStateChangeEvent(_) => {
                RTCPeerConnectionEventType::IceConnectionStateChange
            }
            RTCPeerConnectionEvent::OnIceGatheringStateChangeEvent(_) => {
                RTCPeerConnectionEventType::IceGatheringStateChange
            }
            RTCPeerConnectionEvent::OnConnectionStateChangeEvent(_) => {
                RTCPeerConnectionEventType::ConnectionStateChange
            }
            RTCPeerConnectionEvent::OnDataChannel(_) => RTCPeerConnectionEventType::DataChannel,
        }
    }
}

const EVENT_NEGOTIATION_NEEDED_STR: &str = "negotiationneeded";
const EVENT_ICE_CANDIDATE_STR: &str = "icecandidate";
const EVENT_SIGNALING_STATE_CHANGE_STR: &str = "signalingstatechange";
const EVENT_ICE_CONNECTION_STATE_CHANGE_STR: &str = "iceconnectionstatechange";
const EVENT_ICE_GATHERING_STATE_CHANGE_STR: &str = "icegatheringstatechange";
const EVENT_CONNECTION_STATE_CHANGE_STR: &str = "connectionstatechange";
const EVENT_DATA_CHANNEL_STR: &str = "datachannel";

impl fmt::Display for RTCPeerConnectionEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            RTCPeerConnectionEventType::NegotiationNeeded => EVENT_NEGOTIATION_NEEDED_STR,
            RTCPeerConnectionEventType::IceCandidate => EVENT_ICE_CANDIDATE_STR,
            RTCPeerConnectionEventType::SignalingStateChange => EVENT_SIGNALING_STATE_CHANGE_STR,
            RTCPeerConnectionEventType::IceConnectionStateChange => {
                EVENT_ICE_CONNECTION_STATE_CHANGE_STR
            }
            RTCPeerConnectionEventType::IceGatheringStateChange => {
                EVENT_ICE_GATHERING_STATE_CHANGE_STR
            }
            RTCPeerConnectionEventType::ConnectionStateChange => {
                EVENT_CONNECTION_STATE_CHANGE_STR
            }
            RTCPeerConnectionEventType::DataChannel => EVENT_DATA_CHANNEL_STR,
        };
        write!(f, "{s}")
    }
}
