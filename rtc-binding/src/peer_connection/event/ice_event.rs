use crate::peer_connection::candidate::RTCIceCandidateInit;

/// Payload of the `icecandidate` event.
///
/// A `None` candidate marks the end of candidate gathering.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct RTCPeerConnectionIceEvent {
    pub candidate: Option<RTCIceCandidateInit>,
}
