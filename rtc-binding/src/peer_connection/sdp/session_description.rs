use std::fmt::Display;

use serde::{Deserialize, Serialize};

use super::sdp_type::RTCSdpType;

/// A session description as exchanged with the remote peer.
///
/// The `sdp` payload is opaque to this crate; it is produced and consumed by
/// the native engine.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RTCSessionDescription {
    #[serde(rename = "type")]
    pub sdp_type: RTCSdpType,

    pub sdp: String,
}

impl Display for RTCSessionDescription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "type: {}, sdp:\n{}",
            self.sdp_type,
            self.sdp.replace("\r\n", "\n")
        )
    }
}

impl RTCSessionDescription {
    pub fn offer(sdp: String) -> RTCSessionDescription {
        RTCSessionDescription {
            sdp_type: RTCSdpType::Offer,
            sdp,
        }
    }

    pub fn answer(sdp: String) -> RTCSessionDescription {
        RTCSessionDescription {
            sdp_type: RTCSdpType::Answer,
            sdp,
        }
    }

    pub fn pranswer(sdp: String) -> RTCSessionDescription {
        RTCSessionDescription {
            sdp_type: RTCSdpType::Pranswer,
            sdp,
        }
    }
}
