use serde::{Deserialize, Serialize};

/// RTCIceCandidateInit is used to serialize ice candidates exchanged with
/// the remote peer.
///
/// Candidates discovered by the native engine arrive as
/// `(candidate, sdp_mid, sdp_mline_index)` and are surfaced through the
/// `icecandidate` event in this shape.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RTCIceCandidateInit {
    pub candidate: String,
    pub sdp_mid: Option<String>,
    #[serde(rename = "sdpMLineIndex")]
    pub sdp_mline_index: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username_fragment: Option<String>,
}
