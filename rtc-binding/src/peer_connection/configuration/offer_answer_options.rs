use serde::{Deserialize, Serialize};

/// Options passed to `create_answer`.
#[derive(Default, Debug, PartialEq, Eq, Copy, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RTCAnswerOptions {
    /// Whether voice activity detection is requested for audio sessions.
    pub voice_activity_detection: bool,
}

/// Options passed to `create_offer`.
#[derive(Default, Debug, PartialEq, Eq, Copy, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RTCOfferOptions {
    /// Whether the offer restarts ICE, generating new credentials.
    pub ice_restart: bool,
    pub offer_to_receive_audio: bool,
    pub offer_to_receive_video: bool,
}
