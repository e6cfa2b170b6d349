use serde::{Deserialize, Serialize};
use shared::error::{Error, Result};

const STUN_SCHEME: &str = "stun:";
const STUNS_SCHEME: &str = "stuns:";
const TURN_SCHEME: &str = "turn:";
const TURNS_SCHEME: &str = "turns:";

/// Describes a single STUN or TURN server the native engine may use to
/// establish a connection with a peer.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RTCIceServer {
    pub urls: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub username: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub credential: String,
}

impl RTCIceServer {
    /// validate checks every url carries a known scheme and that TURN
    /// servers come with credentials.
    pub fn validate(&self) -> Result<()> {
        if self.urls.is_empty() {
            return Err(Error::ErrNoIceServerUrl);
        }

        for url in &self.urls {
            if url.starts_with(TURN_SCHEME) || url.starts_with(TURNS_SCHEME) {
                if self.username.is_empty() || self.credential.is_empty() {
                    return Err(Error::ErrNoTurnCredentials(url.clone()));
                }
            } else if !(url.starts_with(STUN_SCHEME) || url.starts_with(STUNS_SCHEME)) {
                return Err(Error::ErrInvalidIceServerUrl(url.clone()));
            }

            // a scheme alone does not name a server
            if url.split_once(':').is_none_or(|(_, host)| host.is_empty()) {
                return Err(Error::ErrInvalidIceServerUrl(url.clone()));
            }
        }

        Ok(())
    }
}
