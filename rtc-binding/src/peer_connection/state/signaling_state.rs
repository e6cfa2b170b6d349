use std::fmt;

use crate::peer_connection::configuration::UNSPECIFIED_STR;
use crate::translator::StateTable;

/// Indicates the state of the SDP offer/answer negotiation process.
///
/// The typical offer/answer exchange follows this pattern:
///
/// **Initiating Peer (Offerer):**
/// ```text
/// Stable → (set_local_description with offer) → HaveLocalOffer
///       → (set_remote_description with answer) → Stable
/// ```
///
/// **Responding Peer (Answerer):**
/// ```text
/// Stable → (set_remote_description with offer) → HaveRemoteOffer
///       → (set_local_description with answer) → Stable
/// ```
///
/// The transitions themselves are decided by the native engine. This binding
/// only reports the state the engine signals, and uses [`Closed`] as the
/// terminal state that tears down every data channel of the connection.
///
/// ## String Conversion
///
/// ```
/// use rtc_binding::peer_connection::state::RTCSignalingState;
///
/// let state = RTCSignalingState::HaveLocalOffer;
/// assert_eq!(state.to_string(), "have-local-offer");
///
/// let parsed: RTCSignalingState = "have-remote-offer".into();
/// assert_eq!(parsed, RTCSignalingState::HaveRemoteOffer);
/// ```
///
/// # Specifications
///
/// - [W3C RTCPeerConnection.signalingState]
/// - [RFC 3264] - Offer/Answer Model
///
/// [`Closed`]: RTCSignalingState::Closed
/// [W3C RTCPeerConnection.signalingState]: https://w3c.github.io/webrtc-pc/#dom-peerconnection-signaling-state
/// [RFC 3264]: https://datatracker.ietf.org/doc/html/rfc3264
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq)]
pub enum RTCSignalingState {
    /// State not specified. This should not occur in normal operation.
    #[default]
    Unspecified,

    /// No offer/answer exchange is in progress. This is the initial state.
    Stable,

    /// Local offer has been set, waiting for remote answer.
    HaveLocalOffer,

    /// Remote offer received, local provisional answer set.
    HaveLocalPranswer,

    /// Remote offer has been set, need to create local answer.
    HaveRemoteOffer,

    /// Local offer sent, remote provisional answer received.
    HaveRemotePranswer,

    /// The peer connection has been closed. This state is terminal.
    Closed,
}

/// Native signaling state codes, in the engine's order.
pub(crate) static SIGNALING_STATE_TABLE: StateTable<RTCSignalingState> = StateTable::new(
    "signaling state",
    &[
        RTCSignalingState::Stable,
        RTCSignalingState::HaveLocalOffer,
        RTCSignalingState::HaveLocalPranswer,
        RTCSignalingState::HaveRemoteOffer,
        RTCSignalingState::HaveRemotePranswer,
        RTCSignalingState::Closed,
    ],
);

const SIGNALING_STATE_STABLE_STR: &str = "stable";
const SIGNALING_STATE_HAVE_LOCAL_OFFER_STR: &str = "have-local-offer";
const SIGNALING_STATE_HAVE_REMOTE_OFFER_STR: &str = "have-remote-offer";
const SIGNALING_STATE_HAVE_LOCAL_PRANSWER_STR: &str = "have-local-pranswer";
const SIGNALING_STATE_HAVE_REMOTE_PRANSWER_STR: &str = "have-remote-pranswer";
const SIGNALING_STATE_CLOSED_STR: &str = "closed";

impl From<&str> for RTCSignalingState {
    fn from(raw: &str) -> Self {
        match raw {
            SIGNALING_STATE_STABLE_STR => RTCSignalingState::Stable,
            SIGNALING_STATE_HAVE_LOCAL_OFFER_STR => RTCSignalingState::HaveLocalOffer,
            SIGNALING_STATE_HAVE_REMOTE_OFFER_STR => RTCSignalingState::HaveRemoteOffer,
            SIGNALING_STATE_HAVE_LOCAL_PRANSWER_STR => RTCSignalingState::HaveLocalPranswer,
            SIGNALING_STATE_HAVE_REMOTE_PRANSWER_STR => RTCSignalingState::HaveRemotePranswer,
            SIGNALING_STATE_CLOSED_STR => RTCSignalingState::Closed,
            _ => RTCSignalingState::Unspecified,
        }
    }
}

impl fmt::Display for RTCSignalingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            RTCSignalingState::Stable => write!(f, "{SIGNALING_STATE_STABLE_STR}"),
            RTCSignalingState::HaveLocalOffer => {
                write!(f, "{SIGNALING_STATE_HAVE_LOCAL_OFFER_STR}")
            }
            RTCSignalingState::HaveRemoteOffer => {
                write!(f, "{SIGNALING_STATE_HAVE_REMOTE_OFFER_STR}")
            }
            RTCSignalingState::HaveLocalPranswer => {
                write!(f, "{SIGNALING_STATE_HAVE_LOCAL_PRANSWER_STR}")
            }
            RTCSignalingState::HaveRemotePranswer => {
                write!(f, "{SIGNALING_STATE_HAVE_REMOTE_PRANSWER_STR}")
            }
            RTCSignalingState::Closed => write!(f, "{SIGNALING_STATE_CLOSED_STR}"),
            _ => write!(f, "{UNSPECIFIED_STR}"),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::translator::TrackedState;

    #[test]
    fn test_new_signaling_state() {
        let tests = vec![
            ("Unspecified", RTCSignalingState::Unspecified),
            ("stable", RTCSignalingState::Stable),
            ("have-local-offer", RTCSignalingState::HaveLocalOffer),
            ("have-remote-offer", RTCSignalingState::HaveRemoteOffer),
            ("have-local-pranswer", RTCSignalingState::HaveLocalPranswer),
            (
                "have-remote-pranswer",
                RTCSignalingState::HaveRemotePranswer,
            ),
            ("closed", RTCSignalingState::Closed),
        ];

        for (state_string, expected_state) in tests {
            assert_eq!(RTCSignalingState::from(state_string), expected_state);
        }
    }

    #[test]
    fn test_signaling_state_string() {
        let tests = vec![
            (RTCSignalingState::Unspecified, "Unspecified"),
            (RTCSignalingState::Stable, "stable"),
            (RTCSignalingState::HaveLocalOffer, "have-local-offer"),
            (RTCSignalingState::HaveRemoteOffer, "have-remote-offer"),
            (RTCSignalingState::HaveLocalPranswer, "have-local-pranswer"),
            (
                RTCSignalingState::HaveRemotePranswer,
                "have-remote-pranswer",
            ),
            (RTCSignalingState::Closed, "closed"),
        ];

        for (state, expected_string) in tests {
            assert_eq!(state.to_string(), expected_string);
        }
    }

    #[test]
    fn test_signaling_state_table() {
        let tests = vec![
            (0, "stable"),
            (1, "have-local-offer"),
            (2, "have-local-pranswer"),
            (3, "have-remote-offer"),
            (4, "have-remote-pranswer"),
            (5, "closed"),
        ];

        // every named state except Unspecified has exactly one code
        assert_eq!(SIGNALING_STATE_TABLE.len(), tests.len());
        for (code, expected_string) in tests {
            let state = SIGNALING_STATE_TABLE.translate(code).unwrap();
            assert_eq!(state.to_string(), expected_string);
            assert_eq!(SIGNALING_STATE_TABLE.code_of(state), Some(code));
        }
        assert!(SIGNALING_STATE_TABLE.translate(6).is_err());
    }

    #[test]
    fn test_signaling_state_default() {
        assert_eq!(RTCSignalingState::default(), RTCSignalingState::Unspecified);

        // a fresh connection reads code 0 through the table
        let state = TrackedState::new(&SIGNALING_STATE_TABLE);
        assert_eq!(state.get(), RTCSignalingState::Stable);
    }
}
