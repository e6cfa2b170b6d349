use std::fmt;

use crate::peer_connection::configuration::UNSPECIFIED_STR;
use crate::translator::StateTable;

/// Describes the state of local candidate gathering.
///
/// When gathering reaches [`Complete`] the connection also emits a final
/// `icecandidate` event without a candidate, marking the end of trickle.
///
/// [`Complete`]: RTCIceGatheringState::Complete
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq)]
pub enum RTCIceGatheringState {
    #[default]
    Unspecified,

    /// Any of the ICE transports are in the "new" gathering state and none
    /// of the transports are in the "gathering" state.
    New,

    /// Any of the ICE transports are gathering candidates.
    Gathering,

    /// All ICE transports finished gathering.
    Complete,
}

/// Native ICE gathering state codes, in the engine's order.
pub(crate) static ICE_GATHERING_STATE_TABLE: StateTable<RTCIceGatheringState> = StateTable::new(
    "ice gathering state",
    &[
        RTCIceGatheringState::New,
        RTCIceGatheringState::Gathering,
        RTCIceGatheringState::Complete,
    ],
);

const ICE_GATHERING_STATE_NEW_STR: &str = "new";
const ICE_GATHERING_STATE_GATHERING_STR: &str = "gathering";
const ICE_GATHERING_STATE_COMPLETE_STR: &str = "complete";

impl From<&str> for RTCIceGatheringState {
    fn from(raw: &str) -> Self {
        match raw {
            ICE_GATHERING_STATE_NEW_STR => RTCIceGatheringState::New,
            ICE_GATHERING_STATE_GATHERING_STR => RTCIceGatheringState::Gathering,
            ICE_GATHERING_STATE_COMPLETE_STR => RTCIceGatheringState::Complete,
            _ => RTCIceGatheringState::Unspecified,
        }
    }
}

impl fmt::Display for RTCIceGatheringState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            RTCIceGatheringState::New => write!(f, "{ICE_GATHERING_STATE_NEW_STR}"),
            RTCIceGatheringState::Gathering => write!(f, "{ICE_GATHERING_STATE_GATHERING_STR}"),
            RTCIceGatheringState::Complete => write!(f, "{ICE_GATHERING_STATE_COMPLETE_STR}"),
            _ => write!(f, "{UNSPECIFIED_STR}"),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_ice_gathering_state_string() {
        let tests = vec![
            (RTCIceGatheringState::Unspecified, "Unspecified"),
            (RTCIceGatheringState::New, "new"),
            (RTCIceGatheringState::Gathering, "gathering"),
            (RTCIceGatheringState::Complete, "complete"),
        ];

        for (state, expected_string) in tests {
            assert_eq!(state.to_string(), expected_string);
            assert_eq!(RTCIceGatheringState::from(expected_string), state);
        }
    }

    #[test]
    fn test_ice_gathering_state_table() {
        assert_eq!(ICE_GATHERING_STATE_TABLE.len(), 3);
        assert_eq!(
            ICE_GATHERING_STATE_TABLE.translate(2),
            Ok(RTCIceGatheringState::Complete)
        );
        assert!(ICE_GATHERING_STATE_TABLE.translate(3).is_err());
    }
}
