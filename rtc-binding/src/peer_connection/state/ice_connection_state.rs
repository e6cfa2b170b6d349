use std::fmt;

use crate::peer_connection::configuration::UNSPECIFIED_STR;
use crate::translator::StateTable;

/// Indicates the state of the ICE connection.
///
/// `RTCIceConnectionState` describes the liveness of the transport path the
/// native engine is establishing between the peers.
///
/// # State Transitions
///
/// The ICE connection typically progresses through these states:
///
/// 1. **New** - Initial state, no connectivity checks yet
/// 2. **Checking** - candidate pairs are being checked
/// 3. **Connected** - at least one working candidate pair found
/// 4. **Completed** - all candidate pairs have been checked
///
/// The connection may also enter error states:
///
/// - **Disconnected** - connectivity lost but recovery possible
/// - **Failed** - all candidate pairs failed
/// - **Closed** - the connection has been closed
///
/// # Examples
///
/// ```no_run
/// use rtc_binding::peer_connection::event::{RTCPeerConnectionEvent, RTCPeerConnectionEventType};
/// use rtc_binding::peer_connection::state::RTCIceConnectionState;
/// use rtc_binding::peer_connection::RTCPeerConnection;
///
/// # fn watch(pc: &mut RTCPeerConnection) {
/// pc.add_event_listener(
///     RTCPeerConnectionEventType::IceConnectionStateChange,
///     |event: &RTCPeerConnectionEvent| {
///         if let RTCPeerConnectionEvent::OnIceConnectionStateChangeEvent(state) = event {
///             if *state == RTCIceConnectionState::Failed {
///                 println!("ICE failed - cannot establish connection");
///             }
///         }
///     },
/// );
/// # }
/// ```
///
/// # Specifications
///
/// - [W3C RTCPeerConnection.iceConnectionState]
///
/// [W3C RTCPeerConnection.iceConnectionState]: https://w3c.github.io/webrtc-pc/#dom-peerconnection-ice-connection-state
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq)]
pub enum RTCIceConnectionState {
    #[default]
    Unspecified,

    /// ICE agent is gathering addresses or waiting for remote candidates.
    New,

    /// ICE agent has remote candidates and is checking pairs.
    Checking,

    /// ICE agent found a usable connection for all components.
    Connected,

    /// ICE agent finished gathering and checking.
    Completed,

    /// ICE agent checked all pairs without finding a usable connection.
    Failed,

    /// Connectivity was lost for at least one component.
    Disconnected,

    /// ICE agent has shut down.
    Closed,
}

/// Native ICE connection state codes, in the engine's order.
pub(crate) static ICE_CONNECTION_STATE_TABLE: StateTable<RTCIceConnectionState> = StateTable::new(
    "ice connection state",
    &[
        RTCIceConnectionState::New,
        RTCIceConnectionState::Checking,
        RTCIceConnectionState::Connected,
        RTCIceConnectionState::Completed,
        RTCIceConnectionState::Failed,
        RTCIceConnectionState::Disconnected,
        RTCIceConnectionState::Closed,
    ],
);

const ICE_CONNECTION_STATE_NEW_STR: &str = "new";
const ICE_CONNECTION_STATE_CHECKING_STR: &str = "checking";
const ICE_CONNECTION_STATE_CONNECTED_STR: &str = "connected";
const ICE_CONNECTION_STATE_COMPLETED_STR: &str = "completed";
const ICE_CONNECTION_STATE_DISCONNECTED_STR: &str = "disconnected";
const ICE_CONNECTION_STATE_FAILED_STR: &str = "failed";
const ICE_CONNECTION_STATE_CLOSED_STR: &str = "closed";

impl From<&str> for RTCIceConnectionState {
    fn from(raw: &str) -> Self {
        match raw {
            ICE_CONNECTION_STATE_NEW_STR => RTCIceConnectionState::New,
            ICE_CONNECTION_STATE_CHECKING_STR => RTCIceConnectionState::Checking,
            ICE_CONNECTION_STATE_CONNECTED_STR => RTCIceConnectionState::Connected,
            ICE_CONNECTION_STATE_COMPLETED_STR => RTCIceConnectionState::Completed,
            ICE_CONNECTION_STATE_DISCONNECTED_STR => RTCIceConnectionState::Disconnected,
            ICE_CONNECTION_STATE_FAILED_STR => RTCIceConnectionState::Failed,
            ICE_CONNECTION_STATE_CLOSED_STR => RTCIceConnectionState::Closed,
            _ => RTCIceConnectionState::Unspecified,
        }
    }
}

impl fmt::Display for RTCIceConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            RTCIceConnectionState::New => ICE_CONNECTION_STATE_NEW_STR,
            RTCIceConnectionState::Checking => ICE_CONNECTION_STATE_CHECKING_STR,
            RTCIceConnectionState::Connected => ICE_CONNECTION_STATE_CONNECTED_STR,
            RTCIceConnectionState::Completed => ICE_CONNECTION_STATE_COMPLETED_STR,
            RTCIceConnectionState::Disconnected => ICE_CONNECTION_STATE_DISCONNECTED_STR,
            RTCIceConnectionState::Failed => ICE_CONNECTION_STATE_FAILED_STR,
            RTCIceConnectionState::Closed => ICE_CONNECTION_STATE_CLOSED_STR,
            RTCIceConnectionState::Unspecified => UNSPECIFIED_STR,
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_new_ice_connection_state() {
        let tests = vec![
            (UNSPECIFIED_STR, RTCIceConnectionState::Unspecified),
            ("new", RTCIceConnectionState::New),
            ("checking", RTCIceConnectionState::Checking),
            ("connected", RTCIceConnectionState::Connected),
            ("completed", RTCIceConnectionState::Completed),
            ("disconnected", RTCIceConnectionState::Disconnected),
            ("failed", RTCIceConnectionState::Failed),
            ("closed", RTCIceConnectionState::Closed),
        ];

        for (state_string, expected_state) in tests {
            assert_eq!(RTCIceConnectionState::from(state_string), expected_state);
        }
    }

    #[test]
    fn test_ice_connection_state_table() {
        let tests = vec![
            (0, "new"),
            (1, "checking"),
            (2, "connected"),
            (3, "completed"),
            (4, "failed"),
            (5, "disconnected"),
            (6, "closed"),
        ];

        assert_eq!(ICE_CONNECTION_STATE_TABLE.len(), tests.len());
        for (code, expected_string) in tests {
            let state = ICE_CONNECTION_STATE_TABLE.translate(code).unwrap();
            assert_eq!(state.to_string(), expected_string);
        }
        assert!(ICE_CONNECTION_STATE_TABLE.translate(7).is_err());
    }
}
