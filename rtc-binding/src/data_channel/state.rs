use std::fmt;

use crate::peer_connection::configuration::UNSPECIFIED_STR;
use crate::translator::StateTable;

/// Indicates the state of a data channel.
///
/// ```text
/// Connecting → Open → Closing → Closed
/// ```
///
/// Entering [`Open`] emits `open` and entering [`Closed`] emits `close` on the
/// channel; a repeated report of the same state emits nothing.
///
/// [`Open`]: RTCDataChannelState::Open
/// [`Closed`]: RTCDataChannelState::Closed
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq)]
pub enum RTCDataChannelState {
    #[default]
    Unspecified = 0,

    /// The user agent is attempting to establish the underlying transport.
    Connecting,

    /// The underlying transport is established and messages can be sent.
    Open,

    /// The procedure to close down the underlying transport has started.
    Closing,

    /// The underlying transport has been closed or could not be established.
    Closed,
}

/// Native data channel ready state codes, in the engine's order.
pub(crate) static DATA_CHANNEL_STATE_TABLE: StateTable<RTCDataChannelState> = StateTable::new(
    "data channel state",
    &[
        RTCDataChannelState::Connecting,
        RTCDataChannelState::Open,
        RTCDataChannelState::Closing,
        RTCDataChannelState::Closed,
    ],
);

const DATA_CHANNEL_STATE_CONNECTING_STR: &str = "connecting";
const DATA_CHANNEL_STATE_OPEN_STR: &str = "open";
const DATA_CHANNEL_STATE_CLOSING_STR: &str = "closing";
const DATA_CHANNEL_STATE_CLOSED_STR: &str = "closed";

impl From<&str> for RTCDataChannelState {
    fn from(raw: &str) -> Self {
        match raw {
            DATA_CHANNEL_STATE_CONNECTING_STR => RTCDataChannelState::Connecting,
            DATA_CHANNEL_STATE_OPEN_STR => RTCDataChannelState::Open,
            DATA_CHANNEL_STATE_CLOSING_STR => RTCDataChannelState::Closing,
            DATA_CHANNEL_STATE_CLOSED_STR => RTCDataChannelState::Closed,
            _ => RTCDataChannelState::Unspecified,
        }
    }
}

impl fmt::Display for RTCDataChannelState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            RTCDataChannelState::Connecting => DATA_CHANNEL_STATE_CONNECTING_STR,
            RTCDataChannelState::Open => DATA_CHANNEL_STATE_OPEN_STR,
            RTCDataChannelState::Closing => DATA_CHANNEL_STATE_CLOSING_STR,
            RTCDataChannelState::Closed => DATA_CHANNEL_STATE_CLOSED_STR,
            RTCDataChannelState::Unspecified => UNSPECIFIED_STR,
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_data_channel_state_string() {
        let tests = vec![
            (RTCDataChannelState::Unspecified, "Unspecified"),
            (RTCDataChannelState::Connecting, "connecting"),
            (RTCDataChannelState::Open, "open"),
            (RTCDataChannelState::Closing, "closing"),
            (RTCDataChannelState::Closed, "closed"),
        ];

        for (state, expected_string) in tests {
            assert_eq!(state.to_string(), expected_string);
            assert_eq!(RTCDataChannelState::from(expected_string), state);
        }
    }

    #[test]
    fn test_data_channel_state_table() {
        let tests = vec![(0, "connecting"), (1, "open"), (2, "closing"), (3, "closed")];

        assert_eq!(DATA_CHANNEL_STATE_TABLE.len(), tests.len());
        for (code, expected_string) in tests {
            let state = DATA_CHANNEL_STATE_TABLE.translate(code).unwrap();
            assert_eq!(state.to_string(), expected_string);
        }
        assert!(DATA_CHANNEL_STATE_TABLE.translate(4).is_err());
    }
}
