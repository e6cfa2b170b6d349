use serde::{Deserialize, Serialize};

/// Options for `create_data_channel`, in the W3C `RTCDataChannelInit` shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RTCDataChannelInit {
    /// Whether messages must arrive in the order they were sent.
    pub ordered: bool,

    /// Limits the time in milliseconds during which retransmissions occur.
    pub max_packet_life_time: Option<u16>,

    /// Limits the number of retransmissions of a message.
    pub max_retransmits: Option<u16>,

    /// Subprotocol name used for this channel.
    pub protocol: String,

    /// Whether the channel is negotiated out of band by the application.
    pub negotiated: bool,

    /// Stream id of an out of band negotiated channel.
    pub id: Option<u16>,
}

impl Default for RTCDataChannelInit {
    fn default() -> Self {
        Self {
            ordered: true,
            max_packet_life_time: None,
            max_retransmits: None,
            protocol: String::new(),
            negotiated: false,
            id: None,
        }
    }
}
