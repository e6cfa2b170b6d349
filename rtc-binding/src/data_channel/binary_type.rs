use std::fmt;

use serde::{Deserialize, Serialize};

use crate::peer_connection::configuration::UNSPECIFIED_STR;
use crate::translator::StateTable;

/// How binary messages received on a data channel are exposed to the
/// application.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RTCDataChannelBinaryType {
    #[default]
    Unspecified = 0,

    #[serde(rename = "blob")]
    Blob,

    #[serde(rename = "arraybuffer")]
    ArrayBuffer,
}

/// Native binary type codes, in the engine's order. Unlike the state tables
/// this one is also used in reverse, to write the mode back to the engine.
pub(crate) static BINARY_TYPE_TABLE: StateTable<RTCDataChannelBinaryType> = StateTable::new(
    "binary type",
    &[
        RTCDataChannelBinaryType::Blob,
        RTCDataChannelBinaryType::ArrayBuffer,
    ],
);

const BINARY_TYPE_BLOB_STR: &str = "blob";
const BINARY_TYPE_ARRAY_BUFFER_STR: &str = "arraybuffer";

impl From<&str> for RTCDataChannelBinaryType {
    fn from(raw: &str) -> Self {
        match raw {
            BINARY_TYPE_BLOB_STR => RTCDataChannelBinaryType::Blob,
            BINARY_TYPE_ARRAY_BUFFER_STR => RTCDataChannelBinaryType::ArrayBuffer,
            _ => RTCDataChannelBinaryType::Unspecified,
        }
    }
}

impl fmt::Display for RTCDataChannelBinaryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            RTCDataChannelBinaryType::Blob => write!(f, "{BINARY_TYPE_BLOB_STR}"),
            RTCDataChannelBinaryType::ArrayBuffer => write!(f, "{BINARY_TYPE_ARRAY_BUFFER_STR}"),
            _ => write!(f, "{UNSPECIFIED_STR}"),
        }
    }
}
