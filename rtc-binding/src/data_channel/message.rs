use bytes::Bytes;

/// A message sent or received on a data channel.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct RTCDataChannelMessage {
    pub is_string: bool,
    pub data: Bytes,
}

impl RTCDataChannelMessage {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            is_string: true,
            data: Bytes::from(text.into()),
        }
    }

    pub fn binary(data: impl Into<Bytes>) -> Self {
        Self {
            is_string: false,
            data: data.into(),
        }
    }
}
