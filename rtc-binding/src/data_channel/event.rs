use std::fmt;

use super::message::RTCDataChannelMessage;
use crate::dispatcher::Event;

/// Events delivered to the listeners of a data channel.
#[allow(clippy::enum_variant_names)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RTCDataChannelEvent {
    OnOpen,
    OnMessage(RTCDataChannelMessage),
    OnError(String),
    OnClose,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum RTCDataChannelEventType {
    Open,
    Message,
    Error,
    Close,
}

impl Event for RTCDataChannelEvent {
    type Type = RTCDataChannelEventType;

    fn event_type(&self) -> RTCDataChannelEventType {
        match self {
            RTCDataChannelEvent::OnOpen => RTCDataChannelEventType::Open,
            RTCDataChannelEvent::OnMessage(_) => RTCDataChannelEventType::Message,
            RTCDataChannelEvent::OnError(_) => RTCDataChannelEventType::Error,
            RTCDataChannelEvent::OnClose => RTCDataChannelEventType::Close,
        }
    }
}

impl fmt::Display for RTCDataChannelEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            RTCDataChannelEventType::Open => "open",
            RTCDataChannelEventType::Message => "message",
            RTCDataChannelEventType::Error => "error",
            RTCDataChannelEventType::Close => "close",
        };
        write!(f, "{s}")
    }
}
