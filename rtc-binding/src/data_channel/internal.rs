use log::{debug, warn};
use shared::error::{Error, Result};

use super::event::RTCDataChannelEvent;
use super::state::{DATA_CHANNEL_STATE_TABLE, RTCDataChannelState};
use crate::dispatcher::Dispatcher;
use crate::native::NativeDataChannel;
use crate::translator::StateCode;

pub(crate) struct RTCDataChannelInternal {
    pub(crate) label: String,
    pub(crate) handle: Option<Box<dyn NativeDataChannel>>,
    /// last ready state code reported by a state change signal
    pub(crate) reported_state: Option<StateCode>,
    pub(crate) dispatcher: Dispatcher<RTCDataChannelEvent>,
}

impl RTCDataChannelInternal {
    pub(crate) fn new(handle: Box<dyn NativeDataChannel>) -> Self {
        Self {
            label: handle.label(),
            handle: Some(handle),
            reported_state: None,
            dispatcher: Dispatcher::new(),
        }
    }

    pub(crate) fn handle(&self) -> Result<&dyn NativeDataChannel> {
        self.handle.as_deref().ok_or(Error::ErrDataChannelGone)
    }

    pub(crate) fn handle_mut(&mut self) -> Result<&mut (dyn NativeDataChannel + 'static)> {
        self.handle.as_deref_mut().ok_or(Error::ErrDataChannelGone)
    }

    pub(crate) fn ready_state(&self) -> Result<RTCDataChannelState> {
        DATA_CHANNEL_STATE_TABLE.translate(self.handle()?.ready_state())
    }

    /// update_ready_state records a reported state and returns the event the
    /// transition emits, if any.
    pub(crate) fn update_ready_state(
        &mut self,
        code: StateCode,
    ) -> Result<Option<RTCDataChannelEvent>> {
        if self.handle.is_none() {
            warn!("drop ready state {} for released data channel {}", code, self.label);
            return Ok(None);
        }

        let state = DATA_CHANNEL_STATE_TABLE.translate(code)?;
        if self.reported_state.replace(code) == Some(code) {
            return Ok(None);
        }
        debug!("data channel {} is {}", self.label, state);

        Ok(match state {
            RTCDataChannelState::Open => Some(RTCDataChannelEvent::OnOpen),
            RTCDataChannelState::Closed => Some(RTCDataChannelEvent::OnClose),
            _ => None,
        })
    }

    /// reported_closed tells whether the last reported state is closed.
    pub(crate) fn reported_closed(&self) -> bool {
        self.reported_state
            .and_then(|code| DATA_CHANNEL_STATE_TABLE.translate(code).ok())
            == Some(RTCDataChannelState::Closed)
    }

    /// release shuts the native handle down, at most once.
    pub(crate) fn release(&mut self) -> bool {
        match self.handle.take() {
            Some(mut handle) => {
                debug!("shut down data channel {}", self.label);
                handle.shutdown();
                true
            }
            None => false,
        }
    }
}
