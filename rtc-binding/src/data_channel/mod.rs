pub mod binary_type;
pub mod event;
pub mod init;
pub(crate) mod internal;
pub mod message;
pub(crate) mod registry;
pub mod state;

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use bytes::Bytes;
use log::debug;
use shared::error::{Error, Result};

use crate::dispatcher::{self, Event, EventHandler, ListenerId};
use crate::native::NativeDataChannel;
use crate::translator::StateCode;
use binary_type::{BINARY_TYPE_TABLE, RTCDataChannelBinaryType};
use event::{RTCDataChannelEvent, RTCDataChannelEventType};
use internal::RTCDataChannelInternal;
use message::RTCDataChannelMessage;
use state::RTCDataChannelState;

/// Identifier for a data channel within a particular peer connection
pub type RTCDataChannelId = u16;

/// DataChannel represents a WebRTC DataChannel
/// The DataChannel interface represents a network channel
/// which can be used for bidirectional peer-to-peer transfers of arbitrary data
///
/// Clones share the same channel. Once the owning connection reaches the
/// closed signaling state the native channel is released; from then on every
/// operation except [`label`](RTCDataChannel::label) fails with
/// [`Error::ErrDataChannelGone`].
///
/// ## Specifications
///
/// * [MDN]
/// * [W3C]
///
/// [MDN]: https://developer.mozilla.org/en-US/docs/Web/API/RTCDataChannel
/// [W3C]: https://w3c.github.io/webrtc-pc/#dom-rtcdatachannel
#[derive(Clone)]
pub struct RTCDataChannel {
    inner: Rc<RefCell<RTCDataChannelInternal>>,
}

impl RTCDataChannel {
    pub(crate) fn wrap(handle: Box<dyn NativeDataChannel>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(RTCDataChannelInternal::new(handle))),
        }
    }

    /// label represents a label that can be used to distinguish this
    /// DataChannel object from other DataChannel objects.
    pub fn label(&self) -> String {
        self.inner.borrow().label.clone()
    }

    /// id represents the SCTP stream id of this DataChannel, `None` until it
    /// has been negotiated.
    pub fn id(&self) -> Result<Option<RTCDataChannelId>> {
        Ok(self.inner.borrow().handle()?.id())
    }

    /// protocol represents the name of the sub-protocol used with this
    /// DataChannel.
    pub fn protocol(&self) -> Result<String> {
        Ok(self.inner.borrow().handle()?.protocol())
    }

    /// ready_state represents the state of the DataChannel object, read from
    /// the native channel on every call.
    pub fn ready_state(&self) -> Result<RTCDataChannelState> {
        self.inner.borrow().ready_state()
    }

    /// buffered_amount represents the number of bytes of application data
    /// that have been queued using send() but not yet transmitted.
    pub fn buffered_amount(&self) -> Result<u64> {
        Ok(self.inner.borrow().handle()?.buffered_amount())
    }

    pub fn binary_type(&self) -> Result<RTCDataChannelBinaryType> {
        BINARY_TYPE_TABLE.translate(self.inner.borrow().handle()?.binary_type())
    }

    pub fn set_binary_type(&self, binary_type: RTCDataChannelBinaryType) -> Result<()> {
        let code = BINARY_TYPE_TABLE
            .code_of(binary_type)
            .ok_or_else(|| Error::ErrInvalidBinaryType(binary_type.to_string()))?;
        self.inner.borrow_mut().handle_mut()?.set_binary_type(code);
        Ok(())
    }

    /// send sends binary data to the remote peer. It fails unless the channel
    /// is open; nothing is queued for later.
    pub fn send(&self, data: impl Into<Bytes>) -> Result<()> {
        self.send_message(RTCDataChannelMessage::binary(data))
    }

    /// send_text sends text to the remote peer. It fails unless the channel
    /// is open; nothing is queued for later.
    pub fn send_text(&self, text: impl Into<String>) -> Result<()> {
        self.send_message(RTCDataChannelMessage::text(text))
    }

    fn send_message(&self, message: RTCDataChannelMessage) -> Result<()> {
        let mut inner = self.inner.borrow_mut();
        let ready_state = inner.ready_state()?;
        if ready_state != RTCDataChannelState::Open {
            return Err(Error::ErrDataChannelNotOpen(ready_state.to_string()));
        }

        inner
            .handle_mut()?
            .send(&message)
            .map_err(|reason| Error::ErrOperationFailed {
                operation: "send",
                reason,
            })
    }

    /// close starts the closing procedure of the channel.
    pub fn close(&self) -> Result<()> {
        let mut inner = self.inner.borrow_mut();
        debug!("close data channel {}", inner.label);
        inner.handle_mut()?.close();
        Ok(())
    }

    pub fn add_event_listener(
        &self,
        event_type: RTCDataChannelEventType,
        listener: impl Fn(&RTCDataChannelEvent) + 'static,
    ) -> ListenerId {
        self.inner
            .borrow_mut()
            .dispatcher
            .add_event_listener(event_type, listener)
    }

    pub fn remove_event_listener(
        &self,
        event_type: RTCDataChannelEventType,
        id: ListenerId,
    ) -> bool {
        self.inner
            .borrow_mut()
            .dispatcher
            .remove_event_listener(event_type, id)
    }

    /// set_event_handler sets the shorthand handler of `event_type`, which
    /// runs after every listener.
    pub fn set_event_handler(
        &self,
        event_type: RTCDataChannelEventType,
        handler: Option<EventHandler<RTCDataChannelEvent>>,
    ) {
        self.inner
            .borrow_mut()
            .dispatcher
            .set_event_handler(event_type, handler);
    }

    pub fn on_open(&self, handler: impl Fn() + 'static) {
        self.set_event_handler(
            RTCDataChannelEventType::Open,
            Some(Rc::new(move |_: &RTCDataChannelEvent| handler())),
        );
    }

    pub fn on_message(&self, handler: impl Fn(&RTCDataChannelMessage) + 'static) {
        self.set_event_handler(
            RTCDataChannelEventType::Message,
            Some(Rc::new(move |event: &RTCDataChannelEvent| {
                if let RTCDataChannelEvent::OnMessage(message) = event {
                    handler(message);
                }
            })),
        );
    }

    pub fn on_error(&self, handler: impl Fn(&str) + 'static) {
        self.set_event_handler(
            RTCDataChannelEventType::Error,
            Some(Rc::new(move |event: &RTCDataChannelEvent| {
                if let RTCDataChannelEvent::OnError(error) = event {
                    handler(error);
                }
            })),
        );
    }

    pub fn on_close(&self, handler: impl Fn() + 'static) {
        self.set_event_handler(
            RTCDataChannelEventType::Close,
            Some(Rc::new(move |_: &RTCDataChannelEvent| handler())),
        );
    }

    /// dispatch delivers an event with the channel unborrowed, so callbacks
    /// may use the channel again.
    fn dispatch(&self, event: RTCDataChannelEvent) {
        let callbacks = self
            .inner
            .borrow()
            .dispatcher
            .snapshot(event.event_type());
        dispatcher::deliver(callbacks, &event);
    }

    pub(crate) fn handle_state_change(&self, code: StateCode) -> Result<()> {
        let event = self.inner.borrow_mut().update_ready_state(code)?;
        if let Some(event) = event {
            self.dispatch(event);
        }
        Ok(())
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.inner.borrow().reported_closed()
    }

    pub(crate) fn handle_message(&self, message: RTCDataChannelMessage) {
        self.dispatch(RTCDataChannelEvent::OnMessage(message));
    }

    pub(crate) fn handle_error(&self, error: String) {
        self.dispatch(RTCDataChannelEvent::OnError(error));
    }

    pub(crate) fn release(&self) -> bool {
        self.inner.borrow_mut().release()
    }
}

impl fmt::Debug for RTCDataChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("RTCDataChannel")
            .field("label", &inner.label)
            .field("released", &inner.handle.is_none())
            .finish()
    }
}

impl PartialEq for RTCDataChannel {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for RTCDataChannel {}
