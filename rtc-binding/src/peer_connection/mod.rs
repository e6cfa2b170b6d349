pub mod candidate;
pub mod configuration;
pub mod event;
pub mod sdp;
pub mod state;

use std::collections::VecDeque;
use std::rc::Rc;

use log::{debug, warn};
use sansio::Protocol;
use shared::error::{Error, Result};

use crate::convention::{Argument, Invocation};
use crate::data_channel::RTCDataChannel;
use crate::data_channel::init::RTCDataChannelInit;
use crate::data_channel::registry::DataChannelRegistry;
use crate::dispatcher::{Dispatcher, EventHandler, ListenerId};
use crate::native::{NativeFactory, NativePeerConnection, NativeSignal};
use crate::operation::{Completion, Deferred, Operation, OperationQueue, Request};
use crate::translator::{StateCode, TrackedState};
use candidate::RTCIceCandidateInit;
use configuration::RTCConfiguration;
use configuration::offer_answer_options::{RTCAnswerOptions, RTCOfferOptions};
use event::ice_event::RTCPeerConnectionIceEvent;
use event::{RTCPeerConnectionEvent, RTCPeerConnectionEventType};
use sdp::RTCSessionDescription;
use state::ice_connection_state::{ICE_CONNECTION_STATE_TABLE, RTCIceConnectionState};
use state::ice_gathering_state::{ICE_GATHERING_STATE_TABLE, RTCIceGatheringState};
use state::peer_connection_state::{PEER_CONNECTION_STATE_TABLE, RTCPeerConnectionState};
use state::signaling_state::{RTCSignalingState, SIGNALING_STATE_TABLE};

/// PeerConnection represents a WebRTC connection that establishes a
/// peer-to-peer communications with another PeerConnection instance in a
/// browser, or to another endpoint implementing the required protocols.
///
/// `RTCPeerConnection` drives a native engine that does the actual
/// negotiation and transport work. It serializes negotiation operations
/// through a single-flight [`OperationQueue`], reports the engine's states
/// through translation tables and owns the data channels of the connection.
///
/// Engine notifications are fed in with [`handle_signal`]; events raised by
/// a signal are dispatched once the signal has been fully applied.
///
/// [`handle_signal`]: RTCPeerConnection::handle_signal
pub struct RTCPeerConnection {
    configuration: RTCConfiguration,
    native: Option<Box<dyn NativePeerConnection>>,

    operations: OperationQueue,
    data_channels: DataChannelRegistry,

    signaling_state: TrackedState<RTCSignalingState>,
    ice_connection_state: TrackedState<RTCIceConnectionState>,
    ice_gathering_state: TrackedState<RTCIceGatheringState>,
    peer_connection_state: TrackedState<RTCPeerConnectionState>,
    is_closed: bool,

    events: VecDeque<RTCPeerConnectionEvent>,
    dispatcher: Dispatcher<RTCPeerConnectionEvent>,
}

impl RTCPeerConnection {
    /// creates a PeerConnection with RTCConfiguration
    pub fn new(factory: &dyn NativeFactory, configuration: RTCConfiguration) -> Result<Self> {
        configuration.validate()?;
        let native = factory.create_peer_connection(&configuration)?;

        Ok(Self {
            configuration,
            native: Some(native),
            operations: OperationQueue::new(),
            data_channels: DataChannelRegistry::default(),
            signaling_state: TrackedState::new(&SIGNALING_STATE_TABLE),
            ice_connection_state: TrackedState::new(&ICE_CONNECTION_STATE_TABLE),
            ice_gathering_state: TrackedState::new(&ICE_GATHERING_STATE_TABLE),
            peer_connection_state: TrackedState::new(&PEER_CONNECTION_STATE_TABLE),
            is_closed: false,
            events: VecDeque::new(),
            dispatcher: Dispatcher::new(),
        })
    }

    /// create_offer starts a local offer. Takes `[]`, `[options]`,
    /// `[on_success, on_failure]` or `[on_success, on_failure, options]`;
    /// returns a [`Deferred`] description unless handlers were given.
    pub fn create_offer(
        &mut self,
        args: Vec<Argument<RTCSessionDescription>>,
    ) -> Result<Option<Deferred<RTCSessionDescription>>> {
        const OPERATION: &str = "create_offer";
        let invocation = Invocation::parse(OPERATION, args)?;
        self.check_usable()?;
        let options: RTCOfferOptions = invocation.optional(OPERATION)?;
        self.negotiate(invocation, Operation::CreateOffer(options), |payload| {
            RTCSessionDescription::offer(payload.unwrap_or_default())
        })
    }

    /// create_answer starts a local answer, with the same calling shapes as
    /// [`create_offer`](RTCPeerConnection::create_offer).
    pub fn create_answer(
        &mut self,
        args: Vec<Argument<RTCSessionDescription>>,
    ) -> Result<Option<Deferred<RTCSessionDescription>>> {
        const OPERATION: &str = "create_answer";
        let invocation = Invocation::parse(OPERATION, args)?;
        self.check_usable()?;
        let options: RTCAnswerOptions = invocation.optional(OPERATION)?;
        self.negotiate(invocation, Operation::CreateAnswer(options), |payload| {
            RTCSessionDescription::answer(payload.unwrap_or_default())
        })
    }

    /// set_local_description commits a local description. Without one the
    /// engine sets an implicit description.
    pub fn set_local_description(
        &mut self,
        args: Vec<Argument<()>>,
    ) -> Result<Option<Deferred<()>>> {
        const OPERATION: &str = "set_local_description";
        let invocation = Invocation::parse(OPERATION, args)?;
        self.check_usable()?;
        let description = invocation.optional_value(OPERATION)?;
        self.negotiate(
            invocation,
            Operation::SetLocalDescription(description),
            |_| (),
        )
    }

    /// set_remote_description commits a remote description. A call without
    /// one is still queued and the engine's failure reaches the caller.
    pub fn set_remote_description(
        &mut self,
        args: Vec<Argument<()>>,
    ) -> Result<Option<Deferred<()>>> {
        const OPERATION: &str = "set_remote_description";
        let invocation = Invocation::parse(OPERATION, args)?;
        self.check_usable()?;
        let description = invocation.optional_value(OPERATION)?;
        self.negotiate(
            invocation,
            Operation::SetRemoteDescription(description),
            |_| (),
        )
    }

    /// add_ice_candidate hands a remote candidate to the engine. Without one
    /// it marks the end of remote candidates.
    pub fn add_ice_candidate(&mut self, args: Vec<Argument<()>>) -> Result<Option<Deferred<()>>> {
        const OPERATION: &str = "add_ice_candidate";
        let invocation = Invocation::parse(OPERATION, args)?;
        self.check_usable()?;
        let candidate = invocation.optional_value(OPERATION)?;
        self.negotiate(invocation, Operation::AddIceCandidate(candidate), |_| ())
    }

    /// restart_ice asks the engine to restart ICE with the next offer. It
    /// keeps its place in the operation queue but waits for no completion.
    pub fn restart_ice(&mut self) -> Result<()> {
        self.check_usable()?;
        self.submit(Request::new(
            Operation::RestartIce,
            |_| {},
            |err| warn!("restart_ice failed: {err}"),
        ))
    }

    fn negotiate<T: 'static>(
        &mut self,
        invocation: Invocation<T>,
        operation: Operation,
        map: impl FnOnce(Option<String>) -> T + 'static,
    ) -> Result<Option<Deferred<T>>> {
        let (request, deferred) = invocation.into_request(operation, map);
        self.submit(request)?;
        Ok(deferred)
    }

    /// check_usable rejects calls against a closed or released connection
    /// before they reach the queue.
    fn check_usable(&self) -> Result<()> {
        if self.native.is_none() {
            Err(Error::ErrConnectionGone)
        } else if self.is_closed {
            Err(Error::ErrConnectionClosed)
        } else {
            Ok(())
        }
    }

    fn submit(&mut self, request: Request) -> Result<()> {
        self.operations.handle_write(request)?;
        self.drive_operations();
        Ok(())
    }

    /// drive_operations settles finished requests, then hands the released
    /// operations to the engine.
    fn drive_operations(&mut self) {
        while let Some(settlement) = self.operations.poll_read() {
            settlement.settle();
        }
        while let Some(operation) = self.operations.poll_write() {
            match self.native.as_deref_mut() {
                Some(native) => operation.dispatch(native),
                None => warn!("drop {operation}, native peer connection is gone"),
            }
        }
    }

    /// create_data_channel creates a new data channel with the given label.
    /// The engine call is synchronous and bypasses the operation queue.
    pub fn create_data_channel(
        &mut self,
        label: &str,
        init: Option<RTCDataChannelInit>,
    ) -> Result<RTCDataChannel> {
        self.check_usable()?;
        let native = self.native.as_deref_mut().ok_or(Error::ErrConnectionGone)?;
        self.data_channels
            .create_local(native, label, &init.unwrap_or_default())
    }

    /// data_channel returns the registered channel with the given label.
    pub fn data_channel(&self, label: &str) -> Option<RTCDataChannel> {
        self.data_channels.get(label)
    }

    /// local_description returns pending_local_description if it is not
    /// None and otherwise it returns current_local_description.
    pub fn local_description(&self) -> Option<RTCSessionDescription> {
        self.native.as_ref()?.local_description()
    }

    /// current_local_description represents the local description that was
    /// successfully negotiated the last time the PeerConnection transitioned
    /// into the stable state.
    pub fn current_local_description(&self) -> Option<RTCSessionDescription> {
        self.native.as_ref()?.current_local_description()
    }

    /// pending_local_description represents a local description that is in
    /// the process of being negotiated.
    pub fn pending_local_description(&self) -> Option<RTCSessionDescription> {
        self.native.as_ref()?.pending_local_description()
    }

    /// remote_description returns pending_remote_description if it is not
    /// None and otherwise it returns current_remote_description.
    pub fn remote_description(&self) -> Option<RTCSessionDescription> {
        self.native.as_ref()?.remote_description()
    }

    pub fn current_remote_description(&self) -> Option<RTCSessionDescription> {
        self.native.as_ref()?.current_remote_description()
    }

    pub fn pending_remote_description(&self) -> Option<RTCSessionDescription> {
        self.native.as_ref()?.pending_remote_description()
    }

    /// can_trickle_ice_candidates reports whether the remote peer accepts
    /// trickled candidates, `None` until a remote description is set or once
    /// the native connection is released.
    pub fn can_trickle_ice_candidates(&self) -> Option<bool> {
        self.native.as_ref()?.can_trickle_ice_candidates()
    }

    /// signaling_state attribute returns the signaling state of the
    /// PeerConnection instance.
    pub fn signaling_state(&self) -> RTCSignalingState {
        self.signaling_state.get()
    }

    /// ice_connection_state attribute returns the ICE connection state of the
    /// PeerConnection instance.
    pub fn ice_connection_state(&self) -> RTCIceConnectionState {
        self.ice_connection_state.get()
    }

    /// ice_gathering_state attribute returns the ICE gathering state of the
    /// PeerConnection instance.
    pub fn ice_gathering_state(&self) -> RTCIceGatheringState {
        self.ice_gathering_state.get()
    }

    /// connection_state attribute returns the connection state of the
    /// PeerConnection instance.
    pub fn connection_state(&self) -> RTCPeerConnectionState {
        self.peer_connection_state.get()
    }

    /// get_configuration returns a PeerConnection's current configuration.
    pub fn get_configuration(&self) -> &RTCConfiguration {
        &self.configuration
    }

    /// set_configuration updates the configuration of this PeerConnection.
    pub fn set_configuration(&mut self, configuration: RTCConfiguration) -> Result<()> {
        configuration.validate()?;
        self.check_usable()?;
        let native = self.native.as_deref_mut().ok_or(Error::ErrConnectionGone)?;
        native
            .set_configuration(&configuration)
            .map_err(Error::ErrInvalidModification)?;
        self.configuration = configuration;
        Ok(())
    }

    /// close ends the PeerConnection. Queued and in-flight operations fail
    /// with [`Error::ErrConnectionClosed`]. Data channels are shut down once
    /// the engine reports the closed signaling state.
    pub fn close(&mut self) -> Result<()> {
        if self.is_closed {
            return Ok(());
        }
        self.is_closed = true;
        debug!("close peer connection");

        self.operations.close()?;
        self.drive_operations();
        if let Some(native) = self.native.as_deref_mut() {
            native.close();
        }
        Ok(())
    }

    pub fn add_event_listener(
        &mut self,
        event_type: RTCPeerConnectionEventType,
        listener: impl Fn(&RTCPeerConnectionEvent) + 'static,
    ) -> ListenerId {
        self.dispatcher.add_event_listener(event_type, listener)
    }

    pub fn remove_event_listener(
        &mut self,
        event_type: RTCPeerConnectionEventType,
        id: ListenerId,
    ) -> bool {
        self.dispatcher.remove_event_listener(event_type, id)
    }

    /// set_event_handler sets the shorthand handler of `event_type`, which
    /// runs after every listener.
    pub fn set_event_handler(
        &mut self,
        event_type: RTCPeerConnectionEventType,
        handler: Option<EventHandler<RTCPeerConnectionEvent>>,
    ) {
        self.dispatcher.set_event_handler(event_type, handler);
    }

    pub fn on_ice_candidate(&mut self, handler: impl Fn(Option<&RTCIceCandidateInit>) + 'static) {
        self.set_event_handler(
            RTCPeerConnectionEventType::IceCandidate,
            Some(Rc::new(move |event: &RTCPeerConnectionEvent| {
                if let RTCPeerConnectionEvent::OnIceCandidateEvent(event) = event {
                    handler(event.candidate.as_ref());
                }
            })),
        );
    }

    pub fn on_signaling_state_change(&mut self, handler: impl Fn(RTCSignalingState) + 'static) {
        self.set_event_handler(
            RTCPeerConnectionEventType::SignalingStateChange,
            Some(Rc::new(move |event: &RTCPeerConnectionEvent| {
                if let RTCPeerConnectionEvent::OnSignalingStateChangeEvent(state) = event {
                    handler(*state);
                }
            })),
        );
    }

    pub fn on_ice_connection_state_change(
        &mut self,
        handler: impl Fn(RTCIceConnectionState) + 'static,
    ) {
        self.set_event_handler(
            RTCPeerConnectionEventType::IceConnectionStateChange,
            Some(Rc::new(move |event: &RTCPeerConnectionEvent| {
                if let RTCPeerConnectionEvent::OnIceConnectionStateChangeEvent(state) = event {
                    handler(*state);
                }
            })),
        );
    }

    pub fn on_ice_gathering_state_change(
        &mut self,
        handler: impl Fn(RTCIceGatheringState) + 'static,
    ) {
        self.set_event_handler(
            RTCPeerConnectionEventType::IceGatheringStateChange,
            Some(Rc::new(move |event: &RTCPeerConnectionEvent| {
                if let RTCPeerConnectionEvent::OnIceGatheringStateChangeEvent(state) = event {
                    handler(*state);
                }
            })),
        );
    }

    pub fn on_connection_state_change(
        &mut self,
        handler: impl Fn(RTCPeerConnectionState) + 'static,
    ) {
        self.set_event_handler(
            RTCPeerConnectionEventType::ConnectionStateChange,
            Some(Rc::new(move |event: &RTCPeerConnectionEvent| {
                if let RTCPeerConnectionEvent::OnConnectionStateChangeEvent(state) = event {
                    handler(*state);
                }
            })),
        );
    }

    pub fn on_negotiation_needed(&mut self, handler: impl Fn() + 'static) {
        self.set_event_handler(
            RTCPeerConnectionEventType::NegotiationNeeded,
            Some(Rc::new(move |_: &RTCPeerConnectionEvent| handler())),
        );
    }

    pub fn on_data_channel(&mut self, handler: impl Fn(RTCDataChannel) + 'static) {
        self.set_event_handler(
            RTCPeerConnectionEventType::DataChannel,
            Some(Rc::new(move |event: &RTCPeerConnectionEvent| {
                if let RTCPeerConnectionEvent::OnDataChannel(channel) = event {
                    handler(channel.clone());
                }
            })),
        );
    }

    /// handle_signal applies one notification from the native engine.
    ///
    /// An error means the signal could not be applied: a state code outside
    /// of its table (see [`Error::is_fatal`]) or an incoming data channel that
    /// was rejected. Events raised before the failure are still dispatched.
    pub fn handle_signal(&mut self, signal: NativeSignal) -> Result<()> {
        debug!("handle {signal:?}");
        let result = self.apply_signal(signal);
        while let Some(event) = self.events.pop_front() {
            self.dispatcher.dispatch(&event);
        }
        result
    }

    fn apply_signal(&mut self, signal: NativeSignal) -> Result<()> {
        match signal {
            NativeSignal::Succeeded(payload) => {
                self.handle_completion(Completion::Succeeded(payload))
            }
            NativeSignal::Failed(message) => self.handle_completion(Completion::Failed(message)),
            NativeSignal::IceCandidate(candidate) => {
                self.events
                    .push_back(RTCPeerConnectionEvent::OnIceCandidateEvent(
                        RTCPeerConnectionIceEvent {
                            candidate: Some(candidate),
                        },
                    ));
                Ok(())
            }
            NativeSignal::SignalingStateChange(code) => self.handle_signaling_state_change(code),
            NativeSignal::IceConnectionStateChange(code) => {
                let state = self.ice_connection_state.update(code)?;
                debug!("ice connection state changed: {state}");
                self.events
                    .push_back(RTCPeerConnectionEvent::OnIceConnectionStateChangeEvent(state));
                Ok(())
            }
            NativeSignal::IceGatheringStateChange(code) => {
                let state = self.ice_gathering_state.update(code)?;
                debug!("ice gathering state changed: {state}");
                self.events
                    .push_back(RTCPeerConnectionEvent::OnIceGatheringStateChangeEvent(state));
                if state == RTCIceGatheringState::Complete {
                    self.events
                        .push_back(RTCPeerConnectionEvent::OnIceCandidateEvent(
                            RTCPeerConnectionIceEvent { candidate: None },
                        ));
                }
                Ok(())
            }
            NativeSignal::ConnectionStateChange(code) => {
                let state = self.peer_connection_state.update(code)?;
                debug!("peer connection state changed: {state}");
                self.events
                    .push_back(RTCPeerConnectionEvent::OnConnectionStateChangeEvent(state));
                Ok(())
            }
            NativeSignal::NegotiationNeeded => {
                self.events
                    .push_back(RTCPeerConnectionEvent::OnNegotiationNeededEvent);
                Ok(())
            }
            NativeSignal::DataChannel(handle) => {
                let channel = self.data_channels.register_remote(handle)?;
                self.events
                    .push_back(RTCPeerConnectionEvent::OnDataChannel(channel));
                Ok(())
            }
            NativeSignal::DataChannelStateChange { label, state } => {
                match self.data_channels.get(&label) {
                    Some(channel) => {
                        channel.handle_state_change(state)?;
                        if channel.is_closed() {
                            self.data_channels.retire(&label);
                        }
                        Ok(())
                    }
                    None => {
                        warn!("drop ready state {state} for unknown data channel {label}");
                        Ok(())
                    }
                }
            }
            NativeSignal::DataChannelMessage { label, message } => {
                match self.data_channels.get(&label) {
                    Some(channel) => channel.handle_message(message),
                    None => warn!("drop message for unknown data channel {label}"),
                }
                Ok(())
            }
            NativeSignal::DataChannelError { label, error } => {
                match self.data_channels.get(&label) {
                    Some(channel) => channel.handle_error(error),
                    None => warn!("drop error {error} for unknown data channel {label}"),
                }
                Ok(())
            }
        }
    }

    fn handle_completion(&mut self, completion: Completion) -> Result<()> {
        self.operations.handle_read(completion)?;
        self.drive_operations();
        Ok(())
    }

    fn handle_signaling_state_change(&mut self, code: StateCode) -> Result<()> {
        let state = self.signaling_state.update(code)?;
        debug!("signaling state changed: {state}");

        if state == RTCSignalingState::Closed {
            self.release();
        }
        self.events
            .push_back(RTCPeerConnectionEvent::OnSignalingStateChangeEvent(state));
        Ok(())
    }

    /// release tears the connection down once the engine reports it closed:
    /// every data channel is shut down and the native handle is dropped.
    fn release(&mut self) {
        let released = self.data_channels.on_terminal();
        if self.native.take().is_some() {
            debug!("release native peer connection with {released} data channels");
        }
        self.is_closed = true;

        if let Err(err) = self.operations.close() {
            warn!("failed to close operation queue: {err}");
        }
        self.drive_operations();
    }
}
