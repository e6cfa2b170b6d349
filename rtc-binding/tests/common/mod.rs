#![allow(dead_code)]

//! Scripted native engine shared by the integration tests.
//!
//! The engine records every call it receives and never answers on its own;
//! tests play the engine's part by feeding `NativeSignal`s to the connection.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use rtc_binding::data_channel::init::RTCDataChannelInit;
use rtc_binding::data_channel::message::RTCDataChannelMessage;
use rtc_binding::native::{NativeDataChannel, NativeFactory, NativePeerConnection};
use rtc_binding::peer_connection::RTCPeerConnection;
use rtc_binding::peer_connection::candidate::RTCIceCandidateInit;
use rtc_binding::peer_connection::configuration::offer_answer_options::{
    RTCAnswerOptions, RTCOfferOptions,
};
use rtc_binding::peer_connection::configuration::{RTCConfiguration, RTCConfigurationBuilder};
use rtc_binding::peer_connection::sdp::RTCSessionDescription;
use rtc_binding::translator::StateCode;
use rtc_binding::Result;

pub const SIGNALING_STABLE: StateCode = 0;
pub const SIGNALING_HAVE_LOCAL_OFFER: StateCode = 1;
pub const SIGNALING_CLOSED: StateCode = 5;

pub const CHANNEL_CONNECTING: StateCode = 0;
pub const CHANNEL_OPEN: StateCode = 1;
pub const CHANNEL_CLOSED: StateCode = 3;

#[derive(Default)]
pub struct ChannelState {
    pub ready_state: Cell<StateCode>,
    pub binary_type: Cell<StateCode>,
    pub sent: RefCell<Vec<RTCDataChannelMessage>>,
    pub closes: Cell<u32>,
    pub shutdowns: Cell<u32>,
}

#[derive(Default)]
pub struct EngineLog {
    /// names of the negotiation calls, in the order they reached the engine
    pub dispatched: Vec<String>,
    pub offer_options: Vec<RTCOfferOptions>,
    /// `None` marks the end of remote candidates
    pub candidates: Vec<Option<RTCIceCandidateInit>>,
    pub local_description: Option<RTCSessionDescription>,
    pub remote_description: Option<RTCSessionDescription>,
    /// set by tests to script the current/pending split and trickle support
    pub current_local_description: Option<RTCSessionDescription>,
    pub current_remote_description: Option<RTCSessionDescription>,
    pub can_trickle_ice_candidates: Option<bool>,
    pub channels: HashMap<String, Rc<ChannelState>>,
    pub decline_data_channels: bool,
    pub reject_configuration: Option<String>,
    pub closes: u32,
}

pub type Engine = Rc<RefCell<EngineLog>>;

pub struct ScriptedFactory {
    pub engine: Engine,
}

impl NativeFactory for ScriptedFactory {
    fn create_peer_connection(
        &self,
        _configuration: &RTCConfiguration,
    ) -> Result<Box<dyn NativePeerConnection>> {
        Ok(Box::new(ScriptedPeerConnection {
            engine: Rc::clone(&self.engine),
        }))
    }
}

pub struct ScriptedPeerConnection {
    engine: Engine,
}

impl ScriptedPeerConnection {
    fn record(&self, name: &str) {
        self.engine.borrow_mut().dispatched.push(name.to_owned());
    }
}

impl NativePeerConnection for ScriptedPeerConnection {
    fn create_offer(&mut self, options: &RTCOfferOptions) {
        self.record("create_offer");
        self.engine.borrow_mut().offer_options.push(*options);
    }

    fn create_answer(&mut self, _options: &RTCAnswerOptions) {
        self.record("create_answer");
    }

    fn set_local_description(&mut self, description: Option<&RTCSessionDescription>) {
        self.record("set_local_description");
        if let Some(description) = description {
            self.engine.borrow_mut().local_description = Some(description.clone());
        }
    }

    fn set_remote_description(&mut self, description: Option<&RTCSessionDescription>) {
        self.record("set_remote_description");
        if let Some(description) = description {
            self.engine.borrow_mut().remote_description = Some(description.clone());
        }
    }

    fn add_ice_candidate(&mut self, candidate: Option<&RTCIceCandidateInit>) {
        self.record("add_ice_candidate");
        self.engine.borrow_mut().candidates.push(candidate.cloned());
    }

    fn restart_ice(&mut self) {
        self.record("restart_ice");
    }

    fn create_data_channel(
        &mut self,
        label: &str,
        _init: &RTCDataChannelInit,
    ) -> Option<Box<dyn NativeDataChannel>> {
        if self.engine.borrow().decline_data_channels {
            return None;
        }
        Some(data_channel(&self.engine, label))
    }

    fn local_description(&self) -> Option<RTCSessionDescription> {
        self.engine.borrow().local_description.clone()
    }

    fn current_local_description(&self) -> Option<RTCSessionDescription> {
        self.engine.borrow().current_local_description.clone()
    }

    fn pending_local_description(&self) -> Option<RTCSessionDescription> {
        let engine = self.engine.borrow();
        if engine.local_description == engine.current_local_description {
            None
        } else {
            engine.local_description.clone()
        }
    }

    fn remote_description(&self) -> Option<RTCSessionDescription> {
        self.engine.borrow().remote_description.clone()
    }

    fn current_remote_description(&self) -> Option<RTCSessionDescription> {
        self.engine.borrow().current_remote_description.clone()
    }

    fn pending_remote_description(&self) -> Option<RTCSessionDescription> {
        let engine = self.engine.borrow();
        if engine.remote_description == engine.current_remote_description {
            None
        } else {
            engine.remote_description.clone()
        }
    }

    fn can_trickle_ice_candidates(&self) -> Option<bool> {
        self.engine.borrow().can_trickle_ice_candidates
    }

    fn set_configuration(
        &mut self,
        _configuration: &RTCConfiguration,
    ) -> std::result::Result<(), String> {
        match self.engine.borrow().reject_configuration.clone() {
            Some(reason) => Err(reason),
            None => Ok(()),
        }
    }

    fn close(&mut self) {
        self.engine.borrow_mut().closes += 1;
    }
}

pub struct ScriptedDataChannel {
    label: String,
    state: Rc<ChannelState>,
}

impl NativeDataChannel for ScriptedDataChannel {
    fn label(&self) -> String {
        self.label.clone()
    }

    fn id(&self) -> Option<u16> {
        None
    }

    fn protocol(&self) -> String {
        String::new()
    }

    fn ready_state(&self) -> StateCode {
        self.state.ready_state.get()
    }

    fn binary_type(&self) -> StateCode {
        self.state.binary_type.get()
    }

    fn set_binary_type(&mut self, binary_type: StateCode) {
        self.state.binary_type.set(binary_type);
    }

    fn buffered_amount(&self) -> u64 {
        0
    }

    fn send(&mut self, message: &RTCDataChannelMessage) -> std::result::Result<(), String> {
        self.state.sent.borrow_mut().push(message.clone());
        Ok(())
    }

    fn close(&mut self) {
        self.state.closes.set(self.state.closes.get() + 1);
    }

    fn shutdown(&mut self) {
        self.state.shutdowns.set(self.state.shutdowns.get() + 1);
    }
}

/// data_channel creates a native channel whose state the test can inspect
/// through the engine log.
pub fn data_channel(engine: &Engine, label: &str) -> Box<dyn NativeDataChannel> {
    let state = Rc::new(ChannelState::default());
    engine
        .borrow_mut()
        .channels
        .insert(label.to_owned(), Rc::clone(&state));
    Box::new(ScriptedDataChannel {
        label: label.to_owned(),
        state,
    })
}

pub fn channel_state(engine: &Engine, label: &str) -> Rc<ChannelState> {
    Rc::clone(&engine.borrow().channels[label])
}

pub fn dispatched(engine: &Engine) -> Vec<String> {
    engine.borrow().dispatched.clone()
}

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn new_peer_connection() -> Result<(RTCPeerConnection, Engine)> {
    init_logger();
    let engine = Engine::default();
    let factory = ScriptedFactory {
        engine: Rc::clone(&engine),
    };
    let pc = RTCPeerConnection::new(&factory, RTCConfigurationBuilder::new().build())?;
    Ok((pc, engine))
}
