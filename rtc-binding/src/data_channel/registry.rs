use std::collections::HashMap;

use log::{debug, warn};
use shared::error::{Error, Result};

use super::RTCDataChannel;
use super::init::RTCDataChannelInit;
use crate::native::{NativeDataChannel, NativePeerConnection};

/// Data channels of one connection, keyed by label.
///
/// Channel signals from the engine are addressed by label, so a label names
/// at most one live channel of the connection. A channel that reports closed
/// is retired and its label becomes free again. Live and retired channels
/// are shut down exactly once, when the connection's signaling state reaches
/// closed.
#[derive(Default)]
pub(crate) struct DataChannelRegistry {
    channels: HashMap<String, RTCDataChannel>,
    retired: Vec<RTCDataChannel>,
    is_terminated: bool,
}

impl DataChannelRegistry {
    /// create_local asks the engine for a channel and registers it. This is a
    /// synchronous engine call and never goes through the operation queue.
    pub(crate) fn create_local(
        &mut self,
        native: &mut dyn NativePeerConnection,
        label: &str,
        init: &RTCDataChannelInit,
    ) -> Result<RTCDataChannel> {
        if self.is_terminated {
            return Err(Error::ErrConnectionGone);
        }
        if self.channels.contains_key(label) {
            return Err(Error::ErrDataChannelLabelInUse(label.to_owned()));
        }

        let handle = native
            .create_data_channel(label, init)
            .ok_or(Error::ErrDataChannelUnavailable)?;
        Ok(self.register(handle))
    }

    /// register_remote registers a channel opened by the remote peer. A
    /// channel that cannot be registered is shut down right away.
    pub(crate) fn register_remote(
        &mut self,
        mut handle: Box<dyn NativeDataChannel>,
    ) -> Result<RTCDataChannel> {
        let label = handle.label();
        if self.is_terminated {
            warn!("shut down data channel {label} received after close");
            handle.shutdown();
            return Err(Error::ErrConnectionGone);
        }
        if self.channels.contains_key(&label) {
            warn!("shut down data channel {label} received with a label in use");
            handle.shutdown();
            return Err(Error::ErrDataChannelLabelInUse(label));
        }

        Ok(self.register(handle))
    }

    fn register(&mut self, handle: Box<dyn NativeDataChannel>) -> RTCDataChannel {
        let label = handle.label();
        let channel = RTCDataChannel::wrap(handle);
        debug!("register data channel {label}");
        self.channels.insert(label, channel.clone());
        channel
    }

    pub(crate) fn get(&self, label: &str) -> Option<RTCDataChannel> {
        self.channels.get(label).cloned()
    }

    /// retire frees the label of a channel that reported closed. The channel
    /// keeps its native handle until the terminal cascade.
    pub(crate) fn retire(&mut self, label: &str) {
        if let Some(channel) = self.channels.remove(label) {
            debug!("retire closed data channel {label}");
            self.retired.push(channel);
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.channels.len()
    }

    /// on_terminal shuts every registered channel down and empties the
    /// registry. Only the first call has an effect.
    pub(crate) fn on_terminal(&mut self) -> usize {
        if self.is_terminated {
            return 0;
        }
        self.is_terminated = true;

        let mut released = 0;
        let live = self.channels.drain().map(|(_, channel)| channel);
        for channel in live.chain(self.retired.drain(..)) {
            if channel.release() {
                released += 1;
            }
        }
        debug!("released {released} data channels");
        released
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::data_channel::message::RTCDataChannelMessage;
    use crate::translator::StateCode;
    use std::cell::Cell;
    use std::rc::Rc;

    struct CountingChannel {
        label: String,
        shutdowns: Rc<Cell<u32>>,
    }

    impl NativeDataChannel for CountingChannel {
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
            1
        }
        fn binary_type(&self) -> StateCode {
            0
        }
        fn set_binary_type(&mut self, _binary_type: StateCode) {}
        fn buffered_amount(&self) -> u64 {
            0
        }
        fn send(&mut self, _message: &RTCDataChannelMessage) -> std::result::Result<(), String> {
            Ok(())
        }
        fn close(&mut self) {}
        fn shutdown(&mut self) {
            self.shutdowns.set(self.shutdowns.get() + 1);
        }
    }

    fn channel(label: &str, shutdowns: &Rc<Cell<u32>>) -> Box<dyn NativeDataChannel> {
        Box::new(CountingChannel {
            label: label.to_owned(),
            shutdowns: Rc::clone(shutdowns),
        })
    }

    #[test]
    fn test_terminal_cascade_is_one_shot() -> Result<()> {
        let counters: Vec<Rc<Cell<u32>>> = (0..3).map(|_| Rc::new(Cell::new(0))).collect();
        let mut registry = DataChannelRegistry::default();

        let mut channels = vec![];
        for (i, shutdowns) in counters.iter().enumerate() {
            channels.push(registry.register_remote(channel(&format!("dc{i}"), shutdowns))?);
        }
        assert_eq!(registry.len(), 3);

        assert_eq!(registry.on_terminal(), 3);
        assert_eq!(registry.len(), 0);
        assert_eq!(registry.on_terminal(), 0);

        for (shutdowns, channel) in counters.iter().zip(channels) {
            assert_eq!(shutdowns.get(), 1);
            assert_eq!(channel.ready_state(), Err(Error::ErrDataChannelGone));
        }
        Ok(())
    }

    #[test]
    fn test_retired_label_is_reusable() -> Result<()> {
        let first = Rc::new(Cell::new(0));
        let second = Rc::new(Cell::new(0));
        let mut registry = DataChannelRegistry::default();

        let old = registry.register_remote(channel("chat", &first))?;
        registry.retire("chat");
        assert_eq!(registry.len(), 0);
        assert!(registry.get("chat").is_none());

        let new = registry.register_remote(channel("chat", &second))?;
        assert_ne!(old, new);
        assert_eq!(registry.get("chat"), Some(new));

        // retired channels are still shut down by the cascade
        assert_eq!(registry.on_terminal(), 2);
        assert_eq!(first.get(), 1);
        assert_eq!(second.get(), 1);
        Ok(())
    }

    #[test]
    fn test_register_remote_rejects() -> Result<()> {
        let first = Rc::new(Cell::new(0));
        let duplicate = Rc::new(Cell::new(0));
        let late = Rc::new(Cell::new(0));
        let mut registry = DataChannelRegistry::default();

        registry.register_remote(channel("chat", &first))?;
        assert_eq!(
            registry.register_remote(channel("chat", &duplicate)).err(),
            Some(Error::ErrDataChannelLabelInUse("chat".to_owned()))
        );
        assert_eq!(duplicate.get(), 1);
        assert!(registry.get("chat").is_some());

        registry.on_terminal();
        assert_eq!(
            registry.register_remote(channel("late", &late)).err(),
            Some(Error::ErrConnectionGone)
        );
        assert_eq!(late.get(), 1);
        assert_eq!(first.get(), 1);
        Ok(())
    }
}
