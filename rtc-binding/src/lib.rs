//! # RTC Binding - Sans-I/O WebRTC Negotiation over a Native Engine
//!
//! This crate exposes a WebRTC-shaped negotiation API (offer/answer exchange,
//! ICE candidate trickling, data channels) on top of a **native connection
//! engine** that only offers synchronous, fire-and-forget methods and one
//! global pair of completion signals shared by every outstanding request.
//!
//! The binding does no I/O of its own. The engine is reached through the
//! traits in [`native`], and every engine notification is handed to
//! [`RTCPeerConnection::handle_signal`] by the application, one at a time.
//!
//! ## What the binding takes care of
//!
//! - **Sequencing**: negotiation operations go through a single-flight FIFO
//!   [`OperationQueue`](operation::OperationQueue), so every completion
//!   signal is attributed to the operation that caused it.
//! - **Calling conventions**: every negotiation operation accepts either no
//!   handlers and returns a [`Deferred`](operation::Deferred) result, or a
//!   success and a failure handler. See [`convention`].
//! - **State translation**: the engine's integer state codes are translated
//!   into named states through fixed tables.
//! - **Data channel lifecycle**: channels are registered per connection and
//!   shut down together when the signaling state reaches closed.
//!
//! ## Quick Start
//!
//! ```no_run
//! use rtc_binding::convention::Argument;
//! use rtc_binding::native::{NativeFactory, NativeSignal};
//! use rtc_binding::peer_connection::RTCPeerConnection;
//! use rtc_binding::peer_connection::configuration::RTCConfigurationBuilder;
//! use rtc_binding::peer_connection::configuration::ice_server::RTCIceServer;
//! use rtc_binding::peer_connection::sdp::RTCSessionDescription;
//!
//! # fn example(
//! #     factory: &dyn NativeFactory,
//! #     next_signal: impl Fn() -> NativeSignal,
//! # ) -> Result<(), Box<dyn std::error::Error>> {
//! let config = RTCConfigurationBuilder::new()
//!     .with_ice_servers(vec![RTCIceServer {
//!         urls: vec!["stun:stun.l.google.com:19302".to_string()],
//!         ..Default::default()
//!     }])
//!     .build();
//!
//! let mut pc = RTCPeerConnection::new(factory, config)?;
//! pc.on_ice_candidate(|candidate| println!("local candidate {candidate:?}"));
//!
//! // handler convention: the outcome goes straight to the handlers
//! pc.create_offer(vec![
//!     Argument::on_success(|offer: RTCSessionDescription| println!("offer {offer}")),
//!     Argument::on_failure(|err| eprintln!("create_offer failed: {err}")),
//! ])?;
//!
//! // deferred convention: poll or await the returned result
//! let mut answer = pc.create_answer(vec![])?.ok_or("expected a deferred answer")?;
//!
//! // feed engine notifications in, one at a time
//! while answer.try_result().is_none() {
//!     pc.handle_signal(next_signal())?;
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Errors
//!
//! Usage errors (wrong argument shape, calls on a closed connection, sending
//! on a channel that is not open) are returned synchronously. Negotiation
//! errors reach the failure handler or the rejected [`Deferred`](operation::Deferred)
//! of the operation that failed. A state code outside of its table is fatal,
//! see [`Error::is_fatal`](shared::error::Error::is_fatal).

#![warn(rust_2018_idioms)]
#![allow(dead_code)]

pub mod convention;
pub mod data_channel;
pub mod dispatcher;
pub mod native;
pub mod operation;
pub mod peer_connection;
pub mod translator;

pub use peer_connection::RTCPeerConnection;
pub use shared::error::{Error, Result};
