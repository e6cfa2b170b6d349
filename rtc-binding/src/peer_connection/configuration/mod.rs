pub mod bundle_policy;
pub mod ice_server;
pub mod ice_transport_policy;
pub mod offer_answer_options;
pub mod rtcp_mux_policy;

use serde::{Deserialize, Serialize};
use shared::error::{Error, Result};

use bundle_policy::RTCBundlePolicy;
use ice_server::RTCIceServer;
use ice_transport_policy::RTCIceTransportPolicy;
use rtcp_mux_policy::RTCRtcpMuxPolicy;

pub(crate) const UNSPECIFIED_STR: &str = "Unspecified";

/// The largest candidate pool the native engine accepts.
pub const MAX_ICE_CANDIDATE_POOL_SIZE: u8 = 64;

/// Defines a set of parameters to configure how the peer-to-peer
/// communication via [`RTCPeerConnection`] is established or re-established.
///
/// Configurations are handed to the native engine as-is once they pass
/// [`validate`](RTCConfiguration::validate). They serialize to and from the
/// W3C JSON shape:
///
/// ```
/// use rtc_binding::peer_connection::configuration::RTCConfiguration;
///
/// let config: RTCConfiguration = serde_json::from_str(
///     r#"{
///         "iceServers": [{"urls": ["turn:turn.example.org"], "username": "jch", "credential": "topsecret"}],
///         "iceTransportPolicy": "relay",
///         "bundlePolicy": "balanced",
///         "rtcpMuxPolicy": "require"
///     }"#,
/// )
/// .unwrap();
/// assert!(config.validate().is_ok());
/// ```
///
/// [`RTCPeerConnection`]: crate::peer_connection::RTCPeerConnection
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RTCConfiguration {
    /// Servers available to be used by ICE, such as STUN and TURN servers.
    pub(crate) ice_servers: Vec<RTCIceServer>,

    /// Which candidates the ICE agent is allowed to use.
    pub(crate) ice_transport_policy: RTCIceTransportPolicy,

    /// Which media-bundling policy to use when gathering ICE candidates.
    pub(crate) bundle_policy: RTCBundlePolicy,

    /// Which rtcp-mux policy to use when gathering ICE candidates.
    pub(crate) rtcp_mux_policy: RTCRtcpMuxPolicy,

    /// Size of the prefetched ICE pool.
    pub(crate) ice_candidate_pool_size: u8,
}

impl RTCConfiguration {
    pub fn ice_servers(&self) -> &[RTCIceServer] {
        &self.ice_servers
    }

    pub fn ice_transport_policy(&self) -> RTCIceTransportPolicy {
        self.ice_transport_policy
    }

    pub fn bundle_policy(&self) -> RTCBundlePolicy {
        self.bundle_policy
    }

    pub fn rtcp_mux_policy(&self) -> RTCRtcpMuxPolicy {
        self.rtcp_mux_policy
    }

    pub fn ice_candidate_pool_size(&self) -> u8 {
        self.ice_candidate_pool_size
    }

    /// validate checks every ICE server and the candidate pool size.
    pub fn validate(&self) -> Result<()> {
        for ice_server in &self.ice_servers {
            ice_server.validate()?;
        }

        if self.ice_candidate_pool_size > MAX_ICE_CANDIDATE_POOL_SIZE {
            return Err(Error::ErrInvalidConfiguration(format!(
                "ice candidate pool size {} exceeds {MAX_ICE_CANDIDATE_POOL_SIZE}",
                self.ice_candidate_pool_size
            )));
        }

        Ok(())
    }
}

#[derive(Default)]
pub struct RTCConfigurationBuilder {
    ice_servers: Vec<RTCIceServer>,
    ice_transport_policy: RTCIceTransportPolicy,
    bundle_policy: RTCBundlePolicy,
    rtcp_mux_policy: RTCRtcpMuxPolicy,
    ice_candidate_pool_size: u8,
}

impl RTCConfigurationBuilder {
    pub fn new() -> Self {
        RTCConfigurationBuilder::default()
    }

    pub fn with_ice_servers(mut self, ice_servers: Vec<RTCIceServer>) -> Self {
        self.ice_servers = ice_servers;
        self
    }

    pub fn with_ice_transport_policy(
        mut self,
        ice_transport_policy: RTCIceTransportPolicy,
    ) -> Self {
        self.ice_transport_policy = ice_transport_policy;
        self
    }

    pub fn with_bundle_policy(mut self, bundle_policy: RTCBundlePolicy) -> Self {
        self.bundle_policy = bundle_policy;
        self
    }

    pub fn with_rtcp_mux_policy(mut self, rtcp_mux_policy: RTCRtcpMuxPolicy) -> Self {
        self.rtcp_mux_policy = rtcp_mux_policy;
        self
    }

    pub fn with_ice_candidate_pool_size(mut self, ice_candidate_pool_size: u8) -> Self {
        self.ice_candidate_pool_size = ice_candidate_pool_size;
        self
    }

    pub fn build(self) -> RTCConfiguration {
        RTCConfiguration {
            ice_servers: self.ice_servers,
            ice_transport_policy: self.ice_transport_policy,
            bundle_policy: self.bundle_policy,
            rtcp_mux_policy: self.rtcp_mux_policy,
            ice_candidate_pool_size: self.ice_candidate_pool_size,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_configuration_json() {
        let j = r#"
            {
                "iceServers": [{"urls": ["turn:turn.example.org"],
                                "username": "jch",
                                "credential": "topsecret"
                              }],
                "iceTransportPolicy": "relay",
                "bundlePolicy": "balanced",
                "rtcpMuxPolicy": "require"
            }"#;

        let conf = RTCConfigurationBuilder::new()
            .with_ice_servers(vec![RTCIceServer {
                urls: vec!["turn:turn.example.org".to_owned()],
                username: "jch".to_owned(),
                credential: "topsecret".to_owned(),
            }])
            .with_ice_transport_policy(RTCIceTransportPolicy::Relay)
            .with_bundle_policy(RTCBundlePolicy::Balanced)
            .with_rtcp_mux_policy(RTCRtcpMuxPolicy::Require)
            .build();

        let conf2: RTCConfiguration = serde_json::from_str(j).unwrap();
        assert_eq!(conf, conf2);

        let j2 = serde_json::to_string(&conf2).unwrap();
        let conf3: RTCConfiguration = serde_json::from_str(&j2).unwrap();
        assert_eq!(conf2, conf3);
    }

    #[test]
    fn test_configuration_validate() {
        assert_eq!(RTCConfiguration::default().validate(), Ok(()));

        let cfg = RTCConfigurationBuilder::new()
            .with_ice_servers(vec![RTCIceServer {
                urls: vec!["turn:turn.example.org".to_owned()],
                ..Default::default()
            }])
            .build();
        assert_eq!(
            cfg.validate(),
            Err(Error::ErrNoTurnCredentials(
                "turn:turn.example.org".to_owned()
            ))
        );

        let cfg = RTCConfigurationBuilder::new()
            .with_ice_candidate_pool_size(MAX_ICE_CANDIDATE_POOL_SIZE + 1)
            .build();
        assert!(matches!(
            cfg.validate(),
            Err(Error::ErrInvalidConfiguration(_))
        ));
    }
}
