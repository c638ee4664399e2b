use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use relay_fee_types::PacketId;

use crate::error::FeeError;

/// Protocol-layer view the fee core needs: packet sequencing and the set of
/// packets still awaiting an outcome. Owned by the channel layer, read-only
/// here.
pub trait ChannelSource {
    /// Sequence number the next packet sent on this channel will carry
    fn next_send_sequence(&self, port_id: &str, channel_id: &str) -> Result<u64, FeeError>;

    /// Whether the packet has been sent and not yet acknowledged or timed out
    fn packet_in_flight(&self, packet_id: &PacketId) -> bool;
}

/// In-memory channel state (for testing)
#[derive(Clone, Debug, Default)]
pub struct MockChannelSource {
    next_sequence: Arc<RwLock<HashMap<(String, String), u64>>>,
    in_flight: Arc<RwLock<HashSet<PacketId>>>,
}

impl MockChannelSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_next_sequence(
        &self,
        port_id: impl Into<String>,
        channel_id: impl Into<String>,
        sequence: u64,
    ) {
        self.next_sequence
            .write()
            .unwrap()
            .insert((port_id.into(), channel_id.into()), sequence);
    }

    pub fn mark_in_flight(&self, packet_id: PacketId) {
        self.in_flight.write().unwrap().insert(packet_id);
    }

    pub fn mark_settled(&self, packet_id: &PacketId) {
        self.in_flight.write().unwrap().remove(packet_id);
    }
}

impl ChannelSource for MockChannelSource {
    fn next_send_sequence(&self, port_id: &str, channel_id: &str) -> Result<u64, FeeError> {
        self.next_sequence
            .read()
            .unwrap()
            .get(&(port_id.to_string(), channel_id.to_string()))
            .copied()
            .ok_or_else(|| FeeError::ChannelNotFound {
                port_id: port_id.to_string(),
                channel_id: channel_id.to_string(),
            })
    }

    fn packet_in_flight(&self, packet_id: &PacketId) -> bool {
        self.in_flight.read().unwrap().contains(packet_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_send_sequence() {
        let channels = MockChannelSource::new();
        channels.set_next_sequence("transfer", "channel-0", 5);

        assert_eq!(channels.next_send_sequence("transfer", "channel-0"), Ok(5));
        assert!(matches!(
            channels.next_send_sequence("transfer", "channel-9"),
            Err(FeeError::ChannelNotFound { .. })
        ));
    }

    #[test]
    fn test_packet_in_flight() {
        let channels = MockChannelSource::new();
        let packet_id = PacketId::new("transfer", "channel-0", 1);

        assert!(!channels.packet_in_flight(&packet_id));
        channels.mark_in_flight(packet_id.clone());
        assert!(channels.packet_in_flight(&packet_id));
        channels.mark_settled(&packet_id);
        assert!(!channels.packet_in_flight(&packet_id));
    }
}
