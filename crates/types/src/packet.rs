use std::fmt;

use cosmwasm_schema::cw_serde;

/// Identity of one in-flight cross-chain packet
#[cw_serde]
#[derive(Eq, Hash, PartialOrd, Ord)]
pub struct PacketId {
    /// Port the packet was sent on
    pub port_id: String,

    /// Channel the packet was sent on
    pub channel_id: String,

    /// Packet sequence number, unique per channel
    pub sequence: u64,
}

impl PacketId {
    pub fn new(port_id: impl Into<String>, channel_id: impl Into<String>, sequence: u64) -> Self {
        Self {
            port_id: port_id.into(),
            channel_id: channel_id.into(),
            sequence,
        }
    }

    /// Check whether this packet belongs to the given channel end
    pub fn on_channel(&self, port_id: &str, channel_id: &str) -> bool {
        self.port_id == port_id && self.channel_id == channel_id
    }
}

impl fmt::Display for PacketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.port_id, self.channel_id, self.sequence)
    }
}
