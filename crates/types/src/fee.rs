use cosmwasm_schema::cw_serde;
use cosmwasm_std::Coin;

use crate::coins::{add_coins, normalize};
use crate::packet::PacketId;

/// Fee promised for the three outcomes of one packet.
///
/// Each component is a multi-denomination amount. All components are
/// escrowed together; which legs actually pay out depends on how the
/// packet terminates.
#[cw_serde]
pub struct Fee {
    /// Paid to the forward relayer on acknowledgement
    pub recv_fee: Vec<Coin>,

    /// Paid to the reverse relayer on acknowledgement
    pub ack_fee: Vec<Coin>,

    /// Paid to the timeout relayer on timeout
    pub timeout_fee: Vec<Coin>,
}

impl Fee {
    pub fn new(recv_fee: Vec<Coin>, ack_fee: Vec<Coin>, timeout_fee: Vec<Coin>) -> Self {
        Self {
            recv_fee,
            ack_fee,
            timeout_fee,
        }
    }

    /// Escrowed total: recv + ack + timeout, merged by denom
    pub fn total(&self) -> Vec<Coin> {
        add_coins(&add_coins(&self.recv_fee, &self.ack_fee), &self.timeout_fee)
    }

    pub fn is_empty(&self) -> bool {
        self.total().is_empty()
    }
}

/// One payer's escrowed fee grant for a single packet
#[cw_serde]
pub struct PacketFee {
    /// The promised fee amounts
    pub fee: Fee,

    /// Account the fee was escrowed from; receives refunds
    pub refund_address: String,

    /// Optional relayer allow-list, opaque to the fee core
    pub relayers: Vec<String>,
}

impl PacketFee {
    pub fn new(fee: Fee, refund_address: impl Into<String>, relayers: Vec<String>) -> Self {
        Self {
            fee,
            refund_address: refund_address.into(),
            relayers,
        }
    }
}

/// All fee grants escrowed against one packet, in escrow order
#[cw_serde]
#[derive(Default)]
pub struct PacketFees {
    pub packet_fees: Vec<PacketFee>,
}

impl PacketFees {
    pub fn new(packet_fees: Vec<PacketFee>) -> Self {
        Self { packet_fees }
    }

    /// Sum of `fee.total()` over every grant: the record's obligation
    pub fn total(&self) -> Vec<Coin> {
        let mut total = Vec::new();
        for packet_fee in &self.packet_fees {
            total = add_coins(&total, &packet_fee.fee.total());
        }
        normalize(&total)
    }

    pub fn is_empty(&self) -> bool {
        self.packet_fees.is_empty()
    }

    pub fn len(&self) -> usize {
        self.packet_fees.len()
    }
}

/// A fee record paired with the packet it belongs to, for channel listings
#[cw_serde]
pub struct IdentifiedPacketFees {
    pub packet_id: PacketId,
    pub packet_fees: Vec<PacketFee>,
}

impl IdentifiedPacketFees {
    pub fn new(packet_id: PacketId, packet_fees: Vec<PacketFee>) -> Self {
        Self {
            packet_id,
            packet_fees,
        }
    }
}
