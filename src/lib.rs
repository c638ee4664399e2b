//! Incentive accounting for a cross-chain packet relay fee mechanism.
//!
//! Fees attached to an in-flight packet are escrowed in a shared ledger
//! account and settled exactly once when the packet's outcome is known:
//! acknowledged, timed out, or its channel closed. A detected escrow
//! shortfall trips a one-way module lock instead of mis-paying.

pub use relay_fee_core::{
    Bank, ChannelSource, FeeError, FeeKeeper, FeeStore, MockBank, MockChannelSource,
};
pub use relay_fee_types::{
    coins, Fee, IdentifiedPacketFees, PacketFee, PacketFees, PacketId,
};
