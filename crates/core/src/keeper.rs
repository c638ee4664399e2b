use relay_fee_types::{Fee, IdentifiedPacketFees, PacketFee, PacketFees, PacketId};
use tracing::info;

use crate::bank::Bank;
use crate::channel::ChannelSource;
use crate::error::FeeError;
use crate::store::FeeStore;

// ═══════════════════════════════════════════════════════════════════════════
// FEE KEEPER
// ═══════════════════════════════════════════════════════════════════════════

/// The incentive-accounting core: escrows relayer fees against in-flight
/// packets and settles them when the protocol layer reports the outcome.
///
/// All state lives in the owned [`FeeStore`]; value moves through the
/// external [`Bank`] ledger via the shared escrow account.
pub struct FeeKeeper<B: Bank, C: ChannelSource> {
    pub(crate) store: FeeStore,
    pub(crate) bank: B,
    channels: C,
    pub(crate) escrow_address: String,
}

impl<B: Bank, C: ChannelSource> FeeKeeper<B, C> {
    pub fn new(bank: B, channels: C, escrow_address: impl Into<String>) -> Self {
        Self {
            store: FeeStore::new(),
            bank,
            channels,
            escrow_address: escrow_address.into(),
        }
    }

    /// Address of the shared escrow account on the ledger
    pub fn escrow_address(&self) -> &str {
        &self.escrow_address
    }

    pub fn bank(&self) -> &B {
        &self.bank
    }

    // ═══════════════════════════════════════════════════════════════════════
    // ESCROW
    // ═══════════════════════════════════════════════════════════════════════

    /// Escrow one fee grant against a packet.
    ///
    /// Preconditions, checked in order: module unlocked, channel
    /// fee-enabled, refund account exists, refund account covers the fee
    /// total. The ledger transfer and the record append are atomic: the
    /// grant is recorded only after the transfer succeeds.
    pub fn escrow_packet_fee(
        &mut self,
        packet_id: &PacketId,
        packet_fee: PacketFee,
    ) -> Result<(), FeeError> {
        if self.store.is_locked() {
            return Err(FeeError::ModuleLocked);
        }
        if !self
            .store
            .is_fee_enabled(&packet_id.port_id, &packet_id.channel_id)
        {
            return Err(FeeError::FeeNotEnabled {
                port_id: packet_id.port_id.clone(),
                channel_id: packet_id.channel_id.clone(),
            });
        }
        if !self.bank.account_exists(&packet_fee.refund_address) {
            return Err(FeeError::AccountNotFound {
                address: packet_fee.refund_address.clone(),
            });
        }

        self.bank.send(
            &packet_fee.refund_address,
            &self.escrow_address,
            &packet_fee.fee.total(),
        )?;

        info!(
            "escrowed packet fee: packet {}, payer {}",
            packet_id, packet_fee.refund_address
        );
        self.store.append(packet_id, packet_fee);
        Ok(())
    }

    // ═══════════════════════════════════════════════════════════════════════
    // MESSAGE-LEVEL OPERATIONS
    // ═══════════════════════════════════════════════════════════════════════

    /// Store the counterparty payee for a local address on a channel.
    /// Overwrites unconditionally; the value is opaque to this core and is
    /// not gated by the lock.
    pub fn register_counterparty_address(
        &mut self,
        address: impl Into<String>,
        counterparty_address: impl Into<String>,
        channel_id: impl Into<String>,
    ) {
        self.store
            .set_counterparty_address(address, counterparty_address, channel_id);
    }

    /// Escrow a fee for the next packet to be sent on the channel
    pub fn pay_packet_fee(
        &mut self,
        fee: Fee,
        port_id: &str,
        channel_id: &str,
        refund_address: impl Into<String>,
        relayers: Vec<String>,
    ) -> Result<PacketId, FeeError> {
        if self.store.is_locked() {
            return Err(FeeError::ModuleLocked);
        }

        let sequence = self.channels.next_send_sequence(port_id, channel_id)?;
        let packet_id = PacketId::new(port_id, channel_id, sequence);
        let packet_fee = PacketFee::new(fee, refund_address, relayers);

        self.escrow_packet_fee(&packet_id, packet_fee)?;
        Ok(packet_id)
    }

    /// Escrow an additional fee for a packet that is already in flight
    pub fn pay_packet_fee_async(
        &mut self,
        packet_id: &PacketId,
        packet_fee: PacketFee,
    ) -> Result<(), FeeError> {
        if self.store.is_locked() {
            return Err(FeeError::ModuleLocked);
        }
        if !self.channels.packet_in_flight(packet_id) {
            return Err(FeeError::PacketNotFound(packet_id.clone()));
        }

        self.escrow_packet_fee(packet_id, packet_fee)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // READ ACCESSORS
    // ═══════════════════════════════════════════════════════════════════════

    pub fn get_fees_in_escrow(&self, packet_id: &PacketId) -> Option<PacketFees> {
        self.store.get(packet_id).cloned()
    }

    pub fn has_fees_in_escrow(&self, packet_id: &PacketId) -> bool {
        self.store.has(packet_id)
    }

    pub fn get_records_for_channel(
        &self,
        port_id: &str,
        channel_id: &str,
    ) -> Vec<IdentifiedPacketFees> {
        self.store.list_by_channel(port_id, channel_id)
    }

    pub fn counterparty_address(&self, address: &str, channel_id: &str) -> Option<String> {
        self.store.counterparty_address(address, channel_id).cloned()
    }

    pub fn is_locked(&self) -> bool {
        self.store.is_locked()
    }

    pub fn is_fee_enabled(&self, port_id: &str, channel_id: &str) -> bool {
        self.store.is_fee_enabled(port_id, channel_id)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // CHANNEL LIFECYCLE WIRING
    // ═══════════════════════════════════════════════════════════════════════

    pub fn set_fee_enabled(&mut self, port_id: impl Into<String>, channel_id: impl Into<String>) {
        self.store.set_fee_enabled(port_id, channel_id);
    }

    pub fn delete_fee_enabled(&mut self, port_id: &str, channel_id: &str) {
        self.store.delete_fee_enabled(port_id, channel_id);
    }

    /// Replace a packet's fee record wholesale. Used by the wiring layer to
    /// restore state; performs no ledger transfer.
    pub fn set_fees_in_escrow(&mut self, packet_id: PacketId, fees: PacketFees) {
        self.store.set(packet_id, fees);
    }
}
