use std::collections::HashMap;

use relay_fee_types::{IdentifiedPacketFees, PacketFee, PacketFees, PacketId};

// ═══════════════════════════════════════════════════════════════════════════
// FEE RECORD STORE
// ═══════════════════════════════════════════════════════════════════════════

/// Bookkeeping state for escrowed packet fees.
///
/// Pure state: no ledger transfers happen here. The store is owned by the
/// keeper and mutated only within a single keeper call, so no interior
/// locking is needed.
#[derive(Debug, Default)]
pub struct FeeStore {
    /// Packet identity -> escrowed fee grants, in escrow order
    records: HashMap<PacketId, PacketFees>,

    /// Creation index per record, for channel listings in first-escrow order
    created: HashMap<PacketId, u64>,
    next_created: u64,

    /// Channels on which fee escrow is permitted
    fee_enabled: HashMap<(String, String), bool>,

    /// (local address, channel) -> counterparty payee address, stored opaque
    counterparty: HashMap<(String, String), String>,

    /// One-way safety latch, set on a detected escrow shortfall
    locked: bool,
}

impl FeeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fee record for a packet, if any grants are escrowed against it
    pub fn get(&self, packet_id: &PacketId) -> Option<&PacketFees> {
        self.records.get(packet_id)
    }

    pub fn has(&self, packet_id: &PacketId) -> bool {
        self.records.contains_key(packet_id)
    }

    /// Store a full fee record, replacing any existing one
    pub fn set(&mut self, packet_id: PacketId, fees: PacketFees) {
        if !self.created.contains_key(&packet_id) {
            self.created.insert(packet_id.clone(), self.next_created);
            self.next_created += 1;
        }
        self.records.insert(packet_id, fees);
    }

    /// Append one grant to a packet's record, creating the record if absent
    pub fn append(&mut self, packet_id: &PacketId, packet_fee: PacketFee) {
        match self.records.get_mut(packet_id) {
            Some(record) => record.packet_fees.push(packet_fee),
            None => {
                self.set(packet_id.clone(), PacketFees::new(vec![packet_fee]));
            }
        }
    }

    /// Delete a packet's record. Records are settled whole, never per grant.
    pub fn delete(&mut self, packet_id: &PacketId) -> Option<PacketFees> {
        self.created.remove(packet_id);
        self.records.remove(packet_id)
    }

    /// All records on a channel end, in record creation order
    pub fn list_by_channel(&self, port_id: &str, channel_id: &str) -> Vec<IdentifiedPacketFees> {
        let mut entries: Vec<(&PacketId, &PacketFees)> = self
            .records
            .iter()
            .filter(|(id, _)| id.on_channel(port_id, channel_id))
            .collect();
        entries.sort_by_key(|(id, _)| self.created.get(id).copied().unwrap_or(u64::MAX));
        entries
            .into_iter()
            .map(|(id, fees)| IdentifiedPacketFees::new(id.clone(), fees.packet_fees.clone()))
            .collect()
    }

    pub fn is_fee_enabled(&self, port_id: &str, channel_id: &str) -> bool {
        self.fee_enabled
            .get(&(port_id.to_string(), channel_id.to_string()))
            .copied()
            .unwrap_or(false)
    }

    pub fn set_fee_enabled(&mut self, port_id: impl Into<String>, channel_id: impl Into<String>) {
        self.fee_enabled
            .insert((port_id.into(), channel_id.into()), true);
    }

    pub fn delete_fee_enabled(&mut self, port_id: &str, channel_id: &str) {
        self.fee_enabled
            .remove(&(port_id.to_string(), channel_id.to_string()));
    }

    pub fn counterparty_address(&self, address: &str, channel_id: &str) -> Option<&String> {
        self.counterparty
            .get(&(address.to_string(), channel_id.to_string()))
    }

    pub fn set_counterparty_address(
        &mut self,
        address: impl Into<String>,
        counterparty: impl Into<String>,
        channel_id: impl Into<String>,
    ) {
        self.counterparty
            .insert((address.into(), channel_id.into()), counterparty.into());
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Set the lock latch. There is no unlock within the fee core.
    pub fn set_locked(&mut self) {
        self.locked = true;
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════
