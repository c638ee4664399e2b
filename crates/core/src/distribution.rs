use std::collections::HashMap;

use cosmwasm_std::{Coin, Uint128};
use relay_fee_types::coins::{add_coins, normalize};
use relay_fee_types::{PacketFee, PacketId};
use tracing::{debug, error, info, warn};

use crate::bank::Bank;
use crate::channel::ChannelSource;
use crate::error::FeeError;
use crate::keeper::FeeKeeper;

// ═══════════════════════════════════════════════════════════════════════════
// DISTRIBUTION ENGINE
// ═══════════════════════════════════════════════════════════════════════════

impl<B: Bank, C: ChannelSource> FeeKeeper<B, C> {
    /// Settle an acknowledged packet's fees.
    ///
    /// `forward_relayer` is the address string reported by the counterparty
    /// chain and may be malformed; `reverse_relayer` is the local account
    /// that submitted the acknowledgement. The caller supplies the drained
    /// fee record.
    ///
    /// If the escrow account cannot cover the record's obligation, the
    /// module locks and nothing is paid or deleted. A halt is not an error.
    pub fn distribute_on_acknowledgement(
        &mut self,
        packet_id: &PacketId,
        forward_relayer: &str,
        reverse_relayer: &str,
        packet_fees: &[PacketFee],
    ) {
        if self.detect_shortfall(packet_fees) {
            return;
        }

        for packet_fee in packet_fees {
            let refund = &packet_fee.refund_address;
            self.distribute_fee(forward_relayer, refund, &packet_fee.fee.recv_fee);
            self.distribute_fee(reverse_relayer, refund, &packet_fee.fee.ack_fee);
            // packet succeeded, so the unused timeout fee goes back to the payer
            self.distribute_fee(refund, refund, &packet_fee.fee.timeout_fee);
        }

        self.store.delete(packet_id);
        info!("distributed fees on acknowledgement: packet {}", packet_id);
    }

    /// Settle a timed-out packet's fees. The timeout relayer earns the
    /// timeout fee; recv and ack fees return to each grant's payer.
    pub fn distribute_on_timeout(
        &mut self,
        packet_id: &PacketId,
        timeout_relayer: &str,
        packet_fees: &[PacketFee],
    ) {
        if self.detect_shortfall(packet_fees) {
            return;
        }

        for packet_fee in packet_fees {
            let refund = &packet_fee.refund_address;
            self.distribute_fee(refund, refund, &packet_fee.fee.recv_fee);
            self.distribute_fee(refund, refund, &packet_fee.fee.ack_fee);
            self.distribute_fee(timeout_relayer, refund, &packet_fee.fee.timeout_fee);
        }

        self.store.delete(packet_id);
        info!("distributed fees on timeout: packet {}", packet_id);
    }

    /// Refund every fee escrowed on a channel when the channel closes.
    ///
    /// All-or-nothing: transfers are staged against a scratch view of the
    /// escrow balance and committed only after every grant is accounted
    /// for. A malformed refund address aborts with `AddressParseError` and
    /// no state change; an escrow shortfall locks the module, rolls back,
    /// and returns success. A blocked refund address skips its transfer but
    /// the record is still settled.
    pub fn refund_fees_on_channel_closure(
        &mut self,
        port_id: &str,
        channel_id: &str,
    ) -> Result<(), FeeError> {
        let records = self.store.list_by_channel(port_id, channel_id);

        let mut staged: Vec<(String, Vec<Coin>)> = Vec::new();
        let mut remaining: HashMap<String, Uint128> = HashMap::new();

        for identified in &records {
            for packet_fee in &identified.packet_fees {
                self.bank.validate_address(&packet_fee.refund_address)?;

                if self.bank.is_blocked(&packet_fee.refund_address) {
                    debug!(
                        "refund address {} is blocked; funds for packet {} remain in escrow",
                        packet_fee.refund_address, identified.packet_id
                    );
                    continue;
                }

                let total = packet_fee.fee.total();
                for coin in &total {
                    let available = remaining.entry(coin.denom.clone()).or_insert_with(|| {
                        self.bank.balance(&self.escrow_address, &coin.denom)
                    });
                    if *available < coin.amount {
                        warn!(
                            "escrow shortfall during channel closure refund on {}/{}: \
                             locking fee module",
                            port_id, channel_id
                        );
                        self.store.set_locked();
                        return Ok(());
                    }
                    *available -= coin.amount;
                }
                staged.push((packet_fee.refund_address.clone(), total));
            }
        }

        for (refund_address, amount) in staged {
            if let Err(err) = self.bank.send(&self.escrow_address, &refund_address, &amount) {
                error!("escrow refund to {} failed: {}", refund_address, err);
            }
        }
        for identified in &records {
            self.store.delete(&identified.packet_id);
        }
        info!(
            "refunded {} fee records on channel closure: {}/{}",
            records.len(),
            port_id,
            channel_id
        );
        Ok(())
    }

    // ═══════════════════════════════════════════════════════════════════
    // PAYOUT LEGS
    // ═══════════════════════════════════════════════════════════════════

    /// Check the escrow account covers the obligation of the given grants.
    /// On a shortfall the lock latch is set and true is returned; the
    /// caller must leave records and balances untouched.
    fn detect_shortfall(&mut self, packet_fees: &[PacketFee]) -> bool {
        let mut obligation = Vec::new();
        for packet_fee in packet_fees {
            obligation = add_coins(&obligation, &packet_fee.fee.total());
        }

        for coin in &obligation {
            if self.bank.balance(&self.escrow_address, &coin.denom) < coin.amount {
                warn!(
                    "escrow account {} cannot cover {}{}: locking fee module",
                    self.escrow_address, coin.amount, coin.denom
                );
                self.store.set_locked();
                return true;
            }
        }
        false
    }

    /// Pay one leg from the escrow account.
    ///
    /// An unpayable primary target redirects to the refund address; an
    /// unpayable redirect target strands the amount in escrow.
    fn distribute_fee(&self, candidate: &str, refund_address: &str, amount: &[Coin]) {
        let amount = normalize(amount);
        if amount.is_empty() {
            return;
        }

        let Some(target) = self.payout_target(candidate, refund_address) else {
            debug!(
                "no payable destination for fee leg (candidate {}, refund {}); \
                 funds remain in escrow",
                candidate, refund_address
            );
            return;
        };

        // cannot fail after the obligation check, but never let a ledger
        // error corrupt the distribution pass
        if let Err(err) = self.bank.send(&self.escrow_address, &target, &amount) {
            error!("escrow payout to {} failed: {}", target, err);
        }
    }

    /// Resolve where a leg actually pays out. An address is payable iff it
    /// parses and is not blocked. Redirecting to a refund address that is
    /// itself the failed candidate is pointless, so that case skips.
    fn payout_target(&self, candidate: &str, refund_address: &str) -> Option<String> {
        if self.payable(candidate) {
            return Some(candidate.to_string());
        }
        if candidate != refund_address && self.payable(refund_address) {
            debug!(
                "redirecting fee leg from {} to refund address {}",
                candidate, refund_address
            );
            return Some(refund_address.to_string());
        }
        None
    }

    fn payable(&self, address: &str) -> bool {
        self.bank.validate_address(address).is_ok() && !self.bank.is_blocked(address)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════
