use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use cosmwasm_std::{Coin, Uint128};
use relay_fee_types::coins::{add_coins, amount_of, normalize};

use crate::error::FeeError;

// ═══════════════════════════════════════════════════════════════════════════
// LEDGER SEAM
// ═══════════════════════════════════════════════════════════════════════════

/// The external balance ledger the fee core moves value through.
///
/// The core never holds balances itself; the escrow account is an ordinary
/// address on this ledger.
pub trait Bank {
    /// Move `amount` from one account to another. Fails with
    /// `InsufficientFunds` if `from` cannot cover any denom; on failure no
    /// balance changes.
    fn send(&self, from: &str, to: &str, amount: &[Coin]) -> Result<(), FeeError>;

    /// Balance of one denom held by an account
    fn balance(&self, address: &str, denom: &str) -> Uint128;

    fn account_exists(&self, address: &str) -> bool;

    /// Whether the account is disallowed from receiving arbitrary transfers
    fn is_blocked(&self, address: &str) -> bool;

    /// Check the address string is well formed. Fails with
    /// `AddressParseError`; no existence check implied.
    fn validate_address(&self, address: &str) -> Result<(), FeeError>;
}

// ═══════════════════════════════════════════════════════════════════════════
// IN-MEMORY BANK (for testing)
// ═══════════════════════════════════════════════════════════════════════════

/// In-memory ledger with a simple address format: non-empty ASCII
/// alphanumerics plus `-` and `_`.
#[derive(Clone, Debug, Default)]
pub struct MockBank {
    balances: Arc<RwLock<HashMap<String, Vec<Coin>>>>,
    accounts: Arc<RwLock<HashSet<String>>>,
    blocked: Arc<RwLock<HashSet<String>>>,
}

impl MockBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an account and credit it with an initial balance
    pub fn fund(&self, address: impl Into<String>, amount: &[Coin]) {
        let address = address.into();
        self.accounts.write().unwrap().insert(address.clone());
        let mut balances = self.balances.write().unwrap();
        let held = balances.entry(address).or_default();
        *held = add_coins(held, amount);
    }

    /// Register an account with no balance
    pub fn add_account(&self, address: impl Into<String>) {
        self.accounts.write().unwrap().insert(address.into());
    }

    /// Mark an address as disallowed from receiving transfers
    pub fn block(&self, address: impl Into<String>) {
        self.blocked.write().unwrap().insert(address.into());
    }

    /// All balances of an account, normalized
    pub fn all_balances(&self, address: &str) -> Vec<Coin> {
        self.balances
            .read()
            .unwrap()
            .get(address)
            .map(|coins| normalize(coins))
            .unwrap_or_default()
    }
}

impl Bank for MockBank {
    fn send(&self, from: &str, to: &str, amount: &[Coin]) -> Result<(), FeeError> {
        let amount = normalize(amount);
        let mut balances = self.balances.write().unwrap();

        let held = balances.get(from).cloned().unwrap_or_default();
        for coin in &amount {
            if amount_of(&held, &coin.denom) < coin.amount {
                return Err(FeeError::InsufficientFunds {
                    address: from.to_string(),
                    denom: coin.denom.clone(),
                });
            }
        }

        let mut remaining = Vec::new();
        for coin in normalize(&held) {
            let debit = amount_of(&amount, &coin.denom);
            let left = coin.amount - debit;
            if !left.is_zero() {
                remaining.push(Coin {
                    denom: coin.denom,
                    amount: left,
                });
            }
        }
        balances.insert(from.to_string(), remaining);

        let receiver = balances.entry(to.to_string()).or_default();
        *receiver = add_coins(receiver, &amount);
        drop(balances);

        self.accounts.write().unwrap().insert(to.to_string());
        Ok(())
    }

    fn balance(&self, address: &str, denom: &str) -> Uint128 {
        amount_of(&self.all_balances(address), denom)
    }

    fn account_exists(&self, address: &str) -> bool {
        self.accounts.read().unwrap().contains(address)
    }

    fn is_blocked(&self, address: &str) -> bool {
        self.blocked.read().unwrap().contains(address)
    }

    fn validate_address(&self, address: &str) -> Result<(), FeeError> {
        let well_formed = !address.is_empty()
            && address
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if well_formed {
            Ok(())
        } else {
            Err(FeeError::AddressParseError {
                address: address.to_string(),
            })
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════
