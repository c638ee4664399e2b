//! Helpers over multi-denomination amounts represented as `Vec<Coin>`.
//!
//! Every amount handled by the fee core is kept normalized: sorted by
//! denom, one entry per denom, no zero entries.

use cosmwasm_std::{Coin, Uint128};

/// Normalize a coin list: merge duplicate denoms, drop zeros, sort by denom
pub fn normalize(coins: &[Coin]) -> Vec<Coin> {
    let mut merged: Vec<Coin> = Vec::new();
    for coin in coins {
        if coin.amount.is_zero() {
            continue;
        }
        match merged.iter_mut().find(|c| c.denom == coin.denom) {
            Some(existing) => existing.amount += coin.amount,
            None => merged.push(coin.clone()),
        }
    }
    merged.sort_by(|a, b| a.denom.cmp(&b.denom));
    merged
}

/// Sum of two coin lists, normalized
pub fn add_coins(lhs: &[Coin], rhs: &[Coin]) -> Vec<Coin> {
    let mut combined = lhs.to_vec();
    combined.extend_from_slice(rhs);
    normalize(&combined)
}

/// Amount of a single denom within a coin list (zero if absent)
pub fn amount_of(coins: &[Coin], denom: &str) -> Uint128 {
    coins
        .iter()
        .filter(|c| c.denom == denom)
        .map(|c| c.amount)
        .sum()
}
