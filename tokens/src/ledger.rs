//! Per-node token balances.

use std::collections::BTreeMap;

use atlas_types::{NodeId, TokenAmount};

use crate::error::TokenError;

/// Balance store. `total_supply` always equals the sum of all balances.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TokenLedger {
    balances: BTreeMap<NodeId, TokenAmount>,
    total_supply: TokenAmount,
}

impl TokenLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from persisted balances, checking them against the recorded
    /// supply.
    pub fn restore(
        balances: BTreeMap<NodeId, TokenAmount>,
        total_supply: TokenAmount,
    ) -> Result<Self, TokenError> {
        let computed = balances
            .values()
            .try_fold(TokenAmount::ZERO, |acc, b| acc.checked_add(*b))
            .ok_or(TokenError::Overflow)?;
        if computed != total_supply {
            return Err(TokenError::SupplyMismatch {
                recorded: total_supply,
                computed,
            });
        }
        Ok(Self {
            balances,
            total_supply,
        })
    }

    pub fn balance(&self, node: &NodeId) -> TokenAmount {
        self.balances.get(node).copied().unwrap_or(TokenAmount::ZERO)
    }

    pub fn balances(&self) -> &BTreeMap<NodeId, TokenAmount> {
        &self.balances
    }

    pub fn total_supply(&self) -> TokenAmount {
        self.total_supply
    }

    /// Nodes that have ever held a balance.
    pub fn holders(&self) -> usize {
        self.balances.len()
    }

    /// Add `amount` to `node`. Crediting zero is a no-op. Returns the new
    /// balance.
    pub fn credit(&mut self, node: &NodeId, amount: TokenAmount) -> Result<TokenAmount, TokenError> {
        if amount.is_zero() {
            return Ok(self.balance(node));
        }
        let new_balance = self
            .balance(node)
            .checked_add(amount)
            .ok_or(TokenError::Overflow)?;
        let new_supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(TokenError::Overflow)?;
        self.balances.insert(node.clone(), new_balance);
        self.total_supply = new_supply;
        Ok(new_balance)
    }

    /// Remove `amount` from `node`.
    ///
    /// Fails without touching any balance if `amount` is zero or exceeds the
    /// node's balance. Returns the new balance.
    pub fn debit(&mut self, node: &NodeId, amount: TokenAmount) -> Result<TokenAmount, TokenError> {
        if amount.is_zero() {
            return Err(TokenError::ZeroAmount);
        }
        let available = self.balance(node);
        let new_balance = available
            .checked_sub(amount)
            .ok_or_else(|| TokenError::InsufficientBalance {
                node: node.clone(),
                requested: amount,
                available,
            })?;
        self.balances.insert(node.clone(), new_balance);
        self.total_supply = self.total_supply.saturating_sub(amount);
        Ok(new_balance)
    }

    /// True when the supply invariant holds.
    pub fn is_consistent(&self) -> bool {
        self.balances.values().sum::<TokenAmount>() == self.total_supply
    }
}
