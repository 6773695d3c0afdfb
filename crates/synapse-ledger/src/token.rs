//! Reward token ledger
//!
//! Fungible balance ledger for the platform's reward token: per-principal
//! balances, a cumulative-rewards accumulator, and a metadata URI. Minting
//! and rewarding are restricted to the platform owner. Transfers are
//! self-authorized only; the caller must be the debited sender, and there
//! are no delegated transfers.
//!
//! Supply invariant: the sum of all balances changes only through `mint`
//! and `reward_achievement`; `transfer` is supply-neutral.

use crate::context::CallContext;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use synapse_core::{LedgerError, Principal, Result};
use tracing::debug;

/// Balance, reward, and metadata state for the reward token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardTokenLedger {
    /// Platform owner; fixed at construction, never reassigned
    owner: Principal,
    /// Per-principal balances; absent means zero
    balances: BTreeMap<Principal, u64>,
    /// Cumulative amount ever credited per principal via reward_achievement
    total_rewards: BTreeMap<Principal, u64>,
    /// Token metadata URI
    token_uri: String,
}

impl RewardTokenLedger {
    /// Create an empty ledger owned by `owner`
    pub fn new(owner: Principal, token_uri: impl Into<String>) -> Self {
        Self {
            owner,
            balances: BTreeMap::new(),
            total_rewards: BTreeMap::new(),
            token_uri: token_uri.into(),
        }
    }

    /// The platform owner authorized for mint/reward/metadata operations
    pub fn owner(&self) -> Principal {
        self.owner
    }

    /// Mint `amount` new tokens to `recipient`
    ///
    /// Platform owner only. Fails with `ArithmeticOverflow` if the
    /// recipient balance would exceed the representable range; no state
    /// changes on failure.
    pub fn mint(&mut self, ctx: &CallContext, amount: u64, recipient: Principal) -> Result<()> {
        self.require_owner(ctx, "mint")?;

        let credited = self
            .balance_of(recipient)
            .checked_add(amount)
            .ok_or_else(|| LedgerError::overflow(format!("balance of {recipient}")))?;

        self.balances.insert(recipient, credited);
        debug!("minted {} to {}", amount, recipient);
        Ok(())
    }

    /// Move `amount` from `sender` to `recipient`
    ///
    /// The caller must be `sender`; balances are debited and credited in
    /// one step and total supply is unchanged. A transfer to self is legal
    /// and leaves the balance as it was, after the same validation.
    pub fn transfer(
        &mut self,
        ctx: &CallContext,
        amount: u64,
        sender: Principal,
        recipient: Principal,
    ) -> Result<()> {
        if ctx.caller() != sender {
            return Err(LedgerError::unauthorized(
                "transfer sender must be the caller",
            ));
        }

        let sender_balance = self.balance_of(sender);
        if sender_balance < amount {
            return Err(LedgerError::insufficient_funds(sender_balance, amount));
        }

        let debited = sender_balance - amount;
        let recipient_balance = if recipient == sender {
            debited
        } else {
            self.balance_of(recipient)
        };
        let credited = recipient_balance
            .checked_add(amount)
            .ok_or_else(|| LedgerError::overflow(format!("balance of {recipient}")))?;

        self.balances.insert(sender, debited);
        self.balances.insert(recipient, credited);
        debug!("transferred {} from {} to {}", amount, sender, recipient);
        Ok(())
    }

    /// Credit `user` with `amount` for a training achievement
    ///
    /// Platform owner only. Increments both the balance and the cumulative
    /// rewards accumulator as one step; both additions are checked before
    /// either table is touched.
    pub fn reward_achievement(
        &mut self,
        ctx: &CallContext,
        user: Principal,
        amount: u64,
    ) -> Result<()> {
        self.require_owner(ctx, "reward_achievement")?;

        let credited = self
            .balance_of(user)
            .checked_add(amount)
            .ok_or_else(|| LedgerError::overflow(format!("balance of {user}")))?;
        let accumulated = self
            .total_rewards_of(user)
            .checked_add(amount)
            .ok_or_else(|| LedgerError::overflow(format!("total rewards of {user}")))?;

        self.balances.insert(user, credited);
        self.total_rewards.insert(user, accumulated);
        debug!("rewarded {} to {}", amount, user);
        Ok(())
    }

    /// Balance of `account`; zero if never credited
    pub fn balance_of(&self, account: Principal) -> u64 {
        self.balances.get(&account).copied().unwrap_or(0)
    }

    /// Cumulative rewards ever credited to `user`; zero if never rewarded
    pub fn total_rewards_of(&self, user: Principal) -> u64 {
        self.total_rewards.get(&user).copied().unwrap_or(0)
    }

    /// Sum of all balances
    ///
    /// Widened to u128 so the sum is exact even when individual balances
    /// are near the u64 range.
    pub fn total_supply(&self) -> u128 {
        self.balances.values().map(|amount| u128::from(*amount)).sum()
    }

    /// Current token metadata URI
    pub fn token_uri(&self) -> &str {
        &self.token_uri
    }

    /// Replace the token metadata URI; platform owner only
    pub fn set_token_uri(&mut self, ctx: &CallContext, uri: impl Into<String>) -> Result<()> {
        self.require_owner(ctx, "set_token_uri")?;
        self.token_uri = uri.into();
        debug!("token uri updated by {}", ctx.caller());
        Ok(())
    }

    fn require_owner(&self, ctx: &CallContext, operation: &str) -> Result<()> {
        if ctx.caller() != self.owner {
            return Err(LedgerError::unauthorized(format!(
                "{operation} requires the platform owner"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn ledger() -> (RewardTokenLedger, Principal) {
        let owner = Principal::derive("token-owner");
        (RewardTokenLedger::new(owner, "https://synapse.example/token"), owner)
    }

    #[test]
    fn mint_requires_owner() {
        let (mut ledger, owner) = ledger();
        let outsider = Principal::derive("outsider");
        let recipient = Principal::derive("recipient");

        let err = ledger
            .mint(&CallContext::new(outsider, 1), 100, recipient)
            .unwrap_err();
        assert_matches!(err, LedgerError::Unauthorized { .. });
        assert_eq!(ledger.balance_of(recipient), 0);

        ledger
            .mint(&CallContext::new(owner, 2), 100, recipient)
            .unwrap();
        assert_eq!(ledger.balance_of(recipient), 100);
    }

    #[test]
    fn mint_overflow_leaves_balance_unchanged() {
        let (mut ledger, owner) = ledger();
        let recipient = Principal::derive("rich");
        ledger
            .mint(&CallContext::new(owner, 1), u64::MAX, recipient)
            .unwrap();

        let err = ledger
            .mint(&CallContext::new(owner, 2), 1, recipient)
            .unwrap_err();
        assert_matches!(err, LedgerError::ArithmeticOverflow { .. });
        assert_eq!(ledger.balance_of(recipient), u64::MAX);
    }

    #[test]
    fn transfer_moves_exact_amount() {
        let (mut ledger, owner) = ledger();
        let alice = Principal::derive("alice");
        let bob = Principal::derive("bob");
        ledger.mint(&CallContext::new(owner, 1), 500, alice).unwrap();

        ledger
            .transfer(&CallContext::new(alice, 2), 120, alice, bob)
            .unwrap();
        assert_eq!(ledger.balance_of(alice), 380);
        assert_eq!(ledger.balance_of(bob), 120);
        assert_eq!(ledger.total_supply(), 500);
    }

    #[test]
    fn transfer_rejects_delegation() {
        let (mut ledger, owner) = ledger();
        let alice = Principal::derive("alice");
        let mallory = Principal::derive("mallory");
        ledger.mint(&CallContext::new(owner, 1), 500, alice).unwrap();

        let err = ledger
            .transfer(&CallContext::new(mallory, 2), 100, alice, mallory)
            .unwrap_err();
        assert_matches!(err, LedgerError::Unauthorized { .. });
        assert_eq!(ledger.balance_of(alice), 500);
        assert_eq!(ledger.balance_of(mallory), 0);
    }

    #[test]
    fn transfer_rejects_insufficient_funds() {
        let (mut ledger, owner) = ledger();
        let alice = Principal::derive("alice");
        let bob = Principal::derive("bob");
        ledger.mint(&CallContext::new(owner, 1), 50, alice).unwrap();

        let err = ledger
            .transfer(&CallContext::new(alice, 2), 51, alice, bob)
            .unwrap_err();
        assert_eq!(
            err,
            LedgerError::InsufficientFunds {
                balance: 50,
                requested: 51
            }
        );
        assert_eq!(ledger.balance_of(alice), 50);
        assert_eq!(ledger.balance_of(bob), 0);
    }

    #[test]
    fn self_transfer_is_validated_and_neutral() {
        let (mut ledger, owner) = ledger();
        let alice = Principal::derive("alice");
        ledger.mint(&CallContext::new(owner, 1), 75, alice).unwrap();

        ledger
            .transfer(&CallContext::new(alice, 2), 75, alice, alice)
            .unwrap();
        assert_eq!(ledger.balance_of(alice), 75);

        let err = ledger
            .transfer(&CallContext::new(alice, 3), 76, alice, alice)
            .unwrap_err();
        assert_matches!(err, LedgerError::InsufficientFunds { .. });
    }

    #[test]
    fn reward_updates_balance_and_accumulator_together() {
        let (mut ledger, owner) = ledger();
        let user = Principal::derive("trainee");

        ledger
            .reward_achievement(&CallContext::new(owner, 1), user, 40)
            .unwrap();
        ledger
            .reward_achievement(&CallContext::new(owner, 2), user, 60)
            .unwrap();
        assert_eq!(ledger.balance_of(user), 100);
        assert_eq!(ledger.total_rewards_of(user), 100);

        // Spending does not shrink the accumulator.
        let sink = Principal::derive("sink");
        ledger
            .transfer(&CallContext::new(user, 3), 100, user, sink)
            .unwrap();
        assert_eq!(ledger.balance_of(user), 0);
        assert_eq!(ledger.total_rewards_of(user), 100);
    }

    #[test]
    fn reward_requires_owner() {
        let (mut ledger, _owner) = ledger();
        let outsider = Principal::derive("outsider");

        let err = ledger
            .reward_achievement(&CallContext::new(outsider, 1), outsider, 10)
            .unwrap_err();
        assert_matches!(err, LedgerError::Unauthorized { .. });
        assert_eq!(ledger.total_rewards_of(outsider), 0);
    }

    #[test]
    fn reward_overflow_touches_neither_table() {
        let (mut ledger, owner) = ledger();
        let user = Principal::derive("trainee");
        ledger
            .reward_achievement(&CallContext::new(owner, 1), user, u64::MAX)
            .unwrap();
        // Drain the balance so only the accumulator can overflow.
        let sink = Principal::derive("sink");
        ledger
            .transfer(&CallContext::new(user, 2), u64::MAX, user, sink)
            .unwrap();

        let err = ledger
            .reward_achievement(&CallContext::new(owner, 3), user, 1)
            .unwrap_err();
        assert_matches!(err, LedgerError::ArithmeticOverflow { .. });
        assert_eq!(ledger.balance_of(user), 0);
        assert_eq!(ledger.total_rewards_of(user), u64::MAX);
    }

    #[test]
    fn token_uri_write_is_owner_only() {
        let (mut ledger, owner) = ledger();
        let outsider = Principal::derive("outsider");
        assert_eq!(ledger.token_uri(), "https://synapse.example/token");

        let err = ledger
            .set_token_uri(&CallContext::new(outsider, 1), "https://evil.example")
            .unwrap_err();
        assert_matches!(err, LedgerError::Unauthorized { .. });
        assert_eq!(ledger.token_uri(), "https://synapse.example/token");

        ledger
            .set_token_uri(&CallContext::new(owner, 2), "https://synapse.example/token/v2")
            .unwrap();
        assert_eq!(ledger.token_uri(), "https://synapse.example/token/v2");
    }
}
