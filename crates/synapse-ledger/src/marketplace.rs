//! Application marketplace
//!
//! Listings created by developers and purchase records created when a user
//! buys an application. A purchase composes with the reward token ledger:
//! the price moves from buyer to developer and the ownership row is
//! recorded in the same atomic step. Every guard on both modules runs
//! before the first table write, so a failed purchase leaves no trace.

use crate::allocator::IdAllocator;
use crate::context::CallContext;
use crate::token::RewardTokenLedger;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use synapse_core::{ApplicationId, LedgerError, Principal, Result, Timestamp};
use tracing::debug;

/// A marketplace application listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    /// Developer that listed the application; immutable
    pub developer: Principal,
    /// Display name
    pub name: String,
    /// Description shown to buyers
    pub description: String,
    /// Purchase price in reward tokens
    pub price: u64,
    /// Whether the listing can currently be purchased
    pub active: bool,
}

/// Purchase record for one (user, application) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserApplication {
    /// Logical clock value at purchase time
    pub purchased_at: Timestamp,
}

/// Listings and purchases
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketplaceLedger {
    applications: BTreeMap<ApplicationId, Application>,
    purchases: BTreeMap<(Principal, ApplicationId), UserApplication>,
    allocator: IdAllocator,
}

impl MarketplaceLedger {
    /// Create an empty marketplace
    pub fn new() -> Self {
        Self::default()
    }

    /// List a new application developed by the caller
    ///
    /// The listing starts active. Always succeeds; returns the new id.
    pub fn list_application(
        &mut self,
        ctx: &CallContext,
        name: impl Into<String>,
        description: impl Into<String>,
        price: u64,
    ) -> ApplicationId {
        let id = ApplicationId::new(self.allocator.allocate());
        self.applications.insert(
            id,
            Application {
                developer: ctx.caller(),
                name: name.into(),
                description: description.into(),
                price,
                active: true,
            },
        );
        debug!("listed application {} by {}", id, ctx.caller());
        id
    }

    /// Activate or deactivate a listing; developer only
    ///
    /// Setting the flag to its current value is a no-op and succeeds.
    pub fn update_application_status(
        &mut self,
        ctx: &CallContext,
        id: ApplicationId,
        active: bool,
    ) -> Result<()> {
        let application = self
            .applications
            .get_mut(&id)
            .ok_or_else(|| LedgerError::not_found(format!("application {id}")))?;
        if application.developer != ctx.caller() {
            return Err(LedgerError::unauthorized(format!(
                "only the developer may update {id}"
            )));
        }
        application.active = active;
        debug!("application {} active = {}", id, active);
        Ok(())
    }

    /// Purchase an application for the caller
    ///
    /// Moves the price from the caller to the developer through the token
    /// ledger and records ownership, as one atomic unit: the token transfer
    /// is the last fallible step, and the ownership row is only written
    /// after it succeeds. A repeat purchase of the same application is
    /// rejected before any token movement.
    pub fn purchase_application(
        &mut self,
        ctx: &CallContext,
        id: ApplicationId,
        token: &mut RewardTokenLedger,
    ) -> Result<()> {
        let buyer = ctx.caller();
        let application = self
            .applications
            .get(&id)
            .ok_or_else(|| LedgerError::not_found(format!("application {id}")))?;
        if !application.active {
            return Err(LedgerError::invalid_state(format!(
                "application {id} is not active"
            )));
        }
        if self.purchases.contains_key(&(buyer, id)) {
            return Err(LedgerError::invalid_state(format!(
                "application {id} already purchased"
            )));
        }

        token.transfer(ctx, application.price, buyer, application.developer)?;

        self.purchases.insert(
            (buyer, id),
            UserApplication {
                purchased_at: ctx.clock(),
            },
        );
        debug!("{} purchased application {}", buyer, id);
        Ok(())
    }

    /// Look up a listing; `None` if the id was never allocated
    pub fn application(&self, id: ApplicationId) -> Option<&Application> {
        self.applications.get(&id)
    }

    /// Look up a purchase record; `None` if `user` never bought `id`
    pub fn user_application(&self, user: Principal, id: ApplicationId) -> Option<&UserApplication> {
        self.purchases.get(&(user, id))
    }
}
