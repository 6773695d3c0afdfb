//! Platform composition root
//!
//! Owns the four ledgers and wires the cross-module operations. The
//! platform owner is configuration injected once at construction; no code
//! path reassigns it. The whole platform state derives `Serialize` /
//! `Deserialize`, so an embedding persists or snapshots it by serializing
//! the `Platform` value itself.

use crate::context::CallContext;
use crate::data_storage::DataStorageLedger;
use crate::marketplace::MarketplaceLedger;
use crate::token::RewardTokenLedger;
use crate::training::TrainingLedger;
use serde::{Deserialize, Serialize};
use synapse_core::{ApplicationId, Principal, Result};

/// Immutable construction-time configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformConfig {
    /// Principal authorized for mint, reward, and metadata operations
    pub owner: Principal,
    /// Initial reward-token metadata URI
    pub token_uri: String,
}

/// The deterministic state-transition core of the platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Platform {
    marketplace: MarketplaceLedger,
    data_storage: DataStorageLedger,
    training: TrainingLedger,
    token: RewardTokenLedger,
}

impl Platform {
    /// Create a platform with empty ledgers from configuration
    pub fn new(config: PlatformConfig) -> Self {
        Self {
            marketplace: MarketplaceLedger::new(),
            data_storage: DataStorageLedger::new(),
            training: TrainingLedger::new(),
            token: RewardTokenLedger::new(config.owner, config.token_uri),
        }
    }

    /// The platform owner fixed at construction
    pub fn owner(&self) -> Principal {
        self.token.owner()
    }

    /// Purchase an application, composing marketplace and token ledgers
    ///
    /// The only entry point that mutates two modules; both are borrowed
    /// here so the composition stays a single atomic unit.
    pub fn purchase_application(&mut self, ctx: &CallContext, id: ApplicationId) -> Result<()> {
        self.marketplace
            .purchase_application(ctx, id, &mut self.token)
    }

    /// Marketplace ledger, read-only
    pub fn marketplace(&self) -> &MarketplaceLedger {
        &self.marketplace
    }

    /// Marketplace ledger, for single-module entry points
    pub fn marketplace_mut(&mut self) -> &mut MarketplaceLedger {
        &mut self.marketplace
    }

    /// Data storage ledger, read-only
    pub fn data_storage(&self) -> &DataStorageLedger {
        &self.data_storage
    }

    /// Data storage ledger, for single-module entry points
    pub fn data_storage_mut(&mut self) -> &mut DataStorageLedger {
        &mut self.data_storage
    }

    /// Training ledger, read-only
    pub fn training(&self) -> &TrainingLedger {
        &self.training
    }

    /// Training ledger, for single-module entry points
    pub fn training_mut(&mut self) -> &mut TrainingLedger {
        &mut self.training
    }

    /// Reward token ledger, read-only
    pub fn token(&self) -> &RewardTokenLedger {
        &self.token
    }

    /// Reward token ledger, for single-module entry points
    pub fn token_mut(&mut self) -> &mut RewardTokenLedger {
        &mut self.token
    }
}
