//! Deterministic test environment for the Synapse ledgers
//!
//! Provides what production embeddings provide (caller identity and a
//! logical clock) under full test control: principals derived from stable
//! labels, a manually advanced monotonic clock, and a pre-funded platform
//! fixture. No randomness, no system time.

use std::sync::Once;
use synapse_core::{Principal, Timestamp};
use synapse_ledger::{CallContext, Platform, PlatformConfig};

static TRACING: Once = Once::new();

/// Install a fmt tracing subscriber honoring `RUST_LOG`
///
/// Idempotent; call from any test that wants ledger debug output.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    });
}

/// Derive a stable principal for a test account label
pub fn test_principal(label: &str) -> Principal {
    Principal::derive(label)
}

/// Controllable execution environment
///
/// Mints one `CallContext` per call at the current clock value. The clock
/// only moves forward, mirroring the monotonicity the production
/// environment guarantees.
#[derive(Debug, Clone)]
pub struct TestEnv {
    clock: Timestamp,
}

impl TestEnv {
    /// Create an environment with the clock at zero
    pub fn new() -> Self {
        Self { clock: 0 }
    }

    /// Create an environment with the clock at `clock`
    pub fn with_clock(clock: Timestamp) -> Self {
        Self { clock }
    }

    /// Current clock value
    pub fn clock(&self) -> Timestamp {
        self.clock
    }

    /// Move the clock forward by `delta`
    pub fn advance(&mut self, delta: u64) {
        self.clock += delta;
    }

    /// Set the clock to an absolute value
    ///
    /// # Panics
    /// Panics if `clock` is behind the current value; the environment
    /// never hands out decreasing clock values.
    pub fn set_clock(&mut self, clock: Timestamp) {
        assert!(
            clock >= self.clock,
            "test clock may not go backwards: {} -> {}",
            self.clock,
            clock
        );
        self.clock = clock;
    }

    /// Context for a call by `caller` at the current clock value
    pub fn ctx(&self, caller: Principal) -> CallContext {
        CallContext::new(caller, self.clock)
    }

    /// Advance the clock by one tick and mint a context
    ///
    /// Convenient for sequences where every call should carry a distinct
    /// timestamp.
    pub fn next_ctx(&mut self, caller: Principal) -> CallContext {
        self.advance(1);
        self.ctx(caller)
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

/// A platform plus the environment driving it
///
/// The standard integration-test fixture: platform owner derived from a
/// well-known label, empty ledgers, clock at zero.
#[derive(Debug, Clone)]
pub struct TestPlatform {
    /// The platform under test
    pub platform: Platform,
    /// The environment minting call contexts
    pub env: TestEnv,
    /// The platform owner configured at construction
    pub owner: Principal,
}

impl TestPlatform {
    /// Create a fresh platform fixture
    pub fn new() -> Self {
        let owner = test_principal("platform-owner");
        let platform = Platform::new(PlatformConfig {
            owner,
            token_uri: "https://synapse.test/token".to_string(),
        });
        Self {
            platform,
            env: TestEnv::new(),
            owner,
        }
    }

    /// Mint `amount` reward tokens to `account` as the platform owner
    ///
    /// # Panics
    /// Panics if minting fails; fixtures fund accounts far below overflow.
    pub fn fund(&mut self, account: Principal, amount: u64) {
        let ctx = self.env.next_ctx(self.owner);
        self.platform
            .token_mut()
            .mint(&ctx, amount, account)
            .expect("fixture funding should not fail");
    }
}

impl Default for TestPlatform {
    fn default() -> Self {
        Self::new()
    }
}
