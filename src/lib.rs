//! # Hydra DEX
//!
//! Multi-pool constant-product exchange with DAO fee routing and an LP
//! yield-farming engine.
//!
//! The crate models a decentralized exchange as one owned [`Exchange`]
//! context:
//!
//! - **Pools**: one per unordered token pair, priced by `x · y = k`, with a
//!   DAO fee sent to the treasury and an LP fee kept in the reserves.
//! - **Farms**: stake a pool's LP shares and earn exchange-wide reward
//!   tokens through accumulated-per-share accounting.
//! - **Treasury**: per-token buckets of DAO fees, withdrawable by the admin.
//!
//! Every amount is an 8-decimal fixed-point [`Amount`](domain::Amount).
//! Time comes from an injected [`Clock`](traits::Clock) and tokens move
//! through an injected [`Ledger`](traits::Ledger), so the engine runs the
//! same against an in-memory ledger and mock time in tests as against a
//! real custody backend.
//!
//! ## Create a pool and execute a swap
//!
//! ```rust
//! use hydra_dex::prelude::*;
//!
//! let admin = AccountId::new("0xf8d6e0586b0a20c7").expect("valid address");
//! let flow = TokenId::resolve("flowTokenVault").expect("alias");
//! let fusd = TokenId::resolve("fusdVault").expect("alias");
//! let amount = |s: &str| s.parse::<Amount>().expect("amount literal");
//!
//! let mut ledger = InMemoryLedger::new();
//! ledger.mint(&admin, &flow, amount("1000")).expect("mint");
//! ledger.mint(&admin, &fusd, amount("1000")).expect("mint");
//!
//! let config = ExchangeConfig::new(admin.clone())
//!     .with_clock(ClockConfig::Mock { start: Timestamp::ZERO });
//! let mut dex = Exchange::new(config, ledger).expect("valid config");
//!
//! let pool = dex
//!     .create_pool(&admin, &flow, amount("100"), &fusd, amount("150"))
//!     .expect("pool created")
//!     .value;
//!
//! let swap = dex.swap(&admin, pool, &flow, amount("0.1")).expect("swap");
//! assert_eq!(swap.value.amount_out().to_string(), "0.14910164");
//! assert_eq!(swap.events.len(), 7);
//! assert_eq!(dex.read_fees_collected()[&flow].to_string(), "0.00025000");
//! ```
//!
//! ## Stake LP shares and claim rewards
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use hydra_dex::clock::MockClock;
//! use hydra_dex::prelude::*;
//!
//! let admin = AccountId::new("0xf8d6e0586b0a20c7").expect("valid address");
//! let flow = TokenId::resolve("flowTokenVault").expect("alias");
//! let fusd = TokenId::resolve("fusdVault").expect("alias");
//! let emu = TokenId::resolve("emuTokenVault").expect("alias");
//! let amount = |s: &str| s.parse::<Amount>().expect("amount literal");
//!
//! let mut ledger = InMemoryLedger::new();
//! for token in [&flow, &fusd, &emu] {
//!     ledger.mint(&admin, token, amount("1000")).expect("mint");
//! }
//! let clock = Arc::new(MockClock::new(Timestamp::ZERO));
//! let mut dex = Exchange::with_clock(ExchangeConfig::new(admin.clone()), ledger, clock.clone())
//!     .expect("valid config");
//!
//! let pool = dex
//!     .create_pool(&admin, &flow, amount("100"), &fusd, amount("150"))
//!     .expect("pool created")
//!     .value;
//! dex.create_farm(&admin, pool.farm()).expect("farm");
//! dex.create_reward_pool(&admin, &emu, amount("500"), Vec::new()).expect("rewards");
//! dex.stake(&admin, pool.farm(), amount("1")).expect("stake");
//!
//! clock.advance(amount("100")).expect("advance");
//! let claimed = dex.claim_rewards(&admin, pool.farm()).expect("claim").value;
//! assert_eq!(claimed[&RewardId::new(0)].to_string(), "100.00000000");
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐
//! │   Exchange    │  admin checks, preview → transfer → commit, events
//! └──────┬───────┘
//!        │
//!        ├──────────────┬───────────────┬──────────────┐
//!        ▼              ▼               ▼              ▼
//! ┌────────────┐ ┌────────────┐ ┌─────────────┐ ┌────────────┐
//! │PoolRegistry│ │FarmRegistry│ │  Treasury   │ │LpShareBook │
//! └─────┬──────┘ └─────┬──────┘ └─────────────┘ └────────────┘
//!       ▼              ▼
//!  ConstantProduct   Farm / Stake / RewardPool
//!       │              │
//!       └──────┬───────┘
//!              ▼
//! ┌──────────────────────┐
//! │  Domain + math       │  Amount, FeeRate, TokenPair, Vault, …
//! └──────────────────────┘
//! ```
//!
//! # Module Guide
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`exchange`] | The [`Exchange`] context and every public operation |
//! | [`pools`] | [`ConstantProductPool`](pools::ConstantProductPool), pool registry, LP share book |
//! | [`farms`] | Farms, stakes, reward pools and accrual |
//! | [`treasury`] | DAO fee buckets |
//! | [`events`] | [`Event`](events::Event) and [`Receipt`](events::Receipt) |
//! | [`domain`] | Value types: [`Amount`](domain::Amount), [`TokenId`](domain::TokenId), [`Vault`](domain::Vault), … |
//! | [`traits`] | Capability seams: [`Clock`](traits::Clock), [`Ledger`](traits::Ledger) |
//! | [`clock`] | [`SystemClock`](clock::SystemClock) and [`MockClock`](clock::MockClock) |
//! | [`ledger`] | [`InMemoryLedger`](ledger::InMemoryLedger) |
//! | [`config`] | [`ExchangeConfig`](config::ExchangeConfig) |
//! | [`math`] | Checked arithmetic and rounding primitives |
//! | [`error`] | [`DexError`](error::DexError) and its [`ErrorKind`](error::ErrorKind) taxonomy |
//! | [`prelude`] | Convenience re-exports |
//!
//! [`Exchange`]: exchange::Exchange

pub mod clock;
pub mod config;
pub mod domain;
pub mod error;
pub mod events;
pub mod exchange;
pub mod farms;
pub mod ledger;
pub mod math;
pub mod pools;
pub mod prelude;
pub mod traits;
pub mod treasury;
