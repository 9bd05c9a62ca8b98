//! Events emitted by exchange operations.
//!
//! Each mutating operation returns its events in emission order inside a
//! [`Receipt`]. Events serialize with a `type` tag and camelCase fields, and
//! every amount renders as a decimal string with eight fractional digits.
//! An account field of `None` stands for a vault in transit that belongs to
//! no account (serialized as `null`).

use serde::Serialize;

use crate::domain::{AccountId, Amount, FarmId, FeeRate, PoolId, RewardId, Side, TokenId};

/// Which global swap fee an update targeted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FeeKind {
    /// Fee retained by liquidity providers.
    Lp,
    /// Fee routed to the treasury.
    Dao,
}

/// A named, ordered side effect of an exchange operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum Event {
    /// Fungible tokens left an account or vault.
    TokensWithdrawn {
        /// Token moved.
        token: TokenId,
        /// Amount moved.
        amount: Amount,
        /// Source account.
        from: Option<AccountId>,
    },
    /// Fungible tokens arrived in an account or vault.
    TokensDeposited {
        /// Token moved.
        token: TokenId,
        /// Amount moved.
        amount: Amount,
        /// Destination account.
        to: Option<AccountId>,
    },
    /// A pool's LP share token came into existence.
    LpTokensInitialized {
        /// Pool (and LP token) id.
        pool_id: PoolId,
    },
    /// LP shares were minted.
    LpTokensMinted {
        /// Pool (and LP token) id.
        pool_id: PoolId,
        /// Shares minted.
        amount: Amount,
    },
    /// LP shares were burned.
    LpTokensBurned {
        /// Pool (and LP token) id.
        pool_id: PoolId,
        /// Shares burned.
        amount: Amount,
    },
    /// LP shares left an account or staking vault.
    LpTokensWithdrawn {
        /// Pool (and LP token) id.
        pool_id: PoolId,
        /// Shares moved.
        amount: Amount,
        /// Source account.
        from: Option<AccountId>,
    },
    /// LP shares arrived in an account or staking vault.
    LpTokensDeposited {
        /// Pool (and LP token) id.
        pool_id: PoolId,
        /// Shares moved.
        amount: Amount,
        /// Destination account.
        to: Option<AccountId>,
    },
    /// A pool was registered.
    NewSwapPoolCreated {
        /// New pool id.
        pool_id: PoolId,
        /// Canonical token A.
        token_a: TokenId,
        /// Canonical token B.
        token_b: TokenId,
    },
    /// A pool's frozen flag was set or toggled.
    PoolFreezeChanged {
        /// Pool id.
        pool_id: PoolId,
        /// New state.
        is_frozen: bool,
    },
    /// The DAO fee of a swap reached the treasury.
    FeesDeposited {
        /// Fee bucket label (`<token>.Vault`).
        token_identifier: String,
        /// Fee amount.
        amount: Amount,
    },
    /// A swap was priced and settled.
    Trade {
        /// Pool id.
        pool_id: PoolId,
        /// `1` for A to B, `2` for B to A.
        side: Side,
        /// Token A side of the trade.
        token_a_amount: Amount,
        /// Token B side of the trade.
        token_b_amount: Amount,
    },
    /// A treasury bucket was paid out to the fee sink.
    FeesReceived {
        /// Token paid out.
        token: TokenId,
        /// Amount paid out.
        amount: Amount,
        /// Fee sink account.
        to: AccountId,
    },
    /// A global swap fee changed.
    FeeUpdated {
        /// Which fee.
        kind: FeeKind,
        /// New fraction.
        fee: FeeRate,
    },
    /// A farm was registered.
    NewFarmCreated {
        /// Farm id.
        farm_id: FarmId,
    },
    /// A reward pool was funded.
    RewardPoolCreated {
        /// Reward pool id.
        reward_id: RewardId,
        /// Reward token.
        token: TokenId,
        /// Funded amount.
        amount: Amount,
    },
    /// A reward pool's emission rate changed.
    RewardRateUpdated {
        /// Reward pool id.
        reward_id: RewardId,
        /// New rate.
        tokens_per_second: Amount,
    },
    /// A farm's share of a reward pool changed.
    FarmWeightUpdated {
        /// Farm id.
        farm_id: FarmId,
        /// Reward pool id.
        reward_id: RewardId,
        /// New weight.
        weight: Amount,
    },
    /// An account staked in a farm for the first time.
    StakingControllerDeposited {
        /// Farm id.
        farm_id: FarmId,
        /// Staker.
        to: AccountId,
    },
    /// LP shares were staked.
    TokensStaked {
        /// Staker.
        address: AccountId,
        /// Farm id (equal to the staked LP pool id).
        pool_id: FarmId,
        /// Amount added.
        amount_staked: Amount,
        /// Farm total after the stake.
        total_staked: Amount,
    },
    /// LP shares were unstaked.
    TokensUnstaked {
        /// Staker.
        address: AccountId,
        /// Farm id.
        pool_id: FarmId,
        /// Amount removed.
        amount_unstaked: Amount,
        /// Farm total after the unstake.
        total_staked: Amount,
    },
    /// Rewards of one reward pool were paid to a staker.
    RewardsClaimed {
        /// Staker.
        address: AccountId,
        /// Farm id.
        farm_id: FarmId,
        /// Reward pool id.
        reward_id: RewardId,
        /// Amount paid.
        amount_claimed: Amount,
        /// Staker's reward debt after the claim.
        reward_debt: Amount,
        /// Reward vault type (`<token>.Vault`).
        token_type: String,
        /// Reward vault balance after the payout.
        total_remaining: Amount,
    },
}

impl Event {
    /// Returns the event name as it appears in the serialized `type` tag.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::TokensWithdrawn { .. } => "TokensWithdrawn",
            Self::TokensDeposited { .. } => "TokensDeposited",
            Self::LpTokensInitialized { .. } => "LpTokensInitialized",
            Self::LpTokensMinted { .. } => "LpTokensMinted",
            Self::LpTokensBurned { .. } => "LpTokensBurned",
            Self::LpTokensWithdrawn { .. } => "LpTokensWithdrawn",
            Self::LpTokensDeposited { .. } => "LpTokensDeposited",
            Self::NewSwapPoolCreated { .. } => "NewSwapPoolCreated",
            Self::PoolFreezeChanged { .. } => "PoolFreezeChanged",
            Self::FeesDeposited { .. } => "FeesDeposited",
            Self::Trade { .. } => "Trade",
            Self::FeesReceived { .. } => "FeesReceived",
            Self::FeeUpdated { .. } => "FeeUpdated",
            Self::NewFarmCreated { .. } => "NewFarmCreated",
            Self::RewardPoolCreated { .. } => "RewardPoolCreated",
            Self::RewardRateUpdated { .. } => "RewardRateUpdated",
            Self::FarmWeightUpdated { .. } => "FarmWeightUpdated",
            Self::StakingControllerDeposited { .. } => "StakingControllerDeposited",
            Self::TokensStaked { .. } => "TokensStaked",
            Self::TokensUnstaked { .. } => "TokensUnstaked",
            Self::RewardsClaimed { .. } => "RewardsClaimed",
        }
    }
}

/// The value produced by an operation together with the events it emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct Receipt<T> {
    /// Operation result.
    pub value: T,
    /// Events in emission order.
    pub events: Vec<Event>,
}

impl<T> Receipt<T> {
    /// Wraps a value and its events.
    pub const fn new(value: T, events: Vec<Event>) -> Self {
        Self { value, events }
    }

    /// Returns the event names in order.
    #[must_use]
    pub fn event_names(&self) -> Vec<&'static str> {
        self.events.iter().map(Event::name).collect()
    }

    /// Splits the receipt.
    pub fn into_parts(self) -> (T, Vec<Event>) {
        (self.value, self.events)
    }
}
