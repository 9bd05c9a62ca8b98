//! Pool creation and liquidity provision.

use tracing::info;

use super::Exchange;
use crate::domain::{AccountId, Amount, PoolId, TokenId, TokenPair};
use crate::error::DexError;
use crate::events::{Event, Receipt};
use crate::pools::ConstantProductPool;
use crate::traits::Ledger;

impl<L: Ledger> Exchange<L> {
    /// Creates a pool for an unordered token pair from the caller's funds
    /// and mints the initial LP supply to the caller (admin only).
    ///
    /// The tokens may be given in either order; the pool stores them in
    /// canonical order.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::Unauthorized`], [`DexError::InvalidAmount`] for a
    /// zero amount, [`DexError::InvalidToken`] for identical tokens,
    /// [`DexError::DuplicatePool`] if the pair already trades and
    /// [`DexError::InsufficientBalance`] if the caller cannot fund it.
    pub fn create_pool(
        &mut self,
        caller: &AccountId,
        token_x: &TokenId,
        amount_x: Amount,
        token_y: &TokenId,
        amount_y: Amount,
    ) -> Result<Receipt<PoolId>, DexError> {
        self.ensure_admin(caller, "create a pool")?;
        if amount_x.is_zero() || amount_y.is_zero() {
            return Err(DexError::InvalidAmount("pool reserves must be positive"));
        }
        let pair = TokenPair::new(token_x.clone(), token_y.clone())?;
        let (amount_a, amount_b) = if pair.first() == token_x {
            (amount_x, amount_y)
        } else {
            (amount_y, amount_x)
        };
        self.pools.ensure_pair_available(&pair)?;
        let supply = self.config.lp_bootstrap().initial_supply(amount_a, amount_b)?;
        self.ensure_funds(caller, pair.first(), amount_a)?;
        self.ensure_funds(caller, pair.second(), amount_b)?;

        let id = self.pools.next_id();
        let vault_a = self.ledger.withdraw(caller, pair.first(), amount_a)?;
        let vault_b = self.ledger.withdraw(caller, pair.second(), amount_b)?;
        let pool = ConstantProductPool::new(id, pair.clone(), vault_a, vault_b, supply)?;
        self.pools.insert(pool)?;
        self.lp_shares.credit(id, caller, supply)?;

        info!(
            pool_id = %id,
            token_a = %pair.first(),
            token_b = %pair.second(),
            reserve_a = %amount_a,
            reserve_b = %amount_b,
            lp_supply = %supply,
            "pool created"
        );

        let custody = self.custody();
        let events = vec![
            Event::TokensWithdrawn {
                token: pair.first().clone(),
                amount: amount_a,
                from: Some(caller.clone()),
            },
            Event::TokensWithdrawn {
                token: pair.second().clone(),
                amount: amount_b,
                from: Some(caller.clone()),
            },
            Event::LpTokensInitialized { pool_id: id },
            Event::TokensDeposited {
                token: pair.first().clone(),
                amount: amount_a,
                to: custody.clone(),
            },
            Event::TokensDeposited {
                token: pair.second().clone(),
                amount: amount_b,
                to: custody,
            },
            Event::LpTokensMinted {
                pool_id: id,
                amount: supply,
            },
            Event::LpTokensDeposited {
                pool_id: id,
                amount: supply,
                to: Some(caller.clone()),
            },
            Event::NewSwapPoolCreated {
                pool_id: id,
                token_a: pair.first().clone(),
                token_b: pair.second().clone(),
            },
            Event::PoolFreezeChanged {
                pool_id: id,
                is_frozen: false,
            },
        ];
        Ok(Receipt::new(id, events))
    }

    /// Deposits both tokens into a pool and mints LP shares to the caller.
    ///
    /// Amounts are in canonical (A, B) order. Minted shares follow the
    /// smaller of the two deposit ratios; both amounts are credited in full.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::UnknownPool`], [`DexError::PoolFrozen`],
    /// [`DexError::InvalidAmount`] and [`DexError::InsufficientBalance`].
    pub fn add_liquidity(
        &mut self,
        caller: &AccountId,
        pool_id: PoolId,
        amount_a: Amount,
        amount_b: Amount,
    ) -> Result<Receipt<Amount>, DexError> {
        let pool = self.pools.get(pool_id)?;
        let minted = pool.preview_add_liquidity(amount_a, amount_b, self.config.lp_bootstrap())?;
        let pair = pool.pair().clone();
        self.ensure_funds(caller, pair.first(), amount_a)?;
        self.ensure_funds(caller, pair.second(), amount_b)?;
        if self.lp_shares.balance(pool_id, caller).checked_add(&minted).is_none() {
            return Err(DexError::Overflow("LP balance overflow"));
        }

        let vault_a = self.ledger.withdraw(caller, pair.first(), amount_a)?;
        let vault_b = self.ledger.withdraw(caller, pair.second(), amount_b)?;
        self.pools
            .get_mut(pool_id)?
            .deposit_liquidity(vault_a, vault_b, minted)?;
        self.lp_shares.credit(pool_id, caller, minted)?;

        info!(pool_id = %pool_id, caller = %caller, %amount_a, %amount_b, %minted, "liquidity added");

        let custody = self.custody();
        let events = vec![
            Event::TokensWithdrawn {
                token: pair.first().clone(),
                amount: amount_a,
                from: Some(caller.clone()),
            },
            Event::TokensWithdrawn {
                token: pair.second().clone(),
                amount: amount_b,
                from: Some(caller.clone()),
            },
            Event::TokensDeposited {
                token: pair.first().clone(),
                amount: amount_a,
                to: custody.clone(),
            },
            Event::TokensDeposited {
                token: pair.second().clone(),
                amount: amount_b,
                to: custody,
            },
            Event::LpTokensMinted {
                pool_id,
                amount: minted,
            },
            Event::LpTokensDeposited {
                pool_id,
                amount: minted,
                to: Some(caller.clone()),
            },
        ];
        Ok(Receipt::new(minted, events))
    }

    /// Burns the caller's LP shares and returns the proportional reserves
    /// as `(amount_a, amount_b)`.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::UnknownPool`], [`DexError::PoolFrozen`],
    /// [`DexError::InvalidAmount`], [`DexError::InsufficientLiquidity`] and
    /// [`DexError::InsufficientBalance`] if the caller holds fewer shares.
    pub fn remove_liquidity(
        &mut self,
        caller: &AccountId,
        pool_id: PoolId,
        lp_amount: Amount,
    ) -> Result<Receipt<(Amount, Amount)>, DexError> {
        let pool = self.pools.get(pool_id)?;
        let (out_a, out_b) = pool.preview_remove_liquidity(lp_amount)?;
        let pair = pool.pair().clone();
        self.lp_shares.ensure_covers(pool_id, caller, lp_amount)?;
        self.ensure_receivable(caller, pair.first(), out_a)?;
        self.ensure_receivable(caller, pair.second(), out_b)?;

        self.lp_shares.debit(pool_id, caller, lp_amount)?;
        let (vault_a, vault_b) = self
            .pools
            .get_mut(pool_id)?
            .withdraw_liquidity(lp_amount, out_a, out_b)?;
        self.ledger.deposit(caller, vault_a)?;
        self.ledger.deposit(caller, vault_b)?;

        info!(pool_id = %pool_id, caller = %caller, %lp_amount, %out_a, %out_b, "liquidity removed");

        let custody = self.custody();
        let events = vec![
            Event::LpTokensWithdrawn {
                pool_id,
                amount: lp_amount,
                from: Some(caller.clone()),
            },
            Event::LpTokensBurned {
                pool_id,
                amount: lp_amount,
            },
            Event::TokensWithdrawn {
                token: pair.first().clone(),
                amount: out_a,
                from: custody.clone(),
            },
            Event::TokensDeposited {
                token: pair.first().clone(),
                amount: out_a,
                to: Some(caller.clone()),
            },
            Event::TokensWithdrawn {
                token: pair.second().clone(),
                amount: out_b,
                from: custody,
            },
            Event::TokensDeposited {
                token: pair.second().clone(),
                amount: out_b,
                to: Some(caller.clone()),
            },
        ];
        Ok(Receipt::new((out_a, out_b), events))
    }
}
