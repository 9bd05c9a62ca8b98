//! Constant Product AMM pool implementation (`x · y = k`).
//!
//! The pool holds its reserves as [`Vault`]s and tracks the outstanding LP
//! share supply. Swaps split the input into a DAO fee (routed out by the
//! caller), an LP fee (kept in the pool without moving the price) and the
//! priced remainder.
//!
//! Every state change comes as a pair: a `preview_*` method that validates
//! and computes without touching state, and a settle method that applies
//! the previewed amounts. The exchange previews, moves tokens, then
//! settles, so a rejected operation never leaves partial state behind.

use serde::Serialize;

use crate::config::LpBootstrap;
use crate::domain::{Amount, FeeRate, PoolId, Rounding, Side, SwapResult, TokenId, TokenPair, Vault};
use crate::error::DexError;
use crate::math::CheckedArithmetic;

/// The global swap fees in effect for a swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FeeSchedule {
    /// Fraction routed to the treasury.
    pub dao_fee: FeeRate,
    /// Fraction retained by the pool.
    pub lp_fee: FeeRate,
}

/// Snapshot of a pool's public state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolMeta {
    /// Pool id.
    pub pool_id: PoolId,
    /// Canonical token A.
    pub token_a: TokenId,
    /// Canonical token B.
    pub token_b: TokenId,
    /// Reserve of token A.
    pub reserve_a: Amount,
    /// Reserve of token B.
    pub reserve_b: Amount,
    /// Outstanding LP shares.
    pub total_supply: Amount,
    /// Whether trading and liquidity changes are blocked.
    pub frozen: bool,
}

/// All four fee-free quotes for one amount.
///
/// Exact-output quotes are `None` when the amount is not below the
/// corresponding reserve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Quotes {
    /// Token B received for exactly `amount` of token A.
    pub exact_a_to_b: Amount,
    /// Token A received for exactly `amount` of token B.
    pub exact_b_to_a: Amount,
    /// Token A required to receive exactly `amount` of token B.
    pub a_to_exact_b: Option<Amount>,
    /// Token B required to receive exactly `amount` of token A.
    pub b_to_exact_a: Option<Amount>,
}

/// A Constant Product pool over one canonical token pair.
#[derive(Debug)]
pub struct ConstantProductPool {
    id: PoolId,
    pair: TokenPair,
    vault_a: Vault,
    vault_b: Vault,
    lp_supply: Amount,
    frozen: bool,
}

impl ConstantProductPool {
    /// Creates an active pool from its initial reserves.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::InvalidToken`] if the vaults do not hold the
    /// pair's tokens in canonical order, [`DexError::ZeroReserve`] if
    /// either vault is empty and [`DexError::InvalidAmount`] for a zero LP
    /// supply.
    pub fn new(
        id: PoolId,
        pair: TokenPair,
        vault_a: Vault,
        vault_b: Vault,
        lp_supply: Amount,
    ) -> Result<Self, DexError> {
        if vault_a.token() != pair.first() || vault_b.token() != pair.second() {
            return Err(DexError::InvalidToken(
                "pool vaults must hold the pair's tokens in canonical order",
            ));
        }
        if vault_a.balance().is_zero() || vault_b.balance().is_zero() {
            return Err(DexError::ZeroReserve);
        }
        if lp_supply.is_zero() {
            return Err(DexError::InvalidAmount("initial LP supply must be positive"));
        }
        Ok(Self {
            id,
            pair,
            vault_a,
            vault_b,
            lp_supply,
            frozen: false,
        })
    }

    /// Returns the pool id.
    #[must_use]
    pub const fn id(&self) -> PoolId {
        self.id
    }

    /// Returns the canonical token pair.
    #[must_use]
    pub const fn pair(&self) -> &TokenPair {
        &self.pair
    }

    /// Returns the reserve of token A.
    pub const fn reserve_a(&self) -> Amount {
        self.vault_a.balance()
    }

    /// Returns the reserve of token B.
    pub const fn reserve_b(&self) -> Amount {
        self.vault_b.balance()
    }

    /// Returns the outstanding LP share supply.
    pub const fn lp_supply(&self) -> Amount {
        self.lp_supply
    }

    /// Returns `true` if the pool is frozen.
    #[must_use]
    pub const fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Flips the frozen flag and returns the new state.
    pub fn toggle_frozen(&mut self) -> bool {
        self.frozen = !self.frozen;
        self.frozen
    }

    /// Fails with [`DexError::PoolFrozen`] if the pool is frozen.
    ///
    /// # Errors
    ///
    /// See above.
    pub const fn ensure_active(&self) -> Result<(), DexError> {
        if self.frozen {
            return Err(DexError::PoolFrozen(self.id));
        }
        Ok(())
    }

    /// Returns a snapshot of the pool.
    #[must_use]
    pub fn meta(&self) -> PoolMeta {
        PoolMeta {
            pool_id: self.id,
            token_a: self.pair.first().clone(),
            token_b: self.pair.second().clone(),
            reserve_a: self.reserve_a(),
            reserve_b: self.reserve_b(),
            total_supply: self.lp_supply,
            frozen: self.frozen,
        }
    }

    /// `(reserve_in, reserve_out)` for a swap side.
    const fn oriented_reserves(&self, side: Side) -> (Amount, Amount) {
        match side {
            Side::AToB => (self.reserve_a(), self.reserve_b()),
            Side::BToA => (self.reserve_b(), self.reserve_a()),
        }
    }

    // -- Quotes ---------------------------------------------------------------

    /// Output for exactly `amount_in` sold on `side`, without fees.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::InvalidAmount`] for a zero input and
    /// [`DexError::ZeroReserve`] if the pool is empty.
    pub fn quote_exact_in(&self, side: Side, amount_in: Amount) -> Result<Amount, DexError> {
        if amount_in.is_zero() {
            return Err(DexError::InvalidAmount("quote amount must be positive"));
        }
        let (reserve_in, reserve_out) = self.oriented_reserves(side);
        output_for(reserve_in, reserve_out, amount_in)
    }

    /// Input required on `side` to receive exactly `amount_out`, without fees.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::InvalidAmount`] for a zero output,
    /// [`DexError::ZeroReserve`] if the pool is empty and
    /// [`DexError::InsufficientLiquidity`] if `amount_out` is not below the
    /// output reserve.
    pub fn quote_exact_out(&self, side: Side, amount_out: Amount) -> Result<Amount, DexError> {
        if amount_out.is_zero() {
            return Err(DexError::InvalidAmount("quote amount must be positive"));
        }
        let (reserve_in, reserve_out) = self.oriented_reserves(side);
        input_for(reserve_in, reserve_out, amount_out)
    }

    /// Token B received for exactly `amount` of token A.
    ///
    /// # Errors
    ///
    /// See [`quote_exact_in`](Self::quote_exact_in).
    pub fn quote_exact_a_to_b(&self, amount: Amount) -> Result<Amount, DexError> {
        self.quote_exact_in(Side::AToB, amount)
    }

    /// Token A received for exactly `amount` of token B.
    ///
    /// # Errors
    ///
    /// See [`quote_exact_in`](Self::quote_exact_in).
    pub fn quote_exact_b_to_a(&self, amount: Amount) -> Result<Amount, DexError> {
        self.quote_exact_in(Side::BToA, amount)
    }

    /// Token A required to receive exactly `amount` of token B.
    ///
    /// # Errors
    ///
    /// See [`quote_exact_out`](Self::quote_exact_out).
    pub fn quote_a_to_exact_b(&self, amount: Amount) -> Result<Amount, DexError> {
        self.quote_exact_out(Side::AToB, amount)
    }

    /// Token B required to receive exactly `amount` of token A.
    ///
    /// # Errors
    ///
    /// See [`quote_exact_out`](Self::quote_exact_out).
    pub fn quote_b_to_exact_a(&self, amount: Amount) -> Result<Amount, DexError> {
        self.quote_exact_out(Side::BToA, amount)
    }

    /// All four quotes for `amount`.
    ///
    /// # Errors
    ///
    /// Fails only if the exact-input quotes fail.
    pub fn quotes(&self, amount: Amount) -> Result<Quotes, DexError> {
        Ok(Quotes {
            exact_a_to_b: self.quote_exact_a_to_b(amount)?,
            exact_b_to_a: self.quote_exact_b_to_a(amount)?,
            a_to_exact_b: self.quote_a_to_exact_b(amount).ok(),
            b_to_exact_a: self.quote_b_to_exact_a(amount).ok(),
        })
    }

    // -- Swap -----------------------------------------------------------------

    /// Computes a swap of `amount_in` on `side` under `fees`.
    ///
    /// `amount_out = reserve_out × net / (reserve_in + net)`, floored, where
    /// `net = amount_in − dao_fee − lp_fee`.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::PoolFrozen`] if the pool is frozen,
    /// [`DexError::InvalidAmount`] for a zero input or a zero output, and
    /// [`DexError::ZeroReserve`] if the pool is empty.
    pub fn preview_swap(
        &self,
        side: Side,
        amount_in: Amount,
        fees: FeeSchedule,
    ) -> Result<SwapResult, DexError> {
        self.ensure_active()?;
        if amount_in.is_zero() {
            return Err(DexError::InvalidAmount("swap amount must be positive"));
        }
        let dao_fee = fees.dao_fee.apply(amount_in)?;
        let lp_fee = fees.lp_fee.apply(amount_in)?;
        let net = amount_in.safe_sub(&dao_fee)?.safe_sub(&lp_fee)?;
        if net.is_zero() {
            return Err(DexError::InvalidAmount("fees consume the whole swap input"));
        }
        let (reserve_in, reserve_out) = self.oriented_reserves(side);
        let amount_out = output_for(reserve_in, reserve_out, net)?;
        SwapResult::new(side, amount_in, dao_fee, lp_fee, amount_out)
    }

    /// Applies a previewed swap: absorbs `deposit` (the input minus the DAO
    /// fee) and returns the output vault.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::InvalidToken`] or [`DexError::InvalidAmount`] if
    /// `deposit` does not match `result`, and arithmetic errors if the
    /// reserves cannot absorb it. The pool is unchanged on error.
    pub fn settle_swap(&mut self, result: &SwapResult, deposit: Vault) -> Result<Vault, DexError> {
        let (token_in, _) = self.pair.oriented(result.side());
        if deposit.token() != token_in {
            return Err(DexError::InvalidToken("swap deposit holds the wrong token"));
        }
        if deposit.balance() != result.pool_deposit() {
            return Err(DexError::InvalidAmount("swap deposit does not match the preview"));
        }
        let (vault_in, vault_out) = match result.side() {
            Side::AToB => (&mut self.vault_a, &mut self.vault_b),
            Side::BToA => (&mut self.vault_b, &mut self.vault_a),
        };
        if vault_in.balance().checked_add(&deposit.balance()).is_none() {
            return Err(DexError::Overflow("pool reserve overflow"));
        }
        let output = vault_out.split(result.amount_out())?;
        vault_in.merge(deposit)?;
        Ok(output)
    }

    // -- Liquidity ------------------------------------------------------------

    /// Computes the LP shares minted for depositing `(amount_a, amount_b)`.
    ///
    /// `minted = supply × min(amount_a / reserve_a, amount_b / reserve_b)`;
    /// a pool whose supply was fully burned is re-seeded through `bootstrap`.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::PoolFrozen`] if frozen, [`DexError::InvalidAmount`]
    /// if either amount is zero or nothing would be minted,
    /// [`DexError::ZeroReserve`] if a reserve is empty while shares are
    /// outstanding and [`DexError::Overflow`] if the reserves or supply
    /// would not fit.
    pub fn preview_add_liquidity(
        &self,
        amount_a: Amount,
        amount_b: Amount,
        bootstrap: LpBootstrap,
    ) -> Result<Amount, DexError> {
        self.ensure_active()?;
        if amount_a.is_zero() || amount_b.is_zero() {
            return Err(DexError::InvalidAmount("liquidity amounts must be positive"));
        }
        if self.reserve_a().checked_add(&amount_a).is_none()
            || self.reserve_b().checked_add(&amount_b).is_none()
        {
            return Err(DexError::Overflow("pool reserve overflow"));
        }
        if self.lp_supply.is_zero() {
            return bootstrap.initial_supply(amount_a, amount_b);
        }
        if self.reserve_a().is_zero() || self.reserve_b().is_zero() {
            return Err(DexError::ZeroReserve);
        }
        let ratio_a = amount_a.safe_div(&self.reserve_a(), Rounding::Down)?;
        let ratio_b = amount_b.safe_div(&self.reserve_b(), Rounding::Down)?;
        let minted = self.lp_supply.safe_mul(&ratio_a.min(ratio_b), Rounding::Down)?;
        if minted.is_zero() {
            return Err(DexError::InvalidAmount("deposit too small to mint LP shares"));
        }
        if self.lp_supply.checked_add(&minted).is_none() {
            return Err(DexError::Overflow("LP supply overflow"));
        }
        Ok(minted)
    }

    /// Absorbs a previewed deposit and records the minted shares.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::InvalidToken`] on a token mismatch and
    /// arithmetic errors on overflow. The pool is unchanged on error.
    pub fn deposit_liquidity(
        &mut self,
        vault_a: Vault,
        vault_b: Vault,
        minted: Amount,
    ) -> Result<(), DexError> {
        if vault_a.token() != self.pair.first() || vault_b.token() != self.pair.second() {
            return Err(DexError::InvalidToken("liquidity vaults do not match the pair"));
        }
        let supply = self.lp_supply.safe_add(&minted)?;
        if self.reserve_a().checked_add(&vault_a.balance()).is_none()
            || self.reserve_b().checked_add(&vault_b.balance()).is_none()
        {
            return Err(DexError::Overflow("pool reserve overflow"));
        }
        self.vault_a.merge(vault_a)?;
        self.vault_b.merge(vault_b)?;
        self.lp_supply = supply;
        Ok(())
    }

    /// Computes the reserves returned for burning `lp_amount` shares.
    ///
    /// Each side receives `reserve × lp_amount / supply`, floored.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::PoolFrozen`] if frozen, [`DexError::InvalidAmount`]
    /// for a zero amount or a withdrawal that rounds to nothing, and
    /// [`DexError::InsufficientLiquidity`] if `lp_amount` exceeds the supply.
    pub fn preview_remove_liquidity(&self, lp_amount: Amount) -> Result<(Amount, Amount), DexError> {
        self.ensure_active()?;
        if lp_amount.is_zero() {
            return Err(DexError::InvalidAmount("LP amount must be positive"));
        }
        if lp_amount > self.lp_supply {
            return Err(DexError::InsufficientLiquidity);
        }
        let out_a = self
            .reserve_a()
            .safe_mul_div(&lp_amount, &self.lp_supply, Rounding::Down)?;
        let out_b = self
            .reserve_b()
            .safe_mul_div(&lp_amount, &self.lp_supply, Rounding::Down)?;
        if out_a.is_zero() && out_b.is_zero() {
            return Err(DexError::InvalidAmount("withdrawal rounds to zero"));
        }
        Ok((out_a, out_b))
    }

    /// Burns `lp_amount` shares and releases the previewed reserves.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::InsufficientLiquidity`] or
    /// [`DexError::InsufficientBalance`] if the amounts exceed what the pool
    /// holds. The pool is unchanged on error.
    pub fn withdraw_liquidity(
        &mut self,
        lp_amount: Amount,
        out_a: Amount,
        out_b: Amount,
    ) -> Result<(Vault, Vault), DexError> {
        let supply = self
            .lp_supply
            .checked_sub(&lp_amount)
            .ok_or(DexError::InsufficientLiquidity)?;
        if out_a > self.reserve_a() || out_b > self.reserve_b() {
            return Err(DexError::InsufficientLiquidity);
        }
        let vault_a = self.vault_a.split(out_a)?;
        let vault_b = self.vault_b.split(out_b)?;
        self.lp_supply = supply;
        Ok((vault_a, vault_b))
    }
}

/// `reserve_out × amount_in / (reserve_in + amount_in)`, floored.
fn output_for(reserve_in: Amount, reserve_out: Amount, amount_in: Amount) -> Result<Amount, DexError> {
    if reserve_in.is_zero() || reserve_out.is_zero() {
        return Err(DexError::ZeroReserve);
    }
    let denominator = reserve_in.safe_add(&amount_in)?;
    reserve_out.safe_mul_div(&amount_in, &denominator, Rounding::Down)
}

/// `reserve_in × amount_out / (reserve_out − amount_out)`, rounded up.
fn input_for(reserve_in: Amount, reserve_out: Amount, amount_out: Amount) -> Result<Amount, DexError> {
    if reserve_in.is_zero() || reserve_out.is_zero() {
        return Err(DexError::ZeroReserve);
    }
    if amount_out >= reserve_out {
        return Err(DexError::InsufficientLiquidity);
    }
    let remaining = reserve_out.safe_sub(&amount_out)?;
    reserve_in.safe_mul_div(&amount_out, &remaining, Rounding::Up)
}
