//! Swaps and price quotes.

use tracing::{debug, info};

use super::Exchange;
use crate::domain::{AccountId, Amount, PoolId, SwapResult, TokenId};
use crate::error::DexError;
use crate::events::{Event, Receipt};
use crate::pools::Quotes;
use crate::traits::Ledger;

impl<L: Ledger> Exchange<L> {
    /// Swaps `amount_in` of `token_in` for the pool's other token.
    ///
    /// The DAO fee goes to the treasury bucket of `token_in`; the LP fee
    /// stays in the pool's input reserve.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::UnknownPool`], [`DexError::InvalidToken`] if the
    /// pool does not trade `token_in`, [`DexError::PoolFrozen`],
    /// [`DexError::InvalidAmount`] for a zero input or output and
    /// [`DexError::InsufficientBalance`].
    pub fn swap(
        &mut self,
        caller: &AccountId,
        pool_id: PoolId,
        token_in: &TokenId,
        amount_in: Amount,
    ) -> Result<Receipt<SwapResult>, DexError> {
        let pool = self.pools.get(pool_id)?;
        let side = pool.pair().side_of(token_in)?;
        let result = pool.preview_swap(side, amount_in, self.fees)?;
        let (_, token_out) = pool.pair().oriented(side);
        let token_out = token_out.clone();
        self.ensure_funds(caller, token_in, amount_in)?;
        self.ensure_receivable(caller, &token_out, result.amount_out())?;
        if self
            .treasury
            .balance(token_in)
            .checked_add(&result.dao_fee())
            .is_none()
        {
            return Err(DexError::Overflow("treasury balance overflow"));
        }

        let mut payment = self.ledger.withdraw(caller, token_in, amount_in)?;
        let fee = payment.split(result.dao_fee())?;
        self.treasury.deposit(fee)?;
        let output = self.pools.get_mut(pool_id)?.settle_swap(&result, payment)?;
        self.ledger.deposit(caller, output)?;

        info!(
            pool_id = %pool_id,
            caller = %caller,
            side = side.code(),
            amount_in = %result.amount_in(),
            dao_fee = %result.dao_fee(),
            lp_fee = %result.lp_fee(),
            amount_out = %result.amount_out(),
            "swap executed"
        );

        let custody = self.custody();
        let (token_a_amount, token_b_amount) = result.trade_amounts();
        let events = vec![
            Event::TokensWithdrawn {
                token: token_in.clone(),
                amount: amount_in,
                from: Some(caller.clone()),
            },
            Event::TokensWithdrawn {
                token: token_in.clone(),
                amount: result.dao_fee(),
                from: None,
            },
            Event::FeesDeposited {
                token_identifier: token_in.vault_type(),
                amount: result.dao_fee(),
            },
            Event::TokensDeposited {
                token: token_in.clone(),
                amount: result.pool_deposit(),
                to: custody.clone(),
            },
            Event::Trade {
                pool_id,
                side,
                token_a_amount,
                token_b_amount,
            },
            Event::TokensWithdrawn {
                token: token_out.clone(),
                amount: result.amount_out(),
                from: custody,
            },
            Event::TokensDeposited {
                token: token_out,
                amount: result.amount_out(),
                to: Some(caller.clone()),
            },
        ];
        Ok(Receipt::new(result, events))
    }

    // -- Quotes ---------------------------------------------------------------

    /// Output of token B for exactly `amount` of token A, before fees.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::UnknownPool`] and the pool's quote errors.
    pub fn get_quote_exact_a_to_b(&self, pool_id: PoolId, amount: Amount) -> Result<Amount, DexError> {
        let quote = self.pools.get(pool_id)?.quote_exact_a_to_b(amount)?;
        debug!(pool_id = %pool_id, %amount, %quote, "quote exact A to B");
        Ok(quote)
    }

    /// Output of token A for exactly `amount` of token B, before fees.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::UnknownPool`] and the pool's quote errors.
    pub fn get_quote_exact_b_to_a(&self, pool_id: PoolId, amount: Amount) -> Result<Amount, DexError> {
        let quote = self.pools.get(pool_id)?.quote_exact_b_to_a(amount)?;
        debug!(pool_id = %pool_id, %amount, %quote, "quote exact B to A");
        Ok(quote)
    }

    /// Token A needed to receive exactly `amount` of token B, before fees.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::UnknownPool`] and
    /// [`DexError::InsufficientLiquidity`] if `amount` is not below the B
    /// reserve.
    pub fn get_quote_a_to_exact_b(&self, pool_id: PoolId, amount: Amount) -> Result<Amount, DexError> {
        let quote = self.pools.get(pool_id)?.quote_a_to_exact_b(amount)?;
        debug!(pool_id = %pool_id, %amount, %quote, "quote A to exact B");
        Ok(quote)
    }

    /// Token B needed to receive exactly `amount` of token A, before fees.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::UnknownPool`] and
    /// [`DexError::InsufficientLiquidity`] if `amount` is not below the A
    /// reserve.
    pub fn get_quote_b_to_exact_a(&self, pool_id: PoolId, amount: Amount) -> Result<Amount, DexError> {
        let quote = self.pools.get(pool_id)?.quote_b_to_exact_a(amount)?;
        debug!(pool_id = %pool_id, %amount, %quote, "quote B to exact A");
        Ok(quote)
    }

    /// All four quotes for `amount`.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::UnknownPool`] and the exact-in quote errors.
    pub fn get_quotes(&self, pool_id: PoolId, amount: Amount) -> Result<Quotes, DexError> {
        let quotes = self.pools.get(pool_id)?.quotes(amount)?;
        debug!(pool_id = %pool_id, %amount, "quotes computed");
        Ok(quotes)
    }
}
