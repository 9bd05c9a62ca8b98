//! Property-based tests using `proptest` for pool invariants.
//!
//! 1. **Swap reversibility**: round-trip A→B→A returns ≤ original.
//! 2. **Invariant preservation**: `reserve_a · reserve_b` never decreases.
//! 3. **Fee monotonicity**: larger input ⇒ larger or equal fee.
//! 4. **Liquidity conservation**: add then remove returns ≤ deposited.
//! 5. **Full withdrawal**: burning the whole supply drains the pool.
//! 6. **Quote consistency**: the exact-out input buys at least the output.

use proptest::prelude::*;

use super::constant_product::tests::{amt, fees, make_pool, swap, tok_a, tok_b};
use super::{ConstantProductPool, FeeSchedule};
use crate::config::LpBootstrap;
use crate::domain::{Amount, Side, Vault};

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

fn product(pool: &ConstantProductPool) -> u128 {
    u128::from(pool.reserve_a().raw()) * u128::from(pool.reserve_b().raw())
}

fn default_fees() -> FeeSchedule {
    fees("0.0025", "0.0025")
}

// ---------------------------------------------------------------------------
// Custom strategies
// ---------------------------------------------------------------------------

/// Reserves in `[1.0, 10_000_000.0]` tokens.
fn reserve_strategy() -> impl Strategy<Value = Amount> {
    (100_000_000u64..=1_000_000_000_000_000u64).prop_map(Amount::from_raw)
}

/// Swap input as a fraction of the reserve, in thousandths.
fn fraction_strategy() -> impl Strategy<Value = u64> {
    1u64..=500u64
}

fn side_strategy() -> impl Strategy<Value = Side> {
    prop_oneof![Just(Side::AToB), Just(Side::BToA)]
}

fn share_of(reserve: Amount, thousandths: u64) -> Amount {
    Amount::from_raw((reserve.raw() / 1_000).saturating_mul(thousandths).max(1))
}

// ---------------------------------------------------------------------------
// Property 1: Swap Reversibility
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_swap_reversibility(
        ra in reserve_strategy(),
        rb in reserve_strategy(),
        frac in fraction_strategy(),
    ) {
        let mut pool = make_pool(ra, rb);
        let swap_in = share_of(ra, frac);

        let Ok(there) = swap(&mut pool, Side::AToB, swap_in, FeeSchedule::default()) else {
            return Ok(());
        };
        let Ok(back) = swap(&mut pool, Side::BToA, there.amount_out(), FeeSchedule::default())
        else {
            return Ok(());
        };

        prop_assert!(
            back.amount_out() <= swap_in,
            "round-trip should lose value: final={} > original={}",
            back.amount_out(), swap_in
        );
    }
}

// ---------------------------------------------------------------------------
// Property 2: Invariant Preservation
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_invariant_preservation(
        ra in reserve_strategy(),
        rb in reserve_strategy(),
        frac in fraction_strategy(),
        sides in proptest::collection::vec(side_strategy(), 1..8),
    ) {
        let mut pool = make_pool(ra, rb);
        let mut k = product(&pool);

        for side in sides {
            let reserve_in = match side {
                Side::AToB => pool.reserve_a(),
                Side::BToA => pool.reserve_b(),
            };
            if swap(&mut pool, side, share_of(reserve_in, frac), default_fees()).is_err() {
                continue;
            }
            let k_after = product(&pool);
            prop_assert!(k_after >= k, "k decreased: {} < {}", k_after, k);
            k = k_after;
        }
    }
}

// ---------------------------------------------------------------------------
// Property 3: Fee Monotonicity
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_fee_monotonicity(
        ra in reserve_strategy(),
        rb in reserve_strategy(),
        small in 1u64..=250u64,
        extra in 1u64..=250u64,
    ) {
        let pool = make_pool(ra, rb);
        let (Ok(low), Ok(high)) = (
            pool.preview_swap(Side::AToB, share_of(ra, small), default_fees()),
            pool.preview_swap(Side::AToB, share_of(ra, small + extra), default_fees()),
        ) else {
            return Ok(());
        };
        prop_assert!(high.dao_fee() >= low.dao_fee());
        prop_assert!(high.lp_fee() >= low.lp_fee());
        prop_assert!(high.amount_out() >= low.amount_out());
    }
}

// ---------------------------------------------------------------------------
// Property 4: Liquidity Conservation
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_liquidity_conservation(
        ra in reserve_strategy(),
        rb in reserve_strategy(),
        frac in fraction_strategy(),
    ) {
        let mut pool = make_pool(ra, rb);
        let (add_a, add_b) = (share_of(ra, frac), share_of(rb, frac));

        let Ok(minted) = pool.preview_add_liquidity(add_a, add_b, LpBootstrap::default()) else {
            return Ok(());
        };
        let deposited = pool.deposit_liquidity(
            Vault::new(tok_a(), add_a),
            Vault::new(tok_b(), add_b),
            minted,
        );
        prop_assert!(deposited.is_ok());

        let Ok((out_a, out_b)) = pool.preview_remove_liquidity(minted) else {
            return Ok(());
        };
        prop_assert!(out_a <= add_a, "returned {} A for {} deposited", out_a, add_a);
        prop_assert!(out_b <= add_b, "returned {} B for {} deposited", out_b, add_b);
    }
}

// ---------------------------------------------------------------------------
// Property 5: Full Withdrawal
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_full_withdrawal_drains_pool(
        ra in reserve_strategy(),
        rb in reserve_strategy(),
    ) {
        let mut pool = make_pool(ra, rb);
        let supply = pool.lp_supply();
        let Ok((out_a, out_b)) = pool.preview_remove_liquidity(supply) else {
            return Err(TestCaseError::fail("full withdrawal must be allowed"));
        };
        prop_assert_eq!((out_a, out_b), (ra, rb));
        let Ok(_) = pool.withdraw_liquidity(supply, out_a, out_b) else {
            return Err(TestCaseError::fail("withdraw failed"));
        };
        prop_assert!(pool.lp_supply().is_zero());
        prop_assert!(pool.reserve_a().is_zero() && pool.reserve_b().is_zero());
    }
}

// ---------------------------------------------------------------------------
// Property 6: Quote Consistency
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_exact_out_quote_is_sufficient(
        ra in reserve_strategy(),
        rb in reserve_strategy(),
        frac in fraction_strategy(),
        side in side_strategy(),
    ) {
        let pool = make_pool(ra, rb);
        let reserve_out = match side {
            Side::AToB => rb,
            Side::BToA => ra,
        };
        let want = share_of(reserve_out, frac);
        let Ok(required) = pool.quote_exact_out(side, want) else {
            return Ok(());
        };
        let Ok(received) = pool.quote_exact_in(side, required) else {
            return Ok(());
        };
        prop_assert!(received >= want, "paid {} for {} < {}", required, received, want);
        prop_assert!(amt("0") < required);
    }
}
