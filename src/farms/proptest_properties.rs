//! Property-based tests using `proptest` for reward distribution.
//!
//! 1. **No inflation**: claimed plus pending never exceeds the funding.
//! 2. **Equal stakes, equal rewards**: identical stakers claim identically.
//! 3. **Vault covers remaining**: a reward vault always holds at least its
//!    unemitted remainder.

use proptest::prelude::*;

use super::registry::tests::{account, amt, claim, funded_registry, stake};
use crate::domain::{Amount, FarmId, RewardId, Timestamp};

// ---------------------------------------------------------------------------
// Custom strategies
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
enum Action {
    Stake(usize, u64),
    Unstake(usize, u64),
    Claim(usize),
}

/// Three stakers, amounts in `[0.01, 50.0]`.
fn action_strategy() -> impl Strategy<Value = Action> {
    prop_oneof![
        (0usize..3, 1_000_000u64..=5_000_000_000u64).prop_map(|(who, raw)| Action::Stake(who, raw)),
        (0usize..3, 1u64..=5_000_000_000u64).prop_map(|(who, raw)| Action::Unstake(who, raw)),
        (0usize..3).prop_map(Action::Claim),
    ]
}

/// Seconds between actions, up to 60 with fractional parts.
fn step_strategy() -> impl Strategy<Value = u64> {
    0u64..=6_000_000_000u64
}

const STAKERS: [&str; 3] = ["0x01", "0x02", "0x03"];

// ---------------------------------------------------------------------------
// Property 1 & 3: No Inflation, Vault Covers Remaining
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_no_reward_inflation(
        actions in proptest::collection::vec((action_strategy(), step_strategy()), 1..40),
    ) {
        let funding = amt("500");
        let mut registry = funded_registry("500");
        let farm = FarmId::new(0);
        let mut now = Amount::ZERO;
        let mut claimed = Amount::ZERO;

        for (action, step) in actions {
            now = now.saturating_add(&Amount::from_raw(step));
            let ts = Timestamp::from_secs(now);
            match action {
                Action::Stake(who, raw) => {
                    if let Ok(change) = registry.preview_stake(
                        farm, &account(STAKERS[who]), Amount::from_raw(raw), ts,
                    ) {
                        registry.commit_stake(change);
                    }
                }
                Action::Unstake(who, raw) => {
                    if let Ok(change) = registry.preview_unstake(
                        farm, &account(STAKERS[who]), Amount::from_raw(raw), ts,
                    ) {
                        registry.commit_stake(change);
                    }
                }
                Action::Claim(who) => {
                    let Ok(plan) = registry.preview_claim(farm, &account(STAKERS[who]), ts) else {
                        return Err(TestCaseError::fail("claim preview failed"));
                    };
                    let total = plan.claimed().values().fold(Amount::ZERO, |t, a| t.saturating_add(a));
                    prop_assert!(registry.commit_claim(plan).is_ok());
                    claimed = claimed.saturating_add(&total);
                }
            }

            let mut pending = Amount::ZERO;
            for who in STAKERS {
                let Ok(p) = registry.pending_rewards(farm, &account(who), ts) else {
                    return Err(TestCaseError::fail("pending view failed"));
                };
                pending = pending.saturating_add(&p.get(&RewardId::new(0)).copied().unwrap_or_default());
            }
            prop_assert!(
                claimed.saturating_add(&pending) <= funding,
                "claimed {} + pending {} exceeds funding {}",
                claimed, pending, funding
            );

            let Ok(pool) = registry.reward_pool(RewardId::new(0)) else {
                return Err(TestCaseError::fail("reward pool missing"));
            };
            prop_assert!(pool.balance() >= pool.remaining());
            prop_assert_eq!(pool.balance().saturating_add(&claimed), funding);
        }
    }
}

// ---------------------------------------------------------------------------
// Property 2: Equal Stakes, Equal Rewards
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_equal_stakes_equal_rewards(
        raw in 1_000_000u64..=10_000_000_000u64,
        start in 0u64..=100u64,
        elapsed in 1u64..=1_000u64,
    ) {
        let mut registry = funded_registry("100000");
        let amount = Amount::from_raw(raw);
        let start_at = start.to_string();
        let end_at = (start + elapsed).to_string();
        stake(&mut registry, STAKERS[0], &amount.to_string(), &start_at);
        stake(&mut registry, STAKERS[1], &amount.to_string(), &start_at);

        let first = claim(&mut registry, STAKERS[0], &end_at);
        let second = claim(&mut registry, STAKERS[1], &end_at);
        prop_assert_eq!(first, second);
        prop_assert!(first > Amount::ZERO);
        prop_assert_eq!(claim(&mut registry, STAKERS[0], &end_at), Amount::ZERO);
    }
}
