//! Sequentially-numbered pool store with a pair index.

use std::collections::BTreeMap;

use super::ConstantProductPool;
use crate::domain::{PoolId, TokenId, TokenPair};
use crate::error::DexError;

/// Owns every pool and resolves pools by id or by unordered token pair.
///
/// Ids are assigned in creation order starting at `0`; at most one pool
/// exists per unordered pair.
#[derive(Debug, Default)]
pub struct PoolRegistry {
    pools: BTreeMap<PoolId, ConstantProductPool>,
    by_pair: BTreeMap<TokenPair, PoolId>,
    next_id: PoolId,
}

impl PoolRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The id the next inserted pool will receive.
    #[must_use]
    pub const fn next_id(&self) -> PoolId {
        self.next_id
    }

    /// Number of pools.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pools.len()
    }

    /// Returns `true` if no pool exists yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }

    /// Fails with [`DexError::DuplicatePool`] if `pair` already trades.
    ///
    /// # Errors
    ///
    /// See above.
    pub fn ensure_pair_available(&self, pair: &TokenPair) -> Result<(), DexError> {
        match self.by_pair.get(pair) {
            Some(existing) => Err(DexError::DuplicatePool {
                token_a: pair.first().clone(),
                token_b: pair.second().clone(),
                existing: *existing,
            }),
            None => Ok(()),
        }
    }

    /// Registers a pool built with [`next_id`](Self::next_id).
    ///
    /// # Errors
    ///
    /// Returns [`DexError::DuplicatePool`] if the pair is taken and
    /// [`DexError::InvalidConfiguration`] if the pool carries another id.
    pub fn insert(&mut self, pool: ConstantProductPool) -> Result<PoolId, DexError> {
        self.ensure_pair_available(pool.pair())?;
        if pool.id() != self.next_id {
            return Err(DexError::InvalidConfiguration(format!(
                "pool id {} does not match next id {}",
                pool.id(),
                self.next_id
            )));
        }
        let id = pool.id();
        self.by_pair.insert(pool.pair().clone(), id);
        self.pools.insert(id, pool);
        self.next_id = id.next();
        Ok(id)
    }

    /// Looks up a pool.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::UnknownPool`] if no pool has this id.
    pub fn get(&self, id: PoolId) -> Result<&ConstantProductPool, DexError> {
        self.pools.get(&id).ok_or(DexError::UnknownPool(id))
    }

    /// Looks up a pool for mutation.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::UnknownPool`] if no pool has this id.
    pub fn get_mut(&mut self, id: PoolId) -> Result<&mut ConstantProductPool, DexError> {
        self.pools.get_mut(&id).ok_or(DexError::UnknownPool(id))
    }

    /// Resolves the pool trading `token_x` against `token_y`, in either order.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::UnknownPair`] if no such pool exists.
    pub fn pool_id_for(&self, token_x: &TokenId, token_y: &TokenId) -> Result<PoolId, DexError> {
        let unknown = || DexError::UnknownPair {
            token_x: token_x.clone(),
            token_y: token_y.clone(),
        };
        let pair = TokenPair::new(token_x.clone(), token_y.clone()).map_err(|_| unknown())?;
        self.by_pair.get(&pair).copied().ok_or_else(unknown)
    }

    /// All pool ids in creation order.
    #[must_use]
    pub fn ids(&self) -> Vec<PoolId> {
        self.pools.keys().copied().collect()
    }

    /// Every token `token` can be swapped into, with the pool that does it.
    #[must_use]
    pub fn swaps_available(&self, token: &TokenId) -> BTreeMap<TokenId, PoolId> {
        self.by_pair
            .iter()
            .filter_map(|(pair, id)| pair.other(token).ok().map(|other| (other.clone(), *id)))
            .collect()
    }

    /// Iterates pools in id order.
    pub fn iter(&self) -> impl Iterator<Item = &ConstantProductPool> {
        self.pools.values()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{Amount, Vault};
    use crate::pools::constant_product::tests::{tok_a, tok_b};

    fn tok(id: &str) -> TokenId {
        let Ok(t) = TokenId::new(id) else {
            panic!("invalid token in test: {id}");
        };
        t
    }

    fn pool(id: PoolId, x: TokenId, y: TokenId) -> ConstantProductPool {
        let Ok(pair) = TokenPair::new(x, y) else {
            panic!("valid pair");
        };
        let va = Vault::new(pair.first().clone(), Amount::ONE);
        let vb = Vault::new(pair.second().clone(), Amount::ONE);
        let Ok(p) = ConstantProductPool::new(id, pair, va, vb, Amount::ONE) else {
            panic!("valid pool");
        };
        p
    }

    #[test]
    fn ids_are_sequential() {
        let mut registry = PoolRegistry::new();
        assert!(registry.is_empty());
        let Ok(first) = registry.insert(pool(registry.next_id(), tok_a(), tok_b())) else {
            panic!("expected Ok");
        };
        let Ok(second) = registry.insert(pool(registry.next_id(), tok_a(), tok("A.1.Gamma"))) else {
            panic!("expected Ok");
        };
        assert_eq!(first.get(), 0);
        assert_eq!(second.get(), 1);
        assert_eq!(registry.ids(), vec![first, second]);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn duplicate_pair_rejected_in_either_order() {
        let mut registry = PoolRegistry::new();
        let Ok(_) = registry.insert(pool(registry.next_id(), tok_a(), tok_b())) else {
            panic!("expected Ok");
        };
        let result = registry.insert(pool(registry.next_id(), tok_b(), tok_a()));
        assert!(matches!(result, Err(DexError::DuplicatePool { .. })));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn resolve_by_pair() {
        let mut registry = PoolRegistry::new();
        let Ok(id) = registry.insert(pool(registry.next_id(), tok_a(), tok_b())) else {
            panic!("expected Ok");
        };
        assert_eq!(registry.pool_id_for(&tok_b(), &tok_a()), Ok(id));
        assert!(matches!(
            registry.pool_id_for(&tok_a(), &tok("A.1.Gamma")),
            Err(DexError::UnknownPair { .. })
        ));
        assert!(matches!(
            registry.pool_id_for(&tok_a(), &tok_a()),
            Err(DexError::UnknownPair { .. })
        ));
    }

    #[test]
    fn unknown_pool_rejected() {
        let registry = PoolRegistry::new();
        assert!(matches!(registry.get(PoolId::new(7)), Err(DexError::UnknownPool(_))));
    }

    #[test]
    fn swaps_available_lists_counterparts() {
        let mut registry = PoolRegistry::new();
        let gamma = tok("A.1.Gamma");
        let Ok(ab) = registry.insert(pool(registry.next_id(), tok_a(), tok_b())) else {
            panic!("expected Ok");
        };
        let Ok(ag) = registry.insert(pool(registry.next_id(), gamma.clone(), tok_a())) else {
            panic!("expected Ok");
        };
        let swaps = registry.swaps_available(&tok_a());
        assert_eq!(swaps.len(), 2);
        assert_eq!(swaps.get(&tok_b()), Some(&ab));
        assert_eq!(swaps.get(&gamma), Some(&ag));
        assert_eq!(registry.swaps_available(&tok_b()).len(), 1);
    }
}
