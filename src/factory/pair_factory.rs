//! Deterministic registry of pairs.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use sha3::{Digest, Keccak256};

use super::FeeSettings;
use crate::config::ExchangeConfig;
use crate::domain::{Address, Event, TokenPair};
use crate::error::AmmError;
use crate::ledger::Ledger;
use crate::pair::Pair;
use crate::token::StandardToken;

/// Domain separator hashed in front of the two token addresses.
const PAIR_ADDRESS_DOMAIN: &[u8] = b"pairswap.pair.v1";

#[derive(Debug, Default)]
struct Registry {
    by_tokens: HashMap<TokenPair, Arc<Pair>>,
    by_address: HashMap<Address, Arc<Pair>>,
    all_pairs: Vec<Address>,
}

/// Shared handle on a factory's registry.  The ledger keeps one per pair
/// created inside a unit of work so it can forget the pair on rollback.
#[derive(Debug, Clone, Default)]
pub(crate) struct PairRegistry(Arc<RwLock<Registry>>);

impl PairRegistry {
    fn read(&self) -> RwLockReadGuard<'_, Registry> {
        self.0.read()
    }

    fn write(&self) -> RwLockWriteGuard<'_, Registry> {
        self.0.write()
    }

    /// Removes the pair for `tokens`, if registered.
    pub(crate) fn forget(&self, tokens: &TokenPair) {
        let mut registry = self.write();
        if let Some(pair) = registry.by_tokens.remove(tokens) {
            registry.by_address.remove(&pair.address());
            if registry.all_pairs.last() == Some(&pair.address()) {
                registry.all_pairs.pop();
            } else {
                registry.all_pairs.retain(|a| *a != pair.address());
            }
            tracing::warn!("Discarded pair {} after a failed operation", pair.address());
        }
    }
}

/// Creates pairs and remembers them.
///
/// At most one pair exists per unordered token pair.  A pair's address is
/// a pure function of its two tokens (see [`pair_for`](Self::pair_for)),
/// so anyone can compute it without asking the factory.
///
/// `Factory` is shared as `Arc<Factory>` by routers; its registry and fee
/// settings sit behind read/write locks and every method takes `&self`.
///
/// # Examples
///
/// ```
/// use pairswap::config::ExchangeConfig;
/// use pairswap::domain::Address;
/// use pairswap::factory::Factory;
/// use pairswap::ledger::Ledger;
///
/// let admin = Address::repeat_byte(0xAD);
/// let factory = Factory::new(admin, ExchangeConfig::default()).expect("valid config");
/// let mut ledger = Ledger::new();
///
/// let (a, b) = (Address::repeat_byte(1), Address::repeat_byte(2));
/// let pair = factory.create_pair(&mut ledger, b, a).expect("new pair");
///
/// assert_eq!(pair.token0(), a);
/// assert_eq!(factory.get_pair(a, b), Some(pair.address()));
/// assert_eq!(factory.get_pair(b, a), Some(pair.address()));
/// assert_eq!(Factory::pair_for(a, b).ok(), Some(pair.address()));
/// assert_eq!(factory.all_pairs_len(), 1);
/// ```
#[derive(Debug)]
pub struct Factory {
    config: ExchangeConfig,
    fee_settings: Arc<RwLock<FeeSettings>>,
    registry: PairRegistry,
}

impl Factory {
    /// Creates an empty factory administered by `fee_to_setter`, with the
    /// protocol fee switched off.
    ///
    /// # Errors
    ///
    /// Propagates [`ExchangeConfig::validate`].
    pub fn new(fee_to_setter: Address, config: ExchangeConfig) -> Result<Self, AmmError> {
        config.validate()?;
        Ok(Self {
            config,
            fee_settings: Arc::new(RwLock::new(FeeSettings::new(fee_to_setter))),
            registry: PairRegistry::default(),
        })
    }

    /// The configuration every pair is created with.
    #[must_use]
    pub const fn config(&self) -> &ExchangeConfig {
        &self.config
    }

    /// Deterministic address of the pair for two tokens, in either order:
    /// `keccak256(domain ‖ token0 ‖ token1)`.
    ///
    /// # Errors
    ///
    /// Same as [`TokenPair::new`].
    pub fn pair_for(token_a: Address, token_b: Address) -> Result<Address, AmmError> {
        let tokens = TokenPair::new(token_a, token_b)?;
        Ok(Self::derive_address(&tokens))
    }

    fn derive_address(tokens: &TokenPair) -> Address {
        let mut hasher = Keccak256::new();
        hasher.update(PAIR_ADDRESS_DOMAIN);
        hasher.update(tokens.token0().as_bytes());
        hasher.update(tokens.token1().as_bytes());
        let digest = hasher.finalize();
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&digest);
        Address::from_bytes(bytes)
    }

    /// Creates and registers the pair for two tokens.
    ///
    /// The pair's LP-share token is registered in `ledger` at the pair's
    /// address and a `PairCreated` event is emitted.  If an enclosing
    /// [`Ledger::atomic`] unit fails, the pair is forgotten again together
    /// with its LP-share token.
    ///
    /// # Errors
    ///
    /// - [`AmmError::IdenticalAddresses`] if both tokens are the same.
    /// - [`AmmError::ZeroAddress`] if either token is zero.
    /// - [`AmmError::PairExists`] if the pair is already registered.
    pub fn create_pair(
        &self,
        ledger: &mut Ledger,
        token_a: Address,
        token_b: Address,
    ) -> Result<Arc<Pair>, AmmError> {
        let tokens = TokenPair::new(token_a, token_b)?;
        let mut registry = self.registry.write();
        if registry.by_tokens.contains_key(&tokens) {
            return Err(AmmError::PairExists);
        }
        let address = Self::derive_address(&tokens);
        ledger.register_token(StandardToken::liquidity_shares(address))?;

        let pair = Arc::new(Pair::new(
            address,
            tokens,
            self.config,
            Arc::clone(&self.fee_settings),
        ));
        registry.by_tokens.insert(tokens, Arc::clone(&pair));
        registry.by_address.insert(address, Arc::clone(&pair));
        registry.all_pairs.push(address);
        let pair_count = registry.all_pairs.len();
        drop(registry);
        ledger.save_pair_created(self.registry.clone(), tokens);

        ledger.emit(Event::PairCreated {
            token0: tokens.token0(),
            token1: tokens.token1(),
            pair: address,
            pair_count,
        });
        tracing::info!(
            "Created pair {} for {} / {} ({} pairs)",
            address,
            tokens.token0(),
            tokens.token1(),
            pair_count
        );
        Ok(pair)
    }

    /// Address of the pair for two tokens, in either order.
    #[must_use]
    pub fn get_pair(&self, token_a: Address, token_b: Address) -> Option<Address> {
        self.pair_by_tokens(token_a, token_b).map(|p| p.address())
    }

    /// Handle of the pair for two tokens, in either order.
    #[must_use]
    pub fn pair_by_tokens(&self, token_a: Address, token_b: Address) -> Option<Arc<Pair>> {
        let tokens = TokenPair::new(token_a, token_b).ok()?;
        self.registry.read().by_tokens.get(&tokens).cloned()
    }

    /// Handle of the pair at `address`.
    #[must_use]
    pub fn pair(&self, address: &Address) -> Option<Arc<Pair>> {
        self.registry.read().by_address.get(address).cloned()
    }

    /// Address of the `index`-th pair created.
    #[must_use]
    pub fn all_pairs(&self, index: usize) -> Option<Address> {
        self.registry.read().all_pairs.get(index).copied()
    }

    /// Number of pairs created.
    #[must_use]
    pub fn all_pairs_len(&self) -> usize {
        self.registry.read().all_pairs.len()
    }

    /// Current protocol fee recipient.
    #[must_use]
    pub fn fee_to(&self) -> Option<Address> {
        self.fee_settings.read().fee_to
    }

    /// Current admin.
    #[must_use]
    pub fn fee_to_setter(&self) -> Address {
        self.fee_settings.read().fee_to_setter
    }

    /// Sets (or with `None`, clears) the protocol fee recipient.
    ///
    /// # Errors
    ///
    /// [`AmmError::Forbidden`] unless `caller` is the current admin.
    pub fn set_fee_to(&self, caller: Address, fee_to: Option<Address>) -> Result<(), AmmError> {
        let mut settings = self.fee_settings.write();
        if caller != settings.fee_to_setter {
            return Err(AmmError::Forbidden);
        }
        settings.fee_to = fee_to;
        tracing::info!("Protocol fee recipient set to {:?}", fee_to);
        Ok(())
    }

    /// Hands the admin role to `fee_to_setter`.
    ///
    /// # Errors
    ///
    /// [`AmmError::Forbidden`] unless `caller` is the current admin.
    pub fn set_fee_to_setter(&self, caller: Address, fee_to_setter: Address) -> Result<(), AmmError> {
        let mut settings = self.fee_settings.write();
        if caller != settings.fee_to_setter {
            return Err(AmmError::Forbidden);
        }
        settings.fee_to_setter = fee_to_setter;
        tracing::info!("Protocol fee admin set to {}", fee_to_setter);
        Ok(())
    }
}
