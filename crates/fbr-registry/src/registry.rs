//! The registry context
//!
//! A [`Registry`] bundles the store handle and configuration. It is built once
//! and handed to every operation; per-entity operations live on the
//! [`Records`] handle it returns.

use crate::config::RegistryConfig;
use crate::entity::Managed;
use fbr_model::{
    Coach, FootballAssociation, FootballClub, Member, NationalTeam, Person, Player, President,
};
use fbr_store::DocumentStore;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// Store handle plus configuration
#[derive(Debug, Clone)]
pub struct Registry {
    store: Arc<dyn DocumentStore>,
    config: Arc<RegistryConfig>,
}

impl Registry {
    /// Create registry over `store`
    pub fn new(store: impl DocumentStore + 'static, config: RegistryConfig) -> Self {
        Self {
            store: Arc::new(store),
            config: Arc::new(config),
        }
    }

    /// Create registry with default configuration
    pub fn with_defaults(store: impl DocumentStore + 'static) -> Self {
        Self::new(store, RegistryConfig::default())
    }

    /// Backing store
    #[inline]
    #[must_use]
    pub fn store(&self) -> &dyn DocumentStore {
        self.store.as_ref()
    }

    /// Configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Operations on records of type `R`
    #[inline]
    #[must_use]
    pub fn records<R: Managed>(&self) -> Records<'_, R> {
        Records {
            registry: self,
            _record: PhantomData,
        }
    }

    /// Person operations
    #[must_use]
    pub fn persons(&self) -> Records<'_, Person> {
        self.records()
    }

    /// Member operations
    #[must_use]
    pub fn members(&self) -> Records<'_, Member> {
        self.records()
    }

    /// Player operations
    #[must_use]
    pub fn players(&self) -> Records<'_, Player> {
        self.records()
    }

    /// Coach operations
    #[must_use]
    pub fn coaches(&self) -> Records<'_, Coach> {
        self.records()
    }

    /// President operations
    #[must_use]
    pub fn presidents(&self) -> Records<'_, President> {
        self.records()
    }

    /// Club operations
    #[must_use]
    pub fn clubs(&self) -> Records<'_, FootballClub> {
        self.records()
    }

    /// Association operations
    #[must_use]
    pub fn associations(&self) -> Records<'_, FootballAssociation> {
        self.records()
    }

    /// National-team operations
    #[must_use]
    pub fn national_teams(&self) -> Records<'_, NationalTeam> {
        self.records()
    }
}

/// Operations on one record type
pub struct Records<'a, R> {
    pub(crate) registry: &'a Registry,
    _record: PhantomData<fn() -> R>,
}

impl<R> Clone for Records<'_, R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R> Copy for Records<'_, R> {}

impl<R: Managed> fmt::Debug for Records<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Records")
            .field("collection", &R::COLLECTION)
            .finish_non_exhaustive()
    }
}

impl<R: Managed> Records<'_, R> {
    pub(crate) fn store(&self) -> &dyn DocumentStore {
        self.registry.store()
    }

    pub(crate) fn config(&self) -> &RegistryConfig {
        self.registry.config()
    }

    pub(crate) fn collection(&self) -> &'static str {
        R::COLLECTION.name()
    }
}
