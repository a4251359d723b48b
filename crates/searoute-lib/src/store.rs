//! Lazily built, shared maritime networks.

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

use once_cell::sync::OnceCell;
use tracing::{debug, info};

use crate::dataset::DataSource;
use crate::error::Result;
use crate::network::{build_network, Network, NetworkKind};
use crate::passage::Restrictions;
use crate::ports::PortResolver;

type VariantCell = Arc<OnceCell<Arc<Network>>>;

/// Owner of the network cache.
///
/// Each network kind is built on first request and then shared. Concurrent
/// first requests wait for a single build; a failed build leaves the slot
/// empty so the next request tries again.
#[derive(Debug)]
pub struct NetworkStore {
    source: DataSource,
    marnet: OnceCell<Arc<Network>>,
    ports: OnceCell<Arc<Network>>,
    variants: Mutex<HashMap<(NetworkKind, Restrictions), VariantCell>>,
    resolver: OnceCell<Arc<PortResolver>>,
    builds: AtomicUsize,
}

impl NetworkStore {
    pub fn new(source: DataSource) -> Self {
        Self {
            source,
            marnet: OnceCell::new(),
            ports: OnceCell::new(),
            variants: Mutex::new(HashMap::new()),
            resolver: OnceCell::new(),
            builds: AtomicUsize::new(0),
        }
    }

    /// Store backed by the data compiled into the library.
    pub fn bundled() -> Self {
        Self::new(DataSource::Bundled)
    }

    /// Store backed by [`DataSource::resolve`].
    pub fn resolve(dir: Option<&Path>) -> Self {
        Self::new(DataSource::resolve(dir))
    }

    pub fn source(&self) -> &DataSource {
        &self.source
    }

    /// Return the network for `kind`, building it on first use.
    pub fn get_network(&self, kind: NetworkKind) -> Result<Arc<Network>> {
        let cell = match kind {
            NetworkKind::Marnet => &self.marnet,
            NetworkKind::Ports => &self.ports,
        };
        cell.get_or_try_init(|| self.build(kind)).cloned()
    }

    /// Return the network for `kind` with every restricted passage removed.
    ///
    /// An empty restriction set yields the base network.
    pub fn get_network_variant(
        &self,
        kind: NetworkKind,
        restrictions: &Restrictions,
    ) -> Result<Arc<Network>> {
        if restrictions.is_empty() {
            return self.get_network(kind);
        }

        let cell = {
            let mut variants = self.variants.lock().unwrap_or_else(PoisonError::into_inner);
            variants
                .entry((kind, restrictions.clone()))
                .or_default()
                .clone()
        };

        cell.get_or_try_init(|| {
            let base = self.get_network(kind)?;
            let variant = base.restricted(restrictions);
            debug!(
                %kind,
                restricted = ?restrictions.iter().map(|p| p.as_str()).collect::<Vec<_>>(),
                "cached network variant"
            );
            Ok(Arc::new(variant))
        })
        .cloned()
    }

    /// Port lookup built from the port network.
    pub fn port_resolver(&self) -> Result<Arc<PortResolver>> {
        self.resolver
            .get_or_try_init(|| {
                let network = self.get_network(NetworkKind::Ports)?;
                Ok(Arc::new(PortResolver::from_network(&network)))
            })
            .cloned()
    }

    /// Number of base network builds that completed.
    pub fn build_count(&self) -> usize {
        self.builds.load(Ordering::SeqCst)
    }

    fn build(&self, kind: NetworkKind) -> Result<Arc<Network>> {
        let started = Instant::now();
        let data = self.source.load(kind)?;
        let network = build_network(kind, &data)?;
        self.builds.fetch_add(1, Ordering::SeqCst);
        info!(
            %kind,
            source = %self.source,
            node_count = network.node_count(),
            edge_count = network.edge_count(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "built network"
        );
        Ok(Arc::new(network))
    }
}

impl Default for NetworkStore {
    fn default() -> Self {
        Self::bundled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::passage::Passage;

    #[test]
    fn caches_each_kind() {
        let store = NetworkStore::bundled();
        let first = store.get_network(NetworkKind::Marnet).unwrap();
        let second = store.get_network(NetworkKind::Marnet).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(store.build_count(), 1);

        store.get_network(NetworkKind::Ports).unwrap();
        assert_eq!(store.build_count(), 2);
    }

    #[test]
    fn variants_are_cached_and_share_the_base_build() {
        let store = NetworkStore::bundled();
        let restrictions = Restrictions::none().with(Passage::Suez);
        let a = store
            .get_network_variant(NetworkKind::Marnet, &restrictions)
            .unwrap();
        let b = store
            .get_network_variant(NetworkKind::Marnet, &restrictions)
            .unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert!(!a.passages().contains(&Passage::Suez));
        assert_eq!(store.build_count(), 1);
    }

    #[test]
    fn empty_restrictions_return_base_network() {
        let store = NetworkStore::bundled();
        let base = store.get_network(NetworkKind::Marnet).unwrap();
        let variant = store
            .get_network_variant(NetworkKind::Marnet, &Restrictions::none())
            .unwrap();
        assert!(Arc::ptr_eq(&base, &variant));
    }

    #[test]
    fn port_resolver_is_cached() {
        let store = NetworkStore::bundled();
        let a = store.port_resolver().unwrap();
        let b = store.port_resolver().unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert!(!a.is_empty());
    }
}
