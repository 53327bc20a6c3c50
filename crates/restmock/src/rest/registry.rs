//! Holder of the active routing table.
//!
//! Requests take an `Arc` snapshot and dispatch against it without holding
//! any lock. A reload builds a complete new table first and then replaces
//! the pointer; requests already in flight finish on the table they started
//! with.

use super::table::RoutingTable;
use crate::metrics;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{error, info};

pub struct RouteRegistry {
    current: RwLock<Arc<RoutingTable>>,
    generation: AtomicU64,
}

impl RouteRegistry {
    pub fn new(table: RoutingTable) -> Self {
        metrics::set_routes_loaded(table.len());
        Self {
            current: RwLock::new(Arc::new(table)),
            generation: AtomicU64::new(0),
        }
    }

    /// The table to dispatch the next request against.
    pub fn snapshot(&self) -> Arc<RoutingTable> {
        Arc::clone(&self.current.read())
    }

    /// Number of successful swaps since construction.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Install a new table and return the one it replaced.
    pub fn swap(&self, table: RoutingTable) -> Arc<RoutingTable> {
        let routes = table.len();
        let previous = std::mem::replace(&mut *self.current.write(), Arc::new(table));
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        metrics::set_routes_loaded(routes);
        info!(
            "Routing table replaced: {} routes (generation {})",
            routes, generation
        );
        previous
    }

    /// Build a table with `build` and swap it in. On error the active table
    /// is left untouched and the error is returned.
    pub fn reload_with<E, F>(&self, build: F) -> Result<(), E>
    where
        E: std::fmt::Display,
        F: FnOnce() -> Result<RoutingTable, E>,
    {
        match build() {
            Ok(table) => {
                self.swap(table);
                metrics::record_reload(true);
                Ok(())
            }
            Err(e) => {
                error!("Reload failed, keeping current routing table: {}", e);
                metrics::record_reload(false);
                Err(e)
            }
        }
    }
}
