//! Lock-free publication of router snapshots.
//!
//! Readers load the current [`Router`] and keep using that snapshot for the
//! whole request. Changing routes means building a complete new router and
//! publishing it; nodes of a published router are never mutated.

use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::routing::router::Router;

/// A [`Router`] that can be replaced atomically while requests are served.
#[derive(Debug)]
pub struct SharedRouter<H> {
    current: Arc<ArcSwap<Router<H>>>,
}

impl<H> Clone for SharedRouter<H> {
    fn clone(&self) -> Self {
        Self {
            current: Arc::clone(&self.current),
        }
    }
}

impl<H> SharedRouter<H> {
    pub fn new(router: Router<H>) -> Self {
        Self {
            current: Arc::new(ArcSwap::from_pointee(router)),
        }
    }

    /// The router serving new requests right now.
    pub fn load(&self) -> Arc<Router<H>> {
        self.current.load_full()
    }

    /// Replace the router. In-flight readers keep the snapshot they loaded.
    /// Returns the previous router.
    pub fn publish(&self, router: Router<H>) -> Arc<Router<H>> {
        let previous = self.current.swap(Arc::new(router));
        tracing::info!(
            routes = self.current.load().route_count(),
            previous_routes = previous.route_count(),
            "Published new route table"
        );
        previous
    }
}
