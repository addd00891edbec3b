//! First-match request router.
//!
//! The router walks its routes in declaration order and selects the first one
//! whose matchers accept the request. Routes are not checked for overlap; when
//! two routes accept the same request, the earlier one wins.

use crate::{DEFAULT_ROUTES, HandlerId, RequestEnvelope, Route};

/// Ordered table of routes.
#[derive(Debug, Clone)]
pub struct Router {
    routes: Vec<Route>,
}

impl Default for Router {
    fn default() -> Self {
        Self::new(DEFAULT_ROUTES.to_vec())
    }
}

impl Router {
    /// Creates a router over the given routes, evaluated in order.
    pub fn new(routes: Vec<Route>) -> Self {
        Self { routes }
    }

    /// Appends a route after all existing ones.
    #[must_use]
    pub fn with_route(mut self, route: Route) -> Self {
        self.routes.push(route);
        self
    }

    /// Selects the handler for a request, if any route accepts it.
    pub fn select(&self, envelope: &RequestEnvelope) -> Option<HandlerId> {
        self.routes
            .iter()
            .find(|route| route.matches(envelope))
            .map(|route| route.handler)
    }

    /// Returns the routes in evaluation order.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }
}
