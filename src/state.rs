//! Shared state handed to every axum handler.

use crate::db::AsyncDbPool;
use crate::query::PageResolver;
use crate::repositories::Repositories;
use crate::services::Services;

/// Services plus the pool the health check pings.
///
/// Cloning is cheap: services hold their stores behind `Arc` and the pool
/// is reference counted.
#[derive(Clone)]
pub struct AppState {
    pub services: Services,
    pub db_pool: AsyncDbPool,
}

impl AppState {
    /// Wires PostgreSQL repositories and services over `pool`.
    pub fn new(pool: AsyncDbPool, pages: PageResolver) -> Self {
        let services = Services::new(Repositories::new(pool.clone()), pages);
        Self::from_services(services, pool)
    }

    pub fn from_services(services: Services, db_pool: AsyncDbPool) -> Self {
        Self { services, db_pool }
    }
}
