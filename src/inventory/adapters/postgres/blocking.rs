//! Offloads synchronous Diesel work to the blocking thread pool.

use diesel::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool, PoolError};
use thiserror::Error;
use tokio::task::JoinError;

/// `PostgreSQL` connection pool type used by inventory adapters.
pub type InventoryPgPool = Pool<ConnectionManager<PgConnection>>;

/// Failure outside the database call itself.
#[derive(Debug, Error)]
pub(super) enum BlockingFailure {
    #[error("failed to acquire pooled connection: {0}")]
    Pool(#[from] PoolError),
    #[error("blocking task join error: {0}")]
    Join(#[from] JoinError),
}

/// Runs `f` with a pooled connection on the blocking thread pool.
///
/// Pool and join failures are converted with `map_err`.
pub(super) async fn run_blocking_with<F, T, E, M>(
    pool: &InventoryPgPool,
    f: F,
    map_err: M,
) -> Result<T, E>
where
    F: FnOnce(&mut PgConnection) -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
    M: Fn(BlockingFailure) -> E + Copy + Send + 'static,
{
    let shared = pool.clone();
    tokio::task::spawn_blocking(move || {
        let mut connection = shared
            .get()
            .map_err(|err| map_err(BlockingFailure::from(err)))?;
        f(&mut connection)
    })
    .await
    .map_err(|err| map_err(BlockingFailure::from(err)))?
}
