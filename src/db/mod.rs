pub mod postgres;
pub mod users;

pub use postgres::{create_pool, run_migrations};
pub use users::{PgUserStore, UserStore};

#[cfg(test)]
pub use users::MockUserStore;
