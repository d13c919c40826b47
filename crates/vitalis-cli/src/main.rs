//! Vitalis console application.
//!
//! Opens (or creates) the clinic database and hands control to the
//! interactive menu. The database path is the first argument, defaulting to
//! `vitalis.db` in the working directory.

mod menu;

use anyhow::Result;
use tracing_subscriber::EnvFilter;
use vitalis_core::Database;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "vitalis.db".to_string());
    let db = Database::open(&path)?;

    menu::Menu::new(db).run()
}
