//! # POS Register
//!
//! Client side of a point-of-sale register: look a product up by its code,
//! collect items in a cart, and submit the sale to the POS backend.
//!
//! - **Domain types** are plain data: [`domain::Product`], [`domain::CartLine`], [`domain::Receipt`].
//! - **Session** holds the checkout state and a pure transition function,
//!   [`session::Session::step`].
//! - **Register service** is the actor that owns the session, runs backend
//!   calls as tasks, and feeds their results back in.
//! - **Register client** is the cloneable handle the console talks to.
//! - **Backend** holds the HTTP collaborators behind the `CatalogLookup` and
//!   `PurchaseGateway` traits.
//!
//! ```bash
//! POS_API_URL=http://localhost:8000 RUST_LOG=debug cargo run
//! ```

mod app_system;
mod backend;
mod clients;
mod console;
mod domain;
mod messages;
mod register_actor;
mod session;

#[cfg(test)]
mod mock_framework;

use std::sync::Arc;

use tracing::{error, info};

use crate::app_system::{setup_tracing, Config, RegisterSystem};
use crate::backend::{ApiEndpoint, HttpCatalog, HttpPurchase};
use crate::console::Backend;

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    let config = Config::load().map_err(|e| e.to_string())?;
    info!(
        api = %config.api_base_url,
        store = %config.terminal.store_code,
        terminal = %config.terminal.terminal_no,
        "Starting register"
    );

    let api = ApiEndpoint::new(config.api_base_url.clone()).map_err(|e| e.to_string())?;
    let catalog = HttpCatalog::new(api.clone());
    let purchases = HttpPurchase::new(api.clone(), config.terminal.clone());

    let mut system = RegisterSystem::start(
        config.channel_capacity,
        Arc::new(catalog.clone()),
        Arc::new(purchases),
    );

    let backend = Backend { api, catalog };
    let result = console::run(
        &system.register_client,
        &mut system.acknowledgements,
        &backend,
    )
    .await;

    if let Err(e) = &result {
        error!(error = %e, "Console stopped with an error");
    }

    system.shutdown().await?;

    info!("Register closed");
    result.map_err(|e| e.to_string())
}
