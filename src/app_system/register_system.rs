use std::sync::Arc;

use tracing::{error, info, instrument};

use crate::backend::{CatalogLookup, PurchaseGateway};
use crate::clients::RegisterClient;
use crate::messages::Acknowledgements;
use crate::register_actor::RegisterService;

/// Starts the register service and keeps track of it until shutdown.
pub struct RegisterSystem {
    pub register_client: RegisterClient,
    pub acknowledgements: Acknowledgements,
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl RegisterSystem {
    #[instrument(name = "register_system", skip(catalog, purchases))]
    pub fn start(
        buffer_size: usize,
        catalog: Arc<dyn CatalogLookup>,
        purchases: Arc<dyn PurchaseGateway>,
    ) -> Self {
        info!("Starting register system");

        let (service, register_client, acknowledgements) =
            RegisterService::new(buffer_size, catalog, purchases);
        let handles = vec![tokio::spawn(service.run())];

        info!("Register system started");
        Self {
            register_client,
            acknowledgements,
            handles,
        }
    }

    /// Asks the service to stop and waits for it. Calls still in flight are
    /// not cancelled; their results are discarded.
    #[instrument(skip(self))]
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down register system");

        if let Err(e) = self.register_client.shutdown().await {
            error!(error = %e, "Register service already stopped");
        }

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!(error = ?e, "Service shutdown error");
                return Err(format!("Register task failed: {e}"));
            }
        }

        info!("Register system shutdown complete");
        Ok(())
    }
}
