use tracing::instrument;

use super::wire::HealthBody;
use super::{ApiEndpoint, ServiceError};

#[derive(Debug, Clone, PartialEq)]
pub struct HealthReport {
    pub status: String,
    pub database: Option<String>,
    pub error: Option<String>,
}

impl HealthReport {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

impl ApiEndpoint {
    /// `GET /api/health`. An unhealthy backend still answers 200.
    #[instrument(skip(self))]
    pub async fn health(&self) -> Result<HealthReport, ServiceError> {
        let url = self.url(&["api", "health"])?;
        let body: HealthBody = self.get_json(url).await?;
        Ok(HealthReport {
            status: body.status,
            database: body.database,
            error: body.error,
        })
    }
}
