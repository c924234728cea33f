//! Admin dashboard analytics.

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::models::DashboardStats;

#[derive(Clone)]
pub struct DashboardService {
    client: ApiClient,
}

impl DashboardService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn stats(&self) -> Result<DashboardStats, ApiError> {
        self.client.get("/analytics/dashboard").await
    }
}
