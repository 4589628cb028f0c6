use crate::{
    client::ApiClient,
    errors::Result,
    models::{DashboardStats, StatsEnvelope},
    transport::ApiRequest,
};

const STATS_PATH: &str = "/admin/stats";

#[derive(Clone)]
pub struct StatsService {
    client: ApiClient,
}

impl StatsService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Category and product totals for the dashboard.
    pub async fn dashboard(&self) -> Result<DashboardStats> {
        let envelope: StatsEnvelope = self.client.call(ApiRequest::get(STATS_PATH)).await?;
        Ok(envelope.data)
    }
}
