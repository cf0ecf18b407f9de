//! Client for the remote shipments API.
//!
//! | Method | Path             | Body                    | Success |
//! |--------|------------------|-------------------------|---------|
//! | GET    | `/api/shipments` | -                       | 200 + `[Shipment]` |
//! | POST   | `/api/shipments` | `ShipmentCreateRequest` | any 2xx, body unused |
//!
//! No retries and no timeouts beyond reqwest's defaults; every retry is an
//! operator action.

use std::future::Future;

use crate::config::ConsoleConfig;
use crate::error::{RequestError, RequestResult};
use crate::models::{Shipment, ShipmentCreateRequest};

/// The remote collaborator, as seen by the console.
pub trait ShipmentApi {
    /// Fetch the current shipment collection.
    fn list_shipments(&self) -> impl Future<Output = RequestResult<Vec<Shipment>>> + Send;

    /// Create a shipment.
    fn create_shipment(
        &self,
        request: &ShipmentCreateRequest,
    ) -> impl Future<Output = RequestResult<()>> + Send;
}

/// [`ShipmentApi`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpShipmentApi {
    client: reqwest::Client,
    config: ConsoleConfig,
}

impl HttpShipmentApi {
    /// Create a client for the configured API base.
    pub fn new(config: ConsoleConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    /// Reuse an existing reqwest client.
    pub fn with_client(client: reqwest::Client, config: ConsoleConfig) -> Self {
        Self { client, config }
    }

    /// The configuration in use.
    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }
}

impl ShipmentApi for HttpShipmentApi {
    async fn list_shipments(&self) -> RequestResult<Vec<Shipment>> {
        let response = self.client.get(self.config.shipments_url()).send().await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(RequestError::Status { status: status.as_u16(), body });
        }

        serde_json::from_str(&body).map_err(|e| RequestError::Decode(e.to_string()))
    }

    async fn create_shipment(&self, request: &ShipmentCreateRequest) -> RequestResult<()> {
        let response = self
            .client
            .post(self.config.shipments_url())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(RequestError::Status { status: status.as_u16(), body })
    }
}
