//! Gateway HTTP client.

use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::GatewayConfig;
use crate::error::{GatewayError, GatewayResult};
use crate::types::{
    ApiResponse, ChargeData, ChargeRequest, FinalizeData, InitializeData, InitializeRequest,
    RefundData, RefundRequest, RetrieveData, SubaccountInfo,
};

/// The gateway surface the orchestrator talks to.
///
/// Implemented by [`HttpGateway`] for production and by scripted mocks in
/// tests.
#[allow(async_fn_in_trait)]
pub trait GatewayApi {
    async fn list_subaccounts(&self) -> GatewayResult<ApiResponse<Vec<SubaccountInfo>>>;
    async fn initialize(
        &self,
        request: &InitializeRequest,
    ) -> GatewayResult<ApiResponse<InitializeData>>;
    async fn charge(&self, request: &ChargeRequest) -> GatewayResult<ApiResponse<ChargeData>>;
    async fn retrieve(&self, payment_id: &str) -> GatewayResult<ApiResponse<RetrieveData>>;
    async fn finalize(&self, payment_id: &str) -> GatewayResult<ApiResponse<FinalizeData>>;
    async fn refund(&self, request: &RefundRequest) -> GatewayResult<ApiResponse<RefundData>>;
}

/// Production gateway client over reqwest.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    config: GatewayConfig,
}

impl HttpGateway {
    pub fn new(config: GatewayConfig) -> GatewayResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GatewayError::Build(e.to_string()))?;
        Ok(Self { client, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url.trim_end_matches('/'))
    }

    /// Attach the bearer-token and merchant headers carried on every call.
    fn authed(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .bearer_auth(&self.config.secret_key)
            .header("X-Api-Key", &self.config.api_key)
            .header("X-Merchant-Id", &self.config.merchant_id)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> GatewayResult<ApiResponse<T>> {
        let response = self
            .authed(builder)
            .send()
            .await
            .map_err(GatewayError::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Http {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<ApiResponse<T>>()
            .await
            .map_err(GatewayError::from_reqwest)
    }
}

impl GatewayApi for HttpGateway {
    async fn list_subaccounts(&self) -> GatewayResult<ApiResponse<Vec<SubaccountInfo>>> {
        debug!("Fetching subaccount list");
        self.send(self.client.get(self.url("/get-subaccount"))).await
    }

    async fn initialize(
        &self,
        request: &InitializeRequest,
    ) -> GatewayResult<ApiResponse<InitializeData>> {
        debug!(reference = %request.reference, subaccount = %request.subaccount_id, "Initializing payment");
        self.send(self.client.post(self.url("/v3/initialize")).json(request))
            .await
    }

    async fn charge(&self, request: &ChargeRequest) -> GatewayResult<ApiResponse<ChargeData>> {
        debug!(transaction_id = %request.transaction_id, "Charging payment");
        self.send(self.client.post(self.url("/v2/charge")).json(request))
            .await
    }

    async fn retrieve(&self, payment_id: &str) -> GatewayResult<ApiResponse<RetrieveData>> {
        debug!(payment_id, "Retrieving payment");
        self.send(self.client.get(self.url(&format!("/v3/payments/{payment_id}"))))
            .await
    }

    async fn finalize(&self, payment_id: &str) -> GatewayResult<ApiResponse<FinalizeData>> {
        debug!(payment_id, "Finalizing payment");
        self.send(
            self.client
                .post(self.url(&format!("/v2/payments/{payment_id}/finalize"))),
        )
        .await
    }

    async fn refund(&self, request: &RefundRequest) -> GatewayResult<ApiResponse<RefundData>> {
        debug!(reference = %request.reference, "Initiating refund");
        self.send(self.client.post(self.url("/v2/refund/initiate")).json(request))
            .await
    }
}
