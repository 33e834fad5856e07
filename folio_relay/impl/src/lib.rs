use std::sync::Arc;

use folio_relay_contracts::{RelayDeliveryError, RelayMessage, RelayService};
use serde::Serialize;
use url::Url;

use crate::http::HttpClient;

pub mod http;

pub const SEND_ENDPOINT: &str = "https://api.emailjs.com/api/v1.0/email/send";

/// Delivers messages through an EmailJS compatible REST endpoint.
#[derive(Debug, Clone)]
pub struct RelayServiceImpl {
    config: RelayServiceConfig,
    client: HttpClient,
}

#[derive(Debug, Clone)]
pub struct RelayServiceConfig {
    pub send_endpoint: Arc<Url>,
    pub public_key: Arc<str>,
    pub access_token: Option<Arc<str>>,
}

impl RelayServiceConfig {
    pub fn new(
        public_key: &str,
        access_token: Option<&str>,
        send_endpoint_override: Option<Url>,
    ) -> anyhow::Result<Self> {
        let send_endpoint = match send_endpoint_override {
            Some(url) => url,
            None => SEND_ENDPOINT.parse()?,
        };

        Ok(Self {
            send_endpoint: send_endpoint.into(),
            public_key: public_key.into(),
            access_token: access_token.map(Into::into),
        })
    }
}

impl RelayServiceImpl {
    pub fn new(config: RelayServiceConfig) -> anyhow::Result<Self> {
        Ok(Self {
            config,
            client: HttpClient::new()?,
        })
    }
}

impl RelayService for RelayServiceImpl {
    #[tracing::instrument(skip(self, message), err(Debug))]
    async fn send(
        &self,
        service_id: &str,
        template_id: &str,
        message: &RelayMessage,
    ) -> Result<(), RelayDeliveryError> {
        let response = self
            .client
            .post((*self.config.send_endpoint).clone())
            .json(&SendRequest {
                service_id,
                template_id,
                user_id: &self.config.public_key,
                access_token: self.config.access_token.as_deref(),
                template_params: message,
            })
            .send()
            .await
            .map_err(anyhow::Error::from)?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(RelayDeliveryError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}

#[derive(Serialize)]
struct SendRequest<'a> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    #[serde(rename = "accessToken", skip_serializing_if = "Option::is_none")]
    access_token: Option<&'a str>,
    template_params: &'a RelayMessage,
}
