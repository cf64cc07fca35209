//! Delivery providers for contact submissions

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sourdough_client::{GatewayClient, Record};
use url::Url;

use crate::contact::ContactForm;
use crate::error::FormError;

fn default_collection() -> String {
    "contacts".to_string()
}

fn default_formspree_endpoint() -> String {
    "https://formspree.io/f".to_string()
}

/// Provider settings, as they appear in site configuration.
///
/// ```toml
/// [contact]
/// provider = "formspree"
/// form_id = "xyzabcd"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "provider", rename_all = "lowercase")]
pub enum DeliveryProvider {
    /// Store the submission through the gateway
    Api {
        base_url: String,
        #[serde(default = "default_collection")]
        collection: String,
    },
    /// JSON POST to a Formspree form
    Formspree {
        form_id: String,
        #[serde(default = "default_formspree_endpoint")]
        endpoint: String,
    },
    /// URL-encoded POST to a Netlify-hosted site root
    Netlify { site_url: String, form_name: String },
    /// Validate only
    None,
}

/// A provider resolved into ready-to-use clients
#[derive(Debug, Clone)]
pub enum Delivery {
    Api {
        client: GatewayClient,
        collection: String,
    },
    Formspree {
        http: reqwest::Client,
        url: Url,
    },
    Netlify {
        http: reqwest::Client,
        url: Url,
        form_name: String,
    },
    None,
}

impl Delivery {
    /// Resolve provider settings. URLs are checked here, once.
    pub fn new(provider: &DeliveryProvider) -> Result<Self, FormError> {
        let delivery = match provider {
            DeliveryProvider::Api {
                base_url,
                collection,
            } => Delivery::Api {
                client: GatewayClient::new(base_url)
                    .map_err(|e| FormError::Config(e.to_string()))?,
                collection: collection.clone(),
            },
            DeliveryProvider::Formspree { form_id, endpoint } => {
                let url = parse_url(&format!("{}/{}", endpoint.trim_end_matches('/'), form_id))?;
                Delivery::Formspree {
                    http: reqwest::Client::new(),
                    url,
                }
            }
            DeliveryProvider::Netlify {
                site_url,
                form_name,
            } => Delivery::Netlify {
                http: reqwest::Client::new(),
                url: parse_url(site_url)?
                    .join("/")
                    .map_err(|e| FormError::Config(e.to_string()))?,
                form_name: form_name.clone(),
            },
            DeliveryProvider::None => Delivery::None,
        };
        Ok(delivery)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Delivery::Api { .. } => "api",
            Delivery::Formspree { .. } => "formspree",
            Delivery::Netlify { .. } => "netlify",
            Delivery::None => "none",
        }
    }

    /// Send an already validated form
    pub async fn deliver(&self, form: &ContactForm) -> Result<(), FormError> {
        tracing::debug!(provider = self.name(), "Delivering contact form");

        match self {
            Delivery::Api { client, collection } => {
                let envelope = client
                    .create::<Record, _>(collection, &api_payload(form)?)
                    .await;
                match envelope.into_result() {
                    Ok(_) => Ok(()),
                    Err(error) => Err(FormError::Rejected(error)),
                }
            }
            Delivery::Formspree { http, url } => {
                let response = http
                    .post(url.clone())
                    .json(form)
                    .send()
                    .await
                    .map_err(|e| FormError::Transport(e.to_string()))?;
                ensure_success(response.status())
            }
            Delivery::Netlify {
                http,
                url,
                form_name,
            } => {
                let mut fields = form.filled_fields();
                fields.push(("form-name", form_name.clone()));
                let response = http
                    .post(url.clone())
                    .form(&fields)
                    .send()
                    .await
                    .map_err(|e| FormError::Transport(e.to_string()))?;
                ensure_success(response.status())
            }
            Delivery::None => Ok(()),
        }
    }
}

fn parse_url(raw: &str) -> Result<Url, FormError> {
    Url::parse(raw).map_err(|e| FormError::Config(format!("Invalid URL '{}': {}", raw, e)))
}

fn ensure_success(status: reqwest::StatusCode) -> Result<(), FormError> {
    if status.is_success() {
        Ok(())
    } else {
        Err(FormError::Rejected(format!("HTTP status {}", status.as_u16())))
    }
}

/// The form fields plus a `createdAt` timestamp
fn api_payload(form: &ContactForm) -> Result<Value, FormError> {
    let mut payload =
        serde_json::to_value(form).map_err(|e| FormError::Config(e.to_string()))?;
    if let Value::Object(map) = &mut payload {
        map.insert(
            "createdAt".to_string(),
            Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
        );
    }
    Ok(payload)
}
