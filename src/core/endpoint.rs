// src/core/endpoint.rs

//! # Endpoint Resolver
//!
//! Produces the public webhook URL of a project from one of three sources:
//! a running ngrok tunnel, the bst proxy configuration, or the hosted relay
//! addressed by the user's webhook identity. The strategies are independent.

use crate::constants::{
    BST_CONFIG_DIR, BST_CONFIG_FILENAME, DEFAULT_WEBHOOK_PORT, NGROK_TUNNELS_API,
    WEBHOOK_BASE_URL, WEBHOOK_PATH,
};
use crate::core::webhook::{IdentityError, WebhookIdentityStore};
use crate::system::json_file::{self, JsonFileError};
use reqwest::header::ACCEPT;
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while resolving a webhook endpoint.
#[derive(Error, Debug)]
pub enum EndpointError {
    /// The endpoint type name is not recognised.
    #[error("Unknown endpoint type '{0}'. Expected 'ngrok', 'bst-proxy', 'voxa-webhook' or 'none'.")]
    UnknownKind(String),
    /// `none` was asked for a URL.
    #[error("Endpoint type 'none' has no URL.")]
    NoEndpoint,
    /// The ngrok status API is unreachable or answered with garbage.
    #[error(
        "Could not reach the ngrok status API at '{url}': {source}. Please run <ngrok http {port}> in another tab if you want to create an ngrok link."
    )]
    TunnelApi {
        url: String,
        port: u16,
        #[source]
        source: reqwest::Error,
    },
    /// ngrok runs, but no secure tunnel forwards to the port.
    #[error(
        "Could not find a secure ngrok tunnel for localhost:{port}. Please run <ngrok http {port}> in another tab if you want to create an ngrok link."
    )]
    TunnelNotFound { port: u16 },
    /// `~/.bst/config` is missing or unreadable.
    #[error("Could not read bst configuration: {0}")]
    BstConfig(#[from] JsonFileError),
    /// `~/.bst/config` has no `sourceID`.
    #[error("bst configuration at '{path}' has no \"sourceID\".")]
    MissingSourceId { path: PathBuf },
    /// The webhook identity could not be created.
    #[error(transparent)]
    Identity(#[from] IdentityError),
}

/// Where a project's webhook endpoint comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointKind {
    Ngrok,
    BstProxy,
    VoxaWebhook,
    None,
}

impl EndpointKind {
    /// The name used on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ngrok => "ngrok",
            Self::BstProxy => "bst-proxy",
            Self::VoxaWebhook => "voxa-webhook",
            Self::None => "none",
        }
    }
}

impl fmt::Display for EndpointKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EndpointKind {
    type Err = EndpointError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ngrok" => Ok(Self::Ngrok),
            "bst-proxy" => Ok(Self::BstProxy),
            "voxa-webhook" | "webhook" => Ok(Self::VoxaWebhook),
            "none" => Ok(Self::None),
            other => Err(EndpointError::UnknownKind(other.to_string())),
        }
    }
}

/// Anything that can turn an endpoint kind into a URL.
pub trait ResolveEndpoint {
    /// Returns the public URL for `kind`.
    fn resolve(&self, kind: EndpointKind) -> Result<String, EndpointError>;
}

/// Body of the ngrok `/api/tunnels` response.
#[derive(Deserialize, Debug, Default)]
pub struct TunnelList {
    /// Active tunnels.
    #[serde(default)]
    pub tunnels: Vec<Tunnel>,
}

/// One ngrok tunnel.
#[derive(Deserialize, Debug)]
pub struct Tunnel {
    /// `http` or `https`.
    pub proto: String,
    /// Public address of the tunnel.
    pub public_url: String,
    /// Local side of the tunnel.
    #[serde(default)]
    pub config: TunnelConfig,
}

/// Local forwarding settings of a tunnel.
#[derive(Deserialize, Debug, Default)]
pub struct TunnelConfig {
    /// Forwarded address, e.g. `localhost:3000`.
    #[serde(default)]
    pub addr: String,
}

#[derive(Deserialize, Debug)]
struct BstConfig {
    #[serde(rename = "sourceID")]
    source_id: Option<String>,
}

/// Returns the public URL of the first secure tunnel forwarding to `localhost:<port>`.
pub fn find_tunnel_url(list: &TunnelList, port: u16) -> Option<&str> {
    let local = format!("localhost:{}", port);
    let local_http = format!("http://{}", local);
    list.tunnels
        .iter()
        .find(|t| t.proto == "https" && (t.config.addr == local || t.config.addr == local_http))
        .map(|t| t.public_url.as_str())
}

/// The default resolver, backed by the network and the user's home directory.
#[derive(Debug)]
pub struct EndpointResolver {
    home: PathBuf,
    identity: WebhookIdentityStore,
    tunnels_api: String,
    port: u16,
    client: reqwest::blocking::Client,
}

impl EndpointResolver {
    /// Resolver reading user files below `home`, with the default port and ngrok API.
    pub fn new(home: &Path) -> Self {
        Self {
            home: home.to_path_buf(),
            identity: WebhookIdentityStore::for_home(home),
            tunnels_api: NGROK_TUNNELS_API.to_string(),
            port: DEFAULT_WEBHOOK_PORT,
            // The status API is local; system proxies must not intercept it.
            client: reqwest::blocking::Client::builder()
                .no_proxy()
                .build()
                .unwrap_or_default(),
        }
    }

    /// Local port the tunnel must forward to.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Overrides the ngrok status API URL.
    pub fn with_tunnels_api(mut self, url: impl Into<String>) -> Self {
        self.tunnels_api = url.into();
        self
    }

    fn ngrok_url(&self) -> Result<String, EndpointError> {
        log::debug!("Querying ngrok tunnels at {}", self.tunnels_api);
        let api_error = |source| EndpointError::TunnelApi {
            url: self.tunnels_api.clone(),
            port: self.port,
            source,
        };

        let list: TunnelList = self
            .client
            .get(&self.tunnels_api)
            .header(ACCEPT, "application/json")
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(api_error)?
            .json()
            .map_err(api_error)?;

        find_tunnel_url(&list, self.port)
            .map(|url| format!("{}{}", url, WEBHOOK_PATH))
            .ok_or(EndpointError::TunnelNotFound { port: self.port })
    }

    fn bst_proxy_url(&self) -> Result<String, EndpointError> {
        let path = self.home.join(BST_CONFIG_DIR).join(BST_CONFIG_FILENAME);
        let config: BstConfig = json_file::read_json(&path)?;
        let source_id = config
            .source_id
            .filter(|s| !s.is_empty())
            .ok_or(EndpointError::MissingSourceId { path })?;
        Ok(format!("https://{}.bespoken.link{}", source_id, WEBHOOK_PATH))
    }

    fn webhook_url(&self) -> Result<String, EndpointError> {
        let uuid = self.identity.get_or_create()?;
        Ok(format!("{}/{}", WEBHOOK_BASE_URL, uuid))
    }
}

impl ResolveEndpoint for EndpointResolver {
    fn resolve(&self, kind: EndpointKind) -> Result<String, EndpointError> {
        let url = match kind {
            EndpointKind::Ngrok => self.ngrok_url(),
            EndpointKind::BstProxy => self.bst_proxy_url(),
            EndpointKind::VoxaWebhook => self.webhook_url(),
            EndpointKind::None => Err(EndpointError::NoEndpoint),
        }?;
        log::info!("Resolved {} endpoint: {}", kind, url);
        Ok(url)
    }
}
