//! Firestore REST connector.
//!
//! - Resolves the endpoint from an explicit override, `FIRESTORE_EMULATOR_HOST`,
//!   or the public Google endpoint, and validates it for safety
//! - Picks up a bearer token from `GOOGLE_OAUTH_ACCESS_TOKEN` when present
//! - Reads documents with `GET /v1/projects/{p}/databases/{d}/documents/{path}`
//!
//! Token acquisition is left to external tooling (for example
//! `gcloud auth print-access-token`); emulators accept anonymous requests.

use std::env;

use anyhow::{Context, anyhow};
use docsource_types::DocumentPath;
use docsource_util::{block_on_future, http, redact_sensitive};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::{Client, StatusCode, Url, header};
use tracing::debug;

use crate::codec::decode_document;
use crate::store::{DocumentHandle, DocumentSnapshot, StoreConnection, StoreConnector, StoreError};

pub const DEFAULT_BASE_URL: &str = "https://firestore.googleapis.com";
pub const EMULATOR_HOST_ENV: &str = "FIRESTORE_EMULATOR_HOST";
pub const ACCESS_TOKEN_ENV: &str = "GOOGLE_OAUTH_ACCESS_TOKEN";

/// Hosts accepted over https, including their subdomains.
const ALLOWED_DOMAINS: &[&str] = &["googleapis.com"];
/// Hosts allowed for local development regardless of scheme.
const LOCALHOST_DOMAINS: &[&str] = &["localhost", "127.0.0.1", "[::1]"];

/// Unreserved URI characters stay readable in document URLs.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.').remove(b'~');

/// Opens [`FirestoreConnection`]s against a validated endpoint.
#[derive(Debug, Clone)]
pub struct FirestoreConnector {
    base_url: String,
    access_token: Option<String>,
    user_agent: String,
}

impl FirestoreConnector {
    /// Build a connector from an optional endpoint override and the environment.
    ///
    /// Endpoint resolution order:
    /// - `base_url` argument (usually from the provider config)
    /// - `FIRESTORE_EMULATOR_HOST` (`host:port`, plain http)
    /// - the public endpoint
    pub fn from_env(base_url: Option<&str>, user_agent: Option<&str>) -> Result<Self, StoreError> {
        let base_url = match base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => match env::var(EMULATOR_HOST_ENV) {
                Ok(host) if !host.trim().is_empty() => format!("http://{}", host.trim()),
                _ => DEFAULT_BASE_URL.to_string(),
            },
        };
        validate_base_url(&base_url).map_err(|error| StoreError::config(error.to_string()))?;

        let access_token = env::var(ACCESS_TOKEN_ENV).ok().filter(|token| !token.trim().is_empty());
        Ok(Self {
            base_url,
            access_token,
            user_agent: user_agent
                .map(str::to_string)
                .unwrap_or_else(|| format!("docsource/{}; {}", env!("CARGO_PKG_VERSION"), env::consts::OS)),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn build_client(&self) -> anyhow::Result<Client> {
        let mut default_headers = header::HeaderMap::new();
        if let Some(token) = &self.access_token {
            let mut value = header::HeaderValue::from_str(&format!("Bearer {token}")).context("access token is not a valid header value")?;
            value.set_sensitive(true);
            default_headers.insert(header::AUTHORIZATION, value);
        }
        default_headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));
        default_headers.insert(header::USER_AGENT, header::HeaderValue::from_str(&self.user_agent)?);

        Client::builder()
            .default_headers(default_headers)
            .build()
            .context("build http client")
    }
}

impl StoreConnector for FirestoreConnector {
    fn connect(&self, store_id: &str, database_id: &str) -> Result<Box<dyn StoreConnection>, StoreError> {
        let http = self.build_client().map_err(|error| StoreError::config(format!("{error:#}")))?;
        let documents_url = format!(
            "{}/v1/projects/{}/databases/{}/documents",
            self.base_url,
            utf8_percent_encode(store_id, SEGMENT),
            utf8_percent_encode(database_id, SEGMENT),
        );
        debug!(%documents_url, authenticated = self.access_token.is_some(), "opened store connection");
        Ok(Box::new(FirestoreConnection {
            http,
            documents_url,
            closed: false,
        }))
    }
}

/// Connection to one Firestore database.
#[derive(Debug)]
pub struct FirestoreConnection {
    http: Client,
    documents_url: String,
    closed: bool,
}

impl FirestoreConnection {
    fn document_url(&self, path: &DocumentPath) -> String {
        let encoded: Vec<String> = path
            .segments()
            .map(|segment| utf8_percent_encode(segment, SEGMENT).to_string())
            .collect();
        format!("{}/{}", self.documents_url, encoded.join("/"))
    }
}

impl StoreConnection for FirestoreConnection {
    fn resolve<'a>(&'a self, path: &DocumentPath) -> Result<Box<dyn DocumentHandle + 'a>, StoreError> {
        if self.closed {
            return Err(StoreError::Closed);
        }
        Ok(Box::new(FirestoreDocument {
            http: &self.http,
            url: self.document_url(path),
            path: path.clone(),
        }))
    }

    fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            debug!(documents_url = %self.documents_url, "closed store connection");
        }
    }
}

struct FirestoreDocument<'a> {
    http: &'a Client,
    url: String,
    path: DocumentPath,
}

impl DocumentHandle for FirestoreDocument<'_> {
    fn path(&self) -> &DocumentPath {
        &self.path
    }

    fn fetch(&self) -> Result<DocumentSnapshot, StoreError> {
        let request = self.http.get(&self.url);
        debug!(url = %self.url, "fetching document");
        let (status, text) = block_on_future(async move {
            let response = request.send().await.map_err(|error| anyhow!("request failed: {error}"))?;
            let status = response.status();
            let text = response.text().await.map_err(|error| anyhow!("read response body: {error}"))?;
            Ok((status, text))
        })
        .map_err(|error| StoreError::transport(redact_sensitive(&format!("{error:#}"))))?;

        snapshot_from_response(status, &text)
    }
}

/// Map an HTTP response onto a snapshot or a store error.
fn snapshot_from_response(status: StatusCode, text: &str) -> Result<DocumentSnapshot, StoreError> {
    match status.as_u16() {
        404 => Ok(DocumentSnapshot::missing()),
        401 => Err(StoreError::Unauthenticated {
            message: http::status_error_message(401).unwrap_or_else(|| http::api_error_message(text)),
        }),
        403 => Err(StoreError::PermissionDenied {
            message: format!(
                "{} ({})",
                http::api_error_message(text),
                http::status_error_message(403).unwrap_or_default()
            ),
        }),
        code if !status.is_success() => Err(StoreError::Status {
            code,
            message: http::api_error_message(text),
        }),
        _ => {
            let payload =
                http::parse_response_json_strict(text, Some(status)).map_err(|error| StoreError::transport(error.to_string()))?;
            Ok(DocumentSnapshot::found(decode_document(&payload)?))
        }
    }
}

/// Validate that a base URL is acceptable for use by the connector.
///
/// Rules:
/// - `localhost`, `127.0.0.1` or `[::1]`: any scheme is allowed (emulators)
/// - otherwise: scheme must be HTTPS, and host must be an allowed Google
///   domain or a subdomain thereof
fn validate_base_url(base: &str) -> anyhow::Result<()> {
    let parsed_base_url = Url::parse(base).map_err(|e| anyhow!("Invalid store base URL '{}': {}", base, e))?;

    let host_name = parsed_base_url
        .host_str()
        .ok_or_else(|| anyhow!("store base URL must include a host"))?;

    if LOCALHOST_DOMAINS
        .iter()
        .any(|&allowed| host_name.eq_ignore_ascii_case(allowed))
    {
        return Ok(());
    }

    if parsed_base_url.scheme() != "https" {
        return Err(anyhow!(
            "store base URL must use https for non-localhost hosts; got '{}://'",
            parsed_base_url.scheme()
        ));
    }

    let is_allowed_domain = ALLOWED_DOMAINS.iter().any(|&allowed_domain| {
        host_name.eq_ignore_ascii_case(allowed_domain) || host_name.ends_with(&format!(".{}", allowed_domain))
    });
    if !is_allowed_domain {
        return Err(anyhow!(
            "store host '{}' is not allowed; must be one of {:?} or a subdomain, or localhost",
            host_name,
            ALLOWED_DOMAINS
        ));
    }

    Ok(())
}
