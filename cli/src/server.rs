//! CCIP-Read HTTP endpoint
//!
//! `OPTIONS *` answers the CORS preflight, `POST /` runs one resolution and
//! returns `{"data": "0x<32-byte word>"}`. Every other request is a 404.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use hyper::body::to_bytes;
use hyper::header::{
    HeaderValue, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_TYPE,
};
use hyper::service::{make_service_fn, service_fn};
use hyper::{Body, Method, Request, Response, Server, StatusCode};
use log::{error, info, warn};
use serde::Serialize;
use tokio::time::timeout;

use stealth::{Resolution, SignatureOracle, StealthError, StealthResolver};

/// Everything a request handler needs; shared read-only across connections
pub struct ResolverState {
    resolver: StealthResolver,
    oracle: Arc<dyn SignatureOracle>,
    signing_timeout: Duration,
}

impl ResolverState {
    pub fn new(
        resolver: StealthResolver,
        oracle: Arc<dyn SignatureOracle>,
        signing_timeout: Duration,
    ) -> Self {
        Self {
            resolver,
            oracle,
            signing_timeout,
        }
    }

    /// Sign the challenge, then derive and select; both run off the async runtime
    pub async fn resolve(self: Arc<Self>) -> stealth::Result<Resolution> {
        let message = self.resolver.challenge(&self.oracle.address())?;
        let oracle = Arc::clone(&self.oracle);
        let signing = tokio::task::spawn_blocking(move || oracle.sign(message.as_bytes()));

        let signature = match timeout(self.signing_timeout, signing).await {
            Ok(Ok(result)) => result?,
            Ok(Err(join_error)) => {
                return Err(StealthError::SigningUnavailable(format!(
                    "signing task failed: {}",
                    join_error
                )))
            }
            Err(_) => {
                return Err(StealthError::SigningUnavailable(format!(
                    "no signature within {} ms",
                    self.signing_timeout.as_millis()
                )))
            }
        };

        tokio::task::spawn_blocking(move || self.resolver.resolve_signature(&signature))
            .await
            .map_err(|e| StealthError::DerivationError(format!("derivation task failed: {}", e)))?
    }
}

pub struct ResolverServer {
    address: SocketAddr,
    state: Arc<ResolverState>,
}

impl ResolverServer {
    pub fn new(port: u16, state: ResolverState) -> Self {
        Self {
            address: SocketAddr::from(([0, 0, 0, 0], port)),
            state: Arc::new(state),
        }
    }

    /// Serve until Ctrl-C
    pub async fn run(self) -> Result<()> {
        let state = self.state;
        let make_svc = make_service_fn(move |_| {
            let state = Arc::clone(&state);
            async move {
                Ok::<_, hyper::Error>(service_fn(move |req| {
                    let state = Arc::clone(&state);
                    async move { handle(state, req).await }
                }))
            }
        });

        let server = Server::try_bind(&self.address)
            .with_context(|| format!("Failed to bind {}", self.address))?
            .serve(make_svc);
        info!("Server is up and running on port {}", server.local_addr().port());

        server
            .with_graceful_shutdown(async {
                if tokio::signal::ctrl_c().await.is_ok() {
                    info!("Shutting down");
                }
            })
            .await
            .map_err(|e| anyhow!("Server error: {e}"))
    }
}

pub async fn handle(
    state: Arc<ResolverState>,
    req: Request<Body>,
) -> std::result::Result<Response<Body>, hyper::Error> {
    match (req.method(), req.uri().path()) {
        (&Method::OPTIONS, _) => Ok(preflight()),
        (&Method::POST, "/") => handle_lookup(state, req).await,
        _ => Ok(not_found()),
    }
}

async fn handle_lookup(
    state: Arc<ResolverState>,
    req: Request<Body>,
) -> std::result::Result<Response<Body>, hyper::Error> {
    let body = to_bytes(req.into_body()).await?;
    let payload: serde_json::Value = match serde_json::from_slice(&body) {
        Ok(value) => value,
        Err(e) => {
            warn!("rejected request body: {}", e);
            return Ok(error_response(
                StatusCode::BAD_REQUEST,
                format!("invalid JSON body: {}", e),
            ));
        }
    };
    info!("req: {}", payload);

    match state.resolve().await {
        Ok(resolution) => Ok(json_response(StatusCode::OK, &resolution.response)),
        Err(e) => {
            let status = status_for(&e);
            if status == StatusCode::SERVICE_UNAVAILABLE {
                warn!("resolution failed: {}", e);
            } else {
                error!("resolution failed: {}", e);
            }
            Ok(error_response(status, e.to_string()))
        }
    }
}

pub fn status_for(error: &StealthError) -> StatusCode {
    match error {
        StealthError::SigningUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        StealthError::InvalidSignature(_)
        | StealthError::DerivationError(_)
        | StealthError::InvalidAddress(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
}

fn with_status(status: StatusCode, body: Body) -> Response<Body> {
    let mut response = Response::new(body);
    *response.status_mut() = status;
    response
}

fn preflight() -> Response<Body> {
    let mut response = with_status(StatusCode::OK, Body::empty());
    let headers = response.headers_mut();
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("POST, OPTIONS"),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );
    response
}

fn not_found() -> Response<Body> {
    with_status(StatusCode::NOT_FOUND, Body::from("Not Found"))
}

fn json_response<T: Serialize>(status: StatusCode, value: &T) -> Response<Body> {
    let body = serde_json::to_vec(value).unwrap_or_default();
    let mut response = with_status(status, Body::from(body));
    let headers = response.headers_mut();
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    response
}

fn error_response(status: StatusCode, message: String) -> Response<Body> {
    json_response(status, &ErrorBody { message })
}
