//! HTTP transport for [`TableService`].

use std::convert::Infallible;
use std::net::SocketAddr;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::body::Incoming;
use hyper::header::ALLOW;
use hyper::header::HeaderValue;
use hyper::header::CONTENT_TYPE;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::Method;
use hyper::Request;
use hyper::Response;
use hyper::StatusCode;
use hyper_util::rt::TokioIo;
use log::debug;
use log::info;
use log::warn;
use serde_json::json;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use super::TableService;

/// Serves one [`TableService`] over HTTP/1.
///
/// Only `GET` is accepted. When a path is set, other paths answer 404.
///
/// # Example
///
/// ```ignore
/// let server = PagingServer::bind(([127, 0, 0, 1], 8000).into(), service)
///     .await?
///     .with_path("/maestros/ajax/");
/// let cancel = CancellationToken::new();
/// tokio::spawn(server.serve(cancel.clone()));
/// ```
pub struct PagingServer {
    listener: TcpListener,
    service: TableService,
    path: Option<String>,
}

impl PagingServer {
    /// Binds `addr`; port 0 picks a free port.
    pub async fn bind(addr: SocketAddr, service: TableService) -> std::io::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self {
            listener,
            service,
            path: None,
        })
    }

    /// Restricts the endpoint to `path`.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accepts connections until `cancel` fires.
    ///
    /// Each connection is served on its own task. Connections already
    /// accepted finish on their own.
    pub async fn serve(self, cancel: CancellationToken) -> std::io::Result<()> {
        info!("paging server listening on {}", self.local_addr()?);
        loop {
            let (stream, peer) = tokio::select! {
                _ = cancel.cancelled() => {
                    info!("paging server stopped");
                    return Ok(());
                }
                accepted = self.listener.accept() => match accepted {
                    Ok(accepted) => accepted,
                    Err(err) => {
                        warn!("accept failed: {}", err);
                        continue;
                    }
                },
            };

            let service = self.service.clone();
            let path = self.path.clone();
            tokio::spawn(async move {
                let handler = service_fn(move |req: Request<Incoming>| {
                    let response = respond(&service, path.as_deref(), &req);
                    async move { Ok::<_, Infallible>(response) }
                });
                if let Err(err) = http1::Builder::new()
                    .serve_connection(TokioIo::new(stream), handler)
                    .await
                {
                    debug!("connection from {} ended: {}", peer, err);
                }
            });
        }
    }
}

impl std::fmt::Debug for PagingServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PagingServer")
            .field("local_addr", &self.listener.local_addr().ok())
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

fn respond(
    service: &TableService,
    path: Option<&str>,
    req: &Request<Incoming>,
) -> Response<Full<Bytes>> {
    if *req.method() != Method::GET {
        let mut response = json_response(
            StatusCode::METHOD_NOT_ALLOWED,
            json!({ "error": "method not allowed" }),
        );
        response
            .headers_mut()
            .insert(ALLOW, HeaderValue::from_static("GET"));
        return response;
    }
    if path.is_some_and(|p| p != req.uri().path()) {
        return json_response(StatusCode::NOT_FOUND, json!({ "error": "not found" }));
    }

    let query = req.uri().query().unwrap_or("");
    match service.handle_query(query) {
        Ok(page) => match serde_json::to_value(&page) {
            Ok(body) => json_response(StatusCode::OK, body),
            Err(err) => json_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": err.to_string() }),
            ),
        },
        Err(err) => {
            debug!("rejected query '{}': {}", query, err);
            json_response(StatusCode::BAD_REQUEST, json!({ "error": err.to_string() }))
        }
    }
}

fn json_response(status: StatusCode, body: serde_json::Value) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::from(body.to_string())));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    response
}
