// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;
use std::io;
use std::sync::Arc;
use std::time::Instant;

use hyper::service::service_fn;
use hyper::{http, Method, Request, StatusCode};
use serde_json::json;
use tokio::net::TcpListener;
use tracing::{debug, error, info};

use crate::config::Config;
use crate::http_utils::{create_json_response, log_and_create_error_response, HttpResponse};
use crate::log_store::LogStore;
use crate::report::{self, ReportError, ReportRequest};

pub const REPORT_ENDPOINT_PATH: &str = "/api/get_ses_logs";
pub const HEALTH_ENDPOINT_PATH: &str = "/health";

pub type ServerError = Box<dyn Error + Send + Sync>;

pub struct ReportServer {
    pub config: Arc<Config>,
    pub log_store: Arc<dyn LogStore + Send + Sync>,
}

impl ReportServer {
    /// Binds the configured address and serves requests until the listener fails.
    pub async fn start_report_server(&self) -> Result<(), ServerError> {
        let listener = TcpListener::bind((self.config.host.as_str(), self.config.port)).await?;
        let addr = listener.local_addr()?;
        info!("SES report server listening on {addr}");
        self.serve(listener).await
    }

    /// Serves requests on an already bound listener.
    pub async fn serve(&self, listener: TcpListener) -> Result<(), ServerError> {
        let config = self.config.clone();
        let log_store = self.log_store.clone();

        let service = service_fn(move |req| {
            // called for each http request
            let config = config.clone();
            let log_store = log_store.clone();
            ReportServer::endpoint_handler(config, log_store, req)
        });

        Self::serve_tcp(listener, service).await
    }

    async fn serve_tcp<S>(listener: TcpListener, service: S) -> Result<(), ServerError>
    where
        S: hyper::service::Service<Request<hyper::body::Incoming>, Response = HttpResponse>
            + Clone
            + Send
            + 'static,
        S::Future: Send,
        S::Error: Error + Send + Sync + 'static,
    {
        let server = hyper::server::conn::http1::Builder::new();
        let mut joinset = tokio::task::JoinSet::new();

        loop {
            let conn = tokio::select! {
                con_res = listener.accept() => match con_res {
                    Err(e)
                        if matches!(
                            e.kind(),
                            io::ErrorKind::ConnectionAborted
                                | io::ErrorKind::ConnectionReset
                                | io::ErrorKind::ConnectionRefused
                        ) =>
                    {
                        continue;
                    }
                    Err(e) => {
                        error!("Server error: {e}");
                        return Err(e.into());
                    }
                    Ok((conn, _)) => conn,
                },
                finished = async {
                    match joinset.join_next().await {
                        Some(finished) => finished,
                        None => std::future::pending().await,
                    }
                } => match finished {
                    Err(e) if e.is_panic() => {
                        error!("Connection handler panicked: {:?}", e);
                        continue;
                    },
                    Ok(()) | Err(_) => continue,
                },
            };
            let conn = hyper_util::rt::TokioIo::new(conn);
            let server = server.clone();
            let service = service.clone();
            joinset.spawn(async move {
                if let Err(e) = server.serve_connection(conn, service).await {
                    error!("Connection error: {e}");
                }
            });
        }
    }

    async fn endpoint_handler<B>(
        config: Arc<Config>,
        log_store: Arc<dyn LogStore + Send + Sync>,
        req: Request<B>,
    ) -> http::Result<HttpResponse> {
        match (req.method(), req.uri().path()) {
            (&Method::GET, REPORT_ENDPOINT_PATH) => {
                Self::report_handler(&config, log_store.as_ref(), req.uri().query()).await
            }
            (_, REPORT_ENDPOINT_PATH) => log_and_create_error_response(
                &format!("Method {} not allowed", req.method()),
                StatusCode::METHOD_NOT_ALLOWED,
            ),
            (&Method::GET, HEALTH_ENDPOINT_PATH) => {
                create_json_response(&json!({ "status": "ok" }), StatusCode::OK)
            }
            _ => log_and_create_error_response("Not found", StatusCode::NOT_FOUND),
        }
    }

    async fn report_handler(
        config: &Config,
        log_store: &(dyn LogStore + Send + Sync),
        query: Option<&str>,
    ) -> http::Result<HttpResponse> {
        let now = Instant::now();
        let request = match ReportRequest::from_query(query) {
            Ok(request) => request,
            Err(err) => {
                return log_and_create_error_response(&err.to_string(), StatusCode::BAD_REQUEST)
            }
        };

        match report::build_report(log_store, &request, config.fetch_limits()).await {
            Ok(classified) => {
                debug!(
                    "Time taken to build the report: {} ms",
                    now.elapsed().as_millis()
                );
                create_json_response(&classified, StatusCode::OK)
            }
            Err(err @ ReportError::InvalidRequest(_)) => {
                log_and_create_error_response(&err.to_string(), StatusCode::BAD_REQUEST)
            }
            Err(err @ ReportError::StreamListing(_)) => {
                log_and_create_error_response(&err.to_string(), StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }
}
