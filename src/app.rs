use crate::{
    api::{epoch, json_response, swagger, ApiState, ErrorResponse},
    clock::Clock,
    err::{EpochError, Error},
    idle::IdleTimeoutAcceptor,
};
use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use axum_server::{
    tls_rustls::{RustlsAcceptor, RustlsConfig},
    Handle,
};
use hyper_util::rt::TokioTimer;
use std::{net::TcpListener, sync::Arc, time::Duration};
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;

/// Per-request cancellation settings shared by the middleware.
#[derive(Clone)]
pub struct RequestGuard {
    pub shutdown: CancellationToken,
    pub timeout: Duration,
}

/// The Main application object
pub struct App {
    state: ApiState,
    guard: RequestGuard,
    tls_config: Option<RustlsConfig>,
    header_read_timeout: Duration,
    idle_timeout: Duration,
}

impl App {
    /// Create a new application object
    ///
    /// # Arguments
    /// * `clock` - Source of the current instant
    /// * `shutdown` - Server-wide token; every request token is a child of it
    /// * `request_timeout` - Deadline after which a request is cancelled
    /// * `tls_config` - The TLS configuration (if one exists)
    pub fn new(
        clock: Arc<dyn Clock>,
        shutdown: CancellationToken,
        request_timeout: Duration,
        tls_config: Option<RustlsConfig>,
    ) -> Self {
        Self {
            state: ApiState { clock },
            guard: RequestGuard {
                shutdown,
                timeout: request_timeout,
            },
            tls_config,
            header_read_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(60),
        }
    }

    /// Set the connection level timeouts
    ///
    /// # Arguments
    /// * `header_read` - Time allowed for a client to send the full request head
    /// * `idle` - Time a connection may go without any reads or writes
    pub fn with_timeouts(mut self, header_read: Duration, idle: Duration) -> Self {
        self.header_read_timeout = header_read;
        self.idle_timeout = idle;
        self
    }

    pub fn router(&self) -> Router {
        Router::<_>::new()
            .route("/epoch/swagger", get(swagger::swagger))
            .route("/epoch/:days", get(epoch::get_epoch))
            .with_state(self.state.clone())
            .fallback(unknown_route)
            .layer(middleware::from_fn_with_state(
                self.guard.clone(),
                request_cancellation,
            ))
            .layer(TraceLayer::new_for_http())
    }

    /// Bind to `address` and serve until `handle` is shut down
    ///
    /// # Arguments
    /// * `address` - The address to bind to
    /// * `handle` - Handle used to observe the bound address and to stop the server
    ///
    /// # Returns
    /// * `Ok(())` if the server exited successfully
    /// * An error if binding or serving failed
    pub async fn serve(self, address: &str, handle: Handle) -> Result<(), Error> {
        let router = self.router();

        let listener = TcpListener::bind(address)?;
        listener.set_nonblocking(true)?;
        let local = listener.local_addr()?;

        let idle = IdleTimeoutAcceptor::new(self.idle_timeout);

        match self.tls_config {
            None => {
                tracing::info!("Listening on: http://{}", local);

                let mut server = axum_server::from_tcp(listener).acceptor(idle).handle(handle);
                server
                    .http_builder()
                    .http1()
                    .timer(TokioTimer::new())
                    .header_read_timeout(self.header_read_timeout);
                server.serve(router.into_make_service()).await?;
            }
            Some(tls_config) => {
                tracing::info!("Listening on: https://{}", local);

                let acceptor = RustlsAcceptor::new(tls_config).acceptor(idle);
                let mut server = axum_server::from_tcp(listener)
                    .acceptor(acceptor)
                    .handle(handle);
                server
                    .http_builder()
                    .http1()
                    .timer(TokioTimer::new())
                    .header_read_timeout(self.header_read_timeout);
                server.serve(router.into_make_service()).await?;
            }
        }

        Ok(())
    }
}

/// Attach a cancellation token to the request and enforce the request deadline.
///
/// A token already present in the request extensions is kept as is.
pub async fn request_cancellation(
    State(guard): State<RequestGuard>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = match request.extensions().get::<CancellationToken>() {
        Some(token) => token.clone(),
        None => {
            let token = guard.shutdown.child_token();
            request.extensions_mut().insert(token.clone());
            token
        }
    };

    match tokio::time::timeout(guard.timeout, next.run(request)).await {
        Ok(response) => response,
        Err(_) => {
            token.cancel();
            tracing::warn!(timeout = ?guard.timeout, "request deadline exceeded");
            EpochError::Canceled.into_response()
        }
    }
}

async fn unknown_route() -> Response {
    json_response(
        StatusCode::NOT_FOUND,
        &ErrorResponse {
            error: String::from("not found"),
        },
    )
}
