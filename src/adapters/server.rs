//! Local HTTP host for the demo handler
//!
//! Every path reaches the handler; routing is left to whatever proxy sits in
//! front (e.g. `/api/demo`).

use std::convert::Infallible;
use std::future::Future;
use std::sync::Arc;

use http_body_util::{BodyExt, Full};
use hyper::body::{Bytes, Incoming};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response};
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;

use crate::core::{DemoRequestHandler, EmailSender, InboundRequest, RequestBody};
use crate::utils::error::Result;

/// Accept connections until `shutdown` resolves.
///
/// Each connection is served on its own task; the handler is shared behind
/// `Arc` and holds no per-request state.
pub async fn serve<S, F>(
    listener: TcpListener,
    handler: Arc<DemoRequestHandler<S>>,
    shutdown: F,
) -> Result<()>
where
    S: EmailSender + 'static,
    F: Future<Output = ()>,
{
    let local_addr = listener.local_addr()?;
    tracing::info!("🚀 Demo relay listening on http://{}", local_addr);

    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accepted = listener.accept() => {
                let (stream, peer_addr) = match accepted {
                    Ok(conn) => conn,
                    Err(e) => {
                        tracing::warn!("Failed to accept connection: {}", e);
                        continue;
                    }
                };
                tracing::debug!("Accepting connection from {}", peer_addr);

                let handler = Arc::clone(&handler);
                tokio::spawn(async move {
                    let service = service_fn(move |req| {
                        let handler = Arc::clone(&handler);
                        async move { Ok::<_, Infallible>(respond(&handler, req).await) }
                    });

                    if let Err(e) = http1::Builder::new()
                        .serve_connection(TokioIo::new(stream), service)
                        .await
                    {
                        tracing::debug!("Connection from {} closed with error: {}", peer_addr, e);
                    }
                });
            }
            _ = &mut shutdown => {
                tracing::info!("🛑 Shutdown signal received, no longer accepting connections");
                break;
            }
        }
    }

    Ok(())
}

async fn respond<S: EmailSender>(
    handler: &DemoRequestHandler<S>,
    req: Request<Incoming>,
) -> Response<Full<Bytes>> {
    let (parts, body) = req.into_parts();

    let body = match body.collect().await {
        Ok(collected) => {
            let bytes = collected.to_bytes();
            if bytes.is_empty() {
                RequestBody::Empty
            } else {
                RequestBody::Raw(String::from_utf8_lossy(&bytes).into_owned())
            }
        }
        Err(e) => {
            // 讀不到 body 時交給 handler 當作無效 JSON
            tracing::warn!("Failed to read request body: {}", e);
            RequestBody::Raw(String::new())
        }
    };

    handler
        .handle(InboundRequest::new(parts.method, body))
        .await
        .map(|text| Full::new(Bytes::from(text)))
}
