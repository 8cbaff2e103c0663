//! The HTTP frontend: the same reply pipeline behind `POST /message`, for
//! setups where something other than the poll loop delivers the messages.

use crate::bot::Bot;
use crate::commands::build_bot;
use crate::ledger::GoogleLedger;
use crate::{Config, Result};
use anyhow::Context;
use http_body_util::{BodyExt, Full};
use hyper::body::{Bytes, Incoming};
use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use serde::Deserialize;
use serde_json::json;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, info};

/// Accepts connections until the process is terminated.
pub async fn serve(config: Config, bind: Option<&str>) -> Result<()> {
    let bind = bind.unwrap_or_else(|| config.serve_bind());
    let addr: SocketAddr = bind
        .parse()
        .with_context(|| format!("'{bind}' is not a bindable address"))?;
    let bot = Arc::new(build_bot(&config));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("cannot bind {addr}"))?;
    info!("listening on http://{addr}");

    loop {
        let (stream, peer) = listener.accept().await.context("accept failed")?;
        let io = TokioIo::new(stream);
        let bot = bot.clone();
        tokio::spawn(async move {
            let service = service_fn(move |req| handle(bot.clone(), req));
            if let Err(e) = http1::Builder::new().serve_connection(io, service).await {
                debug!("connection from {peer} ended with an error: {e}");
            }
        });
    }
}

#[derive(Debug, Deserialize)]
struct MessageRequest {
    message: String,
}

/// `POST /message` with `{"message": "..."}` runs one message through the
/// pipeline and returns `{"reply": ...}`. The reply is `null` for bot-
/// authored input, which is never answered.
async fn handle(
    bot: Arc<Bot<GoogleLedger>>,
    req: Request<Incoming>,
) -> std::result::Result<Response<Full<Bytes>>, Infallible> {
    if req.method() != Method::POST || req.uri().path() != "/message" {
        return Ok(json_response(
            StatusCode::NOT_FOUND,
            json!({ "error": "not found" }),
        ));
    }
    let body = match req.into_body().collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            debug!("failed to read request body: {e}");
            return Ok(json_response(
                StatusCode::BAD_REQUEST,
                json!({ "error": "unreadable body" }),
            ));
        }
    };
    let request: MessageRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            return Ok(json_response(
                StatusCode::BAD_REQUEST,
                json!({ "error": format!("invalid request: {e}") }),
            ));
        }
    };

    let reply = bot.reply_to(&request.message).await;
    Ok(json_response(StatusCode::OK, json!({ "reply": reply })))
}

fn json_response(status: StatusCode, body: serde_json::Value) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::from(body.to_string())));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    response
}
