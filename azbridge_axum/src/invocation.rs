/*
 * Copyright (c) 2025 William Stadtwald Demchick <william.demchick@gmail.com>
 *
 * Permission to use, copy, modify, and distribute this software for any
 * purpose with or without fee is hereby granted, provided that the above
 * copyright notice and this permission notice appear in all copies.
 *
 * THE SOFTWARE IS PROVIDED "AS IS" AND THE AUTHOR DISCLAIMS ALL WARRANTIES
 * WITH REGARD TO THIS SOFTWARE INCLUDING ALL IMPLIED WARRANTIES OF
 * MERCHANTABILITY AND FITNESS. IN NO EVENT SHALL THE AUTHOR BE LIABLE FOR
 * ANY SPECIAL, DIRECT, INDIRECT, OR CONSEQUENTIAL DAMAGES OR ANY DAMAGES
 * WHATSOEVER RESULTING FROM LOSS OF USE, DATA OR PROFITS, WHETHER IN AN
 * ACTION OF CONTRACT, NEGLIGENCE OR OTHER TORTIOUS ACTION, ARISING OUT OF
 * OR IN CONNECTION WITH THE USE OR PERFORMANCE OF THIS SOFTWARE.
 */

use axum::{Json, Router};
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::header::HeaderMap;
use axum::http::status::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing;
use azbridge_core::invocation::*;
use azbridge_server::{Adapter, RequestHandler};
use std::sync::Arc;

/// How the invocation endpoint maps the function's bindings.
#[derive(Clone, Debug)]
pub struct InvocationSettings {
    request_binding: String,
    response_binding: String,
    original_url_fallback: bool
}

impl InvocationSettings {
    pub fn new() -> Self {
        Self {
            request_binding: DEFAULT_REQUEST_BINDING.to_owned(),
            response_binding: DEFAULT_RESPONSE_BINDING.to_owned(),
            original_url_fallback: false
        }
    }

    pub fn with_request_binding<N: Into<String>>(mut self, request_binding: N) -> Self {
        self.request_binding = request_binding.into();
        self
    }

    pub fn with_response_binding<N: Into<String>>(mut self, response_binding: N) -> Self {
        self.response_binding = response_binding.into();
        self
    }

    /// Use the trigger URL when the original URL header is absent. Only
    /// appropriate when nothing proxies in front of the function app.
    pub fn with_original_url_fallback(mut self) -> Self {
        self.original_url_fallback = true;
        self
    }
}

impl Default for InvocationSettings {
    fn default() -> Self {
        Self::new()
    }
}

struct InvocationState<H, C> {
    adapter: Adapter<H, C>,
    settings: InvocationSettings
}

/// Router implementing the custom handler side of the Functions host
/// protocol: one `POST /{function}` per invocation.
pub fn invocation_router<H, C>(adapter: Adapter<H, C>, settings: InvocationSettings) -> Router
where
    H: RequestHandler<C> + 'static,
    C: Send + 'static
{
    let state = Arc::new(InvocationState {
        adapter: adapter,
        settings: settings
    });

    Router::new()
        .route("/{function}", routing::post(handle_invocation::<H, C>))
        .with_state(state)
}

fn failure(status: StatusCode, message: String) -> Response {
    (status, Json(InvocationResponse::failed(message))).into_response()
}

async fn handle_invocation<H, C>(State(state): State<Arc<InvocationState<H, C>>>, Path(function): Path<String>, headers: HeaderMap, body: Bytes) -> Response
where
    H: RequestHandler<C> + 'static,
    C: Send + 'static
{
    let invocation: InvocationRequest =
        match serde_json::from_slice(&body) {
            Ok(invocation) => invocation,
            Err(error) => {
                tracing::warn!(function = %function, error = %error, "malformed invocation payload");
                return failure(StatusCode::BAD_REQUEST, format!("Malformed invocation payload: {}", error));
            }
        };

    let trigger =
        match invocation.http_trigger(&state.settings.request_binding) {
            Ok(trigger) => trigger,
            Err(error) => {
                tracing::warn!(function = %function, error = %error, "invocation has no usable HTTP trigger");
                return failure(StatusCode::BAD_REQUEST, error.to_string());
            }
        };

    let mut context = InvocationContext::new(function).with_metadata(invocation.metadata);
    if let Some(invocation_id) = headers.get(INVOCATION_ID_HEADER).and_then(|x| x.to_str().ok()) {
        context = context.with_invocation_id(invocation_id);
    }

    let platform_request = trigger.into_platform_request(state.settings.original_url_fallback);

    tracing::debug!(
        function = %context.function_name,
        invocation_id = context.invocation_id.as_deref().unwrap_or("-"),
        method = platform_request.method.as_deref().unwrap_or("GET"),
        "invocation received"
    );

    match state.adapter.handle(&context, &platform_request).await {
        Ok(response) => {
            tracing::debug!(function = %context.function_name, status = response.status, "invocation completed");
            Json(InvocationResponse::http(&state.settings.response_binding, response)).into_response()
        },
        Err(error) => {
            if error.is_misconfiguration() {
                tracing::error!(function = %context.function_name, error = %error, "function app is not forwarding the original URL");
            } else {
                tracing::error!(function = %context.function_name, error = %error, "invocation failed");
            }
            failure(StatusCode::INTERNAL_SERVER_ERROR, error.to_string())
        }
    }
}
