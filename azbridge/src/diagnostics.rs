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

//! Application served by `azbridge serve`: reports back what it was
//! asked, which is enough to check a deployment end to end.

use axum::{Extension, Json, Router};
use axum::body::Bytes;
use axum::http::{HeaderMap, Method, Uri};
use axum::routing::any;
use azbridge_core::client_principal::ClientPrincipal;
use azbridge_core::headers::extract_headers;
use azbridge_core::mode::Mode;
use azbridge_core::platform::PlatformRequest;
use serde::Serialize;
use std::collections::BTreeMap;

/// Load context for the diagnostic application.
#[derive(Clone, Debug, Default)]
pub struct Session {
    pub principal: Option<ClientPrincipal>
}

pub fn load_session(platform_request: &PlatformRequest) -> anyhow::Result<Session> {
    Ok(Session {
        principal: ClientPrincipal::from_headers(&platform_request.headers)?
    })
}

#[derive(Debug, Serialize)]
struct Echo {
    method: String,
    url: String,
    headers: BTreeMap<String, String>,
    body_length: usize,
    mode: Mode,
    user: Option<String>,
    roles: Vec<String>
}

async fn echo(Extension(mode): Extension<Mode>, Extension(session): Extension<Session>, method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> Json<Echo> {
    let (user, roles) =
        match session.principal {
            Some(principal) => (Some(principal.user_details), principal.user_roles),
            None => (None, Vec::new())
        };

    Json(Echo {
        method: method.to_string(),
        url: uri.to_string(),
        headers: extract_headers(&headers),
        body_length: body.len(),
        mode: mode,
        user: user,
        roles: roles
    })
}

pub fn router() -> Router {
    Router::new()
        .route("/", any(echo))
        .route("/{*path}", any(echo))
}
