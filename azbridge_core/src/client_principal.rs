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

use data_encoding::BASE64;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::platform::PlatformHeaders;

pub const CLIENT_PRINCIPAL_HEADER: &'static str = "x-ms-client-principal";

#[derive(Debug, Error)]
pub enum InvalidClientPrincipal {
    #[error("Client principal header is not valid base64")]
    Encoding,

    #[error("Client principal header does not contain a principal: {0}")]
    Json(#[source] #[from] serde_json::Error)
}

/// Authenticated user, as forwarded by the platform's built-in
/// authentication in the `x-ms-client-principal` header.
#[derive(Clone, Debug, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientPrincipal {
    pub identity_provider: String,
    pub user_id: String,
    pub user_details: String,

    #[serde(default)]
    pub user_roles: Vec<String>
}

impl ClientPrincipal {
    pub fn from_headers(headers: &PlatformHeaders) -> Result<Option<Self>, InvalidClientPrincipal> {
        let encoded =
            match headers.get(CLIENT_PRINCIPAL_HEADER) {
                Some(encoded) if encoded.len() > 0 => encoded,
                _ => return Ok(None)
            };

        let decoded = BASE64.decode(encoded.trim().as_bytes()).map_err(|_| InvalidClientPrincipal::Encoding)?;
        Ok(Some(serde_json::from_slice(&decoded)?))
    }

    pub fn to_header_value(&self) -> String {
        BASE64.encode(serde_json::to_string(self).unwrap_or_default().as_bytes())
    }
}
