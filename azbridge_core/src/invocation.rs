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

//! Wire format of the Azure Functions custom handler protocol. The
//! Functions host POSTs every invocation to `/{FunctionName}` with a JSON
//! envelope and expects the output bindings back in a JSON envelope.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::platform::{PlatformHeaders, PlatformRequest, PlatformResponse, ORIGINAL_URL_HEADER};

pub const DEFAULT_REQUEST_BINDING: &'static str = "req";
pub const DEFAULT_RESPONSE_BINDING: &'static str = "res";

/// Header the Functions host puts on each invocation request.
pub const INVOCATION_ID_HEADER: &'static str = "x-azure-functions-invocationid";

#[derive(Debug, Error)]
pub enum InvalidInvocation {
    #[error("Invocation has no input binding named {0:?}")]
    MissingBinding(String),

    #[error("Input binding {binding:?} is not an HTTP trigger")]
    NotHttpTrigger {
        binding: String,
        #[source]
        source: serde_json::Error
    }
}

#[derive(Clone, Debug, Default)]
#[derive(Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct InvocationRequest {
    #[serde(default)]
    pub data: Map<String, Value>,

    #[serde(default)]
    pub metadata: Map<String, Value>
}

impl InvocationRequest {
    pub fn http_trigger(&self, binding: &str) -> Result<HttpTrigger, InvalidInvocation> {
        let value = self.data.get(binding).ok_or_else(|| InvalidInvocation::MissingBinding(binding.to_owned()))?;
        HttpTrigger::deserialize(value).map_err(|source| InvalidInvocation::NotHttpTrigger { binding: binding.to_owned(), source: source })
    }
}

/// Header value as the host serializes it. Repeated headers arrive as arrays.
#[derive(Clone, Debug, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
#[serde(untagged)]
pub enum HeaderField {
    Single(String),
    Multiple(Vec<String>)
}

impl HeaderField {
    pub fn into_value(self) -> String {
        use HeaderField::*;
        match self {
            Single(value) => value,
            Multiple(values) => values.join(", ")
        }
    }
}

#[derive(Clone, Debug, Default)]
#[derive(Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct HttpTrigger {
    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub method: Option<String>,

    #[serde(default)]
    pub headers: BTreeMap<String, Option<HeaderField>>,

    #[serde(default)]
    pub body: Option<Value>,

    #[serde(default)]
    pub query: Map<String, Value>,

    #[serde(default)]
    pub params: Map<String, Value>
}

impl HttpTrigger {
    /// Converts the trigger into a platform request. With
    /// `original_url_fallback` set, a trigger lacking the original URL
    /// header gets one from its own `Url` field.
    pub fn into_platform_request(self, original_url_fallback: bool) -> PlatformRequest {
        let mut headers: PlatformHeaders =
            self.headers.into_iter().map(|(name, value)| (name, value.map(HeaderField::into_value))).collect();

        if original_url_fallback && headers.get(ORIGINAL_URL_HEADER).map_or(true, |x| x.len() == 0) {
            if let Some(url) = self.url {
                headers.insert(ORIGINAL_URL_HEADER, Some(url));
            }
        }

        let body =
            match self.body {
                None | Some(Value::Null) => None,
                Some(Value::String(body)) => Some(body),
                Some(other) => Some(other.to_string())
            };

        PlatformRequest {
            method: self.method,
            headers: headers,
            body: body
        }
    }
}

/// What the platform knows about the invocation in progress.
#[derive(Clone, Debug, Default)]
pub struct InvocationContext {
    pub invocation_id: Option<String>,
    pub function_name: String,
    pub metadata: Map<String, Value>
}

impl InvocationContext {
    pub fn new<N: Into<String>>(function_name: N) -> Self {
        Self {
            invocation_id: None,
            function_name: function_name.into(),
            metadata: Map::new()
        }
    }

    pub fn with_invocation_id<I: Into<String>>(mut self, invocation_id: I) -> Self {
        self.invocation_id = Some(invocation_id.into());
        self
    }

    pub fn with_metadata(mut self, metadata: Map<String, Value>) -> Self {
        self.metadata = metadata;
        self
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct HttpOutput {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String
}

impl From<PlatformResponse> for HttpOutput {
    fn from(value: PlatformResponse) -> Self {
        Self {
            status_code: value.status,
            headers: value.headers,
            body: value.body
        }
    }
}

#[derive(Clone, Debug, Default)]
#[derive(Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct InvocationResponse {
    pub outputs: BTreeMap<String, HttpOutput>,
    pub logs: Vec<String>,
    pub return_value: Option<Value>
}

impl InvocationResponse {
    pub fn http(binding: &str, response: PlatformResponse) -> Self {
        let mut outputs = BTreeMap::new();
        outputs.insert(binding.to_owned(), response.into());
        Self {
            outputs: outputs,
            logs: Vec::new(),
            return_value: None
        }
    }

    pub fn failed<L: Into<String>>(log: L) -> Self {
        Self {
            outputs: BTreeMap::new(),
            logs: vec![log.into()],
            return_value: None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> InvocationRequest {
        serde_json::from_value(json!({
            "Data": {
                "req": {
                    "Url": "http://localhost:7071/api/widgets",
                    "Method": "POST",
                    "Query": {},
                    "Headers": {
                        "Content-Type": ["application/json"],
                        "Accept": ["text/html", "application/json"],
                        "X-Ms-Original-Url": "https://example.com/api/widgets",
                        "X-Nothing": null
                    },
                    "Params": {},
                    "Body": "{\"id\":1}"
                }
            },
            "Metadata": {
                "sys": {"MethodName": "widgets"}
            }
        })).unwrap()
    }

    #[test]
    fn test_http_trigger_to_platform_request() -> () {
        let platform_request = sample().http_trigger(DEFAULT_REQUEST_BINDING).unwrap().into_platform_request(false);

        assert_eq!(platform_request.method.as_deref(), Some("POST"));
        assert_eq!(platform_request.body.as_deref(), Some("{\"id\":1}"));
        assert_eq!(platform_request.headers.get("content-type"), Some("application/json"));
        assert_eq!(platform_request.headers.get("accept"), Some("text/html, application/json"));
        assert_eq!(platform_request.headers.get(ORIGINAL_URL_HEADER), Some("https://example.com/api/widgets"));
        assert!(platform_request.headers.iter().any(|(name, value)| name == "X-Nothing" && value.is_none()));
        assert_eq!(platform_request.headers.get("x-nothing"), None);
    }

    #[test]
    fn test_missing_binding() -> () {
        assert!(matches!(sample().http_trigger("other"), Err(InvalidInvocation::MissingBinding(_))));

        let not_http: InvocationRequest = serde_json::from_value(json!({"Data": {"req": 5}})).unwrap();
        assert!(matches!(not_http.http_trigger("req"), Err(InvalidInvocation::NotHttpTrigger { .. })));
    }

    #[test]
    fn test_original_url_fallback() -> () {
        let trigger: HttpTrigger = serde_json::from_value(json!({
            "Url": "http://localhost:7071/api/widgets",
            "Method": "GET"
        })).unwrap();

        assert_eq!(trigger.clone().into_platform_request(false).headers.get(ORIGINAL_URL_HEADER), None);
        assert_eq!(trigger.into_platform_request(true).headers.get(ORIGINAL_URL_HEADER), Some("http://localhost:7071/api/widgets"));
    }

    #[test]
    fn test_fallback_does_not_override() -> () {
        let platform_request = sample().http_trigger("req").unwrap().into_platform_request(true);
        assert_eq!(platform_request.headers.get(ORIGINAL_URL_HEADER), Some("https://example.com/api/widgets"));
    }

    #[test]
    fn test_json_body_is_reserialized() -> () {
        let trigger: HttpTrigger = serde_json::from_value(json!({"Method": "POST", "Body": {"id": 1}})).unwrap();
        assert_eq!(trigger.into_platform_request(false).body.as_deref(), Some("{\"id\":1}"));

        let trigger: HttpTrigger = serde_json::from_value(json!({"Method": "POST", "Body": null})).unwrap();
        assert_eq!(trigger.into_platform_request(false).body, None);
    }

    #[test]
    fn test_response_envelope() -> () {
        let response = PlatformResponse {
            status: 201,
            headers: [("x-custom".to_owned(), "yes".to_owned())].into_iter().collect(),
            body: "created".to_owned()
        };

        let value = serde_json::to_value(InvocationResponse::http(DEFAULT_RESPONSE_BINDING, response)).unwrap();

        assert_eq!(value, json!({
            "Outputs": {"res": {"statusCode": 201, "headers": {"x-custom": "yes"}, "body": "created"}},
            "Logs": [],
            "ReturnValue": null
        }));
    }
}
