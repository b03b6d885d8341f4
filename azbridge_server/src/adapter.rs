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

use azbridge_core::headers::extract_headers;
use azbridge_core::invocation::InvocationContext;
use azbridge_core::mode::Mode;
use azbridge_core::platform::{PlatformRequest, PlatformResponse};
use azbridge_core::request::{translate_request, InvalidPlatformRequest};
use http::Response;
use http_body::Body;
use http_body_util::BodyExt;
use std::sync::Arc;
use thiserror::Error;

use crate::handler::{RequestHandler, ServerBuild};

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Derives the value handed to the request handler as load context.
pub type LoadContextFn<C> = Arc<dyn Fn(&PlatformRequest) -> anyhow::Result<C> + Send + Sync>;

/// Everything that can go wrong during an invocation. None of these are
/// turned into HTTP responses here; that is left to the platform.
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("{0}")]
    Request(#[source] #[from] InvalidPlatformRequest),

    #[error("Load context function failed: {0}")]
    LoadContext(#[source] anyhow::Error),

    #[error("Request handler failed: {0}")]
    Handler(#[source] anyhow::Error),

    #[error("Response body could not be read: {0}")]
    ResponseBody(#[source] BoxError)
}

impl AdapterError {
    /// True when the deployment, rather than the request, is at fault.
    pub fn is_misconfiguration(&self) -> bool {
        matches!(self, AdapterError::Request(InvalidPlatformRequest::Misconfigured(_)))
    }
}

pub struct AdapterSettings<B, C> {
    build: B,
    get_load_context: Option<LoadContextFn<C>>,
    mode: Mode
}

impl<B, C> AdapterSettings<B, C>
where
    B: ServerBuild<C>
{
    pub fn new(build: B) -> Self {
        Self {
            build: build,
            get_load_context: None,
            mode: Mode::default()
        }
    }

    pub fn with_load_context<F>(mut self, get_load_context: F) -> Self
    where
        F: Fn(&PlatformRequest) -> anyhow::Result<C> + Send + Sync + 'static
    {
        self.get_load_context = Some(Arc::new(get_load_context));
        self
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn build_adapter(self) -> Adapter<B::Handler, C> {
        Adapter(Arc::new(AdapterInternal {
            handler: self.build.create_request_handler(self.mode),
            get_load_context: self.get_load_context,
            mode: self.mode
        }))
    }
}

/// Per-invocation entry point handed to the platform.
pub struct Adapter<H, C>(Arc<AdapterInternal<H, C>>);

struct AdapterInternal<H, C> {
    handler: H,
    get_load_context: Option<LoadContextFn<C>>,
    mode: Mode
}

impl<H, C> Clone for Adapter<H, C> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<H, C> Adapter<H, C>
where
    H: RequestHandler<C>
{
    pub fn mode(&self) -> Mode {
        self.0.mode
    }

    pub async fn handle(&self, _context: &InvocationContext, platform_request: &PlatformRequest) -> Result<PlatformResponse, AdapterError> {
        let request = translate_request(platform_request)?;

        let load_context =
            if let Some(ref get_load_context) = self.0.get_load_context {
                Some(get_load_context(platform_request).map_err(AdapterError::LoadContext)?)
            } else {
                None
            };

        let response = self.0.handler.handle_request(request, load_context).await.map_err(AdapterError::Handler)?;

        translate_response(response).await
    }
}

/// Buffers a generic response into the platform's shape. The body is
/// decoded as UTF-8, with invalid sequences replaced.
pub async fn translate_response<B>(response: Response<B>) -> Result<PlatformResponse, AdapterError>
where
    B: Body,
    B::Error: Into<BoxError>
{
    let (parts, body) = response.into_parts();
    let body = body.collect().await.map_err(|error| AdapterError::ResponseBody(error.into()))?.to_bytes();

    Ok(PlatformResponse {
        status: parts.status.as_u16(),
        headers: extract_headers(&parts.headers),
        body: String::from_utf8_lossy(&body).into_owned()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::handler_fn;
    use azbridge_core::platform::ORIGINAL_URL_HEADER;
    use azbridge_core::request::GenericRequest;
    use bytes::Bytes;
    use http::header::HeaderValue;
    use http::StatusCode;
    use http_body::Frame;
    use http_body_util::Full;
    use std::pin::Pin;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::task::{Context, Poll};

    fn widget_request() -> PlatformRequest {
        PlatformRequest::new("https://example.com/api/widgets")
            .with_method("POST")
            .with_header("content-type", "application/json")
            .with_body(r#"{"id":1}"#)
    }

    async fn created(request: GenericRequest, _load_context: Option<()>) -> anyhow::Result<Response<Full<Bytes>>> {
        assert_eq!(request.method(), "POST");
        assert_eq!(request.uri(), "https://example.com/api/widgets");
        assert_eq!(request.headers().get("content-type").unwrap(), "application/json");
        assert_eq!(request.body().as_slice(), br#"{"id":1}"#);

        let mut response = Response::new(Full::from("created"));
        *response.status_mut() = StatusCode::CREATED;
        response.headers_mut().insert("x-custom", HeaderValue::from_static("yes"));
        Ok(response)
    }

    #[tokio::test]
    async fn test_end_to_end() -> () {
        let adapter = AdapterSettings::new(handler_fn(created)).build_adapter();

        let response = adapter.handle(&InvocationContext::new("widgets"), &widget_request()).await.unwrap();

        assert_eq!(response, PlatformResponse {
            status: 201,
            headers: [("x-custom".to_owned(), "yes".to_owned())].into_iter().collect(),
            body: "created".to_owned()
        });
    }

    #[tokio::test]
    async fn test_without_load_context_function() -> () {
        let adapter = AdapterSettings::new(handler_fn(|_request: GenericRequest, load_context: Option<String>| async move {
            assert!(load_context.is_none());
            Ok(Response::new(Full::<Bytes>::from("ok")))
        })).build_adapter();

        let response = adapter.handle(&InvocationContext::default(), &PlatformRequest::new("https://example.com/")).await.unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.body, "ok");
    }

    #[tokio::test]
    async fn test_load_context_is_passed_through() -> () {
        let adapter =
            AdapterSettings::new(handler_fn(|_request: GenericRequest, load_context: Option<String>| async move {
                Ok(Response::new(Full::<Bytes>::from(load_context.unwrap_or_default())))
            }))
            .with_load_context(|platform_request: &PlatformRequest| Ok(format!("user={}", platform_request.headers.get("x-user").unwrap_or("nobody"))))
            .build_adapter();

        let platform_request = PlatformRequest::new("https://example.com/").with_header("x-user", "mike");
        let response = adapter.handle(&InvocationContext::default(), &platform_request).await.unwrap();
        assert_eq!(response.body, "user=mike");
    }

    #[tokio::test]
    async fn test_missing_url_stops_before_handler() -> () {
        let calls = Arc::new(AtomicUsize::new(0));
        let handler_calls = calls.clone();
        let adapter = AdapterSettings::new(handler_fn(move |_request: GenericRequest, _load_context: Option<()>| {
            handler_calls.fetch_add(1, Ordering::SeqCst);
            async { Ok(Response::new(Full::<Bytes>::from(""))) }
        })).build_adapter();

        let mut platform_request = widget_request();
        platform_request.headers.insert(ORIGINAL_URL_HEADER, None);

        let error = adapter.handle(&InvocationContext::default(), &platform_request).await.unwrap_err();
        assert!(error.is_misconfiguration());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_load_context_failure_propagates() -> () {
        let adapter =
            AdapterSettings::new(handler_fn(|_request: GenericRequest, _load_context: Option<u32>| async {
                Ok(Response::new(Full::<Bytes>::from("")))
            }))
            .with_load_context(|_: &PlatformRequest| Err(anyhow::anyhow!("no session")))
            .build_adapter();

        let error = adapter.handle(&InvocationContext::default(), &widget_request()).await.unwrap_err();
        assert!(matches!(error, AdapterError::LoadContext(_)));
        assert!(!error.is_misconfiguration());
    }

    #[tokio::test]
    async fn test_handler_failure_propagates() -> () {
        let adapter = AdapterSettings::new(handler_fn(|_request: GenericRequest, _load_context: Option<()>| async {
            Err::<Response<Full<Bytes>>, _>(anyhow::anyhow!("boom"))
        })).build_adapter();

        let error = adapter.handle(&InvocationContext::default(), &widget_request()).await.unwrap_err();
        assert!(matches!(error, AdapterError::Handler(_)));
        assert_eq!(error.to_string(), "Request handler failed: boom");
    }

    struct FailingBody;

    impl Body for FailingBody {
        type Data = Bytes;
        type Error = std::io::Error;

        fn poll_frame(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Option<Result<Frame<Bytes>, std::io::Error>>> {
            Poll::Ready(Some(Err(std::io::Error::other("connection reset"))))
        }
    }

    #[tokio::test]
    async fn test_body_failure_propagates() -> () {
        let error = translate_response(Response::new(FailingBody)).await.unwrap_err();
        assert!(matches!(error, AdapterError::ResponseBody(_)));
    }

    #[tokio::test]
    async fn test_repeated_headers_and_invalid_utf8() -> () {
        let mut response = Response::new(Full::new(Bytes::from_static(b"caf\xC3\xA9 \xFF")));
        response.headers_mut().append("set-cookie", HeaderValue::from_static("a=1"));
        response.headers_mut().append("set-cookie", HeaderValue::from_static("b=2"));

        let translated = translate_response(response).await.unwrap();
        assert_eq!(translated.body, "caf\u{e9} \u{fffd}");
        assert_eq!(translated.headers["set-cookie"], "a=1, b=2");
    }

    #[tokio::test]
    async fn test_mode_reaches_build() -> () {
        type ModeHandlerFn = Box<dyn Fn(GenericRequest, Option<()>) -> std::future::Ready<anyhow::Result<Response<Full<Bytes>>>> + Send + Sync>;

        struct ModeBuild;

        impl ServerBuild<()> for ModeBuild {
            type Handler = crate::handler::HandlerFn<ModeHandlerFn>;

            fn create_request_handler(self, mode: Mode) -> Self::Handler {
                let handler: ModeHandlerFn = Box::new(move |_request, _load_context| std::future::ready(Ok(Response::new(Full::from(mode.as_str())))));
                handler_fn(handler)
            }
        }

        let adapter = AdapterSettings::new(ModeBuild).with_mode(Mode::Development).build_adapter();
        assert_eq!(adapter.mode(), Mode::Development);

        let response = adapter.handle(&InvocationContext::default(), &PlatformRequest::new("https://example.com/")).await.unwrap();
        assert_eq!(response.body, "development");
    }
}
