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

pub mod adapt;
pub mod invocation;

use axum::Router;
use axum::body::Body;
use axum::response::Response;
use azbridge_core::request::GenericRequest;
use tower::ServiceExt;

pub use azbridge_core::mode::Mode;
pub use azbridge_server::{Adapter, AdapterError, AdapterSettings, RequestHandler, ServerBuild};
pub use crate::invocation::{invocation_router, InvocationSettings};

use crate::adapt::adapt_request;

/// Serves an axum application behind the adapter. Requests reach the
/// router with the [`Mode`] and, when one was derived, the load context
/// as extensions, so handlers can pick them up with `Extension<_>`.
#[derive(Clone, Debug)]
pub struct RouterBuild(pub Router);

impl<C> ServerBuild<C> for RouterBuild
where
    C: Clone + Send + Sync + 'static
{
    type Handler = RouterHandler;

    fn create_request_handler(self, mode: Mode) -> RouterHandler {
        RouterHandler {
            router: self.0,
            mode: mode
        }
    }
}

#[derive(Clone, Debug)]
pub struct RouterHandler {
    router: Router,
    mode: Mode
}

impl<C> RequestHandler<C> for RouterHandler
where
    C: Clone + Send + Sync + 'static
{
    type ResponseBody = Body;

    fn handle_request(&self, request: GenericRequest, load_context: Option<C>) -> impl Future<Output = anyhow::Result<Response>> + Send {
        let mut request = adapt_request(request);
        request.extensions_mut().insert(self.mode);
        if let Some(load_context) = load_context {
            request.extensions_mut().insert(load_context);
        }

        let router = self.router.clone();
        async move {
            Ok(router.oneshot(request).await?)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Extension;
    use axum::extract::Request;
    use axum::http::StatusCode;
    use axum::routing::{get, post};
    use azbridge_core::invocation::InvocationContext;
    use azbridge_core::platform::PlatformRequest;

    async fn create_widget(body: String) -> (StatusCode, [(&'static str, &'static str); 1], String) {
        (StatusCode::CREATED, [("x-custom", "yes")], format!("created {}", body))
    }

    async fn whoami(Extension(mode): Extension<Mode>, request: Request) -> String {
        format!("{} {}", mode, request.extensions().get::<String>().map_or("anonymous", |x| x.as_str()))
    }

    fn app() -> Router {
        Router::new()
            .route("/api/widgets", post(create_widget))
            .route("/api/whoami", get(whoami))
    }

    #[tokio::test]
    async fn test_router_end_to_end() -> () {
        let adapter = AdapterSettings::<_, String>::new(RouterBuild(app())).build_adapter();

        let platform_request =
            PlatformRequest::new("https://example.com/api/widgets")
                .with_method("POST")
                .with_header("content-type", "application/json")
                .with_body(r#"{"id":1}"#);

        let response = adapter.handle(&InvocationContext::default(), &platform_request).await.unwrap();

        assert_eq!(response.status, 201);
        assert_eq!(response.headers["x-custom"], "yes");
        assert_eq!(response.body, r#"created {"id":1}"#);
    }

    #[tokio::test]
    async fn test_router_sees_mode_and_load_context() -> () {
        let anonymous = AdapterSettings::<_, String>::new(RouterBuild(app())).with_mode(Mode::Test).build_adapter();
        let response = anonymous.handle(&InvocationContext::default(), &PlatformRequest::new("https://example.com/api/whoami")).await.unwrap();
        assert_eq!(response.body, "test anonymous");

        let known =
            AdapterSettings::new(RouterBuild(app()))
                .with_load_context(|platform_request: &PlatformRequest| Ok(platform_request.headers.get("x-user").unwrap_or("nobody").to_owned()))
                .build_adapter();
        let platform_request = PlatformRequest::new("https://example.com/api/whoami").with_header("x-user", "mike");
        let response = known.handle(&InvocationContext::default(), &platform_request).await.unwrap();
        assert_eq!(response.body, "production mike");
    }

    #[tokio::test]
    async fn test_router_status_passes_through() -> () {
        let adapter = AdapterSettings::<_, String>::new(RouterBuild(app())).build_adapter();

        let missing = adapter.handle(&InvocationContext::default(), &PlatformRequest::new("https://example.com/nowhere")).await.unwrap();
        assert_eq!(missing.status, 404);

        let wrong_method = adapter.handle(&InvocationContext::default(), &PlatformRequest::new("https://example.com/api/widgets")).await.unwrap();
        assert_eq!(wrong_method.status, 405);
    }
}
