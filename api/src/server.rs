use axum::{
    Router,
    extract::MatchedPath,
    http::{HeaderName, Method, Request, header},
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::{field, info_span};
use turnstile_common::views::ApiErrorResponse;
use utoipa::{
    ToSchema,
    openapi::{
        Components, Info, License, OpenApi, Ref, RefOr,
        path::Operation,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::{context::ApiContext, handlers};

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Build the HTTP router and its OpenAPI description.
pub fn make(context: ApiContext) -> (Router, OpenApi) {
    let x_request_id = HeaderName::from_static(REQUEST_ID_HEADER);
    let middleware = ServiceBuilder::new()
        .layer(SetRequestIdLayer::new(
            x_request_id.clone(),
            MakeRequestUuid,
        ))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &Request<_>| {
                    let span = info_span!(
                        "http_request",
                        method = %req.method(),
                        request_id = field::Empty,
                        path = field::Empty,
                    );

                    if let Some(request_id) = req
                        .headers()
                        .get(REQUEST_ID_HEADER)
                        .and_then(|v| v.to_str().ok())
                    {
                        span.record("request_id", request_id);
                    }

                    if let Some(path) = req.extensions().get::<MatchedPath>() {
                        span.record("path", path.as_str())
                    } else {
                        span.record("path", req.uri().path())
                    };

                    span
                }),
        )
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST])
                .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
        )
        .layer(PropagateRequestIdLayer::new(x_request_id));

    let (router, mut api) = routes()
        .layer(middleware)
        .with_state(context)
        .split_for_parts();

    apply_default_errors_to_all(&mut api);
    (router, api)
}

/// The OpenAPI document alone, without connecting to any backend.
pub fn openapi() -> OpenApi {
    let (_, mut api) = routes().split_for_parts();
    apply_default_errors_to_all(&mut api);
    api
}

fn routes() -> OpenApiRouter<ApiContext> {
    OpenApiRouter::with_openapi(base_openapi())
        .routes(routes!(handlers::auth::signup))
        .routes(routes!(handlers::auth::login))
        .routes(routes!(handlers::auth::whoami))
        .routes(routes!(handlers::health_check))
}

fn base_openapi() -> OpenApi {
    let mut components = Components::new();
    components.add_security_scheme(
        "bearer",
        SecurityScheme::Http(
            HttpBuilder::new()
                .scheme(HttpAuthScheme::Bearer)
                .bearer_format("JWT")
                .build(),
        ),
    );

    OpenApi::builder()
        .info(
            Info::builder()
                .title("Turnstile API Reference")
                .version(env!("CARGO_PKG_VERSION"))
                .license(Some(
                    License::builder()
                        .name("Apache 2.0 License")
                        .identifier(Some(env!("CARGO_PKG_LICENSE")))
                        .build(),
                )),
        )
        .components(Some(components))
        .build()
}

fn apply_default_errors_to_all(api: &mut OpenApi) {
    api.paths.paths.iter_mut().for_each(|(_path, item)| {
        apply_default_errors(&mut item.get);
        apply_default_errors(&mut item.post);
    });
}

fn apply_default_errors(item: &mut Option<Operation>) {
    if let Some(item) = item {
        item.responses
            .responses
            .entry("500".into())
            .or_insert_with(|| {
                RefOr::Ref(
                    Ref::builder()
                        .summary("Internal server error")
                        .ref_location_from_schema_name(ApiErrorResponse::name())
                        .build(),
                )
            });
    }
}
