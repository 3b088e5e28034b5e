use dioxus::prelude::*;
use shared_types::FeatureFlags;
use shared_ui::PageSkeleton;

mod auth;
mod hooks;
mod routes;

use auth::SessionState;
use routes::Route;

const MAIN_CSS: Asset = asset!("/assets/main.css");

fn main() {
    #[cfg(feature = "server")]
    dioxus::serve(|| async move {
        let config = server::config::load_config();

        if config.features.telemetry {
            if let Err(e) = server::telemetry::init_telemetry() {
                tracing::error!(error = %e, "OTLP export could not be initialised");
            }
        }
        server::health::record_start_time();

        let pool = server::db::init().await;

        if config.features.seed_demo {
            if let Err(e) = server::seed::seed_demo_data(pool).await {
                tracing::error!(error = %e, "demo data could not be seeded");
            }
        }

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(std::time::Duration::from_secs(60 * 60));
            loop {
                interval.tick().await;
                match server::auth::purge_stale_refresh_tokens(pool).await {
                    Ok(0) => {}
                    Ok(purged) => tracing::info!(purged, "stale refresh tokens removed"),
                    Err(e) => tracing::warn!(error = %e, "refresh token cleanup failed"),
                }
            }
        });

        let state = server::db::AppState { pool: pool.clone() };

        let mut router = dioxus::server::router(App).route(
            "/health",
            axum::routing::get(server::health::health_check).with_state(pool.clone()),
        );

        // Inside the auth layer so spans can see the caller's claims.
        if config.features.telemetry {
            router = router.layer(server::telemetry::OtelTraceLayer);
        }

        let router = router
            .layer(axum::middleware::from_fn_with_state(
                state,
                server::auth::middleware::auth_middleware,
            ))
            .layer(tower_http::request_id::PropagateRequestIdLayer::x_request_id())
            .layer(tower_http::request_id::SetRequestIdLayer::x_request_id(
                tower_http::request_id::MakeRequestUuid,
            ));
        Ok(router)
    });

    #[cfg(not(feature = "server"))]
    dioxus::launch(App);
}

/// Client platform from compile-time features, sent as `X-Client-Platform`.
pub fn client_platform() -> &'static str {
    if cfg!(feature = "web") {
        "web"
    } else if cfg!(feature = "desktop") {
        "desktop"
    } else if cfg!(feature = "mobile") {
        "mobile"
    } else {
        "unknown"
    }
}

#[component]
fn App() -> Element {
    use_hook(|| {
        use dioxus::fullstack::{set_request_headers, HeaderMap, HeaderValue};

        let mut headers = HeaderMap::new();
        headers.insert(
            "x-client-platform",
            HeaderValue::from_static(client_platform()),
        );
        set_request_headers(headers);
    });

    // Flags default to all-off when the server cannot be reached.
    let flags_resource =
        use_server_future(move || async move { server::api::get_feature_flags().await })?;
    let flags = flags_resource
        .read()
        .as_ref()
        .cloned()
        .unwrap_or(Ok(FeatureFlags::default()))
        .unwrap_or_default();

    use_context_provider(|| flags);
    use_context_provider(SessionState::new);

    rsx! {
        document::Link { rel: "stylesheet", href: MAIN_CSS }
        SuspenseBoundary {
            fallback: |_| rsx! { PageSkeleton {} },
            Router::<Route> {}
        }
    }
}
