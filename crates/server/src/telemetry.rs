use axum::{body::Body, http::Request, response::Response};
use opentelemetry::{
    global,
    trace::{SpanKind, TraceContextExt, Tracer},
    Context, KeyValue,
};
use opentelemetry_otlp::{tonic_types, WithExportConfig, WithTonicConfig};
use std::{
    future::Future,
    pin::Pin,
    sync::OnceLock,
    task::{Context as TaskContext, Poll},
};
use tower::{Layer, Service};

use crate::auth::jwt::Claims;

const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
const TRACER_NAME: &str = "policydesk";

type BoxError = Box<dyn std::error::Error + Send + Sync>;

static LOGGER_PROVIDER: OnceLock<opentelemetry_sdk::logs::SdkLoggerProvider> = OnceLock::new();

/// Runtime for the gRPC exporters; tonic needs one to exist when the
/// exporters are built, which is not guaranteed inside `dioxus::serve`.
static OTEL_RUNTIME: OnceLock<tokio::runtime::Runtime> = OnceLock::new();

/// Where and as whom to export.
#[derive(Debug, Clone, PartialEq)]
pub struct OtlpSettings {
    pub endpoint: String,
    pub service_name: String,
    pub environment: String,
    /// Sent as `x-otlp-key` metadata when the collector requires one.
    pub ingestion_key: Option<String>,
}

impl OtlpSettings {
    /// `None` when `OTEL_EXPORTER_OTLP_ENDPOINT` is unset or empty.
    pub fn from_env() -> Option<Self> {
        let endpoint = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .ok()
            .filter(|e| !e.is_empty())?;
        Some(Self {
            endpoint,
            service_name: std::env::var("OTEL_SERVICE_NAME")
                .unwrap_or_else(|_| "policydesk".to_string()),
            environment: std::env::var("DEPLOY_ENV").unwrap_or_else(|_| "development".to_string()),
            ingestion_key: std::env::var("OTEL_INGESTION_KEY")
                .ok()
                .filter(|k| !k.is_empty()),
        })
    }

    fn uses_tls(&self) -> bool {
        self.endpoint.starts_with("https://")
    }

    fn metadata(&self) -> Result<Option<tonic_types::metadata::MetadataMap>, BoxError> {
        let Some(key) = &self.ingestion_key else {
            return Ok(None);
        };
        let mut metadata = tonic_types::metadata::MetadataMap::new();
        metadata.insert("x-otlp-key", key.parse()?);
        Ok(Some(metadata))
    }
}

/// Install OTLP trace and log export when an endpoint is configured.
///
/// Dioxus owns the `tracing` subscriber; this only registers the global
/// tracer provider used by [`OtelTraceLayer`] and bridges the `log` crate.
/// Returns `Ok(false)` when export is not configured.
pub fn init_telemetry() -> Result<bool, BoxError> {
    let _ = dotenvy::dotenv();

    let Some(settings) = OtlpSettings::from_env() else {
        tracing::info!("OTEL_EXPORTER_OTLP_ENDPOINT not set; OTLP export disabled");
        return Ok(false);
    };

    if OTEL_RUNTIME.get().is_none() {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .worker_threads(1)
            .build()?;
        let _ = OTEL_RUNTIME.set(runtime);
    }
    let _guard = OTEL_RUNTIME.get().map(|rt| rt.enter());

    let resource = opentelemetry_sdk::Resource::builder()
        .with_service_name(settings.service_name.clone())
        .with_attribute(KeyValue::new("service.version", APP_VERSION))
        .with_attribute(KeyValue::new("deployment.environment", settings.environment.clone()))
        .build();

    let mut spans = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(&settings.endpoint);
    let mut logs = opentelemetry_otlp::LogExporter::builder()
        .with_tonic()
        .with_endpoint(&settings.endpoint);
    if settings.uses_tls() {
        let tls = tonic_types::transport::ClientTlsConfig::new().with_native_roots();
        spans = spans.with_tls_config(tls.clone());
        logs = logs.with_tls_config(tls);
    }
    if let Some(metadata) = settings.metadata()? {
        spans = spans.with_metadata(metadata.clone());
        logs = logs.with_metadata(metadata);
    }

    let tracer_provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
        .with_batch_exporter(spans.build()?)
        .with_resource(resource.clone())
        .build();
    global::set_tracer_provider(tracer_provider);

    let logger_provider = opentelemetry_sdk::logs::SdkLoggerProvider::builder()
        .with_batch_exporter(logs.build()?)
        .with_resource(resource)
        .build();
    let logger_provider = LOGGER_PROVIDER.get_or_init(|| logger_provider);

    let bridge = opentelemetry_appender_log::OpenTelemetryLogBridge::new(logger_provider);
    match log::set_boxed_logger(Box::new(bridge)) {
        Ok(()) => log::set_max_level(log::LevelFilter::Info),
        Err(_) => tracing::warn!("log crate logger already set; log bridge skipped"),
    }

    tracing::info!(
        endpoint = %settings.endpoint,
        service = %settings.service_name,
        version = APP_VERSION,
        "OTLP traces and logs enabled"
    );
    Ok(true)
}

/// Client family, from an explicit `X-Client-Platform` header or a
/// User-Agent guess. Native Dioxus clients send no User-Agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientPlatform {
    Web,
    Desktop,
    Ios,
    Android,
    Native,
    Unknown,
}

impl ClientPlatform {
    pub fn detect(user_agent: Option<&str>, explicit: Option<&str>) -> Self {
        if let Some(explicit) = explicit {
            return match explicit.trim().to_ascii_lowercase().as_str() {
                "web" => Self::Web,
                "desktop" => Self::Desktop,
                "ios" => Self::Ios,
                "android" => Self::Android,
                _ => Self::Unknown,
            };
        }

        let ua = user_agent.unwrap_or_default();
        if ua.is_empty() {
            Self::Native
        } else if ua.contains("iPhone") || ua.contains("iPad") || ua.contains("CFNetwork") {
            Self::Ios
        } else if ua.contains("Android") {
            Self::Android
        } else if ua.contains("Mozilla") {
            Self::Web
        } else {
            Self::Native
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Web => "web",
            Self::Desktop => "desktop",
            Self::Ios => "ios",
            Self::Android => "android",
            Self::Native => "native",
            Self::Unknown => "unknown",
        }
    }
}

/// Span name for a request path: numeric segments collapse to `{id}` so
/// that `/api/users/42` and `/api/users/7` share a name.
fn span_route(path: &str) -> String {
    path.split('/')
        .map(|segment| {
            if !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit()) {
                "{id}"
            } else {
                segment
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}

fn header<'a>(req: &'a Request<Body>, name: &str) -> Option<&'a str> {
    req.headers().get(name).and_then(|v| v.to_str().ok())
}

/// One server span per HTTP request.
///
/// Must sit inside the auth middleware so the caller's role is visible.
#[derive(Clone)]
pub struct OtelTraceLayer;

impl<S> Layer<S> for OtelTraceLayer {
    type Service = OtelTraceService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        OtelTraceService { inner }
    }
}

#[derive(Clone)]
pub struct OtelTraceService<S> {
    inner: S,
}

impl<S> Service<Request<Body>> for OtelTraceService<S>
where
    S: Service<Request<Body>, Response = Response> + Send + Clone + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut TaskContext<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let tracer = global::tracer(TRACER_NAME);
        let method = req.method().to_string();
        let path = req.uri().path().to_string();
        let platform = ClientPlatform::detect(
            header(&req, "user-agent"),
            header(&req, "x-client-platform"),
        );

        let mut attributes = vec![
            KeyValue::new("http.method", method.clone()),
            KeyValue::new("http.target", path.clone()),
            KeyValue::new("client.platform", platform.as_str()),
            KeyValue::new(
                "http.request_id",
                header(&req, "x-request-id").unwrap_or_default().to_string(),
            ),
        ];
        match req.extensions().get::<Claims>() {
            Some(claims) => attributes.extend([
                KeyValue::new("user.id", claims.sub),
                KeyValue::new("user.role", claims.role.clone()),
                KeyValue::new("auth.status", "authenticated"),
            ]),
            None => attributes.push(KeyValue::new("auth.status", "anonymous")),
        }

        let span = tracer
            .span_builder(format!("{method} {}", span_route(&path)))
            .with_kind(SpanKind::Server)
            .with_attributes(attributes)
            .start(&tracer);

        let cx = Context::current_with_span(span);
        let mut inner = self.inner.clone();

        let guard = cx.clone().attach();
        let future = inner.call(req);
        drop(guard);

        Box::pin(async move {
            let response = future.await?;

            let span = cx.span();
            let status = response.status();
            span.set_attribute(KeyValue::new("http.status_code", i64::from(status.as_u16())));
            if status.is_server_error() {
                span.set_status(opentelemetry::trace::Status::error(status.to_string()));
            }

            Ok(response)
        })
    }
}
