use axum::extract::{FromRef, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use axum_template::engine::Engine;
use axum_template::RenderHtml;
use derive_new::new;
use serde::Serialize;
use snafu::ResultExt as _;
use tera::Tera;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::beacon::Beacon;
use crate::config::Config;
use crate::counter::ViewCounter;
use crate::database::Database;
use crate::error::{ApplicationError, BindAddressSnafu, LoadTemplatesSnafu, WebServerSnafu};
use crate::model::ViewCount;

pub type AppEngine = Engine<Tera>;

#[derive(Clone, FromRef, new)]
pub struct App {
    pub engine: AppEngine,
    pub counter: ViewCounter,
    pub beacon: Option<Beacon>,
}

pub async fn serve(config: Config, database: Database) -> Result<(), ApplicationError> {
    let tera = Tera::new("templates/**/*.html").context(LoadTemplatesSnafu)?;
    let counter = ViewCounter::new(database, config.counter.clone());
    let beacon = config.hit_endpoint.clone().map(Beacon::new);

    let app = App::new(Engine::from(tera), counter, beacon);
    let router = router(app);

    let listener = TcpListener::bind(config.host)
        .await
        .context(BindAddressSnafu {
            address: config.host,
        })?;

    tracing::info!(address = %config.host, "serving the view counter");
    axum::serve(listener, router).await.context(WebServerSnafu)
}

pub fn router(app: App) -> Router {
    Router::new()
        .route("/", get(index))
        // the widget gets embedded in pages served from elsewhere
        .route("/count", get(count).layer(CorsLayer::permissive()))
        .nest_service("/static", ServeDir::new("static"))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(app)
}

#[derive(Debug, Serialize)]
struct IndexPage {
    count: String,
}

async fn index(State(app): State<App>) -> impl IntoResponse {
    report_hit(&app);

    let count = app.counter.display().await;
    let page = IndexPage {
        count: count.to_string(),
    };

    RenderHtml("index.html", app.engine, page)
}

#[derive(Debug, Serialize)]
struct CountBody {
    count: Option<i64>,
    display: String,
}

async fn count(State(app): State<App>) -> Json<CountBody> {
    let count = app.counter.display().await;

    Json(CountBody {
        count: count.count().map(ViewCount::get),
        display: count.to_string(),
    })
}

/// Page loads are reported in the background; the page never waits on the
/// counter endpoint.
fn report_hit(app: &App) {
    if let Some(beacon) = app.beacon.clone() {
        tokio::spawn(async move { beacon.send().await });
    }
}
