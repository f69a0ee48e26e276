use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpResponse, HttpServer, Responder};
use bounce_core::Event;
use serde::Serialize;

mod store;

use store::{EventStore, IncomingEvent};

// Response types

#[derive(Debug, Serialize)]
struct IngestResponse {
    success: bool,
    stored: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl IngestResponse {
    fn reply(result: Result<usize, String>) -> HttpResponse {
        match result {
            Ok(stored) => HttpResponse::Ok().json(IngestResponse {
                success: true,
                stored,
                error: None,
            }),
            Err(e) => {
                tracing::error!("Failed to store events: {}", e);
                HttpResponse::InternalServerError().json(IngestResponse {
                    success: false,
                    stored: 0,
                    error: Some(e),
                })
            }
        }
    }
}

// API Handlers

/// POST /api/events
/// Store a single event
async fn log_event(store: web::Data<EventStore>, req: web::Json<IncomingEvent>) -> impl Responder {
    tracing::info!("Received event: {}", req.kind);
    IngestResponse::reply(store.append(vec![req.into_inner()]))
}

/// POST /api/events/batch
/// Store a client's whole local batch
async fn log_batch(store: web::Data<EventStore>, req: web::Json<Vec<Event>>) -> impl Responder {
    let events = req.into_inner();
    tracing::info!("Received batch of {} events", events.len());
    IngestResponse::reply(store.append(events.into_iter().map(IncomingEvent::from).collect()))
}

/// GET /api/events
/// Every stored event, oldest first
async fn list_events(store: web::Data<EventStore>) -> impl Responder {
    HttpResponse::Ok().json(store.snapshot())
}

/// GET /health
/// Health check endpoint
async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "bounce-log-sink"
    }))
}

fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().limit(10_485_760)) // 10MB limit
        .route("/health", web::get().to(health))
        .route("/api/events", web::post().to(log_event))
        .route("/api/events", web::get().to(list_events))
        .route("/api/events/batch", web::post().to(log_batch));
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::filter::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    tracing::info!("Starting bounce-log event sink");

    let store = match std::env::var("BOUNCE_SINK_FILE") {
        Ok(path) => EventStore::open(path.into()).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?,
        Err(_) => EventStore::in_memory(),
    };
    let store = web::Data::new(store);

    let bind_address = std::env::var("BOUNCE_SINK_BIND").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    tracing::info!("Binding to {}", bind_address);

    HttpServer::new(move || {
        // Configure CORS to allow all origins
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(86400);

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(store.clone())
            .configure(configure)
    })
    .bind(bind_address)?
    .run()
    .await
}
