mod routes;
mod controllers;
mod services;
mod models;
mod api_docs;
mod shared_state;
mod config;

use std::net::SocketAddr;
use std::time::Duration;

use axum::{response::Html, routing::get, Router};
use chrono::Utc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use utoipa::OpenApi;
use utoipa_scalar::Scalar;

use crate::api_docs::ApiDoc;
use crate::config::Config;
use crate::models::et0::SiteEstimate;
use crate::routes::et0_routes::api_routes;
use crate::services::{et0_engine, weather_service};
use crate::shared_state::{AppState, SharedState};

#[tokio::main]
async fn main() {
    // 1. Load configuration
    let config = match Config::load("config.json") {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config.json: {}", e);
            return;
        }
    };
    println!("Configuration loaded: {} sites", config.sites.len());

    // 2. Initialize shared state
    let state = AppState::new();

    // 3. Start a background refresh task per site: fetch live weather, run
    //    the engine, cache the estimate.
    let refresh_interval = Duration::from_secs(config.weather.refresh_interval_secs);
    for site in &config.sites {
        let state_clone = state.clone();
        let site = site.clone();

        tokio::spawn(async move {
            loop {
                match weather_service::fetch_current_input(
                    site.latitude,
                    site.longitude,
                    site.elevation_m,
                )
                .await
                {
                    Ok((input, observed_at)) => match et0_engine::compute_et0(&input) {
                        Ok(estimate) => {
                            println!(
                                "[UPDATE] Site: {} | ET0: {:.2} mm/day | T: {:.1}°C | RH: {:.0}%",
                                site.id,
                                estimate.et0_mm_day,
                                input.mean_temperature_c,
                                input.relative_humidity_pct
                            );
                            state_clone.set_estimate(SiteEstimate {
                                site_id: site.id.clone(),
                                observed_at,
                                refreshed_at: Utc::now(),
                                input,
                                estimate,
                            });
                        }
                        Err(e) => {
                            eprintln!("Engine rejected live weather for site {}: {}", site.id, e);
                        }
                    },
                    Err(e) => {
                        eprintln!("Error refreshing site {}: {}", site.id, e);
                    }
                }
                tokio::time::sleep(refresh_interval).await;
            }
        });
    }

    // 4. Start Axum HTTP server
    let shared = SharedState {
        config: config.clone(),
        app: state,
    };
    let app = Router::new()
        .nest("/api", api_routes(shared))
        .route("/scalar", get(|| async {
            Html(Scalar::new(ApiDoc::openapi()).to_html())
        }))
        .layer(CorsLayer::permissive())
        .fallback_service(ServeDir::new("static"));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    println!("API Server listening on http://{}", addr);
    println!("Scalar UI: http://{}/scalar", addr);

    axum_server::bind(addr)
        .serve(app.into_make_service())
        .await
        .unwrap();
}
