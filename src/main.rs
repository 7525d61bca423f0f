use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use dsa_solver::api::{configure_routes, handlers, AppState};
use dsa_solver::banner;
use dsa_solver::config::AppConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    banner::print_banner();

    if let Err(e) = dotenvy::dotenv() {
        eprintln!("⚠️  No .env file loaded: {}", e);
    }

    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let loaded = match std::env::var("SOLVER_CONFIG") {
        Ok(path) => {
            log::info!("Loading configuration from {}", path);
            AppConfig::from_file(&path)
        }
        Err(_) => AppConfig::from_env(),
    };
    let app_config = loaded.map_err(std::io::Error::other)?;

    log::info!("Solve endpoint: {}", app_config.endpoint);
    log::info!(
        "Copy reset: {}ms ({:?}), stale resolutions: {:?}",
        app_config.copy.reset_after.as_millis(),
        app_config.copy.ack_policy,
        app_config.resolution_policy
    );

    let state = AppState::new(app_config.clone()).map_err(std::io::Error::other)?;
    let broker = handlers::WsBroker::new();
    let _bridge = handlers::spawn_lifecycle_bridge(state.session.controller(), broker.clone());

    println!("🚀 Starting server...");
    println!("📊 API available at http://{}:{}/api/v1", app_config.bind, app_config.port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(state.clone()))
            .app_data(web::Data::new(broker.clone()))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .configure(configure_routes)
    })
    .bind((app_config.bind.as_str(), app_config.port))?
    .run()
    .await
}
