use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpServer, Responder, get};
use dotenvy::dotenv;
use std::sync::{Arc, Mutex};

use hrm_timesheet::config::Config;
use hrm_timesheet::docs::ApiDoc;
use hrm_timesheet::engine::{Store, SystemClock, Workflow};
use hrm_timesheet::{routes, seed};

use tracing::info;
use tracing_appender::rolling;
use utoipa::OpenApi; // ← needed for ApiDoc::openapi()
use utoipa_swagger_ui::SwaggerUi;

#[get("/")]
async fn index() -> impl Responder {
    "Timesheet service is running"
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = Config::from_env()?;

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(config.log_level)
        .with_ansi(false)
        .with_target(false) // removes module path
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!("Server starting...");

    let clock = Arc::new(SystemClock);
    let workflow = if config.seed_demo {
        seed::demo_workflow(&config, clock)?
    } else {
        Workflow::new(Store::new(), config.rules(), clock)
    };
    info!(
        members = workflow.store().team().len(),
        projects = workflow.store().projects().len(),
        seeded = config.seed_demo,
        "workflow ready"
    );
    let workflow = Data::new(Mutex::new(workflow));

    // Clone values for the closure (avoid move issues)
    let server_addr = config.server_addr.clone();
    let config_data = config.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}") // ← important: wildcard {_:.*} to match JS/CSS files
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(workflow.clone())
            .app_data(Data::new(config.clone()))
            .service(index)
            .configure(|cfg| routes::configure(cfg, config_data.clone()))
    })
    .bind(&server_addr)?
    .run()
    .await?;

    info!("Server stopped");
    Ok(())
}
