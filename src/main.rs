use std::sync::Arc;

use clap::Parser;
use poem::{listener::TcpListener, Route, Server};
use poem_openapi::OpenApiService;

use gatekeeper_backend::api::AuthenticationApi;
use gatekeeper_backend::app_data::AppData;
use gatekeeper_backend::cli::{self, Cli, Commands};
use gatekeeper_backend::config::{init_logging, SystemEnvironment};

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    let env = SystemEnvironment;

    if let Err(e) = init_logging(&env) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    let cli = Cli::parse();

    match cli.command() {
        Commands::Serve => serve(&env).await,
        Commands::CreateAccount(args) => {
            if let Err(e) = cli::create_account::run(&env, args).await {
                tracing::error!(error = %e, "create-account failed");
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
            Ok(())
        }
    }
}

async fn serve(env: &SystemEnvironment) -> Result<(), std::io::Error> {
    // Configuration problems are fatal before anything is bound
    let app_data = match AppData::init(env).await {
        Ok(app_data) => Arc::new(app_data),
        Err(e) => {
            tracing::error!(error = %e, "Failed to initialize application");
            std::process::exit(1);
        }
    };

    let bind_address = app_data.settings.bind_address.clone();
    let authentication_api = AuthenticationApi::new(Arc::clone(&app_data));

    let api_service = OpenApiService::new(authentication_api, "Gatekeeper API", env!("CARGO_PKG_VERSION"))
        .server(format!("http://{}/api", bind_address));
    let ui = api_service.swagger_ui();

    // Nest API service under /api and Swagger UI under /swagger
    let app = Route::new()
        .nest("/api", api_service)
        .nest("/swagger", ui);

    tracing::info!(%bind_address, "Starting server");
    tracing::info!("Swagger UI available at http://{}/swagger", bind_address);

    Server::new(TcpListener::bind(bind_address)).run(app).await
}
