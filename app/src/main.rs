//! Actix Bootstrap Demo Application
//!
//! Conditional storage auto-configuration plus a token-authenticated API.

use actix_web::{App, HttpServer};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use actix_bootstrap_app::security::{demo_principals, pipeline};
use actix_bootstrap_app::Application;
use actix_bootstrap_core::context::ConfigurationContext;
use actix_bootstrap_core::http::security::{
    PrincipalLookupService, SecurityTransform, TokenConfig, TokenIssuer,
};

const DEFAULT_CONFIG: &str = "application.toml";

fn print_startup_info(host: &str, port: u16, tokens: &[(&str, String)]) {
    println!("=== Actix Bootstrap Demo ===");
    println!();
    println!("Server: http://{}:{}", host, port);
    println!();
    println!("Routes:");
    println!("  GET /public/**            - open");
    println!("  GET /api/properties/mail  - open (security.permit-all)");
    println!("  GET /api/properties/user  - open (security.permit-all)");
    println!("  GET /private/me           - bearer token");
    println!("  GET /api/storage/{{name}}   - bearer token, needs storage.service.enabled = true");
    println!();
    println!("Demo tokens:");
    for (identifier, token) in tokens {
        println!("  {}: {}", identifier, token);
    }
    println!();
    println!("Example:");
    println!("  curl -H \"Authorization: Bearer <token>\" http://{}:{}/private/me", host, port);
    println!();
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG.to_string());

    let application = match ConfigurationContext::load(&path)
        .and_then(|config| Application::bootstrap(&config))
    {
        Ok(application) => application,
        Err(e) => {
            error!(error = %e, "application failed to start");
            std::process::exit(1);
        }
    };

    let security = application.properties.security.clone();
    let store = demo_principals();
    let issuer = TokenIssuer::new(TokenConfig::from_properties(&security.token));
    let mut tokens = Vec::new();
    for identifier in ["alice", "bob"] {
        if let Ok(Some(principal)) = store.lookup(identifier).await {
            match issuer.issue(&principal) {
                Ok(token) => tokens.push((identifier, token)),
                Err(e) => error!(identifier, error = %e, "could not issue demo token"),
            }
        }
    }

    let host = application.properties.server.host.clone();
    let port = application.properties.server.port;
    print_startup_info(&host, port, &tokens);
    info!(%host, port, "starting HTTP server");

    let pipeline = pipeline(store, &security);
    HttpServer::new(move || {
        let application = application.clone();
        App::new()
            .wrap(SecurityTransform::new(pipeline.clone()))
            .configure(move |cfg| application.configure(cfg))
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
