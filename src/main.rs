/// Main Application: middleware de integração HubSpot
///
/// Fluxo:
/// - Frontend pede a URL de autorização e abre o consentimento em popup
/// - HubSpot redireciona para o callback, que troca o code pelas credenciais
/// - Frontend retira as credenciais (leitura única) e carrega os contatos
///
/// Estado OAuth e credenciais vivem apenas no cache transitório em memória

use std::sync::Arc;
use tokio::net::TcpListener;

use hubspot_integration_middleware::{config, routes, services, utils, AppState};

use config::Settings;
use utils::{AppError, logging::*};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 🔧 Carregar variáveis de ambiente do arquivo .env (se existir)
    let dotenv_loaded = dotenvy::dotenv().is_ok();

    // Inicializar tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    if dotenv_loaded {
        log_info("✅ Arquivo .env carregado com sucesso");
    } else {
        tracing::debug!("Arquivo .env não encontrado - usando variáveis de ambiente do sistema");
    }

    // Carregar configurações
    let settings = Settings::new()
        .map_err(|e| AppError::ConfigError(format!("Failed to load settings: {}", e)))?;

    log_config_loaded(&std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string()));

    // Cache transitório + limpeza periódica das entradas expiradas
    let cache = services::InMemoryCache::new();
    cache.clone().start_janitor(settings.cache.purge_interval_seconds);
    log_info(&format!(
        "🗄️  Cache em memória ativo (state: {}s, credenciais: {}s)",
        settings.cache.state_ttl_seconds, settings.cache.credentials_ttl_seconds
    ));

    let app_state = AppState::new(settings.clone(), Arc::new(cache))
        .map_err(|e| AppError::ConfigError(format!("OAuth2 config not loaded: {}", e)))?;

    log_info("✅ OAuth2 endpoints enabled: /integrations/hubspot/authorize, /integrations/hubspot/oauth2callback");

    let app = routes::create_router(Arc::new(app_state));

    let addr = settings.bind_address();
    let listener = TcpListener::bind(&addr).await?;

    log_server_startup(listener.local_addr()?.port());
    log_server_ready(&addr);

    // Graceful shutdown com signal handling
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    log_info("🛑 Server shut down gracefully");
    Ok(())
}

/// Signal handler para graceful shutdown
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log_error(&format!("Falha ao instalar handler de Ctrl+C: {}", e));
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                log_error(&format!("Falha ao instalar handler de SIGTERM: {}", e));
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            log_info("🛑 Received Ctrl+C, shutting down gracefully...");
        },
        _ = terminate => {
            log_info("🛑 Received SIGTERM, shutting down gracefully...");
        }
    }
}
