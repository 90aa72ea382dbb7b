//src/main.rs

use anyhow::Context;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use assetflow::{
    config::{AppState, Settings},
    routes::create_router,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // RUST_LOG controla o nível; padrão "info"
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    let settings = Settings::from_env()?;
    let app_state = AppState::new(&settings).await?;

    // Faz o app rodar as migrações do SQLx na inicialização
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .context("Falha ao rodar as migrações do banco de dados")?;

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    if let (Some(login), Some(password)) = (&settings.admin_login, &settings.admin_password) {
        let created = app_state
            .user_service
            .bootstrap_admin(login, password)
            .await
            .map_err(|e| anyhow::anyhow!("Falha ao criar o administrador inicial: {}", e))?;
        if created {
            tracing::info!("👤 Administrador inicial '{}' criado", login);
        }
    }

    let app = create_router(app_state);

    let listener = TcpListener::bind(&settings.bind_addr)
        .await
        .with_context(|| format!("Falha ao iniciar o listener TCP em {}", settings.bind_addr))?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);

    axum::serve(listener, app).await.context("Erro no servidor Axum")?;
    Ok(())
}
