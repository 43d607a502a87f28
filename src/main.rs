#![allow(dead_code, unused_imports)]
#![allow(rustdoc::broken_intra_doc_links)]
//! # Diagnóstico Dental: Sistema Especialista
//!
//! **Ponto de entrada** da aplicação. Constrói o motor de diagnóstico uma
//! única vez, carrega o histórico e inicia o servidor web.
//!
//! ## Fluxo de Inicialização
//!
//! ```text
//! main()
//!   ├── Configura tracing/logging (RUST_LOG, padrão "info")
//!   ├── Lê Config das variáveis de ambiente
//!   ├── Carrega histórico do disco (ou cria vazio)
//!   ├── Constrói DiagnosisEngine (regras + pipeline difuso)
//!   ├── Monta AppState e Router
//!   └── Inicia servidor TCP
//! ```
//!
//! ## Exemplo de Uso
//!
//! ```bash
//! # Executar com logs padrão (info)
//! cargo run
//!
//! # Regras com logs detalhados e pipeline difuso linear
//! RUST_LOG=debug DIAGNOSTICO_FUZZY=lineal cargo run
//!
//! # Diagnóstico via API
//! curl -X POST localhost:3000/api/diagnostico \
//!   -H 'content-type: application/json' \
//!   -d '{"sintomas": {"intensidad_dolor": 8, "hinchazon_cara": "si", "fiebre": "si"}}'
//! ```

/// Módulo `config`: configuração por variáveis de ambiente.
mod config;

/// Módulo `core`: fatos, catálogo, ativações e resultado.
mod core;

/// Módulo `inference`: regras crisp, encadeamento, lógica difusa, conflitos e fallback.
mod inference;

/// Módulo `orchestrator`: o pipeline de diagnóstico e a validação de fatos.
mod orchestrator;

/// Módulo `persistence`: histórico de diagnósticos em JSON.
mod persistence;

/// Módulo `web`: servidor axum, handlers HTTP e templates.
mod web;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::orchestrator::DiagnosisEngine;
use crate::persistence::HistoryStore;
use crate::web::state::AppState;

/// Inicializa o sistema e serve HTTP até o processo ser encerrado.
///
/// # Erros
///
/// Configuração inválida, falha no bind do endereço ou falha do servidor.
/// Um histórico ilegível não impede a inicialização.
#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("🦷 Diagnóstico Dental: iniciando...");

    let config = Config::from_env()?;

    let history = match HistoryStore::load(&config.history_path) {
        Ok(history) => {
            tracing::info!(records = history.len(), "Histórico carregado do disco");
            history
        }
        Err(e) => {
            tracing::warn!(error = %e, "Falha ao carregar histórico, iniciando vazio");
            HistoryStore::new(&config.history_path)
        }
    };

    let engine = DiagnosisEngine::standard(config.fuzzy_mode);
    tracing::info!(
        rules = engine.rules().len(),
        fuzzy = %engine.fuzzy_mode(),
        strategy = %config.strategy,
        "Motor de diagnóstico pronto"
    );

    let state = AppState::new(engine, history, config.strategy.clone());
    let app = web::create_router(state);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("Falha ao escutar em {}", config.addr))?;
    tracing::info!("🚀 Server running at http://{}", config.addr);

    axum::serve(listener, app).await?;

    Ok(())
}
