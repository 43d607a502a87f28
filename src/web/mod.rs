//! # Módulo Web: Interface do Consultório
//!
//! Camada de apresentação construída com **Axum** + **HTMX** + **Maud**.
//! Nada aqui participa do raciocínio: os handlers apenas convertem a
//! entrada em [`Facts`](crate::core::Facts), chamam o
//! [`DiagnosisEngine`](crate::orchestrator::DiagnosisEngine) e registram o
//! resultado no histórico.
//!
//! ## Arquitetura Web
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │ Browser (formulário HTMX)                                │
//! ├──────────────────────────────────────────────────────────┤
//! │ Axum Router (este módulo)                                │
//! │  ├── GET  /                  → formulário de sintomas    │
//! │  ├── POST /diagnostico       → HTMX fragment (resultado) │
//! │  ├── POST /api/diagnostico   → JSON                      │
//! │  ├── POST /api/validar       → JSON                      │
//! │  ├── GET  /api/historial     → JSON (?paciente=)         │
//! │  ├── GET  /api/historial.csv → CSV                       │
//! │  ├── GET  /api/pacientes     → JSON (?q=)                │
//! │  ├── GET  /api/estadisticas  → JSON                      │
//! │  ├── GET  /reporte/{id}      → relatório imprimível      │
//! │  └── GET  /status            → JSON                      │
//! ├──────────────────────────────────────────────────────────┤
//! │ Static Assets (tower_http::ServeDir → /assets/)          │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! | Módulo | Responsabilidade |
//! |--------|------------------|
//! | [`state`] | Estado compartilhado (`AppState`) |
//! | [`handlers`] | Handlers Axum para cada rota |
//! | [`templates`] | Templates Maud (HTML server-side) |

pub mod handlers;
pub mod state;
pub mod templates;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

use state::AppState;

/// Cria o router Axum com todas as rotas da aplicação.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // ── Páginas HTML ──────────────────────────────────────
        .route("/", get(handlers::index))
        .route("/diagnostico", post(handlers::diagnose_form))
        .route("/reporte/{id}", get(handlers::report))
        // ── API JSON ──────────────────────────────────────────
        .route("/api/diagnostico", post(handlers::diagnose_json))
        .route("/api/validar", post(handlers::validate))
        .route("/api/historial", get(handlers::history))
        .route("/api/historial.csv", get(handlers::history_csv))
        .route("/api/pacientes", get(handlers::patients))
        .route("/api/estadisticas", get(handlers::stats))
        .route("/status", get(handlers::status))
        // ── Arquivos estáticos ────────────────────────────────
        .nest_service("/assets", ServeDir::new("assets"))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
