//! # Estado da Aplicação Web
//!
//! ```text
//! AppState (Clone, barato)
//!  ├── engine:   Arc<DiagnosisEngine>         somente leitura, sem lock
//!  ├── history:  Arc<RwLock<HistoryStore>>    escrita a cada diagnóstico
//!  └── strategy: Strategy                     padrão da configuração
//! ```

use std::sync::Arc;

use parking_lot::RwLock;

use crate::inference::Strategy;
use crate::orchestrator::DiagnosisEngine;
use crate::persistence::HistoryStore;

/// Estado compartilhado da aplicação Axum.
#[derive(Clone)]
pub struct AppState {
    /// Motor imutável, construído uma vez na inicialização.
    pub engine: Arc<DiagnosisEngine>,
    /// Histórico de diagnósticos, protegido por `RwLock`.
    pub history: Arc<RwLock<HistoryStore>>,
    /// Estratégia usada quando a requisição não informa outra.
    pub strategy: Strategy,
}

impl AppState {
    pub fn new(engine: DiagnosisEngine, history: HistoryStore, strategy: Strategy) -> Self {
        Self {
            engine: Arc::new(engine),
            history: Arc::new(RwLock::new(history)),
            strategy,
        }
    }
}
