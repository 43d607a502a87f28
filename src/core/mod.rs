//! # Módulo Core: Tipos Fundamentais do Domínio
//!
//! Este módulo agrupa os **tipos fundamentais** sobre os quais o motor de
//! inferência raciocina. Nada aqui tem comportamento de inferência; são
//! dados e as operações triviais sobre eles:
//!
//! - [`Facts`] / [`Symptom`]: esquema de sintomas e mapa de fatos de uma sessão
//! - [`catalog`]: catálogo de diagnósticos (nome, gravidade, urgência, recomendações)
//! - [`RuleActivation`] / [`Origin`]: ativação transitória de uma regra
//! - [`DiagnosisResult`]: resultado enriquecido devolvido ao chamador
//!
//! ## Fluxo dos Tipos
//!
//! ```text
//! Facts ──(regras)──► Vec<RuleActivation> ──(catálogo)──► DiagnosisResult
//! ```

/// Esquema de sintomas e mapa de fatos.
pub mod facts;

/// Catálogo estático de diagnósticos.
pub mod catalog;

/// Ativação de regra e sua origem.
pub mod activation;

/// Resultado enriquecido, resumo e explicação.
pub mod result;

pub use activation::{Origin, RuleActivation};
pub use catalog::{DiagnosisInfo, Severity, Urgency};
pub use facts::{FactError, FactValue, Facts, Symptom};
pub use result::{DiagnosisResult, EnrichedDiagnosis, Explanation, Summary};
