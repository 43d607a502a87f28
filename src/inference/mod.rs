//! # Módulo Inference: Motor de Raciocínio Diagnóstico
//!
//! Transforma um [`Facts`](crate::core::Facts) em ativações de regras.
//! Tudo aqui é síncrono, sem estado entre chamadas e somente leitura sobre
//! as bases construídas na inicialização.
//!
//! ## Pipeline
//!
//! ```text
//!            ┌──────────────┐
//! Facts ───► │ rules +      │──► crisp ─┐
//!            │ forward_chain│           │
//!            └──────────────┘           ├─► concat ─► vazio? ─► fallback
//!            ┌──────────────┐           │                 │
//!       ───► │ fuzzy        │──► fuzzy ─┘                 ▼
//!            └──────────────┘                        conflict::resolve
//! ```
//!
//! | Sub-módulo | Papel |
//! |------------|-------|
//! | [`rules`] | regras crisp declarativas |
//! | [`forward_chaining`] | avaliação em passada única, tolerante a falhas |
//! | [`fuzzy`] | pipeline Mamdani e heurística linear |
//! | [`conflict`] | estratégias de resolução |
//! | [`fallback`] | cascata que garante resultado não vazio |

pub mod conflict;
pub mod fallback;
pub mod forward_chaining;
pub mod fuzzy;
pub mod rules;

pub use conflict::{resolve, Strategy};
pub use forward_chaining::{Chaining, ForwardChainer};
pub use fuzzy::{FuzzyEngine, FuzzyError, FuzzyMode, LinearEngine, MamdaniEngine};
pub use rules::{Condition, CrispRule, RuleBase};
