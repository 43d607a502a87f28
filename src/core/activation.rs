//! # RuleActivation: Ativação Transitória de uma Regra
//!
//! Uma [`RuleActivation`] registra que **uma regra ou ramo heurístico
//! casou** com os fatos atuais, concluindo um diagnóstico com certa
//! confiança. É produzida por avaliação e nunca persistida pelo núcleo.
//!
//! | Origem | Produzida por |
//! |--------|---------------|
//! | `crisp` | [`ForwardChainer`](crate::inference::ForwardChainer) |
//! | `fuzzy` | [`FuzzyEngine`](crate::inference::fuzzy::FuzzyEngine) |
//! | `fallback` | [`fallback::evaluate`](crate::inference::fallback::evaluate) |
//! | `combinado` | resolução de conflitos (estratégia `combine`) |

use std::fmt;

use serde::{Deserialize, Serialize};

/// Família de regras que produziu a ativação.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Origin {
    #[serde(rename = "crisp")]
    Crisp,
    #[serde(rename = "fuzzy")]
    Fuzzy,
    #[serde(rename = "fallback")]
    Fallback,
    /// Agrupamento de várias ativações do mesmo diagnóstico.
    #[serde(rename = "combinado")]
    Combined,
}

impl Origin {
    pub fn label(self) -> &'static str {
        match self {
            Origin::Crisp => "crisp",
            Origin::Fuzzy => "fuzzy",
            Origin::Fallback => "fallback",
            Origin::Combined => "combinado",
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Ativação de uma regra: diagnóstico concluído, confiança e proveniência.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RuleActivation {
    /// Identificador do diagnóstico no [catálogo](crate::core::catalog).
    #[serde(rename = "diagnostico")]
    pub diagnosis: String,
    /// Confiança em `[0, 1]`.
    #[serde(rename = "confianza")]
    pub confidence: f64,
    /// Rótulo legível da regra ou ramo que disparou.
    #[serde(rename = "regla")]
    pub rule: String,
    #[serde(rename = "tipo")]
    pub origin: Origin,
    /// Ativações agrupadas (apenas para `Origin::Combined`).
    #[serde(rename = "evidencias", default, skip_serializing_if = "Vec::is_empty")]
    pub evidence: Vec<RuleActivation>,
}

impl RuleActivation {
    pub fn new(
        diagnosis: impl Into<String>,
        confidence: f64,
        rule: impl Into<String>,
        origin: Origin,
    ) -> Self {
        Self {
            diagnosis: diagnosis.into(),
            confidence: confidence.clamp(0.0, 1.0),
            rule: rule.into(),
            origin,
            evidence: Vec::new(),
        }
    }
}

impl fmt::Display for RuleActivation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({:.2}, {}: {})",
            self.diagnosis, self.confidence, self.origin, self.rule
        )
    }
}
