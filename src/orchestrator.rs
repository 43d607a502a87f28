//! # Orquestrador de Diagnóstico
//!
//! O [`DiagnosisEngine`] é o ponto de entrada do raciocínio: recebe os
//! fatos de um paciente e devolve um [`DiagnosisResult`] ordenado.
//!
//! ## Ciclo de uma Chamada
//!
//! ```text
//! diagnose(facts, use_fuzzy, strategy)
//!   │
//!   ├── 1. ForwardChainer sobre a RuleBase ────────► crisp
//!   ├── 2. FuzzyEngine (se use_fuzzy) ─────────────► fuzzy
//!   │      └── erro? registra em warn, segue só com crisp
//!   ├── 3. crisp ++ fuzzy vazio? ──► fallback::evaluate
//!   ├── 4. conflict::resolve(strategy)
//!   ├── 5. ordenação estável por confiança decrescente
//!   └── 6. enriquecimento pelo catálogo
//! ```
//!
//! Nenhum passo falha para o chamador. O motor é imutável depois de
//! construído e pode ser compartilhado via `Arc` entre requisições.
//!
//! A [validação](validate) é independente do diagnóstico: apenas produz
//! avisos, nunca bloqueia.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::facts::{Domain, FactValue};
use crate::core::{DiagnosisResult, EnrichedDiagnosis, Facts, Symptom};
use crate::inference::{
    fallback, resolve, ForwardChainer, FuzzyEngine, FuzzyMode, RuleBase, Strategy,
};

/// Motor de diagnóstico: base crisp + subsistema difuso.
pub struct DiagnosisEngine {
    rules: RuleBase,
    fuzzy: Arc<dyn FuzzyEngine>,
}

impl DiagnosisEngine {
    pub fn new(rules: RuleBase, fuzzy: Arc<dyn FuzzyEngine>) -> Self {
        Self { rules, fuzzy }
    }

    /// Base padrão com o pipeline difuso escolhido.
    pub fn standard(mode: FuzzyMode) -> Self {
        Self::new(RuleBase::standard(), mode.build())
    }

    pub fn rules(&self) -> &RuleBase {
        &self.rules
    }

    pub fn fuzzy_mode(&self) -> FuzzyMode {
        self.fuzzy.mode()
    }

    /// Diagnostica os fatos. Sempre devolve ao menos um diagnóstico.
    pub fn diagnose(&self, facts: &Facts, use_fuzzy: bool, strategy: &Strategy) -> DiagnosisResult {
        let mut activations = ForwardChainer::run(&self.rules, facts).into_activations();

        if use_fuzzy {
            match self.fuzzy.evaluate(facts) {
                Ok(fuzzy) => activations.extend(fuzzy),
                Err(error) => {
                    tracing::warn!(
                        %error,
                        mode = %self.fuzzy.mode(),
                        "falha no subsistema difuso, seguindo só com regras crisp"
                    );
                }
            }
        }

        if activations.is_empty() {
            activations = fallback::evaluate(facts);
            tracing::debug!(count = activations.len(), "nenhuma regra disparou, usando fallback");
        }

        let mut resolved = resolve(activations, strategy);
        resolved.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

        let diagnoses: Vec<EnrichedDiagnosis> = resolved
            .into_iter()
            .map(EnrichedDiagnosis::from_activation)
            .collect();
        let result = DiagnosisResult::new(diagnoses, facts.len(), use_fuzzy);

        if let Some(principal) = &result.principal {
            tracing::info!(
                principal = %principal.diagnosis,
                confidence = principal.confidence,
                count = result.count,
                %strategy,
                use_fuzzy,
                "diagnóstico concluído"
            );
        }
        result
    }
}

/// Resultado da validação de fatos.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    #[serde(rename = "valido")]
    pub valid: bool,
    #[serde(rename = "advertencias")]
    pub warnings: Vec<String>,
}

/// Valida faixas, domínios e coerência entre sintomas.
///
/// Chaves desconhecidas são ignoradas.
pub fn validate(facts: &Facts) -> ValidationReport {
    let mut warnings = Vec::new();

    for symptom in Symptom::ALL {
        let Some(value) = facts.get(symptom.key()) else {
            continue;
        };
        match (symptom.domain(), value) {
            (Domain::Scale { min, max }, FactValue::Number(n)) if (min..=max).contains(n) => {}
            (Domain::Scale { min, max }, _) => warnings.push(format!(
                "Valor inválido para {}: debe estar entre {} y {}",
                symptom, min, max
            )),
            (Domain::Categories(allowed), FactValue::Category(c)) if allowed.contains(&c.as_str()) => {}
            (Domain::Categories(allowed), other) => warnings.push(format!(
                "Valor desconocido para {}: '{}' (se esperaba uno de: {})",
                symptom,
                other,
                allowed.join(", ")
            )),
        }
    }

    let swelling = facts.is(Symptom::FacialSwelling, "si");
    if swelling && facts.level(Symptom::PainIntensity) < 5.0 {
        warnings.push(
            "Advertencia: la hinchazón facial suele acompañarse de dolor significativo".to_string(),
        );
    }
    if facts.is(Symptom::VisiblePus, "si") && !swelling && facts.level(Symptom::GumInflammation) < 5.0 {
        warnings.push(
            "Advertencia: la presencia de pus suele indicar una inflamación significativa".to_string(),
        );
    }

    ValidationReport {
        valid: warnings.is_empty(),
        warnings,
    }
}
