//! # Resultado de Diagnóstico
//!
//! Estruturas devolvidas ao chamador pelo
//! [`DiagnosisEngine`](crate::orchestrator::DiagnosisEngine). Um
//! [`DiagnosisResult`] é criado a cada chamada e pertence exclusivamente
//! ao chamador.
//!
//! ## Contrato de Saída (JSON)
//!
//! ```text
//! {
//!   "diagnosticos": [ EnrichedDiagnosis, ... ],   // ordem decrescente de confiança
//!   "num_diagnosticos": 2,
//!   "principal": EnrichedDiagnosis,               // primeiro da lista
//!   "sintomas_evaluados": 27,
//!   "usa_logica_fuzzy": true
//! }
//! ```
//!
//! Além do contrato, o resultado oferece três serviços derivados:
//! [`urgency_level`](DiagnosisResult::urgency_level),
//! [`summary`](DiagnosisResult::summary) e
//! [`explanation`](DiagnosisResult::explanation).

use serde::{Deserialize, Serialize};

use super::activation::{Origin, RuleActivation};
use super::catalog::{self, Severity, Urgency};
use super::facts::{FactValue, Facts, Symptom};

/// Número de recomendações destacadas no resumo.
const SUMMARY_RECOMMENDATIONS: usize = 3;

/// Número de alternativas citadas no raciocínio textual.
const REASONING_ALTERNATIVES: usize = 2;

/// Sintomas numéricos considerados na explicação.
const KEY_NUMERIC_SYMPTOMS: [Symptom; 5] = [
    Symptom::PainIntensity,
    Symptom::ColdSensitivity,
    Symptom::HeatSensitivity,
    Symptom::ChewingPain,
    Symptom::GumInflammation,
];

/// Converte confiança `[0, 1]` em porcentagem com uma casa decimal.
pub fn percentage(confidence: f64) -> f64 {
    (confidence * 100.0 * 10.0).round() / 10.0
}

/// Ativação enriquecida com os dados do catálogo.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnrichedDiagnosis {
    #[serde(rename = "diagnostico")]
    pub diagnosis: String,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "gravedad")]
    pub severity: Severity,
    #[serde(rename = "urgencia")]
    pub urgency: Urgency,
    #[serde(rename = "confianza")]
    pub confidence: f64,
    #[serde(rename = "confianza_porcentaje")]
    pub confidence_pct: f64,
    #[serde(rename = "regla")]
    pub rule: String,
    #[serde(rename = "tipo_regla")]
    pub origin: Origin,
    #[serde(rename = "recomendaciones")]
    pub recommendations: Vec<String>,
}

impl EnrichedDiagnosis {
    /// Enriquece uma ativação com o catálogo.
    ///
    /// Ids ausentes do catálogo recebem texto placeholder, sem falhar.
    pub fn from_activation(activation: RuleActivation) -> Self {
        let info = catalog::lookup(&activation.diagnosis);
        let name = info.map_or_else(|| activation.diagnosis.clone(), |i| i.name.to_string());
        Self {
            name,
            description: info.map(|i| i.description.to_string()).unwrap_or_default(),
            severity: info.map_or(Severity::Desconocida, |i| i.severity),
            urgency: info.map_or(Urgency::Desconocida, |i| i.urgency),
            confidence: activation.confidence,
            confidence_pct: percentage(activation.confidence),
            rule: activation.rule,
            origin: activation.origin,
            recommendations: info
                .map(|i| i.recommendations.iter().map(|r| r.to_string()).collect())
                .unwrap_or_default(),
            diagnosis: activation.diagnosis,
        }
    }
}

/// Resultado completo de uma chamada de diagnóstico.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DiagnosisResult {
    #[serde(rename = "diagnosticos")]
    pub diagnoses: Vec<EnrichedDiagnosis>,
    #[serde(rename = "num_diagnosticos")]
    pub count: usize,
    pub principal: Option<EnrichedDiagnosis>,
    #[serde(rename = "sintomas_evaluados")]
    pub facts_evaluated: usize,
    #[serde(rename = "usa_logica_fuzzy")]
    pub uses_fuzzy: bool,
}

impl DiagnosisResult {
    /// Monta o resultado a partir de diagnósticos já ordenados.
    pub fn new(diagnoses: Vec<EnrichedDiagnosis>, facts_evaluated: usize, uses_fuzzy: bool) -> Self {
        Self {
            count: diagnoses.len(),
            principal: diagnoses.first().cloned(),
            diagnoses,
            facts_evaluated,
            uses_fuzzy,
        }
    }

    /// Diagnósticos alternativos (todos exceto o principal).
    pub fn alternatives(&self) -> &[EnrichedDiagnosis] {
        self.diagnoses.get(1..).unwrap_or(&[])
    }

    /// Urgência agregada: o rótulo de maior prioridade presente em
    /// **qualquer** diagnóstico retornado, independente do principal.
    ///
    /// A escala agregada termina em `urgente`: `emergencia` conta como
    /// `urgente`. Sem nenhum rótulo conhecido, a urgência agregada é `baja`.
    pub fn urgency_level(&self) -> Urgency {
        self.diagnoses
            .iter()
            .map(|d| match d.urgency {
                Urgency::Emergencia => Urgency::Urgente,
                other => other,
            })
            .max()
            .filter(|u| *u != Urgency::Desconocida)
            .unwrap_or(Urgency::Baja)
    }

    /// Resumo do diagnóstico para exibição rápida.
    pub fn summary(&self) -> Summary {
        let Some(principal) = &self.principal else {
            return Summary {
                has_diagnosis: false,
                principal: None,
                confidence_pct: None,
                description: None,
                urgency: None,
                urgency_message: "No se pudo determinar un diagnóstico con los síntomas proporcionados."
                    .to_string(),
                alternatives: 0,
                top_recommendations: Vec::new(),
            };
        };
        let urgency = self.urgency_level();
        Summary {
            has_diagnosis: true,
            principal: Some(principal.name.clone()),
            confidence_pct: Some(principal.confidence_pct),
            description: Some(principal.description.clone()),
            urgency: Some(urgency),
            urgency_message: urgency.message().to_string(),
            alternatives: self.alternatives().len(),
            top_recommendations: principal
                .recommendations
                .iter()
                .take(SUMMARY_RECOMMENDATIONS)
                .cloned()
                .collect(),
        }
    }

    /// Explicação textual do raciocínio, a partir dos fatos que o geraram.
    pub fn explanation(&self, facts: &Facts) -> Explanation {
        Explanation {
            key_symptoms: key_symptoms(facts),
            applied_rules: self.diagnoses.iter().map(|d| d.rule.clone()).collect(),
            reasoning: self.reasoning(),
        }
    }

    fn reasoning(&self) -> String {
        let Some(principal) = &self.principal else {
            return "No se pudo generar un diagnóstico con los síntomas proporcionados.".to_string();
        };
        let mut text = format!(
            "Basándose en los síntomas reportados, el diagnóstico más probable es {} \
             con una confianza del {}%.\n\nEsto se determinó mediante {}.\n\nDescripción: {}",
            principal.name, principal.confidence_pct, principal.rule, principal.description
        );
        let others: Vec<&str> = self
            .alternatives()
            .iter()
            .take(REASONING_ALTERNATIVES)
            .map(|d| d.name.as_str())
            .collect();
        if !others.is_empty() {
            text.push_str("\n\nOtros diagnósticos posibles incluyen: ");
            text.push_str(&others.join(", "));
        }
        text
    }
}

/// Resumo de um diagnóstico.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    #[serde(rename = "tiene_diagnostico")]
    pub has_diagnosis: bool,
    #[serde(rename = "diagnostico_principal", skip_serializing_if = "Option::is_none")]
    pub principal: Option<String>,
    #[serde(rename = "confianza", skip_serializing_if = "Option::is_none")]
    pub confidence_pct: Option<f64>,
    #[serde(rename = "descripcion", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "urgencia", skip_serializing_if = "Option::is_none")]
    pub urgency: Option<Urgency>,
    #[serde(rename = "mensaje_urgencia")]
    pub urgency_message: String,
    #[serde(rename = "num_diagnosticos_alternativos")]
    pub alternatives: usize,
    #[serde(rename = "recomendaciones_principales")]
    pub top_recommendations: Vec<String>,
}

/// Relevância de um sintoma-chave.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relevance {
    Media,
    Alta,
    MuyAlta,
}

/// Sintoma destacado na explicação.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KeySymptom {
    #[serde(rename = "sintoma")]
    pub symptom: String,
    #[serde(rename = "valor")]
    pub value: FactValue,
    #[serde(rename = "relevancia")]
    pub relevance: Relevance,
}

/// Explicação do diagnóstico: sintomas-chave, regras aplicadas e texto.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Explanation {
    #[serde(rename = "sintomas_clave")]
    pub key_symptoms: Vec<KeySymptom>,
    #[serde(rename = "reglas_aplicadas")]
    pub applied_rules: Vec<String>,
    #[serde(rename = "razonamiento")]
    pub reasoning: String,
}

fn key_symptoms(facts: &Facts) -> Vec<KeySymptom> {
    let mut found = Vec::new();
    for symptom in KEY_NUMERIC_SYMPTOMS {
        let value = facts.level(symptom);
        if value >= 5.0 {
            found.push(KeySymptom {
                symptom: symptom.key().to_string(),
                value: FactValue::Number(value),
                relevance: if value >= 7.0 { Relevance::Alta } else { Relevance::Media },
            });
        }
    }
    if facts.is(Symptom::VisibleCaries, "si") {
        found.push(KeySymptom {
            symptom: Symptom::VisibleCaries.key().to_string(),
            value: FactValue::Category("si".into()),
            relevance: Relevance::Alta,
        });
    }
    if facts.is(Symptom::FacialSwelling, "si") {
        found.push(KeySymptom {
            symptom: Symptom::FacialSwelling.key().to_string(),
            value: FactValue::Category("si".into()),
            relevance: Relevance::MuyAlta,
        });
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enriched(id: &str, confidence: f64) -> EnrichedDiagnosis {
        EnrichedDiagnosis::from_activation(RuleActivation::new(id, confidence, "teste", Origin::Crisp))
    }

    #[test]
    fn enrichment_uses_catalog() {
        let d = enriched("caries", 0.9);
        assert_eq!(d.name, "Caries Dental");
        assert_eq!(d.severity, Severity::Media);
        assert_eq!(d.urgency, Urgency::Moderada);
        assert_eq!(d.recommendations.len(), 6);
        assert_eq!(d.confidence_pct, 90.0);
    }

    /// Ids fora do catálogo recebem placeholder em vez de erro
    #[test]
    fn unknown_ids_get_placeholders() {
        let d = enriched("desconhecido", 0.5);
        assert_eq!(d.name, "desconhecido");
        assert!(d.description.is_empty());
        assert_eq!(d.severity, Severity::Desconocida);
        assert_eq!(d.urgency, Urgency::Desconocida);
        assert!(d.recommendations.is_empty());
    }

    #[test]
    fn percentage_rounds_to_one_decimal() {
        assert_eq!(percentage(0.8725), (0.8725f64 * 100.0 * 10.0).round() / 10.0);
        assert_eq!(percentage(0.25), 25.0);
        assert_eq!(percentage(1.0 / 3.0), 33.3);
    }

    /// A urgência agregada considera todos os diagnósticos, não só o principal
    #[test]
    fn urgency_aggregates_over_alternatives() {
        let result = DiagnosisResult::new(
            vec![enriched("sensibilidad", 0.9), enriched("pulpitis", 0.5)],
            3,
            false,
        );
        assert_eq!(result.principal.as_ref().unwrap().urgency, Urgency::Baja);
        assert_eq!(result.urgency_level(), Urgency::Urgente);
    }

    #[test]
    fn emergency_folds_into_urgent() {
        let result = DiagnosisResult::new(
            vec![enriched("absceso", 0.95), enriched("celulitis_facial", 0.9)],
            6,
            true,
        );
        assert_eq!(result.diagnoses[1].urgency, Urgency::Emergencia);
        assert_eq!(result.urgency_level(), Urgency::Urgente);

        let alone = DiagnosisResult::new(vec![enriched("celulitis_facial", 0.9)], 6, true);
        assert_eq!(alone.urgency_level(), Urgency::Urgente);
    }

    #[test]
    fn unknown_urgency_aggregates_to_low() {
        let result = DiagnosisResult::new(vec![enriched("desconhecido", 0.4)], 0, false);
        assert_eq!(result.urgency_level(), Urgency::Baja);
    }

    #[test]
    fn summary_reports_principal_and_top_recommendations() {
        let result = DiagnosisResult::new(
            vec![enriched("absceso", 0.95), enriched("caries", 0.5)],
            4,
            true,
        );
        let summary = result.summary();
        assert!(summary.has_diagnosis);
        assert_eq!(summary.principal.as_deref(), Some("Absceso Dental Agudo"));
        assert_eq!(summary.confidence_pct, Some(95.0));
        assert_eq!(summary.urgency, Some(Urgency::Urgente));
        assert_eq!(summary.alternatives, 1);
        assert_eq!(summary.top_recommendations.len(), 3);
    }

    #[test]
    fn explanation_lists_key_symptoms() {
        let facts = Facts::new()
            .with_number(Symptom::PainIntensity, 8.0)
            .with_number(Symptom::ColdSensitivity, 5.0)
            .with_number(Symptom::HeatSensitivity, 2.0)
            .with_category(Symptom::FacialSwelling, "si");
        let result = DiagnosisResult::new(
            vec![enriched("absceso", 0.95), enriched("pulpitis", 0.6), enriched("caries", 0.4)],
            facts.len(),
            true,
        );
        let explanation = result.explanation(&facts);

        let relevances: Vec<(&str, Relevance)> = explanation
            .key_symptoms
            .iter()
            .map(|k| (k.symptom.as_str(), k.relevance))
            .collect();
        assert_eq!(
            relevances,
            vec![
                ("intensidad_dolor", Relevance::Alta),
                ("sensibilidad_frio", Relevance::Media),
                ("hinchazon_cara", Relevance::MuyAlta),
            ]
        );
        assert_eq!(explanation.applied_rules.len(), 3);
        assert!(explanation.reasoning.contains("Absceso Dental Agudo"));
        assert!(explanation
            .reasoning
            .contains("Otros diagnósticos posibles incluyen: Pulpitis Irreversible, Caries Dental"));
    }

    #[test]
    fn result_serializes_with_contract_keys() {
        let result = DiagnosisResult::new(vec![enriched("caries", 0.9)], 5, true);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["num_diagnosticos"], 1);
        assert_eq!(json["sintomas_evaluados"], 5);
        assert_eq!(json["usa_logica_fuzzy"], true);
        assert_eq!(json["principal"]["diagnostico"], "caries");
        assert_eq!(json["principal"]["confianza_porcentaje"], 90.0);
        assert_eq!(json["principal"]["tipo_regla"], "crisp");
    }
}
