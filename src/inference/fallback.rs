//! # Heurística de Fallback
//!
//! Usada apenas quando nem as regras crisp nem o subsistema difuso
//! produziram ativações. Garante que todo diagnóstico tenha ao menos um
//! resultado.
//!
//! ## Cascata
//!
//! ```text
//! 1. sinais de infecção ──────────────► absceso (retorna imediatamente)
//! 2. dor intensa / noturna + calor ───► pulpitis
//! 3. cárie visível / mancha + estímulo ► caries
//! 4. mobilidade ──────────────────────► periodontitis
//!    senão inflamação / sangramento ──► gingivitis
//! 5. frio sem cárie visível ──────────► sensibilidad
//! 6. estímulo leve (só se nada acima) ► caries_inicial
//! 7. nada acima:
//!    algum sintoma numérico, máx ≥ 2 ─► caries_inicial
//!    algum sintoma numérico, máx < 2 ─► evaluacion_general (0.30)
//!    nenhum sintoma ──────────────────► evaluacion_general (0.25)
//! ```
//!
//! Os ramos 2 a 5 não são exclusivos entre si. A leitura dos fatos é
//! tolerante: valores de tipo errado contam como ausentes.

use crate::core::{Facts, Origin, RuleActivation, Symptom};

/// Sintomas numéricos considerados no último ramo.
const GRADED_SYMPTOMS: [Symptom; 8] = [
    Symptom::PainIntensity,
    Symptom::ColdSensitivity,
    Symptom::HeatSensitivity,
    Symptom::SweetSensitivity,
    Symptom::GumInflammation,
    Symptom::ChewingPain,
    Symptom::NightPain,
    Symptom::PressurePain,
];

const MODERATE_OR_SEVERE: &[&str] = &["moderado", "severo"];

fn fallback(diagnosis: &str, confidence: f64, rule: &str) -> RuleActivation {
    RuleActivation::new(diagnosis, confidence, rule, Origin::Fallback)
}

/// Executa a cascata. O resultado nunca é vazio.
pub fn evaluate(facts: &Facts) -> Vec<RuleActivation> {
    let pain = facts.level(Symptom::PainIntensity);
    let cold = facts.level(Symptom::ColdSensitivity);
    let heat = facts.level(Symptom::HeatSensitivity);
    let sweet = facts.level(Symptom::SweetSensitivity);
    let inflammation = facts.level(Symptom::GumInflammation);
    let night = facts.level(Symptom::NightPain);

    let swelling = facts.is(Symptom::FacialSwelling, "si");
    if swelling || facts.is(Symptom::VisiblePus, "si") || facts.is(Symptom::Fever, "si") {
        let mut confidence = if swelling { 0.7 } else { 0.65 };
        if pain >= 7.0 {
            confidence = (confidence + 0.15_f64).min(0.95);
        }
        return vec![fallback(
            "absceso",
            confidence,
            "Análisis heurístico - Signos de infección",
        )];
    }

    let mut found = Vec::new();

    if pain >= 7.0 || (night >= 6.0 && heat >= 6.0) {
        found.push(fallback(
            "pulpitis",
            (0.6 + pain / 30.0 + heat / 40.0).min(0.85),
            "Análisis heurístico - Dolor severo de origen pulpar",
        ));
    }

    let visible_caries = facts.is(Symptom::VisibleCaries, "si");
    if visible_caries
        || (facts.is(Symptom::DarkStain, "si") && (sweet >= 4.0 || cold >= 4.0))
    {
        let base = if visible_caries { 0.75 } else { 0.6 };
        found.push(fallback(
            "caries",
            (base + sweet / 40.0).min(0.88),
            "Análisis heurístico - Evidencia visual de caries",
        ));
    }

    let bleeding = facts.is_one_of(Symptom::GumBleeding, MODERATE_OR_SEVERE);
    if facts.is_one_of(Symptom::ToothMobility, MODERATE_OR_SEVERE)
        || (facts.is(Symptom::ToothMobility, "leve") && bleeding)
    {
        found.push(fallback(
            "periodontitis",
            (0.65 + inflammation / 30.0).min(0.82),
            "Análisis heurístico - Signos de enfermedad periodontal",
        ));
    } else if inflammation >= 5.0 || bleeding {
        found.push(fallback(
            "gingivitis",
            (0.55 + inflammation / 25.0).min(0.8),
            "Análisis heurístico - Inflamación gingival",
        ));
    }

    if cold >= 5.0 && !visible_caries && pain <= 6.0 {
        found.push(fallback(
            "sensibilidad",
            (0.5 + cold / 25.0).min(0.75),
            "Análisis heurístico - Hipersensibilidad dentinaria",
        ));
    }

    if found.is_empty() && (sweet >= 3.0 || cold >= 3.0) && (2.0..7.0).contains(&pain) {
        found.push(fallback(
            "caries_inicial",
            (0.45 + (sweet + cold) / 40.0).min(0.68),
            "Análisis heurístico - Posible caries incipiente",
        ));
    }

    if found.is_empty() {
        found.push(preventive(facts));
    }

    found
}

fn preventive(facts: &Facts) -> RuleActivation {
    let strongest = GRADED_SYMPTOMS
        .iter()
        .map(|s| facts.level(*s))
        .fold(0.0_f64, f64::max);

    if strongest >= 2.0 {
        fallback(
            "caries_inicial",
            (0.4 + strongest / 30.0).min(0.6),
            "Análisis heurístico - Síntomas leves",
        )
    } else if strongest > 0.0 {
        fallback(
            "evaluacion_general",
            0.3,
            "Recomendación - Evaluación preventiva",
        )
    } else {
        fallback(
            "evaluacion_general",
            0.25,
            "Recomendación - Sin síntomas relevantes, evaluación preventiva",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn ids(found: &[RuleActivation]) -> Vec<&str> {
        found.iter().map(|a| a.diagnosis.as_str()).collect()
    }

    /// Sinais de infecção encerram a cascata
    #[test]
    fn infection_short_circuits() {
        let facts = Facts::new()
            .with_category(Symptom::Fever, "si")
            .with_number(Symptom::PainIntensity, 9.0)
            .with_category(Symptom::VisibleCaries, "si");
        let found = evaluate(&facts);
        assert_eq!(ids(&found), vec!["absceso"]);
        assert!(close(found[0].confidence, 0.8));
        assert_eq!(found[0].origin, Origin::Fallback);

        let swelling = Facts::new()
            .with_category(Symptom::FacialSwelling, "si")
            .with_number(Symptom::PainIntensity, 8.0);
        assert!(close(evaluate(&swelling)[0].confidence, 0.85));
    }

    #[test]
    fn middle_branches_accumulate() {
        let facts = Facts::new()
            .with_number(Symptom::PainIntensity, 7.0)
            .with_number(Symptom::HeatSensitivity, 8.0)
            .with_category(Symptom::VisibleCaries, "si")
            .with_number(Symptom::SweetSensitivity, 4.0)
            .with_number(Symptom::GumInflammation, 6.0);
        let found = evaluate(&facts);
        assert_eq!(ids(&found), vec!["pulpitis", "caries", "gingivitis"]);
        assert!(close(found[0].confidence, 0.85));
        assert!(close(found[1].confidence, 0.85));
        assert!(close(found[2].confidence, 0.79));
    }

    #[test]
    fn mobility_takes_precedence_over_gingivitis() {
        let facts = Facts::new()
            .with_category(Symptom::ToothMobility, "leve")
            .with_category(Symptom::GumBleeding, "severo")
            .with_number(Symptom::GumInflammation, 9.0);
        let found = evaluate(&facts);
        assert_eq!(ids(&found), vec!["periodontitis"]);
        assert!(close(found[0].confidence, 0.82));
    }

    #[test]
    fn sensitivity_without_caries() {
        let facts = Facts::new()
            .with_number(Symptom::ColdSensitivity, 5.0)
            .with_number(Symptom::PainIntensity, 3.0);
        let found = evaluate(&facts);
        assert_eq!(ids(&found), vec!["sensibilidad"]);
        assert!(close(found[0].confidence, 0.7));
    }

    #[test]
    fn mild_pattern_only_when_nothing_else() {
        let facts = Facts::new()
            .with_number(Symptom::SweetSensitivity, 4.0)
            .with_number(Symptom::PainIntensity, 2.0);
        let found = evaluate(&facts);
        assert_eq!(ids(&found), vec!["caries_inicial"]);
        assert!(close(found[0].confidence, 0.55));
    }

    #[test]
    fn weak_symptoms_end_in_preventive_branches() {
        let weak = Facts::new().with_number(Symptom::PressurePain, 3.0);
        let found = evaluate(&weak);
        assert_eq!(ids(&found), vec!["caries_inicial"]);
        assert!(close(found[0].confidence, 0.5));

        let faint = Facts::new().with_number(Symptom::NightPain, 1.0);
        let found = evaluate(&faint);
        assert_eq!(ids(&found), vec!["evaluacion_general"]);
        assert!(close(found[0].confidence, 0.3));

        let none = Facts::new().with_category(Symptom::GumBleeding, "no");
        let found = evaluate(&none);
        assert_eq!(ids(&found), vec!["evaluacion_general"]);
        assert!(close(found[0].confidence, 0.25));
    }

    #[test]
    fn mistyped_values_count_as_absent() {
        let facts = Facts::new()
            .with_category(Symptom::PainIntensity, "mucho")
            .with_number(Symptom::Fever, 1.0);
        let found = evaluate(&facts);
        assert_eq!(ids(&found), vec!["evaluacion_general"]);
    }
}
