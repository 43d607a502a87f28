//! # Base de Regras Crisp
//!
//! Regras determinísticas do tipo **SE condições ENTÃO diagnóstico**. Cada
//! [`CrispRule`] é uma conjunção de [`Condition`]s declarativas sobre o
//! [`Facts`], um diagnóstico alvo e uma confiança estática.
//!
//! ## Condições Declarativas
//!
//! Em vez de closures opacas, cada condição é um dado inspecionável:
//!
//! | Condição | Leitura | Exemplo |
//! |----------|---------|---------|
//! | `AtLeast` | numérica | `intensidad_dolor >= 7` |
//! | `AtMost` | numérica | `dolor_nocturno <= 3` |
//! | `Is` | categórica | `caries_visible = si` |
//! | `OneOf` | categórica | `movilidad_dental ∈ {moderado, severo}` |
//! | `Any` | disjunção | `pus_visible = si ∨ fiebre = si` |
//!
//! Avaliar uma condição **nunca muta** os fatos. A leitura é tipada: uma
//! condição numérica sobre um fato categórico devolve [`FactError`], e
//! quem decide o que fazer com isso é o
//! [`ForwardChainer`](super::ForwardChainer).
//!
//! ## Invariantes da Base Padrão
//!
//! - toda conclusão existe no [catálogo](crate::core::catalog)
//! - toda confiança está em `(0, 1]`
//! - toda regra tem ao menos uma condição que um paciente sem sintomas
//!   não satisfaz (a avaliação preventiva vem só do fallback)

use std::fmt;

use crate::core::{FactError, Facts, Symptom};

const MODERATE_OR_SEVERE: &[&str] = &["moderado", "severo"];
const ANY_GRADE: &[&str] = &["leve", "moderado", "severo"];
const MILD_OR_MODERATE: &[&str] = &["leve", "moderado"];
const LONG_DURATION: &[&str] = &["3_7_dias", "mas_7_dias"];
const SHORT_DURATION: &[&str] = &["menos_24h", "1_3_dias"];
const SHARP_PAIN: &[&str] = &["agudo", "punzante"];
const THROBBING_PAIN: &[&str] = &["pulsante", "punzante"];
const DULL_PAIN: &[&str] = &["sordo", "constante"];
const RED_GUMS: &[&str] = &["rojo_claro", "rojo_intenso"];
const DARK_GUMS: &[&str] = &["rojo_intenso", "purpura"];
const RECENT_TREATMENT: &[&str] = &["menos_1_semana", "1_4_semanas"];

/// Condição declarativa sobre um sintoma.
#[derive(Clone, Debug, PartialEq)]
pub enum Condition {
    AtLeast(Symptom, f64),
    AtMost(Symptom, f64),
    Is(Symptom, &'static str),
    OneOf(Symptom, &'static [&'static str]),
    /// Disjunção avaliada da esquerda para a direita com curto-circuito.
    Any(Vec<Condition>),
}

impl Condition {
    /// Avalia a condição contra os fatos.
    pub fn evaluate(&self, facts: &Facts) -> Result<bool, FactError> {
        match self {
            Condition::AtLeast(symptom, threshold) => Ok(facts.number(*symptom)? >= *threshold),
            Condition::AtMost(symptom, threshold) => Ok(facts.number(*symptom)? <= *threshold),
            Condition::Is(symptom, value) => Ok(facts.category(*symptom)? == *value),
            Condition::OneOf(symptom, values) => {
                let found = facts.category(*symptom)?;
                Ok(values.contains(&found))
            }
            Condition::Any(alternatives) => {
                for alternative in alternatives {
                    if alternative.evaluate(facts)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::AtLeast(s, t) => write!(f, "{} >= {}", s, t),
            Condition::AtMost(s, t) => write!(f, "{} <= {}", s, t),
            Condition::Is(s, v) => write!(f, "{} = {}", s, v),
            Condition::OneOf(s, vs) => write!(f, "{} ∈ {{{}}}", s, vs.join(", ")),
            Condition::Any(cs) => {
                let parts: Vec<String> = cs.iter().map(|c| c.to_string()).collect();
                write!(f, "({})", parts.join(" ∨ "))
            }
        }
    }
}

/// Regra crisp: conjunção de condições → diagnóstico com confiança fixa.
///
/// Imutável depois de construída. Dispara sse **todas** as condições são
/// verdadeiras.
#[derive(Clone, Debug, PartialEq)]
pub struct CrispRule {
    pub name: &'static str,
    pub conditions: Vec<Condition>,
    pub conclusion: &'static str,
    pub confidence: f64,
}

impl CrispRule {
    /// Avalia as condições da esquerda para a direita, parando na primeira falsa.
    pub fn evaluate(&self, facts: &Facts) -> Result<bool, FactError> {
        for condition in &self.conditions {
            if !condition.evaluate(facts)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

impl fmt::Display for CrispRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let conditions: Vec<String> = self.conditions.iter().map(|c| c.to_string()).collect();
        write!(
            f,
            "SI {} ENTONCES {} ({:.2})",
            conditions.join(" ∧ "),
            self.conclusion,
            self.confidence
        )
    }
}

/// Conjunto ordenado de regras crisp, construído uma vez e compartilhado
/// somente para leitura.
#[derive(Clone, Debug)]
pub struct RuleBase {
    rules: Vec<CrispRule>,
}

impl RuleBase {
    pub fn new(rules: Vec<CrispRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[CrispRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Regras que concluem o diagnóstico dado.
    pub fn for_diagnosis<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a CrispRule> + 'a {
        self.rules.iter().filter(move |r| r.conclusion == id)
    }

    /// Base de conhecimento odontológica padrão.
    pub fn standard() -> Self {
        use Symptom::*;

        let rules = vec![
            // ── Caries ───────────────────────────────────────────
            rule("Caries con síntomas claros", "caries", 0.9, vec![
                is(VisibleCaries, "si"),
                at_least(SweetSensitivity, 5.0),
                one_of(PainType, SHARP_PAIN),
            ]),
            rule("Caries probable", "caries", 0.75, vec![
                is(DarkStain, "si"),
                any(vec![at_least(ColdSensitivity, 4.0), at_least(SweetSensitivity, 4.0)]),
                at_least(ChewingPain, 3.0),
            ]),
            rule("Caries visible con sensibilidad al frío", "caries", 0.8, vec![
                is(VisibleCaries, "si"),
                at_least(ColdSensitivity, 5.0),
                at_most(PainIntensity, 6.0),
            ]),
            rule("Caries con dolor al masticar", "caries", 0.78, vec![
                is(VisibleCaries, "si"),
                at_least(ChewingPain, 4.0),
                at_least(SweetSensitivity, 3.0),
            ]),
            // ── Caries inicial ───────────────────────────────────
            rule("Caries inicial por mancha oscura", "caries_inicial", 0.7, vec![
                is(DarkStain, "si"),
                one_of(VisibleCaries, &["no", "no_seguro"]),
                at_least(SweetSensitivity, 3.0),
                at_most(PainIntensity, 4.0),
            ]),
            rule("Desmineralización temprana", "caries_inicial", 0.65, vec![
                is(VisibleCaries, "no_seguro"),
                any(vec![at_least(SweetSensitivity, 4.0), at_least(ColdSensitivity, 4.0)]),
                at_most(PainIntensity, 5.0),
            ]),
            // ── Caries profunda ──────────────────────────────────
            rule("Caries profunda con dolor intenso", "caries_profunda", 0.85, vec![
                is(VisibleCaries, "si"),
                at_least(PainIntensity, 7.0),
                at_least(HeatSensitivity, 5.0),
            ]),
            rule("Caries profunda con dolor espontáneo", "caries_profunda", 0.82, vec![
                is(VisibleCaries, "si"),
                at_least(NightPain, 5.0),
                any(vec![at_least(ColdSensitivity, 6.0), at_least(HeatSensitivity, 6.0)]),
            ]),
            // ── Caries radicular ─────────────────────────────────
            rule("Caries radicular por retracción", "caries_radicular", 0.8, vec![
                one_of(GumRecession, MODERATE_OR_SEVERE),
                any(vec![is(VisibleCaries, "si"), is(DarkStain, "si")]),
                at_least(ColdSensitivity, 4.0),
            ]),
            rule("Caries radicular probable", "caries_radicular", 0.72, vec![
                one_of(GumRecession, ANY_GRADE),
                is(DarkStain, "si"),
                at_least(SweetSensitivity, 5.0),
            ]),
            // ── Pulpitis ─────────────────────────────────────────
            rule("Pulpitis aguda", "pulpitis", 0.9, vec![
                at_least(PainIntensity, 7.0),
                one_of(PainType, THROBBING_PAIN),
                at_least(HeatSensitivity, 6.0),
                at_least(NightPain, 6.0),
            ]),
            rule("Pulpitis probable", "pulpitis", 0.8, vec![
                one_of(PainDuration, LONG_DURATION),
                at_least(PainIntensity, 5.0),
                at_least(NightPain, 5.0),
                at_least(HeatSensitivity, 5.0),
            ]),
            rule("Pulpitis por dolor térmico persistente", "pulpitis", 0.78, vec![
                at_least(HeatSensitivity, 7.0),
                one_of(PainType, &["pulsante", "constante"]),
                one_of(PainDuration, LONG_DURATION),
            ]),
            // ── Pulpitis reversible ──────────────────────────────
            rule("Pulpitis reversible", "pulpitis_reversible", 0.75, vec![
                at_least(ColdSensitivity, 6.0),
                at_least(PainIntensity, 3.0),
                at_most(PainIntensity, 6.0),
                one_of(PainDuration, SHORT_DURATION),
                at_most(NightPain, 3.0),
                one_of(PainType, &["agudo", "punzante", "intermitente"]),
            ]),
            rule("Pulpitis reversible por caries", "pulpitis_reversible", 0.72, vec![
                is(VisibleCaries, "si"),
                at_least(ColdSensitivity, 5.0),
                at_most(HeatSensitivity, 4.0),
                is(PainType, "agudo"),
                one_of(PainDuration, SHORT_DURATION),
            ]),
            // ── Necrosis pulpar ──────────────────────────────────
            rule("Necrosis pulpar", "necrosis_pulpar", 0.8, vec![
                at_least(PressurePain, 6.0),
                at_most(ColdSensitivity, 2.0),
                any(vec![is(DarkStain, "si"), is(RecentTrauma, "si")]),
                one_of(PainDuration, LONG_DURATION),
            ]),
            rule("Necrosis pulpar post-traumática", "necrosis_pulpar", 0.75, vec![
                is(RecentTrauma, "si"),
                is(DarkStain, "si"),
                at_most(ColdSensitivity, 2.0),
                at_least(PressurePain, 4.0),
            ]),
            // ── Absceso ──────────────────────────────────────────
            rule("Absceso dental con infección", "absceso", 0.95, vec![
                is(FacialSwelling, "si"),
                any(vec![is(VisiblePus, "si"), is(Fever, "si")]),
                at_least(PainIntensity, 7.0),
            ]),
            rule("Absceso dental probable", "absceso", 0.85, vec![
                is(FacialSwelling, "si"),
                one_of(BadBreath, MODERATE_OR_SEVERE),
                at_least(PressurePain, 7.0),
                is(PainType, "pulsante"),
            ]),
            rule("Absceso con drenaje de pus", "absceso", 0.82, vec![
                is(VisiblePus, "si"),
                at_least(PressurePain, 6.0),
                one_of(PainType, &["pulsante", "constante"]),
            ]),
            // ── Absceso crónico ──────────────────────────────────
            rule("Absceso crónico con fístula", "absceso_cronico", 0.78, vec![
                is(VisiblePus, "si"),
                is(PainDuration, "mas_7_dias"),
                at_most(PainIntensity, 5.0),
                one_of(BadBreath, ANY_GRADE),
            ]),
            rule("Infección crónica persistente", "absceso_cronico", 0.7, vec![
                is(PainDuration, "mas_7_dias"),
                at_least(PressurePain, 4.0),
                one_of(BadBreath, MODERATE_OR_SEVERE),
                is(FacialSwelling, "no"),
                any(vec![is(VisiblePus, "si"), is(DarkStain, "si")]),
            ]),
            // ── Celulitis facial ─────────────────────────────────
            rule("Celulitis facial", "celulitis_facial", 0.9, vec![
                is(FacialSwelling, "si"),
                is(Fever, "si"),
                at_least(PainIntensity, 8.0),
                at_least(GumInflammation, 7.0),
                one_of(PainDuration, LONG_DURATION),
            ]),
            rule("Infección diseminada", "celulitis_facial", 0.88, vec![
                is(FacialSwelling, "si"),
                is(Fever, "si"),
                is(BadBreath, "severo"),
                at_least(PressurePain, 8.0),
            ]),
            // ── Gingivitis ───────────────────────────────────────
            rule("Gingivitis activa", "gingivitis", 0.85, vec![
                one_of(GumBleeding, MODERATE_OR_SEVERE),
                at_least(GumInflammation, 5.0),
                one_of(GumColor, RED_GUMS),
                is(ToothMobility, "no"),
            ]),
            rule("Gingivitis leve", "gingivitis", 0.75, vec![
                at_least(GumInflammation, 4.0),
                one_of(GumBleeding, MILD_OR_MODERATE),
                one_of(BadBreath, MILD_OR_MODERATE),
            ]),
            rule("Gingivitis por sangrado al cepillado", "gingivitis", 0.7, vec![
                one_of(GumBleeding, MILD_OR_MODERATE),
                is(GumColor, "rojo_claro"),
                is(GumRecession, "no"),
                is(ToothMobility, "no"),
            ]),
            // ── Gingivitis aguda ─────────────────────────────────
            rule("Gingivitis aguda", "gingivitis_aguda", 0.85, vec![
                at_least(GumInflammation, 7.0),
                is(GumBleeding, "severo"),
                at_least(PainIntensity, 5.0),
                is(GumColor, "rojo_intenso"),
            ]),
            rule("Gingivitis aguda con halitosis", "gingivitis_aguda", 0.78, vec![
                at_least(GumInflammation, 6.0),
                is(BadBreath, "severo"),
                one_of(GumBleeding, MODERATE_OR_SEVERE),
                one_of(PainDuration, SHORT_DURATION),
            ]),
            // ── Periodontitis ────────────────────────────────────
            rule("Periodontitis avanzada", "periodontitis", 0.9, vec![
                one_of(ToothMobility, MODERATE_OR_SEVERE),
                one_of(GumRecession, MODERATE_OR_SEVERE),
                one_of(GumBleeding, MODERATE_OR_SEVERE),
                one_of(BadBreath, MODERATE_OR_SEVERE),
            ]),
            rule("Periodontitis moderada", "periodontitis", 0.8, vec![
                one_of(GumRecession, MODERATE_OR_SEVERE),
                is(GumBleeding, "moderado"),
                is(ToothMobility, "leve"),
                one_of(PainDuration, LONG_DURATION),
            ]),
            rule("Periodontitis con inflamación crónica", "periodontitis", 0.78, vec![
                at_least(GumInflammation, 6.0),
                one_of(GumRecession, ANY_GRADE),
                one_of(ToothMobility, MILD_OR_MODERATE),
                one_of(GumColor, DARK_GUMS),
            ]),
            // ── Periodontitis agresiva ───────────────────────────
            rule("Periodontitis agresiva", "periodontitis_agresiva", 0.85, vec![
                is(ToothMobility, "severo"),
                is(GumRecession, "severo"),
                at_least(GumInflammation, 7.0),
                one_of(PainDuration, LONG_DURATION),
            ]),
            rule("Pérdida ósea rápida", "periodontitis_agresiva", 0.82, vec![
                one_of(ToothMobility, MODERATE_OR_SEVERE),
                is(GumRecession, "severo"),
                is(GumColor, "purpura"),
                is(GumBleeding, "severo"),
            ]),
            // ── Absceso periodontal ──────────────────────────────
            rule("Absceso periodontal", "absceso_periodontal", 0.85, vec![
                is(VisiblePus, "si"),
                at_least(GumInflammation, 7.0),
                one_of(ToothMobility, ANY_GRADE),
                is(FacialSwelling, "no"),
            ]),
            rule("Absceso periodontal probable", "absceso_periodontal", 0.78, vec![
                at_least(GumInflammation, 8.0),
                at_least(PressurePain, 6.0),
                one_of(GumColor, DARK_GUMS),
                one_of(BadBreath, MODERATE_OR_SEVERE),
            ]),
            // ── Sensibilidad ─────────────────────────────────────
            rule("Sensibilidad dental", "sensibilidad", 0.8, vec![
                at_least(ColdSensitivity, 5.0),
                is(VisibleCaries, "no"),
                at_most(PainIntensity, 5.0),
                is(PainDuration, "menos_24h"),
                one_of(GumRecession, MILD_OR_MODERATE),
            ]),
            rule("Hipersensibilidad por exposición radicular", "sensibilidad", 0.75, vec![
                at_least(ColdSensitivity, 6.0),
                one_of(GumRecession, ANY_GRADE),
                is(VisibleCaries, "no"),
                at_most(NightPain, 2.0),
            ]),
            rule("Sensibilidad a estímulos fríos", "sensibilidad", 0.7, vec![
                at_least(ColdSensitivity, 6.0),
                at_most(SweetSensitivity, 4.0),
                at_most(PainIntensity, 4.0),
                is(VisibleCaries, "no"),
                is(DarkStain, "no"),
                one_of(PainType, &["agudo", "punzante", "intermitente"]),
            ]),
            // ── Erosión dental ───────────────────────────────────
            rule("Erosión dental", "erosion_dental", 0.75, vec![
                one_of(ToothWear, MILD_OR_MODERATE),
                at_least(ColdSensitivity, 5.0),
                at_least(SweetSensitivity, 4.0),
                is(VisibleCaries, "no"),
                is(TeethGrinding, "no"),
            ]),
            rule("Erosión por ácidos", "erosion_dental", 0.68, vec![
                one_of(ToothWear, MODERATE_OR_SEVERE),
                at_least(ColdSensitivity, 4.0),
                is(BiteProblems, "no"),
                is(TeethGrinding, "no"),
                is(GumRecession, "no"),
            ]),
            // ── Abrasión dental ──────────────────────────────────
            rule("Abrasión dental", "abrasion_dental", 0.72, vec![
                one_of(ToothWear, MILD_OR_MODERATE),
                one_of(GumRecession, ANY_GRADE),
                at_least(ColdSensitivity, 4.0),
                is(TeethGrinding, "no"),
            ]),
            rule("Abrasión cervical", "abrasion_dental", 0.68, vec![
                one_of(ToothWear, MODERATE_OR_SEVERE),
                one_of(GumRecession, MODERATE_OR_SEVERE),
                at_most(PainIntensity, 3.0),
            ]),
            // ── Fractura dental ──────────────────────────────────
            rule("Fractura dental traumática", "fractura_dental", 0.92, vec![
                is(ToothFracture, "si"),
                is(RecentTrauma, "si"),
            ]),
            rule("Fractura dental con dolor", "fractura_dental", 0.85, vec![
                is(ToothFracture, "si"),
                any(vec![at_least(ChewingPain, 5.0), at_least(PressurePain, 5.0)]),
                at_least(PainIntensity, 5.0),
            ]),
            rule("Fractura post-traumática probable", "fractura_dental", 0.65, vec![
                is(RecentTrauma, "si"),
                at_least(ChewingPain, 6.0),
                at_least(PressurePain, 6.0),
            ]),
            // ── Fisura dental ────────────────────────────────────
            rule("Fisura dental", "fisura_dental", 0.72, vec![
                at_least(ChewingPain, 6.0),
                is(ToothFracture, "no"),
                is(VisibleCaries, "no"),
                one_of(PainType, SHARP_PAIN),
                at_least(ColdSensitivity, 3.0),
            ]),
            rule("Síndrome del diente fisurado", "fisura_dental", 0.7, vec![
                at_least(PressurePain, 5.0),
                at_least(ChewingPain, 5.0),
                is(PainType, "punzante"),
                is(DarkStain, "no"),
                at_most(PainIntensity, 6.0),
            ]),
            // ── Bruxismo ─────────────────────────────────────────
            rule("Bruxismo confirmado", "bruxismo", 0.9, vec![
                is(TeethGrinding, "si"),
                one_of(ToothWear, MODERATE_OR_SEVERE),
                at_least(JawPain, 5.0),
                one_of(PainType, DULL_PAIN),
            ]),
            rule("Bruxismo probable", "bruxismo", 0.7, vec![
                at_least(JawPain, 5.0),
                one_of(ToothWear, MILD_OR_MODERATE),
                at_most(NightPain, 3.0),
                at_least(ColdSensitivity, 4.0),
            ]),
            rule("Bruxismo por rechinamiento nocturno", "bruxismo", 0.8, vec![
                is(TeethGrinding, "si"),
                at_least(JawPain, 3.0),
                one_of(ToothWear, ANY_GRADE),
            ]),
            // ── Disfunción de ATM ────────────────────────────────
            rule("Disfunción de ATM", "atm_disfuncion", 0.78, vec![
                at_least(JawPain, 6.0),
                is(BiteProblems, "si"),
                at_least(ChewingPain, 5.0),
                one_of(TeethGrinding, &["no", "no_seguro"]),
            ]),
            rule("Dolor articular mandibular", "atm_disfuncion", 0.72, vec![
                at_least(JawPain, 7.0),
                one_of(PainType, DULL_PAIN),
                at_most(PainIntensity, 6.0),
                is(ToothWear, "no"),
            ]),
            // ── Post-tratamiento ─────────────────────────────────
            rule("Dolor post-obturación", "dolor_post_obturacion", 0.85, vec![
                is(RecentTreatment, "si"),
                is(TreatmentTime, "menos_1_semana"),
                at_least(ChewingPain, 3.0),
                at_most(PainIntensity, 6.0),
            ]),
            rule("Molestia por obturación alta", "dolor_post_obturacion", 0.78, vec![
                is(RecentTreatment, "si"),
                is(BiteProblems, "si"),
                at_least(ChewingPain, 4.0),
                one_of(TreatmentTime, RECENT_TREATMENT),
            ]),
            rule("Sensibilidad post-tratamiento", "sensibilidad_post_tratamiento", 0.8, vec![
                is(RecentTreatment, "si"),
                one_of(TreatmentTime, RECENT_TREATMENT),
                at_least(ColdSensitivity, 4.0),
                at_most(PainIntensity, 5.0),
            ]),
            rule("Sensibilidad térmica tras tratamiento", "sensibilidad_post_tratamiento", 0.72, vec![
                is(RecentTreatment, "si"),
                is(TreatmentTime, "menos_1_semana"),
                at_least(HeatSensitivity, 4.0),
                at_least(ColdSensitivity, 4.0),
                is(FacialSwelling, "no"),
            ]),
            rule("Fracaso de endodoncia", "fracaso_endodoncia", 0.85, vec![
                is(RecentTreatment, "si"),
                is(TreatmentTime, "mas_1_mes"),
                at_least(PressurePain, 5.0),
                any(vec![is(VisiblePus, "si"), is(FacialSwelling, "si")]),
            ]),
            rule("Reinfección tras tratamiento de conducto", "fracaso_endodoncia", 0.75, vec![
                is(RecentTreatment, "si"),
                is(TreatmentTime, "mas_1_mes"),
                at_least(PainIntensity, 6.0),
                one_of(PainDuration, LONG_DURATION),
            ]),
            // ── Ortodoncia ───────────────────────────────────────
            rule("Problema de ortodoncia", "ortodoncia", 0.75, vec![
                is(BiteProblems, "si"),
                at_least(JawPain, 4.0),
                at_least(ChewingPain, 4.0),
                one_of(PainType, DULL_PAIN),
            ]),
            rule("Maloclusión", "ortodoncia", 0.65, vec![
                is(BiteProblems, "si"),
                one_of(ToothWear, ANY_GRADE),
                at_most(JawPain, 4.0),
            ]),
            // ── Impactación alimentaria ──────────────────────────
            rule("Impactación de alimentos", "impactacion_alimentaria", 0.7, vec![
                at_least(ChewingPain, 4.0),
                at_least(PressurePain, 3.0),
                is(PainType, "intermitente"),
                is(VisibleCaries, "no"),
            ]),
            rule("Dolor por empaquetamiento", "impactacion_alimentaria", 0.65, vec![
                at_least(GumInflammation, 3.0),
                is(GumBleeding, "leve"),
                one_of(PainType, &["intermitente", "sordo"]),
                at_least(PressurePain, 4.0),
            ]),
        ];

        Self::new(rules)
    }
}

fn rule(
    name: &'static str,
    conclusion: &'static str,
    confidence: f64,
    conditions: Vec<Condition>,
) -> CrispRule {
    CrispRule {
        name,
        conditions,
        conclusion,
        confidence,
    }
}

fn at_least(symptom: Symptom, threshold: f64) -> Condition {
    Condition::AtLeast(symptom, threshold)
}

fn at_most(symptom: Symptom, threshold: f64) -> Condition {
    Condition::AtMost(symptom, threshold)
}

fn is(symptom: Symptom, value: &'static str) -> Condition {
    Condition::Is(symptom, value)
}

fn one_of(symptom: Symptom, values: &'static [&'static str]) -> Condition {
    Condition::OneOf(symptom, values)
}

fn any(alternatives: Vec<Condition>) -> Condition {
    Condition::Any(alternatives)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog;
    use crate::core::facts::Domain;

    fn no_symptoms() -> Facts {
        let mut facts = Facts::new();
        for symptom in Symptom::ALL {
            facts = match symptom {
                s if s.is_numeric() => facts.with_number(s, 0.0),
                Symptom::GumColor => facts.with_category(symptom, "normal"),
                Symptom::TreatmentTime => facts.with_category(symptom, "ninguno"),
                _ => facts.with_category(symptom, "no"),
            };
        }
        facts
    }

    #[test]
    fn standard_base_is_well_formed() {
        let base = RuleBase::standard();
        assert!(base.len() >= 60, "esperava ~60 regras, há {}", base.len());
        for rule in base.rules() {
            assert!(
                rule.confidence > 0.0 && rule.confidence <= 1.0,
                "{}: confiança fora de (0, 1]",
                rule.name
            );
            assert!(catalog::lookup(rule.conclusion).is_some(), "{}", rule.conclusion);
            assert!(!rule.conditions.is_empty());
        }
    }

    /// Toda regra referencia apenas valores que pertencem ao domínio do sintoma
    #[test]
    fn conditions_match_symptom_domains() {
        fn check(condition: &Condition, rule: &str) {
            match condition {
                Condition::AtLeast(s, _) | Condition::AtMost(s, _) => {
                    assert!(s.is_numeric(), "{}: {} não é numérico", rule, s)
                }
                Condition::Is(s, v) => check_value(*s, v, rule),
                Condition::OneOf(s, vs) => vs.iter().for_each(|v| check_value(*s, v, rule)),
                Condition::Any(cs) => cs.iter().for_each(|c| check(c, rule)),
            }
        }
        fn check_value(symptom: Symptom, value: &str, rule: &str) {
            match symptom.domain() {
                Domain::Categories(values) => {
                    assert!(values.contains(&value), "{}: {} = {}", rule, symptom, value)
                }
                Domain::Scale { .. } => panic!("{}: {} não é categórico", rule, symptom),
            }
        }
        for rule in RuleBase::standard().rules() {
            rule.conditions.iter().for_each(|c| check(c, rule.name));
        }
    }

    #[test]
    fn every_diagnosis_but_preventive_has_rules() {
        let base = RuleBase::standard();
        for info in catalog::entries() {
            let count = base.for_diagnosis(info.id).count();
            if info.id == "evaluacion_general" {
                assert_eq!(count, 0);
            } else {
                assert!(count >= 1, "{} sem regras", info.id);
            }
        }
    }

    #[test]
    fn no_rule_fires_without_symptoms() {
        let facts = no_symptoms();
        for rule in RuleBase::standard().rules() {
            assert_eq!(rule.evaluate(&facts), Ok(false), "{}", rule.name);
        }
        let empty = Facts::new();
        for rule in RuleBase::standard().rules() {
            assert_eq!(rule.evaluate(&empty), Ok(false), "{}", rule.name);
        }
    }

    #[test]
    fn any_short_circuits_left_to_right() {
        let facts = Facts::new()
            .with_category(Symptom::VisiblePus, "si")
            .with_category(Symptom::Fever, "alta");
        let condition = any(vec![is(Symptom::VisiblePus, "si"), at_least(Symptom::Fever, 1.0)]);
        assert_eq!(condition.evaluate(&facts), Ok(true));

        let reversed = any(vec![at_least(Symptom::Fever, 1.0), is(Symptom::VisiblePus, "si")]);
        assert!(reversed.evaluate(&facts).is_err());
    }

    #[test]
    fn conjunction_stops_at_first_false() {
        let facts = Facts::new().with_category(Symptom::PainIntensity, "forte");
        let rule = rule("teste", "caries", 0.5, vec![
            is(Symptom::VisibleCaries, "si"),
            at_least(Symptom::PainIntensity, 5.0),
        ]);
        // A primeira condição é falsa; a leitura inválida nunca acontece
        assert_eq!(rule.evaluate(&facts), Ok(false));
    }

    #[test]
    fn rule_display_is_readable() {
        let rule = rule("teste", "absceso", 0.95, vec![
            is(Symptom::FacialSwelling, "si"),
            any(vec![is(Symptom::VisiblePus, "si"), is(Symptom::Fever, "si")]),
        ]);
        assert_eq!(
            rule.to_string(),
            "SI hinchazon_cara = si ∧ (pus_visible = si ∨ fiebre = si) ENTONCES absceso (0.95)"
        );
    }
}
