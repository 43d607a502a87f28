//! # Subsistema Difuso
//!
//! Estima a probabilidade de quatro **famílias** de doença (cárie, polpa,
//! infecção e gengiva) a partir de quatro entradas brutas:
//!
//! | Entrada | Origem | Conjuntos |
//! |---------|--------|-----------|
//! | `intensidad_dolor` | escala 0–10 | bajo, medio, alto |
//! | `sensibilidad` | máx(frio, calor, doce) | baja, media, alta |
//! | `inflamacion` | `inflamacion_encias` | baja, media, alta |
//! | `duracion_dias` | `duracion_dolor` → {0, 2, 5, 7} | corta, media, larga |
//!
//! ## Dois Pipelines
//!
//! Ambos implementam [`FuzzyEngine`] e são escolhidos na construção
//! ([`FuzzyMode`]):
//!
//! ```text
//! Complete (Mamdani)                     Linear
//! ──────────────────                     ──────
//! fuzzificação (triangular)              limiares diretos sobre as
//!   → força da regra (min / max)           entradas brutas
//!   → recorte + agregação (max)          → confiança = valor / 10
//!   → centróide discreto 0..=100
//!   → região vazia? usa o Linear
//!      para aquela família
//! ```
//!
//! Uma família só gera ativação quando a probabilidade passa de
//! [`PROBABILITY_THRESHOLD`]. A família gengival é desambiguada pela
//! mobilidade dentária (categórica), não pelo valor difuso.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::core::{FactError, Facts, Origin, RuleActivation, Symptom};

/// Probabilidade mínima (exclusiva, em %) para emitir uma ativação.
pub const PROBABILITY_THRESHOLD: f64 = 30.0;

const PAIN: &str = "intensidad_dolor";
const SENSITIVITY: &str = "sensibilidad";
const INFLAMMATION: &str = "inflamacion";
const DURATION: &str = "duracion_dias";

/// Falhas internas do subsistema difuso.
///
/// Nunca chegam ao chamador do diagnóstico: o orquestrador as registra e
/// segue só com as regras crisp.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FuzzyError {
    #[error("variável difusa desconhecida: {0}")]
    UnknownVariable(String),
    #[error("conjunto '{set}' não existe na variável '{variable}'")]
    UnknownSet { variable: String, set: String },
    #[error("região de saída vazia para '{0}'")]
    EmptyOutput(String),
    #[error(transparent)]
    Fact(#[from] FactError),
}

/// Função de pertinência.
///
/// `a == b` ou `c == d` formam um ombro plano com grau 1 na borda.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Membership {
    Triangular { a: f64, b: f64, c: f64 },
    Trapezoidal { a: f64, b: f64, c: f64, d: f64 },
}

impl Membership {
    pub fn degree(&self, x: f64) -> f64 {
        match *self {
            Membership::Triangular { a, b, c } => trapezoid(x, a, b, b, c),
            Membership::Trapezoidal { a, b, c, d } => trapezoid(x, a, b, c, d),
        }
    }
}

fn trapezoid(x: f64, a: f64, b: f64, c: f64, d: f64) -> f64 {
    if x >= b && x <= c {
        1.0
    } else if x <= a || x >= d {
        0.0
    } else if x < b {
        (x - a) / (b - a)
    } else {
        (d - x) / (d - c)
    }
}

fn tri(a: f64, b: f64, c: f64) -> Membership {
    Membership::Triangular { a, b, c }
}

/// Variável linguística com universo numérico fechado.
#[derive(Clone, Debug, PartialEq)]
pub struct FuzzyVariable {
    pub name: &'static str,
    pub min: f64,
    pub max: f64,
    pub sets: Vec<(&'static str, Membership)>,
}

impl FuzzyVariable {
    pub fn new(name: &'static str, min: f64, max: f64) -> Self {
        Self {
            name,
            min,
            max,
            sets: Vec::new(),
        }
    }

    pub fn with_set(mut self, label: &'static str, membership: Membership) -> Self {
        self.sets.push((label, membership));
        self
    }

    fn set(&self, label: &str) -> Result<&Membership, FuzzyError> {
        self.sets
            .iter()
            .find(|(l, _)| *l == label)
            .map(|(_, m)| m)
            .ok_or_else(|| FuzzyError::UnknownSet {
                variable: self.name.to_string(),
                set: label.to_string(),
            })
    }

    /// Grau de `x` (limitado ao universo) no conjunto `label`.
    pub fn degree(&self, label: &str, x: f64) -> Result<f64, FuzzyError> {
        Ok(self.set(label)?.degree(x.clamp(self.min, self.max)))
    }

    /// Escala 0–10 com três conjuntos sobrepostos.
    fn graded(name: &'static str, labels: [&'static str; 3]) -> Self {
        Self::new(name, 0.0, 10.0)
            .with_set(labels[0], tri(0.0, 0.0, 4.0))
            .with_set(labels[1], tri(2.0, 5.0, 8.0))
            .with_set(labels[2], tri(6.0, 10.0, 10.0))
    }

    /// Probabilidade 0–100 com conjuntos baja / media / alta.
    fn probability(name: &'static str) -> Self {
        Self::new(name, 0.0, 100.0)
            .with_set("baja", tri(0.0, 0.0, 40.0))
            .with_set("media", tri(20.0, 50.0, 80.0))
            .with_set("alta", tri(60.0, 100.0, 100.0))
    }
}

/// Conectivo entre antecedentes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Connective {
    /// Mínimo dos graus.
    And,
    /// Máximo dos graus.
    Or,
}

/// Regra difusa: `SE antecedentes ENTÃO conjunto de saída`.
#[derive(Clone, Debug, PartialEq)]
pub struct FuzzyRule {
    /// Pares (variável de entrada, conjunto).
    pub antecedents: Vec<(&'static str, &'static str)>,
    pub connective: Connective,
    /// Conjunto da variável de saída da família.
    pub consequent: &'static str,
}

impl FuzzyRule {
    pub fn and(antecedents: &[(&'static str, &'static str)], consequent: &'static str) -> Self {
        Self {
            antecedents: antecedents.to_vec(),
            connective: Connective::And,
            consequent,
        }
    }

    pub fn or(antecedents: &[(&'static str, &'static str)], consequent: &'static str) -> Self {
        Self {
            connective: Connective::Or,
            ..Self::and(antecedents, consequent)
        }
    }
}

/// Família de doença avaliada pelo subsistema difuso.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Family {
    Caries,
    Pulp,
    Infection,
    Gum,
}

impl Family {
    pub const ALL: [Family; 4] = [Family::Caries, Family::Pulp, Family::Infection, Family::Gum];

    pub fn label(self) -> &'static str {
        match self {
            Family::Caries => "Caries",
            Family::Pulp => "Pulpitis",
            Family::Infection => "Infección",
            Family::Gum => "Encías",
        }
    }

    /// Diagnóstico concluído pela família.
    pub fn diagnosis(self, facts: &Facts) -> &'static str {
        match self {
            Family::Caries => "caries",
            Family::Pulp => "pulpitis",
            Family::Infection => "absceso",
            Family::Gum if facts.is_one_of(Symptom::ToothMobility, &["moderado", "severo"]) => {
                "periodontitis"
            }
            Family::Gum => "gingivitis",
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// As quatro entradas brutas extraídas dos fatos.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FuzzyInputs {
    pub pain: f64,
    pub sensitivity: f64,
    pub inflammation: f64,
    pub duration_days: f64,
}

impl FuzzyInputs {
    /// Extrai as entradas com leitura estrita; fato de tipo errado é falha.
    pub fn from_facts(facts: &Facts) -> Result<Self, FuzzyError> {
        let sensitivity = facts
            .number(Symptom::ColdSensitivity)?
            .max(facts.number(Symptom::HeatSensitivity)?)
            .max(facts.number(Symptom::SweetSensitivity)?);
        Ok(Self {
            pain: facts.number(Symptom::PainIntensity)?,
            sensitivity,
            inflammation: facts.number(Symptom::GumInflammation)?,
            duration_days: duration_days(facts.category(Symptom::PainDuration)?),
        })
    }

    fn get(&self, variable: &str) -> Result<f64, FuzzyError> {
        match variable {
            PAIN => Ok(self.pain),
            SENSITIVITY => Ok(self.sensitivity),
            INFLAMMATION => Ok(self.inflammation),
            DURATION => Ok(self.duration_days),
            other => Err(FuzzyError::UnknownVariable(other.to_string())),
        }
    }
}

/// Faixa de duração → dias representativos.
pub fn duration_days(bucket: &str) -> f64 {
    match bucket {
        "1_3_dias" => 2.0,
        "3_7_dias" => 5.0,
        "mas_7_dias" => 7.0,
        _ => 0.0,
    }
}

/// Pipeline selecionado na construção.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum FuzzyMode {
    #[default]
    Complete,
    Linear,
}

impl FuzzyMode {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "completo" | "complete" | "mamdani" => Some(FuzzyMode::Complete),
            "lineal" | "linear" | "simple" => Some(FuzzyMode::Linear),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FuzzyMode::Complete => "completo",
            FuzzyMode::Linear => "lineal",
        }
    }

    /// Constrói o motor imutável do modo, pronto para ser compartilhado.
    pub fn build(self) -> Arc<dyn FuzzyEngine> {
        match self {
            FuzzyMode::Complete => Arc::new(MamdaniEngine::standard()),
            FuzzyMode::Linear => Arc::new(LinearEngine),
        }
    }
}

impl fmt::Display for FuzzyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Avaliador difuso compartilhável entre requisições.
pub trait FuzzyEngine: Send + Sync {
    fn mode(&self) -> FuzzyMode;

    /// Ativações de origem `fuzzy` para os fatos.
    fn evaluate(&self, facts: &Facts) -> Result<Vec<RuleActivation>, FuzzyError>;
}

/// Heurística linear: limiares diretos sobre as entradas brutas.
#[derive(Clone, Copy, Debug, Default)]
pub struct LinearEngine;

impl LinearEngine {
    /// Probabilidade (%) da família, ou `None` quando o padrão não casa.
    pub fn probability(&self, family: Family, inputs: &FuzzyInputs) -> Option<f64> {
        let FuzzyInputs {
            pain,
            sensitivity,
            inflammation,
            duration_days,
        } = *inputs;
        let score = match family {
            Family::Caries if sensitivity >= 5.0 && (3.0..=7.0).contains(&pain) => {
                sensitivity.min(pain)
            }
            Family::Pulp if pain >= 7.0 && duration_days >= 5.0 => pain,
            Family::Infection if inflammation >= 7.0 && pain >= 7.0 => inflammation.min(pain),
            Family::Gum if inflammation >= 5.0 && pain <= 5.0 => inflammation,
            _ => return None,
        };
        Some(score * 10.0)
    }

    fn activation(&self, family: Family, inputs: &FuzzyInputs, facts: &Facts) -> Option<RuleActivation> {
        let probability = self.probability(family, inputs)?;
        (probability > PROBABILITY_THRESHOLD).then(|| {
            RuleActivation::new(
                family.diagnosis(facts),
                probability / 100.0,
                format!("Lógica difusa simplificada - {}", family),
                Origin::Fuzzy,
            )
        })
    }
}

impl FuzzyEngine for LinearEngine {
    fn mode(&self) -> FuzzyMode {
        FuzzyMode::Linear
    }

    fn evaluate(&self, facts: &Facts) -> Result<Vec<RuleActivation>, FuzzyError> {
        let inputs = FuzzyInputs::from_facts(facts)?;
        Ok(Family::ALL
            .iter()
            .filter_map(|family| self.activation(*family, &inputs, facts))
            .collect())
    }
}

/// Uma família no pipeline Mamdani: variável de saída e suas regras.
#[derive(Clone, Debug, PartialEq)]
pub struct FuzzyCategory {
    pub family: Family,
    pub output: FuzzyVariable,
    pub rules: Vec<FuzzyRule>,
}

/// Pipeline Mamdani completo.
///
/// Construído uma vez e somente lido depois. Uma família cuja região de
/// saída fica vazia é pontuada pela [`LinearEngine`].
#[derive(Clone, Debug)]
pub struct MamdaniEngine {
    inputs: Vec<FuzzyVariable>,
    categories: Vec<FuzzyCategory>,
    linear: LinearEngine,
}

impl MamdaniEngine {
    pub fn new(inputs: Vec<FuzzyVariable>, categories: Vec<FuzzyCategory>) -> Self {
        Self {
            inputs,
            categories,
            linear: LinearEngine,
        }
    }

    /// Variáveis, conjuntos e regras do diagnóstico odontológico.
    pub fn standard() -> Self {
        let inputs = vec![
            FuzzyVariable::graded(PAIN, ["bajo", "medio", "alto"]),
            FuzzyVariable::graded(SENSITIVITY, ["baja", "media", "alta"]),
            FuzzyVariable::graded(INFLAMMATION, ["baja", "media", "alta"]),
            FuzzyVariable::new(DURATION, 0.0, 7.0)
                .with_set("corta", tri(0.0, 0.0, 2.0))
                .with_set("media", tri(1.0, 3.0, 5.0))
                .with_set("larga", tri(4.0, 7.0, 7.0)),
        ];

        let categories = vec![
            FuzzyCategory {
                family: Family::Caries,
                output: FuzzyVariable::probability("prob_caries"),
                rules: vec![
                    FuzzyRule::and(&[(SENSITIVITY, "alta"), (PAIN, "medio")], "media"),
                    FuzzyRule::and(&[(SENSITIVITY, "alta"), (PAIN, "alto"), (DURATION, "corta")], "alta"),
                    FuzzyRule::and(&[(SENSITIVITY, "media"), (PAIN, "bajo")], "baja"),
                ],
            },
            FuzzyCategory {
                family: Family::Pulp,
                output: FuzzyVariable::probability("prob_pulpitis"),
                rules: vec![
                    FuzzyRule::and(&[(PAIN, "alto"), (DURATION, "media")], "alta"),
                    FuzzyRule::and(&[(PAIN, "alto"), (DURATION, "larga")], "alta"),
                    FuzzyRule::and(&[(PAIN, "medio"), (SENSITIVITY, "alta"), (DURATION, "media")], "media"),
                ],
            },
            FuzzyCategory {
                family: Family::Infection,
                output: FuzzyVariable::probability("prob_infeccion"),
                rules: vec![
                    FuzzyRule::and(&[(PAIN, "alto"), (INFLAMMATION, "alta")], "alta"),
                    FuzzyRule::and(&[(INFLAMMATION, "alta"), (DURATION, "larga")], "alta"),
                    FuzzyRule::and(&[(PAIN, "medio"), (INFLAMMATION, "media")], "media"),
                ],
            },
            FuzzyCategory {
                family: Family::Gum,
                output: FuzzyVariable::probability("prob_encias"),
                rules: vec![
                    FuzzyRule::and(&[(INFLAMMATION, "alta"), (PAIN, "bajo")], "alta"),
                    FuzzyRule::and(&[(INFLAMMATION, "media"), (DURATION, "larga")], "media"),
                    FuzzyRule::and(&[(INFLAMMATION, "alta"), (DURATION, "larga")], "alta"),
                ],
            },
        ];

        Self::new(inputs, categories)
    }

    fn input(&self, name: &str) -> Result<&FuzzyVariable, FuzzyError> {
        self.inputs
            .iter()
            .find(|v| v.name == name)
            .ok_or_else(|| FuzzyError::UnknownVariable(name.to_string()))
    }

    /// Força de disparo da regra.
    fn strength(&self, rule: &FuzzyRule, inputs: &FuzzyInputs) -> Result<f64, FuzzyError> {
        let mut strength: Option<f64> = None;
        for (variable, set) in &rule.antecedents {
            let degree = self.input(variable)?.degree(set, inputs.get(variable)?)?;
            strength = Some(match (strength, rule.connective) {
                (None, _) => degree,
                (Some(s), Connective::And) => s.min(degree),
                (Some(s), Connective::Or) => s.max(degree),
            });
        }
        Ok(strength.unwrap_or(0.0))
    }

    /// Probabilidade (%) da família: recorte, agregação e centróide.
    pub fn probability(&self, category: &FuzzyCategory, inputs: &FuzzyInputs) -> Result<f64, FuzzyError> {
        let mut clipped = Vec::with_capacity(category.rules.len());
        for rule in &category.rules {
            let strength = self.strength(rule, inputs)?;
            clipped.push((strength, *category.output.set(rule.consequent)?));
        }

        let (mut weighted, mut total) = (0.0, 0.0);
        for point in category.output.min as i64..=category.output.max as i64 {
            let x = point as f64;
            let membership = clipped
                .iter()
                .map(|(strength, set)| strength.min(set.degree(x)))
                .fold(0.0, f64::max);
            weighted += x * membership;
            total += membership;
        }

        if total <= f64::EPSILON {
            return Err(FuzzyError::EmptyOutput(category.output.name.to_string()));
        }
        Ok(weighted / total)
    }
}

impl FuzzyEngine for MamdaniEngine {
    fn mode(&self) -> FuzzyMode {
        FuzzyMode::Complete
    }

    fn evaluate(&self, facts: &Facts) -> Result<Vec<RuleActivation>, FuzzyError> {
        let inputs = FuzzyInputs::from_facts(facts)?;
        let mut activations = Vec::new();

        for category in &self.categories {
            let family = category.family;
            match self.probability(category, &inputs) {
                Ok(probability) if probability > PROBABILITY_THRESHOLD => {
                    activations.push(RuleActivation::new(
                        family.diagnosis(facts),
                        probability / 100.0,
                        format!("Lógica difusa - {}", family),
                        Origin::Fuzzy,
                    ));
                }
                Ok(_) => {}
                Err(FuzzyError::EmptyOutput(output)) => {
                    tracing::debug!(%output, "região vazia, usando heurística linear");
                    activations.extend(self.linear.activation(family, &inputs, facts));
                }
                Err(error) => return Err(error),
            }
        }

        Ok(activations)
    }
}
