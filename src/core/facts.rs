//! # Facts: Esquema de Sintomas e Mapa de Fatos
//!
//! Define o **vocabulário fixo** de sintomas avaliados pelo sistema e o
//! [`Facts`], o mapa de observações de uma sessão de diagnóstico.
//!
//! ## Domínios
//!
//! Cada [`Symptom`] declara um [`Domain`]:
//!
//! | Domínio | Exemplo | Valores |
//! |---------|---------|---------|
//! | `Scale` | `intensidad_dolor` | número de 0 a 10 |
//! | `Categories` | `sangrado_encias` | `no`, `leve`, `moderado`, `severo` |
//!
//! ## Leitura Tolerante
//!
//! O mapa é construído uma vez por sessão e **nunca é mutado** durante a
//! avaliação. Chaves ausentes valem `0` (escala) ou `"no"` (categoria) no
//! momento da leitura. Chaves desconhecidas são mantidas (contam como
//! sintomas avaliados) mas nenhuma regra as consulta.
//!
//! ```text
//! {"intensidad_dolor": 7, "caries_visible": "Sí"}
//!   ├── number(PainIntensity)  → Ok(7.0)
//!   ├── category(VisibleCaries) → Ok("si")     (normalizado na entrada)
//!   ├── number(NightPain)      → Ok(0.0)      (ausente)
//!   └── number(VisibleCaries)  → Err(ExpectedNumber)
//! ```

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Valor categórico assumido para sintomas ausentes.
pub const ABSENT_CATEGORY: &str = "no";

/// Limites da escala numérica comum a todos os sintomas graduados.
pub const SCALE_MIN: f64 = 0.0;
pub const SCALE_MAX: f64 = 10.0;

/// Domínio declarado de um sintoma.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Domain {
    /// Escala numérica fechada `[min, max]`.
    Scale { min: f64, max: f64 },
    /// Conjunto fechado de categorias aceitas.
    Categories(&'static [&'static str]),
}

impl Domain {
    fn scale() -> Self {
        Domain::Scale {
            min: SCALE_MIN,
            max: SCALE_MAX,
        }
    }
}

const PAIN_TYPES: &[&str] = &[
    "agudo",
    "punzante",
    "constante",
    "pulsante",
    "sordo",
    "intermitente",
];
const DURATIONS: &[&str] = &["menos_24h", "1_3_dias", "3_7_dias", "mas_7_dias"];
const GRADES: &[&str] = &["no", "leve", "moderado", "severo"];
const YES_NO: &[&str] = &["si", "no"];
const YES_NO_UNSURE: &[&str] = &["si", "no", "no_seguro"];
const GUM_COLORS: &[&str] = &["normal", "rojo_claro", "rojo_intenso", "purpura"];
const TREATMENT_TIMES: &[&str] = &["menos_1_semana", "1_4_semanas", "mas_1_mes", "ninguno"];

/// Vocabulário fixo de sintomas.
///
/// Os identificadores Rust são descritivos; a chave externa (usada no JSON,
/// nos formulários e no histórico) é retornada por [`Symptom::key`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Symptom {
    PainType,
    PainIntensity,
    PainDuration,
    ColdSensitivity,
    HeatSensitivity,
    SweetSensitivity,
    ChewingPain,
    PressurePain,
    NightPain,
    GumInflammation,
    GumBleeding,
    GumColor,
    GumRecession,
    VisibleCaries,
    DarkStain,
    ToothFracture,
    ToothWear,
    FacialSwelling,
    VisiblePus,
    BadBreath,
    Fever,
    ToothMobility,
    TeethGrinding,
    JawPain,
    BiteProblems,
    RecentTreatment,
    TreatmentTime,
    RecentTrauma,
}

impl Symptom {
    /// Todos os sintomas, na ordem em que o formulário os apresenta.
    pub const ALL: [Symptom; 28] = [
        Symptom::PainType,
        Symptom::PainIntensity,
        Symptom::PainDuration,
        Symptom::ColdSensitivity,
        Symptom::HeatSensitivity,
        Symptom::SweetSensitivity,
        Symptom::ChewingPain,
        Symptom::PressurePain,
        Symptom::NightPain,
        Symptom::GumInflammation,
        Symptom::GumBleeding,
        Symptom::GumColor,
        Symptom::GumRecession,
        Symptom::VisibleCaries,
        Symptom::DarkStain,
        Symptom::ToothFracture,
        Symptom::ToothWear,
        Symptom::FacialSwelling,
        Symptom::VisiblePus,
        Symptom::BadBreath,
        Symptom::Fever,
        Symptom::ToothMobility,
        Symptom::TeethGrinding,
        Symptom::JawPain,
        Symptom::BiteProblems,
        Symptom::RecentTreatment,
        Symptom::TreatmentTime,
        Symptom::RecentTrauma,
    ];

    /// Chave externa do sintoma.
    pub fn key(self) -> &'static str {
        match self {
            Symptom::PainType => "tipo_dolor",
            Symptom::PainIntensity => "intensidad_dolor",
            Symptom::PainDuration => "duracion_dolor",
            Symptom::ColdSensitivity => "sensibilidad_frio",
            Symptom::HeatSensitivity => "sensibilidad_calor",
            Symptom::SweetSensitivity => "sensibilidad_dulce",
            Symptom::ChewingPain => "dolor_masticar",
            Symptom::PressurePain => "dolor_presion",
            Symptom::NightPain => "dolor_nocturno",
            Symptom::GumInflammation => "inflamacion_encias",
            Symptom::GumBleeding => "sangrado_encias",
            Symptom::GumColor => "color_encias",
            Symptom::GumRecession => "retraimiento_encias",
            Symptom::VisibleCaries => "caries_visible",
            Symptom::DarkStain => "mancha_oscura",
            Symptom::ToothFracture => "fractura_diente",
            Symptom::ToothWear => "desgaste_dental",
            Symptom::FacialSwelling => "hinchazon_cara",
            Symptom::VisiblePus => "pus_visible",
            Symptom::BadBreath => "mal_aliento",
            Symptom::Fever => "fiebre",
            Symptom::ToothMobility => "movilidad_dental",
            Symptom::TeethGrinding => "rechinar_dientes",
            Symptom::JawPain => "dolor_mandibula",
            Symptom::BiteProblems => "problemas_mordida",
            Symptom::RecentTreatment => "tratamiento_reciente",
            Symptom::TreatmentTime => "tiempo_tratamiento",
            Symptom::RecentTrauma => "trauma_reciente",
        }
    }

    /// Busca o sintoma pela chave externa.
    pub fn from_key(key: &str) -> Option<Symptom> {
        Symptom::ALL.iter().copied().find(|s| s.key() == key)
    }

    /// Domínio declarado do sintoma.
    pub fn domain(self) -> Domain {
        match self {
            Symptom::PainIntensity
            | Symptom::ColdSensitivity
            | Symptom::HeatSensitivity
            | Symptom::SweetSensitivity
            | Symptom::ChewingPain
            | Symptom::PressurePain
            | Symptom::NightPain
            | Symptom::GumInflammation
            | Symptom::JawPain => Domain::scale(),
            Symptom::PainType => Domain::Categories(PAIN_TYPES),
            Symptom::PainDuration => Domain::Categories(DURATIONS),
            Symptom::GumBleeding
            | Symptom::GumRecession
            | Symptom::ToothWear
            | Symptom::BadBreath
            | Symptom::ToothMobility => Domain::Categories(GRADES),
            Symptom::GumColor => Domain::Categories(GUM_COLORS),
            Symptom::VisibleCaries | Symptom::TeethGrinding => Domain::Categories(YES_NO_UNSURE),
            Symptom::DarkStain
            | Symptom::ToothFracture
            | Symptom::FacialSwelling
            | Symptom::VisiblePus
            | Symptom::Fever
            | Symptom::BiteProblems
            | Symptom::RecentTreatment
            | Symptom::RecentTrauma => Domain::Categories(YES_NO),
            Symptom::TreatmentTime => Domain::Categories(TREATMENT_TIMES),
        }
    }

    /// `true` para sintomas graduados na escala 0–10.
    pub fn is_numeric(self) -> bool {
        matches!(self.domain(), Domain::Scale { .. })
    }
}

impl fmt::Display for Symptom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Valor observado de um sintoma: número ou categoria.
///
/// Desserializado sem tag: `7` vira `Number(7.0)` e `"leve"` vira
/// `Category("leve")`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FactValue {
    Number(f64),
    Category(String),
}

impl fmt::Display for FactValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FactValue::Number(n) => write!(f, "{}", n),
            FactValue::Category(c) => f.write_str(c),
        }
    }
}

/// Falha de leitura tipada de um fato.
///
/// É o caso "predicado que falha" das regras: a regra dona do predicado
/// simplesmente não dispara.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FactError {
    #[error("sintoma '{symptom}' esperava valor numérico, recebeu '{found}'")]
    ExpectedNumber { symptom: &'static str, found: String },
    #[error("sintoma '{symptom}' esperava categoria, recebeu {found}")]
    ExpectedCategory { symptom: &'static str, found: f64 },
}

/// Normaliza um valor categórico: minúsculas, sem acentos, `_` no lugar de
/// espaços e hífens.
///
/// ```rust
/// assert_eq!(normalize_category(" Sí "), "si");
/// assert_eq!(normalize_category("Rojo Intenso"), "rojo_intenso");
/// ```
pub fn normalize_category(raw: &str) -> String {
    raw.trim()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect()
}

/// Mapa de fatos de uma sessão de diagnóstico.
///
/// Ordenado por chave (`BTreeMap`) para que iterações e serializações
/// sejam determinísticas.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<String, FactValue>",
    into = "BTreeMap<String, FactValue>"
)]
pub struct Facts {
    values: BTreeMap<String, FactValue>,
}

impl Facts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insere um fato, normalizando valores categóricos.
    pub fn insert(&mut self, key: impl Into<String>, value: FactValue) {
        let value = match value {
            FactValue::Category(c) => FactValue::Category(normalize_category(&c)),
            number => number,
        };
        self.values.insert(key.into(), value);
    }

    /// Builder: define um sintoma numérico.
    pub fn with_number(mut self, symptom: Symptom, value: f64) -> Self {
        self.insert(symptom.key(), FactValue::Number(value));
        self
    }

    /// Builder: define um sintoma categórico.
    pub fn with_category(mut self, symptom: Symptom, value: &str) -> Self {
        self.insert(symptom.key(), FactValue::Category(value.to_string()));
        self
    }

    /// Constrói os fatos a partir de um formulário HTML (todos os campos são texto).
    ///
    /// Sintomas de escala são convertidos para número; texto não numérico
    /// (inclusive `NaN` e `inf`) é mantido como categoria para que a
    /// validação o reporte.
    /// Campos vazios são ignorados.
    pub fn from_form(fields: &HashMap<String, String>) -> Self {
        let mut facts = Facts::new();
        for (key, raw) in fields {
            let raw = raw.trim();
            if raw.is_empty() {
                continue;
            }
            let numeric = Symptom::from_key(key).is_some_and(Symptom::is_numeric);
            let value = match raw.parse::<f64>() {
                Ok(n) if numeric && n.is_finite() => FactValue::Number(n),
                _ => FactValue::Category(raw.to_string()),
            };
            facts.insert(key.clone(), value);
        }
        facts
    }

    pub fn get(&self, key: &str) -> Option<&FactValue> {
        self.values.get(key)
    }

    /// Leitura numérica estrita: ausente → `0`, categoria → erro.
    pub fn number(&self, symptom: Symptom) -> Result<f64, FactError> {
        match self.values.get(symptom.key()) {
            None => Ok(SCALE_MIN),
            Some(FactValue::Number(n)) => Ok(*n),
            Some(FactValue::Category(c)) => Err(FactError::ExpectedNumber {
                symptom: symptom.key(),
                found: c.clone(),
            }),
        }
    }

    /// Leitura categórica estrita: ausente → `"no"`, número → erro.
    pub fn category(&self, symptom: Symptom) -> Result<&str, FactError> {
        match self.values.get(symptom.key()) {
            None => Ok(ABSENT_CATEGORY),
            Some(FactValue::Category(c)) => Ok(c.as_str()),
            Some(FactValue::Number(n)) => Err(FactError::ExpectedCategory {
                symptom: symptom.key(),
                found: *n,
            }),
        }
    }

    /// Leitura numérica tolerante: qualquer valor não numérico vale `0`.
    pub fn level(&self, symptom: Symptom) -> f64 {
        self.number(symptom).unwrap_or(SCALE_MIN)
    }

    /// Comparação categórica tolerante.
    pub fn is(&self, symptom: Symptom, value: &str) -> bool {
        self.category(symptom).is_ok_and(|c| c == value)
    }

    /// Comparação categórica tolerante contra um conjunto de valores.
    pub fn is_one_of(&self, symptom: Symptom, values: &[&str]) -> bool {
        self.category(symptom).is_ok_and(|c| values.contains(&c))
    }

    /// Número de fatos informados (inclui chaves desconhecidas).
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FactValue)> {
        self.values.iter()
    }
}

impl From<BTreeMap<String, FactValue>> for Facts {
    fn from(raw: BTreeMap<String, FactValue>) -> Self {
        let mut facts = Facts::new();
        for (key, value) in raw {
            facts.insert(key, value);
        }
        facts
    }
}

impl From<Facts> for BTreeMap<String, FactValue> {
    fn from(facts: Facts) -> Self {
        facts.values
    }
}
