//! # Resolução de Conflitos
//!
//! Recebe a concatenação das ativações crisp e difusas (ou do fallback) e
//! aplica a [`Strategy`] pedida pelo chamador:
//!
//! | Estratégia | Resultado |
//! |------------|-----------|
//! | `combine` (padrão) | uma ativação por diagnóstico, confiança = **máximo** do grupo |
//! | `highest` | só a ativação de maior confiança (empate: a primeira) |
//! | `specific` | igual a `highest`; não há peso por especificidade |
//! | `recency` / `recent` | só a última ativação na ordem de avaliação |
//! | desconhecida | lista repassada sem alteração |
//!
//! ```text
//! [caries 0.7 (A), pulpitis 0.6 (B), caries 0.9 (C)]
//!   combine → [caries 0.9 "Combinación de 2 reglas" {A, C}, pulpitis 0.6 (B)]
//! ```

use std::collections::HashMap;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use crate::core::{Origin, RuleActivation};

/// Estratégia de resolução.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum Strategy {
    #[default]
    Combine,
    Highest,
    Specific,
    Recency,
    /// Nome não reconhecido: repassa as ativações.
    Unknown(String),
}

impl FromStr for Strategy {
    type Err = Infallible;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Ok(match raw.trim().to_lowercase().as_str() {
            "combine" => Strategy::Combine,
            "highest" => Strategy::Highest,
            "specific" => Strategy::Specific,
            "recency" | "recent" => Strategy::Recency,
            other => Strategy::Unknown(other.to_string()),
        })
    }
}

impl Strategy {
    /// Conversão direta de um nome qualquer.
    pub fn named(raw: &str) -> Self {
        match raw.parse() {
            Ok(strategy) => strategy,
            Err(never) => match never {},
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Strategy::Combine => "combine",
            Strategy::Highest => "highest",
            Strategy::Specific => "specific",
            Strategy::Recency => "recency",
            Strategy::Unknown(name) => name,
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Aplica a estratégia. Lista vazia sempre resulta em lista vazia.
pub fn resolve(activations: Vec<RuleActivation>, strategy: &Strategy) -> Vec<RuleActivation> {
    match strategy {
        Strategy::Combine => combine(activations),
        Strategy::Highest | Strategy::Specific => highest(activations).into_iter().collect(),
        Strategy::Recency => activations.into_iter().last().into_iter().collect(),
        Strategy::Unknown(name) => {
            tracing::debug!(strategy = %name, "estratégia desconhecida, sem resolução");
            activations
        }
    }
}

fn highest(activations: Vec<RuleActivation>) -> Option<RuleActivation> {
    let mut best: Option<RuleActivation> = None;
    for activation in activations {
        match &best {
            Some(current) if activation.confidence <= current.confidence => {}
            _ => best = Some(activation),
        }
    }
    best
}

fn combine(activations: Vec<RuleActivation>) -> Vec<RuleActivation> {
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Vec<RuleActivation>> = HashMap::new();
    for activation in activations {
        let group = groups.entry(activation.diagnosis.clone()).or_insert_with(|| {
            order.push(activation.diagnosis.clone());
            Vec::new()
        });
        group.push(activation);
    }

    order
        .into_iter()
        .filter_map(|diagnosis| {
            let mut group = groups.remove(&diagnosis)?;
            if group.len() == 1 {
                return group.pop();
            }
            let confidence = group
                .iter()
                .map(|a| a.confidence)
                .fold(f64::NEG_INFINITY, f64::max);
            let mut combined = RuleActivation::new(
                diagnosis,
                confidence,
                format!("Combinación de {} reglas", group.len()),
                Origin::Combined,
            );
            combined.evidence = group;
            Some(combined)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn act(diagnosis: &str, confidence: f64, rule: &str) -> RuleActivation {
        RuleActivation::new(diagnosis, confidence, rule, Origin::Crisp)
    }

    fn sample() -> Vec<RuleActivation> {
        vec![
            act("caries", 0.7, "A"),
            act("pulpitis", 0.6, "B"),
            act("caries", 0.9, "C"),
            act("gingivitis", 0.9, "D"),
        ]
    }

    #[test]
    fn combine_keeps_group_maximum() {
        let resolved = resolve(sample(), &Strategy::Combine);
        assert_eq!(resolved.len(), 3);

        let caries = &resolved[0];
        assert_eq!(caries.diagnosis, "caries");
        assert_eq!(caries.confidence, 0.9);
        assert_eq!(caries.origin, Origin::Combined);
        assert_eq!(caries.rule, "Combinación de 2 reglas");
        assert_eq!(caries.evidence.len(), 2);

        // Grupos de uma ativação passam intactos
        assert_eq!(resolved[1], act("pulpitis", 0.6, "B"));
        assert_eq!(resolved[2], act("gingivitis", 0.9, "D"));
    }

    #[test]
    fn highest_and_specific_break_ties_by_first() {
        for strategy in [Strategy::Highest, Strategy::Specific] {
            let resolved = resolve(sample(), &strategy);
            assert_eq!(resolved, vec![act("caries", 0.9, "C")]);
        }
    }

    #[test]
    fn recency_keeps_last() {
        for name in ["recency", "recent", " Recent "] {
            let resolved = resolve(sample(), &Strategy::named(name));
            assert_eq!(resolved, vec![act("gingivitis", 0.9, "D")]);
        }
    }

    #[test]
    fn unknown_strategy_passes_through() {
        let strategy = Strategy::named("votacion");
        assert_eq!(strategy, Strategy::Unknown("votacion".into()));
        assert_eq!(resolve(sample(), &strategy), sample());
    }

    #[test]
    fn empty_input_stays_empty() {
        for name in ["combine", "highest", "specific", "recency", "x"] {
            assert!(resolve(Vec::new(), &Strategy::named(name)).is_empty());
        }
    }
}
