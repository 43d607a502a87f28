//! # Encadeamento Para Frente
//!
//! O [`ForwardChainer`] aplica a [`RuleBase`] crisp sobre um [`Facts`]
//! em **uma única passada**:
//!
//! ```text
//! para cada regra, na ordem da base:
//!   avalia condições (E com curto-circuito)
//!   ├── Ok(true)  → registra ativação crisp
//!   ├── Ok(false) → segue
//!   └── Err(_)    → regra não dispara, falha registrada, segue
//! ```
//!
//! Não há geração de fatos derivados nem reavaliação: as conclusões nunca
//! alimentam outras regras. Todas as regras que casam são coletadas, sem
//! corte por "primeira que casa".

use crate::core::{Facts, Origin, RuleActivation};

use super::rules::RuleBase;

/// Resultado de uma passada do encadeamento.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Chaining {
    /// Ativações na ordem da base de regras.
    pub activations: Vec<RuleActivation>,
    /// Fatos presentes na memória de trabalho.
    pub facts_used: usize,
    /// Regras descartadas por erro de leitura de fato.
    pub faults: usize,
}

impl Chaining {
    /// Nomes das regras que dispararam.
    pub fn fired_rules(&self) -> Vec<&str> {
        self.activations.iter().map(|a| a.rule.as_str()).collect()
    }

    /// Cadeia de raciocínio de um diagnóstico: as ativações que o concluem.
    pub fn chain_for<'a>(&'a self, diagnosis: &'a str) -> impl Iterator<Item = &'a RuleActivation> + 'a {
        self.activations.iter().filter(move |a| a.diagnosis == diagnosis)
    }

    pub fn into_activations(self) -> Vec<RuleActivation> {
        self.activations
    }
}

/// Avaliador sem estado; recebe a base por referência.
pub struct ForwardChainer;

impl ForwardChainer {
    pub fn run(base: &RuleBase, facts: &Facts) -> Chaining {
        let mut chaining = Chaining {
            facts_used: facts.len(),
            ..Chaining::default()
        };

        for rule in base.rules() {
            match rule.evaluate(facts) {
                Ok(true) => chaining.activations.push(RuleActivation::new(
                    rule.conclusion,
                    rule.confidence,
                    rule.name,
                    Origin::Crisp,
                )),
                Ok(false) => {}
                Err(error) => {
                    chaining.faults += 1;
                    tracing::debug!(rule = rule.name, %error, "regra ignorada por fato inválido");
                }
            }
        }

        tracing::debug!(
            fired = chaining.activations.len(),
            faults = chaining.faults,
            "encadeamento concluído"
        );
        chaining
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Symptom;
    use crate::inference::rules::{Condition, CrispRule};

    fn base() -> RuleBase {
        RuleBase::new(vec![
            CrispRule {
                name: "A",
                conditions: vec![Condition::AtLeast(Symptom::PainIntensity, 5.0)],
                conclusion: "pulpitis",
                confidence: 0.7,
            },
            CrispRule {
                name: "B",
                conditions: vec![Condition::Is(Symptom::Fever, "si")],
                conclusion: "absceso",
                confidence: 0.8,
            },
            CrispRule {
                name: "C",
                conditions: vec![Condition::AtLeast(Symptom::HeatSensitivity, 5.0)],
                conclusion: "pulpitis",
                confidence: 0.9,
            },
        ])
    }

    #[test]
    fn collects_every_firing_rule_in_order() {
        let facts = Facts::new()
            .with_number(Symptom::PainIntensity, 8.0)
            .with_number(Symptom::HeatSensitivity, 6.0);
        let chaining = ForwardChainer::run(&base(), &facts);
        assert_eq!(chaining.fired_rules(), vec!["A", "C"]);
        assert!(chaining
            .activations
            .iter()
            .all(|a| a.origin == Origin::Crisp));
        assert_eq!(chaining.chain_for("pulpitis").count(), 2);
        assert_eq!(chaining.facts_used, 2);
    }

    /// Uma regra com fato de tipo errado não dispara, mas as demais seguem
    #[test]
    fn faulty_rule_is_isolated() {
        let facts = Facts::new()
            .with_category(Symptom::PainIntensity, "mucho")
            .with_category(Symptom::Fever, "si")
            .with_number(Symptom::HeatSensitivity, 9.0);
        let chaining = ForwardChainer::run(&base(), &facts);
        assert_eq!(chaining.fired_rules(), vec!["B", "C"]);
        assert_eq!(chaining.faults, 1);
    }

    #[test]
    fn evaluation_is_repeatable() {
        let facts = Facts::new()
            .with_category(Symptom::VisibleCaries, "si")
            .with_number(Symptom::SweetSensitivity, 8.0)
            .with_category(Symptom::PainType, "agudo")
            .with_number(Symptom::PainIntensity, 5.0);
        let base = RuleBase::standard();
        let first = ForwardChainer::run(&base, &facts);
        let second = ForwardChainer::run(&base, &facts);
        assert_eq!(first, second);
        assert_eq!(first.fired_rules(), vec!["Caries con síntomas claros"]);
    }
}
