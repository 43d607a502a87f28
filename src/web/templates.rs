//! # Templates Maud: HTML Server-Side Rendering
//!
//! O formulário é gerado a partir do esquema de sintomas
//! ([`Symptom::ALL`] e [`Symptom::domain`]): escalas viram `range`,
//! domínios categóricos viram `select`. Nada é escrito à mão por sintoma
//! além do rótulo exibido.
//!
//! | Função | Tipo | Descrição |
//! |--------|------|-----------|
//! | [`form_page()`] | Página completa | Formulário de sintomas |
//! | [`result_fragment()`] | Fragment HTMX | Resultado injetado em `#resultado` |
//! | [`report_page()`] | Página completa | Relatório imprimível de um registro |
//! | [`not_found_page()`] | Página completa | Registro inexistente |
//!
//! ## Layout (`form_page`)
//!
//! ```text
//! ┌──────────────── nav-bar ────────────────────┐
//! │ 🦷 Diagnóstico Dental                        │
//! ├──────────────────────────┬──────────────────┤
//! │ Paciente / opções        │                  │
//! │ ┌ Dolor ───────────────┐ │   #resultado     │
//! │ │ range / select ...   │ │  (fragment HTMX) │
//! │ └──────────────────────┘ │                  │
//! │ ┌ Encías ... ──────────┐ │                  │
//! │ [ Diagnosticar ]         │                  │
//! └──────────────────────────┴──────────────────┘
//! ```

use maud::{html, Markup, DOCTYPE};
use uuid::Uuid;

use crate::core::facts::Domain;
use crate::core::{DiagnosisResult, EnrichedDiagnosis, Symptom, Urgency};
use crate::inference::Strategy;
use crate::orchestrator::ValidationReport;
use crate::persistence::DiagnosisRecord;

const HTMX_SRC: &str = "https://unpkg.com/htmx.org@2.0.4";

/// Estratégias oferecidas no formulário.
const STRATEGIES: [Strategy; 4] = [
    Strategy::Combine,
    Strategy::Highest,
    Strategy::Specific,
    Strategy::Recency,
];

/// Agrupamento visual dos sintomas no formulário.
const SECTIONS: &[(&str, &[Symptom])] = &[
    (
        "Dolor",
        &[
            Symptom::PainType,
            Symptom::PainIntensity,
            Symptom::PainDuration,
            Symptom::ChewingPain,
            Symptom::PressurePain,
            Symptom::NightPain,
            Symptom::JawPain,
        ],
    ),
    (
        "Sensibilidad",
        &[
            Symptom::ColdSensitivity,
            Symptom::HeatSensitivity,
            Symptom::SweetSensitivity,
        ],
    ),
    (
        "Encías",
        &[
            Symptom::GumInflammation,
            Symptom::GumBleeding,
            Symptom::GumColor,
            Symptom::GumRecession,
            Symptom::ToothMobility,
        ],
    ),
    (
        "Estado del diente",
        &[
            Symptom::VisibleCaries,
            Symptom::DarkStain,
            Symptom::ToothFracture,
            Symptom::ToothWear,
            Symptom::TeethGrinding,
            Symptom::BiteProblems,
        ],
    ),
    (
        "Infección",
        &[
            Symptom::FacialSwelling,
            Symptom::VisiblePus,
            Symptom::BadBreath,
            Symptom::Fever,
        ],
    ),
    (
        "Antecedentes",
        &[
            Symptom::RecentTreatment,
            Symptom::TreatmentTime,
            Symptom::RecentTrauma,
        ],
    ),
];

/// Pergunta exibida para cada sintoma.
fn symptom_label(symptom: Symptom) -> &'static str {
    match symptom {
        Symptom::PainType => "Tipo de dolor",
        Symptom::PainIntensity => "Intensidad del dolor",
        Symptom::PainDuration => "Duración del dolor",
        Symptom::ColdSensitivity => "Sensibilidad al frío",
        Symptom::HeatSensitivity => "Sensibilidad al calor",
        Symptom::SweetSensitivity => "Sensibilidad a lo dulce",
        Symptom::ChewingPain => "Dolor al masticar",
        Symptom::PressurePain => "Dolor a la presión",
        Symptom::NightPain => "Dolor nocturno",
        Symptom::GumInflammation => "Inflamación de encías",
        Symptom::GumBleeding => "Sangrado de encías",
        Symptom::GumColor => "Color de encías",
        Symptom::GumRecession => "Retracción de encías",
        Symptom::VisibleCaries => "¿Caries visible?",
        Symptom::DarkStain => "¿Mancha oscura?",
        Symptom::ToothFracture => "¿Diente fracturado?",
        Symptom::ToothWear => "Desgaste dental",
        Symptom::FacialSwelling => "¿Hinchazón en la cara?",
        Symptom::VisiblePus => "¿Pus visible?",
        Symptom::BadBreath => "Mal aliento",
        Symptom::Fever => "¿Fiebre?",
        Symptom::ToothMobility => "Movilidad dental",
        Symptom::TeethGrinding => "¿Rechina los dientes?",
        Symptom::JawPain => "Dolor de mandíbula",
        Symptom::BiteProblems => "¿Problemas de mordida?",
        Symptom::RecentTreatment => "¿Tratamiento reciente?",
        Symptom::TreatmentTime => "Tiempo desde el tratamiento",
        Symptom::RecentTrauma => "¿Golpe o trauma reciente?",
    }
}

fn urgency_class(urgency: Urgency) -> &'static str {
    match urgency {
        Urgency::Emergencia | Urgency::Urgente => "urgency urgency-high",
        Urgency::Alta => "urgency urgency-medium",
        Urgency::Moderada => "urgency urgency-moderate",
        Urgency::Baja | Urgency::Desconocida => "urgency urgency-low",
    }
}

fn head(title: &str) -> Markup {
    html! {
        head {
            meta charset="UTF-8";
            meta name="viewport" content="width=device-width, initial-scale=1.0";
            title { (title) }
            link rel="stylesheet" href="/assets/style.css";
            script src=(HTMX_SRC) {}
        }
    }
}

fn nav_bar() -> Markup {
    html! {
        nav class="nav-bar" {
            a href="/" class="nav-brand" {
                span class="nav-brand-icon" { "🦷" }
                span class="nav-brand-text" { "Diagnóstico " em { "Dental" } }
            }
            div class="nav-links" {
                a href="/" class="nav-link" { "Nuevo diagnóstico" }
                a href="/api/historial" class="nav-link" { "Historial (JSON)" }
                a href="/api/estadisticas" class="nav-link" { "Estadísticas (JSON)" }
            }
        }
    }
}

/// Campo de entrada de um sintoma, derivado do seu domínio.
fn symptom_field(symptom: Symptom) -> Markup {
    let key = symptom.key();
    html! {
        div class="field" {
            label for=(key) { (symptom_label(symptom)) }
            @match symptom.domain() {
                Domain::Scale { min, max } => {
                    div class="scale" {
                        input type="range" id=(key) name=(key) min=(min) max=(max) step="1" value=(min)
                            oninput="this.nextElementSibling.value = this.value";
                        output { (min) }
                    }
                }
                Domain::Categories(options) => {
                    select id=(key) name=(key) {
                        option value="" { "Sin respuesta" }
                        @for choice in options.iter() {
                            option value=(choice) { (choice.replace('_', " ")) }
                        }
                    }
                }
            }
        }
    }
}

/// Página principal: formulário de sintomas e área de resultado.
pub fn form_page(default_strategy: &Strategy) -> Markup {
    html! {
        (DOCTYPE)
        html lang="es" {
            (head("Sistema Experto de Diagnóstico Dental"))
            body {
                div class="app-shell" {
                    (nav_bar())
                    div class="app-container" {
                        form class="symptom-form" hx-post="/diagnostico" hx-target="#resultado" hx-swap="innerHTML" {
                            fieldset class="options" {
                                legend { "Consulta" }
                                div class="field" {
                                    label for="paciente" { "Paciente" }
                                    input type="text" id="paciente" name="paciente" placeholder="anónimo";
                                }
                                div class="field" {
                                    label for="estrategia" { "Resolución de conflictos" }
                                    select id="estrategia" name="estrategia" {
                                        @for strategy in &STRATEGIES {
                                            option value=(strategy.label()) selected[strategy == default_strategy] {
                                                (strategy.label())
                                            }
                                        }
                                    }
                                }
                                div class="field checkbox" {
                                    input type="checkbox" id="usar_fuzzy" name="usar_fuzzy" checked;
                                    label for="usar_fuzzy" { "Usar lógica difusa" }
                                }
                            }
                            @for (title, symptoms) in SECTIONS {
                                fieldset {
                                    legend { (title) }
                                    @for symptom in symptoms.iter() {
                                        (symptom_field(*symptom))
                                    }
                                }
                            }
                            button type="submit" class="primary" { "Diagnosticar" }
                        }
                        section id="resultado" class="result-panel" {
                            p class="muted" {
                                "Complete los síntomas y pulse Diagnosticar. "
                                "El resultado es orientativo y no sustituye la consulta odontológica."
                            }
                        }
                    }
                }
            }
        }
    }
}

fn diagnosis_card(diagnosis: &EnrichedDiagnosis, principal: bool) -> Markup {
    html! {
        article class=(if principal { "diagnosis principal" } else { "diagnosis" }) {
            header {
                h3 { (diagnosis.name) }
                span class="confidence" { (diagnosis.confidence_pct) "%" }
            }
            div class="confidence-bar" {
                div style={ "width: " (diagnosis.confidence_pct) "%" } {}
            }
            @if !diagnosis.description.is_empty() {
                p { (diagnosis.description) }
            }
            p class="meta" {
                "Gravedad: " (diagnosis.severity.label())
                " · Urgencia: " (diagnosis.urgency.label())
                " · " (diagnosis.rule)
            }
            @if principal && !diagnosis.recommendations.is_empty() {
                h4 { "Recomendaciones" }
                ol {
                    @for recommendation in &diagnosis.recommendations {
                        li { (recommendation) }
                    }
                }
            }
        }
    }
}

fn diagnoses(result: &DiagnosisResult) -> Markup {
    html! {
        @if let Some(principal) = &result.principal {
            (diagnosis_card(principal, true))
        }
        @if !result.alternatives().is_empty() {
            h4 { "Diagnósticos alternativos" }
            @for alternative in result.alternatives() {
                (diagnosis_card(alternative, false))
            }
        }
    }
}

/// Fragmento HTMX com o resultado de um diagnóstico recém-registrado.
pub fn result_fragment(record: &DiagnosisRecord, validation: &ValidationReport) -> Markup {
    let urgency = record.result.urgency_level();
    html! {
        div class="result" {
            @if !validation.valid {
                div class="warnings" {
                    @for warning in &validation.warnings {
                        p { "⚠ " (warning) }
                    }
                }
            }
            div class=(urgency_class(urgency)) { (urgency.message()) }
            (diagnoses(&record.result))
            p class="meta" {
                (record.result.facts_evaluated) " síntomas evaluados"
                @if record.result.uses_fuzzy { " · con lógica difusa" }
            }
            a class="button" href={ "/reporte/" (record.id.to_string()) } target="_blank" { "Ver reporte imprimible" }
        }
    }
}

/// Relatório imprimível de um diagnóstico salvo.
pub fn report_page(record: &DiagnosisRecord) -> Markup {
    let explanation = record.result.explanation(&record.facts);
    let urgency = record.result.urgency_level();
    html! {
        (DOCTYPE)
        html lang="es" {
            (head("Reporte de Diagnóstico Dental"))
            body class="report" {
                header class="report-header" {
                    h1 { "Reporte de Diagnóstico Dental" }
                    p {
                        "Paciente: " strong { (record.patient) }
                        " · Fecha: " (record.created_at.format("%d/%m/%Y %H:%M UTC").to_string())
                    }
                    p class="muted" { "Registro " (record.id.to_string()) }
                    button class="no-print" onclick="window.print()" { "Imprimir" }
                }

                section {
                    h2 { "Síntomas reportados" }
                    table {
                        thead { tr { th { "Síntoma" } th { "Clave" } th { "Valor" } } }
                        tbody {
                            @for (key, value) in record.facts.iter() {
                                tr {
                                    td { (Symptom::from_key(key).map_or(key.as_str(), |s| symptom_label(s))) }
                                    td { code { (key) } }
                                    td { (value.to_string()) }
                                }
                            }
                        }
                    }
                }

                section {
                    h2 { "Resultado" }
                    div class=(urgency_class(urgency)) { (urgency.message()) }
                    (diagnoses(&record.result))
                }

                section {
                    h2 { "Explicación" }
                    @for paragraph in explanation.reasoning.split("\n\n") {
                        p { (paragraph) }
                    }
                    @if !explanation.key_symptoms.is_empty() {
                        h4 { "Síntomas clave" }
                        ul {
                            @for key in &explanation.key_symptoms {
                                li { code { (key.symptom) } ": " (key.value.to_string()) }
                            }
                        }
                    }
                    h4 { "Reglas aplicadas" }
                    ul {
                        @for rule in &explanation.applied_rules {
                            li { (rule) }
                        }
                    }
                }

                footer class="muted" {
                    "Este reporte es orientativo y no sustituye la evaluación de un odontólogo."
                }
            }
        }
    }
}

/// Página de registro inexistente.
pub fn not_found_page(id: Uuid) -> Markup {
    html! {
        (DOCTYPE)
        html lang="es" {
            (head("Reporte no encontrado"))
            body {
                div class="app-shell" {
                    (nav_bar())
                    div class="app-container" {
                        section class="result-panel" {
                            h2 { "Reporte no encontrado" }
                            p { "No existe un diagnóstico registrado con id " code { (id.to_string()) } "." }
                            a class="button" href="/" { "Volver al formulario" }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{EnrichedDiagnosis, FactValue, Facts, Origin, RuleActivation};
    use crate::persistence::HistoryStore;

    fn record() -> DiagnosisRecord {
        let facts = Facts::new()
            .with_number(Symptom::PainIntensity, 8.0)
            .with_category(Symptom::FacialSwelling, "si");
        let result = DiagnosisResult::new(
            vec![
                EnrichedDiagnosis::from_activation(RuleActivation::new("absceso", 0.95, "Absceso dental con infección", Origin::Crisp)),
                EnrichedDiagnosis::from_activation(RuleActivation::new("pulpitis", 0.6, "Lógica difusa - Pulpitis", Origin::Fuzzy)),
            ],
            facts.len(),
            true,
        );
        let mut store = HistoryStore::new(std::env::temp_dir().join("nao-usado.json"));
        store.record(Some("Ana"), facts, result).clone()
    }

    #[test]
    fn form_selects_default_strategy() {
        let page = form_page(&Strategy::Recency).into_string();
        assert!(page.contains(r#"<option value="recency" selected>"#));
        assert!(page.contains(r#"hx-post="/diagnostico""#));
        assert!(page.contains(r#"type="range" id="intensidad_dolor""#));
    }

    #[test]
    fn every_symptom_appears_in_one_section() {
        let mut listed: Vec<Symptom> = SECTIONS.iter().flat_map(|(_, s)| s.iter().copied()).collect();
        listed.sort();
        let mut all = Symptom::ALL.to_vec();
        all.sort();
        assert_eq!(listed, all);
    }

    #[test]
    fn fragment_shows_warnings_and_report_link() {
        let record = record();
        let validation = ValidationReport {
            valid: false,
            warnings: vec!["Valor inválido".to_string()],
        };
        let html = result_fragment(&record, &validation).into_string();
        assert!(html.contains("Valor inválido"));
        assert!(html.contains("Absceso Dental Agudo"));
        assert!(html.contains("Diagnósticos alternativos"));
        assert!(html.contains(&format!("/reporte/{}", record.id)));
        assert!(html.contains("urgency-high"));
    }

    #[test]
    fn report_lists_facts_and_reasoning() {
        let html = report_page(&record()).into_string();
        assert!(html.contains("Ana"));
        assert!(html.contains("Intensidad del dolor"));
        assert!(html.contains("hinchazon_cara"));
        assert!(html.contains("Otros diagnósticos posibles incluyen: Pulpitis Irreversible"));
        assert!(html.contains("Lógica difusa - Pulpitis"));
    }

    /// Chaves fora do esquema aparecem pelo próprio nome
    #[test]
    fn report_labels_unknown_keys_by_name() {
        let mut record = record();
        record
            .facts
            .insert("nota_libre", FactValue::Category("diente superior".into()));
        let html = report_page(&record).into_string();
        assert!(html.contains("<td>nota_libre</td>"));
        assert!(!html.contains("<td>Sensibilidad al frío</td>"));
        assert!(html.contains("<td>Intensidad del dolor</td>"));
    }
}
