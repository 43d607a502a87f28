//! # Handlers HTTP
//!
//! Cada função pública neste módulo é um handler Axum, mapeado a uma
//! rota em [`super::create_router()`].
//!
//! | Handler | Método | Retorno | Uso |
//! |---------|--------|---------|-----|
//! | `index` | GET | HTML completo | Formulário de sintomas |
//! | `diagnose_form` | POST | HTMX fragment | Resultado do formulário |
//! | `report` | GET | HTML completo | Relatório imprimível |
//! | `diagnose_json` | POST | JSON | Diagnóstico via API |
//! | `validate` | POST | JSON | Apenas validação |
//! | `history` | GET | JSON | Histórico (filtro por paciente) |
//! | `history_csv` | GET | CSV | Exportação do histórico |
//! | `patients` | GET | JSON | Busca de pacientes por nome |
//! | `stats` | GET | JSON | Estatísticas do histórico |
//! | `status` | GET | JSON | Saúde do serviço |
//!
//! ## Fluxo de um Diagnóstico
//!
//! ```text
//! 1. Entrada (form ou JSON) → Facts
//! 2. validate(facts)          → avisos (não bloqueiam)
//! 3. engine.diagnose(...)     → DiagnosisResult
//! 4. history.record           → write lock só para o registro
//!    history.save (blocking)  → read lock; falha só vai para o log
//! 5. Renderiza HTML / JSON
//! ```

use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::state::AppState;
use super::templates;
use crate::core::{DiagnosisResult, Explanation, Facts, Summary, Urgency};
use crate::inference::Strategy;
use crate::orchestrator::{self, ValidationReport};
use crate::persistence::{DiagnosisRecord, HistoryStats, PatientMatch};

/// Campos do formulário que não são sintomas.
const FIELD_PATIENT: &str = "paciente";
const FIELD_USE_FUZZY: &str = "usar_fuzzy";
const FIELD_STRATEGY: &str = "estrategia";

/// Converte Maud Markup em resposta Html<String> do Axum.
fn markup_to_html(m: maud::Markup) -> Html<String> {
    Html(m.into_string())
}

/// Requisição de `/api/diagnostico`.
#[derive(Debug, Deserialize)]
pub struct DiagnosisRequest {
    pub sintomas: Facts,
    #[serde(default = "default_use_fuzzy")]
    pub usar_fuzzy: bool,
    #[serde(default)]
    pub estrategia: Option<String>,
    #[serde(default)]
    pub paciente: Option<String>,
}

fn default_use_fuzzy() -> bool {
    true
}

/// Resposta de `/api/diagnostico`: o resultado mais os serviços derivados.
#[derive(Debug, Serialize)]
pub struct DiagnosisResponse {
    pub id: Uuid,
    #[serde(flatten)]
    pub resultado: DiagnosisResult,
    pub urgencia: Urgency,
    pub validacion: ValidationReport,
    pub resumen: Summary,
    pub explicacion: Explanation,
}

/// Requisição de `/api/validar`.
#[derive(Debug, Deserialize)]
pub struct ValidationRequest {
    pub sintomas: Facts,
}

/// Filtro de `/api/historial`.
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub paciente: Option<String>,
}

/// Busca de `/api/pacientes`.
#[derive(Debug, Deserialize)]
pub struct PatientQuery {
    #[serde(default)]
    pub q: String,
}

/// Resposta de `/status`.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub ready: bool,
    pub reglas: usize,
    pub modo_fuzzy: String,
    pub estrategia: String,
    pub diagnosticos_registrados: usize,
}

/// Diagnostica, registra no histórico e persiste.
///
/// O write lock cobre só o registro em memória. A gravação do arquivo roda
/// em `spawn_blocking` sob read lock; a falha é registrada e não afeta o
/// resultado.
async fn run_diagnosis(
    state: &AppState,
    facts: Facts,
    use_fuzzy: bool,
    strategy: &Strategy,
    patient: Option<&str>,
) -> DiagnosisRecord {
    let result = state.engine.diagnose(&facts, use_fuzzy, strategy);
    let record = state.history.write().record(patient, facts, result).clone();

    let history = state.history.clone();
    match tokio::task::spawn_blocking(move || history.read().save()).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => tracing::error!(error = %e, "Falha ao salvar histórico após diagnóstico"),
        Err(e) => tracing::error!(error = %e, "Tarefa de gravação do histórico abortada"),
    }
    record
}

fn strategy_or_default(state: &AppState, raw: Option<&str>) -> Strategy {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(name) => Strategy::named(name),
        None => state.strategy.clone(),
    }
}

/// GET `/`: Formulário de sintomas.
pub async fn index(State(state): State<AppState>) -> Html<String> {
    markup_to_html(templates::form_page(&state.strategy))
}

/// POST `/diagnostico`: Diagnóstico a partir do formulário HTML.
///
/// O HTMX injeta o fragmento retornado em `#resultado`.
pub async fn diagnose_form(
    State(state): State<AppState>,
    axum::Form(mut form): axum::Form<HashMap<String, String>>,
) -> Html<String> {
    let patient = form.remove(FIELD_PATIENT);
    let use_fuzzy = form.remove(FIELD_USE_FUZZY).is_some();
    let strategy = strategy_or_default(&state, form.remove(FIELD_STRATEGY).as_deref());

    let facts = Facts::from_form(&form);
    let validation = orchestrator::validate(&facts);
    let record = run_diagnosis(&state, facts, use_fuzzy, &strategy, patient.as_deref()).await;

    markup_to_html(templates::result_fragment(&record, &validation))
}

/// POST `/api/diagnostico`: Diagnóstico via JSON.
pub async fn diagnose_json(
    State(state): State<AppState>,
    Json(request): Json<DiagnosisRequest>,
) -> Json<DiagnosisResponse> {
    let strategy = strategy_or_default(&state, request.estrategia.as_deref());
    let validation = orchestrator::validate(&request.sintomas);
    let record = run_diagnosis(
        &state,
        request.sintomas,
        request.usar_fuzzy,
        &strategy,
        request.paciente.as_deref(),
    )
    .await;

    Json(DiagnosisResponse {
        id: record.id,
        urgencia: record.result.urgency_level(),
        validacion: validation,
        resumen: record.result.summary(),
        explicacion: record.result.explanation(&record.facts),
        resultado: record.result,
    })
}

/// POST `/api/validar`: Apenas valida os sintomas.
pub async fn validate(Json(request): Json<ValidationRequest>) -> Json<ValidationReport> {
    Json(orchestrator::validate(&request.sintomas))
}

/// GET `/api/historial`: Histórico, do mais recente ao mais antigo.
pub async fn history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Json<Vec<DiagnosisRecord>> {
    let history = state.history.read();
    Json(
        history
            .history(query.paciente.as_deref())
            .into_iter()
            .cloned()
            .collect(),
    )
}

/// GET `/api/historial.csv`: Histórico completo em CSV.
pub async fn history_csv(State(state): State<AppState>) -> impl IntoResponse {
    let csv = state.history.read().export_csv();
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (header::CONTENT_DISPOSITION, "attachment; filename=\"historial.csv\""),
        ],
        csv,
    )
}

/// GET `/api/pacientes?q=`: Pacientes cujo nome contém o termo.
pub async fn patients(
    State(state): State<AppState>,
    Query(query): Query<PatientQuery>,
) -> Json<Vec<PatientMatch>> {
    Json(state.history.read().search(&query.q))
}

/// GET `/api/estadisticas`: Estatísticas do histórico.
pub async fn stats(State(state): State<AppState>) -> Json<HistoryStats> {
    Json(state.history.read().stats())
}

/// GET `/reporte/{id}`: Relatório imprimível de um diagnóstico salvo.
pub async fn report(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Html<String>, (StatusCode, Html<String>)> {
    let history = state.history.read();
    match history.get(id) {
        Some(record) => Ok(markup_to_html(templates::report_page(record))),
        None => Err((
            StatusCode::NOT_FOUND,
            markup_to_html(templates::not_found_page(id)),
        )),
    }
}

/// GET `/status`: Saúde do serviço.
pub async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        ready: true,
        reglas: state.engine.rules().len(),
        modo_fuzzy: state.engine.fuzzy_mode().to_string(),
        estrategia: state.strategy.to_string(),
        diagnosticos_registrados: state.history.read().len(),
    })
}

#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use axum::Router;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::inference::FuzzyMode;
    use crate::orchestrator::DiagnosisEngine;
    use crate::persistence::HistoryStore;
    use crate::web::create_router;

    fn state() -> AppState {
        let path = std::env::temp_dir()
            .join(format!("historial-web-{}", Uuid::new_v4()))
            .join("historial.json");
        AppState::new(
            DiagnosisEngine::standard(FuzzyMode::Complete),
            HistoryStore::new(path),
            Strategy::Combine,
        )
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, String) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn json_diagnosis_returns_contract_and_services() {
        let state = state();
        let request = post_json(
            "/api/diagnostico",
            json!({
                "sintomas": {
                    "hinchazon_cara": "Sí",
                    "pus_visible": "si",
                    "intensidad_dolor": 9,
                    "fiebre": "si"
                },
                "paciente": "Ana"
            }),
        );
        let (status, body) = send(create_router(state.clone()), request).await;
        assert_eq!(status, StatusCode::OK);

        let json: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["principal"]["diagnostico"], "absceso");
        assert_eq!(json["num_diagnosticos"], json["diagnosticos"].as_array().unwrap().len());
        assert_eq!(json["sintomas_evaluados"], 4);
        assert_eq!(json["usa_logica_fuzzy"], true);
        assert_eq!(json["urgencia"], "urgente");
        assert_eq!(json["validacion"]["valido"], true);
        assert_eq!(json["resumen"]["tiene_diagnostico"], true);
        assert!(json["explicacion"]["razonamiento"]
            .as_str()
            .unwrap()
            .contains("Absceso"));
        assert_eq!(state.history.read().history(Some("Ana")).len(), 1);
    }

    #[tokio::test]
    async fn json_diagnosis_honours_strategy_and_fuzzy_flag() {
        let request = post_json(
            "/api/diagnostico",
            json!({
                "sintomas": {"intensidad_dolor": 6, "sensibilidad_frio": 6},
                "usar_fuzzy": false,
                "estrategia": "highest"
            }),
        );
        let (_, body) = send(create_router(state()), request).await;
        let json: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["usa_logica_fuzzy"], false);
        assert_eq!(json["num_diagnosticos"], 1);
        assert_ne!(json["principal"]["tipo_regla"], "fuzzy");
    }

    #[tokio::test]
    async fn validation_endpoint_reports_warnings() {
        let request = post_json(
            "/api/validar",
            json!({"sintomas": {"intensidad_dolor": 14, "hinchazon_cara": "si"}}),
        );
        let (status, body) = send(create_router(state()), request).await;
        assert_eq!(status, StatusCode::OK);
        let json: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["valido"], false);
        assert_eq!(json["advertencias"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn form_diagnosis_renders_fragment_and_report() {
        let state = state();
        let form = "paciente=Luis&usar_fuzzy=on&caries_visible=si&sensibilidad_dulce=8\
                    &tipo_dolor=agudo&intensidad_dolor=5&fiebre=";
        let request = Request::builder()
            .method("POST")
            .uri("/diagnostico")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form))
            .unwrap();
        let (status, body) = send(create_router(state.clone()), request).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Caries Dental"));

        let id = state.history.read().history(Some("Luis"))[0].id;
        assert!(body.contains(&format!("/reporte/{}", id)));

        let (status, report) = send(create_router(state), get(&format!("/reporte/{}", id))).await;
        assert_eq!(status, StatusCode::OK);
        assert!(report.contains("Luis"));
        assert!(report.contains("sensibilidad_dulce"));
    }

    #[tokio::test]
    async fn unknown_report_is_not_found() {
        let (status, _) = send(
            create_router(state()),
            get(&format!("/reporte/{}", Uuid::new_v4())),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn history_and_stats_reflect_diagnoses() {
        let state = state();
        for patient in ["Ana", "Luis", "Ana"] {
            let request = post_json(
                "/api/diagnostico",
                json!({"sintomas": {}, "paciente": patient}),
            );
            send(create_router(state.clone()), request).await;
        }

        let (_, body) = send(create_router(state.clone()), get("/api/historial?paciente=Ana")).await;
        let records: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(records.as_array().unwrap().len(), 2);
        assert_eq!(records[0]["paciente"], "Ana");

        let (_, body) = send(create_router(state.clone()), get("/api/estadisticas")).await;
        let stats: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(stats["total"], 3);
        assert_eq!(stats["por_diagnostico"]["evaluacion_general"], 3);
        assert_eq!(stats["por_urgencia"]["baja"], 3);

        let (_, body) = send(create_router(state), get("/status")).await;
        let status: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(status["diagnosticos_registrados"], 3);
        assert_eq!(status["modo_fuzzy"], "completo");
    }

    #[tokio::test]
    async fn diagnosis_is_saved_to_disk() {
        let state = state();
        let request = post_json("/api/diagnostico", json!({"sintomas": {}, "paciente": "Ana"}));
        send(create_router(state.clone()), request).await;

        let path = state.history.read().path().to_path_buf();
        let reloaded = HistoryStore::load(path.clone()).unwrap();
        assert_eq!(reloaded.history(Some("Ana")).len(), 1);
        std::fs::remove_dir_all(path.parent().unwrap()).ok();
    }

    #[tokio::test]
    async fn patient_search_and_csv_export() {
        let state = state();
        for patient in ["José Pérez", "Ana", "José Pérez"] {
            let request = post_json(
                "/api/diagnostico",
                json!({"sintomas": {}, "paciente": patient}),
            );
            send(create_router(state.clone()), request).await;
        }

        let (status, body) = send(create_router(state.clone()), get("/api/pacientes?q=jose")).await;
        assert_eq!(status, StatusCode::OK);
        let found: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(found.as_array().unwrap().len(), 1);
        assert_eq!(found[0]["paciente"], "José Pérez");
        assert_eq!(found[0]["diagnosticos"], 2);

        let response = create_router(state)
            .oneshot(get("/api/historial.csv"))
            .await
            .unwrap();
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/csv; charset=utf-8"
        );
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let csv = String::from_utf8(bytes.to_vec()).unwrap();
        assert_eq!(csv.lines().count(), 4);
        assert!(csv.lines().nth(1).unwrap().starts_with("José Pérez,"));
    }

    #[tokio::test]
    async fn index_renders_every_symptom() {
        let (status, body) = send(create_router(state()), get("/")).await;
        assert_eq!(status, StatusCode::OK);
        for symptom in crate::core::Symptom::ALL {
            assert!(body.contains(&format!("name=\"{}\"", symptom.key())), "{}", symptom);
        }
    }
}
