//! # Persistência: Histórico de Diagnósticos
//!
//! O [`HistoryStore`] guarda cada diagnóstico realizado como um
//! [`DiagnosisRecord`] e o serializa em JSON "pretty-printed" (por padrão
//! em `data/historial.json`).
//!
//! ## Formato de Armazenamento
//!
//! ```text
//! [
//!   {
//!     "id": "7b0c…",
//!     "fecha": "2026-10-19T14:03:11Z",
//!     "paciente": "Ana",
//!     "sintomas": { "intensidad_dolor": 8, ... },
//!     "resultado": { "diagnosticos": [...], ... }
//!   }
//! ]
//! ```
//!
//! ## Quando o Histórico é Salvo?
//!
//! Após cada diagnóstico registrado pela camada web. Falhas de escrita são
//! registradas em log e nunca invalidam o diagnóstico já calculado.
//!
//! A escrita **não é atômica**: um crash durante a escrita pode corromper o
//! arquivo.
//!
//! ## Consultas
//!
//! | Operação | Retorno |
//! |----------|---------|
//! | [`HistoryStore::history`] | registros, do mais recente ao mais antigo |
//! | [`HistoryStore::search`] | pacientes cujo nome contém o termo |
//! | [`HistoryStore::stats`] | contagens por diagnóstico e urgência |
//! | [`HistoryStore::export_csv`] | uma linha por diagnóstico, em CSV |

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::facts::normalize_category;
use crate::core::{DiagnosisResult, Facts};

/// Caminho padrão do histórico (relativo ao diretório de execução).
pub const DEFAULT_HISTORY_PATH: &str = "data/historial.json";

/// Nome usado quando o paciente não é informado.
pub const ANONYMOUS_PATIENT: &str = "anónimo";

/// Um diagnóstico registrado.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DiagnosisRecord {
    pub id: Uuid,
    #[serde(rename = "fecha")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "paciente")]
    pub patient: String,
    #[serde(rename = "sintomas")]
    pub facts: Facts,
    #[serde(rename = "resultado")]
    pub result: DiagnosisResult,
}

/// Estatísticas agregadas do histórico.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryStats {
    pub total: usize,
    /// Contagem por diagnóstico principal.
    #[serde(rename = "por_diagnostico")]
    pub by_diagnosis: BTreeMap<String, usize>,
    /// Contagem por urgência agregada.
    #[serde(rename = "por_urgencia")]
    pub by_urgency: BTreeMap<String, usize>,
}

/// Paciente encontrado por [`HistoryStore::search`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PatientMatch {
    #[serde(rename = "paciente")]
    pub patient: String,
    #[serde(rename = "diagnosticos")]
    pub diagnoses: usize,
    #[serde(rename = "ultima_fecha")]
    pub last_seen: DateTime<Utc>,
}

const CSV_HEADER: [&str; 7] = [
    "Paciente",
    "Fecha",
    "Diagnóstico",
    "Confianza %",
    "Gravedad",
    "Urgencia",
    "Síntomas Evaluados",
];

/// Campo CSV entre aspas quando contém separador, aspas ou quebra de linha.
fn csv_field(raw: &str) -> String {
    if raw.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", raw.replace('"', "\"\""))
    } else {
        raw.to_string()
    }
}

fn csv_line(fields: &[String]) -> String {
    let mut line = fields
        .iter()
        .map(|f| csv_field(f))
        .collect::<Vec<_>>()
        .join(",");
    line.push('\n');
    line
}

/// Histórico de diagnósticos em memória, espelhado em um arquivo JSON.
///
/// Na aplicação web fica atrás de um `parking_lot::RwLock`.
#[derive(Debug)]
pub struct HistoryStore {
    path: PathBuf,
    records: Vec<DiagnosisRecord>,
}

impl HistoryStore {
    /// Histórico vazio associado a `path` (nada é lido).
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            records: Vec::new(),
        }
    }

    /// Carrega o histórico de `path`, ou cria um vazio se o arquivo não existir.
    ///
    /// # Erros
    ///
    /// Arquivo existente mas ilegível ou corrompido.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.exists() {
            tracing::info!(path = %path.display(), "nenhum histórico encontrado, iniciando vazio");
            return Ok(Self::new(path));
        }
        let json = std::fs::read_to_string(&path)
            .with_context(|| format!("Falha ao ler {}", path.display()))?;
        let records: Vec<DiagnosisRecord> = serde_json::from_str(&json)
            .with_context(|| format!("Falha ao desserializar {}", path.display()))?;
        Ok(Self { path, records })
    }

    /// Grava o histórico completo, criando o diretório se necessário.
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Falha ao criar diretório {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(&self.records)
            .context("Falha ao serializar histórico")?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("Falha ao escrever {}", self.path.display()))?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Registra um diagnóstico e devolve o registro criado.
    pub fn record(&mut self, patient: Option<&str>, facts: Facts, result: DiagnosisResult) -> &DiagnosisRecord {
        let patient = patient
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .unwrap_or(ANONYMOUS_PATIENT)
            .to_string();
        self.records.push(DiagnosisRecord {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            patient,
            facts,
            result,
        });
        let index = self.records.len() - 1;
        &self.records[index]
    }

    /// Registros (de um paciente, se informado), do mais recente ao mais antigo.
    pub fn history(&self, patient: Option<&str>) -> Vec<&DiagnosisRecord> {
        self.records
            .iter()
            .rev()
            .filter(|r| patient.map_or(true, |p| r.patient == p))
            .collect()
    }

    pub fn get(&self, id: Uuid) -> Option<&DiagnosisRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn stats(&self) -> HistoryStats {
        let mut stats = HistoryStats {
            total: self.records.len(),
            ..HistoryStats::default()
        };
        for record in &self.records {
            if let Some(principal) = &record.result.principal {
                *stats.by_diagnosis.entry(principal.diagnosis.clone()).or_default() += 1;
            }
            let urgency = record.result.urgency_level().label().to_string();
            *stats.by_urgency.entry(urgency).or_default() += 1;
        }
        stats
    }

    /// Pacientes cujo nome contém `term`, ignorando maiúsculas e acentos.
    ///
    /// Ordenados pelo nome normalizado; termo vazio lista todos.
    pub fn search(&self, term: &str) -> Vec<PatientMatch> {
        let needle = normalize_category(term);
        let mut found: BTreeMap<(String, &str), PatientMatch> = BTreeMap::new();
        for record in &self.records {
            let name = normalize_category(&record.patient);
            if !name.contains(&needle) {
                continue;
            }
            let entry = found
                .entry((name, record.patient.as_str()))
                .or_insert_with(|| PatientMatch {
                    patient: record.patient.clone(),
                    diagnoses: 0,
                    last_seen: record.created_at,
                });
            entry.diagnoses += 1;
            entry.last_seen = entry.last_seen.max(record.created_at);
        }
        found.into_values().collect()
    }

    /// Exporta o histórico em CSV, do mais recente ao mais antigo.
    ///
    /// Registros sem diagnóstico principal saem com as colunas do
    /// diagnóstico vazias.
    pub fn export_csv(&self) -> String {
        let header: Vec<String> = CSV_HEADER.iter().map(|h| h.to_string()).collect();
        let mut csv = csv_line(&header);
        for record in self.history(None) {
            let result = &record.result;
            let (diagnosis, confidence, severity) = match &result.principal {
                Some(p) => (
                    p.name.clone(),
                    format!("{:.1}", p.confidence * 100.0),
                    p.severity.label().to_string(),
                ),
                None => Default::default(),
            };
            csv.push_str(&csv_line(&[
                record.patient.clone(),
                record.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
                diagnosis,
                confidence,
                severity,
                result.urgency_level().label().to_string(),
                result.facts_evaluated.to_string(),
            ]));
        }
        csv
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{EnrichedDiagnosis, Origin, RuleActivation, Symptom};

    fn result_for(id: &str) -> DiagnosisResult {
        let activation = RuleActivation::new(id, 0.8, "teste", Origin::Crisp);
        DiagnosisResult::new(vec![EnrichedDiagnosis::from_activation(activation)], 1, true)
    }

    fn temp_path() -> PathBuf {
        std::env::temp_dir()
            .join(format!("historial-{}", Uuid::new_v4()))
            .join("historial.json")
    }

    #[test]
    fn history_is_newest_first_and_filtered() {
        let mut store = HistoryStore::new(temp_path());
        store.record(Some("Ana"), Facts::new(), result_for("caries"));
        store.record(Some("Luis"), Facts::new(), result_for("absceso"));
        store.record(Some("Ana"), Facts::new(), result_for("gingivitis"));
        store.record(Some("  "), Facts::new(), result_for("caries"));

        let ana: Vec<&str> = store
            .history(Some("Ana"))
            .iter()
            .map(|r| r.result.principal.as_ref().unwrap().diagnosis.as_str())
            .collect();
        assert_eq!(ana, vec!["gingivitis", "caries"]);
        assert_eq!(store.history(None).len(), 4);
        assert_eq!(store.history(None)[0].patient, ANONYMOUS_PATIENT);
    }

    #[test]
    fn stats_count_principal_and_urgency() {
        let mut store = HistoryStore::new(temp_path());
        store.record(None, Facts::new(), result_for("caries"));
        store.record(None, Facts::new(), result_for("caries"));
        store.record(None, Facts::new(), result_for("absceso"));
        let stats = store.stats();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.by_diagnosis["caries"], 2);
        assert_eq!(stats.by_diagnosis["absceso"], 1);
        assert_eq!(stats.by_urgency["moderada"], 2);
        assert_eq!(stats.by_urgency["urgente"], 1);
    }

    #[test]
    fn save_then_load_restores_records() {
        let path = temp_path();
        let mut store = HistoryStore::new(&path);
        let facts = Facts::new().with_number(Symptom::PainIntensity, 7.0);
        let id = store.record(Some("Ana"), facts.clone(), result_for("pulpitis")).id;
        store.save().unwrap();

        let loaded = HistoryStore::load(&path).unwrap();
        assert_eq!(loaded.len(), 1);
        let record = loaded.get(id).unwrap();
        assert_eq!(record.facts, facts);
        assert_eq!(record.result, store.get(id).unwrap().result);

        std::fs::remove_dir_all(path.parent().unwrap()).ok();
    }

    #[test]
    fn search_matches_names_without_case_or_accents() {
        let mut store = HistoryStore::new(temp_path());
        store.record(Some("José Pérez"), Facts::new(), result_for("caries"));
        store.record(Some("Ana López"), Facts::new(), result_for("absceso"));
        store.record(Some("José Pérez"), Facts::new(), result_for("gingivitis"));
        store.record(Some("Josefina"), Facts::new(), result_for("caries"));

        let found = store.search("jose");
        let names: Vec<&str> = found.iter().map(|m| m.patient.as_str()).collect();
        assert_eq!(names, vec!["José Pérez", "Josefina"]);
        assert_eq!(found[0].diagnoses, 2);
        assert_eq!(found[0].last_seen, store.history(Some("José Pérez"))[0].created_at);

        assert_eq!(store.search("LÓPEZ").len(), 1);
        assert!(store.search("ramírez").is_empty());
        assert_eq!(store.search("").len(), 3);
    }

    #[test]
    fn csv_export_has_header_and_quoted_fields() {
        let mut store = HistoryStore::new(temp_path());
        store.record(Some("Pérez, Juan"), Facts::new(), result_for("caries"));
        store.record(Some("Ana"), Facts::new(), result_for("absceso"));

        let csv = store.export_csv();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "Paciente,Fecha,Diagnóstico,Confianza %,Gravedad,Urgencia,Síntomas Evaluados"
        );
        assert!(lines[1].starts_with("Ana,"));
        assert!(lines[1].ends_with(",Absceso Dental Agudo,80.0,muy_alta,urgente,1"));
        assert!(lines[2].starts_with("\"Pérez, Juan\","));
        assert!(lines[2].ends_with(",Caries Dental,80.0,media,moderada,1"));
    }

    #[test]
    fn csv_field_escapes_quotes() {
        assert_eq!(csv_field("simple"), "simple");
        assert_eq!(csv_field("diz \"oi\""), "\"diz \"\"oi\"\"\"");
    }

    #[test]
    fn missing_file_loads_empty() {
        let store = HistoryStore::load(temp_path()).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn corrupted_file_is_an_error() {
        let path = temp_path();
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{ não é json").unwrap();
        assert!(HistoryStore::load(&path).is_err());
        std::fs::remove_dir_all(path.parent().unwrap()).ok();
    }
}
