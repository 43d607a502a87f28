//! # Configuração
//!
//! Lida uma única vez na inicialização, a partir de variáveis de ambiente:
//!
//! | Variável | Padrão | Uso |
//! |----------|--------|-----|
//! | `DIAGNOSTICO_ADDR` | `0.0.0.0:3000` | endereço do servidor HTTP |
//! | `DIAGNOSTICO_HISTORIAL` | `data/historial.json` | arquivo do histórico |
//! | `DIAGNOSTICO_FUZZY` | `completo` | pipeline difuso (`completo` ou `lineal`) |
//! | `DIAGNOSTICO_ESTRATEGIA` | `combine` | estratégia padrão de resolução |
//!
//! O nível de log continua controlado por `RUST_LOG`.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};

use crate::inference::{FuzzyMode, Strategy};
use crate::persistence::DEFAULT_HISTORY_PATH;

const DEFAULT_ADDR: &str = "0.0.0.0:3000";

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub addr: SocketAddr,
    pub history_path: PathBuf,
    pub fuzzy_mode: FuzzyMode,
    /// Estratégia usada quando a requisição não informa outra.
    pub strategy: Strategy,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let addr = lookup("DIAGNOSTICO_ADDR").unwrap_or_else(|| DEFAULT_ADDR.to_string());
        let addr: SocketAddr = addr
            .parse()
            .with_context(|| format!("DIAGNOSTICO_ADDR inválido: {addr}"))?;

        let history_path = lookup("DIAGNOSTICO_HISTORIAL")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_HISTORY_PATH));

        let fuzzy_mode = match lookup("DIAGNOSTICO_FUZZY") {
            None => FuzzyMode::default(),
            Some(raw) => FuzzyMode::parse(&raw)
                .ok_or_else(|| anyhow!("DIAGNOSTICO_FUZZY inválido: {raw} (use completo ou lineal)"))?,
        };

        let strategy = lookup("DIAGNOSTICO_ESTRATEGIA")
            .map(|raw| Strategy::named(&raw))
            .unwrap_or_default();
        if let Strategy::Unknown(name) = &strategy {
            tracing::warn!(strategy = %name, "estratégia padrão desconhecida, ativações serão repassadas sem resolução");
        }

        Ok(Self {
            addr,
            history_path,
            fuzzy_mode,
            strategy,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.addr.port(), 3000);
        assert_eq!(config.history_path, PathBuf::from("data/historial.json"));
        assert_eq!(config.fuzzy_mode, FuzzyMode::Complete);
        assert_eq!(config.strategy, Strategy::Combine);
    }

    #[test]
    fn overrides() {
        let config = config(&[
            ("DIAGNOSTICO_ADDR", "127.0.0.1:8080"),
            ("DIAGNOSTICO_HISTORIAL", "/tmp/h.json"),
            ("DIAGNOSTICO_FUZZY", "lineal"),
            ("DIAGNOSTICO_ESTRATEGIA", "recent"),
        ])
        .unwrap();
        assert_eq!(config.addr.to_string(), "127.0.0.1:8080");
        assert_eq!(config.history_path, PathBuf::from("/tmp/h.json"));
        assert_eq!(config.fuzzy_mode, FuzzyMode::Linear);
        assert_eq!(config.strategy, Strategy::Recency);
    }

    #[test]
    fn invalid_values_are_errors() {
        assert!(config(&[("DIAGNOSTICO_ADDR", "porta")]).is_err());
        assert!(config(&[("DIAGNOSTICO_FUZZY", "quantico")]).is_err());
    }
}
