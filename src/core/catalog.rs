//! # Catálogo de Diagnósticos
//!
//! Dados de referência **somente leitura**: para cada identificador de
//! diagnóstico, nome de exibição, descrição, gravidade, urgência e a lista
//! ordenada de recomendações ao paciente.
//!
//! O catálogo é uma tabela estática: não há estado, nem inicialização, nem
//! lock. Qualquer número de chamadas concorrentes pode consultá-lo.
//!
//! ## Escalas Ordinais
//!
//! ```text
//! Severity: desconocida < baja < media < alta < muy_alta
//! Urgency:  desconocida < baja < moderada < alta < urgente < emergencia
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Gravidade clínica de um diagnóstico.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Placeholder para ids fora do catálogo.
    Desconocida,
    Baja,
    Media,
    Alta,
    MuyAlta,
}

impl Severity {
    pub fn label(self) -> &'static str {
        match self {
            Severity::Desconocida => "desconocida",
            Severity::Baja => "baja",
            Severity::Media => "media",
            Severity::Alta => "alta",
            Severity::MuyAlta => "muy_alta",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Urgência de atendimento de um diagnóstico.
///
/// A ordem das variantes é a prioridade usada na agregação de urgência
/// do resultado: o maior rótulo presente vence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    /// Placeholder para ids fora do catálogo.
    Desconocida,
    Baja,
    Moderada,
    Alta,
    Urgente,
    Emergencia,
}

impl Urgency {
    pub fn label(self) -> &'static str {
        match self {
            Urgency::Desconocida => "desconocida",
            Urgency::Baja => "baja",
            Urgency::Moderada => "moderada",
            Urgency::Alta => "alta",
            Urgency::Urgente => "urgente",
            Urgency::Emergencia => "emergencia",
        }
    }

    /// Mensagem de orientação exibida no resumo.
    pub fn message(self) -> &'static str {
        match self {
            Urgency::Emergencia => "🚑 EMERGENCIA: acuda a urgencias de inmediato",
            Urgency::Urgente => "🚨 ATENCIÓN URGENTE REQUERIDA",
            Urgency::Alta => "⚠️ Consulte a un odontólogo pronto",
            Urgency::Moderada => "📅 Agende una cita odontológica",
            Urgency::Baja | Urgency::Desconocida => "ℹ️ Considere una evaluación odontológica",
        }
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Entrada do catálogo.
#[derive(Debug)]
pub struct DiagnosisInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub severity: Severity,
    pub urgency: Urgency,
    pub recommendations: &'static [&'static str],
}

/// Busca a entrada de um diagnóstico.
pub fn lookup(id: &str) -> Option<&'static DiagnosisInfo> {
    CATALOG.iter().find(|info| info.id == id)
}

/// Todas as entradas, na ordem de declaração.
pub fn entries() -> &'static [DiagnosisInfo] {
    CATALOG
}

static CATALOG: &[DiagnosisInfo] = &[
    // ── Caries e lesões do esmalte ───────────────────────────────
    DiagnosisInfo {
        id: "caries",
        name: "Caries Dental",
        description: "Deterioro del esmalte y dentina causado por ácidos bacterianos",
        severity: Severity::Media,
        urgency: Urgency::Moderada,
        recommendations: &[
            "Consulte a su odontólogo lo antes posible",
            "Evite alimentos y bebidas azucaradas",
            "Mantenga higiene oral rigurosa (cepillado 3x/día)",
            "Use hilo dental diariamente",
            "Enjuague con agua tibia con sal si hay molestias",
            "No mastique del lado afectado",
        ],
    },
    DiagnosisInfo {
        id: "caries_inicial",
        name: "Caries Inicial (Etapa Temprana)",
        description: "Inicio de desmineralización del esmalte, reversible con tratamiento",
        severity: Severity::Baja,
        urgency: Urgency::Moderada,
        recommendations: &[
            "Agende cita odontológica pronto",
            "Mejore su higiene dental inmediatamente",
            "Reduzca drásticamente consumo de azúcares",
            "Use pasta dental con flúor",
            "El tratamiento temprano evita complicaciones",
            "Evite bebidas ácidas y carbonatadas",
        ],
    },
    DiagnosisInfo {
        id: "caries_profunda",
        name: "Caries Profunda",
        description: "Caries que ha alcanzado la dentina profunda, cerca de la pulpa",
        severity: Severity::Alta,
        urgency: Urgency::Alta,
        recommendations: &[
            "URGENTE: Requiere atención odontológica inmediata",
            "Puede necesitar tratamiento de conducto",
            "Evite masticar en el área afectada",
            "No consuma alimentos muy fríos o calientes",
            "Tome analgésicos si el dolor es severo",
            "No demore la consulta - riesgo de infección",
        ],
    },
    DiagnosisInfo {
        id: "caries_radicular",
        name: "Caries Radicular",
        description: "Caries en la raíz del diente expuesta por retracción gingival",
        severity: Severity::Alta,
        urgency: Urgency::Alta,
        recommendations: &[
            "Consulte a su odontólogo urgentemente",
            "Requiere tratamiento especializado",
            "Use pasta para dientes sensibles",
            "Evite cepillado agresivo",
            "Puede necesitar restauración o injerto",
            "Control periodontal es esencial",
        ],
    },
    // ── Polpa dental ─────────────────────────────────────────────
    DiagnosisInfo {
        id: "pulpitis",
        name: "Pulpitis Irreversible",
        description: "Inflamación severa de la pulpa dental que no se puede revertir",
        severity: Severity::MuyAlta,
        urgency: Urgency::Urgente,
        recommendations: &[
            "¡URGENTE! Consulte odontólogo HOY mismo",
            "Evite temperaturas extremas en alimentos",
            "Puede tomar analgésicos (ibuprofeno, paracetamol)",
            "NO aplique calor externo en la mejilla",
            "Evite masticar con el diente afectado",
            "Probablemente necesite tratamiento de conducto",
        ],
    },
    DiagnosisInfo {
        id: "pulpitis_reversible",
        name: "Pulpitis Reversible",
        description: "Inflamación leve de la pulpa que puede revertirse con tratamiento",
        severity: Severity::Media,
        urgency: Urgency::Alta,
        recommendations: &[
            "Visite a su odontólogo en 24-48 horas",
            "Evite alimentos muy fríos o calientes",
            "Puede requerir obturación profunda",
            "No ignore el síntoma - puede empeorar rápidamente",
            "Mantenga excelente higiene dental",
            "Evite dulces y ácidos",
        ],
    },
    DiagnosisInfo {
        id: "necrosis_pulpar",
        name: "Necrosis Pulpar",
        description: "Muerte del tejido pulpar, requiere tratamiento de conducto",
        severity: Severity::MuyAlta,
        urgency: Urgency::Urgente,
        recommendations: &[
            "EMERGENCIA: Atención odontológica inmediata",
            "Requiere tratamiento de conducto urgente",
            "Alto riesgo de infección y absceso",
            "NO espere - busque atención hoy",
            "Puede necesitar antibióticos",
            "Evite presionar el diente afectado",
        ],
    },
    // ── Infecções ────────────────────────────────────────────────
    DiagnosisInfo {
        id: "absceso",
        name: "Absceso Dental Agudo",
        description: "Infección aguda con acumulación de pus",
        severity: Severity::MuyAlta,
        urgency: Urgency::Urgente,
        recommendations: &[
            "¡EMERGENCIA DENTAL! Busque atención inmediata",
            "NO drene el absceso por su cuenta",
            "Enjuagues con agua tibia y sal (cada 2 horas)",
            "Tome analgésicos para el dolor",
            "Si hay fiebre >38°C, vaya a urgencias médicas",
            "Puede requerir antibióticos y drenaje quirúrgico",
        ],
    },
    DiagnosisInfo {
        id: "absceso_cronico",
        name: "Absceso Dental Crónico",
        description: "Infección de larga duración con drenaje intermitente",
        severity: Severity::Alta,
        urgency: Urgency::Alta,
        recommendations: &[
            "Consulte a su odontólogo urgentemente",
            "Requiere tratamiento definitivo pronto",
            "Enjuagues antisépticos bucales",
            "Puede necesitar extracción o endodoncia",
            "No ignore - puede causar daño óseo",
            "Evite el tabaco absolutamente",
        ],
    },
    DiagnosisInfo {
        id: "celulitis_facial",
        name: "Celulitis Facial",
        description: "Infección que se extiende a tejidos blandos faciales",
        severity: Severity::MuyAlta,
        urgency: Urgency::Emergencia,
        recommendations: &[
            "¡EMERGENCIA MÉDICA! Vaya a urgencias YA",
            "Infección grave que puede diseminarse",
            "Requiere antibióticos intravenosos",
            "Puede necesitar hospitalización",
            "NO espere - busque atención inmediata",
            "Riesgo de complicaciones sistémicas graves",
        ],
    },
    // ── Doenças periodontais ─────────────────────────────────────
    DiagnosisInfo {
        id: "gingivitis",
        name: "Gingivitis",
        description: "Inflamación de las encías causada por placa bacteriana",
        severity: Severity::Baja,
        urgency: Urgency::Moderada,
        recommendations: &[
            "Mejore técnica de cepillado (2-3 min, 3x/día)",
            "Use hilo dental TODOS los días",
            "Enjuague bucal antiséptico (clorhexidina)",
            "Agende limpieza dental profesional",
            "Evite el tabaco completamente",
            "Controle estrés y alimentación",
        ],
    },
    DiagnosisInfo {
        id: "gingivitis_aguda",
        name: "Gingivitis Aguda",
        description: "Inflamación aguda de encías con dolor y sangrado intenso",
        severity: Severity::Media,
        urgency: Urgency::Alta,
        recommendations: &[
            "Consulte a su odontólogo en 24 horas",
            "Enjuagues con agua tibia y sal frecuentes",
            "Cepillado suave pero completo",
            "Use cepillo de cerdas suaves",
            "Puede necesitar limpieza profesional urgente",
            "Evite alimentos muy duros o irritantes",
        ],
    },
    DiagnosisInfo {
        id: "periodontitis",
        name: "Periodontitis Crónica",
        description: "Enfermedad periodontal con pérdida de soporte óseo",
        severity: Severity::Alta,
        urgency: Urgency::Alta,
        recommendations: &[
            "Consulte a periodoncista URGENTEMENTE",
            "Requiere limpieza profunda (raspado/alisado radicular)",
            "Higiene oral impecable es crítica",
            "NO fume - empeora severamente",
            "Puede necesitar cirugía periodontal",
            "Control cada 3-4 meses es esencial",
        ],
    },
    DiagnosisInfo {
        id: "periodontitis_agresiva",
        name: "Periodontitis Agresiva",
        description: "Pérdida rápida de hueso y tejido periodontal",
        severity: Severity::MuyAlta,
        urgency: Urgency::Urgente,
        recommendations: &[
            "URGENTE: Atención periodontal especializada HOY",
            "Pérdida ósea rápida - no demore",
            "Requiere tratamiento agresivo inmediato",
            "Probablemente necesite antibióticos",
            "Puede necesitar cirugía",
            "Elimine tabaco y controle diabetes si la tiene",
        ],
    },
    DiagnosisInfo {
        id: "absceso_periodontal",
        name: "Absceso Periodontal",
        description: "Acumulación de pus en el tejido periodontal",
        severity: Severity::Alta,
        urgency: Urgency::Urgente,
        recommendations: &[
            "Consulte periodoncista urgentemente (hoy)",
            "Requiere drenaje y limpieza profunda",
            "Enjuagues antisépticos frecuentes",
            "Puede necesitar antibióticos",
            "NO drene usted mismo",
            "Evite presionar la zona afectada",
        ],
    },
    // ── Sensibilidade e desgaste ─────────────────────────────────
    DiagnosisInfo {
        id: "sensibilidad",
        name: "Hipersensibilidad Dentinaria",
        description: "Sensibilidad dental a estímulos térmicos o táctiles",
        severity: Severity::Baja,
        urgency: Urgency::Baja,
        recommendations: &[
            "Use pasta dental para dientes sensibles",
            "Cepillo de cerdas extra suaves",
            "Evite cepillado horizontal agresivo",
            "Limite alimentos ácidos (cítricos, refrescos)",
            "Consulte para descartar causas subyacentes",
            "Puede necesitar barniz de flúor profesional",
        ],
    },
    DiagnosisInfo {
        id: "erosion_dental",
        name: "Erosión Dental",
        description: "Pérdida de esmalte por ácidos no bacterianos",
        severity: Severity::Media,
        urgency: Urgency::Moderada,
        recommendations: &[
            "Consulte a su odontólogo",
            "Identifique fuente de ácido (reflujo, dieta, etc)",
            "Evite bebidas ácidas (sodas, jugos cítricos)",
            "Enjuague con agua después de vómitos/reflujo",
            "No cepille inmediatamente después de ácidos",
            "Puede necesitar restauraciones protectoras",
        ],
    },
    DiagnosisInfo {
        id: "abrasion_dental",
        name: "Abrasión Dental",
        description: "Desgaste dental por fricción mecánica",
        severity: Severity::Media,
        urgency: Urgency::Baja,
        recommendations: &[
            "Corrija técnica de cepillado (circular suave)",
            "Use cepillo de cerdas suaves",
            "Evite pastas abrasivas/blanqueadoras",
            "Consulte para evaluar restauraciones",
            "Identifique hábitos abrasivos",
            "Puede necesitar coronas o carillas",
        ],
    },
    // ── Trauma e fraturas ────────────────────────────────────────
    DiagnosisInfo {
        id: "fractura_dental",
        name: "Fractura Dental",
        description: "Rotura del diente por trauma o debilitamiento",
        severity: Severity::Alta,
        urgency: Urgency::Alta,
        recommendations: &[
            "Consulte a su odontólogo HOY mismo",
            "Guarde el fragmento si lo encuentra (en leche/saliva)",
            "Evite masticar en ese lado",
            "Enjuague suavemente con agua tibia",
            "Tome analgésico si hay dolor",
            "Tratamiento depende de extensión de fractura",
        ],
    },
    DiagnosisInfo {
        id: "fisura_dental",
        name: "Fisura o Grieta Dental",
        description: "Pequeña fractura en el esmalte dental",
        severity: Severity::Media,
        urgency: Urgency::Moderada,
        recommendations: &[
            "Agende cita odontológica pronto",
            "Evite alimentos muy duros",
            "No muerda hielo o objetos duros",
            "Puede necesitar corona protectora",
            "Monitoree síntomas (dolor, sensibilidad)",
            "Tratamiento temprano previene fractura completa",
        ],
    },
    // ── Transtornos funcionais ───────────────────────────────────
    DiagnosisInfo {
        id: "bruxismo",
        name: "Bruxismo",
        description: "Rechinamiento involuntario de dientes",
        severity: Severity::Media,
        urgency: Urgency::Moderada,
        recommendations: &[
            "Consulte para férula de descarga nocturna",
            "Técnicas de manejo de estrés/ansiedad",
            "Evite cafeína 4-6 horas antes de dormir",
            "Ejercicios de relajación mandibular",
            "No mastique chicle",
            "Fisioterapia de ATM si hay dolor",
        ],
    },
    DiagnosisInfo {
        id: "atm_disfuncion",
        name: "Disfunción de ATM",
        description: "Problemas en la articulación temporomandibular",
        severity: Severity::Media,
        urgency: Urgency::Moderada,
        recommendations: &[
            "Consulte especialista en ATM",
            "Dieta blanda por 2-3 semanas",
            "Evite abrir boca en exceso",
            "Compresas tibias en la articulación",
            "Antiinflamatorios si hay dolor",
            "Puede necesitar férula oclusal",
        ],
    },
    // ── Pós-tratamento ───────────────────────────────────────────
    DiagnosisInfo {
        id: "dolor_post_obturacion",
        name: "Dolor Post-Obturación",
        description: "Molestias después de empaste dental reciente",
        severity: Severity::Baja,
        urgency: Urgency::Baja,
        recommendations: &[
            "Normal hasta 2-3 días post-tratamiento",
            "Evite masticar en ese lado 24 horas",
            "Analgésicos leves si es necesario",
            "Si persiste >1 semana, contacte odontólogo",
            "Evite temperaturas extremas inicialmente",
            "Mejorará gradualmente",
        ],
    },
    DiagnosisInfo {
        id: "sensibilidad_post_tratamiento",
        name: "Sensibilidad Post-Tratamiento",
        description: "Sensibilidad temporal después de procedimiento dental",
        severity: Severity::Baja,
        urgency: Urgency::Baja,
        recommendations: &[
            "Sensibilidad temporal es común",
            "Use pasta para dientes sensibles",
            "Evite temperaturas extremas 1-2 semanas",
            "Debería mejorar en 2-4 semanas",
            "Si empeora o persiste, consulte",
            "Mantenga buena higiene oral",
        ],
    },
    DiagnosisInfo {
        id: "fracaso_endodoncia",
        name: "Fallo de Tratamiento de Conducto",
        description: "Reinfección o problemas tras endodoncia",
        severity: Severity::Alta,
        urgency: Urgency::Alta,
        recommendations: &[
            "Consulte endodoncista urgentemente",
            "Puede necesitar retratamiento",
            "Posible reinfección - requiere evaluación",
            "No demore - puede empeorar",
            "Radiografías necesarias para diagnóstico",
            "Alternativa: extracción e implante",
        ],
    },
    // ── Outros ───────────────────────────────────────────────────
    DiagnosisInfo {
        id: "ortodoncia",
        name: "Problema de Ortodoncia",
        description: "Maloclusión o desalineación dental",
        severity: Severity::Baja,
        urgency: Urgency::Baja,
        recommendations: &[
            "Consulte a ortodoncista",
            "Evaluación para tratamiento ortodóntico",
            "Mejora función masticatoria y estética",
            "Tratamiento temprano previene complicaciones",
            "Considere alineadores invisibles si prefiere",
            "Inversión en salud y autoestima",
        ],
    },
    DiagnosisInfo {
        id: "impactacion_alimentaria",
        name: "Impactación de Alimentos",
        description: "Alimentos atrapados entre dientes causando molestia",
        severity: Severity::Baja,
        urgency: Urgency::Baja,
        recommendations: &[
            "Use hilo dental para remover alimentos",
            "Irrigador bucal puede ayudar",
            "Consulte si es recurrente",
            "Puede indicar problema en contacto dental",
            "Restauraciones o ajustes pueden ser necesarios",
            "No use palillos - pueden dañar encías",
        ],
    },
    DiagnosisInfo {
        id: "evaluacion_general",
        name: "Evaluación Preventiva Recomendada",
        description: "No se detectaron problemas graves - chequeo preventivo sugerido",
        severity: Severity::Baja,
        urgency: Urgency::Baja,
        recommendations: &[
            "Mantenga chequeos dentales cada 6 meses",
            "Continue con buena higiene oral",
            "Cepillado 2-3 veces al día (2 minutos)",
            "Use hilo dental diariamente",
            "Dieta balanceada, limite azúcares",
            "¡Felicidades por mantener salud dental!",
        ],
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_is_complete_and_unique() {
        assert_eq!(entries().len(), 28);
        for (i, a) in entries().iter().enumerate() {
            assert!(entries()[i + 1..].iter().all(|b| b.id != a.id), "duplicado: {}", a.id);
            assert_eq!(a.recommendations.len(), 6, "{}", a.id);
            assert_ne!(a.severity, Severity::Desconocida);
            assert_ne!(a.urgency, Urgency::Desconocida);
        }
    }

    #[test]
    fn lookup_finds_known_ids_only() {
        assert_eq!(lookup("absceso").map(|i| i.urgency), Some(Urgency::Urgente));
        assert!(lookup("inexistente").is_none());
    }

    #[test]
    fn urgency_order_matches_priority() {
        assert!(Urgency::Emergencia > Urgency::Urgente);
        assert!(Urgency::Urgente > Urgency::Alta);
        assert!(Urgency::Alta > Urgency::Moderada);
        assert!(Urgency::Moderada > Urgency::Baja);
        assert_eq!(
            serde_json::to_string(&Severity::MuyAlta).unwrap(),
            "\"muy_alta\""
        );
    }
}
