//! Localization — language-pack lookup by message key.
//!
//! Two packs (English, Spanish). Lookup falls back to English, then to
//! the key itself, so a missing translation can never panic or blank out
//! a payload. The `Localizer` lives on `AppContext` and is passed
//! explicitly — no process-global locale.

use std::collections::HashMap;

/// Supported response languages.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Lang {
    #[default]
    En,
    Es,
}

impl Lang {
    /// Parse a single language tag, tolerant of region suffixes and case
    /// ("es-MX" → `Es`). Unknown tags fall back to English.
    pub fn parse(tag: &str) -> Lang {
        let normalized = tag.trim().to_ascii_lowercase();
        match normalized.split(['-', '_']).next().unwrap_or("") {
            "es" => Lang::Es,
            _ => Lang::En,
        }
    }

    /// Pick the language from an `Accept-Language` header value: the
    /// first tag wins, quality weights are ignored.
    pub fn from_accept_language(header: &str) -> Lang {
        let first = header.split(',').next().unwrap_or("");
        let tag = first.split(';').next().unwrap_or("");
        Lang::parse(tag)
    }
}

pub struct Localizer {
    en: HashMap<&'static str, &'static str>,
    es: HashMap<&'static str, &'static str>,
}

impl Localizer {
    pub fn new() -> Self {
        Self {
            en: catalog_en(),
            es: catalog_es(),
        }
    }

    /// Resolve `key` in `lang`; falls back to English, then to the key.
    pub fn lookup<'a>(&'a self, lang: Lang, key: &'a str) -> &'a str {
        let pack = match lang {
            Lang::En => &self.en,
            Lang::Es => &self.es,
        };
        pack.get(key)
            .or_else(|| self.en.get(key))
            .copied()
            .unwrap_or(key)
    }
}

impl Default for Localizer {
    fn default() -> Self {
        Self::new()
    }
}

fn catalog_en() -> HashMap<&'static str, &'static str> {
    HashMap::from([
        ("error.validation", "The submitted form is invalid"),
        ("error.not_found", "The requested record was not found"),
        ("error.service_call", "The AI service could not be reached"),
        (
            "error.schema_mismatch",
            "The AI service returned an unusable answer",
        ),
        ("error.storage", "Internal storage failure"),
        ("health.ok", "ok"),
    ])
}

fn catalog_es() -> HashMap<&'static str, &'static str> {
    HashMap::from([
        ("error.validation", "El formulario enviado no es válido"),
        ("error.not_found", "No se encontró el registro solicitado"),
        (
            "error.service_call",
            "No se pudo contactar con el servicio de IA",
        ),
        (
            "error.schema_mismatch",
            "El servicio de IA devolvió una respuesta inutilizable",
        ),
        ("error.storage", "Fallo interno de almacenamiento"),
        ("health.ok", "ok"),
    ])
}

// ─── Tests ────────────────────────────────────────────────────────────────────
