// src/languages.rs

use serde::Deserialize;
use std::collections::HashMap;

const LANGUAGE_EXTENSIONS: &str = include_str!("language_extensions.json");

#[derive(Debug, Deserialize)]
struct Language {
    name: String,
    extensions: Vec<String>,
}

/// Lowercased language name -> file extensions
#[derive(Debug, Clone)]
pub struct LanguageTable {
    extensions: HashMap<String, Vec<String>>,
}

impl LanguageTable {
    pub fn builtin() -> Result<Self, serde_json::Error> {
        Self::from_json(LANGUAGE_EXTENSIONS)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let languages: Vec<Language> = serde_json::from_str(json)?;
        let extensions = languages
            .into_iter()
            .map(|lang| (lang.name.to_lowercase(), lang.extensions))
            .collect();
        Ok(LanguageTable { extensions })
    }

    pub fn extensions(&self, language: &str) -> Option<&[String]> {
        self.extensions
            .get(&language.to_lowercase())
            .map(Vec::as_slice)
    }
}
