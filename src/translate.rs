//! Online translation adapter (§1, §6). Same "narrow interface, no real
//! engine" shape as [`crate::ocr`]; grounded on
//! `original_source/src/translate/translate_stub.cpp`.

use crate::error::{Error, Result};

/// Provider credentials set via `pixelgrab_translate_set_config`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslateConfig {
    pub provider: Option<String>,
    pub app_id: Option<String>,
    pub secret_key: Option<String>,
}

pub trait TranslateBackend: Send + Sync {
    fn set_config(&mut self, config: TranslateConfig);

    /// Supported only once credentials have been configured.
    fn is_supported(&self) -> bool;

    /// `source_lang` of `None` or `"auto"` requests detection.
    fn translate(&self, text: &str, source_lang: Option<&str>, target_lang: &str) -> Result<String>;
}

/// Reports unsupported until configured, and `TranslateFailed` even then
/// — no real translation provider is part of this crate's dependency
/// graph.
pub struct NullTranslateBackend {
    config: Option<TranslateConfig>,
}

impl NullTranslateBackend {
    pub fn new() -> Self {
        Self { config: None }
    }
}

impl Default for NullTranslateBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl TranslateBackend for NullTranslateBackend {
    fn set_config(&mut self, config: TranslateConfig) {
        self.config = Some(config);
    }

    fn is_supported(&self) -> bool {
        self.config.is_some()
    }

    fn translate(&self, _text: &str, _source_lang: Option<&str>, _target_lang: &str) -> Result<String> {
        if !self.is_supported() {
            return Err(Error::NotSupported);
        }
        Err(Error::TranslateFailed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_until_configured() {
        let mut backend = NullTranslateBackend::new();
        assert!(!backend.is_supported());
        assert!(matches!(backend.translate("hi", None, "zh"), Err(Error::NotSupported)));
        backend.set_config(TranslateConfig { provider: Some("baidu".into()), ..Default::default() });
        assert!(backend.is_supported());
        assert!(matches!(backend.translate("hi", None, "zh"), Err(Error::TranslateFailed)));
    }
}
