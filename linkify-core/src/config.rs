//! # Configuração de Inicialização
//!
//! Tudo o que muda a forma dos autômatos: esquemas personalizados, plugins
//! embutidos habilitados e o esquema padrão usado em links sem esquema.
//!
//! Uma configuração diferente produz um [`crate::Linkifier`] **novo**; um
//! `Linkifier` já construído nunca é alterado.
//!
//! ## Exemplo (JSON)
//!
//! ```json
//! {
//!   "custom_schemes": [
//!     { "scheme": "steam" },
//!     { "scheme": "magnet", "optional_slashes": true }
//!   ],
//!   "plugins": ["mention", "hashtag"],
//!   "default_scheme": "https"
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::error::LinkifyError;

/// Um esquema personalizado (ex: `steam://`, `magnet:`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SchemeSpec {
    /// O esquema em si. Pode ser composto por partes unidas com hífen (`view-source`).
    pub scheme: String,
    /// `true` se o `//` após o `:` é opcional (como em `mailto:`).
    #[serde(default)]
    pub optional_slashes: bool,
}

impl SchemeSpec {
    pub fn new(scheme: impl Into<String>, optional_slashes: bool) -> Self {
        Self {
            scheme: scheme.into(),
            optional_slashes,
        }
    }

    /// Cada parte deve ser não-vazia e conter apenas letras ASCII minúsculas e dígitos.
    pub fn validate(&self) -> Result<(), LinkifyError> {
        let valid = self.scheme.split('-').all(|part| {
            !part.is_empty()
                && part
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        });
        if valid {
            Ok(())
        } else {
            Err(LinkifyError::InvalidScheme {
                scheme: self.scheme.clone(),
            })
        }
    }
}

/// Configuração completa de um [`crate::Linkifier`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkifyConfig {
    /// Esquemas além dos embutidos (`file`, `mailto`, `ftp`, `http(s)`).
    pub custom_schemes: Vec<SchemeSpec>,
    /// Plugins embutidos a registrar, por nome (`mention`, `hashtag`).
    pub plugins: Vec<String>,
    /// Esquema assumido para links sem esquema (`exemplo.com` → `http://exemplo.com`).
    pub default_scheme: String,
}

impl Default for LinkifyConfig {
    fn default() -> Self {
        Self {
            custom_schemes: Vec::new(),
            plugins: vec!["mention".to_string(), "hashtag".to_string()],
            default_scheme: "http".to_string(),
        }
    }
}

impl LinkifyConfig {
    /// Configuração mínima: apenas URLs e e-mails, sem plugins.
    pub fn core_only() -> Self {
        Self {
            plugins: Vec::new(),
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self, LinkifyError> {
        let config: LinkifyConfig = serde_json::from_str(json)?;
        for spec in &config.custom_schemes {
            spec.validate()?;
        }
        Ok(config)
    }

    pub fn with_scheme(mut self, scheme: impl Into<String>, optional_slashes: bool) -> Self {
        self.custom_schemes
            .push(SchemeSpec::new(scheme, optional_slashes));
        self
    }
}
