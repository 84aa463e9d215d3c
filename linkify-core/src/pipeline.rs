//! # Pipeline: Construção e Uso do Linkifier
//!
//! O ciclo de vida tem duas fases:
//!
//! 1. **Construção** ([`LinkifierBuilder`]): mutável. Recebe a configuração e
//!    os plugins; `build()` monta o scanner, a gramática embutida e roda os
//!    plugins na ordem em que foram registrados.
//! 2. **Uso** ([`Linkifier`]): imutável, `Send + Sync`, compartilhável via
//!    `Arc` entre quantas threads quiser. Uma configuração nova gera um
//!    `Linkifier` novo; um já construído nunca muda.
//!
//! ```text
//! texto ──► scanner ──► tokens ──► gramática ──► segmentos (tokens + entidades)
//! ```
//!
//! ## Modos de Uso
//! - **Sync**: [`Linkifier::analyze`], [`Linkifier::tokenize`], [`Linkifier::find`].
//! - **Streaming**: [`Linkifier::analyze_streaming`] envia [`PipelineEvent`]s por
//!   um canal `mpsc`, para o WebSocket mostrar o progresso.
//! - **Lote**: [`Linkifier::analyze_batch`] processa vários textos em paralelo (rayon).
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use linkify_core::{Linkifier, LinkifyConfig};
//!
//! let linkifier = Linkifier::new(LinkifyConfig::default()).unwrap();
//! let found = linkifier.find("Fale com @alice em exemplo.com", None).unwrap();
//!
//! assert_eq!(found[0].kind, "mention");
//! assert_eq!(found[1].href, "http://exemplo.com");
//! ```

use std::collections::HashSet;
use std::sync::mpsc;
use std::time::Instant;

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::LinkifyConfig;
use crate::entity::{Entity, EntityRegistry, Segment};
use crate::error::LinkifyError;
use crate::fsm::CharAutomaton;
use crate::grammar::{self, Demotion, Grammar, GrammarBuilder};
use crate::parser;
use crate::plugin::{PluginContext, PluginInit, TokenPluginContext, TokenPluginInit};
use crate::plugins;
use crate::scanner::{self, ScannerBuilder};
use crate::tokens::{Token, Vocabulary};

/// Eventos emitidos durante a análise de um texto.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum PipelineEvent {
    /// **Passo 1**: texto dividido em tokens primitivos.
    ScanDone { tokens: Vec<Token>, total: usize },
    /// **Passo 2**: uma entidade foi reconhecida e validada.
    EntityRecognized { entity: Entity },
    /// **Passo 2**: um candidato foi recusado pela validação; seus tokens seguem intactos.
    EntityDemoted { demotion: Demotion },
    /// **Conclusão**: a sequência final de segmentos.
    Done {
        segments: Vec<Segment>,
        total_tokens: usize,
        processing_ms: u64,
    },
    /// **Falha**: o autômato não conseguiu avançar.
    Error { message: String },
}

/// Resultado completo de uma análise.
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub segments: Vec<Segment>,
    pub demoted: Vec<Demotion>,
    pub total_tokens: usize,
    pub processing_ms: u64,
}

/// Uma entidade encontrada por [`Linkifier::find`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Match {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub value: String,
    pub href: String,
    pub is_link: bool,
    pub start: usize,
    pub end: usize,
}

impl From<&Entity> for Match {
    fn from(entity: &Entity) -> Self {
        Self {
            kind: entity.kind.name(),
            value: entity.text.clone(),
            href: entity.href.clone(),
            is_link: entity.is_link,
            start: entity.start,
            end: entity.end,
        }
    }
}

/// Fase de construção: acumula configuração e plugins.
pub struct LinkifierBuilder {
    config: LinkifyConfig,
    names: HashSet<String>,
    token_plugins: Vec<(String, TokenPluginInit)>,
    plugins: Vec<(String, PluginInit)>,
}

impl LinkifierBuilder {
    /// Builder sem plugins: reconhece apenas URLs e e-mails.
    pub fn new() -> Self {
        Self {
            config: LinkifyConfig::core_only(),
            names: HashSet::new(),
            token_plugins: Vec::new(),
            plugins: Vec::new(),
        }
    }

    /// Builder a partir de uma configuração, já com os plugins embutidos que ela cita.
    ///
    /// # Erros
    /// - [`LinkifyError::UnknownPlugin`] para um nome que não é embutido.
    /// - [`LinkifyError::InvalidScheme`] para um esquema personalizado inválido.
    pub fn with_config(config: LinkifyConfig) -> Result<Self, LinkifyError> {
        for spec in &config.custom_schemes {
            spec.validate()?;
        }
        let mut builder = Self::new();
        for name in &config.plugins {
            let init = plugins::builtin(name)
                .ok_or_else(|| LinkifyError::UnknownPlugin { name: name.clone() })?;
            builder.register_plugin(name.clone(), init)?;
        }
        builder.config = config;
        Ok(builder)
    }

    fn claim(&mut self, name: &str) -> Result<(), LinkifyError> {
        if !self.names.insert(name.to_string()) {
            return Err(LinkifyError::DuplicatePlugin {
                name: name.to_string(),
            });
        }
        Ok(())
    }

    /// Registra um plugin de gramática.
    ///
    /// # Erros
    /// [`LinkifyError::DuplicatePlugin`] se o nome já foi usado neste builder.
    pub fn register_plugin<F>(&mut self, name: impl Into<String>, init: F) -> Result<&mut Self, LinkifyError>
    where
        F: FnOnce(&mut PluginContext<'_>) -> Result<(), LinkifyError> + Send + 'static,
    {
        let name = name.into();
        self.claim(&name)?;
        self.plugins.push((name, Box::new(init)));
        Ok(self)
    }

    /// Registra um plugin de token. Roda antes da gramática embutida.
    ///
    /// # Erros
    /// [`LinkifyError::DuplicatePlugin`] se o nome já foi usado neste builder.
    pub fn register_token_plugin<F>(&mut self, name: impl Into<String>, init: F) -> Result<&mut Self, LinkifyError>
    where
        F: FnOnce(&mut TokenPluginContext<'_>) -> Result<(), LinkifyError> + Send + 'static,
    {
        let name = name.into();
        self.claim(&name)?;
        self.token_plugins.push((name, Box::new(init)));
        Ok(self)
    }

    /// Monta e congela os dois autômatos.
    pub fn build(self) -> Result<Linkifier, LinkifyError> {
        let mut vocabulary = Vocabulary::new();
        let mut scanner = ScannerBuilder::new(&self.config.custom_schemes)?;

        for (name, init) in self.token_plugins {
            init(&mut TokenPluginContext {
                tokens: &mut vocabulary,
                scanner: &mut scanner,
            })?;
            debug!(plugin = %name, "plugin de token inicializado");
        }

        let mut grammar = GrammarBuilder::new();
        parser::init(&vocabulary, &mut grammar)?;
        let mut entities = EntityRegistry::new();

        for (name, init) in self.plugins {
            init(&mut PluginContext {
                tokens: &mut vocabulary,
                parser: &mut grammar,
                entities: &mut entities,
            })?;
            debug!(plugin = %name, "plugin inicializado");
        }

        let scanner = scanner.freeze();
        let grammar = grammar.freeze();
        info!(
            scanner_states = scanner.len(),
            grammar_nodes = grammar.len(),
            token_kinds = vocabulary.len(),
            entity_kinds = entities.kinds().len(),
            "linkifier construído"
        );

        Ok(Linkifier {
            scanner,
            grammar,
            entities,
            vocabulary,
            config: self.config,
        })
    }
}

impl Default for LinkifierBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Fase de uso: autômatos congelados, prontos para varrer textos.
#[derive(Debug)]
pub struct Linkifier {
    scanner: CharAutomaton,
    grammar: Grammar,
    entities: EntityRegistry,
    vocabulary: Vocabulary,
    config: LinkifyConfig,
}

impl Linkifier {
    /// Atalho para `LinkifierBuilder::with_config(config)?.build()`.
    pub fn new(config: LinkifyConfig) -> Result<Self, LinkifyError> {
        LinkifierBuilder::with_config(config)?.build()
    }

    pub fn config(&self) -> &LinkifyConfig {
        &self.config
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn entities(&self) -> &EntityRegistry {
        &self.entities
    }

    /// Apenas o primeiro estágio: tokens primitivos.
    pub fn scan(&self, text: &str) -> Result<Vec<Token>, LinkifyError> {
        scanner::run(&self.scanner, text)
    }

    fn parse(&self, tokens: Vec<Token>) -> grammar::Parsed {
        grammar::parse(
            &self.grammar,
            &self.entities,
            &self.config.default_scheme,
            tokens,
        )
    }

    /// Os dois estágios: a sequência de segmentos para um renderizador.
    pub fn tokenize(&self, text: &str) -> Result<Vec<Segment>, LinkifyError> {
        let tokens = self.scan(text)?;
        Ok(self.parse(tokens).segments)
    }

    /// Como [`Self::tokenize`], com candidatos rebaixados e tempo de processamento.
    pub fn analyze(&self, text: &str) -> Result<Analysis, LinkifyError> {
        let start = Instant::now();
        let tokens = self.scan(text)?;
        let total_tokens = tokens.len();
        let parsed = self.parse(tokens);

        Ok(Analysis {
            segments: parsed.segments,
            demoted: parsed.demoted,
            total_tokens,
            processing_ms: start.elapsed().as_millis() as u64,
        })
    }

    /// Executa a análise enviando eventos de progresso pelo canal `tx`.
    ///
    /// # Fluxo de Eventos
    /// 1. `ScanDone`
    /// 2. `EntityRecognized` (uma por entidade, em ordem)
    /// 3. `EntityDemoted` (um por candidato recusado)
    /// 4. `Done`
    ///
    /// Se o scanner falhar, apenas `Error` é enviado.
    pub fn analyze_streaming(&self, text: &str, tx: mpsc::Sender<PipelineEvent>) {
        let start = Instant::now();

        let tokens = match self.scan(text) {
            Ok(tokens) => tokens,
            Err(e) => {
                let _ = tx.send(PipelineEvent::Error {
                    message: e.to_string(),
                });
                return;
            }
        };
        let total = tokens.len();
        let _ = tx.send(PipelineEvent::ScanDone {
            tokens: tokens.clone(),
            total,
        });

        let parsed = self.parse(tokens);
        for entity in parsed.segments.iter().filter_map(Segment::as_entity) {
            let _ = tx.send(PipelineEvent::EntityRecognized {
                entity: entity.clone(),
            });
        }
        for demotion in parsed.demoted {
            let _ = tx.send(PipelineEvent::EntityDemoted { demotion });
        }

        let _ = tx.send(PipelineEvent::Done {
            segments: parsed.segments,
            total_tokens: total,
            processing_ms: start.elapsed().as_millis() as u64,
        });
    }

    /// Analisa vários textos em paralelo. A ordem dos resultados é a da entrada.
    pub fn analyze_batch<S>(&self, texts: &[S]) -> Vec<Result<Analysis, LinkifyError>>
    where
        S: AsRef<str> + Sync,
    {
        texts
            .par_iter()
            .map(|text| self.analyze(text.as_ref()))
            .collect()
    }

    /// Entidades que são links, opcionalmente só de um tipo (`"url"`, `"mention"`...).
    pub fn find(&self, text: &str, kind: Option<&str>) -> Result<Vec<Match>, LinkifyError> {
        Ok(self
            .tokenize(text)?
            .iter()
            .filter_map(Segment::as_entity)
            .filter(|e| e.is_link && kind.map_or(true, |k| e.kind.name() == k))
            .map(Match::from)
            .collect())
    }

    /// `true` se o texto inteiro é exatamente uma entidade (do tipo dado, se houver).
    pub fn test(&self, text: &str, kind: Option<&str>) -> Result<bool, LinkifyError> {
        let segments = self.tokenize(text)?;
        Ok(match segments.as_slice() {
            [Segment::Entity(e)] => e.is_link && kind.map_or(true, |k| e.kind.name() == k),
            _ => false,
        })
    }
}
