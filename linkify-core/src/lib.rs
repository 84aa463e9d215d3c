//! # linkify-core: Detecção de Links em Texto Livre
//!
//! Este crate encontra URLs, e-mails, menções e hashtags embutidos em texto
//! livre, devolvendo uma sequência de segmentos pronta para qualquer
//! renderizador (HTML, terminal, Markdown...).
//!
//! ## Arquitetura do Sistema
//!
//! O reconhecimento acontece em dois autômatos finitos encadeados:
//!
//! 1.  **Entrada**: Texto bruto (`&str`).
//! 2.  **Scanner** ([`scanner`]): um autômato sobre caracteres, construído com o
//!     [`fsm`], divide o texto em tokens primitivos ([`tokens`]) por maior
//!     casamento com retrocesso. Preserva offsets e caixa originais.
//! 3.  **Gramática** ([`grammar`]): um autômato sobre tipos de token compõe
//!     sequências em entidades ([`entity`]). A gramática embutida ([`parser`])
//!     reconhece URLs e e-mails; [`plugins`] acrescentam menções e hashtags.
//! 4.  **Saída**: `Vec<`[`Segment`]`>`, cada segmento um token intocado ou uma
//!     entidade com `href`.
//!
//! A configuração ([`config`]) e os plugins são aplicados uma única vez, no
//! [`LinkifierBuilder`]. O [`Linkifier`] resultante é imutável e pode ser
//! compartilhado entre threads.
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use linkify_core::{Linkifier, LinkifyConfig, Segment};
//!
//! // 1. Constrói os autômatos (esquemas e plugins vêm da configuração)
//! let linkifier = Linkifier::new(LinkifyConfig::default()).unwrap();
//!
//! // 2. Divide o texto em segmentos
//! let segments = linkifier.tokenize("Fotos do #evento em exemplo.com.br").unwrap();
//!
//! // 3. Renderiza: entidades viram links, o resto passa intacto
//! let html: String = segments
//!     .iter()
//!     .map(|s| match s {
//!         Segment::Entity(e) => format!("<a href=\"{}\">{}</a>", e.href, e.text),
//!         Segment::Token(t) => t.text.clone(),
//!     })
//!     .collect();
//!
//! assert_eq!(
//!     html,
//!     "Fotos do <a href=\"#evento\">#evento</a> em <a href=\"http://exemplo.com.br\">exemplo.com.br</a>"
//! );
//! ```
//!
//! ## Módulos Principais
//!
//! - [`pipeline`]: ciclo de vida builder → linkifier e os modos de análise.
//! - [`scanner`]: primeiro estágio (caracteres → tokens).
//! - [`grammar`]: segundo estágio (tokens → entidades).
//! - [`plugin`]: contrato para estender os dois estágios.

pub mod config;
pub mod corpus;
pub mod entity;
pub mod error;
pub mod fsm;
pub mod grammar;
pub mod parser;
pub mod pipeline;
pub mod plugin;
pub mod plugins;
pub mod scanner;
pub mod tlds;
pub mod tokens;

pub use config::{LinkifyConfig, SchemeSpec};
pub use entity::{Entity, EntityKind, Segment};
pub use error::LinkifyError;
pub use pipeline::{Analysis, Linkifier, LinkifierBuilder, Match, PipelineEvent};
pub use tokens::{Token, TokenKind};
