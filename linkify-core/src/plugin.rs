//! # Contrato de Plugins
//!
//! Um plugin é uma função de inicialização registrada por nome em um
//! [`crate::LinkifierBuilder`]. Ela roda uma única vez, durante o `build()`, e
//! recebe acesso mutável às estruturas que pode estender:
//!
//! | Tipo de plugin | Contexto                 | Pode                                            |
//! |----------------|--------------------------|-------------------------------------------------|
//! | de gramática   | [`PluginContext`]        | registrar entidades e caminhos na gramática     |
//! | de token       | [`TokenPluginContext`]   | registrar tipos de token e literais no scanner  |
//!
//! Plugins de token rodam depois do scanner embutido e antes da gramática, então
//! um tipo novo adicionado ao grupo `domain` já aparece nos caminhos de URL.
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use linkify_core::{LinkifierBuilder, TokenKind};
//! use linkify_core::entity::{Candidate, EntityBehavior};
//!
//! struct Ticket;
//!
//! impl EntityBehavior for Ticket {
//!     fn href(&self, candidate: &Candidate<'_>, _default_scheme: &str) -> String {
//!         format!("/tickets/{}", &candidate.text()[1..])
//!     }
//! }
//!
//! let mut builder = LinkifierBuilder::new();
//! builder
//!     .register_plugin("ticket", |ctx| {
//!         let kind = ctx.entities.register("ticket", Ticket)?;
//!         let pound = ctx.parser.step(ctx.parser.start(), TokenKind::POUND);
//!         let ticket = ctx.parser.accepting(kind);
//!         ctx.parser.connect(pound, TokenKind::NUM, ticket)
//!     })
//!     .unwrap();
//!
//! let linkifier = builder.build().unwrap();
//! let found = linkifier.find("veja #42", None).unwrap();
//! assert_eq!(found[0].href, "/tickets/42");
//! ```

use crate::entity::EntityRegistry;
use crate::error::LinkifyError;
use crate::grammar::GrammarBuilder;
use crate::scanner::ScannerBuilder;
use crate::tokens::Vocabulary;

/// O que um plugin de gramática pode alterar.
pub struct PluginContext<'a> {
    pub tokens: &'a mut Vocabulary,
    pub parser: &'a mut GrammarBuilder,
    pub entities: &'a mut EntityRegistry,
}

/// O que um plugin de token pode alterar.
pub struct TokenPluginContext<'a> {
    pub tokens: &'a mut Vocabulary,
    pub scanner: &'a mut ScannerBuilder,
}

/// Inicializador de um plugin de gramática.
pub type PluginInit = Box<dyn FnOnce(&mut PluginContext<'_>) -> Result<(), LinkifyError> + Send>;

/// Inicializador de um plugin de token.
pub type TokenPluginInit =
    Box<dyn FnOnce(&mut TokenPluginContext<'_>) -> Result<(), LinkifyError> + Send>;
