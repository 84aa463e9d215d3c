//! # Entidades (tokens compostos)
//!
//! Uma entidade é uma sequência contígua de tokens primitivos reconhecida pela
//! gramática: uma URL, um e-mail, uma menção, uma hashtag... Cada **tipo** de
//! entidade tem um comportamento ([`EntityBehavior`]) registrado no
//! [`EntityRegistry`]: se é um link, qual o alvo canônico (`href`) e se uma
//! sequência candidata é realmente válida.
//!
//! ```text
//! tokens:   [@] [alice]          →  Entity { kind: mention, text: "@alice", href: "/alice" }
//! tokens:   [example] [.] [com]  →  Entity { kind: url, text: "example.com", href: "http://example.com" }
//! ```
//!
//! O registro só cresce: um tipo registrado nunca é removido nem renomeado.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use serde::{Serialize, Serializer};

use crate::error::LinkifyError;
use crate::parser::{EmailBehavior, UrlBehavior};
use crate::tokens::Token;

/// Tipo de uma entidade. A identidade é o `id`; o nome serve para filtros e JSON.
#[derive(Clone, Copy)]
pub struct EntityKind {
    id: u16,
    name: &'static str,
}

impl EntityKind {
    pub const URL: EntityKind = EntityKind { id: 0, name: "url" };
    pub const EMAIL: EntityKind = EntityKind { id: 1, name: "email" };

    pub fn id(&self) -> u16 {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for EntityKind {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for EntityKind {}

impl Hash for EntityKind {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl Serialize for EntityKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name)
    }
}

/// Sequência de tokens que a gramática aceitou, ainda não validada, junto com
/// seus vizinhos imediatos no texto.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    pub tokens: &'a [Token],
    pub preceding: Option<&'a Token>,
    pub following: Option<&'a Token>,
}

impl Candidate<'_> {
    /// Texto do candidato (concatenação dos tokens, caixa original).
    pub fn text(&self) -> String {
        self.tokens.iter().map(|t| t.text.as_str()).collect()
    }
}

/// Comportamento associado a um tipo de entidade.
pub trait EntityBehavior: Send + Sync {
    fn is_link(&self) -> bool {
        true
    }

    /// Alvo canônico do link.
    fn href(&self, candidate: &Candidate<'_>, default_scheme: &str) -> String;

    /// `false` rebaixa o candidato: seus tokens voltam à saída sem alteração.
    fn validate(&self, _candidate: &Candidate<'_>) -> bool {
        true
    }
}

/// Registro dos tipos de entidade e de seus comportamentos.
///
/// Já nasce com [`EntityKind::URL`] e [`EntityKind::EMAIL`].
#[derive(Clone)]
pub struct EntityRegistry {
    kinds: Vec<EntityKind>,
    behaviors: Vec<Arc<dyn EntityBehavior>>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self {
            kinds: vec![EntityKind::URL, EntityKind::EMAIL],
            behaviors: vec![Arc::new(UrlBehavior), Arc::new(EmailBehavior)],
        }
    }

    /// Registra um novo tipo de entidade.
    ///
    /// # Erros
    /// [`LinkifyError::DuplicateEntity`] se o nome já existir.
    pub fn register<B>(&mut self, name: &'static str, behavior: B) -> Result<EntityKind, LinkifyError>
    where
        B: EntityBehavior + 'static,
    {
        if self.get(name).is_some() {
            return Err(LinkifyError::DuplicateEntity { name });
        }
        let kind = EntityKind {
            id: self.kinds.len() as u16,
            name,
        };
        self.kinds.push(kind);
        self.behaviors.push(Arc::new(behavior));
        Ok(kind)
    }

    pub fn get(&self, name: &str) -> Option<EntityKind> {
        self.kinds.iter().find(|k| k.name == name).copied()
    }

    pub fn behavior(&self, kind: EntityKind) -> Option<&dyn EntityBehavior> {
        self.behaviors.get(kind.id as usize).map(|b| b.as_ref())
    }

    pub fn kinds(&self) -> &[EntityKind] {
        &self.kinds
    }
}

impl Default for EntityRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EntityRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityRegistry")
            .field("kinds", &self.kinds)
            .finish()
    }
}

/// Uma entidade reconhecida e validada.
///
/// Invariante: `tokens` é contíguo e ordenado, `start == tokens[0].start`,
/// `end == tokens.last().end` e `text` é a concatenação dos textos.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entity {
    pub kind: EntityKind,
    pub text: String,
    pub href: String,
    pub is_link: bool,
    pub start: usize,
    pub end: usize,
    pub tokens: Vec<Token>,
}

impl Entity {
    pub(crate) fn from_candidate(
        kind: EntityKind,
        candidate: &Candidate<'_>,
        behavior: Option<&dyn EntityBehavior>,
        default_scheme: &str,
    ) -> Self {
        let text = candidate.text();
        let (href, is_link) = match behavior {
            Some(b) => (b.href(candidate, default_scheme), b.is_link()),
            None => (text.clone(), true),
        };
        let start = candidate.tokens.first().map_or(0, |t| t.start);
        let end = candidate.tokens.last().map_or(start, |t| t.end);
        Self {
            kind,
            text,
            href,
            is_link,
            start,
            end,
            tokens: candidate.tokens.to_vec(),
        }
    }
}

/// Item da saída final: um token primitivo intocado ou uma entidade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "segment", rename_all = "snake_case")]
pub enum Segment {
    Token(Token),
    Entity(Entity),
}

impl Segment {
    /// Nome do tipo: o tipo de token ou o tipo de entidade.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Segment::Token(t) => t.kind.name(),
            Segment::Entity(e) => e.kind.name(),
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Segment::Token(t) => &t.text,
            Segment::Entity(e) => &e.text,
        }
    }

    pub fn start(&self) -> usize {
        match self {
            Segment::Token(t) => t.start,
            Segment::Entity(e) => e.start,
        }
    }

    pub fn end(&self) -> usize {
        match self {
            Segment::Token(t) => t.end,
            Segment::Entity(e) => e.end,
        }
    }

    pub fn is_link(&self) -> bool {
        matches!(self, Segment::Entity(e) if e.is_link)
    }

    pub fn href(&self) -> Option<&str> {
        match self {
            Segment::Token(_) => None,
            Segment::Entity(e) => Some(&e.href),
        }
    }

    pub fn as_entity(&self) -> Option<&Entity> {
        match self {
            Segment::Entity(e) => Some(e),
            Segment::Token(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::TokenKind;

    struct Ticket;

    impl EntityBehavior for Ticket {
        fn is_link(&self) -> bool {
            false
        }

        fn href(&self, candidate: &Candidate<'_>, _default_scheme: &str) -> String {
            candidate.text()
        }
    }

    fn token(kind: TokenKind, text: &str, start: usize) -> Token {
        Token {
            kind,
            text: text.to_string(),
            start,
            end: start + text.len(),
        }
    }

    #[test]
    fn test_registry_starts_with_url_and_email() {
        let registry = EntityRegistry::new();
        assert_eq!(registry.get("url"), Some(EntityKind::URL));
        assert_eq!(registry.get("email"), Some(EntityKind::EMAIL));
        assert!(registry.behavior(EntityKind::URL).is_some());
    }

    #[test]
    fn test_register_rejects_duplicate_name() {
        let mut registry = EntityRegistry::new();
        let ticket = registry.register("ticket", Ticket).unwrap();
        assert_eq!(ticket.id(), 2);
        assert!(matches!(
            registry.register("ticket", Ticket),
            Err(LinkifyError::DuplicateEntity { name: "ticket" })
        ));
        assert!(matches!(
            registry.register("url", Ticket),
            Err(LinkifyError::DuplicateEntity { .. })
        ));
    }

    #[test]
    fn test_entity_spans_its_tokens() {
        let mut registry = EntityRegistry::new();
        let ticket = registry.register("ticket", Ticket).unwrap();
        let tokens = vec![token(TokenKind::POUND, "#", 4), token(TokenKind::NUM, "42", 5)];
        let candidate = Candidate {
            tokens: &tokens,
            preceding: None,
            following: None,
        };

        let entity = Entity::from_candidate(ticket, &candidate, registry.behavior(ticket), "http");
        assert_eq!(entity.text, "#42");
        assert_eq!((entity.start, entity.end), (4, 7));
        assert!(!entity.is_link);

        let segment = Segment::Entity(entity);
        assert_eq!(segment.kind_name(), "ticket");
        assert!(!segment.is_link());
    }

    #[test]
    fn test_segment_serializes_with_tag() {
        let segment = Segment::Token(token(TokenKind::WORD, "oi", 0));
        let json = serde_json::to_value(&segment).unwrap();
        assert_eq!(json["segment"], "token");
        assert_eq!(json["kind"], "word");
        assert_eq!(json["text"], "oi");
    }
}
