//! # Gramática: Segundo Estágio (tokens → entidades)
//!
//! Um segundo autômato, agora sobre **tipos de token** em vez de caracteres.
//! Cada nó tem transições indexadas por [`TokenKind`]; nós de aceitação carregam
//! o [`EntityKind`] reconhecido.
//!
//! A gramática embutida (URLs e e-mails) e os plugins (menções, hashtags)
//! escrevem todos no mesmo [`GrammarBuilder`]. Plugins compartilham prefixos com
//! [`GrammarBuilder::step`], e uma transição que contradiz outra já registrada é
//! rejeitada com [`LinkifyError::ConflictingTransition`] em vez de sobrescrevê-la.
//!
//! ## Análise
//!
//! [`parse`] usa o mesmo maior-casamento-com-retrocesso do scanner:
//!
//! ```text
//! tokens:  [example] [.] [com] [.]
//! nós:     Domain    Dot  Tld*  Dot      (* = aceita url)
//!                          ↑ retrocede aqui: "example.com" + "."
//! ```
//!
//! Candidatos que falham na validação são **rebaixados**: seus tokens voltam à
//! saída como estavam e a análise continua logo após eles.

use std::collections::HashMap;

use serde::Serialize;

use crate::entity::{Candidate, Entity, EntityKind, EntityRegistry, Segment};
use crate::error::LinkifyError;
use crate::tokens::{Token, TokenKind};

/// Índice de um nó da gramática.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Default)]
struct Node {
    accepts: Option<EntityKind>,
    transitions: HashMap<TokenKind, NodeId>,
}

/// Gramática em construção. O nó 0 é o inicial.
#[derive(Debug, Clone)]
pub struct GrammarBuilder {
    nodes: Vec<Node>,
}

impl GrammarBuilder {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::default()],
        }
    }

    pub fn start(&self) -> NodeId {
        NodeId(0)
    }

    /// Novo nó sem aceitação.
    pub fn state(&mut self) -> NodeId {
        self.nodes.push(Node::default());
        NodeId(self.nodes.len() - 1)
    }

    /// Novo nó que aceita `entity`.
    pub fn accepting(&mut self, entity: EntityKind) -> NodeId {
        let id = self.state();
        self.nodes[id.0].accepts = Some(entity);
        id
    }

    /// Marca um nó existente como de aceitação.
    ///
    /// # Erros
    /// [`LinkifyError::ConflictingAccept`] se o nó já aceita outra entidade.
    pub fn accept(&mut self, node: NodeId, entity: EntityKind) -> Result<(), LinkifyError> {
        if let Some(existing) = self.nodes[node.0].accepts {
            if existing != entity {
                return Err(LinkifyError::ConflictingAccept {
                    state: node.0,
                    existing: existing.name(),
                    requested: entity.name(),
                });
            }
        }
        self.nodes[node.0].accepts = Some(entity);
        Ok(())
    }

    pub fn accepts(&self, node: NodeId) -> Option<EntityKind> {
        self.nodes[node.0].accepts
    }

    /// Segue a transição `kind` a partir de `from`, criando um nó sem aceitação
    /// se ela ainda não existir. É a forma de compartilhar prefixos entre plugins.
    pub fn step(&mut self, from: NodeId, kind: TokenKind) -> NodeId {
        if let Some(&existing) = self.nodes[from.0].transitions.get(&kind) {
            return existing;
        }
        let node = self.state();
        self.nodes[from.0].transitions.insert(kind, node);
        node
    }

    /// Registra `from --kind--> to`.
    ///
    /// Registrar exatamente a mesma transição de novo não tem efeito.
    ///
    /// # Erros
    /// [`LinkifyError::ConflictingTransition`] se `(from, kind)` já leva a outro nó.
    pub fn connect(&mut self, from: NodeId, kind: TokenKind, to: NodeId) -> Result<(), LinkifyError> {
        match self.nodes[from.0].transitions.get(&kind) {
            Some(&existing) if existing != to => Err(LinkifyError::ConflictingTransition {
                state: from.0,
                kind: kind.name(),
            }),
            Some(_) => Ok(()),
            None => {
                self.nodes[from.0].transitions.insert(kind, to);
                Ok(())
            }
        }
    }

    /// [`Self::connect`] para cada tipo de `kinds`.
    pub fn connect_all(&mut self, from: NodeId, kinds: &[TokenKind], to: NodeId) -> Result<(), LinkifyError> {
        for &kind in kinds {
            self.connect(from, kind, to)?;
        }
        Ok(())
    }

    pub fn target(&self, from: NodeId, kind: TokenKind) -> Option<NodeId> {
        self.nodes[from.0].transitions.get(&kind).copied()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn freeze(self) -> Grammar {
        Grammar { nodes: self.nodes }
    }
}

impl Default for GrammarBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Gramática congelada, compartilhável entre threads.
#[derive(Debug, Clone)]
pub struct Grammar {
    nodes: Vec<Node>,
}

impl Grammar {
    pub fn start(&self) -> NodeId {
        NodeId(0)
    }

    pub fn step(&self, from: NodeId, kind: TokenKind) -> Option<NodeId> {
        self.nodes.get(from.0)?.transitions.get(&kind).copied()
    }

    pub fn accepts(&self, node: NodeId) -> Option<EntityKind> {
        self.nodes.get(node.0)?.accepts
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Um candidato aceito pela gramática mas recusado pela validação.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Demotion {
    pub entity: EntityKind,
    pub text: String,
    pub start: usize,
    pub end: usize,
}

/// Resultado de [`parse`].
#[derive(Debug, Clone, Default)]
pub struct Parsed {
    pub segments: Vec<Segment>,
    pub demoted: Vec<Demotion>,
}

/// Compõe tokens primitivos em entidades.
///
/// Os segmentos devolvidos cobrem os tokens de entrada na ordem, sem lacunas:
/// cada token aparece exatamente uma vez, sozinho ou dentro de uma entidade.
pub fn parse(
    grammar: &Grammar,
    registry: &EntityRegistry,
    default_scheme: &str,
    tokens: Vec<Token>,
) -> Parsed {
    let mut parsed = Parsed::default();
    let mut cursor = 0;

    while cursor < tokens.len() {
        let mut node = grammar.start();
        let mut consumed = 0;
        let mut checkpoint: Option<(usize, EntityKind)> = None;

        while let Some(token) = tokens.get(cursor + consumed) {
            let Some(next) = grammar.step(node, token.kind) else {
                break;
            };
            node = next;
            consumed += 1;
            if let Some(entity) = grammar.accepts(node) {
                checkpoint = Some((consumed, entity));
            }
        }

        let Some((length, kind)) = checkpoint else {
            parsed.segments.push(Segment::Token(tokens[cursor].clone()));
            cursor += 1;
            continue;
        };

        let run = &tokens[cursor..cursor + length];
        let candidate = Candidate {
            tokens: run,
            preceding: cursor.checked_sub(1).and_then(|i| tokens.get(i)),
            following: tokens.get(cursor + length),
        };
        let behavior = registry.behavior(kind);

        if behavior.map_or(true, |b| b.validate(&candidate)) {
            parsed.segments.push(Segment::Entity(Entity::from_candidate(
                kind,
                &candidate,
                behavior,
                default_scheme,
            )));
        } else {
            parsed.demoted.push(Demotion {
                entity: kind,
                text: candidate.text(),
                start: run[0].start,
                end: run[length - 1].end,
            });
            parsed
                .segments
                .extend(run.iter().cloned().map(Segment::Token));
        }
        cursor += length;
    }

    parsed
}
