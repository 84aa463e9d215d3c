//! Menções: `@` seguido de palavras, números e `_`, com `-` e `/` como
//! divisores (`@rust-lang`, `@org/equipe`).
//!
//! O link aponta para o caminho relativo: `@alice` → `/alice`.

use tracing::debug;

use super::WordBoundary;
use crate::entity::{Candidate, EntityBehavior};
use crate::error::LinkifyError;
use crate::plugin::PluginContext;
use crate::tokens::{groups, TokenKind};

pub const NAME: &str = "mention";

struct Mention {
    boundary: WordBoundary,
}

impl EntityBehavior for Mention {
    fn href(&self, candidate: &Candidate<'_>, _default_scheme: &str) -> String {
        let text = candidate.text();
        format!("/{}", text.strip_prefix('@').unwrap_or(&text))
    }

    fn validate(&self, candidate: &Candidate<'_>) -> bool {
        self.boundary
            .isolated(candidate.preceding, candidate.following)
    }
}

pub fn init(ctx: &mut PluginContext<'_>) -> Result<(), LinkifyError> {
    let kind = ctx.entities.register(
        NAME,
        Mention {
            boundary: WordBoundary::new(ctx.tokens),
        },
    )?;

    let mut head = ctx.tokens.group(groups::DOMAIN).to_vec();
    head.push(TokenKind::UNDERSCORE);
    let mut body = head.clone();
    body.push(TokenKind::HYPHEN);

    let parser = &mut *ctx.parser;
    let at = parser.step(parser.start(), TokenKind::AT);
    let mention = parser.accepting(kind);
    parser.connect_all(at, &head, mention)?;
    parser.connect_all(mention, &body, mention)?;

    // "@org/equipe"
    let divider = parser.step(mention, TokenKind::SLASH);
    parser.connect_all(divider, &body, mention)?;

    debug!(plugin = NAME, "plugin registrado");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{EntityRegistry, Segment};
    use crate::grammar::{parse, GrammarBuilder, Parsed};
    use crate::scanner::{self, ScannerBuilder};
    use crate::tokens::Vocabulary;

    fn parse_text(text: &str) -> Parsed {
        let mut vocabulary = Vocabulary::new();
        let mut grammar = GrammarBuilder::new();
        let mut entities = EntityRegistry::new();
        crate::parser::init(&vocabulary, &mut grammar).unwrap();
        init(&mut PluginContext {
            tokens: &mut vocabulary,
            parser: &mut grammar,
            entities: &mut entities,
        })
        .unwrap();

        let automaton = ScannerBuilder::new(&[]).unwrap().freeze();
        let tokens = scanner::run(&automaton, text).unwrap();
        parse(&grammar.freeze(), &entities, "http", tokens)
    }

    fn mentions(text: &str) -> Vec<(String, String)> {
        parse_text(text)
            .segments
            .iter()
            .filter_map(Segment::as_entity)
            .filter(|e| e.kind.name() == NAME)
            .map(|e| (e.text.clone(), e.href.clone()))
            .collect()
    }

    #[test]
    fn test_simple_mention() {
        assert_eq!(
            mentions("oi @alice!"),
            vec![("@alice".to_string(), "/alice".to_string())]
        );
    }

    #[test]
    fn test_mention_with_divider() {
        assert_eq!(
            mentions("@org/equipe_1"),
            vec![("@org/equipe_1".to_string(), "/org/equipe_1".to_string())]
        );
        // Uma barra no fim não faz parte da menção
        assert_eq!(mentions("@org/")[0].0, "@org");
    }

    #[test]
    fn test_mention_glued_to_word_is_demoted() {
        let parsed = parse_text("foo@bar");
        assert!(parsed.segments.iter().all(|s| s.as_entity().is_none()));
        assert_eq!(parsed.demoted.len(), 1);
        assert_eq!(parsed.demoted[0].text, "@bar");
    }

    #[test]
    fn test_lone_at_is_not_a_mention() {
        assert!(mentions("@ alice").is_empty());
    }
}
