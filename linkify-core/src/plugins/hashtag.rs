//! Hashtags: `#` seguido de palavras, números e `_`, desde que não seja só
//! número (`#rust2024` sim, `#2024` não).

use tracing::debug;

use super::WordBoundary;
use crate::entity::{Candidate, EntityBehavior};
use crate::error::LinkifyError;
use crate::plugin::PluginContext;
use crate::tokens::{groups, TokenKind};

pub const NAME: &str = "hashtag";

struct Hashtag {
    boundary: WordBoundary,
}

impl EntityBehavior for Hashtag {
    fn href(&self, candidate: &Candidate<'_>, _default_scheme: &str) -> String {
        candidate.text()
    }

    fn validate(&self, candidate: &Candidate<'_>) -> bool {
        self.boundary
            .isolated(candidate.preceding, candidate.following)
    }
}

pub fn init(ctx: &mut PluginContext<'_>) -> Result<(), LinkifyError> {
    let kind = ctx.entities.register(
        NAME,
        Hashtag {
            boundary: WordBoundary::new(ctx.tokens),
        },
    )?;

    let domain = ctx.tokens.group(groups::DOMAIN).to_vec();
    let numeric = [TokenKind::NUM, TokenKind::UNDERSCORE];
    let letters: Vec<TokenKind> = domain
        .iter()
        .copied()
        .filter(|k| !numeric.contains(k))
        .collect();

    let parser = &mut *ctx.parser;
    let hash = parser.step(parser.start(), TokenKind::POUND);
    let hashtag = parser.accepting(kind);
    let hash_numeric = parser.state();

    for from in [hash, hash_numeric] {
        parser.connect_all(from, &letters, hashtag)?;
        parser.connect_all(from, &numeric, hash_numeric)?;
    }
    parser.connect_all(hashtag, &domain, hashtag)?;
    parser.connect(hashtag, TokenKind::UNDERSCORE, hashtag)?;

    debug!(plugin = NAME, "plugin registrado");
    Ok(())
}
