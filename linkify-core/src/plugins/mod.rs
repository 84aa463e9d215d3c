//! # Plugins Embutidos
//!
//! - [`mention`]: `@usuario`, `@org/equipe`
//! - [`hashtag`]: `#rust`, `#rust2024`
//!
//! Os dois são recusados quando grudados em uma palavra (`foo@bar`, `foo#bar`).

use crate::error::LinkifyError;
use crate::plugin::PluginContext;
use crate::tokens::{groups, Token, TokenKind, Vocabulary};

pub mod hashtag;
pub mod mention;

/// Assinatura de um plugin embutido.
pub type BuiltinPlugin = fn(&mut PluginContext<'_>) -> Result<(), LinkifyError>;

/// Nomes aceitos em [`crate::LinkifyConfig::plugins`].
pub const BUILTIN_NAMES: [&str; 2] = [mention::NAME, hashtag::NAME];

/// Procura um plugin embutido pelo nome.
pub fn builtin(name: &str) -> Option<BuiltinPlugin> {
    match name {
        mention::NAME => Some(mention::init),
        hashtag::NAME => Some(hashtag::init),
        _ => None,
    }
}

/// Tipos que contam como "parte de uma palavra" ao redor de uma menção ou hashtag.
#[derive(Debug, Clone)]
pub(crate) struct WordBoundary {
    word_like: Vec<TokenKind>,
}

impl WordBoundary {
    pub(crate) fn new(vocabulary: &Vocabulary) -> Self {
        let mut word_like = vocabulary.group(groups::DOMAIN).to_vec();
        word_like.push(TokenKind::UNDERSCORE);
        Self { word_like }
    }

    fn touches(&self, token: Option<&Token>) -> bool {
        token.is_some_and(|t| self.word_like.contains(&t.kind))
    }

    /// `true` se nenhum dos vizinhos é parte de uma palavra.
    pub(crate) fn isolated(&self, preceding: Option<&Token>, following: Option<&Token>) -> bool {
        !self.touches(preceding) && !self.touches(following)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_lookup() {
        assert!(builtin("mention").is_some());
        assert!(builtin("hashtag").is_some());
        assert!(builtin("ticket").is_none());
        assert_eq!(BUILTIN_NAMES, ["mention", "hashtag"]);
    }
}
