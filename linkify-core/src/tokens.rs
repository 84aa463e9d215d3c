//! # Vocabulário de Tokens Primitivos
//!
//! O scanner classifica cada trecho do texto com um [`TokenKind`]. O conjunto de
//! tipos é **aberto mas só cresce**: os tipos embutidos (números, palavras,
//! pontuação, esquemas, TLDs...) têm identificadores estáveis, e plugins podem
//! registrar novos tipos através do [`Vocabulary`].
//!
//! ## Grupos
//!
//! Gramáticas raramente falam de um tipo isolado: "qualquer coisa que pode fazer
//! parte de um domínio" inclui palavras ASCII, palavras Unicode, números, TLDs,
//! esquemas... Por isso o vocabulário mantém **grupos nomeados** ([`groups`]),
//! que plugins também podem estender.
//!
//! | Grupo        | Tipos                                                        |
//! |--------------|--------------------------------------------------------------|
//! | `domain`     | word, uword, num, emoji, tld, utld, scheme, slash_scheme, localhost |
//! | `numeric`    | num                                                          |
//! | `letters`    | word, uword                                                  |
//! | `tld`        | tld, utld                                                    |
//! | `scheme`     | scheme, slash_scheme                                         |
//! | `whitespace` | ws, nl                                                       |

use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Serialize, Serializer};

/// Tipo (tag) de um token primitivo.
///
/// A identidade é o `id` numérico; o nome existe para depuração e serialização.
#[derive(Clone, Copy)]
pub struct TokenKind {
    id: u16,
    name: &'static str,
}

impl TokenKind {
    const fn builtin(id: u16, name: &'static str) -> Self {
        Self { id, name }
    }

    pub fn id(&self) -> u16 {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    // === Tipos embutidos ===
    pub const NUM: TokenKind = TokenKind::builtin(0, "num");
    pub const WORD: TokenKind = TokenKind::builtin(1, "word");
    pub const UWORD: TokenKind = TokenKind::builtin(2, "uword");
    pub const EMOJI: TokenKind = TokenKind::builtin(3, "emoji");
    pub const WS: TokenKind = TokenKind::builtin(4, "ws");
    pub const NL: TokenKind = TokenKind::builtin(5, "nl");
    pub const SYM: TokenKind = TokenKind::builtin(6, "sym");
    pub const SCHEME: TokenKind = TokenKind::builtin(7, "scheme");
    pub const SLASH_SCHEME: TokenKind = TokenKind::builtin(8, "slash_scheme");
    pub const TLD: TokenKind = TokenKind::builtin(9, "tld");
    pub const UTLD: TokenKind = TokenKind::builtin(10, "utld");
    pub const LOCALHOST: TokenKind = TokenKind::builtin(11, "localhost");

    // === Pontuação (um tipo por caractere) ===
    pub const APOSTROPHE: TokenKind = TokenKind::builtin(12, "apostrophe");
    pub const OPENBRACE: TokenKind = TokenKind::builtin(13, "openbrace");
    pub const OPENBRACKET: TokenKind = TokenKind::builtin(14, "openbracket");
    pub const OPENANGLEBRACKET: TokenKind = TokenKind::builtin(15, "openanglebracket");
    pub const OPENPAREN: TokenKind = TokenKind::builtin(16, "openparen");
    pub const CLOSEBRACE: TokenKind = TokenKind::builtin(17, "closebrace");
    pub const CLOSEBRACKET: TokenKind = TokenKind::builtin(18, "closebracket");
    pub const CLOSEANGLEBRACKET: TokenKind = TokenKind::builtin(19, "closeanglebracket");
    pub const CLOSEPAREN: TokenKind = TokenKind::builtin(20, "closeparen");
    pub const AMPERSAND: TokenKind = TokenKind::builtin(21, "ampersand");
    pub const ASTERISK: TokenKind = TokenKind::builtin(22, "asterisk");
    pub const AT: TokenKind = TokenKind::builtin(23, "at");
    pub const BACKTICK: TokenKind = TokenKind::builtin(24, "backtick");
    pub const CARET: TokenKind = TokenKind::builtin(25, "caret");
    pub const COLON: TokenKind = TokenKind::builtin(26, "colon");
    pub const COMMA: TokenKind = TokenKind::builtin(27, "comma");
    pub const DOLLAR: TokenKind = TokenKind::builtin(28, "dollar");
    pub const DOT: TokenKind = TokenKind::builtin(29, "dot");
    pub const EQUALS: TokenKind = TokenKind::builtin(30, "equals");
    pub const EXCLAMATION: TokenKind = TokenKind::builtin(31, "exclamation");
    pub const HYPHEN: TokenKind = TokenKind::builtin(32, "hyphen");
    pub const PERCENT: TokenKind = TokenKind::builtin(33, "percent");
    pub const PIPE: TokenKind = TokenKind::builtin(34, "pipe");
    pub const PLUS: TokenKind = TokenKind::builtin(35, "plus");
    pub const POUND: TokenKind = TokenKind::builtin(36, "pound");
    pub const QUERY: TokenKind = TokenKind::builtin(37, "query");
    pub const QUOTE: TokenKind = TokenKind::builtin(38, "quote");
    pub const SLASH: TokenKind = TokenKind::builtin(39, "slash");
    pub const SEMI: TokenKind = TokenKind::builtin(40, "semi");
    pub const TILDE: TokenKind = TokenKind::builtin(41, "tilde");
    pub const UNDERSCORE: TokenKind = TokenKind::builtin(42, "underscore");
    pub const BACKSLASH: TokenKind = TokenKind::builtin(43, "backslash");
}

/// Todos os tipos embutidos, na ordem dos identificadores.
const BUILTINS: [TokenKind; 44] = [
    TokenKind::NUM,
    TokenKind::WORD,
    TokenKind::UWORD,
    TokenKind::EMOJI,
    TokenKind::WS,
    TokenKind::NL,
    TokenKind::SYM,
    TokenKind::SCHEME,
    TokenKind::SLASH_SCHEME,
    TokenKind::TLD,
    TokenKind::UTLD,
    TokenKind::LOCALHOST,
    TokenKind::APOSTROPHE,
    TokenKind::OPENBRACE,
    TokenKind::OPENBRACKET,
    TokenKind::OPENANGLEBRACKET,
    TokenKind::OPENPAREN,
    TokenKind::CLOSEBRACE,
    TokenKind::CLOSEBRACKET,
    TokenKind::CLOSEANGLEBRACKET,
    TokenKind::CLOSEPAREN,
    TokenKind::AMPERSAND,
    TokenKind::ASTERISK,
    TokenKind::AT,
    TokenKind::BACKTICK,
    TokenKind::CARET,
    TokenKind::COLON,
    TokenKind::COMMA,
    TokenKind::DOLLAR,
    TokenKind::DOT,
    TokenKind::EQUALS,
    TokenKind::EXCLAMATION,
    TokenKind::HYPHEN,
    TokenKind::PERCENT,
    TokenKind::PIPE,
    TokenKind::PLUS,
    TokenKind::POUND,
    TokenKind::QUERY,
    TokenKind::QUOTE,
    TokenKind::SLASH,
    TokenKind::SEMI,
    TokenKind::TILDE,
    TokenKind::UNDERSCORE,
    TokenKind::BACKSLASH,
];

/// Caracteres de pontuação reconhecidos individualmente pelo scanner.
pub const PUNCTUATION: [(char, TokenKind); 32] = [
    ('\'', TokenKind::APOSTROPHE),
    ('{', TokenKind::OPENBRACE),
    ('[', TokenKind::OPENBRACKET),
    ('<', TokenKind::OPENANGLEBRACKET),
    ('(', TokenKind::OPENPAREN),
    ('}', TokenKind::CLOSEBRACE),
    (']', TokenKind::CLOSEBRACKET),
    ('>', TokenKind::CLOSEANGLEBRACKET),
    (')', TokenKind::CLOSEPAREN),
    ('&', TokenKind::AMPERSAND),
    ('*', TokenKind::ASTERISK),
    ('@', TokenKind::AT),
    ('`', TokenKind::BACKTICK),
    ('^', TokenKind::CARET),
    (':', TokenKind::COLON),
    (',', TokenKind::COMMA),
    ('$', TokenKind::DOLLAR),
    ('.', TokenKind::DOT),
    ('=', TokenKind::EQUALS),
    ('!', TokenKind::EXCLAMATION),
    ('-', TokenKind::HYPHEN),
    ('%', TokenKind::PERCENT),
    ('|', TokenKind::PIPE),
    ('+', TokenKind::PLUS),
    ('#', TokenKind::POUND),
    ('?', TokenKind::QUERY),
    ('"', TokenKind::QUOTE),
    ('/', TokenKind::SLASH),
    (';', TokenKind::SEMI),
    ('~', TokenKind::TILDE),
    ('_', TokenKind::UNDERSCORE),
    ('\\', TokenKind::BACKSLASH),
];

impl PartialEq for TokenKind {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TokenKind {}

impl Hash for TokenKind {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl Serialize for TokenKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name)
    }
}

/// Nomes dos grupos de tipos embutidos.
pub mod groups {
    pub const DOMAIN: &str = "domain";
    pub const NUMERIC: &str = "numeric";
    pub const LETTERS: &str = "letters";
    pub const TLD: &str = "tld";
    pub const SCHEME: &str = "scheme";
    pub const WHITESPACE: &str = "whitespace";
}

/// Um token primitivo emitido pelo scanner.
///
/// `start` e `end` são offsets em **bytes** no texto original (a unidade de
/// código de uma `str` em Rust), de modo que `text == &input[start..end]`.
/// O texto preserva a caixa original, mesmo que o casamento ignore caixa.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    /// Offset de byte inicial (inclusivo).
    pub start: usize,
    /// Offset de byte final (exclusivo).
    pub end: usize,
}

impl Token {
    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}

/// Registro dos tipos de token conhecidos e de seus grupos.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    kinds: Vec<TokenKind>,
    by_name: HashMap<&'static str, TokenKind>,
    groups: HashMap<&'static str, Vec<TokenKind>>,
}

impl Vocabulary {
    pub fn new() -> Self {
        let kinds = BUILTINS.to_vec();
        let by_name = kinds.iter().map(|k| (k.name, *k)).collect();

        let mut members: HashMap<&'static str, Vec<TokenKind>> = HashMap::new();
        members.insert(
            groups::DOMAIN,
            vec![
                TokenKind::WORD,
                TokenKind::UWORD,
                TokenKind::NUM,
                TokenKind::EMOJI,
                TokenKind::TLD,
                TokenKind::UTLD,
                TokenKind::SCHEME,
                TokenKind::SLASH_SCHEME,
                TokenKind::LOCALHOST,
            ],
        );
        members.insert(groups::NUMERIC, vec![TokenKind::NUM]);
        members.insert(groups::LETTERS, vec![TokenKind::WORD, TokenKind::UWORD]);
        members.insert(groups::TLD, vec![TokenKind::TLD, TokenKind::UTLD]);
        members.insert(
            groups::SCHEME,
            vec![TokenKind::SCHEME, TokenKind::SLASH_SCHEME],
        );
        members.insert(groups::WHITESPACE, vec![TokenKind::WS, TokenKind::NL]);

        Self {
            kinds,
            by_name,
            groups: members,
        }
    }

    /// Registra um novo tipo (ou devolve o existente com o mesmo nome) e o
    /// adiciona aos grupos indicados.
    ///
    /// Tipos nunca são removidos nem renomeados: o vocabulário só cresce.
    pub fn register(&mut self, name: &'static str, member_of: &[&'static str]) -> TokenKind {
        let kind = match self.by_name.get(name) {
            Some(existing) => *existing,
            None => {
                let kind = TokenKind {
                    id: self.kinds.len() as u16,
                    name,
                };
                self.kinds.push(kind);
                self.by_name.insert(name, kind);
                kind
            }
        };

        for &group in member_of {
            let members = self.groups.entry(group).or_default();
            if !members.contains(&kind) {
                members.push(kind);
            }
        }
        kind
    }

    pub fn get(&self, name: &str) -> Option<TokenKind> {
        self.by_name.get(name).copied()
    }

    /// Membros de um grupo (vazio se o grupo não existir).
    pub fn group(&self, name: &str) -> &[TokenKind] {
        self.groups.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn in_group(&self, name: &str, kind: TokenKind) -> bool {
        self.group(name).contains(&kind)
    }

    pub fn kinds(&self) -> &[TokenKind] {
        &self.kinds
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_ids_match_positions() {
        for (i, kind) in BUILTINS.iter().enumerate() {
            assert_eq!(kind.id() as usize, i, "id fora de ordem para {}", kind);
        }
    }

    #[test]
    fn test_punctuation_kinds_are_unique() {
        let mut ids: Vec<u16> = PUNCTUATION.iter().map(|(_, k)| k.id()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), PUNCTUATION.len());
    }

    #[test]
    fn test_register_is_append_only() {
        let mut vocab = Vocabulary::new();
        let before = vocab.len();

        let ticket = vocab.register("ticket", &[groups::DOMAIN]);
        assert_eq!(vocab.len(), before + 1);
        assert_eq!(ticket.id() as usize, before);
        assert!(vocab.in_group(groups::DOMAIN, ticket));

        // Registrar de novo devolve o mesmo tipo
        let again = vocab.register("ticket", &[groups::NUMERIC]);
        assert_eq!(again, ticket);
        assert_eq!(vocab.len(), before + 1);
        assert!(vocab.in_group(groups::NUMERIC, ticket));
    }

    #[test]
    fn test_builtin_lookup_by_name() {
        let vocab = Vocabulary::new();
        assert_eq!(vocab.get("slash_scheme"), Some(TokenKind::SLASH_SCHEME));
        assert_eq!(vocab.get("nope"), None);
        assert!(vocab.group("inexistente").is_empty());
    }

    #[test]
    fn test_kind_serializes_as_name() {
        let json = serde_json::to_string(&TokenKind::AT).unwrap();
        assert_eq!(json, "\"at\"");
    }
}
