//! # Scanner: Primeiro Estágio (caracteres → tokens primitivos)
//!
//! Responsável por dividir o texto bruto em tokens primitivos (palavras, números,
//! pontuação, esquemas, TLDs...). Cada token preserva sua posição original no
//! texto (offsets em bytes) e o texto com a caixa original.
//!
//! ## Algoritmo: maior casamento com retrocesso
//!
//! A partir da posição atual, o scanner caminha no autômato unidade por unidade
//! (uma unidade = um `char`, ou seja, um emoji fora do BMP conta como **uma**
//! unidade) e lembra o último estado de aceitação visto. Quando o autômato
//! "morre" (ou a entrada acaba), emite o token até esse último ponto de aceitação
//! e recomeça logo depois dele, descartando o que foi consumido além.
//!
//! ```text
//! "mailto"  m → a → i → l → t → o
//!           W   W   W   W   W   SCHEME     (W = aceita WORD)
//!                                  ↑ último ponto de aceitação: um único token
//! ```
//!
//! Para casar, letras ASCII são convertidas para minúsculas; o texto emitido
//! continua com a caixa original.
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use linkify_core::scanner::{self, ScannerBuilder};
//! use linkify_core::tokens::TokenKind;
//!
//! let automaton = ScannerBuilder::new(&[]).unwrap().freeze();
//! let tokens = scanner::run(&automaton, "Veja HTTPS://exemplo.com").unwrap();
//!
//! assert_eq!(tokens[2].kind, TokenKind::SLASH_SCHEME);
//! assert_eq!(tokens[2].text, "HTTPS");
//! ```

use tracing::{debug, warn};

use crate::config::SchemeSpec;
use crate::error::LinkifyError;
use crate::fsm::{AutomatonBuilder, CharAutomaton, CharClass, StateId};
use crate::tlds::{TLDS, UTLDS};
use crate::tokens::{Token, TokenKind, PUNCTUATION};

/// Joiner de largura zero: une emojis em uma sequência (ex: família 👨‍👩‍👧).
const ZERO_WIDTH_JOINER: char = '\u{200d}';
/// Seletor de variação que segue emojis como ❤️.
const EMOJI_VARIATION: char = '\u{fe0f}';

/// Autômato do scanner em construção, com os estados que plugins de token
/// precisam conhecer.
///
/// Plugins de token acrescentam transições **literais** a partir de
/// [`ScannerBuilder::start`]; como literais têm precedência sobre classes e sobre a
/// transição padrão, isso basta para criar novos tipos de token.
#[derive(Debug, Clone)]
pub struct ScannerBuilder {
    fsm: AutomatonBuilder,
    start: StateId,
    word: StateId,
    uword: StateId,
    non_accepting: StateId,
    letter: CharClass,
}

impl ScannerBuilder {
    /// Constrói o autômato embutido, incluindo os esquemas personalizados.
    pub fn new(custom_schemes: &[SchemeSpec]) -> Result<Self, LinkifyError> {
        let mut fsm = AutomatonBuilder::new();

        // Estados usados com frequência
        let start = fsm.state();
        let non_accepting = fsm.state(); // nunca recebe transições
        let num = fsm.accepting(TokenKind::NUM);
        let word = fsm.accepting(TokenKind::WORD);
        let uword = fsm.accepting(TokenKind::UWORD);
        let emoji = fsm.accepting(TokenKind::EMOJI);
        let ws = fsm.accepting(TokenKind::WS);
        let letter = CharClass::letter()?;

        let mut scanner = Self {
            fsm,
            start,
            word,
            uword,
            non_accepting,
            letter: letter.clone(),
        };

        // Pontuação: aceita imediatamente após o início
        let punctuation: Vec<(char, StateId)> = PUNCTUATION
            .iter()
            .map(|&(c, kind)| (c, scanner.fsm.accepting(kind)))
            .collect();
        scanner.fsm.batch(start, punctuation);

        // Espaços: uma sequência de brancos (exceto \n) é um único token
        let nl = scanner.fsm.accepting(TokenKind::NL);
        scanner.fsm.literal(start, '\n', nl);
        scanner.fsm.class(start, CharClass::Space, ws);
        let ws_newline = scanner.fsm.state();
        scanner.fsm.literal(ws, '\n', ws_newline);
        scanner.fsm.class(ws, CharClass::Space, ws);

        // TLDs (mais preciso em ordem alfabética)
        for tld in TLDS {
            let end = scanner.word_state(TokenKind::TLD);
            scanner.fsm.chain(start, tld, end, |f| word_like(f, word));
        }
        for utld in UTLDS {
            let end = scanner.uword_state(TokenKind::UTLD);
            scanner
                .fsm
                .chain(start, utld, end, |f| uword_like(f, uword, non_accepting, &letter));
        }

        // Esquemas embutidos
        let default_scheme = scanner.word_state(TokenKind::SCHEME);
        let default_slash_scheme = scanner.word_state(TokenKind::SLASH_SCHEME);
        scanner.chain_word("file", default_scheme);
        scanner.chain_word("mailto", default_scheme);
        scanner.chain_word("ftp", default_slash_scheme);
        scanner.chain_word("http", default_slash_scheme);
        // Variantes seguras (https, ftps) terminam com 's'
        scanner.fsm.literal(default_slash_scheme, 's', default_slash_scheme);

        scanner.register_schemes(custom_schemes)?;

        let localhost = scanner.word_state(TokenKind::LOCALHOST);
        scanner.chain_word("localhost", localhost);

        // Todo o resto: números, palavras, emojis
        let emoji_class = CharClass::pattern(r"[\p{Emoji}--\p{ASCII}]")?;
        let fsm = &mut scanner.fsm;
        fsm.class(start, CharClass::Digit, num);
        fsm.class(start, CharClass::AsciiLetter, word);
        fsm.class(start, letter.clone(), uword);
        fsm.class(start, emoji_class.clone(), emoji);
        fsm.literal(start, EMOJI_VARIATION, emoji);
        fsm.class(num, CharClass::Digit, num);
        fsm.class(word, CharClass::AsciiLetter, word);
        fsm.class(uword, CharClass::AsciiLetter, non_accepting);
        fsm.class(uword, letter, uword);
        fsm.class(emoji, emoji_class.clone(), emoji);
        fsm.literal(emoji, EMOJI_VARIATION, emoji);

        // Sequências de emojis unidas por ZWJ formam um único token
        let emoji_joiner = fsm.state();
        fsm.literal(emoji, ZERO_WIDTH_JOINER, emoji_joiner);
        fsm.class(emoji_joiner, emoji_class, emoji);
        fsm.literal(emoji_joiner, EMOJI_VARIATION, emoji);

        // Qualquer outro caractere é um símbolo
        let sym = fsm.accepting(TokenKind::SYM);
        fsm.fallback(start, sym)?;

        debug!(states = scanner.fsm.len(), "autômato do scanner construído");
        Ok(scanner)
    }

    pub fn start(&self) -> StateId {
        self.start
    }

    pub fn fsm(&self) -> &AutomatonBuilder {
        &self.fsm
    }

    pub fn fsm_mut(&mut self) -> &mut AutomatonBuilder {
        &mut self.fsm
    }

    /// Estado que emite `kind`, mas que vira uma palavra comum se seguido de mais
    /// letras ASCII ("comcast" não é o TLD `com` seguido de lixo).
    pub fn word_state(&mut self, kind: TokenKind) -> StateId {
        let word = self.word;
        let state = word_like(&mut self.fsm, word);
        self.fsm.set_accepts(state, kind);
        state
    }

    /// Como [`Self::word_state`], para palavras de alfabetos não-ASCII.
    pub fn uword_state(&mut self, kind: TokenKind) -> StateId {
        let (uword, non_accepting) = (self.uword, self.non_accepting);
        let state = uword_like(&mut self.fsm, uword, non_accepting, &self.letter);
        self.fsm.set_accepts(state, kind);
        state
    }

    /// Insere um literal a partir do início cujos prefixos são palavras comuns.
    pub fn chain_word(&mut self, literal: &str, end: StateId) -> StateId {
        let word = self.word;
        self.fsm
            .chain(self.start, literal, end, |f| word_like(f, word))
    }

    /// Registra esquemas personalizados, em ordem alfabética.
    ///
    /// Esquemas compostos (`view-source`) são encadeados parte por parte através de
    /// `-`. Um esquema cujo separador `//` é opcional emite `SCHEME`; os demais,
    /// `SLASH_SCHEME`.
    ///
    /// Literais embutidos têm prioridade: um esquema que coincide com um TLD ou
    /// esquema embutido (`app`, `http`) mantém o tipo já registrado, e uma parte
    /// de esquema composto (`ms` em `ms-settings`) não altera o tipo da parte.
    fn register_schemes(&mut self, custom_schemes: &[SchemeSpec]) -> Result<(), LinkifyError> {
        let custom_scheme = self.word_state(TokenKind::SCHEME);
        let custom_slash_scheme = self.word_state(TokenKind::SLASH_SCHEME);
        let compound_scheme = self.fsm.accepting(TokenKind::SCHEME);
        let compound_slash_scheme = self.fsm.accepting(TokenKind::SLASH_SCHEME);

        let mut sorted: Vec<&SchemeSpec> = custom_schemes.iter().collect();
        sorted.sort_by(|a, b| a.scheme.cmp(&b.scheme));

        for spec in sorted {
            spec.validate()?;
            let parts: Vec<&str> = spec.scheme.split('-').collect();
            let end_state = match (parts.len() == 1, spec.optional_slashes) {
                (true, true) => custom_scheme,
                (true, false) => custom_slash_scheme,
                (false, true) => compound_scheme,
                (false, false) => compound_slash_scheme,
            };

            let mut state = self.start;
            for (j, part) in parts.iter().enumerate() {
                let last = j == parts.len() - 1;
                let word = self.word;
                state = if j == 0 {
                    let end = if last { end_state } else { word_like(&mut self.fsm, word) };
                    self.fsm.chain(state, part, end, |f| word_like(f, word))
                } else {
                    let end = if last { end_state } else { self.fsm.state() };
                    self.fsm.chain(state, part, end, |f| f.state())
                };
                if !last {
                    state = self.fsm.literal_or_insert(state, '-', |f| f.state());
                }
            }

            let registered = self.fsm.accepts(state);
            if registered != self.fsm.accepts(end_state) {
                warn!(
                    scheme = %spec.scheme,
                    kind = registered.map_or("nenhum", |k| k.name()),
                    "esquema coincide com um literal embutido; mantido o tipo existente"
                );
                continue;
            }
            debug!(scheme = %spec.scheme, "esquema personalizado registrado");
        }
        Ok(())
    }

    /// Encerra a construção.
    pub fn freeze(self) -> CharAutomaton {
        self.fsm.freeze(self.start)
    }
}

/// Estado que aceita WORD e continua como palavra com mais letras ASCII.
fn word_like(fsm: &mut AutomatonBuilder, word: StateId) -> StateId {
    let state = fsm.accepting(TokenKind::WORD);
    fsm.class(state, CharClass::AsciiLetter, word);
    state
}

/// Estado que aceita UWORD; uma letra ASCII interrompe a palavra.
fn uword_like(
    fsm: &mut AutomatonBuilder,
    uword: StateId,
    non_accepting: StateId,
    letter: &CharClass,
) -> StateId {
    let state = fsm.accepting(TokenKind::UWORD);
    fsm.class(state, CharClass::AsciiLetter, non_accepting);
    fsm.class(state, letter.clone(), uword);
    state
}

/// Varre `text` e devolve a sequência de tokens primitivos.
///
/// A sequência é ordenada, contígua e sem sobreposição: concatenar os textos dos
/// tokens reproduz `text` exatamente.
///
/// # Erros
/// [`LinkifyError::MalformedAutomaton`] se, de alguma posição, nenhum estado de
/// aceitação for alcançável. Com o autômato embutido isso não acontece, pois o
/// estado inicial tem transição padrão para `SYM`.
pub fn run(automaton: &CharAutomaton, text: &str) -> Result<Vec<Token>, LinkifyError> {
    // (offset em bytes, unidade já normalizada para o casamento)
    let units: Vec<(usize, char)> = text
        .char_indices()
        .map(|(i, c)| (i, c.to_ascii_lowercase()))
        .collect();

    let mut tokens = Vec::new();
    let mut cursor = 0;

    while cursor < units.len() {
        let mut state = automaton.start();
        let mut consumed = 0;
        // (comprimento em unidades, tipo aceito)
        let mut checkpoint: Option<(usize, TokenKind)> = None;

        while let Some(&(_, unit)) = units.get(cursor + consumed) {
            let Some(next) = automaton.step(state, unit) else {
                break;
            };
            state = next;
            consumed += 1;
            if let Some(kind) = automaton.accepts(state) {
                checkpoint = Some((consumed, kind));
            }
        }

        let start = units[cursor].0;
        let Some((length, kind)) = checkpoint else {
            return Err(LinkifyError::MalformedAutomaton { offset: start });
        };

        // Retrocede até o último ponto de aceitação
        let end = units
            .get(cursor + length)
            .map_or(text.len(), |&(offset, _)| offset);
        tokens.push(Token {
            kind,
            text: text[start..end].to_string(),
            start,
            end,
        });
        cursor += length;
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn automaton() -> CharAutomaton {
        ScannerBuilder::new(&[]).unwrap().freeze()
    }

    fn kinds(text: &str) -> Vec<TokenKind> {
        run(&automaton(), text)
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    fn texts(text: &str) -> Vec<String> {
        run(&automaton(), text)
            .unwrap()
            .into_iter()
            .map(|t| t.text)
            .collect()
    }

    #[test]
    fn test_empty_input() {
        assert!(run(&automaton(), "").unwrap().is_empty());
    }

    #[test]
    fn test_basic_url_tokens() {
        assert_eq!(
            kinds("http://example.com"),
            vec![
                TokenKind::SLASH_SCHEME,
                TokenKind::COLON,
                TokenKind::SLASH,
                TokenKind::SLASH,
                TokenKind::WORD,
                TokenKind::DOT,
                TokenKind::TLD,
            ]
        );
    }

    #[test]
    fn test_case_fold_matching_preserves_text() {
        assert_eq!(kinds("HTTP://EXAMPLE.COM"), kinds("http://example.com"));
        assert_eq!(
            texts("HTTP://EXAMPLE.COM"),
            vec!["HTTP", ":", "/", "/", "EXAMPLE", ".", "COM"]
        );
    }

    #[test]
    fn test_prefix_sharing_between_tlds() {
        let co = run(&automaton(), "example.co").unwrap();
        assert_eq!(co.last().unwrap().kind, TokenKind::TLD);
        assert_eq!(co.last().unwrap().text, "co");

        let com = run(&automaton(), "example.com").unwrap();
        assert_eq!(com.last().unwrap().kind, TokenKind::TLD);
        assert_eq!(com.last().unwrap().text, "com");

        assert_eq!(kinds("comcast"), vec![TokenKind::WORD]);
    }

    #[test]
    fn test_rollback_to_scheme() {
        let tokens = run(&automaton(), "mailto").unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::SCHEME);
        assert_eq!((tokens[0].start, tokens[0].end), (0, 6));
    }

    #[test]
    fn test_secure_schemes() {
        assert_eq!(kinds("https"), vec![TokenKind::SLASH_SCHEME]);
        assert_eq!(kinds("ftps"), vec![TokenKind::SLASH_SCHEME]);
        assert_eq!(kinds("httpx"), vec![TokenKind::WORD]);
    }

    #[test]
    fn test_localhost() {
        assert_eq!(kinds("localhost"), vec![TokenKind::LOCALHOST]);
        assert_eq!(kinds("localhosts"), vec![TokenKind::WORD]);
    }

    #[test]
    fn test_whitespace_and_newlines() {
        assert_eq!(
            kinds("a  \t\nb"),
            vec![TokenKind::WORD, TokenKind::WS, TokenKind::NL, TokenKind::WORD]
        );
        assert_eq!(texts("a  \t\nb")[1], "  \t");
    }

    #[test]
    fn test_numbers_and_words_split() {
        assert_eq!(kinds("hello123"), vec![TokenKind::WORD, TokenKind::NUM]);
        // "abc" é um TLD, e o número não o transforma em palavra
        assert_eq!(kinds("abc123"), vec![TokenKind::TLD, TokenKind::NUM]);
    }

    #[test]
    fn test_unicode_words() {
        // Uma letra ASCII interrompe a palavra Unicode
        assert_eq!(
            kinds("ação"),
            vec![TokenKind::WORD, TokenKind::UWORD, TokenKind::WORD]
        );
        assert_eq!(kinds("привет"), vec![TokenKind::UWORD]);
        assert_eq!(kinds("пример.рф").last(), Some(&TokenKind::UTLD));
    }

    #[test]
    fn test_emoji_joining() {
        // homem + ZWJ + mulher: três unidades, um token
        let text = "👨\u{200d}👩";
        let tokens = run(&automaton(), text).unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::EMOJI);
        assert_eq!(tokens[0].end, text.len());
    }

    #[test]
    fn test_astral_char_is_one_unit() {
        let tokens = run(&automaton(), "😀!").unwrap();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].text, "😀");
        assert_eq!((tokens[1].start, tokens[1].end), (4, 5));
    }

    #[test]
    fn test_unknown_symbol_falls_back() {
        assert_eq!(kinds("€"), vec![TokenKind::SYM]);
    }

    #[test]
    fn test_custom_schemes() {
        let schemes = vec![
            SchemeSpec::new("steam", false),
            SchemeSpec::new("view-source", true),
            SchemeSpec::new("magnet", true),
        ];
        let automaton = ScannerBuilder::new(&schemes).unwrap().freeze();
        let kinds = |text: &str| -> Vec<TokenKind> {
            run(&automaton, text).unwrap().into_iter().map(|t| t.kind).collect()
        };

        assert_eq!(kinds("steam"), vec![TokenKind::SLASH_SCHEME]);
        assert_eq!(kinds("magnet"), vec![TokenKind::SCHEME]);
        assert_eq!(kinds("view-source"), vec![TokenKind::SCHEME]);
        // Sem a segunda parte, volta a ser palavra + hífen
        assert_eq!(kinds("view-"), vec![TokenKind::WORD, TokenKind::HYPHEN]);
    }

    #[test]
    fn test_compound_scheme_keeps_builtin_prefixes() {
        let schemes = vec![
            SchemeSpec::new("ms-settings", false),
            SchemeSpec::new("http-alt", false),
        ];
        let automaton = ScannerBuilder::new(&schemes).unwrap().freeze();
        let kinds = |text: &str| -> Vec<TokenKind> {
            run(&automaton, text).unwrap().into_iter().map(|t| t.kind).collect()
        };

        assert_eq!(
            kinds("exemplo.ms"),
            vec![TokenKind::WORD, TokenKind::DOT, TokenKind::TLD]
        );
        assert_eq!(kinds("ms"), vec![TokenKind::TLD]);
        assert_eq!(kinds("http"), vec![TokenKind::SLASH_SCHEME]);
        assert_eq!(kinds("https"), vec![TokenKind::SLASH_SCHEME]);
        assert_eq!(kinds("ftp"), vec![TokenKind::SLASH_SCHEME]);
        assert_eq!(kinds("ms-settings"), vec![TokenKind::SLASH_SCHEME]);
        assert_eq!(kinds("http-alt"), vec![TokenKind::SLASH_SCHEME]);
        assert_eq!(
            kinds("ms-x"),
            vec![TokenKind::TLD, TokenKind::HYPHEN, TokenKind::WORD]
        );
    }

    #[test]
    fn test_scheme_colliding_with_tld_keeps_tld() {
        let schemes = vec![SchemeSpec::new("app", false)];
        let automaton = ScannerBuilder::new(&schemes).unwrap().freeze();
        let tokens = run(&automaton, "exemplo.app").unwrap();

        assert_eq!(tokens.last().unwrap().kind, TokenKind::TLD);
        assert_eq!(run(&automaton, "app").unwrap()[0].kind, TokenKind::TLD);
        assert_eq!(run(&automaton, "apple").unwrap()[0].kind, TokenKind::TLD);
    }

    #[test]
    fn test_combining_mark_is_not_a_letter() {
        // Sinal de vogal devanágari isolado não inicia palavra Unicode
        assert_eq!(kinds("\u{093e}"), vec![TokenKind::SYM]);
        assert_eq!(kinds("Ⅻ"), vec![TokenKind::SYM]);
    }

    #[test]
    fn test_invalid_custom_scheme_is_rejected() {
        let schemes = vec![SchemeSpec::new("no spaces", false)];
        assert!(matches!(
            ScannerBuilder::new(&schemes),
            Err(LinkifyError::InvalidScheme { .. })
        ));
    }

    #[test]
    fn test_automaton_without_fallback_is_malformed() {
        let mut fsm = AutomatonBuilder::new();
        let start = fsm.state();
        let word = fsm.accepting(TokenKind::WORD);
        fsm.class(start, CharClass::AsciiLetter, word);
        let automaton = fsm.freeze(start);

        let err = run(&automaton, "ab!").unwrap_err();
        assert!(matches!(err, LinkifyError::MalformedAutomaton { offset: 2 }));
    }
}
