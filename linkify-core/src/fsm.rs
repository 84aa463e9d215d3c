//! # Construtor de Autômatos por Caractere
//!
//! O scanner é dirigido por um autômato finito determinístico construído a partir de
//! **literais** (ex: TLDs, esquemas) e **classes de caracteres** (ex: letras, dígitos).
//!
//! ## Representação
//!
//! Os estados vivem em uma arena (`Vec<CharState>`) e as transições guardam apenas
//! índices ([`StateId`]). Ciclos (laços para classes repetíveis, prefixos
//! compartilhados) são apenas índices repetidos: não existe posse entre estados.
//!
//! ## Precedência das transições
//!
//! Em cada estado, para uma unidade de entrada:
//! 1. transição **literal** exata;
//! 2. primeira transição de **classe** cujo predicado casa (na ordem de inserção);
//! 3. transição **padrão** (no máximo uma por estado).
//!
//! ## Ciclo de vida
//!
//! [`AutomatonBuilder`] é mutável; [`AutomatonBuilder::freeze`] produz um
//! [`CharAutomaton`] imutável, que pode ser lido por várias threads sem trava.
//!
//! ```rust
//! use linkify_core::fsm::{AutomatonBuilder, CharClass};
//! use linkify_core::tokens::TokenKind;
//!
//! let mut fsm = AutomatonBuilder::new();
//! let start = fsm.state();
//! let word = fsm.accepting(TokenKind::WORD);
//! fsm.class(start, CharClass::AsciiLetter, word);
//! fsm.class(word, CharClass::AsciiLetter, word);
//!
//! let automaton = fsm.freeze(start);
//! let next = automaton.step(automaton.start(), 'a').unwrap();
//! assert_eq!(automaton.accepts(next), Some(TokenKind::WORD));
//! ```

use std::collections::HashMap;

use regex::Regex;

use crate::error::LinkifyError;
use crate::tokens::TokenKind;

/// Índice de um estado na arena do autômato.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StateId(usize);

impl StateId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Predicado sobre uma unidade de varredura.
#[derive(Debug, Clone)]
pub enum CharClass {
    /// `a-z` (a entrada já chega com letras ASCII em minúsculas).
    AsciiLetter,
    /// `0-9`.
    Digit,
    /// Espaço em branco Unicode (inclui `\n`, mas literais vêm antes).
    Space,
    /// Expressão regular ancorada que deve casar a unidade inteira.
    Pattern(Regex),
}

impl CharClass {
    /// Compila uma classe a partir de uma expressão regular (ex: `\p{Emoji}`).
    pub fn pattern(pattern: &str) -> Result<Self, LinkifyError> {
        let anchored = Regex::new(&format!("^(?:{pattern})$"))?;
        Ok(CharClass::Pattern(anchored))
    }

    /// Letras Unicode (categoria geral `L`). Marcas combinantes não entram.
    pub fn letter() -> Result<Self, LinkifyError> {
        Self::pattern(r"\p{L}")
    }

    pub fn matches(&self, unit: char) -> bool {
        match self {
            CharClass::AsciiLetter => unit.is_ascii_lowercase(),
            CharClass::Digit => unit.is_ascii_digit(),
            CharClass::Space => unit.is_whitespace(),
            CharClass::Pattern(regex) => {
                let mut buf = [0u8; 4];
                regex.is_match(unit.encode_utf8(&mut buf))
            }
        }
    }
}

/// Um nó do autômato.
#[derive(Debug, Clone, Default)]
struct CharState {
    accepts: Option<TokenKind>,
    literals: HashMap<char, StateId>,
    classes: Vec<(CharClass, StateId)>,
    fallback: Option<StateId>,
}

/// Fase mutável: cria estados e transições.
#[derive(Debug, Clone, Default)]
pub struct AutomatonBuilder {
    states: Vec<CharState>,
}

impl AutomatonBuilder {
    pub fn new() -> Self {
        Self { states: Vec::new() }
    }

    /// Cria um estado que não aceita.
    pub fn state(&mut self) -> StateId {
        self.states.push(CharState::default());
        StateId(self.states.len() - 1)
    }

    /// Cria um estado de aceitação que emite `kind`.
    pub fn accepting(&mut self, kind: TokenKind) -> StateId {
        let id = self.state();
        self.states[id.0].accepts = Some(kind);
        id
    }

    pub fn accepts(&self, state: StateId) -> Option<TokenKind> {
        self.states[state.0].accepts
    }

    pub fn set_accepts(&mut self, state: StateId, kind: TokenKind) {
        self.states[state.0].accepts = Some(kind);
    }

    /// Transição literal exata, substituindo uma anterior para a mesma unidade.
    pub fn literal(&mut self, from: StateId, unit: char, to: StateId) {
        self.states[from.0].literals.insert(unit, to);
    }

    /// Destino da transição literal, se existir.
    pub fn literal_target(&self, from: StateId, unit: char) -> Option<StateId> {
        self.states[from.0].literals.get(&unit).copied()
    }

    /// Segue a transição literal existente ou cria uma nova com `make`.
    pub fn literal_or_insert<F>(&mut self, from: StateId, unit: char, make: F) -> StateId
    where
        F: FnOnce(&mut Self) -> StateId,
    {
        if let Some(existing) = self.literal_target(from, unit) {
            return existing;
        }
        let next = make(self);
        self.literal(from, unit, next);
        next
    }

    /// Várias transições literais de uma vez (ex: pontuação).
    pub fn batch<I>(&mut self, from: StateId, transitions: I)
    where
        I: IntoIterator<Item = (char, StateId)>,
    {
        for (unit, to) in transitions {
            self.literal(from, unit, to);
        }
    }

    /// Acrescenta uma transição de classe; as anteriores têm prioridade.
    pub fn class(&mut self, from: StateId, class: CharClass, to: StateId) {
        self.states[from.0].classes.push((class, to));
    }

    /// Define a transição padrão (fallback), a última tentada.
    pub fn fallback(&mut self, from: StateId, to: StateId) -> Result<(), LinkifyError> {
        let state = &mut self.states[from.0];
        if state.fallback.is_some() {
            return Err(LinkifyError::DuplicateDefault { state: from.0 });
        }
        state.fallback = Some(to);
        Ok(())
    }

    /// Insere `literal` como uma cadeia de transições a partir de `start`.
    ///
    /// Prefixos já presentes são reaproveitados (compartilhamento de prefixos entre
    /// TLDs como `co` e `com`); estados intermediários novos vêm de `continuation`;
    /// a última unidade aponta para `end`.
    ///
    /// Se o literal inteiro já existia como caminho, o estado final existente é
    /// devolvido no lugar de `end`. Ele só passa a aceitar o tipo de `end` quando
    /// ainda não aceitava nada ou aceitava uma palavra genérica (`WORD`, `UWORD`)
    /// e `end` traz um tipo específico. Um tipo específico nunca é trocado: o
    /// primeiro literal registrado prevalece.
    ///
    /// `chain` não acrescenta a `end` a transição que degrada o literal numa
    /// palavra mais longa; quem chama passa um `end` que já a tem (ver
    /// [`crate::scanner::ScannerBuilder::word_state`]).
    ///
    /// Retorna o estado onde a cadeia terminou.
    pub fn chain<F>(&mut self, start: StateId, literal: &str, end: StateId, mut continuation: F) -> StateId
    where
        F: FnMut(&mut Self) -> StateId,
    {
        let units: Vec<char> = literal.chars().map(|c| c.to_ascii_lowercase()).collect();
        let Some((&last, prefix)) = units.split_last() else {
            return start;
        };

        let mut state = start;
        for &unit in prefix {
            state = match self.literal_target(state, unit) {
                Some(next) => next,
                None => {
                    let next = continuation(self);
                    self.literal(state, unit, next);
                    next
                }
            };
        }

        match self.literal_target(state, last) {
            Some(existing) => {
                if let Some(kind) = self.accepts(end) {
                    let upgradable = self.accepts(existing).map_or(true, is_generic);
                    if existing != end && upgradable && !is_generic(kind) {
                        self.set_accepts(existing, kind);
                    }
                }
                existing
            }
            None => {
                self.literal(state, last, end);
                end
            }
        }
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Encerra a fase de construção.
    pub fn freeze(self, start: StateId) -> CharAutomaton {
        CharAutomaton {
            states: self.states,
            start,
        }
    }
}

fn is_generic(kind: TokenKind) -> bool {
    kind == TokenKind::WORD || kind == TokenKind::UWORD
}

/// Autômato congelado: somente leitura, `Send + Sync`.
#[derive(Debug, Clone)]
pub struct CharAutomaton {
    states: Vec<CharState>,
    start: StateId,
}

impl CharAutomaton {
    pub fn start(&self) -> StateId {
        self.start
    }

    /// Próximo estado para `unit`: literal, depois classes, depois padrão.
    pub fn step(&self, from: StateId, unit: char) -> Option<StateId> {
        let state = &self.states[from.0];
        if let Some(next) = state.literals.get(&unit) {
            return Some(*next);
        }
        state
            .classes
            .iter()
            .find(|(class, _)| class.matches(unit))
            .map(|(_, next)| *next)
            .or(state.fallback)
    }

    pub fn accepts(&self, state: StateId) -> Option<TokenKind> {
        self.states[state.0].accepts
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walk(automaton: &CharAutomaton, input: &str) -> Option<StateId> {
        input
            .chars()
            .try_fold(automaton.start(), |state, c| automaton.step(state, c))
    }

    #[test]
    fn test_literal_beats_class_beats_default() {
        let mut fsm = AutomatonBuilder::new();
        let start = fsm.state();
        let lit = fsm.accepting(TokenKind::AT);
        let cls = fsm.accepting(TokenKind::WORD);
        let def = fsm.accepting(TokenKind::SYM);
        fsm.class(start, CharClass::AsciiLetter, cls);
        fsm.literal(start, 'a', lit);
        fsm.fallback(start, def).unwrap();

        let automaton = fsm.freeze(start);
        assert_eq!(automaton.step(start, 'a'), Some(lit));
        assert_eq!(automaton.step(start, 'b'), Some(cls));
        assert_eq!(automaton.step(start, '€'), Some(def));
    }

    #[test]
    fn test_first_matching_class_wins() {
        let mut fsm = AutomatonBuilder::new();
        let start = fsm.state();
        let digit = fsm.accepting(TokenKind::NUM);
        let letter = fsm.accepting(TokenKind::UWORD);
        fsm.class(start, CharClass::Digit, digit);
        fsm.class(start, CharClass::pattern(r"[0-9a-z]").unwrap(), letter);

        let automaton = fsm.freeze(start);
        assert_eq!(automaton.step(start, '7'), Some(digit));
        assert_eq!(automaton.step(start, 'q'), Some(letter));
    }

    #[test]
    fn test_second_default_is_rejected() {
        let mut fsm = AutomatonBuilder::new();
        let start = fsm.state();
        let sym = fsm.accepting(TokenKind::SYM);
        fsm.fallback(start, sym).unwrap();
        let err = fsm.fallback(start, sym).unwrap_err();
        assert!(matches!(err, LinkifyError::DuplicateDefault { state } if state == start.index()));
    }

    #[test]
    fn test_chain_shares_prefixes() {
        let mut fsm = AutomatonBuilder::new();
        let start = fsm.state();
        let co = fsm.accepting(TokenKind::TLD);
        let com = fsm.accepting(TokenKind::TLD);

        fsm.chain(start, "co", co, |f| f.accepting(TokenKind::WORD));
        let before = fsm.len();
        fsm.chain(start, "com", com, |f| f.accepting(TokenKind::WORD));
        // "c" e "o" foram reaproveitados: nenhum estado intermediário novo
        assert_eq!(fsm.len(), before);

        let automaton = fsm.freeze(start);
        assert_eq!(walk(&automaton, "co"), Some(co));
        assert_eq!(walk(&automaton, "com"), Some(com));
    }

    #[test]
    fn test_chain_upgrades_existing_path() {
        let mut fsm = AutomatonBuilder::new();
        let start = fsm.state();
        let com = fsm.accepting(TokenKind::TLD);
        let co = fsm.accepting(TokenKind::TLD);

        // Ordem inversa: "com" primeiro cria "co" como intermediário
        fsm.chain(start, "com", com, |f| f.accepting(TokenKind::WORD));
        let reached = fsm.chain(start, "co", co, |f| f.accepting(TokenKind::WORD));
        assert_ne!(reached, co);
        assert_eq!(fsm.accepts(reached), Some(TokenKind::TLD));
    }

    #[test]
    fn test_chain_never_replaces_specific_kind() {
        let mut fsm = AutomatonBuilder::new();
        let start = fsm.state();
        let ms = fsm.accepting(TokenKind::TLD);
        fsm.chain(start, "ms", ms, |f| f.accepting(TokenKind::WORD));

        // Uma palavra genérica não rebaixa o TLD
        let word = fsm.accepting(TokenKind::WORD);
        assert_eq!(fsm.chain(start, "ms", word, |f| f.state()), ms);
        assert_eq!(fsm.accepts(ms), Some(TokenKind::TLD));

        // Outro tipo específico também não o substitui
        let scheme = fsm.accepting(TokenKind::SLASH_SCHEME);
        assert_eq!(fsm.chain(start, "ms", scheme, |f| f.state()), ms);
        assert_eq!(fsm.accepts(ms), Some(TokenKind::TLD));
    }

    #[test]
    fn test_chain_upgrades_non_accepting_path() {
        let mut fsm = AutomatonBuilder::new();
        let start = fsm.state();
        let end = fsm.accepting(TokenKind::SCHEME);
        fsm.chain(start, "abc", end, |f| f.state());

        let ab = fsm.accepting(TokenKind::LOCALHOST);
        let reached = fsm.chain(start, "ab", ab, |f| f.state());
        assert_eq!(fsm.accepts(reached), Some(TokenKind::LOCALHOST));
    }

    #[test]
    fn test_letter_class_is_general_category_l() {
        let letter = CharClass::letter().unwrap();
        assert!(letter.matches('ж'));
        assert!(letter.matches('中'));
        // Sinal de vogal (Mc) e numeral romano (Nl) são alfabéticos, mas não letras
        assert!('\u{093e}'.is_alphabetic());
        assert!(!letter.matches('\u{093e}'));
        assert!(!letter.matches('Ⅻ'));
        assert!(!letter.matches('7'));
    }

    #[test]
    fn test_chain_is_case_insensitive() {
        let mut fsm = AutomatonBuilder::new();
        let start = fsm.state();
        let end = fsm.accepting(TokenKind::SCHEME);
        fsm.chain(start, "MailTo", end, |f| f.state());

        let automaton = fsm.freeze(start);
        assert_eq!(walk(&automaton, "mailto"), Some(end));
    }

    #[test]
    fn test_pattern_class_matches_single_unit() {
        let emoji = CharClass::pattern(r"\p{Emoji}").unwrap();
        assert!(emoji.matches('😀'));
        assert!(!emoji.matches('a'));
        assert!(CharClass::pattern("(").is_err());
    }
}
