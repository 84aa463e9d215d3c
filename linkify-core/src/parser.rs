//! # Gramática Embutida: URLs e E-mails
//!
//! Registra no [`GrammarBuilder`] os caminhos que reconhecem URLs e e-mails a
//! partir de tokens primitivos, e define os comportamentos
//! ([`UrlBehavior`], [`EmailBehavior`]) dessas duas entidades.
//!
//! ## URLs
//!
//! ```text
//! example.com                      domínio + TLD
//! localhost:8080/api               localhost, porta, caminho
//! https://site.com/a_(b)?q=1#x     esquema, parênteses balanceados, query, fragmento
//! mailto:alguem@site.com           esquema sem "//"
//! ```
//!
//! Pontuação no fim de uma URL (`.`, `,`, `)`...) só é incluída se algo válido
//! vier depois dela: "veja site.com/a." reconhece `site.com/a`.
//!
//! ## E-mails
//!
//! ```text
//! fulano.tal+news@mail.site.com.br
//! nome@localhost
//! ```
//!
//! Os conjuntos de tipos vêm do [`Vocabulary`], de modo que tipos registrados
//! por plugins de token no grupo `domain` também podem compor domínios.

use tracing::debug;

use crate::entity::{Candidate, EntityBehavior, EntityKind};
use crate::error::LinkifyError;
use crate::grammar::{GrammarBuilder, NodeId};
use crate::tokens::{groups, TokenKind, Vocabulary};

/// Tamanho máximo de um rótulo de domínio, em bytes.
const MAX_LABEL_LEN: usize = 63;
/// Tamanho máximo de um nome de host, em bytes.
const MAX_HOST_LEN: usize = 253;
/// Tamanho máximo da parte local de um e-mail, em bytes.
const MAX_LOCAL_PART_LEN: usize = 64;

/// Símbolos aceitos na parte local de um e-mail (além de palavras e números).
const LOCALPART_SYMBOLS: [TokenKind; 20] = [
    TokenKind::AMPERSAND,
    TokenKind::APOSTROPHE,
    TokenKind::ASTERISK,
    TokenKind::BACKSLASH,
    TokenKind::BACKTICK,
    TokenKind::CARET,
    TokenKind::DOLLAR,
    TokenKind::EQUALS,
    TokenKind::HYPHEN,
    TokenKind::OPENBRACE,
    TokenKind::CLOSEBRACE,
    TokenKind::PERCENT,
    TokenKind::PIPE,
    TokenKind::PLUS,
    TokenKind::POUND,
    TokenKind::QUERY,
    TokenKind::SLASH,
    TokenKind::SYM,
    TokenKind::TILDE,
    TokenKind::UNDERSCORE,
];

/// Símbolos que podem terminar uma URL.
const URL_ACCEPTING_SYMBOLS: [TokenKind; 17] = [
    TokenKind::AT,
    TokenKind::ASTERISK,
    TokenKind::AMPERSAND,
    TokenKind::BACKSLASH,
    TokenKind::BACKTICK,
    TokenKind::CARET,
    TokenKind::DOLLAR,
    TokenKind::EQUALS,
    TokenKind::HYPHEN,
    TokenKind::PERCENT,
    TokenKind::PIPE,
    TokenKind::PLUS,
    TokenKind::POUND,
    TokenKind::SLASH,
    TokenKind::SYM,
    TokenKind::TILDE,
    TokenKind::UNDERSCORE,
];

/// Símbolos que podem aparecer no meio de uma URL, mas não no fim.
const URL_NON_ACCEPTING_SYMBOLS: [TokenKind; 13] = [
    TokenKind::APOSTROPHE,
    TokenKind::COLON,
    TokenKind::COMMA,
    TokenKind::DOT,
    TokenKind::EXCLAMATION,
    TokenKind::QUERY,
    TokenKind::QUOTE,
    TokenKind::SEMI,
    TokenKind::CLOSEPAREN,
    TokenKind::CLOSEBRACKET,
    TokenKind::CLOSEBRACE,
    TokenKind::CLOSEANGLEBRACKET,
    TokenKind::OPENANGLEBRACKET,
];

/// Pares de delimitadores balanceados dentro de URLs.
const BRACKET_PAIRS: [(TokenKind, TokenKind); 3] = [
    (TokenKind::OPENPAREN, TokenKind::CLOSEPAREN),
    (TokenKind::OPENBRACKET, TokenKind::CLOSEBRACKET),
    (TokenKind::OPENBRACE, TokenKind::CLOSEBRACE),
];

/// Tokens que encerram o host de uma URL sem esquema.
const HOST_TERMINATORS: [TokenKind; 4] = [
    TokenKind::COLON,
    TokenKind::SLASH,
    TokenKind::QUERY,
    TokenKind::POUND,
];

fn except(set: &[TokenKind], excluded: &[TokenKind]) -> Vec<TokenKind> {
    set.iter()
        .copied()
        .filter(|k| !excluded.contains(k))
        .collect()
}

fn union(a: &[TokenKind], b: &[TokenKind]) -> Vec<TokenKind> {
    let mut out = a.to_vec();
    out.extend(b.iter().copied().filter(|k| !a.contains(k)));
    out
}

/// Estados compartilhados entre os caminhos de domínio e de e-mail.
struct DomainStates {
    domain: NodeId,
    hyphen: NodeId,
    dot: NodeId,
    localpart: NodeId,
    localpart_at: NodeId,
}

/// Transições de "algo que parece um domínio": mais palavras, hífen, ponto ou
/// o início de um e-mail.
fn domain_edges(
    g: &mut GrammarBuilder,
    from: NodeId,
    domain: &[TokenKind],
    states: &DomainStates,
) -> Result<(), LinkifyError> {
    g.connect_all(from, domain, states.domain)?;
    g.connect(from, TokenKind::HYPHEN, states.hyphen)?;
    g.connect(from, TokenKind::DOT, states.dot)?;
    g.connect(from, TokenKind::AT, states.localpart_at)?;
    g.connect_all(
        from,
        &except(&LOCALPART_SYMBOLS, &[TokenKind::HYPHEN]),
        states.localpart,
    )
}

/// Registra a gramática de URLs e e-mails.
pub fn init(vocabulary: &Vocabulary, g: &mut GrammarBuilder) -> Result<(), LinkifyError> {
    let domain = vocabulary.group(groups::DOMAIN).to_vec();
    let tlds = vocabulary.group(groups::TLD).to_vec();
    let start = g.start();

    let states = DomainStates {
        domain: g.state(),
        hyphen: g.state(),
        dot: g.state(),
        localpart: g.state(),
        localpart_at: g.state(),
    };
    let domain_dot_tld = g.accepting(EntityKind::URL);

    // Início
    let plain = except(
        &domain,
        &[TokenKind::SCHEME, TokenKind::SLASH_SCHEME, TokenKind::LOCALHOST],
    );
    g.connect_all(start, &plain, states.domain)?;
    g.connect(start, TokenKind::LOCALHOST, domain_dot_tld)?;
    let scheme = g.step(start, TokenKind::SCHEME);
    let slash_scheme = g.step(start, TokenKind::SLASH_SCHEME);

    // Domínio: palavras separadas por hífens e pontos
    domain_edges(g, states.domain, &domain, &states)?;
    g.connect_all(states.hyphen, &domain, states.domain)?;
    g.connect(states.hyphen, TokenKind::HYPHEN, states.hyphen)?;
    g.connect_all(states.dot, &tlds, domain_dot_tld)?;
    g.connect_all(states.dot, &except(&domain, &tlds), states.domain)?;

    // Esquemas também são palavras ("http.example.com")
    domain_edges(g, scheme, &domain, &states)?;
    domain_edges(g, slash_scheme, &domain, &states)?;

    // Domínio com TLD: já é uma URL
    let path_start = [TokenKind::SLASH, TokenKind::QUERY, TokenKind::POUND];
    g.connect_all(domain_dot_tld, &domain, states.domain)?;
    g.connect(domain_dot_tld, TokenKind::HYPHEN, states.hyphen)?;
    g.connect(domain_dot_tld, TokenKind::DOT, states.dot)?;
    g.connect(domain_dot_tld, TokenKind::AT, states.localpart_at)?;
    let mut not_localpart = path_start.to_vec();
    not_localpart.push(TokenKind::HYPHEN);
    g.connect_all(
        domain_dot_tld,
        &except(&LOCALPART_SYMBOLS, &not_localpart),
        states.localpart,
    )?;

    // Porta
    let port_colon = g.step(domain_dot_tld, TokenKind::COLON);
    let port = g.accepting(EntityKind::URL);
    g.connect(port_colon, TokenKind::NUM, port)?;

    // Caminho, query e fragmento
    let url = g.accepting(EntityKind::URL);
    let url_nonaccept = g.state();
    g.connect_all(domain_dot_tld, &path_start, url)?;
    g.connect_all(port, &path_start, url)?;

    // Esquemas: "mailto:..." e "https://..."
    let scheme_colon = g.step(scheme, TokenKind::COLON);
    let slash_scheme_colon = g.step(slash_scheme, TokenKind::COLON);
    let first_slash = g.step(slash_scheme_colon, TokenKind::SLASH);
    let uri_prefix = g.step(first_slash, TokenKind::SLASH);
    g.connect_all(scheme_colon, &domain, url)?;
    g.connect_all(scheme_colon, &[TokenKind::SLASH, TokenKind::QUERY], url)?;
    g.connect_all(uri_prefix, &domain, url)?;
    g.connect(uri_prefix, TokenKind::SLASH, url)?;

    let accepting = union(&domain, &URL_ACCEPTING_SYMBOLS);
    for from in [url, url_nonaccept] {
        g.connect_all(from, &accepting, url)?;
        g.connect_all(from, &URL_NON_ACCEPTING_SYMBOLS, url_nonaccept)?;
    }

    // Delimitadores balanceados: "wiki/Rust_(linguagem)"
    for (open, close) in BRACKET_PAIRS {
        let url_open = g.state();
        let url_open_q = g.accepting(EntityKind::URL);
        let url_open_syms = g.state();
        g.connect(url, open, url_open)?;
        g.connect(url_nonaccept, open, url_open)?;

        let inner_syms = except(&URL_NON_ACCEPTING_SYMBOLS, &[close]);
        for from in [url_open, url_open_q, url_open_syms] {
            g.connect(from, close, url)?;
            g.connect_all(from, &accepting, url_open_q)?;
            g.connect_all(from, &inner_syms, url_open_syms)?;
        }
    }

    // E-mails
    let email_domain = g.state();
    let email_domain_hyphen = g.state();
    let email_domain_dot = g.state();
    let email = g.accepting(EntityKind::EMAIL);
    let localpart_dot = g.step(states.localpart, TokenKind::DOT);
    let localpart_chars = union(&domain, &LOCALPART_SYMBOLS);

    g.connect_all(states.localpart, &localpart_chars, states.localpart)?;
    g.connect(states.localpart, TokenKind::AT, states.localpart_at)?;
    g.connect_all(localpart_dot, &localpart_chars, states.localpart)?;

    g.connect(states.localpart_at, TokenKind::LOCALHOST, email)?;
    g.connect_all(
        states.localpart_at,
        &except(&domain, &[TokenKind::LOCALHOST]),
        email_domain,
    )?;

    for from in [email_domain, email] {
        g.connect_all(from, &domain, email_domain)?;
        g.connect(from, TokenKind::HYPHEN, email_domain_hyphen)?;
        g.connect(from, TokenKind::DOT, email_domain_dot)?;
    }
    g.connect_all(email_domain_hyphen, &domain, email_domain)?;
    g.connect(email_domain_hyphen, TokenKind::HYPHEN, email_domain_hyphen)?;
    g.connect_all(email_domain_dot, &tlds, email)?;
    g.connect_all(email_domain_dot, &except(&domain, &tlds), email_domain)?;

    let email_colon = g.step(email, TokenKind::COLON);
    let email_port = g.accepting(EntityKind::EMAIL);
    g.connect(email_colon, TokenKind::NUM, email_port)?;

    debug!(nodes = g.len(), "gramática de URLs e e-mails registrada");
    Ok(())
}

/// Um host é válido se cada rótulo tem até 63 bytes e o total até 253.
fn valid_host(host: &str) -> bool {
    !host.is_empty()
        && host.len() <= MAX_HOST_LEN
        && host.split('.').all(|label| label.len() <= MAX_LABEL_LEN)
}

/// Comportamento de [`EntityKind::URL`].
#[derive(Debug, Clone, Copy, Default)]
pub struct UrlBehavior;

impl UrlBehavior {
    fn has_scheme(candidate: &Candidate<'_>) -> bool {
        let tokens = candidate.tokens;
        tokens.len() > 1
            && (tokens[0].is(TokenKind::SCHEME) || tokens[0].is(TokenKind::SLASH_SCHEME))
            && tokens[1].is(TokenKind::COLON)
    }
}

impl EntityBehavior for UrlBehavior {
    fn href(&self, candidate: &Candidate<'_>, default_scheme: &str) -> String {
        let text = candidate.text();
        if Self::has_scheme(candidate) {
            text
        } else {
            format!("{default_scheme}://{text}")
        }
    }

    fn validate(&self, candidate: &Candidate<'_>) -> bool {
        if Self::has_scheme(candidate) {
            return true;
        }
        let host: String = candidate
            .tokens
            .iter()
            .take_while(|t| !HOST_TERMINATORS.contains(&t.kind))
            .map(|t| t.text.as_str())
            .collect();
        valid_host(&host)
    }
}

/// Comportamento de [`EntityKind::EMAIL`].
#[derive(Debug, Clone, Copy, Default)]
pub struct EmailBehavior;

impl EntityBehavior for EmailBehavior {
    fn href(&self, candidate: &Candidate<'_>, _default_scheme: &str) -> String {
        format!("mailto:{}", candidate.text())
    }

    fn validate(&self, candidate: &Candidate<'_>) -> bool {
        let text = candidate.text();
        let Some((local, rest)) = text.rsplit_once('@') else {
            return false;
        };
        let host = rest.split(':').next().unwrap_or(rest);
        !local.is_empty() && local.len() <= MAX_LOCAL_PART_LEN && valid_host(host)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{EntityRegistry, Segment};
    use crate::grammar::{parse, Parsed};
    use crate::scanner::{self, ScannerBuilder};
    use pretty_assertions::assert_eq;

    fn parse_text(text: &str) -> Parsed {
        let automaton = ScannerBuilder::new(&[]).unwrap().freeze();
        let mut grammar = GrammarBuilder::new();
        init(&Vocabulary::new(), &mut grammar).unwrap();
        let tokens = scanner::run(&automaton, text).unwrap();
        parse(&grammar.freeze(), &EntityRegistry::new(), "http", tokens)
    }

    fn entities(text: &str) -> Vec<(&'static str, String, String)> {
        parse_text(text)
            .segments
            .iter()
            .filter_map(Segment::as_entity)
            .map(|e| (e.kind.name(), e.text.clone(), e.href.clone()))
            .collect()
    }

    fn entity(kind: &'static str, text: &str, href: &str) -> (&'static str, String, String) {
        (kind, text.to_string(), href.to_string())
    }

    #[test]
    fn test_init_has_no_conflicts() {
        let mut grammar = GrammarBuilder::new();
        assert!(init(&Vocabulary::new(), &mut grammar).is_ok());
        assert!(grammar.len() > 20);
    }

    #[test]
    fn test_bare_domain() {
        assert_eq!(
            entities("Visite example.com hoje"),
            vec![entity("url", "example.com", "http://example.com")]
        );
        assert!(entities("apenas palavras").is_empty());
    }

    #[test]
    fn test_full_url_excludes_trailing_dot() {
        assert_eq!(
            entities("Leia https://github.com/rust-lang/rust?tab=readme#top."),
            vec![entity(
                "url",
                "https://github.com/rust-lang/rust?tab=readme#top",
                "https://github.com/rust-lang/rust?tab=readme#top"
            )]
        );
        assert_eq!(
            entities("veja exemplo.com/a."),
            vec![entity("url", "exemplo.com/a", "http://exemplo.com/a")]
        );
    }

    #[test]
    fn test_balanced_parentheses() {
        assert_eq!(
            entities("(veja http://exemplo.com/a_(b))"),
            vec![entity(
                "url",
                "http://exemplo.com/a_(b)",
                "http://exemplo.com/a_(b)"
            )]
        );
    }

    #[test]
    fn test_localhost_with_port() {
        assert_eq!(
            entities("localhost:8080/api"),
            vec![entity("url", "localhost:8080/api", "http://localhost:8080/api")]
        );
    }

    #[test]
    fn test_scheme_without_slashes() {
        assert_eq!(
            entities("mailto:alguem@exemplo.com"),
            vec![entity(
                "url",
                "mailto:alguem@exemplo.com",
                "mailto:alguem@exemplo.com"
            )]
        );
        assert!(entities("http://").is_empty());
    }

    #[test]
    fn test_email() {
        assert_eq!(
            entities("Escreva para Fulano.Tal+news@mail.exemplo.com.br."),
            vec![entity(
                "email",
                "Fulano.Tal+news@mail.exemplo.com.br",
                "mailto:Fulano.Tal+news@mail.exemplo.com.br"
            )]
        );
        assert_eq!(
            entities("nome@localhost"),
            vec![entity("email", "nome@localhost", "mailto:nome@localhost")]
        );
    }

    #[test]
    fn test_long_label_is_demoted() {
        let text = format!("{}.com", "a".repeat(64));
        let parsed = parse_text(&text);
        assert!(parsed.segments.iter().all(|s| s.as_entity().is_none()));
        assert_eq!(parsed.demoted.len(), 1);
        assert_eq!(parsed.demoted[0].entity, EntityKind::URL);

        let text = format!("{}.com", "a".repeat(63));
        assert_eq!(entities(&text).len(), 1);
    }

    #[test]
    fn test_long_local_part_is_demoted() {
        let text = format!("{}@exemplo.com", "a".repeat(65));
        let parsed = parse_text(&text);
        assert_eq!(parsed.demoted.len(), 1);
        assert_eq!(parsed.demoted[0].entity, EntityKind::EMAIL);
    }
}
