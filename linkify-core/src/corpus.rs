//! # Textos de Demonstração
//!
//! Pequenos textos em português com links, e-mails, menções e hashtags, usados
//! pela interface web e pelos testes de integração.

/// Textos de demonstração para a interface web: `(tema, texto)`.
pub fn demo_texts() -> Vec<(&'static str, &'static str)> {
    vec![
        (
            "Notícias",
            "A Fiocruz publicou o boletim em https://portal.fiocruz.br/noticias?ano=2024#dengue. Dúvidas podem ser enviadas para imprensa@fiocruz.br, e o resumo está em www.gov.br/saude.",
        ),
        (
            "Redes sociais",
            "Obrigado @ana_souza e @coletivo/design pela ajuda no #HackathonRS! Fotos em instagram.com/hackathonrs e o código em github.com/hackathonrs/app. #rust2024 #opensource",
        ),
        (
            "Documentação",
            "Veja a página https://pt.wikipedia.org/wiki/Rust_(linguagem_de_programação) e o servidor de testes em localhost:8080/api/v1. Para baixar via FTP use ftp://arquivos.exemplo.com.br/pub/.",
        ),
        (
            "Pontuação",
            "Os links terminam antes da pontuação: exemplo.com. (ver exemplo.org/a_(b)) e \"site.net/x?\". Já foo@bar e foo#bar não são menções nem hashtags.",
        ),
        (
            "Internacional",
            "Sites com domínios Unicode também funcionam: пример.рф, 例子.中国 e café.com.br; emojis ficam de fora 👨\u{200d}👩\u{200d}👧 #família",
        ),
        (
            "Esquemas",
            "Links com esquemas diferentes: mailto:contato@exemplo.com, file:///home/ana/notas.txt e HTTPS://EXEMPLO.COM.BR/CAIXA-ALTA.",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Linkifier, LinkifyConfig};

    #[test]
    fn test_every_demo_text_has_entities() {
        let linkifier = Linkifier::new(LinkifyConfig::default()).unwrap();
        for (theme, text) in demo_texts() {
            let found = linkifier.find(text, None).unwrap();
            assert!(!found.is_empty(), "nenhuma entidade em '{theme}'");
        }
    }
}
