//! # Erros de Configuração e Defeitos de Autômato
//!
//! Erros de configuração (plugin duplicado, transição conflitante) são
//! rejeitados no momento do registro, antes de qualquer varredura. A varredura
//! em si é total: o único erro possível em tempo de execução é
//! [`LinkifyError::MalformedAutomaton`], que indica um autômato mal construído.
//!
//! A rejeição de uma entidade pela validação (ex: domínio com rótulo longo demais)
//! **não** é um erro: os tokens primitivos são devolvidos sem alteração.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LinkifyError {
    /// Um plugin com este nome já foi registrado neste builder.
    #[error("plugin '{name}' já foi registrado")]
    DuplicatePlugin { name: String },

    /// A configuração cita um plugin que não existe entre os embutidos.
    #[error("plugin desconhecido: '{name}'")]
    UnknownPlugin { name: String },

    /// Duas transições diferentes para a mesma chave `(estado, tipo de token)`.
    #[error("transição conflitante no estado {state} para o token '{kind}'")]
    ConflictingTransition { state: usize, kind: &'static str },

    /// O estado já aceita outro tipo de entidade.
    #[error("estado {state} já aceita '{existing}', não pode aceitar '{requested}'")]
    ConflictingAccept {
        state: usize,
        existing: &'static str,
        requested: &'static str,
    },

    /// Cada estado do scanner tem no máximo uma transição padrão.
    #[error("estado {state} já possui transição padrão")]
    DuplicateDefault { state: usize },

    /// Um tipo de entidade com este nome já existe.
    #[error("entidade '{name}' já foi registrada")]
    DuplicateEntity { name: &'static str },

    #[error("esquema inválido: '{scheme}'")]
    InvalidScheme { scheme: String },

    #[error("padrão de classe de caracteres inválido: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("configuração inválida: {0}")]
    InvalidConfig(#[from] serde_json::Error),

    /// Nenhum estado de aceitação foi alcançado a partir desta posição.
    /// Indica um defeito de construção, nunca uma entrada "ruim".
    #[error("autômato mal formado: nenhum estado de aceitação a partir do byte {offset}")]
    MalformedAutomaton { offset: usize },
}
