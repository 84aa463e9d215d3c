//! Servidor web Axum com WebSocket para visualização da detecção de links em tempo real
//!
//! ## Variáveis de ambiente
//! - `LINKIFY_ADDR`: endereço de escuta (padrão `0.0.0.0:3000`).
//! - `LINKIFY_CONFIG`: caminho para um [`LinkifyConfig`] em JSON (opcional).
//! - `LINKIFY_CACHE_SIZE`: quantos linkifiers com esquemas extras manter (padrão 16).
//! - `RUST_LOG`: filtro do `tracing` (padrão `info`).

mod cache;

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use linkify_core::{
    corpus::demo_texts, Analysis, Linkifier, LinkifyConfig, LinkifyError, Match, PipelineEvent,
    SchemeSpec,
};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tokio::task::JoinError;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use cache::LinkifierCache;

const DEFAULT_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_CACHE_SIZE: usize = 16;

/// Estado compartilhado da aplicação
struct AppState {
    /// Configuração carregada na inicialização.
    base: LinkifyConfig,
    /// Linkifiers já construídos. Nunca são alterados, só reaproveitados.
    linkifiers: Mutex<LinkifierCache>,
}

impl AppState {
    fn new(base: LinkifyConfig, cache_size: usize) -> Result<Self, LinkifyError> {
        let linkifier = Arc::new(Linkifier::new(base.clone())?);
        Ok(Self {
            linkifiers: Mutex::new(LinkifierCache::new(base.clone(), linkifier, cache_size)),
            base,
        })
    }

    /// Configuração da requisição: a base com os esquemas extras, se houver.
    fn config_for(&self, schemes: Option<Vec<SchemeSpec>>) -> LinkifyConfig {
        let mut config = self.base.clone();
        if let Some(schemes) = schemes {
            config.custom_schemes.extend(schemes);
        }
        config
    }

    /// Devolve o linkifier da configuração, construindo-o na primeira vez.
    async fn linkifier(&self, config: LinkifyConfig) -> Result<Arc<Linkifier>, ApiError> {
        if let Some(existing) = self.linkifiers.lock().await.get(&config) {
            return Ok(existing);
        }

        let built = {
            let config = config.clone();
            tokio::task::spawn_blocking(move || Linkifier::new(config)).await??
        };
        let built = Arc::new(built);
        let schemes = config.custom_schemes.len();

        let mut cache = self.linkifiers.lock().await;
        let linkifier = cache.insert(config, built);
        info!(schemes, cached = cache.len(), "novo linkifier construído");
        Ok(linkifier)
    }
}

/// Erro de API: vira um status HTTP com corpo JSON.
enum ApiError {
    Linkify(LinkifyError),
    /// A tarefa bloqueante entrou em pânico ou foi cancelada.
    Task(JoinError),
}

impl From<LinkifyError> for ApiError {
    fn from(err: LinkifyError) -> Self {
        Self::Linkify(err)
    }
}

impl From<JoinError> for ApiError {
    fn from(err: JoinError) -> Self {
        Self::Task(err)
    }
}

impl ApiError {
    fn message(&self) -> String {
        match self {
            ApiError::Linkify(e) => e.to_string(),
            ApiError::Task(e) => format!("tarefa interrompida: {e}"),
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::Linkify(LinkifyError::MalformedAutomaton { .. }) | ApiError::Task(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::Linkify(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            warn!(error = %self.message(), "falha na análise");
        }
        (status, Json(serde_json::json!({ "error": self.message() }))).into_response()
    }
}

#[derive(Deserialize)]
struct AnalyzeRequest {
    text: String,
    /// Esquemas além dos da configuração do servidor.
    #[serde(default)]
    schemes: Option<Vec<SchemeSpec>>,
}

/// Mensagem WebSocket recebida do cliente
#[derive(Deserialize)]
struct WsRequest {
    text: String,
    #[serde(default)]
    schemes: Option<Vec<SchemeSpec>>,
}

#[derive(Serialize)]
struct AnalyzeResponse {
    #[serde(flatten)]
    analysis: Analysis,
    matches: Vec<Match>,
}

fn load_config() -> Result<LinkifyConfig, Box<dyn std::error::Error>> {
    match std::env::var("LINKIFY_CONFIG") {
        Ok(path) => {
            let json = std::fs::read_to_string(&path)?;
            let config = LinkifyConfig::from_json(&json)?;
            info!(%path, "configuração carregada");
            Ok(config)
        }
        Err(_) => Ok(LinkifyConfig::default()),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = load_config()?;
    let cache_size = match std::env::var("LINKIFY_CACHE_SIZE") {
        Ok(value) => value.parse()?,
        Err(_) => DEFAULT_CACHE_SIZE,
    };
    let state = Arc::new(AppState::new(config, cache_size)?);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/", get(index_handler))
        .route("/analyze", post(analyze_handler))
        .route("/ws", get(ws_handler))
        .route("/demo-texts", get(demo_texts_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state);

    let addr = std::env::var("LINKIFY_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("🚀 Servidor linkify iniciado em http://{addr}");
    axum::serve(listener, app).await?;
    Ok(())
}

/// Retorna a página principal HTML
async fn index_handler() -> impl IntoResponse {
    Html(include_str!("templates/index.html"))
}

/// Análise via HTTP POST (sem streaming)
async fn analyze_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let linkifier = state.linkifier(state.config_for(req.schemes)).await?;

    // O pipeline é síncrono: roda fora do runtime
    let (analysis, matches) = tokio::task::spawn_blocking(move || -> Result<_, LinkifyError> {
        let analysis = linkifier.analyze(&req.text)?;
        let matches: Vec<Match> = analysis
            .segments
            .iter()
            .filter_map(|s| s.as_entity())
            .filter(|e| e.is_link)
            .map(Match::from)
            .collect();
        Ok((analysis, matches))
    })
    .await??;

    Ok(Json(AnalyzeResponse { analysis, matches }))
}

/// Retorna textos de demonstração
async fn demo_texts_handler() -> impl IntoResponse {
    let texts: Vec<serde_json::Value> = demo_texts()
        .iter()
        .map(|(theme, text)| {
            serde_json::json!({
                "theme": theme,
                "text": text
            })
        })
        .collect();
    Json(texts)
}

/// Uma análise que entrou em pânico vira um único evento `Error` para o cliente.
fn task_failed(err: JoinError) -> Vec<PipelineEvent> {
    let error = ApiError::from(err);
    warn!(error = %error.message(), "falha na análise via WebSocket");
    vec![PipelineEvent::Error {
        message: error.message(),
    }]
}

/// Upgrade HTTP → WebSocket
async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_websocket(socket, state))
}

/// Lógica do WebSocket: recebe texto, executa o pipeline e envia os eventos em sequência
async fn handle_websocket(mut socket: WebSocket, state: Arc<AppState>) {
    info!("WebSocket conectado");

    while let Some(Ok(msg)) = socket.recv().await {
        match msg {
            Message::Text(text) => {
                // JSON {text, schemes}; senão o texto puro
                let (text, schemes) = match serde_json::from_str::<WsRequest>(&text) {
                    Ok(req) => (req.text, req.schemes),
                    Err(_) => (text.to_string(), None),
                };
                if text.trim().is_empty() {
                    continue;
                }

                let linkifier = match state.linkifier(state.config_for(schemes)).await {
                    Ok(linkifier) => linkifier,
                    Err(e) => {
                        let event = PipelineEvent::Error {
                            message: e.message(),
                        };
                        if let Ok(json) = serde_json::to_string(&event) {
                            let _ = socket.send(Message::Text(json)).await;
                        }
                        continue;
                    }
                };

                info!("Analisando via WebSocket: {} bytes", text.len());

                // O pipeline é síncrono: roda fora do runtime e devolve os eventos
                let events = tokio::task::spawn_blocking(move || {
                    let (tx, rx) = std::sync::mpsc::channel::<PipelineEvent>();
                    linkifier.analyze_streaming(&text, tx);
                    rx.into_iter().collect::<Vec<_>>()
                })
                .await
                .unwrap_or_else(task_failed);

                for event in &events {
                    if let Ok(json) = serde_json::to_string(event) {
                        if socket.send(Message::Text(json)).await.is_err() {
                            return; // cliente desconectou
                        }
                        // Pequena pausa para a animação passo a passo
                        tokio::time::sleep(tokio::time::Duration::from_millis(35)).await;
                    }
                }
            }
            Message::Close(_) => {
                info!("WebSocket desconectado");
                return;
            }
            Message::Ping(payload) => {
                let _ = socket.send(Message::Pong(payload)).await;
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_panicked_analysis_reaches_client_as_error() {
        let err = tokio::task::spawn_blocking(|| -> Vec<PipelineEvent> { panic!("autômato corrompido") })
            .await
            .unwrap_err();

        let events = task_failed(err);
        assert_eq!(events.len(), 1);
        let json = serde_json::to_value(&events[0]).unwrap();
        assert_eq!(json["type"], "Error");
        assert!(json["data"]["message"]
            .as_str()
            .unwrap()
            .starts_with("tarefa interrompida"));
    }

    #[tokio::test]
    async fn test_request_schemes_extend_base_config() {
        let state = AppState::new(LinkifyConfig::core_only(), 1).unwrap();
        let config = state.config_for(Some(vec![SchemeSpec::new("steam", false)]));
        assert_eq!(config.custom_schemes.len(), 1);

        let first = state.linkifier(config.clone()).await.ok().unwrap();
        let again = state.linkifier(config).await.ok().unwrap();
        assert!(Arc::ptr_eq(&first, &again));
        assert_eq!(state.linkifiers.lock().await.len(), 1);
    }
}
