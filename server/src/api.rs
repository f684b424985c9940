use std::{net::SocketAddr, time::Instant};

use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::{Request, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use creator_core::{
    model::{NewContactMessage, NewCreator, NewTestimonial, ServiceInput},
    Error, Marketplace, Store,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub market: Marketplace,
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config) -> creator_core::Result<Self> {
        let store = if config.seed_sample_data {
            Store::with_sample_data()?
        } else {
            Store::new()
        };
        Ok(Self {
            market: Marketplace::new(store),
            config,
        })
    }
}

/// Build the HTTP application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/creators", get(list_creators).post(register_creator))
        .route("/api/creators/:id", get(get_creator))
        .route(
            "/api/creators/:id/services",
            get(list_services).post(create_service),
        )
        .route(
            "/api/creators/:id/services/:service_id",
            get(get_service).patch(update_service),
        )
        .route("/api/creators/:id/conversations", get(list_conversations))
        .route("/api/creators/:id/unread", get(unread_count))
        .route(
            "/api/testimonials",
            get(list_testimonials).post(create_testimonial),
        )
        .route("/api/contact", post(create_contact))
        .route("/api/conversations", post(start_conversation))
        .route(
            "/api/conversations/:id/messages",
            get(conversation_detail).post(send_message),
        )
        .layer(middleware::from_fn(trace_requests))
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

async fn trace_requests<B>(req: Request<B>, next: Next<B>) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_owned();
    let started = Instant::now();
    let res = next.run(req).await;
    info!(
        %method,
        %path,
        status = res.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "request"
    );
    res
}

#[derive(Serialize)]
struct ErrorResp {
    error: String,
}

/// Core error carried to the HTTP boundary.
pub struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            Error::NotFound { .. } => StatusCode::NOT_FOUND,
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::PermissionDenied(_) => StatusCode::FORBIDDEN,
            Error::IdsExhausted { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        warn!(status = status.as_u16(), error = %self.0, "request rejected");
        (
            status,
            Json(ErrorResp {
                error: self.0.to_string(),
            }),
        )
            .into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

async fn list_creators(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.market.list_creators())
}

async fn register_creator(
    State(state): State<AppState>,
    Json(req): Json<NewCreator>,
) -> ApiResult<impl IntoResponse> {
    let creator = state.market.register_creator(req)?;
    info!(id = creator.id, username = %creator.username, "creator registered");
    Ok((StatusCode::CREATED, Json(creator)))
}

async fn get_creator(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.market.get_creator(id)?))
}

async fn list_services(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.market.list_services(id)?))
}

async fn create_service(
    State(state): State<AppState>,
    Path(id): Path<u32>,
    Json(req): Json<ServiceInput>,
) -> ApiResult<impl IntoResponse> {
    let service = state.market.create_service(id, req)?;
    Ok((StatusCode::CREATED, Json(service)))
}

async fn get_service(
    State(state): State<AppState>,
    Path((id, service_id)): Path<(u32, u32)>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.market.get_service(id, service_id)?))
}

async fn update_service(
    State(state): State<AppState>,
    Path((id, service_id)): Path<(u32, u32)>,
    Json(req): Json<ServiceInput>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.market.update_service(id, service_id, req)?))
}

async fn list_conversations(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.market.list_conversations(id)?))
}

#[derive(Serialize)]
struct UnreadResp {
    count: usize,
}

async fn unread_count(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> ApiResult<impl IntoResponse> {
    let count = state.market.unread_count(id)?;
    Ok(Json(UnreadResp { count }))
}

async fn list_testimonials(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.market.list_testimonials())
}

async fn create_testimonial(
    State(state): State<AppState>,
    Json(req): Json<NewTestimonial>,
) -> ApiResult<impl IntoResponse> {
    let testimonial = state.market.create_testimonial(req)?;
    Ok((StatusCode::CREATED, Json(testimonial)))
}

#[derive(Serialize)]
struct ContactResp {
    message: &'static str,
    id: u32,
}

async fn create_contact(
    State(state): State<AppState>,
    Json(req): Json<NewContactMessage>,
) -> ApiResult<impl IntoResponse> {
    let msg = state.market.create_contact_message(req)?;
    info!(id = msg.id, "contact message received");
    Ok((
        StatusCode::CREATED,
        Json(ContactResp {
            message: "Message sent successfully",
            id: msg.id,
        }),
    ))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StartConversationReq {
    creator1_id: u32,
    creator2_id: u32,
}

async fn start_conversation(
    State(state): State<AppState>,
    Json(req): Json<StartConversationReq>,
) -> ApiResult<impl IntoResponse> {
    let started = state
        .market
        .start_conversation(req.creator1_id, req.creator2_id)?;
    Ok(Json(started))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DetailQuery {
    creator_id: u32,
}

async fn conversation_detail(
    State(state): State<AppState>,
    Path(id): Path<u32>,
    Query(q): Query<DetailQuery>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.market.get_conversation_detail(id, q.creator_id)?))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SendMessageReq {
    sender_id: u32,
    content: String,
}

async fn send_message(
    State(state): State<AppState>,
    Path(id): Path<u32>,
    Json(req): Json<SendMessageReq>,
) -> ApiResult<impl IntoResponse> {
    let message = state.market.send_message(id, req.sender_id, &req.content)?;
    Ok((StatusCode::CREATED, Json(message)))
}

/// Run the HTTP server until Ctrl+C.
pub async fn run_http_server(config: Config) -> Result<()> {
    let addr: SocketAddr = config.bind.parse()?;
    let state = AppState::new(config)?;
    info!(%addr, "listening");
    axum::Server::bind(&addr)
        .serve(build_router(state).into_make_service())
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use tower::ServiceExt;

    fn app(seed: bool) -> Router {
        build_router(
            AppState::new(Config {
                seed_sample_data: seed,
                ..Default::default()
            })
            .unwrap(),
        )
    }

    async fn status_of(app: Router, method: &str, uri: &str, body: Option<&str>) -> StatusCode {
        let mut req = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(b) => {
                req = req.header("content-type", "application/json");
                Body::from(b.to_owned())
            }
            None => Body::empty(),
        };
        app.oneshot(req.body(body).unwrap()).await.unwrap().status()
    }

    #[tokio::test]
    async fn error_status_mapping() {
        assert_eq!(status_of(app(true), "GET", "/api/creators/99", None).await, StatusCode::NOT_FOUND);
        assert_eq!(
            status_of(app(true), "GET", "/api/conversations/1/messages?creatorId=4", None).await,
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            status_of(app(true), "POST", "/api/conversations/1/messages", Some(r#"{"senderId":1,"content":""}"#)).await,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(status_of(app(true), "GET", "/api/creators/abc", None).await, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn exhausted_ids_are_server_errors() {
        let res = ApiError::from(Error::IdsExhausted { entity: "message" }).into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn empty_store_lists_nothing() {
        let res = app(false)
            .oneshot(Request::get("/api/creators").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let bytes = hyper::body::to_bytes(res.into_body()).await.unwrap();
        assert_eq!(&bytes[..], b"[]");
    }
}
