use std::sync::Arc;

use actix_web::{web, HttpResponse};
use serde_json::Value;
use tracing::{debug, error};

use crate::comments::{self, CommentError, NewComment};
use crate::error::{ApiError, ApiErrorBody};
use crate::models::{Comment, CommentId};
use crate::store::DocumentStore;

pub fn config(cfg: &mut web::ServiceConfig) {
    // Body limit sits above the 10 MiB attachment cap so the oversized
    // attachment check is the one that rejects, with its own message.
    cfg.app_data(
        web::JsonConfig::default()
            .limit(16 * 1024 * 1024)
            .error_handler(|err, _req| {
                debug!("rejecting malformed request body: {err}");
                ApiError::MalformedBody.into()
            }),
    );
    cfg.service(web::resource("/api/comentario").route(web::post().to(create_comment)));
    // Unmatched methods on either resource get actix's default 405.
    cfg.service(web::resource("/api/excluir/{id}").route(web::delete().to(delete_comment)));
}

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
}

/// Comment submission body; field names follow the frontend contract.
#[derive(Debug, serde::Deserialize, utoipa::ToSchema)]
pub struct CreateCommentRequest {
    #[serde(default)]
    pub texto: Option<String>,
    #[serde(default)]
    pub autor: Option<String>,
    #[serde(default)]
    pub anonimo: bool,
    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    pub arquivo: Option<Value>,
}

impl From<CreateCommentRequest> for NewComment {
    fn from(req: CreateCommentRequest) -> Self {
        NewComment {
            text: req.texto,
            author: req.autor,
            anonymous: req.anonimo,
            attachment: req.arquivo,
        }
    }
}

#[derive(Debug, serde::Serialize, utoipa::ToSchema)]
pub struct CreateCommentResponse {
    pub sucesso: bool,
    pub comentario: Comment,
    pub pontuacao: i64,
}

#[derive(Debug, Default, serde::Deserialize, utoipa::ToSchema)]
pub struct DeleteCommentRequest {
    #[serde(default)]
    pub senha: String,
}

#[derive(Debug, serde::Serialize, utoipa::ToSchema)]
pub struct DeleteCommentResponse {
    pub sucesso: bool,
    pub pontuacao: i64,
}

#[utoipa::path(
    post,
    path = "/api/comentario",
    request_body = CreateCommentRequest,
    responses(
        (status = 200, description = "Comment recorded", body = CreateCommentResponse),
        (status = 400, description = "Empty comment, oversized attachment or malformed body", body = ApiErrorBody),
        (status = 500, description = "Document could not be persisted", body = ApiErrorBody)
    )
)]
pub async fn create_comment(
    data: web::Data<AppState>,
    payload: web::Json<CreateCommentRequest>,
) -> Result<HttpResponse, ApiError> {
    let created = comments::create_comment(data.store.as_ref(), payload.into_inner().into())
        .await
        .map_err(|e| {
            if let CommentError::Store(ref cause) = e {
                error!("failed to persist new comment: {cause}");
            }
            ApiError::from(e)
        })?;
    Ok(HttpResponse::Ok().json(CreateCommentResponse {
        sucesso: true,
        comentario: created.comment,
        pontuacao: created.score,
    }))
}

#[utoipa::path(
    delete,
    path = "/api/excluir/{id}",
    request_body = DeleteCommentRequest,
    params(("id" = i64, Path, description = "Comment id (creation epoch millis)")),
    responses(
        (status = 200, description = "Comment removed (or id absent)", body = DeleteCommentResponse),
        (status = 401, description = "Wrong deletion password", body = ApiErrorBody),
        (status = 500, description = "Document could not be persisted", body = ApiErrorBody)
    )
)]
pub async fn delete_comment(
    data: web::Data<AppState>,
    path: web::Path<CommentId>,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    // A DELETE body may be absent or unparseable; treat that as an empty
    // password so the check below still runs.
    let senha = serde_json::from_slice::<DeleteCommentRequest>(&body)
        .map(|b| b.senha)
        .unwrap_or_default();
    let pontuacao = comments::delete_comment(data.store.as_ref(), path.into_inner(), &senha)
        .await
        .map_err(|e| match e {
            CommentError::Store(cause) => {
                error!("failed to persist comment deletion: {cause}");
                ApiError::DeleteFailed
            }
            other => ApiError::from(other),
        })?;
    Ok(HttpResponse::Ok().json(DeleteCommentResponse {
        sucesso: true,
        pontuacao,
    }))
}
