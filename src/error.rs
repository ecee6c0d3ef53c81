use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use utoipa::ToSchema;

use crate::comments::CommentError;

/// Wire-level error body; the `erro` key matches the frontend contract.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiErrorBody {
    pub erro: String,
}

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("Comentário vazio")]
    EmptyComment,
    #[error("Arquivo muito grande (máximo 10MB)")]
    AttachmentTooLarge,
    #[error("Body inválido")]
    MalformedBody,
    #[error("Senha incorreta")]
    WrongPassword,
    #[error("Erro ao salvar comentário")]
    SaveFailed,
    #[error("Erro ao excluir comentário")]
    DeleteFailed,
}

impl From<CommentError> for ApiError {
    fn from(e: CommentError) -> Self {
        match e {
            CommentError::Empty => ApiError::EmptyComment,
            CommentError::AttachmentTooLarge => ApiError::AttachmentTooLarge,
            CommentError::WrongPassword => ApiError::WrongPassword,
            CommentError::Store(_) => ApiError::SaveFailed,
        }
    }
}

impl ResponseError for ApiError {
    fn error_response(&self) -> HttpResponse {
        use actix_web::http::StatusCode;
        let status = match self {
            ApiError::EmptyComment | ApiError::AttachmentTooLarge | ApiError::MalformedBody => {
                StatusCode::BAD_REQUEST
            }
            ApiError::WrongPassword => StatusCode::UNAUTHORIZED,
            ApiError::SaveFailed | ApiError::DeleteFailed => StatusCode::INTERNAL_SERVER_ERROR,
        };
        HttpResponse::build(status).json(ApiErrorBody {
            erro: self.to_string(),
        })
    }
}
