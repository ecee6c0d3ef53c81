use utoipa::OpenApi;

use crate::models::Comment;
use crate::score::DangerClass;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::create_comment,
        crate::routes::delete_comment,
    ),
    components(schemas(
        Comment, DangerClass,
        crate::routes::CreateCommentRequest, crate::routes::CreateCommentResponse,
        crate::routes::DeleteCommentRequest, crate::routes::DeleteCommentResponse,
        crate::error::ApiErrorBody
    )),
    tags(
        (name = "comments", description = "Danger-score comment operations"),
    )
)]
pub struct ApiDoc;
