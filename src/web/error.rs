use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

use crate::app::TweetstatsError;
use crate::web::render;

impl TweetstatsError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            TweetstatsError::Http(_) | TweetstatsError::Api { .. } | TweetstatsError::OAuth(_) => {
                StatusCode::BAD_GATEWAY
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for TweetstatsError {
    fn into_response(self) -> Response {
        (self.status_code(), Html(render::error_page(&self.to_string()))).into_response()
    }
}
