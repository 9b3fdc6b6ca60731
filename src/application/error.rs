use std::error::Error as StdError;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::application::forms::FormError;
use crate::application::menu::MenuServiceError;
use crate::application::repos::ImageStoreError;
use crate::infra::error::InfraError;

/// Structured diagnostic attached to error responses for the logging
/// middleware; never serialized to the caller.
#[derive(Debug, Clone)]
pub struct ErrorReport {
    pub source: &'static str,
    pub status: StatusCode,
    pub messages: Vec<String>,
}

impl ErrorReport {
    pub fn from_error(source: &'static str, status: StatusCode, error: &dyn StdError) -> Self {
        let mut messages = Vec::new();
        messages.push(error.to_string());
        let mut current = error.source();
        while let Some(inner) = current {
            messages.push(inner.to_string());
            current = inner.source();
        }
        Self {
            source,
            status,
            messages,
        }
    }

    pub fn from_message(
        source: &'static str,
        status: StatusCode,
        message: impl Into<String>,
    ) -> Self {
        Self {
            source,
            status,
            messages: vec![message.into()],
        }
    }

    pub fn attach(self, response: &mut Response) {
        response.extensions_mut().insert(self);
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Form(#[from] FormError),
    #[error(transparent)]
    Menu(#[from] MenuServiceError),
    #[error(transparent)]
    Image(#[from] ImageStoreError),
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected(message.into())
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Form(_) => StatusCode::BAD_REQUEST,
            AppError::Menu(MenuServiceError::InvalidPrices) => StatusCode::BAD_REQUEST,
            AppError::Menu(MenuServiceError::NotFound) => StatusCode::NOT_FOUND,
            AppError::Menu(MenuServiceError::Repo(_)) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Image(ImageStoreError::NotFound) => StatusCode::NOT_FOUND,
            AppError::Image(ImageStoreError::InvalidKey) => StatusCode::BAD_REQUEST,
            AppError::Image(ImageStoreError::EmptyPayload) => StatusCode::BAD_REQUEST,
            AppError::Image(ImageStoreError::Io(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Infra(InfraError::Database { .. }) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Infra(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The public message; storage diagnostics stay out of the body.
    fn presentation_message(&self) -> String {
        match self {
            AppError::Form(err) => err.to_string(),
            AppError::Menu(err @ MenuServiceError::InvalidPrices) => err.to_string(),
            AppError::Menu(MenuServiceError::NotFound) => "Menu item not found".to_string(),
            AppError::Menu(MenuServiceError::Repo(_)) | AppError::Infra(InfraError::Database { .. }) => {
                "Service temporarily unavailable".to_string()
            }
            AppError::Image(ImageStoreError::NotFound) => "Image not found".to_string(),
            AppError::Image(ImageStoreError::InvalidKey) => "Invalid image key".to_string(),
            AppError::Image(ImageStoreError::EmptyPayload) => "Image payload is empty".to_string(),
            AppError::Validation(message) => message.clone(),
            AppError::Image(ImageStoreError::Io(_))
            | AppError::Infra(_)
            | AppError::Unexpected(_) => "Unexpected error occurred".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.presentation_message();
        let report = ErrorReport::from_error("application::error::AppError", status, &self);
        let mut response = (status, message).into_response();
        report.attach(&mut response);
        response
    }
}
