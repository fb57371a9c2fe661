use axum::extract::FromRequest;

use crate::error::Error;

/// `Json` extractor whose rejections use the crate's error body.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(Error))]
pub struct ApiJson<T>(pub T);
