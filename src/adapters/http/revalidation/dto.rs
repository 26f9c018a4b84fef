//! Request/response DTOs for the cache revalidation endpoint.
//!
//! The wire shape mirrors what the website front-end already sends:
//! the secret and an optional raw path travel as query parameters, the
//! page/id pair travels in the JSON body.

use serde::{Deserialize, Serialize};

/// Query parameters for `POST /api/revalidate`.
#[derive(Debug, Deserialize)]
pub struct RevalidateQuery {
    #[serde(default)]
    pub secret: String,
    #[serde(default)]
    pub path: Option<String>,
}

/// JSON body for `POST /api/revalidate`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevalidateBody {
    #[serde(default)]
    pub page_to_revalidate: Option<String>,
    #[serde(default)]
    pub id_to_revalidate: Option<String>,
}

/// Success response for a revalidation request.
#[derive(Debug, Serialize)]
pub struct RevalidateResponse {
    pub revalidated: bool,
    /// Epoch milliseconds at which the invalidation completed.
    pub now: i64,
    pub message: String,
}
