//! Main processing pipeline
//!
//! uploads → parameters → engine → spreadsheet bytes

use hyper::body::{Body, Bytes};
use hyper::Request;

use super::{form, params};
use crate::config::AppState;
use crate::engine::EngineError;
use crate::error::Result;

/// Run one placement request end to end and return the `.xlsx` document
pub async fn process<B>(req: Request<B>, state: &AppState) -> Result<Vec<u8>>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let (parts, body) = req.into_parts();

    let form = form::read_form(&parts.headers, body, state.config.http.max_body_size).await?;
    let uploads = form.uploads()?;
    let params = params::resolve(&form)?;

    let engine = state.engine.get().await?;
    let xlsx = tokio::task::spawn_blocking(move || {
        engine.place_and_export(&uploads.tiles, &uploads.reqs, &params)
    })
    .await
    .map_err(|e| EngineError::failed(format!("placement task failed: {e}")))??;

    Ok(xlsx)
}
