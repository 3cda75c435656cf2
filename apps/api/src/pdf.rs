//! Resume text extraction from uploaded PDF bytes.

use anyhow::{bail, Context, Result};
use bytes::Bytes;

/// Extracts the text content of a PDF. `pdf-extract` is synchronous, so the
/// work runs on the blocking pool.
pub async fn extract_text(data: Bytes) -> Result<String> {
    let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&data))
        .await
        .context("PDF extraction task failed")?
        .context("Failed to extract text from PDF")?;

    if text.trim().is_empty() {
        bail!("PDF contained no extractable text");
    }
    Ok(text)
}
