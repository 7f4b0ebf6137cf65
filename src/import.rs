//! Eager entry points: run the whole pipeline and return the final document.
//!
//! Use these when you just want the result. For a UI that shows progress and
//! lets the user abort, use [`crate::orchestrator::Importer`] instead.

use crate::config::ImportConfig;
use crate::document::ImportedDocument;
use crate::error::ImportError;
use crate::pipeline::run_stages;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Import an SVG document on the current thread.
///
/// Progress events go to `config.progress_callback`, if set.
///
/// # Errors
/// Returns `Err(ImportError)` for fatal conditions only (bad lengths,
/// element ceiling, every path over the command ceiling, not an SVG).
/// Advisory conditions are reported in `ImportedDocument::warnings`.
///
/// # Example
/// ```rust
/// use edgequake_svg2path::{import_svg, ImportConfig};
///
/// let svg = r#"<svg width="10mm" height="10mm"><path d="M0 0 L10 0" stroke="red"/></svg>"#;
/// let doc = import_svg(svg, &ImportConfig::default()).unwrap();
/// assert_eq!(doc.paths[0].d, "M0 0 L10 0");
/// assert_eq!(doc.paths[0].stroke.as_deref(), Some("#ff0000"));
/// ```
pub fn import_svg(text: &str, config: &ImportConfig) -> Result<ImportedDocument, ImportError> {
    let callback = config.progress_callback.clone();
    run_stages(
        text,
        config,
        |event| {
            if let Some(cb) = &callback {
                cb.on_event(&event);
            }
        },
        || false,
    )
}

/// Async wrapper around [`import_svg`].
///
/// The pipeline is CPU-bound, so it runs on tokio's blocking pool instead of
/// stalling an async worker thread.
pub async fn import_svg_async(
    text: impl Into<String>,
    config: &ImportConfig,
) -> Result<ImportedDocument, ImportError> {
    let text = text.into();
    let config = config.clone();
    tokio::task::spawn_blocking(move || import_svg(&text, &config))
        .await
        .map_err(|e| ImportError::Internal(format!("Import task panicked: {e}")))?
}

/// Read an SVG file and import it.
pub async fn import_file(
    path: impl AsRef<Path>,
    config: &ImportConfig,
) -> Result<ImportedDocument, ImportError> {
    let path = path.as_ref();
    info!("Importing {}", path.display());
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ImportError::InputReadFailed {
            path: path.to_path_buf(),
            source: e,
        })?;
    import_svg_async(text, config).await
}

/// Import an SVG file and write the result as pretty-printed JSON.
///
/// The output is written to a temporary file in the destination directory
/// and renamed into place, so readers never observe a partial file.
pub async fn import_to_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    config: &ImportConfig,
) -> Result<ImportedDocument, ImportError> {
    let doc = import_file(input, config).await?;
    let path = output.as_ref().to_path_buf();

    let json = serde_json::to_vec_pretty(&doc)
        .map_err(|e| ImportError::Internal(format!("JSON serialisation failed: {e}")))?;

    let target = path.clone();
    tokio::task::spawn_blocking(move || write_json_atomic(&target, &json))
        .await
        .map_err(|e| ImportError::Internal(format!("Write task panicked: {e}")))?
        .map_err(|e| ImportError::OutputWriteFailed {
            path: path.clone(),
            source: e,
        })?;

    info!("Wrote {} path(s) to {}", doc.paths.len(), path.display());
    Ok(doc)
}

/// Write `json` plus a trailing newline to `path` via a temporary file in the
/// same directory, creating the directory if needed.
pub fn write_json_atomic(path: &Path, json: &[u8]) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(json)?;
    tmp.write_all(b"\n")?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::{ImportEvent, ImportProgressCallback};
    use std::sync::{Arc, Mutex};

    struct Collect(Mutex<Vec<ImportEvent>>);

    impl ImportProgressCallback for Collect {
        fn on_event(&self, event: &ImportEvent) {
            self.0.lock().unwrap().push(event.clone());
        }
    }

    #[test]
    fn callback_sees_every_stage() {
        let collect = Arc::new(Collect(Mutex::new(Vec::new())));
        let config = ImportConfig::builder()
            .progress_callback(collect.clone())
            .build()
            .unwrap();
        import_svg(r#"<svg><path d="M0 0 L10 0"/></svg>"#, &config).unwrap();
        let events = collect.0.lock().unwrap();
        assert_eq!(events.len(), 7);
        assert_eq!(events[2], ImportEvent::Extract { elements_seen: 2 });
        assert_eq!(events[6], ImportEvent::Done);
    }

    #[tokio::test]
    async fn async_wrapper_matches_blocking() {
        let svg = r#"<svg><path d="M0 0 L10 0"/></svg>"#;
        let a = import_svg(svg, &ImportConfig::default()).unwrap();
        let b = import_svg_async(svg, &ImportConfig::default()).await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn missing_input_file() {
        let err = import_file("/definitely/not/here.svg", &ImportConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ImportError::InputReadFailed { .. }));
    }

    #[tokio::test]
    async fn writes_json_atomically() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.svg");
        let output = dir.path().join("out/result.json");
        std::fs::write(&input, r#"<svg><path d="M0 0 L10 0" fill="blue"/></svg>"#).unwrap();

        let doc = import_to_file(&input, &output, &ImportConfig::default())
            .await
            .unwrap();
        let written: ImportedDocument =
            serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(written, doc);
        assert_eq!(written.paths[0].fill.as_deref(), Some("#0000ff"));
    }

    #[test]
    fn atomic_write_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("doc.json");
        std::fs::write(&target, "stale").unwrap();
        write_json_atomic(&target, br#"{"paths":[]}"#).unwrap();
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "{\"paths\":[]}\n");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
