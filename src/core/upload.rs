use crate::app::router::AppState;
use crate::domain::model::{FormFields, StoredFile, UploadBatchDescriptor, UploadDescriptor};
use crate::domain::ports::{FileWriter, Storage};
use crate::utils::error::{Result, SandboxError};
use crate::utils::headers::found;
use axum::extract::multipart::{Field, MultipartError};
use axum::extract::{Multipart, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::Value;

pub const SINGLE_FIELD: &str = "single-file";
pub const MULTIPLE_FIELD: &str = "multiple-files";

#[derive(Debug)]
pub struct ReceivedFile {
    pub original_name: String,
    pub stored: StoredFile,
}

#[derive(Debug, Default)]
pub struct ReceivedForm {
    pub files: Vec<ReceivedFile>,
    pub fields: FormFields,
}

impl ReceivedForm {
    fn redirect_target(&self) -> Option<&str> {
        self.fields
            .get("redirect")
            .and_then(Value::as_str)
            .filter(|target| !target.is_empty())
    }
}

fn rejected(e: MultipartError) -> SandboxError {
    SandboxError::BodyRejected {
        status: e.status(),
        message: e.body_text(),
    }
}

/// Streams every file part under `file_field` into `storage` and collects the
/// text parts. Files under any other field name are rejected, as is going
/// past `max_files`. A part with an empty filename is a file input left blank
/// and is skipped. When the form is rejected, nothing it uploaded is kept.
pub async fn receive<S: Storage>(
    storage: &S,
    multipart: Multipart,
    file_field: &str,
    max_files: Option<usize>,
) -> Result<ReceivedForm> {
    let mut form = ReceivedForm::default();

    match read_parts(storage, multipart, file_field, max_files, &mut form).await {
        Ok(()) => Ok(form),
        Err(e) => {
            discard(storage, form.files).await;
            Err(e)
        }
    }
}

async fn read_parts<S: Storage>(
    storage: &S,
    mut multipart: Multipart,
    file_field: &str,
    max_files: Option<usize>,
    form: &mut ReceivedForm,
) -> Result<()> {
    while let Some(mut field) = multipart.next_field().await.map_err(rejected)? {
        let name = field.name().unwrap_or_default().to_string();

        let file_name = field.file_name().map(str::to_string);
        let original_name = match file_name {
            Some(file_name) if file_name.is_empty() => continue,
            Some(file_name) => file_name,
            None => {
                let value = field.text().await.map_err(rejected)?;
                form.fields.insert(name, Value::String(value));
                continue;
            }
        };

        if name != file_field {
            return Err(SandboxError::bad_request(format!(
                "unexpected file field `{name}`"
            )));
        }
        if max_files.is_some_and(|max| form.files.len() >= max) {
            return Err(SandboxError::bad_request(format!(
                "too many files in field `{name}`"
            )));
        }

        let mut writer = storage.create_file().await?;
        if let Err(e) = copy_field(&mut field, &mut writer).await {
            writer.discard().await;
            return Err(e);
        }
        let stored = writer.finish().await?;

        tracing::info!(
            "📁 Stored upload '{}' ({} bytes) as {}",
            original_name,
            stored.size,
            stored.stored_name
        );
        form.files.push(ReceivedFile {
            original_name,
            stored,
        });
    }

    Ok(())
}

async fn copy_field<W: FileWriter>(field: &mut Field<'_>, writer: &mut W) -> Result<()> {
    while let Some(chunk) = field.chunk().await.map_err(rejected)? {
        writer.write_chunk(&chunk).await?;
    }
    Ok(())
}

/// Removes the stored files of a request that ends in an error.
pub async fn discard<S: Storage>(storage: &S, files: Vec<ReceivedFile>) {
    for file in files {
        if let Err(e) = storage.remove_file(&file.stored).await {
            tracing::warn!(
                "⚠️ Cannot remove rejected upload {}: {}",
                file.stored.stored_name,
                e
            );
        }
    }
}

/// The redirect the form asked for, if any. A target that cannot become a
/// `Location` header fails the request and drops its files.
async fn redirect<S: Storage>(storage: &S, form: &mut ReceivedForm) -> Result<Option<Response>> {
    let redirect = form.redirect_target().map(found);
    match redirect {
        None => Ok(None),
        Some(Ok(response)) => Ok(Some(response)),
        Some(Err(e)) => {
            discard(storage, std::mem::take(&mut form.files)).await;
            Err(e)
        }
    }
}

pub async fn upload_single(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response> {
    let mut form = receive(&state.storage, multipart, SINGLE_FIELD, Some(1)).await?;

    if form.files.is_empty() {
        return Err(SandboxError::MissingFile {
            field: SINGLE_FIELD.to_string(),
        });
    }
    if let Some(response) = redirect(&state.storage, &mut form).await? {
        return Ok(response);
    }

    let file = form.files.swap_remove(0);
    let descriptor = UploadDescriptor::new(file.original_name, file.stored.size, form.fields);
    Ok(Json(descriptor).into_response())
}

pub async fn upload_multiple(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response> {
    let mut form = receive(&state.storage, multipart, MULTIPLE_FIELD, None).await?;

    if let Some(response) = redirect(&state.storage, &mut form).await? {
        return Ok(response);
    }

    let descriptor = UploadBatchDescriptor::new(form.files.len(), form.fields);
    Ok(Json(descriptor).into_response())
}
