use reqwest::multipart::{Form, Part};
use serde_json::{Map, Value};
use std::fmt;
use std::path::Path;
use tokio::fs;

/// Body of a write request, encoded as JSON or `multipart/form-data`.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Json(Value),
    Multipart(MultipartBody),
}

/// Text fields plus at most one file part.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultipartBody {
    pub fields: Vec<(String, String)>,
    pub file: Option<(String, Attachment)>,
}

/// A file picked for upload.
#[derive(Clone, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

impl fmt::Debug for Attachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attachment")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl Attachment {
    pub fn from_bytes(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let content_type = content_type_for(Path::new(&file_name));
        Self {
            file_name,
            content_type,
            bytes,
        }
    }

    pub async fn from_path<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                std::io::Error::new(std::io::ErrorKind::InvalidInput, "invalid file name")
            })?
            .to_string();
        let bytes = fs::read(path).await?;
        Ok(Self::from_bytes(file_name, bytes))
    }
}

impl MultipartBody {
    /// Flatten a JSON object into text fields; strings are sent verbatim, other
    /// scalars in their JSON rendering, nulls are skipped.
    pub fn from_object(object: Map<String, Value>) -> Self {
        let fields = object
            .into_iter()
            .filter_map(|(name, value)| match value {
                Value::Null => None,
                Value::String(s) => Some((name, s)),
                other => Some((name, other.to_string())),
            })
            .collect();
        Self { fields, file: None }
    }

    pub fn with_file(mut self, field: &str, attachment: Option<Attachment>) -> Self {
        self.file = attachment.map(|a| (field.to_string(), a));
        self
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub(crate) fn into_form(self) -> reqwest::Result<Form> {
        let mut form = Form::new();
        for (name, value) in self.fields {
            form = form.text(name, value);
        }
        if let Some((field, attachment)) = self.file {
            let part = Part::bytes(attachment.bytes)
                .file_name(attachment.file_name)
                .mime_str(attachment.content_type)?;
            form = form.part(field, part);
        }
        Ok(form)
    }
}

fn content_type_for(file_path: &Path) -> &'static str {
    match file_path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|s| s.to_ascii_lowercase())
    {
        Some(ext) if ext == "jpg" || ext == "jpeg" => "image/jpeg",
        Some(ext) if ext == "png" => "image/png",
        Some(ext) if ext == "gif" => "image/gif",
        Some(ext) if ext == "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}
