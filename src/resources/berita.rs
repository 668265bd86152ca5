use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{require, text_payload};
use crate::resource::{Editable, FieldRule, FormDraft, Messages, Resource};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Berita {
    #[serde(rename = "IDBerita")]
    pub id: i64,
    #[serde(rename = "Foto", default)]
    pub foto: String,
    #[serde(rename = "Judul")]
    pub judul: String,
    #[serde(rename = "Deskripsi", default)]
    pub deskripsi: String,
    #[serde(rename = "Tanggal", default)]
    pub tanggal: String,
}

impl Resource for Berita {
    type Id = i64;

    const PATH: &'static str = "berita";
    const MESSAGES: Messages = Messages {
        fetch: "Gagal mengambil data berita",
        create: "Gagal menyimpan data berita",
        update: "Gagal menyimpan data berita",
        delete: "Gagal menghapus berita",
    };

    fn id(&self) -> i64 {
        self.id
    }

    fn display_name(&self) -> String {
        self.judul.clone()
    }
}

impl Editable for Berita {
    const FIELDS: &'static [FieldRule] = &[
        FieldRule::text("judul"),
        FieldRule::text("deskripsi"),
        FieldRule::text("tanggal"),
    ];
    const ATTACHMENT_FIELD: Option<&'static str> = Some("foto");

    fn to_draft(&self) -> FormDraft {
        FormDraft::from([
            ("judul", self.judul.as_str()),
            ("deskripsi", self.deskripsi.as_str()),
            ("tanggal", date_part(&self.tanggal)),
        ])
    }

    fn validate(draft: &FormDraft, _creating: bool) -> Result<(), &'static str> {
        require(
            draft,
            &["judul", "deskripsi", "tanggal"],
            "Judul, deskripsi, dan tanggal wajib diisi",
        )?;
        NaiveDate::parse_from_str(draft.get("tanggal").trim(), "%Y-%m-%d")
            .map_err(|_| "Tanggal harus berformat YYYY-MM-DD")?;
        Ok(())
    }

    fn to_payload(draft: &FormDraft) -> Result<Map<String, Value>, &'static str> {
        Ok(text_payload(draft, &["judul", "deskripsi", "tanggal"]))
    }
}

/// The backend may return a full timestamp; the date input only takes the day.
fn date_part(raw: &str) -> &str {
    match raw.get(..10) {
        Some(day) if NaiveDate::parse_from_str(day, "%Y-%m-%d").is_ok() => day,
        _ => raw,
    }
}
