use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{require, text_payload};
use crate::resource::{Editable, FieldRule, FormDraft, Messages, Resource};

/// A village official and their position.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StrukturDesa {
    #[serde(rename = "IDStruktur")]
    pub id: i64,
    #[serde(rename = "Foto", default)]
    pub foto: String,
    #[serde(rename = "Nama")]
    pub nama: String,
    #[serde(rename = "Jabatan")]
    pub jabatan: String,
}

impl Resource for StrukturDesa {
    type Id = i64;

    const PATH: &'static str = "struktur-desa";
    const MESSAGES: Messages = Messages {
        fetch: "Gagal mengambil data struktur desa",
        create: "Gagal menyimpan data",
        update: "Gagal menyimpan data",
        delete: "Gagal menghapus data",
    };

    fn id(&self) -> i64 {
        self.id
    }

    fn display_name(&self) -> String {
        format!("{} ({})", self.nama, self.jabatan)
    }
}

impl Editable for StrukturDesa {
    const FIELDS: &'static [FieldRule] = &[FieldRule::text("nama"), FieldRule::text("jabatan")];
    const ATTACHMENT_FIELD: Option<&'static str> = Some("foto");

    fn to_draft(&self) -> FormDraft {
        FormDraft::from([("nama", self.nama.as_str()), ("jabatan", self.jabatan.as_str())])
    }

    fn validate(draft: &FormDraft, _creating: bool) -> Result<(), &'static str> {
        require(draft, &["nama", "jabatan"], "Nama dan jabatan wajib diisi")
    }

    fn to_payload(draft: &FormDraft) -> Result<Map<String, Value>, &'static str> {
        Ok(text_payload(draft, &["nama", "jabatan"]))
    }
}
