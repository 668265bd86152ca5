use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{require, text_payload};
use crate::resource::{Editable, FieldRule, FormDraft, Messages, Resource, UpdateVerb};

/// The village head's welcome message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Sambutan {
    #[serde(rename = "ID")]
    pub id: i64,
    /// Path relative to the API base.
    #[serde(rename = "Foto", default)]
    pub foto: String,
    #[serde(rename = "KataSambutan")]
    pub kata_sambutan: String,
    #[serde(rename = "NamaKepalaDesa")]
    pub nama_kepala_desa: String,
}

impl Resource for Sambutan {
    type Id = i64;

    const PATH: &'static str = "sambutan";
    const MESSAGES: Messages = Messages {
        fetch: "Gagal mengambil data sambutan",
        create: "Gagal menyimpan sambutan",
        update: "Gagal menyimpan sambutan",
        delete: "Gagal menghapus sambutan",
    };

    fn id(&self) -> i64 {
        self.id
    }

    fn display_name(&self) -> String {
        format!("sambutan {}", self.nama_kepala_desa)
    }
}

impl Editable for Sambutan {
    const FIELDS: &'static [FieldRule] = &[
        FieldRule::text("nama_kepaladesa"),
        FieldRule::text("kata_sambutan"),
    ];
    const ATTACHMENT_FIELD: Option<&'static str> = Some("foto_kepaladesa");
    const UPDATE_VERB: UpdateVerb = UpdateVerb::Patch;

    fn to_draft(&self) -> FormDraft {
        FormDraft::from([
            ("nama_kepaladesa", self.nama_kepala_desa.as_str()),
            ("kata_sambutan", self.kata_sambutan.as_str()),
        ])
    }

    fn validate(draft: &FormDraft, _creating: bool) -> Result<(), &'static str> {
        require(
            draft,
            &["nama_kepaladesa", "kata_sambutan"],
            "Nama kepala desa dan kata sambutan wajib diisi",
        )
    }

    fn to_payload(draft: &FormDraft) -> Result<Map<String, Value>, &'static str> {
        Ok(text_payload(draft, &["nama_kepaladesa", "kata_sambutan"]))
    }
}
