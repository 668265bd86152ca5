use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{require, text_payload};
use crate::resource::{Editable, FieldRule, FormDraft, Messages, Resource};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VisiMisi {
    #[serde(rename = "IDVisiMisi")]
    pub id: i64,
    #[serde(rename = "Visi")]
    pub visi: String,
    #[serde(rename = "Misi")]
    pub misi: String,
    #[serde(rename = "Foto", default)]
    pub foto: String,
}

impl Resource for VisiMisi {
    type Id = i64;

    const PATH: &'static str = "visimisi";
    const MESSAGES: Messages = Messages {
        fetch: "Gagal memuat data",
        create: "Gagal menyimpan data",
        update: "Gagal menyimpan data",
        delete: "Gagal menghapus data",
    };

    fn id(&self) -> i64 {
        self.id
    }

    fn display_name(&self) -> String {
        let visi: String = self.visi.chars().take(40).collect();
        format!("visi \"{}\"", visi)
    }
}

impl Editable for VisiMisi {
    const FIELDS: &'static [FieldRule] = &[FieldRule::text("visi"), FieldRule::text("misi")];

    fn to_draft(&self) -> FormDraft {
        FormDraft::from([("visi", self.visi.as_str()), ("misi", self.misi.as_str())])
    }

    fn validate(draft: &FormDraft, _creating: bool) -> Result<(), &'static str> {
        require(draft, &["visi", "misi"], "Visi dan misi wajib diisi")
    }

    fn to_payload(draft: &FormDraft) -> Result<Map<String, Value>, &'static str> {
        Ok(text_payload(draft, &["visi", "misi"]))
    }
}
