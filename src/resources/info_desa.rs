use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::resource::{Editable, FieldRule, FormDraft, Messages, Resource};

/// One village statistic, e.g. number of households with electricity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InfoDesa {
    pub id_info: i64,
    pub indikator: String,
    pub jumlah: i64,
}

impl Resource for InfoDesa {
    type Id = i64;

    const PATH: &'static str = "info-desa";
    const MESSAGES: Messages = Messages {
        fetch: "Gagal mengambil data",
        create: "Gagal menambahkan data",
        update: "Gagal memperbarui data",
        delete: "Gagal menghapus data",
    };

    fn id(&self) -> i64 {
        self.id_info
    }

    fn display_name(&self) -> String {
        self.indikator.clone()
    }
}

impl Editable for InfoDesa {
    const FIELDS: &'static [FieldRule] = &[FieldRule::text("indikator"), FieldRule::digits("jumlah")];

    fn to_draft(&self) -> FormDraft {
        FormDraft::from([
            ("indikator", self.indikator.as_str()),
            ("jumlah", self.jumlah.to_string().as_str()),
        ])
    }

    fn validate(draft: &FormDraft, _creating: bool) -> Result<(), &'static str> {
        if draft.is_blank("indikator") {
            return Err("Indikator tidak boleh kosong");
        }
        if draft.parse_count("jumlah").is_none() {
            return Err("Jumlah harus angka positif");
        }
        Ok(())
    }

    fn to_payload(draft: &FormDraft) -> Result<Map<String, Value>, &'static str> {
        let jumlah = draft
            .parse_count("jumlah")
            .ok_or("Jumlah harus angka positif")?;
        let mut payload = Map::new();
        payload.insert("indikator".into(), draft.get("indikator").into());
        payload.insert("jumlah".into(), jumlah.into());
        Ok(payload)
    }
}
