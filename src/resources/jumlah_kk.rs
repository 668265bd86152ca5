use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::resource::{Editable, FieldRule, FormDraft, Messages, Resource};

/// Household (kepala keluarga) count.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JumlahKk {
    #[serde(rename = "IDJumlahKK")]
    pub id: i64,
    #[serde(rename = "JumlahKK")]
    pub jumlah_kk: i64,
}

impl Resource for JumlahKk {
    type Id = i64;

    const PATH: &'static str = "jumlahkk";
    const MESSAGES: Messages = Messages {
        fetch: "Gagal mengambil data",
        create: "Gagal menyimpan data",
        update: "Gagal menyimpan data",
        delete: "Gagal menghapus data",
    };

    fn id(&self) -> i64 {
        self.id
    }

    fn display_name(&self) -> String {
        format!("{} KK", self.jumlah_kk)
    }
}

impl Editable for JumlahKk {
    const FIELDS: &'static [FieldRule] = &[FieldRule::digits("jumlahkk")];

    fn to_draft(&self) -> FormDraft {
        FormDraft::from([("jumlahkk", self.jumlah_kk.to_string().as_str())])
    }

    fn validate(draft: &FormDraft, _creating: bool) -> Result<(), &'static str> {
        match draft.parse_count("jumlahkk") {
            Some(_) => Ok(()),
            None => Err("Jumlah KK harus berupa angka"),
        }
    }

    fn to_payload(draft: &FormDraft) -> Result<Map<String, Value>, &'static str> {
        let count = draft
            .parse_count("jumlahkk")
            .ok_or("Jumlah KK harus berupa angka")?;
        let mut payload = Map::new();
        payload.insert("jumlahkk".into(), count.into());
        Ok(payload)
    }
}
