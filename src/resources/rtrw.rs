use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{require, text_payload};
use crate::resource::{Editable, FieldRule, FormDraft, Messages, Resource};

/// A neighbourhood unit (rukun tetangga / rukun warga) residents belong to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Rtrw {
    pub id_rtrw: i64,
    pub rt: String,
    pub rw: String,
}

impl Rtrw {
    pub fn label(&self) -> String {
        format!("RT {} / RW {}", self.rt, self.rw)
    }
}

impl Resource for Rtrw {
    type Id = i64;

    const PATH: &'static str = "rtrw";
    const MESSAGES: Messages = Messages {
        fetch: "Gagal mengambil data RTRW",
        create: "Gagal menyimpan data RTRW",
        update: "Gagal menyimpan data RTRW",
        delete: "Gagal menghapus data RTRW",
    };

    fn id(&self) -> i64 {
        self.id_rtrw
    }

    fn display_name(&self) -> String {
        self.label()
    }
}

impl Editable for Rtrw {
    const FIELDS: &'static [FieldRule] = &[
        FieldRule::digits("rt").max_len(3),
        FieldRule::digits("rw").max_len(3),
    ];

    fn to_draft(&self) -> FormDraft {
        FormDraft::from([("rt", self.rt.as_str()), ("rw", self.rw.as_str())])
    }

    fn validate(draft: &FormDraft, _creating: bool) -> Result<(), &'static str> {
        require(draft, &["rt", "rw"], "RT dan RW wajib diisi")
    }

    fn to_payload(draft: &FormDraft) -> Result<Map<String, Value>, &'static str> {
        Ok(text_payload(draft, &["rt", "rw"]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rt_and_rw_are_short_digit_strings() {
        let rule = Rtrw::field("rt").unwrap();
        assert_eq!(rule.apply("01a234"), "012");
        assert_eq!(Rtrw::field("rw").unwrap().apply("RW 7"), "7");
        assert!(Rtrw::field("id_rtrw").is_none());
    }

    #[test]
    fn requires_both_parts() {
        let draft = FormDraft::from([("rt", "01"), ("rw", " ")]);
        assert_eq!(Rtrw::validate(&draft, true), Err("RT dan RW wajib diisi"));

        let r: Rtrw = serde_json::from_value(json!({ "id_rtrw": 4, "rt": "02", "rw": "01" })).unwrap();
        assert_eq!(r.display_name(), "RT 02 / RW 01");
        assert_eq!(Rtrw::to_payload(&r.to_draft()).unwrap()["rt"], "02");
    }
}
