use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{require, text_payload};
use crate::resource::{Editable, FieldRule, FormDraft, Messages, Resource};

static NAMA_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z\s]{1,20}$").expect("valid nama regex"));
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[a-zA-Z]{2,}$").expect("valid email regex"));
static NO_HP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{10,13}$").expect("valid no_hp regex"));

/// A visitor comment left on the public site.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Komentar {
    pub id_komentar: i64,
    pub nama: String,
    pub email: String,
    pub no_hp: String,
    pub komentar: String,
}

impl Resource for Komentar {
    type Id = i64;

    const PATH: &'static str = "komentar";
    const MESSAGES: Messages = Messages {
        fetch: "Gagal mengambil data komentar",
        create: "Terjadi kesalahan saat menyimpan",
        update: "Terjadi kesalahan saat menyimpan",
        delete: "Gagal menghapus komentar",
    };

    fn id(&self) -> i64 {
        self.id_komentar
    }

    fn display_name(&self) -> String {
        format!("komentar dari {}", self.nama)
    }
}

impl Editable for Komentar {
    const FIELDS: &'static [FieldRule] = &[
        FieldRule::letters("nama").max_len(20),
        FieldRule::text("email"),
        FieldRule::digits("no_hp").max_len(13),
        FieldRule::text("komentar"),
    ];

    fn to_draft(&self) -> FormDraft {
        FormDraft::from([
            ("nama", self.nama.as_str()),
            ("email", self.email.as_str()),
            ("no_hp", self.no_hp.as_str()),
            ("komentar", self.komentar.as_str()),
        ])
    }

    fn validate(draft: &FormDraft, _creating: bool) -> Result<(), &'static str> {
        if !NAMA_RE.is_match(draft.get("nama")) {
            return Err("Nama hanya boleh huruf dan spasi (maks 20 karakter)");
        }
        if !EMAIL_RE.is_match(draft.get("email")) {
            return Err("Format email tidak valid (contoh: user@domain.com)");
        }
        if !NO_HP_RE.is_match(draft.get("no_hp")) {
            return Err("Nomor HP hanya angka (10-13 digit)");
        }
        require(draft, &["komentar"], "Komentar wajib diisi")
    }

    fn to_payload(draft: &FormDraft) -> Result<Map<String, Value>, &'static str> {
        Ok(text_payload(draft, &["nama", "email", "no_hp", "komentar"]))
    }
}
