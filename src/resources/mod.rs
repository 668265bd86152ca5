//! One adapter per admin screen.
//!
//! Each module defines the record as the backend returns it and implements
//! [`Resource`](crate::resource::Resource) and
//! [`Editable`](crate::resource::Editable) for it.

pub mod admin;
pub mod berita;
pub mod info_desa;
pub mod jumlah_kk;
pub mod komentar;
pub mod penduduk;
pub mod rtrw;
pub mod sambutan;
pub mod struktur;
pub mod visi_misi;

pub use admin::Admin;
pub use berita::Berita;
pub use info_desa::InfoDesa;
pub use jumlah_kk::JumlahKk;
pub use komentar::Komentar;
pub use penduduk::{Penduduk, PendudukScreen};
pub use rtrw::Rtrw;
pub use sambutan::Sambutan;
pub use struktur::StrukturDesa;
pub use visi_misi::VisiMisi;

use crate::resource::FormDraft;
use serde_json::{Map, Value};

/// Fails with `message` when any of `names` is blank.
pub(crate) fn require(
    draft: &FormDraft,
    names: &[&str],
    message: &'static str,
) -> Result<(), &'static str> {
    if names.iter().any(|n| draft.is_blank(n)) {
        return Err(message);
    }
    Ok(())
}

/// Copy `names` from the draft into a JSON object as strings.
pub(crate) fn text_payload(draft: &FormDraft, names: &[&str]) -> Map<String, Value> {
    names
        .iter()
        .map(|n| (n.to_string(), Value::String(draft.get(n).to_string())))
        .collect()
}
