use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::instrument;

use super::{require, Rtrw};
use crate::api::RestService;
use crate::resource::{Editable, FieldRule, FormDraft, Messages, Resource};
use crate::sync::{ResourceListController, ResourceScreen, Searchable, SyncError};

pub const AGAMA_OPTIONS: &[&str] = &[
    "Islam",
    "Konghucu",
    "Kristen",
    "Katolik",
    "Buddha",
    "Lain - Lain",
];

pub const GENDER_OPTIONS: &[&str] = &["Laki-laki", "Perempuan"];

/// A registered resident.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Penduduk {
    pub id_penduduk: i64,
    pub id_rtrw: i64,
    pub nama: String,
    pub agama: String,
    pub gender: String,
    #[serde(default)]
    pub rtrw: Option<Rtrw>,
}

impl Resource for Penduduk {
    type Id = i64;

    const PATH: &'static str = "penduduk";
    const MESSAGES: Messages = Messages {
        fetch: "Gagal mengambil data penduduk",
        create: "Gagal menyimpan data",
        update: "Gagal menyimpan data",
        delete: "Gagal menghapus data",
    };

    fn id(&self) -> i64 {
        self.id_penduduk
    }

    fn display_name(&self) -> String {
        self.nama.clone()
    }
}

impl Searchable for Penduduk {
    const SEARCH_PATH: &'static str = "penduduk/search";
    const SEARCH_PARAM: &'static str = "nama";
    const SEARCH_ERROR: &'static str = "Gagal mengambil hasil pencarian";
}

impl Editable for Penduduk {
    const FIELDS: &'static [FieldRule] = &[
        FieldRule::digits("id_rtrw"),
        FieldRule::text("nama"),
        FieldRule::text("agama"),
        FieldRule::text("gender"),
    ];

    fn to_draft(&self) -> FormDraft {
        FormDraft::from([
            ("id_rtrw", self.id_rtrw.to_string().as_str()),
            ("nama", self.nama.as_str()),
            ("agama", self.agama.as_str()),
            ("gender", self.gender.as_str()),
        ])
    }

    fn validate(draft: &FormDraft, _creating: bool) -> Result<(), &'static str> {
        require(
            draft,
            &["id_rtrw", "nama", "agama", "gender"],
            "Semua field wajib diisi!",
        )?;
        if !AGAMA_OPTIONS.contains(&draft.get("agama")) {
            return Err("Agama tidak valid");
        }
        if !GENDER_OPTIONS.contains(&draft.get("gender")) {
            return Err("Jenis kelamin tidak valid");
        }
        Ok(())
    }

    fn to_payload(draft: &FormDraft) -> Result<Map<String, Value>, &'static str> {
        let id_rtrw = draft
            .parse_count("id_rtrw")
            .ok_or("Semua field wajib diisi!")?;
        let mut payload = Map::new();
        payload.insert("id_rtrw".into(), id_rtrw.into());
        for name in ["nama", "agama", "gender"] {
            payload.insert(name.into(), draft.get(name).into());
        }
        Ok(payload)
    }
}

/// The resident screen: the resident CRUD plus the RT/RW list its form picks from.
pub struct PendudukScreen {
    pub residents: ResourceScreen<Penduduk>,
    pub rtrw: ResourceListController<Rtrw>,
}

impl PendudukScreen {
    pub fn new(api: Arc<dyn RestService>) -> Self {
        Self {
            residents: ResourceScreen::new(Arc::clone(&api)),
            rtrw: ResourceListController::new(api),
        }
    }

    /// Load residents and RT/RW options concurrently.
    #[instrument(skip_all)]
    pub async fn mount(&mut self) -> Result<(), SyncError> {
        let Self { residents, rtrw } = self;
        let (listed, options) = futures::join!(
            async { residents.mount().await.map(|_| ()) },
            async { rtrw.fetch_all().await.map(|_| ()) },
        );
        listed?;
        options.or_else(|err| self.residents.fail(err))
    }

    pub fn rtrw_label(&self, id_rtrw: i64) -> Option<String> {
        self.rtrw.find(&id_rtrw).map(Rtrw::label)
    }

    /// Submit the resident form, refusing an RT/RW that is not among the loaded options.
    pub async fn submit(&mut self) -> Result<(), SyncError> {
        let chosen = self.residents.form.draft().parse_count("id_rtrw");
        if let Some(id) = chosen {
            if !self.rtrw.items().is_empty() && self.rtrw.find(&id).is_none() {
                return self
                    .residents
                    .fail(SyncError::Validation("RT/RW tidak ditemukan".into()));
            }
        }
        self.residents.submit().await
    }
}
