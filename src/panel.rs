//! The authenticated admin panel: menu navigation, profile and logout.
use reqwest::Method;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::api::{ApiError, RestService};
use crate::resources::Admin;
use crate::session::{Session, SessionError, SessionStore};

#[derive(Debug, Error)]
pub enum PanelError {
    #[error("Silakan login terlebih dahulu")]
    Unauthenticated,
    #[error("Gagal mengambil profil admin")]
    Profile(#[source] ApiError),
    #[error(transparent)]
    Session(#[from] SessionError),
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown menu '{0}'")]
pub struct UnknownMenu(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Menu {
    #[default]
    Dashboard,
    Admin,
    VisiMisi,
    Struktur,
    Berita,
    KataSambutan,
    JumlahKk,
    Komentar,
    Rtrw,
    Penduduk,
    InfoDesa,
    Search,
}

impl Menu {
    pub const ALL: [Menu; 12] = [
        Menu::Dashboard,
        Menu::Admin,
        Menu::VisiMisi,
        Menu::Struktur,
        Menu::Berita,
        Menu::KataSambutan,
        Menu::JumlahKk,
        Menu::Komentar,
        Menu::Rtrw,
        Menu::Penduduk,
        Menu::InfoDesa,
        Menu::Search,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            Menu::Dashboard => "dashboard",
            Menu::Admin => "admin",
            Menu::VisiMisi => "visi-misi",
            Menu::Struktur => "struktur",
            Menu::Berita => "berita",
            Menu::KataSambutan => "kata-sambutan",
            Menu::JumlahKk => "jumlahkk",
            Menu::Komentar => "komentar",
            Menu::Rtrw => "rtrw",
            Menu::Penduduk => "penduduk",
            Menu::InfoDesa => "info-desa",
            Menu::Search => "search",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Menu::Dashboard => "Dashboard",
            Menu::Admin => "Kelola Admin",
            Menu::VisiMisi => "Visi & Misi",
            Menu::Struktur => "Struktur Desa",
            Menu::Berita => "Berita",
            Menu::KataSambutan => "Kata Sambutan",
            Menu::JumlahKk => "Jumlah KK",
            Menu::Komentar => "Komentar",
            Menu::Rtrw => "RT/RW",
            Menu::Penduduk => "Penduduk",
            Menu::InfoDesa => "Info Desa",
            Menu::Search => "Cari Penduduk",
        }
    }
}

impl FromStr for Menu {
    type Err = UnknownMenu;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Menu::ALL
            .into_iter()
            .find(|m| m.slug() == wanted)
            .ok_or(UnknownMenu(s.to_string()))
    }
}

impl fmt::Display for Menu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

#[derive(Deserialize)]
struct ProfileEnvelope {
    data: Admin,
}

/// Gatekeeper for every admin screen. Only reachable with a token.
pub struct Panel {
    api: Arc<dyn RestService>,
    session: Session,
    active: Menu,
}

impl fmt::Debug for Panel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Panel")
            .field("session", &self.session)
            .field("active", &self.active)
            .finish_non_exhaustive()
    }
}

impl Panel {
    pub fn enter(api: Arc<dyn RestService>, session: Session) -> Result<Self, PanelError> {
        if !session.is_authenticated() {
            return Err(PanelError::Unauthenticated);
        }
        Ok(Self {
            api,
            session,
            active: Menu::default(),
        })
    }

    pub fn api(&self) -> Arc<dyn RestService> {
        Arc::clone(&self.api)
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn active(&self) -> Menu {
        self.active
    }

    pub fn select(&mut self, menu: Menu) {
        info!(menu = %menu, "menu selected");
        self.active = menu;
    }

    /// Fetch `admin/me` and cache it on the session.
    #[instrument(skip_all)]
    pub async fn profile(&mut self) -> Result<&Admin, PanelError> {
        let value = self
            .api
            .get("admin/me", &[], true)
            .await
            .map_err(PanelError::Profile)?;
        let envelope: ProfileEnvelope = serde_json::from_value(value)
            .map_err(|e| PanelError::Profile(ApiError::Decode(e.to_string())))?;
        let session = std::mem::take(&mut self.session);
        self.session = session.with_admin(envelope.data);
        self.session
            .admin()
            .ok_or(PanelError::Unauthenticated)
    }

    /// `POST admin/logout`, then forget the session locally even if the
    /// backend call failed.
    #[instrument(skip_all)]
    pub async fn logout(self, store: &SessionStore) -> Result<(), PanelError> {
        if let Err(err) = self.api.send(Method::POST, "admin/logout", None).await {
            warn!(?err, "backend logout failed; clearing local session anyway");
        }
        store.clear()?;
        info!("logged out");
        Ok(())
    }
}
