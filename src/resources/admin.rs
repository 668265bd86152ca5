use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{require, text_payload};
use crate::resource::{Editable, FieldRule, FormDraft, Messages, Resource};

/// An admin account. The backend has shipped the key both as `id_admin` and
/// as `id`; `id_admin` wins when both are present.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "AdminWire")]
pub struct Admin {
    pub id_admin: i64,
    pub username: String,
    pub role: String,
}

#[derive(Deserialize)]
struct AdminWire {
    id_admin: Option<i64>,
    id: Option<i64>,
    username: Option<String>,
    role: Option<String>,
}

impl From<AdminWire> for Admin {
    fn from(wire: AdminWire) -> Self {
        Self {
            id_admin: wire.id_admin.or(wire.id).unwrap_or(0),
            username: wire.username.unwrap_or_default(),
            role: wire.role.unwrap_or_default(),
        }
    }
}

impl Resource for Admin {
    type Id = i64;

    const PATH: &'static str = "admin";
    const LIST_REQUIRES_AUTH: bool = true;
    const MESSAGES: Messages = Messages {
        fetch: "Gagal mengambil data admin",
        create: "Gagal menyimpan data admin",
        update: "Gagal menyimpan data admin",
        delete: "Gagal menghapus admin",
    };

    fn id(&self) -> i64 {
        self.id_admin
    }

    fn display_name(&self) -> String {
        self.username.clone()
    }
}

impl Editable for Admin {
    const FIELDS: &'static [FieldRule] = &[
        FieldRule::text("username"),
        FieldRule::text("password").secret(),
    ];

    fn create_path() -> String {
        "admin/register".to_string()
    }

    fn to_draft(&self) -> FormDraft {
        FormDraft::from([("username", self.username.as_str())])
    }

    fn validate(draft: &FormDraft, creating: bool) -> Result<(), &'static str> {
        require(draft, &["username"], "Username wajib diisi")?;
        if creating {
            require(draft, &["password"], "Password wajib diisi")?;
        }
        Ok(())
    }

    /// A blank password on edit keeps the current one.
    fn to_payload(draft: &FormDraft) -> Result<Map<String, Value>, &'static str> {
        let mut payload = text_payload(draft, &["username"]);
        if !draft.get("password").is_empty() {
            payload.insert("password".into(), draft.get("password").into());
        }
        Ok(payload)
    }
}
