use anyhow::{anyhow, bail, Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use kepayang_admin::api::{RestClient, RestService};
use kepayang_admin::config::{self, Config};
use kepayang_admin::panel::{Menu, Panel};
use kepayang_admin::resource::Editable;
use kepayang_admin::resources::{
    Admin, Berita, InfoDesa, JumlahKk, Komentar, Penduduk, PendudukScreen, Rtrw, Sambutan,
    StrukturDesa, VisiMisi,
};
use kepayang_admin::session::{self, SessionStore};
use kepayang_admin::sync::{ResourceScreen, SearchDebouncer};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Path to YAML config file
    #[arg(long, default_value = "config.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Exchange credentials for a session token
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    Logout,
    /// Show the logged-in admin
    Whoami,
    /// Print every record of a menu as JSON
    List { menu: Menu },
    Create {
        menu: Menu,
        #[command(flatten)]
        form: FormArgs,
    },
    Edit {
        menu: Menu,
        id: String,
        #[command(flatten)]
        form: FormArgs,
    },
    Delete {
        menu: Menu,
        id: String,
        /// Confirm without asking
        #[arg(long)]
        yes: bool,
    },
    /// Search residents by name; each term is typed in turn
    Search {
        #[arg(required = true)]
        terms: Vec<String>,
    },
}

#[derive(Debug, ClapArgs)]
struct FormArgs {
    /// Field assignment, e.g. `--set judul=Panen`
    #[arg(long = "set", value_parser = parse_assignment)]
    fields: Vec<(String, String)>,
    /// Image to upload with the form
    #[arg(long)]
    attach: Option<PathBuf>,
}

fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.to_string()))
        .ok_or_else(|| format!("expected NAME=VALUE, got '{}'", raw))
}

enum Action {
    List,
    Create(FormArgs),
    Edit(String, FormArgs),
    Delete { id: String, yes: bool },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();

    let args = Args::parse();
    let cfg = config::load(Some(&args.config))?;
    cfg.ensure_dirs()?;
    let store = SessionStore::new(cfg.session_path());

    let (menu, action) = match args.command {
        Command::Login { username, password } => {
            return login(&cfg, &store, &username, &password).await
        }
        Command::Logout => {
            let panel = enter(&cfg, &store)?;
            return Ok(panel.logout(&store).await?);
        }
        Command::Whoami => {
            let mut panel = enter(&cfg, &store)?;
            let admin = panel.profile().await?;
            return print_json(admin);
        }
        Command::Search { terms } => {
            let panel = enter(&cfg, &store)?;
            return search(&cfg, panel.api(), &terms).await;
        }
        Command::List { menu } => (menu, Action::List),
        Command::Create { menu, form } => (menu, Action::Create(form)),
        Command::Edit { menu, id, form } => (menu, Action::Edit(id, form)),
        Command::Delete { menu, id, yes } => (menu, Action::Delete { id, yes }),
    };

    let mut panel = enter(&cfg, &store)?;
    panel.select(menu);
    let api = panel.api();
    match menu {
        Menu::Admin => run::<Admin>(api, action).await,
        Menu::VisiMisi => run::<VisiMisi>(api, action).await,
        Menu::Struktur => run::<StrukturDesa>(api, action).await,
        Menu::Berita => run::<Berita>(api, action).await,
        Menu::KataSambutan => run::<Sambutan>(api, action).await,
        Menu::JumlahKk => run::<JumlahKk>(api, action).await,
        Menu::Komentar => run::<Komentar>(api, action).await,
        Menu::Rtrw => run::<Rtrw>(api, action).await,
        Menu::InfoDesa => run::<InfoDesa>(api, action).await,
        Menu::Penduduk => residents(api, action).await,
        Menu::Dashboard | Menu::Search => {
            bail!("'{}' ({}) has no records to manage", menu, menu.label())
        }
    }
}

async fn login(cfg: &Config, store: &SessionStore, username: &str, password: &str) -> Result<()> {
    let client = RestClient::from_config(cfg, session::Session::anonymous())?;
    let session = session::login(&client, username, password).await?;
    store
        .save(&session)
        .with_context(|| format!("failed to write {}", store.path().display()))?;
    info!(path = %store.path().display(), "session saved");
    println!("Login berhasil");
    Ok(())
}

fn enter(cfg: &Config, store: &SessionStore) -> Result<Panel> {
    let session = store
        .load()
        .with_context(|| format!("failed to read {}", store.path().display()))?;
    let client = RestClient::from_config(cfg, session.clone())?;
    Ok(Panel::enter(Arc::new(client), session)?)
}

async fn run<R: Editable>(api: Arc<dyn RestService>, action: Action) -> Result<()> {
    let mut screen = ResourceScreen::<R>::new(api);
    screen.mount().await?;
    match action {
        Action::List => print_json(screen.list.items()),
        Action::Create(form) => {
            screen.open_create();
            fill(&mut screen, form).await?;
            screen.submit().await?;
            report(screen.banner())
        }
        Action::Edit(id, form) => {
            screen.open_edit(&parse_id::<R>(&id)?)?;
            fill(&mut screen, form).await?;
            screen.submit().await?;
            report(screen.banner())
        }
        Action::Delete { id, yes } => remove(&mut screen, &id, yes).await,
    }
}

async fn residents(api: Arc<dyn RestService>, action: Action) -> Result<()> {
    let mut screen = PendudukScreen::new(api);
    screen.mount().await?;
    let form = match action {
        Action::List => return print_json(screen.residents.list.items()),
        Action::Delete { id, yes } => return remove(&mut screen.residents, &id, yes).await,
        Action::Create(form) => {
            screen.residents.open_create();
            form
        }
        Action::Edit(id, form) => {
            screen.residents.open_edit(&parse_id::<Penduduk>(&id)?)?;
            form
        }
    };
    fill(&mut screen.residents, form).await?;
    screen.submit().await?;
    report(screen.residents.banner())
}

async fn remove<R: Editable>(screen: &mut ResourceScreen<R>, raw_id: &str, yes: bool) -> Result<()> {
    let id = parse_id::<R>(raw_id)?;
    if !screen.request_delete(&id) {
        bail!("{} {} not found", R::PATH, id);
    }
    if !yes {
        let name = screen
            .deletion
            .pending()
            .map(|p| p.display_name.clone())
            .unwrap_or_default();
        screen.cancel_delete();
        bail!("refusing to delete '{}' without --yes", name);
    }
    screen.confirm_delete().await?;
    report(screen.banner())
}

async fn fill<R: Editable>(screen: &mut ResourceScreen<R>, form: FormArgs) -> Result<()> {
    for (name, value) in &form.fields {
        if screen.update_field(name, value).is_none() {
            bail!("{} has no field '{}'", R::PATH, name);
        }
    }
    if let Some(path) = form.attach {
        screen.form.attach_file(&path).await?;
    }
    Ok(())
}

async fn search(cfg: &Config, api: Arc<dyn RestService>, terms: &[String]) -> Result<()> {
    let mut debouncer = SearchDebouncer::<Penduduk>::with_delay(api, cfg.debounce());
    for term in terms {
        debouncer.on_query_change(term).await;
    }
    debouncer.settle().await;
    let state = debouncer.snapshot().await;
    if let Some(error) = state.error {
        bail!(error);
    }
    print_json(&state.results)
}

fn parse_id<R: Editable>(raw: &str) -> Result<R::Id> {
    raw.trim()
        .parse::<R::Id>()
        .map_err(|_| anyhow!("invalid {} id '{}'", R::PATH, raw))
}

/// A successful save whose refresh failed still leaves a banner behind.
fn report(banner: Option<&str>) -> Result<()> {
    match banner {
        Some(message) => bail!("saved, but the list could not be refreshed: {}", message),
        None => {
            println!("OK");
            Ok(())
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
