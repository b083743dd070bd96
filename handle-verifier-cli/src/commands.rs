//! `check` and `interactive` commands

use std::sync::Arc;

use anyhow::{Context, Result};
use handle_verifier_core::types::QuickCheck;
use handle_verifier_core::{HandleFieldAdapter, InMemorySettings, ServiceContext};
use handle_verifier_provider::{AccountDirectory, FediverseDirectory, Handle};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::config::CliConfig;
use crate::surface::TerminalSurface;

/// One handle field wired to a terminal and a real directory.
pub struct Session {
    field_id: String,
    directory: Arc<FediverseDirectory>,
    adapter: Arc<HandleFieldAdapter>,
    settings: InMemorySettings,
    surface: Arc<TerminalSurface>,
}

impl Session {
    pub fn new(config: CliConfig) -> Result<Self> {
        let directory = Arc::new(
            FediverseDirectory::new(config.directory).context("Failed to set up HTTP client")?,
        );
        let surface = Arc::new(TerminalSurface::new());
        let ctx = Arc::new(ServiceContext::new(directory.clone(), surface.clone()));

        let adapter = Arc::new(HandleFieldAdapter::with_field_id(ctx, &config.field_id));
        let settings = InMemorySettings::new();
        adapter.register(&settings);

        Ok(Self {
            field_id: config.field_id,
            directory,
            adapter,
            settings,
            surface,
        })
    }

    /// Initial load of the field, validation pass included.
    async fn load(&self, stored: Option<Handle>) -> Result<()> {
        self.settings.load(&self.field_id, stored).await?;
        Ok(())
    }

    fn edit(&self, raw: &str) -> Result<QuickCheck> {
        Ok(self.settings.edit(&self.field_id, raw)?)
    }

    /// Runs the save path; `None` when the save was rejected.
    async fn save(&self) -> Option<Handle> {
        match self.settings.save(&self.field_id).await {
            Ok(stored) => stored,
            Err(e) if e.is_expected() => {
                tracing::debug!("Save rejected: {e}");
                None
            }
            Err(e) => {
                tracing::warn!("Save rejected: {e}");
                None
            }
        }
    }

    fn print_state(&self) -> Result<()> {
        let snapshot = self.adapter.display().snapshot();
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        match self.surface.visible() {
            Some((label, key)) => println!("on screen: {label} [{key}]"),
            None => println!("on screen: nothing"),
        }
        Ok(())
    }

    async fn print_accepted(&self, handle: &Handle) {
        println!("accepted: {handle}");
        if let Some(template) = self.directory.cached_subscribe_template(handle).await {
            println!("subscribe template: {template}");
        }
    }
}

/// `check <HANDLE>`: load an empty field, type the handle, save.
///
/// Returns whether the save was accepted.
pub async fn check(session: &Session, raw: &str) -> Result<bool> {
    session.load(None).await?;
    session.edit(raw)?.settle().await;

    match session.save().await {
        Some(handle) => {
            session.print_accepted(&handle).await;
            Ok(true)
        }
        None => {
            println!("rejected: {raw}");
            session.print_state()?;
            Ok(false)
        }
    }
}

/// `interactive`: every stdin line is an edit, `:save`, `:state` or `:quit`.
pub async fn interactive(session: &Session) -> Result<()> {
    session.load(None).await?;
    println!("Type a handle; :save to save, :state to show the state, :quit to leave");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match line.trim_end_matches(['\r', '\n']) {
            ":quit" | ":q" => break,
            ":state" => session.print_state()?,
            ":save" => {
                if let Some(handle) = session.save().await {
                    session.print_accepted(&handle).await;
                }
            }
            raw => {
                let check = session.edit(raw)?;
                tracing::debug!("Edit {raw:?}: {check:?}");
                check.settle().await;
            }
        }
    }
    Ok(())
}
