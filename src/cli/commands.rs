//! Command dispatch

use std::io;
use std::path::Path;

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use tokio::sync::oneshot;
use tracing::{debug, instrument};
use url::Url;

use crate::application::LoadError;
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output::{self, ConsoleSink};
use crate::config::{self, Settings};
use crate::domain::SortBy;
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

pub async fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Ok(());
    };

    // Completion must work even with a broken config file
    if let Commands::Completion { shell } = command {
        print_completions(*shell);
        return Ok(());
    }

    let settings = Settings::load()?;
    let container = ServiceContainer::new(settings);

    match command {
        Commands::Play { library } => cmd_play(&container, library),
        Commands::Tree { library } => cmd_tree(&container, library),
        Commands::Sort { library, by } => cmd_sort(&container, library, by.map(SortBy::from)),
        Commands::Load { url, max_attempts } => cmd_load(&container, url, *max_attempts).await,
        Commands::Config { command } => cmd_config(&container, command),
        Commands::Completion { .. } => Ok(()),
    }
}

fn print_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}

#[instrument(skip(container))]
fn cmd_play(container: &ServiceContainer, library: &Path) -> CliResult<()> {
    let mut sink = ConsoleSink::default();
    container.library_service().play(library, &mut sink)?;
    debug!("played {} items", sink.played);
    Ok(())
}

#[instrument(skip(container))]
fn cmd_tree(container: &ServiceContainer, library: &Path) -> CliResult<()> {
    let summary = container.library_service().tree(library)?;
    output::info(&summary.rendered);
    output::detail(&format!("{} items, depth {}", summary.items, summary.depth));
    Ok(())
}

#[instrument(skip(container))]
fn cmd_sort(container: &ServiceContainer, library: &Path, by: Option<SortBy>) -> CliResult<()> {
    let gallery = container.gallery(by);
    let images = container.library_service().sorted_images(library, &gallery)?;

    output::header(&format!(
        "{} images by {}",
        images.len(),
        gallery.strategy_name()
    ));
    for image in &images {
        output::info(&format!(
            "{}  {:>10}  {}",
            image.date.format("%Y-%m-%d %H:%M"),
            image.size,
            image.name
        ));
    }
    Ok(())
}

#[instrument(skip(container))]
async fn cmd_load(
    container: &ServiceContainer,
    url: &Url,
    max_attempts: Option<u32>,
) -> CliResult<()> {
    let loader = container.image_loader(max_attempts)?;
    let (tx, rx) = oneshot::channel();
    loader.spawn_load(url.clone(), move |result| {
        let _ = tx.send(result);
    });
    let data = rx
        .await
        .unwrap_or_else(|_| Err(LoadError::Cancelled(url.clone())))
        .map_err(|e| InfraError::Application(e.into()))?;
    output::success(&format!("loaded {} bytes from {}", data.len(), url));
    Ok(())
}

fn cmd_config(container: &ServiceContainer, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            output::info(&container.settings.to_toml()?);
        }
        ConfigCommands::Path => match config::global_config_path() {
            Some(path) => output::info(&path.display()),
            None => return Err(CliError::Usage("no config directory on this platform".into())),
        },
        ConfigCommands::Template => {
            output::info(&Settings::template());
        }
        ConfigCommands::Init => {
            let path = config::global_config_path()
                .ok_or_else(|| CliError::Usage("no config directory on this platform".into()))?;
            container.init_config(&path)?;
            output::action("Created", &path.display());
        }
    }
    Ok(())
}
