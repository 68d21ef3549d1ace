use std::{
    fs::OpenOptions,
    path::{Path, PathBuf},
    sync::Mutex,
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use tuimenu::{
    config::{self, Config},
    menu::{Engine, Menu, MenuFile},
    platform::{CrosstermTerminal, ScriptedTerminal},
    resources::{Resources, SharedResources},
};

#[derive(Parser, Debug)]
#[command(name = "tuimenu", version, about = "Text-mode settings menus")]
struct Cli {
    /// Append diagnostics to this file (overrides the config's `log_file`).
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Opens the menu on the terminal and prints the unwind code on exit.
    Run {
        /// Menu file to show instead of the configured or bundled one.
        #[arg(long)]
        menu: Option<PathBuf>,
        /// Do not write changed settings back to the config file.
        #[arg(long)]
        no_save: bool,
    },
    /// Drives the menu with a fixed key list. Prints the unwind code (or
    /// `open` if the keys ran out first) and the screen as of the last key.
    Replay {
        /// Comma separated keys: up, down, enter, space, esc, or single characters.
        #[arg(long)]
        keys: String,
        #[arg(long)]
        menu: Option<PathBuf>,
        #[arg(long, default_value_t = 80)]
        cols: u16,
        #[arg(long, default_value_t = 25)]
        rows: u16,
    },
    /// Prints the menu tree with current values.
    Tree {
        #[arg(long)]
        menu: Option<PathBuf>,
    },
    /// Prints the config path that would be used (if any).
    ConfigPath,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let loaded = config::load_optional()?;
    let cfg = loaded.as_ref().map(|(_, cfg)| cfg.clone()).unwrap_or_default();

    if let Some(log_file) = cli.log_file.as_deref().or(cfg.log_file.as_deref()) {
        init_logging(log_file)?;
    }

    match cli.command {
        Command::Run { menu, no_save } => {
            let resources = cfg.resources.clone().into_shared();
            let mut menu = load_menu(menu.as_deref(), &cfg, &resources)?;

            let unwind = {
                let mut term = CrosstermTerminal::new()?;
                Engine::new().run(&mut menu, &mut term)?
            };
            info!(code = unwind.code(), "session ended");
            println!("{}", unwind.code());

            if cfg.save_on_exit() && !no_save {
                let path = loaded
                    .map(|(path, _)| path)
                    .or_else(config::resolve_config_path);
                if let Some(path) = path {
                    config::patch_resources(&path, &resources.borrow())?;
                    info!(path = %path.display(), "settings saved");
                }
            }
        }
        Command::Replay {
            keys,
            menu,
            cols,
            rows,
        } => {
            let keys = ScriptedTerminal::parse_script(&keys)?;
            let resources = cfg.resources.clone().into_shared();
            let mut menu = load_menu(menu.as_deref(), &cfg, &resources)?;

            let mut term = ScriptedTerminal::new(cols, rows, keys);
            match Engine::new().run(&mut menu, &mut term) {
                Ok(unwind) => println!("{}", unwind.code()),
                Err(err) => {
                    warn!(error = %format!("{err:#}"), "replay ended with a menu open");
                    println!("open");
                }
            }
            println!("{}", term.last_frame());
            print_resources(&resources.borrow());
        }
        Command::Tree { menu } => {
            let resources = cfg.resources.clone().into_shared();
            let mut menu = load_menu(menu.as_deref(), &cfg, &resources)?;
            menu.refresh();
            print!("{}", menu.outline());
        }
        Command::ConfigPath => {
            if let Some(path) = config::resolve_config_path() {
                println!("{}", path.display());
            }
        }
    }

    Ok(())
}

fn load_menu(arg: Option<&Path>, cfg: &Config, resources: &SharedResources) -> Result<Menu> {
    let file = match arg.or(cfg.menu.as_deref()) {
        Some(path) => MenuFile::load(path)?,
        None => MenuFile::bundled()?,
    };
    Ok(file.build(resources))
}

fn print_resources(resources: &Resources) {
    for (name, value) in resources.iter() {
        println!("{name} = {value}");
    }
}

fn init_logging(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create log dir {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open log file {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}
