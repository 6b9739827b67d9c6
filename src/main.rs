use std::io;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tracing::info;

use helm_menu::config::HelmConfig;
use helm_menu::drivers::{ConsoleInputDriver, ConsoleOutputDriver, OutputDriver};
use helm_menu::keybindings::KeyBindings;
use helm_menu::menu::QuickMenu;
use helm_menu::navigator::{BrowserNavigator, Navigator, PrintNavigator};
use helm_menu::runner::{HelmApp, run_app};
use helm_menu::snapshot::{ToolbarCapture, load_admin_menu, load_snapshot, load_toolbar};
use helm_menu::source::select_source;
use helm_menu::tracing_sub;
use helm_menu::view_state::ViewStore;

/// Keyboard-driven quick menu over an admin navigation snapshot.
#[derive(Debug, Parser)]
#[command(name = "helm-menu", version, about)]
struct Cli {
    /// JSON configuration (coreIds, toolbarKeepIds, menuSnapshot, ...).
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Pre-built menu snapshot; replaces the one in the configuration.
    #[arg(long, value_name = "FILE")]
    snapshot: Option<PathBuf>,

    /// Captured admin-menu markup, used when no snapshot is available.
    #[arg(long, value_name = "FILE")]
    admin_menu: Option<PathBuf>,

    /// Captured toolbar markup.
    #[arg(long, value_name = "FILE")]
    toolbar: Option<PathBuf>,

    /// Site URL that relative links resolve against.
    #[arg(long, value_name = "URL")]
    site_url: Option<String>,

    /// Pending update count.
    #[arg(long, value_name = "N")]
    updates: Option<u32>,

    /// Where the Cards/Expanded preference is stored.
    #[arg(long, value_name = "FILE")]
    state_file: Option<PathBuf>,

    /// Append logs to this file; logs are discarded otherwise.
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Print the chosen URL on exit instead of opening a browser.
    #[arg(long)]
    print: bool,

    /// Print the classified sections and exit.
    #[arg(long)]
    dump: bool,

    /// Start with the menu open.
    #[arg(long)]
    open: bool,
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    tracing_sub::init(cli.log_file.as_deref(), cli.verbose);

    let menu = build_menu(&cli)?;
    if cli.dump {
        print!("{}", menu.tree().outline());
        return Ok(());
    }

    let mut app = HelmApp::new(menu);
    if cli.open {
        app.menu_mut().menu_mut().show(None);
    }

    let mut navigator: Box<dyn Navigator> = if cli.print {
        Box::new(PrintNavigator::new(io::stdout()))
    } else {
        Box::new(BrowserNavigator::new())
    };

    let mut output = ConsoleOutputDriver::new()?;
    output.enter()?;
    let result = run_app(
        ConsoleInputDriver::new(),
        &mut output,
        &mut app,
        navigator.as_mut(),
        Duration::from_millis(16),
    );
    output.exit()?;
    info!("session ended");
    result?;
    navigator.finish()
}

fn build_menu(cli: &Cli) -> io::Result<QuickMenu> {
    let mut config = HelmConfig::load(cli.config.as_deref()).map_err(io::Error::other)?;
    if let Some(url) = &cli.site_url {
        config = config.with_site_url(url).map_err(io::Error::other)?;
    }
    if let Some(count) = cli.updates {
        config = config.with_updates_count(count);
    }
    if let Some(path) = &cli.snapshot {
        config = config.with_snapshot(load_snapshot(path).map_err(io::Error::other)?);
    }
    let markup = cli
        .admin_menu
        .as_deref()
        .map(load_admin_menu)
        .transpose()
        .map_err(io::Error::other)?;
    let toolbar = match &cli.toolbar {
        Some(path) => load_toolbar(path).map_err(io::Error::other)?,
        None => ToolbarCapture::default(),
    };

    let config = config.freeze();
    let source = select_source(config.menu_snapshot(), markup);
    let store = ViewStore::open(cli.state_file.clone());
    Ok(QuickMenu::new(
        config,
        source.as_ref(),
        &toolbar,
        store,
        KeyBindings::default(),
    ))
}
