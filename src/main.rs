use fpick::cli::{AppConfig, Args};
use fpick::config::UserConfig;
use fpick::launcher::{self, ProcessLauncher};
use fpick::logging;
use fpick::metadata::SystemMetadata;
use fpick::session::Session;
use fpick::tui::{Console, RawTerminal};
use log::{debug, info, warn};
use std::io;
use std::process;

fn main() {
    // Parse command line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }

    let user_config = UserConfig::load().unwrap_or_else(|e| {
        eprintln!("Warning: Failed to load user config: {}", e);
        UserConfig::default()
    });

    let config = AppConfig::resolve(args, &user_config);
    logging::init(config.verbosity, config.log_utc);

    // Ctrl-C outside a prompt arrives as SIGINT; a running pager handles its own
    if let Err(e) = ctrlc::set_handler(|| {
        if !launcher::child_running() {
            println!("\nexit");
            process::exit(0);
        }
    }) {
        warn!("Could not install interrupt handler: {}", e);
    }

    if let Err(e) = run(&config) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(config: &AppConfig) -> fpick::Result<()> {
    if config.interactive {
        info!("*** Interactive mode ***");
    }
    debug!("log_level == {}", logging::level_for_verbosity(config.verbosity));
    debug!("rootpath == '{}'", config.directory.display());
    debug!("regex == {}", config.pattern);
    debug!("imgviewer == {:?}", config.image_viewer.as_ref().map(|c| c.to_string()));
    debug!("vidviewer == {:?}", config.video_viewer.as_ref().map(|c| c.to_string()));
    debug!("pager == {:?}", config.pager.as_ref().map(|c| c.to_string()));

    let metadata = SystemMetadata::default();
    let console = Console::new(RawTerminal::new(), io::stdout());
    Session::new(console, config, &metadata, &ProcessLauncher).run_and_report()?;

    Ok(())
}
