// Notion MCP Main Entry Point
// Serves Notion workspace tools to AI agents over stdio (default) or SSE
use anyhow::Result;
use notion_mcp::{
    cli::{self, Command},
    config,
    startup::Startup,
};
use tracing::{error, info};
use tracing_subscriber::{fmt::time::ChronoUtc, EnvFilter};

fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // Logs always go to stderr; stdout belongs to the stdio transport
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(ChronoUtc::rfc_3339())
        .with_writer(std::io::stderr);

    if std::env::var("LOG_FORMAT").map(|f| f.eq_ignore_ascii_case("json")).unwrap_or(false) {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[actix_web::main]
async fn main() -> Result<()> {
    let overrides = match cli::parse_args(std::env::args().skip(1)) {
        Ok(Command::Serve(overrides)) => overrides,
        Ok(Command::Help) => {
            eprintln!("{}", cli::usage());
            return Ok(());
        }
        Ok(Command::Version) => {
            println!("notion-mcp {}", cli::VERSION);
            return Ok(());
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("Run 'notion-mcp --help' for usage");
            std::process::exit(2);
        }
    };

    dotenv::dotenv().ok();
    init_logging(overrides.debug || config::parse_flag(std::env::var("MCP_DEBUG").ok()));

    let startup = match Startup::from_env(&overrides) {
        Ok(startup) => startup,
        Err(e) => {
            error!("❌ {}", e);
            std::process::exit(1);
        }
    };

    info!("Starting Notion MCP server v{}", cli::VERSION);
    startup.run().await?;

    Ok(())
}
