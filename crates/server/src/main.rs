use std::error::Error;
use std::sync::Arc;

use clap::Parser;
use log::info;
use movie_reports::config::{
    DEFAULT_API_BASE_URL, DEFAULT_IMAGE_BASE_URL, DEFAULT_PORT, DEFAULT_PUBLIC_HOST,
};
use movie_reports::server::{self, AppState};
use movie_reports::{Overflow, PageSize, ReportBuilder, ServiceConfig, TmdbClient};
use poem::listener::TcpListener;
use poem::Server;

/// Serves popular-movie listings and movie details as PDF reports.
///
/// Every option can also be supplied through the environment variable shown in `--help`; a
/// `.env` file in the working directory is read before the arguments are parsed.
#[derive(Parser)]
#[command(author, version, about = "HTTP service rendering movie catalog PDF reports")]
struct Cli {
    /// API key for the movie catalog.
    #[arg(long, env = "TMDB_API_KEY", hide_env_values = true)]
    api_key: String,

    /// Base address of the catalog REST API.
    #[arg(long, env = "TMDB_BASE_URL", default_value = DEFAULT_API_BASE_URL)]
    api_base_url: String,

    /// Base address of the catalog image CDN.
    #[arg(long, env = "TMDB_IMAGE_BASE_URL", default_value = DEFAULT_IMAGE_BASE_URL)]
    image_base_url: String,

    /// Host name embedded in the links of the listing report.
    #[arg(long, env = "PUBLIC_HOST", default_value = DEFAULT_PUBLIC_HOST)]
    public_host: String,

    /// Port to listen on; also embedded in report links.
    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Address to bind the listener to.
    #[arg(long = "bind", env = "BIND_ADDR", default_value = "0.0.0.0")]
    bind_addr: String,

    /// Paper size of the reports: `letter`, `a4` or `WIDTHxHEIGHT` in millimetres.
    #[arg(long, env = "PAGE_SIZE", default_value = "letter")]
    page_size: PageSize,

    /// Continue long listings on additional pages instead of clipping them.
    #[arg(long, env = "PAGINATE_LISTING")]
    paginate: bool,
}

impl Cli {
    fn service_config(&self) -> ServiceConfig {
        ServiceConfig::new(self.api_key.clone())
            .with_api_base_url(self.api_base_url.clone())
            .with_image_base_url(self.image_base_url.clone())
            .with_public_host(self.public_host.clone())
            .with_port(self.port)
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    if let Err(err) = run(cli).await {
        eprintln!("Error: {}", err);
        print_error_sources(err.as_ref());
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = cli.service_config();
    let catalog = TmdbClient::new(&config)?;

    let overflow = if cli.paginate {
        Overflow::Paginate
    } else {
        Overflow::Clip
    };
    let renderer = ReportBuilder::new()
        .with_page_size(cli.page_size)
        .with_overflow(overflow)
        .build()?;

    let state = Arc::new(AppState::new(config, Arc::new(catalog), renderer));
    let address = format!("{}:{}", cli.bind_addr, cli.port);

    info!("Server running on port {}", cli.port);
    Server::new(TcpListener::bind(address))
        .run(server::routes(state))
        .await?;

    Ok(())
}

fn print_error_sources(mut error: &(dyn Error + 'static)) {
    while let Some(source) = error.source() {
        eprintln!("  caused by: {}", source);
        error = source;
    }
}
