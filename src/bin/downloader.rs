use std::process::ExitCode;

use clap::Parser;
use miette::IntoDiagnostic;
use tracing_subscriber::EnvFilter;

use migration_downloader::app::App;
use migration_downloader::config::{ConfigLoader, ConfigOverrides};
use migration_downloader::coordination::{CoordinationStore, EtcdStore};
use migration_downloader::domain::LogLevel;
use migration_downloader::error::DownloaderError;
use migration_downloader::output::JsonOutput;
use migration_downloader::progress::TracingSink;
use migration_downloader::transport::HttpTransport;

#[derive(Parser)]
#[command(name = "downloader")]
#[command(about = "A downloader for migration data")]
#[command(version, author)]
struct Cli {
    /// Download folder for migration data
    #[arg(long, visible_alias = "df")]
    download_folder: Option<String>,

    /// JSON file with the same options; flags take precedence
    #[arg(long)]
    config: Option<String>,

    /// Download and extract migration data from box
    #[arg(long, visible_alias = "md")]
    migration_data: bool,

    /// Ontologies to download using the purl url
    #[arg(long, num_args = 1.., value_delimiter = ',')]
    obo: Vec<String>,

    /// Ontologies to download from bioportal (needs --api-key)
    #[arg(long, num_args = 1.., value_delimiter = ',')]
    bioportal: Vec<String>,

    /// Download ontologies from the dictybase github repo, optionally only the named files
    #[arg(long, visible_alias = "gh", num_args = 0.., value_delimiter = ',')]
    github: Option<Vec<String>>,

    /// Download dictybase gpad annotations
    #[arg(long)]
    gpad: bool,

    /// Bioportal api key
    #[arg(long, env = "BIOPORTAL_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Logging level
    #[arg(long, visible_alias = "ll", value_enum)]
    log_level: Option<LogLevel>,

    /// ip address of etcd instance
    #[arg(long, env = "ETCD_CLIENT_SERVICE_HOST")]
    etcd_host: Option<String>,

    /// port number of etcd instance
    #[arg(long, env = "ETCD_CLIENT_SERVICE_PORT")]
    etcd_port: Option<String>,

    /// Print a JSON summary of the run on stdout
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            download_folder: self.download_folder.clone(),
            migration_data: self.migration_data,
            obo: self.obo.clone(),
            bioportal: self.bioportal.clone(),
            github: self.github.clone(),
            gpad: self.gpad,
            api_key: self.api_key.clone(),
            log_level: self.log_level,
            etcd_host: self.etcd_host.clone(),
            etcd_port: self.etcd_port.clone(),
        }
    }
}

fn main() -> ExitCode {
    if let Err(report) = run() {
        eprintln!("{report:?}");
        if let Some(error) = report.downcast_ref::<DownloaderError>() {
            return ExitCode::from(map_exit_code(error));
        }
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn map_exit_code(error: &DownloaderError) -> u8 {
    match error.root() {
        DownloaderError::MissingCredential(_)
        | DownloaderError::InvalidOntologyName(_)
        | DownloaderError::InvalidConfig(_)
        | DownloaderError::ConfigRead(_)
        | DownloaderError::ConfigParse(_) => 2,
        DownloaderError::Transport { .. } | DownloaderError::HttpStatus { .. } => 3,
        DownloaderError::CoordinationHttp(_) | DownloaderError::CoordinationStatus { .. } => 4,
        _ => 1,
    }
}

fn run() -> miette::Result<()> {
    let cli = Cli::parse();
    let config = ConfigLoader::resolve(cli.config.as_deref(), cli.overrides())?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.filter_directive()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if !config.has_sources() {
        tracing::warn!("no sources selected, only preparing the download folder");
    }

    let store = config
        .coordination
        .as_ref()
        .map(EtcdStore::new)
        .transpose()?;

    let app = App::new(HttpTransport::new()?);
    let summary = app.run(
        &config,
        store.as_ref().map(|store| store as &dyn CoordinationStore),
        &TracingSink,
    )?;

    if cli.json {
        JsonOutput::print_summary(&summary).into_diagnostic()?;
    }
    Ok(())
}
