mod paths;
mod table_file;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use clap::Subcommand;
use rostergrid_lib::error::ConfigError;
use rostergrid_lib::error::FetchError;
use rostergrid_lib::export::export_url;
use rostergrid_lib::grid::FlagDecorator;
use rostergrid_lib::grid::RenderedRow;
use rostergrid_lib::grid::RowDecorator;
use rostergrid_lib::model::sequential_columns;
use rostergrid_lib::protocol::PageRequest;
use rostergrid_lib::protocol::SortOrder;
use rostergrid_lib::remote::PageSource;
use rostergrid_lib::remote::RemoteConfig;
use rostergrid_lib::remote::RemotePageSource;
use rostergrid_lib::server::PagingServer;
use simplelog::LevelFilter;
use tokio_util::sync::CancellationToken;
use url::Url;

use table_file::TableFile;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid table file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

#[derive(Parser, Debug)]
#[command(name = "rostergrid", version, about = "Accent-insensitive record grids")]
struct Cli {
    #[arg(long, global = true, env = "ROSTERGRID_LOG", default_value = "info")]
    log_level: LevelFilter,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch one page from a paging endpoint
    Fetch {
        #[arg(env = "ROSTERGRID_ENDPOINT")]
        endpoint: String,
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long, default_value_t = 0)]
        start: usize,
        /// Rows per page; -1 for all
        #[arg(long, default_value_t = 10, allow_negative_numbers = true)]
        length: i64,
        #[arg(long, default_value_t = 0)]
        order: usize,
        #[arg(long, default_value_t = false)]
        desc: bool,
        /// Cell that marks a row; it is not printed
        #[arg(long)]
        flag_column: Option<usize>,
        #[arg(long, default_value_t = 30)]
        timeout_secs: u64,
    },
    /// Print the export link for a filter
    ExportUrl {
        base: String,
        #[arg(long, default_value = "")]
        filter: String,
        /// Resolve the link against this origin
        #[arg(long, env = "ROSTERGRID_ORIGIN")]
        origin: Option<Url>,
        /// Open the link in the browser
        #[arg(long, default_value_t = false)]
        open: bool,
    },
    /// Serve a JSON table file over the paging protocol
    Serve {
        file: PathBuf,
        #[arg(long, default_value = "127.0.0.1:8000")]
        addr: SocketAddr,
        /// Only answer on this path
        #[arg(long)]
        path: Option<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Some(path) = paths::init_logging(cli.log_level) {
        log::debug!("logging to {}", path.display());
    }

    match run(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Fetch {
            endpoint,
            search,
            start,
            length,
            order,
            desc,
            flag_column,
            timeout_secs,
        } => {
            let source = RemotePageSource::builder()
                .endpoint(endpoint)
                .config(RemoteConfig::default().with_timeout(Duration::from_secs(timeout_secs)))
                .build()?;
            let order = if desc {
                SortOrder::desc(order)
            } else {
                SortOrder::asc(order)
            };
            let request = PageRequest::new(1)
                .start(start)
                .length(usize::try_from(length).ok())
                .search(search)
                .order(order);
            fetch(&source, &request, flag_column).await
        }
        Commands::ExportUrl {
            base,
            filter,
            origin,
            open,
        } => {
            let link = export_url(&base, &filter);
            let link = match origin {
                Some(origin) => origin.join(&link)?.to_string(),
                None => link,
            };
            println!("{}", link);
            if open {
                open::that(&link)?;
            }
            Ok(())
        }
        Commands::Serve { file, addr, path } => {
            let service = TableFile::load(&file)?.into_service()?;
            let rows = service.table().len();
            let mut server = PagingServer::bind(addr, service).await?;
            if let Some(path) = path {
                server = server.with_path(path);
            }
            println!("Serving {} rows on http://{}", rows, server.local_addr()?);

            let cancel = CancellationToken::new();
            let stop = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    stop.cancel();
                }
            });
            server.serve(cancel).await?;
            Ok(())
        }
    }
}

async fn fetch(
    source: &RemotePageSource,
    request: &PageRequest,
    flag_column: Option<usize>,
) -> Result<(), CliError> {
    let page = source.fetch(request).await?;
    println!(
        "{} of {} rows ({} total)",
        page.len(),
        page.records_filtered,
        page.records_total
    );

    let decorator = flag_column.map(FlagDecorator::new);
    for (i, record) in page.data.iter().enumerate() {
        let mut columns = sequential_columns(record.len());
        if let Some(flag) = flag_column.and_then(|c| columns.get_mut(c)) {
            *flag = flag.hidden();
        }
        let mut row = RenderedRow::render(i, record, &columns);
        if let Some(decorator) = &decorator {
            decorator.decorate(&mut row, record);
        }
        let marker = if row.classes().next().is_some() { "!" } else { " " };
        println!("{} {}", marker, row.cells.join("\t"));
    }
    Ok(())
}
