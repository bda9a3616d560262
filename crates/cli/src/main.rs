use anyhow::{Context as AnyhowContext, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use crumbtrail_protocol::{parse_pathname, serialize_json, serialize_json_pretty, BreadcrumbItem};
use crumbtrail_resolver::{trail_text, BreadcrumbResolver, ResolverConfig, SegmentClassifier};
use std::io;
use std::time::Duration;

fn print_stdout(text: &str) -> Result<()> {
    use std::io::Write;

    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

#[derive(Parser)]
#[command(name = "crumbtrail")]
#[command(about = "Resolve breadcrumb trails against the flight manager API", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors (stdout is reserved for output)
    #[arg(long, global = true)]
    quiet: bool,

    /// Lookup API base URL (overrides CRUMBTRAIL_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Per-request timeout in milliseconds (overrides CRUMBTRAIL_HTTP_TIMEOUT_MS)
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show how each segment of a pathname is classified
    Classify(ClassifyArgs),

    /// Resolve a pathname and print its trail
    Render(RenderArgs),

    /// Navigate through several pathnames on one resolver, printing every update
    Watch(WatchArgs),
}

#[derive(Args)]
struct ClassifyArgs {
    /// Pathname such as /payloads/<id>/flights/<id>
    pathname: String,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

#[derive(Args)]
struct RenderArgs {
    pathname: String,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Print fallback labels immediately instead of waiting for lookups
    #[arg(long)]
    no_resolve: bool,
}

#[derive(Args)]
struct WatchArgs {
    #[arg(required = true)]
    pathnames: Vec<String>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn resolver_config(cli: &Cli) -> Result<ResolverConfig> {
    let mut cfg = ResolverConfig::from_env().context("Invalid resolver environment")?;
    if let Some(url) = &cli.api_url {
        cfg = cfg.with_api_base_url(url);
    }
    if let Some(ms) = cli.timeout_ms {
        cfg = cfg.with_request_timeout(Duration::from_millis(ms));
    }
    Ok(cfg)
}

fn start_resolver(cli: &Cli) -> Result<BreadcrumbResolver> {
    let cfg = resolver_config(cli)?;
    log::debug!("Using lookup API at {}", cfg.api_base_url);
    BreadcrumbResolver::from_config(&cfg).context("Failed to start resolver")
}

fn print_trail(items: &[BreadcrumbItem], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_stdout(&serialize_json(&items)?),
        OutputFormat::Text if items.is_empty() => Ok(()),
        OutputFormat::Text => print_stdout(&trail_text(items)),
    }
}

fn run_classify(args: &ClassifyArgs) -> Result<()> {
    let segments = SegmentClassifier::classify(&parse_pathname(&args.pathname));
    let json = if args.pretty {
        serialize_json_pretty(&segments)?
    } else {
        serialize_json(&segments)?
    };
    print_stdout(&json)
}

async fn run_render(resolver: &BreadcrumbResolver, args: &RenderArgs) -> Result<()> {
    let path = parse_pathname(&args.pathname);
    if !args.no_resolve {
        let dispatch = resolver.navigate(&path);
        log::debug!("{}: {} lookup(s) dispatched", args.pathname, dispatch.len());
        resolver.wait_idle().await;
    }
    print_trail(&resolver.render(&path), args.format)
}

async fn run_watch(resolver: &BreadcrumbResolver, args: &WatchArgs) -> Result<()> {
    let mut status = resolver.subscribe();
    for pathname in &args.pathnames {
        let path = parse_pathname(pathname);
        let dispatch = resolver.navigate(&path);
        log::info!("{pathname}: {} lookup(s) dispatched", dispatch.len());

        let mut last_revision = status.borrow_and_update().revision;
        print_trail(&resolver.render(&path), args.format)?;

        while status.borrow().in_flight > 0 {
            status
                .changed()
                .await
                .context("Resolver status channel closed")?;
            let current = *status.borrow_and_update();
            if current.revision != last_revision {
                last_revision = current.revision;
                print_trail(&resolver.render(&path), args.format)?;
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    match &cli.command {
        Commands::Classify(args) => run_classify(args),
        Commands::Render(args) => run_render(&start_resolver(&cli)?, args).await,
        Commands::Watch(args) => run_watch(&start_resolver(&cli)?, args).await,
    }
}
