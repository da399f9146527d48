use std::net::{Ipv4Addr, SocketAddr};
use std::process::ExitCode;
use std::time::Duration;

use domain_name_query_types::NameQuery;
use domain_name_resolver::{Resolver, ResolverConfig};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

mod cli_args;
mod report;

use cli_args::{CliArgs, UsageError};

// 128 + SIGINT
const INTERRUPTED: u8 = 130;

#[derive(Debug, Error)]
enum StartupError {
    #[error("Incorrect input syntax: {0}")]
    Usage(#[from] UsageError),
    #[error("Incorrect configuration: {0}")]
    Config(#[from] config::ConfigError),
}

struct Invocation {
    server_ip: Ipv4Addr,
    name_query: NameQuery,
    resolver_config: ResolverConfig,
}

fn prepare(args: CliArgs) -> Result<Invocation, StartupError> {
    let q_type = args.q_type()?;
    let server_ip = args.server_ip()?;
    if args.timeout == Some(0) {
        return Err(UsageError::ZeroTimeout.into());
    }

    let defaults = configuration::load(args.config)?.resolver;

    let resolver_config = ResolverConfig {
        server_addr: SocketAddr::from((server_ip, args.port.unwrap_or(defaults.port))),
        timeout: Duration::from_secs(args.timeout.unwrap_or(defaults.timeout_seconds)),
        max_retries: args.max_retries.unwrap_or(defaults.max_retries),
    };

    Ok(Invocation {
        server_ip,
        name_query: NameQuery::new(&args.name, q_type),
        resolver_config,
    })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    init_tracing();

    let args: CliArgs = argh::from_env();
    let invocation = match prepare(args) {
        Ok(invocation) => invocation,
        Err(e) => {
            println!("{}", report::render_error(&e));
            return ExitCode::FAILURE;
        }
    };

    print!(
        "{}",
        report::request_summary(&invocation.name_query, invocation.server_ip)
    );

    let resolver = Resolver::new(invocation.resolver_config);

    // Dropping the query future on Ctrl-C closes its socket.
    tokio::select! {
        result = resolver.resolve(&invocation.name_query) => match result {
            Ok(resolution) => {
                print!("{}", report::render_resolution(&resolution));
                ExitCode::SUCCESS
            }
            Err(e) => {
                tracing::debug!("query failed after {} retries: {:?}", e.retries(), e);
                println!("{}", report::render_error(&e));
                ExitCode::FAILURE
            }
        },
        Ok(()) = tokio::signal::ctrl_c() => {
            println!("{}", report::render_error(&"interrupted"));
            ExitCode::from(INTERRUPTED)
        }
    }
}
