use std::net::Ipv4Addr;
use std::path::PathBuf;
use argh::FromArgs;
use domain_name_query_types::QType;
use thiserror::Error;

#[derive(Debug, FromArgs)]
#[argh(description = "send a DNS query over UDP and print the records in the reply")]
pub struct CliArgs {
    #[argh(
        option,
        short = 't',
        description = "seconds to wait for a reply before retransmitting, default: 5"
    )]
    pub timeout: Option<u64>,

    #[argh(
        option,
        short = 'r',
        description = "how many times to retransmit an unanswered query, default: 3"
    )]
    pub max_retries: Option<u32>,

    #[argh(option, short = 'p', description = "UDP port of the DNS server, default: 53")]
    pub port: Option<u16>,

    #[argh(switch, description = "send an MX (mail server) query")]
    pub mx: bool,

    #[argh(switch, description = "send an NS (name server) query")]
    pub ns: bool,

    #[argh(
        option,
        description = "config file path, default: './dns_client.toml' if it exists"
    )]
    pub config: Option<PathBuf>,

    #[argh(positional, description = "IPv4 address of the DNS server, as @a.b.c.d")]
    pub server: String,

    #[argh(positional, description = "domain name to query for")]
    pub name: String,
}

#[derive(Debug, Error, Eq, PartialEq)]
pub enum UsageError {
    #[error("--mx and --ns cannot be used together")]
    ConflictingTypes,
    #[error("'{0}' is not an IPv4 address")]
    BadServer(String),
    #[error("the timeout must be a positive number of seconds")]
    ZeroTimeout,
}

impl CliArgs {
    pub fn q_type(&self) -> Result<QType, UsageError> {
        match (self.mx, self.ns) {
            (true, true) => Err(UsageError::ConflictingTypes),
            (true, false) => Ok(QType::Mx),
            (false, true) => Ok(QType::Ns),
            (false, false) => Ok(QType::A),
        }
    }

    pub fn server_ip(&self) -> Result<Ipv4Addr, UsageError> {
        let server = self.server.strip_prefix('@').unwrap_or(&self.server);
        server
            .parse::<Ipv4Addr>()
            .map_err(|_| UsageError::BadServer(self.server.clone()))
    }
}
