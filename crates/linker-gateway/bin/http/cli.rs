use clap::Parser;
use linker_service::ServiceArgs;
use linker_telemetry::Environment;
use std::net::SocketAddr;

pub const LISTEN_ADDR_ENV: &str = "LINKER_HTTP_LISTEN_ADDR";
pub const ENVIRONMENT_ENV: &str = "LINKER_ENV";

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8080";

#[derive(Debug, Parser)]
#[command(name = "linker-gateway")]
pub struct CLI {
    #[arg(long, env = LISTEN_ADDR_ENV, default_value = DEFAULT_LISTEN_ADDR)]
    pub listen_addr: SocketAddr,

    #[arg(long = "env", env = ENVIRONMENT_ENV, default_value_t = Environment::Local)]
    pub environment: Environment,

    #[command(flatten)]
    pub service: ServiceArgs,
}
