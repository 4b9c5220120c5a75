use clap::Parser;
use linker_service::ServiceArgs;
use linker_telemetry::Environment;
use std::net::SocketAddr;

pub const LISTEN_ADDR_ENV: &str = "LINKER_GRPC_LISTEN_ADDR";
pub const ENVIRONMENT_ENV: &str = "LINKER_ENV";

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:50051";

#[derive(Debug, Parser)]
#[command(name = "linker-grpc-server")]
pub struct CLI {
    #[arg(long, env = LISTEN_ADDR_ENV, default_value = DEFAULT_LISTEN_ADDR)]
    pub listen_addr: SocketAddr,

    /// One of local, dev, prod or test; selects log format and level.
    #[arg(long = "env", env = ENVIRONMENT_ENV, default_value_t = Environment::Local)]
    pub environment: Environment,

    #[command(flatten)]
    pub service: ServiceArgs,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_listen_addr_and_environment() {
        let cli = CLI::try_parse_from(["linker-grpc", "--listen-addr", "0.0.0.0:9000", "--env", "prod"])
            .unwrap();

        assert_eq!(cli.listen_addr.port(), 9000);
        assert_eq!(cli.environment, Environment::Prod);
    }

    #[test]
    fn rejects_unknown_environment() {
        assert!(CLI::try_parse_from(["linker-grpc", "--env", "staging"]).is_err());
    }
}
