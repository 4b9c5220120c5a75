use crate::Result;
use testcontainers::core::{IntoContainerPort, WaitFor};
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, GenericImage};
use typed_builder::TypedBuilder;

const MONGO_PORT: u16 = 27017;

#[derive(Debug, Clone, TypedBuilder)]
pub struct MongoConfig {
    #[builder(default = "linker".to_string())]
    database: String,
    #[builder(default = "7.0".to_string())]
    tag: String,
}

/// Test fixture for a disposable single-node MongoDB server without auth.
pub struct MongoServer {
    container: ContainerAsync<GenericImage>,
    config: MongoConfig,
}

impl MongoServer {
    pub async fn new(config: MongoConfig) -> Result<Self> {
        let container = GenericImage::new("mongo", config.tag.as_str())
            .with_exposed_port(MONGO_PORT.tcp())
            .with_wait_for(WaitFor::message_on_stdout("Waiting for connections"))
            .start()
            .await?;

        Ok(Self { container, config })
    }

    pub async fn host(&self) -> Result<String> {
        Ok(self.container.get_host().await?.to_string())
    }

    pub async fn port(&self) -> Result<u16> {
        Ok(self.container.get_host_port_ipv4(MONGO_PORT).await?)
    }

    /// Connection string, e.g. `mongodb://127.0.0.1:49153`.
    pub async fn uri(&self) -> Result<String> {
        Ok(format!("mongodb://{}:{}", self.host().await?, self.port().await?))
    }

    pub fn database(&self) -> &str {
        &self.config.database
    }
}
