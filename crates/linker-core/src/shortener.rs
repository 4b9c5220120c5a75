use crate::error::ShortenerError;
use crate::model::Alias;
use async_trait::async_trait;

type Result<T> = std::result::Result<T, ShortenerError>;

/// An external URL-shortening service.
///
/// Both calls are best-effort from the linker's point of view: failures are
/// logged by the caller and never change the outcome of a link operation.
#[async_trait]
pub trait UrlShortener: Send + Sync + 'static {
    /// Registers `url` under `desired_alias` and returns the short URL.
    async fn shorten(&self, url: &str, desired_alias: &Alias) -> Result<String>;

    /// Releases an alias previously registered with [`shorten`](Self::shorten).
    async fn release(&self, alias: &str) -> Result<()>;
}
