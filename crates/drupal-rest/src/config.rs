//! Client configuration.

use drupal_rest_resource::ResourceConfig;
use drupal_rest_session::SessionConfig;

use crate::DrupalError;

/// API endpoint used when nothing else is configured.
pub const DEFAULT_ENDPOINT: &str = "http://localhost/drupal7/api/v1";

/// Public directory that `field_image` file names resolve against.
pub const DEFAULT_IMAGE_ROOT: &str =
    "http://localhost/drupal7/sites/default/files/field/image/";

/// Environment variable overriding [`ClientConfig::endpoint`].
pub const ENV_ENDPOINT: &str = "DRUPAL_REST_ENDPOINT";
/// Environment variable overriding [`ClientConfig::image_root`].
pub const ENV_IMAGE_ROOT: &str = "DRUPAL_IMAGE_ROOT";
/// Environment variable overriding [`ClientConfig::page_size`].
pub const ENV_PAGE_SIZE: &str = "DRUPAL_PAGE_SIZE";

/// Everything the client needs to reach a site.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Services endpoint every request path is relative to.
    pub endpoint: String,

    /// Base URL for node image files.
    pub image_root: String,

    /// Items per node listing page.
    pub page_size: u32,

    /// Session behavior (authentication predicate).
    pub session: SessionConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            image_root: DEFAULT_IMAGE_ROOT.to_string(),
            page_size: ResourceConfig::default().page_size,
            session: SessionConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Builds the endpoint from a site URL and the services API path,
    /// e.g. `("http://localhost/drupal7", "api/v1")`.
    pub fn from_parts(site: &str, api_path: &str) -> Self {
        let endpoint = format!(
            "{}/{}",
            site.trim_end_matches('/'),
            api_path.trim_matches('/')
        );
        Self {
            endpoint,
            ..Self::default()
        }
    }

    /// Defaults overridden by the `DRUPAL_*` environment variables.
    pub fn from_env() -> Result<Self, DrupalError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, DrupalError> {
        let mut config = Self::default();
        if let Some(endpoint) = lookup(ENV_ENDPOINT) {
            config.endpoint = endpoint;
        }
        if let Some(root) = lookup(ENV_IMAGE_ROOT) {
            config.image_root = root;
        }
        if let Some(size) = lookup(ENV_PAGE_SIZE) {
            config.page_size = size.trim().parse().map_err(|_| {
                DrupalError::Config(format!(
                    "{ENV_PAGE_SIZE} must be a positive integer, got {size:?}"
                ))
            })?;
        }
        config.validate()?;
        Ok(config)
    }

    pub(crate) fn validate(&self) -> Result<(), DrupalError> {
        if self.page_size == 0 {
            return Err(DrupalError::Config("page size must be at least 1".into()));
        }
        Ok(())
    }

    pub(crate) fn resource_config(&self) -> ResourceConfig {
        ResourceConfig {
            page_size: self.page_size,
        }
    }

    /// Resolves an image file name against `image_root`.
    pub fn image_url(&self, filename: &str) -> String {
        if self.image_root.ends_with('/') {
            format!("{}{filename}", self.image_root)
        } else {
            format!("{}/{filename}", self.image_root)
        }
    }
}
