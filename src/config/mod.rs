mod auth;
mod mailview;

pub use auth::AuthConfig;
pub use auth::CommandAuthConfig;
pub use auth::EnvAuthConfig;
pub use auth::StaticAuthConfig;
pub use mailview::Config;
