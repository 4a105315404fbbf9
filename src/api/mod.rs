mod auth;
mod fetcher;
mod http;
#[cfg(test)]
pub mod mock_transport;
mod mutation;
mod sender;
mod transport;

pub use auth::Auth;
pub use auth::StaticToken;
pub use fetcher::fetch;
pub use http::HttpTransport;
pub use mutation::Method;
pub use mutation::MutationBody;
pub use mutation::MESSAGES_PATH;
pub use sender::send_message;
pub use transport::Transport;
