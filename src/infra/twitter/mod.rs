// Social platform client: v2 posting endpoint with OAuth 1.0a user-context signing.

pub mod oauth1;
pub mod twitter_client;

pub use oauth1::OAuth1Credentials;
pub use twitter_client::TwitterApiClient;
