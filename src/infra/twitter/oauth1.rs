// OAuth 1.0a request signing (HMAC-SHA1) for the posting API.
//
// The JSON body of a v2 request is not part of the signature; only the oauth_*
// parameters and any query/form parameters are.

use base64::prelude::BASE64_STANDARD;
use base64::Engine;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use rand::distributions::Alphanumeric;
use rand::Rng;
use ring::hmac;

/// RFC 3986 unreserved characters stay as-is, everything else is encoded.
const OAUTH_ENCODE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

pub fn encode(value: &str) -> String {
    utf8_percent_encode(value, OAUTH_ENCODE).to_string()
}

/// The four secrets the posting API needs for user-context requests.
#[derive(Clone)]
pub struct OAuth1Credentials {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub access_token: String,
    pub access_token_secret: String,
}

impl std::fmt::Debug for OAuth1Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuth1Credentials")
            .field("consumer_key", &self.consumer_key)
            .field("access_token", &self.access_token)
            .finish_non_exhaustive()
    }
}

/// `METHOD&url&params`, with params sorted by encoded key then value.
pub fn signature_base_string(method: &str, url: &str, params: &[(&str, &str)]) -> String {
    let mut encoded: Vec<(String, String)> = params
        .iter()
        .map(|(k, v)| (encode(k), encode(v)))
        .collect();
    encoded.sort();

    let joined = encoded
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    format!(
        "{}&{}&{}",
        method.to_ascii_uppercase(),
        encode(url),
        encode(&joined)
    )
}

pub fn sign(base_string: &str, consumer_secret: &str, token_secret: &str) -> String {
    let signing_key = format!("{}&{}", encode(consumer_secret), encode(token_secret));
    let key = hmac::Key::new(hmac::HMAC_SHA1_FOR_LEGACY_USE_ONLY, signing_key.as_bytes());
    let tag = hmac::sign(&key, base_string.as_bytes());
    BASE64_STANDARD.encode(tag.as_ref())
}

fn nonce() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}

impl OAuth1Credentials {
    /// `Authorization` header value for a request, with a fresh nonce and
    /// the current time.
    pub fn authorization_header(
        &self,
        method: &str,
        url: &str,
        extra_params: &[(&str, &str)],
    ) -> String {
        let timestamp = chrono::Utc::now().timestamp().to_string();
        self.authorization_header_with(method, url, extra_params, &nonce(), &timestamp)
    }

    pub fn authorization_header_with(
        &self,
        method: &str,
        url: &str,
        extra_params: &[(&str, &str)],
        nonce: &str,
        timestamp: &str,
    ) -> String {
        let oauth_params = [
            ("oauth_consumer_key", self.consumer_key.as_str()),
            ("oauth_nonce", nonce),
            ("oauth_signature_method", "HMAC-SHA1"),
            ("oauth_timestamp", timestamp),
            ("oauth_token", self.access_token.as_str()),
            ("oauth_version", "1.0"),
        ];

        let mut all_params: Vec<(&str, &str)> = oauth_params.to_vec();
        all_params.extend_from_slice(extra_params);

        let base = signature_base_string(method, url, &all_params);
        let signature = sign(&base, &self.consumer_secret, &self.access_token_secret);

        let mut header_params: Vec<(&str, &str)> = oauth_params.to_vec();
        header_params.push(("oauth_signature", signature.as_str()));
        header_params.sort();

        let fields = header_params
            .iter()
            .map(|(k, v)| format!("{}=\"{}\"", encode(k), encode(v)))
            .collect::<Vec<_>>()
            .join(", ");
        format!("OAuth {}", fields)
    }
}
