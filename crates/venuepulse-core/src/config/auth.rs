//! Token validation configuration.
//!
//! Token issuance lives in an external identity service; this section only
//! configures validation of tokens presented to the API.

use serde::{Deserialize, Serialize};

/// JWT validation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HMAC secret shared with the identity service.
    pub jwt_secret: String,
    /// Expected token issuer.
    #[serde(default = "default_issuer")]
    pub issuer: String,
    /// Leeway in seconds when validating expiry.
    #[serde(default = "default_leeway")]
    pub leeway_seconds: u64,
}

fn default_issuer() -> String {
    "venuepulse".to_string()
}

fn default_leeway() -> u64 {
    30
}
