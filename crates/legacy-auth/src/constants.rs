//! Well-known names shared across the migration flow
//!
//! The metadata key names identify the app credentials in the deployment's
//! manifest file. They are not secrets — the values they resolve to are.

/// Manifest metadata key for the consumer key issued to the app
pub const VENDOR_CONSUMER_KEY_KEY: &str = "vendor.ConsumerKey";

/// Manifest metadata key for the consumer secret issued to the app
pub const VENDOR_CONSUMER_SECRET_KEY: &str = "vendor.ConsumerSecret";

/// Manifest metadata key for the vendor API key (40 lowercase hex chars)
pub const VENDOR_API_KEY_KEY: &str = "vendor.ApiKey";

/// Fixed first segment of every unsigned assertion: standard base64 of
/// `{"alg":"none"}`. The trailing signature segment is deliberately empty —
/// the exchange endpoint verifies the embedded legacy credentials itself
/// rather than a signature.
pub const UNSIGNED_ASSERTION_HEADER: &str = "eyJhbGciOiJub25lIn0=";
