//! Configuration constants.
//!
//! This module defines the constants used throughout the application, including
//! API endpoints, pagination limits, retry settings and CensEye defaults.

// API endpoints
/// Default Censys Platform API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.platform.censys.io";
/// Platform search page used for shareable pivot links (query goes in `q`)
pub const SEARCH_URL_BASE: &str = "https://platform.censys.io/search?q=";
/// User-Agent sent with every request
pub const USER_AGENT: &str = concat!("censys_cli/", env!("CARGO_PKG_VERSION"));

/// Environment variable holding the personal access token
pub const ENV_API_TOKEN: &str = "CENSYS_API_TOKEN";
/// Environment variable holding the default organization ID
pub const ENV_ORGANIZATION_ID: &str = "CENSYS_ORGANIZATION_ID";
/// Environment variable overriding the API base URL
pub const ENV_BASE_URL: &str = "CENSYS_BASE_URL";

// Network operation timeouts
/// Per-request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

// Retry strategy
/// Initial delay in milliseconds before first retry
pub const RETRY_INITIAL_DELAY_MS: u64 = 500;
/// Factor by which retry delay is multiplied on each attempt
pub const RETRY_FACTOR: u64 = 2;
/// Maximum delay between retries in seconds
pub const RETRY_MAX_DELAY_SECS: u64 = 15;
/// Maximum number of attempts per API call (initial attempt + 2 retries)
pub const RETRY_MAX_ATTEMPTS: usize = 3;

// Pagination
/// Maximum number of events the timeline endpoint returns per page.
/// A page shorter than this is the last one.
pub const HOST_TIMELINE_PAGE_SIZE: usize = 100;

/// Record fields that identify a web property without describing it.
/// A snapshot whose only record has nothing else set is treated as absent.
pub const WEB_PROPERTY_IDENTITY_FIELDS: &[&str] = &["hostname", "port"];

// CensEye defaults
/// Lower bound (inclusive) of the interesting count range
pub const DEFAULT_RARITY_MIN: u64 = 2;
/// Upper bound (inclusive) of the interesting count range
pub const DEFAULT_RARITY_MAX: u64 = 100;
/// Number of count conditions sent per value-counts request
pub const VALUE_COUNTS_BATCH_SIZE: usize = 50;
/// Host document field holding the repeated service objects
pub const SERVICES_FIELD: &str = "services";

/// Fields that are too noisy or too unique to pivot on.
/// Entries ending in `.` suppress every field under that prefix.
pub const DEFAULT_FIELD_FILTERS: &[&str] = &[
    "ip",
    "service_count",
    "location.coordinates.",
    "location.postal_code",
    "location.timezone",
    "whois.network.created",
    "whois.network.updated",
    "dns.reverse_dns.resolve_time",
    "services.scan_time",
    "services.banner_hex",
];

/// Object paths whose keys are values (maps keyed by data, not schema).
pub const DEFAULT_KEY_VALUE_PREFIXES: &[&str] = &["dns.forward_dns"];

/// Service field groups combined into multi-field pivots.
pub const DEFAULT_EXTRACTION_RULES: &[&[&str]] = &[
    &["port", "protocol"],
    &["protocol", "banner_hash_sha256"],
    &["cert.fingerprint_sha256"],
    &["http.response.html_title"],
    &["http.response.body_hash_sha256"],
    &["http.response.headers"],
    &["software.vendor", "software.product"],
    &["jarm.fingerprint"],
    &["ssh.server_host_key.fingerprint_sha256"],
];
