//! Fixed values of the Comodo engine contract and default install locations.

/// Version of the parser/report contract. Not the AV vendor's engine version.
pub const ENGINE_CONTRACT_VERSION: &str = "1.1";

/// Substring on the detection line that marks a positive hit.
pub const DETECTION_MARKER: &str = "Found Virus";

/// Token separating the detection prefix from the threat name.
pub const LABEL_SEPARATOR: &str = "is";

/// Zero-based index of the line carrying the single-file result.
pub const DETECTION_LINE_INDEX: usize = 1;

pub const DEFAULT_SCANNER_PATH: &str = "/opt/COMODO/cmdscan";
pub const DEFAULT_SIGNATURE_URL: &str =
    "http://download.comodo.com/av/updates58/sigs/bases/bases.cav";
pub const DEFAULT_BASES_PATH: &str = "/opt/COMODO/scanners/bases.cav";
pub const DEFAULT_MARKER_PATH: &str = "/opt/malice/UPDATED";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Date layout written to the freshness marker.
pub const MARKER_DATE_FORMAT: &str = "%Y%m%d";

/// Fallback freshness value when no build time was injected at compile time.
pub const UNKNOWN_BUILD_TIME: &str = "unknown";

pub const ENV_ENDPOINT: &str = "MALICE_ENDPOINT";
pub const ENV_PROXY: &str = "MALICE_PROXY";
pub const ENV_SCANNER_PATH: &str = "COMODO_SCANNER_PATH";
pub const ENV_SIGNATURE_URL: &str = "COMODO_SIGNATURE_URL";
pub const ENV_BASES_PATH: &str = "COMODO_BASES_PATH";
pub const ENV_MARKER_PATH: &str = "MALICE_UPDATED_PATH";
pub const ENV_HTTP_TIMEOUT: &str = "COMODO_HTTP_TIMEOUT_SECS";
pub const ENV_SCAN_TIMEOUT: &str = "COMODO_SCAN_TIMEOUT_SECS";
