/// Provider type name, also the prefix of every resource and data source type.
pub const PROVIDER_TYPE_NAME: &str = "localfile";

/// Environment variable consulted when the provider config omits `base_dir`.
pub const BASE_DIR_ENV: &str = "LOCALFILE_BASE_DIR";

/// Mode for directories created on the way to a managed file.
pub const DIR_MODE: u32 = 0o755;

/// Mode for newly created files and for the entry stored inside an archive.
pub const FILE_MODE: u32 = 0o644;
