pub const APP_NAME: &str = "myks";

/// Name of the config file searched for up the directory tree.
pub const CONFIG_FILENAME: &str = ".myks.yaml";

/// Prefix of environment variables overriding config keys.
pub const ENV_PREFIX: &str = "MYKS";

/// Positional argument value meaning "every environment" or "every application".
pub const ALL_TOKEN: &str = "ALL";

/// Root directory of the environment tree, also the implicit key used when
/// all environments are requested together with an application list.
pub const ENVS_DIR: &str = "envs";

pub const APPS_DIR: &str = "_apps";
pub const PROTOTYPES_DIR: &str = "prototypes";
pub const RENDERED_DIR: &str = "rendered";

/// Marker file identifying a directory under `envs/` as an environment.
pub const ENV_DATA_FILE: &str = "env-data.ytt.yaml";

/// File name of the rendered output of one application.
pub const MANIFEST_FILE: &str = "manifest.yaml";
