//! Constants for modkit

/// Build mode override (`build` | `publish` | `test`)
pub const ENV_MODE: &str = "MODKIT_MODE";

/// Skip the type-check pass outside publish mode
pub const ENV_SKIP_TYPECHECK: &str = "MODKIT_SKIP_TYPECHECK";

/// Opt into sourcemaps for publish builds
pub const ENV_SOURCEMAP: &str = "MODKIT_SOURCEMAP";

/// Maximum number of compiler diagnostics recorded per build
pub const ENV_DIAGNOSTIC_LIMIT: &str = "MODKIT_DIAGNOSTIC_LIMIT";

/// Minimum severity returned to the caller
pub const ENV_LOG_LEVEL: &str = "MODKIT_LOG_LEVEL";

/// Discard cache-diff diagnostics (persistence still happens)
pub const ENV_QUIET_CACHE: &str = "MODKIT_QUIET_CACHE";

pub const DEFAULT_DIAGNOSTIC_LIMIT: usize = 50;
pub const DEFAULT_WATCH_DIAGNOSTIC_LIMIT: usize = 20;

/// Package descriptor file name and the key of its module-configuration block
pub const PACKAGE_FILE: &str = "package.json";
pub const CONFIG_BLOCK_KEY: &str = "modkit";

pub const TSCONFIG_FILE: &str = "tsconfig.json";

pub const SOURCE_DIR: &str = "src";
pub const BUILD_DIR: &str = "dist";
pub const TESTS_DIR: &str = "tests";

/// Workspace-local state directory and the files persisted in it
pub const STATE_DIR: &str = ".modkit";
pub const OUTPUT_SIZES_FILE: &str = "output-sizes.json";
pub const MANIFEST_DIGEST_FILE: &str = "manifest-digest.json";
pub const LOGS_DIR: &str = "logs";

/// Extensions recognized for build entry points
pub const ENTRY_EXTENSIONS: &[&str] = &["ts", "tsx", "js", "mjs"];

/// Directories whose immediate children may hold an `index.*` entry
pub const ENTRY_GROUP_DIRS: &[&str] = &["functions", "jobs"];

/// Module-definition sources, relative to the source root, first match wins
pub const DEFINITION_SOURCES: &[&str] = &["module.ts", "module.mts", "module.js", "module.mjs"];

/// Compiled module-definition candidates, relative to the build root, first match wins
pub const DEFINITION_OUTPUTS: &[&str] = &["module.js", "module.mjs", "module.json"];

/// Output file of the single-file definition compile, relative to the build root
pub const DEFINITION_OUTFILE: &str = "module.js";

pub const MANIFEST_CONTRACT_VERSION: &str = "1.0";
pub const MANIFEST_KIND: &str = "backend";
pub const FALLBACK_VERSION: &str = "0.0.0";
pub const FALLBACK_NAME_PREFIX: &str = "backend-module-";

/// How many names a summary diagnostic lists before `+N more`
pub const SUMMARY_NAME_LIMIT: usize = 10;
pub const CHANGED_OUTPUT_NAME_LIMIT: usize = 5;
pub const DIGEST_EXAMPLE_LIMIT: usize = 3;
