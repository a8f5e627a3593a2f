//! Starts an embedded PostgreSQL cluster for the Diesel adapter suites.
//!
//! `pg-embed-setup-unpriv` installs binaries and data under `/var/tmp` unless
//! `PG_RUNTIME_DIR` and `PG_DATA_DIR` say otherwise. When either is unset the
//! bootstrap points both at a fresh directory below the cargo target dir, so
//! sandboxed runs never write outside the workspace.

use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};
use std::time::Duration;

use pg_embedded_setup_unpriv::TestCluster;
use uuid::Uuid;

static BOOTSTRAP_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

const BOOTSTRAP_ATTEMPTS: u32 = 4;
const BACKOFF_BASE: Duration = Duration::from_millis(500);

const TRANSIENT_MARKERS: [&str; 7] = [
    "error decoding response body",
    "connection reset",
    "connection refused",
    "timed out",
    "timeout",
    "dns error",
    "temporarily unavailable",
];

fn scratch_root() -> PathBuf {
    std::env::var_os("CARGO_TARGET_DIR").map_or_else(
        || {
            PathBuf::from(env!("CARGO_MANIFEST_DIR"))
                .join("..")
                .join("target")
                .join("pg-embed")
        },
        |dir| PathBuf::from(dir).join("pg-embed"),
    )
}

fn scratch_dirs() -> std::io::Result<(String, String)> {
    let base = scratch_root().join(format!("blog-{}-{}", std::process::id(), Uuid::new_v4()));
    let install = base.join("install");
    let data = base.join("data");
    std::fs::create_dir_all(&install)?;
    std::fs::create_dir_all(&data)?;
    Ok((
        install.to_string_lossy().into_owned(),
        data.to_string_lossy().into_owned(),
    ))
}

fn is_transient(message: &str) -> bool {
    let lowered = message.to_lowercase();
    TRANSIENT_MARKERS
        .iter()
        .any(|marker| lowered.contains(marker))
}

/// Start a cluster, retrying binary downloads that fail transiently.
pub fn test_cluster() -> Result<TestCluster, String> {
    let _serialised = BOOTSTRAP_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());

    let missing_dirs =
        std::env::var_os("PG_RUNTIME_DIR").is_none() || std::env::var_os("PG_DATA_DIR").is_none();
    let _env = if missing_dirs {
        let (install, data) = scratch_dirs().map_err(|err| err.to_string())?;
        Some(env_lock::lock_env([
            ("PG_RUNTIME_DIR", Some(install)),
            ("PG_DATA_DIR", Some(data)),
        ]))
    } else {
        None
    };

    let mut last_error = String::new();
    for attempt in 0..BOOTSTRAP_ATTEMPTS {
        match TestCluster::new() {
            Ok(cluster) => return Ok(cluster),
            Err(err) => last_error = format!("{err:?}"),
        }
        if attempt + 1 == BOOTSTRAP_ATTEMPTS || !is_transient(&last_error) {
            break;
        }
        let delay = BACKOFF_BASE * 2_u32.pow(attempt);
        eprintln!("pg-embed: attempt {} failed, retrying in {delay:?}: {last_error}", attempt + 1);
        std::thread::sleep(delay);
    }
    Err(last_error)
}
