//! `bdy` CLI discovery and install-if-missing.
//!
//! Resolution order: the `BDY_PATH` override, then whatever is already on
//! `PATH`, then a fresh download of the latest release into the user cache
//! directory. Downloads are versioned under the cache dir so a later run with
//! the same version reuses the binary.

use crate::error::Error;
use regex::Regex;
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::OnceLock;
use tracing::info;

const DOWNLOAD_BASE: &str = "https://es.buddy.works/bdy";
const CHANNEL: &str = "prod";

struct PlatformInfo {
    /// Download prefix, e.g. `linux-x64`.
    prefix: &'static str,
    /// Archive extension for that platform.
    archive_ext: &'static str,
}

/// Resolve the `bdy` binary to invoke, installing it when missing.
pub fn ensure_installed() -> Result<PathBuf, Error> {
    if let Some(path) = env::var_os("BDY_PATH") {
        let path = PathBuf::from(path);
        info!("Using bdy from BDY_PATH: {}", path.display());
        return Ok(path);
    }

    if let Ok(path) = which::which("bdy") {
        info!(
            "bdy CLI is already installed (version: {})",
            installed_version(&path)
        );
        return Ok(path);
    }

    info!("bdy CLI not found, installing...");
    let path = install()?;
    info!(
        "bdy CLI installed successfully (version: {})",
        installed_version(&path)
    );
    Ok(path)
}

fn install() -> Result<PathBuf, Error> {
    let platform = platform_info()?;
    let version = fetch_latest_version()?;
    info!("Installing bdy CLI ({version}) for {}...", platform.prefix);

    let install_dir = install_dir(&version)?;
    fs::create_dir_all(&install_dir).map_err(|err| Error::InstallFailed {
        reason: format!("failed to create {}: {err}", install_dir.display()),
    })?;

    let binary = install_dir.join(binary_name());
    if !binary.is_file() {
        let url = format!(
            "{DOWNLOAD_BASE}/{CHANNEL}/{version}/{}{}",
            platform.prefix, platform.archive_ext
        );
        let archive = install_dir.join(format!("bdy{}", platform.archive_ext));
        download(&url, &archive)?;
        extract(&archive, &install_dir, platform.archive_ext)?;
        let _ = fs::remove_file(&archive);
    }

    if !binary.is_file() {
        return Err(Error::InstallFailed {
            reason: format!("archive did not contain {}", binary_name()),
        });
    }
    mark_executable(&binary)?;
    Ok(binary)
}

fn binary_name() -> &'static str {
    if cfg!(windows) {
        "bdy.exe"
    } else {
        "bdy"
    }
}

fn install_dir(version: &str) -> Result<PathBuf, Error> {
    let cache = dirs::cache_dir().ok_or_else(|| Error::InstallFailed {
        reason: "no user cache directory available".to_string(),
    })?;
    Ok(cache.join("buddy-pipeline-run").join("bdy").join(version))
}

fn platform_info() -> Result<PlatformInfo, Error> {
    let arch = match env::consts::ARCH {
        "x86_64" => "x64",
        "aarch64" => "arm64",
        other => {
            return Err(Error::InstallFailed {
                reason: format!(
                    "unsupported architecture: {other}. Only x64 and arm64 are supported."
                ),
            })
        }
    };
    match (env::consts::OS, arch) {
        ("linux", "x64") => Ok(PlatformInfo {
            prefix: "linux-x64",
            archive_ext: ".tar.gz",
        }),
        ("linux", "arm64") => Ok(PlatformInfo {
            prefix: "linux-arm64",
            archive_ext: ".tar.gz",
        }),
        ("macos", "arm64") => Ok(PlatformInfo {
            prefix: "darwin-arm64",
            archive_ext: ".tar.gz",
        }),
        ("macos", "x64") => Err(Error::InstallFailed {
            reason: "macOS x64 is not supported. Only darwin-arm64 binaries are available."
                .to_string(),
        }),
        ("windows", "x64") => Ok(PlatformInfo {
            prefix: "win-x64",
            archive_ext: ".zip",
        }),
        ("windows", "arm64") => Err(Error::InstallFailed {
            reason: "Windows ARM64 is not supported. Only win-x64 binaries are available."
                .to_string(),
        }),
        (other, _) => Err(Error::InstallFailed {
            reason: format!(
                "unsupported platform: {other}. Only linux, macos, and windows are supported."
            ),
        }),
    }
}

fn fetch_latest_version() -> Result<String, Error> {
    let url = format!("{DOWNLOAD_BASE}/{CHANNEL}/latest");
    let mut response = ureq::get(url.as_str())
        .call()
        .map_err(|err| Error::InstallFailed {
            reason: format!("failed to fetch latest version from {url}: {err}"),
        })?;
    let version = response
        .body_mut()
        .read_to_string()
        .map_err(|err| Error::InstallFailed {
            reason: format!("failed to read latest version from {url}: {err}"),
        })?;
    let version = version.trim();
    if version.is_empty() {
        return Err(Error::InstallFailed {
            reason: format!("empty version response from {url}"),
        });
    }
    Ok(version.to_string())
}

fn download(url: &str, dest: &Path) -> Result<(), Error> {
    let mut response = ureq::get(url).call().map_err(|err| Error::InstallFailed {
        reason: format!("failed to download bdy CLI. URL: {url} ({err})"),
    })?;
    let mut file = fs::File::create(dest).map_err(|err| Error::InstallFailed {
        reason: format!("failed to create {}: {err}", dest.display()),
    })?;
    io::copy(&mut response.body_mut().as_reader(), &mut file).map_err(|err| {
        Error::InstallFailed {
            reason: format!("failed to write {}: {err}", dest.display()),
        }
    })?;
    Ok(())
}

fn extract(archive: &Path, dest: &Path, archive_ext: &str) -> Result<(), Error> {
    if archive_ext == ".zip" {
        // Windows ships bsdtar, which reads zip archives.
        let status = Command::new("tar")
            .arg("-xf")
            .arg(archive)
            .arg("-C")
            .arg(dest)
            .status()
            .map_err(|err| Error::InstallFailed {
                reason: format!("failed to run tar: {err}"),
            })?;
        if !status.success() {
            return Err(Error::InstallFailed {
                reason: format!("tar failed to extract {}", archive.display()),
            });
        }
        return Ok(());
    }

    let file = fs::File::open(archive).map_err(|err| Error::InstallFailed {
        reason: format!("failed to open {}: {err}", archive.display()),
    })?;
    let mut tarball = tar::Archive::new(flate2::read::GzDecoder::new(file));
    tarball.unpack(dest).map_err(|err| Error::InstallFailed {
        reason: format!("failed to extract {}: {err}", archive.display()),
    })
}

#[cfg(unix)]
fn mark_executable(binary: &Path) -> Result<(), Error> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(binary, fs::Permissions::from_mode(0o755)).map_err(|err| {
        Error::InstallFailed {
            reason: format!("failed to mark {} executable: {err}", binary.display()),
        }
    })
}

#[cfg(not(unix))]
fn mark_executable(_binary: &Path) -> Result<(), Error> {
    Ok(())
}

/// Best-effort `bdy version` query; `unknown` when the tool will not say.
fn installed_version(bdy: &Path) -> String {
    let Ok(output) = Command::new(bdy).arg("version").output() else {
        return "unknown".to_string();
    };
    let text = String::from_utf8_lossy(&output.stdout);
    match parse_version_output(&text) {
        Some(version) => version,
        None if text.trim().is_empty() => "unknown".to_string(),
        None => text.trim().to_string(),
    }
}

/// The version is the last line that looks like `X.Y.Z` or `X.Y.Z-suffix`;
/// `bdy version` may print banners above it.
fn parse_version_output(output: &str) -> Option<String> {
    static VERSION_PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = VERSION_PATTERN
        .get_or_init(|| Regex::new(r"^\d+\.\d+\.\d+(-[\w.]+)?").expect("static version pattern"));
    output
        .lines()
        .rev()
        .map(str::trim)
        .find(|line| pattern.is_match(line))
        .map(str::to_string)
}
