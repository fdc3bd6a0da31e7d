// src/repository/mod.rs

//! Package list sources
//!
//! This module provides functionality for:
//! - Fetching a distribution manifest from a local path or URL
//! - Listing installed packages through an external command or a file
//! - Caching both lists as text files in the output directory

use crate::config::Config;
use crate::error::{Error, Result};
use crate::packages::PackageList;
use flate2::read::GzDecoder;
use reqwest::blocking::Client;
use std::fs;
use std::io::Read;
use std::path::Path;
use std::process::Command;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Default timeout for HTTP requests (30 seconds)
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Maximum retry attempts for failed downloads
const MAX_RETRIES: u32 = 3;

/// Retry delay in milliseconds
const RETRY_DELAY_MS: u64 = 1000;

/// Cached list of installed package names
pub const INSTALLED_LIST: &str = "installed.pkgs.txt";

/// Cached list of manifest package names
pub const MANIFEST_LIST: &str = "manifest.pkgs.txt";

/// Manifest fetcher for local files and HTTP(S) URLs
pub struct ManifestClient {
    client: Client,
    max_retries: u32,
}

impl ManifestClient {
    /// Create a new manifest client
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::Download(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            max_retries: MAX_RETRIES,
        })
    }

    /// Read the manifest at `location`, gunzipping `.gz` resources
    pub fn fetch(&self, location: &str) -> Result<String> {
        let bytes = if is_url(location) {
            self.download(location)?
        } else {
            debug!("Reading manifest from: {}", location);
            fs::read(location)?
        };

        if location.ends_with(".gz") {
            let mut gz = GzDecoder::new(bytes.as_slice());
            let mut text = String::new();
            gz.read_to_string(&mut text)
                .map_err(|e| Error::Parse(format!("Failed to decompress {}: {}", location, e)))?;
            return Ok(text);
        }

        String::from_utf8(bytes)
            .map_err(|e| Error::Parse(format!("Manifest {} is not valid UTF-8: {}", location, e)))
    }

    /// Download `url` with retry support
    fn download(&self, url: &str) -> Result<Vec<u8>> {
        info!("Downloading manifest from {}", url);

        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.client.get(url).send() {
                Ok(response) => {
                    if !response.status().is_success() {
                        return Err(Error::Download(format!(
                            "HTTP {} from {}",
                            response.status(),
                            url
                        )));
                    }

                    let bytes = response
                        .bytes()
                        .map_err(|e| Error::Download(format!("Failed to read response: {}", e)))?;
                    debug!("Downloaded {} bytes", bytes.len());
                    return Ok(bytes.to_vec());
                }
                Err(e) => {
                    if attempt >= self.max_retries {
                        return Err(Error::Download(format!(
                            "Failed to download {} after {} attempts: {}",
                            url, attempt, e
                        )));
                    }
                    warn!("Download attempt {} failed: {}, retrying...", attempt, e);
                    std::thread::sleep(Duration::from_millis(RETRY_DELAY_MS * attempt as u64));
                }
            }
        }
    }
}

fn is_url(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

/// Trimmed, non-empty lines of a file
pub fn read_lines(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)?;
    Ok(non_empty_lines(&content))
}

fn non_empty_lines(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// First whitespace-delimited token of each non-empty manifest line, in
/// file order. Ubuntu manifests carry a version in the second column.
pub fn parse_manifest(content: &str) -> PackageList {
    content
        .lines()
        .filter_map(|line| line.split_whitespace().next())
        .map(str::to_string)
        .collect()
}

/// Sort and de-duplicate an installed package listing
pub fn parse_installed(content: &str) -> PackageList {
    let mut names = non_empty_lines(content);
    names.sort();
    names.dedup();
    names
}

/// Write `path` from `generate` unless caching is on and it already exists
pub fn ensure_file<F>(path: &Path, cache: bool, generate: F) -> Result<()>
where
    F: FnOnce() -> Result<PackageList>,
{
    if cache && path.exists() {
        info!("Using cached {}", path.display());
        return Ok(());
    }

    let names = generate()?;
    let mut content = names.join("\n");
    if !content.is_empty() {
        content.push('\n');
    }
    fs::write(path, content)?;
    debug!("Wrote {} names to {}", names.len(), path.display());
    Ok(())
}

/// Run `command` through `sh -c` and return its standard output
pub fn run_command(command: &str) -> Result<String> {
    debug!("Running: {}", command);
    let output = Command::new("sh").arg("-c").arg(command).output()?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.trim().is_empty() {
            warn!("{}", stderr.trim());
        }
        return Err(Error::CommandFailed {
            command: command.to_string(),
            status: output.status.to_string(),
        });
    }

    String::from_utf8(output.stdout)
        .map_err(|e| Error::Parse(format!("Output of `{}` is not valid UTF-8: {}", command, e)))
}

/// Installed package names, sorted and unique
pub fn get_installed_packages(config: &Config) -> Result<PackageList> {
    let output = config.output_dir.join(INSTALLED_LIST);
    ensure_file(&output, config.cache, || {
        let content = match &config.installed_file {
            Some(path) => {
                debug!("Reading installed packages from: {}", path.display());
                fs::read_to_string(path)?
            }
            None => run_command(&config.installed_command)?,
        };
        Ok(parse_installed(&content))
    })?;
    read_lines(&output)
}

/// Manifest package names, in manifest order
pub fn get_manifest_packages(config: &Config) -> Result<PackageList> {
    let location = config
        .manifest
        .as_deref()
        .ok_or_else(|| Error::Config("no manifest path or URL given".to_string()))?;

    let output = config.output_dir.join(MANIFEST_LIST);
    ensure_file(&output, config.cache, || {
        let content = ManifestClient::new()?.fetch(location)?;
        Ok(parse_manifest(&content))
    })?;
    read_lines(&output)
}

/// Installed and manifest package lists, creating the output directory
pub fn get_package_lists(config: &Config) -> Result<(PackageList, PackageList)> {
    fs::create_dir_all(&config.output_dir)?;

    let installed = get_installed_packages(config)?;
    let manifest = get_manifest_packages(config)?;

    info!(
        "Loaded {} installed and {} manifest packages",
        installed.len(),
        manifest.len()
    );
    Ok((installed, manifest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;
    use tempfile::TempDir;

    fn config_in(dir: &TempDir) -> Config {
        Config {
            output_dir: dir.path().to_path_buf(),
            ..Config::default()
        }
    }

    #[test]
    fn test_parse_manifest_takes_first_column() {
        let content = "acl\t2.3.2-1build1\n\nadduser 3.137ubuntu1\n   \nzsh\n";
        assert_eq!(parse_manifest(content), vec!["acl", "adduser", "zsh"]);
    }

    #[test]
    fn test_parse_manifest_keeps_file_order() {
        assert_eq!(parse_manifest("orange\ncarrot\ncorn\n"), vec!["orange", "carrot", "corn"]);
    }

    #[test]
    fn test_parse_installed_sorts_unique() {
        assert_eq!(parse_installed("peach\napple\n\npeach\n"), vec!["apple", "peach"]);
    }

    #[test]
    fn test_read_lines_skips_blank() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("list.txt");
        fs::write(&path, "  a  \n\nb\n").unwrap();
        assert_eq!(read_lines(&path).unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn test_ensure_file_respects_cache() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cached.txt");
        fs::write(&path, "old\n").unwrap();

        ensure_file(&path, true, || panic!("cached file must not be regenerated")).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "old\n");

        ensure_file(&path, false, || Ok(vec!["new".to_string()])).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "new\n");
    }

    #[test]
    fn test_ensure_file_propagates_failure() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("never.txt");
        let result = ensure_file(&path, false, || Err(Error::Download("offline".to_string())));
        assert!(matches!(result, Err(Error::Download(_))));
        assert!(!path.exists());
    }

    #[test]
    fn test_run_command_success_and_failure() {
        assert_eq!(run_command("printf 'b\\na\\n'").unwrap(), "b\na\n");
        assert!(matches!(
            run_command("exit 3"),
            Err(Error::CommandFailed { .. })
        ));
    }

    #[test]
    fn test_installed_from_command() {
        let dir = TempDir::new().unwrap();
        let config = Config {
            installed_command: "printf 'zsh\\nbash\\nzsh\\n'".to_string(),
            ..config_in(&dir)
        };
        assert_eq!(get_installed_packages(&config).unwrap(), vec!["bash", "zsh"]);
        assert!(dir.path().join(INSTALLED_LIST).exists());
    }

    #[test]
    fn test_installed_command_failure_is_fatal() {
        let dir = TempDir::new().unwrap();
        let config = Config {
            installed_command: "false".to_string(),
            ..config_in(&dir)
        };
        assert!(get_installed_packages(&config).is_err());
    }

    #[test]
    fn test_manifest_from_local_file() {
        let dir = TempDir::new().unwrap();
        let manifest = dir.path().join("ubuntu.manifest");
        fs::write(&manifest, "orange 1.0\ncarrot 2.0\ncorn 3.0\n").unwrap();
        let config = Config {
            manifest: Some(manifest.to_string_lossy().into_owned()),
            ..config_in(&dir)
        };

        assert_eq!(
            get_manifest_packages(&config).unwrap(),
            vec!["orange", "carrot", "corn"]
        );
    }

    #[test]
    fn test_manifest_gzip() {
        let dir = TempDir::new().unwrap();
        let manifest = dir.path().join("ubuntu.manifest.gz");
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"bash 5.2\ncoreutils 9.4\n").unwrap();
        fs::write(&manifest, encoder.finish().unwrap()).unwrap();

        let client = ManifestClient::new().unwrap();
        let text = client.fetch(&manifest.to_string_lossy()).unwrap();
        assert_eq!(parse_manifest(&text), vec!["bash", "coreutils"]);
    }

    #[test]
    fn test_missing_manifest_is_config_error() {
        let dir = TempDir::new().unwrap();
        let result = get_manifest_packages(&config_in(&dir));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_is_url() {
        assert!(is_url("http://releases.ubuntu.com/noble/ubuntu.manifest"));
        assert!(is_url("https://example.com/x"));
        assert!(!is_url("/srv/ubuntu.manifest"));
    }
}
