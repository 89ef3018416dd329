//! Bundle download, provenance check and extraction
//!
//! Provenance is best effort: a missing or failing `gh` only produces a
//! warning. The downloaded bundle is always extracted and used.

use crate::error::{LuxError, LuxResult};
use crate::tool::{Invocation, Tool, ToolRunner};
use crate::ui::{DownloadProgress, UiContext};
use console::style;
use sha2::{Digest, Sha256};
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Organization whose attestations are trusted
pub const ATTESTATION_OWNER: &str = "LuxCoreRender";

/// Conan cache archive shipped inside every bundle
pub const CACHE_ARCHIVE_NAME: &str = "conan-cache-save.tgz";

/// A cache archive ready to be restored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Archive {
    path: PathBuf,
    name: String,
}

impl Archive {
    /// Use an archive supplied by the caller (offline mode)
    pub fn local(path: &Path) -> LuxResult<Self> {
        if !path.is_file() {
            return Err(LuxError::PathNotFound(path.to_path_buf()));
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self {
            path: path.to_path_buf(),
            name,
        })
    }

    /// Path handed to `conan cache restore`
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Bundle (downloaded) or archive (local) file name
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Outcome of the provenance check
#[derive(Debug, Clone, PartialEq)]
pub enum Attestation {
    /// Signature verified; certificate kept for the audit log
    Verified { certificate: serde_json::Value },
    /// Verification tool not available
    Unverifiable(String),
    /// Verification ran and did not succeed
    Failed(String),
}

impl Attestation {
    pub fn is_verified(&self) -> bool {
        matches!(self, Self::Verified { .. })
    }

    /// Log the outcome. Never affects control flow.
    pub fn report(&self, file_name: &str) {
        match self {
            Self::Verified { certificate } => {
                info!(
                    "{}",
                    style(format!("'{}': found certificate - OK", file_name)).green()
                );
                debug!(
                    "{}",
                    serde_json::to_string_pretty(certificate).unwrap_or_default()
                );
            }
            Self::Unverifiable(reason) | Self::Failed(reason) => {
                warn!("{}", style("SIGNATURE CHECKING ERROR").yellow());
                warn!("{}", style(reason).yellow());
            }
        }
    }
}

/// Download the bundle at `url` into `dest`, check its provenance and
/// extract it in place.
pub async fn fetch(
    runner: &dyn ToolRunner,
    ctx: &UiContext,
    url: &str,
    dest: &Path,
) -> LuxResult<(Archive, Attestation)> {
    fetch_with(ureq::Agent::new_with_defaults(), runner, ctx, url, dest).await
}

async fn fetch_with(
    agent: ureq::Agent,
    runner: &dyn ToolRunner,
    ctx: &UiContext,
    url: &str,
    dest: &Path,
) -> LuxResult<(Archive, Attestation)> {
    let bundle = download(agent, ctx, url, dest).await?;
    let digest = sha256_file(&bundle)?;
    info!("Downloaded {} (sha256 {})", bundle.display(), digest);
    verify_and_extract(runner, &bundle, dest).await
}

/// Check provenance of a bundle already on disk, then extract it.
pub async fn verify_and_extract(
    runner: &dyn ToolRunner,
    bundle: &Path,
    dest: &Path,
) -> LuxResult<(Archive, Attestation)> {
    info!("Checking '{}'", bundle.display());
    let attestation = verify_attestation(runner, bundle).await;
    let name = bundle
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    attestation.report(&name);

    let (zip_path, target) = (bundle.to_path_buf(), dest.to_path_buf());
    tokio::task::spawn_blocking(move || extract_zip(&zip_path, &target))
        .await
        .map_err(|e| LuxError::Internal(format!("extraction task failed: {}", e)))??;

    let path = dest.join(CACHE_ARCHIVE_NAME);
    if !path.is_file() {
        return Err(LuxError::Archive {
            path: bundle.to_path_buf(),
            reason: format!("bundle does not contain {}", CACHE_ARCHIVE_NAME),
        });
    }

    Ok((Archive { path, name }, attestation))
}

/// Verify the bundle's attestation with `gh attestation verify`.
pub async fn verify_attestation(runner: &dyn ToolRunner, bundle: &Path) -> Attestation {
    let invocation = Invocation::new(
        Tool::Gh,
        [
            "attestation".to_string(),
            "verify".to_string(),
            format!("-o{}", ATTESTATION_OWNER),
            "--format".to_string(),
            "json".to_string(),
            bundle.display().to_string(),
        ],
    );

    match runner.run(&invocation).await {
        Ok(output) => match extract_certificate(&output.stdout) {
            Some(certificate) => Attestation::Verified { certificate },
            None => Attestation::Failed("gh returned no signature certificate".to_string()),
        },
        Err(LuxError::ToolNotFound { .. }) => Attestation::Unverifiable(
            "Cannot find 'gh' application - dependencies origin cannot be checked".to_string(),
        ),
        Err(LuxError::ToolFailed { code, stderr, .. }) => Attestation::Failed(format!(
            "gh return code: {}\n{}",
            code.map_or_else(|| "none".to_string(), |c| c.to_string()),
            stderr.trim()
        )),
        Err(e) => Attestation::Failed(e.to_string()),
    }
}

/// Certificate of the first signature in `gh attestation verify` JSON output
fn extract_certificate(stdout: &str) -> Option<serde_json::Value> {
    let value: serde_json::Value = serde_json::from_str(stdout).ok()?;
    value
        .get(0)?
        .pointer("/verificationResult/signature/certificate")
        .cloned()
}

/// Last path segment of a download URL
fn bundle_file_name(url: &str) -> LuxResult<&str> {
    url.rsplit('/')
        .next()
        .filter(|name| !name.is_empty())
        .ok_or_else(|| LuxError::Download {
            url: url.to_string(),
            reason: "URL has no file name".to_string(),
        })
}

async fn download(
    agent: ureq::Agent,
    ctx: &UiContext,
    url: &str,
    dest: &Path,
) -> LuxResult<PathBuf> {
    let path = dest.join(bundle_file_name(url)?);
    let progress = DownloadProgress::new(ctx, bundle_file_name(url)?);

    let (url, target) = (url.to_string(), path.clone());
    tokio::task::spawn_blocking(move || {
        let result = download_blocking(&agent, &url, &target, &progress);
        progress.finish();
        result
    })
    .await
    .map_err(|e| LuxError::Internal(format!("download task failed: {}", e)))??;

    Ok(path)
}

fn download_blocking(
    agent: &ureq::Agent,
    url: &str,
    path: &Path,
    progress: &DownloadProgress,
) -> LuxResult<u64> {
    let download_error = |reason: String| LuxError::Download {
        url: url.to_string(),
        reason,
    };

    let mut response = agent
        .get(url)
        .call()
        .map_err(|e| download_error(e.to_string()))?;
    if let Some(length) = response.body().content_length() {
        progress.set_length(length);
    }

    let mut reader = progress.wrap_read(response.body_mut().as_reader());
    let mut file = File::create(path)
        .map_err(|e| LuxError::io(format!("creating {}", path.display()), e))?;
    let bytes = std::io::copy(&mut reader, &mut file).map_err(|e| download_error(e.to_string()))?;

    debug!("Downloaded {} bytes from {}", bytes, url);
    Ok(bytes)
}

/// Hex SHA-256 digest of a file
pub fn sha256_file(path: &Path) -> LuxResult<String> {
    let mut file =
        File::open(path).map_err(|e| LuxError::io(format!("opening {}", path.display()), e))?;
    let mut hasher = Sha256::new();
    std::io::copy(&mut file, &mut hasher)
        .map_err(|e| LuxError::io(format!("hashing {}", path.display()), e))?;
    Ok(hex::encode(hasher.finalize()))
}

/// Extract a zip archive into `dest`, keeping its internal layout.
pub fn extract_zip(archive_path: &Path, dest: &Path) -> LuxResult<()> {
    let archive_error = |reason: String| LuxError::Archive {
        path: archive_path.to_path_buf(),
        reason,
    };
    let io_error = |e: std::io::Error| LuxError::io(format!("extracting {}", archive_path.display()), e);

    let file = File::open(archive_path).map_err(io_error)?;
    let mut archive = zip::ZipArchive::new(BufReader::new(file))
        .map_err(|e| archive_error(format!("failed to open zip: {}", e)))?;

    fs::create_dir_all(dest).map_err(io_error)?;

    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .map_err(|e| archive_error(format!("failed to read zip entry: {}", e)))?;

        let relative = entry
            .enclosed_name()
            .ok_or_else(|| archive_error(format!("unsafe entry name '{}'", entry.name())))?;
        let dest_path = dest.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&dest_path).map_err(io_error)?;
            continue;
        }

        if let Some(parent) = dest_path.parent() {
            fs::create_dir_all(parent).map_err(io_error)?;
        }
        let mut outfile = File::create(&dest_path).map_err(io_error)?;
        std::io::copy(&mut entry, &mut outfile).map_err(io_error)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Some(mode) = entry.unix_mode() {
                fs::set_permissions(&dest_path, fs::Permissions::from_mode(mode & 0o7777))
                    .map_err(io_error)?;
            }
        }
    }

    info!("Extracted {} entries to {}", archive.len(), dest.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::testing::{Reply, ScriptedRunner};
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use tempfile::TempDir;
    use zip::write::SimpleFileOptions;

    const GH_OUTPUT: &str = r#"[{"verificationResult": {"signature": {"certificate": {"issuer": "sigstore"}}}}]"#;

    fn write_bundle(path: &Path, entries: &[(&str, &[u8])]) {
        let file = File::create(path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        for (name, data) in entries {
            zip.start_file(*name, SimpleFileOptions::default()).unwrap();
            zip.write_all(data).unwrap();
        }
        zip.finish().unwrap();
    }

    /// Serve a single HTTP response on a loopback port and return the base URL.
    fn serve_once(status_line: &'static str, body: Vec<u8>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match stream.read(&mut buf) {
                        Ok(0) | Err(_) => break,
                        Ok(n) => request.extend_from_slice(&buf[..n]),
                    }
                }
                let header = format!(
                    "{}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                    status_line,
                    body.len()
                );
                let _ = stream.write_all(header.as_bytes());
                let _ = stream.write_all(&body);
            }
        });
        format!("http://{}", addr)
    }

    fn direct_agent() -> ureq::Agent {
        ureq::Agent::new_with_config(ureq::Agent::config_builder().proxy(None).build())
    }

    #[tokio::test]
    async fn missing_gh_is_unverifiable() {
        let runner = ScriptedRunner::new().on(Tool::Gh, &[], Reply::Missing);
        let attestation = verify_attestation(&runner, Path::new("bundle.zip")).await;
        assert!(matches!(attestation, Attestation::Unverifiable(_)));
        assert!(!attestation.is_verified());
    }

    #[tokio::test]
    async fn failing_gh_is_failed() {
        let runner = ScriptedRunner::new().on(
            Tool::Gh,
            &["attestation", "verify"],
            Reply::Fail(1, "no attestations found".to_string()),
        );
        match verify_attestation(&runner, Path::new("bundle.zip")).await {
            Attestation::Failed(reason) => {
                assert!(reason.contains("gh return code: 1"));
                assert!(reason.contains("no attestations found"));
            }
            other => panic!("unexpected attestation: {other:?}"),
        }
    }

    #[tokio::test]
    async fn verified_attestation_keeps_certificate() {
        let runner =
            ScriptedRunner::new().on(Tool::Gh, &[], Reply::Ok(GH_OUTPUT.to_string()));
        let attestation = verify_attestation(&runner, Path::new("bundle.zip")).await;
        assert_eq!(
            attestation,
            Attestation::Verified {
                certificate: serde_json::json!({"issuer": "sigstore"})
            }
        );
        assert_eq!(
            runner.command_lines(),
            vec!["gh attestation verify -oLuxCoreRender --format json bundle.zip"]
        );
    }

    #[tokio::test]
    async fn unparsable_gh_output_is_failed() {
        let runner = ScriptedRunner::new().on(Tool::Gh, &[], Reply::Ok("[]".to_string()));
        assert!(matches!(
            verify_attestation(&runner, Path::new("bundle.zip")).await,
            Attestation::Failed(_)
        ));
    }

    #[tokio::test]
    async fn extracts_without_gh() {
        let temp = TempDir::new().unwrap();
        let bundle = temp.path().join("luxcore-deps-ubuntu-latest.zip");
        write_bundle(
            &bundle,
            &[(CACHE_ARCHIVE_NAME, b"cache"), ("profiles/readme.txt", b"p")],
        );
        let runner = ScriptedRunner::new().on(Tool::Gh, &[], Reply::Missing);

        let (archive, attestation) = verify_and_extract(&runner, &bundle, temp.path())
            .await
            .unwrap();

        assert!(matches!(attestation, Attestation::Unverifiable(_)));
        assert_eq!(archive.path(), temp.path().join(CACHE_ARCHIVE_NAME));
        assert_eq!(archive.name(), "luxcore-deps-ubuntu-latest.zip");
        assert_eq!(fs::read(archive.path()).unwrap(), b"cache");
        assert!(temp.path().join("profiles").join("readme.txt").is_file());
    }

    #[tokio::test]
    async fn bundle_without_cache_archive_is_rejected() {
        let temp = TempDir::new().unwrap();
        let bundle = temp.path().join("bundle.zip");
        write_bundle(&bundle, &[("other.txt", b"x")]);
        let runner = ScriptedRunner::new().on(Tool::Gh, &[], Reply::Missing);

        let err = verify_and_extract(&runner, &bundle, temp.path())
            .await
            .unwrap_err();
        assert!(matches!(err, LuxError::Archive { .. }));
    }

    #[test]
    fn corrupt_zip_is_archive_error() {
        let temp = TempDir::new().unwrap();
        let bundle = temp.path().join("bundle.zip");
        fs::write(&bundle, b"not a zip").unwrap();
        assert!(matches!(
            extract_zip(&bundle, temp.path()),
            Err(LuxError::Archive { .. })
        ));
    }

    #[tokio::test]
    async fn fetch_downloads_and_extracts() {
        let source = TempDir::new().unwrap();
        let zip_path = source.path().join("bundle.zip");
        write_bundle(&zip_path, &[(CACHE_ARCHIVE_NAME, b"cache")]);
        let base = serve_once("HTTP/1.1 200 OK", fs::read(&zip_path).unwrap());

        let dest = TempDir::new().unwrap();
        let url = format!("{}/v1.0/luxcore-deps-ubuntu-latest.zip", base);
        let runner = ScriptedRunner::new().on(Tool::Gh, &[], Reply::Missing);
        let ctx = UiContext::non_interactive();

        let (archive, _) = fetch_with(direct_agent(), &runner, &ctx, &url, dest.path())
            .await
            .unwrap();

        assert!(dest.path().join("luxcore-deps-ubuntu-latest.zip").is_file());
        assert_eq!(fs::read(archive.path()).unwrap(), b"cache");
    }

    #[tokio::test]
    async fn http_error_is_fatal() {
        let base = serve_once("HTTP/1.1 404 Not Found", Vec::new());
        let dest = TempDir::new().unwrap();
        let url = format!("{}/missing.zip", base);
        let runner = ScriptedRunner::new();
        let ctx = UiContext::non_interactive();

        let err = fetch_with(direct_agent(), &runner, &ctx, &url, dest.path())
            .await
            .unwrap_err();
        assert!(matches!(err, LuxError::Download { .. }));
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn sha256_digest() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("abc");
        fs::write(&path, b"abc").unwrap();
        assert_eq!(
            sha256_file(&path).unwrap(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn file_name_from_url() {
        assert_eq!(
            bundle_file_name("https://h/o/r/releases/download/v1/luxcore-deps-macos-14.zip").unwrap(),
            "luxcore-deps-macos-14.zip"
        );
        assert!(bundle_file_name("https://h/o/").is_err());
    }

    #[test]
    fn local_archive_must_exist() {
        let temp = TempDir::new().unwrap();
        assert!(matches!(
            Archive::local(&temp.path().join("missing.tgz")),
            Err(LuxError::PathNotFound(_))
        ));
        let path = temp.path().join("conan-cache-save.tgz");
        fs::write(&path, b"x").unwrap();
        assert_eq!(Archive::local(&path).unwrap().name(), "conan-cache-save.tgz");
    }
}
