//! Isolated package cache installation

use super::fetch::Archive;
use super::Stage;
use crate::error::{LuxError, LuxResult};
use crate::tool::Conan;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;

/// Machine-level Conan settings carried into the isolated home
pub const GLOBAL_CONF: &str = "global.conf";

/// Load `archive` into the isolated cache at `cache_home`.
///
/// Each step is a checkpoint; the first failure aborts. Integrity problems
/// in the restored cache are always fatal.
pub async fn install_cache(conan: &Conan<'_>, archive: &Archive, cache_home: &Path) -> LuxResult<()> {
    Stage::CleanCache.enter();
    conan.remove_all().await?;

    Stage::CopyConfig.enter();
    copy_global_conf(conan, cache_home).await?;

    Stage::RestoreCache.enter();
    conan.restore(archive.path()).await?;

    Stage::CheckIntegrity.enter();
    conan.check_integrity().await?;
    info!("Integrity check: OK");

    Ok(())
}

/// Copy `global.conf` from the caller's Conan home into `cache_home`.
pub async fn copy_global_conf(conan: &Conan<'_>, cache_home: &Path) -> LuxResult<PathBuf> {
    let source = conan.default_home().await?.join(GLOBAL_CONF);
    let dest = cache_home.join(GLOBAL_CONF);
    info!("Copying {} to {}", source.display(), dest.display());

    if !source.is_file() {
        return Err(LuxError::PathNotFound(source));
    }
    fs::create_dir_all(cache_home)
        .await
        .map_err(|e| LuxError::io(format!("creating {}", cache_home.display()), e))?;
    fs::copy(&source, &dest)
        .await
        .map_err(|e| LuxError::io(format!("copying {}", source.display()), e))?;

    Ok(dest)
}
