//! Per-package coverage mode.
//!
//! Packages run one by one, each writing its own profile under the cover
//! dir. A failing package does not stop the loop unless `fail_fast` is set.
//! Profiles that exist afterwards are merged in package order and rendered
//! to HTML.

use std::io::Write;
use std::path::{Path, PathBuf};

use bytes::BytesMut;

use testwrap_core::coverage::{merge_profiles, package_profile_dir, profile_flag};
use testwrap_core::error::{Result, TestwrapError};
use testwrap_core::plan::Plan;

use crate::config::RunConfig;
use crate::exec::{Invocation, ToolRunner};

use super::{echo, write_artifact};

pub const PROFILE_FILE: &str = "coverage.out";
pub const COMBINED_PROFILE: &str = "combined-coverage.out";
pub const COMBINED_HTML: &str = "combined-coverage.html";

pub fn package_profile(cover_dir: &Path, import_path: &str) -> PathBuf {
    cover_dir.join(package_profile_dir(import_path)).join(PROFILE_FILE)
}

pub async fn run<R, W>(cfg: &RunConfig, runner: &R, plan: &Plan, out: &mut W) -> Result<i32>
where
    R: ToolRunner + ?Sized,
    W: Write,
{
    let cover_dir = cfg
        .cover_dir
        .clone()
        .ok_or_else(|| TestwrapError::BadConfig("coverage mode requires a cover dir".into()))?;

    let mut log = BytesMut::new();
    let mut profiles: Vec<String> = Vec::new();
    let mut first_failure = 0;

    for desc in plan.descriptors() {
        let profile = package_profile(&cover_dir, &desc.import_path);
        if let Some(parent) = profile.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                TestwrapError::Io(format!("create {} failed: {e}", parent.display()))
            })?;
        }
        remove_stale(&profile).await?;

        // The profile flag goes before user flags so a trailing `-args` keeps working.
        let mut args = vec![
            desc.import_path.clone(),
            profile_flag(&profile.to_string_lossy()),
        ];
        args.extend(desc.flags);

        let res = runner
            .run(Invocation::new(&cfg.tool, args, cfg.root.clone()))
            .await?;
        let combined = res.combined();
        echo(out, &combined)?;
        log.extend_from_slice(&combined);

        match tokio::fs::read_to_string(&profile).await {
            Ok(p) => profiles.push(p),
            Err(_) => {
                tracing::debug!(package = %desc.import_path, "no coverage profile written");
            }
        }

        if !res.success() {
            tracing::warn!(package = %desc.import_path, code = res.code, "package failed");
            if first_failure == 0 {
                first_failure = res.code;
            }
            if cfg.fail_fast {
                tracing::warn!("fail_fast set; skipping remaining packages");
                break;
            }
        }
    }

    write_artifact(&cfg.log_file(), &log).await?;

    let merged = match merge_profiles(&profiles) {
        Ok(m) => m,
        Err(e) if first_failure != 0 => {
            tracing::warn!(error = %e, "coverage merge skipped after test failures");
            return Ok(first_failure);
        }
        Err(e) => return Err(e),
    };

    let combined_path = cover_dir.join(COMBINED_PROFILE);
    let html_path = cover_dir.join(COMBINED_HTML);
    write_artifact(&combined_path, merged.as_bytes()).await?;

    let render = Invocation::new(
        &cfg.cover_tool,
        vec![
            format!("-html={}", combined_path.to_string_lossy()),
            "-o".to_string(),
            html_path.to_string_lossy().into_owned(),
        ],
        cfg.root.clone(),
    );
    let rendered = runner.run(render).await;
    match rendered {
        Ok(r) if r.success() => {
            writeln!(out, "coverage report: {}", html_path.display())?;
            tracing::info!(path = %html_path.display(), "coverage html written");
        }
        Ok(r) if first_failure == 0 => {
            echo(out, &r.combined())?;
            return Err(TestwrapError::Io(format!(
                "coverage html render exited with code {}",
                r.code
            )));
        }
        Err(e) if first_failure == 0 => return Err(e),
        Ok(r) => tracing::warn!(code = r.code, "coverage html render failed"),
        Err(e) => tracing::warn!(error = %e, "coverage html render failed"),
    }

    Ok(first_failure)
}

/// Drop a profile left over from an earlier run. Missing is fine.
async fn remove_stale(profile: &Path) -> Result<()> {
    match tokio::fs::remove_file(profile).await {
        Ok(()) => {
            tracing::debug!(path = %profile.display(), "removed stale coverage profile");
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(TestwrapError::Io(format!(
            "remove {} failed: {e}",
            profile.display()
        ))),
    }
}
