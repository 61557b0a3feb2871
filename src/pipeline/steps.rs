// ABOUTME: Operations behind each release step.
// ABOUTME: Each validates its own inputs, since any earlier step may have been skipped.

use super::failure::{host_failure, missing_archive, operator_failure, workspace_failure};
use super::{Pipeline, Produced, StepOutput};
use crate::operator::Operator;
use crate::release_host::{DraftRelease, ReleaseHost};
use crate::report::Warning;
use crate::share::ShareMounter;
use crate::smoke;
use crate::step::StepFailed;
use crate::types::ReleaseId;
use crate::workspace;

impl<O, M, H> Pipeline<'_, O, M, H>
where
    O: Operator + ?Sized,
    M: ShareMounter + ?Sized,
    H: ReleaseHost + ?Sized,
{
    pub(super) async fn mount_share(&self) -> Result<StepOutput, StepFailed> {
        let share = self.config.share_path();
        let drive = self.config.drive();

        self.mounter.mount(&share, drive).await.map_err(|e| {
            StepFailed::new(format!("Failed to mount {share} to drive {drive}"))
                .cause(e.to_string())
                .cause(format!("drive {drive} is already in use"))
                .cause(format!(
                    "no access to {share}; check your network and VPN connection, try it in a file explorer"
                ))
                .remedy("rerun and pick a free drive with --drive")
        })?;

        let source = self.config.source_dir();
        if !source.is_dir() {
            return Err(StepFailed::new(format!(
                "{} is not a directory after mounting {share} to drive {drive}",
                source.display()
            ))
            .cause(format!("no build was published for version {}", self.config.version()))
            .remedy("check the version number and the contents of the share"));
        }

        self.operator
            .tell(&format!("Mounted {share} as {drive}"));
        Ok(StepOutput::nothing())
    }

    pub(super) fn copy_artifacts(&self) -> Result<StepOutput, StepFailed> {
        let source = self.config.source_dir();
        let destination = self.config.workspace_dir();

        let summary = workspace::copy_fresh(&source, destination).map_err(|e| {
            workspace_failure(
                format!(
                    "Failed to copy {} to {}",
                    source.display(),
                    destination.display()
                ),
                e,
                "mount the share first, or check --drive",
            )
        })?;

        let mut message = format!(
            "Copied {} files to {}",
            summary.files,
            destination.display()
        );
        if summary.replaced {
            message.push_str(" (previous copy removed)");
        }
        self.operator.tell(&message);
        Ok(StepOutput::nothing())
    }

    pub(super) fn strip_restricted_library(&self) -> Result<StepOutput, StepFailed> {
        let root = self.config.workspace_dir();
        let library = &self.config.settings().restricted_library;
        let attempted = || format!("Failed to strip {library} from {}", root.display());
        let hint = "run the copy step first";

        let removed = workspace::strip_library(root, library)
            .map_err(|e| workspace_failure(attempted(), e, hint))?;
        let sites = workspace::find_unguarded_imports(root, library)
            .map_err(|e| workspace_failure(attempted(), e, hint))?;

        if !sites.is_empty() {
            let failure = sites.iter().fold(
                StepFailed::new(format!(
                    "{} unguarded import(s) of {library} remain in {}",
                    sites.len(),
                    root.display()
                )),
                |failure, site| failure.cause(site.to_string()),
            );
            return Err(failure.remedy(format!(
                "wrap each import in try/except ImportError so the build starts without {library}"
            )));
        }

        let output = if removed {
            self.operator
                .tell(&format!("Removed {library}; all imports of it are guarded"));
            StepOutput::nothing()
        } else {
            self.operator
                .tell(&format!("All imports of {library} are guarded"));
            StepOutput::nothing().with_warning(Warning::library_absent(format!(
                "{library} was not present in {}",
                root.display()
            )))
        };
        Ok(output)
    }

    pub(super) fn archive(&self) -> Result<StepOutput, StepFailed> {
        let directory = self.config.workspace_dir();
        let archive = self.config.archive_path();

        let summary = workspace::archive_fresh(directory, &archive).map_err(|e| {
            workspace_failure(
                format!(
                    "Failed to archive {} into {}",
                    directory.display(),
                    archive.display()
                ),
                e,
                "run the copy step first",
            )
        })?;

        self.operator.tell(&format!(
            "Wrote {} ({} files)",
            summary.path.display(),
            summary.files
        ));
        Ok(Produced::Archive(summary.path).into())
    }

    pub(super) async fn create_release(&self) -> Result<StepOutput, StepFailed> {
        let draft = DraftRelease {
            tag_name: self.config.tag_name(),
            name: self.config.release_name(),
            draft: true,
        };

        let id = self.host.create_release(&draft).await.map_err(|e| {
            host_failure(
                format!(
                    "Failed to create release '{}' on {}",
                    draft.name,
                    self.config.settings().repository
                ),
                e,
            )
        })?;

        self.operator
            .tell(&format!("Created draft release {id}"));
        Ok(Produced::Created(id).into())
    }

    pub(super) async fn upload_asset(&self) -> Result<StepOutput, StepFailed> {
        let release = self.release_id("upload the archive to")?;

        let archive = self
            .state
            .archive
            .clone()
            .unwrap_or_else(|| self.config.archive_path());
        if !archive.is_file() {
            return Err(missing_archive(&archive));
        }

        let name = self.config.asset_name();
        let assets = self.host.list_assets(&release).await.map_err(|e| {
            host_failure(format!("Failed to list assets of release {release}"), e)
        })?;

        if let Some(existing) = assets.iter().find(|asset| asset.name == name) {
            let answer = self
                .operator
                .confirm(&format!(
                    "Release {release} already has an asset named {name}. Delete it and upload the new archive?"
                ))
                .map_err(|e| operator_failure("asking about the existing asset", e))?;

            if !answer.is_yes() {
                self.operator
                    .tell("Keeping the existing asset; nothing uploaded.");
                return Ok(StepOutput::from(Produced::UsedRelease(release.clone()))
                    .with_warning(Warning::upload_declined(format!(
                        "release {release} kept its existing {name}; the new archive was not uploaded"
                    ))));
            }

            self.host.delete_asset(&existing.id).await.map_err(|e| {
                host_failure(
                    format!("Failed to delete existing asset {name} ({})", existing.id),
                    e,
                )
            })?;
        }

        let content = tokio::fs::read(&archive).await.map_err(|e| {
            StepFailed::new(format!("Failed to read {}", archive.display())).cause(e.to_string())
        })?;

        self.host
            .upload_asset(&release, name, content)
            .await
            .map_err(|e| {
                host_failure(
                    format!("Failed to upload {name} to release {release}"),
                    e,
                )
            })?;

        self.operator
            .tell(&format!("Uploaded {name} to release {release}"));
        Ok(Produced::UsedRelease(release).into())
    }

    pub(super) fn smoke_test(&self) -> Result<StepOutput, StepFailed> {
        let archive = self
            .state
            .archive
            .clone()
            .unwrap_or_else(|| self.config.archive_path());

        let verdict = smoke::guide(self.operator, &archive, &self.config.settings().smoke_test)
            .map_err(|e| operator_failure("running the smoke test", e))?;

        if verdict.passed() {
            return Ok(Produced::Verdict(verdict).into());
        }

        let warning = Warning::smoke_failed(format!(
            "smoke test failed: {}",
            verdict.failures().join("; ")
        ));
        Ok(StepOutput::from(Produced::Verdict(verdict)).with_warning(warning))
    }

    pub(super) async fn delete_release(&self) -> Result<StepOutput, StepFailed> {
        let release = self.release_id("delete")?;

        self.host.delete_release(&release).await.map_err(|e| {
            host_failure(format!("Failed to delete release {release}"), e)
        })?;

        self.operator
            .tell(&format!("Deleted release {release}"));
        Ok(Produced::Deleted(release).into())
    }

    /// The release id from this run, or one the operator types in.
    fn release_id(&self, purpose: &str) -> Result<ReleaseId, StepFailed> {
        if let Some(ref id) = self.state.release_id {
            return Ok(id.clone());
        }

        loop {
            let answer = self
                .operator
                .ask(&format!(
                    "No release was created in this run. Enter the id of the release to {purpose}: "
                ))
                .map_err(|e| operator_failure("asking for a release id", e))?;

            let answer = answer.trim();
            if answer.is_empty() {
                self.operator.tell("A release id is required.");
            } else if answer.contains(['/', '?', '#']) {
                self.operator
                    .tell("A release id is a single value and cannot contain '/', '?' or '#'.");
            } else {
                return Ok(ReleaseId::new(answer));
            }
        }
    }
}
