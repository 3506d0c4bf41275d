use crate::areas::repository::Repository;
use anyhow::Context;
use std::fs;
use std::io::Write;

impl Repository {
    pub fn init(&self) -> anyhow::Result<()> {
        self.create_skeleton()?;

        writeln!(
            self.writer(),
            "Initialized empty Git repository in {}",
            self.git_path().display()
        )?;

        Ok(())
    }

    /// Create `.git/objects`, `.git/refs/heads` and a HEAD pointing at the
    /// default branch
    pub(crate) fn create_skeleton(&self) -> anyhow::Result<()> {
        fs::create_dir_all(self.database().objects_path())
            .context("Failed to create .git/objects directory")?;

        fs::create_dir_all(self.refs().heads_path())
            .context("Failed to create .git/refs/heads directory")?;

        // re-running init keeps the branch HEAD already points at
        if !self.refs().head_path().exists() {
            self.refs()
                .set_head_to_branch(&self.config().default_branch)
                .context("Failed to create initial HEAD reference")?;
        }

        Ok(())
    }
}
