use crate::areas::repository::Repository;
use std::io::Write;

impl Repository {
    /// Snapshot the working directory and advance the branch HEAD points at
    pub fn commit(&self, message: &str) -> anyhow::Result<()> {
        let tree_oid = self.snapshot_workspace()?;
        let parent = self.refs().read_head()?;

        let commit_oid = self.write_commit(tree_oid, parent, message)?;
        self.refs().update_head(commit_oid)?;

        let is_root = match parent {
            Some(_) => "",
            None => "(root-commit) ",
        };
        let short_message = message.lines().next().unwrap_or_default();

        writeln!(
            self.writer(),
            "[{is_root}{}] {short_message}",
            commit_oid.to_short_oid()
        )?;

        Ok(())
    }
}
