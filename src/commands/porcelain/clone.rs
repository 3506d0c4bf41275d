use crate::areas::refs::HEADS_PREFIX;
use crate::areas::repository::Repository;
use crate::artifacts::database::object_store::ObjectStore;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::pack::decoder::PackDecoder;
use crate::artifacts::protocol::advertisement::AdvertisedRefs;
use crate::artifacts::protocol::client::PackProtocolClient;
use crate::artifacts::protocol::transport::Transport;
use anyhow::Context;
use std::io::Write;
use tracing::info;

impl Repository {
    /// Initialize the repository from a remote and check out its default
    /// branch
    pub fn clone_from<T: Transport>(&self, url: &str, transport: T) -> anyhow::Result<()> {
        let not_empty = std::fs::read_dir(self.path())?.next().is_some();
        if not_empty {
            anyhow::bail!(
                "destination path {} already exists and is not an empty directory",
                self.path().display()
            );
        }

        writeln!(self.writer(), "Cloning into '{}'...", self.path().display())?;
        self.create_skeleton()?;

        let client = PackProtocolClient::new(transport);
        let refs = client.discover_refs(url)?;
        if refs.is_empty() {
            writeln!(
                self.writer(),
                "warning: You appear to have cloned an empty repository."
            )?;
            return Ok(());
        }

        let pack = client.fetch(url, &refs)?;
        let written = PackDecoder::new(self.database()).decode(&pack)?;
        writeln!(self.writer(), "Unpacked {} objects", written.len())?;

        let (branch_ref, head_oid) = default_branch(&refs, &self.config().default_branch)
            .with_context(|| format!("{url} advertises no branch to check out"))?;
        let branch = branch_ref.trim_start_matches(HEADS_PREFIX);

        self.refs().update_ref(&branch_ref, head_oid)?;
        self.refs().set_head_to_branch(branch)?;

        let commit = self
            .database()
            .parse_object_as_commit(&head_oid)?
            .with_context(|| format!("{branch_ref} does not point at a commit"))?;
        let files = self.workspace().checkout_tree(
            self.database(),
            commit.tree_oid(),
            self.config().max_tree_depth,
        )?;
        info!(url, branch, files, "checked out clone");

        Ok(())
    }
}

/// Branch a fresh clone starts on, with the commit it points at
///
/// Prefers the branch HEAD is advertised as pointing to, then a branch at
/// the same commit as HEAD, then `fallback`, then the first branch listed.
fn default_branch(refs: &AdvertisedRefs, fallback: &str) -> Option<(String, ObjectId)> {
    let branch = |name: &str| refs.get(name).map(|oid| (name.to_string(), oid));
    let branches = || {
        refs.refs()
            .iter()
            .filter(|remote_ref| remote_ref.name.starts_with(HEADS_PREFIX))
    };

    if let Some(target) = refs.head_symref()
        && let Some(found) = branch(target)
    {
        return Some(found);
    }

    let fallback = format!("{HEADS_PREFIX}{fallback}");
    if let Some(head) = refs.get("HEAD") {
        let at_head = branch(fallback.as_str())
            .filter(|(_, oid)| *oid == head)
            .or_else(|| {
                branches()
                    .find(|remote_ref| remote_ref.oid == head)
                    .map(|remote_ref| (remote_ref.name.clone(), remote_ref.oid))
            });
        if at_head.is_some() {
            return at_head;
        }
    }

    branch(fallback.as_str()).or_else(|| {
        branches()
            .next()
            .map(|remote_ref| (remote_ref.name.clone(), remote_ref.oid))
    })
}
