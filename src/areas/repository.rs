use crate::areas::database::Database;
use crate::areas::refs::{HEAD_REF_NAME, HEADS_PREFIX, Refs};
use crate::areas::workspace::Workspace;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree_serializer::METADATA_DIR;
use crate::config::Config;
use anyhow::Context;
use std::cell::{RefCell, RefMut};
use std::path::Path;

pub struct Repository {
    path: Box<Path>,
    writer: RefCell<Box<dyn std::io::Write>>,
    database: Database,
    workspace: Workspace,
    refs: Refs,
    config: Config,
}

impl Repository {
    pub fn new(path: &str, writer: Box<dyn std::io::Write>, config: Config) -> anyhow::Result<Self> {
        let path = Path::new(path);

        if !path.exists() {
            std::fs::create_dir_all(path)?;
        }
        let path = path.canonicalize()?;

        let git_path = path.join(METADATA_DIR);
        let database = Database::new(git_path.join("objects").into_boxed_path());
        let workspace = Workspace::new(path.clone().into_boxed_path());
        let refs = Refs::new(git_path.into_boxed_path());

        Ok(Repository {
            path: path.into_boxed_path(),
            writer: RefCell::new(writer),
            database,
            workspace,
            refs,
            config,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn git_path(&self) -> Box<Path> {
        self.path.join(METADATA_DIR).into_boxed_path()
    }

    pub fn writer(&'_ self) -> RefMut<'_, Box<dyn std::io::Write>> {
        self.writer.borrow_mut()
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn refs(&self) -> &Refs {
        &self.refs
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Resolve `HEAD`, a branch, a full ref name or a 40-digit object id
    pub fn resolve_revision(&self, revision: &str) -> anyhow::Result<ObjectId> {
        if let Ok(oid) = ObjectId::try_parse(revision) {
            return Ok(oid);
        }

        let name = if revision == HEAD_REF_NAME || revision.starts_with("refs/") {
            revision.to_string()
        } else {
            format!("{HEADS_PREFIX}{revision}")
        };

        self.refs
            .read_ref(&name)?
            .with_context(|| format!("unknown revision {revision}"))
    }
}
