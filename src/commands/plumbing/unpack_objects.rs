use crate::areas::repository::Repository;
use crate::artifacts::pack::decoder::PackDecoder;
use anyhow::Context;
use std::io::{Read, Write};
use std::path::Path;

impl Repository {
    /// Store every object of a pack read from `pack_path`, or from stdin
    pub fn unpack_objects(&self, pack_path: Option<&Path>) -> anyhow::Result<()> {
        let data = match pack_path {
            Some(path) => std::fs::read(path)
                .with_context(|| format!("Failed to read pack file: {path:?}"))?,
            None => {
                let mut data = Vec::new();
                std::io::stdin()
                    .read_to_end(&mut data)
                    .context("Failed to read pack from stdin")?;
                data
            }
        };

        let written = PackDecoder::new(self.database()).decode(&data)?;

        for oid in written {
            writeln!(self.writer(), "{oid}")?;
        }

        Ok(())
    }
}
