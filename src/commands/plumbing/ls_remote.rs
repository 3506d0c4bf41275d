use crate::areas::repository::Repository;
use crate::artifacts::protocol::client::PackProtocolClient;
use crate::artifacts::protocol::transport::Transport;
use std::io::Write;

impl Repository {
    pub fn ls_remote<T: Transport>(&self, url: &str, transport: T) -> anyhow::Result<()> {
        let client = PackProtocolClient::new(transport);
        let refs = client.discover_refs(url)?;

        for remote_ref in refs.refs() {
            writeln!(self.writer(), "{}\t{}", remote_ref.oid, remote_ref.name)?;
        }

        Ok(())
    }
}
