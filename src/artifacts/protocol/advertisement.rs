//! Ref advertisement returned by `info/refs`
//!
//! ```text
//! 001e# service=git-upload-pack\n
//! 0000
//! 00xx<oid> HEAD\0<capabilities>\n
//! 00xx<oid> refs/heads/main\n
//! 0000
//! ```
//!
//! Peeled tag entries (`refs/tags/v1^{}`) are dropped. A remote with no
//! refs advertises a single `capabilities^{}` placeholder instead.

use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::protocol::ProtocolError;
use crate::artifacts::protocol::pkt_line::{PktLine, PktLineReader};

const SERVICE_ANNOUNCEMENT: &[u8] = b"# service=";
const PEELED_SUFFIX: &str = "^{}";
const HEAD_SYMREF_PREFIX: &str = "symref=HEAD:";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteRef {
    pub name: String,
    pub oid: ObjectId,
}

/// Refs of a remote, in the order the remote listed them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdvertisedRefs {
    refs: Vec<RemoteRef>,
    capabilities: Vec<String>,
}

impl AdvertisedRefs {
    pub fn parse(data: &[u8]) -> Result<Self, ProtocolError> {
        let mut reader = PktLineReader::new(data);
        let mut advertised = AdvertisedRefs::default();

        let mut line = reader.read_line()?;
        if let Some(text) = line.and_then(|line| line.text())
            && text.starts_with(SERVICE_ANNOUNCEMENT)
        {
            if reader.read_line()? != Some(PktLine::Flush) {
                return Err(ProtocolError::MissingFlush);
            }
            line = reader.read_line()?;
        }

        while let Some(PktLine::Data(_)) = line {
            let text = line.and_then(|line| line.text()).unwrap_or_default();
            advertised.push_line(text)?;
            line = reader.read_line()?;
        }

        Ok(advertised)
    }

    fn push_line(&mut self, text: &[u8]) -> Result<(), ProtocolError> {
        let malformed = || ProtocolError::MalformedRef(String::from_utf8_lossy(text).into_owned());

        let (record, capabilities) = match text.iter().position(|byte| *byte == 0) {
            Some(nul) => (&text[..nul], Some(&text[nul + 1..])),
            None => (text, None),
        };

        if let Some(capabilities) = capabilities {
            let capabilities = std::str::from_utf8(capabilities).map_err(|_| malformed())?;
            self.capabilities = capabilities.split_whitespace().map(String::from).collect();
        }

        let record = std::str::from_utf8(record).map_err(|_| malformed())?;
        let (hex, name) = record.split_once(' ').ok_or_else(malformed)?;
        let oid = ObjectId::try_parse(hex).map_err(|_| malformed())?;

        if name.is_empty() {
            return Err(malformed());
        }
        if name.ends_with(PEELED_SUFFIX) {
            return Ok(());
        }

        self.refs.push(RemoteRef {
            name: name.to_string(),
            oid,
        });

        Ok(())
    }

    pub fn refs(&self) -> &[RemoteRef] {
        &self.refs
    }

    pub fn get(&self, name: &str) -> Option<ObjectId> {
        self.refs
            .iter()
            .find(|remote_ref| remote_ref.name == name)
            .map(|remote_ref| remote_ref.oid)
    }

    pub fn capabilities(&self) -> &[String] {
        &self.capabilities
    }

    /// Ref HEAD points at, when the remote advertises it
    pub fn head_symref(&self) -> Option<&str> {
        self.capabilities
            .iter()
            .find_map(|capability| capability.strip_prefix(HEAD_SYMREF_PREFIX))
    }

    pub fn len(&self) -> usize {
        self.refs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }
}
