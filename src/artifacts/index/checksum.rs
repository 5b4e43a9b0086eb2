use crate::artifacts::index::CHECKSUM_SIZE;
use anyhow::{anyhow, Result};
use bytes::Bytes;
use file_guard::FileGuard;
use sha1::{Digest, Sha1};
use std::io::{Read, Write};
use std::ops::DerefMut;

/// Checksummed reader/writer over the locked index file
///
/// Every byte that passes through is fed to a running SHA-1, so the trailing
/// digest can be verified on read and appended on write.
#[derive(Debug)]
pub struct Checksum<'f> {
    file: FileGuard<&'f mut std::fs::File>,
    digest: Sha1,
}

impl<'f> Checksum<'f> {
    pub(crate) fn new(file: FileGuard<&'f mut std::fs::File>) -> Self {
        Checksum {
            file,
            digest: Sha1::new(),
        }
    }

    pub(crate) fn read(&mut self, size: usize) -> Result<Bytes> {
        let mut buffer = vec![0; size];
        self.file
            .deref_mut()
            .read_exact(&mut buffer)
            .map_err(|_| anyhow!("unexpected end-of-file while reading index"))?;

        self.digest.update(&buffer);
        Ok(Bytes::from(buffer))
    }

    pub(crate) fn write(&mut self, data: &[u8]) -> Result<()> {
        self.file.deref_mut().write_all(data)?;
        self.digest.update(data);

        Ok(())
    }

    /// Append the digest of everything written so far
    pub(crate) fn write_checksum(&mut self) -> Result<()> {
        let checksum = self.digest.clone().finalize();
        self.file
            .deref_mut()
            .write_all(checksum.as_slice())
            .map_err(|_| anyhow!("failed to write the index checksum"))?;

        Ok(())
    }

    /// Compare the trailing digest against everything read so far
    pub(crate) fn verify(&mut self) -> Result<()> {
        let mut stored = [0u8; CHECKSUM_SIZE];
        self.file.deref_mut().read_exact(&mut stored)?;

        let computed = self.digest.clone().finalize();
        if stored != computed.as_slice() {
            return Err(anyhow!("index checksum does not match its content"));
        }

        Ok(())
    }
}
