//! Hashed shard selection
//!
//! File records are grouped into bucket files named by the first two hex
//! characters of the SHA-1 digest of the file key. Tag records get one file
//! each, placed in a directory named by the same prefix of the tag's digest.
//!
//! The digest and prefix length are part of the on-disk format; changing
//! either orphans every record written before.

use sha1::{Digest, Sha1};

/// Number of hex characters of the digest used as the shard name
pub const SHARD_PREFIX_LEN: usize = 2;

fn shard_of(bytes: &[u8]) -> String {
    let digest = hex::encode(Sha1::digest(bytes));
    digest[..SHARD_PREFIX_LEN].to_string()
}

/// Bucket name for a file key
#[must_use]
pub fn file_shard(key: &str) -> String {
    shard_of(key.as_bytes())
}

/// Shard directory name for a tag
#[must_use]
pub fn tag_shard(name: &str) -> String {
    shard_of(name.as_bytes())
}

/// Returns true if `name` looks like a shard produced by this module
#[must_use]
pub fn is_shard_name(name: &str) -> bool {
    name.len() == SHARD_PREFIX_LEN
        && name.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f'))
}
