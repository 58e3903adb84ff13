use crate::artifacts::objects::object::{Object, ObjectBox};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::GitError;
use anyhow::Context;
use bytes::Bytes;
use fake::rand;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// Decompression buffers start at this multiple of the compressed size
const DECOMPRESSION_SIZE_HINT: usize = 10;
/// Compression buffers start at this multiple of the input size
const COMPRESSION_SIZE_HINT: usize = 2;

/// Content-addressed object store rooted at `.git/objects`
#[derive(Debug)]
pub struct Database {
    path: Box<Path>,
}

// TODO: implement packfiles once loose objects stop scaling
impl Database {
    pub fn new(path: Box<Path>) -> Self {
        Database { path }
    }

    pub fn objects_path(&self) -> &Path {
        &self.path
    }

    pub fn contains(&self, object_id: &ObjectId) -> bool {
        self.path.join(object_id.to_path()).is_file()
    }

    /// Read and decompress an object file, header included
    pub fn load(&self, object_id: &ObjectId) -> anyhow::Result<Bytes> {
        let object_path = self.path.join(object_id.to_path());

        if !object_path.is_file() {
            return Err(GitError::ObjectNotFound(object_id.to_string()).into());
        }

        self.read_object(object_path)
    }

    /// Read an object and build the variant named by its header
    pub fn object_read(&self, object_id: &ObjectId) -> anyhow::Result<ObjectBox> {
        let raw = self.load(object_id)?;
        let (object_type, payload) = Self::parse_header(object_id, &raw)?;
        let payload = raw.slice(raw.len() - payload.len()..);

        tracing::debug!(oid = %object_id, %object_type, size = payload.len(), "read object");

        ObjectBox::parse(object_type, payload)
            .with_context(|| format!("Unable to parse {object_type} object {object_id}"))
    }

    /// Only the type of an object, from its header
    pub fn object_type(&self, object_id: &ObjectId) -> anyhow::Result<ObjectType> {
        let raw = self.load(object_id)?;
        let (object_type, _) = Self::parse_header(object_id, &raw)?;

        Ok(object_type)
    }

    /// An object whose header names no known type is not an object at all
    fn parse_header<'a>(
        object_id: &ObjectId,
        raw: &'a [u8],
    ) -> anyhow::Result<(ObjectType, &'a [u8])> {
        let (type_name, payload) = ObjectType::split_object_header(raw)?;

        let object_type = ObjectType::try_from(type_name).map_err(|_| {
            tracing::debug!(oid = %object_id, type_name, "unknown object type");
            GitError::ObjectNotFound(object_id.to_string())
        })?;

        Ok((object_type, payload))
    }

    /// Hash an object and, when `commit` is set, store it
    ///
    /// The digest is returned either way, so a dry run computes the same ID that a
    /// real write would. An object file that already exists is left untouched.
    pub fn object_write(&self, object: &impl Object, commit: bool) -> anyhow::Result<ObjectId> {
        let raw = object.to_raw()?;
        let object_id = ObjectId::hash(&raw);

        if !commit {
            return Ok(object_id);
        }

        let object_path = self.path.join(object_id.to_path());
        if object_path.exists() {
            tracing::debug!(oid = %object_id, "object already stored");
            return Ok(object_id);
        }

        std::fs::create_dir_all(
            object_path
                .parent()
                .context(format!("Invalid object path {}", object_path.display()))?,
        )
        .context(format!(
            "Unable to create object directory {}",
            object_path.display()
        ))?;

        self.write_object(object_path, raw)?;
        tracing::debug!(oid = %object_id, object_type = %object.object_type(), "wrote object");

        Ok(object_id)
    }

    /// Build an object of type `object_type` from raw payload bytes and write it
    pub fn object_hash(
        &self,
        data: Bytes,
        object_type: ObjectType,
        write: bool,
    ) -> anyhow::Result<ObjectId> {
        let object = ObjectBox::parse(object_type, data)?;
        self.object_write(&object, write)
    }

    fn read_object(&self, object_path: PathBuf) -> anyhow::Result<Bytes> {
        let object_content = std::fs::read(&object_path).context(format!(
            "Unable to read object file {}",
            object_path.display()
        ))?;

        Self::decompress(&object_content)
    }

    fn write_object(&self, object_path: PathBuf, object_content: Bytes) -> anyhow::Result<()> {
        let object_dir = object_path
            .parent()
            .context(format!("Invalid object path {}", object_path.display()))?;
        let temp_object_path = object_dir.join(Self::generate_temp_name());

        let object_content = Self::compress(&object_content)?;

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&temp_object_path)
            .context(format!(
                "Unable to open object file {}",
                temp_object_path.display()
            ))?;

        let written = file
            .write_all(&object_content)
            .context(format!(
                "Unable to write object file {}",
                temp_object_path.display()
            ))
            // rename the temp file to the object file to make it atomic
            .and_then(|_| {
                std::fs::rename(&temp_object_path, &object_path).context(format!(
                    "Unable to rename object file to {}",
                    object_path.display()
                ))
            });

        if written.is_err() {
            drop(file);
            if let Err(e) = std::fs::remove_file(&temp_object_path) {
                tracing::warn!(
                    path = %temp_object_path.display(),
                    error = %e,
                    "unable to remove temp object file"
                );
            }
        }

        written
    }

    pub fn compress(data: &[u8]) -> anyhow::Result<Bytes> {
        let buffer = Vec::with_capacity(data.len() * COMPRESSION_SIZE_HINT);
        let mut encoder = flate2::write::ZlibEncoder::new(buffer, flate2::Compression::default());

        encoder
            .write_all(data)
            .map_err(|e| GitError::CompressionFailure(e.to_string()))?;

        encoder
            .finish()
            .map(Bytes::from)
            .map_err(|e| GitError::CompressionFailure(e.to_string()).into())
    }

    /// Inflate a zlib stream of unknown decompressed size
    pub fn decompress(data: &[u8]) -> anyhow::Result<Bytes> {
        let mut decoder = flate2::read::ZlibDecoder::new(data);
        let mut decompressed_content = Vec::with_capacity(data.len() * DECOMPRESSION_SIZE_HINT);

        decoder
            .read_to_end(&mut decompressed_content)
            .map_err(|e| GitError::CompressionFailure(e.to_string()))?;

        Ok(decompressed_content.into())
    }

    fn generate_temp_name() -> String {
        format!("tmp-obj-{}", rand::random::<u32>())
    }

    /// Find all objects whose ID starts with the given hex prefix
    ///
    /// With 2+ characters only the matching fan-out directory is scanned; shorter
    /// prefixes scan every directory.
    pub fn find_objects_by_prefix(&self, prefix: &str) -> anyhow::Result<Vec<ObjectId>> {
        let prefix = prefix.to_ascii_lowercase();
        let mut matches = Vec::new();

        let dirs = if prefix.len() >= 2 {
            vec![prefix[..2].to_string()]
        } else {
            (0..=255u8).map(|i| format!("{i:02x}")).collect()
        };

        for dir_name in dirs {
            let dir_path = self.path.join(&dir_name);
            if !dir_path.is_dir() {
                continue;
            }

            for entry in std::fs::read_dir(&dir_path)
                .with_context(|| format!("Unable to list {}", dir_path.display()))?
            {
                let file_name = entry?.file_name();
                let full_oid = format!("{}{}", dir_name, file_name.to_string_lossy());

                if full_oid.starts_with(&prefix)
                    && let Ok(oid) = ObjectId::try_parse(full_oid)
                {
                    matches.push(oid);
                }
            }
        }

        matches.sort();
        Ok(matches)
    }
}
