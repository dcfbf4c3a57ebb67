use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use crate::codec::{WrappedKey, MAX_INTERNAL_KEYS, MAX_WRAPPED_KEY_LEN};
use crate::error::{error_codes, KmgrError, KmgrResult};

/// Size of every key file: a 4-byte little-endian wrapped length
/// followed by the full wrapped-key buffer. Writing a constant size
/// regardless of the actual wrapped length keeps a short read or a
/// partially written file detectable by size alone.
pub const KEY_FILE_SIZE: usize = 4 + MAX_WRAPPED_KEY_LEN;

/// Path of the key file for the given identifier. Pure and total.
pub fn key_file_path(dir: &Path, id: usize) -> PathBuf {
    dir.join(format!("{:04X}", id))
}

fn is_key_file_name(name: &str) -> bool {
    name.len() == 4
        && name
            .chars()
            .all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c))
}

/// Write the full wrapped key set to the given directory
///
/// Creates the directory if needed and overwrites any existing key
/// files. Each file and the directory itself are synced before this
/// returns, since the recovery logic trusts on-disk presence and size
/// as commit evidence.
pub fn write_all(dir: &Path, keys: &[WrappedKey]) -> KmgrResult<()> {
    fs::create_dir_all(dir).map_err(|e| KmgrError::filesystem("create directory", dir, e))?;

    for (id, key) in keys.iter().enumerate() {
        let path = key_file_path(dir, id);

        let mut record = [0u8; KEY_FILE_SIZE];
        record[..4].copy_from_slice(&(key.len() as u32).to_le_bytes());
        record[4..4 + key.len()].copy_from_slice(key.as_bytes());

        let mut file =
            File::create(&path).map_err(|e| KmgrError::filesystem("create file", &path, e))?;
        file.write_all(&record)
            .map_err(|e| KmgrError::filesystem("write file", &path, e))?;
        file.sync_all()
            .map_err(|e| KmgrError::filesystem("sync file", &path, e))?;
    }

    // Sync the directory entry updates as well.
    File::open(dir)
        .and_then(|d| d.sync_all())
        .map_err(|e| KmgrError::filesystem("sync directory", dir, e))?;

    Ok(())
}

/// Read all wrapped keys found in the given directory
///
/// Entries whose names are not a four-digit uppercase hex identifier
/// are ignored. Returns one slot per defined identifier plus the number
/// of slots filled; a partial store is not an error here, because the
/// recovery logic uses exactly that count to classify an interrupted
/// rotation. Identifiers out of range, more entries than defined keys,
/// or a file of the wrong size are `CorruptStore`.
pub fn read_all(dir: &Path) -> KmgrResult<(Vec<Option<WrappedKey>>, usize)> {
    let entries =
        fs::read_dir(dir).map_err(|e| KmgrError::filesystem("open directory", dir, e))?;

    let mut keys: Vec<Option<WrappedKey>> = vec![None; MAX_INTERNAL_KEYS];
    let mut count = 0;

    for entry in entries {
        let entry = entry.map_err(|e| KmgrError::filesystem("read directory", dir, e))?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if !is_key_file_name(name) {
            continue;
        }

        // The name is four hex digits, so parsing cannot overflow.
        let id = usize::from_str_radix(name, 16).map_err(|_| {
            KmgrError::corrupt_store(
                dir,
                &format!("unparseable key file name \"{}\"", name),
                error_codes::STORE_INVALID_IDENTIFIER,
            )
        })?;
        if id >= MAX_INTERNAL_KEYS {
            return Err(KmgrError::corrupt_store(
                dir,
                &format!("invalid cryptographic key identifier {}", id),
                error_codes::STORE_INVALID_IDENTIFIER,
            ));
        }
        if count >= MAX_INTERNAL_KEYS {
            return Err(KmgrError::corrupt_store(
                dir,
                "too many cryptographic key files",
                error_codes::STORE_TOO_MANY_KEYS,
            ));
        }

        keys[id] = Some(read_one_keyfile(dir, id)?);
        count += 1;
    }

    Ok((keys, count))
}

fn read_one_keyfile(dir: &Path, id: usize) -> KmgrResult<WrappedKey> {
    let path = key_file_path(dir, id);

    let mut file = File::open(&path).map_err(|e| KmgrError::filesystem("open file", &path, e))?;
    let mut record = Vec::with_capacity(KEY_FILE_SIZE);
    file.read_to_end(&mut record)
        .map_err(|e| KmgrError::filesystem("read file", &path, e))?;

    if record.len() != KEY_FILE_SIZE {
        return Err(KmgrError::corrupt_store(
            &path,
            &format!("read {} of {} bytes", record.len(), KEY_FILE_SIZE),
            error_codes::STORE_SIZE_MISMATCH,
        ));
    }

    let len = u32::from_le_bytes([record[0], record[1], record[2], record[3]]) as usize;
    if len > MAX_WRAPPED_KEY_LEN {
        return Err(KmgrError::corrupt_store(
            &path,
            &format!("wrapped key length {} out of range", len),
            error_codes::STORE_SIZE_MISMATCH,
        ));
    }

    WrappedKey::from_bytes(&record[4..4 + len])
}
