//! Flat binary persistence for rollbook.
//!
//! The whole store is written as one little-endian `u32` record count
//! followed by that many fixed-size records. The layout mirrors the record
//! declaration order with explicit padding and is internal and unstable:
//! only the build that wrote a file is guaranteed to read it back.
//!
//! An absent file is the normal first-run state and loads as an empty store.
//! A file whose declared count exceeds the store capacity, or whose payload
//! is shorter than the count promises, is reported as corrupt; no record is
//! ever read past the capacity bound.

use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::Path;

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::record::{Marks, StudentRecord, SUBJECT_COUNT};
use crate::store::RecordStore;

/// Size of one serialized record in bytes.
pub const RECORD_SIZE: usize = 120;

/// Size of the on-disk name buffer (NUL-padded).
const NAME_BUF: usize = 50;

/// Size of the on-disk department buffer (NUL-padded).
const DEPARTMENT_BUF: usize = 30;

// Field offsets within a serialized record. The two-byte gaps after the
// text buffers and the three bytes after the grade are zero padding.
const ROLL_OFF: usize = 0;
const NAME_OFF: usize = 4;
const AGE_OFF: usize = 56;
const DEPARTMENT_OFF: usize = 60;
const MARKS_OFF: usize = 92;
const PERCENTAGE_OFF: usize = 112;
const GRADE_OFF: usize = 116;

/// Save the whole store to `path`, overwriting any existing file.
///
/// # Errors
///
/// Returns [`Error::DirectoryCreate`] if the parent directory cannot be
/// created, [`Error::DataFileOpen`] if the file cannot be opened for
/// writing, or [`Error::Io`] if a write fails. The caller decides how to
/// surface the failure; it is never fatal here.
pub fn save(store: &RecordStore, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }

    let file = File::create(path).map_err(|source| Error::DataFileOpen {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::new(file);

    let count = u32::try_from(store.len()).map_err(|_| Error::StoreFull {
        capacity: store.capacity(),
    })?;
    writer.write_all(&count.to_le_bytes())?;

    for record in store.records() {
        writer.write_all(&encode_record(record))?;
    }
    writer.flush()?;

    info!("saved {} record(s) to {}", store.len(), path.display());
    Ok(())
}

/// Load a store from `path`.
///
/// An absent file yields an empty store with the given capacity; that is
/// the expected first-run state, not a failure.
///
/// # Errors
///
/// Returns [`Error::CorruptData`] if the declared record count exceeds
/// `capacity` or the file is shorter than the count promises, or
/// [`Error::Io`] for any other read failure.
pub fn load(path: impl AsRef<Path>, capacity: usize) -> Result<RecordStore> {
    let path = path.as_ref();

    let file = match File::open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            debug!("no data file at {}, starting empty", path.display());
            return Ok(RecordStore::new(capacity));
        }
        Err(err) => return Err(err.into()),
    };
    let mut reader = BufReader::new(file);

    let mut count_buf = [0u8; 4];
    reader
        .read_exact(&mut count_buf)
        .map_err(|_| Error::corrupt(path, "missing record count"))?;
    let count = u32::from_le_bytes(count_buf) as usize;

    if count > capacity {
        return Err(Error::corrupt(
            path,
            format!("record count {count} exceeds capacity {capacity}"),
        ));
    }

    let mut store = RecordStore::new(capacity);
    let mut buf = [0u8; RECORD_SIZE];
    for index in 0..count {
        reader.read_exact(&mut buf).map_err(|_| {
            Error::corrupt(
                path,
                format!("file truncated at record {index} of {count}"),
            )
        })?;
        store
            .add(decode_record(&buf))
            .map_err(|err| Error::corrupt(path, format!("record {index}: {err}")))?;
    }

    info!("loaded {} record(s) from {}", store.len(), path.display());
    Ok(store)
}

/// Serialize one record into its fixed-size layout.
fn encode_record(record: &StudentRecord) -> [u8; RECORD_SIZE] {
    let mut buf = [0u8; RECORD_SIZE];

    buf[ROLL_OFF..ROLL_OFF + 4].copy_from_slice(&record.roll.to_le_bytes());
    write_text(&mut buf[NAME_OFF..NAME_OFF + NAME_BUF], record.name());
    buf[AGE_OFF..AGE_OFF + 4].copy_from_slice(&record.age.to_le_bytes());
    write_text(
        &mut buf[DEPARTMENT_OFF..DEPARTMENT_OFF + DEPARTMENT_BUF],
        record.department(),
    );
    for (i, mark) in record.marks().iter().enumerate() {
        let off = MARKS_OFF + i * 4;
        buf[off..off + 4].copy_from_slice(&mark.to_le_bytes());
    }
    buf[PERCENTAGE_OFF..PERCENTAGE_OFF + 4]
        .copy_from_slice(&record.percentage().to_le_bytes());
    buf[GRADE_OFF] = grade_byte(record.grade());

    buf
}

/// Deserialize one record from its fixed-size layout.
fn decode_record(buf: &[u8; RECORD_SIZE]) -> StudentRecord {
    let roll = u32::from_le_bytes(read4(buf, ROLL_OFF));
    let name = read_text(&buf[NAME_OFF..NAME_OFF + NAME_BUF]);
    let age = u32::from_le_bytes(read4(buf, AGE_OFF));
    let department = read_text(&buf[DEPARTMENT_OFF..DEPARTMENT_OFF + DEPARTMENT_BUF]);

    let mut marks: Marks = [0.0; SUBJECT_COUNT];
    for (i, mark) in marks.iter_mut().enumerate() {
        *mark = f32::from_le_bytes(read4(buf, MARKS_OFF + i * 4));
    }
    let percentage = f32::from_le_bytes(read4(buf, PERCENTAGE_OFF));
    let grade = char::from(buf[GRADE_OFF]);

    StudentRecord::from_parts(roll, name, age, department, marks, percentage, grade)
}

/// Copy text into a NUL-padded fixed buffer; excess bytes are dropped.
fn write_text(buf: &mut [u8], text: &str) {
    let bytes = text.as_bytes();
    let len = bytes.len().min(buf.len().saturating_sub(1));
    buf[..len].copy_from_slice(&bytes[..len]);
}

/// Read text from a NUL-padded fixed buffer, stopping at the first NUL.
fn read_text(buf: &[u8]) -> String {
    let end = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
    String::from_utf8_lossy(&buf[..end]).into_owned()
}

fn read4(buf: &[u8; RECORD_SIZE], off: usize) -> [u8; 4] {
    [buf[off], buf[off + 1], buf[off + 2], buf[off + 3]]
}

fn grade_byte(grade: char) -> u8 {
    if grade.is_ascii() {
        grade as u8
    } else {
        b'?'
    }
}
