use std::fs;
use std::path::PathBuf;

use binarch::{
    Archive, Error, FileDecoder, FileEncoder, FileOptions, Mode, Result, Serializable, Severity,
    serialize_from_file, serialize_from_file_with, serialize_to_file, serialize_to_file_with,
    serialize_to_vec,
};
use tempfile::TempDir;

#[derive(Debug, Default, Clone, PartialEq)]
struct Record {
    id: u32,
    delta: i32,
    tag: String,
    samples: Vec<f32>,
    children: Vec<Record>,
}

impl Serializable for Record {
    fn serialize<A: Archive>(&mut self, archive: &mut A) -> Result<()> {
        archive.value(&mut self.id)?;
        archive.value(&mut self.delta)?;
        archive.value(&mut self.tag)?;
        archive.value(&mut self.samples)?;
        archive.value(&mut self.children)
    }
}

fn sample() -> Record {
    Record {
        id: 7,
        delta: -3,
        tag: "root".into(),
        samples: vec![0.5, 1.5, -2.0],
        children: vec![
            Record {
                id: 8,
                tag: "leaf".into(),
                ..Default::default()
            },
            Record {
                id: 9,
                samples: vec![3.25],
                ..Default::default()
            },
        ],
    }
}

fn setup() -> Result<(TempDir, PathBuf)> {
    let temp = TempDir::new()?;
    let path = temp.path().join("record.bin");
    Ok((temp, path))
}

#[test]
fn test_file_round_trip() -> Result<()> {
    let (_temp, path) = setup()?;

    let mut written = sample();
    serialize_to_file(&mut written, &path)?;

    let mut read = Record::default();
    serialize_from_file(&mut read, &path)?;
    assert_eq!(read, written);

    Ok(())
}

#[test]
fn test_file_matches_in_memory_bytes() -> Result<()> {
    let (_temp, path) = setup()?;

    let mut record = sample();
    serialize_to_file(&mut record, &path)?;
    assert_eq!(fs::read(&path)?, serialize_to_vec(&mut record)?);

    Ok(())
}

#[test]
fn test_same_object_to_two_files() -> Result<()> {
    let temp = TempDir::new()?;
    let first = temp.path().join("first.bin");
    let second = temp.path().join("second.bin");

    let mut original = sample();
    serialize_to_file(&mut original, &first)?;
    serialize_to_file(&mut original, &second)?;
    assert_eq!(fs::read(&first)?, fs::read(&second)?);

    let mut a = Record::default();
    let mut b = Record::default();
    serialize_from_file(&mut a, &first)?;
    serialize_from_file(&mut b, &second)?;
    assert_eq!(a, b);
    assert_eq!(a, original);

    Ok(())
}

#[test]
fn test_rewrite_truncates_previous_contents() -> Result<()> {
    let (_temp, path) = setup()?;

    let mut big = sample();
    serialize_to_file(&mut big, &path)?;
    let mut small = 5i32;
    serialize_to_file(&mut small, &path)?;

    assert_eq!(fs::read(&path)?, 5i32.to_ne_bytes());

    Ok(())
}

#[test]
fn test_missing_file_is_recoverable_and_leaves_object() -> Result<()> {
    let temp = TempDir::new()?;
    let path = temp.path().join("absent.bin");

    let mut read = sample();
    let err = serialize_from_file(&mut read, &path).unwrap_err();

    match &err {
        Error::Open { path: p, mode, .. } => {
            assert_eq!(p, &path);
            assert_eq!(*mode, Mode::Read);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(err.severity(), Severity::Recoverable);
    assert_eq!(read, sample());

    Ok(())
}

#[test]
fn test_missing_parent_dir() -> Result<()> {
    let temp = TempDir::new()?;
    let path = temp.path().join("nested").join("deeper").join("record.bin");

    let mut record = sample();
    let err = serialize_to_file(&mut record, &path).unwrap_err();
    assert!(matches!(err, Error::Open { mode: Mode::Write, .. }));
    assert!(!err.is_fatal());
    assert!(!path.exists());

    let options = FileOptions::default().with_create_dirs(true);
    serialize_to_file_with(&mut record, &path, &options)?;

    let mut read = Record::default();
    serialize_from_file_with(&mut read, &path, &options)?;
    assert_eq!(read, record);

    Ok(())
}

#[test]
fn test_options_small_buffer_and_sync() -> Result<()> {
    let (_temp, path) = setup()?;
    let options = FileOptions::new().with_buffer_capacity(3).with_sync(true);

    let mut written = sample();
    serialize_to_file_with(&mut written, &path, &options)?;

    let mut read = Record::default();
    serialize_from_file_with(&mut read, &path, &options)?;
    assert_eq!(read, written);

    Ok(())
}

#[test]
fn test_corrupted_buffer_length_in_file() -> Result<()> {
    let (_temp, path) = setup()?;

    let mut values = vec![10i32, 20, 30];
    serialize_to_file(&mut values, &path)?;

    // Byte-count prefix sits right after the element count.
    let mut bytes = fs::read(&path)?;
    bytes[4..8].copy_from_slice(&16u32.to_ne_bytes());
    fs::write(&path, &bytes)?;

    let mut read = vec![1i32];
    let err = serialize_from_file(&mut read, &path).unwrap_err();
    assert!(matches!(
        err,
        Error::SizeMismatch {
            expected: 12,
            found: 16
        }
    ));
    assert_eq!(err.severity(), Severity::Fatal);
    assert_eq!(read, vec![1]);

    Ok(())
}

#[test]
fn test_truncated_file_is_fatal() -> Result<()> {
    let (_temp, path) = setup()?;

    let mut written = sample();
    serialize_to_file(&mut written, &path)?;
    let bytes = fs::read(&path)?;
    fs::write(&path, &bytes[..bytes.len() / 2])?;

    let mut read = Record::default();
    let err = serialize_from_file(&mut read, &path).unwrap_err();
    assert!(err.is_fatal(), "{err}");

    Ok(())
}

#[test]
fn test_file_archives_report_bytes() -> Result<()> {
    let (_temp, path) = setup()?;

    let mut written = sample();
    let mut encoder = FileEncoder::create(&path)?;
    assert!(encoder.is_write());
    written.serialize(&mut encoder)?;
    let count = encoder.bytes_written();
    let sink = encoder.finish()?;
    assert_eq!(sink.path(), path.as_path());
    drop(sink);

    assert_eq!(fs::metadata(&path)?.len() as usize, count);

    let mut decoder = FileDecoder::open(&path)?;
    assert!(decoder.is_read());
    let mut read = Record::default();
    read.serialize(&mut decoder)?;
    assert_eq!(decoder.bytes_read(), count);
    assert_eq!(read, written);

    Ok(())
}

#[test]
fn test_dropped_encoder_still_closes_file() -> Result<()> {
    let (_temp, path) = setup()?;

    {
        let mut encoder = FileEncoder::create(&path)?;
        let mut value = 42u32;
        value.serialize(&mut encoder)?;
        // Dropped without finish: BufWriter flushes on drop.
    }

    let mut read = 0u32;
    serialize_from_file(&mut read, &path)?;
    assert_eq!(read, 42);

    Ok(())
}
