use super::{log_file_name, AppendError, LogWriter, ProvisionError, SessionPhase};
use crate::{
    config::LOG_FILE_ATTEMPTS,
    console::Console,
    rate::{HeartRate, RateConverter},
    testing::{FakeError, FakeStorage, FakeTransport},
};

fn record(bpm: f32) -> crate::rate::LogRecord {
    RateConverter::format(HeartRate::from_bpm(bpm))
}

fn active_writer(storage: FakeStorage) -> (LogWriter<FakeStorage>, Console<FakeTransport>) {
    let mut console = Console::new(FakeTransport::default());
    let mut writer = LogWriter::new(storage);
    writer.provision(&mut console).unwrap();
    (writer, console)
}

#[test]
fn file_names_are_zero_padded() {
    assert_eq!(log_file_name(0).as_str(), "hlog000.txt");
    assert_eq!(log_file_name(7).as_str(), "hlog007.txt");
    assert_eq!(log_file_name(249).as_str(), "hlog249.txt");
}

#[test]
fn provisioning_takes_first_name_on_empty_card() {
    let (writer, console) = active_writer(FakeStorage::default());
    assert_eq!(writer.phase(), SessionPhase::Active);
    assert_eq!(writer.file_name(), Some("hlog000.txt"));
    assert_eq!(writer.storage().attempts, vec!["hlog000.txt"]);
    assert!(console.transport().text().contains("file opened successfully"));
}

#[test]
fn provisioning_skips_existing_names_in_order() {
    let (writer, _) = active_writer(FakeStorage::with_existing(5));
    let expected: Vec<String> = (0..=5)
        .map(|index| log_file_name(index).as_str().to_owned())
        .collect();
    assert_eq!(writer.storage().attempts, expected);
    assert_eq!(writer.file_name(), Some("hlog005.txt"));
    assert_eq!(writer.storage().created.as_deref(), Some("hlog005.txt"));
}

#[test]
fn provisioning_echoes_previous_result_code() {
    let (_, console) = active_writer(FakeStorage::with_existing(2));
    let text = console.transport().text();
    assert!(text.contains("res = 4 trying hlog000.txt\n\r"));
    assert!(text.contains("res = 8 trying hlog001.txt\n\r"));
    assert!(text.contains("res = 8 trying hlog002.txt\n\r"));
}

#[test]
fn provisioning_gives_up_after_bound_without_extra_attempt() {
    let mut console = Console::new(FakeTransport::default());
    let mut writer = LogWriter::new(FakeStorage::with_existing(LOG_FILE_ATTEMPTS));

    let err = writer.provision(&mut console).unwrap_err();
    assert_eq!(
        err,
        ProvisionError::Exhausted {
            attempts: LOG_FILE_ATTEMPTS
        }
    );
    assert_eq!(writer.storage().attempts.len(), LOG_FILE_ATTEMPTS as usize);
    assert_eq!(
        writer.storage().attempts.last().map(String::as_str),
        Some("hlog249.txt")
    );
    assert_eq!(writer.phase(), SessionPhase::Stopped);
    assert!(console.transport().text().ends_with("file open failed\n\r"));
}

#[test]
fn mount_failure_is_fatal_before_any_create() {
    let mut console = Console::new(FakeTransport::default());
    let storage = FakeStorage {
        fail_mount: true,
        ..FakeStorage::default()
    };
    let mut writer = LogWriter::new(storage);

    let err = writer.provision(&mut console).unwrap_err();
    assert_eq!(err, ProvisionError::Mount(FakeError::NoCard));
    assert!(writer.storage().attempts.is_empty());
    assert_eq!(writer.phase(), SessionPhase::Stopped);
    assert!(console.transport().text().contains("mount failed"));
}

#[test]
fn hard_create_error_is_not_retried() {
    let mut console = Console::new(FakeTransport::default());
    let storage = FakeStorage {
        fail_create: true,
        ..FakeStorage::default()
    };
    let mut writer = LogWriter::new(storage);

    let err = writer.provision(&mut console).unwrap_err();
    assert_eq!(err, ProvisionError::Create(FakeError::Io));
    assert_eq!(writer.storage().attempts.len(), 1);
    assert_eq!(writer.phase(), SessionPhase::Stopped);
}

#[test]
fn provisioning_twice_is_rejected() {
    let (mut writer, mut console) = active_writer(FakeStorage::default());
    assert_eq!(
        writer.provision(&mut console),
        Err(ProvisionError::NotProvisioning)
    );
    assert_eq!(writer.phase(), SessionPhase::Active);
}

#[test]
fn append_writes_and_flushes_each_record() {
    let (mut writer, mut console) = active_writer(FakeStorage::default());
    writer.append(&record(72.0), &mut console).unwrap();
    writer.append(&record(142.0), &mut console).unwrap();

    assert_eq!(writer.storage().written_text(), " 72\n142\n");
    assert_eq!(writer.storage().append_calls, 2);
    assert_eq!(writer.storage().flush_calls, 2);
    assert_eq!(writer.phase(), SessionPhase::Active);
}

#[test]
fn append_before_provisioning_touches_nothing() {
    let mut console = Console::new(FakeTransport::default());
    let mut writer = LogWriter::new(FakeStorage::default());
    assert_eq!(
        writer.append(&record(72.0), &mut console),
        Err(AppendError::NotActive)
    );
    assert_eq!(writer.storage().append_calls, 0);
}

#[test]
fn flush_failure_stops_all_further_appends() {
    let storage = FakeStorage {
        fail_flush_on: Some(2),
        ..FakeStorage::default()
    };
    let (mut writer, mut console) = active_writer(storage);

    writer.append(&record(72.0), &mut console).unwrap();
    assert_eq!(
        writer.append(&record(73.0), &mut console),
        Err(AppendError::Flush(FakeError::Io))
    );
    assert_eq!(writer.phase(), SessionPhase::Stopped);

    assert_eq!(
        writer.append(&record(74.0), &mut console),
        Err(AppendError::NotActive)
    );
    assert_eq!(writer.storage().append_calls, 2);
    assert_eq!(writer.storage().flush_calls, 2);
    assert!(console.transport().text().contains("error syncing to disk."));
}

#[test]
fn short_write_stops_without_flushing() {
    let storage = FakeStorage {
        short_write_on: Some(1),
        ..FakeStorage::default()
    };
    let (mut writer, mut console) = active_writer(storage);

    assert_eq!(
        writer.append(&record(72.0), &mut console),
        Err(AppendError::ShortWrite {
            written: 3,
            expected: 4
        })
    );
    assert_eq!(writer.storage().flush_calls, 0);
    assert_eq!(writer.phase(), SessionPhase::Stopped);
    assert!(console.transport().text().contains("Oops, only wrote 3 bytes"));
}

#[test]
fn write_error_stops_session() {
    let storage = FakeStorage {
        fail_write_on: Some(1),
        ..FakeStorage::default()
    };
    let (mut writer, mut console) = active_writer(storage);
    assert_eq!(
        writer.append(&record(72.0), &mut console),
        Err(AppendError::Write(FakeError::Io))
    );
    assert_eq!(writer.phase(), SessionPhase::Stopped);
}
