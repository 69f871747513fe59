// Integration tests for the export protocol
// Tests cover: shared/exclusive exclusion, scoped release, access checks, destruction

use bytes::Bytes;
use exportbuf::{
    BufferConfig, BufferOwner, ExportError, ExportFlags, ExportMode, ExportState, Exporter,
    ImmutableView, MutableView,
};

// ============================================================================
// Mutual Exclusion
// ============================================================================

#[test]
fn test_shared_views_block_exclusive() {
    let owner = BufferOwner::new(1000);

    let h1 = owner.acquire(ExportMode::Immutable).expect("first reader");
    assert_eq!(owner.state(), ExportState::Shared(1));

    let h2 = owner.acquire(ExportMode::Immutable).expect("second reader");
    assert_eq!(owner.state(), ExportState::Shared(2));

    assert_eq!(
        owner.acquire(ExportMode::Exclusive).unwrap_err(),
        ExportError::ConflictingExclusive,
        "Exclusive must be refused while readers are live"
    );
    assert_eq!(
        owner.state(),
        ExportState::Shared(2),
        "A refused request must not change state"
    );

    drop(h1);
    drop(h2);
    assert_eq!(owner.state(), ExportState::Idle);
}

#[test]
fn test_exclusive_blocks_all_exports() {
    let owner = BufferOwner::new(1000);

    let writer = owner.acquire(ExportMode::Exclusive).expect("writer");
    assert_eq!(owner.state(), ExportState::Exclusive);

    assert_eq!(
        owner.acquire(ExportMode::Exclusive).unwrap_err(),
        ExportError::AlreadyExclusive
    );
    assert_eq!(
        owner.acquire(ExportMode::Immutable).unwrap_err(),
        ExportError::AlreadyExclusive
    );

    drop(writer);
    assert_eq!(owner.state(), ExportState::Idle);
}

#[test]
fn test_exclusive_after_readers_leave() {
    let owner = BufferOwner::new(8);
    {
        let _a = owner.acquire(ExportMode::Immutable).unwrap();
        let _b = owner.acquire(ExportMode::Immutable).unwrap();
    }
    let writer = owner.acquire(ExportMode::Exclusive);
    assert!(writer.is_ok(), "Exclusive should be granted once idle");
}

#[test]
fn test_shared_count_is_unbounded() {
    let owner = BufferOwner::new(8);
    let views: Vec<_> = (0..512)
        .map(|_| owner.acquire(ExportMode::Immutable).unwrap())
        .collect();
    assert_eq!(owner.state(), ExportState::Shared(512));
    assert_eq!(owner.immutable_references(), 512);
    drop(views);
    assert_eq!(owner.state(), ExportState::Idle);
}

// ============================================================================
// Reads and Writes
// ============================================================================

#[test]
fn test_write_then_read_back() {
    let owner = BufferOwner::new(1000);

    let mut writer = owner.acquire(ExportMode::Exclusive).unwrap();
    writer.set(5, 0x42).unwrap();
    drop(writer);
    assert_eq!(owner.state(), ExportState::Idle);

    let reader = owner.acquire(ExportMode::Immutable).unwrap();
    assert_eq!(reader.get(5), Ok(0x42));
    assert_eq!(reader.get(4), Ok(0), "Untouched bytes stay zeroed");
}

#[test]
fn test_immutable_refuses_write_and_bounds() {
    let owner = BufferOwner::new(1000);
    let mut reader = owner.acquire(ExportMode::Immutable).unwrap();

    assert_eq!(reader.set(0, 1), Err(ExportError::NotWritable));
    assert_eq!(
        reader.get(1000),
        Err(ExportError::OutOfRange {
            index: 1000,
            len: 1000
        })
    );
    assert_eq!(reader.get(0), Ok(0), "A refused write changes nothing");
}

#[test]
fn test_snapshot_is_detached() {
    let owner = BufferOwner::new(4);

    let snapshot = {
        let mut writer = owner.acquire(ExportMode::Exclusive).unwrap();
        writer.write().unwrap().copy_from_slice(b"abcd");
        writer.to_bytes().unwrap()
    };

    let mut writer = owner.acquire(ExportMode::Exclusive).unwrap();
    writer.set(0, b'z').unwrap();

    assert_eq!(snapshot, Bytes::from_static(b"abcd"));
    assert_eq!(writer.copy_range(0..2).unwrap(), Bytes::from_static(b"zb"));
}

#[test]
fn test_layout_metadata() {
    let owner = BufferOwner::new(32);
    let reader = owner.acquire(ExportMode::Immutable).unwrap();
    let layout = reader.layout();
    assert_eq!(layout.len, 32);
    assert_eq!(layout.item_size, 1);
    assert!(layout.readonly);
    assert!(reader.is_contiguous());
    drop(reader);

    let writer = owner.acquire(ExportMode::Exclusive).unwrap();
    assert!(!writer.layout().readonly);
}

// ============================================================================
// Request Flags
// ============================================================================

#[test]
fn test_flags_select_mode() {
    let owner = BufferOwner::new(8);

    let reader = owner.acquire_with_flags(ExportFlags::IMMUTABLE).unwrap();
    assert_eq!(reader.mode(), ExportMode::Immutable);
    drop(reader);

    let writer = owner.acquire_with_flags(ExportFlags::EXCLUSIVE).unwrap();
    assert_eq!(writer.mode(), ExportMode::Exclusive);
}

#[test]
fn test_flags_must_name_one_mode() {
    let owner = BufferOwner::new(8);
    let both = ExportFlags::IMMUTABLE | ExportFlags::EXCLUSIVE;

    assert_eq!(
        owner.acquire_with_flags(both).unwrap_err(),
        ExportError::InvalidMode { flags: both }
    );
    assert!(matches!(
        owner.acquire_with_flags(ExportFlags::NONE).unwrap_err(),
        ExportError::InvalidMode { .. }
    ));
    assert_eq!(owner.state(), ExportState::Idle);
}

#[test]
fn test_flag_errors_ordered_like_state_errors() {
    let owner = BufferOwner::new(8);
    let both = ExportFlags::IMMUTABLE | ExportFlags::EXCLUSIVE;

    let reader = owner.acquire(ExportMode::Immutable).unwrap();
    assert_eq!(
        owner.acquire_with_flags(both).unwrap_err(),
        ExportError::ConflictingExclusive
    );
    drop(reader);

    let _writer = owner.acquire(ExportMode::Exclusive).unwrap();
    assert_eq!(
        owner.acquire_with_flags(ExportFlags::NONE).unwrap_err(),
        ExportError::AlreadyExclusive
    );
}

// ============================================================================
// Release Semantics
// ============================================================================

#[test]
fn test_double_release_is_single_release() {
    let owner = BufferOwner::new(8);
    let mut a = owner.acquire(ExportMode::Immutable).unwrap();
    let b = owner.acquire(ExportMode::Immutable).unwrap();

    a.release();
    a.release();
    drop(a);

    assert_eq!(owner.state(), ExportState::Shared(1));
    drop(b);
    assert_eq!(owner.state(), ExportState::Idle);
}

#[test]
fn test_release_on_early_return() {
    fn fails_midway(owner: &BufferOwner) -> Result<(), ExportError> {
        let mut writer = owner.acquire(ExportMode::Exclusive)?;
        writer.set(0, 1)?;
        writer.set(owner.len(), 1)?;
        Ok(())
    }

    let owner = BufferOwner::new(8);
    assert!(matches!(
        fails_midway(&owner),
        Err(ExportError::OutOfRange { .. })
    ));
    assert_eq!(owner.state(), ExportState::Idle);

    let reader = owner.acquire(ExportMode::Immutable).unwrap();
    assert_eq!(reader.get(0), Ok(1), "Writes before the failure persist");
}

#[test]
fn test_release_on_panic_unwind() {
    let owner = BufferOwner::new(8);
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        let _writer = owner.acquire(ExportMode::Exclusive).unwrap();
        panic!("consumer failed");
    }));
    assert!(result.is_err());
    assert_eq!(owner.state(), ExportState::Idle);
}

// ============================================================================
// Client Views
// ============================================================================

#[test]
fn test_views_over_shared_owner() {
    let owner = std::sync::Arc::new(BufferOwner::new(16));

    {
        let mut writer = MutableView::new(&owner).unwrap();
        writer.copy_from_slice(0, b"hello").unwrap();
        assert_eq!(
            ImmutableView::new(&owner).unwrap_err(),
            ExportError::AlreadyExclusive
        );
    }

    let a = ImmutableView::new(&owner).unwrap();
    let b = ImmutableView::new(&*owner).unwrap();
    assert_eq!(&a.to_bytes()[..5], b"hello");
    assert_eq!(a.to_bytes(), b.to_bytes());
    assert_eq!(
        MutableView::new(&owner).unwrap_err(),
        ExportError::ConflictingExclusive
    );
}

#[test]
fn test_views_reject_wide_items() {
    let config = BufferConfig::new(64).unwrap().with_item_size(8);
    let owner = BufferOwner::with_config(config).unwrap();

    // Raw handles are still available; only the byte views refuse.
    let handle = owner.export(ExportMode::Immutable).unwrap();
    assert_eq!(handle.layout().item_count(), 8);
    drop(handle);

    assert_eq!(
        ImmutableView::new(&owner).unwrap_err(),
        ExportError::NotContiguous
    );
    assert_eq!(owner.state(), ExportState::Idle);
}

// ============================================================================
// Destruction
// ============================================================================

#[test]
fn test_destroy_when_idle() {
    let owner = BufferOwner::new(1000);
    {
        let _r = owner.acquire(ExportMode::Immutable).unwrap();
    }
    {
        let _w = owner.acquire(ExportMode::Exclusive).unwrap();
    }
    assert_eq!(owner.state(), ExportState::Idle);
    owner.destroy();
}

#[test]
#[should_panic(expected = "deallocated buffer object has exported buffers")]
fn test_destroy_with_leaked_exclusive_panics() {
    let owner = BufferOwner::new(8);
    std::mem::forget(owner.acquire(ExportMode::Exclusive).unwrap());
    owner.destroy();
}

#[test]
#[should_panic(expected = "deallocated buffer object has exported buffers")]
fn test_drop_with_leaked_shared_panics() {
    let owner = BufferOwner::new(8);
    std::mem::forget(owner.acquire(ExportMode::Immutable).unwrap());
    drop(owner);
}
