#![no_main]

use libfuzzer_sys::fuzz_target;
use exportbuf::{BufferOwner, ExportError, ExportFlags, ExportState, ViewHandle};

const LEN: usize = 64;

fuzz_target!(|data: Vec<u8>| {
    let owner = BufferOwner::new(LEN);
    let mut live: Vec<ViewHandle<'_>> = Vec::new();

    for pair in data.chunks(2) {
        let op = pair[0];
        let arg = pair.get(1).copied().unwrap_or(0) as usize;

        match op % 5 {
            // Acquire with arbitrary flag bits
            0 => {
                if let Ok(handle) = owner.acquire_with_flags(ExportFlags::from_bits(arg as u32)) {
                    live.push(handle);
                }
            }
            // Release
            1 if !live.is_empty() => {
                let mut handle = live.swap_remove(arg % live.len());
                handle.release();
                if op & 0x80 != 0 {
                    handle.release();
                }
            }
            // Write
            2 if !live.is_empty() => {
                let i = arg % live.len();
                let handle = &mut live[i];
                let result = handle.set(arg, op);
                if handle.is_read_only() {
                    assert_eq!(result, Err(ExportError::NotWritable));
                } else {
                    assert_eq!(result.is_ok(), arg < LEN);
                }
            }
            // Read
            3 if !live.is_empty() => {
                let handle = &live[arg % live.len()];
                assert_eq!(handle.get(arg).is_ok(), arg < LEN);
            }
            _ => {}
        }

        // Verify: readers and writer never coexist
        let readers = live.iter().filter(|h| h.is_read_only()).count();
        let writers = live.len() - readers;
        assert!(writers <= 1);
        assert!(writers == 0 || readers == 0);

        // Verify: counters agree with the live handles
        let expected = match (readers, writers) {
            (0, 0) => ExportState::Idle,
            (0, _) => ExportState::Exclusive,
            (n, _) => ExportState::Shared(n),
        };
        assert_eq!(owner.state(), expected);
    }

    drop(live);
    owner.destroy();
});
