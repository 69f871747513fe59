//! Shared readers, one exclusive writer, and the errors in between.
//!
//! Run with:
//!     cargo run --example shared_and_exclusive

use exportbuf::{BufferOwner, ExportMode, ImmutableView, MutableView};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let owner = BufferOwner::new(1000);
    println!("Owner: {} bytes, state {}\n", owner.len(), owner.state());

    // Fill the buffer through the exclusive view
    {
        let mut writer = MutableView::new(&owner)?;
        writer.copy_from_slice(0, b"hello, exports")?;
        writer.set(5, b'!')?;
        println!("Writing with state {}", owner.state());

        match ImmutableView::new(&owner) {
            Ok(_) => unreachable!("a reader was granted alongside the writer"),
            Err(err) => println!("  reader refused: {}", err),
        }
    }

    // Any number of readers once the writer is gone
    let readers: Vec<_> = (0..3)
        .map(|_| ImmutableView::new(&owner))
        .collect::<Result<_, _>>()?;
    println!("\nReading with state {}", owner.state());

    let snapshot = readers[0].to_bytes();
    println!("  first 14 bytes: {:?}", String::from_utf8_lossy(&snapshot[..14]));

    if let Err(err) = owner.acquire(ExportMode::Exclusive) {
        println!("  writer refused: {}", err);
    }

    drop(readers);
    println!("\nAll views released, state {}", owner.state());
    owner.destroy();

    Ok(())
}
