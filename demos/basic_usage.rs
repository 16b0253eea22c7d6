//! Basic usage of anystore.
//!
//! This example stores a few versions of a file on the local file system,
//! lists them and downloads the latest one.
//!
//! Run with: `cargo run --example basic_usage`

use anystore::*;
use std::fs;

fn main() -> Result<()> {
    println!("=== anystore Basic Usage Example ===\n");

    let workdir = tempfile::tempdir().map_err(|e| StoreError::Io {
        operation: "tempdir",
        path: std::env::temp_dir(),
        source: e,
    })?;
    let host = workdir.path().join("host");

    // --- Creating a repository ---
    println!("1. Creating repository 'data'...");
    let registry = Registry::new();
    let repo = Repository::new("data", host.to_string_lossy(), BackendKind::FileSystem);
    let store = registry.create(&repo)?;
    println!("   Opened {repo}");

    // --- Uploading versions ---
    println!("\n2. Uploading versions...");
    let interface = Versioned::new(store);
    let src = workdir.path().join("local.txt");
    for (version, content) in [("1.0.0", "first"), ("2.0.0", "second"), ("10.0.0", "third")] {
        fs::write(&src, content).map_err(|e| StoreError::Io {
            operation: "write",
            path: src.clone(),
            source: e,
        })?;
        interface.put_file(&src, "/a/b.txt", version, TransferOptions::VALIDATE)?;
        println!("   /a/b.txt @ {version} -> {}", interface.path("/a/b.txt", version)?);
    }

    // Uploading unchanged content again is skipped
    interface.put_file(&src, "/a/b.txt", "10.0.0", TransferOptions::default())?;

    // --- Listing ---
    println!("\n3. Listing...");
    for entry in interface.ls("/a/b.txt", &ListOptions::default())? {
        println!("   {} {} ({})", entry.path, entry.version, entry.physical);
    }
    let latest = interface.latest_version("/a/b.txt")?;
    println!("   latest version: {latest}");

    // --- Downloading ---
    println!("\n4. Downloading latest version...");
    let dst = workdir.path().join("out/b.txt");
    let dst = interface.get_file("/a/b.txt", &dst, &latest, TransferOptions::VALIDATE)?;
    println!("   {} checksum {}", dst.display(), md5_file(&dst)?);

    // --- Cleaning up ---
    println!("\n5. Deleting repository...");
    registry.delete(&repo)?;
    println!("   Remaining repositories: {:?}", registry.available());

    println!("\n=== Done ===");
    Ok(())
}
