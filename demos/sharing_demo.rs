//! Sharing walkthrough for Sealdrop
//!
//! This example demonstrates:
//! - Registering two identities
//! - Uploading an encrypted file
//! - Sharing it with a second identity
//! - Retrieving it as the grantee
//!
//! Everything runs in memory. Run with: cargo run --example sharing_demo

use sealdrop_client::{Backends, Config, FileQuery, FixedPassword, Session, UploadOptions};
use sealdrop_core::MemorySecureStore;
use std::sync::Arc;

fn device(network: &Backends) -> Backends {
    Backends::new(
        network.blobs.clone(),
        network.ledger.clone(),
        Arc::new(MemorySecureStore::new()),
    )
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    println!("🔐 Sealdrop - Sharing Demo\n");

    let network = Backends::in_memory();
    let alice = Session::new(
        "alice".parse()?,
        device(&network),
        Arc::new(FixedPassword::new("alice's password")),
        Config::default(),
    )?;
    let bob = Session::new(
        "bob".parse()?,
        device(&network),
        Arc::new(FixedPassword::new("bob's password")),
        Config::default(),
    )?;

    // ==================== Registration ====================

    println!("👤 Registering alice and bob...");
    alice.register_identity(false).await?;
    bob.register_identity(false).await?;
    println!("   ✅ Public keys on the ledger");

    // ==================== Upload ====================

    println!("\n📤 Alice uploads 'hello.txt'...");
    let record = alice
        .upload(b"HELLOWRLD", UploadOptions::private("txt"))
        .await?;
    println!("   ✅ Ciphertext: {}", record.content_address);
    println!("   ✅ Key blob:   {}", record.key_blob_address);

    // ==================== Sharing ====================

    println!("\n🤝 Alice shares with bob...");
    let grant = alice.share(&record.content_address, bob.identity()).await?;
    println!("   ✅ Bob's key blob: {}", grant.key_blob_address);

    println!("\n📥 Bob retrieves the file...");
    let file = bob.retrieve(&record.content_address).await?;
    println!(
        "   ✅ {} -> {:?}",
        file.file_name(),
        String::from_utf8_lossy(&file.data)
    );

    // ==================== Listing ====================

    println!("\n📋 Alice's files:");
    for record in alice.list_files(&FileQuery::default()).await? {
        println!("   - {} ({})", record.content_address, record.created_at);
    }
    println!("\n📋 Shared with bob:");
    for grant in bob.list_shared_with_me().await? {
        println!("   - {} from {}", grant.content_address, grant.grantor);
    }

    println!("\n✨ Done");
    Ok(())
}
