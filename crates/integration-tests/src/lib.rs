//! Integration tests for the NexusMarket cart.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p nexus-market-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_scenarios` - End-to-end cart flows against the file-backed store
//! - `cart_persistence` - Restore, corruption and shared-profile behaviour
//!
//! The helpers here give each test its own throwaway storage directory, which
//! plays the role of one browser profile.

use std::path::Path;

use nexus_market_cart::{CartStore, FileStore, RecordingSink, DEFAULT_CART_KEY};
use nexus_market_core::{Price, ProductId};
use tempfile::TempDir;

pub use nexus_market_cart::ProductSnapshot;

/// A throwaway storage directory standing in for one browser profile.
pub struct TestProfile {
    dir: TempDir,
}

impl TestProfile {
    /// Create a fresh, empty profile.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory cannot be created.
    #[must_use]
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("Failed to create temp dir"),
        }
    }

    /// Directory backing the profile.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Storage handle for the profile.
    ///
    /// # Panics
    ///
    /// Panics if the directory cannot be opened.
    #[must_use]
    pub fn storage(&self) -> FileStore {
        FileStore::open(self.dir.path()).expect("Failed to open file store")
    }

    /// Open the cart stored in this profile, recording its notices.
    #[must_use]
    pub fn open_cart(&self) -> (CartStore<FileStore, RecordingSink>, RecordingSink) {
        let sink = RecordingSink::new();
        (CartStore::open(self.storage(), sink.clone()), sink)
    }

    /// Raw snapshot file contents, if any.
    #[must_use]
    pub fn raw_snapshot(&self) -> Option<String> {
        std::fs::read_to_string(self.dir.path().join(format!("{DEFAULT_CART_KEY}.json"))).ok()
    }

    /// Overwrite the snapshot file directly.
    ///
    /// # Panics
    ///
    /// Panics if the file cannot be written.
    pub fn write_raw_snapshot(&self, raw: &str) {
        std::fs::write(self.dir.path().join(format!("{DEFAULT_CART_KEY}.json")), raw)
            .expect("Failed to write snapshot");
    }
}

impl Default for TestProfile {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a catalog product.
///
/// # Panics
///
/// Panics if `id` is blank.
#[must_use]
pub fn product(id: &str, price: i64, stock: u32) -> ProductSnapshot {
    ProductSnapshot {
        id: ProductId::parse(id).expect("valid product id"),
        name: format!("Product {id}"),
        price: Price::from_units(price),
        image_url: Some(format!("https://res.cloudinary.com/nexus/{id}.jpg")),
        stock,
    }
}

/// Parse a product ID.
///
/// # Panics
///
/// Panics if `id` is blank.
#[must_use]
pub fn pid(id: &str) -> ProductId {
    ProductId::parse(id).expect("valid product id")
}
