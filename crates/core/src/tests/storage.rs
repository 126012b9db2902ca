//! Test harness for SessionStorage implementations
//!
//! Any backend handed to a `SessionStore` must pass this suite. Browser and
//! native backends run the same checks.

use crate::storage::SessionStorage;

/// Test suite for SessionStorage implementations
pub struct StorageTestSuite<S: SessionStorage> {
    storage: S,
}

impl<S: SessionStorage> StorageTestSuite<S> {
    /// Create a new test suite with the given storage
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Run all tests
    pub fn run_all_tests(&self) {
        self.test_missing_key();
        self.test_set_and_get();
        self.test_overwrite();
        self.test_remove();
        self.test_keys_are_independent();
    }

    pub fn test_missing_key(&self) {
        let value = self.storage.get("suite.missing").expect("get missing key");
        assert_eq!(value, None);
    }

    pub fn test_set_and_get(&self) {
        self.storage
            .set("suite.token", "abc.def.ghi")
            .expect("set token");
        let value = self.storage.get("suite.token").expect("get token");
        assert_eq!(value.as_deref(), Some("abc.def.ghi"));
    }

    pub fn test_overwrite(&self) {
        self.storage.set("suite.overwrite", "first").expect("set first");
        self.storage.set("suite.overwrite", "second").expect("set second");
        let value = self.storage.get("suite.overwrite").expect("get");
        assert_eq!(value.as_deref(), Some("second"));
    }

    pub fn test_remove(&self) {
        self.storage.set("suite.remove", "value").expect("set");
        self.storage.remove("suite.remove").expect("remove");
        assert_eq!(self.storage.get("suite.remove").expect("get"), None);

        // Removing again is not an error
        self.storage.remove("suite.remove").expect("remove twice");
    }

    pub fn test_keys_are_independent(&self) {
        self.storage.set("suite.a", "1").expect("set a");
        self.storage.set("suite.b", "{\"json\":true}").expect("set b");
        self.storage.remove("suite.a").expect("remove a");
        assert_eq!(self.storage.get("suite.a").expect("get a"), None);
        assert_eq!(
            self.storage.get("suite.b").expect("get b").as_deref(),
            Some("{\"json\":true}")
        );
    }
}
