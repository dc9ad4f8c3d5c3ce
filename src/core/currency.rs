//! The set of currency codes accepted by the service

use std::collections::HashSet;

/// Immutable set of accepted ISO currency codes.
///
/// Built once at startup, either from configuration or from the provider's
/// currency table, and shared read-only afterwards. Codes are stored uppercase
/// and keep the order they were supplied in, which is the order error messages
/// list them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencySet {
    codes: Vec<String>,
    index: HashSet<String>,
}

impl CurrencySet {
    pub fn new<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut ordered = Vec::new();
        let mut index = HashSet::new();
        for code in codes {
            let code = code.as_ref().trim().to_uppercase();
            if !code.is_empty() && index.insert(code.clone()) {
                ordered.push(code);
            }
        }
        Self {
            codes: ordered,
            index,
        }
    }

    /// Case-insensitive membership test.
    pub fn contains(&self, code: &str) -> bool {
        self.index.contains(&code.to_uppercase())
    }

    pub fn codes(&self) -> &[String] {
        &self.codes
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub(crate) fn joined(&self) -> String {
        self.codes.join(", ")
    }
}
