//! Localization port - Resolves opaque string keys to display text

/// Port for looking up user-facing strings
pub trait LocalizationPort: Send + Sync {
    /// Resolve `key` for `locale`. Unknown keys resolve to the key itself.
    fn resolve(&self, key: &str, locale: &str) -> String;
}
