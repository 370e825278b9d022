use std::collections::BTreeMap;

/// Environment table read and written by the loader.
///
/// Loading consults this table to decide whether a key is already taken and
/// writes the surviving entries through it. Backing it with a map instead of
/// the process environment keeps tests isolated and lets callers collect
/// variables without side effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetEnv {
    kind: TargetEnvKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum TargetEnvKind {
    /// The real process environment, via `std::env`.
    Process,
    /// An in-memory table.
    Memory(BTreeMap<String, String>),
}

impl Default for TargetEnv {
    fn default() -> Self {
        Self::memory()
    }
}

impl TargetEnv {
    /// Create a target backed by the process environment.
    ///
    /// # Safety
    ///
    /// Writes go through [`std::env::set_var`], which mutates global process
    /// state. The caller must ensure no other threads concurrently read or
    /// write the process environment while this target may be written.
    pub unsafe fn process() -> Self {
        Self {
            kind: TargetEnvKind::Process,
        }
    }

    /// Create an empty in-memory target.
    pub fn memory() -> Self {
        Self::from_memory(BTreeMap::new())
    }

    /// Create an in-memory target seeded with existing variables. Seeded keys
    /// block the same keys in loaded files, exactly as pre-set process
    /// variables would.
    pub fn from_memory(map: BTreeMap<String, String>) -> Self {
        Self {
            kind: TargetEnvKind::Memory(map),
        }
    }

    pub fn as_memory(&self) -> Option<&BTreeMap<String, String>> {
        match &self.kind {
            TargetEnvKind::Memory(map) => Some(map),
            TargetEnvKind::Process => None,
        }
    }

    pub fn as_memory_mut(&mut self) -> Option<&mut BTreeMap<String, String>> {
        match &mut self.kind {
            TargetEnvKind::Memory(map) => Some(map),
            TargetEnvKind::Process => None,
        }
    }

    /// Whether `key` already carries a value.
    ///
    /// A variable set to the empty string counts as absent, so an empty
    /// placeholder in the real environment does not block a file entry.
    pub(crate) fn has_value(&self, key: &str) -> bool {
        self.get_var(key).is_some_and(|value| !value.is_empty())
    }

    pub(crate) fn get_var(&self, key: &str) -> Option<String> {
        match &self.kind {
            TargetEnvKind::Process => {
                std::env::var_os(key).map(|value| value.to_string_lossy().into_owned())
            }
            TargetEnvKind::Memory(map) => map.get(key).cloned(),
        }
    }

    pub(crate) fn set_var(&mut self, key: &str, value: &str) {
        match &mut self.kind {
            TargetEnvKind::Process => unsafe { std::env::set_var(key, value) },
            TargetEnvKind::Memory(map) => {
                map.insert(key.to_owned(), value.to_owned());
            }
        }
    }
}
