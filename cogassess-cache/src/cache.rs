use lazy_static::lazy_static;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::RwLock;
pub use string_cache::DefaultAtom as Atom;

lazy_static! {
    static ref ASSET_INTERNER: RwLock<Vec<Atom>> = RwLock::new(Vec::new());
}

/// Stable handle for a stimulus asset (an image path in the reference deployment).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssetId(usize);

impl AssetId {
    /// The identifier this handle was interned from.
    pub fn path(self) -> String {
        asset_path(self).unwrap_or_default()
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

impl Serialize for AssetId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.path())
    }
}

impl<'de> Deserialize<'de> for AssetId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let path = String::deserialize(deserializer)?;
        Ok(intern_asset(&path))
    }
}

/// Intern an asset identifier and return its handle
pub fn intern_asset(s: &str) -> AssetId {
    let atom = Atom::from(s);
    let mut v = ASSET_INTERNER.write().unwrap_or_else(|e| e.into_inner());
    match v.iter().position(|a| *a == atom) {
        Some(idx) => AssetId(idx),
        None => {
            v.push(atom);
            AssetId(v.len() - 1)
        }
    }
}

/// Current count of unique assets
pub fn asset_count() -> usize {
    ASSET_INTERNER
        .read()
        .unwrap_or_else(|e| e.into_inner())
        .len()
}

pub fn asset_path(id: AssetId) -> Option<String> {
    ASSET_INTERNER
        .read()
        .unwrap_or_else(|e| e.into_inner())
        .get(id.0)
        .map(|a| a.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_is_stable() {
        let a = intern_asset("images/target1.png");
        let b = intern_asset("images/target1.png");
        let c = intern_asset("images/wrong1.png");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.path(), "images/target1.png");
        assert!(asset_count() >= 2);
    }

    #[test]
    fn serializes_as_its_path() {
        let id = intern_asset("images/correct7.png");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"images/correct7.png\"");
        let back: AssetId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
