use lasso::{Spur, ThreadedRodeo};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashSet;
use std::fmt;
use std::sync::LazyLock;

/// Global string interner for layer ids.
static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

/// An interned layer identifier, unique across a whole layer tree.
/// Internally a 4-byte `Spur` index, so copies and comparisons are cheap.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayerId(Spur);

impl LayerId {
    /// Intern a string as a LayerId, or return the existing handle.
    pub fn intern(s: &str) -> Self {
        LayerId(INTERNER.get_or_intern(s))
    }

    /// Resolve back to a string slice.
    pub fn as_str(&self) -> &str {
        INTERNER.resolve(&self.0)
    }
}

impl fmt::Debug for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.as_str())
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for LayerId {
    fn from(s: &str) -> Self {
        Self::intern(s)
    }
}

impl Serialize for LayerId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for LayerId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(LayerId::intern(&s))
    }
}

// ─── Fresh id allocation ─────────────────────────────────────────────────

/// Hands out ids that collide neither with a set of taken ids nor with
/// anything this allocator produced before.
///
/// For a base id `star` the candidates are `star_copy`, `star_copy_2`,
/// `star_copy_3`, … so copies stay readable in a layer list.
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    taken: HashSet<LayerId>,
}

impl IdAllocator {
    pub fn new(taken: impl IntoIterator<Item = LayerId>) -> Self {
        Self {
            taken: taken.into_iter().collect(),
        }
    }

    /// Allocate a fresh id derived from `base`.
    pub fn fresh(&mut self, base: LayerId) -> LayerId {
        let stem = format!("{}_copy", base.as_str());
        let mut candidate = LayerId::intern(&stem);
        let mut n = 2u32;
        while self.taken.contains(&candidate) {
            candidate = LayerId::intern(&format!("{stem}_{n}"));
            n += 1;
        }
        self.taken.insert(candidate);
        candidate
    }
}
