use std::hash::{Hash, BuildHasher};
use std::collections::hash_map::RandomState;

use failure_derive::Fail;
use indexmap::IndexMap;

/// A bounded map with second-chance (CLOCK) eviction.
///
/// A hit only sets the entry's reference bit, so lookups never reorder the map.
/// When a new entry needs room, the hand sweeps over the entries,
/// clearing reference bits until it finds an unreferenced entry to evict.
#[derive(Clone, Debug)]
pub struct ClockCache<K: Eq + Hash, V, S: BuildHasher = RandomState> {
    capacity: usize,
    hand: usize,
    map: IndexMap<K, (V, bool), S>
}
impl<K: Eq + Hash, V> ClockCache<K, V> {
    #[inline]
    pub fn new(capacity: usize) -> ClockCache<K, V> {
        assert!(capacity > 0, "Zero capacity");
        ClockCache { capacity, hand: 0, map: IndexMap::with_capacity(capacity) }
    }
}
impl<K: Eq + Hash, V, S: BuildHasher> ClockCache<K, V, S> {
    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
    #[inline]
    pub fn contains_key(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }
    /// Make room for one more entry
    fn evict(&mut self) {
        // Every step either clears a bit or removes an entry, so this ends within two sweeps
        while self.map.len() >= self.capacity {
            if self.hand >= self.map.len() {
                self.hand = 0;
            }
            match self.map.get_index_mut(self.hand) {
                Some((_, entry)) if entry.1 => {
                    entry.1 = false;
                    self.hand += 1;
                },
                Some(_) => {
                    // The last entry takes the evicted slot
                    self.map.swap_remove_index(self.hand);
                },
                None => break
            }
        }
    }
    /// Lookup the value for the specified key, marking it as referenced
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let entry = self.map.get_mut(key)?;
        entry.1 = true;
        Some(&entry.0)
    }
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        if let Some(entry) = self.map.get_mut(&key) {
            let (old, _) = ::std::mem::replace(entry, (value, true));
            return Some(old)
        }
        self.evict();
        self.map.insert(key, (value, false));
        None
    }
}

/// A symbolic reference (version, platform, side or mappings name) that doesn't resolve.
#[derive(Debug, Fail)]
#[fail(display = "Unknown {} {:?}", kind, symbol)]
pub struct UnknownSymbol {
    kind: &'static str,
    symbol: String
}
impl UnknownSymbol {
    #[inline]
    pub(crate) fn new(kind: &'static str, symbol: &str) -> UnknownSymbol {
        UnknownSymbol { kind, symbol: symbol.into() }
    }
    #[inline]
    pub fn kind(&self) -> &'static str {
        self.kind
    }
    #[inline]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }
}

fn normalize_symbol(s: &str) -> impl Iterator<Item=char> + '_ {
    s.chars()
        .filter(|c| !matches!(c, '_' | '-' | ' '))
        .map(|c| c.to_ascii_lowercase())
}
/// Symbols match ignoring case and word separators, so `NEO_FORGE`, `neoforge` and `NeoForge` agree.
#[inline]
pub(crate) fn symbol_eq(name: &str, symbol: &str) -> bool {
    normalize_symbol(name).eq(normalize_symbol(symbol))
}

/// Declares a closed enum that is referenced by name from declarations and config files.
macro_rules! symbolic_enum {
    ($(#[$meta:meta])* pub enum $name:ident ($kind:expr) {
        $($(#[$variant_meta:meta])* $variant:ident => $display:expr),* $(,)*
    }) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
        pub enum $name {
            $($(#[$variant_meta])* $variant),*
        }
        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),*];
            #[inline]
            pub fn name(self) -> &'static str {
                match self {
                    $($name::$variant => $display),*
                }
            }
        }
        impl ::std::str::FromStr for $name {
            type Err = $crate::utils::UnknownSymbol;

            fn from_str(s: &str) -> Result<$name, $crate::utils::UnknownSymbol> {
                $name::ALL.iter().cloned()
                    .find(|value| $crate::utils::symbol_eq(value.name(), s.trim()))
                    .ok_or_else(|| $crate::utils::UnknownSymbol::new($kind, s))
            }
        }
        impl ::std::fmt::Display for $name {
            #[inline]
            fn fmt(&self, f: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
                f.write_str(self.name())
            }
        }
        impl ::serde::Serialize for $name {
            #[inline]
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error> where
                S: ::serde::Serializer {
                serializer.serialize_str(self.name())
            }
        }
        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<$name, D::Error> where
                D: ::serde::Deserializer<'de> {
                struct SymbolVisitor;
                impl<'de> ::serde::de::Visitor<'de> for SymbolVisitor {
                    type Value = $name;

                    fn expecting(&self, formatter: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
                        write!(formatter, "a {} name", $kind)
                    }

                    #[inline]
                    fn visit_str<E>(self, v: &str) -> Result<$name, E> where
                        E: ::serde::de::Error, {
                        v.parse().map_err(E::custom)
                    }
                }
                deserializer.deserialize_str(SymbolVisitor)
            }
        }
    };
}
