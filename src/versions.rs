//! The registry of known Minecraft versions.
//!
//! Declarations reference versions symbolically (`V1_20_1`, `B1_7_3`) or by their id
//! (`1.20.1`). Both forms must resolve to an entry of [`KNOWN`], so a typo in a
//! declaration is reported instead of silently turning into an unsatisfiable bound.
use crate::utils::UnknownSymbol;
use crate::MinecraftVersion;

pub const KNOWN: &[&str] = &[
    // Alpha
    "a1.0.4", "a1.0.5", "a1.0.11", "a1.0.14", "a1.0.15", "a1.0.16", "a1.0.17",
    "a1.1.0", "a1.1.2", "a1.2.0", "a1.2.1", "a1.2.2", "a1.2.3", "a1.2.4", "a1.2.5", "a1.2.6",
    // Beta
    "b1.0", "b1.0.2", "b1.1", "b1.2", "b1.2.2", "b1.3", "b1.4", "b1.5", "b1.6", "b1.6.6",
    "b1.7", "b1.7.3", "b1.8", "b1.8.1",
    // Release
    "1.0", "1.1",
    "1.2.1", "1.2.2", "1.2.3", "1.2.4", "1.2.5",
    "1.3.1", "1.3.2",
    "1.4.2", "1.4.4", "1.4.5", "1.4.6", "1.4.7",
    "1.5", "1.5.1", "1.5.2",
    "1.6.1", "1.6.2", "1.6.4",
    "1.7.2", "1.7.4", "1.7.5", "1.7.6", "1.7.7", "1.7.8", "1.7.9", "1.7.10",
    "1.8", "1.8.1", "1.8.2", "1.8.3", "1.8.4", "1.8.5", "1.8.6", "1.8.7", "1.8.8", "1.8.9",
    "1.9", "1.9.1", "1.9.2", "1.9.3", "1.9.4",
    "1.10", "1.10.1", "1.10.2",
    "1.11", "1.11.1", "1.11.2",
    "1.12", "1.12.1", "1.12.2",
    "1.13", "1.13.1", "1.13.2",
    "1.14", "1.14.1", "1.14.2", "1.14.3", "1.14.4",
    "1.15", "1.15.1", "1.15.2",
    "1.16", "1.16.1", "1.16.2", "1.16.3", "1.16.4", "1.16.5",
    "1.17", "1.17.1",
    "1.18", "1.18.1", "1.18.2",
    "1.19", "1.19.1", "1.19.2", "1.19.3", "1.19.4",
    "1.20", "1.20.1", "1.20.2", "1.20.3", "1.20.4", "1.20.5", "1.20.6",
    "1.21", "1.21.1", "1.21.2", "1.21.3", "1.21.4", "1.21.5", "1.21.6", "1.21.7", "1.21.8",
];

/// Iterate over every known version, oldest first
pub fn known() -> impl Iterator<Item=MinecraftVersion> {
    KNOWN.iter().map(|&text| MinecraftVersion::from_static(text))
}

/// Convert a symbolic constant name into the version id it stands for.
///
/// `V1_20_1` becomes `1.20.1` and `B1_7_3` becomes `b1.7.3`.
/// Anything else is assumed to already be a version id.
fn symbol_text(symbol: &str) -> String {
    let mut chars = symbol.chars();
    match (chars.next(), chars.next()) {
        (Some(prefix), Some(digit)) if digit.is_ascii_digit() && symbol.contains('_') => {
            let rest = &symbol[prefix.len_utf8()..];
            match prefix {
                'V' | 'v' => rest.replace('_', "."),
                'A' | 'a' | 'B' | 'b' => {
                    format!("{}{}", prefix.to_ascii_lowercase(), rest.replace('_', "."))
                },
                _ => symbol.into()
            }
        },
        _ => symbol.into()
    }
}

/// Resolve a symbolic or literal version reference to a known version
pub fn resolve(symbol: &str) -> Result<MinecraftVersion, UnknownSymbol> {
    let symbol = symbol.trim();
    if symbol.eq_ignore_ascii_case("unknown") {
        return Ok(MinecraftVersion::UNKNOWN)
    }
    let text = symbol_text(symbol);
    let candidate = MinecraftVersion::parse(&text)
        .map_err(|_| UnknownSymbol::new("minecraft version", symbol))?;
    known()
        .find(|known| *known == candidate)
        .ok_or_else(|| UnknownSymbol::new("minecraft version", symbol))
}

#[cfg(test)]
mod test {
    use super::*;
    #[test]
    fn registry_is_sorted() {
        let versions: Vec<MinecraftVersion> = known().collect();
        for pair in versions.windows(2) {
            assert!(pair[0] < pair[1], "{} >= {}", pair[0], pair[1]);
        }
    }
    #[test]
    fn resolve_symbols() {
        assert_eq!(resolve("V1_20_1").unwrap().as_str(), "1.20.1");
        assert_eq!(resolve("B1_7_3").unwrap().as_str(), "b1.7.3");
        assert_eq!(resolve("A1_2_6").unwrap().as_str(), "a1.2.6");
        assert_eq!(resolve("1.12.2").unwrap().as_str(), "1.12.2");
        assert_eq!(resolve("Beta 1.7.3 (MC: 1.7.3)").unwrap().as_str(), "b1.7.3");
        assert!(resolve("UNKNOWN").unwrap().is_unknown());
    }
    #[test]
    fn unresolvable_symbols_fail() {
        let error = resolve("V1_20_9").unwrap_err();
        assert_eq!(error.symbol(), "V1_20_9");
        assert_eq!(error.kind(), "minecraft version");
        assert!(resolve("V1_99").is_err());
        assert!(resolve("").is_err());
    }
}
