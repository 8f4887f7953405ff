symbolic_enum! {
    /// A mod loader, server implementation or proxy that can be detected at runtime.
    ///
    /// Forks and hybrids are distinct platforms, but they also [imply](Platform::implied)
    /// the platforms whose APIs they carry.
    pub enum Platform ("platform") {
        Vanilla => "Vanilla",
        // Forge and its hybrids
        Forge => "Forge",
        GoldenForge => "GoldenForge",
        McpcPlusPlus => "MCPCPlusPlus",
        Cauldron => "Cauldron",
        KCauldron => "KCauldron",
        Thermos => "Thermos",
        Crucible => "Crucible",
        Mohist => "Mohist",
        CatServer => "CatServer",
        Ketting => "Ketting",
        NeoForge => "NeoForge",
        Youer => "Youer",
        // Fabric and its hybrids
        Fabric => "Fabric",
        Quilt => "Quilt",
        Cardboard => "Cardboard",
        Banner => "Banner",
        // Bukkit family
        Bukkit => "Bukkit",
        Spigot => "Spigot",
        Paper => "Paper",
        Pufferfish => "Pufferfish",
        Purpur => "Purpur",
        Poseidon => "Poseidon",
        Folia => "Folia",
        // Proxies
        BungeeCord => "BungeeCord",
        Waterfall => "Waterfall",
        Travertine => "Travertine",
        Lightfall => "Lightfall",
        Velocity => "Velocity",
        // Standalone hybrids
        Arclight => "Arclight",
        Magma => "Magma",
        Sponge => "Sponge",
        Ignite => "Ignite",
    }
}
impl Platform {
    /// The platforms that are always present alongside this one, nearest first
    pub fn implied(self) -> &'static [Platform] {
        use self::Platform::*;
        match self {
            GoldenForge | McpcPlusPlus | Cauldron | KCauldron | Thermos
            | Crucible | Mohist | CatServer | Ketting => &[Forge],
            Youer => &[NeoForge],
            Quilt | Cardboard | Banner => &[Fabric],
            Purpur => &[Pufferfish, Paper, Spigot, Bukkit],
            Pufferfish => &[Paper, Spigot, Bukkit],
            Paper => &[Spigot, Bukkit],
            Spigot | Poseidon => &[Bukkit],
            Travertine | Lightfall => &[Waterfall, BungeeCord],
            Waterfall => &[BungeeCord],
            Vanilla | Forge | NeoForge | Fabric | Bukkit | Folia | BungeeCord
            | Velocity | Arclight | Magma | Sponge | Ignite => &[],
        }
    }
    #[inline]
    pub fn is_proxy(self) -> bool {
        match self {
            Platform::BungeeCord | Platform::Waterfall | Platform::Travertine
            | Platform::Lightfall | Platform::Velocity => true,
            _ => false
        }
    }
}

symbolic_enum! {
    /// The role of the running process
    pub enum Side ("side") {
        Client => "Client",
        Server => "Server",
        /// The server embedded in a singleplayer client
        Integrated => "Integrated",
        Proxy => "Proxy",
    }
}

symbolic_enum! {
    /// The naming scheme the runtime uses for Minecraft's classes and members
    pub enum Mappings ("mappings") {
        /// No particular mappings, used by constraints to mean "any"
        None => "None",
        Official => "Official",
        LegacySearge => "LegacySearge",
        Searge => "Searge",
        Mojmap => "Mojmap",
        LegacyIntermediary => "LegacyIntermediary",
        YarnIntermediary => "YarnIntermediary",
        Spigot => "Spigot",
    }
}
impl Default for Mappings {
    #[inline]
    fn default() -> Mappings {
        Mappings::None
    }
}

#[cfg(test)]
mod test {
    use super::*;
    #[test]
    fn parse_symbols() {
        assert_eq!("FABRIC".parse::<Platform>().unwrap(), Platform::Fabric);
        assert_eq!("neoforge".parse::<Platform>().unwrap(), Platform::NeoForge);
        assert_eq!("MCPC_PLUS_PLUS".parse::<Platform>().unwrap(), Platform::McpcPlusPlus);
        assert_eq!("SERVER".parse::<Side>().unwrap(), Side::Server);
        assert_eq!("legacy-searge".parse::<Mappings>().unwrap(), Mappings::LegacySearge);
        let error = "FORGEE".parse::<Platform>().unwrap_err();
        assert_eq!(error.kind(), "platform");
        assert_eq!(error.symbol(), "FORGEE");
    }
    #[test]
    fn display_names_round_trip() {
        for &platform in Platform::ALL {
            assert_eq!(format!("{}", platform).parse::<Platform>().unwrap(), platform);
        }
    }
    #[test]
    fn hybrids_imply_parents() {
        assert_eq!(Platform::Purpur.implied(), &[
            Platform::Pufferfish, Platform::Paper, Platform::Spigot, Platform::Bukkit
        ]);
        assert_eq!(Platform::Quilt.implied(), &[Platform::Fabric]);
        assert!(Platform::Fabric.implied().is_empty());
        assert!(Platform::Travertine.is_proxy());
        assert!(!Platform::Paper.is_proxy());
    }
    #[test]
    fn serde_by_name() {
        let sides: Vec<Side> = ::serde_json::from_str(r#"["client", "PROXY"]"#).unwrap();
        assert_eq!(sides, vec![Side::Client, Side::Proxy]);
        assert_eq!(::serde_json::to_string(&Mappings::Mojmap).unwrap(), "\"Mojmap\"");
    }
}
