//! Propellant species definitions.

/// Propellant and pressurant species relevant for liquid rocket engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Species {
    /// Ethanol (C₂H₅OH)
    Ethanol,
    /// Methanol (CH₃OH)
    Methanol,
    /// Water (H₂O)
    H2O,
    /// Methane (CH₄)
    CH4,
    /// Propane (C₃H₈)
    Propane,
    /// Hydrogen (H₂)
    H2,
    /// Ammonia (NH₃)
    Ammonia,
    /// Oxygen (O₂)
    O2,
    /// Nitrous oxide (N₂O)
    NitrousOxide,
    /// Nitrogen (N₂)
    N2,
    /// Helium (He)
    He,
    /// RP-1 kerosene (not supported by CoolProp)
    RP1,
    /// Hydrogen peroxide (not supported by CoolProp)
    H2O2,
}

impl Species {
    pub const ALL: [Species; 13] = [
        Species::Ethanol,
        Species::Methanol,
        Species::H2O,
        Species::CH4,
        Species::Propane,
        Species::H2,
        Species::Ammonia,
        Species::O2,
        Species::NitrousOxide,
        Species::N2,
        Species::He,
        Species::RP1,
        Species::H2O2,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Species::Ethanol => "Ethanol",
            Species::Methanol => "Methanol",
            Species::H2O => "H2O",
            Species::CH4 => "CH4",
            Species::Propane => "Propane",
            Species::H2 => "H2",
            Species::Ammonia => "NH3",
            Species::O2 => "O2",
            Species::NitrousOxide => "N2O",
            Species::N2 => "N2",
            Species::He => "He",
            Species::RP1 => "RP1",
            Species::H2O2 => "H2O2",
        }
    }

    /// Get CoolProp fluid name for this species.
    ///
    /// Returns `None` for species not supported by CoolProp (e.g., RP-1).
    pub fn coolprop_name(&self) -> Option<&'static str> {
        match self {
            Species::Ethanol => Some("Ethanol"),
            Species::Methanol => Some("Methanol"),
            Species::H2O => Some("Water"),
            Species::CH4 => Some("Methane"),
            Species::Propane => Some("n-Propane"),
            Species::H2 => Some("Hydrogen"),
            Species::Ammonia => Some("Ammonia"),
            Species::O2 => Some("Oxygen"),
            Species::NitrousOxide => Some("NitrousOxide"),
            Species::N2 => Some("Nitrogen"),
            Species::He => Some("Helium"),
            Species::RP1 | Species::H2O2 => None,
        }
    }

    /// Map to rfluids Pure enum (internal use for CoolProp backend).
    ///
    /// Returns `None` for species not available in rfluids.
    pub(crate) fn rfluids_pure(&self) -> Option<rfluids::substance::Pure> {
        use rfluids::substance::Pure;
        match self {
            Species::Ethanol => Some(Pure::Ethanol),
            Species::Methanol => Some(Pure::Methanol),
            Species::H2O => Some(Pure::Water),
            Species::CH4 => Some(Pure::Methane),
            Species::Propane => Some(Pure::nPropane),
            Species::H2 => Some(Pure::Hydrogen),
            Species::Ammonia => Some(Pure::Ammonia),
            Species::O2 => Some(Pure::Oxygen),
            Species::NitrousOxide => Some(Pure::NitrousOxide),
            Species::N2 => Some(Pure::Nitrogen),
            Species::He => Some(Pure::Helium),
            Species::RP1 | Species::H2O2 => None,
        }
    }

    /// Get human-readable name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Species::Ethanol => "Ethanol",
            Species::Methanol => "Methanol",
            Species::H2O => "Water",
            Species::CH4 => "Methane",
            Species::Propane => "Propane",
            Species::H2 => "Hydrogen",
            Species::Ammonia => "Ammonia",
            Species::O2 => "Oxygen",
            Species::NitrousOxide => "Nitrous Oxide",
            Species::N2 => "Nitrogen",
            Species::He => "Helium",
            Species::RP1 => "RP-1",
            Species::H2O2 => "Hydrogen Peroxide",
        }
    }

    /// Get molar mass [kg/kmol] for this species.
    pub fn molar_mass(&self) -> f64 {
        match self {
            Species::Ethanol => 46.068,
            Species::Methanol => 32.042,
            Species::H2O => 18.015,
            Species::CH4 => 16.043,
            Species::Propane => 44.097,
            Species::H2 => 2.016,
            Species::Ammonia => 17.031,
            Species::O2 => 31.999,
            Species::NitrousOxide => 44.013,
            Species::N2 => 28.014,
            Species::He => 4.003,
            Species::RP1 => 170.0,
            Species::H2O2 => 34.015,
        }
    }
}

impl std::fmt::Display for Species {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl std::str::FromStr for Species {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ETHANOL" | "C2H5OH" | "ETOH" => Ok(Species::Ethanol),
            "METHANOL" | "CH3OH" => Ok(Species::Methanol),
            "H2O" | "WATER" => Ok(Species::H2O),
            "CH4" | "METHANE" => Ok(Species::CH4),
            "PROPANE" | "C3H8" => Ok(Species::Propane),
            "H2" | "HYDROGEN" => Ok(Species::H2),
            "NH3" | "AMMONIA" => Ok(Species::Ammonia),
            "O2" | "OXYGEN" | "LOX" => Ok(Species::O2),
            "N2O" | "NITROUSOXIDE" | "NITROUS OXIDE" => Ok(Species::NitrousOxide),
            "N2" | "NITROGEN" => Ok(Species::N2),
            "HE" | "HELIUM" => Ok(Species::He),
            "RP1" | "RP-1" => Ok(Species::RP1),
            "H2O2" | "PEROXIDE" | "HYDROGEN PEROXIDE" => Ok(Species::H2O2),
            _ => Err("unknown species"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coolprop_mapping() {
        assert_eq!(Species::O2.coolprop_name(), Some("Oxygen"));
        assert_eq!(Species::NitrousOxide.coolprop_name(), Some("NitrousOxide"));
        assert_eq!(Species::Ethanol.coolprop_name(), Some("Ethanol"));
        assert_eq!(Species::RP1.coolprop_name(), None);
    }

    #[test]
    fn parse_aliases_include_nitrous_oxide() {
        assert_eq!("N2O".parse::<Species>().unwrap(), Species::NitrousOxide);
        assert_eq!(
            "Nitrous Oxide".parse::<Species>().unwrap(),
            Species::NitrousOxide
        );
        assert_eq!("lox".parse::<Species>().unwrap(), Species::O2);
        assert!("unobtainium".parse::<Species>().is_err());
    }

    #[test]
    fn rfluids_mapping() {
        assert!(Species::NitrousOxide.rfluids_pure().is_some());
        assert!(Species::Ethanol.rfluids_pure().is_some());
        assert!(Species::RP1.rfluids_pure().is_none());
        assert!(Species::H2O2.rfluids_pure().is_none());
    }

    #[test]
    fn every_key_parses_back() {
        for species in Species::ALL {
            let parsed = species
                .key()
                .parse::<Species>()
                .expect("canonical key should parse");
            assert_eq!(parsed, species);
        }
    }
}
