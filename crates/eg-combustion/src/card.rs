//! Propellant cards: CEA-style reactant descriptions.
//!
//! A card lists one or more constituents, each with its chemical formula, weight
//! percent in the blend, assigned enthalpy and the temperature that enthalpy
//! belongs to. Cards are what the combustion solver is configured with, and the
//! propellant adjuster produces temperature-shifted copies of them.

use crate::error::{CombustionError, CombustionResult};
use eg_core::units::constants::CAL_TO_J;
use eg_core::units::rankine_to_kelvin;
use eg_fluids::Species;
use std::fmt::Write as _;

/// Whether a card is burnt as fuel or oxidizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropellantRole {
    Fuel,
    Oxidizer,
}

impl PropellantRole {
    /// Keyword that opens a constituent in CEA input.
    pub fn cea_keyword(self) -> &'static str {
        match self {
            PropellantRole::Fuel => "fuel",
            PropellantRole::Oxidizer => "oxid",
        }
    }
}

/// One reactant inside a card.
#[derive(Debug, Clone, PartialEq)]
pub struct Constituent {
    /// CEA species name, e.g. `C2H5OH(L)`
    pub name: String,
    /// Element symbol and atom count (counts may be fractional, e.g. RP-1)
    pub formula: Vec<(String, f64)>,
    /// Share of the blend [wt%]
    pub weight_percent: f64,
    /// Assigned enthalpy [J/mol]
    pub enthalpy_j_per_mol: f64,
    /// Temperature the enthalpy belongs to [K]
    pub temperature_k: f64,
    /// Liquid density [g/cm³]
    pub density_g_cc: Option<f64>,
    /// Fluid used for sensible-heat lookups, if the property backend knows it
    pub fluid: Option<Species>,
}

impl Constituent {
    pub fn new(
        name: impl Into<String>,
        formula: &[(&str, f64)],
        enthalpy_j_per_mol: f64,
        temperature_k: f64,
    ) -> Self {
        Self {
            name: name.into(),
            formula: formula.iter().map(|(e, n)| (e.to_string(), *n)).collect(),
            weight_percent: 100.0,
            enthalpy_j_per_mol,
            temperature_k,
            density_g_cc: None,
            fluid: None,
        }
    }

    pub fn with_weight_percent(mut self, wt: f64) -> Self {
        self.weight_percent = wt;
        self
    }

    pub fn with_density(mut self, rho_g_cc: f64) -> Self {
        self.density_g_cc = Some(rho_g_cc);
        self
    }

    pub fn with_fluid(mut self, species: Species) -> Self {
        self.fluid = Some(species);
        self
    }

    /// Molar mass [g/mol] from the formula.
    pub fn molar_mass(&self) -> CombustionResult<f64> {
        let mut total = 0.0;
        for (element, count) in &self.formula {
            let w = atomic_weight(element).ok_or_else(|| {
                CombustionError::card(&self.name, format!("unknown element '{}'", element))
            })?;
            total += w * count;
        }
        if total <= 0.0 {
            return Err(CombustionError::card(&self.name, "empty formula"));
        }
        Ok(total)
    }

    /// Assigned enthalpy per unit mass [J/kg].
    pub fn specific_enthalpy(&self) -> CombustionResult<f64> {
        Ok(self.enthalpy_j_per_mol / self.molar_mass()? * 1000.0)
    }

    /// Copy moved to `new_t_k`, with the enthalpy shifted by a mean specific heat.
    ///
    /// `Δh_molar = cp_avg · (T_new - T_old) · M`
    pub fn at_temperature(&self, new_t_k: f64, cp_avg_j_per_kg_k: f64) -> CombustionResult<Self> {
        if !new_t_k.is_finite() || new_t_k <= 0.0 {
            return Err(CombustionError::InvalidArg {
                what: "card temperature must be positive and finite",
            });
        }
        if !cp_avg_j_per_kg_k.is_finite() || cp_avg_j_per_kg_k < 0.0 {
            return Err(CombustionError::InvalidArg {
                what: "mean specific heat must be non-negative and finite",
            });
        }
        let molar_mass = self.molar_mass()?;
        let dh = cp_avg_j_per_kg_k * (new_t_k - self.temperature_k) * molar_mass / 1000.0;
        Ok(Self {
            enthalpy_j_per_mol: self.enthalpy_j_per_mol + dh,
            temperature_k: new_t_k,
            ..self.clone()
        })
    }
}

/// Thermochemical description of a propellant (possibly a blend).
#[derive(Debug, Clone, PartialEq)]
pub struct PropellantCard {
    pub name: String,
    pub role: PropellantRole,
    pub constituents: Vec<Constituent>,
}

impl PropellantCard {
    /// Build and validate a card.
    pub fn new(
        name: impl Into<String>,
        role: PropellantRole,
        constituents: Vec<Constituent>,
    ) -> CombustionResult<Self> {
        let card = Self {
            name: name.into(),
            role,
            constituents,
        };
        card.validate()?;
        Ok(card)
    }

    /// Single-constituent card.
    pub fn pure(role: PropellantRole, constituent: Constituent) -> CombustionResult<Self> {
        let name = constituent.name.clone();
        Self::new(name, role, vec![constituent.with_weight_percent(100.0)])
    }

    pub fn validate(&self) -> CombustionResult<()> {
        if self.constituents.is_empty() {
            return Err(CombustionError::card(&self.name, "no constituents"));
        }
        let mut sum = 0.0;
        for c in &self.constituents {
            if !c.weight_percent.is_finite() || c.weight_percent <= 0.0 {
                return Err(CombustionError::card(
                    &self.name,
                    format!("constituent '{}' has non-positive weight", c.name),
                ));
            }
            if !c.temperature_k.is_finite() || c.temperature_k <= 0.0 {
                return Err(CombustionError::card(
                    &self.name,
                    format!("constituent '{}' has non-physical temperature", c.name),
                ));
            }
            if !c.enthalpy_j_per_mol.is_finite() {
                return Err(CombustionError::card(
                    &self.name,
                    format!("constituent '{}' has non-finite enthalpy", c.name),
                ));
            }
            c.molar_mass()?;
            sum += c.weight_percent;
        }
        if (sum - 100.0).abs() > 1e-6 {
            return Err(CombustionError::card(
                &self.name,
                format!("weight percents sum to {} instead of 100", sum),
            ));
        }
        Ok(())
    }

    /// Mass fraction of each constituent.
    pub fn mass_fractions(&self) -> impl Iterator<Item = (&Constituent, f64)> {
        self.constituents.iter().map(|c| (c, c.weight_percent / 100.0))
    }

    /// Mixture molar mass [g/mol].
    pub fn molar_mass(&self) -> CombustionResult<f64> {
        let mut moles_per_gram = 0.0;
        for (c, w) in self.mass_fractions() {
            moles_per_gram += w / c.molar_mass()?;
        }
        Ok(1.0 / moles_per_gram)
    }

    /// Mass-weighted enthalpy [J/kg].
    pub fn specific_enthalpy(&self) -> CombustionResult<f64> {
        let mut h = 0.0;
        for (c, w) in self.mass_fractions() {
            h += w * c.specific_enthalpy()?;
        }
        Ok(h)
    }

    /// Reference temperature of the card: that of its first constituent.
    pub fn temperature_k(&self) -> Option<f64> {
        self.constituents.first().map(|c| c.temperature_k)
    }

    /// Render in CEA reactant input format.
    pub fn to_cea_input(&self) -> String {
        let mut out = String::new();
        for c in &self.constituents {
            let _ = write!(out, "{} {}  ", self.role.cea_keyword(), c.name);
            for (element, count) in &c.formula {
                let _ = write!(out, " {} {}", element, format_count(*count));
            }
            let _ = writeln!(out, "   wt%={:.4}", c.weight_percent);
            let _ = write!(
                out,
                "h,kj={:.4}     t(k)={:.3}",
                c.enthalpy_j_per_mol / 1000.0,
                c.temperature_k
            );
            if let Some(rho) = c.density_g_cc {
                let _ = write!(out, "     rho,g/cc={}", rho);
            }
            out.push('\n');
        }
        out
    }

    /// Parse CEA reactant input.
    ///
    /// Each constituent starts with `fuel` or `oxid`/`oxidizer`, followed by its
    /// name, element/count pairs and `key=value` fields (`wt%`, `h,cal`, `h,kj`,
    /// `t(k)`, `t(r)`, `rho` / `rho,g/cc`). All constituents must share one role.
    pub fn parse_cea(name: impl Into<String>, text: &str) -> CombustionResult<Self> {
        let name = name.into();
        let normalized = normalize_assignments(text);
        let tokens: Vec<&str> = normalized.split_whitespace().collect();

        let mut role: Option<PropellantRole> = None;
        let mut constituents = Vec::new();
        let mut i = 0;

        while i < tokens.len() {
            let this_role = match tokens[i].to_ascii_lowercase().as_str() {
                "fuel" => PropellantRole::Fuel,
                "oxid" | "oxidizer" => PropellantRole::Oxidizer,
                other => {
                    return Err(CombustionError::card(
                        &name,
                        format!("expected 'fuel' or 'oxid', found '{}'", other),
                    ));
                }
            };
            match role {
                None => role = Some(this_role),
                Some(r) if r != this_role => {
                    return Err(CombustionError::card(&name, "mixed fuel and oxidizer entries"));
                }
                Some(_) => {}
            }
            i += 1;

            let species_name = tokens
                .get(i)
                .ok_or_else(|| CombustionError::card(&name, "missing constituent name"))?;
            i += 1;

            let mut formula = Vec::new();
            while i + 1 < tokens.len() && !tokens[i].contains('=') && !is_role_keyword(tokens[i])
            {
                let count: f64 = tokens[i + 1].parse().map_err(|_| {
                    CombustionError::card(
                        &name,
                        format!("bad atom count '{}' for {}", tokens[i + 1], tokens[i]),
                    )
                })?;
                formula.push((tokens[i].to_string(), count));
                i += 2;
            }

            let mut wt = None;
            let mut h = None;
            let mut t = None;
            let mut rho = None;
            while i < tokens.len() && !is_role_keyword(tokens[i]) {
                let (key, value) = tokens[i].split_once('=').ok_or_else(|| {
                    CombustionError::card(&name, format!("unexpected token '{}'", tokens[i]))
                })?;
                let value: f64 = value.parse().map_err(|_| {
                    CombustionError::card(&name, format!("bad value in '{}'", tokens[i]))
                })?;
                match key.to_ascii_lowercase().as_str() {
                    "wt%" | "wt" => wt = Some(value),
                    "h,cal" => h = Some(value * CAL_TO_J),
                    "h,kj" => h = Some(value * 1000.0),
                    "h,j" => h = Some(value),
                    "t(k)" => t = Some(value),
                    "t(r)" => t = Some(rankine_to_kelvin(value)),
                    "t(c)" => t = Some(value + 273.15),
                    "rho" | "rho,g/cc" => rho = Some(value),
                    other => {
                        return Err(CombustionError::card(
                            &name,
                            format!("unsupported field '{}'", other),
                        ));
                    }
                }
                i += 1;
            }

            let h = h.ok_or_else(|| {
                CombustionError::card(&name, format!("'{}' has no enthalpy", species_name))
            })?;
            let t = t.ok_or_else(|| {
                CombustionError::card(&name, format!("'{}' has no temperature", species_name))
            })?;
            constituents.push(Constituent {
                name: species_name.to_string(),
                formula,
                weight_percent: wt.unwrap_or(100.0),
                enthalpy_j_per_mol: h,
                temperature_k: t,
                density_g_cc: rho,
                fluid: species_name
                    .split('(')
                    .next()
                    .and_then(|base| base.parse::<Species>().ok()),
            });
        }

        let role = role.ok_or_else(|| CombustionError::card(&name, "empty card"))?;
        Self::new(name, role, constituents)
    }
}

fn is_role_keyword(token: &str) -> bool {
    matches!(
        token.to_ascii_lowercase().as_str(),
        "fuel" | "oxid" | "oxidizer"
    )
}

/// Collapse `key = value` into `key=value`.
fn normalize_assignments(text: &str) -> String {
    let mut s = text.replace('\t', " ");
    loop {
        let next = s.replace(" =", "=").replace("= ", "=");
        if next == s {
            return s;
        }
        s = next;
    }
}

fn format_count(count: f64) -> String {
    if count.fract() == 0.0 {
        format!("{}", count as i64)
    } else {
        format!("{}", count)
    }
}

/// Standard atomic weight [g/mol].
pub fn atomic_weight(element: &str) -> Option<f64> {
    let w = match element.to_ascii_uppercase().as_str() {
        "H" => 1.008,
        "HE" => 4.0026,
        "B" => 10.81,
        "C" => 12.011,
        "N" => 14.007,
        "O" => 15.999,
        "F" => 18.998,
        "AL" => 26.982,
        "S" => 32.06,
        "CL" => 35.45,
        "AR" => 39.948,
        _ => return None,
    };
    Some(w)
}
