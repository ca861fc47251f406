//! Project validation logic.

use crate::schema::{
    CardDef, CombustionDef, EngineDef, Project, PropellantDef, StackItemDef, StateDef,
    TankFluidDef, TankSystemDef,
};
use eg_combustion::{PropellantCard, PropellantRole, catalog};
use eg_fluids::Species;

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unknown {kind}: {name}")]
    UnknownName { kind: String, name: String },

    #[error("Invalid propellant card '{card}': {reason}")]
    InvalidCard { card: String, reason: String },

    #[error("Invalid tank stack: {reason}")]
    InvalidStack { reason: String },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

fn invalid(field: &str, value: f64, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn require_positive(field: &str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, value, "must be positive"))
    }
}

fn require_non_negative(field: &str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(field, value, "must be non-negative"))
    }
}

pub fn validate_project(project: &Project) -> Result<(), ValidationError> {
    if project.version > crate::migrate::LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: project.version,
        });
    }

    validate_engine(&project.engine)?;
    validate_combustion(&project.combustion)?;
    if let Some(tanks) = &project.tanks {
        validate_tanks(tanks)?;
    }

    for &p in &project.analysis.ambient_pressures_pa {
        require_non_negative("analysis.ambient_pressures_pa", p)?;
    }

    Ok(())
}

fn validate_engine(engine: &EngineDef) -> Result<(), ValidationError> {
    validate_propellant(&engine.fuel, PropellantRole::Fuel, "engine.fuel")?;
    validate_propellant(&engine.oxidizer, PropellantRole::Oxidizer, "engine.oxidizer")?;

    require_positive("engine.mixture_ratio", engine.mixture_ratio)?;
    require_positive("engine.chamber_pressure_pa", engine.chamber_pressure_pa)?;
    require_positive(
        "engine.reference_ambient_pressure_pa",
        engine.reference_ambient_pressure_pa,
    )?;
    require_positive("engine.thrust_n", engine.thrust_n)?;
    if !(engine.efficiency > 0.0 && engine.efficiency <= 1.0) {
        return Err(invalid("engine.efficiency", engine.efficiency, "must lie in (0, 1]"));
    }
    if engine.chamber_pressure_pa <= engine.reference_ambient_pressure_pa {
        return Err(invalid(
            "engine.chamber_pressure_pa",
            engine.chamber_pressure_pa,
            "must exceed the reference ambient pressure",
        ));
    }
    if let Some(cr) = engine.contraction_ratio
        && !(cr.is_finite() && cr > 1.0)
    {
        return Err(invalid("engine.contraction_ratio", cr, "must exceed 1"));
    }
    Ok(())
}

fn validate_propellant(
    def: &PropellantDef,
    role: PropellantRole,
    context: &str,
) -> Result<(), ValidationError> {
    require_positive(&format!("{context}.temperature_k"), def.temperature_k)?;
    if let Some(fluid) = &def.fluid {
        parse_species(fluid)?;
    }
    let card = resolve_card(&def.card)?;
    if card.role != role {
        return Err(ValidationError::InvalidCard {
            card: card.name,
            reason: format!("expected a {} card", role.cea_keyword()),
        });
    }
    Ok(())
}

fn validate_combustion(def: &CombustionDef) -> Result<(), ValidationError> {
    if let CombustionDef::Table {
        rows,
        reference_fuel,
        reference_oxidizer,
    } = def
    {
        if rows.is_empty() {
            return Err(ValidationError::InvalidValue {
                field: "combustion.rows".to_string(),
                value: "[]".to_string(),
                reason: "at least one row is required".to_string(),
            });
        }
        for row in rows {
            require_positive("combustion.rows.mixture_ratio", row.mixture_ratio)?;
            require_positive(
                "combustion.rows.chamber_temperature_k",
                row.chamber_temperature_k,
            )?;
            require_positive("combustion.rows.molar_mass", row.molar_mass)?;
            if !(row.gamma.is_finite() && row.gamma > 1.0) {
                return Err(invalid("combustion.rows.gamma", row.gamma, "must exceed 1"));
            }
        }
        if rows.windows(2).any(|w| w[1].mixture_ratio <= w[0].mixture_ratio) {
            return Err(ValidationError::InvalidValue {
                field: "combustion.rows".to_string(),
                value: format!("{} rows", rows.len()),
                reason: "mixture ratios must be strictly increasing".to_string(),
            });
        }
        resolve_card(reference_fuel)?;
        resolve_card(reference_oxidizer)?;
    }
    Ok(())
}

fn validate_tanks(tanks: &TankSystemDef) -> Result<(), ValidationError> {
    require_positive("tanks.burn_time_s", tanks.burn_time_s)?;
    require_positive("tanks.tank_diameter_m", tanks.tank_diameter_m)?;
    require_positive(
        "tanks.structure_mass_per_length_kg_per_m",
        tanks.structure_mass_per_length_kg_per_m,
    )?;
    require_positive(
        "tanks.structure_reference_diameter_m",
        tanks.structure_reference_diameter_m,
    )?;
    validate_tank_fluid(&tanks.oxidizer, "tanks.oxidizer")?;
    validate_tank_fluid(&tanks.fuel, "tanks.fuel")?;

    let mut ox = 0;
    let mut fuel = 0;
    let mut coax = 0;
    for item in &tanks.stack {
        match item {
            StackItemDef::Component {
                mass_kg, length_m, ..
            } => {
                require_non_negative("tanks.stack.mass_kg", *mass_kg)?;
                require_non_negative("tanks.stack.length_m", *length_m)?;
            }
            StackItemDef::OxidizerTank => ox += 1,
            StackItemDef::FuelTank => fuel += 1,
            StackItemDef::Coaxial => coax += 1,
        }
    }
    let reason = match (ox, fuel, coax) {
        (1, 1, 0) | (0, 0, 1) => return Ok(()),
        (_, _, c) if c > 0 => "a coaxial tank replaces both separate tanks",
        (0, _, _) => "missing oxidizer tank",
        (_, 0, _) => "missing fuel tank",
        _ => "each tank may appear only once",
    };
    Err(ValidationError::InvalidStack {
        reason: reason.to_string(),
    })
}

fn validate_tank_fluid(def: &TankFluidDef, context: &str) -> Result<(), ValidationError> {
    parse_species(&def.species)?;
    require_non_negative(&format!("{context}.dead_fraction"), def.dead_fraction)?;
    let quality = match def.state {
        StateDef::PT {
            pressure_pa,
            temperature_k,
        } => {
            require_positive(&format!("{context}.state.pressure_pa"), pressure_pa)?;
            require_positive(&format!("{context}.state.temperature_k"), temperature_k)?;
            None
        }
        StateDef::TQ {
            temperature_k,
            quality,
        } => {
            require_positive(&format!("{context}.state.temperature_k"), temperature_k)?;
            Some(quality)
        }
        StateDef::PQ { pressure_pa, quality } => {
            require_positive(&format!("{context}.state.pressure_pa"), pressure_pa)?;
            Some(quality)
        }
    };
    if let Some(q) = quality
        && !(0.0..=1.0).contains(&q)
    {
        return Err(invalid(&format!("{context}.state.quality"), q, "must lie in [0, 1]"));
    }
    Ok(())
}

pub(crate) fn parse_species(name: &str) -> Result<Species, ValidationError> {
    name.parse::<Species>()
        .map_err(|_| ValidationError::UnknownName {
            kind: "species".to_string(),
            name: name.to_string(),
        })
}

pub(crate) fn resolve_card(def: &CardDef) -> Result<PropellantCard, ValidationError> {
    match def {
        CardDef::Catalog { name } => catalog::card(name).map_err(|_| ValidationError::UnknownName {
            kind: "propellant".to_string(),
            name: name.clone(),
        }),
        CardDef::EthanolWater { water_percent } => {
            catalog::ethanol_water(*water_percent).map_err(|e| ValidationError::InvalidCard {
                card: "EthanolWater".to_string(),
                reason: e.to_string(),
            })
        }
        CardDef::Cea { name, text } => {
            PropellantCard::parse_cea(name.clone(), text).map_err(|e| {
                ValidationError::InvalidCard {
                    card: name.clone(),
                    reason: e.to_string(),
                }
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::*;

    fn minimal() -> Project {
        Project {
            version: crate::migrate::LATEST_VERSION,
            name: "test".to_string(),
            engine: EngineDef {
                name: "Amalia".to_string(),
                fuel: PropellantDef {
                    card: CardDef::Catalog {
                        name: "Ethanol".to_string(),
                    },
                    temperature_k: 298.15,
                    fluid: None,
                },
                oxidizer: PropellantDef {
                    card: CardDef::Catalog {
                        name: "N2O".to_string(),
                    },
                    temperature_k: 298.15,
                    fluid: None,
                },
                mixture_ratio: 3.4,
                chamber_pressure_pa: 25.0e5,
                reference_ambient_pressure_pa: 1.0e5,
                thrust_n: 5000.0,
                efficiency: 1.0,
                contraction_ratio: Some(2.5),
            },
            combustion: CombustionDef::default(),
            fluids: FluidBackendDef::Incompressible,
            tanks: None,
            analysis: AnalysisDef::default(),
        }
    }

    #[test]
    fn minimal_project_is_valid() {
        validate_project(&minimal()).unwrap();
    }

    #[test]
    fn future_version_is_rejected() {
        let mut p = minimal();
        p.version = 99;
        assert!(matches!(
            validate_project(&p),
            Err(ValidationError::UnsupportedVersion { version: 99 })
        ));
    }

    #[test]
    fn swapped_roles_are_rejected() {
        let mut p = minimal();
        std::mem::swap(&mut p.engine.fuel, &mut p.engine.oxidizer);
        assert!(matches!(
            validate_project(&p),
            Err(ValidationError::InvalidCard { .. })
        ));
    }

    #[test]
    fn unknown_catalog_name_is_reported() {
        let mut p = minimal();
        p.engine.fuel.card = CardDef::Catalog {
            name: "Unobtainium".to_string(),
        };
        let err = validate_project(&p).unwrap_err();
        assert!(err.to_string().contains("Unobtainium"));
    }

    #[test]
    fn efficiency_must_be_a_fraction() {
        let mut p = minimal();
        p.engine.efficiency = 1.5;
        assert!(validate_project(&p).is_err());
    }

    #[test]
    fn cea_card_text_is_checked() {
        let mut p = minimal();
        p.engine.fuel.card = CardDef::Cea {
            name: "Blend".to_string(),
            text: "fuel C2H5OH(L) C 2 H 6 O 1 wt%=100 h,cal=-66370 t(k)=298.15".to_string(),
        };
        validate_project(&p).unwrap();

        p.engine.fuel.card = CardDef::Cea {
            name: "Broken".to_string(),
            text: "propellant X".to_string(),
        };
        assert!(matches!(
            validate_project(&p),
            Err(ValidationError::InvalidCard { .. })
        ));
    }

    #[test]
    fn tank_stack_needs_both_tanks() {
        let mut p = minimal();
        p.tanks = Some(TankSystemDef {
            burn_time_s: 30.0,
            tank_diameter_m: 0.2,
            structure_mass_per_length_kg_per_m: 2.5,
            structure_reference_diameter_m: 0.2,
            oxidizer: TankFluidDef {
                species: "N2O".to_string(),
                state: StateDef::TQ {
                    temperature_k: 298.15,
                    quality: 0.0,
                },
                dead_fraction: 0.05,
                dead_phase: DeadPhaseDef::Gas,
            },
            fuel: TankFluidDef {
                species: "Ethanol".to_string(),
                state: StateDef::PT {
                    pressure_pa: 30.0e5,
                    temperature_k: 298.15,
                },
                dead_fraction: 0.05,
                dead_phase: DeadPhaseDef::Liquid,
            },
            stack: vec![StackItemDef::OxidizerTank],
        });
        assert!(matches!(
            validate_project(&p),
            Err(ValidationError::InvalidStack { .. })
        ));

        if let Some(t) = p.tanks.as_mut() {
            t.stack.push(StackItemDef::FuelTank);
        }
        validate_project(&p).unwrap();

        if let Some(t) = p.tanks.as_mut() {
            t.oxidizer.species = "Kryptonite".to_string();
        }
        assert!(matches!(
            validate_project(&p),
            Err(ValidationError::UnknownName { .. })
        ));
    }
}
