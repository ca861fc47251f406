// eg-core/src/units.rs

use uom::si::f64::{
    Acceleration as UomAcceleration, Area as UomArea, Force as UomForce, Length as UomLength,
    Mass as UomMass, MassDensity as UomMassDensity, MassRate as UomMassRate,
    Pressure as UomPressure, Ratio as UomRatio, TemperatureInterval as UomTemperatureInterval,
    ThermodynamicTemperature as UomThermodynamicTemperature, Time as UomTime,
    Velocity as UomVelocity,
};

// Public canonical unit types (SI, f64)
pub type Accel = UomAcceleration;
pub type Area = UomArea;
pub type Force = UomForce;
pub type Length = UomLength;
pub type Mass = UomMass;
pub type Density = UomMassDensity;
pub type MassRate = UomMassRate;
pub type Pressure = UomPressure;
pub type Ratio = UomRatio;
pub type TempInterval = UomTemperatureInterval;
pub type Temperature = UomThermodynamicTemperature;
pub type Time = UomTime;
pub type Velocity = UomVelocity;

#[inline]
pub fn pa(v: f64) -> Pressure {
    use uom::si::pressure::pascal;
    Pressure::new::<pascal>(v)
}

#[inline]
pub fn bar(v: f64) -> Pressure {
    use uom::si::pressure::bar;
    Pressure::new::<bar>(v)
}

#[inline]
pub fn k(v: f64) -> Temperature {
    use uom::si::thermodynamic_temperature::kelvin;
    Temperature::new::<kelvin>(v)
}

#[inline]
pub fn kgps(v: f64) -> MassRate {
    use uom::si::mass_rate::kilogram_per_second;
    MassRate::new::<kilogram_per_second>(v)
}

#[inline]
pub fn kg(v: f64) -> Mass {
    use uom::si::mass::kilogram;
    Mass::new::<kilogram>(v)
}

#[inline]
pub fn kgpm3(v: f64) -> Density {
    use uom::si::mass_density::kilogram_per_cubic_meter;
    Density::new::<kilogram_per_cubic_meter>(v)
}

#[inline]
pub fn m(v: f64) -> Length {
    use uom::si::length::meter;
    Length::new::<meter>(v)
}

#[inline]
pub fn m2(v: f64) -> Area {
    use uom::si::area::square_meter;
    Area::new::<square_meter>(v)
}

#[inline]
pub fn mps(v: f64) -> Velocity {
    use uom::si::velocity::meter_per_second;
    Velocity::new::<meter_per_second>(v)
}

#[inline]
pub fn newtons(v: f64) -> Force {
    use uom::si::force::newton;
    Force::new::<newton>(v)
}

#[inline]
pub fn s(v: f64) -> Time {
    use uom::si::time::second;
    Time::new::<second>(v)
}

#[inline]
pub fn unitless(v: f64) -> Ratio {
    use uom::si::ratio::ratio;
    Ratio::new::<ratio>(v)
}

/// Degrees Rankine to Kelvin.
#[inline]
pub fn rankine_to_kelvin(t_r: f64) -> f64 {
    t_r * 5.0 / 9.0
}

pub mod constants {
    use super::*;

    pub const G0_MPS2: f64 = 9.806_65;

    /// Universal gas constant [J/(kmol·K)]
    pub const R_UNIVERSAL: f64 = 8314.462_618;

    /// Thermochemical calorie [J]
    pub const CAL_TO_J: f64 = 4.184;

    /// Standard reference temperature for storable propellants [K]
    pub const T_STD_K: f64 = 298.15;

    #[inline]
    pub fn g0() -> Accel {
        use uom::si::acceleration::meter_per_second_squared;
        Accel::new::<meter_per_second_squared>(G0_MPS2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_smoke() {
        let _p = pa(101_325.0);
        let _t = k(300.0);
        let _mdot = kgps(1.2);
        let _l = m(2.0);
        let _dt = s(0.1);
        let _r = unitless(0.5);
        let _g0 = constants::g0();
        let _f = newtons(5000.0);
    }

    #[test]
    fn bar_is_1e5_pa() {
        assert!((bar(25.0).value - 25.0e5).abs() < 1e-6);
    }

    #[test]
    fn rankine_converts_to_kelvin() {
        assert!((rankine_to_kelvin(536.67) - 298.15).abs() < 1e-9);
    }
}
