// src/assembly/knee_wall.rs

use super::AssemblyCode;

/// Layer properties for a wood-framed knee wall with gypsum on the interior.
///
/// Values from https://coloradoenergy.org/procorner/stuff/r-values.htm
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KneeWallConstants {
    /// Interior air film, applied on both faces.
    pub int_air_film_r_value: f64,
    pub gyp_r_value: f64,
    /// R-value of a wood stud across its depth.
    pub wood_stud_r_value: f64,
    /// On-center stud spacing, inches.
    pub stud_spacing: f64,
    /// Stud width, inches.
    pub wood_stud_width: f64,
}

impl Default for KneeWallConstants {
    fn default() -> Self {
        Self {
            int_air_film_r_value: 0.68,
            gyp_r_value: 0.45,
            wood_stud_r_value: 4.38,
            stud_spacing: 16.0,
            wood_stud_width: 3.5,
        }
    }
}

impl KneeWallConstants {
    /// Share of the wall width taken up by studs.
    pub fn framing_fraction(&self) -> f64 {
        self.wood_stud_width / self.stud_spacing
    }

    /// Effective R-value of the whole assembly.
    ///
    /// Air films and gypsum are in series with the framed layer; the framed
    /// layer is a parallel path of stud and cavity weighted by framing
    /// fraction. An uninsulated cavity contributes nothing.
    pub fn assembly_r_value(&self, cavity_r_value: u32) -> f64 {
        let mut r_value = 2.0 * self.int_air_film_r_value + self.gyp_r_value;
        if cavity_r_value > 0 {
            let framing = self.framing_fraction();
            r_value += 1.0
                / (framing / self.wood_stud_r_value
                    + (1.0 - framing) / f64::from(cavity_r_value));
        }
        r_value
    }
}

/// One row of the knee wall lookup table.
#[derive(Debug, Clone, PartialEq)]
pub struct AssemblyRecord {
    pub code: AssemblyCode,
    pub u_value: f64,
    pub r_value: f64,
}

impl AssemblyRecord {
    pub fn compute(code: AssemblyCode, constants: &KneeWallConstants) -> Self {
        let r_value = constants.assembly_r_value(code.cavity_r_value());
        Self {
            code,
            u_value: 1.0 / r_value,
            r_value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(code: &str) -> AssemblyRecord {
        AssemblyRecord::compute(
            AssemblyCode::parse(code).unwrap(),
            &KneeWallConstants::default(),
        )
    }

    #[test]
    fn test_uninsulated_is_films_and_gypsum() {
        let rec = record("kwwf00");
        assert_eq!(rec.r_value, 2.0 * 0.68 + 0.45);
        assert_eq!(format!("{:.1}", rec.r_value), "1.8");
        assert_eq!(format!("{:.3}", rec.u_value), "0.552");
    }

    #[test]
    fn test_r13_parallel_path() {
        let rec = record("kwwf13");
        let framing = 3.5 / 16.0;
        let expected = 0.68 + 0.68 + 0.45 + 1.0 / (framing / 4.38 + (1.0 - framing) / 13.0);
        assert!((rec.r_value - expected).abs() < 1e-12);
        assert_eq!(format!("{:.1}", rec.r_value), "10.9");
        assert_eq!(format!("{:.3}", rec.u_value), "0.092");
    }

    #[test]
    fn test_u_is_reciprocal_of_r() {
        for code in ["kwwf03", "kwwf07", "kwwf11", "kwwf15", "kwwf19", "kwwf21"] {
            let rec = record(code);
            assert!((rec.u_value * rec.r_value - 1.0).abs() < 1e-12, "{code}");
        }
    }

    #[test]
    fn test_r_value_grows_with_cavity() {
        let c = KneeWallConstants::default();
        let values: Vec<f64> = [0, 3, 7, 11, 13, 15, 19, 21]
            .iter()
            .map(|&r| c.assembly_r_value(r))
            .collect();
        assert!(values.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_framing_caps_effective_value() {
        // Studs short-circuit the cavity, so the framed layer stays well under
        // the nominal cavity value.
        let c = KneeWallConstants::default();
        let framed_layer = c.assembly_r_value(21) - c.assembly_r_value(0);
        assert!(framed_layer < 21.0);
        assert_eq!(format!("{:.1}", c.assembly_r_value(21)), "13.3");
    }
}
