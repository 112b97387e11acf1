//! Exact physical constants (2019 SI redefinition).
//!
//! The band-gap conversion E = h·c/λ is required to use exact constants, so
//! these are the defining values, not CODATA fits.

/// Planck constant in J·s (exact).
pub const PLANCK_CONSTANT: f64 = 6.62607015e-34;

/// Speed of light in vacuum in m/s (exact).
pub const SPEED_OF_LIGHT: f64 = 299_792_458.0;

/// Elementary charge in C (exact). One electronvolt is this many joules.
pub const ELEMENTARY_CHARGE: f64 = 1.602176634e-19;

/// h·c expressed in eV·nm, derived from the exact constants above.
///
/// Dividing this by a wavelength in nanometers gives the photon energy in
/// electronvolts (≈ 1239.84 eV·nm).
pub const HC_EV_NM: f64 = PLANCK_CONSTANT * SPEED_OF_LIGHT / ELEMENTARY_CHARGE * 1e9;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hc_ev_nm() {
        // Known value of the photon energy-wavelength product.
        assert!((HC_EV_NM - 1239.8419843320026).abs() < 1e-9);
    }
}
