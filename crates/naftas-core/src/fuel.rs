//! Fuel-type codes and their brand-specific display names.

/// Returned for any (code, brand) pair the table does not know.
pub const UNKNOWN_FUEL: &str = "Tipo de Combustible Desconocido";

/// The fuel grades the dataset publishes for the tracked brands, in the
/// order they are presented to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FuelGrade {
    Super,
    Premium,
    Gnc,
    Diesel,
    DieselPremium,
}

impl FuelGrade {
    /// All grades in canonical display order.
    pub const ORDER: [FuelGrade; 5] = [
        FuelGrade::Super,
        FuelGrade::Premium,
        FuelGrade::Gnc,
        FuelGrade::Diesel,
        FuelGrade::DieselPremium,
    ];

    /// Map a dataset product code (`idproducto`) to a grade.
    #[must_use]
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            2 => Some(FuelGrade::Super),
            3 => Some(FuelGrade::Premium),
            6 => Some(FuelGrade::Gnc),
            19 => Some(FuelGrade::Diesel),
            21 => Some(FuelGrade::DieselPremium),
            _ => None,
        }
    }

    #[must_use]
    pub fn code(self) -> u32 {
        match self {
            FuelGrade::Super => 2,
            FuelGrade::Premium => 3,
            FuelGrade::Gnc => 6,
            FuelGrade::Diesel => 19,
            FuelGrade::DieselPremium => 21,
        }
    }

    /// Position in [`FuelGrade::ORDER`].
    #[must_use]
    pub fn rank(self) -> usize {
        self as usize
    }

    /// Brand-specific commercial name for this grade.
    ///
    /// GNC is sold under the same name everywhere; the liquid fuels are
    /// only known for the four tracked flags.
    #[must_use]
    pub fn display_name(self, brand: &str) -> Option<&'static str> {
        let names: [&'static str; 4] = match self {
            FuelGrade::Gnc => return Some("GNC"),
            FuelGrade::Super => ["SUPER", "Shell Super", "Axion SUPER", "PUMA Super"],
            FuelGrade::Premium => ["INFINIA", "Shell V-Power", "QUANTIUM", "MAX Premium"],
            FuelGrade::Diesel => [
                "DIESEL500",
                "Shell Evolux Diesel",
                "AXION Diesel X10",
                "PUMA Diesel",
            ],
            FuelGrade::DieselPremium => [
                "INFINIA DIESEL",
                "Shell V-Power Diesel",
                "QUANTIUM Diesel X10",
                "ION PUMA Diesel",
            ],
        };
        let column = match brand {
            "YPF" => 0,
            "SHELL C.A.P.S.A." => 1,
            "AXION" => 2,
            "PUMA" => 3,
            _ => return None,
        };
        Some(names[column])
    }
}

/// Resolve the display name for a product code sold under `brand`.
///
/// Total over its inputs: unknown codes or brands yield [`UNKNOWN_FUEL`].
#[must_use]
pub fn fuel_name(code: u32, brand: &str) -> &'static str {
    FuelGrade::from_code(code)
        .and_then(|grade| grade.display_name(brand))
        .unwrap_or(UNKNOWN_FUEL)
}
