//! Unit spellings shared by the simulation adapter and the conversion stage.

/// Suffix marking a per-hour rate unit after canonicalization.
pub const RATE_SUFFIX: &str = "/hr";

/// Canonical spelling of a unit.
///
/// Flowsheet exports mix spellings ("m3/hour", "kw", "l/h", "PPM"); this maps
/// the known aliases onto one vocabulary and leaves anything else as written
/// (trimmed) so an unknown unit is reported verbatim.
pub fn canonical_unit(unit: &str) -> String {
    let trimmed = unit.trim();
    let (base, rate) = split_rate(trimmed);
    let base = match base.to_lowercase().as_str() {
        "kg" | "kilogram" | "kilograms" => "kg".to_string(),
        "g" | "gram" | "grams" => "g".to_string(),
        "mg" | "milligram" | "milligrams" => "mg".to_string(),
        "t" | "tonne" | "tonnes" | "metric ton" => "t".to_string(),
        "l" | "liter" | "litre" | "liters" | "litres" => "L".to_string(),
        "ml" => "mL".to_string(),
        "m3" | "m^3" | "m³" | "cubic meter" | "cubic metre" => "m3".to_string(),
        "j" => "J".to_string(),
        "kj" => "kJ".to_string(),
        "mj" | "megajoule" => "MJ".to_string(),
        "gj" => "GJ".to_string(),
        "wh" => "Wh".to_string(),
        "kwh" | "kw*h" => "kWh".to_string(),
        "mwh" => "MWh".to_string(),
        "w" | "watt" | "watts" => "W".to_string(),
        "kw" | "kilowatt" => "kW".to_string(),
        "mw" | "megawatt" => "MW".to_string(),
        "kg/kg" => "kg/kg".to_string(),
        "g/kg" => "g/kg".to_string(),
        "mg/kg" => "mg/kg".to_string(),
        "ppm" | "ppmw" => "ppm".to_string(),
        "ppb" | "ppbw" => "ppb".to_string(),
        "mass fraction" | "mass frac" | "wt fraction" => "mass fraction".to_string(),
        "%" | "wt%" | "wt %" | "mass %" => "%".to_string(),
        "mg/l" => "mg/L".to_string(),
        "g/l" => "g/L".to_string(),
        "kg/m3" | "kg/m^3" | "kg/m³" => "kg/m3".to_string(),
        _ => base.to_string(),
    };
    if rate {
        format!("{base}{RATE_SUFFIX}")
    } else {
        base
    }
}

fn split_rate(unit: &str) -> (&str, bool) {
    for suffix in ["/hr", "/hour", "/h"] {
        if unit.len() > suffix.len() && unit.to_lowercase().ends_with(suffix) {
            if let Some(base) = unit.get(..unit.len() - suffix.len()) {
                return (base.trim_end(), true);
            }
        }
    }
    (unit, false)
}
