//! Supplier identification by marker tokens.

use tracing::debug;

use crate::models::invoice::Supplier;

/// Marker tokens per supplier, tested in order against the upper-cased text.
const MARKERS: &[(Supplier, &[&str])] = &[
    (Supplier::PpcEnergie, &["PPC ENERGIE", "COD ELECTEL", "MYPPC"]),
    (
        Supplier::Electrica,
        &["E-DISTRIBUTIE", "E-DISTRIBUȚIE", "EDISTRIBUTIE", "ELECTRICA"],
    ),
    (Supplier::PremierEnergy, &["PREMIER ENERGY", "PREMIER"]),
    (Supplier::CezVanzare, &["CEZ", "C.E.Z"]),
    (Supplier::EnelEnergie, &["ENEL"]),
    (Supplier::Eon, &["E.ON", "EON "]),
];

/// Identify the issuing supplier. The first supplier with any marker present wins.
pub fn classify(text: &str) -> Supplier {
    let upper = text.to_uppercase();
    let supplier = MARKERS
        .iter()
        .find(|(_, tokens)| tokens.iter().any(|token| upper.contains(token)))
        .map_or(Supplier::Unknown, |(supplier, _)| *supplier);

    debug!(supplier = %supplier, "classified supplier");
    supplier
}
