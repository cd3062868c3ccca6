//! Per-pathway connection profile.
//!
//! Translates the six bilateral connection factors into a connection score
//! for each introduction pathway. Each pathway score is one of 0, 1, 1.5 or 2.
//! `None` factors count as 0.

use crate::assessment::ConnectionRecord;
use crate::pathways::{Pathway, PathwayScores};

/// Derives the connection score of every pathway from one connection record.
pub fn connection_scores_per_pathway(record: &ConnectionRecord) -> PathwayScores {
    let live_animal_contact = record.live_animal_contact.unwrap_or(0);
    let legal_import = record.legal_import.unwrap_or(0);
    let proximity = record.proximity.unwrap_or(0);
    let illegal_import = record.illegal_import.unwrap_or(0);
    let connection = record.connection.unwrap_or(0);
    let livestock_density = record.livestock_density.unwrap_or(0);

    let mut scores = PathwayScores::default();
    scores.set(Pathway::Airborne, airborne(livestock_density, proximity));
    scores.set(
        Pathway::Vectorborne,
        vectorborne(livestock_density, proximity, connection),
    );
    scores.set(Pathway::WildAnimals, wild_animals(livestock_density, proximity));
    scores.set(Pathway::AnimalProduct, animal_product(legal_import, illegal_import));
    scores.set(Pathway::LiveAnimal, live_animal(live_animal_contact, proximity));
    scores.set(Pathway::Fomite, fomite(connection, proximity));
    scores
}

fn airborne(livestock_density: u8, proximity: u8) -> f64 {
    if livestock_density > 0 && proximity > 1 {
        2.0
    } else if proximity > 1 {
        1.0
    } else {
        0.0
    }
}

fn vectorborne(livestock_density: u8, proximity: u8, connection: u8) -> f64 {
    if (proximity > 1 && livestock_density > 0) || connection > 2 {
        2.0
    } else if proximity > 1 || connection > 1 {
        1.5
    } else if proximity == 1 || connection == 1 {
        1.0
    } else {
        0.0
    }
}

// Only shared borders (proximity 3) let wildlife carry the disease across.
fn wild_animals(livestock_density: u8, proximity: u8) -> f64 {
    match (proximity, livestock_density) {
        (3, 0) => 1.0,
        (3, _) => 2.0,
        _ => 0.0,
    }
}

fn animal_product(legal_import: u8, illegal_import: u8) -> f64 {
    match legal_import.max(illegal_import) {
        0 => 0.0,
        1 => 1.0,
        2 => 1.5,
        _ => 2.0,
    }
}

fn live_animal(live_animal_contact: u8, proximity: u8) -> f64 {
    match live_animal_contact {
        3..=u8::MAX => 2.0,
        2 => 1.5,
        1 => 1.0,
        _ if proximity == 3 => 1.0,
        _ => 0.0,
    }
}

fn fomite(connection: u8, proximity: u8) -> f64 {
    if connection == 3 {
        2.0
    } else if proximity > 1 || connection > 1 {
        1.5
    } else if proximity == 1 || connection == 1 {
        1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::ConnectionField;

    fn record(values: [u8; 6]) -> ConnectionRecord {
        let mut record = ConnectionRecord::empty(1);
        for (field, value) in ConnectionField::ALL.into_iter().zip(values) {
            record.set(field, Some(value));
        }
        record
    }

    #[test]
    fn test_no_connection_gives_zero_profile() {
        let scores = connection_scores_per_pathway(&ConnectionRecord::empty(1));
        assert_eq!(scores.total(), 0.0);
    }

    #[test]
    fn test_strong_neighbour_profile() {
        // liveAnimalContact, legalImport, proximity, illegalImport, connection, livestockDensity
        let scores = connection_scores_per_pathway(&record([3, 3, 3, 3, 3, 1]));
        assert_eq!(scores.airborne, 2.0);
        assert_eq!(scores.vectorborne, 2.0);
        assert_eq!(scores.wild_animals, 2.0);
        assert_eq!(scores.animal_product, 2.0);
        assert_eq!(scores.live_animal, 2.0);
        assert_eq!(scores.fomite, 2.0);
    }

    #[test]
    fn test_distant_trade_partner_profile() {
        let scores = connection_scores_per_pathway(&record([0, 2, 1, 1, 2, 0]));
        assert_eq!(scores.airborne, 0.0);
        assert_eq!(scores.vectorborne, 1.5);
        assert_eq!(scores.wild_animals, 0.0);
        assert_eq!(scores.animal_product, 1.5);
        assert_eq!(scores.live_animal, 0.0);
        assert_eq!(scores.fomite, 1.5);
    }

    #[test]
    fn test_border_without_livestock() {
        let scores = connection_scores_per_pathway(&record([0, 0, 3, 0, 0, 0]));
        assert_eq!(scores.airborne, 1.0);
        assert_eq!(scores.wild_animals, 1.0);
        assert_eq!(scores.live_animal, 1.0);
        assert_eq!(scores.vectorborne, 1.5);
    }
}
