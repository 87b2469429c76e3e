use rail_shared::{BerthType, FareClass};
use rand::Rng;
use serde::{Deserialize, Serialize};

const CHAIR_CAR_ROWS: u32 = 10;
const CHAIR_CAR_LETTERS: [char; 6] = ['A', 'B', 'C', 'D', 'E', 'F'];
const SIDE_BERTHS_PER_BAY: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeatStatus {
    Available,
    Reserved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeatCategory {
    General,
    Ladies,
    Senior,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeatPosition {
    Main,
    Side,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seat {
    pub id: u32,
    pub number: String,
    pub status: SeatStatus,
    pub category: SeatCategory,
    pub berth_type: BerthType,
    pub compartment: String,
    pub position: SeatPosition,
}

impl Seat {
    pub fn is_available(&self) -> bool {
        self.status == SeatStatus::Available
    }
}

/// Bays and main berths per bay for sleeper-style coaches.
fn bay_shape(class: &FareClass) -> (u32, u32) {
    match class {
        FareClass::ThirdAc => (8, 6),
        _ => (6, 4),
    }
}

fn main_berth(class: &FareClass, index: u32) -> BerthType {
    match class {
        FareClass::ThirdAc => match index % 3 {
            0 => BerthType::Lower,
            1 => BerthType::Middle,
            _ => BerthType::Upper,
        },
        _ => {
            if index % 2 == 0 {
                BerthType::Lower
            } else {
                BerthType::Upper
            }
        }
    }
}

/// Fresh randomized layout for one coach of `class`. Availability is not persisted.
pub fn generate_layout(class: &FareClass) -> Vec<Seat> {
    generate_layout_with(class, &mut rand::thread_rng())
}

pub fn generate_layout_with<R: Rng + ?Sized>(class: &FareClass, rng: &mut R) -> Vec<Seat> {
    match class {
        FareClass::ChairCar => chair_car_layout(rng),
        _ => bay_layout(class, rng),
    }
}

fn chair_car_layout<R: Rng + ?Sized>(rng: &mut R) -> Vec<Seat> {
    let per_row = CHAIR_CAR_LETTERS.len() as u32;
    (0..CHAIR_CAR_ROWS * per_row)
        .map(|i| {
            let row = i / per_row + 1;
            let letter = CHAIR_CAR_LETTERS[(i % per_row) as usize];
            let status = if rng.gen::<f64>() > 0.5 {
                SeatStatus::Available
            } else {
                SeatStatus::Reserved
            };
            let category = if rng.gen::<f64>() > 0.9 {
                SeatCategory::Ladies
            } else {
                SeatCategory::General
            };
            Seat {
                id: i + 1,
                number: format!("{}{}", row, letter),
                status,
                category,
                berth_type: BerthType::Seat,
                compartment: format!("C{}", row),
                position: SeatPosition::Main,
            }
        })
        .collect()
}

fn bay_layout<R: Rng + ?Sized>(class: &FareClass, rng: &mut R) -> Vec<Seat> {
    let (bays, main_per_bay) = bay_shape(class);
    let per_bay = main_per_bay + SIDE_BERTHS_PER_BAY;
    let mut seats = Vec::with_capacity((bays * per_bay) as usize);

    for i in 0..bays * per_bay {
        let bay = i / per_bay + 1;
        let slot = i % per_bay;
        let (berth_type, position) = match slot.checked_sub(main_per_bay) {
            None => (main_berth(class, slot), SeatPosition::Main),
            Some(0) => (BerthType::SideLower, SeatPosition::Side),
            Some(_) => (BerthType::SideUpper, SeatPosition::Side),
        };

        let status = if rng.gen::<f64>() > 0.5 {
            SeatStatus::Available
        } else {
            SeatStatus::Reserved
        };
        let category = if rng.gen::<f64>() > 0.9 {
            SeatCategory::Ladies
        } else if rng.gen::<f64>() > 0.95 {
            SeatCategory::Senior
        } else {
            SeatCategory::General
        };

        seats.push(Seat {
            id: i + 1,
            number: (i + 1).to_string(),
            status,
            category,
            berth_type,
            compartment: format!("B{}", bay),
            position,
        });
    }
    seats
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::BTreeSet;

    #[test]
    fn test_third_ac_layout() {
        let seats = generate_layout_with(&FareClass::ThirdAc, &mut StdRng::seed_from_u64(7));
        assert_eq!(seats.len(), 64);

        let bays: BTreeSet<_> = seats.iter().map(|s| s.compartment.clone()).collect();
        assert_eq!(bays.len(), 8);
        assert!(bays.contains("B1") && bays.contains("B8"));

        let first_bay: Vec<_> = seats[..8].iter().map(|s| s.berth_type).collect();
        assert_eq!(
            first_bay,
            vec![
                BerthType::Lower,
                BerthType::Middle,
                BerthType::Upper,
                BerthType::Lower,
                BerthType::Middle,
                BerthType::Upper,
                BerthType::SideLower,
                BerthType::SideUpper,
            ]
        );
        assert_eq!(seats[6].position, SeatPosition::Side);
        assert_eq!(seats[63].number, "64");
    }

    #[test]
    fn test_chair_car_layout() {
        let seats = generate_layout_with(&FareClass::ChairCar, &mut StdRng::seed_from_u64(7));
        assert_eq!(seats.len(), 60);
        assert_eq!(seats[0].number, "1A");
        assert_eq!(seats[5].number, "1F");
        assert_eq!(seats[59].number, "10F");
        assert_eq!(seats[59].compartment, "C10");
        assert!(seats.iter().all(|s| s.berth_type == BerthType::Seat));
        assert!(seats.iter().all(|s| s.category != SeatCategory::Senior));
    }

    #[test]
    fn test_other_classes_use_small_bays() {
        for class in [FareClass::SecondAc, FareClass::Sleeper, FareClass::from_code("EC")] {
            let seats = generate_layout_with(&class, &mut StdRng::seed_from_u64(1));
            assert_eq!(seats.len(), 36);
            assert!(seats.iter().all(|s| s.berth_type != BerthType::Middle));
            assert_eq!(seats[4].berth_type, BerthType::SideLower);
            assert_eq!(seats[6].compartment, "B2");
        }
    }

    #[test]
    fn test_seeded_layouts_repeat() {
        let a = generate_layout_with(&FareClass::ThirdAc, &mut StdRng::seed_from_u64(99));
        let b = generate_layout_with(&FareClass::ThirdAc, &mut StdRng::seed_from_u64(99));
        assert_eq!(a, b);
    }
}
