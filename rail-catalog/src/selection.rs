use rail_shared::{FareClass, Passenger, PassengerUpdate};
use serde::Serialize;

use crate::seats::{generate_layout, Seat, SeatCategory};
use crate::train::Train;

pub const SENIOR_BERTH_POLICY: &str =
    "As per policy, senior citizens are preferred to book lower or side lower berths.";

#[derive(Debug, thiserror::Error)]
pub enum SelectionError {
    #[error("Seat not found: {0}")]
    UnknownSeat(u32),

    #[error("Seat {0} is already reserved")]
    SeatReserved(String),

    #[error("{}", SENIOR_BERTH_POLICY)]
    SeniorBerthPolicy,

    #[error("Seat {0} is not selected")]
    NotSelected(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Toggle {
    Selected,
    Deselected,
}

/// Seat picking state for one opened train.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatSelection {
    train_id: u32,
    class: FareClass,
    layout: Vec<Seat>,
    selected_seats: Vec<u32>,
    passengers: Vec<Passenger>,
}

impl SeatSelection {
    pub fn new(train_id: u32, class: FareClass, layout: Vec<Seat>) -> Self {
        Self {
            train_id,
            class,
            layout,
            selected_seats: Vec::new(),
            passengers: Vec::new(),
        }
    }

    /// Open a train with a freshly generated layout.
    pub fn open(train: &Train) -> Self {
        Self::new(train.id, train.class.clone(), generate_layout(&train.class))
    }

    pub fn train_id(&self) -> u32 {
        self.train_id
    }

    pub fn layout(&self) -> &[Seat] {
        &self.layout
    }

    pub fn selected_seats(&self) -> &[u32] {
        &self.selected_seats
    }

    pub fn passengers(&self) -> &[Passenger] {
        &self.passengers
    }

    pub fn is_empty(&self) -> bool {
        self.selected_seats.is_empty()
    }

    pub fn toggle(&mut self, seat_id: u32) -> Result<Toggle, SelectionError> {
        let seat = self
            .layout
            .iter()
            .find(|s| s.id == seat_id)
            .ok_or(SelectionError::UnknownSeat(seat_id))?;

        if let Some(pos) = self.selected_seats.iter().position(|id| *id == seat_id) {
            self.selected_seats.remove(pos);
            self.rebuild_passengers();
            return Ok(Toggle::Deselected);
        }

        if !seat.is_available() {
            return Err(SelectionError::SeatReserved(seat.number.clone()));
        }
        if seat.category == SeatCategory::Senior && !seat.berth_type.is_lower() {
            return Err(SelectionError::SeniorBerthPolicy);
        }

        self.selected_seats.push(seat_id);
        self.rebuild_passengers();
        Ok(Toggle::Selected)
    }

    pub fn update_passenger(
        &mut self,
        seat_id: u32,
        update: &PassengerUpdate,
    ) -> Result<&Passenger, SelectionError> {
        let passenger = self
            .passengers
            .iter_mut()
            .find(|p| p.id == seat_id)
            .ok_or(SelectionError::NotSelected(seat_id))?;
        update.apply(passenger);
        Ok(passenger)
    }

    /// Unique compartment labels, ordered by prefix then bay/row number.
    pub fn compartments(&self) -> Vec<String> {
        let mut labels: Vec<String> = self.layout.iter().map(|s| s.compartment.clone()).collect();
        labels.sort_by_key(|label| compartment_key(label));
        labels.dedup();
        labels
    }

    pub fn total_fare(&self, fare: i32) -> i32 {
        fare * self.selected_seats.len() as i32
    }

    fn rebuild_passengers(&mut self) {
        let previous = std::mem::take(&mut self.passengers);
        self.passengers = self
            .selected_seats
            .iter()
            .filter_map(|id| self.layout.iter().find(|s| s.id == *id))
            .map(|seat| {
                let mut passenger =
                    Passenger::for_seat(seat.id, seat.berth_type, &seat.compartment, &seat.number);
                if let Some(existing) = previous.iter().find(|p| p.id == seat.id) {
                    passenger.name = existing.name.clone();
                    passenger.age = existing.age;
                    passenger.gender = existing.gender;
                }
                passenger
            })
            .collect();
    }
}

fn compartment_key(label: &str) -> (String, u32) {
    let split = label.find(|c: char| c.is_ascii_digit()).unwrap_or(label.len());
    let (prefix, digits) = label.split_at(split);
    (prefix.to_string(), digits.parse().unwrap_or(0))
}
