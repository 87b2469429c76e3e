use rail_core::search::{SortOption, TrainSearchRequest};
use rail_shared::FareClass;
use serde::{Deserialize, Serialize};

/// A scheduled train offering one class of service
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Train {
    pub id: u32,
    pub name: String,
    pub number: String,
    pub from: String,
    pub to: String,
    pub departure: String,
    pub arrival: String,
    pub duration: String,
    pub duration_minutes: u32,
    /// Per-seat fare in rupees.
    pub fare: i32,
    pub availability: String,
    pub class: FareClass,
    /// 1 (basic) to 5.
    pub comfort: u8,
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Train not found: {0}")]
    TrainNotFound(u32),
}

pub struct TrainCatalog {
    trains: Vec<Train>,
}

impl TrainCatalog {
    pub fn new(trains: Vec<Train>) -> Self {
        Self { trains }
    }

    /// The five Mumbai to Delhi services offered by the demo.
    pub fn demo() -> Self {
        #[allow(clippy::too_many_arguments)]
        fn train(
            id: u32,
            name: &str,
            number: &str,
            departure: &str,
            arrival: &str,
            duration: &str,
            duration_minutes: u32,
            fare: i32,
            availability: &str,
            class: FareClass,
            comfort: u8,
        ) -> Train {
            Train {
                id,
                name: name.to_string(),
                number: number.to_string(),
                from: "Mumbai".to_string(),
                to: "Delhi".to_string(),
                departure: departure.to_string(),
                arrival: arrival.to_string(),
                duration: duration.to_string(),
                duration_minutes,
                fare,
                availability: availability.to_string(),
                class,
                comfort,
            }
        }

        Self::new(vec![
            train(
                1,
                "Rajdhani Express",
                "12301",
                "16:55",
                "08:35",
                "15h 40m",
                940,
                2850,
                "Available - 42",
                FareClass::ThirdAc,
                4,
            ),
            train(
                2,
                "Shatabdi Express",
                "12002",
                "06:25",
                "14:30",
                "8h 5m",
                485,
                1890,
                "Available - 18",
                FareClass::ChairCar,
                3,
            ),
            train(
                3,
                "Duronto Express",
                "12263",
                "20:15",
                "10:05",
                "13h 50m",
                830,
                2450,
                "RAC - 3",
                FareClass::SecondAc,
                4,
            ),
            train(
                4,
                "Garib Rath",
                "12213",
                "22:30",
                "16:45",
                "18h 15m",
                1095,
                1200,
                "Available - 25",
                FareClass::ThirdAc,
                2,
            ),
            train(
                5,
                "Tejas Express",
                "22119",
                "05:15",
                "11:30",
                "6h 15m",
                375,
                3200,
                "Available - 12",
                FareClass::ChairCar,
                5,
            ),
        ])
    }

    pub fn all(&self) -> &[Train] {
        &self.trains
    }

    pub fn get(&self, id: u32) -> Result<&Train, CatalogError> {
        self.trains
            .iter()
            .find(|t| t.id == id)
            .ok_or(CatalogError::TrainNotFound(id))
    }

    /// Filter by route and class, then sort. `SortOption::Default` keeps catalog order.
    pub fn search(&self, request: &TrainSearchRequest) -> Vec<Train> {
        let station_matches = |wanted: &Option<String>, actual: &str| match wanted {
            Some(w) if !w.trim().is_empty() => actual.eq_ignore_ascii_case(w.trim()),
            _ => true,
        };

        let mut results: Vec<Train> = self
            .trains
            .iter()
            .filter(|t| station_matches(&request.from, &t.from))
            .filter(|t| station_matches(&request.to, &t.to))
            .filter(|t| request.class.as_ref().map_or(true, |c| &t.class == c))
            .cloned()
            .collect();

        match request.sort {
            SortOption::Default => {}
            SortOption::Cheapest => results.sort_by_key(|t| t.fare),
            SortOption::Fastest => results.sort_by_key(|t| t.duration_minutes),
            SortOption::Comfort => results.sort_by(|a, b| b.comfort.cmp(&a.comfort)),
        }
        results
    }
}

impl Default for TrainCatalog {
    fn default() -> Self {
        Self::demo()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(trains: &[Train]) -> Vec<&str> {
        trains.iter().map(|t| t.name.as_str()).collect()
    }

    #[test]
    fn test_default_order_is_catalog_order() {
        let catalog = TrainCatalog::demo();
        let results = catalog.search(&TrainSearchRequest::default());
        assert_eq!(results.len(), 5);
        assert_eq!(results[0].name, "Rajdhani Express");
    }

    #[test]
    fn test_sort_options() {
        let catalog = TrainCatalog::demo();

        let cheapest = catalog.search(&TrainSearchRequest {
            sort: SortOption::Cheapest,
            ..Default::default()
        });
        assert_eq!(cheapest[0].name, "Garib Rath");

        let fastest = catalog.search(&TrainSearchRequest {
            sort: SortOption::Fastest,
            ..Default::default()
        });
        assert_eq!(fastest[0].name, "Tejas Express");

        let comfort = catalog.search(&TrainSearchRequest {
            sort: SortOption::Comfort,
            ..Default::default()
        });
        // Ties keep catalog order
        assert_eq!(
            names(&comfort),
            vec!["Tejas Express", "Rajdhani Express", "Duronto Express", "Shatabdi Express", "Garib Rath"]
        );
    }

    #[test]
    fn test_class_and_route_filters() {
        let catalog = TrainCatalog::demo();
        let chair_cars = catalog.search(&TrainSearchRequest {
            from: Some("mumbai".to_string()),
            class: Some(FareClass::ChairCar),
            ..Default::default()
        });
        assert_eq!(names(&chair_cars), vec!["Shatabdi Express", "Tejas Express"]);

        let none = catalog.search(&TrainSearchRequest {
            to: Some("Chennai".to_string()),
            ..Default::default()
        });
        assert!(none.is_empty());
    }

    #[test]
    fn test_get_unknown_train() {
        assert!(matches!(
            TrainCatalog::demo().get(42),
            Err(CatalogError::TrainNotFound(42))
        ));
    }
}
