use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

/// Largest coordinate drift applied on each refresh, in degrees.
pub const POSITION_JITTER: f64 = 0.005;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveTrain {
    pub id: String,
    pub name: String,
    pub number: String,
    pub route: String,
    pub current_location: GeoPoint,
    pub next_station: String,
    pub speed: String,
    pub delay: String,
    pub occupancy: String,
    pub amenities: Vec<String>,
    pub last_updated: DateTime<Utc>,
}

/// Simulated positions for the live tracking map.
pub struct TrainTracker {
    trains: RwLock<Vec<LiveTrain>>,
}

impl TrainTracker {
    pub fn new(trains: Vec<LiveTrain>) -> Self {
        Self {
            trains: RwLock::new(trains),
        }
    }

    pub fn demo() -> Self {
        #[allow(clippy::too_many_arguments)]
        fn train(
            id: &str,
            name: &str,
            number: &str,
            route: &str,
            current_location: GeoPoint,
            next_station: &str,
            speed: &str,
            delay: &str,
            occupancy: &str,
            amenities: &[&str],
        ) -> LiveTrain {
            LiveTrain {
                id: id.to_string(),
                name: name.to_string(),
                number: number.to_string(),
                route: route.to_string(),
                current_location,
                next_station: next_station.to_string(),
                speed: speed.to_string(),
                delay: delay.to_string(),
                occupancy: occupancy.to_string(),
                amenities: amenities.iter().map(|a| a.to_string()).collect(),
                last_updated: Utc::now(),
            }
        }

        Self::new(vec![
            train(
                "12345",
                "Rajdhani Express",
                "12951",
                "Mumbai Central - New Delhi",
                GeoPoint { lat: 19.0760, lng: 72.8777 },
                "Borivali",
                "85 km/h",
                "On Time",
                "85%",
                &["WiFi", "AC", "Food"],
            ),
            train(
                "12346",
                "Shatabdi Express",
                "12009",
                "Chennai - Bangalore",
                GeoPoint { lat: 13.0827, lng: 80.2707 },
                "Katpadi",
                "92 km/h",
                "5 mins late",
                "72%",
                &["WiFi", "Food"],
            ),
            train(
                "12347",
                "Duronto Express",
                "12261",
                "Howrah - Delhi",
                GeoPoint { lat: 22.5726, lng: 88.3639 },
                "Dhanbad",
                "78 km/h",
                "On Time",
                "91%",
                &["AC", "Food"],
            ),
            train(
                "12348",
                "Garib Rath",
                "12201",
                "Delhi - Jammu",
                GeoPoint { lat: 28.7041, lng: 77.1025 },
                "Sonipat",
                "65 km/h",
                "10 mins late",
                "68%",
                &["AC"],
            ),
            train(
                "12349",
                "Tejas Express",
                "22119",
                "Mumbai - Goa",
                GeoPoint { lat: 18.5204, lng: 73.8567 },
                "Satara",
                "88 km/h",
                "On Time",
                "79%",
                &["WiFi", "AC", "Food", "Entertainment"],
            ),
        ])
    }

    pub async fn snapshot(&self) -> Vec<LiveTrain> {
        self.trains.read().await.clone()
    }

    pub async fn refresh(&self) {
        self.refresh_with(&mut StdRng::from_entropy()).await;
    }

    pub async fn refresh_with<R: Rng + Send>(&self, rng: &mut R) {
        let mut trains = self.trains.write().await;
        jitter(&mut trains, rng, Utc::now());
    }
}

fn jitter<R: Rng + ?Sized>(trains: &mut [LiveTrain], rng: &mut R, now: DateTime<Utc>) {
    for train in trains.iter_mut() {
        train.current_location.lat += rng.gen_range(-POSITION_JITTER..=POSITION_JITTER);
        train.current_location.lng += rng.gen_range(-POSITION_JITTER..=POSITION_JITTER);
        train.last_updated = now;
    }
    tracing::debug!("Refreshed {} tracked trains", trains.len());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_refresh_moves_trains_within_jitter() {
        let tracker = TrainTracker::demo();
        let before = tracker.snapshot().await;
        assert_eq!(before.len(), 5);

        tracker.refresh_with(&mut StdRng::seed_from_u64(3)).await;
        let after = tracker.snapshot().await;

        for (old, new) in before.iter().zip(after.iter()) {
            assert!((old.current_location.lat - new.current_location.lat).abs() <= POSITION_JITTER);
            assert!((old.current_location.lng - new.current_location.lng).abs() <= POSITION_JITTER);
            assert!(new.last_updated >= old.last_updated);
        }

        tracker.refresh().await;
        assert_eq!(tracker.snapshot().await.len(), 5);
    }

    #[test]
    fn test_live_train_wire_shape() {
        let tracker = TrainTracker::demo();
        let trains = tracker.trains.try_read().unwrap();
        let json = serde_json::to_value(&trains[0]).unwrap();
        assert_eq!(json["nextStation"], "Borivali");
        assert!(json["currentLocation"]["lat"].is_number());
    }
}
