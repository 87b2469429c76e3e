use rail_shared::FareClass;
use serde::Deserialize;

use crate::{CoreError, CoreResult};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOption {
    #[default]
    Default,
    Cheapest,
    Fastest,
    Comfort,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrainSearchRequest {
    pub from: Option<String>,
    pub to: Option<String>,
    pub class: Option<FareClass>,
    #[serde(default)]
    pub sort: SortOption,
}

impl TrainSearchRequest {
    pub fn validate(&self) -> CoreResult<()> {
        if let (Some(from), Some(to)) = (&self.from, &self.to) {
            if !from.trim().is_empty() && from.trim().eq_ignore_ascii_case(to.trim()) {
                return Err(CoreError::ValidationError(
                    "Source and destination cannot be the same".to_string(),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_request_deserialization() {
        let json = r#"
            {
                "from": "Mumbai",
                "to": "Delhi",
                "class": "CC",
                "sort": "fastest"
            }
        "#;
        let req: TrainSearchRequest = serde_json::from_str(json).expect("Failed to deserialize");
        assert_eq!(req.class, Some(FareClass::ChairCar));
        assert_eq!(req.sort, SortOption::Fastest);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_same_station_is_rejected() {
        let req = TrainSearchRequest {
            from: Some("Delhi".to_string()),
            to: Some("delhi".to_string()),
            ..Default::default()
        };
        assert!(matches!(req.validate(), Err(CoreError::ValidationError(_))));
    }
}
