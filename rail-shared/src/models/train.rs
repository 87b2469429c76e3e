use serde::{Deserialize, Serialize};
use std::fmt;

/// Class of service on a train, identified by its fare-class code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FareClass {
    /// `1A`
    FirstAc,
    /// `2A`
    SecondAc,
    /// `3A`
    ThirdAc,
    /// `CC`
    ChairCar,
    /// `SL`
    Sleeper,
    /// Any code not listed above, kept verbatim.
    Other(String),
}

impl FareClass {
    pub fn code(&self) -> &str {
        match self {
            FareClass::FirstAc => "1A",
            FareClass::SecondAc => "2A",
            FareClass::ThirdAc => "3A",
            FareClass::ChairCar => "CC",
            FareClass::Sleeper => "SL",
            FareClass::Other(code) => code,
        }
    }

    pub fn from_code(code: &str) -> Self {
        match code.trim().to_ascii_uppercase().as_str() {
            "1A" => FareClass::FirstAc,
            "2A" => FareClass::SecondAc,
            "3A" => FareClass::ThirdAc,
            "CC" => FareClass::ChairCar,
            "SL" => FareClass::Sleeper,
            _ => FareClass::Other(code.to_string()),
        }
    }
}

impl From<String> for FareClass {
    fn from(code: String) -> Self {
        FareClass::from_code(&code)
    }
}

impl From<FareClass> for String {
    fn from(class: FareClass) -> Self {
        class.code().to_string()
    }
}

impl fmt::Display for FareClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Sleeping or seating position in a compartment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BerthType {
    Lower,
    Middle,
    Upper,
    #[serde(rename = "Side Lower")]
    SideLower,
    #[serde(rename = "Side Upper")]
    SideUpper,
    Seat,
}

impl BerthType {
    /// Lower and Side Lower berths, the ones open to senior-citizen seats.
    pub fn is_lower(&self) -> bool {
        matches!(self, BerthType::Lower | BerthType::SideLower)
    }
}

impl fmt::Display for BerthType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BerthType::Lower => "Lower",
            BerthType::Middle => "Middle",
            BerthType::Upper => "Upper",
            BerthType::SideLower => "Side Lower",
            BerthType::SideUpper => "Side Upper",
            BerthType::Seat => "Seat",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_code_is_kept() {
        let class = FareClass::from_code("EC");
        assert_eq!(class, FareClass::Other("EC".to_string()));
        assert_eq!(class.code(), "EC");
    }

    #[test]
    fn test_fare_class_serializes_as_code() {
        let json = serde_json::to_string(&FareClass::ThirdAc).unwrap();
        assert_eq!(json, "\"3A\"");
        let class: FareClass = serde_json::from_str("\"cc\"").unwrap();
        assert_eq!(class, FareClass::ChairCar);
    }

    #[test]
    fn test_berth_serialization() {
        let json = serde_json::to_string(&BerthType::SideLower).unwrap();
        assert_eq!(json, "\"Side Lower\"");
        assert!(BerthType::SideLower.is_lower());
        assert!(!BerthType::Middle.is_lower());
    }
}
