// Travel offer data model shared by the catalog, the filter engine and the links
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// Column names exactly as they appear in the source workbook
pub const COL_COMPANY: &str = "Travel Company";
pub const COL_LOCATION: &str = "Trip Location";
pub const COL_GROUP_SIZE: &str = "People per Trip";
pub const COL_FEES: &str = "Fees";
pub const COL_DETAILS: &str = "Other Details";
pub const COL_DEPARTURE: &str = "Departure Date";
pub const COL_RETURN: &str = "Return Date";
pub const COL_STAR_RATING: &str = "Star Rating";
pub const COL_AMENITIES: &str = "Amenities";
pub const COL_TRAVEL_TYPE: &str = "Travel Type";
pub const COL_IMAGE_URL: &str = "Image URL";
pub const COL_TRAVEL_ID: &str = "Travel ID";

// Checked in this order; the first absent column is the one reported
pub const REQUIRED_COLUMNS: [&str; 12] = [
    COL_COMPANY,
    COL_LOCATION,
    COL_GROUP_SIZE,
    COL_FEES,
    COL_DETAILS,
    COL_DEPARTURE,
    COL_RETURN,
    COL_STAR_RATING,
    COL_AMENITIES,
    COL_TRAVEL_TYPE,
    COL_IMAGE_URL,
    COL_TRAVEL_ID,
];

// Amenity keywords offered by the sidebar multiselect
pub const KNOWN_AMENITIES: [&str; 5] = ["Parking", "Swimming Pool", "Free Wi-Fi", "Restaurant", "Gym"];

/// One row of the catalog after validation and coercion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TravelOffer {
    pub company: String,
    pub location: String,
    pub group_size_capacity: u32,
    pub fee: f64,
    pub details: String,
    pub departure_date: NaiveDate,
    pub return_date: NaiveDate,
    pub star_rating: u8,
    // Free text such as "Free Wi-Fi, Gym"
    pub amenities: String,
    // Free text, may name several travel types
    pub travel_type: String,
    pub image_url: Option<String>,
    pub travel_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TravelType {
    Solo,
    Business,
    Leisure,
    Family,
}

impl TravelType {
    pub const ALL: [TravelType; 4] = [
        TravelType::Solo,
        TravelType::Business,
        TravelType::Leisure,
        TravelType::Family,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            TravelType::Solo => "Solo",
            TravelType::Business => "Business",
            TravelType::Leisure => "Leisure",
            TravelType::Family => "Family",
        }
    }
}

impl fmt::Display for TravelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TravelType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TravelType::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown travel type: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_travel_type_parse_ignores_case_and_whitespace() {
        assert_eq!(" leisure ".parse::<TravelType>(), Ok(TravelType::Leisure));
        assert_eq!("FAMILY".parse::<TravelType>(), Ok(TravelType::Family));
        assert!("Cruise".parse::<TravelType>().is_err());
    }

    #[test]
    fn test_required_columns_include_every_field() {
        assert_eq!(REQUIRED_COLUMNS.len(), 12);
        assert!(REQUIRED_COLUMNS.contains(&COL_FEES));
        assert!(REQUIRED_COLUMNS.contains(&COL_TRAVEL_ID));
    }
}
