// Outbound links shown next to each offer: fixed forms plus templated share URLs
use crate::offer::TravelOffer;

pub const BOOKING_FORM_URL: &str = "https://forms.office.com/Pages/ResponsePage.aspx?id=DQSIkWdsW0yxEjajBLZtrQAAAAAAAAAAAAMAACcqb-tUMERWUEY3OUlESTdCQ05ZWTVNUVpVRDdLVy4u";
pub const REVIEW_FORM_URL: &str = "https://forms.office.com/Pages/ResponsePage.aspx?id=DQSIkWdsW0yxEjajBLZtrQAAAAAAAAAAAAMAACcqb-tUMFg3UE1SUVFQRVJMT002TDJXTkFMMEFZSS4u";
pub const CHAT_URL: &str = "https://chat.whatsapp.com/KjisiRz5L0yE51e7EWoriw";
pub const INSTAGRAM_URL: &str = "https://www.instagram.com/";

const FACEBOOK_SHARER_URL: &str = "https://www.facebook.com/sharer/sharer.php";
const WHATSAPP_SEND_URL: &str = "https://api.whatsapp.com/send";
// Page the Facebook share points at
const SHARED_PAGE_URL: &str = "https://example.com";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareLinks {
    pub text: String,
    pub facebook: String,
    pub whatsapp: String,
    pub instagram: String,
}

impl ShareLinks {
    pub fn for_offer(offer: &TravelOffer) -> Self {
        let text = share_text(offer);
        let encoded = urlencoding::encode(&text);

        Self {
            facebook: format!(
                "{}?u={}&quote={}",
                FACEBOOK_SHARER_URL,
                urlencoding::encode(SHARED_PAGE_URL),
                encoded
            ),
            whatsapp: format!("{}?text={}", WHATSAPP_SEND_URL, encoded),
            instagram: INSTAGRAM_URL.to_string(),
            text,
        }
    }
}

pub fn share_text(offer: &TravelOffer) -> String {
    format!(
        "Check out this trip to {} with {}. Fees: ₹{}! Departure: {}",
        offer.location,
        offer.company,
        offer.fee,
        offer.departure_date.format("%Y-%m-%d")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn paris() -> TravelOffer {
        TravelOffer {
            company: "Sunny Tours".to_string(),
            location: "Paris".to_string(),
            group_size_capacity: 4,
            fee: 500.0,
            details: String::new(),
            departure_date: NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
            return_date: NaiveDate::from_ymd_opt(2025, 1, 20).unwrap(),
            star_rating: 4,
            amenities: "Gym".to_string(),
            travel_type: "Leisure".to_string(),
            image_url: None,
            travel_id: "A".to_string(),
        }
    }

    #[test]
    fn test_share_text() {
        assert_eq!(
            share_text(&paris()),
            "Check out this trip to Paris with Sunny Tours. Fees: ₹500! Departure: 2025-01-10"
        );
    }

    #[test]
    fn test_share_urls_are_encoded() {
        let links = ShareLinks::for_offer(&paris());

        assert!(links
            .whatsapp
            .starts_with("https://api.whatsapp.com/send?text=Check%20out%20this%20trip%20to%20Paris"));
        assert!(links
            .facebook
            .starts_with("https://www.facebook.com/sharer/sharer.php?u=https%3A%2F%2Fexample.com&quote="));
        assert!(links.facebook.contains("%E2%82%B9500%21"));
        assert!(!links.whatsapp.contains(' '));
        assert_eq!(links.instagram, INSTAGRAM_URL);
    }
}
