use chrono::NaiveDate;
use globo_travel::catalog::rows_from_json;
use globo_travel::{
    apply, load, BrowsingSession, CatalogCache, FilterSpec, InMemorySource, InclusiveRange,
    JsonFileSource, LoadError, SortKey, TravelType, SAMPLE_JSON_PATH,
};
use std::sync::Arc;

const TWO_OFFERS: &str = r#"[
    {
        "Travel Company": "Sunny Tours", "Trip Location": "Paris", "People per Trip": 4,
        "Fees": 500, "Other Details": "City walk", "Departure Date": "2025-01-10",
        "Return Date": "2025-01-20", "Star Rating": 4, "Amenities": "Free Wi-Fi, Gym",
        "Travel Type": "Leisure", "Image URL": null, "Travel ID": "A"
    },
    {
        "Travel Company": "Coastline Holidays", "Trip Location": "Goa", "People per Trip": 2,
        "Fees": 1500, "Other Details": "Beach villa", "Departure Date": "2025-02-01",
        "Return Date": "2025-02-08", "Star Rating": 3, "Amenities": "Parking",
        "Travel Type": "Business", "Image URL": null, "Travel ID": "B"
    }
]"#;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_paris_goa_scenario_end_to_end() {
    let rows = rows_from_json(TWO_OFFERS).unwrap();
    let catalog = load(&InMemorySource::new("two-offers", rows)).unwrap();

    let spec = FilterSpec {
        locations: ["Paris", "Goa"].iter().map(|s| s.to_string()).collect(),
        group_size: InclusiveRange::new(1, 10),
        fee: InclusiveRange::new(0.0, 1000.0),
        min_star_rating: 3,
        departure: InclusiveRange::new(date(2025, 1, 1), date(2025, 12, 31)),
        return_window: InclusiveRange::new(date(2025, 1, 1), date(2025, 12, 31)),
        travel_types: [TravelType::Leisure].into_iter().collect(),
        amenities: vec!["Gym".to_string()],
        sort_key: SortKey::Fee,
    };

    let result = apply(&catalog, &spec);
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].travel_id, "A");
    assert_eq!(result[0].location, "Paris");
}

#[test]
fn test_missing_fees_column_produces_no_catalog() {
    let without_fees = TWO_OFFERS.replace("\"Fees\": 500, ", "").replace("\"Fees\": 1500, ", "");
    let rows = rows_from_json(&without_fees).unwrap();

    match load(&InMemorySource::new("no-fees", rows)) {
        Err(LoadError::MissingField(field)) => assert_eq!(field, "Fees"),
        other => panic!("Expected MissingField(\"Fees\"), got {:?}", other),
    }
}

#[test]
fn test_sample_catalog_session() {
    let cache = CatalogCache::new();
    let source = JsonFileSource::new(SAMPLE_JSON_PATH);
    let catalog = cache.get_or_load(&source).unwrap();
    assert!(Arc::ptr_eq(&catalog, &cache.get_or_load(&source).unwrap()));

    let mut session = BrowsingSession::new(catalog);
    let mut spec = FilterSpec::sidebar_defaults(session.catalog());

    // Sidebar default is five stars only
    let five_star = session.search(&spec);
    assert!(!five_star.is_empty());
    assert!(five_star.iter().all(|o| o.star_rating == 5));
    assert!(five_star.windows(2).all(|w| w[0].fee <= w[1].fee));

    spec.min_star_rating = 1;
    spec.travel_types = [TravelType::Solo].into_iter().collect();
    spec.sort_key = SortKey::Location;
    let solo = session.search(&spec);
    assert!(solo.iter().all(|o| o.travel_type.to_lowercase().contains("solo")));
    assert!(solo.windows(2).all(|w| w[0].location <= w[1].location));

    for offer in &solo {
        session.save_location(&offer.location);
    }
    assert!(!session.save_location(&solo[0].location));
    assert_eq!(session.wish_list().len(), solo.len());
}
