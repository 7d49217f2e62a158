// Filter engine: matches catalog offers against a FilterSpec and sorts the result
use crate::catalog::Catalog;
use crate::offer::{TravelOffer, TravelType, KNOWN_AMENITIES};
use chrono::NaiveDate;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt::Debug;
use thiserror::Error;
use tracing::{debug, warn};

// A filter spec that can never match anything
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FilterError {
    #[error("Invalid {field} range: {min} is greater than {max}")]
    InvertedRange {
        field: &'static str,
        min: String,
        max: String,
    },
}

// Inclusive on both ends
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InclusiveRange<T> {
    pub min: T,
    pub max: T,
}

impl<T: PartialOrd + Copy + Debug> InclusiveRange<T> {
    pub fn new(min: T, max: T) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: T) -> bool {
        self.min <= value && value <= self.max
    }

    pub fn is_inverted(&self) -> bool {
        self.min > self.max
    }

    fn check(&self, field: &'static str) -> Result<(), FilterError> {
        if self.is_inverted() {
            return Err(FilterError::InvertedRange {
                field,
                min: format!("{:?}", self.min),
                max: format!("{:?}", self.max),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Fee,
    GroupSizeCapacity,
    Location,
}

impl SortKey {
    fn compare(&self, a: &TravelOffer, b: &TravelOffer) -> Ordering {
        match self {
            SortKey::Fee => a.fee.total_cmp(&b.fee),
            SortKey::GroupSizeCapacity => a.group_size_capacity.cmp(&b.group_size_capacity),
            SortKey::Location => a.location.cmp(&b.location),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterSpec {
    pub locations: BTreeSet<String>,
    pub group_size: InclusiveRange<u32>,
    pub fee: InclusiveRange<f64>,
    pub min_star_rating: u8,
    pub departure: InclusiveRange<NaiveDate>,
    pub return_window: InclusiveRange<NaiveDate>,
    pub travel_types: BTreeSet<TravelType>,
    // Keywords searched for inside the free-text amenities column
    pub amenities: Vec<String>,
    pub sort_key: SortKey,
}

impl FilterSpec {
    // The selections the sidebar starts with: everything in the catalog,
    // five stars minimum, every listed amenity and travel type, cheapest first
    pub fn sidebar_defaults(catalog: &Catalog) -> Self {
        let today = chrono::Local::now().date_naive();
        let (fee_min, fee_max) = catalog.fee_bounds().unwrap_or((0.0, 0.0));
        let (dep_min, dep_max) = catalog.departure_bounds().unwrap_or((today, today));
        let (ret_min, ret_max) = catalog.return_bounds().unwrap_or((today, today));

        Self {
            locations: catalog.locations().into_iter().collect(),
            group_size: InclusiveRange::new(1, catalog.max_group_size().unwrap_or(1)),
            fee: InclusiveRange::new(fee_min, fee_max),
            min_star_rating: 5,
            departure: InclusiveRange::new(dep_min, dep_max),
            return_window: InclusiveRange::new(ret_min, ret_max),
            travel_types: TravelType::ALL.into_iter().collect(),
            amenities: KNOWN_AMENITIES.iter().map(|a| a.to_string()).collect(),
            sort_key: SortKey::Fee,
        }
    }

    // Report a spec whose ranges can never be satisfied
    pub fn check(&self) -> Result<(), FilterError> {
        self.group_size.check("group size")?;
        self.fee.check("fee")?;
        self.departure.check("departure date")?;
        self.return_window.check("return date")?;
        Ok(())
    }
}

// Needles lowercased once per invocation
struct Matcher<'a> {
    spec: &'a FilterSpec,
    travel_types: Vec<String>,
    amenities: Vec<String>,
}

impl<'a> Matcher<'a> {
    fn new(spec: &'a FilterSpec) -> Self {
        Self {
            spec,
            travel_types: spec
                .travel_types
                .iter()
                .map(|t| t.name().to_lowercase())
                .collect(),
            amenities: spec.amenities.iter().map(|a| a.to_lowercase()).collect(),
        }
    }

    fn matches(&self, offer: &TravelOffer) -> bool {
        let spec = self.spec;
        spec.locations.contains(&offer.location)
            && spec.group_size.contains(offer.group_size_capacity)
            && spec.fee.contains(offer.fee)
            && offer.star_rating >= spec.min_star_rating
            && spec.departure.contains(offer.departure_date)
            && spec.return_window.contains(offer.return_date)
            && contains_any(&offer.travel_type, &self.travel_types)
            && contains_any(&offer.amenities, &self.amenities)
    }
}

// Case-insensitive "contains any of"; an empty selection matches nothing
fn contains_any(haystack: &str, needles: &[String]) -> bool {
    if needles.is_empty() {
        return false;
    }
    let haystack = haystack.to_lowercase();
    needles.iter().any(|n| haystack.contains(n.as_str()))
}

// Offers matching every criterion, stably sorted ascending by the sort key
pub fn apply(catalog: &Catalog, spec: &FilterSpec) -> Vec<TravelOffer> {
    if let Err(e) = spec.check() {
        warn!(error = %e, "Filter spec can never match, returning no offers");
        return Vec::new();
    }

    let matcher = Matcher::new(spec);
    let mut filtered: Vec<TravelOffer> = catalog
        .iter()
        .filter(|offer| matcher.matches(offer))
        .cloned()
        .collect();

    // sort_by is stable, so ties keep catalog order
    filtered.sort_by(|a, b| spec.sort_key.compare(a, b));

    debug!(
        catalog = catalog.len(),
        matched = filtered.len(),
        sort_key = ?spec.sort_key,
        "Filter applied"
    );
    filtered
}
