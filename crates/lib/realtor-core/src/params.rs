//! Property search arguments and their validation.
//!
//! [`SearchArgs`] is the caller-facing shape with per-field defaults; it is
//! turned into [`SearchParameters`] by `TryFrom`, which is the only way to
//! build a value that the forwarder accepts.

use std::error::Error;
use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const DEFAULT_LIMIT: u32 = 20;
pub const DEFAULT_SEARCH_RADIUS_MILES: f64 = 5.0;

/// Arguments accepted by the `property_search` tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SearchArgs {
    /// The maximum number of properties to return
    #[serde(default = "default_limit")]
    pub limit: f64,
    /// Maximum price of properties to return
    pub max_price: Option<f64>,
    /// Return properties with a number of baths greater than or equal to this number
    #[serde(default)]
    pub min_baths: f64,
    /// Return properties with a number of bedrooms greater than or equal to this number
    #[serde(default)]
    pub min_beds: f64,
    /// Return properties with a square footage greater than or equal to this number
    #[serde(default)]
    pub min_sqft: f64,
    /// A short and concise description of desired apartment amenities and other intangibles.
    /// Don't include traits like number of bedrooms that are covered by other search parameters.
    /// Don't include amenities or intangibles the user wants to avoid.
    pub query: String,
    /// Optional float latitude for search center. Should always be set if longitude is set
    pub search_center_latitude: Option<f64>,
    /// Optional float longitude for search center. Should always be set if latitude is set
    pub search_center_longitude: Option<f64>,
    /// Return properties within this distance (in miles) from the search center
    #[serde(default = "default_search_radius")]
    pub search_radius: f64,
}

fn default_limit() -> f64 {
    f64::from(DEFAULT_LIMIT)
}

const fn default_search_radius() -> f64 {
    DEFAULT_SEARCH_RADIUS_MILES
}

impl SearchArgs {
    /// Creates arguments for `query` with every other field at its default.
    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            limit: default_limit(),
            max_price: None,
            min_baths: 0.0,
            min_beds: 0.0,
            min_sqft: 0.0,
            query: query.into(),
            search_center_latitude: None,
            search_center_longitude: None,
            search_radius: default_search_radius(),
        }
    }
}

/// Upper price bound for a search.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum MaxPrice {
    #[default]
    Unbounded,
    AtMost(f64),
}

impl MaxPrice {
    /// Value to put on the wire; unbounded has none.
    #[must_use]
    pub const fn ceiling(self) -> Option<f64> {
        match self {
            Self::Unbounded => None,
            Self::AtMost(price) => Some(price),
        }
    }
}

/// Center point for a spatial search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchCenter {
    pub latitude: f64,
    pub longitude: f64,
}

/// Validated property search parameters, ready to forward.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchParameters {
    limit: u32,
    max_price: MaxPrice,
    min_baths: f64,
    min_beds: f64,
    min_sqft: f64,
    query: String,
    search_center: Option<SearchCenter>,
    search_radius: f64,
}

impl SearchParameters {
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    #[must_use]
    pub const fn max_price(&self) -> MaxPrice {
        self.max_price
    }

    #[must_use]
    pub const fn min_baths(&self) -> f64 {
        self.min_baths
    }

    #[must_use]
    pub const fn min_beds(&self) -> f64 {
        self.min_beds
    }

    #[must_use]
    pub const fn min_sqft(&self) -> f64 {
        self.min_sqft
    }

    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    #[must_use]
    pub const fn search_center(&self) -> Option<SearchCenter> {
        self.search_center
    }

    #[must_use]
    pub const fn search_radius(&self) -> f64 {
        self.search_radius
    }

    /// Flattens the parameters into query-string pairs for the remote API.
    ///
    /// An unbounded price and a missing search center are omitted entirely.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("limit", self.limit.to_string())];
        if let Some(ceiling) = self.max_price.ceiling() {
            pairs.push(("max_price", ceiling.to_string()));
        }
        pairs.push(("min_baths", self.min_baths.to_string()));
        pairs.push(("min_beds", self.min_beds.to_string()));
        pairs.push(("min_sqft", self.min_sqft.to_string()));
        pairs.push(("query", self.query.clone()));
        if let Some(center) = self.search_center {
            pairs.push(("search_center_latitude", center.latitude.to_string()));
            pairs.push(("search_center_longitude", center.longitude.to_string()));
        }
        pairs.push(("search_radius", self.search_radius.to_string()));
        pairs
    }
}

impl TryFrom<SearchArgs> for SearchParameters {
    type Error = ValidationError;

    fn try_from(args: SearchArgs) -> Result<Self, Self::Error> {
        let limit = whole_positive("limit", args.limit)?;
        let max_price = match args.max_price {
            Some(price) => MaxPrice::AtMost(positive("max_price", price)?),
            None => MaxPrice::Unbounded,
        };
        let min_baths = non_negative("min_baths", args.min_baths)?;
        let min_beds = non_negative("min_beds", args.min_beds)?;
        let min_sqft = non_negative("min_sqft", args.min_sqft)?;

        if args.query.trim().is_empty() {
            return Err(ValidationError::EmptyField("query"));
        }

        let search_center = match (args.search_center_latitude, args.search_center_longitude) {
            (Some(latitude), Some(longitude)) => Some(SearchCenter {
                latitude: finite("search_center_latitude", latitude)?,
                longitude: finite("search_center_longitude", longitude)?,
            }),
            (None, None) => None,
            _ => return Err(ValidationError::IncompleteSearchCenter),
        };

        let search_radius = positive("search_radius", args.search_radius)?;

        Ok(Self {
            limit,
            max_price,
            min_baths,
            min_beds,
            min_sqft,
            query: args.query,
            search_center,
            search_radius,
        })
    }
}

fn finite(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ValidationError::NonFinite(field))
    }
}

fn positive(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    let value = finite(field, value)?;
    if value > 0.0 {
        Ok(value)
    } else {
        Err(ValidationError::OutOfRange {
            field,
            bound: Bound::Positive,
            value,
        })
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    let value = finite(field, value)?;
    if value >= 0.0 {
        Ok(value)
    } else {
        Err(ValidationError::OutOfRange {
            field,
            bound: Bound::NonNegative,
            value,
        })
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn whole_positive(field: &'static str, value: f64) -> Result<u32, ValidationError> {
    let value = positive(field, value)?;
    if value.fract() != 0.0 {
        return Err(ValidationError::NotWholeNumber { field, value });
    }
    if value > f64::from(u32::MAX) {
        return Err(ValidationError::OutOfRange {
            field,
            bound: Bound::Maximum(f64::from(u32::MAX)),
            value,
        });
    }
    // Range and fraction were checked above.
    Ok(value as u32)
}

/// Numeric constraint a field failed to meet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bound {
    Positive,
    NonNegative,
    Maximum(f64),
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Positive => write!(f, "greater than 0"),
            Self::NonNegative => write!(f, "greater than or equal to 0"),
            Self::Maximum(max) => write!(f, "at most {max}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    EmptyField(&'static str),
    NonFinite(&'static str),
    OutOfRange {
        field: &'static str,
        bound: Bound,
        value: f64,
    },
    NotWholeNumber {
        field: &'static str,
        value: f64,
    },
    IncompleteSearchCenter,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyField(field) => write!(f, "{field} must not be empty"),
            Self::NonFinite(field) => write!(f, "{field} must be a finite number"),
            Self::OutOfRange {
                field,
                bound,
                value,
            } => write!(f, "{field} must be {bound} (got {value})"),
            Self::NotWholeNumber { field, value } => {
                write!(f, "{field} must be a whole number (got {value})")
            }
            Self::IncompleteSearchCenter => write!(
                f,
                "Must provide both search_center_latitude and search_center_longitude if either is set"
            ),
        }
    }
}

impl Error for ValidationError {}
